//! Reports fetched from the report API over blocking HTTP.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::{check_slug, ReportSource};
use crate::config::SourceConfig;
use crate::error::{Error, Result};
use crate::report::{Report, ReportListing, ReportMeta};

/// Header carrying the public api key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Blocking client for the report API.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base: String,
    api_key: Option<String>,
}

impl HttpSource {
    /// Client for `base` (trailing slashes are ignored).
    pub fn new(base: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let base = base.into().trim_end_matches('/').to_string();
        if base.is_empty() {
            return Err(Error::Config("api base path is empty".to_string()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base,
            api_key,
        })
    }

    /// Client configured from a [`SourceConfig`].
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        let base = config
            .api_base_path
            .clone()
            .ok_or_else(|| Error::Config("server mode needs an api base path".to_string()))?;
        Self::new(
            base,
            config.api_key.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Absolute URL of `path` (which starts with `/`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => req.header(API_KEY_HEADER, key.as_str()),
            None => req,
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, authed: bool) -> Result<T> {
        let url = self.url(path);
        let mut req = self.client.get(&url);
        if authed {
            req = self.authed(req);
        }
        let resp = req.send()?;
        let status = resp.status();
        tracing::debug!(%url, status = status.as_u16(), "report api response");
        match status {
            s if s.is_success() => Ok(resp.json()?),
            StatusCode::UNAUTHORIZED => Err(Error::Unauthorized),
            StatusCode::NOT_FOUND => Err(Error::NotFound(url)),
            s => Err(Error::HttpStatus {
                url,
                status: s.as_u16(),
            }),
        }
    }
}

impl ReportSource for HttpSource {
    fn list_reports(&self) -> Result<Vec<ReportListing>> {
        self.get_json("/reports", true)
    }

    fn fetch_report(&self, slug: &str) -> Result<Report> {
        check_slug(slug)?;
        self.get_json(&format!("/reports/{slug}"), true)
    }

    fn fetch_meta(&self) -> Result<ReportMeta> {
        self.get_json("/meta/metadata.json", false)
    }
}
