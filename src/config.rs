//! Configuration: where reports come from and how a view opens.
//!
//! Values are resolved in order, later winning:
//! 1. compiled defaults
//! 2. a TOML file
//! 3. environment variables (`CANOPY_*`)
//!
//! ```toml
//! [source]
//! output_mode = "server"
//! api_base_path = "http://localhost:8000"
//! api_key = "public"
//! timeout_secs = 30
//!
//! [view]
//! chart = "scatterDensity"
//! density = { max_density = 0.2, min_value = 5 }
//! ```

use core::fmt;
use core::str::FromStr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::select::DensityFilter;
use crate::view::ChartType;

/// Base URL of the report API.
pub const ENV_API_BASEPATH: &str = "CANOPY_API_BASEPATH";
/// Public api key sent as `x-api-key`.
pub const ENV_PUBLIC_API_KEY: &str = "CANOPY_PUBLIC_API_KEY";
/// `server` or `export`.
pub const ENV_OUTPUT_MODE: &str = "CANOPY_OUTPUT_MODE";
/// Root of a static export.
pub const ENV_EXPORT_DIR: &str = "CANOPY_EXPORT_DIR";

/// Where report documents are read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Live report API over HTTP.
    #[default]
    Server,
    /// Static export directory (`reports/index.json`, `reports/{slug}.json`).
    Export,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server => write!(f, "server"),
            Self::Export => write!(f, "export"),
        }
    }
}

impl FromStr for OutputMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "server" => Ok(Self::Server),
            "export" => Ok(Self::Export),
            other => Err(Error::InvalidParameter {
                name: "output_mode",
                message: format!("expected 'server' or 'export', got '{other}'"),
            }),
        }
    }
}

/// Report source settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Server or static export.
    pub output_mode: OutputMode,
    /// Base URL of the report API (server mode).
    pub api_base_path: Option<String>,
    /// Api key sent as `x-api-key` (server mode).
    pub api_key: Option<String>,
    /// Root of the static export (export mode).
    pub export_dir: PathBuf,
    /// Request timeout in seconds (server mode).
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            output_mode: OutputMode::Server,
            api_base_path: None,
            api_key: None,
            export_dir: PathBuf::from("out"),
            timeout_secs: 30,
        }
    }
}

/// How a report view opens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Initial chart.
    pub chart: ChartType,
    /// Thresholds for the density scatter.
    pub density: DensityFilter,
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanopyConfig {
    /// Report source.
    pub source: SourceConfig,
    /// View defaults.
    pub view: ViewConfig,
}

impl CanopyConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), mode = %config.source.output_mode, "loaded config");
        Ok(config)
    }

    /// Defaults, then `path` if given, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(p) => Self::from_path(p)?,
            None => Self::default(),
        };
        let config = base.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Override with `CANOPY_*` variables from the process environment.
    pub fn apply_env(self) -> Result<Self> {
        self.apply_env_from(std::env::vars())
    }

    /// Override with `CANOPY_*` variables from `vars`.
    ///
    /// Empty values are ignored.
    pub fn apply_env_from<I, K, V>(mut self, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in vars {
            let value: String = value.into();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                ENV_API_BASEPATH => self.source.api_base_path = Some(value),
                ENV_PUBLIC_API_KEY => self.source.api_key = Some(value),
                ENV_OUTPUT_MODE => self.source.output_mode = value.parse()?,
                ENV_EXPORT_DIR => self.source.export_dir = PathBuf::from(value),
                _ => {}
            }
        }
        Ok(self)
    }

    /// Check that the selected source has what it needs.
    pub fn validate(&self) -> Result<()> {
        match self.source.output_mode {
            OutputMode::Server if self.source.api_base_path.is_none() => Err(Error::Config(
                format!("server mode needs an api base path (set {ENV_API_BASEPATH})"),
            )),
            OutputMode::Server if self.source.timeout_secs == 0 => {
                Err(Error::Config("timeout_secs must be positive".to_string()))
            }
            _ => Ok(()),
        }
    }
}
