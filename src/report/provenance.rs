//! Pipeline provenance carried in a report's `config` section.

use serde::{Deserialize, Serialize};

/// One step of the pipeline plan, e.g. `extraction` or `embedding`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    /// Step name.
    pub step: String,
}

/// Model, prompt and code used by a single pipeline step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepProvenance {
    /// Model that ran the step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Prompt given to the model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Source code of the step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_code: Option<String>,
}

/// The `config` section of a report document.
///
/// Only the display-relevant keys are typed; every other key is kept
/// verbatim in [`ReportConfig::extra`] so per-step sections can be looked up
/// by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// The consultation question.
    #[serde(default)]
    pub question: String,
    /// Introductory text shown above the analysis.
    #[serde(default)]
    pub intro: String,
    /// Default model of the pipeline run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Executed pipeline steps, in order.
    #[serde(default)]
    pub plan: Vec<PlanStep>,
    /// Remaining config keys.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ReportConfig {
    /// Provenance recorded for `step`, if the section exists and has the
    /// expected shape.
    pub fn step(&self, step: &str) -> Option<StepProvenance> {
        let section = self.extra.get(step)?;
        serde_json::from_value(section.clone()).ok()
    }

    /// Names of the executed steps.
    pub fn step_names(&self) -> impl Iterator<Item = &str> {
        self.plan.iter().map(|p| p.step.as_str())
    }
}
