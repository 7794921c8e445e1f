// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline definition types
//!
//! These types mirror the YAML wire form exactly (lower-underscore
//! keys). Unknown keys are ignored on input; fields holding their
//! default value are omitted on output so programmatically constructed
//! pipelines serialize concisely. A definition is immutable during a
//! run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Schema version emitted by the current loader.
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Name sentinel for pipelines that never set one.
pub const DEFAULT_PIPELINE_NAME: &str = "Unnamed Pipeline";

/// Name sentinel for stages that never set one.
pub const DEFAULT_STAGE_NAME: &str = "default";

/// Default per-step timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: i64 = 300;

/// Default watch debounce in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: i64 = 500;

/// The top-level pipeline entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineDefinition {
    /// Schema version; 0 means the file did not specify one.
    #[serde(skip_serializing_if = "is_zero")]
    pub version: i64,
    #[serde(skip_serializing_if = "is_default_pipeline_name")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub watch: Vec<WatchTrigger>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stages: Vec<PipelineStage>,
}

impl Default for PipelineDefinition {
    fn default() -> Self {
        Self {
            version: 0,
            name: DEFAULT_PIPELINE_NAME.to_string(),
            description: None,
            working_directory: None,
            variables: BTreeMap::new(),
            watch: Vec::new(),
            stages: Vec::new(),
        }
    }
}

impl PipelineDefinition {
    /// Create a definition with the current schema version and a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: CURRENT_SCHEMA_VERSION,
            name: name.into(),
            ..Self::default()
        }
    }

    /// Total number of steps across all stages.
    pub fn total_steps(&self) -> usize {
        self.stages.iter().map(|s| s.steps.len()).sum()
    }
}

/// A filesystem location whose debounced change events re-run the
/// pipeline in watch mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchTrigger {
    #[serde(skip_serializing_if = "is_default_watch_path")]
    pub path: String,
    #[serde(skip_serializing_if = "is_default_watch_filter")]
    pub filter: String,
    #[serde(skip_serializing_if = "is_false")]
    pub include_subdirectories: bool,
    /// Negative values are representable on the wire and rejected by
    /// the validator.
    #[serde(skip_serializing_if = "is_default_debounce")]
    pub debounce_ms: i64,
    /// Restrict re-runs to a single stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}

impl Default for WatchTrigger {
    fn default() -> Self {
        Self {
            path: ".".to_string(),
            filter: "*.*".to_string(),
            include_subdirectories: false,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            stage: None,
        }
    }
}

impl WatchTrigger {
    /// Key identifying this trigger in the watcher's debounce state.
    pub fn key(&self) -> String {
        format!("{}:{}", self.path, self.filter)
    }
}

/// An ordered group of steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineStage {
    #[serde(skip_serializing_if = "is_default_stage_name")]
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<PipelineStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<StageCondition>,
    #[serde(skip_serializing_if = "is_false")]
    pub continue_on_error: bool,
}

impl Default for PipelineStage {
    fn default() -> Self {
        Self {
            name: DEFAULT_STAGE_NAME.to_string(),
            steps: Vec::new(),
            condition: None,
            continue_on_error: false,
        }
    }
}

/// Gate controlling whether a stage runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StageCondition {
    /// Variable that must be truthy for the stage to run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_if: Option<String>,
    /// Variable that must not be truthy for the stage to run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_if: Option<String>,
    /// Files that must all exist for the stage to run.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files_exist: Vec<String>,
}

/// Gate controlling whether a step runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StepCondition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_if: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_if: Option<String>,
    /// Exit code the previous completed step must have produced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_exit_code: Option<i32>,
}

/// A single command execution within a stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineStep {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
    /// Additions merged over the run environment for this step only.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "is_default_timeout")]
    pub timeout_seconds: i64,
    #[serde(skip_serializing_if = "is_false")]
    pub allow_failure: bool,
    /// Glob patterns collected after the step completes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<StepCondition>,
    #[serde(skip_serializing_if = "BreakpointMode::is_never")]
    pub breakpoint: BreakpointMode,
}

impl Default for PipelineStep {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            command: String::new(),
            arguments: None,
            working_directory: None,
            environment: BTreeMap::new(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            allow_failure: false,
            artifacts: Vec::new(),
            condition: None,
            breakpoint: BreakpointMode::Never,
        }
    }
}

impl PipelineStep {
    /// Full command line handed to the shell, before variable
    /// resolution.
    pub fn command_line(&self) -> String {
        match &self.arguments {
            Some(args) if !args.is_empty() => format!("{} {}", self.command, args),
            _ => self.command.clone(),
        }
    }
}

/// When the pre-execution observer event fires for a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BreakpointMode {
    /// Only in interactive mode.
    #[default]
    Never,
    /// Every run.
    Always,
    /// A second observation fires after the step fails.
    OnFailure,
}

impl BreakpointMode {
    fn is_never(&self) -> bool {
        matches!(self, BreakpointMode::Never)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BreakpointMode::Never => "never",
            BreakpointMode::Always => "always",
            BreakpointMode::OnFailure => "on_failure",
        }
    }
}

impl Serialize for BreakpointMode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// Wire values are case-insensitive: `never`, `always`, `on_failure`.
impl<'de> Deserialize<'de> for BreakpointMode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.to_ascii_lowercase().as_str() {
            "never" | "" => Ok(BreakpointMode::Never),
            "always" => Ok(BreakpointMode::Always),
            "on_failure" | "onfailure" => Ok(BreakpointMode::OnFailure),
            other => Err(serde::de::Error::custom(format!(
                "unknown breakpoint mode '{}' (expected never, always, on_failure)",
                other
            ))),
        }
    }
}

// Serialization predicates: a field holding its default is omitted.

fn is_zero(v: &i64) -> bool {
    *v == 0
}

fn is_false(v: &bool) -> bool {
    !*v
}

fn is_default_pipeline_name(name: &str) -> bool {
    name == DEFAULT_PIPELINE_NAME
}

fn is_default_stage_name(name: &str) -> bool {
    name == DEFAULT_STAGE_NAME
}

fn is_default_watch_path(path: &str) -> bool {
    path == "."
}

fn is_default_watch_filter(filter: &str) -> bool {
    filter == "*.*"
}

fn is_default_debounce(v: &i64) -> bool {
    *v == DEFAULT_DEBOUNCE_MS
}

fn is_default_timeout(v: &i64) -> bool {
    *v == DEFAULT_TIMEOUT_SECONDS
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
