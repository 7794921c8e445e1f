// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Semantic validation for pipeline definitions.
//!
//! Pure static analysis over a parsed definition. Errors mark
//! pipelines the engine would refuse to run; warnings mark things that
//! will probably not do what the author intended. Nothing here touches
//! the filesystem except the file-form entry point, which folds load
//! failures into the report.

use crate::loader::{self, LoadError};
use crate::pipeline::{
    PipelineDefinition, PipelineStage, PipelineStep, CURRENT_SCHEMA_VERSION,
    DEFAULT_PIPELINE_NAME, DEFAULT_STAGE_NAME,
};
use crate::vars;
use std::collections::HashSet;
use std::path::Path;

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A single validation finding.
#[derive(Debug, Clone)]
pub struct ValidationMessage {
    pub severity: Severity,
    /// Where in the pipeline the finding applies (e.g. `stage.build.step.Compile`).
    pub location: String,
    pub message: String,
}

impl std::fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}: {}", tag, self.location, self.message)
    }
}

/// The outcome of validating one pipeline.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub messages: Vec<ValidationMessage>,
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.severity == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationMessage> {
        self.messages
            .iter()
            .filter(|m| m.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationMessage> {
        self.messages
            .iter()
            .filter(|m| m.severity == Severity::Warning)
    }

    fn error(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.messages.push(ValidationMessage {
            severity: Severity::Error,
            location: location.into(),
            message: message.into(),
        });
    }

    fn warning(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.messages.push(ValidationMessage {
            severity: Severity::Warning,
            location: location.into(),
            message: message.into(),
        });
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for message in &self.messages {
            writeln!(f, "{}", message)?;
        }
        Ok(())
    }
}

/// Validate a parsed definition.
pub fn validate(definition: &PipelineDefinition) -> ValidationReport {
    let mut report = ValidationReport::default();

    check_version(definition, &mut report);
    check_name(definition, &mut report);

    if definition.stages.is_empty() {
        report.error("pipeline", "Pipeline has no stages");
    }

    for (i, trigger) in definition.watch.iter().enumerate() {
        let location = format!("watch[{}]", i);
        if trigger.path.trim().is_empty() {
            report.error(location.as_str(), "Watch trigger has an empty path");
        }
        if trigger.debounce_ms < 0 {
            report.error(
                location.as_str(),
                format!("Debounce must not be negative (got {})", trigger.debounce_ms),
            );
        }
    }

    let declared: HashSet<&str> = definition.variables.keys().map(String::as_str).collect();

    let mut seen_stages: HashSet<&str> = HashSet::new();
    for stage in &definition.stages {
        if !seen_stages.insert(stage.name.as_str()) {
            report.error(
                format!("stage.{}", stage.name),
                format!("Duplicate stage name '{}'", stage.name),
            );
        }
        check_stage(stage, &declared, &mut report);
    }

    report
}

/// Validate a pipeline file, folding load failures into the report.
pub fn validate_file(path: &Path) -> ValidationReport {
    match loader::parse_pipeline_file(path) {
        Ok(definition) => validate(&definition),
        Err(LoadError::NotFound { path }) => {
            let mut report = ValidationReport::default();
            report.error("file", format!("Pipeline file not found: {}", path.display()));
            report
        }
        Err(LoadError::Io { path, source }) => {
            let mut report = ValidationReport::default();
            report.error(
                "file",
                format!("Could not read {}: {}", path.display(), source),
            );
            report
        }
        Err(LoadError::Parse(e)) => {
            let mut report = ValidationReport::default();
            report.error("file", e.to_string());
            report
        }
    }
}

fn check_version(definition: &PipelineDefinition, report: &mut ValidationReport) {
    match definition.version {
        0 => report.warning(
            "pipeline",
            format!(
                "Pipeline has no version; assuming schema version {}",
                CURRENT_SCHEMA_VERSION
            ),
        ),
        v if v > CURRENT_SCHEMA_VERSION => report.warning(
            "pipeline",
            format!(
                "Schema version {} is newer than supported version {}",
                v, CURRENT_SCHEMA_VERSION
            ),
        ),
        v if v < CURRENT_SCHEMA_VERSION => report.warning(
            "pipeline",
            format!(
                "Schema version {} is older than current version {}",
                v, CURRENT_SCHEMA_VERSION
            ),
        ),
        _ => {}
    }
}

fn check_name(definition: &PipelineDefinition, report: &mut ValidationReport) {
    if definition.name.trim().is_empty() || definition.name == DEFAULT_PIPELINE_NAME {
        report.warning("pipeline", "Pipeline has no name");
    }
}

fn check_stage(stage: &PipelineStage, declared: &HashSet<&str>, report: &mut ValidationReport) {
    let location = format!("stage.{}", stage.name);

    if stage.name.trim().is_empty() || stage.name == DEFAULT_STAGE_NAME {
        report.warning(location.as_str(), "Stage has no name");
    }
    if stage.steps.is_empty() {
        report.error(location.as_str(), "Stage has no steps");
    }

    if let Some(condition) = &stage.condition {
        for var in [condition.only_if.as_deref(), condition.not_if.as_deref()]
            .into_iter()
            .flatten()
        {
            if !declared.contains(var) && !vars::is_builtin(var) {
                report.warning(
                    location.as_str(),
                    format!("Condition references undeclared variable '{}'", var),
                );
            }
        }
    }

    let mut seen_steps: HashSet<&str> = HashSet::new();
    for step in &stage.steps {
        if !step.name.is_empty() && !seen_steps.insert(step.name.as_str()) {
            report.warning(
                location.as_str(),
                format!("Duplicate step name '{}' within stage", step.name),
            );
        }
        check_step(&stage.name, step, declared, report);
    }
}

fn check_step(
    stage_name: &str,
    step: &PipelineStep,
    declared: &HashSet<&str>,
    report: &mut ValidationReport,
) {
    let location = format!("stage.{}.step.{}", stage_name, step.name);

    if step.command.trim().is_empty() {
        report.error(location.as_str(), "Step has an empty command");
    }
    if step.timeout_seconds <= 0 {
        report.error(
            location.as_str(),
            format!("Timeout must be positive (got {})", step.timeout_seconds),
        );
    }

    let mut reported: HashSet<String> = HashSet::new();
    for template in [Some(step.command.as_str()), step.arguments.as_deref()]
        .into_iter()
        .flatten()
    {
        for var in vars::references(template) {
            if !declared.contains(var.as_str())
                && !vars::is_builtin(&var)
                && reported.insert(var.clone())
            {
                report.warning(
                    location.as_str(),
                    format!("Reference to undeclared variable '{}'", var),
                );
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
