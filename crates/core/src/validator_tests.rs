// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::loader::parse_pipeline;

fn valid_pipeline() -> PipelineDefinition {
    parse_pipeline(
        r#"
version: 1
name: Valid
variables:
  TARGET: release
stages:
  - name: build
    steps:
      - name: Compile
        command: cargo build --${TARGET}
  - name: test
    steps:
      - name: Test
        command: cargo test
"#,
    )
    .unwrap()
}

#[test]
fn valid_pipeline_has_no_errors() {
    let report = validate(&valid_pipeline());
    assert!(!report.has_errors(), "unexpected: {}", report);
    assert_eq!(report.errors().count(), 0);
}

#[test]
fn version_zero_warns_no_version() {
    let mut definition = valid_pipeline();
    definition.version = 0;
    let report = validate(&definition);
    assert!(!report.has_errors());
    assert!(report
        .warnings()
        .any(|w| w.message.contains("no version")));
}

#[test]
fn newer_version_warns() {
    let mut definition = valid_pipeline();
    definition.version = 2;
    let report = validate(&definition);
    assert!(report.warnings().any(|w| w.message.contains("newer")));
}

#[test]
fn older_version_warns() {
    let mut definition = valid_pipeline();
    definition.version = -1;
    let report = validate(&definition);
    assert!(report.warnings().any(|w| w.message.contains("older")));
}

#[test]
fn current_version_is_silent() {
    let report = validate(&valid_pipeline());
    assert!(!report
        .warnings()
        .any(|w| w.message.contains("version")));
}

#[test]
fn default_name_warns() {
    let mut definition = valid_pipeline();
    definition.name = DEFAULT_PIPELINE_NAME.to_string();
    let report = validate(&definition);
    assert!(report.warnings().any(|w| w.message.contains("no name")));
}

#[test]
fn zero_stages_is_error() {
    let mut definition = valid_pipeline();
    definition.stages.clear();
    let report = validate(&definition);
    assert!(report.has_errors());
    assert!(report.errors().any(|e| e.message.contains("no stages")));
}

#[test]
fn empty_watch_path_is_error() {
    let mut definition = valid_pipeline();
    definition.watch.push(crate::pipeline::WatchTrigger {
        path: "  ".into(),
        ..Default::default()
    });
    let report = validate(&definition);
    assert!(report.errors().any(|e| e.message.contains("empty path")));
}

#[test]
fn negative_debounce_is_error() {
    let mut definition = valid_pipeline();
    definition.watch.push(crate::pipeline::WatchTrigger {
        debounce_ms: -5,
        ..Default::default()
    });
    let report = validate(&definition);
    assert!(report
        .errors()
        .any(|e| e.message.contains("must not be negative")));
}

#[test]
fn stage_without_steps_is_error() {
    let mut definition = valid_pipeline();
    definition.stages[0].steps.clear();
    let report = validate(&definition);
    assert!(report.errors().any(|e| e.message.contains("no steps")));
}

#[test]
fn default_stage_name_warns() {
    let mut definition = valid_pipeline();
    definition.stages[0].name = "default".into();
    let report = validate(&definition);
    assert!(report
        .warnings()
        .any(|w| w.message.contains("Stage has no name")));
}

#[test]
fn duplicate_stage_names_error_mentions_duplicate() {
    let mut definition = valid_pipeline();
    definition.stages[1].name = definition.stages[0].name.clone();
    let report = validate(&definition);
    assert!(report
        .errors()
        .any(|e| e.message.contains("Duplicate stage name")));
}

#[test]
fn duplicate_step_names_warn() {
    let mut definition = valid_pipeline();
    let extra = definition.stages[0].steps[0].clone();
    definition.stages[0].steps.push(extra);
    let report = validate(&definition);
    assert!(!report.has_errors());
    assert!(report
        .warnings()
        .any(|w| w.message.contains("Duplicate step name")));
}

#[test]
fn empty_command_is_error() {
    let mut definition = valid_pipeline();
    definition.stages[0].steps[0].command = String::new();
    let report = validate(&definition);
    assert!(report
        .errors()
        .any(|e| e.message.contains("empty command")));
}

#[test]
fn non_positive_timeout_is_error() {
    let mut definition = valid_pipeline();
    definition.stages[0].steps[0].timeout_seconds = 0;
    let report = validate(&definition);
    assert!(report
        .errors()
        .any(|e| e.message.contains("must be positive")));
}

#[test]
fn undeclared_variable_reference_warns_naming_it() {
    let mut definition = valid_pipeline();
    definition.stages[0].steps[0].arguments = Some("--flag ${MYSTERY}".into());
    let report = validate(&definition);
    assert!(!report.has_errors());
    assert!(report.warnings().any(|w| w.message.contains("MYSTERY")));
}

#[test]
fn builtin_variables_are_satisfied() {
    let mut definition = valid_pipeline();
    definition.stages[0].steps[0].arguments =
        Some("${PIPEFORGE_RUN_ID} ${PIPEFORGE_WORK_DIR} ${PIPEFORGE_PIPELINE}".into());
    let report = validate(&definition);
    assert_eq!(report.warnings().count(), 0, "{}", report);
}

#[test]
fn stage_condition_undeclared_variable_warns() {
    let mut definition = valid_pipeline();
    definition.stages[0].condition = Some(crate::pipeline::StageCondition {
        only_if: Some("NOT_DECLARED".into()),
        ..Default::default()
    });
    let report = validate(&definition);
    assert!(report
        .warnings()
        .any(|w| w.message.contains("NOT_DECLARED")));
}

#[test]
fn warnings_never_set_has_errors() {
    let mut definition = valid_pipeline();
    definition.version = 0;
    definition.name = DEFAULT_PIPELINE_NAME.to_string();
    definition.stages[0].steps[0].arguments = Some("${NOPE}".into());
    let report = validate(&definition);
    assert!(report.warnings().count() >= 3);
    assert!(!report.has_errors());
}

// ============================================================================
// File entry point
// ============================================================================

#[test]
fn missing_file_reports_not_found_error() {
    let report = validate_file(Path::new("/nope/missing.yml"));
    assert!(report.has_errors());
    assert!(report.errors().any(|e| e.message.contains("not found")));
}

#[test]
fn unparsable_file_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.yml");
    std::fs::write(&path, "stages: [oops").unwrap();

    let report = validate_file(&path);
    assert!(report.has_errors());
}

#[test]
fn valid_file_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ok.yml");
    std::fs::write(
        &path,
        "version: 1\nname: FromDisk\nstages:\n  - name: s\n    steps:\n      - name: a\n        command: echo\n",
    )
    .unwrap();

    let report = validate_file(&path);
    assert!(!report.has_errors(), "{}", report);
}
