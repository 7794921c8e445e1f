// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn defaults_match_documented_values() {
    let definition = PipelineDefinition::default();
    assert_eq!(definition.version, 0);
    assert_eq!(definition.name, DEFAULT_PIPELINE_NAME);
    assert!(definition.stages.is_empty());

    let trigger = WatchTrigger::default();
    assert_eq!(trigger.path, ".");
    assert_eq!(trigger.filter, "*.*");
    assert!(!trigger.include_subdirectories);
    assert_eq!(trigger.debounce_ms, 500);

    let stage = PipelineStage::default();
    assert_eq!(stage.name, "default");
    assert!(!stage.continue_on_error);

    let step = PipelineStep::default();
    assert_eq!(step.timeout_seconds, 300);
    assert!(!step.allow_failure);
    assert_eq!(step.breakpoint, BreakpointMode::Never);
}

#[test]
fn new_pipeline_gets_current_version() {
    let definition = PipelineDefinition::new("Build");
    assert_eq!(definition.version, CURRENT_SCHEMA_VERSION);
    assert_eq!(definition.name, "Build");
}

#[test]
fn total_steps_sums_stages() {
    let mut definition = PipelineDefinition::new("p");
    definition.stages.push(PipelineStage {
        steps: vec![PipelineStep::default(), PipelineStep::default()],
        ..PipelineStage::default()
    });
    definition.stages.push(PipelineStage {
        steps: vec![PipelineStep::default()],
        ..PipelineStage::default()
    });
    assert_eq!(definition.total_steps(), 3);
}

#[test]
fn command_line_appends_arguments() {
    let step = PipelineStep {
        command: "echo".into(),
        arguments: Some("hi there".into()),
        ..PipelineStep::default()
    };
    assert_eq!(step.command_line(), "echo hi there");

    let bare = PipelineStep {
        command: "make".into(),
        ..PipelineStep::default()
    };
    assert_eq!(bare.command_line(), "make");
}

#[test]
fn trigger_key_combines_path_and_filter() {
    let trigger = WatchTrigger {
        path: "./src".into(),
        filter: "*.rs".into(),
        ..WatchTrigger::default()
    };
    assert_eq!(trigger.key(), "./src:*.rs");
}

#[test]
fn breakpoint_mode_parses_case_insensitively() {
    for (input, expected) in [
        ("never", BreakpointMode::Never),
        ("Always", BreakpointMode::Always),
        ("ALWAYS", BreakpointMode::Always),
        ("on_failure", BreakpointMode::OnFailure),
        ("On_Failure", BreakpointMode::OnFailure),
    ] {
        let yaml = format!("command: x\nbreakpoint: {}\n", input);
        let step: PipelineStep = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(step.breakpoint, expected, "input {:?}", input);
    }
}

#[test]
fn breakpoint_mode_rejects_unknown_values() {
    let result: Result<PipelineStep, _> = serde_yaml::from_str("command: x\nbreakpoint: maybe\n");
    assert!(result.is_err());
}
