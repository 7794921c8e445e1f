// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::pipeline::{BreakpointMode, PipelineStage, PipelineStep};

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn parse_minimal_pipeline() {
    let yaml = r#"
version: 1
name: Demo
stages:
  - name: build
    steps:
      - name: Echo
        command: echo
        arguments: hi
"#;

    let definition = parse_pipeline(yaml).unwrap();
    assert_eq!(definition.version, 1);
    assert_eq!(definition.name, "Demo");
    assert_eq!(definition.stages.len(), 1);

    let stage = &definition.stages[0];
    assert_eq!(stage.name, "build");
    assert_eq!(stage.steps[0].name, "Echo");
    assert_eq!(stage.steps[0].command, "echo");
    assert_eq!(stage.steps[0].arguments.as_deref(), Some("hi"));
}

#[test]
fn parse_empty_document_yields_defaults() {
    let definition = parse_pipeline("{}").unwrap();
    assert_eq!(definition.version, 0);
    assert_eq!(definition.name, "Unnamed Pipeline");
    assert!(definition.stages.is_empty());
    assert!(definition.variables.is_empty());
}

#[test]
fn parse_full_step_fields() {
    let yaml = r#"
name: Full
variables:
  OUT: dist
stages:
  - name: package
    continue_on_error: true
    condition:
      only_if: RELEASE
      files_exist:
        - Cargo.toml
    steps:
      - name: Build
        description: Compile everything
        command: make
        arguments: all
        working_directory: src
        environment:
          RUSTFLAGS: -Dwarnings
        timeout_seconds: 60
        allow_failure: true
        artifacts:
          - ${OUT}/*.tar.gz
        breakpoint: on_failure
        condition:
          requires_exit_code: 0
"#;

    let definition = parse_pipeline(yaml).unwrap();
    let step = &definition.stages[0].steps[0];

    assert_eq!(step.description.as_deref(), Some("Compile everything"));
    assert_eq!(step.working_directory.as_deref(), Some("src"));
    assert_eq!(step.environment.get("RUSTFLAGS").unwrap(), "-Dwarnings");
    assert_eq!(step.timeout_seconds, 60);
    assert!(step.allow_failure);
    assert_eq!(step.artifacts, vec!["${OUT}/*.tar.gz"]);
    assert_eq!(step.breakpoint, BreakpointMode::OnFailure);
    assert_eq!(
        step.condition.as_ref().unwrap().requires_exit_code,
        Some(0)
    );

    let stage = &definition.stages[0];
    assert!(stage.continue_on_error);
    let condition = stage.condition.as_ref().unwrap();
    assert_eq!(condition.only_if.as_deref(), Some("RELEASE"));
    assert_eq!(condition.files_exist, vec!["Cargo.toml"]);
}

#[test]
fn parse_watch_triggers() {
    let yaml = r#"
name: W
watch:
  - path: ./src
    filter: "*.rs"
    include_subdirectories: true
    debounce_ms: 250
    stage: build
"#;

    let definition = parse_pipeline(yaml).unwrap();
    let trigger = &definition.watch[0];
    assert_eq!(trigger.path, "./src");
    assert_eq!(trigger.filter, "*.rs");
    assert!(trigger.include_subdirectories);
    assert_eq!(trigger.debounce_ms, 250);
    assert_eq!(trigger.stage.as_deref(), Some("build"));
}

#[test]
fn unknown_keys_are_ignored() {
    let yaml = r#"
name: Lenient
future_field: whatever
stages:
  - name: s
    mystery: 42
    steps:
      - name: a
        command: "true"
        shiny_new_option: yes
"#;

    let definition = parse_pipeline(yaml).unwrap();
    assert_eq!(definition.name, "Lenient");
    assert_eq!(definition.stages[0].steps[0].command, "true");
}

#[test]
fn parse_error_surfaces_yaml_message() {
    let err = parse_pipeline("stages: [unclosed").unwrap_err();
    assert!(!err.to_string().is_empty());
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
fn serialization_omits_defaults() {
    let mut definition = PipelineDefinition::new("Tiny");
    definition.stages.push(PipelineStage {
        name: "build".into(),
        steps: vec![PipelineStep {
            name: "Echo".into(),
            command: "echo".into(),
            arguments: Some("hi".into()),
            ..PipelineStep::default()
        }],
        ..PipelineStage::default()
    });

    let yaml = serialize_pipeline(&definition).unwrap();
    assert!(!yaml.contains("timeout_seconds"));
    assert!(!yaml.contains("allow_failure"));
    assert!(!yaml.contains("breakpoint"));
    assert!(!yaml.contains("continue_on_error"));
    assert!(!yaml.contains("watch"));
    assert!(!yaml.contains("description"));
}

#[test]
fn roundtrip_preserves_structure() {
    let yaml = r#"
version: 1
name: Round
variables:
  A: "1"
  B: "2"
stages:
  - name: one
    steps:
      - name: a
        command: echo
  - name: two
    steps:
      - name: b
        command: echo
        timeout_seconds: 10
"#;

    let first = parse_pipeline(yaml).unwrap();
    let serialized = serialize_pipeline(&first).unwrap();
    let second = parse_pipeline(&serialized).unwrap();

    assert_eq!(second.name, first.name);
    assert_eq!(second.stages.len(), first.stages.len());
    assert_eq!(second.variables.len(), first.variables.len());
    assert_eq!(second.stages[1].steps[0].timeout_seconds, 10);
}

// ============================================================================
// File entry points
// ============================================================================

#[test]
fn file_not_found_is_distinct() {
    let err = parse_pipeline_file(Path::new("/definitely/not/here.yml")).unwrap_err();
    assert!(matches!(err, LoadError::NotFound { .. }));
}

#[test]
fn write_then_parse_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("p.yml");

    let definition = PipelineDefinition::new("OnDisk");
    write_pipeline_file(&path, &definition).unwrap();

    let loaded = parse_pipeline_file(&path).unwrap();
    assert_eq!(loaded.name, "OnDisk");
}
