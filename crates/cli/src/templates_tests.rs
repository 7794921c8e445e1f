// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use pf_core::loader::{parse_pipeline, serialize_pipeline};
use pf_core::validator::validate;

#[test]
fn all_templates_parse() {
    for template in TEMPLATES {
        let parsed = parse_pipeline(template.content);
        assert!(parsed.is_ok(), "template {} failed to parse", template.name);
    }
}

#[test]
fn all_templates_validate_without_errors() {
    for template in TEMPLATES {
        let definition = parse_pipeline(template.content).unwrap();
        let report = validate(&definition);
        assert!(
            !report.has_errors(),
            "template {}: {}",
            template.name,
            report
        );
    }
}

#[test]
fn roundtrip_preserves_name_stages_and_variables() {
    for template in TEMPLATES {
        let original = parse_pipeline(template.content).unwrap();
        let serialized = serialize_pipeline(&original).unwrap();
        let reparsed = parse_pipeline(&serialized).unwrap();

        assert_eq!(reparsed.name, original.name, "template {}", template.name);
        assert_eq!(
            reparsed.stages.len(),
            original.stages.len(),
            "template {}",
            template.name
        );
        assert_eq!(
            reparsed.variables.len(),
            original.variables.len(),
            "template {}",
            template.name
        );
    }
}

#[test]
fn find_resolves_every_listed_name() {
    for name in ["innosetup", "dotnet", "security", "twincat", "custom"] {
        assert!(find(name).is_some(), "missing template {}", name);
    }
    assert!(find("nope").is_none());
}

#[test]
fn template_names_are_unique() {
    let mut names: Vec<&str> = TEMPLATES.iter().map(|t| t.name).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), TEMPLATES.len());
}
