// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pipeforge validate` - static checks; exit 0 iff no errors

use crate::output;
use pf_core::validator::{self, Severity};
use std::path::Path;

pub fn handle(file: &Path) -> i32 {
    let report = validator::validate_file(file);

    for message in &report.messages {
        match message.severity {
            Severity::Error => eprintln!("{}", output::err(&message.to_string())),
            Severity::Warning => eprintln!("{}", output::warn(&message.to_string())),
        }
    }

    if report.has_errors() {
        eprintln!(
            "{}",
            output::err(&format!(
                "{} error(s), {} warning(s)",
                report.errors().count(),
                report.warnings().count()
            ))
        );
        1
    } else {
        println!(
            "{}",
            output::ok(&format!(
                "Valid ({} warning(s))",
                report.warnings().count()
            ))
        );
        0
    }
}
