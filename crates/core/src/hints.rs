// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Post-mortem hints for failed steps
//!
//! Scans a failed step's stderr and error message against an ordered
//! catalog of patterns and produces actionable suggestions. The catalog
//! is data; patterns are case-insensitive.

use crate::run::{StepResult, StepStatus};
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

struct HintRule {
    pattern: &'static str,
    hint: &'static str,
}

const RULES: &[HintRule] = &[
    HintRule {
        pattern: r"is not recognized as an (internal or external )?command",
        hint: "The command was not found. Check that the tool is installed and on PATH, or use a full path in `command`.",
    },
    HintRule {
        pattern: r"command not found",
        hint: "The command was not found. Check that the tool is installed and on PATH, or use a full path in `command`.",
    },
    HintRule {
        pattern: r"no such file or directory",
        hint: "A file or directory this step references does not exist. Check the command, arguments and working_directory.",
    },
    HintRule {
        pattern: r"access is denied",
        hint: "Access was denied. Run from an elevated prompt or check permissions on the files this step touches.",
    },
    HintRule {
        pattern: r"permission denied",
        hint: "Permission denied. Check file modes (is the script executable?) and ownership for the files this step touches.",
    },
    HintRule {
        pattern: r"(\.NET SDK[^\n]*not (be )?(found|installed))|no \.NET SDKs were found",
        hint: "The .NET SDK was not found. Install it from https://dotnet.microsoft.com/download or check DOTNET_ROOT.",
    },
    HintRule {
        pattern: r"error NU\d+",
        hint: "NuGet restore failed. Run `dotnet restore` by hand and check your package sources and network.",
    },
    HintRule {
        pattern: r"error (CS|MSB)\d+",
        hint: "The build failed with compiler or MSBuild errors. Fix the first error shown; later ones are often cascades.",
    },
    HintRule {
        pattern: r"(inno setup|iscc)[^\n]*(error|fail)",
        hint: "Inno Setup compilation failed. Check the script's [Setup] section and that Inno Setup 6 is installed.",
    },
    HintRule {
        pattern: r"timed out after",
        hint: "The step exceeded its timeout. Raise `timeout_seconds` or split the work into smaller steps.",
    },
    HintRule {
        pattern: r"exited with code 1\b",
        hint: "Exit code 1 is a generic failure. Read the step's output above for the first real error line.",
    },
];

#[allow(clippy::expect_used)]
static COMPILED: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|rule| {
            let regex = RegexBuilder::new(rule.pattern)
                .case_insensitive(true)
                .build()
                .expect("constant hint pattern is valid");
            (regex, rule.hint)
        })
        .collect()
});

/// Suggestions for a failed step; non-failed steps produce none.
///
/// Duplicate hint texts are collapsed, preserving catalog order.
pub fn suggest(result: &StepResult) -> Vec<String> {
    if result.status != StepStatus::Failed {
        return Vec::new();
    }

    let mut haystack: String = result
        .stderr
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    if let Some(message) = &result.error_message {
        haystack.push('\n');
        haystack.push_str(message);
    }

    let mut hints: Vec<String> = Vec::new();
    for (regex, hint) in COMPILED.iter() {
        if regex.is_match(&haystack) && !hints.iter().any(|h| h == hint) {
            hints.push(hint.to_string());
        }
    }
    hints
}

#[cfg(test)]
#[path = "hints_tests.rs"]
mod tests;
