// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `${KEY}` variable substitution
//!
//! Plain textual replacement against the run variables. Unknown
//! references are left literal so shells can still see their own
//! `${…}` syntax where a pipeline never declared the name.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Variables injected by the engine at run start.
pub const BUILTIN_VARS: &[&str] = &[
    "PIPEFORGE_WORK_DIR",
    "PIPEFORGE_RUN_ID",
    "PIPEFORGE_PIPELINE",
];

#[allow(clippy::expect_used)]
static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("constant regex pattern is valid")
});

/// Replace every `${KEY}` occurrence with its value from `vars`.
///
/// Unknown references are left as-is.
pub fn resolve(template: &str, vars: &BTreeMap<String, String>) -> String {
    VAR_PATTERN
        .replace_all(template, |caps: &regex::Captures| {
            let key = &caps[1];
            vars.get(key)
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .to_string()
}

/// All `${KEY}` names referenced by a template, in order of appearance.
pub fn references(template: &str) -> Vec<String> {
    VAR_PATTERN
        .captures_iter(template)
        .map(|c| c[1].to_string())
        .collect()
}

/// Whether `name` is one of the engine-injected variables.
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_VARS.contains(&name)
}

/// Condition truthiness: non-empty and not "false"/"0".
pub fn is_truthy(value: &str) -> bool {
    let v = value.trim();
    !v.is_empty() && !v.eq_ignore_ascii_case("false") && v != "0"
}

#[cfg(test)]
#[path = "vars_tests.rs"]
mod tests;
