// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path normalization
//!
//! Home-dir expansion, separator normalization and lexical
//! relative-to-absolute resolution. Resolution is purely textual so
//! paths that do not exist yet still normalize.

use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

#[cfg(windows)]
const ALT_SEPARATOR: char = '/';
#[cfg(not(windows))]
const ALT_SEPARATOR: char = '\\';

/// Fully normalize a path string.
///
/// `~` / `~/…` expand to the user's home directory; the alternate
/// separator is replaced with the platform one; relative paths are
/// joined to `base` (current directory when `None`); `.` and `..`
/// segments are resolved lexically. Empty or whitespace-only input is
/// returned unchanged.
pub fn normalize(input: &str, base: Option<&Path>) -> String {
    if input.trim().is_empty() {
        return input.to_string();
    }

    let mut path = expand_home(input);
    path = path.replace(ALT_SEPARATOR, &MAIN_SEPARATOR.to_string());

    let mut buf = PathBuf::from(&path);
    if buf.is_relative() {
        let base = match base {
            Some(b) => b.to_path_buf(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };
        buf = base.join(buf);
    }

    resolve_dots(&buf).display().to_string()
}

/// Replace the alternate separator only, leaving the path relative.
///
/// `None` passes through.
pub fn normalize_separators(input: Option<&str>) -> Option<String> {
    input.map(|p| p.replace(ALT_SEPARATOR, &MAIN_SEPARATOR.to_string()))
}

fn expand_home(input: &str) -> String {
    let home = || {
        dirs::home_dir()
            .map(|h| h.display().to_string())
            .unwrap_or_else(|| "~".to_string())
    };

    if input == "~" {
        return home();
    }
    if let Some(rest) = input.strip_prefix("~/").or_else(|| input.strip_prefix("~\\")) {
        return format!("{}{}{}", home(), MAIN_SEPARATOR, rest);
    }
    input.to_string()
}

/// Resolve `.` and `..` components without touching the filesystem.
fn resolve_dots(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Never pop past the root.
                if !matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
