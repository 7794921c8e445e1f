// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Artifact collection
//!
//! After a step completes its glob patterns are matched against the
//! filesystem. Patterns support `*` and `**`; nonexistent directories
//! simply yield no artifacts.

use chrono::{DateTime, Utc};
use pf_core::ArtifactInfo;
use std::path::Path;

/// Collect every file matching `pattern`, resolved relative to
/// `base_dir` unless already absolute.
pub fn collect(pattern: &str, base_dir: &Path, step_name: &str, now: DateTime<Utc>) -> Vec<ArtifactInfo> {
    let full_pattern = if Path::new(pattern).is_absolute() {
        pattern.to_string()
    } else {
        base_dir.join(pattern).display().to_string()
    };

    let paths = match glob::glob(&full_pattern) {
        Ok(paths) => paths,
        Err(e) => {
            tracing::warn!(pattern = %full_pattern, error = %e, "invalid artifact pattern");
            return Vec::new();
        }
    };

    let mut artifacts = Vec::new();
    for entry in paths {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!(error = %e, "unreadable path while globbing artifacts");
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }
        let size_bytes = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        artifacts.push(ArtifactInfo {
            path,
            step_name: step_name.to_string(),
            size_bytes,
            created_at: now,
        });
    }
    artifacts
}

#[cfg(test)]
#[path = "artifacts_tests.rs"]
mod tests;
