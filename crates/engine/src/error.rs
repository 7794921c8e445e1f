// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors from running one child command.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The child process could not be spawned
    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The step exceeded its timeout and the process tree was killed
    #[error("Step timed out after {seconds}s")]
    Timeout { seconds: i64 },

    /// External cancellation terminated the process tree
    #[error("Step was cancelled")]
    Cancelled,

    /// IO error on the child's output streams
    #[error("IO error reading child output: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from starting the file watcher.
#[derive(Debug, Error)]
pub enum WatchError {
    /// The platform notification facility refused a registration
    #[error("could not watch {path}: {source}")]
    Register {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    /// No trigger produced a usable registration
    #[error("no watchable triggers (all paths missing or invalid)")]
    NothingToWatch,
}
