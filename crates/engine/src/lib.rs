// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pf-engine: Execution engine for PipeForge pipelines
//!
//! Sequences stages and steps strictly in order, streams child-process
//! output, implements the breakpoint protocol through a synchronous
//! observer, gathers artifacts and tracks run status. Also home to the
//! process runner and the debounced file watcher.

pub mod artifacts;
pub mod error;
pub mod events;
pub mod executor;
pub mod runner;
pub mod watcher;

pub use error::{RunnerError, WatchError};
pub use events::{AfterStepEvent, BeforeStepEvent, DebugAction, ExecutionObserver};
pub use executor::PipelineExecutor;
pub use runner::{run_command, CommandSpec};
pub use watcher::{PipelineWatcher, WatchEvent, MIN_TRIGGER_INTERVAL};
