// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Observation events emitted by the executor
//!
//! Handlers are synchronous with respect to the step loop: the engine
//! does not advance until `on_before_step` returns its verdict. A UI
//! that needs asynchronous human input bridges by parking the handler
//! on a single-shot channel completed from the UI thread; the engine
//! itself never runs on a UI event loop.

use pf_core::{OutputLine, PipelineRun, StepResult};

/// Verdict returned by a breakpoint handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebugAction {
    /// Execute the step (or, at a failure gate, accept the failure)
    #[default]
    Continue,
    /// Do not execute the step; record it as skipped
    Skip,
    /// Re-execute a failed step once (pre-execution Retry means Continue)
    Retry,
    /// Cancel the whole run
    Abort,
}

/// Fired before a step executes, and again as a failure gate when a
/// step with `breakpoint: on_failure` fails.
pub struct BeforeStepEvent<'a> {
    pub run: &'a PipelineRun,
    pub step_name: &'a str,
    pub stage_name: &'a str,
    /// 1-based position across all stages.
    pub step_index: usize,
    pub total_steps: usize,
    /// Present only at a failure gate: the result being reconsidered.
    pub failure: Option<&'a StepResult>,
}

/// Fired after a step completes, whatever its status.
pub struct AfterStepEvent<'a> {
    pub run: &'a PipelineRun,
    pub result: &'a StepResult,
    pub step_name: &'a str,
    pub stage_name: &'a str,
    /// 1-based position across all stages.
    pub step_index: usize,
    pub total_steps: usize,
}

/// Collaborator interface for observing a run.
///
/// Callbacks are serialized: `on_output` for a step always lands
/// between that step's before and after events, and no two callbacks
/// overlap.
pub trait ExecutionObserver: Send + Sync {
    /// A captured stdout/stderr line, delivered synchronously.
    fn on_output(&self, _line: &OutputLine) {}

    /// Breakpoint decision point. The run is Paused while this runs.
    fn on_before_step(&self, _event: &BeforeStepEvent<'_>) -> DebugAction {
        DebugAction::Continue
    }

    /// A step finished (Success, Failed or Skipped).
    fn on_after_step(&self, _event: &AfterStepEvent<'_>) {}
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
