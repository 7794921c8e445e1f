// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run-side state: one `PipelineRun` per execution
//!
//! The engine owns the run exclusively while executing and returns it
//! to the caller at completion; observers see read-only snapshots
//! through event payloads. Step results are appended in execution order
//! and never removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

/// How an engine mints run identifiers.
pub enum RunIds {
    /// `run-<UTC stamp>-<hex nonce>`: unique, and sorts by start time
    /// so run directories and logs line up chronologically.
    Timestamped,
    /// `<prefix>-1`, `<prefix>-2`, ...: deterministic, for tests.
    Counter { prefix: String, next: AtomicU64 },
}

impl RunIds {
    pub fn timestamped() -> Self {
        RunIds::Timestamped
    }

    pub fn counter(prefix: impl Into<String>) -> Self {
        RunIds::Counter {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }

    /// Mint the identifier for a run starting at `at`.
    pub fn mint(&self, at: DateTime<Utc>) -> String {
        match self {
            RunIds::Timestamped => {
                let nonce = uuid::Uuid::new_v4().simple().to_string();
                format!("run-{}-{}", at.format("%Y%m%d-%H%M%S"), &nonce[..6])
            }
            RunIds::Counter { prefix, next } => {
                format!("{}-{}", prefix, next.fetch_add(1, Ordering::SeqCst))
            }
        }
    }
}

/// Lifecycle of a whole run.
///
/// Pending → Running → (Paused ↔ Running)* → Success | Failed | Cancelled.
/// Paused is transient and only observable from inside a breakpoint
/// handler; terminal statuses are write-once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Pending,
    Running,
    Paused,
    Success,
    Failed,
    Cancelled,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Success | RunStatus::Failed | RunStatus::Cancelled
        )
    }
}

/// Lifecycle of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    Pending,
    Skipped,
    Running,
    Success,
    Failed,
}

/// Which stream a captured line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputSource {
    StdOut,
    StdErr,
}

/// One captured line of child-process output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputLine {
    pub timestamp: DateTime<Utc>,
    pub text: String,
    pub source: OutputSource,
}

/// A file matched by a step's artifact patterns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactInfo {
    pub path: PathBuf,
    pub step_name: String,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}

/// The record of one step's execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub step_name: String,
    pub stage_name: String,
    /// Command line after variable resolution, as handed to the shell.
    pub command: String,
    pub status: StepStatus,
    /// -1 until the child process completes.
    pub exit_code: i32,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub stdout: Vec<OutputLine>,
    pub stderr: Vec<OutputLine>,
    /// Environment additions that were active for the child.
    pub environment: BTreeMap<String, String>,
    pub artifact_paths: Vec<PathBuf>,
    pub error_message: Option<String>,
    pub hints: Vec<String>,
}

impl StepResult {
    pub fn new(
        step_name: impl Into<String>,
        stage_name: impl Into<String>,
        command: impl Into<String>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            step_name: step_name.into(),
            stage_name: stage_name.into(),
            command: command.into(),
            status: StepStatus::Running,
            exit_code: -1,
            started_at,
            completed_at: None,
            stdout: Vec::new(),
            stderr: Vec::new(),
            environment: BTreeMap::new(),
            artifact_paths: Vec::new(),
            error_message: None,
            hints: Vec::new(),
        }
    }

    /// A result for a step that never executed.
    pub fn skipped(
        step_name: impl Into<String>,
        stage_name: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            status: StepStatus::Skipped,
            completed_at: Some(at),
            ..Self::new(step_name, stage_name, "", at)
        }
    }

    /// Both streams merged chronologically.
    pub fn combined_output(&self) -> Vec<OutputLine> {
        let mut lines: Vec<OutputLine> = self
            .stdout
            .iter()
            .chain(self.stderr.iter())
            .cloned()
            .collect();
        lines.sort_by_key(|l| l.timestamp);
        lines
    }

    /// The last `n` stderr lines, oldest first.
    pub fn last_stderr(&self, n: usize) -> Vec<&OutputLine> {
        let skip = self.stderr.len().saturating_sub(n);
        self.stderr.iter().skip(skip).collect()
    }

    /// A non-empty summary, present only when the step failed.
    pub fn error_summary(&self) -> Option<String> {
        if self.status != StepStatus::Failed {
            return None;
        }
        Some(match &self.error_message {
            Some(msg) if !msg.is_empty() => msg.clone(),
            _ => format!("Process exited with code {}", self.exit_code),
        })
    }
}

/// One execution of a pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRun {
    pub id: String,
    pub pipeline_name: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub status: RunStatus,
    /// Why this run started (e.g. a watch-trigger path), if not manual.
    pub trigger: Option<String>,
    pub variables: BTreeMap<String, String>,
    pub step_results: Vec<StepResult>,
    pub artifacts: Vec<ArtifactInfo>,
}

impl PipelineRun {
    pub fn new(
        id: impl Into<String>,
        pipeline_name: impl Into<String>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            pipeline_name: pipeline_name.into(),
            started_at,
            completed_at: None,
            status: RunStatus::Pending,
            trigger: None,
            variables: BTreeMap::new(),
            step_results: Vec::new(),
            artifacts: Vec::new(),
        }
    }

    /// Wall-clock duration: completion − start, or elapsed so far.
    pub fn elapsed(&self) -> chrono::Duration {
        self.completed_at.unwrap_or_else(Utc::now) - self.started_at
    }

    pub fn last_running_step(&self) -> Option<&StepResult> {
        self.step_results
            .iter()
            .rev()
            .find(|r| r.status == StepStatus::Running)
    }

    pub fn last_completed_step(&self) -> Option<&StepResult> {
        self.step_results
            .iter()
            .rev()
            .find(|r| matches!(r.status, StepStatus::Success | StepStatus::Failed))
    }

    pub fn success_count(&self) -> usize {
        self.count(StepStatus::Success)
    }

    pub fn failed_count(&self) -> usize {
        self.count(StepStatus::Failed)
    }

    pub fn skipped_count(&self) -> usize {
        self.count(StepStatus::Skipped)
    }

    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }

    /// Transition into a terminal status, stamping the completion time.
    pub fn finish(&mut self, status: RunStatus, at: DateTime<Utc>) {
        debug_assert!(status.is_terminal());
        self.status = status;
        self.completed_at = Some(at);
    }

    fn count(&self, status: StepStatus) -> usize {
        self.step_results
            .iter()
            .filter(|r| r.status == status)
            .count()
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
