// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The execution engine
//!
//! Drives one pipeline run: strictly sequential stages and steps,
//! breakpoint decisions through the observer, `${VAR}` resolution,
//! artifact gathering and run-status tracking. The engine owns the
//! `PipelineRun` while executing and returns it fully populated.

use crate::artifacts;
use crate::error::RunnerError;
use crate::events::{AfterStepEvent, BeforeStepEvent, DebugAction, ExecutionObserver};
use crate::runner::{self, CommandSpec};
use pf_core::{
    hints, paths, vars, BreakpointMode, Clock, OutputLine, OutputSource, PipelineDefinition,
    PipelineRun, PipelineStage, PipelineStep, RunIds, RunStatus, StepResult, StepStatus,
    SystemClock,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Why the stage loop stopped early.
enum Stop {
    Cancelled,
    Failed,
}

/// Executes pipeline definitions.
pub struct PipelineExecutor<C: Clock = SystemClock> {
    clock: C,
    ids: RunIds,
    observer: Option<Arc<dyn ExecutionObserver>>,
}

impl PipelineExecutor {
    pub fn new() -> Self {
        Self::with_parts(SystemClock, RunIds::timestamped())
    }
}

impl Default for PipelineExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> PipelineExecutor<C> {
    /// Create an executor over an explicit clock and run-id scheme.
    pub fn with_parts(clock: C, ids: RunIds) -> Self {
        Self {
            clock,
            ids,
            observer: None,
        }
    }

    /// Attach the observer receiving output, before- and after-step
    /// events. Handlers run synchronously on the engine's step loop.
    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Execute the pipeline and return the populated run.
    pub async fn execute(
        &self,
        definition: &PipelineDefinition,
        interactive: bool,
        cancel: &CancellationToken,
    ) -> PipelineRun {
        self.execute_with_trigger(definition, interactive, None, cancel)
            .await
    }

    /// Execute, recording why the run started (e.g. a watch trigger).
    pub async fn execute_with_trigger(
        &self,
        definition: &PipelineDefinition,
        interactive: bool,
        trigger: Option<String>,
        cancel: &CancellationToken,
    ) -> PipelineRun {
        let started_at = self.clock.now();
        let mut run = PipelineRun::new(
            self.ids.mint(started_at),
            definition.name.clone(),
            started_at,
        );
        run.trigger = trigger;
        run.status = RunStatus::Running;
        run.variables = definition.variables.clone();

        let work_dir = paths::normalize(
            definition.working_directory.as_deref().unwrap_or("."),
            None,
        );
        run.variables
            .insert("PIPEFORGE_WORK_DIR".to_string(), work_dir.clone());
        run.variables
            .insert("PIPEFORGE_RUN_ID".to_string(), run.id.clone());
        run.variables
            .insert("PIPEFORGE_PIPELINE".to_string(), run.pipeline_name.clone());

        let span = tracing::info_span!("run", id = %run.id, pipeline = %run.pipeline_name);
        let _guard = span.enter();
        tracing::info!(interactive, work_dir = %work_dir, "run starting");

        let outcome = self
            .run_stages(definition, &mut run, interactive, &work_dir, cancel)
            .await;

        let now = self.clock.now();
        match outcome {
            Ok(()) => {
                let status = if run.has_failures() {
                    RunStatus::Failed
                } else {
                    RunStatus::Success
                };
                run.finish(status, now);
            }
            Err(Stop::Cancelled) => run.finish(RunStatus::Cancelled, now),
            Err(Stop::Failed) => run.finish(RunStatus::Failed, now),
        }

        tracing::info!(
            status = ?run.status,
            steps = run.step_results.len(),
            failed = run.failed_count(),
            "run finished"
        );
        run
    }

    async fn run_stages(
        &self,
        definition: &PipelineDefinition,
        run: &mut PipelineRun,
        interactive: bool,
        work_dir: &str,
        cancel: &CancellationToken,
    ) -> Result<(), Stop> {
        let total_steps = definition.total_steps();
        let mut step_index = 0usize;

        for stage in &definition.stages {
            if !stage_should_run(stage, run, work_dir) {
                tracing::info!(stage = %stage.name, "stage condition not met, skipping");
                step_index += stage.steps.len();
                continue;
            }

            for step in &stage.steps {
                step_index += 1;

                if cancel.is_cancelled() {
                    return Err(Stop::Cancelled);
                }

                if let Some(reason) = step_skip_reason(step, run) {
                    tracing::info!(step = %step.name, %reason, "step condition not met, skipping");
                    run.step_results
                        .push(StepResult::skipped(&step.name, &stage.name, self.clock.now()));
                    self.fire_after_step(run, run.step_results.len() - 1, step_index, total_steps);
                    continue;
                }

                // Breakpoint decision: pre-execution observation point.
                let mut action = if interactive || step.breakpoint == BreakpointMode::Always {
                    self.breakpoint_decision(run, step, stage, step_index, total_steps, None)
                } else {
                    DebugAction::Continue
                };
                if action == DebugAction::Retry {
                    // Retry has no meaning before the first execution.
                    action = DebugAction::Continue;
                }

                match action {
                    DebugAction::Skip => {
                        run.step_results.push(StepResult::skipped(
                            &step.name,
                            &stage.name,
                            self.clock.now(),
                        ));
                        self.fire_after_step(
                            run,
                            run.step_results.len() - 1,
                            step_index,
                            total_steps,
                        );
                        continue;
                    }
                    DebugAction::Abort => return Err(Stop::Cancelled),
                    DebugAction::Continue | DebugAction::Retry => {}
                }

                let idx = run.step_results.len();
                self.execute_step(run, stage, step, idx, work_dir, cancel)
                    .await?;
                self.fire_after_step(run, idx, step_index, total_steps);

                let failed = run.step_results[idx].status == StepStatus::Failed;
                if !failed || step.allow_failure {
                    continue;
                }

                if step.breakpoint == BreakpointMode::OnFailure {
                    // Failure gate: a second observation for this step.
                    let action = self.breakpoint_decision(
                        run,
                        step,
                        stage,
                        step_index,
                        total_steps,
                        Some(idx),
                    );
                    match action {
                        DebugAction::Retry => {
                            self.execute_step(run, stage, step, idx, work_dir, cancel)
                                .await?;
                            self.fire_after_step(run, idx, step_index, total_steps);
                            if run.step_results[idx].status == StepStatus::Failed
                                && !stage.continue_on_error
                            {
                                return Err(Stop::Failed);
                            }
                            continue;
                        }
                        DebugAction::Skip => continue,
                        DebugAction::Abort => return Err(Stop::Cancelled),
                        DebugAction::Continue => {
                            if !stage.continue_on_error {
                                return Err(Stop::Failed);
                            }
                        }
                    }
                } else if !stage.continue_on_error {
                    return Err(Stop::Failed);
                }
            }
        }

        Ok(())
    }

    /// Execute one step into `run.step_results[idx]`, appending a fresh
    /// result or overwriting the slot on retry. Only cancellation stops
    /// the loop here; failures are recorded on the result.
    async fn execute_step(
        &self,
        run: &mut PipelineRun,
        stage: &PipelineStage,
        step: &PipelineStep,
        idx: usize,
        work_dir: &str,
        cancel: &CancellationToken,
    ) -> Result<(), Stop> {
        let command_line = vars::resolve(&step.command_line(), &run.variables);
        let step_work_dir = match &step.working_directory {
            Some(dir) => paths::normalize(
                &vars::resolve(dir, &run.variables),
                Some(Path::new(work_dir)),
            ),
            None => work_dir.to_string(),
        };

        let mut env: BTreeMap<String, String> = run.variables.clone();
        for (key, value) in &step.environment {
            env.insert(key.clone(), vars::resolve(value, &run.variables));
        }

        let mut result = StepResult::new(&step.name, &stage.name, &command_line, self.clock.now());
        result.environment = env.clone();
        // Visible to observers as soon as it starts running.
        if idx == run.step_results.len() {
            run.step_results.push(result);
        } else {
            run.step_results[idx] = result;
        }

        let spec = CommandSpec {
            command_line,
            working_dir: PathBuf::from(&step_work_dir),
            env,
            timeout: Duration::from_secs(step.timeout_seconds.max(1) as u64),
        };

        let outcome = {
            let observer = self.observer.clone();
            let clock = self.clock.clone();
            let result = &mut run.step_results[idx];
            runner::run_command(&spec, cancel, |source, text| {
                let line = OutputLine {
                    timestamp: clock.now(),
                    text,
                    source,
                };
                match source {
                    OutputSource::StdOut => result.stdout.push(line.clone()),
                    OutputSource::StdErr => result.stderr.push(line.clone()),
                }
                if let Some(observer) = &observer {
                    observer.on_output(&line);
                }
            })
            .await
        };

        let now = self.clock.now();
        let mut cancelled = false;
        {
            let result = &mut run.step_results[idx];
            match outcome {
                Ok(0) => {
                    result.exit_code = 0;
                    result.status = StepStatus::Success;
                }
                Ok(code) => {
                    result.exit_code = code;
                    result.status = StepStatus::Failed;
                    result.error_message = Some(format!("Process exited with code {}", code));
                }
                Err(RunnerError::Cancelled) => {
                    result.status = StepStatus::Failed;
                    result.error_message = Some(RunnerError::Cancelled.to_string());
                    cancelled = true;
                }
                Err(e) => {
                    result.status = StepStatus::Failed;
                    result.error_message = Some(e.to_string());
                }
            }
            result.completed_at = Some(now);
        }

        // Artifacts are gathered whatever the status.
        for pattern in &step.artifacts {
            let resolved = vars::resolve(pattern, &run.variables);
            for artifact in
                artifacts::collect(&resolved, Path::new(&step_work_dir), &step.name, now)
            {
                run.step_results[idx].artifact_paths.push(artifact.path.clone());
                run.artifacts.push(artifact);
            }
        }

        if run.step_results[idx].status == StepStatus::Failed {
            run.step_results[idx].hints = hints::suggest(&run.step_results[idx]);
        }

        if cancelled {
            return Err(Stop::Cancelled);
        }
        Ok(())
    }

    /// Pause the run, ask the observer for a verdict, resume.
    fn breakpoint_decision(
        &self,
        run: &mut PipelineRun,
        step: &PipelineStep,
        stage: &PipelineStage,
        step_index: usize,
        total_steps: usize,
        failure_idx: Option<usize>,
    ) -> DebugAction {
        let Some(observer) = &self.observer else {
            return DebugAction::Continue;
        };

        run.status = RunStatus::Paused;
        let action = {
            let run_view: &PipelineRun = run;
            let event = BeforeStepEvent {
                run: run_view,
                step_name: &step.name,
                stage_name: &stage.name,
                step_index,
                total_steps,
                failure: failure_idx.map(|i| &run_view.step_results[i]),
            };
            observer.on_before_step(&event)
        };
        run.status = RunStatus::Running;

        tracing::debug!(step = %step.name, ?action, "breakpoint verdict");
        action
    }

    fn fire_after_step(
        &self,
        run: &PipelineRun,
        idx: usize,
        step_index: usize,
        total_steps: usize,
    ) {
        if let Some(observer) = &self.observer {
            let result = &run.step_results[idx];
            let event = AfterStepEvent {
                run,
                result,
                step_name: &result.step_name,
                stage_name: &result.stage_name,
                step_index,
                total_steps,
            };
            observer.on_after_step(&event);
        }
    }
}

/// Evaluate a stage condition against the run variables.
fn stage_should_run(stage: &PipelineStage, run: &PipelineRun, work_dir: &str) -> bool {
    let Some(condition) = &stage.condition else {
        return true;
    };

    for file in &condition.files_exist {
        let resolved = vars::resolve(file, &run.variables);
        let path = paths::normalize(&resolved, Some(Path::new(work_dir)));
        if !Path::new(&path).exists() {
            return false;
        }
    }
    if let Some(var) = &condition.only_if {
        if !var_truthy(run, var) {
            return false;
        }
    }
    if let Some(var) = &condition.not_if {
        if var_truthy(run, var) {
            return false;
        }
    }
    true
}

/// The reason a step's condition keeps it from running, if any.
fn step_skip_reason(step: &PipelineStep, run: &PipelineRun) -> Option<String> {
    let condition = step.condition.as_ref()?;

    if let Some(var) = &condition.only_if {
        if !var_truthy(run, var) {
            return Some(format!("only_if variable '{}' is not truthy", var));
        }
    }
    if let Some(var) = &condition.not_if {
        if var_truthy(run, var) {
            return Some(format!("not_if variable '{}' is truthy", var));
        }
    }
    if let Some(required) = condition.requires_exit_code {
        let last = run.last_completed_step().map(|r| r.exit_code);
        if last != Some(required) {
            return Some(format!(
                "requires previous exit code {} (got {:?})",
                required, last
            ));
        }
    }
    None
}

fn var_truthy(run: &PipelineRun, name: &str) -> bool {
    run.variables
        .get(name)
        .map(|v| vars::is_truthy(v))
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
