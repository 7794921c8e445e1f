// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Console observer
//!
//! Streams captured output to the terminal and answers the engine's
//! breakpoint events by prompting on stdin. The engine blocks on the
//! handler, which is exactly the bridge the breakpoint protocol wants:
//! the human's verdict parks the step loop.

use pf_engine::{AfterStepEvent, BeforeStepEvent, DebugAction, ExecutionObserver};
use pf_core::{OutputLine, OutputSource, StepStatus};
use std::io::{BufRead, Write};

use crate::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

pub struct ConsoleObserver {
    verbosity: Verbosity,
}

impl ConsoleObserver {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    fn prompt(&self, event: &BeforeStepEvent<'_>) -> DebugAction {
        let gate = event.failure.is_some();
        if let Some(failure) = event.failure {
            println!(
                "{}",
                output::err(&format!(
                    "Step '{}' failed: {}",
                    event.step_name,
                    failure.error_summary().unwrap_or_default()
                ))
            );
            let tail = failure.last_stderr(10);
            if !tail.is_empty() {
                println!("{}", output::muted("last stderr:"));
                for line in tail {
                    println!("  {}", output::err(&line.text));
                }
            }
            for hint in &failure.hints {
                println!("{} {}", output::warn("hint:"), hint);
            }
        } else {
            println!(
                "{}",
                output::header(&format!(
                    "Breakpoint: step {}/{} '{}' (stage {})",
                    event.step_index, event.total_steps, event.step_name, event.stage_name
                ))
            );
        }

        let options = if gate {
            "[c]ontinue / [s]kip / [r]etry / [a]bort"
        } else {
            "[c]ontinue / [s]kip / [a]bort"
        };

        loop {
            print!("{} > ", options);
            let _ = std::io::stdout().flush();

            let mut answer = String::new();
            if std::io::stdin().lock().read_line(&mut answer).is_err() {
                return DebugAction::Continue;
            }
            match answer.trim().to_ascii_lowercase().as_str() {
                "" | "c" | "continue" => return DebugAction::Continue,
                "s" | "skip" => return DebugAction::Skip,
                "r" | "retry" if gate => return DebugAction::Retry,
                "a" | "abort" => return DebugAction::Abort,
                other => println!("{}", output::muted(&format!("unrecognized: {}", other))),
            }
        }
    }
}

impl ExecutionObserver for ConsoleObserver {
    fn on_output(&self, line: &OutputLine) {
        match line.source {
            OutputSource::StdErr => eprintln!("{}", output::err(&line.text)),
            OutputSource::StdOut => {
                if self.verbosity != Verbosity::Quiet {
                    println!("{}", line.text);
                }
            }
        }
    }

    fn on_before_step(&self, event: &BeforeStepEvent<'_>) -> DebugAction {
        self.prompt(event)
    }

    fn on_after_step(&self, event: &AfterStepEvent<'_>) {
        if self.verbosity == Verbosity::Quiet && event.result.status != StepStatus::Failed {
            return;
        }
        let label = match event.result.status {
            StepStatus::Success => output::ok("done"),
            StepStatus::Failed => output::err("failed"),
            StepStatus::Skipped => output::warn("skipped"),
            _ => output::muted("..."),
        };
        println!(
            "{} {} ({}/{})",
            label,
            event.step_name,
            event.step_index,
            event.total_steps
        );
    }
}

/// Verbose wins when both flags are set.
pub fn verbosity(verbose: bool, quiet: bool) -> Verbosity {
    if verbose {
        Verbosity::Verbose
    } else if quiet {
        Verbosity::Quiet
    } else {
        Verbosity::Normal
    }
}
