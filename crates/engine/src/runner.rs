// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Child-process runner
//!
//! Launches one command through the platform shell, streams stdout and
//! stderr line-by-line to a caller sink, enforces the step timeout and
//! honors external cancellation. Both streams funnel through a single
//! `select!` loop so sink calls never interleave. On Unix the child
//! gets its own process group and timeout/cancel kill the whole tree.

use crate::error::RunnerError;
use pf_core::OutputSource;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;

/// How long to keep draining output after the child exits. Grandchild
/// processes can hold the pipes open past the shell's own exit.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Grace period between SIGTERM and SIGKILL when tearing down a tree.
#[cfg(unix)]
const KILL_GRACE: Duration = Duration::from_secs(2);

/// One command to execute.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// Full command line, handed to the shell verbatim.
    pub command_line: String,
    pub working_dir: PathBuf,
    /// Merged over the inherited environment.
    pub env: BTreeMap<String, String>,
    pub timeout: Duration,
}

/// Run the command, invoking `sink` synchronously for every complete
/// output line (platform line terminators, trailing CR stripped).
///
/// Returns the child exit code; -1 when the platform reports none
/// (signal death).
pub async fn run_command(
    spec: &CommandSpec,
    cancel: &CancellationToken,
    mut sink: impl FnMut(OutputSource, String),
) -> Result<i32, RunnerError> {
    let span = tracing::info_span!(
        "step.cmd",
        command = %spec.command_line,
        exit_code = tracing::field::Empty,
    );
    let _guard = span.enter();

    let mut command = shell_command(&spec.command_line);
    command
        .current_dir(&spec.working_dir)
        .envs(&spec.env)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    // Own process group so a timeout kill takes the whole tree.
    #[cfg(unix)]
    command.process_group(0);

    let mut child = command.spawn().map_err(|source| RunnerError::Spawn {
        command: spec.command_line.clone(),
        source,
    })?;

    let stdout = child.stdout.take().expect("stdout piped");
    let stderr = child.stderr.take().expect("stderr piped");
    let mut out_lines = BufReader::new(stdout).lines();
    let mut err_lines = BufReader::new(stderr).lines();
    let mut out_open = true;
    let mut err_open = true;

    let deadline = tokio::time::sleep(spec.timeout);
    tokio::pin!(deadline);

    let status = loop {
        tokio::select! {
            line = out_lines.next_line(), if out_open => match line {
                Ok(Some(text)) => sink(OutputSource::StdOut, strip_cr(text)),
                _ => out_open = false,
            },
            line = err_lines.next_line(), if err_open => match line {
                Ok(Some(text)) => sink(OutputSource::StdErr, strip_cr(text)),
                _ => err_open = false,
            },
            status = child.wait() => break status?,
            () = &mut deadline => {
                tracing::warn!(timeout_s = spec.timeout.as_secs(), "step timed out, killing process tree");
                kill_tree(&mut child).await;
                return Err(RunnerError::Timeout {
                    seconds: spec.timeout.as_secs() as i64,
                });
            }
            () = cancel.cancelled() => {
                tracing::info!("cancellation signalled, killing process tree");
                kill_tree(&mut child).await;
                return Err(RunnerError::Cancelled);
            }
        }
    };

    // Bounded drain after exit so no trailing lines are lost.
    let drain = async {
        while out_open || err_open {
            tokio::select! {
                line = out_lines.next_line(), if out_open => match line {
                    Ok(Some(text)) => sink(OutputSource::StdOut, strip_cr(text)),
                    _ => out_open = false,
                },
                line = err_lines.next_line(), if err_open => match line {
                    Ok(Some(text)) => sink(OutputSource::StdErr, strip_cr(text)),
                    _ => err_open = false,
                },
            }
        }
    };
    let _ = tokio::time::timeout(DRAIN_TIMEOUT, drain).await;

    let exit_code = status.code().unwrap_or(-1);
    span.record("exit_code", exit_code);
    Ok(exit_code)
}

#[cfg(windows)]
fn shell_command(command_line: &str) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/c", command_line]);
    command
}

#[cfg(not(windows))]
fn shell_command(command_line: &str) -> Command {
    let mut command = Command::new("/bin/bash");
    command.args(["-c", command_line]);
    command
}

/// Terminate the child and everything it spawned.
async fn kill_tree(child: &mut Child) {
    #[cfg(unix)]
    {
        if let Some(pid) = child.id() {
            // SIGTERM the group first, escalate to SIGKILL after the grace.
            unsafe {
                libc::kill(-(pid as i32), libc::SIGTERM);
            }
            tokio::select! {
                _ = child.wait() => return,
                _ = tokio::time::sleep(KILL_GRACE) => {
                    unsafe {
                        libc::kill(-(pid as i32), libc::SIGKILL);
                    }
                }
            }
            let _ = child.wait().await;
            return;
        }
    }
    let _ = child.kill().await;
}

fn strip_cr(line: String) -> String {
    match line.strip_suffix('\r') {
        Some(stripped) => stripped.to_string(),
        None => line,
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
