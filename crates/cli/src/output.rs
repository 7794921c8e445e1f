// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Console color helpers and the run summary

use pf_core::{ArtifactInfo, PipelineRun, RunStatus, StepStatus};
use std::io::IsTerminal;

pub mod codes {
    /// Section headers: pastel cyan / steel blue
    pub const HEADER: u8 = 74;
    /// Success: soft green
    pub const OK: u8 = 114;
    /// Failure and stderr: soft red
    pub const ERR: u8 = 174;
    /// Warnings and skips: sand
    pub const WARN: u8 = 179;
    /// Muted / secondary text: medium grey
    pub const MUTED: u8 = 245;
}

/// Whether to emit ANSI colors.
///
/// `NO_COLOR=1` always wins, `COLOR=1` forces color through pipes, and
/// otherwise colors appear only on a real terminal.
pub fn should_colorize() -> bool {
    let set = |name| std::env::var(name).is_ok_and(|v| v == "1");
    match (set("NO_COLOR"), set("COLOR")) {
        (true, _) => false,
        (false, true) => true,
        _ => std::io::stdout().is_terminal(),
    }
}

fn fg256(code: u8) -> String {
    format!("\x1b[38;5;{code}m")
}

const RESET: &str = "\x1b[0m";

fn paint(code: u8, text: &str) -> String {
    if should_colorize() {
        format!("{}{}{}", fg256(code), text, RESET)
    } else {
        text.to_string()
    }
}

pub fn header(text: &str) -> String {
    paint(codes::HEADER, text)
}

pub fn ok(text: &str) -> String {
    paint(codes::OK, text)
}

pub fn err(text: &str) -> String {
    paint(codes::ERR, text)
}

pub fn warn(text: &str) -> String {
    paint(codes::WARN, text)
}

pub fn muted(text: &str) -> String {
    paint(codes::MUTED, text)
}

fn status_label(status: StepStatus) -> String {
    match status {
        StepStatus::Success => ok("ok"),
        StepStatus::Failed => err("failed"),
        StepStatus::Skipped => warn("skipped"),
        StepStatus::Running => muted("running"),
        StepStatus::Pending => muted("pending"),
    }
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MiB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KiB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

fn format_artifact(artifact: &ArtifactInfo) -> String {
    format!(
        "  {} {}",
        artifact.path.display(),
        muted(&format!("({})", format_size(artifact.size_bytes)))
    )
}

/// Print the end-of-run summary, highlighting failed steps.
pub fn print_summary(run: &PipelineRun) {
    let status = match run.status {
        RunStatus::Success => ok("Success"),
        RunStatus::Failed => err("Failed"),
        RunStatus::Cancelled => warn("Cancelled"),
        other => muted(&format!("{:?}", other)),
    };
    let elapsed = run.elapsed().num_milliseconds() as f64 / 1000.0;

    println!();
    println!("{}", header(&format!("── {} ──", run.pipeline_name)));
    if let Some(trigger) = &run.trigger {
        println!("{}", muted(&format!("triggered by {}", trigger)));
    }
    println!("{} {} {}", status, muted("in"), muted(&format!("{:.1}s", elapsed)));

    for result in &run.step_results {
        let duration = match result.completed_at {
            Some(done) => format!(
                "{:.1}s",
                (done - result.started_at).num_milliseconds() as f64 / 1000.0
            ),
            None => "-".to_string(),
        };
        println!(
            "  [{}] {} {}",
            status_label(result.status),
            result.step_name,
            muted(&duration)
        );
        if let Some(summary) = result.error_summary() {
            println!("      {}", err(&summary));
        }
        for hint in &result.hints {
            println!("      {} {}", warn("hint:"), hint);
        }
    }

    if !run.artifacts.is_empty() {
        println!("{}", header("Artifacts"));
        for artifact in &run.artifacts {
            println!("{}", format_artifact(artifact));
        }
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
