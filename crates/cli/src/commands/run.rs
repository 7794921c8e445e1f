// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pipeforge run` - load, trust-check, validate and execute

use crate::interactive::{verbosity, ConsoleObserver, Verbosity};
use crate::{notify, output};
use pf_core::{
    loader, validator, PipelineDefinition, RunStatus, TrustStatus, TrustStore,
};
use pf_engine::{PipelineExecutor, PipelineWatcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct RunArgs {
    pub file: PathBuf,
    pub interactive: bool,
    pub watch: bool,
    pub verbose: bool,
    pub quiet: bool,
    pub notify: bool,
}

pub async fn handle(args: RunArgs) -> anyhow::Result<i32> {
    let definition = match loader::parse_pipeline_file(&args.file) {
        Ok(definition) => definition,
        Err(e) => {
            eprintln!("{}", output::err(&e.to_string()));
            return Ok(1);
        }
    };

    check_trust(&args.file);

    let report = validator::validate(&definition);
    for message in &report.messages {
        match message.severity {
            validator::Severity::Error => eprintln!("{}", output::err(&message.to_string())),
            validator::Severity::Warning => eprintln!("{}", output::warn(&message.to_string())),
        }
    }
    if report.has_errors() {
        eprintln!("{}", output::err("Pipeline is invalid; not running."));
        return Ok(1);
    }

    let level = verbosity(args.verbose, args.quiet);
    if level == Verbosity::Verbose {
        print_plan(&definition);
    }

    let observer = Arc::new(ConsoleObserver::new(level));
    let executor = PipelineExecutor::new().with_observer(observer);

    // Ctrl-C cancels the current run at its next safe point.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            cancel.cancel();
        });
    }

    let run = executor.execute(&definition, args.interactive, &cancel).await;
    output::print_summary(&run);
    let mut last_status = run.status;

    if args.watch && !cancel.is_cancelled() {
        notify::bell();
        if args.notify {
            notify::desktop("PipeForge", &format!("{}: {:?}", run.pipeline_name, run.status)).await;
        }
        last_status = watch_loop(&args, &definition, &executor, &cancel).await?;
    }

    Ok(if last_status == RunStatus::Success { 0 } else { 1 })
}

/// Re-run the pipeline on every debounced filesystem trigger until the
/// interrupt signal arrives.
async fn watch_loop(
    args: &RunArgs,
    definition: &PipelineDefinition,
    executor: &PipelineExecutor,
    cancel: &CancellationToken,
) -> anyhow::Result<RunStatus> {
    let base_dir = args
        .file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf();

    let (_watcher, mut events) = match PipelineWatcher::start(&definition.watch, &base_dir) {
        Ok(started) => started,
        Err(e) => {
            eprintln!("{}", output::err(&format!("watch failed: {}", e)));
            return Ok(RunStatus::Failed);
        }
    };
    println!("{}", output::header("Watching for changes (Ctrl-C to stop)"));

    let mut last_status = RunStatus::Success;
    loop {
        let event = tokio::select! {
            event = events.recv() => match event {
                Some(event) => event,
                None => break,
            },
            () = cancel.cancelled() => break,
        };

        let trigger = format!("{}", event.path.display());
        println!("{}", output::muted(&format!("change: {}", trigger)));

        // A trigger may restrict the re-run to a single stage.
        let scoped = scope_to_stage(definition, event.trigger.stage.as_deref());
        let run = executor
            .execute_with_trigger(&scoped, args.interactive, Some(trigger), cancel)
            .await;
        output::print_summary(&run);
        last_status = run.status;

        notify::bell();
        if args.notify {
            notify::desktop("PipeForge", &format!("{}: {:?}", run.pipeline_name, run.status)).await;
        }

        if cancel.is_cancelled() {
            break;
        }
    }

    Ok(last_status)
}

/// Restrict the definition to one stage when the trigger names one.
fn scope_to_stage(definition: &PipelineDefinition, stage: Option<&str>) -> PipelineDefinition {
    let Some(stage_name) = stage else {
        return definition.clone();
    };
    let mut scoped = definition.clone();
    scoped.stages.retain(|s| s.name == stage_name);
    if scoped.stages.is_empty() {
        tracing::warn!(stage = stage_name, "trigger names unknown stage, running all");
        return definition.clone();
    }
    scoped
}

/// Advisory trust check: report, then record the current hash.
fn check_trust(file: &Path) {
    let mut store = match TrustStore::open_default() {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!(error = %e, "trust store unavailable");
            return;
        }
    };
    let check = match store.check(file) {
        Ok(check) => check,
        Err(e) => {
            tracing::warn!(error = %e, "trust check failed");
            return;
        }
    };
    match check.status {
        TrustStatus::New => {
            println!(
                "{}",
                output::muted("First run of this pipeline file; recording its hash.")
            );
        }
        TrustStatus::Modified { .. } => {
            println!(
                "{}",
                output::warn("Pipeline file has changed since it was last trusted.")
            );
        }
        TrustStatus::Trusted => {}
    }
    if let Err(e) = store.trust(file, Some(check.current)) {
        tracing::warn!(error = %e, "could not record trust");
    }
}

fn print_plan(definition: &PipelineDefinition) {
    println!(
        "{}",
        output::header(&format!(
            "{} ({} stages, {} steps)",
            definition.name,
            definition.stages.len(),
            definition.total_steps()
        ))
    );
    for stage in &definition.stages {
        println!("  {}", output::header(&stage.name));
        for step in &stage.steps {
            match &step.description {
                Some(description) => {
                    println!("    {} {}", step.name, output::muted(description))
                }
                None => println!("    {}", step.name),
            }
        }
    }
}
