// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::{Arc, Mutex};

type Captured = Arc<Mutex<Vec<(OutputSource, String)>>>;

fn spec(command_line: &str, timeout: Duration) -> CommandSpec {
    CommandSpec {
        command_line: command_line.to_string(),
        working_dir: std::env::temp_dir(),
        env: BTreeMap::new(),
        timeout,
    }
}

fn collector() -> (Captured, impl FnMut(OutputSource, String)) {
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let inner = Arc::clone(&captured);
    (captured, move |source, text| {
        inner.lock().unwrap().push((source, text));
    })
}

#[tokio::test]
async fn captures_stdout_lines() {
    let (captured, sink) = collector();
    let cancel = CancellationToken::new();

    let code = run_command(&spec("echo one; echo two", Duration::from_secs(10)), &cancel, sink)
        .await
        .unwrap();

    assert_eq!(code, 0);
    let lines = captured.lock().unwrap();
    let stdout: Vec<&str> = lines
        .iter()
        .filter(|(s, _)| *s == OutputSource::StdOut)
        .map(|(_, t)| t.as_str())
        .collect();
    assert_eq!(stdout, vec!["one", "two"]);
}

#[tokio::test]
async fn separates_stderr_from_stdout() {
    let (captured, sink) = collector();
    let cancel = CancellationToken::new();

    run_command(
        &spec("echo out; echo err 1>&2", Duration::from_secs(10)),
        &cancel,
        sink,
    )
    .await
    .unwrap();

    let lines = captured.lock().unwrap();
    assert!(lines.contains(&(OutputSource::StdOut, "out".to_string())));
    assert!(lines.contains(&(OutputSource::StdErr, "err".to_string())));
}

#[tokio::test]
async fn returns_nonzero_exit_code() {
    let (_, sink) = collector();
    let cancel = CancellationToken::new();

    let code = run_command(&spec("exit 3", Duration::from_secs(10)), &cancel, sink)
        .await
        .unwrap();
    assert_eq!(code, 3);
}

#[tokio::test]
async fn strips_trailing_carriage_return() {
    let (captured, sink) = collector();
    let cancel = CancellationToken::new();

    run_command(
        &spec("printf 'line\\r\\n'", Duration::from_secs(10)),
        &cancel,
        sink,
    )
    .await
    .unwrap();

    let lines = captured.lock().unwrap();
    assert_eq!(lines[0].1, "line");
}

#[tokio::test]
async fn environment_reaches_the_child() {
    let (captured, sink) = collector();
    let cancel = CancellationToken::new();

    let mut command_spec = spec("echo $MARKER", Duration::from_secs(10));
    command_spec
        .env
        .insert("MARKER".to_string(), "from-test".to_string());

    run_command(&command_spec, &cancel, sink).await.unwrap();

    let lines = captured.lock().unwrap();
    assert_eq!(lines[0].1, "from-test");
}

#[tokio::test]
async fn timeout_kills_the_process_tree() {
    let (_, sink) = collector();
    let cancel = CancellationToken::new();

    let started = std::time::Instant::now();
    let outcome = run_command(&spec("sleep 10", Duration::from_secs(1)), &cancel, sink).await;

    assert!(matches!(outcome, Err(RunnerError::Timeout { seconds: 1 })));
    assert!(
        started.elapsed() < Duration::from_secs(5),
        "timeout took {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn cancellation_stops_the_child() {
    let (_, sink) = collector();
    let cancel = CancellationToken::new();

    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        canceller.cancel();
    });

    let outcome = run_command(&spec("sleep 30", Duration::from_secs(60)), &cancel, sink).await;
    assert!(matches!(outcome, Err(RunnerError::Cancelled)));
}

#[tokio::test]
async fn spawn_failure_when_working_dir_missing() {
    let (_, sink) = collector();
    let cancel = CancellationToken::new();

    let command_spec = CommandSpec {
        command_line: "true".to_string(),
        working_dir: PathBuf::from("/definitely/not/a/dir"),
        env: BTreeMap::new(),
        timeout: Duration::from_secs(5),
    };

    let outcome = run_command(&command_spec, &cancel, sink).await;
    assert!(matches!(outcome, Err(RunnerError::Spawn { .. })));
}

#[tokio::test]
async fn output_before_exit_is_not_lost() {
    let (captured, sink) = collector();
    let cancel = CancellationToken::new();

    // A burst right before exiting exercises the post-exit drain.
    run_command(
        &spec("for i in 1 2 3 4 5; do echo line$i; done", Duration::from_secs(10)),
        &cancel,
        sink,
    )
    .await
    .unwrap();

    assert_eq!(captured.lock().unwrap().len(), 5);
}
