// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Debounced filesystem watching
//!
//! Wraps the platform notification facility (via the `notify` crate)
//! with duplicate suppression and per-trigger debounce. Matching events
//! are delivered as `WatchEvent`s on an unbounded channel, so consumers
//! run without the watcher's internal lock held. Notification callbacks
//! arrive on arbitrary platform threads and are bridged onto the tokio
//! runtime captured at start.

use crate::error::WatchError;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use pf_core::WatchTrigger;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Emissions for the same `path:filter` key within this interval are
/// suppressed as duplicates.
pub const MIN_TRIGGER_INTERVAL: Duration = Duration::from_secs(2);

/// A debounced filesystem change.
#[derive(Debug, Clone)]
pub struct WatchEvent {
    /// The file whose change fired the trigger (the last one seen
    /// during the debounce window).
    pub path: PathBuf,
    pub trigger: WatchTrigger,
}

/// Per-key debounce state.
#[derive(Default)]
struct KeyState {
    last_emission: Option<Instant>,
    timer: Option<JoinHandle<()>>,
}

struct WatchState {
    keys: HashMap<String, KeyState>,
}

/// Watches the filesystem locations of a pipeline's triggers.
pub struct PipelineWatcher {
    // Registrations are dropped (and stop raising) when this is cleared.
    registrations: Vec<RecommendedWatcher>,
    state: Arc<Mutex<WatchState>>,
}

impl PipelineWatcher {
    /// Register every trigger and start delivering debounced events on
    /// the returned channel. Relative trigger paths resolve against
    /// `base_dir`. Triggers whose path is missing are logged and
    /// skipped; if none remain the start fails.
    pub fn start(
        triggers: &[WatchTrigger],
        base_dir: &Path,
    ) -> Result<(Self, mpsc::UnboundedReceiver<WatchEvent>), WatchError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let state = Arc::new(Mutex::new(WatchState {
            keys: HashMap::new(),
        }));
        let handle = tokio::runtime::Handle::current();

        let mut registrations = Vec::new();
        for trigger in triggers {
            let watch_path = if Path::new(&trigger.path).is_absolute() {
                PathBuf::from(&trigger.path)
            } else {
                base_dir.join(&trigger.path)
            };
            if !watch_path.exists() {
                tracing::warn!(path = %watch_path.display(), "watch path missing, skipping trigger");
                continue;
            }

            match register(trigger.clone(), &watch_path, tx.clone(), state.clone(), handle.clone()) {
                Ok(watcher) => {
                    tracing::info!(
                        path = %watch_path.display(),
                        filter = %trigger.filter,
                        recursive = trigger.include_subdirectories,
                        "watching"
                    );
                    registrations.push(watcher);
                }
                Err(source) => {
                    return Err(WatchError::Register {
                        path: watch_path,
                        source,
                    })
                }
            }
        }

        if registrations.is_empty() {
            return Err(WatchError::NothingToWatch);
        }

        Ok((
            Self {
                registrations,
                state,
            },
            rx,
        ))
    }

    /// Stop raising events on every registration.
    pub fn stop(&mut self) {
        self.registrations.clear();
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        for key_state in state.keys.values_mut() {
            if let Some(timer) = key_state.timer.take() {
                timer.abort();
            }
        }
    }
}

impl Drop for PipelineWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

fn register(
    trigger: WatchTrigger,
    watch_path: &Path,
    tx: mpsc::UnboundedSender<WatchEvent>,
    state: Arc<Mutex<WatchState>>,
    handle: tokio::runtime::Handle,
) -> Result<RecommendedWatcher, notify::Error> {
    let mode = if trigger.include_subdirectories {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    };

    let mut watcher =
        notify::recommended_watcher(move |outcome: Result<Event, notify::Error>| {
            let event = match outcome {
                Ok(event) => event,
                Err(e) => {
                    // Platform errors never propagate; keep raising.
                    tracing::warn!(error = %e, "watch error event");
                    return;
                }
            };
            if !matches!(
                event.kind,
                EventKind::Create(_) | EventKind::Modify(_)
            ) {
                return;
            }

            for path in &event.paths {
                if !filter_matches(&trigger.filter, path) {
                    continue;
                }
                on_match(&trigger, path.clone(), &tx, &state, &handle);
            }
        })?;

    watcher.watch(watch_path, mode)?;
    Ok(watcher)
}

/// Duplicate suppression and debounce for one matching event.
fn on_match(
    trigger: &WatchTrigger,
    path: PathBuf,
    tx: &mpsc::UnboundedSender<WatchEvent>,
    state: &Arc<Mutex<WatchState>>,
    handle: &tokio::runtime::Handle,
) {
    let key = trigger.key();
    let debounce = Duration::from_millis(trigger.debounce_ms.max(0) as u64);

    let mut guard = state.lock().unwrap_or_else(|e| e.into_inner());
    let key_state = guard.keys.entry(key.clone()).or_default();

    if let Some(last) = key_state.last_emission {
        if last.elapsed() < MIN_TRIGGER_INTERVAL {
            tracing::debug!(%key, "suppressing duplicate trigger");
            return;
        }
    }

    // Re-arm the one-shot debounce timer for this key.
    if let Some(timer) = key_state.timer.take() {
        timer.abort();
    }

    let event = WatchEvent {
        path,
        trigger: trigger.clone(),
    };
    let tx = tx.clone();
    let state = Arc::clone(state);
    key_state.timer = Some(handle.spawn(async move {
        tokio::time::sleep(debounce).await;
        {
            let mut guard = state.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(key_state) = guard.keys.get_mut(&event.trigger.key()) {
                key_state.last_emission = Some(Instant::now());
                key_state.timer = None;
            }
        }
        // Channel send happens without the lock held.
        let _ = tx.send(event);
    }));
}

/// Match the trigger's glob filter against the event's file name.
fn filter_matches(filter: &str, path: &Path) -> bool {
    if filter.is_empty() || filter == "*.*" || filter == "*" {
        return true;
    }
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    match glob::Pattern::new(filter) {
        Ok(pattern) => pattern.matches(name),
        Err(e) => {
            tracing::warn!(filter, error = %e, "invalid watch filter, accepting event");
            true
        }
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
