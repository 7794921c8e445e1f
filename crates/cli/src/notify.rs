// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completion signals: terminal bell and best-effort desktop
//! notifications. Notification failures are always silent; this whole
//! module is advisory.

use std::io::Write;

/// Emit the terminal bell.
pub fn bell() {
    print!("\x07");
    let _ = std::io::stdout().flush();
}

/// Raise a desktop notification, swallowing every failure.
///
/// Uses notify-send on Linux and osascript on macOS; elsewhere this is
/// a no-op.
pub async fn desktop(title: &str, message: &str) {
    #[cfg(target_os = "linux")]
    {
        let _ = tokio::process::Command::new("notify-send")
            .args([title, message])
            .output()
            .await;
    }
    #[cfg(target_os = "macos")]
    {
        let script = format!(
            "display notification \"{}\" with title \"{}\"",
            message.replace('"', "'"),
            title.replace('"', "'")
        );
        let _ = tokio::process::Command::new("osascript")
            .args(["-e", &script])
            .output()
            .await;
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        let _ = (title, message);
    }
    tracing::debug!(title, "desktop notification attempted");
}
