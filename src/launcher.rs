// SPDX-License-Identifier: MPL-2.0

//! Fire-and-forget process launching.
//!
//! Commands run through `sh -c` via `cosmic::process::spawn`, which detaches
//! the child from the applet; nothing ever looks at its exit status. URLs are
//! handed to the desktop's default handler.

use std::fmt;
use std::io;
use std::process::Command;
use thiserror::Error;

/// Failure to hand a URL to the desktop.
#[derive(Debug, Error)]
#[error("failed to open `{target}`: {source}")]
pub struct LaunchError {
    pub target: String,
    #[source]
    pub source: io::Error,
}

/// Starts external processes on behalf of the plugin.
pub trait Launcher: fmt::Debug {
    /// Launch `command` through the shell without waiting for it.
    /// Blank commands do nothing.
    fn spawn_command(&self, command: &str);

    /// Open `url` in the user's preferred browser.
    fn open_url(&self, url: &str) -> Result<(), LaunchError>;
}

/// Launcher used by the running applet. Needs a tokio runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn spawn_command(&self, command: &str) {
        if command.trim().is_empty() {
            return;
        }

        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);

        let label = command.to_string();
        tokio::spawn(async move {
            match cosmic::process::spawn(cmd).await {
                Some(pid) => log::debug!("Launched `{label}` with pid {pid}"),
                None => log::warn!("Failed to launch `{label}`"),
            }
        });
    }

    fn open_url(&self, url: &str) -> Result<(), LaunchError> {
        open::that(url).map_err(|source| LaunchError {
            target: url.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_blank_command_is_a_noop() {
        SystemLauncher.spawn_command("");
        SystemLauncher.spawn_command("   ");
    }

    #[tokio::test]
    async fn test_shell_command_is_launched_without_waiting() {
        SystemLauncher.spawn_command("true");
    }

    #[test]
    fn test_launch_error_names_target() {
        let err = LaunchError {
            target: "https://example.invalid".to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(err.to_string().starts_with("failed to open `https://example.invalid`"));
    }
}
