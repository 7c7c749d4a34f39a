// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;

use crate::app::errors::{AppError, AppResult};
use crate::app::ports::{ExecCapture, LocalExecPort};

const DEFAULT_EXEC_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs commands as child processes of verdi.
#[derive(Clone)]
pub struct ProcessExec {
    timeout: Duration,
}

impl ProcessExec {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_EXEC_TIMEOUT,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for ProcessExec {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LocalExecPort for ProcessExec {
    async fn exec_capture(&self, program: &str, args: &[&str]) -> AppResult<ExecCapture> {
        log::debug!("exec {program} {args:?}");
        let output = tokio::time::timeout(
            self.timeout,
            Command::new(program).args(args).kill_on_drop(true).output(),
        )
        .await
        .map_err(|_| {
            AppError::transport(format!(
                "'{program}' did not finish within {}s",
                self.timeout.as_secs()
            ))
        })?
        .map_err(|e| AppError::transport(format!("failed to run '{program}': {e}")))?;

        Ok(ExecCapture {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout_and_exit_code() {
        let capture = ProcessExec::new()
            .exec_capture("sh", &["-c", "echo hello; exit 3"])
            .await
            .unwrap();
        assert_eq!(capture.stdout.trim(), "hello");
        assert_eq!(capture.exit_code, Some(3));
        assert!(!capture.success());
    }

    #[tokio::test]
    async fn missing_program_is_a_transport_error() {
        let err = ProcessExec::new()
            .exec_capture("aiida-no-such-binary", &[])
            .await
            .unwrap_err();
        assert!(err.message().contains("failed to run"));
    }

    #[tokio::test]
    async fn slow_commands_time_out() {
        let err = ProcessExec::with_timeout(Duration::from_millis(100))
            .exec_capture("sh", &["-c", "sleep 5"])
            .await
            .unwrap_err();
        assert!(err.message().contains("did not finish"));
    }
}
