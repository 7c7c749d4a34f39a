// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use async_trait::async_trait;

use crate::app::errors::AppResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecCapture {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl ExecCapture {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs commands on the machine verdi itself runs on.
#[async_trait]
pub trait LocalExecPort: Send + Sync {
    async fn exec_capture(&self, program: &str, args: &[&str]) -> AppResult<ExecCapture>;
}
