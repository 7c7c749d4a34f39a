// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::io::Write;

use crate::app::errors::{AppError, AppResult};
use crate::app::ports::EditorPort;

const FALLBACK_EDITOR: &str = "vi";

/// Runs `$VISUAL`, then `$EDITOR`, then `vi` on a temporary file.
pub struct ExternalEditor {
    program: String,
}

impl ExternalEditor {
    pub fn new() -> Self {
        Self {
            program: editor_from_env(
                std::env::var("VISUAL").ok(),
                std::env::var("EDITOR").ok(),
            ),
        }
    }
}

fn editor_from_env(visual: Option<String>, editor: Option<String>) -> String {
    [visual, editor]
        .into_iter()
        .flatten()
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| FALLBACK_EDITOR.to_string())
}

impl EditorPort for ExternalEditor {
    fn edit(&self, template: &str) -> AppResult<String> {
        let mut file = tempfile::Builder::new()
            .prefix("verdi-")
            .suffix(".sh")
            .tempfile()
            .map_err(|err| AppError::local_error(format!("failed to create temp file: {err}")))?;
        file.write_all(template.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|err| AppError::local_error(format!("failed to write temp file: {err}")))?;

        // The editor value may carry its own arguments, e.g. "code --wait".
        let status = std::process::Command::new("sh")
            .arg("-c")
            .arg(format!("{} \"$1\"", self.program))
            .arg("sh")
            .arg(file.path())
            .status()
            .map_err(|err| {
                AppError::local_error(format!("failed to run editor '{}': {err}", self.program))
            })?;
        if !status.success() {
            return Err(AppError::local_error(format!(
                "editor '{}' exited with {status}",
                self.program
            )));
        }

        std::fs::read_to_string(file.path())
            .map_err(|err| AppError::local_error(format!("failed to read temp file: {err}")))
    }
}
