// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::path::Path;

use aiida::config::ProfileSummary;
use async_trait::async_trait;

use crate::app::commands::CommandResult;
use crate::app::errors::{AppError, AppResult};

#[async_trait]
pub trait InteractionPort: Send + Sync {
    async fn confirm(&self, prompt: &str, help: &str) -> AppResult<bool>;
    async fn prompt_line(&self, prompt: &str, help: &str) -> AppResult<String>;
    async fn prompt_line_with_default(
        &self,
        prompt: &str,
        help: &str,
        default: &str,
    ) -> AppResult<String>;
    /// Reads a secret without echoing it.
    async fn prompt_secret(&self, prompt: &str) -> AppResult<String>;
}

#[async_trait]
pub trait OutputPort: Send + Sync {
    async fn render(&self, result: &CommandResult) -> AppResult<()>;
    async fn render_error(&self, error: &AppError) -> AppResult<()>;
    async fn info(&self, message: &str) -> AppResult<()>;
    async fn warn(&self, message: &str) -> AppResult<()>;
    async fn success(&self, message: &str) -> AppResult<()>;
}

/// Multi-line text entry through an external editor.
pub trait EditorPort: Send + Sync {
    /// Opens `template` in the editor and returns the saved contents.
    fn edit(&self, template: &str) -> AppResult<String>;
}

/// The profiles of the active config file.
pub trait ProfilePort: Send + Sync {
    fn list_profiles(&self) -> AppResult<Vec<ProfileSummary>>;
    fn set_default_profile(&self, name: &str) -> AppResult<()>;
    /// Drops the profile entry and returns what it was.
    fn remove_profile(&self, name: &str) -> AppResult<ProfileSummary>;
    /// Returns false when there was no file to delete.
    fn remove_database(&self, path: &Path) -> AppResult<bool>;
}
