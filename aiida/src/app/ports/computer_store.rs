// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use async_trait::async_trait;

use crate::app::errors::AppResult;
use crate::app::types::{AuthInfoRecord, ComputerRecord, NewAuthInfo, NewComputer};

#[async_trait]
pub trait ComputerStorePort: Send + Sync {
    async fn insert_computer(&self, computer: &NewComputer) -> AppResult<i64>;
    async fn get_computer_by_name(&self, name: &str) -> AppResult<Option<ComputerRecord>>;
    async fn get_computer_by_id(&self, id: i64) -> AppResult<Option<ComputerRecord>>;
    async fn list_computers(&self) -> AppResult<Vec<ComputerRecord>>;
    async fn set_computer_enabled(&self, id: i64, enabled: bool) -> AppResult<()>;
    async fn rename_computer(&self, id: i64, new_name: &str) -> AppResult<()>;
    /// Removes the computer together with its authinfos.
    async fn delete_computer(&self, id: i64) -> AppResult<usize>;

    async fn get_authinfo(&self, computer_id: i64, user_id: i64)
    -> AppResult<Option<AuthInfoRecord>>;
    async fn upsert_authinfo(&self, authinfo: &NewAuthInfo) -> AppResult<i64>;
    /// Returns false when no authinfo exists for the pair.
    async fn set_authinfo_enabled(
        &self,
        computer_id: i64,
        user_id: i64,
        enabled: bool,
    ) -> AppResult<bool>;
    async fn list_authinfos(&self, computer_id: i64) -> AppResult<Vec<AuthInfoRecord>>;
}
