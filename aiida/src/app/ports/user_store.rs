// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use async_trait::async_trait;

use crate::app::errors::AppResult;
use crate::app::types::{NewUser, UserFilter, UserRecord};

#[async_trait]
pub trait UserStorePort: Send + Sync {
    async fn insert_user(&self, user: &NewUser) -> AppResult<i64>;
    async fn update_user(&self, id: i64, user: &NewUser) -> AppResult<()>;
    async fn find_users(&self, filter: &UserFilter) -> AppResult<Vec<UserRecord>>;
}
