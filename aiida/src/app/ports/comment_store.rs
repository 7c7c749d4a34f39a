// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use async_trait::async_trait;

use crate::app::errors::AppResult;
use crate::app::types::{CommentRecord, NewComment};

#[async_trait]
pub trait CommentStorePort: Send + Sync {
    async fn insert_comment(&self, comment: &NewComment) -> AppResult<i64>;
    async fn get_comment(&self, id: i64) -> AppResult<Option<CommentRecord>>;
    async fn list_node_comments(&self, node_id: i64) -> AppResult<Vec<CommentRecord>>;
    /// Returns false when no comment has this id.
    async fn update_comment_content(&self, id: i64, content: &str) -> AppResult<bool>;
    async fn delete_comment(&self, id: i64) -> AppResult<bool>;
}
