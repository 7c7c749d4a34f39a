// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use async_trait::async_trait;

use crate::app::errors::AppResult;
use crate::app::types::{GroupQuery, GroupRecord, NewGroup};

#[async_trait]
pub trait GroupStorePort: Send + Sync {
    async fn insert_group(&self, group: &NewGroup) -> AppResult<i64>;
    async fn get_group_by_id(&self, id: i64) -> AppResult<Option<GroupRecord>>;
    async fn get_group_by_name(
        &self,
        name: &str,
        type_string: &str,
    ) -> AppResult<Option<GroupRecord>>;
    async fn find_groups_by_name(&self, name: &str) -> AppResult<Vec<GroupRecord>>;
    async fn rename_group(&self, id: i64, new_name: &str) -> AppResult<()>;
    async fn set_group_description(&self, id: i64, description: &str) -> AppResult<()>;
    /// Deletes the group row and its membership rows; nodes are kept.
    async fn delete_group(&self, id: i64) -> AppResult<usize>;
    /// Adds every node in one transaction. Returns how many were new members.
    async fn add_group_nodes(&self, group_id: i64, node_ids: &[i64]) -> AppResult<usize>;
    /// Removes every node in one transaction. Returns how many were members.
    async fn remove_group_nodes(&self, group_id: i64, node_ids: &[i64]) -> AppResult<usize>;
    async fn group_node_ids(&self, group_id: i64) -> AppResult<Vec<i64>>;
    async fn count_group_nodes(&self, group_id: i64) -> AppResult<i64>;
    async fn query_groups(&self, query: &GroupQuery) -> AppResult<Vec<GroupRecord>>;
}
