// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::sync::Arc;

use async_trait::async_trait;

use crate::adapters::db::{AiidaStore, StoreError};
use crate::app::errors::{AppError, AppResult};
use crate::app::ports::{
    CommentStorePort, ComputerStorePort, GroupStorePort, NodeStorePort, UserStorePort,
};
use crate::app::types::{
    AuthInfoRecord, CommentRecord, ComputerRecord, GroupQuery, GroupRecord, NewAuthInfo,
    NewComment, NewComputer, NewGroup, NewNode, NewUser, NodeRecord, UserFilter, UserRecord,
};

#[derive(Clone)]
pub struct SqliteStoreAdapter {
    store: Arc<AiidaStore>,
}

impl SqliteStoreAdapter {
    pub fn new(store: AiidaStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Persistence errors become app errors here so the use cases never see sqlx.
fn map_store_error(err: StoreError) -> AppError {
    match err {
        StoreError::EmptyName | StoreError::EmptyEmail => AppError::validation(err.to_string()),
        StoreError::UserExists(_) | StoreError::ComputerExists(_) | StoreError::GroupExists(_) => {
            AppError::uniqueness(err.to_string())
        }
        StoreError::UserNotFound(_)
        | StoreError::ComputerNotFound(_)
        | StoreError::GroupNotFound(_) => AppError::not_existent(err.to_string()),
        StoreError::Sqlx(_) | StoreError::Serde(_) | StoreError::InvalidColumn { .. } => {
            log::debug!("store error: {err}");
            AppError::internal(format!("database error: {err}"))
        }
    }
}

#[async_trait]
impl UserStorePort for SqliteStoreAdapter {
    async fn insert_user(&self, user: &NewUser) -> AppResult<i64> {
        self.store.insert_user(user).await.map_err(map_store_error)
    }

    async fn update_user(&self, id: i64, user: &NewUser) -> AppResult<()> {
        self.store
            .update_user(id, user)
            .await
            .map_err(map_store_error)
    }

    async fn find_users(&self, filter: &UserFilter) -> AppResult<Vec<UserRecord>> {
        self.store.find_users(filter).await.map_err(map_store_error)
    }
}

#[async_trait]
impl ComputerStorePort for SqliteStoreAdapter {
    async fn insert_computer(&self, computer: &NewComputer) -> AppResult<i64> {
        self.store
            .insert_computer(computer)
            .await
            .map_err(map_store_error)
    }

    async fn get_computer_by_name(&self, name: &str) -> AppResult<Option<ComputerRecord>> {
        self.store
            .get_computer_by_name(name)
            .await
            .map_err(map_store_error)
    }

    async fn get_computer_by_id(&self, id: i64) -> AppResult<Option<ComputerRecord>> {
        self.store
            .get_computer_by_id(id)
            .await
            .map_err(map_store_error)
    }

    async fn list_computers(&self) -> AppResult<Vec<ComputerRecord>> {
        self.store.list_computers().await.map_err(map_store_error)
    }

    async fn set_computer_enabled(&self, id: i64, enabled: bool) -> AppResult<()> {
        self.store
            .set_computer_enabled(id, enabled)
            .await
            .map_err(map_store_error)
    }

    async fn rename_computer(&self, id: i64, new_name: &str) -> AppResult<()> {
        self.store
            .rename_computer(id, new_name)
            .await
            .map_err(map_store_error)
    }

    async fn delete_computer(&self, id: i64) -> AppResult<usize> {
        self.store
            .delete_computer(id)
            .await
            .map_err(map_store_error)
    }

    async fn get_authinfo(
        &self,
        computer_id: i64,
        user_id: i64,
    ) -> AppResult<Option<AuthInfoRecord>> {
        self.store
            .get_authinfo(computer_id, user_id)
            .await
            .map_err(map_store_error)
    }

    async fn upsert_authinfo(&self, authinfo: &NewAuthInfo) -> AppResult<i64> {
        self.store
            .upsert_authinfo(authinfo)
            .await
            .map_err(map_store_error)
    }

    async fn set_authinfo_enabled(
        &self,
        computer_id: i64,
        user_id: i64,
        enabled: bool,
    ) -> AppResult<bool> {
        self.store
            .set_authinfo_enabled(computer_id, user_id, enabled)
            .await
            .map_err(map_store_error)
    }

    async fn list_authinfos(&self, computer_id: i64) -> AppResult<Vec<AuthInfoRecord>> {
        self.store
            .list_authinfos(computer_id)
            .await
            .map_err(map_store_error)
    }
}

#[async_trait]
impl NodeStorePort for SqliteStoreAdapter {
    async fn insert_node(&self, node: &NewNode) -> AppResult<i64> {
        self.store.insert_node(node).await.map_err(map_store_error)
    }

    async fn get_node_by_id(&self, id: i64) -> AppResult<Option<NodeRecord>> {
        self.store.get_node_by_id(id).await.map_err(map_store_error)
    }

    async fn get_node_by_uuid(&self, uuid: &str) -> AppResult<Option<NodeRecord>> {
        self.store
            .get_node_by_uuid(uuid)
            .await
            .map_err(map_store_error)
    }

    async fn get_nodes_by_ids(&self, ids: &[i64]) -> AppResult<Vec<NodeRecord>> {
        self.store
            .get_nodes_by_ids(ids)
            .await
            .map_err(map_store_error)
    }

    async fn list_nodes(&self) -> AppResult<Vec<NodeRecord>> {
        self.store.list_nodes().await.map_err(map_store_error)
    }
}

#[async_trait]
impl CommentStorePort for SqliteStoreAdapter {
    async fn insert_comment(&self, comment: &NewComment) -> AppResult<i64> {
        self.store
            .insert_comment(comment)
            .await
            .map_err(map_store_error)
    }

    async fn get_comment(&self, id: i64) -> AppResult<Option<CommentRecord>> {
        self.store.get_comment(id).await.map_err(map_store_error)
    }

    async fn list_node_comments(&self, node_id: i64) -> AppResult<Vec<CommentRecord>> {
        self.store
            .list_node_comments(node_id)
            .await
            .map_err(map_store_error)
    }

    async fn update_comment_content(&self, id: i64, content: &str) -> AppResult<bool> {
        self.store
            .update_comment_content(id, content)
            .await
            .map_err(map_store_error)
    }

    async fn delete_comment(&self, id: i64) -> AppResult<bool> {
        self.store.delete_comment(id).await.map_err(map_store_error)
    }
}

#[async_trait]
impl GroupStorePort for SqliteStoreAdapter {
    async fn insert_group(&self, group: &NewGroup) -> AppResult<i64> {
        self.store.insert_group(group).await.map_err(map_store_error)
    }

    async fn get_group_by_id(&self, id: i64) -> AppResult<Option<GroupRecord>> {
        self.store
            .get_group_by_id(id)
            .await
            .map_err(map_store_error)
    }

    async fn get_group_by_name(
        &self,
        name: &str,
        type_string: &str,
    ) -> AppResult<Option<GroupRecord>> {
        self.store
            .get_group_by_name(name, type_string)
            .await
            .map_err(map_store_error)
    }

    async fn find_groups_by_name(&self, name: &str) -> AppResult<Vec<GroupRecord>> {
        self.store
            .find_groups_by_name(name)
            .await
            .map_err(map_store_error)
    }

    async fn rename_group(&self, id: i64, new_name: &str) -> AppResult<()> {
        self.store
            .rename_group(id, new_name)
            .await
            .map_err(map_store_error)
    }

    async fn set_group_description(&self, id: i64, description: &str) -> AppResult<()> {
        self.store
            .set_group_description(id, description)
            .await
            .map_err(map_store_error)
    }

    async fn delete_group(&self, id: i64) -> AppResult<usize> {
        self.store.delete_group(id).await.map_err(map_store_error)
    }

    async fn add_group_nodes(&self, group_id: i64, node_ids: &[i64]) -> AppResult<usize> {
        self.store
            .add_group_nodes(group_id, node_ids)
            .await
            .map_err(map_store_error)
    }

    async fn remove_group_nodes(&self, group_id: i64, node_ids: &[i64]) -> AppResult<usize> {
        self.store
            .remove_group_nodes(group_id, node_ids)
            .await
            .map_err(map_store_error)
    }

    async fn group_node_ids(&self, group_id: i64) -> AppResult<Vec<i64>> {
        self.store
            .group_node_ids(group_id)
            .await
            .map_err(map_store_error)
    }

    async fn count_group_nodes(&self, group_id: i64) -> AppResult<i64> {
        self.store
            .count_group_nodes(group_id)
            .await
            .map_err(map_store_error)
    }

    async fn query_groups(&self, query: &GroupQuery) -> AppResult<Vec<GroupRecord>> {
        self.store
            .query_groups(query)
            .await
            .map_err(map_store_error)
    }
}
