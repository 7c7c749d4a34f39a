// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use async_trait::async_trait;

use crate::app::errors::AppResult;
use crate::app::types::{NewNode, NodeRecord};

#[async_trait]
pub trait NodeStorePort: Send + Sync {
    async fn insert_node(&self, node: &NewNode) -> AppResult<i64>;
    async fn get_node_by_id(&self, id: i64) -> AppResult<Option<NodeRecord>>;
    async fn get_node_by_uuid(&self, uuid: &str) -> AppResult<Option<NodeRecord>>;
    async fn get_nodes_by_ids(&self, ids: &[i64]) -> AppResult<Vec<NodeRecord>>;
    async fn list_nodes(&self) -> AppResult<Vec<NodeRecord>>;
}
