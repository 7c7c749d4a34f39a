// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use crate::app::errors::{AppError, AppResult};
use crate::app::types::{NewNode, NodeRecord, NodeRef};

use super::UseCases;

pub const DEFAULT_NODE_TYPE: &str = "data.int";

impl UseCases {
    pub async fn create_node(
        &self,
        node_type: &str,
        label: &str,
        user_email: Option<&str>,
    ) -> AppResult<NodeRecord> {
        let node_type = node_type.trim();
        if node_type.is_empty() {
            return Err(AppError::validation("node type cannot be empty"));
        }
        let user = self.resolve_user(user_email).await?;
        let id = self
            .nodes
            .insert_node(&NewNode {
                node_type: node_type.to_string(),
                label: label.trim().to_string(),
                user_id: user.id,
            })
            .await?;
        log::debug!("created node id={id} type={node_type}");
        self.nodes
            .get_node_by_id(id)
            .await?
            .ok_or_else(|| AppError::internal(format!("node {id} vanished after insert")))
    }

    pub async fn get_node(&self, node: &NodeRef) -> AppResult<Option<NodeRecord>> {
        match node {
            NodeRef::Pk(pk) => self.nodes.get_node_by_id(*pk).await,
            NodeRef::Uuid(uuid) => self.nodes.get_node_by_uuid(uuid).await,
        }
    }

    pub async fn list_nodes(&self) -> AppResult<Vec<NodeRecord>> {
        self.nodes.list_nodes().await
    }
}

#[cfg(test)]
mod tests {
    use crate::app::errors::AppErrorKind;
    use crate::app::usecases::testing::harness;

    use super::*;

    #[tokio::test]
    async fn create_requires_a_user() {
        let h = harness(None).await;
        let err = h
            .usecases
            .create_node(DEFAULT_NODE_TYPE, "x", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), AppErrorKind::NotExistent);
    }

    #[tokio::test]
    async fn created_node_is_found_by_pk_and_uuid() {
        let h = harness(Some("ada@example.org")).await;
        let user = h.usecases.create_user("ada@example.org");
        h.usecases.store_user(&user).await.unwrap();
        let node = h
            .usecases
            .create_node(DEFAULT_NODE_TYPE, " answer ", None)
            .await
            .unwrap();
        assert_eq!(node.label, "answer");

        let by_pk = h.usecases.get_node(&NodeRef::Pk(node.id)).await.unwrap();
        let by_uuid = h
            .usecases
            .get_node(&NodeRef::Uuid(node.uuid.clone()))
            .await
            .unwrap();
        assert_eq!(by_pk, by_uuid);
        assert_eq!(h.usecases.list_nodes().await.unwrap().len(), 1);
    }
}
