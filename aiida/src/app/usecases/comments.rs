// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use serde::Serialize;

use crate::app::errors::{AppError, AppResult};
use crate::app::types::{CommentRecord, NewComment, NodeRecord, NodeRef};

use super::UseCases;

#[derive(Debug, Clone, Serialize)]
pub struct NodeComments {
    pub node: NodeRecord,
    pub comments: Vec<CommentRecord>,
}

fn checked_content(content: &str) -> AppResult<&str> {
    if content.trim().is_empty() {
        return Err(AppError::validation("comment content cannot be empty"));
    }
    Ok(content)
}

impl UseCases {
    async fn require_node(&self, node: &NodeRef) -> AppResult<NodeRecord> {
        self.get_node(node)
            .await?
            .ok_or_else(|| AppError::not_existent(format!("No node found with identifier {node}")))
    }

    /// Attaches a comment authored by the automatic user.
    pub async fn add_comment(&self, node: &NodeRef, content: &str) -> AppResult<CommentRecord> {
        let content = checked_content(content)?;
        let node = self.require_node(node).await?;
        let user = self.resolve_user(None).await?;
        let id = self
            .comments
            .insert_comment(&NewComment {
                node_id: node.id,
                user_id: user.id,
                content: content.to_string(),
            })
            .await?;
        log::debug!("added comment id={id} to node {}", node.id);
        self.get_comment(id).await
    }

    pub async fn get_comment(&self, id: i64) -> AppResult<CommentRecord> {
        self.comments
            .get_comment(id)
            .await?
            .ok_or_else(|| AppError::not_existent(format!("No comment found with id = {id}")))
    }

    /// Comments on the node, oldest first.
    pub async fn list_comments(&self, node: &NodeRef) -> AppResult<NodeComments> {
        let node = self.require_node(node).await?;
        let comments = self.comments.list_node_comments(node.id).await?;
        Ok(NodeComments { node, comments })
    }

    /// Only the author, as seen through the automatic user, may edit.
    pub async fn update_comment(&self, id: i64, content: &str) -> AppResult<CommentRecord> {
        let content = checked_content(content)?;
        let comment = self.get_comment(id).await?;
        let user = self.resolve_user(None).await?;
        if comment.user_id != user.id {
            return Err(AppError::validation(
                "You can only update comments that you created",
            ));
        }
        if !self.comments.update_comment_content(id, content).await? {
            return Err(AppError::not_existent(format!(
                "No comment found with id = {id}"
            )));
        }
        self.get_comment(id).await
    }

    pub async fn remove_comment(&self, id: i64) -> AppResult<CommentRecord> {
        let comment = self.get_comment(id).await?;
        self.comments.delete_comment(id).await?;
        log::info!("comment {id} removed from node {}", comment.node_id);
        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    use crate::app::errors::AppErrorKind;
    use crate::app::usecases::DEFAULT_NODE_TYPE;
    use crate::app::usecases::testing::harness;

    use super::*;

    const EMAIL: &str = "ada@example.org";

    async fn seeded(usecases: &UseCases) -> NodeRecord {
        let user = usecases.create_user(EMAIL);
        usecases.store_user(&user).await.unwrap();
        usecases
            .create_node(DEFAULT_NODE_TYPE, "relaxed", None)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn added_comments_are_listed_oldest_first() {
        let h = harness(Some(EMAIL)).await;
        let node = seeded(&h.usecases).await;
        let node_ref = NodeRef::Pk(node.id);
        h.usecases.add_comment(&node_ref, "first").await.unwrap();
        let second = h
            .usecases
            .add_comment(&NodeRef::Uuid(node.uuid.clone()), "second")
            .await
            .unwrap();
        assert_eq!(second.user_email, EMAIL);
        assert_eq!(second.node_id, node.id);

        let listed = h.usecases.list_comments(&node_ref).await.unwrap();
        assert_eq!(listed.node.id, node.id);
        let contents: Vec<&str> = listed.comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, ["first", "second"]);
    }

    #[tokio::test]
    async fn add_rejects_blank_content_and_unknown_node() {
        let h = harness(Some(EMAIL)).await;
        let node = seeded(&h.usecases).await;
        let err = h
            .usecases
            .add_comment(&NodeRef::Pk(node.id), "  \n")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), AppErrorKind::Validation);

        let err = h
            .usecases
            .add_comment(&NodeRef::Pk(9999), "hello")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), AppErrorKind::NotExistent);
        assert!(err.message().contains("9999"));
    }

    #[tokio::test]
    async fn only_the_author_may_update() {
        let h = harness(Some(EMAIL)).await;
        let node = seeded(&h.usecases).await;
        let comment = h
            .usecases
            .add_comment(&NodeRef::Pk(node.id), "draft")
            .await
            .unwrap();
        let updated = h.usecases.update_comment(comment.id, "final").await.unwrap();
        assert_eq!(updated.content, "final");
        assert_eq!(updated.ctime, comment.ctime);

        let other = h.usecases.create_user("bob@example.org");
        h.usecases.store_user(&other).await.unwrap();
        let mut as_bob = h.usecases.clone();
        as_bob.default_user_email = Some("bob@example.org".to_string());
        let err = as_bob.update_comment(comment.id, "hijack").await.unwrap_err();
        assert_eq!(err.kind(), AppErrorKind::Validation);
        assert_eq!(
            h.usecases.get_comment(comment.id).await.unwrap().content,
            "final"
        );
    }

    #[tokio::test]
    async fn removed_comment_is_gone() {
        let h = harness(Some(EMAIL)).await;
        let node = seeded(&h.usecases).await;
        let comment = h
            .usecases
            .add_comment(&NodeRef::Pk(node.id), "obsolete")
            .await
            .unwrap();
        let removed = h.usecases.remove_comment(comment.id).await.unwrap();
        assert_eq!(removed.id, comment.id);

        let err = h.usecases.get_comment(comment.id).await.unwrap_err();
        assert_eq!(err.kind(), AppErrorKind::NotExistent);
        assert_eq!(err.message(), format!("No comment found with id = {}", comment.id));
        let err = h.usecases.remove_comment(comment.id).await.unwrap_err();
        assert_eq!(err.kind(), AppErrorKind::NotExistent);
    }
}
