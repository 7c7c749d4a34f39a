// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use serde::Serialize;

use crate::app::errors::{AppError, AppResult};
use crate::app::services::{timestamps, validation};
use crate::app::types::{
    GroupQuery, GroupRecord, GroupRef, NameFilters, NewGroup, NodeRecord, NodeRef,
    USER_DEFINED_GROUP_TYPE,
};

use super::UseCases;

/// Filters for `group list`. Every set filter must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupListRequest {
    /// `None` lists groups of every user.
    pub user_email: Option<String>,
    /// `None` lists every type; `Some("")` only user-defined groups.
    pub type_string: Option<String>,
    pub node: Option<NodeRef>,
    pub past_days: Option<u32>,
    pub name_filters: NameFilters,
    pub with_counts: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    #[serde(flatten)]
    pub group: GroupRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_count: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupDetails {
    #[serde(flatten)]
    pub group: GroupRecord,
    pub nodes: Vec<NodeRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteGroupOutcome {
    pub group: GroupRecord,
    pub node_count: i64,
}

impl UseCases {
    /// Looks a group up by PK or by name. A bare name that exists under
    /// several type strings resolves to the user-defined one.
    pub async fn resolve_group(&self, group: &GroupRef) -> AppResult<GroupRecord> {
        match group {
            GroupRef::Pk(pk) => self
                .groups
                .get_group_by_id(*pk)
                .await?
                .ok_or_else(|| AppError::not_existent(format!("No group found with PK = {pk}"))),
            GroupRef::Name(name) => {
                let mut matches = self.groups.find_groups_by_name(name).await?;
                match matches.len() {
                    0 => Err(AppError::not_existent(format!(
                        "No group found with name '{name}'"
                    ))),
                    1 => Ok(matches.remove(0)),
                    n => matches
                        .into_iter()
                        .find(GroupRecord::is_user_defined)
                        .ok_or_else(|| {
                            AppError::multiple_objects(format!(
                                "{n} groups found with name '{name}'; use the PK instead"
                            ))
                        }),
                }
            }
        }
    }

    pub async fn get_or_create_group(
        &self,
        name: &str,
        type_string: &str,
        user_email: Option<&str>,
    ) -> AppResult<(GroupRecord, bool)> {
        let name = validation::validate_group_name(name)?;
        if let Some(existing) = self.groups.get_group_by_name(&name, type_string).await? {
            return Ok((existing, false));
        }
        let user = self.resolve_user(user_email).await?;
        let id = self
            .groups
            .insert_group(&NewGroup {
                name: name.clone(),
                type_string: type_string.to_string(),
                description: String::new(),
                user_id: user.id,
            })
            .await?;
        log::debug!("created group '{name}' id={id} type='{type_string}'");
        let group = self
            .groups
            .get_group_by_id(id)
            .await?
            .ok_or_else(|| AppError::internal(format!("group {id} vanished after insert")))?;
        Ok((group, true))
    }

    /// User-defined group for `verdi group create`.
    pub async fn create_group(
        &self,
        name: &str,
        user_email: Option<&str>,
    ) -> AppResult<(GroupRecord, bool)> {
        self.get_or_create_group(name, USER_DEFINED_GROUP_TYPE, user_email)
            .await
    }

    pub async fn rename_group(&self, group: &GroupRef, new_name: &str) -> AppResult<GroupRecord> {
        let current = self.resolve_group(group).await?;
        let new_name = validation::validate_group_name(new_name)?;
        if new_name == current.name {
            return Ok(current);
        }
        if let Some(clash) = self
            .groups
            .get_group_by_name(&new_name, &current.type_string)
            .await?
        {
            return Err(AppError::uniqueness(format!(
                "Group '{new_name}' already exists, PK = {}",
                clash.id
            )));
        }
        self.groups.rename_group(current.id, &new_name).await?;
        self.resolve_group(&GroupRef::Pk(current.id)).await
    }

    pub async fn set_group_description(
        &self,
        group: &GroupRef,
        description: &str,
    ) -> AppResult<GroupRecord> {
        let current = self.resolve_group(group).await?;
        self.groups
            .set_group_description(current.id, description)
            .await?;
        self.resolve_group(&GroupRef::Pk(current.id)).await
    }

    pub async fn count_group_nodes(&self, group: &GroupRecord) -> AppResult<i64> {
        self.groups.count_group_nodes(group.id).await
    }

    /// Refuses a non-empty group unless `force`. Member nodes are kept.
    pub async fn delete_group(
        &self,
        group: &GroupRecord,
        force: bool,
    ) -> AppResult<DeleteGroupOutcome> {
        let node_count = self.groups.count_group_nodes(group.id).await?;
        if node_count > 0 && !force {
            return Err(AppError::validation(format!(
                "Group '{}' is not empty (it contains {node_count} nodes). Pass the -f option if you really want to delete it.",
                group.name
            )));
        }
        self.groups.delete_group(group.id).await?;
        log::info!("deleted group '{}' ({node_count} members)", group.name);
        Ok(DeleteGroupOutcome {
            group: group.clone(),
            node_count,
        })
    }

    /// Resolves every reference or none. Duplicates collapse.
    pub async fn resolve_nodes(&self, refs: &[NodeRef]) -> AppResult<Vec<NodeRecord>> {
        let mut found: Vec<NodeRecord> = Vec::with_capacity(refs.len());
        let mut missing = Vec::new();
        for node_ref in refs {
            match self.get_node(node_ref).await? {
                Some(node) => {
                    if !found.iter().any(|known| known.id == node.id) {
                        found.push(node);
                    }
                }
                None => missing.push(node_ref.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(AppError::not_existent(format!(
                "no node found for: {}",
                missing.join(", ")
            )));
        }
        Ok(found)
    }

    /// Returns how many nodes became new members.
    pub async fn add_nodes(&self, group: &GroupRecord, refs: &[NodeRef]) -> AppResult<usize> {
        let nodes = self.resolve_nodes(refs).await?;
        let ids: Vec<i64> = nodes.iter().map(|node| node.id).collect();
        self.groups.add_group_nodes(group.id, &ids).await
    }

    /// Returns how many of the nodes were members.
    pub async fn remove_nodes(&self, group: &GroupRecord, refs: &[NodeRef]) -> AppResult<usize> {
        let nodes = self.resolve_nodes(refs).await?;
        let ids: Vec<i64> = nodes.iter().map(|node| node.id).collect();
        self.groups.remove_group_nodes(group.id, &ids).await
    }

    pub async fn query_groups(&self, request: &GroupListRequest) -> AppResult<Vec<GroupSummary>> {
        let user_id = match request.user_email.as_deref() {
            Some(email) => Some(self.get_user(email).await?.id),
            None => None,
        };
        let node_ids = match &request.node {
            Some(node_ref) => self
                .resolve_nodes(std::slice::from_ref(node_ref))
                .await?
                .into_iter()
                .map(|node| node.id)
                .collect(),
            None => Vec::new(),
        };
        let created_after = request
            .past_days
            .map(|days| timestamps::past_days_cutoff(self.clock.now_utc(), days))
            .transpose()?;
        let query = GroupQuery {
            user_id,
            type_string: request.type_string.clone(),
            node_ids,
            created_after,
            name_filters: request.name_filters.clone(),
        };
        log::debug!("group query: {query:?}");

        let groups = self.groups.query_groups(&query).await?;
        let mut out = Vec::with_capacity(groups.len());
        for group in groups {
            let node_count = if request.with_counts {
                Some(self.groups.count_group_nodes(group.id).await?)
            } else {
                None
            };
            out.push(GroupSummary { group, node_count });
        }
        Ok(out)
    }

    pub async fn show_group(&self, group: &GroupRef) -> AppResult<GroupDetails> {
        let group = self.resolve_group(group).await?;
        let ids = self.groups.group_node_ids(group.id).await?;
        let nodes = self.nodes.get_nodes_by_ids(&ids).await?;
        Ok(GroupDetails { group, nodes })
    }
}
