// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Value, json};

use crate::app::commands::CommandResult;
use crate::app::errors::{AppError, AppResult};
use crate::app::ports::{InteractionPort, OutputPort};

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OutputPort for JsonOutput {
    async fn render(&self, result: &CommandResult) -> AppResult<()> {
        let payload = json!({
            "ok": true,
            "result": result_to_json(result)?,
        });
        let output = serde_json::to_string_pretty(&payload)
            .map_err(|err| AppError::internal_error(err.to_string()))?;
        println!("{output}");
        Ok(())
    }

    async fn render_error(&self, error: &AppError) -> AppResult<()> {
        let payload = json!({
            "ok": false,
            "errorType": error.kind.as_str(),
            "reason": error.message,
        });
        let output = serde_json::to_string_pretty(&payload)
            .map_err(|err| AppError::internal_error(err.to_string()))?;
        eprintln!("{output}");
        Ok(())
    }

    async fn info(&self, _message: &str) -> AppResult<()> {
        Ok(())
    }

    async fn warn(&self, _message: &str) -> AppResult<()> {
        Ok(())
    }

    async fn success(&self, _message: &str) -> AppResult<()> {
        Ok(())
    }
}

fn to_json<T: Serialize>(value: &T) -> AppResult<Value> {
    serde_json::to_value(value).map_err(|err| AppError::internal_error(err.to_string()))
}

fn result_to_json(result: &CommandResult) -> AppResult<Value> {
    let value = match result {
        CommandResult::Message { message } => json!({ "message": message }),
        CommandResult::UserList {
            users,
            default_email,
        } => json!({
            "users": to_json(users)?,
            "defaultUser": default_email,
        }),
        CommandResult::UserConfigured {
            user,
            already_present,
        } => json!({
            "user": to_json(user)?,
            "alreadyPresent": already_present,
        }),
        CommandResult::ComputerSetup { computer } => json!({ "computer": to_json(computer)? }),
        CommandResult::ComputerList { computers } => json!({ "computers": to_json(computers)? }),
        CommandResult::ComputerDetails { status, users } => json!({
            "computer": to_json(&status.computer)?,
            "configured": status.configured,
            "userEnabled": status.user_enabled,
            "configuredUsers": users,
        }),
        CommandResult::ComputerToggle { outcome } => to_json(outcome)?,
        CommandResult::ComputerConfigured { outcome } => to_json(outcome)?,
        CommandResult::ComputerTest { report } => json!({
            "computer": report.computer,
            "transport": report.transport,
            "success": report.success(),
            "steps": to_json(&report.steps)?,
        }),
        CommandResult::ComputerRenamed { old_name, computer } => json!({
            "oldName": old_name,
            "computer": to_json(computer)?,
        }),
        CommandResult::ComputerDeleted { computer } => json!({ "deleted": to_json(computer)? }),
        CommandResult::GroupList { groups, .. } => json!({ "groups": to_json(groups)? }),
        CommandResult::GroupCreated { group, created } => json!({
            "group": to_json(group)?,
            "created": created,
        }),
        CommandResult::GroupDetails { details, .. } => to_json(details)?,
        CommandResult::GroupRenamed { old_name, group } => json!({
            "oldName": old_name,
            "group": to_json(group)?,
        }),
        CommandResult::GroupDescription { group } => json!({ "group": to_json(group)? }),
        CommandResult::GroupDeleted { group } => json!({ "deleted": to_json(group)? }),
        CommandResult::GroupNodesChanged {
            group,
            added,
            count,
        } => json!({
            "group": to_json(group)?,
            "action": if *added { "added" } else { "removed" },
            "count": count,
        }),
        CommandResult::NodeCreated { node } => json!({ "node": to_json(node)? }),
        CommandResult::NodeList { nodes } => json!({ "nodes": to_json(nodes)? }),
        CommandResult::CommentsAdded { comments } => json!({ "comments": to_json(comments)? }),
        CommandResult::CommentList { entries } => json!({ "nodes": to_json(entries)? }),
        CommandResult::CommentUpdated { comment } => json!({ "comment": to_json(comment)? }),
        CommandResult::CommentRemoved { comment } => json!({ "removed": to_json(comment)? }),
        CommandResult::ProfileList { profiles, active } => json!({
            "profiles": to_json(profiles)?,
            "active": active,
        }),
        CommandResult::ProfileDefaultSet { name } => json!({ "defaultProfile": name }),
        CommandResult::ProfileDeleted {
            profile,
            database_removed,
        } => json!({
            "deleted": to_json(profile)?,
            "databaseRemoved": database_removed,
        }),
    };
    Ok(value)
}

/// Answers every prompt with an error so that scripted runs never block.
pub struct NonInteractiveInteraction;

impl NonInteractiveInteraction {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl InteractionPort for NonInteractiveInteraction {
    async fn confirm(&self, _prompt: &str, _help: &str) -> AppResult<bool> {
        Err(AppError::confirmation_required(
            "confirmation required; pass --yes to proceed in non-interactive mode",
        ))
    }

    async fn prompt_line(&self, _prompt: &str, _help: &str) -> AppResult<String> {
        Err(AppError::invalid_argument(
            "input required; rerun without --non-interactive",
        ))
    }

    async fn prompt_line_with_default(
        &self,
        _prompt: &str,
        _help: &str,
        _default: &str,
    ) -> AppResult<String> {
        Err(AppError::invalid_argument(
            "input required; rerun without --non-interactive",
        ))
    }

    async fn prompt_secret(&self, _prompt: &str) -> AppResult<String> {
        Err(AppError::invalid_argument(
            "password input required; pass --no-password or rerun without --non-interactive",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::errors::ErrorType;
    use aiida::app::types::NodeRecord;

    #[tokio::test]
    async fn non_interactive_confirm_requires_yes_flag() {
        let interaction = NonInteractiveInteraction::new();
        let err = interaction.confirm("Delete?", "").await.unwrap_err();
        assert_eq!(err.kind, ErrorType::ConfirmationRequired);
        let err = interaction.prompt_line("Label: ", "").await.unwrap_err();
        assert_eq!(err.kind, ErrorType::InvalidArgument);
    }

    #[test]
    fn node_changes_report_action_and_count() {
        let node = NodeRecord {
            id: 5,
            uuid: "abc".to_string(),
            node_type: "data.int".to_string(),
            label: "five".to_string(),
            user_id: 1,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        };
        let value = result_to_json(&CommandResult::NodeCreated { node }).unwrap();
        assert_eq!(value["node"]["id"], 5);
        assert_eq!(value["node"]["label"], "five");
        let value = result_to_json(&CommandResult::Message {
            message: "Nothing to do".to_string(),
        })
        .unwrap();
        assert_eq!(value, json!({ "message": "Nothing to do" }));
    }

    #[test]
    fn profile_list_reports_active_profile() {
        let value = result_to_json(&CommandResult::ProfileList {
            profiles: vec![aiida::config::ProfileSummary {
                name: "main".to_string(),
                is_default: true,
                database_path: std::path::PathBuf::from("/db/main.sqlite"),
                default_user_email: None,
            }],
            active: Some("main".to_string()),
        })
        .unwrap();
        assert_eq!(value["active"], "main");
        assert_eq!(value["profiles"][0]["name"], "main");
        assert_eq!(value["profiles"][0]["is_default"], true);
        assert_eq!(value["profiles"][0]["database_path"], "/db/main.sqlite");
    }
}
