// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

mod console;
mod format;
mod prompt;

use async_trait::async_trait;

use aiida::app::usecases::{ComputerTestReport, ToggleOutcome, ToggleScope};

use crate::app::commands::CommandResult;
use crate::app::errors::{AppError, AppResult};
use crate::app::ports::{InteractionPort, OutputPort};
use console::{print_error_stderr, print_with_green_check_stdout, print_with_red_cross_stdout};
use format::{
    format_computer_details, format_computers_table, format_group_details, format_groups_table,
    format_node_comments, format_nodes_table, format_profiles_table, format_users_table,
};

pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }
}

fn green(message: &str) -> AppResult<()> {
    print_with_green_check_stdout(message).map_err(|err| AppError::local_error(err.to_string()))
}

fn toggle_message(outcome: &ToggleOutcome) -> String {
    let state = if outcome.enabled { "enabled" } else { "disabled" };
    let target = match &outcome.scope {
        ToggleScope::Global => String::new(),
        ToggleScope::User { email } => format!(" for user {email}"),
    };
    if outcome.changed {
        format!("Computer '{}' {state}{target}.", outcome.computer)
    } else {
        format!("Computer '{}' was already {state}{target}.", outcome.computer)
    }
}

fn render_test_report(report: &ComputerTestReport) -> AppResult<()> {
    println!(
        "Testing computer '{}' with the {} transport...",
        report.computer, report.transport
    );
    for step in &report.steps {
        let line = if step.detail.is_empty() {
            step.name.clone()
        } else {
            format!("{}: {}", step.name, step.detail)
        };
        let printed = if step.ok {
            print_with_green_check_stdout(&line)
        } else {
            print_with_red_cross_stdout(&line)
        };
        printed.map_err(|err| AppError::local_error(err.to_string()))?;
    }
    if report.success() {
        println!("All checks passed.");
    } else {
        eprintln!("Some checks failed.");
    }
    Ok(())
}

#[async_trait]
impl OutputPort for TerminalOutput {
    async fn render(&self, result: &CommandResult) -> AppResult<()> {
        match result {
            CommandResult::Message { message } => {
                println!("{message}");
            }
            CommandResult::UserList {
                users,
                default_email,
            } => {
                print!("{}", format_users_table(users, default_email.as_deref()));
            }
            CommandResult::UserConfigured {
                user,
                already_present,
            } => {
                let verb = if *already_present { "updated" } else { "created" };
                green(&format!("{} successfully {verb}.", user.full_name()))?;
            }
            CommandResult::ComputerSetup { computer } => {
                green(&format!(
                    "Computer<{}> {} created",
                    computer.id, computer.name
                ))?;
                println!(
                    "Note: before the computer can be used, configure it with: verdi computer configure {}",
                    computer.name
                );
            }
            CommandResult::ComputerList { computers } => {
                print!("{}", format_computers_table(computers));
            }
            CommandResult::ComputerDetails { status, users } => {
                print!("{}", format_computer_details(status, users));
            }
            CommandResult::ComputerToggle { outcome } => {
                let message = toggle_message(outcome);
                if outcome.changed {
                    green(&message)?;
                } else {
                    println!("{message}");
                }
            }
            CommandResult::ComputerConfigured { outcome } => {
                if outcome.already_present {
                    println!(
                        "Replacing the existing configuration of computer '{}' for user {}.",
                        outcome.computer, outcome.user
                    );
                }
                green(&format!(
                    "{} transport configured for computer '{}' and user {}.",
                    outcome.transport, outcome.computer, outcome.user
                ))?;
            }
            CommandResult::ComputerTest { report } => {
                render_test_report(report)?;
            }
            CommandResult::ComputerRenamed { old_name, computer } => {
                green(&format!(
                    "Computer '{old_name}' renamed to '{}'.",
                    computer.name
                ))?;
            }
            CommandResult::ComputerDeleted { computer } => {
                green(&format!("Computer '{}' deleted.", computer.name))?;
            }
            CommandResult::GroupList {
                groups,
                with_description,
            } => {
                print!("{}", format_groups_table(groups, *with_description));
            }
            CommandResult::GroupCreated { group, created } => {
                if *created {
                    green(&format!(
                        "Group created with PK = {} and name '{}'",
                        group.id, group.name
                    ))?;
                } else {
                    println!("Group '{}' already exists, PK = {}", group.name, group.id);
                }
            }
            CommandResult::GroupDetails { details, raw, uuid } => {
                print!("{}", format_group_details(details, *raw, *uuid));
            }
            CommandResult::GroupRenamed { old_name, group } => {
                green(&format!("Group '{old_name}' renamed to '{}'.", group.name))?;
            }
            CommandResult::GroupDescription { group } => {
                green(&format!("Changed the description of group '{}'.", group.name))?;
            }
            CommandResult::GroupDeleted { group } => {
                green(&format!("Group '{}' deleted.", group.name))?;
            }
            CommandResult::GroupNodesChanged {
                group,
                added,
                count,
            } => {
                let message = if *added {
                    format!("Added {count} node(s) to group '{}'.", group.name)
                } else {
                    format!("Removed {count} node(s) from group '{}'.", group.name)
                };
                green(&message)?;
            }
            CommandResult::NodeCreated { node } => {
                green(&format!(
                    "Node created with PK = {} and UUID = {}",
                    node.id, node.uuid
                ))?;
            }
            CommandResult::NodeList { nodes } => {
                print!("{}", format_nodes_table(nodes));
            }
            CommandResult::CommentsAdded { comments } => {
                for comment in comments {
                    green(&format!(
                        "Comment {} added to node {}",
                        comment.id, comment.node_id
                    ))?;
                }
            }
            CommandResult::CommentList { entries } => {
                print!("{}", format_node_comments(entries));
            }
            CommandResult::CommentUpdated { comment } => {
                green(&format!("Comment {} updated.", comment.id))?;
            }
            CommandResult::CommentRemoved { comment } => {
                green(&format!("Comment {} removed.", comment.id))?;
            }
            CommandResult::ProfileList { profiles, active } => {
                print!("{}", format_profiles_table(profiles, active.as_deref()));
            }
            CommandResult::ProfileDefaultSet { name } => {
                green(&format!("{name} set as default profile"))?;
            }
            CommandResult::ProfileDeleted {
                profile,
                database_removed,
            } => {
                green(&format!("Profile '{}' deleted.", profile.name))?;
                if *database_removed {
                    green(&format!(
                        "Database {} deleted.",
                        profile.database_path.display()
                    ))?;
                }
            }
        }
        Ok(())
    }

    async fn render_error(&self, error: &AppError) -> AppResult<()> {
        print_error_stderr(&error.message).map_err(|err| AppError::local_error(err.to_string()))
    }

    async fn info(&self, message: &str) -> AppResult<()> {
        println!("{message}");
        Ok(())
    }

    async fn warn(&self, message: &str) -> AppResult<()> {
        eprintln!("{message}");
        Ok(())
    }

    async fn success(&self, message: &str) -> AppResult<()> {
        green(message)
    }
}

pub struct TerminalInteraction;

impl TerminalInteraction {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl InteractionPort for TerminalInteraction {
    async fn confirm(&self, prompt: &str, help: &str) -> AppResult<bool> {
        prompt::confirm_action(prompt, help).map_err(|err| AppError::local_error(err.to_string()))
    }

    async fn prompt_line(&self, prompt: &str, help: &str) -> AppResult<String> {
        prompt::prompt_line(prompt, help).map_err(|err| AppError::local_error(err.to_string()))
    }

    async fn prompt_line_with_default(
        &self,
        prompt: &str,
        help: &str,
        default: &str,
    ) -> AppResult<String> {
        prompt::prompt_line_with_default(prompt, help, Some(default))
            .map_err(|err| AppError::local_error(err.to_string()))
    }

    async fn prompt_secret(&self, prompt: &str) -> AppResult<String> {
        prompt::prompt_secret(prompt).map_err(|err| AppError::local_error(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_messages_name_scope_and_state() {
        let mut outcome = ToggleOutcome {
            computer: "cluster".to_string(),
            scope: ToggleScope::User {
                email: "ada@example.org".to_string(),
            },
            enabled: false,
            changed: true,
        };
        assert_eq!(
            toggle_message(&outcome),
            "Computer 'cluster' disabled for user ada@example.org."
        );
        outcome.scope = ToggleScope::Global;
        outcome.enabled = true;
        outcome.changed = false;
        assert_eq!(
            toggle_message(&outcome),
            "Computer 'cluster' was already enabled."
        );
    }
}
