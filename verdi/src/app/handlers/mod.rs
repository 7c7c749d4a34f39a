// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::collections::HashSet;

use aiida::app::types::{AuthParams, GroupRef, NodeRef, TransportType};
use aiida::app::usecases::GroupListRequest;

use crate::app::AppContext;
use crate::app::commands::*;
use crate::app::errors::{AppError, AppResult};
use crate::app::services::{
    ComputerSetupResolver, SshConfigureResolver, resolve_comment_content, resolve_group_type,
    resolve_user_configuration,
};

pub async fn handle_user_configure(
    ctx: &AppContext,
    cmd: ConfigureUserCommand,
) -> AppResult<CommandResult> {
    let existing = ctx
        .usecases
        .find_users(Some(cmd.email.trim()), None)
        .await?
        .into_iter()
        .next();

    let mut allow_existing = cmd.force_reconfigure;
    if existing.is_some() && !allow_existing && ctx.ui_mode.is_interactive() {
        let confirmed = ctx
            .interaction
            .confirm(
                &format!(
                    "User '{}' is already present. Update it? (yes/no): ",
                    cmd.email.trim()
                ),
                "Type yes to update the stored details, no to cancel.",
            )
            .await?;
        if !confirmed {
            return Ok(CommandResult::Message {
                message: "Configuration canceled.".to_string(),
            });
        }
        allow_existing = true;
    }

    let config = resolve_user_configuration(
        ctx.interaction.as_ref(),
        ctx.output.as_ref(),
        ctx.ui_mode,
        &cmd,
        existing.as_ref(),
    )
    .await?;
    let outcome = ctx.usecases.configure_user(&config, allow_existing).await?;
    Ok(CommandResult::UserConfigured {
        user: outcome.user,
        already_present: outcome.already_present,
    })
}

pub async fn handle_user_list(ctx: &AppContext, _cmd: ListUsersCommand) -> AppResult<CommandResult> {
    let users = ctx.usecases.all_users().await?;
    Ok(CommandResult::UserList {
        users,
        default_email: ctx.usecases.default_user_email().map(str::to_string),
    })
}

pub async fn handle_computer_setup(
    ctx: &AppContext,
    cmd: SetupComputerCommand,
) -> AppResult<CommandResult> {
    let existing_names: HashSet<String> = ctx
        .usecases
        .list_computers(None, true)
        .await?
        .into_iter()
        .map(|status| status.computer.name)
        .collect();
    let resolver = ComputerSetupResolver::new(
        ctx.interaction.as_ref(),
        ctx.output.as_ref(),
        ctx.editor.as_ref(),
        ctx.ui_mode,
    );
    let request = resolver.resolve(cmd, &existing_names).await?;
    let computer = ctx.usecases.setup_computer(&request).await?;
    Ok(CommandResult::ComputerSetup { computer })
}

pub async fn handle_computer_list(
    ctx: &AppContext,
    cmd: ListComputersCommand,
) -> AppResult<CommandResult> {
    let user = ctx.usecases.get_automatic_user().await?;
    let computers = ctx.usecases.list_computers(user.as_ref(), cmd.all).await?;
    Ok(CommandResult::ComputerList { computers })
}

pub async fn handle_computer_show(
    ctx: &AppContext,
    cmd: ShowComputerCommand,
) -> AppResult<CommandResult> {
    let user = ctx.usecases.get_automatic_user().await?;
    let status = ctx.usecases.computer_status(&cmd.name, user.as_ref()).await?;
    let users = ctx
        .usecases
        .configured_users(&cmd.name)
        .await?
        .into_iter()
        .map(|user| user.email)
        .collect();
    Ok(CommandResult::ComputerDetails { status, users })
}

pub async fn handle_computer_rename(
    ctx: &AppContext,
    cmd: RenameComputerCommand,
) -> AppResult<CommandResult> {
    let computer = ctx
        .usecases
        .rename_computer(&cmd.old_name, &cmd.new_name)
        .await?;
    Ok(CommandResult::ComputerRenamed {
        old_name: cmd.old_name,
        computer,
    })
}

pub async fn handle_computer_delete(
    ctx: &AppContext,
    cmd: DeleteComputerCommand,
) -> AppResult<CommandResult> {
    let computer = ctx.usecases.get_computer(&cmd.name).await?;
    if !cmd.yes {
        ctx.output
            .info(&format!(
                "WARNING:\nThis will delete computer '{}' and the configuration of every user for it.",
                computer.name
            ))
            .await?;
        let confirmed = ctx
            .interaction
            .confirm(
                "Continue with delete? (yes/no): ",
                "Type yes to confirm, no to cancel.",
            )
            .await?;
        if !confirmed {
            return Ok(CommandResult::Message {
                message: "Delete canceled.".to_string(),
            });
        }
    }
    let computer = ctx.usecases.delete_computer(&computer.name).await?;
    Ok(CommandResult::ComputerDeleted { computer })
}

pub async fn handle_computer_enable(
    ctx: &AppContext,
    cmd: ToggleComputerCommand,
) -> AppResult<CommandResult> {
    let outcome = ctx
        .usecases
        .enable_computer(&cmd.name, cmd.only_for_user.as_deref())
        .await?;
    Ok(CommandResult::ComputerToggle { outcome })
}

pub async fn handle_computer_disable(
    ctx: &AppContext,
    cmd: ToggleComputerCommand,
) -> AppResult<CommandResult> {
    let outcome = ctx
        .usecases
        .disable_computer(&cmd.name, cmd.only_for_user.as_deref())
        .await?;
    Ok(CommandResult::ComputerToggle { outcome })
}

pub async fn handle_computer_configure(
    ctx: &AppContext,
    cmd: ConfigureComputerCommand,
) -> AppResult<CommandResult> {
    let computer = ctx.usecases.get_computer(&cmd.name).await?;
    let user = ctx.usecases.resolve_user(None).await?;
    let configured = ctx.usecases.get_authinfo(&computer, &user).await?.is_some();

    if configured && !cmd.force_reconfigure && ctx.ui_mode.is_interactive() {
        let confirmed = ctx
            .interaction
            .confirm(
                &format!(
                    "Computer '{}' is already configured for user '{}'. Reconfigure? (yes/no): ",
                    computer.name, user.email
                ),
                "Type yes to overwrite the stored configuration, no to keep it.",
            )
            .await?;
        if !confirmed {
            return Ok(CommandResult::Message {
                message: "Configuration unchanged.".to_string(),
            });
        }
    }

    let params = match computer.transport_type {
        TransportType::Local => {
            if cmd.username.is_some()
                || cmd.port.is_some()
                || cmd.key_filename.is_some()
                || cmd.timeout.is_some()
            {
                return Err(AppError::invalid_argument(format!(
                    "computer '{}' uses the local transport, which takes no connection options",
                    computer.name
                )));
            }
            AuthParams::Local
        }
        TransportType::Ssh => {
            let current = ctx.usecases.ssh_params_for(&computer, &user).await?;
            let resolver = SshConfigureResolver::new(
                ctx.interaction.as_ref(),
                ctx.output.as_ref(),
                ctx.ui_mode,
            );
            AuthParams::Ssh(resolver.resolve(&cmd, current).await?)
        }
    };

    let outcome = ctx
        .usecases
        .configure_computer(&computer.name, Some(&user.email), &params)
        .await?;
    Ok(CommandResult::ComputerConfigured { outcome })
}

pub async fn handle_computer_test(
    ctx: &AppContext,
    cmd: TestComputerCommand,
) -> AppResult<CommandResult> {
    let report = ctx.usecases.test_computer(&cmd.name, None).await?;
    Ok(CommandResult::ComputerTest { report })
}

pub async fn handle_group_list(
    ctx: &AppContext,
    cmd: ListGroupsCommand,
) -> AppResult<CommandResult> {
    if cmd.all_users && cmd.user.is_some() {
        return Err(AppError::invalid_argument(
            "--all-users and --user cannot be used together",
        ));
    }
    let user_email = if cmd.all_users {
        None
    } else if let Some(email) = cmd.user {
        Some(email)
    } else {
        Some(ctx.usecases.resolve_user(None).await?.email)
    };
    let type_string = resolve_group_type(cmd.group_type.as_deref())?;
    let request = GroupListRequest {
        user_email,
        type_string: Some(type_string),
        node: cmd.node,
        past_days: cmd.past_days,
        name_filters: cmd.name_filters,
        with_counts: cmd.count,
    };
    let groups = ctx.usecases.query_groups(&request).await?;
    Ok(CommandResult::GroupList {
        groups,
        with_description: cmd.with_description,
    })
}

pub async fn handle_group_create(
    ctx: &AppContext,
    cmd: CreateGroupCommand,
) -> AppResult<CommandResult> {
    let (group, created) = ctx.usecases.create_group(&cmd.name, None).await?;
    Ok(CommandResult::GroupCreated { group, created })
}

pub async fn handle_group_show(
    ctx: &AppContext,
    cmd: ShowGroupCommand,
) -> AppResult<CommandResult> {
    let details = ctx.usecases.show_group(&cmd.group).await?;
    Ok(CommandResult::GroupDetails {
        details,
        raw: cmd.raw,
        uuid: cmd.uuid,
    })
}

pub async fn handle_group_rename(
    ctx: &AppContext,
    cmd: RenameGroupCommand,
) -> AppResult<CommandResult> {
    let current = ctx.usecases.resolve_group(&cmd.group).await?;
    let group = ctx
        .usecases
        .rename_group(&GroupRef::Pk(current.id), &cmd.new_name)
        .await?;
    Ok(CommandResult::GroupRenamed {
        old_name: current.name,
        group,
    })
}

pub async fn handle_group_description(
    ctx: &AppContext,
    cmd: GroupDescriptionCommand,
) -> AppResult<CommandResult> {
    let group = ctx
        .usecases
        .set_group_description(&cmd.group, &cmd.description)
        .await?;
    Ok(CommandResult::GroupDescription { group })
}

pub async fn handle_group_delete(
    ctx: &AppContext,
    cmd: DeleteGroupCommand,
) -> AppResult<CommandResult> {
    let group = ctx.usecases.resolve_group(&cmd.group).await?;
    let node_count = ctx.usecases.count_group_nodes(&group).await?;
    let refused = node_count > 0 && !cmd.force;
    if !cmd.yes && !refused {
        let confirmed = ctx
            .interaction
            .confirm(
                &format!(
                    "Are you sure to delete group '{}' (PK = {})? (yes/no): ",
                    group.name, group.id
                ),
                "Member nodes are kept. Type yes to confirm, no to cancel.",
            )
            .await?;
        if !confirmed {
            return Ok(CommandResult::Message {
                message: "Delete canceled.".to_string(),
            });
        }
    }
    let outcome = ctx.usecases.delete_group(&group, cmd.force).await?;
    Ok(CommandResult::GroupDeleted {
        group: outcome.group,
    })
}

pub async fn handle_group_add_nodes(
    ctx: &AppContext,
    cmd: GroupNodesCommand,
) -> AppResult<CommandResult> {
    change_group_nodes(ctx, cmd, true).await
}

pub async fn handle_group_remove_nodes(
    ctx: &AppContext,
    cmd: GroupNodesCommand,
) -> AppResult<CommandResult> {
    change_group_nodes(ctx, cmd, false).await
}

async fn change_group_nodes(
    ctx: &AppContext,
    cmd: GroupNodesCommand,
    add: bool,
) -> AppResult<CommandResult> {
    let group = ctx.usecases.resolve_group(&cmd.group).await?;
    let nodes = ctx.usecases.resolve_nodes(&cmd.nodes).await?;
    if !cmd.yes {
        let (verb, preposition) = if add { ("add", "to") } else { ("remove", "from") };
        let confirmed = ctx
            .interaction
            .confirm(
                &format!(
                    "Do you really want to {verb} {} nodes {preposition} group '{}'? (yes/no): ",
                    nodes.len(),
                    group.name
                ),
                "Type yes to confirm, no to cancel.",
            )
            .await?;
        if !confirmed {
            return Ok(CommandResult::Message {
                message: "Nothing changed.".to_string(),
            });
        }
    }
    let count = if add {
        ctx.usecases.add_nodes(&group, &cmd.nodes).await?
    } else {
        ctx.usecases.remove_nodes(&group, &cmd.nodes).await?
    };
    Ok(CommandResult::GroupNodesChanged {
        group,
        added: add,
        count,
    })
}

pub async fn handle_node_create(
    ctx: &AppContext,
    cmd: CreateNodeCommand,
) -> AppResult<CommandResult> {
    let node = ctx
        .usecases
        .create_node(&cmd.node_type, &cmd.label, None)
        .await?;
    Ok(CommandResult::NodeCreated { node })
}

pub async fn handle_node_list(ctx: &AppContext, _cmd: ListNodesCommand) -> AppResult<CommandResult> {
    let nodes = ctx.usecases.list_nodes().await?;
    Ok(CommandResult::NodeList { nodes })
}

/// Every node is resolved before any comment is written.
pub async fn handle_comment_add(
    ctx: &AppContext,
    cmd: AddCommentCommand,
) -> AppResult<CommandResult> {
    let nodes = ctx.usecases.resolve_nodes(&cmd.nodes).await?;
    let content = resolve_comment_content(ctx.editor.as_ref(), ctx.ui_mode, cmd.content, "")?;
    let mut comments = Vec::with_capacity(nodes.len());
    for node in nodes {
        comments.push(
            ctx.usecases
                .add_comment(&NodeRef::Pk(node.id), &content)
                .await?,
        );
    }
    Ok(CommandResult::CommentsAdded { comments })
}

pub async fn handle_comment_show(
    ctx: &AppContext,
    cmd: ShowCommentsCommand,
) -> AppResult<CommandResult> {
    let user = cmd.user.as_deref().map(str::trim);
    let mut entries = Vec::with_capacity(cmd.nodes.len());
    for node in &cmd.nodes {
        let mut entry = ctx.usecases.list_comments(node).await?;
        if let Some(email) = user {
            entry.comments.retain(|comment| comment.user_email == email);
        }
        entries.push(entry);
    }
    Ok(CommandResult::CommentList { entries })
}

pub async fn handle_comment_update(
    ctx: &AppContext,
    cmd: UpdateCommentCommand,
) -> AppResult<CommandResult> {
    let current = ctx.usecases.get_comment(cmd.id).await?;
    let content = resolve_comment_content(
        ctx.editor.as_ref(),
        ctx.ui_mode,
        cmd.content,
        &current.content,
    )?;
    let comment = ctx.usecases.update_comment(cmd.id, &content).await?;
    Ok(CommandResult::CommentUpdated { comment })
}

pub async fn handle_comment_remove(
    ctx: &AppContext,
    cmd: RemoveCommentCommand,
) -> AppResult<CommandResult> {
    let comment = ctx.usecases.get_comment(cmd.id).await?;
    if !cmd.yes {
        let confirmed = ctx
            .interaction
            .confirm(
                &format!(
                    "Delete comment {} on node {}? (yes/no): ",
                    comment.id, comment.node_id
                ),
                "Type yes to confirm, no to cancel.",
            )
            .await?;
        if !confirmed {
            return Ok(CommandResult::Message {
                message: "Delete canceled.".to_string(),
            });
        }
    }
    let comment = ctx.usecases.remove_comment(comment.id).await?;
    Ok(CommandResult::CommentRemoved { comment })
}

pub async fn handle_profile_list(
    ctx: &AppContext,
    _cmd: ListProfilesCommand,
) -> AppResult<CommandResult> {
    Ok(CommandResult::ProfileList {
        profiles: ctx.profiles.list_profiles()?,
        active: ctx.active_profile.clone(),
    })
}

pub async fn handle_profile_set_default(
    ctx: &AppContext,
    cmd: SetDefaultProfileCommand,
) -> AppResult<CommandResult> {
    ctx.profiles.set_default_profile(&cmd.name)?;
    Ok(CommandResult::ProfileDefaultSet { name: cmd.name })
}

/// The profile in use cannot be deleted: its database is open.
pub async fn handle_profile_delete(
    ctx: &AppContext,
    cmd: DeleteProfileCommand,
) -> AppResult<CommandResult> {
    if ctx.active_profile.as_deref() == Some(cmd.name.as_str()) {
        return Err(AppError::validation(format!(
            "Profile '{}' is in use; select another one with --profile to delete it",
            cmd.name
        )));
    }
    let profile = ctx
        .profiles
        .list_profiles()?
        .into_iter()
        .find(|profile| profile.name == cmd.name)
        .ok_or_else(|| AppError::not_existent(format!("Profile '{}' does not exist", cmd.name)))?;

    if !cmd.yes {
        let target = if cmd.include_db {
            format!(
                "profile '{}' and its database {}",
                profile.name,
                profile.database_path.display()
            )
        } else {
            format!("profile '{}'", profile.name)
        };
        let confirmed = ctx
            .interaction
            .confirm(
                &format!("Delete {target}? (yes/no): "),
                "Type yes to confirm, no to cancel.",
            )
            .await?;
        if !confirmed {
            return Ok(CommandResult::Message {
                message: "Delete canceled.".to_string(),
            });
        }
    }

    let profile = ctx.profiles.remove_profile(&profile.name)?;
    let database_removed = if cmd.include_db {
        ctx.profiles.remove_database(&profile.database_path)?
    } else {
        false
    };
    Ok(CommandResult::ProfileDeleted {
        profile,
        database_removed,
    })
}
