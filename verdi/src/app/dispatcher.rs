// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use crate::app::AppContext;
use crate::app::commands::{
    Command, CommentCommand, ComputerCommand, GroupCommand, NodeCommand, ProfileCommand,
    UserCommand,
};
use crate::app::errors::AppResult;
use crate::app::handlers;

pub struct Dispatcher {
    ctx: AppContext,
}

impl Dispatcher {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    pub async fn dispatch(&self, command: Command) -> AppResult<i32> {
        let result = match command {
            Command::User(cmd) => match cmd {
                UserCommand::Configure(cmd) => {
                    handlers::handle_user_configure(&self.ctx, cmd).await
                }
                UserCommand::List(cmd) => handlers::handle_user_list(&self.ctx, cmd).await,
            },
            Command::Computer(cmd) => match cmd {
                ComputerCommand::Setup(cmd) => {
                    handlers::handle_computer_setup(&self.ctx, cmd).await
                }
                ComputerCommand::List(cmd) => handlers::handle_computer_list(&self.ctx, cmd).await,
                ComputerCommand::Show(cmd) => handlers::handle_computer_show(&self.ctx, cmd).await,
                ComputerCommand::Rename(cmd) => {
                    handlers::handle_computer_rename(&self.ctx, cmd).await
                }
                ComputerCommand::Delete(cmd) => {
                    handlers::handle_computer_delete(&self.ctx, cmd).await
                }
                ComputerCommand::Enable(cmd) => {
                    handlers::handle_computer_enable(&self.ctx, cmd).await
                }
                ComputerCommand::Disable(cmd) => {
                    handlers::handle_computer_disable(&self.ctx, cmd).await
                }
                ComputerCommand::Configure(cmd) => {
                    handlers::handle_computer_configure(&self.ctx, cmd).await
                }
                ComputerCommand::Test(cmd) => handlers::handle_computer_test(&self.ctx, cmd).await,
            },
            Command::Group(cmd) => match cmd {
                GroupCommand::List(cmd) => handlers::handle_group_list(&self.ctx, cmd).await,
                GroupCommand::Create(cmd) => handlers::handle_group_create(&self.ctx, cmd).await,
                GroupCommand::Show(cmd) => handlers::handle_group_show(&self.ctx, cmd).await,
                GroupCommand::Rename(cmd) => handlers::handle_group_rename(&self.ctx, cmd).await,
                GroupCommand::Description(cmd) => {
                    handlers::handle_group_description(&self.ctx, cmd).await
                }
                GroupCommand::Delete(cmd) => handlers::handle_group_delete(&self.ctx, cmd).await,
                GroupCommand::AddNodes(cmd) => {
                    handlers::handle_group_add_nodes(&self.ctx, cmd).await
                }
                GroupCommand::RemoveNodes(cmd) => {
                    handlers::handle_group_remove_nodes(&self.ctx, cmd).await
                }
            },
            Command::Node(cmd) => match cmd {
                NodeCommand::Create(cmd) => handlers::handle_node_create(&self.ctx, cmd).await,
                NodeCommand::List(cmd) => handlers::handle_node_list(&self.ctx, cmd).await,
            },
            Command::Comment(cmd) => match cmd {
                CommentCommand::Add(cmd) => handlers::handle_comment_add(&self.ctx, cmd).await,
                CommentCommand::Show(cmd) => handlers::handle_comment_show(&self.ctx, cmd).await,
                CommentCommand::Update(cmd) => {
                    handlers::handle_comment_update(&self.ctx, cmd).await
                }
                CommentCommand::Remove(cmd) => {
                    handlers::handle_comment_remove(&self.ctx, cmd).await
                }
            },
            Command::Profile(cmd) => match cmd {
                ProfileCommand::List(cmd) => handlers::handle_profile_list(&self.ctx, cmd).await,
                ProfileCommand::SetDefault(cmd) => {
                    handlers::handle_profile_set_default(&self.ctx, cmd).await
                }
                ProfileCommand::Delete(cmd) => {
                    handlers::handle_profile_delete(&self.ctx, cmd).await
                }
            },
        };

        match result {
            Ok(output) => {
                self.ctx.output.render(&output).await?;
                Ok(output.exit_code())
            }
            Err(err) => {
                log::debug!("command failed: {} ({})", err.message, err.kind.as_str());
                self.ctx.output.render_error(&err).await?;
                Ok(err.exit_code)
            }
        }
    }
}
