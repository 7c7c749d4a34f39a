// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

pub mod args;

use aiida::app::types::NameFilters;

use crate::app::commands::*;
use args::{Cli, Cmd, CommentCmd, ComputerCmd, GroupCmd, NodeCmd, ProfileCmd, UserCmd};

pub fn command_from_cli(cli: Cli) -> Command {
    match cli.cmd {
        Cmd::User(user_args) => Command::User(match user_args.cmd {
            UserCmd::Configure(args) => UserCommand::Configure(ConfigureUserCommand {
                email: args.email,
                first_name: args.first_name,
                last_name: args.last_name,
                institution: args.institution,
                no_password: args.no_password,
                force_reconfigure: args.force_reconfigure,
            }),
            UserCmd::List => UserCommand::List(ListUsersCommand),
        }),
        Cmd::Computer(computer_args) => Command::Computer(match computer_args.cmd {
            ComputerCmd::Setup(args) => ComputerCommand::Setup(SetupComputerCommand {
                label: args.label,
                hostname: args.hostname,
                description: args.description,
                transport: args.transport,
                scheduler: args.scheduler,
                shebang: args.shebang,
                work_dir: args.work_dir,
                mpirun_command: args.mpirun_command,
                mpiprocs_per_machine: args.mpiprocs_per_machine,
                prepend_text: args.prepend_text,
                append_text: args.append_text,
                enabled: match (args.enabled, args.disabled) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
            }),
            ComputerCmd::List(args) => {
                ComputerCommand::List(ListComputersCommand { all: args.all })
            }
            ComputerCmd::Show(args) => {
                ComputerCommand::Show(ShowComputerCommand { name: args.name })
            }
            ComputerCmd::Rename(args) => ComputerCommand::Rename(RenameComputerCommand {
                old_name: args.old_name,
                new_name: args.new_name,
            }),
            ComputerCmd::Delete(args) => ComputerCommand::Delete(DeleteComputerCommand {
                name: args.name,
                yes: args.yes,
            }),
            ComputerCmd::Enable(args) => ComputerCommand::Enable(ToggleComputerCommand {
                name: args.name,
                only_for_user: args.only_for_user,
            }),
            ComputerCmd::Disable(args) => ComputerCommand::Disable(ToggleComputerCommand {
                name: args.name,
                only_for_user: args.only_for_user,
            }),
            ComputerCmd::Configure(args) => {
                ComputerCommand::Configure(ConfigureComputerCommand {
                    name: args.name,
                    username: args.username,
                    port: args.port,
                    key_filename: args.key_filename,
                    timeout: args.timeout,
                    force_reconfigure: args.force_reconfigure,
                })
            }
            ComputerCmd::Test(args) => {
                ComputerCommand::Test(TestComputerCommand { name: args.name })
            }
        }),
        Cmd::Group(group_args) => Command::Group(match group_args.cmd {
            GroupCmd::List(args) => GroupCommand::List(ListGroupsCommand {
                all_users: args.all_users,
                user: args.user,
                group_type: args.group_type,
                with_description: args.with_description,
                count: args.count,
                past_days: args.past_days,
                name_filters: NameFilters {
                    startswith: args.startswith,
                    endswith: args.endswith,
                    contains: args.contains,
                },
                node: args.node,
            }),
            GroupCmd::Create(args) => GroupCommand::Create(CreateGroupCommand { name: args.name }),
            GroupCmd::Show(args) => GroupCommand::Show(ShowGroupCommand {
                group: args.group,
                raw: args.raw,
                uuid: args.uuid,
            }),
            GroupCmd::Rename(args) => GroupCommand::Rename(RenameGroupCommand {
                group: args.group,
                new_name: args.new_name,
            }),
            GroupCmd::Description(args) => GroupCommand::Description(GroupDescriptionCommand {
                group: args.group,
                description: args.description,
            }),
            GroupCmd::Delete(args) => GroupCommand::Delete(DeleteGroupCommand {
                group: args.group,
                force: args.force,
                yes: args.yes,
            }),
            GroupCmd::Addnodes(args) => GroupCommand::AddNodes(GroupNodesCommand {
                group: args.group,
                nodes: args.nodes,
                yes: args.yes,
            }),
            GroupCmd::Removenodes(args) => GroupCommand::RemoveNodes(GroupNodesCommand {
                group: args.group,
                nodes: args.nodes,
                yes: args.yes,
            }),
        }),
        Cmd::Node(node_args) => Command::Node(match node_args.cmd {
            NodeCmd::Create(args) => NodeCommand::Create(CreateNodeCommand {
                node_type: args.node_type,
                label: args.label,
            }),
            NodeCmd::List => NodeCommand::List(ListNodesCommand),
        }),
        Cmd::Comment(comment_args) => Command::Comment(match comment_args.cmd {
            CommentCmd::Add(args) => CommentCommand::Add(AddCommentCommand {
                nodes: args.nodes,
                content: args.content,
            }),
            CommentCmd::Show(args) => CommentCommand::Show(ShowCommentsCommand {
                nodes: args.nodes,
                user: args.user,
            }),
            CommentCmd::Update(args) => CommentCommand::Update(UpdateCommentCommand {
                id: args.id,
                content: args.content,
            }),
            CommentCmd::Remove(args) => CommentCommand::Remove(RemoveCommentCommand {
                id: args.id,
                yes: args.yes,
            }),
        }),
        Cmd::Profile(profile_args) => Command::Profile(match profile_args.cmd {
            ProfileCmd::List => ProfileCommand::List(ListProfilesCommand),
            ProfileCmd::Setdefault(args) => {
                ProfileCommand::SetDefault(SetDefaultProfileCommand { name: args.name })
            }
            ProfileCmd::Delete(args) => ProfileCommand::Delete(DeleteProfileCommand {
                name: args.name,
                include_db: args.include_db,
                yes: args.yes,
            }),
        }),
        Cmd::Completions(_) => {
            unreachable!("completions handled before dispatcher")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn setup_flags_map_to_enabled_override() {
        let cli = Cli::parse_from(["verdi", "computer", "setup", "--disabled"]);
        match command_from_cli(cli) {
            Command::Computer(ComputerCommand::Setup(cmd)) => assert_eq!(cmd.enabled, Some(false)),
            _ => panic!("expected setup command"),
        }
        let cli = Cli::parse_from(["verdi", "computer", "setup"]);
        match command_from_cli(cli) {
            Command::Computer(ComputerCommand::Setup(cmd)) => assert_eq!(cmd.enabled, None),
            _ => panic!("expected setup command"),
        }
    }

    #[test]
    fn group_list_name_filters_are_collected() {
        let cli = Cli::parse_from(["verdi", "group", "list", "-s", "run", "-c", "_", "-C"]);
        match command_from_cli(cli) {
            Command::Group(GroupCommand::List(cmd)) => {
                assert_eq!(cmd.name_filters.startswith.as_deref(), Some("run"));
                assert_eq!(cmd.name_filters.contains.as_deref(), Some("_"));
                assert_eq!(cmd.name_filters.endswith, None);
                assert!(cmd.count);
            }
            _ => panic!("expected group list command"),
        }
    }

    #[test]
    fn comment_update_without_content_defers_to_editor() {
        let cli = Cli::parse_from(["verdi", "comment", "update", "7"]);
        match command_from_cli(cli) {
            Command::Comment(CommentCommand::Update(cmd)) => {
                assert_eq!(cmd.id, 7);
                assert!(cmd.content.is_none());
            }
            _ => panic!("expected comment update command"),
        }
    }
}
