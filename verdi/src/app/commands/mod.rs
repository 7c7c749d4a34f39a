// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use aiida::app::types::{GroupRef, NameFilters, NodeRef};

mod results;

pub use results::CommandResult;

#[derive(Debug, Clone)]
pub enum Command {
    User(UserCommand),
    Computer(ComputerCommand),
    Group(GroupCommand),
    Node(NodeCommand),
    Comment(CommentCommand),
    Profile(ProfileCommand),
}

#[derive(Debug, Clone)]
pub enum UserCommand {
    Configure(ConfigureUserCommand),
    List(ListUsersCommand),
}

#[derive(Debug, Clone)]
pub struct ConfigureUserCommand {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub institution: Option<String>,
    pub no_password: bool,
    pub force_reconfigure: bool,
}

#[derive(Debug, Clone)]
pub struct ListUsersCommand;

#[derive(Debug, Clone)]
pub enum ComputerCommand {
    Setup(SetupComputerCommand),
    List(ListComputersCommand),
    Show(ShowComputerCommand),
    Rename(RenameComputerCommand),
    Delete(DeleteComputerCommand),
    Enable(ToggleComputerCommand),
    Disable(ToggleComputerCommand),
    Configure(ConfigureComputerCommand),
    Test(TestComputerCommand),
}

/// Values given on the command line. Missing ones are prompted for
/// interactively or rejected in non-interactive mode.
#[derive(Debug, Clone, Default)]
pub struct SetupComputerCommand {
    pub label: Option<String>,
    pub hostname: Option<String>,
    pub description: Option<String>,
    pub transport: Option<String>,
    pub scheduler: Option<String>,
    pub shebang: Option<String>,
    pub work_dir: Option<String>,
    pub mpirun_command: Option<String>,
    pub mpiprocs_per_machine: Option<i64>,
    pub prepend_text: Option<String>,
    pub append_text: Option<String>,
    /// `Some(false)` for `--disabled`, `Some(true)` for `--enabled`.
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct ListComputersCommand {
    pub all: bool,
}

#[derive(Debug, Clone)]
pub struct ShowComputerCommand {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct RenameComputerCommand {
    pub old_name: String,
    pub new_name: String,
}

#[derive(Debug, Clone)]
pub struct DeleteComputerCommand {
    pub name: String,
    pub yes: bool,
}

#[derive(Debug, Clone)]
pub struct ToggleComputerCommand {
    pub name: String,
    pub only_for_user: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ConfigureComputerCommand {
    pub name: String,
    pub username: Option<String>,
    pub port: Option<u16>,
    pub key_filename: Option<String>,
    pub timeout: Option<u64>,
    pub force_reconfigure: bool,
}

#[derive(Debug, Clone)]
pub struct TestComputerCommand {
    pub name: String,
}

#[derive(Debug, Clone)]
pub enum GroupCommand {
    List(ListGroupsCommand),
    Create(CreateGroupCommand),
    Show(ShowGroupCommand),
    Rename(RenameGroupCommand),
    Description(GroupDescriptionCommand),
    Delete(DeleteGroupCommand),
    AddNodes(GroupNodesCommand),
    RemoveNodes(GroupNodesCommand),
}

#[derive(Debug, Clone, Default)]
pub struct ListGroupsCommand {
    pub all_users: bool,
    pub user: Option<String>,
    pub group_type: Option<String>,
    pub with_description: bool,
    pub count: bool,
    pub past_days: Option<u32>,
    pub name_filters: NameFilters,
    pub node: Option<NodeRef>,
}

#[derive(Debug, Clone)]
pub struct CreateGroupCommand {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct ShowGroupCommand {
    pub group: GroupRef,
    pub raw: bool,
    pub uuid: bool,
}

#[derive(Debug, Clone)]
pub struct RenameGroupCommand {
    pub group: GroupRef,
    pub new_name: String,
}

#[derive(Debug, Clone)]
pub struct GroupDescriptionCommand {
    pub group: GroupRef,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct DeleteGroupCommand {
    pub group: GroupRef,
    pub force: bool,
    pub yes: bool,
}

#[derive(Debug, Clone)]
pub struct GroupNodesCommand {
    pub group: GroupRef,
    pub nodes: Vec<NodeRef>,
    pub yes: bool,
}

#[derive(Debug, Clone)]
pub enum NodeCommand {
    Create(CreateNodeCommand),
    List(ListNodesCommand),
}

#[derive(Debug, Clone)]
pub struct CreateNodeCommand {
    pub node_type: String,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct ListNodesCommand;

#[derive(Debug, Clone)]
pub enum CommentCommand {
    Add(AddCommentCommand),
    Show(ShowCommentsCommand),
    Update(UpdateCommentCommand),
    Remove(RemoveCommentCommand),
}

#[derive(Debug, Clone)]
pub struct AddCommentCommand {
    pub nodes: Vec<NodeRef>,
    /// Edited interactively when missing.
    pub content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ShowCommentsCommand {
    pub nodes: Vec<NodeRef>,
    pub user: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateCommentCommand {
    pub id: i64,
    pub content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RemoveCommentCommand {
    pub id: i64,
    pub yes: bool,
}

#[derive(Debug, Clone)]
pub enum ProfileCommand {
    List(ListProfilesCommand),
    SetDefault(SetDefaultProfileCommand),
    Delete(DeleteProfileCommand),
}

#[derive(Debug, Clone)]
pub struct ListProfilesCommand;

#[derive(Debug, Clone)]
pub struct SetDefaultProfileCommand {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct DeleteProfileCommand {
    pub name: String,
    pub include_db: bool,
    pub yes: bool,
}
