// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::path::PathBuf;

use aiida::app::types::{GroupRef, NodeRef};
use aiida::app::usecases::DEFAULT_NODE_TYPE;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "verdi", version, about, long_about = None)]
pub struct Cli {
    #[arg(
        long,
        value_name = "PATH",
        help = "Path to a TOML config file. When omitted, verdi uses AIIDA_CONFIG_PATH if set, otherwise the default config file location if available."
    )]
    pub config: Option<PathBuf>,
    /// Profile to load, overriding AIIDA_PROFILE and default_profile.
    #[arg(short = 'p', long, value_name = "NAME")]
    pub profile: Option<String>,
    /// Path to the SQLite database, overriding the configured one.
    #[arg(long, value_name = "PATH")]
    pub database: Option<PathBuf>,
    /// Email of the user to act as, overriding default_user_email.
    #[arg(long, value_name = "EMAIL")]
    pub user: Option<String>,
    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
    #[arg(
        long,
        global = true,
        help = "Never prompt; fail when a value or confirmation is missing."
    )]
    pub non_interactive: bool,
    /// Print results and errors as JSON.
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Manage users.
    User(UserArgs),
    /// Set up, configure and test computers.
    Computer(ComputerArgs),
    /// Create, inspect and manage groups of nodes.
    Group(GroupArgs),
    /// Create and list nodes.
    Node(NodeArgs),
    /// Add, show, update and remove comments on nodes.
    Comment(CommentArgs),
    /// Inspect and manage the profiles of the config file.
    Profile(ProfileArgs),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(Args, Debug)]
pub struct UserArgs {
    #[command(subcommand)]
    pub cmd: UserCmd,
}

#[derive(Subcommand, Debug)]
pub enum UserCmd {
    /// Create a user or update an existing one.
    Configure(UserConfigureArgs),
    /// List every user.
    List,
}

#[derive(Args, Debug)]
pub struct UserConfigureArgs {
    pub email: String,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub institution: Option<String>,
    /// Do not ask for a password; the user keeps an unusable one.
    #[arg(long)]
    pub no_password: bool,
    /// Update the user without asking when it already exists.
    #[arg(long)]
    pub force_reconfigure: bool,
}

#[derive(Args, Debug)]
pub struct ComputerArgs {
    #[command(subcommand)]
    pub cmd: ComputerCmd,
}

#[derive(Subcommand, Debug)]
pub enum ComputerCmd {
    /// Add a new computer.
    Setup(ComputerSetupArgs),
    /// List computers and their state for the current user.
    List(ComputerListArgs),
    /// Show the details of a computer.
    Show(ComputerNameArgs),
    /// Rename a computer.
    Rename(ComputerRenameArgs),
    /// Delete a computer and its per-user configuration.
    Delete(ComputerDeleteArgs),
    /// Enable a computer, globally or for one user.
    Enable(ComputerToggleArgs),
    /// Disable a computer, globally or for one user.
    Disable(ComputerToggleArgs),
    /// Configure the connection of the current user to a computer.
    Configure(ComputerConfigureArgs),
    /// Check that a computer can be reached and used.
    Test(ComputerNameArgs),
}

#[derive(Args, Debug)]
pub struct ComputerSetupArgs {
    /// Unique name of the computer.
    #[arg(short = 'L', long)]
    pub label: Option<String>,
    #[arg(short = 'H', long)]
    pub hostname: Option<String>,
    #[arg(short = 'D', long)]
    pub description: Option<String>,
    /// Transport plugin: local or ssh.
    #[arg(short = 'T', long)]
    pub transport: Option<String>,
    /// Scheduler plugin: direct, torque, pbspro, slurm, sge or lsf.
    #[arg(short = 'S', long)]
    pub scheduler: Option<String>,
    #[arg(long)]
    pub shebang: Option<String>,
    /// Work directory; '{username}' is replaced by the remote user name.
    #[arg(short = 'w', long)]
    pub work_dir: Option<String>,
    #[arg(short = 'm', long)]
    pub mpirun_command: Option<String>,
    /// Default number of MPI processes per machine; 0 leaves it unspecified.
    #[arg(long, allow_negative_numbers = true)]
    pub mpiprocs_per_machine: Option<i64>,
    #[arg(long)]
    pub prepend_text: Option<String>,
    #[arg(long)]
    pub append_text: Option<String>,
    #[arg(long, conflicts_with = "disabled")]
    pub enabled: bool,
    #[arg(long)]
    pub disabled: bool,
}

#[derive(Args, Debug)]
pub struct ComputerListArgs {
    /// Include globally disabled computers.
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct ComputerNameArgs {
    pub name: String,
}

#[derive(Args, Debug)]
pub struct ComputerRenameArgs {
    pub old_name: String,
    pub new_name: String,
}

#[derive(Args, Debug)]
pub struct ComputerDeleteArgs {
    pub name: String,
    /// Skip the confirmation prompt.
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct ComputerToggleArgs {
    pub name: String,
    /// Only change the flag of this user.
    #[arg(short = 'u', long, value_name = "EMAIL")]
    pub only_for_user: Option<String>,
}

#[derive(Args, Debug)]
pub struct ComputerConfigureArgs {
    pub name: String,
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub port: Option<u16>,
    #[arg(long, value_name = "PATH")]
    pub key_filename: Option<String>,
    /// Connection timeout in seconds.
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
    /// Overwrite an existing configuration without asking.
    #[arg(long)]
    pub force_reconfigure: bool,
}

#[derive(Args, Debug)]
pub struct GroupArgs {
    #[command(subcommand)]
    pub cmd: GroupCmd,
}

#[derive(Subcommand, Debug)]
pub enum GroupCmd {
    /// List groups.
    List(GroupListArgs),
    /// Create a user-defined group, or report the existing one.
    Create(GroupCreateArgs),
    /// Show a group and its nodes.
    Show(GroupShowArgs),
    /// Rename a group.
    Rename(GroupRenameArgs),
    /// Set the description of a group.
    Description(GroupDescriptionArgs),
    /// Delete a group. Its nodes are kept.
    Delete(GroupDeleteArgs),
    /// Add nodes to a group.
    Addnodes(GroupNodesArgs),
    /// Remove nodes from a group.
    Removenodes(GroupNodesArgs),
}

#[derive(Args, Debug)]
pub struct GroupListArgs {
    /// Show groups of every user.
    #[arg(short = 'A', long, conflicts_with = "user")]
    pub all_users: bool,
    /// Show groups of this user instead of the current one.
    #[arg(short = 'u', long, value_name = "EMAIL")]
    pub user: Option<String>,
    /// Group type: data.upf, import or work. User-defined groups when omitted.
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub group_type: Option<String>,
    /// Show the description column.
    #[arg(short = 'd', long)]
    pub with_description: bool,
    /// Show the number of nodes in each group.
    #[arg(short = 'C', long)]
    pub count: bool,
    /// Only groups created in the last DAYS days.
    #[arg(short = 'p', long, value_name = "DAYS")]
    pub past_days: Option<u32>,
    #[arg(short = 's', long, value_name = "STRING")]
    pub startswith: Option<String>,
    #[arg(short = 'e', long, value_name = "STRING")]
    pub endswith: Option<String>,
    #[arg(short = 'c', long, value_name = "STRING")]
    pub contains: Option<String>,
    /// Only groups containing this node (PK or UUID).
    #[arg(short = 'n', long, value_name = "NODE")]
    pub node: Option<NodeRef>,
}

#[derive(Args, Debug)]
pub struct GroupCreateArgs {
    pub name: String,
}

#[derive(Args, Debug)]
pub struct GroupShowArgs {
    /// Group PK or name.
    pub group: GroupRef,
    /// Print only the node identifiers, one per line.
    #[arg(short, long)]
    pub raw: bool,
    /// Show node UUIDs instead of PKs.
    #[arg(short, long)]
    pub uuid: bool,
}

#[derive(Args, Debug)]
pub struct GroupRenameArgs {
    pub group: GroupRef,
    pub new_name: String,
}

#[derive(Args, Debug)]
pub struct GroupDescriptionArgs {
    pub group: GroupRef,
    pub description: String,
}

#[derive(Args, Debug)]
pub struct GroupDeleteArgs {
    pub group: GroupRef,
    /// Delete the group even when it still has nodes.
    #[arg(short, long)]
    pub force: bool,
    /// Skip the confirmation prompt.
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct GroupNodesArgs {
    pub group: GroupRef,
    /// Node PKs or UUIDs.
    #[arg(required = true, num_args = 1..)]
    pub nodes: Vec<NodeRef>,
    /// Skip the confirmation prompt.
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct NodeArgs {
    #[command(subcommand)]
    pub cmd: NodeCmd,
}

#[derive(Subcommand, Debug)]
pub enum NodeCmd {
    /// Store a new node.
    Create(NodeCreateArgs),
    /// List stored nodes.
    List,
}

#[derive(Args, Debug)]
pub struct NodeCreateArgs {
    #[arg(long = "type", default_value = DEFAULT_NODE_TYPE)]
    pub node_type: String,
    #[arg(long, default_value = "")]
    pub label: String,
}

#[derive(Args, Debug)]
pub struct CommentArgs {
    #[command(subcommand)]
    pub cmd: CommentCmd,
}

#[derive(Subcommand, Debug)]
pub enum CommentCmd {
    /// Add a comment to one or more nodes.
    Add(CommentAddArgs),
    /// Show the comments of nodes.
    Show(CommentShowArgs),
    /// Replace the content of a comment.
    Update(CommentUpdateArgs),
    /// Remove a comment.
    Remove(CommentRemoveArgs),
}

#[derive(Args, Debug)]
pub struct CommentAddArgs {
    /// Node PKs or UUIDs.
    #[arg(short = 'N', long = "nodes", required = true, num_args = 1..)]
    pub nodes: Vec<NodeRef>,
    /// Comment text. Opens the editor when omitted.
    #[arg(short, long)]
    pub content: Option<String>,
}

#[derive(Args, Debug)]
pub struct CommentShowArgs {
    #[arg(required = true, num_args = 1..)]
    pub nodes: Vec<NodeRef>,
    /// Only comments written by this user.
    #[arg(short = 'u', long, value_name = "EMAIL")]
    pub user: Option<String>,
}

#[derive(Args, Debug)]
pub struct CommentUpdateArgs {
    pub id: i64,
    /// New text. Opens the editor on the current text when omitted.
    #[arg(short, long)]
    pub content: Option<String>,
}

#[derive(Args, Debug)]
pub struct CommentRemoveArgs {
    pub id: i64,
    /// Skip the confirmation prompt.
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub cmd: ProfileCmd,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCmd {
    /// List the configured profiles.
    List,
    /// Make a profile the default one.
    Setdefault(ProfileNameArgs),
    /// Remove a profile from the config file.
    Delete(ProfileDeleteArgs),
}

#[derive(Args, Debug)]
pub struct ProfileNameArgs {
    pub name: String,
}

#[derive(Args, Debug)]
pub struct ProfileDeleteArgs {
    pub name: String,
    /// Also delete the database file of the profile.
    #[arg(long)]
    pub include_db: bool,
    /// Skip the confirmation prompt.
    #[arg(long, short = 'y')]
    pub yes: bool,
}
