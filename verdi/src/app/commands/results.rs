// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use aiida::app::types::{CommentRecord, ComputerRecord, GroupRecord, NodeRecord, UserRecord};
use aiida::app::usecases::{
    ComputerStatus, ComputerTestReport, ConfigureComputerOutcome, GroupDetails, GroupSummary,
    NodeComments, ToggleOutcome,
};
use aiida::config::ProfileSummary;

#[derive(Debug, Clone)]
pub enum CommandResult {
    Message {
        message: String,
    },
    UserList {
        users: Vec<UserRecord>,
        default_email: Option<String>,
    },
    UserConfigured {
        user: UserRecord,
        already_present: bool,
    },
    ComputerSetup {
        computer: ComputerRecord,
    },
    ComputerList {
        computers: Vec<ComputerStatus>,
    },
    ComputerDetails {
        status: ComputerStatus,
        /// Emails of the users with an authinfo for the computer.
        users: Vec<String>,
    },
    ComputerToggle {
        outcome: ToggleOutcome,
    },
    ComputerConfigured {
        outcome: ConfigureComputerOutcome,
    },
    ComputerTest {
        report: ComputerTestReport,
    },
    ComputerRenamed {
        old_name: String,
        computer: ComputerRecord,
    },
    ComputerDeleted {
        computer: ComputerRecord,
    },
    GroupList {
        groups: Vec<GroupSummary>,
        with_description: bool,
    },
    GroupCreated {
        group: GroupRecord,
        created: bool,
    },
    GroupDetails {
        details: GroupDetails,
        raw: bool,
        uuid: bool,
    },
    GroupRenamed {
        old_name: String,
        group: GroupRecord,
    },
    GroupDescription {
        group: GroupRecord,
    },
    GroupDeleted {
        group: GroupRecord,
    },
    GroupNodesChanged {
        group: GroupRecord,
        added: bool,
        count: usize,
    },
    NodeCreated {
        node: NodeRecord,
    },
    NodeList {
        nodes: Vec<NodeRecord>,
    },
    CommentsAdded {
        comments: Vec<CommentRecord>,
    },
    CommentList {
        entries: Vec<NodeComments>,
    },
    CommentUpdated {
        comment: CommentRecord,
    },
    CommentRemoved {
        comment: CommentRecord,
    },
    ProfileList {
        profiles: Vec<ProfileSummary>,
        /// Profile loaded for this invocation.
        active: Option<String>,
    },
    ProfileDefaultSet {
        name: String,
    },
    ProfileDeleted {
        profile: ProfileSummary,
        database_removed: bool,
    },
}

impl CommandResult {
    /// Non-zero when the command ran but what it checked did not pass.
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandResult::ComputerTest { report } if !report.success() => {
                crate::app::errors::EXIT_CODE_OTHER
            }
            _ => 0,
        }
    }
}
