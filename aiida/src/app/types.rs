// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::app::services::schedulers::SchedulerType;

/// Payload for creating or reconfiguring a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub institution: String,
    /// Argon2 PHC string; `None` is the unusable-password sentinel.
    pub password_hash: Option<String>,
    pub is_active: bool,
}

impl NewUser {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            first_name: String::new(),
            last_name: String::new(),
            institution: String::new(),
            password_hash: None,
            is_active: true,
        }
    }
}

/// Full stored user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub institution: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub is_active: bool,
    pub date_joined: String, // RFC3339
    pub last_login: Option<String>,
}

impl UserRecord {
    pub fn full_name(&self) -> String {
        let first = self.first_name.trim();
        let last = self.last_name.trim();
        match (first.is_empty(), last.is_empty()) {
            (false, false) => format!("{first} {last} ({})", self.email),
            (false, true) => format!("{first} ({})", self.email),
            (true, false) => format!("{last} ({})", self.email),
            (true, true) => self.email.clone(),
        }
    }

    pub fn has_usable_password(&self) -> bool {
        self.password_hash.is_some()
    }
}

/// Lookup filter for users. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub email: Option<String>,
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    Local,
    Ssh,
}

impl TransportType {
    pub const ALL: [TransportType; 2] = [TransportType::Local, TransportType::Ssh];

    pub fn as_str(self) -> &'static str {
        match self {
            TransportType::Local => "local",
            TransportType::Ssh => "ssh",
        }
    }
}

impl fmt::Display for TransportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "local" => Ok(Self::Local),
            "ssh" => Ok(Self::Ssh),
            other => Err(format!("'{other}' is not valid")),
        }
    }
}

/// Payload for creating a computer. Values are expected to be validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComputer {
    pub name: String,
    pub hostname: String,
    pub description: String,
    pub transport_type: TransportType,
    pub scheduler_type: SchedulerType,
    pub workdir: String,
    pub mpirun_command: Vec<String>,
    pub default_mpiprocs_per_machine: Option<u32>,
    pub shebang: String,
    pub prepend_text: String,
    pub append_text: String,
    pub enabled: bool,
}

/// Full stored computer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputerRecord {
    pub id: i64,
    pub uuid: String,
    pub name: String,
    pub hostname: String,
    pub description: String,
    pub transport_type: TransportType,
    pub scheduler_type: SchedulerType,
    pub workdir: String,
    pub mpirun_command: Vec<String>,
    pub default_mpiprocs_per_machine: Option<u32>,
    pub shebang: String,
    pub prepend_text: String,
    pub append_text: String,
    /// Global flag. Per-user state lives on [`AuthInfoRecord::enabled`].
    pub enabled: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAuthInfo {
    pub user_id: i64,
    pub computer_id: i64,
    pub enabled: bool,
    pub auth_params: JsonValue,
}

/// Per-user, per-computer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthInfoRecord {
    pub id: i64,
    pub user_id: i64,
    pub computer_id: i64,
    pub enabled: bool,
    pub auth_params: JsonValue,
    pub updated_at: String,
}

pub const DEFAULT_SSH_PORT: u16 = 22;
pub const DEFAULT_SSH_TIMEOUT_SECS: u64 = 10;

/// Connection parameters kept in the authinfo payload of ssh computers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshAuthParams {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default = "default_ssh_port")]
    pub port: u16,
    #[serde(default)]
    pub key_filename: Option<String>,
    #[serde(default = "default_ssh_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SshAuthParams {
    fn default() -> Self {
        Self {
            username: None,
            port: DEFAULT_SSH_PORT,
            key_filename: None,
            timeout_secs: DEFAULT_SSH_TIMEOUT_SECS,
        }
    }
}

fn default_ssh_port() -> u16 {
    DEFAULT_SSH_PORT
}

fn default_ssh_timeout_secs() -> u64 {
    DEFAULT_SSH_TIMEOUT_SECS
}

/// Values accepted by `configure`, per transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthParams {
    Local,
    Ssh(SshAuthParams),
}

impl AuthParams {
    pub fn to_json(&self) -> JsonValue {
        match self {
            AuthParams::Local => JsonValue::Object(Default::default()),
            AuthParams::Ssh(params) => {
                serde_json::to_value(params).unwrap_or(JsonValue::Null)
            }
        }
    }
}

/// Empty type string marks a user-defined group.
pub const USER_DEFINED_GROUP_TYPE: &str = "";

/// Short aliases accepted on the command line, mapped to stored type strings.
pub const GROUP_TYPE_ALIASES: [(&str, &str); 3] = [
    ("data.upf", "data.upf.family"),
    ("import", "auto.import"),
    ("work", "auto.run"),
];

pub fn group_type_for_alias(alias: &str) -> Option<&'static str> {
    GROUP_TYPE_ALIASES
        .iter()
        .find(|(key, _)| *key == alias)
        .map(|(_, value)| *value)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    pub name: String,
    pub type_string: String,
    pub description: String,
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub id: i64,
    pub uuid: String,
    pub name: String,
    pub type_string: String,
    pub description: String,
    pub user_id: i64,
    pub user_email: String,
    pub created_at: String,
}

impl GroupRecord {
    pub fn is_user_defined(&self) -> bool {
        self.type_string == USER_DEFINED_GROUP_TYPE
    }
}

/// Name predicates; every one that is set must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameFilters {
    pub startswith: Option<String>,
    pub endswith: Option<String>,
    pub contains: Option<String>,
}

impl NameFilters {
    pub fn matches(&self, name: &str) -> bool {
        self.startswith
            .as_deref()
            .is_none_or(|prefix| name.starts_with(prefix))
            && self
                .endswith
                .as_deref()
                .is_none_or(|suffix| name.ends_with(suffix))
            && self
                .contains
                .as_deref()
                .is_none_or(|needle| name.contains(needle))
    }
}

/// Store-level group query. All set fields are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupQuery {
    pub user_id: Option<i64>,
    pub type_string: Option<String>,
    /// Groups must contain every one of these nodes.
    pub node_ids: Vec<i64>,
    /// Lower bound on the creation timestamp, in stored timestamp format.
    pub created_after: Option<String>,
    pub name_filters: NameFilters,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNode {
    pub node_type: String,
    pub label: String,
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: i64,
    pub uuid: String,
    pub node_type: String,
    pub label: String,
    pub user_id: i64,
    pub created_at: String,
}

/// A reference to a node as typed by a user: numeric PK or UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Pk(i64),
    Uuid(String),
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRef::Pk(pk) => write!(f, "{pk}"),
            NodeRef::Uuid(uuid) => f.write_str(uuid),
        }
    }
}

impl FromStr for NodeRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("node identifier cannot be empty".to_string());
        }
        if let Ok(pk) = trimmed.parse::<i64>() {
            return Ok(NodeRef::Pk(pk));
        }
        Ok(NodeRef::Uuid(trimmed.to_ascii_lowercase()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub node_id: i64,
    pub user_id: i64,
    pub content: String,
}

/// A free-text note attached to a node by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: i64,
    pub uuid: String,
    pub node_id: i64,
    pub user_id: i64,
    pub user_email: String,
    pub content: String,
    pub ctime: String,
    pub mtime: String,
}

impl fmt::Display for CommentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Comment<{}> for node<{}> and user<{}>: {}",
            self.uuid, self.node_id, self.user_email, self.content
        )
    }
}

/// A reference to a group: numeric PK or name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupRef {
    Pk(i64),
    Name(String),
}

impl fmt::Display for GroupRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupRef::Pk(pk) => write!(f, "{pk}"),
            GroupRef::Name(name) => f.write_str(name),
        }
    }
}

impl FromStr for GroupRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("group identifier cannot be empty".to_string());
        }
        match trimmed.parse::<i64>() {
            Ok(pk) => Ok(GroupRef::Pk(pk)),
            Err(_) => Ok(GroupRef::Name(trimmed.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: &str, last: &str) -> UserRecord {
        UserRecord {
            id: 1,
            email: "ada@example.org".to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            institution: String::new(),
            password_hash: None,
            is_active: true,
            date_joined: "2026-01-01T00:00:00.000Z".to_string(),
            last_login: None,
        }
    }

    #[test]
    fn full_name_covers_every_name_combination() {
        assert_eq!(
            user("Ada", "Lovelace").full_name(),
            "Ada Lovelace (ada@example.org)"
        );
        assert_eq!(user("Ada", "").full_name(), "Ada (ada@example.org)");
        assert_eq!(user("", "Lovelace").full_name(), "Lovelace (ada@example.org)");
        assert_eq!(user(" ", "").full_name(), "ada@example.org");
    }

    #[test]
    fn transport_type_rejects_unknown_values() {
        assert_eq!("ssh".parse::<TransportType>(), Ok(TransportType::Ssh));
        let err = "unknown_transport".parse::<TransportType>().unwrap_err();
        assert_eq!(err, "'unknown_transport' is not valid");
    }

    #[test]
    fn node_ref_parses_pk_or_uuid() {
        assert_eq!("42".parse::<NodeRef>(), Ok(NodeRef::Pk(42)));
        assert_eq!(
            "ABCDEF".parse::<NodeRef>(),
            Ok(NodeRef::Uuid("abcdef".to_string()))
        );
        assert!("  ".parse::<NodeRef>().is_err());
    }

    #[test]
    fn group_ref_parses_pk_or_name() {
        assert_eq!("7".parse::<GroupRef>(), Ok(GroupRef::Pk(7)));
        assert_eq!(
            "relaxations".parse::<GroupRef>(),
            Ok(GroupRef::Name("relaxations".to_string()))
        );
    }

    #[test]
    fn name_filters_and_together() {
        let filters = NameFilters {
            startswith: Some("run".to_string()),
            endswith: Some("_ok".to_string()),
            contains: None,
        };
        assert!(filters.matches("run_42_ok"));
        assert!(!filters.matches("run_42"));
        assert!(!filters.matches("walk_ok"));
        assert!(NameFilters::default().matches("anything"));
    }

    #[test]
    fn group_type_aliases_map_to_stored_type_strings() {
        assert_eq!(group_type_for_alias("import"), Some("auto.import"));
        assert_eq!(group_type_for_alias("data.upf"), Some("data.upf.family"));
        assert_eq!(group_type_for_alias("bogus"), None);
    }

    #[test]
    fn ssh_auth_params_fill_defaults_from_partial_json() {
        let params: SshAuthParams =
            serde_json::from_value(serde_json::json!({"username": "ada"})).unwrap();
        assert_eq!(params.username.as_deref(), Some("ada"));
        assert_eq!(params.port, DEFAULT_SSH_PORT);
        assert_eq!(params.timeout_secs, DEFAULT_SSH_TIMEOUT_SECS);
    }

    #[test]
    fn comment_display_names_node_and_author() {
        let comment = CommentRecord {
            id: 3,
            uuid: "c0ffee".to_string(),
            node_id: 12,
            user_id: 1,
            user_email: "ada@example.org".to_string(),
            content: "converged".to_string(),
            ctime: "2026-01-01T00:00:00.000Z".to_string(),
            mtime: "2026-01-01T00:00:00.000Z".to_string(),
        };
        assert_eq!(
            comment.to_string(),
            "Comment<c0ffee> for node<12> and user<ada@example.org>: converged"
        );
    }
}
