// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use aiida::app::types::{NodeRecord, UserRecord};
use aiida::app::usecases::{ComputerStatus, GroupDetails, GroupSummary, NodeComments};
use aiida::config::ProfileSummary;

const USER_DEFINED_LABEL: &str = "<user-defined>";
const NO_DESCRIPTION_LABEL: &str = "<no description>";

pub(super) fn format_users_table(users: &[UserRecord], default_email: Option<&str>) -> String {
    if users.is_empty() {
        return "No users registered\n".to_string();
    }
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|user| {
            let name = format!("{} {}", user.first_name.trim(), user.last_name.trim());
            let is_default = default_email == Some(user.email.as_str());
            vec![
                user.email.clone(),
                name.trim().to_string(),
                user.institution.clone(),
                if is_default { "yes" } else { "" }.to_string(),
            ]
        })
        .collect();
    format_table(&["email", "name", "institution", "default"], &rows)
}

pub(super) fn format_computers_table(computers: &[ComputerStatus]) -> String {
    if computers.is_empty() {
        return "No computers registered\n".to_string();
    }
    let rows: Vec<Vec<String>> = computers
        .iter()
        .map(|status| {
            vec![
                status.computer.id.to_string(),
                status.computer.name.clone(),
                status.computer.hostname.clone(),
                status.computer.transport_type.to_string(),
                status.computer.scheduler_type.to_string(),
                computer_state(status).to_string(),
            ]
        })
        .collect();
    format_table(
        &["pk", "name", "hostname", "transport", "scheduler", "state"],
        &rows,
    )
}

fn computer_state(status: &ComputerStatus) -> &'static str {
    if !status.computer.enabled {
        "disabled"
    } else if !status.configured {
        "not configured"
    } else if !status.user_enabled {
        "disabled for user"
    } else {
        "enabled"
    }
}

pub(super) fn format_computer_details(status: &ComputerStatus, users: &[String]) -> String {
    let computer = &status.computer;
    let mpiprocs = computer
        .default_mpiprocs_per_machine
        .map(|n| n.to_string())
        .unwrap_or_else(|| "not set".to_string());
    let mut output = String::new();
    output.push_str(&format!("name: {}\n", computer.name));
    output.push_str(&format!("pk: {}\n", computer.id));
    output.push_str(&format!("uuid: {}\n", computer.uuid));
    output.push_str(&format!("hostname: {}\n", computer.hostname));
    output.push_str(&format!("description: {}\n", computer.description));
    output.push_str(&format!("transport: {}\n", computer.transport_type));
    output.push_str(&format!("scheduler: {}\n", computer.scheduler_type));
    output.push_str(&format!("shebang: {}\n", computer.shebang));
    output.push_str(&format!("work directory: {}\n", computer.workdir));
    output.push_str(&format!(
        "mpirun command: {}\n",
        computer.mpirun_command.join(" ")
    ));
    output.push_str(&format!("default mpiprocs per machine: {mpiprocs}\n"));
    output.push_str(&format!("enabled: {}\n", yes_no(computer.enabled)));
    output.push_str(&format!("configured for user: {}\n", yes_no(status.configured)));
    output.push_str(&format!("enabled for user: {}\n", yes_no(status.user_enabled)));
    let configured_users = if users.is_empty() {
        "none".to_string()
    } else {
        users.join(", ")
    };
    output.push_str(&format!("configured users: {configured_users}\n"));
    push_block(&mut output, "prepend text", &computer.prepend_text);
    push_block(&mut output, "append text", &computer.append_text);
    output
}

fn push_block(output: &mut String, key: &str, text: &str) {
    output.push_str(&format!("{key}:\n"));
    if text.trim().is_empty() {
        return;
    }
    for line in text.lines() {
        output.push_str(&format!("  {line}\n"));
    }
}

pub(super) fn format_groups_table(groups: &[GroupSummary], with_description: bool) -> String {
    if groups.is_empty() {
        return "No groups found\n".to_string();
    }
    let with_counts = groups.iter().any(|summary| summary.node_count.is_some());
    let mut headers = vec!["pk", "name", "type", "user"];
    if with_description {
        headers.push("description");
    }
    if with_counts {
        headers.push("nodes");
    }
    let rows: Vec<Vec<String>> = groups
        .iter()
        .map(|summary| {
            let group = &summary.group;
            let mut row = vec![
                group.id.to_string(),
                group.name.clone(),
                display_type(&group.type_string).to_string(),
                group.user_email.clone(),
            ];
            if with_description {
                row.push(group.description.clone());
            }
            if with_counts {
                row.push(
                    summary
                        .node_count
                        .map(|count| count.to_string())
                        .unwrap_or_default(),
                );
            }
            row
        })
        .collect();
    format_table(&headers, &rows)
}

pub(super) fn format_group_details(details: &GroupDetails, raw: bool, uuid: bool) -> String {
    if raw {
        return details
            .nodes
            .iter()
            .map(|node| format!("{}\n", node_identifier(node, uuid)))
            .collect();
    }
    let group = &details.group;
    let description = if group.description.trim().is_empty() {
        NO_DESCRIPTION_LABEL
    } else {
        group.description.as_str()
    };
    let mut output = String::new();
    output.push_str(&format!("Group name: {}\n", group.name));
    output.push_str(&format!("Group type: {}\n", display_type(&group.type_string)));
    output.push_str(&format!("Group description: {description}\n"));
    if details.nodes.is_empty() {
        output.push_str("# Nodes: none\n");
        return output;
    }
    output.push_str("# Nodes:\n");
    let rows: Vec<Vec<String>> = details
        .nodes
        .iter()
        .map(|node| {
            vec![
                node_identifier(node, uuid),
                node.node_type.clone(),
                node.label.clone(),
                node.created_at.clone(),
            ]
        })
        .collect();
    let id_header = if uuid { "uuid" } else { "pk" };
    output.push_str(&format_table(&[id_header, "type", "label", "created"], &rows));
    output
}

pub(super) fn format_nodes_table(nodes: &[NodeRecord]) -> String {
    if nodes.is_empty() {
        return "No nodes stored\n".to_string();
    }
    let rows: Vec<Vec<String>> = nodes
        .iter()
        .map(|node| {
            vec![
                node.id.to_string(),
                node.uuid.clone(),
                node.node_type.clone(),
                node.label.clone(),
                node.created_at.clone(),
            ]
        })
        .collect();
    format_table(&["pk", "uuid", "type", "label", "created"], &rows)
}

pub(super) fn format_node_comments(entries: &[NodeComments]) -> String {
    let mut output = String::new();
    for entry in entries {
        if entry.comments.is_empty() {
            output.push_str(&format!("No comments found for node {}\n", entry.node.id));
            continue;
        }
        output.push_str(&format!(
            "Comments for node {} ({})\n",
            entry.node.id, entry.node.uuid
        ));
        for comment in &entry.comments {
            output.push_str(&format!(
                "* Comment {} by {}\n  created {}, last modified {}\n",
                comment.id, comment.user_email, comment.ctime, comment.mtime
            ));
            for line in comment.content.lines() {
                output.push_str(&format!("  | {line}\n"));
            }
        }
    }
    output
}

/// `*` marks the default profile; the one in use is tagged.
pub(super) fn format_profiles_table(profiles: &[ProfileSummary], active: Option<&str>) -> String {
    if profiles.is_empty() {
        return "No profiles configured\n".to_string();
    }
    let rows: Vec<Vec<String>> = profiles
        .iter()
        .map(|profile| {
            let name = if active == Some(profile.name.as_str()) {
                format!("{} (in use)", profile.name)
            } else {
                profile.name.clone()
            };
            vec![
                if profile.is_default { "*" } else { "" }.to_string(),
                name,
                profile.database_path.display().to_string(),
                profile.default_user_email.clone().unwrap_or_default(),
            ]
        })
        .collect();
    format_table(&["", "name", "database", "default user"], &rows)
}

fn node_identifier(node: &NodeRecord, uuid: bool) -> String {
    if uuid {
        node.uuid.clone()
    } else {
        node.id.to_string()
    }
}

fn display_type(type_string: &str) -> &str {
    if type_string.is_empty() {
        USER_DEFINED_LABEL
    } else {
        type_string
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// Left-aligned columns separated by two spaces.
fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|header| str_width(header)).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(idx) {
                *width = (*width).max(str_width(cell));
            }
        }
    }

    let mut output = String::new();
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_row(&mut output, &header_cells, &widths);
    for row in rows {
        push_row(&mut output, row, &widths);
    }
    output
}

fn push_row(output: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (idx, cell) in cells.iter().enumerate() {
        if idx > 0 {
            line.push_str("  ");
        }
        let width = widths.get(idx).copied().unwrap_or(0);
        line.push_str(&format!("{cell:<width$}"));
    }
    output.push_str(line.trim_end());
    output.push('\n');
}

fn str_width(value: &str) -> usize {
    value.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiida::app::services::schedulers::SchedulerType;
    use aiida::app::types::{ComputerRecord, GroupRecord, TransportType};

    fn sample_computer(enabled: bool) -> ComputerRecord {
        ComputerRecord {
            id: 1,
            uuid: "0b8e".to_string(),
            name: "localhost".to_string(),
            hostname: "localhost".to_string(),
            description: String::new(),
            transport_type: TransportType::Local,
            scheduler_type: SchedulerType::Direct,
            workdir: "/scratch/{username}/aiida_run/".to_string(),
            mpirun_command: vec![
                "mpirun".to_string(),
                "-np".to_string(),
                "{tot_num_mpiprocs}".to_string(),
            ],
            default_mpiprocs_per_machine: None,
            shebang: "#!/bin/bash".to_string(),
            prepend_text: "module load mpi".to_string(),
            append_text: String::new(),
            enabled,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    fn sample_group(type_string: &str, description: &str) -> GroupRecord {
        GroupRecord {
            id: 3,
            uuid: "9f1c".to_string(),
            name: "relaxations".to_string(),
            type_string: type_string.to_string(),
            description: description.to_string(),
            user_id: 1,
            user_email: "ada@example.org".to_string(),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    fn sample_node(id: i64) -> NodeRecord {
        NodeRecord {
            id,
            uuid: format!("uuid-{id}"),
            node_type: "data.int".to_string(),
            label: String::new(),
            user_id: 1,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn table_columns_align_to_widest_cell() {
        let rows = vec![
            vec!["1".to_string(), "a".to_string()],
            vec!["10".to_string(), "long name".to_string()],
        ];
        assert_eq!(
            format_table(&["pk", "name"], &rows),
            "pk  name\n1   a\n10  long name\n"
        );
    }

    #[test]
    fn computer_state_reflects_global_then_user_flags() {
        let status = |enabled, configured, user_enabled| ComputerStatus {
            computer: sample_computer(enabled),
            configured,
            user_enabled,
        };
        assert_eq!(computer_state(&status(false, true, true)), "disabled");
        assert_eq!(computer_state(&status(true, false, false)), "not configured");
        assert_eq!(computer_state(&status(true, true, false)), "disabled for user");
        assert_eq!(computer_state(&status(true, true, true)), "enabled");
        assert_eq!(format_computers_table(&[]), "No computers registered\n");
    }

    #[test]
    fn computer_details_show_template_values() {
        let details = format_computer_details(
            &ComputerStatus {
                computer: sample_computer(true),
                configured: false,
                user_enabled: false,
            },
            &[],
        );
        assert!(details.contains("mpirun command: mpirun -np {tot_num_mpiprocs}\n"));
        assert!(details.contains("default mpiprocs per machine: not set\n"));
        assert!(details.contains("prepend text:\n  module load mpi\n"));
        assert!(details.contains("configured users: none\n"));
    }

    #[test]
    fn computer_details_list_configured_users() {
        let details = format_computer_details(
            &ComputerStatus {
                computer: sample_computer(true),
                configured: true,
                user_enabled: true,
            },
            &["ada@example.org".to_string(), "bob@example.org".to_string()],
        );
        assert!(details.contains("configured users: ada@example.org, bob@example.org\n"));
    }

    #[test]
    fn group_details_use_placeholders_for_empty_values() {
        let details = GroupDetails {
            group: sample_group("", ""),
            nodes: vec![],
        };
        assert_eq!(
            format_group_details(&details, false, false),
            "Group name: relaxations\nGroup type: <user-defined>\nGroup description: <no description>\n# Nodes: none\n"
        );
    }

    #[test]
    fn raw_group_details_list_only_identifiers() {
        let details = GroupDetails {
            group: sample_group("auto.import", "imported"),
            nodes: vec![sample_node(4), sample_node(7)],
        };
        assert_eq!(format_group_details(&details, true, false), "4\n7\n");
        assert_eq!(
            format_group_details(&details, true, true),
            "uuid-4\nuuid-7\n"
        );
        let full = format_group_details(&details, false, false);
        assert!(full.contains("Group type: auto.import\n"));
        assert!(full.contains("Group description: imported\n"));
    }

    #[test]
    fn group_table_adds_optional_columns() {
        let groups = vec![GroupSummary {
            group: sample_group("", "first"),
            node_count: Some(2),
        }];
        let table = format_groups_table(&groups, true);
        let mut lines = table.lines();
        assert_eq!(
            lines.next(),
            Some("pk  name         type            user             description  nodes")
        );
        assert_eq!(
            lines.next(),
            Some("3   relaxations  <user-defined>  ada@example.org  first        2")
        );
        assert_eq!(format_groups_table(&[], false), "No groups found\n");
    }

    #[test]
    fn node_comments_show_author_and_indented_content() {
        let comment = aiida::app::types::CommentRecord {
            id: 3,
            uuid: "c0ffee".to_string(),
            node_id: 4,
            user_id: 1,
            user_email: "ada@example.org".to_string(),
            content: "line one\nline two".to_string(),
            ctime: "2026-01-01T00:00:00.000Z".to_string(),
            mtime: "2026-01-02T00:00:00.000Z".to_string(),
        };
        let text = format_node_comments(&[
            NodeComments {
                node: sample_node(4),
                comments: vec![comment],
            },
            NodeComments {
                node: sample_node(5),
                comments: vec![],
            },
        ]);
        assert_eq!(
            text,
            "Comments for node 4 (uuid-4)\n\
             * Comment 3 by ada@example.org\n\
             \x20 created 2026-01-01T00:00:00.000Z, last modified 2026-01-02T00:00:00.000Z\n\
             \x20 | line one\n\
             \x20 | line two\n\
             No comments found for node 5\n"
        );
    }

    #[test]
    fn profiles_table_marks_default_and_active() {
        let profile = |name: &str, is_default| ProfileSummary {
            name: name.to_string(),
            is_default,
            database_path: std::path::PathBuf::from(format!("/db/{name}.sqlite")),
            default_user_email: None,
        };
        let table = format_profiles_table(
            &[profile("main", true), profile("scratch", false)],
            Some("scratch"),
        );
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[1].starts_with("*  main "));
        assert!(lines[2].contains("scratch (in use)"));
        assert_eq!(format_profiles_table(&[], None), "No profiles configured\n");
    }
}
