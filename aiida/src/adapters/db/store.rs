// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use futures_util::TryStreamExt;
use sqlx::{
    QueryBuilder, Row, Sqlite, SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
};
use std::{path::Path, str::FromStr, time::Duration};
use thiserror::Error;
use uuid::Uuid;

use crate::app::services::schedulers::SchedulerType;
use crate::app::types::{
    AuthInfoRecord, CommentRecord, ComputerRecord, GroupQuery, GroupRecord, NewAuthInfo,
    NewComment, NewComputer, NewGroup, NewNode, NewUser, NodeRecord, TransportType, UserFilter,
    UserRecord,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("empty name")]
    EmptyName,
    #[error("empty email")]
    EmptyEmail,
    #[error("User with email '{0}' already exists")]
    UserExists(String),
    #[error("Computer with name '{0}' already exists")]
    ComputerExists(String),
    #[error("Group with name '{0}' already exists")]
    GroupExists(String),
    #[error("no user with id {0}")]
    UserNotFound(i64),
    #[error("no computer with id {0}")]
    ComputerNotFound(i64),
    #[error("no group with id {0}")]
    GroupNotFound(i64),
    #[error("invalid {column} value '{value}' in stored row")]
    InvalidColumn { column: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, StoreError>;

const NOW_SQL: &str = "strftime('%Y-%m-%dT%H:%M:%fZ','now')";

const GROUP_SELECT: &str = r#"
    SELECT g.id, g.uuid, g.name, g.type_string, g.description, g.user_id, g.created_at,
           u.email AS user_email
    FROM node_groups g
    JOIN users u ON u.id = g.user_id
"#;

const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.uuid, c.node_id, c.user_id, c.content, c.ctime, c.mtime,
           u.email AS user_email
    FROM comments c
    JOIN users u ON u.id = c.user_id
"#;

/// Async SQLite store for users, computers, authinfos, nodes, and groups.
#[derive(Clone)]
pub struct AiidaStore {
    pool: SqlitePool,
}

impl AiidaStore {
    /// Open (or create) a file-backed SQLite DB.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let url = format!("sqlite://{}", path_ref.to_string_lossy());
        let opts = SqliteConnectOptions::from_str(&url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await?;
        let store = Self { pool };
        store.bootstrap().await?;
        Ok(store)
    }

    /// Open an in-memory store. A single connection keeps every query on
    /// the same database.
    pub async fn open_memory() -> Result<Self> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await?;
        let store = Self { pool };
        store.bootstrap().await?;
        Ok(store)
    }

    async fn bootstrap(&self) -> Result<()> {
        // Improve concurrency for file DBs.
        let _ = sqlx::query("PRAGMA journal_mode=WAL;")
            .execute(&self.pool)
            .await;

        self.ensure_users_table().await?;
        self.ensure_computers_table().await?;
        self.ensure_authinfos_table().await?;
        self.ensure_nodes_table().await?;
        self.ensure_groups_tables().await?;
        self.ensure_comments_table().await?;
        Ok(())
    }

    async fn ensure_users_table(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              email TEXT NOT NULL,
              first_name TEXT NOT NULL DEFAULT '',
              last_name TEXT NOT NULL DEFAULT '',
              institution TEXT NOT NULL DEFAULT '',
              password_hash TEXT,              -- NULL: unusable password
              is_active INTEGER NOT NULL DEFAULT 1,
              date_joined TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
              last_login TEXT
            );
            CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email ON users(email);
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn ensure_computers_table(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS computers (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              uuid TEXT NOT NULL,
              name TEXT NOT NULL,
              hostname TEXT NOT NULL,
              description TEXT NOT NULL DEFAULT '',
              transport_type TEXT NOT NULL,
              scheduler_type TEXT NOT NULL,
              workdir TEXT NOT NULL,
              mpirun_command TEXT NOT NULL,   -- JSON list of tokens
              default_mpiprocs_per_machine INTEGER,
              shebang TEXT NOT NULL,
              prepend_text TEXT NOT NULL DEFAULT '',
              append_text TEXT NOT NULL DEFAULT '',
              enabled INTEGER NOT NULL DEFAULT 1,
              created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
              updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
              CHECK (default_mpiprocs_per_machine IS NULL OR default_mpiprocs_per_machine > 0)
            );
            CREATE UNIQUE INDEX IF NOT EXISTS idx_computers_name ON computers(name);
            CREATE UNIQUE INDEX IF NOT EXISTS idx_computers_uuid ON computers(uuid);
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn ensure_authinfos_table(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS authinfos (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              user_id INTEGER NOT NULL
                REFERENCES users(id) ON DELETE CASCADE,
              computer_id INTEGER NOT NULL
                REFERENCES computers(id) ON DELETE CASCADE,
              enabled INTEGER NOT NULL DEFAULT 1,
              auth_params TEXT NOT NULL DEFAULT '{}', -- JSON (stringified)
              updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
              UNIQUE(user_id, computer_id)
            );
            CREATE INDEX IF NOT EXISTS idx_authinfos_computer_id ON authinfos(computer_id);
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn ensure_nodes_table(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS nodes (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              uuid TEXT NOT NULL,
              node_type TEXT NOT NULL,
              label TEXT NOT NULL DEFAULT '',
              user_id INTEGER NOT NULL REFERENCES users(id),
              created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now'))
            );
            CREATE UNIQUE INDEX IF NOT EXISTS idx_nodes_uuid ON nodes(uuid);
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn ensure_groups_tables(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS node_groups (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              uuid TEXT NOT NULL,
              name TEXT NOT NULL,
              type_string TEXT NOT NULL DEFAULT '', -- '' marks user-defined groups
              description TEXT NOT NULL DEFAULT '',
              user_id INTEGER NOT NULL REFERENCES users(id),
              created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
              UNIQUE(name, type_string)
            );
            CREATE UNIQUE INDEX IF NOT EXISTS idx_node_groups_uuid ON node_groups(uuid);
            CREATE INDEX IF NOT EXISTS idx_node_groups_user_id ON node_groups(user_id);

            CREATE TABLE IF NOT EXISTS group_nodes (
              group_id INTEGER NOT NULL
                REFERENCES node_groups(id) ON DELETE CASCADE,
              node_id INTEGER NOT NULL
                REFERENCES nodes(id) ON DELETE CASCADE,
              PRIMARY KEY (group_id, node_id)
            );
            CREATE INDEX IF NOT EXISTS idx_group_nodes_node_id ON group_nodes(node_id);
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn ensure_comments_table(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS comments (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              uuid TEXT NOT NULL,
              node_id INTEGER NOT NULL
                REFERENCES nodes(id) ON DELETE CASCADE,
              user_id INTEGER NOT NULL REFERENCES users(id),
              content TEXT NOT NULL DEFAULT '',
              ctime TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
              mtime TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now'))
            );
            CREATE UNIQUE INDEX IF NOT EXISTS idx_comments_uuid ON comments(uuid);
            CREATE INDEX IF NOT EXISTS idx_comments_node_id ON comments(node_id);
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // -- users

    /// Insert a new user. Returns the new row id.
    pub async fn insert_user(&self, user: &NewUser) -> Result<i64> {
        if user.email.trim().is_empty() {
            return Err(StoreError::EmptyEmail);
        }
        let rec = sqlx::query(
            r#"
            INSERT INTO users(email, first_name, last_name, institution, password_hash, is_active)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.institution)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                StoreError::UserExists(user.email.clone())
            } else {
                StoreError::Sqlx(err)
            }
        })?;
        Ok(rec.try_get::<i64, _>("id")?)
    }

    pub async fn update_user(&self, id: i64, user: &NewUser) -> Result<()> {
        if user.email.trim().is_empty() {
            return Err(StoreError::EmptyEmail);
        }
        let res = sqlx::query(
            r#"
            UPDATE users SET
              email = ?1,
              first_name = ?2,
              last_name = ?3,
              institution = ?4,
              password_hash = ?5,
              is_active = ?6
            WHERE id = ?7
            "#,
        )
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.institution)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                StoreError::UserExists(user.email.clone())
            } else {
                StoreError::Sqlx(err)
            }
        })?;
        if res.rows_affected() == 0 {
            return Err(StoreError::UserNotFound(id));
        }
        Ok(())
    }

    /// Users matching every set field of `filter`, ordered by id.
    pub async fn find_users(&self, filter: &UserFilter) -> Result<Vec<UserRecord>> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM users WHERE 1 = 1");
        if let Some(email) = &filter.email {
            qb.push(" AND email = ").push_bind(email.clone());
        }
        if let Some(id) = filter.id {
            qb.push(" AND id = ").push_bind(id);
        }
        qb.push(" ORDER BY id ASC");

        let mut out = Vec::new();
        let mut rows = qb.build().fetch(&self.pool);
        while let Some(row) = rows.try_next().await? {
            out.push(row_to_user(row)?);
        }
        Ok(out)
    }

    // -- computers

    /// Insert a new computer. Returns the new row id.
    pub async fn insert_computer(&self, computer: &NewComputer) -> Result<i64> {
        if computer.name.trim().is_empty() {
            return Err(StoreError::EmptyName);
        }
        let mpirun_command = serde_json::to_string(&computer.mpirun_command)?;
        let rec = sqlx::query(
            r#"
            INSERT INTO computers(
              uuid, name, hostname, description,
              transport_type, scheduler_type,
              workdir, mpirun_command, default_mpiprocs_per_machine,
              shebang, prepend_text, append_text, enabled
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&computer.name)
        .bind(&computer.hostname)
        .bind(&computer.description)
        .bind(computer.transport_type.as_str())
        .bind(computer.scheduler_type.as_str())
        .bind(&computer.workdir)
        .bind(mpirun_command)
        .bind(computer.default_mpiprocs_per_machine)
        .bind(&computer.shebang)
        .bind(&computer.prepend_text)
        .bind(&computer.append_text)
        .bind(computer.enabled)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                StoreError::ComputerExists(computer.name.clone())
            } else {
                StoreError::Sqlx(err)
            }
        })?;
        Ok(rec.try_get::<i64, _>("id")?)
    }

    /// Get a computer by its unique name.
    pub async fn get_computer_by_name(&self, name: &str) -> Result<Option<ComputerRecord>> {
        let row = sqlx::query("SELECT * FROM computers WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        row.map(row_to_computer).transpose()
    }

    pub async fn get_computer_by_id(&self, id: i64) -> Result<Option<ComputerRecord>> {
        let row = sqlx::query("SELECT * FROM computers WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(row_to_computer).transpose()
    }

    pub async fn list_computers(&self) -> Result<Vec<ComputerRecord>> {
        let mut out = Vec::new();
        let mut rows = sqlx::query("SELECT * FROM computers ORDER BY id ASC").fetch(&self.pool);
        while let Some(row) = rows.try_next().await? {
            out.push(row_to_computer(row)?);
        }
        Ok(out)
    }

    /// Flips the global flag only; authinfos are untouched.
    pub async fn set_computer_enabled(&self, id: i64, enabled: bool) -> Result<()> {
        let res = sqlx::query(&format!(
            "UPDATE computers SET enabled = ?1, updated_at = {NOW_SQL} WHERE id = ?2"
        ))
        .bind(enabled)
        .bind(id)
        .execute(&self.pool)
        .await?;
        if res.rows_affected() == 0 {
            return Err(StoreError::ComputerNotFound(id));
        }
        Ok(())
    }

    pub async fn rename_computer(&self, id: i64, new_name: &str) -> Result<()> {
        if new_name.trim().is_empty() {
            return Err(StoreError::EmptyName);
        }
        let res = sqlx::query(&format!(
            "UPDATE computers SET name = ?1, updated_at = {NOW_SQL} WHERE id = ?2"
        ))
        .bind(new_name)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                StoreError::ComputerExists(new_name.to_string())
            } else {
                StoreError::Sqlx(err)
            }
        })?;
        if res.rows_affected() == 0 {
            return Err(StoreError::ComputerNotFound(id));
        }
        Ok(())
    }

    /// Delete a computer and its authinfos. Returns computer rows affected.
    pub async fn delete_computer(&self, id: i64) -> Result<usize> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM authinfos WHERE computer_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let res = sqlx::query("DELETE FROM computers WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(res.rows_affected() as usize)
    }

    // -- authinfos

    pub async fn get_authinfo(
        &self,
        computer_id: i64,
        user_id: i64,
    ) -> Result<Option<AuthInfoRecord>> {
        let row = sqlx::query("SELECT * FROM authinfos WHERE computer_id = ? AND user_id = ?")
            .bind(computer_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(row_to_authinfo).transpose()
    }

    /// Insert or replace the payload for (user, computer). The enabled flag
    /// of an existing row is kept; last write wins for the payload.
    pub async fn upsert_authinfo(&self, authinfo: &NewAuthInfo) -> Result<i64> {
        let params = serde_json::to_string(&authinfo.auth_params)?;
        let rec = sqlx::query(&format!(
            r#"
            INSERT INTO authinfos(user_id, computer_id, enabled, auth_params)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id, computer_id) DO UPDATE SET
              auth_params = excluded.auth_params,
              updated_at = {NOW_SQL}
            RETURNING id
            "#
        ))
        .bind(authinfo.user_id)
        .bind(authinfo.computer_id)
        .bind(authinfo.enabled)
        .bind(params)
        .fetch_one(&self.pool)
        .await?;
        Ok(rec.try_get::<i64, _>("id")?)
    }

    /// Flips one user's flag only. Returns false when no authinfo exists.
    pub async fn set_authinfo_enabled(
        &self,
        computer_id: i64,
        user_id: i64,
        enabled: bool,
    ) -> Result<bool> {
        let res = sqlx::query(&format!(
            "UPDATE authinfos SET enabled = ?1, updated_at = {NOW_SQL} \
             WHERE computer_id = ?2 AND user_id = ?3"
        ))
        .bind(enabled)
        .bind(computer_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn list_authinfos(&self, computer_id: i64) -> Result<Vec<AuthInfoRecord>> {
        let mut out = Vec::new();
        let mut rows = sqlx::query("SELECT * FROM authinfos WHERE computer_id = ? ORDER BY id ASC")
            .bind(computer_id)
            .fetch(&self.pool);
        while let Some(row) = rows.try_next().await? {
            out.push(row_to_authinfo(row)?);
        }
        Ok(out)
    }

    // -- nodes

    pub async fn insert_node(&self, node: &NewNode) -> Result<i64> {
        let rec = sqlx::query(
            r#"
            INSERT INTO nodes(uuid, node_type, label, user_id)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&node.node_type)
        .bind(&node.label)
        .bind(node.user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(rec.try_get::<i64, _>("id")?)
    }

    pub async fn get_node_by_id(&self, id: i64) -> Result<Option<NodeRecord>> {
        let row = sqlx::query("SELECT * FROM nodes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(row_to_node).transpose()
    }

    pub async fn get_node_by_uuid(&self, uuid: &str) -> Result<Option<NodeRecord>> {
        let row = sqlx::query("SELECT * FROM nodes WHERE uuid = ?")
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await?;
        row.map(row_to_node).transpose()
    }

    pub async fn get_nodes_by_ids(&self, ids: &[i64]) -> Result<Vec<NodeRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM nodes WHERE id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY id ASC");
        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.into_iter().map(row_to_node).collect()
    }

    pub async fn list_nodes(&self) -> Result<Vec<NodeRecord>> {
        let mut out = Vec::new();
        let mut rows = sqlx::query("SELECT * FROM nodes ORDER BY id ASC").fetch(&self.pool);
        while let Some(row) = rows.try_next().await? {
            out.push(row_to_node(row)?);
        }
        Ok(out)
    }

    // -- comments

    pub async fn insert_comment(&self, comment: &NewComment) -> Result<i64> {
        let rec = sqlx::query(
            r#"
            INSERT INTO comments(uuid, node_id, user_id, content)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(comment.node_id)
        .bind(comment.user_id)
        .bind(&comment.content)
        .fetch_one(&self.pool)
        .await?;
        Ok(rec.try_get::<i64, _>("id")?)
    }

    pub async fn get_comment(&self, id: i64) -> Result<Option<CommentRecord>> {
        let sql = format!("{COMMENT_SELECT} WHERE c.id = ?");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(row_to_comment).transpose()
    }

    /// Oldest first.
    pub async fn list_node_comments(&self, node_id: i64) -> Result<Vec<CommentRecord>> {
        let sql = format!("{COMMENT_SELECT} WHERE c.node_id = ? ORDER BY c.ctime ASC, c.id ASC");
        let mut out = Vec::new();
        let mut rows = sqlx::query(&sql).bind(node_id).fetch(&self.pool);
        while let Some(row) = rows.try_next().await? {
            out.push(row_to_comment(row)?);
        }
        Ok(out)
    }

    /// Replaces the content and bumps `mtime`. Returns false when the
    /// comment does not exist.
    pub async fn update_comment_content(&self, id: i64, content: &str) -> Result<bool> {
        let sql = format!("UPDATE comments SET content = ?, mtime = {NOW_SQL} WHERE id = ?");
        let res = sqlx::query(&sql)
            .bind(content)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn delete_comment(&self, id: i64) -> Result<bool> {
        let res = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    // -- groups

    pub async fn insert_group(&self, group: &NewGroup) -> Result<i64> {
        if group.name.trim().is_empty() {
            return Err(StoreError::EmptyName);
        }
        let rec = sqlx::query(
            r#"
            INSERT INTO node_groups(uuid, name, type_string, description, user_id)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&group.name)
        .bind(&group.type_string)
        .bind(&group.description)
        .bind(group.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                StoreError::GroupExists(group.name.clone())
            } else {
                StoreError::Sqlx(err)
            }
        })?;
        Ok(rec.try_get::<i64, _>("id")?)
    }

    pub async fn get_group_by_id(&self, id: i64) -> Result<Option<GroupRecord>> {
        let row = sqlx::query(&format!("{GROUP_SELECT} WHERE g.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(row_to_group).transpose()
    }

    pub async fn get_group_by_name(
        &self,
        name: &str,
        type_string: &str,
    ) -> Result<Option<GroupRecord>> {
        let row = sqlx::query(&format!(
            "{GROUP_SELECT} WHERE g.name = ? AND g.type_string = ?"
        ))
        .bind(name)
        .bind(type_string)
        .fetch_optional(&self.pool)
        .await?;
        row.map(row_to_group).transpose()
    }

    /// Every group with this name, across type strings.
    pub async fn find_groups_by_name(&self, name: &str) -> Result<Vec<GroupRecord>> {
        let rows = sqlx::query(&format!("{GROUP_SELECT} WHERE g.name = ? ORDER BY g.id ASC"))
            .bind(name)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(row_to_group).collect()
    }

    pub async fn rename_group(&self, id: i64, new_name: &str) -> Result<()> {
        if new_name.trim().is_empty() {
            return Err(StoreError::EmptyName);
        }
        let res = sqlx::query("UPDATE node_groups SET name = ?1 WHERE id = ?2")
            .bind(new_name)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    StoreError::GroupExists(new_name.to_string())
                } else {
                    StoreError::Sqlx(err)
                }
            })?;
        if res.rows_affected() == 0 {
            return Err(StoreError::GroupNotFound(id));
        }
        Ok(())
    }

    pub async fn set_group_description(&self, id: i64, description: &str) -> Result<()> {
        let res = sqlx::query("UPDATE node_groups SET description = ?1 WHERE id = ?2")
            .bind(description)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(StoreError::GroupNotFound(id));
        }
        Ok(())
    }

    /// Delete a group and its membership rows. Nodes are never touched.
    pub async fn delete_group(&self, id: i64) -> Result<usize> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM group_nodes WHERE group_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let res = sqlx::query("DELETE FROM node_groups WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(res.rows_affected() as usize)
    }

    /// Returns how many nodes were not members before.
    pub async fn add_group_nodes(&self, group_id: i64, node_ids: &[i64]) -> Result<usize> {
        let mut tx = self.pool.begin().await?;
        let mut added = 0;
        for node_id in node_ids {
            let res =
                sqlx::query("INSERT OR IGNORE INTO group_nodes(group_id, node_id) VALUES (?, ?)")
                    .bind(group_id)
                    .bind(node_id)
                    .execute(&mut *tx)
                    .await?;
            added += res.rows_affected() as usize;
        }
        tx.commit().await?;
        Ok(added)
    }

    /// Returns how many of the nodes were members.
    pub async fn remove_group_nodes(&self, group_id: i64, node_ids: &[i64]) -> Result<usize> {
        let mut tx = self.pool.begin().await?;
        let mut removed = 0;
        for node_id in node_ids {
            let res = sqlx::query("DELETE FROM group_nodes WHERE group_id = ? AND node_id = ?")
                .bind(group_id)
                .bind(node_id)
                .execute(&mut *tx)
                .await?;
            removed += res.rows_affected() as usize;
        }
        tx.commit().await?;
        Ok(removed)
    }

    pub async fn group_node_ids(&self, group_id: i64) -> Result<Vec<i64>> {
        let rows =
            sqlx::query("SELECT node_id FROM group_nodes WHERE group_id = ? ORDER BY node_id ASC")
                .bind(group_id)
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter()
            .map(|row| row.try_get::<i64, _>("node_id").map_err(StoreError::from))
            .collect()
    }

    pub async fn count_group_nodes(&self, group_id: i64) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM group_nodes WHERE group_id = ?")
            .bind(group_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get::<i64, _>("n")?)
    }

    /// Groups matching every set field of `query`, ordered by id.
    /// Name predicates are case-sensitive.
    pub async fn query_groups(&self, query: &GroupQuery) -> Result<Vec<GroupRecord>> {
        let mut qb = QueryBuilder::<Sqlite>::new(GROUP_SELECT);
        qb.push(" WHERE 1 = 1");
        if let Some(user_id) = query.user_id {
            qb.push(" AND g.user_id = ").push_bind(user_id);
        }
        if let Some(type_string) = &query.type_string {
            qb.push(" AND g.type_string = ").push_bind(type_string.clone());
        }
        if let Some(created_after) = &query.created_after {
            qb.push(" AND g.created_at >= ")
                .push_bind(created_after.clone());
        }
        let filters = &query.name_filters;
        if let Some(prefix) = filters.startswith.as_ref().filter(|p| !p.is_empty()) {
            qb.push(" AND substr(g.name, 1, length(")
                .push_bind(prefix.clone())
                .push(")) = ")
                .push_bind(prefix.clone());
        }
        if let Some(suffix) = filters.endswith.as_ref().filter(|s| !s.is_empty()) {
            qb.push(" AND substr(g.name, -length(")
                .push_bind(suffix.clone())
                .push(")) = ")
                .push_bind(suffix.clone());
        }
        if let Some(needle) = filters.contains.as_ref().filter(|n| !n.is_empty()) {
            qb.push(" AND instr(g.name, ").push_bind(needle.clone()).push(") > 0");
        }
        for node_id in &query.node_ids {
            qb.push(
                " AND EXISTS (SELECT 1 FROM group_nodes gn WHERE gn.group_id = g.id AND gn.node_id = ",
            )
            .push_bind(*node_id)
            .push(")");
        }
        qb.push(" ORDER BY g.id ASC");

        let mut out = Vec::new();
        let mut rows = qb.build().fetch(&self.pool);
        while let Some(row) = rows.try_next().await? {
            out.push(row_to_group(row)?);
        }
        Ok(out)
    }
}

// -- helpers

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

fn row_to_user(row: SqliteRow) -> Result<UserRecord> {
    Ok(UserRecord {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        institution: row.try_get("institution")?,
        password_hash: row.try_get("password_hash")?,
        is_active: row.try_get("is_active")?,
        date_joined: row.try_get("date_joined")?,
        last_login: row.try_get("last_login")?,
    })
}

fn row_to_computer(row: SqliteRow) -> Result<ComputerRecord> {
    let transport_raw: String = row.try_get("transport_type")?;
    let transport_type =
        TransportType::from_str(&transport_raw).map_err(|_| StoreError::InvalidColumn {
            column: "transport_type",
            value: transport_raw.clone(),
        })?;
    let scheduler_raw: String = row.try_get("scheduler_type")?;
    let scheduler_type =
        SchedulerType::from_str(&scheduler_raw).map_err(|_| StoreError::InvalidColumn {
            column: "scheduler_type",
            value: scheduler_raw.clone(),
        })?;
    let mpirun_raw: String = row.try_get("mpirun_command")?;
    let mpirun_command: Vec<String> = serde_json::from_str(&mpirun_raw)?;

    Ok(ComputerRecord {
        id: row.try_get("id")?,
        uuid: row.try_get("uuid")?,
        name: row.try_get("name")?,
        hostname: row.try_get("hostname")?,
        description: row.try_get("description")?,
        transport_type,
        scheduler_type,
        workdir: row.try_get("workdir")?,
        mpirun_command,
        default_mpiprocs_per_machine: row.try_get("default_mpiprocs_per_machine")?,
        shebang: row.try_get("shebang")?,
        prepend_text: row.try_get("prepend_text")?,
        append_text: row.try_get("append_text")?,
        enabled: row.try_get("enabled")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_authinfo(row: SqliteRow) -> Result<AuthInfoRecord> {
    let params_raw: String = row.try_get("auth_params")?;
    Ok(AuthInfoRecord {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        computer_id: row.try_get("computer_id")?,
        enabled: row.try_get("enabled")?,
        auth_params: serde_json::from_str(&params_raw)?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_node(row: SqliteRow) -> Result<NodeRecord> {
    Ok(NodeRecord {
        id: row.try_get("id")?,
        uuid: row.try_get("uuid")?,
        node_type: row.try_get("node_type")?,
        label: row.try_get("label")?,
        user_id: row.try_get("user_id")?,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_comment(row: SqliteRow) -> Result<CommentRecord> {
    Ok(CommentRecord {
        id: row.try_get("id")?,
        uuid: row.try_get("uuid")?,
        node_id: row.try_get("node_id")?,
        user_id: row.try_get("user_id")?,
        user_email: row.try_get("user_email")?,
        content: row.try_get("content")?,
        ctime: row.try_get("ctime")?,
        mtime: row.try_get("mtime")?,
    })
}

fn row_to_group(row: SqliteRow) -> Result<GroupRecord> {
    Ok(GroupRecord {
        id: row.try_get("id")?,
        uuid: row.try_get("uuid")?,
        name: row.try_get("name")?,
        type_string: row.try_get("type_string")?,
        description: row.try_get("description")?,
        user_id: row.try_get("user_id")?,
        user_email: row.try_get("user_email")?,
        created_at: row.try_get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::types::NameFilters;

    async fn make_user(db: &AiidaStore, email: &str) -> i64 {
        db.insert_user(&NewUser::new(email)).await.unwrap()
    }

    fn make_computer(name: &str) -> NewComputer {
        NewComputer {
            name: name.to_string(),
            hostname: "localhost".to_string(),
            description: "my description".to_string(),
            transport_type: TransportType::Local,
            scheduler_type: SchedulerType::Direct,
            workdir: "/scratch/{username}/aiida_run".to_string(),
            mpirun_command: vec![
                "mpirun".to_string(),
                "-np".to_string(),
                "{tot_num_mpiprocs}".to_string(),
            ],
            default_mpiprocs_per_machine: Some(2),
            shebang: "#!/bin/bash".to_string(),
            prepend_text: "date\necho 'second line'".to_string(),
            append_text: String::new(),
            enabled: true,
        }
    }

    fn make_group(name: &str, user_id: i64) -> NewGroup {
        NewGroup {
            name: name.to_string(),
            type_string: String::new(),
            description: String::new(),
            user_id,
        }
    }

    async fn make_node(db: &AiidaStore, user_id: i64, label: &str) -> i64 {
        db.insert_node(&NewNode {
            node_type: "data.int".to_string(),
            label: label.to_string(),
            user_id,
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn insert_and_find_user_by_email() {
        let db = AiidaStore::open_memory().await.unwrap();
        let id = make_user(&db, "ada@example.org").await;

        let found = db
            .find_users(&UserFilter {
                email: Some("ada@example.org".to_string()),
                id: None,
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, id);
        assert!(found[0].is_active);
        assert!(found[0].password_hash.is_none());
        assert!(found[0].date_joined.ends_with('Z'));
    }

    #[tokio::test]
    async fn find_users_on_empty_filter_returns_all() {
        let db = AiidaStore::open_memory().await.unwrap();
        make_user(&db, "a@example.org").await;
        make_user(&db, "b@example.org").await;
        let all = db.find_users(&UserFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        let none = db
            .find_users(&UserFilter {
                email: Some("c@example.org".to_string()),
                id: None,
            })
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let db = AiidaStore::open_memory().await.unwrap();
        make_user(&db, "ada@example.org").await;
        let err = db
            .insert_user(&NewUser::new("ada@example.org"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UserExists(email) if email == "ada@example.org"));
    }

    #[tokio::test]
    async fn update_user_replaces_fields() {
        let db = AiidaStore::open_memory().await.unwrap();
        let id = make_user(&db, "ada@example.org").await;
        let mut update = NewUser::new("ada@example.org");
        update.first_name = "Ada".to_string();
        update.institution = "Analytical Engines".to_string();
        db.update_user(id, &update).await.unwrap();

        let found = db
            .find_users(&UserFilter {
                email: None,
                id: Some(id),
            })
            .await
            .unwrap();
        assert_eq!(found[0].first_name, "Ada");
        assert_eq!(found[0].institution, "Analytical Engines");

        let err = db.update_user(999, &update).await.unwrap_err();
        assert!(matches!(err, StoreError::UserNotFound(999)));
    }

    #[tokio::test]
    async fn insert_and_get_computer_round_trips_fields() {
        let db = AiidaStore::open_memory().await.unwrap();
        let computer = make_computer("noninteractive_computer");
        let id = db.insert_computer(&computer).await.unwrap();

        let got = db
            .get_computer_by_name("noninteractive_computer")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(got.id, id);
        assert_eq!(got.transport_type, TransportType::Local);
        assert_eq!(got.scheduler_type, SchedulerType::Direct);
        assert_eq!(got.mpirun_command, computer.mpirun_command);
        assert_eq!(got.default_mpiprocs_per_machine, Some(2));
        assert_eq!(got.prepend_text, "date\necho 'second line'");
        assert!(got.enabled);
        assert_eq!(got.uuid.len(), 36);
    }

    #[tokio::test]
    async fn duplicate_computer_name_rejected_and_original_kept() {
        let db = AiidaStore::open_memory().await.unwrap();
        db.insert_computer(&make_computer("c1")).await.unwrap();

        let mut second = make_computer("c1");
        second.hostname = "other-host".to_string();
        let err = db.insert_computer(&second).await.unwrap_err();
        assert!(matches!(err, StoreError::ComputerExists(name) if name == "c1"));
        let kept = db.get_computer_by_name("c1").await.unwrap().unwrap();
        assert_eq!(kept.hostname, "localhost");
    }

    #[tokio::test]
    async fn unspecified_mpiprocs_is_stored_as_null() {
        let db = AiidaStore::open_memory().await.unwrap();
        let mut computer = make_computer("c1");
        computer.default_mpiprocs_per_machine = None;
        db.insert_computer(&computer).await.unwrap();
        let got = db.get_computer_by_name("c1").await.unwrap().unwrap();
        assert_eq!(got.default_mpiprocs_per_machine, None);
    }

    #[tokio::test]
    async fn global_flag_and_authinfo_flag_are_independent() {
        let db = AiidaStore::open_memory().await.unwrap();
        let user_id = make_user(&db, "ada@example.org").await;
        let computer_id = db.insert_computer(&make_computer("c1")).await.unwrap();
        db.upsert_authinfo(&NewAuthInfo {
            user_id,
            computer_id,
            enabled: true,
            auth_params: serde_json::json!({}),
        })
        .await
        .unwrap();

        db.set_computer_enabled(computer_id, false).await.unwrap();
        let authinfo = db.get_authinfo(computer_id, user_id).await.unwrap().unwrap();
        assert!(authinfo.enabled);

        assert!(
            db.set_authinfo_enabled(computer_id, user_id, false)
                .await
                .unwrap()
        );
        db.set_computer_enabled(computer_id, true).await.unwrap();
        let computer = db.get_computer_by_id(computer_id).await.unwrap().unwrap();
        let authinfo = db.get_authinfo(computer_id, user_id).await.unwrap().unwrap();
        assert!(computer.enabled);
        assert!(!authinfo.enabled);
    }

    #[tokio::test]
    async fn set_authinfo_enabled_without_row_returns_false() {
        let db = AiidaStore::open_memory().await.unwrap();
        let user_id = make_user(&db, "ada@example.org").await;
        let computer_id = db.insert_computer(&make_computer("c1")).await.unwrap();
        assert!(
            !db.set_authinfo_enabled(computer_id, user_id, true)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn upsert_authinfo_replaces_payload_and_keeps_enabled_flag() {
        let db = AiidaStore::open_memory().await.unwrap();
        let user_id = make_user(&db, "ada@example.org").await;
        let computer_id = db.insert_computer(&make_computer("c1")).await.unwrap();
        let first = db
            .upsert_authinfo(&NewAuthInfo {
                user_id,
                computer_id,
                enabled: true,
                auth_params: serde_json::json!({"port": 22}),
            })
            .await
            .unwrap();
        db.set_authinfo_enabled(computer_id, user_id, false)
            .await
            .unwrap();
        let second = db
            .upsert_authinfo(&NewAuthInfo {
                user_id,
                computer_id,
                enabled: true,
                auth_params: serde_json::json!({"port": 2222}),
            })
            .await
            .unwrap();
        assert_eq!(first, second);

        let authinfo = db.get_authinfo(computer_id, user_id).await.unwrap().unwrap();
        assert_eq!(authinfo.auth_params["port"], 2222);
        assert!(!authinfo.enabled);
    }

    #[tokio::test]
    async fn rename_computer_rejects_taken_name() {
        let db = AiidaStore::open_memory().await.unwrap();
        let id = db.insert_computer(&make_computer("c1")).await.unwrap();
        db.insert_computer(&make_computer("c2")).await.unwrap();

        let err = db.rename_computer(id, "c2").await.unwrap_err();
        assert!(matches!(err, StoreError::ComputerExists(_)));
        db.rename_computer(id, "c3").await.unwrap();
        assert!(db.get_computer_by_name("c3").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_computer_removes_authinfos() {
        let db = AiidaStore::open_memory().await.unwrap();
        let user_id = make_user(&db, "ada@example.org").await;
        let computer_id = db.insert_computer(&make_computer("c1")).await.unwrap();
        db.upsert_authinfo(&NewAuthInfo {
            user_id,
            computer_id,
            enabled: true,
            auth_params: serde_json::json!({}),
        })
        .await
        .unwrap();

        assert_eq!(db.delete_computer(computer_id).await.unwrap(), 1);
        assert!(db.list_authinfos(computer_id).await.unwrap().is_empty());
        assert_eq!(db.delete_computer(computer_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn group_name_unique_per_type_string() {
        let db = AiidaStore::open_memory().await.unwrap();
        let user_id = make_user(&db, "ada@example.org").await;
        db.insert_group(&make_group("g1", user_id)).await.unwrap();

        let err = db
            .insert_group(&make_group("g1", user_id))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::GroupExists(_)));

        let mut imported = make_group("g1", user_id);
        imported.type_string = "auto.import".to_string();
        db.insert_group(&imported).await.unwrap();
        assert_eq!(db.find_groups_by_name("g1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn membership_is_a_set() {
        let db = AiidaStore::open_memory().await.unwrap();
        let user_id = make_user(&db, "ada@example.org").await;
        let group_id = db.insert_group(&make_group("g1", user_id)).await.unwrap();
        let n1 = make_node(&db, user_id, "n1").await;
        let n2 = make_node(&db, user_id, "n2").await;

        assert_eq!(db.add_group_nodes(group_id, &[n1, n2]).await.unwrap(), 2);
        assert_eq!(db.add_group_nodes(group_id, &[n1]).await.unwrap(), 0);
        assert_eq!(db.count_group_nodes(group_id).await.unwrap(), 2);

        assert_eq!(db.remove_group_nodes(group_id, &[n1]).await.unwrap(), 1);
        assert_eq!(db.remove_group_nodes(group_id, &[n1]).await.unwrap(), 0);
        assert_eq!(db.group_node_ids(group_id).await.unwrap(), vec![n2]);
    }

    #[tokio::test]
    async fn delete_group_keeps_nodes() {
        let db = AiidaStore::open_memory().await.unwrap();
        let user_id = make_user(&db, "ada@example.org").await;
        let group_id = db.insert_group(&make_group("g1", user_id)).await.unwrap();
        let n1 = make_node(&db, user_id, "n1").await;
        db.add_group_nodes(group_id, &[n1]).await.unwrap();

        assert_eq!(db.delete_group(group_id).await.unwrap(), 1);
        assert!(db.get_group_by_id(group_id).await.unwrap().is_none());
        assert!(db.get_node_by_id(n1).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn rename_group_rejects_collision() {
        let db = AiidaStore::open_memory().await.unwrap();
        let user_id = make_user(&db, "ada@example.org").await;
        let g1 = db.insert_group(&make_group("g1", user_id)).await.unwrap();
        db.insert_group(&make_group("g2", user_id)).await.unwrap();

        let err = db.rename_group(g1, "g2").await.unwrap_err();
        assert!(matches!(err, StoreError::GroupExists(_)));
        assert_eq!(
            db.get_group_by_id(g1).await.unwrap().unwrap().name,
            "g1"
        );
    }

    #[tokio::test]
    async fn query_groups_ands_every_filter() {
        let db = AiidaStore::open_memory().await.unwrap();
        let ada = make_user(&db, "ada@example.org").await;
        let bob = make_user(&db, "bob@example.org").await;
        let g1 = db.insert_group(&make_group("run_alpha", ada)).await.unwrap();
        db.insert_group(&make_group("run_beta", ada)).await.unwrap();
        db.insert_group(&make_group("run_alpha_bob", bob)).await.unwrap();
        let node = make_node(&db, ada, "n1").await;
        db.add_group_nodes(g1, &[node]).await.unwrap();

        let by_user = db
            .query_groups(&GroupQuery {
                user_id: Some(ada),
                ..GroupQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(by_user.len(), 2);
        assert_eq!(by_user[0].user_email, "ada@example.org");

        let by_name = db
            .query_groups(&GroupQuery {
                name_filters: NameFilters {
                    startswith: Some("run_".to_string()),
                    endswith: None,
                    contains: Some("alpha".to_string()),
                },
                ..GroupQuery::default()
            })
            .await
            .unwrap();
        let names: Vec<_> = by_name.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["run_alpha", "run_alpha_bob"]);

        let by_suffix = db
            .query_groups(&GroupQuery {
                name_filters: NameFilters {
                    startswith: None,
                    endswith: Some("_bob".to_string()),
                    contains: None,
                },
                ..GroupQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(by_suffix.len(), 1);

        let by_node = db
            .query_groups(&GroupQuery {
                node_ids: vec![node],
                ..GroupQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(by_node.len(), 1);
        assert_eq!(by_node[0].id, g1);

        let by_type = db
            .query_groups(&GroupQuery {
                type_string: Some("auto.import".to_string()),
                ..GroupQuery::default()
            })
            .await
            .unwrap();
        assert!(by_type.is_empty());
    }

    #[tokio::test]
    async fn name_filters_are_case_sensitive() {
        let db = AiidaStore::open_memory().await.unwrap();
        let ada = make_user(&db, "ada@example.org").await;
        db.insert_group(&make_group("Run", ada)).await.unwrap();
        let found = db
            .query_groups(&GroupQuery {
                name_filters: NameFilters {
                    startswith: Some("run".to_string()),
                    endswith: None,
                    contains: None,
                },
                ..GroupQuery::default()
            })
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn query_groups_created_after_filters_by_timestamp() {
        let db = AiidaStore::open_memory().await.unwrap();
        let ada = make_user(&db, "ada@example.org").await;
        db.insert_group(&make_group("g1", ada)).await.unwrap();

        let recent = db
            .query_groups(&GroupQuery {
                created_after: Some("2000-01-01T00:00:00.000Z".to_string()),
                ..GroupQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(recent.len(), 1);

        let future = db
            .query_groups(&GroupQuery {
                created_after: Some("9999-01-01T00:00:00.000Z".to_string()),
                ..GroupQuery::default()
            })
            .await
            .unwrap();
        assert!(future.is_empty());
    }

    #[tokio::test]
    async fn nodes_resolve_by_id_and_uuid() {
        let db = AiidaStore::open_memory().await.unwrap();
        let ada = make_user(&db, "ada@example.org").await;
        let n1 = make_node(&db, ada, "n1").await;
        let n2 = make_node(&db, ada, "n2").await;

        let by_id = db.get_node_by_id(n1).await.unwrap().unwrap();
        let by_uuid = db.get_node_by_uuid(&by_id.uuid).await.unwrap().unwrap();
        assert_eq!(by_uuid.id, n1);

        let many = db.get_nodes_by_ids(&[n2, n1, 999]).await.unwrap();
        let ids: Vec<_> = many.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![n1, n2]);
        assert!(db.get_nodes_by_ids(&[]).await.unwrap().is_empty());
        assert_eq!(db.list_nodes().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn comments_belong_to_their_node_and_author() {
        let db = AiidaStore::open_memory().await.unwrap();
        let ada = make_user(&db, "ada@example.org").await;
        let n1 = make_node(&db, ada, "n1").await;
        let n2 = make_node(&db, ada, "n2").await;

        let first = db
            .insert_comment(&NewComment {
                node_id: n1,
                user_id: ada,
                content: "first".to_string(),
            })
            .await
            .unwrap();
        db.insert_comment(&NewComment {
            node_id: n1,
            user_id: ada,
            content: "second".to_string(),
        })
        .await
        .unwrap();

        let comments = db.list_node_comments(n1).await.unwrap();
        let contents: Vec<_> = comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
        assert_eq!(comments[0].user_email, "ada@example.org");
        assert!(db.list_node_comments(n2).await.unwrap().is_empty());

        assert!(db.update_comment_content(first, "edited").await.unwrap());
        let edited = db.get_comment(first).await.unwrap().unwrap();
        assert_eq!(edited.content, "edited");
        assert!(edited.mtime >= edited.ctime);
        assert!(!db.update_comment_content(999, "x").await.unwrap());

        assert!(db.delete_comment(first).await.unwrap());
        assert!(!db.delete_comment(first).await.unwrap());
        assert!(db.get_comment(first).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn comment_on_missing_node_is_rejected() {
        let db = AiidaStore::open_memory().await.unwrap();
        let ada = make_user(&db, "ada@example.org").await;
        let err = db
            .insert_comment(&NewComment {
                node_id: 999,
                user_id: ada,
                content: "orphan".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Sqlx(_)));
    }

    #[tokio::test]
    async fn open_creates_file_database() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("aiida.sqlite");
        let db = AiidaStore::open(&path).await.unwrap();
        make_user(&db, "ada@example.org").await;
        drop(db);

        let reopened = AiidaStore::open(&path).await.unwrap();
        assert_eq!(
            reopened
                .find_users(&UserFilter::default())
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
