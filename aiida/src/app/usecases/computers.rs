// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::time::Duration;

use serde::Serialize;

use crate::app::errors::{AppError, AppResult};
use crate::app::services::schedulers::SchedulerType;
use crate::app::services::{shell, templates, validation};
use crate::app::types::{
    AuthInfoRecord, AuthParams, ComputerRecord, NewAuthInfo, NewComputer, SshAuthParams,
    TransportType, UserFilter, UserRecord,
};

use super::UseCases;

/// Raw setup values, as typed on the command line or at the prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputerSetupRequest {
    pub name: String,
    pub hostname: String,
    pub description: String,
    pub transport: String,
    pub scheduler: String,
    pub shebang: String,
    pub workdir: String,
    pub mpirun_command: String,
    pub mpiprocs_per_machine: Option<i64>,
    pub prepend_text: String,
    pub append_text: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComputerStatus {
    pub computer: ComputerRecord,
    /// Whether the user has an authinfo for this computer.
    pub configured: bool,
    /// The user's own flag; `false` when not configured.
    pub user_enabled: bool,
}

impl ComputerStatus {
    pub fn usable(&self) -> bool {
        self.computer.enabled && self.configured && self.user_enabled
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum ToggleScope {
    Global,
    User { email: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ToggleOutcome {
    pub computer: String,
    pub scope: ToggleScope,
    pub enabled: bool,
    /// False when the flag already had the requested value.
    pub changed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigureComputerOutcome {
    pub computer: String,
    pub user: String,
    pub transport: TransportType,
    pub already_present: bool,
    pub authinfo: AuthInfoRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestStep {
    pub name: String,
    pub ok: bool,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComputerTestReport {
    pub computer: String,
    pub transport: TransportType,
    pub steps: Vec<TestStep>,
}

impl ComputerTestReport {
    pub fn success(&self) -> bool {
        self.steps.iter().all(|step| step.ok)
    }

    fn push(&mut self, name: &str, ok: bool, detail: impl Into<String>) {
        self.steps.push(TestStep {
            name: name.to_string(),
            ok,
            detail: detail.into(),
        });
    }
}

impl UseCases {
    pub async fn computer_exists(&self, name: &str) -> AppResult<bool> {
        Ok(self.computers.get_computer_by_name(name.trim()).await?.is_some())
    }

    pub async fn get_computer(&self, name: &str) -> AppResult<ComputerRecord> {
        self.computers
            .get_computer_by_name(name.trim())
            .await?
            .ok_or_else(|| {
                AppError::not_existent(format!("No computer found with name '{}'", name.trim()))
            })
    }

    /// Validates every field in order and persists the computer. Nothing is
    /// written when any check fails.
    pub async fn setup_computer(&self, request: &ComputerSetupRequest) -> AppResult<ComputerRecord> {
        let name = validation::validate_computer_name(&request.name)?;
        if self.computer_exists(&name).await? {
            return Err(AppError::uniqueness(format!(
                "Computer with name '{name}' already exists"
            )));
        }
        let transport_type = request
            .transport
            .parse::<TransportType>()
            .map_err(AppError::validation)?;
        let scheduler_type = request
            .scheduler
            .parse::<SchedulerType>()
            .map_err(AppError::validation)?;
        let hostname = validation::validate_hostname(&request.hostname)?;
        let shebang = validation::validate_shebang(&request.shebang)?;
        let mpirun_command =
            validation::validate_mpirun_command(&request.mpirun_command, scheduler_type)?;
        let default_mpiprocs_per_machine =
            validation::normalize_mpiprocs_per_machine(request.mpiprocs_per_machine)?;
        let workdir = validation::validate_workdir(&request.workdir)?;

        let computer = NewComputer {
            name: name.clone(),
            hostname,
            description: request.description.trim().to_string(),
            transport_type,
            scheduler_type,
            workdir,
            mpirun_command,
            default_mpiprocs_per_machine,
            shebang,
            prepend_text: request.prepend_text.clone(),
            append_text: request.append_text.clone(),
            enabled: request.enabled,
        };
        let id = self.computers.insert_computer(&computer).await?;
        log::info!("computer '{name}' set up with id={id}");
        self.computers
            .get_computer_by_id(id)
            .await?
            .ok_or_else(|| AppError::internal(format!("computer {id} vanished after insert")))
    }

    /// Every computer with the state seen by `user`. Globally disabled
    /// computers are skipped unless `include_disabled`.
    pub async fn list_computers(
        &self,
        user: Option<&UserRecord>,
        include_disabled: bool,
    ) -> AppResult<Vec<ComputerStatus>> {
        let computers = self.computers.list_computers().await?;
        let mut out = Vec::with_capacity(computers.len());
        for computer in computers {
            if !include_disabled && !computer.enabled {
                continue;
            }
            let authinfo = match user {
                Some(user) => self.computers.get_authinfo(computer.id, user.id).await?,
                None => None,
            };
            out.push(ComputerStatus {
                configured: authinfo.is_some(),
                user_enabled: authinfo.map(|info| info.enabled).unwrap_or(false),
                computer,
            });
        }
        Ok(out)
    }

    pub async fn computer_status(
        &self,
        name: &str,
        user: Option<&UserRecord>,
    ) -> AppResult<ComputerStatus> {
        let computer = self.get_computer(name).await?;
        let authinfo = match user {
            Some(user) => self.computers.get_authinfo(computer.id, user.id).await?,
            None => None,
        };
        Ok(ComputerStatus {
            configured: authinfo.is_some(),
            user_enabled: authinfo.map(|info| info.enabled).unwrap_or(false),
            computer,
        })
    }

    pub async fn enable_computer(
        &self,
        name: &str,
        only_for_user: Option<&str>,
    ) -> AppResult<ToggleOutcome> {
        self.toggle_computer(name, only_for_user, true).await
    }

    pub async fn disable_computer(
        &self,
        name: &str,
        only_for_user: Option<&str>,
    ) -> AppResult<ToggleOutcome> {
        self.toggle_computer(name, only_for_user, false).await
    }

    /// Without a user scope only the global flag changes; with one only that
    /// user's authinfo flag changes.
    async fn toggle_computer(
        &self,
        name: &str,
        only_for_user: Option<&str>,
        enabled: bool,
    ) -> AppResult<ToggleOutcome> {
        let computer = self.get_computer(name).await?;
        match only_for_user {
            None => {
                let changed = computer.enabled != enabled;
                if changed {
                    self.computers
                        .set_computer_enabled(computer.id, enabled)
                        .await?;
                }
                Ok(ToggleOutcome {
                    computer: computer.name,
                    scope: ToggleScope::Global,
                    enabled,
                    changed,
                })
            }
            Some(email) => {
                let user = self.get_user(email).await?;
                let authinfo = self
                    .computers
                    .get_authinfo(computer.id, user.id)
                    .await?
                    .ok_or_else(|| {
                        AppError::not_existent(format!(
                            "User with email '{}' is not configured for computer '{}'",
                            user.email, computer.name
                        ))
                    })?;
                let changed = authinfo.enabled != enabled;
                if changed {
                    self.computers
                        .set_authinfo_enabled(computer.id, user.id, enabled)
                        .await?;
                }
                Ok(ToggleOutcome {
                    computer: computer.name,
                    scope: ToggleScope::User { email: user.email },
                    enabled,
                    changed,
                })
            }
        }
    }

    /// Users holding an authinfo for the computer, in authinfo order.
    pub async fn configured_users(&self, name: &str) -> AppResult<Vec<UserRecord>> {
        let computer = self.get_computer(name).await?;
        let mut users = Vec::new();
        for authinfo in self.computers.list_authinfos(computer.id).await? {
            let found = self
                .users
                .find_users(&UserFilter {
                    email: None,
                    id: Some(authinfo.user_id),
                })
                .await?;
            users.extend(found);
        }
        Ok(users)
    }

    pub async fn get_authinfo(
        &self,
        computer: &ComputerRecord,
        user: &UserRecord,
    ) -> AppResult<Option<AuthInfoRecord>> {
        self.computers.get_authinfo(computer.id, user.id).await
    }

    /// Stores the per-user payload. Last write wins; the outcome says
    /// whether a payload was already present.
    pub async fn configure_computer(
        &self,
        name: &str,
        user_email: Option<&str>,
        params: &AuthParams,
    ) -> AppResult<ConfigureComputerOutcome> {
        let computer = self.get_computer(name).await?;
        let user = self.resolve_user(user_email).await?;
        match (computer.transport_type, params) {
            (TransportType::Local, AuthParams::Local) => {}
            (TransportType::Ssh, AuthParams::Ssh(ssh)) => {
                if ssh.port == 0 {
                    return Err(AppError::validation("port must be between 1 and 65535"));
                }
                if ssh.timeout_secs == 0 {
                    return Err(AppError::validation("timeout must be positive"));
                }
            }
            (transport, _) => {
                return Err(AppError::validation(format!(
                    "configuration parameters do not match the '{transport}' transport of computer '{}'",
                    computer.name
                )));
            }
        }
        let already_present = self
            .computers
            .get_authinfo(computer.id, user.id)
            .await?
            .is_some();
        self.computers
            .upsert_authinfo(&NewAuthInfo {
                user_id: user.id,
                computer_id: computer.id,
                enabled: true,
                auth_params: params.to_json(),
            })
            .await?;
        let authinfo = self
            .computers
            .get_authinfo(computer.id, user.id)
            .await?
            .ok_or_else(|| AppError::internal("authinfo vanished after upsert"))?;
        log::info!(
            "computer '{}' configured for {} (already_present={already_present})",
            computer.name,
            user.email
        );
        Ok(ConfigureComputerOutcome {
            computer: computer.name,
            user: user.email,
            transport: computer.transport_type,
            already_present,
            authinfo,
        })
    }

    /// Current payload parsed as ssh params, or defaults.
    pub async fn ssh_params_for(
        &self,
        computer: &ComputerRecord,
        user: &UserRecord,
    ) -> AppResult<SshAuthParams> {
        match self.computers.get_authinfo(computer.id, user.id).await? {
            Some(authinfo) => serde_json::from_value(authinfo.auth_params).map_err(|e| {
                AppError::internal(format!("stored ssh parameters are malformed: {e}"))
            }),
            None => Ok(SshAuthParams::default()),
        }
    }

    /// Exercises the transport against the computer. Failing checks are
    /// reported as failed steps; an unknown computer is an error.
    pub async fn test_computer(
        &self,
        name: &str,
        user_email: Option<&str>,
    ) -> AppResult<ComputerTestReport> {
        let computer = self.get_computer(name).await?;
        let user = match user_email {
            Some(email) => Some(self.get_user(email).await?),
            None => self.get_automatic_user().await?,
        };
        let mut report = ComputerTestReport {
            computer: computer.name.clone(),
            transport: computer.transport_type,
            steps: Vec::new(),
        };
        if !computer.enabled {
            report.push("enabled", false, "computer is disabled globally");
        }
        if let Some(user) = &user
            && let Some(authinfo) = self.computers.get_authinfo(computer.id, user.id).await?
            && !authinfo.enabled
        {
            report.push(
                "enabled",
                false,
                format!("computer is disabled for {}", user.email),
            );
        }
        match computer.transport_type {
            TransportType::Local => self.test_local(&computer, &mut report).await?,
            TransportType::Ssh => {
                let params = match &user {
                    Some(user) => self.ssh_params_for(&computer, user).await?,
                    None => SshAuthParams::default(),
                };
                self.test_ssh(&computer, &params, &mut report).await?
            }
        }
        Ok(report)
    }

    async fn test_local(
        &self,
        computer: &ComputerRecord,
        report: &mut ComputerTestReport,
    ) -> AppResult<()> {
        let whoami = self.local_exec.exec_capture("whoami", &[]).await;
        let username = match whoami {
            Ok(capture) if capture.success() && !capture.stdout.trim().is_empty() => {
                let username = capture.stdout.trim().to_string();
                report.push("whoami", true, username.clone());
                username
            }
            Ok(capture) => {
                report.push(
                    "whoami",
                    false,
                    format!(
                        "exit code {:?}: {}",
                        capture.exit_code,
                        capture.stderr.trim()
                    ),
                );
                return Ok(());
            }
            Err(err) => {
                report.push("whoami", false, err.to_string());
                return Ok(());
            }
        };

        let workdir = templates::render(&computer.workdir, |field| {
            (field == "username").then(|| username.clone())
        })?;
        report.push("workdir", true, workdir);

        let submit = computer.scheduler_type.submit_command();
        let script = shell::command_exists_script(submit);
        match self.local_exec.exec_capture("sh", &["-c", &script]).await {
            Ok(capture) if capture.success() => {
                report.push("scheduler", true, format!("'{submit}' found on PATH"));
            }
            Ok(_) => report.push("scheduler", false, format!("'{submit}' not found on PATH")),
            Err(err) => report.push("scheduler", false, err.to_string()),
        }
        Ok(())
    }

    async fn test_ssh(
        &self,
        computer: &ComputerRecord,
        params: &SshAuthParams,
        report: &mut ComputerTestReport,
    ) -> AppResult<()> {
        let timeout = Duration::from_secs(params.timeout_secs);
        let target = format!("{}:{}", computer.hostname, params.port);
        match self
            .network
            .check_host_reachable(&computer.hostname, params.port, timeout)
            .await
        {
            Ok(true) => report.push("reachable", true, target),
            Ok(false) => report.push(
                "reachable",
                false,
                format!("{target} did not accept a connection within {}s", params.timeout_secs),
            ),
            Err(err) => report.push("reachable", false, format!("{target}: {err}")),
        }
        if let Some(username) = &params.username {
            let workdir = templates::render(&computer.workdir, |field| {
                (field == "username").then(|| username.clone())
            })?;
            report.push("workdir", true, workdir);
        }
        Ok(())
    }

    pub async fn rename_computer(&self, name: &str, new_name: &str) -> AppResult<ComputerRecord> {
        let computer = self.get_computer(name).await?;
        let new_name = validation::validate_computer_name(new_name)?;
        if new_name == computer.name {
            return Err(AppError::validation(
                "the new name is equal to the old one, nothing to do",
            ));
        }
        if self.computer_exists(&new_name).await? {
            return Err(AppError::uniqueness(format!(
                "Computer with name '{new_name}' already exists"
            )));
        }
        self.computers.rename_computer(computer.id, &new_name).await?;
        self.get_computer(&new_name).await
    }

    pub async fn delete_computer(&self, name: &str) -> AppResult<ComputerRecord> {
        let computer = self.get_computer(name).await?;
        self.computers.delete_computer(computer.id).await?;
        log::info!("computer '{}' deleted", computer.name);
        Ok(computer)
    }
}
