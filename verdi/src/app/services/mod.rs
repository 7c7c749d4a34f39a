// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::collections::HashSet;

use aiida::app::errors::AppError as CoreError;
use aiida::app::services::schedulers::SchedulerType;
use aiida::app::services::validation;
use aiida::app::types::{
    GROUP_TYPE_ALIASES, SshAuthParams, TransportType, USER_DEFINED_GROUP_TYPE, UserRecord,
    group_type_for_alias,
};
use aiida::app::usecases::{ComputerSetupRequest, UserConfiguration};

use crate::app::UiMode;
use crate::app::commands::{ConfigureComputerCommand, ConfigureUserCommand, SetupComputerCommand};
use crate::app::errors::{AppError, AppResult};
use crate::app::ports::{EditorPort, InteractionPort, OutputPort};

pub const DEFAULT_SHEBANG: &str = "#!/bin/bash";
pub const DEFAULT_WORKDIR: &str = "/scratch/{username}/aiida_run/";
pub const DEFAULT_MPIRUN_COMMAND: &str = "mpirun -np {tot_num_mpiprocs}";

/// Everything from this line on is dropped from editor sessions.
const EDITOR_MARKER: &str = "#=== Lines below this marker are discarded ===";

pub struct ComputerSetupResolver<'a> {
    interaction: &'a dyn InteractionPort,
    output: &'a dyn OutputPort,
    editor: &'a dyn EditorPort,
    ui_mode: UiMode,
}

impl<'a> ComputerSetupResolver<'a> {
    pub fn new(
        interaction: &'a dyn InteractionPort,
        output: &'a dyn OutputPort,
        editor: &'a dyn EditorPort,
        ui_mode: UiMode,
    ) -> Self {
        Self {
            interaction,
            output,
            editor,
            ui_mode,
        }
    }

    /// Fills in every setup value. Non-interactive runs take defaults where
    /// they exist and fail on the rest; interactive runs prompt until each
    /// value validates. Final validation is left to the registry so both
    /// paths store identical state.
    pub async fn resolve(
        &self,
        cmd: SetupComputerCommand,
        existing_names: &HashSet<String>,
    ) -> AppResult<ComputerSetupRequest> {
        let name = self
            .value_or_prompt(
                normalize_option(cmd.label),
                "label",
                "Computer label: ",
                "Unique name used to refer to the computer.",
                None,
                |input| {
                    let name = validation::validate_computer_name(input)?;
                    if existing_names.contains(&name) {
                        return Err(CoreError::uniqueness(format!(
                            "Computer with name '{name}' already exists"
                        ))
                        .into());
                    }
                    Ok(name)
                },
            )
            .await?;

        let hostname = self
            .value_or_prompt(
                normalize_option(cmd.hostname),
                "hostname",
                "Hostname: ",
                "Fully qualified hostname of the computer.",
                None,
                |input| Ok(validation::validate_hostname(input)?),
            )
            .await?;

        let description = match cmd.description {
            Some(value) => value.trim().to_string(),
            None if !self.ui_mode.is_interactive() => String::new(),
            None => self
                .interaction
                .prompt_line("Description: ", "Free-form description; may be empty.")
                .await?
                .trim()
                .to_string(),
        };

        let enabled = match cmd.enabled {
            Some(value) => value,
            None if !self.ui_mode.is_interactive() => true,
            None => {
                self.interaction
                    .confirm(
                        "Enable the computer? (yes/no): ",
                        "Disabled computers are skipped when submitting calculations.",
                    )
                    .await?
            }
        };

        let transport_help = format!("One of: {}.", choices(&TransportType::ALL));
        let transport = self
            .value_or_prompt(
                normalize_option(cmd.transport),
                "transport",
                "Transport plugin: ",
                &transport_help,
                None,
                |input| parse_choice::<TransportType>(input).map(|t| t.as_str().to_string()),
            )
            .await?;

        let scheduler_help = format!("One of: {}.", choices(&SchedulerType::ALL));
        let scheduler = self
            .value_or_prompt(
                normalize_option(cmd.scheduler),
                "scheduler",
                "Scheduler plugin: ",
                &scheduler_help,
                None,
                |input| parse_choice::<SchedulerType>(input).map(|s| s.as_str().to_string()),
            )
            .await?;

        let shebang = self
            .value_or_prompt(
                normalize_option(cmd.shebang),
                "shebang",
                "Shebang line: ",
                "First line of submission scripts, starting with '#!'.",
                Some(DEFAULT_SHEBANG),
                |input| Ok(validation::validate_shebang(input)?),
            )
            .await?;

        let workdir = self
            .value_or_prompt(
                normalize_option(cmd.work_dir),
                "work directory",
                "Work directory: ",
                "Absolute path for calculations; '{username}' is replaced by the remote user.",
                Some(DEFAULT_WORKDIR),
                |input| Ok(validation::validate_workdir(input)?),
            )
            .await?;

        let parsed_scheduler = scheduler.parse::<SchedulerType>().ok();
        let mpirun_command = self
            .value_or_prompt(
                normalize_option(cmd.mpirun_command),
                "mpirun command",
                "Mpirun command: ",
                "Command used to launch parallel jobs, e.g. 'mpirun -np {tot_num_mpiprocs}'.",
                Some(DEFAULT_MPIRUN_COMMAND),
                |input| match parsed_scheduler {
                    Some(scheduler) => {
                        Ok(validation::validate_mpirun_command(input, scheduler)?.join(" "))
                    }
                    None => Ok(input.to_string()),
                },
            )
            .await?;

        let mpiprocs_per_machine = self.resolve_mpiprocs(cmd.mpiprocs_per_machine).await?;

        let prepend_text = match cmd.prepend_text {
            Some(value) => value,
            None if !self.ui_mode.is_interactive() => String::new(),
            None => self.edit_text("prepended to")?,
        };
        let append_text = match cmd.append_text {
            Some(value) => value,
            None if !self.ui_mode.is_interactive() => String::new(),
            None => self.edit_text("appended to")?,
        };

        Ok(ComputerSetupRequest {
            name,
            hostname,
            description,
            transport,
            scheduler,
            shebang,
            workdir,
            mpirun_command,
            mpiprocs_per_machine,
            prepend_text,
            append_text,
            enabled,
        })
    }

    async fn resolve_mpiprocs(&self, given: Option<i64>) -> AppResult<Option<i64>> {
        if !self.ui_mode.is_interactive() {
            return Ok(given);
        }
        if let Some(value) = given {
            match validation::normalize_mpiprocs_per_machine(Some(value)) {
                Ok(normalized) => return Ok(normalized.map(i64::from)),
                Err(err) => self.output.warn(err.message()).await?,
            }
        }
        let value = prompt_and_validate(
            self.interaction,
            self.output,
            "Default #procs/machine: ",
            "Leave empty or 0 when the number is not fixed.",
            Some(""),
            |input| {
                let parsed = parse_optional_i64(input)?;
                let normalized = validation::normalize_mpiprocs_per_machine(parsed)?;
                Ok(normalized.map(|n| n.to_string()).unwrap_or_default())
            },
        )
        .await?;
        parse_optional_i64(&value)
    }

    fn edit_text(&self, position: &str) -> AppResult<String> {
        let template = format!(
            "\n{EDITOR_MARKER}\n# Lines above the marker are {position} every submission script.\n"
        );
        let edited = self.editor.edit(&template)?;
        Ok(text_from_editor(&edited))
    }

    async fn value_or_prompt<V>(
        &self,
        given: Option<String>,
        field: &str,
        prompt: &str,
        help: &str,
        default: Option<&str>,
        mut validate: V,
    ) -> AppResult<String>
    where
        V: FnMut(&str) -> AppResult<String>,
    {
        if !self.ui_mode.is_interactive() {
            return match (given, default) {
                (Some(value), _) => Ok(value),
                (None, Some(default)) => Ok(default.to_string()),
                (None, None) => Err(AppError::invalid_argument(format!(
                    "{field} is required in non-interactive mode"
                ))),
            };
        }
        if let Some(value) = given {
            match validate(&value) {
                Ok(value) => return Ok(value),
                Err(err) => self.output.warn(&validation_error_message(&err)).await?,
            }
        }
        prompt_and_validate(
            self.interaction,
            self.output,
            prompt,
            help,
            default,
            validate,
        )
        .await
    }
}

pub struct SshConfigureResolver<'a> {
    interaction: &'a dyn InteractionPort,
    output: &'a dyn OutputPort,
    ui_mode: UiMode,
}

impl<'a> SshConfigureResolver<'a> {
    pub fn new(
        interaction: &'a dyn InteractionPort,
        output: &'a dyn OutputPort,
        ui_mode: UiMode,
    ) -> Self {
        Self {
            interaction,
            output,
            ui_mode,
        }
    }

    /// Flags win; the rest comes from `current` in non-interactive mode or
    /// from prompts defaulting to `current` otherwise.
    pub async fn resolve(
        &self,
        cmd: &ConfigureComputerCommand,
        current: SshAuthParams,
    ) -> AppResult<SshAuthParams> {
        if !self.ui_mode.is_interactive() {
            return Ok(SshAuthParams {
                username: normalize_option(cmd.username.clone()).or(current.username),
                port: cmd.port.unwrap_or(current.port),
                key_filename: normalize_option(cmd.key_filename.clone()).or(current.key_filename),
                timeout_secs: cmd.timeout.unwrap_or(current.timeout_secs),
            });
        }

        let username = match normalize_option(cmd.username.clone()) {
            Some(value) => Some(value),
            None => {
                let default = current.username.clone().unwrap_or_default();
                normalize_option(Some(
                    self.interaction
                        .prompt_line_with_default(
                            "User name: ",
                            "Login name on the remote computer.",
                            &default,
                        )
                        .await?,
                ))
            }
        };

        let port = match cmd.port {
            Some(port) => port,
            None => {
                let value = prompt_and_validate(
                    self.interaction,
                    self.output,
                    "Port number: ",
                    "SSH port, between 1 and 65535.",
                    Some(&current.port.to_string()),
                    |input| parse_port(input).map(|port| port.to_string()),
                )
                .await?;
                parse_port(&value)?
            }
        };

        let key_filename = match normalize_option(cmd.key_filename.clone()) {
            Some(value) => Some(value),
            None => {
                let default = current.key_filename.clone().unwrap_or_default();
                normalize_option(Some(
                    self.interaction
                        .prompt_line_with_default(
                            "Key filename: ",
                            "Private key used to authenticate; empty for the agent default.",
                            &default,
                        )
                        .await?,
                ))
            }
        };

        let timeout_secs = match cmd.timeout {
            Some(timeout) => timeout,
            None => {
                let value = prompt_and_validate(
                    self.interaction,
                    self.output,
                    "Connection timeout (s): ",
                    "Seconds to wait for the connection to open.",
                    Some(&current.timeout_secs.to_string()),
                    |input| parse_timeout(input).map(|secs| secs.to_string()),
                )
                .await?;
                parse_timeout(&value)?
            }
        };

        Ok(SshAuthParams {
            username,
            port,
            key_filename,
            timeout_secs,
        })
    }
}

/// Collects the fields for `user configure`. Prompts default to the stored
/// values of `existing`.
pub async fn resolve_user_configuration(
    interaction: &dyn InteractionPort,
    output: &dyn OutputPort,
    ui_mode: UiMode,
    cmd: &ConfigureUserCommand,
    existing: Option<&UserRecord>,
) -> AppResult<UserConfiguration> {
    if !ui_mode.is_interactive() {
        return Ok(UserConfiguration {
            email: cmd.email.clone(),
            first_name: cmd.first_name.clone(),
            last_name: cmd.last_name.clone(),
            institution: cmd.institution.clone(),
            password: None,
        });
    }

    let mut fields = Vec::with_capacity(3);
    for (given, prompt, stored) in [
        (
            &cmd.first_name,
            "First name: ",
            existing.map(|u| u.first_name.as_str()),
        ),
        (
            &cmd.last_name,
            "Last name: ",
            existing.map(|u| u.last_name.as_str()),
        ),
        (
            &cmd.institution,
            "Institution: ",
            existing.map(|u| u.institution.as_str()),
        ),
    ] {
        let value = match given {
            Some(value) => value.trim().to_string(),
            None => interaction
                .prompt_line_with_default(prompt, "May be left empty.", stored.unwrap_or(""))
                .await?
                .trim()
                .to_string(),
        };
        fields.push(value);
    }
    let institution = fields.pop().unwrap_or_default();
    let last_name = fields.pop().unwrap_or_default();
    let first_name = fields.pop().unwrap_or_default();

    let password = if cmd.no_password {
        None
    } else {
        prompt_password(interaction, output).await?
    };

    Ok(UserConfiguration {
        email: cmd.email.clone(),
        first_name: Some(first_name),
        last_name: Some(last_name),
        institution: Some(institution),
        password,
    })
}

async fn prompt_password(
    interaction: &dyn InteractionPort,
    output: &dyn OutputPort,
) -> AppResult<Option<String>> {
    loop {
        let password = interaction
            .prompt_secret("Password (empty to leave unset): ")
            .await?;
        if password.is_empty() {
            return Ok(None);
        }
        let repeated = interaction.prompt_secret("Repeat password: ").await?;
        if repeated == password {
            return Ok(Some(password));
        }
        output.warn("Passwords do not match, try again.").await?;
    }
}

/// Maps a `-t` alias to its stored type string. No alias means user-defined.
pub fn resolve_group_type(alias: Option<&str>) -> AppResult<String> {
    match alias {
        None => Ok(USER_DEFINED_GROUP_TYPE.to_string()),
        Some(alias) => group_type_for_alias(alias)
            .map(str::to_string)
            .ok_or_else(|| {
                let valid: Vec<&str> = GROUP_TYPE_ALIASES.iter().map(|(key, _)| *key).collect();
                AppError::invalid_argument(format!(
                    "Invalid group type. Valid group types are: {}",
                    valid.join(", ")
                ))
            }),
    }
}

/// Comment text from the flag, or from an editor session seeded with
/// `current`.
pub fn resolve_comment_content(
    editor: &dyn EditorPort,
    ui_mode: UiMode,
    given: Option<String>,
    current: &str,
) -> AppResult<String> {
    if let Some(content) = given {
        return Ok(content);
    }
    if !ui_mode.is_interactive() {
        return Err(AppError::invalid_argument(
            "comment content is required; pass --content in non-interactive mode",
        ));
    }
    let template = format!("{current}\n{EDITOR_MARKER}\n# Write the comment above the marker.\n");
    let edited = editor.edit(&template)?;
    let content = text_from_editor(&edited);
    if content.is_empty() {
        return Err(AppError::validation("comment content cannot be empty"));
    }
    Ok(content)
}

/// Keeps what precedes the marker line. An untouched template yields "".
pub fn text_from_editor(edited: &str) -> String {
    let kept: Vec<&str> = edited
        .lines()
        .take_while(|line| line.trim_end() != EDITOR_MARKER)
        .collect();
    kept.join("\n").trim().to_string()
}

async fn prompt_and_validate<V>(
    interaction: &dyn InteractionPort,
    output: &dyn OutputPort,
    prompt: &str,
    help: &str,
    default: Option<&str>,
    mut validate: V,
) -> AppResult<String>
where
    V: FnMut(&str) -> AppResult<String>,
{
    loop {
        let input = match default {
            Some(default) => {
                interaction
                    .prompt_line_with_default(prompt, help, default)
                    .await?
            }
            None => interaction.prompt_line(prompt, help).await?,
        };
        match validate(input.trim()) {
            Ok(value) => return Ok(value),
            Err(err) => output.warn(&validation_error_message(&err)).await?,
        }
    }
}

fn validation_error_message(err: &AppError) -> String {
    if err.message.trim().is_empty() {
        "validation failed".to_string()
    } else {
        err.message.clone()
    }
}

fn parse_choice<T>(input: &str) -> AppResult<T>
where
    T: std::str::FromStr<Err = String>,
{
    input
        .parse::<T>()
        .map_err(|err| CoreError::validation(err).into())
}

fn choices<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_optional_i64(input: &str) -> AppResult<Option<i64>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|_| AppError::validation(format!("'{trimmed}' is not an integer")))
}

fn parse_port(input: &str) -> AppResult<u16> {
    match input.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(AppError::validation(
            "port must be a number between 1 and 65535",
        )),
    }
}

fn parse_timeout(input: &str) -> AppResult<u64> {
    match input.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(AppError::validation(
            "timeout must be a positive number of seconds",
        )),
    }
}

fn normalize_option(value: Option<String>) -> Option<String> {
    value.and_then(|item| {
        let trimmed = item.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
