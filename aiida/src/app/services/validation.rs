// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use crate::app::errors::{AppError, AppResult};
use crate::app::services::schedulers::SchedulerType;
use crate::app::services::templates;

const WORKDIR_FIELDS: &[&str] = &["username"];
const SAMPLE_USERNAME: &str = "username";

pub fn validate_computer_name(name: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("computer name cannot be empty"));
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(AppError::validation(
            "computer name cannot contain whitespace",
        ));
    }
    Ok(trimmed.to_string())
}

pub fn validate_hostname(hostname: &str) -> AppResult<String> {
    let trimmed = hostname.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("hostname cannot be empty"));
    }
    Ok(trimmed.to_string())
}

pub fn validate_shebang(shebang: &str) -> AppResult<String> {
    let trimmed = shebang.trim();
    if !trimmed.starts_with("#!") {
        return Err(AppError::validation(format!(
            "The shebang line should start with '#!', got '{trimmed}'"
        )));
    }
    Ok(trimmed.to_string())
}

/// The work directory may only reference `{username}` and must be absolute
/// once substituted.
pub fn validate_workdir(workdir: &str) -> AppResult<String> {
    let trimmed = workdir.trim();
    templates::check_fields(trimmed, WORKDIR_FIELDS)?;
    let rendered = templates::render(trimmed, |_| Some(SAMPLE_USERNAME.to_string()))?;
    if !rendered.starts_with('/') {
        return Err(AppError::validation(format!(
            "The work directory must be an absolute path, got '{trimmed}'"
        )));
    }
    Ok(trimmed.to_string())
}

/// Splits the command on whitespace and checks every token against the
/// scheduler's placeholder set.
pub fn validate_mpirun_command(command: &str, scheduler: SchedulerType) -> AppResult<Vec<String>> {
    let tokens: Vec<String> = command.split_whitespace().map(str::to_string).collect();
    let allowed = scheduler.job_resource_kind().placeholders();
    for token in &tokens {
        templates::check_fields(token, allowed)?;
    }
    Ok(tokens)
}

/// `None` and `0` both mean unspecified.
pub fn normalize_mpiprocs_per_machine(value: Option<i64>) -> AppResult<Option<u32>> {
    match value {
        None | Some(0) => Ok(None),
        Some(n) if n < 0 => Err(AppError::validation(format!(
            "Invalid value for default_mpiprocs_per_machine, must be positive or unspecified, got {n}"
        ))),
        Some(n) => u32::try_from(n).map(Some).map_err(|_| {
            AppError::validation(format!(
                "Invalid value for default_mpiprocs_per_machine, {n} is too large"
            ))
        }),
    }
}

pub fn validate_email(email: &str) -> AppResult<String> {
    let trimmed = email.trim();
    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    };
    if !valid {
        return Err(AppError::validation(format!(
            "'{trimmed}' is not a valid email address"
        )));
    }
    Ok(trimmed.to_string())
}

pub fn validate_group_name(name: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("group name cannot be empty"));
    }
    if trimmed.parse::<i64>().is_ok() {
        return Err(AppError::validation(format!(
            "group name '{trimmed}' cannot be a number; numbers are read as PKs"
        )));
    }
    Ok(trimmed.to_string())
}
