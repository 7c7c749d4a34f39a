// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::fmt;

use aiida::app::errors::{AppError as CoreError, AppErrorKind};

pub const EXIT_CODE_USAGE: i32 = 2;
pub const EXIT_CODE_OTHER: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    InvalidArgument,
    ConfirmationRequired,
    NotExistent,
    MultipleObjects,
    Uniqueness,
    Validation,
    TransportError,
    LocalError,
    InternalError,
}

impl ErrorType {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorType::InvalidArgument => "INVALID_ARGUMENT",
            ErrorType::ConfirmationRequired => "CONFIRMATION_REQUIRED",
            ErrorType::NotExistent => "NOT_EXISTENT",
            ErrorType::MultipleObjects => "MULTIPLE_OBJECTS",
            ErrorType::Uniqueness => "UNIQUENESS",
            ErrorType::Validation => "VALIDATION",
            ErrorType::TransportError => "TRANSPORT_ERROR",
            ErrorType::LocalError => "LOCAL_ERROR",
            ErrorType::InternalError => "INTERNAL_ERROR",
        }
    }

    pub fn default_exit_code(self) -> i32 {
        match self {
            ErrorType::InvalidArgument
            | ErrorType::ConfirmationRequired
            | ErrorType::Validation => EXIT_CODE_USAGE,
            _ => EXIT_CODE_OTHER,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppError {
    pub kind: ErrorType,
    pub message: String,
    pub exit_code: i32,
}

impl AppError {
    pub fn new(kind: ErrorType, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            exit_code: kind.default_exit_code(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorType::InvalidArgument, message)
    }

    pub fn confirmation_required(message: impl Into<String>) -> Self {
        Self::new(ErrorType::ConfirmationRequired, message)
    }

    pub fn not_existent(message: impl Into<String>) -> Self {
        Self::new(ErrorType::NotExistent, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorType::Validation, message)
    }

    pub fn local_error(message: impl Into<String>) -> Self {
        Self::new(ErrorType::LocalError, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorType::InternalError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        let kind = match err.kind() {
            AppErrorKind::NotExistent => ErrorType::NotExistent,
            AppErrorKind::MultipleObjects => ErrorType::MultipleObjects,
            AppErrorKind::Uniqueness => ErrorType::Uniqueness,
            AppErrorKind::Validation => ErrorType::Validation,
            AppErrorKind::Transport => ErrorType::TransportError,
            AppErrorKind::Internal => ErrorType::InternalError,
        };
        let message = match err.context() {
            Some(context) => format!("{} ({context})", err.message()),
            None => err.message().to_string(),
        };
        Self::new(kind, message)
    }
}

pub type AppResult<T> = Result<T, AppError>;
