// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::fmt;

pub mod codes {
    pub const NOT_EXISTENT: &str = "not_existent";
    pub const MULTIPLE_OBJECTS: &str = "multiple_objects";
    pub const UNIQUENESS: &str = "uniqueness";
    pub const VALIDATION: &str = "validation";
    pub const TRANSPORT: &str = "transport";
    pub const INTERNAL_ERROR: &str = "internal_error";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppErrorKind {
    /// A lookup by name, PK, UUID, or email found nothing.
    NotExistent,
    /// A lookup that must be unique matched more than one record.
    MultipleObjects,
    /// A create or rename collides with an existing unique key.
    Uniqueness,
    /// Malformed input.
    Validation,
    Transport,
    Internal,
}

#[derive(Debug, Clone)]
pub struct AppError {
    kind: AppErrorKind,
    code: &'static str,
    message: String,
    context: Option<String>,
}

impl AppError {
    pub fn new(kind: AppErrorKind, code: &'static str) -> Self {
        Self {
            kind,
            code,
            message: code.to_string(),
            context: None,
        }
    }

    pub fn with_message(
        kind: AppErrorKind,
        code: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            code,
            message: message.into(),
            context: None,
        }
    }

    pub fn not_existent(message: impl Into<String>) -> Self {
        Self::with_message(AppErrorKind::NotExistent, codes::NOT_EXISTENT, message)
    }

    pub fn multiple_objects(message: impl Into<String>) -> Self {
        Self::with_message(
            AppErrorKind::MultipleObjects,
            codes::MULTIPLE_OBJECTS,
            message,
        )
    }

    pub fn uniqueness(message: impl Into<String>) -> Self {
        Self::with_message(AppErrorKind::Uniqueness, codes::UNIQUENESS, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::with_message(AppErrorKind::Validation, codes::VALIDATION, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::with_message(AppErrorKind::Transport, codes::TRANSPORT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_message(AppErrorKind::Internal, codes::INTERNAL_ERROR, message)
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn kind(&self) -> AppErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ctx) = &self.context {
            write!(f, "{} ({})", self.message, ctx)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;
