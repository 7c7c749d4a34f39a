// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

pub mod password;
pub mod schedulers;
pub mod shell;
pub mod templates;
pub mod timestamps;
pub mod validation;
