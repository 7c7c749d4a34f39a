// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

pub mod cli;
pub mod editor;
pub mod json;
pub mod profiles;
pub mod terminal;
