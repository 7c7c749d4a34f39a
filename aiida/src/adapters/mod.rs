// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

pub mod db;
pub mod exec;
pub mod network;
pub mod time;
