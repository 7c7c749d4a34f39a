// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use async_trait::async_trait;
use std::time::Duration;

use crate::app::errors::AppResult;

#[async_trait]
pub trait NetworkPort: Send + Sync {
    /// True when a TCP connection to any resolved address succeeds within `timeout`.
    async fn check_host_reachable(
        &self,
        hostname: &str,
        port: u16,
        timeout: Duration,
    ) -> AppResult<bool>;
}
