// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpStream, lookup_host};

use crate::app::errors::{AppError, AppResult};
use crate::app::ports::NetworkPort;

/// TCP reachability check used by `computer test` to check that a host accepts connections.
#[derive(Clone, Default)]
pub struct NetworkAdapter;

impl NetworkAdapter {
    pub fn new() -> Self {
        Self
    }
}

async fn resolve_host(hostname: &str, port: u16) -> AppResult<Vec<SocketAddr>> {
    let addrs: Vec<SocketAddr> = lookup_host((hostname, port))
        .await
        .map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => {
                AppError::transport(format!("hostname '{hostname}' could not be resolved"))
            }
            _ => AppError::transport(format!("failed to resolve '{hostname}': {err}")),
        })?
        .collect();
    if addrs.is_empty() {
        return Err(AppError::transport(format!(
            "hostname '{hostname}' resolved to no addresses"
        )));
    }
    Ok(addrs)
}

#[async_trait]
impl NetworkPort for NetworkAdapter {
    async fn check_host_reachable(
        &self,
        hostname: &str,
        port: u16,
        timeout: Duration,
    ) -> AppResult<bool> {
        for addr in resolve_host(hostname, port).await? {
            if accepts_connection(addr, timeout).await {
                return Ok(true);
            }
            log::debug!("no connection to {addr} within {timeout:?}");
        }
        Ok(false)
    }
}

async fn accepts_connection(addr: SocketAddr, timeout: Duration) -> bool {
    matches!(
        tokio::time::timeout(timeout, TcpStream::connect(addr)).await,
        Ok(Ok(_))
    )
}
