// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::sync::Arc;

use crate::app::ports::{
    ClockPort, CommentStorePort, ComputerStorePort, GroupStorePort, LocalExecPort,
    NetworkPort, NodeStorePort, UserStorePort,
};

mod comments;
mod computers;
mod groups;
mod nodes;
mod users;

pub use comments::NodeComments;
pub use computers::{
    ComputerSetupRequest, ComputerStatus, ComputerTestReport, ConfigureComputerOutcome,
    TestStep, ToggleOutcome, ToggleScope,
};
pub use groups::{DeleteGroupOutcome, GroupDetails, GroupListRequest, GroupSummary};
pub use nodes::DEFAULT_NODE_TYPE;
pub use users::{ConfigureUserOutcome, UserConfiguration};

#[derive(Clone)]
pub struct UseCases {
    pub(crate) users: Arc<dyn UserStorePort>,
    pub(crate) computers: Arc<dyn ComputerStorePort>,
    pub(crate) groups: Arc<dyn GroupStorePort>,
    pub(crate) nodes: Arc<dyn NodeStorePort>,
    pub(crate) comments: Arc<dyn CommentStorePort>,
    pub(crate) local_exec: Arc<dyn LocalExecPort>,
    pub(crate) network: Arc<dyn NetworkPort>,
    pub(crate) clock: Arc<dyn ClockPort>,
    /// Email of the automatic user, injected from configuration.
    pub(crate) default_user_email: Option<String>,
}

impl UseCases {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserStorePort>,
        computers: Arc<dyn ComputerStorePort>,
        groups: Arc<dyn GroupStorePort>,
        nodes: Arc<dyn NodeStorePort>,
        comments: Arc<dyn CommentStorePort>,
        local_exec: Arc<dyn LocalExecPort>,
        network: Arc<dyn NetworkPort>,
        clock: Arc<dyn ClockPort>,
        default_user_email: Option<String>,
    ) -> Self {
        Self {
            users,
            computers,
            groups,
            nodes,
            comments,
            local_exec,
            network,
            clock,
            default_user_email,
        }
    }

    pub fn default_user_email(&self) -> Option<&str> {
        self.default_user_email.as_deref()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use time::OffsetDateTime;

    use crate::adapters::db::{AiidaStore, SqliteStoreAdapter};
    use crate::app::errors::{AppError, AppResult};
    use crate::app::ports::ExecCapture;

    pub struct FixedClock(pub OffsetDateTime);

    impl ClockPort for FixedClock {
        fn now_utc(&self) -> OffsetDateTime {
            self.0
        }
    }

    /// Replays scripted captures and records every call.
    #[derive(Default)]
    pub struct ScriptedExec {
        pub responses: Mutex<VecDeque<AppResult<ExecCapture>>>,
        pub calls: Mutex<Vec<String>>,
    }

    impl ScriptedExec {
        pub fn with(responses: Vec<AppResult<ExecCapture>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    pub fn ok_capture(stdout: &str) -> AppResult<ExecCapture> {
        Ok(ExecCapture {
            stdout: stdout.to_string(),
            stderr: String::new(),
            exit_code: Some(0),
        })
    }

    pub fn failed_capture(code: i32) -> AppResult<ExecCapture> {
        Ok(ExecCapture {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: Some(code),
        })
    }

    #[async_trait]
    impl LocalExecPort for ScriptedExec {
        async fn exec_capture(&self, program: &str, args: &[&str]) -> AppResult<ExecCapture> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{program} {}", args.join(" ")));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AppError::internal("unexpected exec")))
        }
    }

    pub struct FixedNetwork {
        pub reachable: bool,
        pub calls: Mutex<Vec<(String, u16, Duration)>>,
    }

    impl FixedNetwork {
        pub fn new(reachable: bool) -> Self {
            Self {
                reachable,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl NetworkPort for FixedNetwork {
        async fn check_host_reachable(
            &self,
            hostname: &str,
            port: u16,
            timeout: Duration,
        ) -> AppResult<bool> {
            self.calls
                .lock()
                .unwrap()
                .push((hostname.to_string(), port, timeout));
            Ok(self.reachable)
        }
    }

    pub struct Harness {
        pub usecases: UseCases,
        pub exec: Arc<ScriptedExec>,
        pub network: Arc<FixedNetwork>,
    }

    pub async fn harness_with(
        default_user_email: Option<&str>,
        exec: ScriptedExec,
        network: FixedNetwork,
        now: OffsetDateTime,
    ) -> Harness {
        let store = Arc::new(SqliteStoreAdapter::new(
            AiidaStore::open_memory().await.unwrap(),
        ));
        let exec = Arc::new(exec);
        let network = Arc::new(network);
        let usecases = UseCases::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            exec.clone(),
            network.clone(),
            Arc::new(FixedClock(now)),
            default_user_email.map(str::to_string),
        );
        Harness {
            usecases,
            exec,
            network,
        }
    }

    pub async fn harness(default_user_email: Option<&str>) -> Harness {
        harness_with(
            default_user_email,
            ScriptedExec::default(),
            FixedNetwork::new(true),
            OffsetDateTime::now_utc(),
        )
        .await
    }
}
