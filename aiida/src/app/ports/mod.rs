// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

pub mod clock;
pub mod comment_store;
pub mod computer_store;
pub mod group_store;
pub mod local_exec;
pub mod network;
pub mod node_store;
pub mod user_store;

pub use clock::ClockPort;
pub use comment_store::CommentStorePort;
pub use computer_store::ComputerStorePort;
pub use group_store::GroupStorePort;
pub use local_exec::{ExecCapture, LocalExecPort};
pub use network::NetworkPort;
pub use node_store::NodeStorePort;
pub use user_store::UserStorePort;
