// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

pub mod commands;
pub mod dispatcher;
pub mod errors;
pub mod handlers;
pub mod ports;
pub mod services;

use std::sync::Arc;

use aiida::app::usecases::UseCases;
use ports::{EditorPort, InteractionPort, OutputPort, ProfilePort};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Interactive,
    NonInteractive,
}

impl UiMode {
    pub fn is_interactive(self) -> bool {
        matches!(self, UiMode::Interactive)
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub ui_mode: UiMode,
    pub usecases: UseCases,
    pub interaction: Arc<dyn InteractionPort>,
    pub output: Arc<dyn OutputPort>,
    pub editor: Arc<dyn EditorPort>,
    pub profiles: Arc<dyn ProfilePort>,
    /// Profile the registry was opened with.
    pub active_profile: Option<String>,
}
