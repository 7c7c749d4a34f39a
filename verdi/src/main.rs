// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::sync::Arc;

use aiida::adapters::db::{AiidaStore, SqliteStoreAdapter};
use aiida::adapters::exec::ProcessExec;
use aiida::adapters::network::NetworkAdapter;
use aiida::adapters::time::SystemClock;
use aiida::app::usecases::UseCases;
use aiida::config;
use clap::{CommandFactory, FromArgMatches};
use log::LevelFilter;
use verdi::adapters::cli::args::{Cli, Cmd};
use verdi::adapters::cli::command_from_cli;
use verdi::adapters::editor::ExternalEditor;
use verdi::adapters::json::{JsonOutput, NonInteractiveInteraction};
use verdi::adapters::profiles::ConfigProfiles;
use verdi::adapters::terminal::{TerminalInteraction, TerminalOutput};
use verdi::app::dispatcher::Dispatcher;
use verdi::app::ports::{InteractionPort, OutputPort};
use verdi::app::{AppContext, UiMode};

fn init_logging(verbose: bool) {
    let mut builder = env_logger::builder();
    builder.format_timestamp_secs();
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    } else {
        builder
            .filter_level(LevelFilter::Off)
            .filter_module("aiida", LevelFilter::Warn)
            .filter_module("verdi", LevelFilter::Warn);
    }
    builder.init();
}

fn log_config_report(report: &config::ConfigReport) {
    match (&report.config_path, report.config_path_source) {
        (Some(path), Some(source)) => {
            log::info!(
                "config path: {} (source={}, present={})",
                path.display(),
                source.as_str(),
                report.config_file_present
            );
        }
        (Some(path), None) => {
            log::info!(
                "config path: {} (present={})",
                path.display(),
                report.config_file_present
            );
        }
        (None, _) => {
            log::info!("config path: (none)");
        }
    }
    log::info!(
        "config profile: {} (source={})",
        report.profile.value.as_deref().unwrap_or("(none)"),
        report.profile.source.as_str()
    );
    log::info!(
        "config database_path: {} (source={})",
        report.database_path.value.display(),
        report.database_path.source.as_str()
    );
    log::info!(
        "config default_user_email: {} (source={})",
        report
            .default_user_email
            .value
            .as_deref()
            .unwrap_or("(none)"),
        report.default_user_email.source.as_str()
    );
    log::info!(
        "config verbose: {} (source={})",
        report.verbose.value,
        report.verbose.source.as_str()
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());

    if let Cmd::Completions(args) = &cli.cmd {
        let mut cmd = Cli::command();
        clap_complete::generate(args.shell, &mut cmd, "verdi", &mut std::io::stdout());
        return Ok(());
    }

    let overrides = config::Overrides {
        profile: cli.profile.clone(),
        database_path: cli.database.clone(),
        default_user_email: cli.user.clone(),
        verbose: cli.verbose.then_some(true),
    };
    let loaded = config::load_with_report(cli.config.clone(), overrides)?;
    init_logging(loaded.config.verbose);
    log_config_report(&loaded.report);
    let config = loaded.config;

    config::ensure_database_dir(&config.database_path)?;
    let store = AiidaStore::open(&config.database_path).await?;
    let adapter = Arc::new(SqliteStoreAdapter::new(store));
    let usecases = UseCases::new(
        adapter.clone(),
        adapter.clone(),
        adapter.clone(),
        adapter.clone(),
        adapter,
        Arc::new(ProcessExec::new()),
        Arc::new(NetworkAdapter::new()),
        Arc::new(SystemClock::new()),
        config.default_user_email.clone(),
    );

    let ui_mode = if cli.non_interactive {
        UiMode::NonInteractive
    } else {
        UiMode::Interactive
    };
    let output: Arc<dyn OutputPort> = if cli.json {
        Arc::new(JsonOutput::new())
    } else {
        Arc::new(TerminalOutput::new())
    };
    let interaction: Arc<dyn InteractionPort> = if cli.non_interactive {
        Arc::new(NonInteractiveInteraction::new())
    } else {
        Arc::new(TerminalInteraction::new())
    };
    let ctx = AppContext {
        ui_mode,
        usecases,
        interaction,
        output,
        editor: Arc::new(ExternalEditor::new()),
        profiles: Arc::new(ConfigProfiles::new(config.config_path.clone())),
        active_profile: config.profile.clone(),
    };

    let command = command_from_cli(cli);
    let code = Dispatcher::new(ctx).dispatch(command).await?;
    std::process::exit(code);
}
