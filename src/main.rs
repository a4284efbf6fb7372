mod activity;
mod cli;
mod client;
mod commands;
mod config;
mod logging;
mod model;
mod render;
mod util;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use activity::ActivityLog;
use cli::Cli;
use client::AsanaClient;
use commands::Session;
use config::{ApiConfig, AppConfig, Credentials};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<bool> {
    let config = config::load_config()?;
    let activity = ActivityLog::open_default(config.activity_log_enabled());

    if let Some(ok) = commands::run_offline(&cli.command, &activity)? {
        return Ok(ok);
    }

    let client = connect(&config)?;
    let session = Session {
        client: &client,
        activity: &activity,
        dev_hours_field: config.dev_hours_field(),
    };
    commands::dispatch(cli.command, &session).await
}

fn connect(config: &AppConfig) -> Result<AsanaClient> {
    let credentials = Credentials::from_environment()?;
    let client = AsanaClient::new(&ApiConfig::new(config.base_url(), credentials.token));
    tracing::debug!(base_url = client.base_url(), "using asana api");
    Ok(client)
}
