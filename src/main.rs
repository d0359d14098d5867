//! Entry point: parse CLI, set up logging and dispatch to command handlers.

use clap::Parser;
use h4a_sync::{
    cli::{Cli, Commands},
    commands::{
        init::handle_init, standings::handle_standings, teams::handle_teams,
        update::handle_update,
    },
    core::Settings,
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "h4a_sync=debug" } else { "h4a_sync=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run the CLI.
#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let app = Cli::parse();
    init_tracing(app.verbose);

    let settings = Settings::from_env()?.with_db_path(app.db);

    match app.command {
        Commands::Init { strict } => handle_init(&settings, strict)?,

        Commands::Update { json, concurrency } => {
            let settings = settings.with_concurrency(concurrency)?;
            let result = handle_update(&settings, json).await?;
            if result.has_failure() {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Teams { json } => handle_teams(&settings, json)?,

        Commands::Standings {
            team_id,
            competition,
            json,
        } => handle_standings(&settings, team_id, competition, json)?,
    }

    Ok(ExitCode::SUCCESS)
}
