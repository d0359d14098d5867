//! CLI argument definitions and parsing.

pub mod types;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use types::{CompetitionType, TeamId};

#[derive(Debug, Parser)]
#[clap(
    name = "h4a-sync",
    version,
    about = "Sync handball4all standings and schedules into SQLite"
)]
pub struct Cli {
    /// Database file (or set `H4A_DB_PATH` env var).
    #[clap(long, global = true)]
    pub db: Option<PathBuf>,

    /// Log at debug level (`RUST_LOG` takes precedence).
    #[clap(long, short, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the database schema.
    Init {
        /// Fail if any table already exists instead of leaving it alone.
        #[clap(long)]
        strict: bool,
    },

    /// Fetch every registered team's league and cup data and replace the stored snapshots.
    ///
    /// Exits with a non-zero status if any track failed.
    Update {
        /// Print the per-team report as JSON.
        #[clap(long)]
        json: bool,

        /// Maximum parallel fetches (or set `H4A_CONCURRENCY` env var).
        #[clap(long, short)]
        concurrency: Option<usize>,
    },

    /// List registered teams.
    Teams {
        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },

    /// Print a team's stored standings.
    Standings {
        /// Registry id as shown by `teams`.
        #[clap(long)]
        team_id: TeamId,

        #[clap(long, default_value_t = CompetitionType::League)]
        competition: CompetitionType,

        /// Output results as JSON instead of a table.
        #[clap(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_update_with_globals() {
        let cli = Cli::try_parse_from([
            "h4a-sync",
            "update",
            "--json",
            "--concurrency",
            "2",
            "--db",
            "x.db",
        ])
        .unwrap();

        assert_eq!(cli.db, Some(PathBuf::from("x.db")));
        match cli.command {
            Commands::Update { json, concurrency } => {
                assert!(json);
                assert_eq!(concurrency, Some(2));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_standings_defaults_to_league() {
        let cli = Cli::try_parse_from(["h4a-sync", "-v", "standings", "--team-id", "3"]).unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Standings {
                team_id,
                competition,
                json,
            } => {
                assert_eq!(team_id, TeamId::new(3));
                assert_eq!(competition, CompetitionType::League);
                assert!(!json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_competition() {
        assert!(Cli::try_parse_from([
            "h4a-sync",
            "standings",
            "--team-id",
            "1",
            "--competition",
            "friendly"
        ])
        .is_err());
    }
}
