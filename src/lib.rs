//! handball4all sync library
//!
//! Polls the handball4all federation JSON service for every registered team,
//! maps the responses into typed models and replaces each team's stored
//! league and cup snapshots in SQLite.
//!
//! ## Features
//!
//! - **Endpoint building**: browser tracking URLs → federation API endpoints
//! - **Strict mapping**: responses are schema-checked before any field access
//! - **Atomic snapshots**: every replacement runs in one transaction
//! - **Failure isolation**: transport failures are reported per team and track
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use h4a_sync::{h4a::ReqwestFetcher, storage::LeagueDatabase, update::Updater};
//! use std::time::Duration;
//!
//! # async fn example() -> h4a_sync::Result<()> {
//! let mut db = LeagueDatabase::open_in_memory()?;
//! db.create_schema(true)?;
//!
//! let fetcher = ReqwestFetcher::new(Duration::from_secs(30))?;
//! let mut updater = Updater::new(db, fetcher);
//! let result = updater.run_update().await?;
//!
//! for (team_id, outcome) in result.iter() {
//!     println!("{}: league {}, cup {}", team_id, outcome.league.status, outcome.cup.status);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! ```bash
//! export H4A_DB_PATH=/var/lib/h4a/h4a.db
//! export H4A_CONCURRENCY=8
//! ```

pub mod cli;
pub mod commands;
pub mod core;
pub mod error;
pub mod h4a;
pub mod models;
pub mod storage;
pub mod update;

// Re-export commonly used types
pub use cli::types::{CompetitionType, TeamId};
pub use error::{H4aError, Result};
pub use models::{Game, GameSchedule, LeagueData, LeagueMetadata, TabScore, Table, Team};
pub use update::{UpdateResult, Updater, UpdaterConfig};

pub const DB_PATH_ENV_VAR: &str = "H4A_DB_PATH";
pub const API_URL_ENV_VAR: &str = "H4A_API_URL";
pub const TABLE_PREFIX_ENV_VAR: &str = "H4A_TABLE_PREFIX";
pub const CONCURRENCY_ENV_VAR: &str = "H4A_CONCURRENCY";
pub const HTTP_TIMEOUT_ENV_VAR: &str = "H4A_HTTP_TIMEOUT";
