//! Command implementations for the h4a-sync CLI
//!
//! Handlers return `anyhow::Result` so the entry point can print the whole
//! context chain. Output formatting lives in plain `format_*` functions that
//! the tests call directly.

pub mod init;
pub mod standings;
pub mod teams;
pub mod update;

use anyhow::Context;

use crate::{core::Settings, storage::LeagueDatabase};

/// Open the configured database with the configured table prefix.
pub fn open_database(settings: &Settings) -> anyhow::Result<LeagueDatabase> {
    let db = LeagueDatabase::open(&settings.db_path)
        .with_context(|| format!("could not open database {}", settings.db_path.display()))?;
    Ok(db.with_prefix(&settings.table_prefix))
}

/// Open the database and fail with a hint if the schema is missing.
pub fn open_ready_database(settings: &Settings) -> anyhow::Result<LeagueDatabase> {
    let db = open_database(settings)?;
    if !db.is_ready()? {
        anyhow::bail!(
            "database {} has no schema, run `h4a-sync init` first",
            settings.db_path.display()
        );
    }
    Ok(db)
}
