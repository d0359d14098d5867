//! Storage layer
//!
//! - `schema`: connection handling and the four-table schema
//! - `queries`: registry reads/writes, snapshot replacement and read-back
//!
//! The updater only sees the [`TeamRegistry`] and [`LeagueStore`] traits;
//! [`LeagueDatabase`] is the SQLite implementation.

pub mod queries;
pub mod schema;


use crate::cli::types::{CompetitionType, TeamId};
use crate::models::{LeagueData, Team};
use crate::Result;

pub use queries::{GameFilter, RowCounts};
pub use schema::LeagueDatabase;

/// Read access to the registered teams.
pub trait TeamRegistry {
    fn list_teams(&self) -> Result<Vec<Team>>;
}

/// Registry plus atomic replacement of a team's competition snapshot.
pub trait LeagueStore: TeamRegistry {
    /// Discard whatever is stored for `(team_id, competition_type)` and store
    /// `data` instead, all in one transaction.
    fn replace_league_data(
        &mut self,
        team_id: TeamId,
        competition_type: CompetitionType,
        data: &LeagueData,
    ) -> Result<bool>;
}

impl TeamRegistry for LeagueDatabase {
    fn list_teams(&self) -> Result<Vec<Team>> {
        LeagueDatabase::list_teams(self)
    }
}

impl LeagueStore for LeagueDatabase {
    fn replace_league_data(
        &mut self,
        team_id: TeamId,
        competition_type: CompetitionType,
        data: &LeagueData,
    ) -> Result<bool> {
        LeagueDatabase::replace_league_data(self, team_id, competition_type, data)
    }
}
