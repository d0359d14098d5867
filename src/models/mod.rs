//! Domain model: registered teams and the competition snapshots fetched for them.

pub mod league;
pub mod team;

pub use league::{Game, GameSchedule, LeagueData, LeagueMetadata, TabScore, Table};
pub use team::Team;
