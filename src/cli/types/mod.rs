//! Type-safe wrappers and enums shared by the CLI, storage and updater.

pub mod competition;
pub mod ids;

pub use competition::CompetitionType;
pub use ids::TeamId;
