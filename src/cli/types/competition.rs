//! Competition type discriminator.

use crate::error::H4aError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two kinds of competitions a team can be tracked in.
///
/// Stored in the `type` column of `leaguemetadata` as `league` / `cup`,
/// guarded by a CHECK constraint built from [`CompetitionType::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionType {
    League,
    Cup,
}

impl CompetitionType {
    pub const ALL: [CompetitionType; 2] = [CompetitionType::League, CompetitionType::Cup];

    /// The value persisted in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompetitionType::League => "league",
            CompetitionType::Cup => "cup",
        }
    }
}

impl fmt::Display for CompetitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompetitionType {
    type Err = H4aError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "league" => Ok(CompetitionType::League),
            "cup" => Ok(CompetitionType::Cup),
            _ => Err(H4aError::InvalidCompetitionType {
                value: s.to_string(),
            }),
        }
    }
}
