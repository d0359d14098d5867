//! ID types for registered teams.

use crate::error::{H4aError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type-safe wrapper for registry team IDs.
///
/// This is the row id of the local `teams` table. It is unrelated to the
/// federation's own team identifier (`TabScore::tab_team_id`), which is a
/// string and never enters the registry.
///
/// # Examples
///
/// ```rust
/// use h4a_sync::TeamId;
///
/// let team_id = TeamId::new(7);
/// assert_eq!(team_id.as_i64(), 7);
/// assert_eq!(team_id.to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TeamId(pub i64);

impl TeamId {
    /// Create a new TeamId from an i64 value.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the underlying i64 value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TeamId {
    type Err = H4aError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse()
            .map(Self)
            .map_err(|e| H4aError::Config {
                message: format!("invalid team id '{}': {}", s, e),
            })
    }
}
