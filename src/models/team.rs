//! Registered teams.

use crate::cli::types::{CompetitionType, TeamId};
use crate::error::Result;
use crate::h4a::url::{CupQuery, LeagueQuery};
use serde::{Deserialize, Serialize};

/// A team the operator registered for updates.
///
/// `league_url` / `cup_url` are the URLs a visitor would open in a browser.
/// They carry the query parameters used to build the API endpoint, so
/// [`Team::new`] rejects a URL that lacks any of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Registry row id, `None` until the team was persisted.
    pub id: Option<TeamId>,
    /// Label for the operator, also used for display.
    pub internal_name: String,
    /// Strings used to recognise the team's rows in fetched data.
    pub identificators: Vec<String>,
    pub league_url: Option<String>,
    pub cup_url: Option<String>,
}

fn non_blank(url: Option<String>) -> Option<String> {
    url.filter(|u| !u.trim().is_empty())
}

impl Team {
    /// Build a team, validating both tracking URLs.
    ///
    /// Blank URLs are treated as absent.
    pub fn new(
        internal_name: impl Into<String>,
        identificators: Vec<String>,
        league_url: Option<String>,
        cup_url: Option<String>,
    ) -> Result<Self> {
        let team = Self {
            id: None,
            internal_name: internal_name.into(),
            identificators,
            league_url: non_blank(league_url),
            cup_url: non_blank(cup_url),
        };
        team.validate()?;
        Ok(team)
    }

    pub fn with_id(mut self, id: TeamId) -> Self {
        self.id = Some(id);
        self
    }

    /// Check that every present tracking URL carries its required parameters.
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.league_url {
            LeagueQuery::from_browser_url(url)?;
        }
        if let Some(url) = &self.cup_url {
            CupQuery::from_browser_url(url)?;
        }
        Ok(())
    }

    pub fn tracking_url(&self, competition_type: CompetitionType) -> Option<&str> {
        match competition_type {
            CompetitionType::League => self.league_url.as_deref(),
            CompetitionType::Cup => self.cup_url.as_deref(),
        }
    }

    /// Split the stored comma-joined form; `""` is the empty list.
    pub fn parse_identificators(stored: &str) -> Vec<String> {
        if stored.is_empty() {
            Vec::new()
        } else {
            stored.split(',').map(str::to_string).collect()
        }
    }

    /// Comma-joined form used for storage.
    pub fn identificator_str(&self) -> String {
        self.identificators.join(",")
    }
}
