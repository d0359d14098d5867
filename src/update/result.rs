//! Per-run report of the orchestrator.

use crate::cli::types::{CompetitionType, TeamId};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Final state of one team track after a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackStatus {
    /// No tracking URL for this competition.
    #[default]
    NotAttempted,
    Success,
    /// Transport failure while fetching.
    FetchFailed,
    /// The stored URL could not be turned into an endpoint; nothing fetched.
    InvalidUrl,
}

impl TrackStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, TrackStatus::FetchFailed | TrackStatus::InvalidUrl)
    }
}

impl fmt::Display for TrackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrackStatus::NotAttempted => "not attempted",
            TrackStatus::Success => "ok",
            TrackStatus::FetchFailed => "fetch failed",
            TrackStatus::InvalidUrl => "invalid url",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackOutcome {
    pub status: TrackStatus,
    /// Error detail for failed tracks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TrackOutcome {
    pub fn success() -> Self {
        Self {
            status: TrackStatus::Success,
            error: None,
        }
    }

    pub fn fetch_failed(message: impl Into<String>) -> Self {
        Self {
            status: TrackStatus::FetchFailed,
            error: Some(message.into()),
        }
    }

    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self {
            status: TrackStatus::InvalidUrl,
            error: Some(message.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.status.is_failure()
    }
}

/// League and cup outcome of one registered team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamOutcome {
    pub internal_name: String,
    pub league: TrackOutcome,
    pub cup: TrackOutcome,
}

impl TeamOutcome {
    pub fn new(internal_name: impl Into<String>) -> Self {
        Self {
            internal_name: internal_name.into(),
            ..Self::default()
        }
    }

    pub fn track(&self, competition_type: CompetitionType) -> &TrackOutcome {
        match competition_type {
            CompetitionType::League => &self.league,
            CompetitionType::Cup => &self.cup,
        }
    }

    fn track_mut(&mut self, competition_type: CompetitionType) -> &mut TrackOutcome {
        match competition_type {
            CompetitionType::League => &mut self.league,
            CompetitionType::Cup => &mut self.cup,
        }
    }

    /// True if any tracked competition failed.
    pub fn has_failure(&self) -> bool {
        self.league.is_failure() || self.cup.is_failure()
    }
}

/// A registry row without id, left out of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedTeam {
    pub internal_name: String,
}

/// Outcome of one `run_update`, keyed by team id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateResult {
    teams: BTreeMap<TeamId, TeamOutcome>,
    skipped: Vec<SkippedTeam>,
}

impl UpdateResult {
    pub fn get(&self, team_id: TeamId) -> Option<&TeamOutcome> {
        self.teams.get(&team_id)
    }

    /// Outcomes in team id order.
    pub fn iter(&self) -> impl Iterator<Item = (TeamId, &TeamOutcome)> {
        self.teams.iter().map(|(id, outcome)| (*id, outcome))
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// True if any track of any team failed.
    pub fn has_failure(&self) -> bool {
        self.teams.values().any(TeamOutcome::has_failure)
    }

    pub fn skipped(&self) -> &[SkippedTeam] {
        &self.skipped
    }

    pub(crate) fn add_team(&mut self, team_id: TeamId, internal_name: &str) {
        self.teams
            .entry(team_id)
            .or_insert_with(|| TeamOutcome::new(internal_name));
    }

    pub(crate) fn record(
        &mut self,
        team_id: TeamId,
        competition_type: CompetitionType,
        outcome: TrackOutcome,
    ) {
        *self
            .teams
            .entry(team_id)
            .or_default()
            .track_mut(competition_type) = outcome;
    }

    pub(crate) fn skip(&mut self, internal_name: &str) {
        self.skipped.push(SkippedTeam {
            internal_name: internal_name.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_outcome_is_not_attempted() {
        let outcome = TeamOutcome::new("Herren 1");
        assert_eq!(outcome.league.status, TrackStatus::NotAttempted);
        assert_eq!(outcome.cup.status, TrackStatus::NotAttempted);
        assert!(!outcome.has_failure());
    }

    #[test]
    fn test_has_failure_is_any_track() {
        let mut result = UpdateResult::default();
        result.add_team(TeamId::new(1), "Herren 1");
        result.record(TeamId::new(1), CompetitionType::League, TrackOutcome::success());
        assert!(!result.has_failure());

        result.record(
            TeamId::new(1),
            CompetitionType::Cup,
            TrackOutcome::fetch_failed("timeout"),
        );
        assert!(result.has_failure());
        assert!(result.get(TeamId::new(1)).unwrap().has_failure());
    }

    #[test]
    fn test_invalid_url_counts_as_failure() {
        assert!(TrackOutcome::invalid_url("missing tId").is_failure());
        assert!(!TrackOutcome::default().is_failure());
    }

    #[test]
    fn test_iter_is_ordered_by_team_id() {
        let mut result = UpdateResult::default();
        result.add_team(TeamId::new(3), "C");
        result.add_team(TeamId::new(1), "A");

        let ids: Vec<_> = result.iter().map(|(id, _)| id.as_i64()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_serializes_to_json() {
        let mut result = UpdateResult::default();
        result.add_team(TeamId::new(7), "Herren 1");
        result.record(
            TeamId::new(7),
            CompetitionType::League,
            TrackOutcome::fetch_failed("503"),
        );
        result.skip("Orphan");

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["teams"]["7"]["league"]["status"], "fetch_failed");
        assert_eq!(json["teams"]["7"]["league"]["error"], "503");
        assert!(json["teams"]["7"]["cup"].get("error").is_none());
        assert_eq!(json["skipped"][0]["internal_name"], "Orphan");
    }
}
