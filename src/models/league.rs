//! Competition snapshot: metadata, standings and schedule.
//!
//! Values are built once from a federation response and handed to the
//! store; nothing here is mutated afterwards.

use crate::cli::types::CompetitionType;
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Descriptive attributes of a competition (the response's `head`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueMetadata {
    pub name: String,
    pub short_name: String,
    pub headline1: String,
    pub headline2: String,
    /// Human readable (German) "last updated" text.
    pub actualized: String,
    /// Prefix for `Game::report_id` to build a press report link.
    pub report_url: String,
    pub score_shown_per_game: bool,
}

/// One standings row. Display strings are passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabScore {
    pub position: i64,
    /// Federation team id, unrelated to the registry's `TeamId`.
    pub tab_team_id: String,
    pub team_name: String,
    pub live_team: bool,
    pub played: i64,
    pub won: i64,
    pub drawn: i64,
    pub lost: i64,
    pub goals_for: i64,
    pub goals_against: i64,
    pub points_for: i64,
    pub points_against: i64,
    pub points_per_game: String,
    pub goal_diff_per_game: String,
    pub goals_per_game: String,
    pub pos_criterion: String,
}

/// Standings in the order received (already ranked).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table(pub Vec<TabScore>);

impl Deref for Table {
    type Target = [TabScore];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<TabScore>> for Table {
    fn from(rows: Vec<TabScore>) -> Self {
        Self(rows)
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a TabScore;
    type IntoIter = std::slice::Iter<'a, TabScore>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A single fixture. Score fields are `None` until the game was played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub game_id: String,
    /// Press report id, empty until one is published.
    pub report_id: String,
    pub game_no: String,
    pub live: bool,
    pub live_ticker_token: Option<String>,
    pub app_id: String,
    /// DD.MM.YY
    pub date: String,
    /// Two letter German weekday.
    pub weekday: String,
    /// HH:MM
    pub time: String,
    pub gym_id: String,
    pub gym_no: String,
    pub gym_name: String,
    pub gym_postal: String,
    pub gym_town: String,
    pub gym_street: String,
    pub home_team: String,
    pub guest_team: String,
    pub home_goals: Option<i64>,
    pub guest_goals: Option<i64>,
    pub home_goals_half: Option<i64>,
    pub guest_goals_half: Option<i64>,
    pub home_points: Option<i64>,
    pub guest_points: Option<i64>,
    pub comment: String,
    pub group_sort_text: String,
    pub referee: String,
    pub robotext_state: String,
}

impl Game {
    pub fn is_played(&self) -> bool {
        self.home_goals.is_some() && self.guest_goals.is_some()
    }
}

/// Class metadata plus its games in the order received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSchedule {
    pub class_id: String,
    pub class_short_name: String,
    pub class_long_name: String,
    pub referee_allocation_type: String,
    pub referee_responsible_org: String,
    pub games: Vec<Game>,
}

impl GameSchedule {
    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Game> {
        self.games.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Game> {
        self.games.iter()
    }
}

impl<'a> IntoIterator for &'a GameSchedule {
    type Item = &'a Game;
    type IntoIter = std::slice::Iter<'a, Game>;

    fn into_iter(self) -> Self::IntoIter {
        self.games.iter()
    }
}

/// Full snapshot for one team and competition type; the unit of replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueData {
    pub competition_type: CompetitionType,
    pub metadata: LeagueMetadata,
    pub table: Table,
    pub schedule: GameSchedule,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(position: i64, name: &str) -> TabScore {
        TabScore {
            position,
            tab_team_id: format!("id-{}", position),
            team_name: name.to_string(),
            live_team: false,
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            points_for: 0,
            points_against: 0,
            points_per_game: String::new(),
            goal_diff_per_game: String::new(),
            goals_per_game: String::new(),
            pos_criterion: String::new(),
        }
    }

    #[test]
    fn test_table_preserves_order_and_indexes() {
        let table = Table::from(vec![row(1, "TSV Speyer"), row(2, "TG Oggersheim")]);

        assert_eq!(table.len(), 2);
        assert_eq!(table[0].team_name, "TSV Speyer");
        assert_eq!(table.get(1).map(|r| r.position), Some(2));
        let names: Vec<&str> = table.iter().map(|r| r.team_name.as_str()).collect();
        assert_eq!(names, vec!["TSV Speyer", "TG Oggersheim"]);
    }

    #[test]
    fn test_empty_schedule() {
        let schedule = GameSchedule::default();
        assert!(schedule.is_empty());
        assert_eq!(schedule.len(), 0);
        assert!(schedule.get(0).is_none());
    }
}
