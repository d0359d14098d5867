//! Wire schema of the federation's league endpoint and its mapping into the
//! domain model.
//!
//! The response is strictly deserialized into the `Raw*` structs first, so
//! a missing or mistyped key fails before any field is used. Untyped JSON
//! never leaves this module.

use crate::cli::types::CompetitionType;
use crate::error::{H4aError, Result};
use crate::h4a::json::{int_or_null, DEFAULT_NULL_SENTINELS};
use crate::models::{Game, GameSchedule, LeagueData, LeagueMetadata, TabScore, Table};
use serde::{Deserialize, Deserializer};
use serde_json::Value;


fn de_null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Score fields normally arrive as strings, occasionally as plain numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Text(String),
    Int(i64),
}

impl RawNumber {
    fn resolve(&self, field: &str, sentinels: &[&str]) -> Result<Option<i64>> {
        match self {
            RawNumber::Int(n) => Ok(Some(*n)),
            RawNumber::Text(s) => int_or_null(s, sentinels).map_err(|e| match e {
                H4aError::MalformedResponse { message } => {
                    H4aError::malformed(format!("field `{}`: {}", field, message))
                }
                other => other,
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawHead {
    pub name: String,
    pub sname: String,
    pub headline1: String,
    pub headline2: String,
    pub actualized: String,
    #[serde(rename = "repURL")]
    pub rep_url: String,
    #[serde(rename = "scoreShownDataPerGame")]
    pub score_shown_data_per_game: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTabScore {
    pub tab_score: i64,
    #[serde(rename = "tabTeamID")]
    pub tab_team_id: String,
    pub tab_teamname: String,
    pub live_team: bool,
    pub num_played_games: i64,
    pub num_won_games: i64,
    pub num_equal_games: i64,
    pub num_lost_games: i64,
    pub num_goals_shot: i64,
    pub num_goals_got: i64,
    pub points_plus: i64,
    pub points_minus: i64,
    pub points_per_game10: String,
    #[serde(rename = "numGoalsDiffperGame")]
    pub num_goals_diff_per_game: String,
    #[serde(rename = "numGoalsShotperGame")]
    pub num_goals_shot_per_game: String,
    pub pos_criterion: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGame {
    #[serde(rename = "gID")]
    pub g_id: String,
    #[serde(rename = "sGID", deserialize_with = "de_null_as_empty")]
    pub s_gid: String,
    #[serde(rename = "gNo")]
    pub g_no: String,
    pub live: bool,
    #[serde(rename = "gToken", default)]
    pub g_token: Option<String>,
    #[serde(rename = "gAppid")]
    pub g_appid: String,
    #[serde(rename = "gDate")]
    pub g_date: String,
    #[serde(rename = "gWDay", alias = "gWeekDay")]
    pub g_wday: String,
    #[serde(rename = "gTime")]
    pub g_time: String,
    #[serde(rename = "gGymnasiumID")]
    pub g_gymnasium_id: String,
    #[serde(rename = "gGymnasiumNo")]
    pub g_gymnasium_no: String,
    #[serde(rename = "gGymnasiumName")]
    pub g_gymnasium_name: String,
    #[serde(rename = "gGymnasiumPostal")]
    pub g_gymnasium_postal: String,
    #[serde(rename = "gGymnasiumTown")]
    pub g_gymnasium_town: String,
    #[serde(rename = "gGymnasiumStreet")]
    pub g_gymnasium_street: String,
    #[serde(rename = "gHomeTeam")]
    pub g_home_team: String,
    #[serde(rename = "gGuestTeam")]
    pub g_guest_team: String,
    #[serde(rename = "gHomeGoals")]
    pub g_home_goals: RawNumber,
    #[serde(rename = "gGuestGoals")]
    pub g_guest_goals: RawNumber,
    #[serde(rename = "gHomeGoals_1")]
    pub g_home_goals_1: RawNumber,
    #[serde(rename = "gGuestGoals_1")]
    pub g_guest_goals_1: RawNumber,
    #[serde(rename = "gHomePoints")]
    pub g_home_points: RawNumber,
    #[serde(rename = "gGuestPoints")]
    pub g_guest_points: RawNumber,
    #[serde(rename = "gComment")]
    pub g_comment: String,
    #[serde(rename = "gGroupsortTxt")]
    pub g_groupsort_txt: String,
    #[serde(rename = "gReferee")]
    pub g_referee: String,
    pub robotextstate: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawFutureGames {
    #[serde(rename = "gClassID")]
    pub g_class_id: String,
    #[serde(rename = "gClassSname")]
    pub g_class_sname: String,
    #[serde(rename = "gClassLname")]
    pub g_class_lname: String,
    #[serde(rename = "gRefAllocType")]
    pub g_ref_alloc_type: String,
    #[serde(rename = "gRefRespOrg", alias = "gRefRepOrg")]
    pub g_ref_resp_org: String,
    pub games: Vec<RawGame>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContent {
    pub score: Vec<RawTabScore>,
    pub future_games: RawFutureGames,
}

/// The single element of the endpoint's top-level array.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLeagueResponse {
    pub head: RawHead,
    pub content: RawContent,
}

impl From<RawHead> for LeagueMetadata {
    fn from(raw: RawHead) -> Self {
        Self {
            name: raw.name,
            short_name: raw.sname,
            headline1: raw.headline1,
            headline2: raw.headline2,
            actualized: raw.actualized,
            report_url: raw.rep_url,
            score_shown_per_game: raw.score_shown_data_per_game,
        }
    }
}

impl From<RawTabScore> for TabScore {
    fn from(raw: RawTabScore) -> Self {
        Self {
            position: raw.tab_score,
            tab_team_id: raw.tab_team_id,
            team_name: raw.tab_teamname,
            live_team: raw.live_team,
            played: raw.num_played_games,
            won: raw.num_won_games,
            drawn: raw.num_equal_games,
            lost: raw.num_lost_games,
            goals_for: raw.num_goals_shot,
            goals_against: raw.num_goals_got,
            points_for: raw.points_plus,
            points_against: raw.points_minus,
            points_per_game: raw.points_per_game10,
            goal_diff_per_game: raw.num_goals_diff_per_game,
            goals_per_game: raw.num_goals_shot_per_game,
            pos_criterion: raw.pos_criterion,
        }
    }
}

impl RawGame {
    pub fn into_game(self, sentinels: &[&str]) -> Result<Game> {
        Ok(Game {
            home_goals: self.g_home_goals.resolve("gHomeGoals", sentinels)?,
            guest_goals: self.g_guest_goals.resolve("gGuestGoals", sentinels)?,
            home_goals_half: self.g_home_goals_1.resolve("gHomeGoals_1", sentinels)?,
            guest_goals_half: self.g_guest_goals_1.resolve("gGuestGoals_1", sentinels)?,
            home_points: self.g_home_points.resolve("gHomePoints", sentinels)?,
            guest_points: self.g_guest_points.resolve("gGuestPoints", sentinels)?,
            game_id: self.g_id,
            report_id: self.s_gid,
            game_no: self.g_no,
            live: self.live,
            live_ticker_token: self.g_token,
            app_id: self.g_appid,
            date: self.g_date,
            weekday: self.g_wday,
            time: self.g_time,
            gym_id: self.g_gymnasium_id,
            gym_no: self.g_gymnasium_no,
            gym_name: self.g_gymnasium_name,
            gym_postal: self.g_gymnasium_postal,
            gym_town: self.g_gymnasium_town,
            gym_street: self.g_gymnasium_street,
            home_team: self.g_home_team,
            guest_team: self.g_guest_team,
            comment: self.g_comment,
            group_sort_text: self.g_groupsort_txt,
            referee: self.g_referee,
            robotext_state: self.robotextstate,
        })
    }
}

impl RawFutureGames {
    pub fn into_schedule(self, sentinels: &[&str]) -> Result<GameSchedule> {
        let games = self
            .games
            .into_iter()
            .enumerate()
            .map(|(i, g)| {
                g.into_game(sentinels).map_err(|e| match e {
                    H4aError::MalformedResponse { message } => {
                        H4aError::malformed(format!("games[{}]: {}", i, message))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(GameSchedule {
            class_id: self.g_class_id,
            class_short_name: self.g_class_sname,
            class_long_name: self.g_class_lname,
            referee_allocation_type: self.g_ref_alloc_type,
            referee_responsible_org: self.g_ref_resp_org,
            games,
        })
    }
}

impl RawLeagueResponse {
    pub fn into_league_data(
        self,
        competition_type: CompetitionType,
        sentinels: &[&str],
    ) -> Result<LeagueData> {
        Ok(LeagueData {
            competition_type,
            metadata: self.head.into(),
            table: Table(self.content.score.into_iter().map(TabScore::from).collect()),
            schedule: self.content.future_games.into_schedule(sentinels)?,
        })
    }
}

/// Map a league endpoint response with the default null sentinels.
pub fn parse_league_data(raw: Value, competition_type: CompetitionType) -> Result<LeagueData> {
    parse_league_data_with(raw, competition_type, DEFAULT_NULL_SENTINELS)
}

/// Map a league endpoint response, treating `sentinels` as "no score".
pub fn parse_league_data_with(
    raw: Value,
    competition_type: CompetitionType,
    sentinels: &[&str],
) -> Result<LeagueData> {
    let mut elements: Vec<RawLeagueResponse> =
        serde_json::from_value(raw).map_err(|e| H4aError::malformed(e.to_string()))?;

    if elements.len() != 1 {
        return Err(H4aError::malformed(format!(
            "expected exactly one top-level element, got {}",
            elements.len()
        )));
    }

    elements
        .remove(0)
        .into_league_data(competition_type, sentinels)
}
