//! Registry, snapshot replacement and read-back queries

use super::schema::{LeagueDatabase, TableNames};
use crate::cli::types::{CompetitionType, TeamId};
use crate::error::{H4aError, Result};
use crate::models::{Game, GameSchedule, LeagueData, LeagueMetadata, TabScore, Table, Team};
use rusqlite::{params, params_from_iter, OptionalExtension, Row, Transaction};
use serde::Serialize;

/// Restriction for [`LeagueDatabase::games`]. Several filters are AND-combined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameFilter {
    /// Only games currently flagged live.
    Live,
    /// Only games stored for one of these registry teams.
    Teams(Vec<TeamId>),
}

/// Number of rows per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RowCounts {
    pub teams: i64,
    pub metadata: i64,
    pub games: i64,
    pub tab_scores: i64,
}

const GAME_COLUMNS: &str = "gID, sGID, gNo, live, gToken, gAppid, gDate, gWeekDay, gTime,
    gGymnasiumID, gGymnasiumNo, gGymnasiumName, gGymnasiumPostal, gGymnasiumTown,
    gGymnasiumStreet, gHomeTeam, gGuestTeam, gHomeGoals, gGuestGoals, gHomeGoals_1,
    gGuestGoals_1, gHomePoints, gGuestPoints, gComment, gGroupsortTxt, gReferee, robotextstate";

const TAB_SCORE_COLUMNS: &str = "tabScore, tabTeamID, tabTeamname, liveTeam, numPlayedGames,
    numWonGames, numEqualGames, numLostGames, numGoalsShot, numGoalsGot, pointsPlus,
    pointsMinus, pointsPerGame10, numGoalsDiffperGame, numGoalsShotperGame, posCriterion";

impl LeagueDatabase {
    /// All registered teams, ordered by id.
    pub fn list_teams(&self) -> Result<Vec<Team>> {
        self.read_teams()
            .map_err(|e| H4aError::persistence(format!("Teams could not be fetched: {}", e)))
    }

    fn read_teams(&self) -> rusqlite::Result<Vec<Team>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, internalName, identificators, leagueUrl, cupUrl FROM {} ORDER BY id",
            self.tables.teams
        ))?;

        let rows = stmt.query_map([], |row| {
            let identificators: Option<String> = row.get(2)?;
            Ok(Team {
                id: row.get::<_, Option<i64>>(0)?.map(TeamId::new),
                internal_name: row.get(1)?,
                identificators: Team::parse_identificators(identificators.as_deref().unwrap_or("")),
                league_url: row.get(3)?,
                cup_url: row.get(4)?,
            })
        })?;

        rows.collect()
    }

    /// Register a new team and return its id. Any id already set on `team`
    /// is ignored.
    pub fn insert_team(&self, team: &Team) -> Result<TeamId> {
        team.validate()?;

        self.conn
            .execute(
                &format!(
                    "INSERT INTO {} (internalName, identificators, leagueUrl, cupUrl)
                     VALUES (?1, ?2, ?3, ?4)",
                    self.tables.teams
                ),
                params![
                    team.internal_name,
                    team.identificator_str(),
                    team.league_url,
                    team.cup_url
                ],
            )
            .map_err(|e| {
                H4aError::persistence(format!(
                    "Team '{}' could not be inserted: {}",
                    team.internal_name, e
                ))
            })?;

        Ok(TeamId::new(self.conn.last_insert_rowid()))
    }

    /// Replace the stored snapshot for `(team_id, competition_type)`.
    ///
    /// Old metadata, games and table rows are deleted and `data` inserted in
    /// one transaction. An empty table or schedule still replaces. On any
    /// failure the transaction is rolled back and nothing changes.
    pub fn replace_league_data(
        &mut self,
        team_id: TeamId,
        competition_type: CompetitionType,
        data: &LeagueData,
    ) -> Result<bool> {
        if data.competition_type != competition_type {
            return Err(H4aError::persistence(format!(
                "Snapshot is tagged {} but was stored as {} for team {}",
                data.competition_type, competition_type, team_id
            )));
        }

        let fail = |e: rusqlite::Error| {
            H4aError::persistence(format!(
                "Could not replace {} data for team {}: {}",
                competition_type, team_id, e
            ))
        };

        let tx = self.conn.transaction().map_err(fail)?;
        match write_snapshot(&tx, &self.tables, team_id, competition_type, data) {
            Ok(metadata_id) => {
                tx.commit().map_err(fail)?;
                tracing::debug!(
                    team_id = team_id.as_i64(),
                    competition = %competition_type,
                    metadata_id,
                    games = data.schedule.len(),
                    table_rows = data.table.len(),
                    "snapshot replaced"
                );
                Ok(true)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback() {
                    tracing::warn!(error = %rollback_err, "rollback failed");
                }
                Err(fail(e))
            }
        }
    }

    /// Stored snapshot for `(team_id, competition_type)`, rows in insertion order.
    pub fn league_data(
        &self,
        team_id: TeamId,
        competition_type: CompetitionType,
    ) -> Result<Option<LeagueData>> {
        let t = &self.tables;
        let header = self
            .conn
            .query_row(
                &format!(
                    "SELECT id, name, sname, headline1, headline2, actualized, repUrl,
                            scoreShownPerGame, gClassID, gClassSname, gClassLname,
                            gRefAllocType, gRefRespOrg
                     FROM {} WHERE teamid = ?1 AND type = ?2",
                    t.metadata
                ),
                params![team_id.as_i64(), competition_type.as_str()],
                |row| {
                    let metadata = LeagueMetadata {
                        name: row.get(1)?,
                        short_name: row.get(2)?,
                        headline1: row.get(3)?,
                        headline2: row.get(4)?,
                        actualized: row.get(5)?,
                        report_url: row.get(6)?,
                        score_shown_per_game: row.get(7)?,
                    };
                    let schedule = GameSchedule {
                        class_id: row.get(8)?,
                        class_short_name: row.get(9)?,
                        class_long_name: row.get(10)?,
                        referee_allocation_type: row.get(11)?,
                        referee_responsible_org: row.get(12)?,
                        games: Vec::new(),
                    };
                    Ok((row.get::<_, i64>(0)?, metadata, schedule))
                },
            )
            .optional()?;

        let Some((metadata_id, metadata, mut schedule)) = header else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM {} WHERE metadataid = ?1 ORDER BY id",
            GAME_COLUMNS, t.games
        ))?;
        schedule.games = stmt
            .query_map([metadata_id], row_to_game)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM {} WHERE metadataid = ?1 ORDER BY id",
            TAB_SCORE_COLUMNS, t.tab_scores
        ))?;
        let rows = stmt
            .query_map([metadata_id], row_to_tab_score)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some(LeagueData {
            competition_type,
            metadata,
            table: Table(rows),
            schedule,
        }))
    }

    /// Stored games matching every filter, ordered by insertion.
    pub fn games(&self, filters: &[GameFilter]) -> Result<Vec<Game>> {
        let mut clauses = Vec::new();
        let mut values: Vec<i64> = Vec::new();

        for filter in filters {
            match filter {
                GameFilter::Live => clauses.push("g.live = 1".to_string()),
                GameFilter::Teams(ids) => {
                    if ids.is_empty() {
                        return Ok(Vec::new());
                    }
                    let placeholders = vec!["?"; ids.len()].join(", ");
                    clauses.push(format!("m.teamid IN ({})", placeholders));
                    values.extend(ids.iter().map(TeamId::as_i64));
                }
            }
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let columns = GAME_COLUMNS
            .split(',')
            .map(|c| format!("g.{}", c.trim()))
            .collect::<Vec<_>>()
            .join(", ");

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM {} g JOIN {} m ON g.metadataid = m.id {} ORDER BY g.id",
            columns, self.tables.games, self.tables.metadata, where_clause
        ))?;

        let games = stmt
            .query_map(params_from_iter(values), row_to_game)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(games)
    }

    pub fn row_counts(&self) -> Result<RowCounts> {
        let count = |table: &str| -> Result<i64> {
            Ok(self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })?)
        };

        Ok(RowCounts {
            teams: count(&self.tables.teams)?,
            metadata: count(&self.tables.metadata)?,
            games: count(&self.tables.games)?,
            tab_scores: count(&self.tables.tab_scores)?,
        })
    }
}

fn write_snapshot(
    tx: &Transaction<'_>,
    t: &TableNames,
    team_id: TeamId,
    competition_type: CompetitionType,
    data: &LeagueData,
) -> rusqlite::Result<i64> {
    let team = team_id.as_i64();
    let ct = competition_type.as_str();

    // Children are removed explicitly so the overwrite holds even on a
    // connection with foreign keys disabled.
    for child in [&t.games, &t.tab_scores] {
        tx.execute(
            &format!(
                "DELETE FROM {} WHERE metadataid IN
                 (SELECT id FROM {} WHERE teamid = ?1 AND type = ?2)",
                child, t.metadata
            ),
            params![team, ct],
        )?;
    }
    tx.execute(
        &format!("DELETE FROM {} WHERE teamid = ?1 AND type = ?2", t.metadata),
        params![team, ct],
    )?;

    let m = &data.metadata;
    let s = &data.schedule;
    tx.execute(
        &format!(
            "INSERT INTO {} (teamid, type, name, sname, headline1, headline2, actualized,
                             repUrl, scoreShownPerGame, gClassID, gClassSname, gClassLname,
                             gRefAllocType, gRefRespOrg)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            t.metadata
        ),
        params![
            team,
            ct,
            m.name,
            m.short_name,
            m.headline1,
            m.headline2,
            m.actualized,
            m.report_url,
            m.score_shown_per_game,
            s.class_id,
            s.class_short_name,
            s.class_long_name,
            s.referee_allocation_type,
            s.referee_responsible_org
        ],
    )?;
    let metadata_id = tx.last_insert_rowid();

    let mut insert_game = tx.prepare(&format!(
        "INSERT INTO {} (metadataid, {}) VALUES ({})",
        t.games,
        GAME_COLUMNS,
        numbered_placeholders(28)
    ))?;
    for g in &data.schedule {
        insert_game.execute(params![
            metadata_id,
            g.game_id,
            g.report_id,
            g.game_no,
            g.live,
            g.live_ticker_token,
            g.app_id,
            g.date,
            g.weekday,
            g.time,
            g.gym_id,
            g.gym_no,
            g.gym_name,
            g.gym_postal,
            g.gym_town,
            g.gym_street,
            g.home_team,
            g.guest_team,
            g.home_goals,
            g.guest_goals,
            g.home_goals_half,
            g.guest_goals_half,
            g.home_points,
            g.guest_points,
            g.comment,
            g.group_sort_text,
            g.referee,
            g.robotext_state
        ])?;
    }

    let mut insert_row = tx.prepare(&format!(
        "INSERT INTO {} (metadataid, {}) VALUES ({})",
        t.tab_scores,
        TAB_SCORE_COLUMNS,
        numbered_placeholders(17)
    ))?;
    for r in &data.table {
        insert_row.execute(params![
            metadata_id,
            r.position,
            r.tab_team_id,
            r.team_name,
            r.live_team,
            r.played,
            r.won,
            r.drawn,
            r.lost,
            r.goals_for,
            r.goals_against,
            r.points_for,
            r.points_against,
            r.points_per_game,
            r.goal_diff_per_game,
            r.goals_per_game,
            r.pos_criterion
        ])?;
    }

    Ok(metadata_id)
}

fn numbered_placeholders(n: usize) -> String {
    (1..=n)
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

fn row_to_game(row: &Row<'_>) -> rusqlite::Result<Game> {
    Ok(Game {
        game_id: row.get(0)?,
        report_id: row.get(1)?,
        game_no: row.get(2)?,
        live: row.get(3)?,
        live_ticker_token: row.get(4)?,
        app_id: row.get(5)?,
        date: row.get(6)?,
        weekday: row.get(7)?,
        time: row.get(8)?,
        gym_id: row.get(9)?,
        gym_no: row.get(10)?,
        gym_name: row.get(11)?,
        gym_postal: row.get(12)?,
        gym_town: row.get(13)?,
        gym_street: row.get(14)?,
        home_team: row.get(15)?,
        guest_team: row.get(16)?,
        home_goals: row.get(17)?,
        guest_goals: row.get(18)?,
        home_goals_half: row.get(19)?,
        guest_goals_half: row.get(20)?,
        home_points: row.get(21)?,
        guest_points: row.get(22)?,
        comment: row.get(23)?,
        group_sort_text: row.get(24)?,
        referee: row.get(25)?,
        robotext_state: row.get(26)?,
    })
}

fn row_to_tab_score(row: &Row<'_>) -> rusqlite::Result<TabScore> {
    Ok(TabScore {
        position: row.get(0)?,
        tab_team_id: row.get(1)?,
        team_name: row.get(2)?,
        live_team: row.get(3)?,
        played: row.get(4)?,
        won: row.get(5)?,
        drawn: row.get(6)?,
        lost: row.get(7)?,
        goals_for: row.get(8)?,
        goals_against: row.get(9)?,
        points_for: row.get(10)?,
        points_against: row.get(11)?,
        points_per_game: row.get(12)?,
        goal_diff_per_game: row.get(13)?,
        goals_per_game: row.get(14)?,
        pos_criterion: row.get(15)?,
    })
}
