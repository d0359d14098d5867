//! Database schema and connection management

use crate::cli::types::CompetitionType;
use crate::error::{H4aError, Result};
use rusqlite::Connection;
use std::path::Path;

/// Physical table names, with the configured prefix applied.
#[derive(Debug, Clone)]
pub(crate) struct TableNames {
    pub teams: String,
    pub metadata: String,
    pub games: String,
    pub tab_scores: String,
}

impl TableNames {
    fn new(prefix: &str) -> Self {
        Self {
            teams: format!("{}teams", prefix),
            metadata: format!("{}leaguemetadata", prefix),
            games: format!("{}games", prefix),
            tab_scores: format!("{}tabscores", prefix),
        }
    }

    fn all(&self) -> [&str; 4] {
        [&self.teams, &self.metadata, &self.games, &self.tab_scores]
    }
}

/// SQLite store for the team registry and the fetched snapshots.
///
/// Callers must not run their own statements on the connection while a
/// replacement is in progress; every write method takes `&mut self` for
/// that reason.
pub struct LeagueDatabase {
    pub(crate) conn: Connection,
    pub(crate) tables: TableNames,
}

impl LeagueDatabase {
    /// Open (or create) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure the parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Wrap an existing connection. Foreign keys are switched on so the
    /// cascades declared in the schema apply.
    pub fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self {
            conn,
            tables: TableNames::new(""),
        })
    }

    /// Prepend `prefix` to every table name.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.tables = TableNames::new(prefix);
        self
    }

    fn schema_statements(&self, if_not_exists: bool) -> Vec<String> {
        let ine = if if_not_exists { "IF NOT EXISTS " } else { "" };
        let t = &self.tables;
        let types = CompetitionType::ALL
            .iter()
            .map(|ct| format!("'{}'", ct.as_str()))
            .collect::<Vec<_>>()
            .join(", ");

        vec![
            format!(
                "CREATE TABLE {ine}{teams} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    internalName TEXT NOT NULL,
                    identificators TEXT NOT NULL,
                    leagueUrl TEXT NULL,
                    cupUrl TEXT NULL
                )",
                teams = t.teams
            ),
            format!(
                "CREATE TABLE {ine}{metadata} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    teamid INTEGER NOT NULL,
                    type TEXT NOT NULL CHECK (type IN ({types})),
                    name TEXT NOT NULL,
                    sname TEXT NOT NULL,
                    headline1 TEXT NOT NULL,
                    headline2 TEXT NOT NULL,
                    actualized TEXT NOT NULL,
                    repUrl TEXT NOT NULL,
                    scoreShownPerGame BOOLEAN NOT NULL,
                    gClassID TEXT NOT NULL DEFAULT '',
                    gClassSname TEXT NOT NULL DEFAULT '',
                    gClassLname TEXT NOT NULL DEFAULT '',
                    gRefAllocType TEXT NOT NULL DEFAULT '',
                    gRefRespOrg TEXT NOT NULL DEFAULT '',
                    CONSTRAINT fk_team
                        FOREIGN KEY (teamid) REFERENCES {teams}(id)
                        ON UPDATE CASCADE ON DELETE CASCADE
                )",
                metadata = t.metadata,
                teams = t.teams
            ),
            format!(
                "CREATE TABLE {ine}{games} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    metadataid INTEGER NOT NULL,
                    gID TEXT NOT NULL,
                    sGID TEXT NOT NULL DEFAULT '',
                    gNo TEXT NOT NULL,
                    live BOOLEAN NOT NULL,
                    gToken TEXT NULL DEFAULT NULL,
                    gAppid TEXT NOT NULL,
                    gDate TEXT NOT NULL,
                    gWeekDay TEXT NOT NULL,
                    gTime TEXT NOT NULL,
                    gGymnasiumID TEXT NOT NULL,
                    gGymnasiumNo TEXT NOT NULL,
                    gGymnasiumName TEXT NOT NULL,
                    gGymnasiumPostal TEXT NOT NULL,
                    gGymnasiumTown TEXT NOT NULL,
                    gGymnasiumStreet TEXT NOT NULL,
                    gHomeTeam TEXT NOT NULL,
                    gGuestTeam TEXT NOT NULL,
                    gHomeGoals INTEGER NULL DEFAULT NULL,
                    gGuestGoals INTEGER NULL DEFAULT NULL,
                    gHomeGoals_1 INTEGER NULL DEFAULT NULL,
                    gGuestGoals_1 INTEGER NULL DEFAULT NULL,
                    gHomePoints INTEGER NULL DEFAULT NULL,
                    gGuestPoints INTEGER NULL DEFAULT NULL,
                    gComment TEXT NOT NULL,
                    gGroupsortTxt TEXT NOT NULL,
                    gReferee TEXT NOT NULL,
                    robotextstate TEXT NOT NULL,
                    CONSTRAINT fk_metadata
                        FOREIGN KEY (metadataid) REFERENCES {metadata}(id)
                        ON UPDATE CASCADE ON DELETE CASCADE
                )",
                games = t.games,
                metadata = t.metadata
            ),
            format!(
                "CREATE TABLE {ine}{tab_scores} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    metadataid INTEGER NOT NULL,
                    tabScore INTEGER NOT NULL,
                    tabTeamID TEXT NOT NULL,
                    tabTeamname TEXT NOT NULL,
                    liveTeam BOOLEAN NOT NULL,
                    numPlayedGames INTEGER NOT NULL,
                    numWonGames INTEGER NOT NULL,
                    numEqualGames INTEGER NOT NULL,
                    numLostGames INTEGER NOT NULL,
                    numGoalsShot INTEGER NOT NULL,
                    numGoalsGot INTEGER NOT NULL,
                    pointsPlus INTEGER NOT NULL,
                    pointsMinus INTEGER NOT NULL,
                    pointsPerGame10 TEXT NOT NULL,
                    numGoalsDiffperGame TEXT NOT NULL,
                    numGoalsShotperGame TEXT NOT NULL,
                    posCriterion TEXT NOT NULL,
                    CONSTRAINT fk_metadata
                        FOREIGN KEY (metadataid) REFERENCES {metadata}(id)
                        ON UPDATE CASCADE ON DELETE CASCADE
                )",
                tab_scores = t.tab_scores,
                metadata = t.metadata
            ),
            // Indexes for the replace/read paths
            format!(
                "CREATE INDEX {ine}idx_{metadata}_team_type ON {metadata}(teamid, type)",
                metadata = t.metadata
            ),
            format!(
                "CREATE INDEX {ine}idx_{games}_metadata ON {games}(metadataid)",
                games = t.games
            ),
            format!(
                "CREATE INDEX {ine}idx_{tab_scores}_metadata ON {tab_scores}(metadataid)",
                tab_scores = t.tab_scores
            ),
        ]
    }

    /// Create all tables in one transaction.
    ///
    /// Returns `Ok(false)` and leaves no table behind if any statement
    /// fails, e.g. a table already exists and `if_not_exists` is false.
    pub fn create_schema(&mut self, if_not_exists: bool) -> Result<bool> {
        let statements = self.schema_statements(if_not_exists);

        let tx = self.conn.transaction()?;
        for sql in &statements {
            if let Err(e) = tx.execute(sql, []) {
                tracing::warn!(error = %e, "schema creation failed, rolling back");
                tx.rollback()?;
                return Ok(false);
            }
        }
        tx.commit()?;

        tracing::debug!(tables = ?self.tables.all(), "schema ready");
        Ok(true)
    }

    /// True when all four tables exist.
    pub fn is_ready(&self) -> Result<bool> {
        let mut stmt = self
            .conn
            .prepare("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1")?;

        for name in self.tables.all() {
            let count: i64 = stmt.query_row([name], |row| row.get(0))?;
            if count == 0 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Drop all four tables (children first) in one transaction.
    pub fn drop_schema(&mut self) -> Result<()> {
        let t = &self.tables;
        let statements = [&t.tab_scores, &t.games, &t.metadata, &t.teams]
            .iter()
            .map(|name| format!("DROP TABLE IF EXISTS {}", name))
            .collect::<Vec<_>>();

        let tx = self.conn.transaction()?;
        for sql in &statements {
            tx.execute(sql, [])
                .map_err(|e| H4aError::persistence(format!("could not drop schema: {}", e)))?;
        }
        tx.commit()?;
        Ok(())
    }
}
