//! Unit tests for the update orchestrator

use super::*;
use crate::error::H4aError;
use crate::models::LeagueData;
use crate::storage::{LeagueDatabase, TeamRegistry};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

const FIXTURE: &str = include_str!("../../tests/fixtures/league_response.json");
const LEAGUE_URL: &str = "https://h4a.example/#/league?ogId=1&lId=1&tId=1";
const CUP_URL: &str = "https://h4a.example/#/cup?ogId=1&lId=2&pId=3";

enum Reply {
    Fixture,
    TransportError,
    Json(Value),
}

/// Fetcher returning a canned reply and recording every requested URL.
struct StubFetcher {
    reply: Reply,
    calls: Mutex<Vec<String>>,
}

impl StubFetcher {
    fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl JsonFetcher for StubFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value> {
        self.calls.lock().unwrap().push(url.to_string());
        match &self.reply {
            Reply::Fixture => Ok(serde_json::from_str(FIXTURE)?),
            Reply::TransportError => Err(H4aError::Fetch {
                url: url.to_string(),
                message: "503 Service Unavailable".to_string(),
            }),
            Reply::Json(value) => Ok(value.clone()),
        }
    }
}

/// Registry that can hold rows without id, which SQLite never produces.
#[derive(Default)]
struct MemoryStore {
    teams: Vec<Team>,
    replaced: Vec<(TeamId, CompetitionType, usize)>,
    fail_replace: bool,
}

impl TeamRegistry for MemoryStore {
    fn list_teams(&self) -> Result<Vec<Team>> {
        Ok(self.teams.clone())
    }
}

impl LeagueStore for MemoryStore {
    fn replace_league_data(
        &mut self,
        team_id: TeamId,
        competition_type: CompetitionType,
        data: &LeagueData,
    ) -> Result<bool> {
        if self.fail_replace {
            return Err(H4aError::Persistence {
                message: "disk full".to_string(),
            });
        }
        self.replaced
            .push((team_id, competition_type, data.schedule.len()));
        Ok(true)
    }
}

fn db_with_teams(teams: &[Team]) -> (LeagueDatabase, Vec<TeamId>) {
    let mut db = LeagueDatabase::open_in_memory().unwrap();
    db.create_schema(true).unwrap();
    let ids = teams.iter().map(|t| db.insert_team(t).unwrap()).collect();
    (db, ids)
}

fn team(name: &str, league: bool, cup: bool) -> Team {
    Team::new(
        name,
        vec![name.to_string()],
        league.then(|| LEAGUE_URL.to_string()),
        cup.then(|| CUP_URL.to_string()),
    )
    .unwrap()
}

#[tokio::test]
async fn test_team_without_urls_is_not_attempted() {
    let (db, ids) = db_with_teams(&[team("Herren 1", false, false)]);
    let mut updater = Updater::new(db, StubFetcher::new(Reply::Fixture));

    let result = updater.run_update().await.unwrap();

    let outcome = result.get(ids[0]).unwrap();
    assert_eq!(outcome.league.status, TrackStatus::NotAttempted);
    assert_eq!(outcome.cup.status, TrackStatus::NotAttempted);
    assert!(updater.fetcher().calls().is_empty());
    assert!(!result.has_failure());
}

#[tokio::test]
async fn test_league_only_team() {
    let (db, ids) = db_with_teams(&[team("Herren 1", true, false)]);
    let mut updater = Updater::new(db, StubFetcher::new(Reply::Fixture));

    let result = updater.run_update().await.unwrap();

    let outcome = result.get(ids[0]).unwrap();
    assert_eq!(outcome.league.status, TrackStatus::Success);
    assert_eq!(outcome.cup.status, TrackStatus::NotAttempted);

    let counts = updater.store().row_counts().unwrap();
    assert_eq!(counts.metadata, 1);
    assert_eq!(counts.tab_scores, 12);
    assert_eq!(counts.games, 22);

    assert_eq!(
        updater.fetcher().calls(),
        vec![format!("{}?ca=0&cl=1&cmd=ps&ct=1&og=1", FEDERATION_API_URL)]
    );
}

#[tokio::test]
async fn test_league_and_cup_team() {
    let (db, ids) = db_with_teams(&[team("Herren 1", true, true)]);
    let mut updater = Updater::new(db, StubFetcher::new(Reply::Fixture));

    let result = updater.run_update().await.unwrap();

    let outcome = result.get(ids[0]).unwrap();
    assert_eq!(outcome.league.status, TrackStatus::Success);
    assert_eq!(outcome.cup.status, TrackStatus::Success);

    let db = updater.into_store();
    let counts = db.row_counts().unwrap();
    assert_eq!(counts.metadata, 2);
    assert_eq!(counts.tab_scores, 24);
    assert_eq!(counts.games, 44);
    assert!(db
        .league_data(ids[0], CompetitionType::Cup)
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_transport_failure_is_recorded() {
    let (db, ids) = db_with_teams(&[team("Herren 1", true, false)]);
    let mut updater = Updater::new(db, StubFetcher::new(Reply::TransportError));

    let result = updater.run_update().await.unwrap();

    let league = &result.get(ids[0]).unwrap().league;
    assert_eq!(league.status, TrackStatus::FetchFailed);
    assert!(league.error.as_deref().unwrap().contains("503"));
    assert!(result.has_failure());

    let counts = updater.store().row_counts().unwrap();
    assert_eq!(counts.metadata, 0);
    assert_eq!(counts.games, 0);
}

#[tokio::test]
async fn test_fetch_failure_on_one_track_keeps_other() {
    let (db, ids) = db_with_teams(&[team("Herren 1", true, false)]);
    let cup_team = team("Damen", false, true);
    let cup_id = db.insert_team(&cup_team).unwrap();

    // Fails league fetches only
    struct LeagueDown;

    #[async_trait]
    impl JsonFetcher for LeagueDown {
        async fn fetch_json(&self, url: &str) -> Result<Value> {
            if url.contains("ca=0") {
                Err(H4aError::Fetch {
                    url: url.to_string(),
                    message: "timeout".to_string(),
                })
            } else {
                Ok(serde_json::from_str(FIXTURE)?)
            }
        }
    }

    let mut updater = Updater::new(db, LeagueDown);
    let result = updater.run_update().await.unwrap();

    assert_eq!(result.get(ids[0]).unwrap().league.status, TrackStatus::FetchFailed);
    assert_eq!(result.get(cup_id).unwrap().cup.status, TrackStatus::Success);
    assert_eq!(updater.store().row_counts().unwrap().metadata, 1);
}

#[tokio::test]
async fn test_team_without_id_is_skipped() {
    let orphan = team("Orphan", true, true);
    let valid = team("Herren 1", true, false).with_id(TeamId::new(5));
    let store = MemoryStore {
        teams: vec![orphan, valid],
        ..MemoryStore::default()
    };
    let mut updater = Updater::new(store, StubFetcher::new(Reply::Fixture));

    let result = updater.run_update().await.unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result.skipped().len(), 1);
    assert_eq!(result.skipped()[0].internal_name, "Orphan");
    assert_eq!(
        result.get(TeamId::new(5)).unwrap().league.status,
        TrackStatus::Success
    );
    assert_eq!(updater.fetcher().calls().len(), 1);
    assert_eq!(
        updater.store().replaced,
        vec![(TeamId::new(5), CompetitionType::League, 22)]
    );
}

#[tokio::test]
async fn test_invalid_stored_url_does_not_abort() {
    let broken = Team {
        id: Some(TeamId::new(1)),
        internal_name: "Broken".to_string(),
        identificators: vec![],
        league_url: Some("https://h4a.example/#/league?ogId=1&lId=1".to_string()),
        cup_url: Some(CUP_URL.to_string()),
    };
    let store = MemoryStore {
        teams: vec![broken, team("Herren 1", true, false).with_id(TeamId::new(2))],
        ..MemoryStore::default()
    };
    let mut updater = Updater::new(store, StubFetcher::new(Reply::Fixture));

    let result = updater.run_update().await.unwrap();

    let broken = result.get(TeamId::new(1)).unwrap();
    assert_eq!(broken.league.status, TrackStatus::InvalidUrl);
    assert!(broken.league.error.as_deref().unwrap().contains("tId"));
    assert_eq!(broken.cup.status, TrackStatus::Success);
    assert_eq!(
        result.get(TeamId::new(2)).unwrap().league.status,
        TrackStatus::Success
    );
    assert!(result.has_failure());
    assert_eq!(updater.fetcher().calls().len(), 2);
}

#[tokio::test]
async fn test_malformed_response_aborts_run() {
    let (db, _) = db_with_teams(&[team("Herren 1", true, false)]);
    let fetcher = StubFetcher::new(Reply::Json(serde_json::json!([{"head": {}}])));
    let mut updater = Updater::new(db, fetcher);

    let err = updater.run_update().await.unwrap_err();

    assert!(matches!(err, H4aError::MalformedResponse { .. }));
    assert_eq!(updater.store().row_counts().unwrap().metadata, 0);
}

#[tokio::test]
async fn test_persistence_failure_aborts_run() {
    let store = MemoryStore {
        teams: vec![team("Herren 1", true, false).with_id(TeamId::new(1))],
        fail_replace: true,
        ..MemoryStore::default()
    };
    let mut updater = Updater::new(store, StubFetcher::new(Reply::Fixture));

    let err = updater.run_update().await.unwrap_err();
    assert!(matches!(err, H4aError::Persistence { .. }));
}

#[tokio::test]
async fn test_results_do_not_depend_on_concurrency() {
    let teams = [
        team("A", true, true),
        team("B", true, false),
        team("C", false, true),
    ];

    let mut results = Vec::new();
    for concurrency in [1, 4] {
        let (db, _) = db_with_teams(&teams);
        let config = UpdaterConfig {
            concurrency,
            ..UpdaterConfig::default()
        };
        let mut updater = Updater::with_config(db, StubFetcher::new(Reply::Fixture), config);
        let result = updater.run_update().await.unwrap();
        assert_eq!(updater.fetcher().calls().len(), 4);
        assert_eq!(updater.store().row_counts().unwrap().metadata, 4);
        results.push(result);
    }

    assert_eq!(results[0], results[1]);
}

#[tokio::test]
async fn test_zero_concurrency_still_runs() {
    let (db, ids) = db_with_teams(&[team("Herren 1", true, false)]);
    let config = UpdaterConfig {
        concurrency: 0,
        ..UpdaterConfig::default()
    };
    let mut updater = Updater::with_config(db, StubFetcher::new(Reply::Fixture), config);

    let result = updater.run_update().await.unwrap();
    assert_eq!(result.get(ids[0]).unwrap().league.status, TrackStatus::Success);
}

#[tokio::test]
async fn test_custom_api_url() {
    let (db, _) = db_with_teams(&[team("Herren 1", false, true)]);
    let config = UpdaterConfig {
        api_url: "http://localhost:8080/h4a".to_string(),
        ..UpdaterConfig::default()
    };
    let mut updater = Updater::with_config(db, StubFetcher::new(Reply::Fixture), config);

    updater.run_update().await.unwrap();
    assert_eq!(
        updater.fetcher().calls(),
        vec!["http://localhost:8080/h4a?ca=1&cl=2&cmd=ps&og=1&p=3".to_string()]
    );
}
