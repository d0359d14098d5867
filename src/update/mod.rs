//! Update orchestrator.
//!
//! One run reads the registry, fetches every tracked competition and
//! replaces the stored snapshot per team and track. Transport failures are
//! recorded in the returned [`UpdateResult`]; malformed responses and store
//! failures abort the run.

mod result;

#[cfg(test)]
mod tests;

pub use result::{SkippedTeam, TeamOutcome, TrackOutcome, TrackStatus, UpdateResult};

use futures_util::{stream, StreamExt};

use crate::cli::types::{CompetitionType, TeamId};
use crate::h4a::{
    parse_league_data_with, Endpoints, JsonFetcher, DEFAULT_NULL_SENTINELS, FEDERATION_API_URL,
};
use crate::models::Team;
use crate::storage::LeagueStore;
use crate::Result;

/// Knobs for [`Updater`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdaterConfig {
    /// Base URL the endpoint templates are applied to.
    pub api_url: String,
    /// Maximum number of fetches in flight. Values below 1 are treated as 1.
    pub concurrency: usize,
    /// Strings meaning "no value" in numeric score fields.
    pub null_sentinels: Vec<String>,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            api_url: FEDERATION_API_URL.to_string(),
            concurrency: 4,
            null_sentinels: DEFAULT_NULL_SENTINELS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug)]
struct FetchJob {
    team_id: TeamId,
    competition_type: CompetitionType,
    url: String,
}

/// Keeps a store and a fetcher and runs update passes over the registry.
pub struct Updater<S, F> {
    store: S,
    fetcher: F,
    config: UpdaterConfig,
}

impl<S: LeagueStore, F: JsonFetcher> Updater<S, F> {
    pub fn new(store: S, fetcher: F) -> Self {
        Self::with_config(store, fetcher, UpdaterConfig::default())
    }

    pub fn with_config(store: S, fetcher: F, config: UpdaterConfig) -> Self {
        Self {
            store,
            fetcher,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Update every registered team once.
    ///
    /// Each team+track pair is fetched at most once, so replacements for the
    /// same pair never overlap. Parsing and storing happen one at a time on
    /// the single store handle as fetches complete.
    pub async fn run_update(&mut self) -> Result<UpdateResult> {
        let teams = self.store.list_teams()?;
        let endpoints = Endpoints::new(self.config.api_url.clone());
        let mut result = UpdateResult::default();

        let mut jobs = Vec::new();
        for team in &teams {
            let Some(team_id) = team.id else {
                tracing::warn!(
                    team = %team.internal_name,
                    "team has no id, skipping"
                );
                result.skip(&team.internal_name);
                continue;
            };
            result.add_team(team_id, &team.internal_name);

            for competition_type in CompetitionType::ALL {
                if team.tracking_url(competition_type).is_none() {
                    continue;
                }
                match endpoint(&endpoints, team, competition_type) {
                    Ok(url) => jobs.push(FetchJob {
                        team_id,
                        competition_type,
                        url,
                    }),
                    Err(e) => {
                        tracing::warn!(
                            team_id = team_id.as_i64(),
                            competition = %competition_type,
                            error = %e,
                            "cannot build endpoint"
                        );
                        result.record(
                            team_id,
                            competition_type,
                            TrackOutcome::invalid_url(e.to_string()),
                        );
                    }
                }
            }
        }

        tracing::info!(
            teams = result.len(),
            skipped = result.skipped().len(),
            fetches = jobs.len(),
            "starting update"
        );

        let sentinels: Vec<&str> = self
            .config
            .null_sentinels
            .iter()
            .map(String::as_str)
            .collect();
        let fetcher = &self.fetcher;
        let mut fetches = std::pin::pin!(stream::iter(jobs)
            .map(move |job| async move {
                let fetched = fetcher.fetch_json(&job.url).await;
                (job, fetched)
            })
            .buffer_unordered(self.config.concurrency.max(1)));

        while let Some((job, fetched)) = fetches.next().await {
            let raw = match fetched {
                Ok(raw) => raw,
                Err(e) if e.is_transport() => {
                    tracing::warn!(
                        team_id = job.team_id.as_i64(),
                        competition = %job.competition_type,
                        url = %job.url,
                        error = %e,
                        "fetch failed"
                    );
                    result.record(
                        job.team_id,
                        job.competition_type,
                        TrackOutcome::fetch_failed(e.to_string()),
                    );
                    continue;
                }
                Err(e) => return Err(e),
            };

            let data = parse_league_data_with(raw, job.competition_type, &sentinels)?;
            self.store
                .replace_league_data(job.team_id, job.competition_type, &data)?;

            tracing::info!(
                team_id = job.team_id.as_i64(),
                competition = %job.competition_type,
                games = data.schedule.len(),
                table_rows = data.table.len(),
                "updated"
            );
            result.record(job.team_id, job.competition_type, TrackOutcome::success());
        }

        Ok(result)
    }
}

fn endpoint(
    endpoints: &Endpoints,
    team: &Team,
    competition_type: CompetitionType,
) -> Result<String> {
    match competition_type {
        CompetitionType::League => endpoints.league(team),
        CompetitionType::Cup => endpoints.cup(team),
    }
}
