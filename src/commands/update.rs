//! Update command: one orchestrator run against the federation API

use anyhow::Context;

use crate::{
    cli::types::CompetitionType,
    core::Settings,
    h4a::ReqwestFetcher,
    update::{UpdateResult, Updater},
};

use super::open_database;

/// Run one update pass and print the report.
///
/// The schema is created if missing. Returns the report so the caller can
/// derive the exit status from [`UpdateResult::has_failure`].
pub async fn handle_update(settings: &Settings, as_json: bool) -> anyhow::Result<UpdateResult> {
    let mut db = open_database(settings)?;
    if !db.create_schema(true)? {
        anyhow::bail!("could not create schema in {}", settings.db_path.display());
    }

    let fetcher = ReqwestFetcher::new(settings.http_timeout())?;
    let mut updater = Updater::with_config(db, fetcher, settings.updater_config());

    // tarpaulin::skip - HTTP call, covered by the wiremock integration test
    let result = updater.run_update().await.context("update aborted")?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&result)?); // tarpaulin::skip
    } else {
        print!("{}", format_report(&result)); // tarpaulin::skip
    }
    Ok(result)
}

/// Human readable report: one line per team, failures indented below it.
pub fn format_report(result: &UpdateResult) -> String {
    let mut out = String::new();

    for (team_id, outcome) in result.iter() {
        let mark = if outcome.has_failure() { '✗' } else { '✓' };
        out.push_str(&format!(
            "{} {} (#{}): league {}, cup {}\n",
            mark, outcome.internal_name, team_id, outcome.league.status, outcome.cup.status
        ));
        for competition_type in CompetitionType::ALL {
            if let Some(error) = &outcome.track(competition_type).error {
                out.push_str(&format!("    {}: {}\n", competition_type, error));
            }
        }
    }

    if !result.skipped().is_empty() {
        let names: Vec<&str> = result
            .skipped()
            .iter()
            .map(|s| s.internal_name.as_str())
            .collect();
        out.push_str(&format!(
            "Skipped {} team(s) without id: {}\n",
            names.len(),
            names.join(", ")
        ));
    }

    if result.is_empty() && result.skipped().is_empty() {
        out.push_str("No teams registered.\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::types::TeamId;
    use crate::update::TrackOutcome;

    #[test]
    fn test_format_report() {
        let mut result = UpdateResult::default();
        result.add_team(TeamId::new(1), "Herren 1");
        result.record(TeamId::new(1), CompetitionType::League, TrackOutcome::success());
        result.add_team(TeamId::new(2), "Damen");
        result.record(
            TeamId::new(2),
            CompetitionType::Cup,
            TrackOutcome::fetch_failed("timed out"),
        );
        result.skip("Orphan");

        let out = format_report(&result);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "✓ Herren 1 (#1): league ok, cup not attempted");
        assert_eq!(lines[1], "✗ Damen (#2): league not attempted, cup fetch failed");
        assert_eq!(lines[2], "    cup: timed out");
        assert_eq!(lines[3], "Skipped 1 team(s) without id: Orphan");
    }

    #[test]
    fn test_format_empty_report() {
        assert_eq!(format_report(&UpdateResult::default()), "No teams registered.\n");
    }
}
