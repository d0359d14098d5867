//! Registry listing command

use crate::{core::Settings, models::Team};

use super::open_ready_database;

pub fn handle_teams(settings: &Settings, as_json: bool) -> anyhow::Result<()> {
    let teams = open_ready_database(settings)?.list_teams()?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&teams)?); // tarpaulin::skip
    } else if teams.is_empty() {
        println!("No teams registered.");
    } else {
        print!("{}", format_teams(&teams)); // tarpaulin::skip
    }
    Ok(())
}

/// One line per team: id, name, tracked competitions and identificators.
pub fn format_teams(teams: &[Team]) -> String {
    let mut out = String::new();
    for team in teams {
        let id = team
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());

        let mut tracks = Vec::new();
        if team.league_url.is_some() {
            tracks.push("league");
        }
        if team.cup_url.is_some() {
            tracks.push("cup");
        }
        let tracks = if tracks.is_empty() {
            "untracked".to_string()
        } else {
            tracks.join("+")
        };

        out.push_str(&format!("{:>4}  {} [{}]", id, team.internal_name, tracks));
        if !team.identificators.is_empty() {
            out.push_str(&format!(" ({})", team.identificators.join(", ")));
        }
        out.push('\n');
    }
    out
}
