//! Stored standings command

use anyhow::Context;

use crate::{
    cli::types::{CompetitionType, TeamId},
    core::Settings,
    models::LeagueData,
};

use super::open_ready_database;

pub fn handle_standings(
    settings: &Settings,
    team_id: TeamId,
    competition_type: CompetitionType,
    as_json: bool,
) -> anyhow::Result<()> {
    let db = open_ready_database(settings)?;
    let data = db
        .league_data(team_id, competition_type)
        .with_context(|| format!("could not read {} data for team {}", competition_type, team_id))?;

    let Some(data) = data else {
        println!(
            "No {} data stored for team {}. Run `h4a-sync update` first.",
            competition_type, team_id
        );
        return Ok(());
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&data)?); // tarpaulin::skip
    } else {
        print!("{}", format_standings(&data)); // tarpaulin::skip
    }
    Ok(())
}

/// Header line followed by one row per table entry. The tracked team is
/// marked with `*`.
pub fn format_standings(data: &LeagueData) -> String {
    let m = &data.metadata;
    let mut out = format!("{} ({}), {}\n", m.name, m.short_name, m.actualized);

    for row in &data.table {
        out.push_str(&format!(
            "{:>3}{} {:<28} {:>3} {:>3}-{}-{} {:>4}:{:<4} {:>3}:{}\n",
            row.position,
            if row.live_team { '*' } else { ' ' },
            row.team_name,
            row.played,
            row.won,
            row.drawn,
            row.lost,
            row.goals_for,
            row.goals_against,
            row.points_for,
            row.points_against,
        ));
    }
    out
}
