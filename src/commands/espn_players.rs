//! Refresh `espn_players` from the ESPN site API and reassign NFL teams

use std::time::Duration;

use crate::{
    espn::{
        build_client, fetch_nfl_teams_with_base_url, fetch_team_roster_with_base_url,
        ESPN_SITE_BASE_URL, ROSTER_REQUEST_DELAY,
    },
    storage::LeagueDatabase,
    Result,
};

use super::print_counts;

/// Outcome of `import-espn-players`.
#[derive(Debug, Clone, PartialEq)]
pub struct EspnImportReport {
    pub teams: usize,
    pub failed_teams: Vec<String>,
    pub players: usize,
    pub reassigned: usize,
}

pub async fn handle_import_espn_players(db: &mut LeagueDatabase) -> Result<EspnImportReport> {
    handle_import_espn_players_with_base_url(db, ESPN_SITE_BASE_URL, ROSTER_REQUEST_DELAY).await
}

/// Same as [`handle_import_espn_players`] against another API base, with a
/// configurable pause between teams.
///
/// Every roster is fetched before the database is touched. A failed team
/// list leaves the snapshot as it was. When any roster fails, players ESPN
/// no longer places keep their current team instead of becoming free agents.
pub async fn handle_import_espn_players_with_base_url(
    db: &mut LeagueDatabase,
    base_url: &str,
    delay: Duration,
) -> Result<EspnImportReport> {
    let client = build_client()?;
    let teams = fetch_nfl_teams_with_base_url(&client, base_url).await?;
    println!("✓ Found {} NFL teams", teams.len());

    let mut players = Vec::new();
    let mut failed_teams = Vec::new();
    for (index, team) in teams.iter().enumerate() {
        if index > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match fetch_team_roster_with_base_url(&client, base_url, team).await {
            Ok(roster) => {
                println!(
                    "  {} ({}): {} players",
                    team.display_name,
                    team.abbreviation,
                    roster.len()
                );
                players.extend(roster);
            }
            Err(e) => {
                println!("⚠ Error fetching roster for {}: {}", team.display_name, e);
                failed_teams.push(team.abbreviation.clone());
            }
        }
    }

    let (cleared, _) = db.replace_espn_players(&players)?;
    if cleared > 0 {
        println!("Replaced {} existing ESPN players", cleared);
    }
    println!("✓ Imported {} ESPN players", players.len());

    print_counts("ESPN players by position", &db.espn_position_counts()?, "players");
    println!("  Total: {}", db.espn_player_total()?);

    println!("\nUpdating NFL team assignments...");
    let complete = failed_teams.is_empty();
    if !complete {
        println!(
            "⚠ Rosters missing for {}; unmatched players keep their current team",
            failed_teams.join(", ")
        );
    }
    let reassigned = db.update_player_teams(complete)?;
    println!("✓ Updated {} players", reassigned);

    println!("\nTeam assignment summary:");
    for row in db.team_assignment_summary()? {
        println!(
            "  {}: {} total, {} on teams, {} free agents",
            row.position, row.total, row.on_teams, row.free_agents
        );
    }

    Ok(EspnImportReport {
        teams: teams.len(),
        failed_teams,
        players: players.len(),
        reassigned,
    })
}
