//! Player, fantasy team and roster exports

use std::path::{Path, PathBuf};

use crate::{core::csv_io::{timestamped_path, write_rows}, storage::LeagueDatabase, Result};

use super::print_counts;

pub const PLAYERS_FILE: &str = "exported_players.csv";
pub const TEAMS_FILE: &str = "fantasy_teams_reference.csv";

const PLAYER_HEADER: [&str; 8] = [
    "player_id",
    "display_name",
    "first_name",
    "last_name",
    "position",
    "nfl_team_name",
    "nfl_team_code",
    "nfl_team_id",
];

const TEAM_HEADER: [&str; 4] = ["team_id", "team_name", "owner_name", "username"];

const ROSTER_HEADER: [&str; 16] = [
    "team_id",
    "team_name",
    "head_coach",
    "owner_username",
    "owner_name",
    "player_id",
    "player_name",
    "first_name",
    "last_name",
    "position",
    "espn_id",
    "nfl_team",
    "nfl_team_code",
    "acquisition_type",
    "acquisition_date",
    "is_keeper",
];

const FREE_AGENT_HEADER: [&str; 19] = [
    "player_id",
    "player_name",
    "first_name",
    "last_name",
    "position",
    "espn_id",
    "nfl_team",
    "nfl_team_code",
    "conference",
    "division",
    "is_active",
    "is_injured",
    "player_status",
    "jersey_number",
    "height",
    "weight",
    "age",
    "experience",
    "college",
];

/// Files written by `export-players`
#[derive(Debug, Clone)]
pub struct PlayerExport {
    pub players_path: PathBuf,
    pub players: usize,
    pub teams_path: PathBuf,
    pub teams: usize,
}

/// Export every NFL player and the fantasy team reference list.
pub fn handle_export_players(db: &LeagueDatabase, output_dir: &Path) -> Result<PlayerExport> {
    let players = db.player_export_rows()?;
    let players_path = output_dir.join(PLAYERS_FILE);
    let player_count = write_rows(&players_path, &PLAYER_HEADER, &players)?;
    println!("✓ Exported {} players to: {}", player_count, players_path.display());

    let counts = db.player_position_counts()?;
    print_counts("Player summary by position:", &counts, "players");
    println!(
        "\n  Total: {} players",
        counts.iter().map(|c| c.count).sum::<u32>()
    );

    let teams = db.fantasy_team_refs()?;
    let teams_path = output_dir.join(TEAMS_FILE);
    let team_count = write_rows(&teams_path, &TEAM_HEADER, &teams)?;
    println!(
        "✓ Exported {} fantasy teams to: {}",
        team_count,
        teams_path.display()
    );

    Ok(PlayerExport {
        players_path,
        players: player_count,
        teams_path,
        teams: team_count,
    })
}

/// Files written by `export-rosters`
#[derive(Debug, Clone)]
pub struct RosterExport {
    pub rosters_path: PathBuf,
    pub rostered: usize,
    pub free_agents_path: PathBuf,
    pub free_agents: usize,
}

/// Export every rostered player, then every player on no roster.
pub fn handle_export_rosters(db: &LeagueDatabase, output_dir: &Path) -> Result<RosterExport> {
    let rosters = db.roster_export_rows()?;
    let rosters_path = timestamped_path(output_dir, "rosters", "csv");
    println!(
        "Writing {} records to {}...",
        rosters.len(),
        rosters_path.display()
    );
    let rostered = write_rows(&rosters_path, &ROSTER_HEADER, &rosters)?;
    println!("✓ Rosters file saved as: {}", rosters_path.display());
    print_counts("Roster summary by team:", &db.roster_counts_by_team()?, "players");

    let free_agents = db.free_agent_rows()?;
    let free_agents_path = timestamped_path(output_dir, "free_agents", "csv");
    println!(
        "\nWriting {} free agents to {}...",
        free_agents.len(),
        free_agents_path.display()
    );
    let free_agent_count = write_rows(&free_agents_path, &FREE_AGENT_HEADER, &free_agents)?;
    println!("✓ Free agents file saved as: {}", free_agents_path.display());

    let mut by_position: std::collections::BTreeMap<&str, u32> = Default::default();
    for row in &free_agents {
        *by_position.entry(row.position.as_str()).or_default() += 1;
    }
    println!("\nFree agents summary by position:");
    for (position, count) in by_position {
        println!("  {}: {} players", position, count);
    }

    Ok(RosterExport {
        rosters_path,
        rostered,
        free_agents_path,
        free_agents: free_agent_count,
    })
}
