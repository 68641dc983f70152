//! Replace every fantasy roster from a rosters CSV
//!
//! Expected columns: `team_name, team_name_id, player_name_id, position,
//! is_keeper, acquisition_type`.

use std::{
    collections::{BTreeMap, HashSet},
    path::PathBuf,
};

use serde::Deserialize;

use crate::{
    cli::types::{parse_keeper_flag, AcquisitionType, PlayerId, RosterPosition, TeamId},
    core::csv_io::{read_numbered, Numbered},
    error::LeagueError,
    storage::{LeagueDatabase, RosterEntry},
    Result,
};

use super::{print_counts, print_limited};

/// A rosters CSV row before validation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRosterRow {
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub team_name_id: String,
    #[serde(default)]
    pub player_name_id: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub is_keeper: String,
    #[serde(default)]
    pub acquisition_type: String,
}

/// Parameters for `import-rosters`.
#[derive(Debug, Clone)]
pub struct ImportRostersParams {
    pub input: PathBuf,
    /// Apply the import; without it only the summary is printed
    pub yes: bool,
    pub dry_run: bool,
    pub max_team_id: u32,
    pub roster_size: u32,
}

/// Outcome of `import-rosters`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterImportReport {
    pub entries: usize,
    pub applied: bool,
    pub deleted: usize,
    pub inserted: usize,
    pub verified: bool,
}

/// Validate one row. Errors read `Row N: ...`.
pub fn validate_roster_row(
    numbered: &Numbered<RawRosterRow>,
    max_team_id: u32,
) -> std::result::Result<RosterEntry, String> {
    let row = numbered.row;
    let raw = &numbered.record;

    let is_keeper = parse_keeper_flag(&raw.is_keeper)
        .ok_or_else(|| format!("Row {}: Invalid is_keeper value: {}", row, raw.is_keeper))?;
    let team_id: u32 = raw
        .team_name_id
        .trim()
        .parse()
        .map_err(|e| format!("Row {}: Data parsing error - team_name_id: {}", row, e))?;
    let player_id: i64 = raw
        .player_name_id
        .trim()
        .parse()
        .map_err(|e| format!("Row {}: Data parsing error - player_name_id: {}", row, e))?;

    if !(1..=max_team_id).contains(&team_id) {
        return Err(format!("Row {}: Invalid team_name_id {}", row, team_id));
    }
    if player_id <= 0 {
        return Err(format!("Row {}: Invalid player_name_id {}", row, player_id));
    }
    let position: RosterPosition = raw
        .position
        .parse()
        .map_err(|_| format!("Row {}: Invalid position '{}'", row, raw.position.trim()))?;
    let acquisition_type: AcquisitionType = raw.acquisition_type.parse().map_err(|_| {
        format!(
            "Row {}: Invalid acquisition_type '{}'",
            row,
            raw.acquisition_type.trim()
        )
    })?;

    Ok(RosterEntry {
        row,
        team_name: raw.team_name.trim().to_string(),
        team_id: TeamId::new(team_id),
        player_id: PlayerId::new(player_id as u64),
        position,
        is_keeper,
        acquisition_type,
    })
}

/// Validate every row, collecting all errors.
pub fn validate_roster_rows(
    rows: &[Numbered<RawRosterRow>],
    max_team_id: u32,
) -> (Vec<RosterEntry>, Vec<String>) {
    let mut entries = Vec::new();
    let mut errors = Vec::new();
    for numbered in rows {
        match validate_roster_row(numbered, max_team_id) {
            Ok(entry) => entries.push(entry),
            Err(error) => errors.push(error),
        }
    }
    (entries, errors)
}

/// Players assigned more than once, with their counts, by player id.
pub fn duplicate_players(entries: &[RosterEntry]) -> Vec<(PlayerId, usize)> {
    let mut counts: BTreeMap<PlayerId, usize> = BTreeMap::new();
    for entry in entries {
        *counts.entry(entry.player_id).or_default() += 1;
    }
    counts.into_iter().filter(|(_, count)| *count > 1).collect()
}

/// Load, validate and (with `yes`) apply a rosters CSV.
pub fn handle_import_rosters(
    db: &mut LeagueDatabase,
    params: ImportRostersParams,
) -> Result<RosterImportReport> {
    println!("Loading rosters from {}...", params.input.display());
    let rows: Vec<Numbered<RawRosterRow>> = read_numbered(&params.input)?;
    let (entries, errors) = validate_roster_rows(&rows, params.max_team_id);
    println!("✓ Loaded {} roster entries", entries.len());

    if !errors.is_empty() {
        println!("⚠ Found {} validation errors", errors.len());
        print_limited(&errors, 10);
        return Err(LeagueError::Validation {
            count: errors.len(),
        });
    }

    println!("\nValidating database references...");
    let reference_errors = check_references(db, &entries)?;
    if reference_errors > 0 {
        return Err(LeagueError::Validation {
            count: reference_errors,
        });
    }
    println!("✓ All database references are valid");

    print_summary(&entries, params.roster_size);

    let mut report = RosterImportReport {
        entries: entries.len(),
        ..Default::default()
    };

    if params.dry_run {
        println!("\nDRY RUN - Would import {} roster entries", entries.len());
        return Ok(report);
    }
    if !params.yes {
        println!("\n⚠ Re-run with --yes to delete all existing player assignments and import");
        return Ok(report);
    }

    println!("\nImporting {} roster entries...", entries.len());
    let (deleted, inserted) = db.replace_fantasy_rosters(&entries)?;
    println!("✓ Deleted {} existing player assignments", deleted);
    println!("✓ Successfully imported {} roster entries", inserted);

    report.applied = true;
    report.deleted = deleted;
    report.inserted = inserted;
    report.verified = verify_import(db, params.roster_size)?;
    Ok(report)
}

/// Print every missing team, missing player and duplicate; returns how many
/// problems were found.
fn check_references(db: &LeagueDatabase, entries: &[RosterEntry]) -> Result<usize> {
    let mut problems = 0;

    let team_ids: HashSet<TeamId> = entries.iter().map(|e| e.team_id).collect();
    let found = db.existing_team_ids(&team_ids)?;
    let mut missing_teams: Vec<TeamId> = team_ids.difference(&found).copied().collect();
    if !missing_teams.is_empty() {
        missing_teams.sort();
        println!("✗ Missing fantasy team IDs: {:?}", missing_teams);
        problems += missing_teams.len();
    }

    let player_ids: HashSet<PlayerId> = entries.iter().map(|e| e.player_id).collect();
    let found = db.existing_player_ids(&player_ids)?;
    let mut missing_players: Vec<PlayerId> = player_ids.difference(&found).copied().collect();
    if !missing_players.is_empty() {
        missing_players.sort();
        println!("✗ Missing player IDs: {:?}", missing_players);
        problems += missing_players.len();
    }

    let duplicates = duplicate_players(entries);
    if !duplicates.is_empty() {
        println!("✗ Duplicate player assignments found:");
        let lines: Vec<String> = duplicates
            .iter()
            .map(|(player_id, count)| format!("Player ID {}: assigned {} times", player_id, count))
            .collect();
        print_limited(&lines, 5);
        problems += duplicates.len();
    }

    Ok(problems)
}

fn print_summary(entries: &[RosterEntry], roster_size: u32) {
    let mut by_team: BTreeMap<&str, u32> = BTreeMap::new();
    let mut by_position: BTreeMap<RosterPosition, u32> = BTreeMap::new();
    let mut by_acquisition: BTreeMap<AcquisitionType, u32> = BTreeMap::new();
    for entry in entries {
        *by_team.entry(entry.team_name.as_str()).or_default() += 1;
        *by_position.entry(entry.position).or_default() += 1;
        *by_acquisition.entry(entry.acquisition_type).or_default() += 1;
    }
    let teams: HashSet<TeamId> = entries.iter().map(|e| e.team_id).collect();
    let players: HashSet<PlayerId> = entries.iter().map(|e| e.player_id).collect();
    let keepers = entries.iter().filter(|e| e.is_keeper).count();

    println!("\n{}", "=".repeat(60));
    println!("ROSTER IMPORT SUMMARY");
    println!("{}", "=".repeat(60));
    println!("Total entries to import: {}", entries.len());
    println!("Fantasy teams: {}", teams.len());
    println!("Unique players: {}", players.len());

    println!("\nPlayers per team:");
    for (team_name, count) in &by_team {
        let status = if *count == roster_size { "✓" } else { "⚠" };
        println!("  {} {}: {} players", status, team_name, count);
    }

    println!("\nPosition distribution:");
    for (position, count) in &by_position {
        println!("  {}: {} players", position, count);
    }

    println!("\nKeepers: {}", keepers);
    println!("Non-keepers: {}", entries.len() - keepers);

    println!("\nAcquisition types:");
    for (acquisition, count) in &by_acquisition {
        println!("  {}: {}", acquisition, count);
    }
}

/// Every team should hold exactly `roster_size` players.
fn verify_import(db: &LeagueDatabase, roster_size: u32) -> Result<bool> {
    println!("\nVerifying import...");
    let total = db.roster_total()?;
    let by_team = db.roster_counts_by_team()?;
    println!("✓ Total players in database: {}", total);

    println!("\nPlayers per team (should all be {}):", roster_size);
    let mut all_correct = true;
    for row in &by_team {
        let ok = row.count == roster_size;
        all_correct &= ok;
        println!(
            "  {} {}: {} players",
            if ok { "✓" } else { "✗" },
            row.label,
            row.count
        );
    }
    print_counts("Players by position:", &db.roster_counts_by_position()?, "");

    let passed = all_correct && total == roster_size * by_team.len() as u32;
    if passed {
        println!("\n✓ Import verification PASSED");
    } else {
        println!("\n⚠ Import verification found issues");
    }
    Ok(passed)
}
