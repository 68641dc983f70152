//! Locked lineup submissions to CSV

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use crate::{
    cli::types::{format_slot_label, PositionType, Season, Week},
    core::csv_io::{timestamped_path, write_rows},
    lineups::{LineupCsvRow, LINEUP_CSV_HEADER},
    storage::{LeagueDatabase, LineupPositionDetail, LockedLineup},
    Result,
};

/// Parameters for `export-lineups`.
#[derive(Debug, Clone)]
pub struct ExportLineupsParams {
    pub season: Season,
    /// Out-of-range weeks export every week
    pub week: Option<Week>,
    pub output_dir: PathBuf,
}

/// What `export-lineups` wrote.
#[derive(Debug, Clone, Default)]
pub struct LineupExport {
    pub path: Option<PathBuf>,
    pub lineups: usize,
    pub rows: usize,
    pub weeks: BTreeSet<u16>,
    pub primary: usize,
    pub bonus: usize,
    pub teams: usize,
}

/// Export every locked lineup for a season (or one week of it).
pub fn handle_export_lineups(
    db: &LeagueDatabase,
    params: ExportLineupsParams,
) -> Result<LineupExport> {
    let week = match params.week {
        Some(week) if !week.is_lineup_week() => {
            println!("⚠ Invalid week number {}. Using all weeks.", week);
            None
        }
        other => other,
    };

    match week {
        Some(week) => println!(
            "Exporting lineups for Season {}, Week {}",
            params.season, week
        ),
        None => println!("Exporting lineups for Season {}, All Weeks", params.season),
    }

    let lineups = db.locked_lineups(params.season, week)?;
    if lineups.is_empty() {
        println!("⚠ No locked lineups found");
        return Ok(LineupExport::default());
    }
    println!("Found {} locked lineups", lineups.len());

    let mut rows = Vec::new();
    for lineup in &lineups {
        let positions = db.lineup_position_details(lineup.lineup_id)?;
        rows.extend(lineup_rows(lineup, &positions));
    }

    let prefix = match week {
        Some(week) => format!("lineup_submissions_week{}", week),
        None => "lineup_submissions_all".to_string(),
    };
    let path = timestamped_path(&params.output_dir, &prefix, "csv");
    let written = write_rows(&path, &LINEUP_CSV_HEADER, &rows)?;
    println!("✓ Exported {} rows to: {}", written, path.display());

    let summary = summarize(&lineups, path, written);
    println!("\nExport summary:");
    println!(
        "  Weeks included: {:?}",
        summary.weeks.iter().collect::<Vec<_>>()
    );
    println!("  Primary game lineups: {}", summary.primary);
    println!("  Bonus game lineups: {}", summary.bonus);
    println!("  Teams with lineups: {}", summary.teams);

    Ok(summary)
}

fn summarize(lineups: &[LockedLineup], path: PathBuf, rows: usize) -> LineupExport {
    let teams: BTreeSet<_> = lineups.iter().map(|l| l.fantasy_team_id).collect();
    LineupExport {
        path: Some(path),
        lineups: lineups.len(),
        rows,
        weeks: lineups.iter().map(|l| l.week_number.as_u16()).collect(),
        primary: lineups.iter().filter(|l| l.game_type == "primary").count(),
        bonus: lineups.iter().filter(|l| l.game_type == "bonus").count(),
        teams: teams.len(),
    }
}

/// The head coach row (when there is a coach) followed by one row per
/// position, in the order the positions were given.
pub fn lineup_rows(lineup: &LockedLineup, positions: &[LineupPositionDetail]) -> Vec<LineupCsvRow> {
    let base = |position: String, player: String, espn_id: String| LineupCsvRow {
        week: lineup.week_number.as_u16(),
        game_type: lineup.game_type.clone(),
        team_id: lineup.fantasy_team_id.as_u32(),
        team_name: lineup.team_name.clone(),
        owner_name: Some(lineup.owner_name.clone()),
        username: Some(lineup.username.clone()),
        position,
        player,
        espn_id: Some(espn_id),
        player_id: None,
    };

    let mut rows = Vec::with_capacity(positions.len() + 1);
    if let Some(coach) = lineup.head_coach() {
        rows.push(base(
            "HeadCoach".to_string(),
            coach.to_string(),
            String::new(),
        ));
    }

    for position in positions {
        let code = position.team_code.as_deref().unwrap_or_default();
        let (player, espn_id) = if position.position_type == "defense" {
            (
                format!(
                    "{} ({})",
                    position.team_name.as_deref().unwrap_or_default(),
                    code
                ),
                String::new(),
            )
        } else {
            (
                format!(
                    "{} ({})",
                    position.player_name.as_deref().unwrap_or_default(),
                    code
                ),
                position
                    .espn_id
                    .map(|id| id.to_string())
                    .unwrap_or_default(),
            )
        };
        rows.push(base(
            position_label(&position.position_type, position.sort_order),
            player,
            espn_id,
        ));
    }

    rows
}

/// `QB1`, `DEF2`; unrecognised types are upper-cased.
fn position_label(position_type: &str, sort_order: u32) -> String {
    match position_type.parse::<PositionType>() {
        Ok(parsed) => format_slot_label(parsed, sort_order),
        Err(_) => format!("{}{}", position_type.to_uppercase(), sort_order),
    }
}
