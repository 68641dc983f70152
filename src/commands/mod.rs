//! Command implementations for the league maintenance CLI
//!
//! Each handler opens the database it needs, does one job and prints a
//! short summary. Handlers return a small report so callers (and tests)
//! can inspect what happened without parsing stdout.

pub mod espn_players;
pub mod export_lineups;
pub mod exports;
pub mod historical_lineups;
pub mod import_keepers;
pub mod import_rosters;
pub mod keepers;
pub mod lineup_positions;
pub mod player_stats;
pub mod restore_lineups;


use std::path::PathBuf;

use crate::{
    core::{resolve_db_path, resolve_output_dir},
    storage::{CountRow, LeagueDatabase},
    Result,
};

/// Resolve the database path and open it.
pub fn open_database(db: Option<PathBuf>) -> Result<LeagueDatabase> {
    let path = resolve_db_path(db)?;
    println!("Connecting to database at {}...", path.display());
    Ok(LeagueDatabase::open(&path)?)
}

/// Resolve the output directory and make sure it exists.
pub fn prepare_output_dir(output_dir: Option<PathBuf>) -> Result<PathBuf> {
    let dir = resolve_output_dir(output_dir);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Print an indented `label: count` block under a heading.
pub(crate) fn print_counts(heading: &str, rows: &[CountRow], unit: &str) {
    println!("\n{}", heading);
    for row in rows {
        println!("  {}: {} {}", row.label, row.count, unit);
    }
}

/// Print at most `limit` lines, then how many were left out.
pub(crate) fn print_limited<T: std::fmt::Display>(items: &[T], limit: usize) {
    for item in items.iter().take(limit) {
        println!("  {}", item);
    }
    if items.len() > limit {
        println!("  ... and {} more", items.len() - limit);
    }
}
