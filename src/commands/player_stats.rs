//! Import nflverse weekly stats into `player_stats`

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::{
    core::csv_io::read_filtered,
    stats::{build_stat_lines, PlayByPlayRow, ScheduleRow, WeeklyStatRow},
    storage::LeagueDatabase,
    Result,
};

pub const BATCH_SIZE: usize = 2000;
/// Print progress every this many batches
const PROGRESS_EVERY: usize = 5;

/// Parameters for `import-player-stats`.
#[derive(Debug, Clone)]
pub struct PlayerStatsParams {
    pub weekly: PathBuf,
    pub schedule: PathBuf,
    pub play_by_play: PathBuf,
    pub start_season: u16,
    pub end_season: u16,
}

/// Outcome of `import-player-stats`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsImportReport {
    pub processed: usize,
    pub written: usize,
    pub unscheduled: usize,
}

/// Rows with a `season` column
trait Seasonal {
    fn season(&self) -> u16;

    /// Whether processing uses this row at all
    fn needed(&self) -> bool {
        true
    }
}

impl Seasonal for WeeklyStatRow {
    fn season(&self) -> u16 {
        self.season
    }
}

impl Seasonal for ScheduleRow {
    fn season(&self) -> u16 {
        self.season
    }
}

impl Seasonal for PlayByPlayRow {
    fn season(&self) -> u16 {
        self.season
    }

    // Only fumble plays feed attribution
    fn needed(&self) -> bool {
        self.fumble == 1
    }
}

fn load_seasons<T>(label: &str, path: &Path, start: u16, end: u16) -> Result<Vec<T>>
where
    T: DeserializeOwned + Seasonal,
{
    println!("Loading {} from {}...", label, path.display());
    let (total, kept) = read_filtered(path, |row: &T| {
        (start..=end).contains(&row.season()) && row.needed()
    })?;
    println!("  ✓ {} rows ({} kept for {}-{})", total, kept.len(), start, end);
    Ok(kept)
}

pub fn handle_import_player_stats(
    db: &mut LeagueDatabase,
    params: PlayerStatsParams,
) -> Result<StatsImportReport> {
    let (start, end) = (params.start_season, params.end_season);

    let weekly: Vec<WeeklyStatRow> = load_seasons("weekly stats", &params.weekly, start, end)?;
    let schedule: Vec<ScheduleRow> = load_seasons("schedules", &params.schedule, start, end)?;
    let plays: Vec<PlayByPlayRow> =
        load_seasons("play-by-play", &params.play_by_play, start, end)?;

    println!("\nProcessing fumble attribution...");
    let (lines, report) = build_stat_lines(&weekly, &schedule, &plays);
    println!("  Fumble plays: {}", report.fumble_plays);
    println!(
        "  Player-weeks with attributed fumbles: {}",
        report.attributed_fumble_keys
    );
    if report.unscheduled > 0 {
        println!(
            "⚠ {} rows had no scheduled game and were dropped",
            report.unscheduled
        );
    }
    println!("  ✓ {} stat lines ready", lines.len());

    println!("\nInserting into player_stats...");
    let batches = lines.len().div_ceil(BATCH_SIZE);
    let mut written = 0;
    for (index, batch) in lines.chunks(BATCH_SIZE).enumerate() {
        written += db.upsert_player_stats(batch)?;
        let done = index + 1;
        if done % PROGRESS_EVERY == 0 || done == batches {
            println!("  Batch {}/{} ({} records)", done, batches, written);
        }
    }
    println!("✓ Wrote {} records", written);

    let summary = db.stats_summary()?;
    println!("\nSummary:");
    println!("  Total records: {}", summary.total);
    for (game_type, records, players) in &summary.by_game_type {
        println!("  {}: {} records, {} players", game_type, records, players);
    }
    if let (Some(min), Some(max)) = (summary.min_season, summary.max_season) {
        println!("  Seasons: {}-{}", min, max);
    }
    println!("  Unique players: {}", summary.unique_players);
    println!("  Fumbles lost: {}", summary.fumbles_lost);
    println!("  2PT conversions: {}", summary.two_point_conversions);

    Ok(StatsImportReport {
        processed: lines.len(),
        written,
        unscheduled: report.unscheduled,
    })
}
