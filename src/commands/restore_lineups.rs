//! Restore lineup positions that lineup CSVs have but the database lost
//!
//! `restore-lineups` checks each CSV player against the database and
//! writes an INSERT per missing position. `generate-restoration-sql` does
//! the same analysis in SQL, for running where this tool cannot connect.

use std::path::{Path, PathBuf};

use crate::{
    cli::types::{EspnId, LineupId, PlayerId, PositionType, Season, TeamId, Week},
    core::{
        csv_io::{read_records, write_string},
        sql::{comment_text, quote, render_values, ValuesRow},
    },
    lineups::{LineupCsvRow, SlotCounter},
    storage::LeagueDatabase,
    Result,
};

pub const RESTORE_FILE: &str = "restore_missing_lineups.sql";
pub const RESTORATION_ANALYSIS_FILE: &str = "historical_lineup_restoration.sql";

/// Default `created_at` for restored positions.
pub const DEFAULT_CREATED_AT: &str = "2025-09-04 16:07:27";

/// Parameters for `restore-lineups`.
#[derive(Debug, Clone)]
pub struct RestoreLineupsParams {
    pub inputs: Vec<PathBuf>,
    pub season: Season,
    pub created_at: String,
    pub output_dir: PathBuf,
}

/// A CSV player absent from its lineup
#[derive(Debug, Clone, PartialEq)]
pub struct MissingPosition {
    pub lineup_id: LineupId,
    pub player_id: PlayerId,
    pub player_name: String,
    pub team_id: TeamId,
    pub team_name: String,
    pub week: Week,
    pub label: String,
    pub position_type: PositionType,
    pub sort_order: u32,
}

/// Outcome of `restore-lineups`.
#[derive(Debug, Clone)]
pub struct RestoreReport {
    pub checked: usize,
    pub missing: Vec<MissingPosition>,
    pub unknown_players: usize,
    pub missing_lineups: usize,
    pub path: Option<PathBuf>,
}

fn load_rows(inputs: &[PathBuf]) -> Result<Vec<LineupCsvRow>> {
    let mut rows = Vec::new();
    for input in inputs {
        let mut file_rows: Vec<LineupCsvRow> = read_records(input)?;
        println!("✓ Loaded {} entries from {}", file_rows.len(), input.display());
        for row in &mut file_rows {
            row.game_type = row.game_type.trim().to_lowercase();
        }
        rows.extend(file_rows);
    }
    Ok(rows)
}

/// One INSERT per missing position, each headed by a comment.
pub fn render_restore_sql(missing: &[MissingPosition], created_at: &str) -> String {
    let mut sql = format!(
        "-- Lineup position restoration\n-- Generated on {}\n-- Restores {} missing lineup_positions rows\n\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        missing.len()
    );
    for m in missing {
        sql.push_str(&format!(
            "-- Restore {} ({}) for {} Week {}\n",
            comment_text(&m.player_name),
            comment_text(&m.label),
            comment_text(&m.team_name),
            m.week
        ));
        sql.push_str(
            "INSERT INTO lineup_positions (lineup_id, position_type, player_id, sort_order, created_at)\nVALUES\n",
        );
        sql.push_str(&render_values(&[ValuesRow::new(vec![
            m.lineup_id.to_string(),
            quote(m.position_type.as_str()),
            m.player_id.to_string(),
            m.sort_order.to_string(),
            quote(created_at),
        ])]));
        sql.push('\n');
    }
    sql
}

/// Find CSV players missing from their lineup and write the INSERTs.
pub fn handle_restore_lineups(
    db: &LeagueDatabase,
    params: RestoreLineupsParams,
) -> Result<RestoreReport> {
    let mapping = db.espn_player_mapping()?;
    let rows = load_rows(&params.inputs)?;

    let mut counter = SlotCounter::new();
    let mut report = RestoreReport {
        checked: 0,
        missing: Vec::new(),
        unknown_players: 0,
        missing_lineups: 0,
        path: None,
    };

    for row in &rows {
        // Slots are counted over every row, including those skipped below
        let Some((position_type, sort_order)) = counter.assign(row) else {
            continue;
        };
        let Some(raw) = row.espn_id_text() else {
            continue;
        };
        report.checked += 1;

        let Some(player) = raw.parse::<EspnId>().ok().and_then(|id| mapping.get(&id)) else {
            println!("⚠ Player not found in DB: {} (ESPN: {})", row.player, raw);
            report.unknown_players += 1;
            continue;
        };

        let Some(lineup_id) =
            db.find_lineup_id(row.team(), row.week(), &row.game_type, params.season)?
        else {
            println!(
                "⚠ No lineup submission found for team {} week {} ({})",
                row.team_id, row.week, row.game_type
            );
            report.missing_lineups += 1;
            continue;
        };

        if db.lineup_has_player(lineup_id, player.player_id)? {
            continue;
        }

        println!(
            "  MISSING: {} Week {} - {} ({})",
            row.team_name, row.week, player.display_name, row.position
        );
        report.missing.push(MissingPosition {
            lineup_id,
            player_id: player.player_id,
            player_name: player.display_name.clone(),
            team_id: row.team(),
            team_name: row.team_name.clone(),
            week: row.week(),
            label: row.position.clone(),
            position_type,
            sort_order,
        });
    }

    println!(
        "\nChecked {} players, {} missing",
        report.checked,
        report.missing.len()
    );
    if report.missing.is_empty() {
        println!("✓ No missing players found, all lineups are complete");
        return Ok(report);
    }

    let path = params.output_dir.join(RESTORE_FILE);
    write_string(&path, &render_restore_sql(&report.missing, &params.created_at))?;
    println!("✓ Restoration script written to {}", path.display());
    report.path = Some(path);
    Ok(report)
}

/// Build the offline restoration script: load every CSV row into a temp
/// table, select the players whose lineup exists but lacks them, clean up.
pub fn restoration_sql(rows: &[LineupCsvRow], season: Season, sources: &[String]) -> String {
    let mut counter = SlotCounter::new();
    let values: Vec<ValuesRow> = rows
        .iter()
        .filter(|r| r.position.trim() != "HeadCoach")
        .map(|row| {
            let (position_type, sort_order) = counter
                .assign(row)
                .map(|(p, n)| (p.as_str(), n))
                .unwrap_or(("other", 1));
            ValuesRow::new(vec![
                row.week.to_string(),
                quote(&row.game_type),
                row.team_id.to_string(),
                quote(&row.team_name),
                quote(&row.position),
                quote(&row.player),
                quote(row.espn_id_text().unwrap_or("")),
                quote(position_type),
                sort_order.to_string(),
            ])
        })
        .collect();

    let mut sql = format!(
        "-- Historical lineup restoration analysis\n-- Generated from: {}\n-- Total entries: {}\n\n",
        comment_text(&sources.join(", ")),
        values.len()
    );
    sql.push_str(
        "DROP TABLE IF EXISTS temp.temp_csv_lineups;
CREATE TEMP TABLE temp_csv_lineups (
    week_number INTEGER,
    game_type TEXT,
    team_id INTEGER,
    team_name TEXT,
    position_label TEXT,
    player_name TEXT,
    espn_id TEXT,
    position_type TEXT,
    sort_order INTEGER
);

",
    );
    if !values.is_empty() {
        sql.push_str("INSERT INTO temp_csv_lineups VALUES\n");
        sql.push_str(&render_values(&values));
        sql.push('\n');
    }

    sql.push_str(&format!(
        "-- Players in a lineup CSV whose lineup exists but lacks them
SELECT
    'MISSING_PLAYER' AS status,
    csv.week_number,
    csv.team_id,
    csv.team_name,
    csv.position_label,
    csv.player_name,
    csv.espn_id,
    p.player_id,
    ls.lineup_id,
    csv.position_type,
    csv.sort_order
FROM temp_csv_lineups csv
LEFT JOIN nfl_players p
    ON p.espn_id = CAST(NULLIF(csv.espn_id, '') AS INTEGER)
LEFT JOIN lineup_submissions ls
    ON ls.fantasy_team_id = csv.team_id
   AND ls.week_number = csv.week_number
   AND ls.game_type = csv.game_type
   AND ls.season_year = {}
LEFT JOIN lineup_positions lp
    ON lp.lineup_id = ls.lineup_id
   AND lp.player_id = p.player_id
WHERE p.player_id IS NOT NULL
  AND ls.lineup_id IS NOT NULL
  AND lp.position_id IS NULL
ORDER BY csv.team_id, csv.week_number, csv.sort_order;

DROP TABLE IF EXISTS temp.temp_csv_lineups;
",
        season
    ));
    sql
}

/// Write the offline restoration script for the given CSVs.
pub fn handle_generate_restoration_sql(
    inputs: &[PathBuf],
    season: Season,
    output_dir: &Path,
) -> Result<PathBuf> {
    let rows = load_rows(inputs)?;
    println!("Loaded {} total lineup entries", rows.len());

    let sources: Vec<String> = inputs
        .iter()
        .map(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.display().to_string())
        })
        .collect();

    let path = output_dir.join(RESTORATION_ANALYSIS_FILE);
    write_string(&path, &restoration_sql(&rows, season, &sources))?;
    println!("✓ Generated {}", path.display());
    println!("Run it against the database to list the missing players.");
    Ok(path)
}
