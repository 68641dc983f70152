//! Archive lineup CSVs into `historical_lineups`

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    path::PathBuf,
};

use crate::{
    cli::types::{EspnId, PlayerId, Season, TeamId},
    core::csv_io::read_records,
    keepers::UnknownPlayer,
    lineups::{classify, LineupCsvRow, RowClass},
    storage::{HistoricalLineupEntry, LeagueDatabase, PlayerRef, RosterContext},
    Result,
};

use super::print_limited;

/// Parameters for `import-historical-lineups`.
#[derive(Debug, Clone)]
pub struct HistoricalLineupsParams {
    pub input: PathBuf,
    pub season: Season,
}

/// Rows ready to insert plus what was left out.
#[derive(Debug, Default)]
pub struct HistoricalPlan {
    pub entries: Vec<HistoricalLineupEntry>,
    pub unknown: Vec<(UnknownPlayer, u16)>,
    /// Rows without an ESPN ID, per position label
    pub skipped_positions: BTreeMap<String, u32>,
    pub weeks: BTreeSet<u16>,
    pub teams: BTreeSet<TeamId>,
}

/// Outcome of `import-historical-lineups`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalImportReport {
    pub planned: usize,
    pub inserted: usize,
    pub failed: usize,
    pub unknown: usize,
    pub total: u32,
}

/// Resolve every row and attach acquisition context. Players missing from
/// the season's active roster history get `Unknown` and no keeper flag.
pub fn plan_historical_lineups(
    rows: &[LineupCsvRow],
    mapping: &HashMap<EspnId, PlayerRef>,
    context: &HashMap<(TeamId, PlayerId), RosterContext>,
    season: Season,
) -> HistoricalPlan {
    let mut plan = HistoricalPlan::default();

    for row in rows {
        plan.weeks.insert(row.week);
        plan.teams.insert(row.team());

        match classify(row, mapping) {
            RowClass::NoEspnId => {
                *plan.skipped_positions.entry(row.position.clone()).or_default() += 1;
            }
            RowClass::Unknown { espn_id } => plan.unknown.push((
                UnknownPlayer {
                    espn_id,
                    player: row.player.clone(),
                    team_id: row.team(),
                },
                row.week,
            )),
            RowClass::Resolved { espn_id, player } => {
                let (acquisition_type, was_keeper) = context
                    .get(&(row.team(), player.player_id))
                    .map(|c| (c.acquisition_type.clone(), c.was_keeper))
                    .unwrap_or_else(|| ("Unknown".to_string(), false));

                plan.entries.push(HistoricalLineupEntry {
                    season,
                    week: row.week(),
                    game_type: row.game_type.clone(),
                    team_id: row.team(),
                    team_name_at_time: row.team_name.clone(),
                    owner_name_at_time: row.owner_name.clone(),
                    player_id: player.player_id,
                    espn_id,
                    player_name_at_time: row.player.clone(),
                    position: player.position.clone(),
                    lineup_position: row.position.clone(),
                    acquisition_type,
                    was_keeper,
                });
            }
        }
    }

    plan
}

/// Parse, resolve and insert a lineup CSV into `historical_lineups`.
pub fn handle_import_historical_lineups(
    db: &mut LeagueDatabase,
    params: HistoricalLineupsParams,
) -> Result<HistoricalImportReport> {
    let mapping = db.espn_player_mapping()?;
    println!("✓ Loaded {} ESPN ID mappings", mapping.len());
    let context = db.roster_context(params.season)?;
    println!(
        "✓ Loaded roster context for {} team-player combinations",
        context.len()
    );

    let rows: Vec<LineupCsvRow> = read_records(&params.input)?;
    let plan = plan_historical_lineups(&rows, &mapping, &context, params.season);

    println!("✓ Parsed lineups CSV");
    println!("  Total entries: {}", plan.entries.len());
    println!("  Weeks: {:?}", plan.weeks.iter().collect::<Vec<_>>());
    println!("  Teams: {}", plan.teams.len());
    if !plan.skipped_positions.is_empty() {
        println!("  Skipped positions (no ESPN ID):");
        for (position, count) in &plan.skipped_positions {
            println!("    {}: {} entries", position, count);
        }
    }
    if !plan.unknown.is_empty() {
        println!(
            "⚠ {} players not found in database",
            plan.unknown.len()
        );
        let lines: Vec<String> = plan
            .unknown
            .iter()
            .map(|(p, week)| {
                format!(
                    "ESPN ID {}: {} (Week {}, Team {})",
                    p.espn_id, p.player, week, p.team_id
                )
            })
            .collect();
        print_limited(&lines, 5);
    }

    let outcome = db.insert_historical_lineups(&plan.entries)?;
    println!("✓ Inserted {} lineup entries", outcome.inserted);
    if !outcome.failed.is_empty() {
        println!("⚠ Skipped {} entries due to errors", outcome.failed.len());
        let lines: Vec<String> = outcome
            .failed
            .iter()
            .map(|(player, error)| format!("{}: {}", player, error))
            .collect();
        print_limited(&lines, 5);
    }

    let total = db.historical_lineup_total(params.season)?;
    println!("\nTotal lineup entries: {}", total);
    println!("\nEntries by week:");
    for row in db.historical_lineups_by_week(params.season)? {
        println!("  {}: {}", row.label, row.count);
    }
    println!("\nEntries by team:");
    for (team, entries, keepers) in db.historical_lineups_by_team(params.season)? {
        println!("  {}: {} entries ({} keeper entries)", team, entries, keepers);
    }

    Ok(HistoricalImportReport {
        planned: plan.entries.len(),
        inserted: outcome.inserted,
        failed: outcome.failed.len(),
        unknown: plan.unknown.len(),
        total,
    })
}
