//! Rebuild `lineup_positions` from lineup CSVs

use std::{
    collections::{BTreeMap, HashMap},
    path::PathBuf,
};

use crate::{
    cli::types::{EspnId, NflTeamId, PlayerId, Season, TeamId, Week},
    core::csv_io::read_records,
    lineups::{classify, extract_nfl_team_code, LineupCsvRow, RowClass, SlotCounter},
    storage::{LeagueDatabase, NewLineupPosition, PlayerRef},
    Result,
};

/// Parameters for `import-lineup-positions`.
#[derive(Debug, Clone)]
pub struct LineupPositionsParams {
    pub inputs: Vec<PathBuf>,
    pub season: Season,
    /// Lineup printed after the import
    pub verify_team: TeamId,
    pub verify_week: Week,
}

/// A lineup submission key: team, week, lower-cased game type.
pub type SubmissionKey = (TeamId, Week, String);

/// Positions grouped per submission, plus skip tallies.
#[derive(Debug, Default)]
pub struct PositionPlan {
    pub submissions: BTreeMap<SubmissionKey, Vec<NewLineupPosition>>,
    pub skipped: BTreeMap<String, u32>,
    /// Players kept without an NFL team (no code or unknown code)
    pub without_team: Vec<PlayerId>,
}

impl PositionPlan {
    pub fn position_count(&self) -> usize {
        self.submissions.values().map(Vec::len).sum()
    }
}

/// Group rows into submissions. A hand-entered `player_id` wins over the
/// ESPN ID; head coach rows, unknown labels and unresolvable players are
/// tallied under a reason.
pub fn plan_lineup_positions(
    rows: &[LineupCsvRow],
    mapping: &HashMap<EspnId, PlayerRef>,
    teams_by_code: &HashMap<String, NflTeamId>,
) -> PositionPlan {
    let mut plan = PositionPlan::default();
    let mut counter = SlotCounter::new();

    for row in rows {
        let mut row = row.clone();
        row.game_type = row.game_type.trim().to_lowercase();

        let Some((position_type, sort_order)) = counter.assign(&row) else {
            *plan.skipped.entry(row.position.clone()).or_default() += 1;
            continue;
        };

        let player_id = match row.direct_player_id() {
            Some(id) => id,
            None => match classify(&row, mapping) {
                RowClass::Resolved { player, .. } => player.player_id,
                RowClass::NoEspnId => {
                    *plan
                        .skipped
                        .entry(format!("{} (no player_id or ESPN ID)", row.position))
                        .or_default() += 1;
                    continue;
                }
                RowClass::Unknown { espn_id } => {
                    *plan
                        .skipped
                        .entry(format!("Unknown ESPN ID {}", espn_id))
                        .or_default() += 1;
                    continue;
                }
            },
        };

        let nfl_team_id = extract_nfl_team_code(&row.player)
            .and_then(|code| teams_by_code.get(code))
            .copied();
        if nfl_team_id.is_none() {
            plan.without_team.push(player_id);
        }

        plan.submissions
            .entry((row.team(), row.week(), row.game_type.clone()))
            .or_default()
            .push(NewLineupPosition {
                position_type,
                player_id,
                nfl_team_id,
                sort_order,
            });
    }

    plan
}

/// Outcome of `import-lineup-positions`.
#[derive(Debug, Clone, PartialEq)]
pub struct LineupPositionsReport {
    pub lineups: usize,
    pub inserted: usize,
    pub skipped: u32,
}

/// Replace the positions of every lineup found in the CSVs.
pub fn handle_import_lineup_positions(
    db: &mut LeagueDatabase,
    params: LineupPositionsParams,
) -> Result<LineupPositionsReport> {
    println!("Season: {}", params.season);

    let mapping = db.espn_player_mapping()?;
    println!("✓ Loaded {} ESPN ID mappings", mapping.len());
    let teams_by_code = db.nfl_team_ids_by_code()?;
    println!("✓ Loaded {} NFL teams", teams_by_code.len());

    let mut rows: Vec<LineupCsvRow> = Vec::new();
    for input in &params.inputs {
        rows.extend(read_records::<LineupCsvRow>(input)?);
    }
    println!("✓ Parsed {} entries from CSV", rows.len());

    let mut plan = plan_lineup_positions(&rows, &mapping, &teams_by_code);
    println!("Grouped into {} lineup submissions", plan.submissions.len());
    if !plan.skipped.is_empty() {
        println!("⚠ Skipped entries:");
        for (reason, count) in &plan.skipped {
            println!("  {}: {}", reason, count);
        }
    }

    // Rows without a usable team code fall back to the player's current team
    if !plan.without_team.is_empty() {
        println!(
            "  {} positions had no known team code, using current NFL team",
            plan.without_team.len()
        );
    }
    for positions in plan.submissions.values_mut() {
        for position in positions.iter_mut().filter(|p| p.nfl_team_id.is_none()) {
            position.nfl_team_id = db.player_nfl_team(position.player_id)?;
        }
    }

    let mut inserted = 0;
    let mut lineups = 0;
    for ((team_id, week, game_type), positions) in &plan.submissions {
        match db.replace_lineup_positions(*team_id, *week, game_type, params.season, positions) {
            Ok((_, count)) => {
                inserted += count;
                lineups += 1;
            }
            Err(e) => println!(
                "⚠ Error for Team {} Week {} {}: {}",
                team_id, week, game_type, e
            ),
        }
    }
    println!(
        "✓ Inserted {} lineup positions across {} lineups",
        inserted, lineups
    );

    println!(
        "\nTeam {} Week {} primary lineup:",
        params.verify_team, params.verify_week
    );
    for row in db.lineup_position_type_counts(
        params.verify_team,
        params.verify_week,
        "primary",
        params.season,
    )? {
        println!("  {}: {}", row.label, row.count);
    }

    Ok(LineupPositionsReport {
        lineups,
        inserted,
        skipped: plan.skipped.values().sum(),
    })
}
