//! Keeper reconciliation commands
//!
//! All three write a SQL script for review instead of touching
//! `historical_keepers` directly.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::{
    cli::types::{EspnId, PlayerId, Season, TeamId},
    core::csv_io::{read_records, write_rows, write_string},
    keepers::{
        flatten_by_team, missing_keepers, true_keepers, week_one_players, KeeperCandidate,
        KeeperScript, WeekOneLineups,
    },
    lineups::LineupCsvRow,
    storage::{KeeperPlayer, LeagueDatabase},
    Result,
};

use super::print_limited;

pub const REPLACE_KEEPERS_FILE: &str = "replace_all_keepers.sql";
pub const MISSING_KEEPERS_FILE: &str = "insert_missing_keepers.sql";
pub const RECONSTRUCTED_KEEPERS_FILE: &str = "insert_historical_keepers.sql";
pub const RECONSTRUCTION_REPORT_FILE: &str = "keeper_reconstruction_report.csv";

/// Default acquisition cutoff separating keepers from drafted players.
pub const DEFAULT_DRAFT_CUTOFF: &str = "2025-08-31 00:00:00";

/// Parameters shared by the keeper commands.
#[derive(Debug, Clone)]
pub struct KeeperParams {
    pub lineups: PathBuf,
    pub season: Season,
    pub designation_date: String,
    pub output_dir: PathBuf,
}

/// Read the lineup CSV and resolve its Week 1 primary rows.
fn load_week_one(
    db: &LeagueDatabase,
    lineups: &Path,
    exclusions: &HashSet<EspnId>,
) -> Result<WeekOneLineups> {
    let mapping = db.espn_player_mapping()?;
    let rows: Vec<LineupCsvRow> = read_records(lineups)?;
    let week_one = week_one_players(&rows, &mapping, exclusions);

    println!("  Week 1 players (after exclusions): {}", week_one.total());
    if week_one.excluded > 0 {
        println!("  Excluded players: {}", week_one.excluded);
    }
    if !week_one.unknown.is_empty() {
        println!(
            "⚠ {} players not found in database:",
            week_one.unknown.len()
        );
        let lines: Vec<String> = week_one
            .unknown
            .iter()
            .map(|p| format!("ESPN ID {}: {} (Team {})", p.espn_id, p.player, p.team_id))
            .collect();
        print_limited(&lines, 5);
    }
    Ok(week_one)
}

/// Replace the resolved ESPN ID with the one stored on the player.
fn refresh_espn_ids(db: &LeagueDatabase, keepers: &mut [KeeperCandidate]) -> Result<()> {
    for keeper in keepers.iter_mut() {
        keeper.espn_id = db.player_espn_id(keeper.player_id)?;
    }
    Ok(())
}

/// Outcome of `calculate-keepers`.
#[derive(Debug, Clone)]
pub struct CalculatedKeepers {
    pub by_team: BTreeMap<TeamId, usize>,
    pub total: usize,
    pub sql_path: PathBuf,
}

/// Keepers = Week 1 primary players - drafted players - exclusions.
pub fn handle_calculate_keepers(
    db: &LeagueDatabase,
    params: KeeperParams,
    exclusions: &HashSet<EspnId>,
) -> Result<CalculatedKeepers> {
    println!("Formula: Week 1 Primary Lineup - Drafted Players = Keepers");
    println!("\nLoading data...");
    let drafted = db.drafted_player_ids(params.season)?;
    println!("  Drafted players: {}", drafted.len());
    let week_one = load_week_one(db, &params.lineups, exclusions)?;

    let keepers = true_keepers(&week_one.by_team, &drafted);

    println!("\nKeeper counts by team:");
    let by_team: BTreeMap<TeamId, usize> = keepers.iter().map(|(t, k)| (*t, k.len())).collect();
    for (team_id, count) in &by_team {
        println!("  Team {}: {} keepers", team_id, count);
    }

    let mut all = flatten_by_team(&keepers);
    println!("\n  TOTAL KEEPERS: {}", all.len());
    refresh_espn_ids(db, &mut all)?;

    let script = KeeperScript {
        title: "Original keepers (Week 1 - Drafted)",
        season: params.season,
        designation_date: &params.designation_date,
        replace_existing: true,
    };
    let sql_path = params.output_dir.join(REPLACE_KEEPERS_FILE);
    write_string(&sql_path, &script.render(&all))?;
    println!("\n✓ SQL generated: {}", sql_path.display());
    println!("Review the SQL file, then execute it to replace all keepers.");

    Ok(CalculatedKeepers {
        by_team,
        total: all.len(),
        sql_path,
    })
}

/// Outcome of `find-missing-keepers`.
#[derive(Debug, Clone)]
pub struct MissingKeepers {
    pub missing: Vec<KeeperCandidate>,
    pub sql_path: Option<PathBuf>,
}

/// Compare current keepers (acquired before the draft) with the expected
/// count per team and propose Week 1 players to fill the gap.
pub fn handle_find_missing_keepers(
    db: &LeagueDatabase,
    params: KeeperParams,
    draft_cutoff: &str,
    expected: &BTreeMap<TeamId, u32>,
) -> Result<MissingKeepers> {
    println!("Loading data...");
    let current_players = db.players_acquired_before(draft_cutoff)?;
    let mut current: HashMap<TeamId, HashSet<PlayerId>> = HashMap::new();
    for player in &current_players {
        current
            .entry(player.team_id)
            .or_default()
            .insert(player.player_id);
    }
    let drafted: HashSet<PlayerId> = db
        .drafted_roster_players()?
        .into_iter()
        .map(|p| p.player_id)
        .collect();

    println!("  Current keepers in DB: {}", current_players.len());
    println!("  Drafted players: {}", drafted.len());
    let week_one = load_week_one(db, &params.lineups, &HashSet::new())?;

    println!("\nMissing keepers analysis:");
    let shortfalls = missing_keepers(&week_one.by_team, &current, &drafted, expected);
    for shortfall in &shortfalls {
        println!(
            "\nTeam {}: Missing {} keeper(s)",
            shortfall.team_id,
            shortfall.expected - shortfall.current
        );
        println!(
            "  Current: {}, Expected: {}",
            shortfall.current, shortfall.expected
        );
        println!("  Candidates from Week 1:");
        for candidate in &shortfall.candidates {
            println!(
                "    - {} ({}) [ID: {}]",
                candidate.display_name, candidate.position, candidate.player_id
            );
        }
    }

    let mut missing: Vec<KeeperCandidate> = shortfalls
        .into_iter()
        .flat_map(|s| s.candidates)
        .collect();

    if missing.is_empty() {
        println!("\n✓ No missing keepers found");
        return Ok(MissingKeepers {
            missing,
            sql_path: None,
        });
    }

    refresh_espn_ids(db, &mut missing)?;
    let script = KeeperScript {
        title: "Insert missing keepers",
        season: params.season,
        designation_date: &params.designation_date,
        replace_existing: false,
    };
    let sql_path = params.output_dir.join(MISSING_KEEPERS_FILE);
    write_string(&sql_path, &script.render(&missing))?;
    println!(
        "\n✓ SQL file generated for {} missing keepers: {}",
        missing.len(),
        sql_path.display()
    );

    Ok(MissingKeepers {
        missing,
        sql_path: Some(sql_path),
    })
}

/// One row of the reconstruction report
#[derive(Debug, Clone, Serialize)]
struct KeeperReportRow<'a> {
    team_id: TeamId,
    player_id: PlayerId,
    espn_id: Option<EspnId>,
    display_name: &'a str,
    position: &'a str,
    is_keeper: &'static str,
    acquisition_type: &'a str,
    acquisition_date: &'a str,
}

impl<'a> From<&'a KeeperPlayer> for KeeperReportRow<'a> {
    fn from(player: &'a KeeperPlayer) -> Self {
        Self {
            team_id: player.team_id,
            player_id: player.player_id,
            espn_id: player.espn_id,
            display_name: &player.display_name,
            position: &player.position,
            is_keeper: if player.is_keeper { "Yes" } else { "No" },
            acquisition_type: &player.acquisition_type,
            acquisition_date: &player.acquisition_date,
        }
    }
}

const REPORT_HEADER: [&str; 8] = [
    "Team ID",
    "Player ID",
    "ESPN ID",
    "Player Name",
    "Position",
    "Is Keeper",
    "Acquisition Type",
    "Acquisition Date",
];

/// Outcome of `reconstruct-keepers`.
#[derive(Debug, Clone)]
pub struct ReconstructedKeepers {
    pub total: usize,
    pub sql_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
}

/// Rebuild the keeper list from rosters flagged as keepers.
pub fn handle_reconstruct_keepers(
    db: &LeagueDatabase,
    season: Season,
    designation_date: &str,
    output_dir: &Path,
) -> Result<ReconstructedKeepers> {
    println!("Season: {}", season);
    println!("Keeper designation date: {}", designation_date);

    let players = db.keeper_players()?;
    if players.is_empty() {
        println!("✗ No keeper data found, nothing to reconstruct");
        return Ok(ReconstructedKeepers {
            total: 0,
            sql_path: None,
            report_path: None,
        });
    }

    let mut by_team: BTreeMap<TeamId, Vec<&KeeperPlayer>> = BTreeMap::new();
    for player in &players {
        by_team.entry(player.team_id).or_default().push(player);
    }
    println!("✓ Found {} current keepers in database", players.len());
    for (team_id, keepers) in &by_team {
        println!("  Team {}: {} keepers", team_id, keepers.len());
    }

    let ordered: Vec<&KeeperPlayer> = by_team.values().flatten().copied().collect();
    let candidates: Vec<KeeperCandidate> = ordered
        .iter()
        .map(|p| KeeperCandidate {
            team_id: p.team_id,
            player_id: p.player_id,
            espn_id: p.espn_id,
            display_name: p.display_name.clone(),
            position: p.position.clone(),
        })
        .collect();

    let script = KeeperScript {
        title: "Historical keepers INSERT script",
        season,
        designation_date,
        replace_existing: false,
    };
    let sql_path = output_dir.join(RECONSTRUCTED_KEEPERS_FILE);
    write_string(&sql_path, &script.render(&candidates))?;
    println!("✓ SQL file ready: {}", sql_path.display());

    let report_path = output_dir.join(RECONSTRUCTION_REPORT_FILE);
    write_rows(
        &report_path,
        &REPORT_HEADER,
        ordered.iter().map(|p| KeeperReportRow::from(*p)),
    )?;
    println!("✓ Generated report: {}", report_path.display());

    Ok(ReconstructedKeepers {
        total: candidates.len(),
        sql_path: Some(sql_path),
        report_path: Some(report_path),
    })
}
