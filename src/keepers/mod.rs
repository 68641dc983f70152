//! Keeper reconciliation.
//!
//! A keeper is a player a team carried over from last season. The league
//! never stored keepers explicitly at season start, so they are recovered
//! from the Week 1 primary lineups: anyone in a Week 1 lineup who was not
//! picked in the draft must have been kept.

use crate::{
    cli::types::{EspnId, PlayerId, Season, TeamId},
    core::sql::{comment_text, or_null, quote, render_values, ValuesRow},
    error::LeagueError,
    lineups::{classify, LineupCsvRow, RowClass},
    storage::PlayerRef,
    Result,
};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};


/// A player who may be (or is) a keeper for a team.
#[derive(Debug, Clone, PartialEq)]
pub struct KeeperCandidate {
    pub team_id: TeamId,
    pub player_id: PlayerId,
    pub espn_id: Option<EspnId>,
    pub display_name: String,
    pub position: String,
}

/// A Week 1 row whose ESPN ID is not in the database.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownPlayer {
    pub espn_id: String,
    pub player: String,
    pub team_id: TeamId,
}

/// The resolved Week 1 primary lineups.
#[derive(Debug, Default)]
pub struct WeekOneLineups {
    pub by_team: BTreeMap<TeamId, Vec<KeeperCandidate>>,
    pub unknown: Vec<UnknownPlayer>,
    /// Position labels skipped for lacking an ESPN ID
    pub skipped_positions: BTreeSet<String>,
    pub excluded: usize,
}

impl WeekOneLineups {
    pub fn total(&self) -> usize {
        self.by_team.values().map(Vec::len).sum()
    }
}

/// Week 1 `primary` players whose ESPN ID resolves, minus `exclusions`,
/// grouped by team.
pub fn week_one_players(
    rows: &[LineupCsvRow],
    mapping: &HashMap<EspnId, PlayerRef>,
    exclusions: &HashSet<EspnId>,
) -> WeekOneLineups {
    let mut lineups = WeekOneLineups::default();

    for row in rows.iter().filter(|r| r.is_week_one_primary()) {
        match classify(row, mapping) {
            RowClass::NoEspnId => {
                lineups.skipped_positions.insert(row.position.clone());
            }
            RowClass::Unknown { espn_id } => lineups.unknown.push(UnknownPlayer {
                espn_id,
                player: row.player.clone(),
                team_id: row.team(),
            }),
            RowClass::Resolved { espn_id, .. } if exclusions.contains(&espn_id) => {
                lineups.excluded += 1;
            }
            RowClass::Resolved { espn_id, player } => {
                lineups
                    .by_team
                    .entry(row.team())
                    .or_default()
                    .push(KeeperCandidate {
                        team_id: row.team(),
                        player_id: player.player_id,
                        espn_id: Some(espn_id),
                        display_name: player.display_name.clone(),
                        position: player.position.clone(),
                    });
            }
        }
    }

    lineups
}

/// Week 1 players that were not drafted, per team.
pub fn true_keepers(
    week_one: &BTreeMap<TeamId, Vec<KeeperCandidate>>,
    drafted: &HashSet<PlayerId>,
) -> BTreeMap<TeamId, Vec<KeeperCandidate>> {
    week_one
        .iter()
        .map(|(team_id, players)| {
            let keepers = players
                .iter()
                .filter(|p| !drafted.contains(&p.player_id))
                .cloned()
                .collect();
            (*team_id, keepers)
        })
        .collect()
}

/// A team that has fewer keepers recorded than it should.
#[derive(Debug, Clone, PartialEq)]
pub struct KeeperShortfall {
    pub team_id: TeamId,
    pub expected: u32,
    pub current: u32,
    /// Week 1 players not already keepers and not drafted, at most
    /// `expected - current` of them
    pub candidates: Vec<KeeperCandidate>,
}

/// For every team whose current keeper count is below `expected`, the Week 1
/// players that are neither current keepers nor drafted, truncated to the
/// shortfall. Teams with no candidates are left out.
pub fn missing_keepers(
    week_one: &BTreeMap<TeamId, Vec<KeeperCandidate>>,
    current: &HashMap<TeamId, HashSet<PlayerId>>,
    drafted: &HashSet<PlayerId>,
    expected: &BTreeMap<TeamId, u32>,
) -> Vec<KeeperShortfall> {
    let empty = HashSet::new();
    let mut shortfalls = Vec::new();

    for (&team_id, &expected_count) in expected {
        let current_ids = current.get(&team_id).unwrap_or(&empty);
        let current_count = current_ids.len() as u32;
        if expected_count <= current_count {
            continue;
        }
        let missing = (expected_count - current_count) as usize;

        let candidates: Vec<KeeperCandidate> = week_one
            .get(&team_id)
            .into_iter()
            .flatten()
            .filter(|p| !current_ids.contains(&p.player_id) && !drafted.contains(&p.player_id))
            .take(missing)
            .cloned()
            .collect();

        if !candidates.is_empty() {
            shortfalls.push(KeeperShortfall {
                team_id,
                expected: expected_count,
                current: current_count,
                candidates,
            });
        }
    }

    shortfalls
}

/// Expected keepers per team for the 2025 season.
pub const DEFAULT_EXPECTED_KEEPERS: [(u32, u32); 10] = [
    (1, 12),
    (2, 11),
    (3, 12),
    (4, 12),
    (5, 13),
    (6, 12),
    (7, 13),
    (8, 12),
    (9, 12),
    (10, 11),
];

/// Default expected counts with `overrides` applied in order; a later pair
/// for the same team wins.
pub fn expected_keeper_counts(overrides: &[(TeamId, u32)]) -> BTreeMap<TeamId, u32> {
    let mut expected: BTreeMap<TeamId, u32> = DEFAULT_EXPECTED_KEEPERS
        .iter()
        .map(|&(team, count)| (TeamId::new(team), count))
        .collect();
    expected.extend(overrides.iter().copied());
    expected
}

/// Parse a `TEAM=COUNT` pair such as `5=13`.
pub fn parse_expected_count(raw: &str) -> Result<(TeamId, u32)> {
    let invalid = || LeagueError::InvalidExpectedCount {
        value: raw.to_string(),
    };
    let (team, count) = raw.split_once('=').ok_or_else(invalid)?;
    let team: TeamId = team.parse().map_err(|_| invalid())?;
    let count: u32 = count.trim().parse().map_err(|_| invalid())?;
    Ok((team, count))
}

/// A generated `historical_keepers` insert script.
#[derive(Debug, Clone)]
pub struct KeeperScript<'a> {
    pub title: &'a str,
    pub season: Season,
    pub designation_date: &'a str,
    /// Clear the season's keepers before inserting
    pub replace_existing: bool,
}

impl KeeperScript<'_> {
    pub fn render(&self, keepers: &[KeeperCandidate]) -> String {
        let season = self.season.as_u16();
        let mut sql = String::new();
        sql.push_str(&format!("-- {}\n", comment_text(self.title)));
        sql.push_str(&format!(
            "-- Generated: {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        sql.push_str(&format!("-- Total keepers: {}\n\n", keepers.len()));

        if self.replace_existing {
            sql.push_str(&format!(
                "DELETE FROM historical_keepers WHERE season_year = {};\n\n",
                season
            ));
        }

        if !keepers.is_empty() {
            let rows: Vec<ValuesRow> = keepers
                .iter()
                .map(|k| {
                    ValuesRow::new(vec![
                        season.to_string(),
                        k.team_id.to_string(),
                        k.player_id.to_string(),
                        or_null(k.espn_id),
                        quote(self.designation_date),
                    ])
                    .with_comment(format!(
                        "Team {}: {} ({})",
                        k.team_id, k.display_name, k.position
                    ))
                })
                .collect();

            sql.push_str("INSERT INTO historical_keepers\n");
            sql.push_str("  (season_year, fantasy_team_id, player_id, espn_id, designation_date)\n");
            sql.push_str("VALUES\n");
            sql.push_str(&render_values(&rows));
        }

        sql.push_str("\n-- Verification\n");
        sql.push_str("SELECT fantasy_team_id, COUNT(*) AS keeper_count\n");
        sql.push_str(&format!(
            "FROM historical_keepers WHERE season_year = {}\n",
            season
        ));
        sql.push_str("GROUP BY fantasy_team_id ORDER BY fantasy_team_id;\n");
        sql
    }
}

/// Flatten per-team keepers in team order.
pub fn flatten_by_team(by_team: &BTreeMap<TeamId, Vec<KeeperCandidate>>) -> Vec<KeeperCandidate> {
    by_team.values().flatten().cloned().collect()
}
