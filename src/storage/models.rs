//! Data models for the storage layer

use crate::cli::types::{
    AcquisitionType, EspnId, LineupId, NflTeamId, PlayerId, PositionType, RosterPosition, Season,
    TeamId, Week,
};
use serde::{Deserialize, Serialize};

/// The fields commands need after resolving an ESPN ID to a league player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub player_id: PlayerId,
    pub display_name: String,
    pub position: String,
}

/// One row of `exported_players.csv`
#[derive(Debug, Clone, Serialize)]
pub struct PlayerExportRow {
    pub player_id: PlayerId,
    pub display_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position: String,
    pub nfl_team_name: String,
    pub nfl_team_code: String,
    pub nfl_team_id: Option<NflTeamId>,
}

/// One row of `fantasy_teams_reference.csv`
#[derive(Debug, Clone, Serialize)]
pub struct FantasyTeamRef {
    pub team_id: TeamId,
    pub team_name: String,
    pub owner_name: String,
    pub username: String,
}

/// A rostered player with team, owner and NFL team details
#[derive(Debug, Clone, Serialize)]
pub struct RosterExportRow {
    pub team_id: TeamId,
    pub team_name: String,
    pub head_coach: Option<String>,
    pub owner_username: String,
    pub owner_name: String,
    pub player_id: PlayerId,
    pub player_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position: String,
    pub espn_id: Option<EspnId>,
    pub nfl_team: Option<String>,
    pub nfl_team_code: Option<String>,
    pub acquisition_type: String,
    pub acquisition_date: String,
    pub is_keeper: bool,
}

/// A player on no fantasy roster, with ESPN detail when available
#[derive(Debug, Clone, Serialize)]
pub struct FreeAgentRow {
    pub player_id: PlayerId,
    pub player_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position: String,
    pub espn_id: Option<EspnId>,
    pub nfl_team: Option<String>,
    pub nfl_team_code: Option<String>,
    pub conference: Option<String>,
    pub division: Option<String>,
    pub is_active: Option<bool>,
    pub is_injured: Option<bool>,
    pub player_status: Option<String>,
    pub jersey_number: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub age: Option<String>,
    pub experience: Option<String>,
    pub college: Option<String>,
}

/// A lineup submission that was locked for its week
#[derive(Debug, Clone)]
pub struct LockedLineup {
    pub lineup_id: LineupId,
    pub fantasy_team_id: TeamId,
    pub team_name: String,
    pub team_head_coach: Option<String>,
    pub owner_name: String,
    pub username: String,
    pub week_number: Week,
    pub game_type: String,
    pub season_year: Season,
    pub lineup_head_coach: Option<String>,
}

impl LockedLineup {
    /// Lineup-level coach, falling back to the team's coach
    pub fn head_coach(&self) -> Option<&str> {
        self.lineup_head_coach
            .as_deref()
            .filter(|c| !c.is_empty())
            .or_else(|| self.team_head_coach.as_deref().filter(|c| !c.is_empty()))
    }
}

/// A lineup position joined to its player and NFL team
#[derive(Debug, Clone)]
pub struct LineupPositionDetail {
    pub position_type: String,
    pub sort_order: u32,
    pub player_id: Option<PlayerId>,
    pub player_name: Option<String>,
    pub espn_id: Option<EspnId>,
    pub team_code: Option<String>,
    pub team_name: Option<String>,
}

/// A validated `rosters.csv` entry ready for `fantasy_team_players`
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub row: usize,
    pub team_name: String,
    pub team_id: TeamId,
    pub player_id: PlayerId,
    pub position: RosterPosition,
    pub is_keeper: bool,
    pub acquisition_type: AcquisitionType,
}

/// A `historical_keepers` row
#[derive(Debug, Clone, PartialEq)]
pub struct KeeperRecord {
    pub season: Season,
    pub team_id: TeamId,
    pub player_id: PlayerId,
    pub espn_id: Option<EspnId>,
    pub designation_date: String,
}

/// A player on a fantasy roster
#[derive(Debug, Clone, PartialEq)]
pub struct RosteredPlayer {
    pub team_id: TeamId,
    pub player_id: PlayerId,
    pub display_name: String,
    pub espn_id: Option<EspnId>,
    pub position: String,
}

/// A roster row flagged as a keeper
#[derive(Debug, Clone, Serialize)]
pub struct KeeperPlayer {
    pub team_id: TeamId,
    pub player_id: PlayerId,
    pub espn_id: Option<EspnId>,
    pub display_name: String,
    pub position: String,
    pub is_keeper: bool,
    pub acquisition_type: String,
    pub acquisition_date: String,
}

/// Acquisition context for a team/player pair from `historical_rosters`
#[derive(Debug, Clone, PartialEq)]
pub struct RosterContext {
    pub acquisition_type: String,
    pub was_keeper: bool,
}

/// A `historical_lineups` row
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalLineupEntry {
    pub season: Season,
    pub week: Week,
    pub game_type: String,
    pub team_id: TeamId,
    pub team_name_at_time: String,
    pub owner_name_at_time: Option<String>,
    pub player_id: PlayerId,
    pub espn_id: EspnId,
    pub player_name_at_time: String,
    pub position: String,
    pub lineup_position: String,
    pub acquisition_type: String,
    pub was_keeper: bool,
}

/// A `lineup_positions` row to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewLineupPosition {
    pub position_type: PositionType,
    pub player_id: PlayerId,
    pub nfl_team_id: Option<NflTeamId>,
    pub sort_order: u32,
}

/// An `espn_players` row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EspnPlayer {
    pub espn_id: EspnId,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub position: String,
    pub position_full: String,
    pub position_group: String,
    pub jersey_number: String,
    pub team_id: String,
    pub team_name: String,
    pub team_abbreviation: String,
    pub height: String,
    pub weight: String,
    pub age: String,
    pub experience: String,
    pub college: String,
    pub active: bool,
    pub injured: bool,
    pub status: String,
}

/// A `player_stats` row
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerStatLine {
    pub player_name: String,
    pub season: u16,
    pub week: u16,
    pub game_type: Option<String>,
    pub game_date: String,
    pub team: String,
    pub opponent: Option<String>,
    pub pass_completions: i64,
    pub pass_attempts: i64,
    pub pass_yards: i64,
    pub pass_touchdowns: i64,
    pub interceptions: i64,
    pub rush_attempts: i64,
    pub rush_yards: i64,
    pub rush_touchdowns: i64,
    pub receptions: i64,
    pub receiving_yards: i64,
    pub receiving_touchdowns: i64,
    pub fumbles_lost: i64,
    pub two_point_conversions: i64,
    pub fg_under_30: i64,
    pub fg_30_39: i64,
    pub fg_40_49: i64,
    pub fg_50_plus: i64,
    pub extra_points_made: i64,
}

impl PlayerStatLine {
    /// Whether any counted stat is non-zero
    pub fn has_meaningful_stats(&self) -> bool {
        [
            self.pass_completions,
            self.pass_attempts,
            self.pass_yards,
            self.pass_touchdowns,
            self.interceptions,
            self.rush_attempts,
            self.rush_yards,
            self.rush_touchdowns,
            self.receptions,
            self.receiving_yards,
            self.receiving_touchdowns,
            self.fumbles_lost,
            self.two_point_conversions,
            self.fg_under_30,
            self.fg_30_39,
            self.fg_40_49,
            self.fg_50_plus,
            self.extra_points_made,
        ]
        .iter()
        .any(|&v| v > 0)
    }
}

/// A label with a row count, used by the verification summaries
#[derive(Debug, Clone, PartialEq)]
pub struct CountRow {
    pub label: String,
    pub count: u32,
}
