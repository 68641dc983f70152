//! Lineup CSV rows and the rules for turning them into lineup slots.
//!
//! The lineup CSV is the format written by `export-lineups`:
//! `Week, Game Type, Team ID, Fantasy Team Name, Owner Name, Username,
//! Position, Player, ESPN ID`, optionally followed by a `player_id` column
//! added by hand when an ESPN ID is missing.

use crate::{
    cli::types::{EspnId, PlayerId, PositionType, SlotLabel, TeamId, Week},
    storage::PlayerRef,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[cfg(test)]
mod tests;

/// Column headers of an exported lineup CSV, in order.
pub const LINEUP_CSV_HEADER: [&str; 9] = [
    "Week",
    "Game Type",
    "Team ID",
    "Fantasy Team Name",
    "Owner Name",
    "Username",
    "Position",
    "Player",
    "ESPN ID",
];

/// One row of a lineup CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupCsvRow {
    #[serde(rename = "Week")]
    pub week: u16,
    #[serde(rename = "Game Type")]
    pub game_type: String,
    #[serde(rename = "Team ID")]
    pub team_id: u32,
    #[serde(rename = "Fantasy Team Name")]
    pub team_name: String,
    #[serde(rename = "Owner Name", default)]
    pub owner_name: Option<String>,
    #[serde(rename = "Username", default)]
    pub username: Option<String>,
    #[serde(rename = "Position")]
    pub position: String,
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "ESPN ID", default)]
    pub espn_id: Option<String>,
    #[serde(default, skip_serializing)]
    pub player_id: Option<String>,
}

impl LineupCsvRow {
    pub fn team(&self) -> TeamId {
        TeamId::new(self.team_id)
    }

    pub fn week(&self) -> Week {
        Week::new(self.week)
    }

    pub fn slot(&self) -> SlotLabel {
        SlotLabel::parse(&self.position)
    }

    /// The ESPN ID cell, trimmed; `None` when blank.
    pub fn espn_id_text(&self) -> Option<&str> {
        self.espn_id.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// A hand-entered `player_id`, when present and numeric.
    pub fn direct_player_id(&self) -> Option<PlayerId> {
        self.player_id
            .as_deref()
            .and_then(|s| s.trim().parse::<PlayerId>().ok())
            .filter(|id| id.as_u64() > 0)
    }

    pub fn is_week_one_primary(&self) -> bool {
        self.week == 1 && self.game_type == "primary"
    }
}

/// How a lineup row relates to the league's players.
#[derive(Debug, Clone, PartialEq)]
pub enum RowClass<'a> {
    /// No ESPN ID: head coaches and defenses
    NoEspnId,
    Resolved { espn_id: EspnId, player: &'a PlayerRef },
    /// ESPN ID present but not in `nfl_players` (or not a number)
    Unknown { espn_id: String },
}

/// Resolve a row's ESPN ID against the league's ESPN mapping.
pub fn classify<'a>(row: &LineupCsvRow, mapping: &'a HashMap<EspnId, PlayerRef>) -> RowClass<'a> {
    let Some(raw) = row.espn_id_text() else {
        return RowClass::NoEspnId;
    };

    match raw.parse::<EspnId>() {
        Ok(espn_id) => match mapping.get(&espn_id) {
            Some(player) => RowClass::Resolved { espn_id, player },
            None => RowClass::Unknown {
                espn_id: raw.to_string(),
            },
        },
        Err(_) => RowClass::Unknown {
            espn_id: raw.to_string(),
        },
    }
}

/// NFL team code from a player cell such as `Ka'imi Fairbairn (HOU)`.
/// Uses the last parenthesised group.
pub fn extract_nfl_team_code(player: &str) -> Option<&str> {
    let start = player.rfind('(')?;
    let end = player.rfind(')')?;
    if end <= start {
        return None;
    }
    let code = player[start + 1..end].trim();
    (!code.is_empty()).then_some(code)
}

/// Assigns sort orders to lineup labels.
///
/// Numbered labels (`RB3`) carry their own order. Bare labels (`RB`) are
/// numbered by how many times that position type has appeared for the same
/// team, week and game type.
#[derive(Debug, Default)]
pub struct SlotCounter {
    seen: HashMap<(TeamId, Week, String, PositionType), u32>,
}

impl SlotCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` for head coach and unknown labels.
    pub fn assign(&mut self, row: &LineupCsvRow) -> Option<(PositionType, u32)> {
        match row.slot() {
            SlotLabel::Slot {
                position_type,
                number: Some(number),
            } => Some((position_type, number)),
            SlotLabel::Slot {
                position_type,
                number: None,
            } => {
                let key = (
                    row.team(),
                    row.week(),
                    row.game_type.clone(),
                    position_type,
                );
                let count = self.seen.entry(key).or_insert(0);
                *count += 1;
                Some((position_type, *count))
            }
            SlotLabel::HeadCoach | SlotLabel::Unknown => None,
        }
    }
}
