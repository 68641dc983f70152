//! Roster positions, lineup position types, and lineup slot labels.

use crate::error::LeagueError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Positions a player can hold on a fantasy roster.
///
/// The league scores receivers as a single `RC` group (WR and TE) and
/// rosters team defenses as `DU` units.
///
/// # Examples
///
/// ```rust
/// use gbrfl_maint::RosterPosition;
///
/// let rc: RosterPosition = "rc".parse().unwrap();
/// assert_eq!(rc, RosterPosition::RC);
/// assert_eq!(rc.to_string(), "RC");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RosterPosition {
    QB,
    RB,
    RC,
    PK,
    DU,
}

impl RosterPosition {
    pub const ALL: [RosterPosition; 5] = [
        RosterPosition::QB,
        RosterPosition::RB,
        RosterPosition::RC,
        RosterPosition::PK,
        RosterPosition::DU,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RosterPosition::QB => "QB",
            RosterPosition::RB => "RB",
            RosterPosition::RC => "RC",
            RosterPosition::PK => "PK",
            RosterPosition::DU => "DU",
        }
    }
}

impl fmt::Display for RosterPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RosterPosition {
    type Err = LeagueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Ok(RosterPosition::QB),
            "RB" => Ok(RosterPosition::RB),
            "RC" => Ok(RosterPosition::RC),
            "PK" => Ok(RosterPosition::PK),
            "DU" => Ok(RosterPosition::DU),
            _ => Err(LeagueError::InvalidPosition {
                position: s.to_string(),
            }),
        }
    }
}

/// `lineup_positions.position_type` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PositionType {
    Quarterback,
    RunningBack,
    Receiver,
    PlaceKicker,
    Defense,
}

impl PositionType {
    pub const ALL: [PositionType; 5] = [
        PositionType::Quarterback,
        PositionType::RunningBack,
        PositionType::Receiver,
        PositionType::PlaceKicker,
        PositionType::Defense,
    ];

    /// Column value stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionType::Quarterback => "quarterback",
            PositionType::RunningBack => "running_back",
            PositionType::Receiver => "receiver",
            PositionType::PlaceKicker => "place_kicker",
            PositionType::Defense => "defense",
        }
    }

    /// Prefix used in lineup CSV position labels (`QB1`, `DEF2`, ...).
    pub fn label_prefix(&self) -> &'static str {
        match self {
            PositionType::Quarterback => "QB",
            PositionType::RunningBack => "RB",
            PositionType::Receiver => "RC",
            PositionType::PlaceKicker => "PK",
            PositionType::Defense => "DEF",
        }
    }

    /// Display order inside an exported lineup.
    pub fn rank(&self) -> u8 {
        match self {
            PositionType::Quarterback => 1,
            PositionType::RunningBack => 2,
            PositionType::Receiver => 3,
            PositionType::PlaceKicker => 4,
            PositionType::Defense => 5,
        }
    }
}

impl fmt::Display for PositionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PositionType {
    type Err = LeagueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PositionType::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| LeagueError::InvalidPosition {
                position: s.to_string(),
            })
    }
}

/// A parsed lineup CSV position label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotLabel {
    /// `HeadCoach` rows carry a coach name, not a player.
    HeadCoach,
    /// `QB1`, `RB`, `DEF2`, ... Bare labels (older export format) carry no number.
    Slot {
        position_type: PositionType,
        number: Option<u32>,
    },
    Unknown,
}

impl SlotLabel {
    pub fn parse(label: &str) -> Self {
        let label = label.trim();
        if label == "HeadCoach" {
            return SlotLabel::HeadCoach;
        }

        for position_type in PositionType::ALL {
            if let Some(rest) = label.strip_prefix(position_type.label_prefix()) {
                if rest.is_empty() {
                    return SlotLabel::Slot {
                        position_type,
                        number: None,
                    };
                }
                if rest.bytes().all(|b| b.is_ascii_digit()) {
                    // Slots are numbered from 1
                    if let Ok(number @ 1..) = rest.parse::<u32>() {
                        return SlotLabel::Slot {
                            position_type,
                            number: Some(number),
                        };
                    }
                }
                return SlotLabel::Unknown;
            }
        }

        SlotLabel::Unknown
    }
}

/// Format a lineup label from a position type and sort order (`QB1`).
pub fn format_slot_label(position_type: PositionType, sort_order: u32) -> String {
    format!("{}{}", position_type.label_prefix(), sort_order)
}
