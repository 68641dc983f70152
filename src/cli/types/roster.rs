//! Roster acquisition metadata.

use crate::error::LeagueError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a player joined a fantasy roster (`fantasy_team_players.acquisition_type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AcquisitionType {
    Draft,
    Keeper,
    Trade,
    FreeAgent,
}

impl AcquisitionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcquisitionType::Draft => "Draft",
            AcquisitionType::Keeper => "Keeper",
            AcquisitionType::Trade => "Trade",
            AcquisitionType::FreeAgent => "Free Agent",
        }
    }
}

impl fmt::Display for AcquisitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AcquisitionType {
    type Err = LeagueError;

    // Exact match: the column is compared verbatim by the web app.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Draft" => Ok(AcquisitionType::Draft),
            "Keeper" => Ok(AcquisitionType::Keeper),
            "Trade" => Ok(AcquisitionType::Trade),
            "Free Agent" => Ok(AcquisitionType::FreeAgent),
            other => Err(LeagueError::InvalidAcquisitionType {
                value: other.to_string(),
            }),
        }
    }
}

/// Parse an `is_keeper` cell: `TRUE`/`FALSE`/`1`/`0`, case-insensitive.
pub fn parse_keeper_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_uppercase().as_str() {
        "TRUE" | "1" => Some(true),
        "FALSE" | "0" => Some(false),
        _ => None,
    }
}
