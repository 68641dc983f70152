//! ESPN site API client for NFL teams and rosters.
//!
//! Only the two public endpoints the player import needs are covered:
//! the team list and each team's roster.

pub mod http;
pub mod types;

pub use http::{
    build_client, fetch_nfl_teams, fetch_nfl_teams_with_base_url, fetch_team_roster,
    fetch_team_roster_with_base_url, ESPN_SITE_BASE_URL, ROSTER_REQUEST_DELAY,
};
pub use types::{NflTeam, TARGET_POSITIONS};
