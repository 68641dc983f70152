//! Storage layer for the league database
//!
//! This module wraps the SQLite database, organized by the tables each
//! command touches:
//! - `models`: Row structures
//! - `schema`: Connection and schema management
//! - `queries`: Players, fantasy teams and rosters
//! - `lineups`: Lineup submissions, positions and historical lineups
//! - `keepers`: Historical keepers and draft picks
//! - `espn`: ESPN player snapshot and NFL team reassignment
//! - `stats`: Weekly NFL player statistics

pub mod espn;
pub mod keepers;
pub mod lineups;
pub mod models;
pub mod queries;
pub mod schema;
pub mod stats;


// Re-export the main types and database struct for easy access
pub use espn::TeamAssignmentSummary;
pub use lineups::HistoricalInsertOutcome;
pub use models::*;
pub use schema::LeagueDatabase;
pub use stats::StatsSummary;
