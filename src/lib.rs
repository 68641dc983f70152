//! GBRFL league database maintenance library
//!
//! Batch tooling for the GBRFL fantasy football league database: moving
//! rosters, keepers and lineups between CSV files and the database,
//! reconciling keepers, importing NFL statistics and refreshing player
//! data from ESPN.
//!
//! ## Features
//!
//! - **Exports**: Players, rosters, free agents and locked lineups to CSV
//! - **Imports**: Rosters, keepers, lineup positions and historical lineups
//! - **Keeper Reconciliation**: Recover keepers from Week 1 lineups and draft picks
//! - **Player Stats**: nflverse weekly stats with play-by-play fumble attribution
//! - **ESPN Refresh**: Current NFL rosters and team reassignment
//! - **Lineup Restoration**: SQL scripts restoring positions lost from the database
//!
//! Commands that change data in bulk without a way back (keeper
//! replacement, lineup restoration) write a SQL script to review instead
//! of touching the database.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gbrfl_maint::{commands::exports::handle_export_players, storage::LeagueDatabase};
//! use std::path::Path;
//!
//! # fn example() -> gbrfl_maint::Result<()> {
//! let db = LeagueDatabase::open(Path::new("league.db"))?;
//! handle_export_players(&db, Path::new("exports"))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! ```bash
//! export GBRFL_DB_PATH=/path/to/league.db
//! export GBRFL_OUTPUT_DIR=/path/to/exports
//! ```

pub mod cli;
pub mod commands;
pub mod core;
pub mod error;
pub mod espn;
pub mod keepers;
pub mod lineups;
pub mod stats;
pub mod storage;

// Re-export commonly used types
pub use cli::types::{EspnId, PlayerId, RosterPosition, Season, TeamId, Week};
pub use error::{LeagueError, Result};

pub const DB_PATH_ENV_VAR: &str = "GBRFL_DB_PATH";
pub const OUTPUT_DIR_ENV_VAR: &str = "GBRFL_OUTPUT_DIR";
