//! CLI argument definitions and parsing.

pub mod types;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use types::{EspnId, Season, TeamId, Week};

use crate::{
    commands::{
        import_keepers::DEFAULT_KEEPER_DATE, keepers::DEFAULT_DRAFT_CUTOFF,
        restore_lineups::DEFAULT_CREATED_AT,
    },
    keepers::parse_expected_count,
};

/// Kicker ESPN IDs left out of the keeper calculation by default.
pub const DEFAULT_KEEPER_EXCLUSIONS: [&str; 5] =
    ["4360234", "4249087", "3049899", "4566192", "4567104"];

/// Where the database lives and where generated files go.
#[derive(Debug, Args)]
pub struct CommonArgs {
    /// SQLite database path (or set `GBRFL_DB_PATH` env var).
    #[clap(long, global = true)]
    pub db: Option<PathBuf>,

    /// Directory for generated CSV/SQL files (or set `GBRFL_OUTPUT_DIR`).
    #[clap(long, short, global = true)]
    pub output_dir: Option<PathBuf>,
}

/// Arguments shared by the keeper reconciliation commands.
#[derive(Debug, Args)]
pub struct KeeperArgs {
    /// Lineup CSV with the Week 1 primary lineups.
    #[clap(long, short, default_value = "lineups.csv")]
    pub lineups: PathBuf,

    /// Season year (e.g. 2025).
    #[clap(long, short, default_value_t = Season::default())]
    pub season: Season,

    /// `designation_date` written on generated keeper rows.
    #[clap(long, default_value = DEFAULT_KEEPER_DATE)]
    pub designation_date: String,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Export every player and the fantasy team reference list.
    ExportPlayers,

    /// Export rostered players and free agents to timestamped CSVs.
    ExportRosters,

    /// Export locked lineup submissions, one row per lineup slot.
    ExportLineups {
        /// Season year (e.g. 2025).
        #[clap(long, short, default_value_t = Season::default())]
        season: Season,

        /// Single week (1-17). All weeks when omitted.
        #[clap(long, short)]
        week: Option<Week>,
    },

    /// Replace all fantasy rosters from a roster CSV.
    ///
    /// Validates every row first; nothing is written unless `--yes` is given.
    ImportRosters {
        /// Roster CSV (`team_name`, `team_name_id`, `player_name_id`, `position`,
        /// `is_keeper`, `acquisition_type`).
        #[clap(long, short, default_value = "rosters.csv")]
        input: PathBuf,

        /// Apply the import without asking.
        #[clap(long, short)]
        yes: bool,

        /// Validate and summarize only.
        #[clap(long)]
        dry_run: bool,

        /// Highest valid fantasy team ID.
        #[clap(long, default_value_t = 10)]
        max_team_id: u32,

        /// Players expected on each roster.
        #[clap(long, default_value_t = 21)]
        roster_size: u32,
    },

    /// Replace a season's keepers from a keeper CSV.
    ImportKeepers {
        /// Keeper CSV (`Team ID`, `player_id`, `ESPN ID`).
        #[clap(long, short, default_value = "keepers.csv")]
        input: PathBuf,

        /// Season year (e.g. 2025).
        #[clap(long, short, default_value_t = Season::default())]
        season: Season,

        #[clap(long, default_value = DEFAULT_KEEPER_DATE)]
        designation_date: String,

        /// Keeper total the import is checked against.
        #[clap(long, default_value_t = 120)]
        expected_total: u32,
    },

    /// Archive a lineup CSV into `historical_lineups`.
    ImportHistoricalLineups {
        #[clap(long, short, default_value = "lineups.csv")]
        input: PathBuf,

        /// Season year (e.g. 2025).
        #[clap(long, short, default_value_t = Season::default())]
        season: Season,
    },

    /// Rebuild `lineup_positions` from one or more lineup CSVs.
    ImportLineupPositions {
        /// Lineup CSV (repeatable): `-i week1.csv -i week2.csv`.
        #[clap(long = "input", short, required = true)]
        inputs: Vec<PathBuf>,

        /// Season year (e.g. 2025).
        #[clap(long, short, default_value_t = Season::default())]
        season: Season,

        /// Team whose lineup is printed after the import.
        #[clap(long, default_value_t = TeamId::new(1))]
        verify_team: TeamId,

        /// Week whose lineup is printed after the import.
        #[clap(long, default_value_t = Week::default())]
        verify_week: Week,
    },

    /// Generate SQL replacing all keepers with Week 1 players minus draft picks.
    CalculateKeepers {
        #[clap(flatten)]
        keepers: KeeperArgs,

        /// ESPN ID to leave out (repeatable).
        #[clap(long, default_values = DEFAULT_KEEPER_EXCLUSIONS)]
        exclude: Vec<EspnId>,
    },

    /// Generate SQL for keepers missing from teams below their expected count.
    FindMissingKeepers {
        #[clap(flatten)]
        keepers: KeeperArgs,

        /// Players acquired before this are current keepers.
        #[clap(long, default_value = DEFAULT_DRAFT_CUTOFF)]
        draft_cutoff: String,

        /// Expected keeper count for a team (repeatable): `--expected 5=13`.
        /// Teams not given keep their 2025 count.
        #[clap(long, value_parser = parse_expected_count)]
        expected: Vec<(TeamId, u32)>,
    },

    /// Generate keeper SQL and a report from roster keeper flags.
    ReconstructKeepers {
        /// Season year (e.g. 2025).
        #[clap(long, short, default_value_t = Season::default())]
        season: Season,

        #[clap(long, default_value = DEFAULT_KEEPER_DATE)]
        designation_date: String,
    },

    /// Import nflverse weekly stats with play-by-play fumble attribution.
    ImportPlayerStats {
        /// Weekly player stats CSV.
        #[clap(long)]
        weekly: PathBuf,

        /// Schedules CSV.
        #[clap(long)]
        schedule: PathBuf,

        /// Play-by-play CSV.
        #[clap(long = "pbp")]
        play_by_play: PathBuf,

        #[clap(long, default_value_t = 1999)]
        start_season: u16,

        #[clap(long, default_value_t = 2024)]
        end_season: u16,
    },

    /// Refresh ESPN players and reassign NFL teams.
    ImportEspnPlayers,

    /// Generate INSERTs for CSV lineup players missing from the database.
    RestoreLineups {
        /// Lineup CSV (repeatable).
        #[clap(long = "input", short, required = true)]
        inputs: Vec<PathBuf>,

        /// Season year (e.g. 2025).
        #[clap(long, short, default_value_t = Season::default())]
        season: Season,

        /// `created_at` for restored positions.
        #[clap(long, default_value = DEFAULT_CREATED_AT)]
        created_at: String,
    },

    /// Generate a standalone SQL analysis of missing lineup players.
    GenerateRestorationSql {
        /// Lineup CSV (repeatable).
        #[clap(long = "input", short, required = true)]
        inputs: Vec<PathBuf>,

        /// Season year (e.g. 2025).
        #[clap(long, short, default_value_t = Season::default())]
        season: Season,
    },
}

#[derive(Debug, Parser)]
#[clap(name = "gbrfl-maint", about = "GBRFL league database maintenance")]
pub struct Gbrfl {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[clap(subcommand)]
    pub command: Commands,
}
