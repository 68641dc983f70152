//! Database schema and connection management

use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;

/// Connection to the league database
pub struct LeagueDatabase {
    pub(crate) conn: Connection,
}

impl LeagueDatabase {
    /// Open (or create) the database at `path` and ensure tables exist
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure the parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Fresh in-memory database, used by tests and dry runs
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let mut db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Raw connection access for seeding and ad-hoc verification queries
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Initialize the database schema
    pub(crate) fn initialize_schema(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                user_id INTEGER PRIMARY KEY,
                username TEXT NOT NULL,
                first_name TEXT NOT NULL DEFAULT '',
                last_name TEXT NOT NULL DEFAULT ''
            );

            CREATE TABLE IF NOT EXISTS nfl_teams (
                nfl_team_id INTEGER PRIMARY KEY,
                team_code TEXT NOT NULL,
                team_name TEXT NOT NULL,
                conference TEXT,
                division TEXT
            );

            CREATE TABLE IF NOT EXISTS nfl_players (
                player_id INTEGER PRIMARY KEY,
                display_name TEXT NOT NULL,
                first_name TEXT,
                last_name TEXT,
                position TEXT NOT NULL,
                espn_id INTEGER,
                nfl_team_id INTEGER
            );

            CREATE INDEX IF NOT EXISTS idx_nfl_players_espn_id
                ON nfl_players(espn_id);

            CREATE TABLE IF NOT EXISTS fantasy_teams (
                team_id INTEGER PRIMARY KEY,
                team_name TEXT NOT NULL,
                head_coach TEXT,
                user_id INTEGER REFERENCES users(user_id)
            );

            CREATE TABLE IF NOT EXISTS fantasy_team_players (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                fantasy_team_id INTEGER NOT NULL REFERENCES fantasy_teams(team_id),
                player_id INTEGER NOT NULL REFERENCES nfl_players(player_id),
                acquisition_type TEXT NOT NULL,
                is_keeper INTEGER NOT NULL DEFAULT 0,
                acquisition_date TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );

            CREATE TABLE IF NOT EXISTS draft_picks (
                pick_id INTEGER PRIMARY KEY AUTOINCREMENT,
                season INTEGER NOT NULL,
                fantasy_team_id INTEGER,
                player_id INTEGER
            );

            CREATE TABLE IF NOT EXISTS lineup_submissions (
                lineup_id INTEGER PRIMARY KEY AUTOINCREMENT,
                fantasy_team_id INTEGER NOT NULL,
                week_number INTEGER NOT NULL,
                game_type TEXT NOT NULL,
                season_year INTEGER NOT NULL,
                head_coach TEXT,
                submitted_at TEXT,
                is_locked INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_lineup_submissions_lookup
                ON lineup_submissions(fantasy_team_id, week_number, game_type, season_year);

            CREATE TABLE IF NOT EXISTS lineup_positions (
                position_id INTEGER PRIMARY KEY AUTOINCREMENT,
                lineup_id INTEGER NOT NULL REFERENCES lineup_submissions(lineup_id),
                position_type TEXT NOT NULL,
                player_id INTEGER,
                nfl_team_id INTEGER,
                sort_order INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );

            CREATE TABLE IF NOT EXISTS lineup_locks (
                lock_id INTEGER PRIMARY KEY AUTOINCREMENT,
                week_number INTEGER NOT NULL,
                season_year INTEGER NOT NULL,
                lock_datetime TEXT,
                is_locked INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS historical_keepers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                season_year INTEGER NOT NULL,
                fantasy_team_id INTEGER NOT NULL,
                player_id INTEGER NOT NULL,
                espn_id INTEGER,
                designation_date TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS historical_rosters (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                season_year INTEGER NOT NULL,
                fantasy_team_id INTEGER NOT NULL,
                player_id INTEGER NOT NULL,
                acquisition_type TEXT NOT NULL,
                was_keeper INTEGER NOT NULL DEFAULT 0,
                active_until TEXT
            );

            CREATE TABLE IF NOT EXISTS historical_lineups (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                season_year INTEGER NOT NULL,
                week_number INTEGER NOT NULL,
                game_type TEXT NOT NULL,
                fantasy_team_id INTEGER NOT NULL,
                team_name_at_time TEXT NOT NULL,
                owner_name_at_time TEXT,
                player_id INTEGER NOT NULL REFERENCES nfl_players(player_id),
                espn_id INTEGER,
                player_name_at_time TEXT NOT NULL,
                position TEXT NOT NULL,
                lineup_position TEXT NOT NULL,
                acquisition_type TEXT NOT NULL,
                was_keeper INTEGER NOT NULL DEFAULT 0,
                is_locked INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS espn_players (
                espn_id INTEGER PRIMARY KEY,
                first_name TEXT,
                last_name TEXT,
                display_name TEXT,
                position TEXT,
                position_full TEXT,
                position_group TEXT,
                jersey_number TEXT,
                team_id TEXT,
                team_name TEXT,
                team_abbreviation TEXT,
                height TEXT,
                weight TEXT,
                age TEXT,
                experience TEXT,
                college TEXT,
                active INTEGER DEFAULT 1,
                injured INTEGER DEFAULT 0,
                status TEXT,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_espn_players_position
                ON espn_players(position);
            CREATE INDEX IF NOT EXISTS idx_espn_players_team_abbreviation
                ON espn_players(team_abbreviation);

            CREATE TABLE IF NOT EXISTS player_stats (
                player_name TEXT NOT NULL,
                season INTEGER NOT NULL,
                week INTEGER NOT NULL,
                game_type TEXT,
                game_date TEXT NOT NULL,
                team TEXT NOT NULL,
                opponent TEXT,
                pass_completions INTEGER NOT NULL DEFAULT 0,
                pass_attempts INTEGER NOT NULL DEFAULT 0,
                pass_yards INTEGER NOT NULL DEFAULT 0,
                pass_touchdowns INTEGER NOT NULL DEFAULT 0,
                interceptions INTEGER NOT NULL DEFAULT 0,
                rush_attempts INTEGER NOT NULL DEFAULT 0,
                rush_yards INTEGER NOT NULL DEFAULT 0,
                rush_touchdowns INTEGER NOT NULL DEFAULT 0,
                receptions INTEGER NOT NULL DEFAULT 0,
                receiving_yards INTEGER NOT NULL DEFAULT 0,
                receiving_touchdowns INTEGER NOT NULL DEFAULT 0,
                fumbles_lost INTEGER NOT NULL DEFAULT 0,
                two_point_conversions INTEGER NOT NULL DEFAULT 0,
                fg_under_30 INTEGER NOT NULL DEFAULT 0,
                fg_30_39 INTEGER NOT NULL DEFAULT 0,
                fg_40_49 INTEGER NOT NULL DEFAULT 0,
                fg_50_plus INTEGER NOT NULL DEFAULT 0,
                extra_points_made INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (player_name, season, week, team)
            );",
        )?;

        Ok(())
    }
}
