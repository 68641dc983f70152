//! Database and output location resolution.

use std::path::PathBuf;

use crate::{error::LeagueError, Result, DB_PATH_ENV_VAR, OUTPUT_DIR_ENV_VAR};

/// Default location: `<data dir>/gbrfl/league.db`
pub fn default_database_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("gbrfl").join("league.db"))
}

/// Resolve the database path from the CLI flag, then `GBRFL_DB_PATH`,
/// then the platform data directory.
pub fn resolve_db_path(db: Option<PathBuf>) -> Result<PathBuf> {
    db.or_else(|| {
        std::env::var(DB_PATH_ENV_VAR)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
    })
    .or_else(default_database_path)
    .ok_or_else(|| LeagueError::MissingDatabasePath {
        env_var: DB_PATH_ENV_VAR.to_string(),
    })
}

/// Resolve where generated CSV/SQL files go: CLI flag, then
/// `GBRFL_OUTPUT_DIR`, then the working directory.
pub fn resolve_output_dir(output_dir: Option<PathBuf>) -> PathBuf {
    output_dir
        .or_else(|| {
            std::env::var(OUTPUT_DIR_ENV_VAR)
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_db_path_wins() {
        let path = resolve_db_path(Some(PathBuf::from("/tmp/league.db"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/league.db"));
    }

    #[test]
    fn test_explicit_output_dir_wins() {
        let dir = resolve_output_dir(Some(PathBuf::from("exports")));
        assert_eq!(dir, PathBuf::from("exports"));
    }
}
