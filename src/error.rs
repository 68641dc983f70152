//! Error types for the league maintenance CLI

use thiserror::Error;


pub type Result<T> = std::result::Result<T, LeagueError>;

#[derive(Error, Debug)]
pub enum LeagueError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),

    #[error("Failed to parse ID: {0}")]
    InvalidId(#[from] std::num::ParseIntError),

    #[error("Database path not provided and {env_var} environment variable not set")]
    MissingDatabasePath { env_var: String },

    #[error("Invalid position: {position}")]
    InvalidPosition { position: String },

    #[error("Invalid acquisition type: {value}")]
    InvalidAcquisitionType { value: String },

    #[error("Invalid expected count '{value}' (use TEAM=COUNT)")]
    InvalidExpectedCount { value: String },

    #[error("CSV row {row}: {message}")]
    InvalidRow { row: usize, message: String },

    #[error("Validation failed with {count} error(s)")]
    Validation { count: usize },

    #[error("ESPN API returned no data")]
    NoData,
}
