//! Core utilities shared by every maintenance command
//!
//! - `config`: database and output location resolution
//! - `csv_io`: typed CSV reading/writing
//! - `sql`: literal SQL rendering for generated scripts

pub mod config;
pub mod csv_io;
pub mod sql;

// Re-export commonly used items for convenience
pub use config::{resolve_db_path, resolve_output_dir};
pub use csv_io::{read_filtered, read_numbered, read_records, timestamped_path, write_rows, write_string, Numbered};
