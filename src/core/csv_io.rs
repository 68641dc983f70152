//! CSV reading and writing helpers shared by the import/export commands.

use std::{
    fs,
    path::{Path, PathBuf},
};

use csv::{ByteRecord, ReaderBuilder, StringRecord, Trim, WriterBuilder};
use serde::{de::DeserializeOwned, Serialize};

use crate::{error::LeagueError, Result};

/// A deserialized CSV record along with its spreadsheet row number
/// (the header is row 1, so the first record is row 2).
#[derive(Debug, Clone)]
pub struct Numbered<T> {
    pub row: usize,
    pub record: T,
}

/// Read every record of a headed CSV file, trimming whitespace around
/// fields. Fails on the first record that does not deserialize.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    Ok(read_numbered(path)?
        .into_iter()
        .map(|numbered| numbered.record)
        .collect())
}

/// Like [`read_records`], keeping row numbers for error reporting.
pub fn read_numbered<T: DeserializeOwned>(path: &Path) -> Result<Vec<Numbered<T>>> {
    let content = fs::read_to_string(path)?;
    parse_numbered(&content)
}

/// Parse CSV content already in memory.
pub fn parse_numbered<T: DeserializeOwned>(content: &str) -> Result<Vec<Numbered<T>>> {
    // Spreadsheet exports often start with a UTF-8 BOM
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    for (index, result) in reader.deserialize::<T>().enumerate() {
        let row = index + 2;
        let record = result.map_err(|e| LeagueError::InvalidRow {
            row,
            message: e.to_string(),
        })?;
        records.push(Numbered { row, record });
    }
    Ok(records)
}

/// Stream a headed CSV file record by record, keeping the records `keep`
/// accepts. Only kept records stay in memory, so multi-gigabyte exports are
/// fine. Bytes that are not valid UTF-8 are decoded lossily instead of
/// failing the file. Returns `(records read, records kept)`.
pub fn read_filtered<T, F>(path: &Path, mut keep: F) -> Result<(usize, Vec<T>)>
where
    T: DeserializeOwned,
    F: FnMut(&T) -> bool,
{
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_path(path)?;
    let headers = lossy_record(reader.byte_headers()?);

    let mut raw = ByteRecord::new();
    let mut read = 0;
    let mut kept = Vec::new();
    while reader.read_byte_record(&mut raw)? {
        read += 1;
        let record: T = lossy_record(&raw)
            .deserialize(Some(&headers))
            .map_err(|e| LeagueError::InvalidRow {
                row: read + 1,
                message: e.to_string(),
            })?;
        if keep(&record) {
            kept.push(record);
        }
    }
    Ok((read, kept))
}

fn lossy_record(raw: &ByteRecord) -> StringRecord {
    raw.iter().map(String::from_utf8_lossy).collect()
}

/// Write `rows` under `header` to `path`, creating parent directories.
pub fn write_rows<R, I>(path: &Path, header: &[&str], rows: I) -> Result<usize>
where
    R: Serialize,
    I: IntoIterator<Item = R>,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(header)?;

    let mut count = 0;
    for row in rows {
        writer.serialize(row)?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

/// Write a text file (generated SQL), creating parent directories.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

/// `<dir>/<prefix>_YYYYMMDD_HHMMSS.<ext>`
pub fn timestamped_path(dir: &Path, prefix: &str, ext: &str) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("{}_{}.{}", prefix, stamp, ext))
}
