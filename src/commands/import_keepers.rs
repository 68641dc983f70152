//! Load the definitive keeper list for a season

use std::path::PathBuf;

use serde::Deserialize;

use crate::{
    cli::types::{EspnId, PlayerId, Season, TeamId},
    core::csv_io::{read_numbered, Numbered},
    error::LeagueError,
    storage::{KeeperRecord, LeagueDatabase},
    Result,
};

/// Default `designation_date` for imported keepers.
pub const DEFAULT_KEEPER_DATE: &str = "2025-08-25 14:30:48";

/// One row of a keepers CSV
#[derive(Debug, Clone, Deserialize)]
pub struct KeeperCsvRow {
    #[serde(rename = "Team ID")]
    pub team_id: TeamId,
    pub player_id: PlayerId,
    #[serde(rename = "ESPN ID", default)]
    pub espn_id: Option<String>,
}

/// Parameters for `import-keepers`.
#[derive(Debug, Clone)]
pub struct ImportKeepersParams {
    pub input: PathBuf,
    pub season: Season,
    pub designation_date: String,
    pub expected_total: u32,
}

/// Outcome of `import-keepers`.
#[derive(Debug, Clone, PartialEq)]
pub struct KeeperImportReport {
    pub deleted: usize,
    pub inserted: usize,
    pub total: u32,
    pub matches_expected: bool,
}

/// Turn CSV rows into keeper records; a non-numeric ESPN ID fails with
/// the row number.
pub fn keeper_records(
    rows: &[Numbered<KeeperCsvRow>],
    season: Season,
    designation_date: &str,
) -> Result<Vec<KeeperRecord>> {
    rows.iter()
        .map(|numbered| {
            let espn_id = EspnId::parse_optional(numbered.record.espn_id.as_deref()).map_err(
                |e| LeagueError::InvalidRow {
                    row: numbered.row,
                    message: e.to_string(),
                },
            )?;
            Ok(KeeperRecord {
                season,
                team_id: numbered.record.team_id,
                player_id: numbered.record.player_id,
                espn_id,
                designation_date: designation_date.to_string(),
            })
        })
        .collect()
}

/// Replace the season's keepers with the CSV contents.
pub fn handle_import_keepers(
    db: &mut LeagueDatabase,
    params: ImportKeepersParams,
) -> Result<KeeperImportReport> {
    let rows: Vec<Numbered<KeeperCsvRow>> = read_numbered(&params.input)?;
    let records = keeper_records(&rows, params.season, &params.designation_date)?;

    println!("Importing {} keepers for {}...", records.len(), params.season);
    let (deleted, inserted) = db.replace_keepers(params.season, &records)?;
    println!("  Deleted {} existing keepers", deleted);
    println!("✓ Inserted {} keepers", inserted);

    println!("\nVerification - Keepers per team:");
    let mut total = 0;
    for (team_id, team_name, count) in db.keeper_counts_by_team(params.season)? {
        println!("  Team {} ({}): {} keepers", team_id, team_name, count);
        total += count;
    }
    println!("\n  TOTAL: {} keepers", total);

    let matches_expected = total == params.expected_total;
    if matches_expected {
        println!("✓ All {} keepers imported correctly", params.expected_total);
    } else {
        println!(
            "⚠ Expected {} keepers, got {}",
            params.expected_total, total
        );
    }

    Ok(KeeperImportReport {
        deleted,
        inserted,
        total,
        matches_expected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::csv_io::parse_numbered;

    #[test]
    fn test_keeper_records_optional_espn_id() {
        let csv = "Team ID,player_id,ESPN ID\n1,100,3139477\n2,101,\n";
        let rows = parse_numbered::<KeeperCsvRow>(csv).unwrap();
        let records = keeper_records(&rows, Season::new(2025), DEFAULT_KEEPER_DATE).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].espn_id, Some(EspnId::new(3139477)));
        assert_eq!(records[1].espn_id, None);
        assert_eq!(records[1].designation_date, DEFAULT_KEEPER_DATE);
    }

    #[test]
    fn test_keeper_records_bad_espn_id_reports_row() {
        let csv = "Team ID,player_id,ESPN ID\n1,100,abc\n";
        let rows = parse_numbered::<KeeperCsvRow>(csv).unwrap();
        match keeper_records(&rows, Season::new(2025), DEFAULT_KEEPER_DATE) {
            Err(LeagueError::InvalidRow { row, .. }) => assert_eq!(row, 2),
            other => panic!("Expected InvalidRow, got {:?}", other),
        }
    }
}
