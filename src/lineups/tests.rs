//! Tests for lineup CSV parsing and slot assignment

use super::*;
use crate::core::csv_io::parse_numbered;

const CSV: &str = "\
Week,Game Type,Team ID,Fantasy Team Name,Owner Name,Username,Position,Player,ESPN ID
1,primary,1,Dick Six,Lance Smith,lance,HeadCoach,Andy Reid,
1,primary,1,Dick Six,Lance Smith,lance,QB1,Patrick Mahomes (KC),3139477
1,primary,1,Dick Six,Lance Smith,lance,PK1,Ka'imi Fairbairn (HOU),2971573
1,primary,1,Dick Six,Lance Smith,lance,DEF1,Houston Texans (HOU),
2,primary,1,Dick Six,Lance Smith,lance,RB,Joe Mixon (HOU),3116385
2,primary,1,Dick Six,Lance Smith,lance,RB,Nick Chubb (HOU),3128720
2,bonus,1,Dick Six,Lance Smith,lance,RB,Joe Mixon (HOU),3116385
";

fn rows() -> Vec<LineupCsvRow> {
    parse_numbered::<LineupCsvRow>(CSV)
        .unwrap()
        .into_iter()
        .map(|n| n.record)
        .collect()
}

fn mapping() -> HashMap<EspnId, PlayerRef> {
    let mut mapping = HashMap::new();
    mapping.insert(
        EspnId::new(3139477),
        PlayerRef {
            player_id: PlayerId::new(100),
            display_name: "Patrick Mahomes".to_string(),
            position: "QB".to_string(),
        },
    );
    mapping
}

#[test]
fn test_rows_parse_without_player_id_column() {
    let rows = rows();
    assert_eq!(rows.len(), 7);
    assert_eq!(rows[0].espn_id_text(), None);
    assert_eq!(rows[1].espn_id_text(), Some("3139477"));
    assert_eq!(rows[1].direct_player_id(), None);
    assert!(rows[1].is_week_one_primary());
    assert!(!rows[4].is_week_one_primary());
}

#[test]
fn test_direct_player_id_column() {
    let csv = "Week,Game Type,Team ID,Fantasy Team Name,Owner Name,Username,Position,Player,ESPN ID,player_id\n\
               1,primary,3,Blue Crew,Kim Lee,kim,RC1,Rookie (DAL),,555\n\
               1,primary,3,Blue Crew,Kim Lee,kim,RC2,Other (DAL),,abc\n";
    let rows: Vec<LineupCsvRow> = parse_numbered(csv)
        .unwrap()
        .into_iter()
        .map(|n| n.record)
        .collect();

    assert_eq!(rows[0].direct_player_id(), Some(PlayerId::new(555)));
    assert_eq!(rows[1].direct_player_id(), None);
}

#[test]
fn test_classify() {
    let rows = rows();
    let mapping = mapping();

    assert_eq!(classify(&rows[0], &mapping), RowClass::NoEspnId);
    match classify(&rows[1], &mapping) {
        RowClass::Resolved { espn_id, player } => {
            assert_eq!(espn_id, EspnId::new(3139477));
            assert_eq!(player.player_id, PlayerId::new(100));
        }
        other => panic!("Expected Resolved, got {:?}", other),
    }
    assert_eq!(
        classify(&rows[2], &mapping),
        RowClass::Unknown {
            espn_id: "2971573".to_string()
        }
    );
}

#[test]
fn test_classify_non_numeric_espn_id_is_unknown() {
    let mut row = rows().remove(1);
    row.espn_id = Some("n/a".to_string());
    assert_eq!(
        classify(&row, &mapping()),
        RowClass::Unknown {
            espn_id: "n/a".to_string()
        }
    );
}

#[test]
fn test_extract_nfl_team_code() {
    assert_eq!(extract_nfl_team_code("Ka'imi Fairbairn (HOU)"), Some("HOU"));
    assert_eq!(
        extract_nfl_team_code("Gardner Minshew (II) (LV)"),
        Some("LV")
    );
    assert_eq!(extract_nfl_team_code("No Team"), None);
    assert_eq!(extract_nfl_team_code("Broken )("), None);
    assert_eq!(extract_nfl_team_code("Empty ()"), None);
}

#[test]
fn test_slot_counter_numbers_bare_labels_per_game_type() {
    let rows = rows();
    let mut counter = SlotCounter::new();
    let assigned: Vec<Option<(PositionType, u32)>> =
        rows.iter().map(|row| counter.assign(row)).collect();

    assert_eq!(assigned[0], None);
    assert_eq!(assigned[1], Some((PositionType::Quarterback, 1)));
    assert_eq!(assigned[3], Some((PositionType::Defense, 1)));
    assert_eq!(assigned[4], Some((PositionType::RunningBack, 1)));
    assert_eq!(assigned[5], Some((PositionType::RunningBack, 2)));
    // The bonus game starts its own count
    assert_eq!(assigned[6], Some((PositionType::RunningBack, 1)));
}
