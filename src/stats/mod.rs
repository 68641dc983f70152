//! NFL weekly player statistics from nflverse CSV releases.
//!
//! Three inputs feed the `player_stats` table:
//! - weekly player stats (one row per player per game)
//! - schedules (game date, home and away team, game type)
//! - play-by-play (used only to attribute lost fumbles to the right player)
//!
//! nflverse writes missing values as `NA` and some counts as floats, so the
//! row types here parse leniently.

pub mod fumbles;
pub mod process;

use serde::{Deserialize, Deserializer};

pub use fumbles::{attribute_fumbles, FumbleKey};
pub use process::{build_stat_lines, ProcessReport};

/// One row of the nflverse weekly player stats file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WeeklyStatRow {
    #[serde(default, deserialize_with = "na_string")]
    pub player_id: Option<String>,
    #[serde(default, deserialize_with = "na_string")]
    pub player_display_name: Option<String>,
    #[serde(alias = "team", default, deserialize_with = "na_string")]
    pub recent_team: Option<String>,
    pub season: u16,
    pub week: u16,
    #[serde(default, deserialize_with = "count")]
    pub completions: i64,
    #[serde(default, deserialize_with = "count")]
    pub attempts: i64,
    #[serde(default, deserialize_with = "count")]
    pub passing_yards: i64,
    #[serde(default, deserialize_with = "count")]
    pub passing_tds: i64,
    #[serde(default, deserialize_with = "count")]
    pub interceptions: i64,
    #[serde(default, deserialize_with = "count")]
    pub sack_fumbles_lost: i64,
    #[serde(default, deserialize_with = "count")]
    pub passing_2pt_conversions: i64,
    #[serde(default, deserialize_with = "count")]
    pub carries: i64,
    #[serde(default, deserialize_with = "count")]
    pub rushing_yards: i64,
    #[serde(default, deserialize_with = "count")]
    pub rushing_tds: i64,
    #[serde(default, deserialize_with = "count")]
    pub rushing_fumbles_lost: i64,
    #[serde(default, deserialize_with = "count")]
    pub rushing_2pt_conversions: i64,
    #[serde(default, deserialize_with = "count")]
    pub receptions: i64,
    #[serde(default, deserialize_with = "count")]
    pub receiving_yards: i64,
    #[serde(default, deserialize_with = "count")]
    pub receiving_tds: i64,
    #[serde(default, deserialize_with = "count")]
    pub receiving_fumbles_lost: i64,
    #[serde(default, deserialize_with = "count")]
    pub receiving_2pt_conversions: i64,
    #[serde(default, deserialize_with = "count")]
    pub fg_made_0_19: i64,
    #[serde(default, deserialize_with = "count")]
    pub fg_made_20_29: i64,
    #[serde(default, deserialize_with = "count")]
    pub fg_made_30_39: i64,
    #[serde(default, deserialize_with = "count")]
    pub fg_made_40_49: i64,
    #[serde(default, deserialize_with = "count")]
    pub fg_made_50_59: i64,
    #[serde(rename = "fg_made_60_", default, deserialize_with = "count")]
    pub fg_made_60_plus: i64,
    #[serde(default, deserialize_with = "count")]
    pub pat_made: i64,
}

/// One row of the nflverse schedules file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScheduleRow {
    pub season: u16,
    pub week: u16,
    #[serde(default, deserialize_with = "na_string")]
    pub game_type: Option<String>,
    #[serde(default, deserialize_with = "na_string")]
    pub gameday: Option<String>,
    pub home_team: String,
    pub away_team: String,
}

/// The play-by-play columns fumble attribution needs.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlayByPlayRow {
    pub season: u16,
    pub week: u16,
    #[serde(default, deserialize_with = "na_string")]
    pub desc: Option<String>,
    #[serde(default, deserialize_with = "na_string")]
    pub posteam: Option<String>,
    #[serde(default, deserialize_with = "na_string")]
    pub defteam: Option<String>,
    #[serde(default, deserialize_with = "count")]
    pub fumble: i64,
    #[serde(default, deserialize_with = "count")]
    pub fumble_lost: i64,
    #[serde(default, deserialize_with = "na_string")]
    pub fumbled_1_player_id: Option<String>,
    #[serde(default, deserialize_with = "na_string")]
    pub fumbled_2_player_id: Option<String>,
    #[serde(default, deserialize_with = "na_string")]
    pub fumble_recovery_1_team: Option<String>,
    #[serde(default, deserialize_with = "na_string")]
    pub fumble_recovery_2_team: Option<String>,
    #[serde(default, deserialize_with = "na_string")]
    pub fumble_recovery_1_player_id: Option<String>,
    #[serde(default, deserialize_with = "na_string")]
    pub punt_returner_player_id: Option<String>,
    #[serde(default, deserialize_with = "na_string")]
    pub kickoff_returner_player_id: Option<String>,
    #[serde(default, deserialize_with = "na_string")]
    pub interception_player_id: Option<String>,
}

/// `NA` and blank cells become `None`.
fn na_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && s != "NA"))
}

/// Integer counts written as `3`, `3.0`, `NA` or blank (zero).
fn count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = na_string(deserializer)?;
    match raw {
        None => Ok(0),
        Some(s) => match s.parse::<i64>() {
            Ok(n) => Ok(n),
            Err(_) => {
                let f = s.parse::<f64>().map_err(serde::de::Error::custom)?;
                // Counts arrive as "3.0" but never as "2.5"
                if f.is_finite() && f.fract() == 0.0 {
                    Ok(f as i64)
                } else {
                    Err(serde::de::Error::custom(format!("not a whole count: {}", s)))
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::csv_io::parse_numbered;

    #[test]
    fn test_weekly_rows_parse_na_and_floats() {
        let csv = "player_id,player_display_name,recent_team,season,week,carries,rushing_yards,rushing_fumbles_lost,fg_made_60_\n\
                   00-0033045,Joe Mixon,HOU,2024,3,20.0,110,NA,\n";
        let rows: Vec<WeeklyStatRow> = parse_numbered(csv)
            .unwrap()
            .into_iter()
            .map(|n| n.record)
            .collect();

        let row = &rows[0];
        assert_eq!(row.player_id.as_deref(), Some("00-0033045"));
        assert_eq!(row.carries, 20);
        assert_eq!(row.rushing_yards, 110);
        assert_eq!(row.rushing_fumbles_lost, 0);
        assert_eq!(row.fg_made_60_plus, 0);
        // Columns absent from the file default to zero
        assert_eq!(row.pat_made, 0);
    }

    #[test]
    fn test_weekly_rows_accept_team_column() {
        let csv = "player_id,player_display_name,team,season,week\nX,Y,KC,2024,1\n";
        let rows: Vec<WeeklyStatRow> = parse_numbered(csv)
            .unwrap()
            .into_iter()
            .map(|n| n.record)
            .collect();
        assert_eq!(rows[0].recent_team.as_deref(), Some("KC"));
    }

    #[test]
    fn test_pbp_rows_parse_na() {
        let csv = "season,week,desc,posteam,defteam,fumble,fumble_lost,fumbled_1_player_id,fumble_recovery_1_team\n\
                   2024,1,J.Mixon fumbles,HOU,IND,1,0,00-0033045,NA\n";
        let rows: Vec<PlayByPlayRow> = parse_numbered(csv)
            .unwrap()
            .into_iter()
            .map(|n| n.record)
            .collect();

        assert_eq!(rows[0].fumble, 1);
        assert_eq!(rows[0].fumble_recovery_1_team, None);
        assert_eq!(rows[0].fumbled_2_player_id, None);
    }

    #[test]
    fn test_count_rejects_text() {
        let csv = "season,week,fumble\n2024,1,yes\n";
        assert!(parse_numbered::<PlayByPlayRow>(csv).is_err());
    }

    #[test]
    fn test_count_rejects_fractional_values() {
        let csv = "season,week,fumble\n2024,1,2.5\n";
        assert!(parse_numbered::<PlayByPlayRow>(csv).is_err());

        let csv = "season,week,fumble\n2024,1,1.0\n";
        let rows = parse_numbered::<PlayByPlayRow>(csv).unwrap();
        assert_eq!(rows[0].record.fumble, 1);
    }
}
