//! Turn nflverse rows into `player_stats` lines.

use super::{
    fumbles::{attribute_fumbles, weekly_teams},
    PlayByPlayRow, ScheduleRow, WeeklyStatRow,
};
use crate::storage::PlayerStatLine;
use std::collections::HashMap;

/// Counts reported after processing.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProcessReport {
    pub fumble_plays: usize,
    pub attributed_fumble_keys: usize,
    /// Weekly rows with no scheduled game for their team that week
    pub unscheduled: usize,
    /// Rows with nothing worth storing
    pub empty: usize,
}

/// Join weekly stats to the schedule, apply fumble attribution, compute the
/// league's derived columns and drop rows without any counted stat.
/// Output is sorted by season, week, player name.
pub fn build_stat_lines(
    weekly: &[WeeklyStatRow],
    schedule: &[ScheduleRow],
    plays: &[PlayByPlayRow],
) -> (Vec<PlayerStatLine>, ProcessReport) {
    let mut report = ProcessReport {
        fumble_plays: plays.iter().filter(|p| p.fumble == 1).count(),
        ..Default::default()
    };

    let teams = weekly_teams(weekly);
    let fumbles = attribute_fumbles(plays, &teams);
    report.attributed_fumble_keys = fumbles.len();

    // (season, week, team) → game
    let mut games: HashMap<(u16, u16, &str), &ScheduleRow> = HashMap::new();
    for game in schedule {
        games.insert((game.season, game.week, game.home_team.as_str()), game);
        games.insert((game.season, game.week, game.away_team.as_str()), game);
    }

    let mut lines = Vec::new();
    for row in weekly {
        let (Some(name), Some(team)) = (row.player_display_name.as_deref(), row.recent_team.as_deref())
        else {
            report.empty += 1;
            continue;
        };

        let Some(game) = games.get(&(row.season, row.week, team)) else {
            report.unscheduled += 1;
            continue;
        };
        let Some(game_date) = game.gameday.clone() else {
            report.unscheduled += 1;
            continue;
        };

        let opponent = if game.home_team == team {
            game.away_team.clone()
        } else {
            game.home_team.clone()
        };

        let attributed = row.player_id.as_ref().and_then(|player_id| {
            fumbles
                .get(&super::FumbleKey {
                    player_id: player_id.clone(),
                    season: row.season,
                    week: row.week,
                    team: team.to_string(),
                })
                .copied()
        });
        let fumbles_lost = attributed.unwrap_or(
            row.rushing_fumbles_lost + row.receiving_fumbles_lost + row.sack_fumbles_lost,
        );

        let line = PlayerStatLine {
            player_name: name.to_string(),
            season: row.season,
            week: row.week,
            game_type: game.game_type.clone(),
            game_date,
            team: team.to_string(),
            opponent: Some(opponent),
            pass_completions: row.completions,
            pass_attempts: row.attempts,
            pass_yards: row.passing_yards,
            pass_touchdowns: row.passing_tds,
            interceptions: row.interceptions,
            rush_attempts: row.carries,
            rush_yards: row.rushing_yards,
            rush_touchdowns: row.rushing_tds,
            receptions: row.receptions,
            receiving_yards: row.receiving_yards,
            receiving_touchdowns: row.receiving_tds,
            fumbles_lost,
            two_point_conversions: row.passing_2pt_conversions
                + row.rushing_2pt_conversions
                + row.receiving_2pt_conversions,
            fg_under_30: row.fg_made_0_19 + row.fg_made_20_29,
            fg_30_39: row.fg_made_30_39,
            fg_40_49: row.fg_made_40_49,
            fg_50_plus: row.fg_made_50_59 + row.fg_made_60_plus,
            extra_points_made: row.pat_made,
        };

        if line.has_meaningful_stats() {
            lines.push(line);
        } else {
            report.empty += 1;
        }
    }

    lines.sort_by(|a, b| {
        (a.season, a.week, &a.player_name).cmp(&(b.season, b.week, &b.player_name))
    });
    (lines, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    fn schedule() -> Vec<ScheduleRow> {
        vec![
            ScheduleRow {
                season: 2024,
                week: 1,
                game_type: s("REG"),
                gameday: s("2024-09-08"),
                home_team: "IND".to_string(),
                away_team: "HOU".to_string(),
            },
            ScheduleRow {
                season: 2024,
                week: 1,
                game_type: s("REG"),
                gameday: s("2024-09-05"),
                home_team: "KC".to_string(),
                away_team: "BAL".to_string(),
            },
        ]
    }

    fn weekly(id: &str, name: &str, team: &str) -> WeeklyStatRow {
        WeeklyStatRow {
            player_id: s(id),
            player_display_name: s(name),
            recent_team: s(team),
            season: 2024,
            week: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_joins_game_played_by_players_team() {
        let mut mixon = weekly("P1", "Joe Mixon", "HOU");
        mixon.carries = 30;
        mixon.rushing_yards = 159;
        mixon.rushing_2pt_conversions = 1;
        let mut mahomes = weekly("P2", "Patrick Mahomes", "KC");
        mahomes.completions = 20;
        mahomes.receiving_2pt_conversions = 1;
        mahomes.passing_2pt_conversions = 1;

        let (lines, report) = build_stat_lines(&[mixon, mahomes], &schedule(), &[]);

        assert_eq!(report.unscheduled, 0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].player_name, "Joe Mixon");
        assert_eq!(lines[0].game_date, "2024-09-08");
        assert_eq!(lines[0].opponent.as_deref(), Some("IND"));
        assert_eq!(lines[0].two_point_conversions, 1);
        assert_eq!(lines[1].opponent.as_deref(), Some("BAL"));
        assert_eq!(lines[1].game_date, "2024-09-05");
        assert_eq!(lines[1].two_point_conversions, 2);
    }

    #[test]
    fn test_field_goal_buckets() {
        let mut kicker = weekly("K1", "Ka'imi Fairbairn", "HOU");
        kicker.fg_made_0_19 = 1;
        kicker.fg_made_20_29 = 1;
        kicker.fg_made_40_49 = 2;
        kicker.fg_made_50_59 = 1;
        kicker.fg_made_60_plus = 1;
        kicker.pat_made = 3;

        let (lines, _) = build_stat_lines(&[kicker], &schedule(), &[]);
        let line = &lines[0];
        assert_eq!(line.fg_under_30, 2);
        assert_eq!(line.fg_30_39, 0);
        assert_eq!(line.fg_40_49, 2);
        assert_eq!(line.fg_50_plus, 2);
        assert_eq!(line.extra_points_made, 3);
    }

    #[test]
    fn test_attributed_fumbles_override_weekly_counts() {
        let mut mixon = weekly("P1", "Joe Mixon", "HOU");
        mixon.carries = 10;
        mixon.rushing_fumbles_lost = 1;
        let mut kelce = weekly("P3", "Travis Kelce", "KC");
        kelce.receptions = 5;
        kelce.receiving_fumbles_lost = 1;
        kelce.sack_fumbles_lost = 1;

        // Mixon's fumble was recovered by his own team
        let play = PlayByPlayRow {
            season: 2024,
            week: 1,
            desc: s("J.Mixon FUMBLES, RECOVERED by HOU"),
            posteam: s("HOU"),
            defteam: s("IND"),
            fumble: 1,
            fumble_lost: 0,
            fumbled_1_player_id: s("P1"),
            fumble_recovery_1_team: s("HOU"),
            ..Default::default()
        };

        let (lines, report) = build_stat_lines(&[mixon, kelce], &schedule(), &[play]);
        assert_eq!(report.fumble_plays, 1);
        assert_eq!(lines[0].fumbles_lost, 0);
        // No play-by-play for Kelce: weekly columns are summed
        assert_eq!(lines[1].fumbles_lost, 2);
    }

    #[test]
    fn test_drops_empty_and_unscheduled_rows() {
        let bench = weekly("P4", "Bench Guy", "HOU");
        let mut bye = weekly("P5", "Bye Week", "DAL");
        bye.carries = 3;
        let mut nameless = weekly("P6", "", "HOU");
        nameless.player_display_name = None;
        nameless.carries = 1;

        let (lines, report) = build_stat_lines(&[bench, bye, nameless], &schedule(), &[]);
        assert!(lines.is_empty());
        assert_eq!(report.unscheduled, 1);
        assert_eq!(report.empty, 2);
    }

    #[test]
    fn test_sorted_by_season_week_name() {
        let mut b = weekly("P1", "Zed", "HOU");
        b.carries = 1;
        let mut a = weekly("P2", "Abe", "KC");
        a.carries = 1;
        let mut earlier = weekly("P3", "Mid", "HOU");
        earlier.carries = 1;
        earlier.season = 2023;
        let mut schedule = schedule();
        schedule.push(ScheduleRow {
            season: 2023,
            week: 1,
            ..schedule[0].clone()
        });

        let (lines, _) = build_stat_lines(&[b, a, earlier], &schedule, &[]);
        let names: Vec<&str> = lines.iter().map(|l| l.player_name.as_str()).collect();
        assert_eq!(names, vec!["Mid", "Abe", "Zed"]);
    }
}
