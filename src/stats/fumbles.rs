//! Lost-fumble attribution from play-by-play data.
//!
//! The play-level `fumble_lost` flag says whether the offense lost the ball,
//! not which player lost it. On plays with two fumblers, laterals or a
//! fumbler who recovers his own fumble, each fumbler is charged separately
//! by comparing the recovering team against the fumbler's own team.

use super::{PlayByPlayRow, WeeklyStatRow};
use std::collections::HashMap;

/// Attributed lost fumbles are summed per player, game week and team.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FumbleKey {
    pub player_id: String,
    pub season: u16,
    pub week: u16,
    pub team: String,
}

/// (player id, season, week) → the team the player played for that week.
pub type WeeklyTeams = HashMap<(String, u16, u16), String>;

/// Index the weekly stats by player and week.
pub fn weekly_teams(rows: &[WeeklyStatRow]) -> WeeklyTeams {
    rows.iter()
        .filter_map(|row| {
            let player_id = row.player_id.clone()?;
            let team = row.recent_team.clone()?;
            Some(((player_id, row.season, row.week), team))
        })
        .collect()
}

/// The team a fumbler was playing for on this play.
///
/// Returners and interceptors are on the defensive side of the scrimmage
/// line, except kickoff returners who receive the ball for the offense.
/// Anyone else is looked up in the weekly stats, falling back to the
/// possession team.
pub fn fumbler_team(play: &PlayByPlayRow, player_id: &str, weekly: &WeeklyTeams) -> Option<String> {
    let is = |column: &Option<String>| column.as_deref() == Some(player_id);

    if is(&play.punt_returner_player_id) {
        play.defteam.clone()
    } else if is(&play.kickoff_returner_player_id) {
        play.posteam.clone()
    } else if is(&play.interception_player_id) {
        play.defteam.clone()
    } else {
        weekly
            .get(&(player_id.to_string(), play.season, play.week))
            .cloned()
            .or_else(|| play.posteam.clone())
    }
}

/// Whether the first listed fumbler lost the ball (1) or not (0).
pub fn first_fumbler_lost(play: &PlayByPlayRow, team: &str) -> i64 {
    let desc = play.desc.as_deref().unwrap_or("").to_lowercase();
    let rec1 = play.fumble_recovery_1_team.as_deref();
    let rec2 = play.fumble_recovery_2_team.as_deref();
    let has_second_fumbler = play.fumbled_2_player_id.is_some();
    let lost_unless = |recovered_by: Option<&str>| i64::from(recovered_by != Some(team));

    if rec1.is_none() {
        return play.fumble_lost;
    }

    if desc.contains("lateral")
        && has_second_fumbler
        && rec1 == Some(team)
        && rec2 == Some(team)
        && play.fumble_lost == 1
    {
        return 1;
    }

    // Fumbled, recovered, maybe fumbled again: the final recovery decides
    if desc.contains("fumbles") && desc.contains("recovers") && !has_second_fumbler {
        return lost_unless(rec2.or(rec1));
    }

    if has_second_fumbler {
        return lost_unless(rec1);
    }

    if rec2.is_some() {
        return lost_unless(rec2);
    }

    lost_unless(rec1)
}

/// Whether the second listed fumbler lost the ball (1) or not (0).
pub fn second_fumbler_lost(play: &PlayByPlayRow, player_id: &str, team: &str) -> i64 {
    let desc = play.desc.as_deref().unwrap_or("").to_lowercase();
    let rec1 = play.fumble_recovery_1_team.as_deref();
    let rec2 = play.fumble_recovery_2_team.as_deref();

    if desc.contains("lateral") && rec1 == Some(team) && rec2 == Some(team) && play.fumble_lost == 1 {
        return 1;
    }

    if rec2.is_none() {
        // The first recoverer fumbled it away: only a touchback costs him
        let recovered_first = play.fumble_recovery_1_player_id.as_deref() == Some(player_id);
        if recovered_first && play.fumbled_1_player_id != play.fumbled_2_player_id {
            return i64::from(desc.contains("touchback"));
        }
        return play.fumble_lost;
    }

    i64::from(rec2 != Some(team))
}

/// Charge every fumbler on every fumble play and sum the results.
///
/// Fumblers whose team cannot be determined are left out.
pub fn attribute_fumbles(plays: &[PlayByPlayRow], weekly: &WeeklyTeams) -> HashMap<FumbleKey, i64> {
    let mut totals: HashMap<FumbleKey, i64> = HashMap::new();
    let mut charge = |player_id: &str, play: &PlayByPlayRow, team: String, lost: i64| {
        let key = FumbleKey {
            player_id: player_id.to_string(),
            season: play.season,
            week: play.week,
            team,
        };
        *totals.entry(key).or_insert(0) += lost;
    };

    for play in plays.iter().filter(|p| p.fumble == 1) {
        if let Some(player_id) = play.fumbled_1_player_id.as_deref() {
            if let Some(team) = fumbler_team(play, player_id, weekly) {
                let lost = first_fumbler_lost(play, &team);
                charge(player_id, play, team, lost);
            }
        }

        if let Some(player_id) = play.fumbled_2_player_id.as_deref() {
            // A second fumbler who made the first recovery was playing for
            // the recovering team
            let team = if play.fumble_recovery_1_player_id.as_deref() == Some(player_id) {
                play.fumble_recovery_1_team.clone()
            } else {
                fumbler_team(play, player_id, weekly)
            };
            if let Some(team) = team {
                let lost = second_fumbler_lost(play, player_id, &team);
                charge(player_id, play, team, lost);
            }
        }
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    fn fumble_play(desc: &str) -> PlayByPlayRow {
        PlayByPlayRow {
            season: 2024,
            week: 5,
            desc: s(desc),
            posteam: s("HOU"),
            defteam: s("JAX"),
            fumble: 1,
            fumbled_1_player_id: s("P1"),
            ..Default::default()
        }
    }

    #[test]
    fn test_first_fumbler_without_recovery_uses_play_flag() {
        let mut play = fumble_play("J.Mixon FUMBLES, ball out of bounds");
        play.fumble_lost = 0;
        assert_eq!(first_fumbler_lost(&play, "HOU"), 0);
        play.fumble_lost = 1;
        assert_eq!(first_fumbler_lost(&play, "HOU"), 1);
    }

    #[test]
    fn test_first_fumbler_standard_recovery() {
        let mut play = fumble_play("J.Mixon FUMBLES, RECOVERED by JAX-J.Allen");
        play.fumble_recovery_1_team = s("JAX");
        play.fumble_lost = 1;
        assert_eq!(first_fumbler_lost(&play, "HOU"), 1);

        play.fumble_recovery_1_team = s("HOU");
        assert_eq!(first_fumbler_lost(&play, "HOU"), 0);
    }

    #[test]
    fn test_first_fumbler_lateral_lost_by_offense() {
        let mut play = fumble_play("C.Stroud lateral to J.Mixon, J.Mixon fumbles");
        play.fumbled_2_player_id = s("P2");
        play.fumble_recovery_1_team = s("HOU");
        play.fumble_recovery_2_team = s("HOU");
        play.fumble_lost = 1;
        assert_eq!(first_fumbler_lost(&play, "HOU"), 1);

        play.fumble_lost = 0;
        // Falls through to the two-fumbler rule
        assert_eq!(first_fumbler_lost(&play, "HOU"), 0);
    }

    #[test]
    fn test_first_fumbler_recovers_own_fumble_then_loses_it() {
        let mut play = fumble_play("C.Stroud fumbles, recovers at HOU 20. C.Stroud fumbles");
        play.fumble_recovery_1_team = s("HOU");
        play.fumble_recovery_2_team = s("JAX");
        assert_eq!(first_fumbler_lost(&play, "HOU"), 1);

        // Only one recovery recorded: that one is final
        play.fumble_recovery_2_team = None;
        assert_eq!(first_fumbler_lost(&play, "HOU"), 0);
    }

    #[test]
    fn test_first_fumbler_with_second_recovery_only() {
        let mut play = fumble_play("J.Mixon FUMBLES, touched at HOU 30, RECOVERED by JAX");
        play.fumble_recovery_1_team = s("HOU");
        play.fumble_recovery_2_team = s("JAX");
        assert_eq!(first_fumbler_lost(&play, "HOU"), 1);
    }

    #[test]
    fn test_second_fumbler_rules() {
        let mut play = fumble_play("J.Mixon FUMBLES, RECOVERED by JAX-J.Allen. J.Allen FUMBLES");
        play.fumbled_2_player_id = s("P2");
        play.fumble_recovery_1_team = s("JAX");
        play.fumble_recovery_1_player_id = s("P2");
        play.fumble_lost = 1;

        // Recoverer who fumbles it away with no second recovery
        assert_eq!(second_fumbler_lost(&play, "P2", "JAX"), 0);
        play.desc = s("... J.Allen FUMBLES, ball out of end zone, Touchback.");
        assert_eq!(second_fumbler_lost(&play, "P2", "JAX"), 1);

        // Not the recoverer: play-level flag
        assert_eq!(second_fumbler_lost(&play, "P3", "JAX"), 1);

        // Second recovery decides
        play.fumble_recovery_2_team = s("HOU");
        assert_eq!(second_fumbler_lost(&play, "P2", "JAX"), 1);
        play.fumble_recovery_2_team = s("JAX");
        assert_eq!(second_fumbler_lost(&play, "P2", "JAX"), 0);
    }

    #[test]
    fn test_fumbler_team_special_teams() {
        let weekly: WeeklyTeams = [(("P9".to_string(), 2024, 5), "TEN".to_string())]
            .into_iter()
            .collect();
        let mut play = fumble_play("punt");
        play.punt_returner_player_id = s("P1");
        assert_eq!(fumbler_team(&play, "P1", &weekly).as_deref(), Some("JAX"));

        let mut play = fumble_play("kickoff");
        play.kickoff_returner_player_id = s("P1");
        assert_eq!(fumbler_team(&play, "P1", &weekly).as_deref(), Some("HOU"));

        let mut play = fumble_play("interception");
        play.interception_player_id = s("P1");
        assert_eq!(fumbler_team(&play, "P1", &weekly).as_deref(), Some("JAX"));

        let play = fumble_play("run");
        assert_eq!(fumbler_team(&play, "P9", &weekly).as_deref(), Some("TEN"));
        assert_eq!(fumbler_team(&play, "P1", &weekly).as_deref(), Some("HOU"));
    }

    #[test]
    fn test_attribute_fumbles_sums_per_player_week_team() {
        let weekly = WeeklyTeams::new();
        let mut lost = fumble_play("J.Mixon FUMBLES, RECOVERED by JAX");
        lost.fumble_recovery_1_team = s("JAX");
        lost.fumble_lost = 1;
        let mut kept = fumble_play("J.Mixon FUMBLES, RECOVERED by HOU");
        kept.fumble_recovery_1_team = s("HOU");
        let not_a_fumble = PlayByPlayRow {
            fumble: 0,
            ..lost.clone()
        };

        let totals = attribute_fumbles(&[lost.clone(), lost, kept, not_a_fumble], &weekly);
        let key = FumbleKey {
            player_id: "P1".to_string(),
            season: 2024,
            week: 5,
            team: "HOU".to_string(),
        };
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[&key], 2);
    }

    #[test]
    fn test_second_fumbler_who_recovered_uses_recovery_team() {
        let weekly = WeeklyTeams::new();
        let mut play = fumble_play("J.Mixon FUMBLES, RECOVERED by JAX-J.Allen. J.Allen FUMBLES");
        play.fumbled_2_player_id = s("P2");
        play.fumble_recovery_1_team = s("JAX");
        play.fumble_recovery_1_player_id = s("P2");
        play.fumble_recovery_2_team = s("HOU");
        play.fumble_lost = 1;

        let totals = attribute_fumbles(&[play], &weekly);
        let p2 = FumbleKey {
            player_id: "P2".to_string(),
            season: 2024,
            week: 5,
            team: "JAX".to_string(),
        };
        assert_eq!(totals[&p2], 1);
        let p1 = FumbleKey {
            player_id: "P1".to_string(),
            team: "HOU".to_string(),
            ..p2.clone()
        };
        assert_eq!(totals[&p1], 1);
    }

    #[test]
    fn test_second_fumbler_lateral_lost_by_offense() {
        let weekly: WeeklyTeams = [(("P2".to_string(), 2024, 5), "HOU".to_string())]
            .into_iter()
            .collect();
        let mut play = fumble_play("C.Stroud pass to N.Collins, lateral to J.Mixon. J.Mixon FUMBLES");
        play.fumbled_2_player_id = s("P2");
        play.fumble_recovery_1_team = s("HOU");
        play.fumble_recovery_2_team = s("HOU");
        play.fumble_lost = 1;
        assert_eq!(second_fumbler_lost(&play, "P2", "HOU"), 1);

        let totals = attribute_fumbles(&[play.clone()], &weekly);
        let p2 = FumbleKey {
            player_id: "P2".to_string(),
            season: 2024,
            week: 5,
            team: "HOU".to_string(),
        };
        let p1 = FumbleKey {
            player_id: "P1".to_string(),
            ..p2.clone()
        };
        assert_eq!(totals[&p1], 1);
        assert_eq!(totals[&p2], 1);

        // Without the lateral the offense's own recovery keeps the ball
        play.desc = s("J.Mixon FUMBLES, RECOVERED by HOU. C.Stroud FUMBLES");
        assert_eq!(second_fumbler_lost(&play, "P2", "HOU"), 0);

        play.desc = s("lateral to J.Mixon. J.Mixon FUMBLES");
        play.fumble_lost = 0;
        assert_eq!(second_fumbler_lost(&play, "P2", "HOU"), 0);
    }

    #[test]
    fn test_second_fumbler_who_recovered_first_without_second_recovery() {
        let weekly = WeeklyTeams::new();
        let mut play = fumble_play(
            "J.Mixon FUMBLES, RECOVERED by JAX-J.Allen. J.Allen FUMBLES, ball out of end zone, Touchback.",
        );
        play.fumbled_2_player_id = s("P2");
        play.fumble_recovery_1_team = s("JAX");
        play.fumble_recovery_1_player_id = s("P2");
        play.fumble_lost = 1;

        let p2 = FumbleKey {
            player_id: "P2".to_string(),
            season: 2024,
            week: 5,
            team: "JAX".to_string(),
        };
        let p1 = FumbleKey {
            player_id: "P1".to_string(),
            team: "HOU".to_string(),
            ..p2.clone()
        };

        let totals = attribute_fumbles(&[play.clone()], &weekly);
        assert_eq!(totals[&p1], 1);
        assert_eq!(totals[&p2], 1);

        play.desc = s("J.Mixon FUMBLES, RECOVERED by JAX-J.Allen. J.Allen FUMBLES, out of bounds");
        let totals = attribute_fumbles(&[play.clone()], &weekly);
        assert_eq!(totals[&p1], 1);
        assert_eq!(totals[&p2], 0);

        // Same player listed twice: the play-level flag applies
        play.fumbled_2_player_id = s("P1");
        play.fumble_recovery_1_player_id = s("P1");
        assert_eq!(second_fumbler_lost(&play, "P1", "HOU"), 1);
    }
}
