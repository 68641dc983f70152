//! `player_stats` upserts and import verification

use super::{models::PlayerStatLine, schema::LeagueDatabase};
use anyhow::Result;
use rusqlite::params;

/// Totals printed after a stats import
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsSummary {
    pub total: u32,
    /// (game type, records, distinct players)
    pub by_game_type: Vec<(String, u32, u32)>,
    pub min_season: Option<u16>,
    pub max_season: Option<u16>,
    pub unique_players: u32,
    pub fumbles_lost: i64,
    pub two_point_conversions: i64,
}

impl LeagueDatabase {
    /// Insert or overwrite one batch of stat lines keyed by
    /// (player name, season, week, team)
    pub fn upsert_player_stats(&mut self, batch: &[PlayerStatLine]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut written = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO player_stats (
                    player_name, season, week, game_type, game_date, team, opponent,
                    pass_completions, pass_attempts, pass_yards, pass_touchdowns, interceptions,
                    rush_attempts, rush_yards, rush_touchdowns,
                    receptions, receiving_yards, receiving_touchdowns,
                    fumbles_lost, two_point_conversions,
                    fg_under_30, fg_30_39, fg_40_49, fg_50_plus, extra_points_made
                 ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                 ON CONFLICT(player_name, season, week, team) DO UPDATE SET
                    pass_completions = excluded.pass_completions,
                    pass_attempts = excluded.pass_attempts,
                    pass_yards = excluded.pass_yards,
                    pass_touchdowns = excluded.pass_touchdowns,
                    interceptions = excluded.interceptions,
                    rush_attempts = excluded.rush_attempts,
                    rush_yards = excluded.rush_yards,
                    rush_touchdowns = excluded.rush_touchdowns,
                    receptions = excluded.receptions,
                    receiving_yards = excluded.receiving_yards,
                    receiving_touchdowns = excluded.receiving_touchdowns,
                    fumbles_lost = excluded.fumbles_lost,
                    two_point_conversions = excluded.two_point_conversions,
                    fg_under_30 = excluded.fg_under_30,
                    fg_30_39 = excluded.fg_30_39,
                    fg_40_49 = excluded.fg_40_49,
                    fg_50_plus = excluded.fg_50_plus,
                    extra_points_made = excluded.extra_points_made",
            )?;

            for s in batch {
                written += stmt.execute(params![
                    s.player_name,
                    s.season,
                    s.week,
                    s.game_type,
                    s.game_date,
                    s.team,
                    s.opponent,
                    s.pass_completions,
                    s.pass_attempts,
                    s.pass_yards,
                    s.pass_touchdowns,
                    s.interceptions,
                    s.rush_attempts,
                    s.rush_yards,
                    s.rush_touchdowns,
                    s.receptions,
                    s.receiving_yards,
                    s.receiving_touchdowns,
                    s.fumbles_lost,
                    s.two_point_conversions,
                    s.fg_under_30,
                    s.fg_30_39,
                    s.fg_40_49,
                    s.fg_50_plus,
                    s.extra_points_made,
                ])?;
            }
        }
        tx.commit()?;
        Ok(written)
    }

    pub fn stats_summary(&self) -> Result<StatsSummary> {
        let mut summary = self.conn.query_row(
            "SELECT COUNT(*), MIN(season), MAX(season), COUNT(DISTINCT player_name),
                    COALESCE(SUM(fumbles_lost), 0), COALESCE(SUM(two_point_conversions), 0)
             FROM player_stats",
            [],
            |row| {
                Ok(StatsSummary {
                    total: row.get(0)?,
                    min_season: row.get(1)?,
                    max_season: row.get(2)?,
                    unique_players: row.get(3)?,
                    fumbles_lost: row.get(4)?,
                    two_point_conversions: row.get(5)?,
                    by_game_type: Vec::new(),
                })
            },
        )?;

        let mut stmt = self.conn.prepare(
            "SELECT COALESCE(game_type, 'NULL'), COUNT(*), COUNT(DISTINCT player_name)
             FROM player_stats
             GROUP BY game_type
             ORDER BY game_type",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?;
        summary.by_game_type = rows.collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(summary)
    }
}
