//! Lineup submission and historical lineup queries

use super::{models::*, schema::LeagueDatabase};
use crate::cli::types::{EspnId, LineupId, NflTeamId, PlayerId, Season, TeamId, Week};
use anyhow::Result;
use rusqlite::{params, OptionalExtension};
use std::collections::HashMap;

/// Rows written by [`LeagueDatabase::insert_historical_lineups`]
#[derive(Debug, Default)]
pub struct HistoricalInsertOutcome {
    pub inserted: usize,
    /// (player name, error) for rows the database rejected
    pub failed: Vec<(String, String)>,
}

impl LeagueDatabase {
    /// Lineups locked on the submission itself or through the week's
    /// `lineup_locks` row, ordered by week, game type, team name
    pub fn locked_lineups(&self, season: Season, week: Option<Week>) -> Result<Vec<LockedLineup>> {
        let mut sql = String::from(
            "SELECT ls.lineup_id, ls.fantasy_team_id, ft.team_name, ft.head_coach,
                    u.first_name || ' ' || u.last_name, u.username,
                    ls.week_number, ls.game_type, ls.season_year, ls.head_coach
             FROM lineup_submissions ls
             JOIN fantasy_teams ft ON ls.fantasy_team_id = ft.team_id
             JOIN users u ON ft.user_id = u.user_id
             WHERE ls.season_year = ?1
               AND (ls.is_locked = 1 OR EXISTS (
                    SELECT 1 FROM lineup_locks ll
                    WHERE ll.week_number = ls.week_number
                      AND ll.season_year = ls.season_year
                      AND ll.is_locked = 1))",
        );
        if week.is_some() {
            sql.push_str(" AND ls.week_number = ?2");
        }
        sql.push_str(" ORDER BY ls.week_number, ls.game_type, ft.team_name");

        let mut stmt = self.conn.prepare(&sql)?;
        let map_row = |row: &rusqlite::Row<'_>| {
            Ok(LockedLineup {
                lineup_id: LineupId::new(row.get(0)?),
                fantasy_team_id: TeamId::new(row.get(1)?),
                team_name: row.get(2)?,
                team_head_coach: row.get(3)?,
                owner_name: row.get(4)?,
                username: row.get(5)?,
                week_number: Week::new(row.get(6)?),
                game_type: row.get(7)?,
                season_year: Season::new(row.get(8)?),
                lineup_head_coach: row.get(9)?,
            })
        };

        let rows = match week {
            Some(week) => stmt.query_map(params![season.as_u16(), week.as_u16()], map_row)?,
            None => stmt.query_map(params![season.as_u16()], map_row)?,
        };
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Positions of one lineup in display order. The NFL team comes from the
    /// player when there is one, otherwise from the position row (defenses).
    pub fn lineup_position_details(&self, lineup_id: LineupId) -> Result<Vec<LineupPositionDetail>> {
        let mut stmt = self.conn.prepare(
            "SELECT lp.position_type, lp.sort_order, lp.player_id, p.display_name, p.espn_id,
                    COALESCE(pt.team_code, nt.team_code),
                    COALESCE(pt.team_name, nt.team_name)
             FROM lineup_positions lp
             LEFT JOIN nfl_players p ON lp.player_id = p.player_id
             LEFT JOIN nfl_teams pt ON p.nfl_team_id = pt.nfl_team_id
             LEFT JOIN nfl_teams nt ON lp.nfl_team_id = nt.nfl_team_id
             WHERE lp.lineup_id = ?
             ORDER BY CASE lp.position_type
                        WHEN 'quarterback' THEN 1
                        WHEN 'running_back' THEN 2
                        WHEN 'receiver' THEN 3
                        WHEN 'place_kicker' THEN 4
                        WHEN 'defense' THEN 5
                      END,
                      lp.sort_order",
        )?;

        let rows = stmt.query_map(params![lineup_id.as_i64()], |row| {
            Ok(LineupPositionDetail {
                position_type: row.get(0)?,
                sort_order: row.get(1)?,
                player_id: row.get::<_, Option<u64>>(2)?.map(PlayerId::new),
                player_name: row.get(3)?,
                espn_id: row.get::<_, Option<u64>>(4)?.map(EspnId::new),
                team_code: row.get(5)?,
                team_name: row.get(6)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Lowest lineup id for (team, week, game type, season)
    pub fn find_lineup_id(
        &self,
        team_id: TeamId,
        week: Week,
        game_type: &str,
        season: Season,
    ) -> Result<Option<LineupId>> {
        let id = self
            .conn
            .query_row(
                "SELECT MIN(lineup_id) FROM lineup_submissions
                 WHERE fantasy_team_id = ? AND week_number = ? AND game_type = ? AND season_year = ?",
                params![team_id.as_u32(), week.as_u16(), game_type, season.as_u16()],
                |row| row.get::<_, Option<i64>>(0),
            )
            .optional()?
            .flatten();
        Ok(id.map(LineupId::new))
    }

    /// Whether `player_id` already holds a position in the lineup
    pub fn lineup_has_player(&self, lineup_id: LineupId, player_id: PlayerId) -> Result<bool> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM lineup_positions WHERE lineup_id = ? AND player_id = ?",
            params![lineup_id.as_i64(), player_id.as_u64()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Replace the positions of the lineup for (team, week, game type,
    /// season), creating the submission when it does not exist yet
    pub fn replace_lineup_positions(
        &mut self,
        team_id: TeamId,
        week: Week,
        game_type: &str,
        season: Season,
        positions: &[NewLineupPosition],
    ) -> Result<(LineupId, usize)> {
        let tx = self.conn.transaction()?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT lineup_id FROM lineup_submissions
                 WHERE fantasy_team_id = ? AND week_number = ? AND game_type = ? AND season_year = ?
                 ORDER BY lineup_id LIMIT 1",
                params![team_id.as_u32(), week.as_u16(), game_type, season.as_u16()],
                |row| row.get(0),
            )
            .optional()?;

        let lineup_id = match existing {
            Some(id) => id,
            None => {
                tx.execute(
                    "INSERT INTO lineup_submissions
                     (fantasy_team_id, week_number, game_type, season_year, created_at)
                     VALUES (?, ?, ?, ?, CURRENT_TIMESTAMP)",
                    params![team_id.as_u32(), week.as_u16(), game_type, season.as_u16()],
                )?;
                tx.last_insert_rowid()
            }
        };

        tx.execute(
            "DELETE FROM lineup_positions WHERE lineup_id = ?",
            params![lineup_id],
        )?;

        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO lineup_positions
                 (lineup_id, position_type, player_id, nfl_team_id, sort_order, created_at)
                 VALUES (?, ?, ?, ?, ?, CURRENT_TIMESTAMP)",
            )?;
            for position in positions {
                inserted += stmt.execute(params![
                    lineup_id,
                    position.position_type.as_str(),
                    position.player_id.as_u64(),
                    position.nfl_team_id.map(|t| t.as_u32()),
                    position.sort_order,
                ])?;
            }
        }

        tx.commit()?;
        Ok((LineupId::new(lineup_id), inserted))
    }

    /// Position-type counts for one team's lineup
    pub fn lineup_position_type_counts(
        &self,
        team_id: TeamId,
        week: Week,
        game_type: &str,
        season: Season,
    ) -> Result<Vec<CountRow>> {
        self.count_rows_with(
            "SELECT lp.position_type, COUNT(*) AS count
             FROM lineup_positions lp
             JOIN lineup_submissions ls ON lp.lineup_id = ls.lineup_id
             WHERE ls.fantasy_team_id = ? AND ls.week_number = ?
               AND ls.game_type = ? AND ls.season_year = ?
             GROUP BY lp.position_type
             ORDER BY lp.position_type",
            &[&team_id.as_u32(), &week.as_u16(), &game_type, &season.as_u16()],
        )
    }

    /// Acquisition context of active `historical_rosters` rows for a season
    pub fn roster_context(&self, season: Season) -> Result<HashMap<(TeamId, PlayerId), RosterContext>> {
        let mut stmt = self.conn.prepare(
            "SELECT fantasy_team_id, player_id, acquisition_type, was_keeper
             FROM historical_rosters
             WHERE season_year = ? AND active_until IS NULL",
        )?;
        let rows = stmt.query_map(params![season.as_u16()], |row| {
            Ok((
                (TeamId::new(row.get(0)?), PlayerId::new(row.get(1)?)),
                RosterContext {
                    acquisition_type: row.get(2)?,
                    was_keeper: row.get(3)?,
                },
            ))
        })?;

        let mut context = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            context.insert(key, value);
        }
        Ok(context)
    }

    /// Insert historical lineup rows, locked. Rows the database rejects are
    /// reported, not fatal.
    pub fn insert_historical_lineups(
        &mut self,
        entries: &[HistoricalLineupEntry],
    ) -> Result<HistoricalInsertOutcome> {
        let tx = self.conn.transaction()?;
        let mut outcome = HistoricalInsertOutcome::default();
        {
            let mut stmt = tx.prepare(
                "INSERT INTO historical_lineups
                 (season_year, week_number, game_type, fantasy_team_id, team_name_at_time,
                  owner_name_at_time, player_id, espn_id, player_name_at_time, position,
                  lineup_position, acquisition_type, was_keeper, is_locked)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1)",
            )?;
            for entry in entries {
                let result = stmt.execute(params![
                    entry.season.as_u16(),
                    entry.week.as_u16(),
                    entry.game_type,
                    entry.team_id.as_u32(),
                    entry.team_name_at_time,
                    entry.owner_name_at_time,
                    entry.player_id.as_u64(),
                    entry.espn_id.as_u64(),
                    entry.player_name_at_time,
                    entry.position,
                    entry.lineup_position,
                    entry.acquisition_type,
                    entry.was_keeper,
                ]);
                match result {
                    Ok(n) => outcome.inserted += n,
                    Err(e) => outcome
                        .failed
                        .push((entry.player_name_at_time.clone(), e.to_string())),
                }
            }
        }
        tx.commit()?;
        Ok(outcome)
    }

    pub fn historical_lineup_total(&self, season: Season) -> Result<u32> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM historical_lineups WHERE season_year = ?",
            params![season.as_u16()],
            |row| row.get(0),
        )?)
    }

    /// Entry counts labelled `Week N <game type>`
    pub fn historical_lineups_by_week(&self, season: Season) -> Result<Vec<CountRow>> {
        self.count_rows_with(
            "SELECT 'Week ' || week_number || ' ' || game_type, COUNT(*)
             FROM historical_lineups
             WHERE season_year = ?
             GROUP BY week_number, game_type
             ORDER BY week_number, game_type",
            &[&season.as_u16()],
        )
    }

    /// (team name, total entries, keeper entries) per team
    pub fn historical_lineups_by_team(&self, season: Season) -> Result<Vec<(String, u32, u32)>> {
        let mut stmt = self.conn.prepare(
            "SELECT team_name_at_time, COUNT(*),
                    SUM(CASE WHEN was_keeper = 1 THEN 1 ELSE 0 END)
             FROM historical_lineups
             WHERE season_year = ?
             GROUP BY fantasy_team_id, team_name_at_time
             ORDER BY fantasy_team_id",
        )?;
        let rows = stmt.query_map(params![season.as_u16()], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// NFL team of a player, used when a lineup row has no team code
    pub fn player_nfl_team(&self, player_id: PlayerId) -> Result<Option<NflTeamId>> {
        let team: Option<Option<u32>> = self
            .conn
            .query_row(
                "SELECT nfl_team_id FROM nfl_players WHERE player_id = ?",
                params![player_id.as_u64()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(team.flatten().map(NflTeamId::new))
    }
}
