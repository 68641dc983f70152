//! Keeper queries

use super::{models::*, schema::LeagueDatabase};
use crate::cli::types::{EspnId, PlayerId, Season, TeamId};
use anyhow::Result;
use rusqlite::params;
use std::collections::HashSet;

impl LeagueDatabase {
    /// Delete a season's `historical_keepers` and insert `records` in one
    /// transaction. Returns (deleted, inserted).
    pub fn replace_keepers(&mut self, season: Season, records: &[KeeperRecord]) -> Result<(usize, usize)> {
        let tx = self.conn.transaction()?;
        let deleted = tx.execute(
            "DELETE FROM historical_keepers WHERE season_year = ?",
            params![season.as_u16()],
        )?;

        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO historical_keepers
                 (season_year, fantasy_team_id, player_id, espn_id, designation_date)
                 VALUES (?, ?, ?, ?, ?)",
            )?;
            for record in records {
                inserted += stmt.execute(params![
                    record.season.as_u16(),
                    record.team_id.as_u32(),
                    record.player_id.as_u64(),
                    record.espn_id.map(|e| e.as_u64()),
                    record.designation_date,
                ])?;
            }
        }

        tx.commit()?;
        Ok((deleted, inserted))
    }

    /// (team id, team name, keeper count) for a season
    pub fn keeper_counts_by_team(&self, season: Season) -> Result<Vec<(TeamId, String, u32)>> {
        let mut stmt = self.conn.prepare(
            "SELECT hk.fantasy_team_id, ft.team_name, COUNT(*)
             FROM historical_keepers hk
             JOIN fantasy_teams ft ON hk.fantasy_team_id = ft.team_id
             WHERE hk.season_year = ?
             GROUP BY hk.fantasy_team_id, ft.team_name
             ORDER BY hk.fantasy_team_id",
        )?;
        let rows = stmt.query_map(params![season.as_u16()], |row| {
            Ok((TeamId::new(row.get(0)?), row.get(1)?, row.get(2)?))
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Players picked in the season's draft
    pub fn drafted_player_ids(&self, season: Season) -> Result<HashSet<PlayerId>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT player_id FROM draft_picks
             WHERE season = ? AND player_id IS NOT NULL",
        )?;
        let rows = stmt.query_map(params![season.as_u16()], |row| {
            Ok(PlayerId::new(row.get(0)?))
        })?;
        Ok(rows.collect::<rusqlite::Result<HashSet<_>>>()?)
    }

    /// Roster rows flagged `is_keeper` or acquired as `Keeper`
    pub fn keeper_players(&self) -> Result<Vec<KeeperPlayer>> {
        let mut stmt = self.conn.prepare(
            "SELECT ftp.fantasy_team_id, ftp.player_id, np.espn_id, np.display_name,
                    np.position, ftp.is_keeper, ftp.acquisition_type, ftp.acquisition_date
             FROM fantasy_team_players ftp
             JOIN nfl_players np ON ftp.player_id = np.player_id
             WHERE ftp.is_keeper = 1 OR ftp.acquisition_type = 'Keeper'
             ORDER BY ftp.fantasy_team_id, np.display_name",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(KeeperPlayer {
                team_id: TeamId::new(row.get(0)?),
                player_id: PlayerId::new(row.get(1)?),
                espn_id: row.get::<_, Option<u64>>(2)?.map(EspnId::new),
                display_name: row.get(3)?,
                position: row.get(4)?,
                is_keeper: row.get(5)?,
                acquisition_type: row.get(6)?,
                acquisition_date: row.get(7)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
