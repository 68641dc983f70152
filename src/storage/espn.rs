//! `espn_players` storage and NFL team reassignment

use super::{models::*, schema::LeagueDatabase};
use crate::cli::types::NflTeamId;
use anyhow::Result;
use rusqlite::params;

/// Team assignment counts for one roster position
#[derive(Debug, Clone, PartialEq)]
pub struct TeamAssignmentSummary {
    pub position: String,
    pub total: u32,
    pub on_teams: u32,
    pub free_agents: u32,
}

impl LeagueDatabase {
    /// Replace the ESPN snapshot in one transaction.
    ///
    /// Duplicate ESPN ids (a player listed by two teams) keep the last row.
    /// Returns `(deleted, written)`.
    pub fn replace_espn_players(&mut self, players: &[EspnPlayer]) -> Result<(usize, usize)> {
        let tx = self.conn.transaction()?;
        let deleted = tx.execute("DELETE FROM espn_players", [])?;
        let mut written = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO espn_players (
                    espn_id, first_name, last_name, display_name, position, position_full,
                    position_group, jersey_number, team_id, team_name, team_abbreviation,
                    height, weight, age, experience, college, active, injured, status
                 ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                 ON CONFLICT(espn_id) DO UPDATE SET
                    first_name = excluded.first_name,
                    last_name = excluded.last_name,
                    display_name = excluded.display_name,
                    position = excluded.position,
                    position_full = excluded.position_full,
                    position_group = excluded.position_group,
                    jersey_number = excluded.jersey_number,
                    team_id = excluded.team_id,
                    team_name = excluded.team_name,
                    team_abbreviation = excluded.team_abbreviation,
                    height = excluded.height,
                    weight = excluded.weight,
                    age = excluded.age,
                    experience = excluded.experience,
                    college = excluded.college,
                    active = excluded.active,
                    injured = excluded.injured,
                    status = excluded.status,
                    updated_at = CURRENT_TIMESTAMP",
            )?;

            for p in players {
                written += stmt.execute(params![
                    p.espn_id.as_u64(),
                    p.first_name,
                    p.last_name,
                    p.display_name,
                    p.position,
                    p.position_full,
                    p.position_group,
                    p.jersey_number,
                    p.team_id,
                    p.team_name,
                    p.team_abbreviation,
                    p.height,
                    p.weight,
                    p.age,
                    p.experience,
                    p.college,
                    p.active,
                    p.injured,
                    p.status,
                ])?;
            }
        }
        tx.commit()?;
        Ok((deleted, written))
    }

    /// Point every league player at the NFL team ESPN currently lists.
    /// Defense units keep their team. Players ESPN doesn't place go to the
    /// free-agent team when `free_unmatched` is set and stay put otherwise.
    pub fn update_player_teams(&self, free_unmatched: bool) -> Result<usize> {
        Ok(self.conn.execute(
            "UPDATE nfl_players
             SET nfl_team_id = CASE
                 WHEN position = 'DU' THEN nfl_team_id
                 ELSE COALESCE(
                     (SELECT nt.nfl_team_id
                      FROM espn_players ep
                      JOIN nfl_teams nt ON nt.team_code = ep.team_abbreviation
                      WHERE ep.espn_id = nfl_players.espn_id
                      LIMIT 1),
                     CASE WHEN ?2 THEN ?1 ELSE nfl_team_id END)
             END
             WHERE position IN ('QB', 'RB', 'RC', 'PK', 'DU')
                OR espn_id IS NOT NULL",
            params![NflTeamId::FREE_AGENT.as_u32(), free_unmatched],
        )?)
    }

    pub fn espn_player_total(&self) -> Result<u32> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM espn_players", [], |row| row.get(0))?)
    }

    pub fn espn_position_counts(&self) -> Result<Vec<CountRow>> {
        self.count_rows(
            "SELECT position, COUNT(*) FROM espn_players
             GROUP BY position
             ORDER BY position",
        )
    }

    /// Per roster position: total players, on an NFL team, free agents
    pub fn team_assignment_summary(&self) -> Result<Vec<TeamAssignmentSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT position,
                    COUNT(*),
                    SUM(CASE WHEN nfl_team_id IS NOT NULL AND nfl_team_id != ?1 THEN 1 ELSE 0 END),
                    SUM(CASE WHEN nfl_team_id = ?1 THEN 1 ELSE 0 END)
             FROM nfl_players
             WHERE position IN ('QB', 'RB', 'RC', 'PK', 'DU')
             GROUP BY position
             ORDER BY position",
        )?;
        let rows = stmt.query_map(params![NflTeamId::FREE_AGENT.as_u32()], |row| {
            Ok(TeamAssignmentSummary {
                position: row.get(0)?,
                total: row.get(1)?,
                on_teams: row.get(2)?,
                free_agents: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
