//! Player, team and roster queries

use super::{models::*, schema::LeagueDatabase};
use crate::cli::types::{EspnId, NflTeamId, PlayerId, TeamId};
use anyhow::Result;
use rusqlite::{params, params_from_iter, OptionalExtension};
use std::collections::{HashMap, HashSet};

impl LeagueDatabase {
    /// Map every ESPN ID in `nfl_players` to its league player
    pub fn espn_player_mapping(&self) -> Result<HashMap<EspnId, PlayerRef>> {
        let mut stmt = self.conn.prepare(
            "SELECT espn_id, player_id, display_name, position
             FROM nfl_players
             WHERE espn_id IS NOT NULL",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                EspnId::new(row.get(0)?),
                PlayerRef {
                    player_id: PlayerId::new(row.get(1)?),
                    display_name: row.get(2)?,
                    position: row.get(3)?,
                },
            ))
        })?;

        let mut mapping = HashMap::new();
        for row in rows {
            let (espn_id, player) = row?;
            mapping.insert(espn_id, player);
        }
        Ok(mapping)
    }

    /// NFL team id keyed by team code (`HOU`, `KC`, ...)
    pub fn nfl_team_ids_by_code(&self) -> Result<HashMap<String, NflTeamId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT nfl_team_id, team_code FROM nfl_teams")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(1)?, NflTeamId::new(row.get(0)?)))
        })?;

        let mut teams = HashMap::new();
        for row in rows {
            let (code, id) = row?;
            teams.insert(code, id);
        }
        Ok(teams)
    }

    /// The ESPN ID stored for a league player, if any
    pub fn player_espn_id(&self, player_id: PlayerId) -> Result<Option<EspnId>> {
        let espn_id: Option<Option<u64>> = self
            .conn
            .query_row(
                "SELECT espn_id FROM nfl_players WHERE player_id = ?",
                params![player_id.as_u64()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(espn_id.flatten().map(EspnId::new))
    }

    /// All players with their NFL team, ordered by position then name
    pub fn player_export_rows(&self) -> Result<Vec<PlayerExportRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.player_id, p.display_name, p.first_name, p.last_name, p.position,
                    COALESCE(t.team_name, 'Free Agent'),
                    COALESCE(t.team_code, 'FA'),
                    p.nfl_team_id
             FROM nfl_players p
             LEFT JOIN nfl_teams t ON p.nfl_team_id = t.nfl_team_id
             ORDER BY p.position, p.display_name",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(PlayerExportRow {
                player_id: PlayerId::new(row.get(0)?),
                display_name: row.get(1)?,
                first_name: row.get(2)?,
                last_name: row.get(3)?,
                position: row.get(4)?,
                nfl_team_name: row.get(5)?,
                nfl_team_code: row.get(6)?,
                nfl_team_id: row.get::<_, Option<u32>>(7)?.map(NflTeamId::new),
            })
        })?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Player counts per position, largest first
    pub fn player_position_counts(&self) -> Result<Vec<CountRow>> {
        self.count_rows(
            "SELECT position, COUNT(*) AS count
             FROM nfl_players
             GROUP BY position
             ORDER BY count DESC, position",
        )
    }

    /// Fantasy teams with their owners
    pub fn fantasy_team_refs(&self) -> Result<Vec<FantasyTeamRef>> {
        let mut stmt = self.conn.prepare(
            "SELECT ft.team_id, ft.team_name,
                    u.first_name || ' ' || u.last_name AS owner_name,
                    u.username
             FROM fantasy_teams ft
             JOIN users u ON ft.user_id = u.user_id
             ORDER BY ft.team_id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(FantasyTeamRef {
                team_id: TeamId::new(row.get(0)?),
                team_name: row.get(1)?,
                owner_name: row.get(2)?,
                username: row.get(3)?,
            })
        })?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Every rostered player with team, owner and NFL team details
    pub fn roster_export_rows(&self) -> Result<Vec<RosterExportRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT ft.team_id, ft.team_name, ft.head_coach,
                    u.username, u.first_name || ' ' || u.last_name,
                    np.player_id, np.display_name, np.first_name, np.last_name,
                    np.position, np.espn_id, nt.team_name, nt.team_code,
                    ftp.acquisition_type, ftp.acquisition_date, ftp.is_keeper
             FROM fantasy_team_players ftp
             JOIN fantasy_teams ft ON ftp.fantasy_team_id = ft.team_id
             JOIN users u ON ft.user_id = u.user_id
             JOIN nfl_players np ON ftp.player_id = np.player_id
             LEFT JOIN nfl_teams nt ON np.nfl_team_id = nt.nfl_team_id
             ORDER BY ft.team_name, np.position, np.display_name",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(RosterExportRow {
                team_id: TeamId::new(row.get(0)?),
                team_name: row.get(1)?,
                head_coach: row.get(2)?,
                owner_username: row.get(3)?,
                owner_name: row.get(4)?,
                player_id: PlayerId::new(row.get(5)?),
                player_name: row.get(6)?,
                first_name: row.get(7)?,
                last_name: row.get(8)?,
                position: row.get(9)?,
                espn_id: row.get::<_, Option<u64>>(10)?.map(EspnId::new),
                nfl_team: row.get(11)?,
                nfl_team_code: row.get(12)?,
                acquisition_type: row.get(13)?,
                acquisition_date: row.get(14)?,
                is_keeper: row.get(15)?,
            })
        })?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Players on no fantasy roster
    pub fn free_agent_rows(&self) -> Result<Vec<FreeAgentRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT np.player_id, np.display_name, np.first_name, np.last_name,
                    np.position, np.espn_id, nt.team_name, nt.team_code,
                    nt.conference, nt.division,
                    ep.active, ep.injured, ep.status, ep.jersey_number,
                    ep.height, ep.weight, ep.age, ep.experience, ep.college
             FROM nfl_players np
             LEFT JOIN fantasy_team_players ftp ON np.player_id = ftp.player_id
             LEFT JOIN nfl_teams nt ON np.nfl_team_id = nt.nfl_team_id
             LEFT JOIN espn_players ep ON np.espn_id = ep.espn_id
             WHERE ftp.player_id IS NULL
             ORDER BY np.position, nt.team_code, np.display_name",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(FreeAgentRow {
                player_id: PlayerId::new(row.get(0)?),
                player_name: row.get(1)?,
                first_name: row.get(2)?,
                last_name: row.get(3)?,
                position: row.get(4)?,
                espn_id: row.get::<_, Option<u64>>(5)?.map(EspnId::new),
                nfl_team: row.get(6)?,
                nfl_team_code: row.get(7)?,
                conference: row.get(8)?,
                division: row.get(9)?,
                is_active: row.get(10)?,
                is_injured: row.get(11)?,
                player_status: row.get(12)?,
                jersey_number: row.get(13)?,
                height: row.get(14)?,
                weight: row.get(15)?,
                age: row.get(16)?,
                experience: row.get(17)?,
                college: row.get(18)?,
            })
        })?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Which of `team_ids` exist in `fantasy_teams`
    pub fn existing_team_ids(&self, team_ids: &HashSet<TeamId>) -> Result<HashSet<TeamId>> {
        let ids: Vec<u32> = team_ids.iter().map(|t| t.as_u32()).collect();
        let found = self.existing_ids("fantasy_teams", "team_id", &ids)?;
        Ok(found.into_iter().map(|id| TeamId::new(id as u32)).collect())
    }

    /// Which of `player_ids` exist in `nfl_players`
    pub fn existing_player_ids(&self, player_ids: &HashSet<PlayerId>) -> Result<HashSet<PlayerId>> {
        let ids: Vec<u64> = player_ids.iter().map(|p| p.as_u64()).collect();
        let found = self.existing_ids("nfl_players", "player_id", &ids)?;
        Ok(found.into_iter().map(PlayerId::new).collect())
    }

    fn existing_ids<T: rusqlite::ToSql>(
        &self,
        table: &str,
        column: &str,
        ids: &[T],
    ) -> Result<HashSet<u64>> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }

        let placeholders = vec!["?"; ids.len()].join(",");
        let sql = format!(
            "SELECT {column} FROM {table} WHERE {column} IN ({placeholders})"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(ids.iter()), |row| row.get::<_, u64>(0))?;
        Ok(rows.collect::<rusqlite::Result<HashSet<_>>>()?)
    }

    /// Replace every `fantasy_team_players` row with `entries` in one
    /// transaction. Returns (deleted, inserted).
    pub fn replace_fantasy_rosters(&mut self, entries: &[RosterEntry]) -> Result<(usize, usize)> {
        let tx = self.conn.transaction()?;
        let deleted = tx.execute("DELETE FROM fantasy_team_players", [])?;

        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO fantasy_team_players
                 (fantasy_team_id, player_id, acquisition_type, is_keeper, acquisition_date)
                 VALUES (?, ?, ?, ?, CURRENT_TIMESTAMP)",
            )?;
            for entry in entries {
                inserted += stmt.execute(params![
                    entry.team_id.as_u32(),
                    entry.player_id.as_u64(),
                    entry.acquisition_type.as_str(),
                    entry.is_keeper,
                ])?;
            }
        }

        tx.commit()?;
        Ok((deleted, inserted))
    }

    /// Total rows in `fantasy_team_players`
    pub fn roster_total(&self) -> Result<u32> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM fantasy_team_players", [], |row| {
                row.get(0)
            })?)
    }

    /// Rostered player count per fantasy team, in team id order
    pub fn roster_counts_by_team(&self) -> Result<Vec<CountRow>> {
        self.count_rows(
            "SELECT ft.team_name, COUNT(*) AS player_count
             FROM fantasy_team_players ftp
             JOIN fantasy_teams ft ON ftp.fantasy_team_id = ft.team_id
             GROUP BY ft.team_id, ft.team_name
             ORDER BY ft.team_id",
        )
    }

    /// Rostered player count per position, largest first
    pub fn roster_counts_by_position(&self) -> Result<Vec<CountRow>> {
        self.count_rows(
            "SELECT p.position, COUNT(*) AS count
             FROM fantasy_team_players ftp
             JOIN nfl_players p ON ftp.player_id = p.player_id
             GROUP BY p.position
             ORDER BY count DESC, p.position",
        )
    }

    /// Players acquired before `cutoff`, i.e. carried over from last season
    pub fn players_acquired_before(&self, cutoff: &str) -> Result<Vec<RosteredPlayer>> {
        self.rostered_players(
            "SELECT ftp.fantasy_team_id, ftp.player_id, np.display_name, np.espn_id, np.position
             FROM fantasy_team_players ftp
             JOIN nfl_players np ON ftp.player_id = np.player_id
             WHERE ftp.acquisition_date < ?
             ORDER BY ftp.fantasy_team_id, ftp.player_id",
            &[&cutoff],
        )
    }

    /// Rostered players whose acquisition type is `Draft`
    pub fn drafted_roster_players(&self) -> Result<Vec<RosteredPlayer>> {
        self.rostered_players(
            "SELECT ftp.fantasy_team_id, ftp.player_id, np.display_name, np.espn_id, np.position
             FROM fantasy_team_players ftp
             JOIN nfl_players np ON ftp.player_id = np.player_id
             WHERE ftp.acquisition_type = 'Draft'
             ORDER BY ftp.fantasy_team_id, ftp.player_id",
            &[],
        )
    }

    fn rostered_players(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<RosteredPlayer>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, |row| {
            Ok(RosteredPlayer {
                team_id: TeamId::new(row.get(0)?),
                player_id: PlayerId::new(row.get(1)?),
                display_name: row.get(2)?,
                espn_id: row.get::<_, Option<u64>>(3)?.map(EspnId::new),
                position: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Run a two-column `label, count` query
    pub(crate) fn count_rows(&self, sql: &str) -> Result<Vec<CountRow>> {
        self.count_rows_with(sql, &[])
    }

    pub(crate) fn count_rows_with(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<CountRow>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, |row| {
            let label: rusqlite::types::Value = row.get(0)?;
            Ok(CountRow {
                label: value_label(label),
                count: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

fn value_label(value: rusqlite::types::Value) -> String {
    use rusqlite::types::Value;
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(s) => s,
        Value::Blob(_) => "<blob>".to_string(),
    }
}
