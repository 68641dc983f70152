//! Integration tests for command handlers

use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::{Path, PathBuf},
};

use gbrfl_maint::{
    commands::{
        export_lineups::{handle_export_lineups, ExportLineupsParams},
        exports::{handle_export_players, handle_export_rosters},
        historical_lineups::{handle_import_historical_lineups, HistoricalLineupsParams},
        import_keepers::{handle_import_keepers, ImportKeepersParams, DEFAULT_KEEPER_DATE},
        import_rosters::{handle_import_rosters, ImportRostersParams},
        keepers::{
            handle_calculate_keepers, handle_find_missing_keepers, handle_reconstruct_keepers,
            KeeperParams, DEFAULT_DRAFT_CUTOFF,
        },
        lineup_positions::{handle_import_lineup_positions, LineupPositionsParams},
        player_stats::{handle_import_player_stats, PlayerStatsParams},
        restore_lineups::{
            handle_generate_restoration_sql, handle_restore_lineups, RestoreLineupsParams,
            DEFAULT_CREATED_AT,
        },
    },
    storage::LeagueDatabase,
    EspnId, LeagueError, PlayerId, Season, TeamId, Week,
};
use tempfile::TempDir;

const SEED: &str = "
    INSERT INTO users (user_id, username, first_name, last_name) VALUES
        (1, 'lance', 'Lance', 'Smith'),
        (2, 'kim', 'Kim', 'Lee');
    INSERT INTO fantasy_teams (team_id, team_name, head_coach, user_id) VALUES
        (1, 'Dick Six', 'Andy Reid', 1),
        (2, 'Blue Crew', NULL, 2);
    INSERT INTO nfl_teams (nfl_team_id, team_code, team_name, conference, division) VALUES
        (13, 'HOU', 'Houston Texans', 'AFC', 'South'),
        (16, 'KC', 'Kansas City Chiefs', 'AFC', 'West'),
        (33, 'FA', 'Free Agent', NULL, NULL);
    INSERT INTO nfl_players (player_id, display_name, first_name, last_name, position, espn_id, nfl_team_id) VALUES
        (100, 'Patrick Mahomes', 'Patrick', 'Mahomes', 'QB', 3139477, 16),
        (101, 'Ka''imi Fairbairn', 'Ka''imi', 'Fairbairn', 'PK', 2971573, 13),
        (102, 'Joe Mixon', 'Joe', 'Mixon', 'RB', 3116385, 13),
        (103, 'Houston Defense', NULL, NULL, 'DU', NULL, 13),
        (104, 'Travis Kelce', 'Travis', 'Kelce', 'RC', 15847, 16);
";

const LINEUP_HEADER: &str =
    "Week,Game Type,Team ID,Fantasy Team Name,Owner Name,Username,Position,Player,ESPN ID\n";

struct TestLeague {
    dir: TempDir,
    db: LeagueDatabase,
}

impl TestLeague {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let db = LeagueDatabase::open(&dir.path().join("league.db")).unwrap();
        db.connection().execute_batch(SEED).unwrap();
        Self { dir, db }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn count(&self, sql: &str) -> u32 {
        self.db.connection().query_row(sql, [], |row| row.get(0)).unwrap()
    }
}

fn week_one_lineups() -> String {
    let mut csv = String::from(LINEUP_HEADER);
    csv.push_str("1,primary,1,Dick Six,Lance Smith,lance,HeadCoach,Andy Reid,\n");
    csv.push_str("1,primary,1,Dick Six,Lance Smith,lance,QB1,Patrick Mahomes (KC),3139477\n");
    csv.push_str("1,primary,1,Dick Six,Lance Smith,lance,RB1,Joe Mixon (HOU),3116385\n");
    csv.push_str("1,primary,1,Dick Six,Lance Smith,lance,PK1,Ka'imi Fairbairn (HOU),2971573\n");
    csv.push_str("1,primary,1,Dick Six,Lance Smith,lance,DEF1,Houston Texans (HOU),\n");
    csv.push_str("1,primary,2,Blue Crew,Kim Lee,kim,RC1,Travis Kelce (KC),15847\n");
    csv.push_str("1,primary,2,Blue Crew,Kim Lee,kim,RB1,Nobody (KC),999999\n");
    csv
}

#[test]
fn test_export_players_writes_both_files() {
    let league = TestLeague::new();

    let export = handle_export_players(&league.db, league.path()).unwrap();
    assert_eq!(export.players, 5);
    assert_eq!(export.teams, 2);

    let players = fs::read_to_string(&export.players_path).unwrap();
    assert_eq!(players.lines().count(), 6);
    assert!(players.contains("Ka'imi Fairbairn"));
    assert!(fs::read_to_string(&export.teams_path)
        .unwrap()
        .contains("Lance Smith"));
}

#[test]
fn test_import_rosters_requires_confirmation() {
    let mut league = TestLeague::new();
    let input = league.write(
        "rosters.csv",
        "team_name,team_name_id,player_name_id,position,is_keeper,acquisition_type\n\
         Dick Six,1,100,QB,1,Keeper\n\
         Dick Six,1,102,rb,0,Draft\n\
         Blue Crew,2,104,RC,FALSE,Free Agent\n",
    );
    let params = |yes| ImportRostersParams {
        input: input.clone(),
        yes,
        dry_run: false,
        max_team_id: 10,
        roster_size: 2,
    };

    let report = handle_import_rosters(&mut league.db, params(false)).unwrap();
    assert_eq!(report.entries, 3);
    assert!(!report.applied);
    assert_eq!(league.db.roster_total().unwrap(), 0);

    let report = handle_import_rosters(&mut league.db, params(true)).unwrap();
    assert!(report.applied);
    assert_eq!(report.inserted, 3);
    assert_eq!(league.db.roster_total().unwrap(), 3);
    assert_eq!(
        league.count("SELECT COUNT(*) FROM fantasy_team_players WHERE is_keeper = 1"),
        1
    );

    let export = handle_export_rosters(&league.db, league.path()).unwrap();
    assert_eq!(export.rostered, 3);
    assert_eq!(export.free_agents, 2);
}

#[test]
fn test_import_rosters_rejects_unknown_references() {
    let mut league = TestLeague::new();
    let input = league.write(
        "rosters.csv",
        "team_name,team_name_id,player_name_id,position,is_keeper,acquisition_type\n\
         Dick Six,1,100,QB,1,Keeper\n\
         Dick Six,1,555,QB,0,Draft\n\
         Dick Six,1,100,QB,0,Draft\n",
    );

    let result = handle_import_rosters(
        &mut league.db,
        ImportRostersParams {
            input,
            yes: true,
            dry_run: false,
            max_team_id: 10,
            roster_size: 21,
        },
    );
    match result {
        // One missing player plus one duplicate
        Err(LeagueError::Validation { count }) => assert_eq!(count, 2),
        other => panic!("Expected Validation error, got {:?}", other),
    }
    assert_eq!(league.db.roster_total().unwrap(), 0);
}

#[test]
fn test_import_keepers_replaces_season() {
    let mut league = TestLeague::new();
    let input = league.write(
        "keepers.csv",
        "Team ID,player_id,ESPN ID\n1,100,3139477\n2,104,\n",
    );

    let params = ImportKeepersParams {
        input,
        season: Season::new(2025),
        designation_date: DEFAULT_KEEPER_DATE.to_string(),
        expected_total: 2,
    };
    let first = handle_import_keepers(&mut league.db, params.clone()).unwrap();
    assert_eq!(first.inserted, 2);
    assert!(first.matches_expected);

    let second = handle_import_keepers(&mut league.db, params).unwrap();
    assert_eq!(second.deleted, 2);
    assert_eq!(second.total, 2);
    assert_eq!(league.count("SELECT COUNT(*) FROM historical_keepers"), 2);
}

#[test]
fn test_calculate_keepers_subtracts_draft_and_exclusions() {
    let league = TestLeague::new();
    league
        .db
        .connection()
        .execute_batch("INSERT INTO draft_picks (season, fantasy_team_id, player_id) VALUES (2025, 1, 102);")
        .unwrap();
    let lineups = league.write("lineups.csv", &week_one_lineups());
    let exclusions: HashSet<EspnId> = [EspnId::new(2971573)].into_iter().collect();

    let result = handle_calculate_keepers(
        &league.db,
        KeeperParams {
            lineups,
            season: Season::new(2025),
            designation_date: DEFAULT_KEEPER_DATE.to_string(),
            output_dir: league.path().to_path_buf(),
        },
        &exclusions,
    )
    .unwrap();

    assert_eq!(result.total, 2);
    assert_eq!(result.by_team.get(&TeamId::new(1)), Some(&1));
    assert_eq!(result.by_team.get(&TeamId::new(2)), Some(&1));

    let sql = fs::read_to_string(&result.sql_path).unwrap();
    assert!(sql.contains("DELETE FROM historical_keepers WHERE season_year = 2025;"));
    assert!(sql.contains("(2025, 1, 100, 3139477, '2025-08-25 14:30:48'),"));
    assert!(sql.contains("Team 2: Travis Kelce (RC)"));
    assert!(!sql.contains("Joe Mixon"));
    assert!(!sql.contains("Fairbairn"));
}

#[test]
fn test_find_missing_keepers_fills_shortfall() {
    let league = TestLeague::new();
    league
        .db
        .connection()
        .execute_batch(
            "INSERT INTO fantasy_team_players (fantasy_team_id, player_id, acquisition_type, is_keeper, acquisition_date) VALUES
                (1, 101, 'Keeper', 1, '2025-08-01 00:00:00'),
                (1, 102, 'Draft', 0, '2025-09-01 00:00:00'),
                (2, 104, 'Keeper', 1, '2025-08-01 00:00:00');",
        )
        .unwrap();
    let lineups = league.write("lineups.csv", &week_one_lineups());
    let expected: BTreeMap<TeamId, u32> = [(TeamId::new(1), 2), (TeamId::new(2), 1)]
        .into_iter()
        .collect();

    let result = handle_find_missing_keepers(
        &league.db,
        KeeperParams {
            lineups,
            season: Season::new(2025),
            designation_date: DEFAULT_KEEPER_DATE.to_string(),
            output_dir: league.path().to_path_buf(),
        },
        DEFAULT_DRAFT_CUTOFF,
        &expected,
    )
    .unwrap();

    assert_eq!(result.missing.len(), 1);
    assert_eq!(result.missing[0].player_id, PlayerId::new(100));
    let sql = fs::read_to_string(result.sql_path.unwrap()).unwrap();
    assert!(!sql.contains("DELETE FROM"));
    assert!(sql.contains("Patrick Mahomes"));
}

#[test]
fn test_reconstruct_keepers_writes_sql_and_report() {
    let league = TestLeague::new();
    league
        .db
        .connection()
        .execute_batch(
            "INSERT INTO fantasy_team_players (fantasy_team_id, player_id, acquisition_type, is_keeper, acquisition_date) VALUES
                (1, 100, 'Keeper', 1, '2025-08-01 00:00:00'),
                (1, 102, 'Draft', 0, '2025-09-01 00:00:00'),
                (2, 104, 'Trade', 1, '2025-08-02 00:00:00');",
        )
        .unwrap();

    let result =
        handle_reconstruct_keepers(&league.db, Season::new(2025), DEFAULT_KEEPER_DATE, league.path())
            .unwrap();
    assert_eq!(result.total, 2);

    let report = fs::read_to_string(result.report_path.unwrap()).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(
        lines[0],
        "Team ID,Player ID,ESPN ID,Player Name,Position,Is Keeper,Acquisition Type,Acquisition Date"
    );
    assert_eq!(lines.len(), 3);
    assert!(lines[2].starts_with("2,104,15847,Travis Kelce,RC,Yes,Trade"));

    let sql = fs::read_to_string(result.sql_path.unwrap()).unwrap();
    assert!(sql.contains("INSERT INTO historical_keepers"));
}

#[test]
fn test_import_lineup_positions_then_export_and_restore() {
    let mut league = TestLeague::new();
    let lineups = league.write("week1.csv", &week_one_lineups());

    let report = handle_import_lineup_positions(
        &mut league.db,
        LineupPositionsParams {
            inputs: vec![lineups.clone()],
            season: Season::new(2025),
            verify_team: TeamId::new(1),
            verify_week: Week::new(1),
        },
    )
    .unwrap();

    // Team 1: QB, RB, PK (DEF has no player); team 2: RC
    assert_eq!(report.lineups, 2);
    assert_eq!(report.inserted, 4);
    assert_eq!(league.count("SELECT COUNT(*) FROM lineup_submissions"), 2);
    assert_eq!(
        league.count("SELECT COUNT(*) FROM lineup_positions WHERE nfl_team_id = 13"),
        2
    );

    // Every CSV player is now in its lineup
    let restore = handle_restore_lineups(
        &league.db,
        RestoreLineupsParams {
            inputs: vec![lineups],
            season: Season::new(2025),
            created_at: DEFAULT_CREATED_AT.to_string(),
            output_dir: league.path().to_path_buf(),
        },
    )
    .unwrap();
    assert!(restore.missing.is_empty());
    assert_eq!(restore.unknown_players, 1);
    assert!(restore.path.is_none());

    league
        .db
        .connection()
        .execute_batch("UPDATE lineup_submissions SET is_locked = 1 WHERE fantasy_team_id = 1;")
        .unwrap();
    let export = handle_export_lineups(
        &league.db,
        ExportLineupsParams {
            season: Season::new(2025),
            week: Some(Week::new(1)),
            output_dir: league.path().to_path_buf(),
        },
    )
    .unwrap();
    assert_eq!(export.lineups, 1);
    assert_eq!(export.primary, 1);
    // Head coach plus three positions
    assert_eq!(export.rows, 4);
}

#[test]
fn test_restore_lineups_finds_missing_positions() {
    let league = TestLeague::new();
    league
        .db
        .connection()
        .execute_batch(
            "INSERT INTO lineup_submissions (lineup_id, fantasy_team_id, week_number, game_type, season_year)
                VALUES (7, 1, 2, 'primary', 2025);
             INSERT INTO lineup_positions (lineup_id, position_type, player_id, sort_order)
                VALUES (7, 'quarterback', 100, 1);",
        )
        .unwrap();
    let mut csv = String::from(LINEUP_HEADER);
    csv.push_str("2,Primary,1,Dick Six,Lance Smith,lance,QB,Patrick Mahomes (KC),3139477\n");
    csv.push_str("2,Primary,1,Dick Six,Lance Smith,lance,RB,Nobody (KC),\n");
    csv.push_str("2,Primary,1,Dick Six,Lance Smith,lance,RB,Joe Mixon (HOU),3116385\n");
    csv.push_str("2,Primary,2,Blue Crew,Kim Lee,kim,RC,Travis Kelce (KC),15847\n");
    let input = league.write("week2.csv", &csv);

    let report = handle_restore_lineups(
        &league.db,
        RestoreLineupsParams {
            inputs: vec![input.clone()],
            season: Season::new(2025),
            created_at: DEFAULT_CREATED_AT.to_string(),
            output_dir: league.path().to_path_buf(),
        },
    )
    .unwrap();

    assert_eq!(report.missing.len(), 1);
    assert_eq!(report.missing[0].player_id, PlayerId::new(102));
    // Second bare RB label in the lineup
    assert_eq!(report.missing[0].sort_order, 2);
    assert_eq!(report.missing_lineups, 1);

    let sql = fs::read_to_string(report.path.unwrap()).unwrap();
    assert!(sql.contains("(7, 'running_back', 102, 2, '2025-09-04 16:07:27');"));

    let analysis =
        handle_generate_restoration_sql(&[input], Season::new(2025), league.path()).unwrap();
    let analysis_sql = fs::read_to_string(analysis).unwrap();
    assert!(analysis_sql.contains("-- Generated from: week2.csv"));
    assert!(analysis_sql.contains("'receiver', 1);"));

    // The generated analysis runs against the same schema
    let missing: u32 = {
        let conn = league.db.connection();
        let (setup, select) = analysis_sql
            .split_once("-- Players in a lineup CSV")
            .unwrap();
        conn.execute_batch(setup).unwrap();
        let select = select
            .split_once('\n')
            .unwrap()
            .1
            .split_once(';')
            .unwrap()
            .0;
        conn.query_row(&format!("SELECT COUNT(*) FROM ({})", select), [], |row| row.get(0))
            .unwrap()
    };
    assert_eq!(missing, 1);
}

#[test]
fn test_import_historical_lineups() {
    let mut league = TestLeague::new();
    league
        .db
        .connection()
        .execute_batch(
            "INSERT INTO historical_rosters (season_year, fantasy_team_id, player_id, acquisition_type, was_keeper)
                VALUES (2025, 1, 100, 'Keeper', 1);",
        )
        .unwrap();
    let input = league.write("lineups.csv", &week_one_lineups());

    let report = handle_import_historical_lineups(
        &mut league.db,
        HistoricalLineupsParams {
            input,
            season: Season::new(2025),
        },
    )
    .unwrap();

    assert_eq!(report.planned, 4);
    assert_eq!(report.inserted, 4);
    assert_eq!(report.failed, 0);
    assert_eq!(report.unknown, 1);
    assert_eq!(report.total, 4);
    assert_eq!(
        league.count("SELECT COUNT(*) FROM historical_lineups WHERE was_keeper = 1"),
        1
    );
}

#[test]
fn test_import_player_stats_filters_seasons() {
    let mut league = TestLeague::new();
    let weekly = league.write(
        "weekly.csv",
        "player_id,player_display_name,recent_team,season,week,completions,attempts,passing_yards,passing_tds\n\
         00-0033873,Patrick Mahomes,KC,2023,1,21.0,39,226,1\n\
         00-0033873,Patrick Mahomes,KC,2023,2,NA,NA,NA,NA\n\
         00-0001,Old Timer,KC,1990,1,10,20,100,1\n",
    );
    let schedule = league.write(
        "schedule.csv",
        "season,week,game_type,gameday,home_team,away_team\n\
         2023,1,REG,2023-09-07,KC,DET\n\
         2023,2,REG,2023-09-17,JAX,KC\n",
    );
    let pbp = league.write("pbp.csv", "season,week,desc,fumble,fumble_lost\n2023,1,Pass,0,0\n");

    let report = handle_import_player_stats(
        &mut league.db,
        PlayerStatsParams {
            weekly,
            schedule,
            play_by_play: pbp,
            start_season: 1999,
            end_season: 2024,
        },
    )
    .unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(report.written, 1);
    let summary = league.db.stats_summary().unwrap();
    assert_eq!(summary.total, 1);
    assert_eq!(summary.min_season, Some(2023));
    assert_eq!(
        league.count("SELECT pass_completions FROM player_stats WHERE opponent = 'DET'"),
        21
    );
}
