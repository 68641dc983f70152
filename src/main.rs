//! Entry point: parse CLI and dispatch to command handlers.

use std::collections::HashSet;

use clap::Parser;
use gbrfl_maint::{
    cli::{Commands, Gbrfl},
    commands::{
        espn_players::handle_import_espn_players,
        export_lineups::{handle_export_lineups, ExportLineupsParams},
        exports::{handle_export_players, handle_export_rosters},
        historical_lineups::{handle_import_historical_lineups, HistoricalLineupsParams},
        import_keepers::{handle_import_keepers, ImportKeepersParams},
        import_rosters::{handle_import_rosters, ImportRostersParams},
        keepers::{
            handle_calculate_keepers, handle_find_missing_keepers, handle_reconstruct_keepers,
            KeeperParams,
        },
        lineup_positions::{handle_import_lineup_positions, LineupPositionsParams},
        open_database,
        player_stats::{handle_import_player_stats, PlayerStatsParams},
        prepare_output_dir,
        restore_lineups::{
            handle_generate_restoration_sql, handle_restore_lineups, RestoreLineupsParams,
        },
    },
    keepers::expected_keeper_counts,
    Result,
};

/// Run the CLI.
#[tokio::main]
async fn main() -> Result<()> {
    let app = Gbrfl::parse();
    let db_path = app.common.db;
    let output_dir = app.common.output_dir;

    match app.command {
        Commands::ExportPlayers => {
            let db = open_database(db_path)?;
            handle_export_players(&db, &prepare_output_dir(output_dir)?)?;
        }

        Commands::ExportRosters => {
            let db = open_database(db_path)?;
            handle_export_rosters(&db, &prepare_output_dir(output_dir)?)?;
        }

        Commands::ExportLineups { season, week } => {
            let db = open_database(db_path)?;
            handle_export_lineups(
                &db,
                ExportLineupsParams {
                    season,
                    week,
                    output_dir: prepare_output_dir(output_dir)?,
                },
            )?;
        }

        Commands::ImportRosters {
            input,
            yes,
            dry_run,
            max_team_id,
            roster_size,
        } => {
            let mut db = open_database(db_path)?;
            handle_import_rosters(
                &mut db,
                ImportRostersParams {
                    input,
                    yes,
                    dry_run,
                    max_team_id,
                    roster_size,
                },
            )?;
        }

        Commands::ImportKeepers {
            input,
            season,
            designation_date,
            expected_total,
        } => {
            let mut db = open_database(db_path)?;
            handle_import_keepers(
                &mut db,
                ImportKeepersParams {
                    input,
                    season,
                    designation_date,
                    expected_total,
                },
            )?;
        }

        Commands::ImportHistoricalLineups { input, season } => {
            let mut db = open_database(db_path)?;
            handle_import_historical_lineups(&mut db, HistoricalLineupsParams { input, season })?;
        }

        Commands::ImportLineupPositions {
            inputs,
            season,
            verify_team,
            verify_week,
        } => {
            let mut db = open_database(db_path)?;
            handle_import_lineup_positions(
                &mut db,
                LineupPositionsParams {
                    inputs,
                    season,
                    verify_team,
                    verify_week,
                },
            )?;
        }

        Commands::CalculateKeepers { keepers, exclude } => {
            let db = open_database(db_path)?;
            let exclusions: HashSet<_> = exclude.into_iter().collect();
            handle_calculate_keepers(
                &db,
                KeeperParams {
                    lineups: keepers.lineups,
                    season: keepers.season,
                    designation_date: keepers.designation_date,
                    output_dir: prepare_output_dir(output_dir)?,
                },
                &exclusions,
            )?;
        }

        Commands::FindMissingKeepers {
            keepers,
            draft_cutoff,
            expected,
        } => {
            let db = open_database(db_path)?;
            let expected = expected_keeper_counts(&expected);
            handle_find_missing_keepers(
                &db,
                KeeperParams {
                    lineups: keepers.lineups,
                    season: keepers.season,
                    designation_date: keepers.designation_date,
                    output_dir: prepare_output_dir(output_dir)?,
                },
                &draft_cutoff,
                &expected,
            )?;
        }

        Commands::ReconstructKeepers {
            season,
            designation_date,
        } => {
            let db = open_database(db_path)?;
            handle_reconstruct_keepers(
                &db,
                season,
                &designation_date,
                &prepare_output_dir(output_dir)?,
            )?;
        }

        Commands::ImportPlayerStats {
            weekly,
            schedule,
            play_by_play,
            start_season,
            end_season,
        } => {
            let mut db = open_database(db_path)?;
            handle_import_player_stats(
                &mut db,
                PlayerStatsParams {
                    weekly,
                    schedule,
                    play_by_play,
                    start_season,
                    end_season,
                },
            )?;
        }

        Commands::ImportEspnPlayers => {
            let mut db = open_database(db_path)?;
            handle_import_espn_players(&mut db).await?;
        }

        Commands::RestoreLineups {
            inputs,
            season,
            created_at,
        } => {
            let db = open_database(db_path)?;
            handle_restore_lineups(
                &db,
                RestoreLineupsParams {
                    inputs,
                    season,
                    created_at,
                    output_dir: prepare_output_dir(output_dir)?,
                },
            )?;
        }

        Commands::GenerateRestorationSql { inputs, season } => {
            handle_generate_restoration_sql(&inputs, season, &prepare_output_dir(output_dir)?)?;
        }
    }

    Ok(())
}
