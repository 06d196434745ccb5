// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava World Map sync tool.
//!
//! Keeps `activities.json` up to date with the athlete's Strava activities
//! so the map page can draw every recorded track.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use strava_world_map::{
    config::Config,
    db::ActivityStore,
    error::AppError,
    models::ActivityStats,
    services::{StravaClient, SyncMode, SyncReport, SyncStatus, Synchronizer},
    time_utils::format_utc_rfc3339,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "strava-world-map", version, about = "Sync Strava activities for the world map")]
struct Cli {
    /// Activities document to read and write (overrides ACTIVITIES_PATH)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch activities newer than the latest local one
    Sync {
        /// Activities per listing page (overrides STRAVA_PAGE_SIZE)
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Walk the whole history and fetch any activity missing locally
    FetchAll {
        /// Activities per listing page (overrides STRAVA_PAGE_SIZE)
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Print statistics for the local activities
    Stats,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\nERROR: {e:#}");
            if e
                .downcast_ref::<AppError>()
                .is_some_and(AppError::is_unauthorized)
            {
                eprintln!("\nYour access token was rejected. Re-authenticate and update STRAVA_ACCESS_TOKEN.");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Sync { page_size } => {
            sync(SyncMode::Incremental, cli.output, page_size).await
        }
        Command::FetchAll { page_size } => sync(SyncMode::Full, cli.output, page_size).await,
        Command::Stats => {
            let path = cli.output.unwrap_or_else(Config::activities_path_from_env);
            let store = ActivityStore::new(path);
            let records = store
                .load()
                .with_context(|| format!("Could not load {}", store.path().display()))?;
            print_stats(&ActivityStats::from_records(&records));
            Ok(())
        }
    }
}

async fn sync(
    mode: SyncMode,
    output: Option<PathBuf>,
    page_size: Option<u32>,
) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;
    if let Some(path) = output {
        config.activities_path = path;
    }
    if let Some(size) = page_size.filter(|&n| n > 0) {
        config.page_size = size;
    }

    let client = StravaClient::new(&config);
    let store = ActivityStore::new(config.activities_path.clone());
    let synchronizer = Synchronizer::new(&client, &store, &config);

    let report = synchronizer.run(mode).await?;
    print_report(&report, &store);
    Ok(())
}

fn print_report(report: &SyncReport, store: &ActivityStore) {
    println!();
    match report.cutoff {
        Some(cutoff) => println!("Fetched activities after {}", format_utc_rfc3339(cutoff)),
        None => println!("Fetched activities from the beginning of history"),
    }

    match report.status {
        SyncStatus::Completed if report.new_activities == 0 => {
            println!("No new activities to sync. You're up to date!");
        }
        SyncStatus::Completed => {
            println!("Synced {} new activities", report.new_activities);
        }
        SyncStatus::Throttled => {
            println!("Rate limit reached!");
            println!("   Saved {} new activities so far.", report.new_activities);
            println!("   Wait 15-20 minutes and run this command again to continue.");
        }
    }

    if report.new_activities > 0 {
        println!(
            "New activities with GPS data: {}/{}",
            report.new_with_coordinates, report.new_activities
        );
    }
    if report.failed_details > 0 {
        println!("Skipped {} activities whose details failed to load", report.failed_details);
    }
    println!(
        "Total activities: {} ({} with GPS data) in {}",
        report.total_activities,
        report.total_with_coordinates,
        store.path().display()
    );
}

fn print_stats(stats: &ActivityStats) {
    println!("\nTotal Activities: {}", stats.total_activities);
    println!("Total Distance: {:.2} km", stats.total_distance_km());
    println!("Total Time: {:.2} hours", stats.total_moving_hours());

    println!("\nActivities by type:");
    for (sport, count) in stats.sports_by_count() {
        println!("  {sport}: {count}");
    }

    println!(
        "\nActivities with GPS data: {}/{}",
        stats.with_coordinates, stats.total_activities
    );

    if let (Some(oldest), Some(newest)) = (stats.oldest, stats.newest) {
        println!("\nDate range:");
        println!("   Oldest: {}", oldest.format("%Y-%m-%d"));
        println!("   Newest: {}", newest.format("%Y-%m-%d"));
    }
}

/// Initialize logging to stderr, human-readable or JSON.
fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("strava_world_map=info,warn"));

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
