//! Roomtrace CLI - feed access events into the occupancy engine
//!
//! The engine itself has no ingestion surface; this binary is the
//! collaborator that reads events (from a file, or generated traffic) and
//! reports the derived occupancy and visit history.

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use roomtrace_core::prelude::*;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

#[derive(Parser)]
#[command(name = "roomtrace")]
#[command(author, version, about = "Room occupancy and visit-session tracking", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay access events from a newline-delimited JSON file
    Replay {
        /// Path to the event file; one {"room": ..., "user": ...} per line
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Generate random toggle traffic and report the resulting state
    Simulate {
        /// Number of rooms
        #[arg(long, default_value_t = 4)]
        rooms: usize,
        /// Number of users (each bound to one room)
        #[arg(long, default_value_t = 12)]
        users: usize,
        /// Number of access events to generate
        #[arg(long, default_value_t = 200)]
        events: usize,
        /// Number of concurrent submitter tasks
        #[arg(long, default_value_t = 8)]
        tasks: usize,
        /// Seed for reproducible traffic
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// One access event as it appears in a replay file
#[derive(Debug, Deserialize)]
struct AccessRecord {
    room: String,
    user: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; diagnostics go to stderr so stdout stays
    // machine-readable under --format json
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("roomtrace_core=info".parse()?)
                .add_directive("roomtrace=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay { file } => cmd_replay(&file, cli.format, cli.quiet).await,

        Commands::Simulate {
            rooms,
            users,
            events,
            tasks,
            seed,
        } => cmd_simulate(rooms, users, events, tasks, seed, cli.format, cli.quiet).await,
    }
}

async fn cmd_replay(file: &PathBuf, format: OutputFormat, quiet: bool) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read event file {}", file.display()))?;

    let engine = OccupancyEngine::new();
    let mut applied: usize = 0;
    let mut skipped: usize = 0;

    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // This is the validation boundary: the engine expects clean tokens,
        // so malformed or empty-identifier events stop here.
        let record: AccessRecord = match serde_json::from_str(line) {
            Ok(record) => record,
            Err(err) => {
                warn!(line = index + 1, %err, "Skipping malformed event");
                skipped += 1;
                continue;
            }
        };
        if record.room.trim().is_empty() || record.user.trim().is_empty() {
            warn!(line = index + 1, "Skipping event with empty identifier");
            skipped += 1;
            continue;
        }

        engine
            .record_access(&RoomId::new(record.room), &UserId::new(record.user))
            .await;
        applied += 1;
    }

    report(&engine, applied, skipped, format, quiet).await
}

async fn cmd_simulate(
    rooms: usize,
    users: usize,
    events: usize,
    tasks: usize,
    seed: Option<u64>,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    anyhow::ensure!(rooms > 0, "simulation needs at least one room");
    anyhow::ensure!(users > 0, "simulation needs at least one user");

    let seed = seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    // Each user always badges at their home room, the way a real credential
    // does; concurrency then only interleaves independent toggles.
    let picks: Vec<usize> = (0..events).map(|_| rng.gen_range(0..users)).collect();

    let engine = Arc::new(OccupancyEngine::new());
    let chunk_size = events.div_ceil(tasks.max(1)).max(1);

    let mut handles = Vec::new();
    for chunk in picks.chunks(chunk_size) {
        let chunk = chunk.to_vec();
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            for pick in chunk {
                let room = RoomId::new(format!("room-{}", pick % rooms));
                let user = UserId::new(format!("user-{pick}"));
                engine.record_access(&room, &user).await;
            }
        }));
    }
    for handle in handles {
        handle.await.context("submitter task panicked")?;
    }

    if !quiet {
        if let OutputFormat::Text = format {
            println!("Simulated {events} events across {rooms} rooms (seed {seed})");
        }
    }
    report(&engine, events, 0, format, quiet).await
}

async fn report(
    engine: &OccupancyEngine,
    applied: usize,
    skipped: usize,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let stats = engine.stats().await;
    let completed = engine.completed_sessions();
    let open = engine.open_sessions().await;

    match format {
        OutputFormat::Json => {
            let payload = serde_json::json!({
                "applied": applied,
                "skipped": skipped,
                "stats": stats,
                "completed_sessions": completed,
                "open_sessions": open,
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        OutputFormat::Text => {
            if !quiet {
                println!("Applied {applied} events ({skipped} skipped)");
            }
            println!("Completed visits: {}", completed.len());
            if !quiet {
                for visit in &completed {
                    let ended = visit
                        .ended_at
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "  {} visited {}: {} -> {}",
                        visit.user_id,
                        visit.room_id,
                        visit.started_at.to_rfc3339(),
                        ended
                    );
                }
            }
            if !open.is_empty() {
                let inside: Vec<String> = open
                    .iter()
                    .map(|s| format!("{} in {}", s.user_id, s.room_id))
                    .collect();
                println!("Still inside: {}", inside.join(", "));
            }
            println!(
                "Rooms: {}  Occupants: {}  Open sessions: {}  Anomalies: {}",
                stats.rooms, stats.occupants, stats.open_sessions, stats.anomalies
            );
        }
    }

    Ok(())
}
