mod config;
mod dashboard;
mod domain;
mod gateways;
mod paths;
mod stage_machine;
mod structured_logger;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use config::DashboardConfig;
use dashboard::retry::RetryCoordinator;
use dashboard::snapshot::DashboardView;
use dashboard::Aggregator;
use domain::types::{DomainKey, Generation, VentureId};
use gateways::http::ApiClient;
use gateways::{Gateways, StagePromotionGateway};
use stage_machine::{StageCommand, StageEvent, StageMachine};
use structured_logger::StructuredLogger;

#[derive(Parser)]
#[command(name = "venture")]
#[command(about = "Incubation dashboard aggregator and stage tracker")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("VENTURE_DASHBOARD_GIT_SHA"), ")"))]
struct Cli {
    /// Path to the YAML config (defaults to ~/.venture-dashboard/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one aggregation cycle and print the dashboard
    Show {
        /// Print the snapshot and stats as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Refresh on an interval and print each settled view
    Watch {
        /// Seconds between refreshes (overrides the config)
        #[arg(short, long)]
        interval: Option<u64>,
    },
    /// Advance the venture to the next substage
    Promote {
        /// Venture whose stage should advance
        #[arg(long)]
        venture: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = config::resolve_path(cli.config)?;
    let config = DashboardConfig::load(&config_path)?;

    let client = Arc::new(ApiClient::new(&config.api)?);
    let logger = Arc::new(StructuredLogger::new(
        &Uuid::new_v4().to_string(),
        &paths::logs_dir()?,
    )?);

    match cli.command {
        Command::Show { json } => show(client, logger, json).await,
        Command::Watch { interval } => watch(&config, client, logger, interval).await,
        Command::Promote { venture } => promote(&config, client, logger, venture.into()).await,
    }
}

async fn show(client: Arc<ApiClient>, logger: Arc<StructuredLogger>, json: bool) -> Result<()> {
    let aggregator = Aggregator::new(Gateways::over_http(client));
    let (coordinator, _view_rx) = RetryCoordinator::new(aggregator, logger);

    let view = coordinator
        .refresh()
        .await
        .context("Aggregation cycle was superseded")?;

    if json {
        let payload = serde_json::json!({
            "snapshot": &*view.snapshot,
            "stats": view.stats,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print_view(&view);
    }
    Ok(())
}

async fn watch(
    config: &DashboardConfig,
    client: Arc<ApiClient>,
    logger: Arc<StructuredLogger>,
    interval_override: Option<u64>,
) -> Result<()> {
    let interval = Duration::from_secs(interval_override.unwrap_or(config.refresh.interval_secs));
    let aggregator = Aggregator::new(Gateways::over_http(client));
    let (coordinator, mut view_rx) = RetryCoordinator::new(aggregator, logger);

    // Printing happens on the subscriber side; the loop below only
    // schedules refresh cycles.
    tokio::spawn(async move {
        while view_rx.changed().await.is_ok() {
            let view = view_rx.borrow().clone();
            print_view(&view);
        }
    });

    loop {
        let _ = coordinator.refresh().await;
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}

async fn promote(
    config: &DashboardConfig,
    client: Arc<ApiClient>,
    logger: Arc<StructuredLogger>,
    venture: VentureId,
) -> Result<()> {
    let aggregator = Aggregator::new(Gateways::over_http(client.clone()));
    let snapshot = aggregator.aggregate(Generation(1)).await;
    let current = snapshot
        .current_stage
        .context("No current stage to promote from")?;

    let track = config.stage_track();
    let (mut machine, _state_rx) = StageMachine::new(
        track.clone(),
        config.promotion.clone(),
        current.progression.clone(),
        logger,
    );

    // Optimistic local step first; the server-confirmed value wins below.
    let events = machine.apply(StageCommand::Promote {
        activities: current.activities.clone(),
    })?;
    for event in &events {
        if let StageEvent::StageEntered { stage } = event {
            println!("Entering stage: {stage}");
        }
    }

    let confirmed = client.advance_stage(&venture).await?;
    machine.apply(StageCommand::Reconcile { confirmed })?;

    let state = machine.state();
    let step = track
        .step_at(state.flat_index)
        .map(|(stage, substage)| format!("{} / {}", stage.name, substage.name))
        .unwrap_or_else(|| "unknown step".to_string());
    println!("Now at {} ({}% of track)", step, state.progress_percent);
    Ok(())
}

fn print_view(view: &DashboardView) {
    let snapshot = &view.snapshot;
    let stats = &view.stats;

    println!("Dashboard (cycle {})", snapshot.generation);
    match &snapshot.identity {
        Some(user) => println!("  Signed in as {} <{}>", user.name, user.email),
        None => println!("  Signed in as (unavailable)"),
    }
    if let Some(profile) = &snapshot.profile {
        println!("  Venture: {}", profile.venture_name);
    }
    if let Some(stage) = &snapshot.current_stage {
        println!(
            "  Stage: {} / {} ({}%)",
            stage.stage_name, stage.substage_name, stage.progression.progress_percent
        );
    } else {
        println!("  Stage: not started");
    }
    println!(
        "  Activities: {}/{} done, {} pending | Milestones: {} | Upcoming events: {} | Unread: {}",
        stats.completed_activities,
        stats.total_activities,
        stats.pending_activities,
        stats.milestones,
        stats.upcoming_events,
        stats.unread_notifications
    );
    for notification in snapshot.notifications.iter().take(5) {
        let marker = if notification.is_read { " " } else { "*" };
        println!(
            "  {} {} ({})",
            marker,
            notification.message,
            notification.created_at.to_rfc3339()
        );
    }

    if let Some(kind) = snapshot.general_failure() {
        println!("  !! dashboard unavailable: {kind}");
    }
    for (key, kind) in &snapshot.errors {
        if *key == DomainKey::General {
            continue;
        }
        let hint = if kind.requires_reauth() {
            "sign in again"
        } else if kind.is_retryable() {
            "a retry re-runs the whole cycle"
        } else {
            "not retryable"
        };
        println!("  !! {key} unavailable: {kind} ({hint})");
    }
}
