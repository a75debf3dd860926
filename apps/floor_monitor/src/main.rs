use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use floor_render::ProjectionKind;
use reconciler::{
    ColorStrategyKind, FloorMonitor, HttpFeedSource, RefreshOutcome, StateReconciler, TaskSentinel,
};
use shared::domain::IndexBase;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use warehouse::GridModel;

mod config;
mod terminal;

use terminal::TerminalRenderer;

#[derive(Parser, Debug)]
struct Args {
    /// Settings file; missing files are ignored.
    #[arg(long, default_value = config::SETTINGS_FILE)]
    config: PathBuf,
    #[arg(long)]
    feed_url: Option<String>,
    #[arg(long)]
    poll_interval_secs: Option<u64>,
    #[arg(long)]
    color_strategy: Option<ColorStrategyKind>,
    #[arg(long)]
    projection: Option<ProjectionKind>,
    /// 0 when the feed reports vehicle rows and columns 0-indexed.
    #[arg(long)]
    vehicle_index_base: Option<IndexBase>,
    /// Layout TOML; the standard 12x18 floor is used when absent.
    #[arg(long)]
    layout: Option<PathBuf>,
}

impl Args {
    fn apply_to(&self, settings: &mut config::Settings) {
        if let Some(v) = &self.feed_url {
            settings.feed_url = v.clone();
        }
        if let Some(v) = self.poll_interval_secs {
            settings.poll_interval_secs = v;
        }
        if let Some(v) = self.color_strategy {
            settings.color_strategy = v;
        }
        if let Some(v) = self.projection {
            settings.projection = v;
        }
        if let Some(v) = self.vehicle_index_base {
            settings.vehicle_index_base = v;
        }
        if let Some(v) = &self.layout {
            settings.layout_path = Some(v.clone());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut settings = config::load_settings(&args.config)?;
    args.apply_to(&mut settings);

    let feed_url = settings.feed_url()?;
    let period = settings.poll_interval()?;
    let layout = settings.load_layout()?;
    let grid = GridModel::from_layout(&layout).context("invalid warehouse layout")?;
    info!(
        rows = grid.rows(),
        cols = grid.cols(),
        storage_slots = grid.occupancy_stats().total,
        "warehouse grid ready"
    );

    let source = HttpFeedSource::new(feed_url, settings.request_timeout())
        .context("failed to build feed client")?;
    let reconciler = StateReconciler::new(
        grid,
        settings.color_strategy.build(),
        TaskSentinel::new(settings.idle_tasks.clone()),
    )
    .with_index_base(settings.vehicle_index_base);
    let monitor = FloorMonitor::new(
        reconciler,
        Arc::new(source),
        settings.projection.build(),
        Box::new(TerminalRenderer::stdout()),
    );
    let poller = monitor.spawn_polling(period);

    info!("commands: <enter> refresh, m cycle labels, s counters, q quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                match line.trim() {
                    "" | "r" => {
                        if monitor.refresh_now().await == RefreshOutcome::Skipped {
                            info!("refresh already in progress");
                        }
                    }
                    "m" => {
                        let mode = monitor.toggle_display_mode().await;
                        info!(?mode, "display mode changed");
                    }
                    "s" => {
                        let counters = monitor.counters();
                        info!(
                            completed = counters.completed,
                            failed = counters.failed,
                            skipped_cycles = counters.skipped_cycles,
                            skipped_entries = counters.skipped_entries,
                            "monitor counters"
                        );
                    }
                    "q" => break,
                    other => warn!(command = other, "unknown command"),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    poller.abort();
    info!("floor monitor stopped");
    Ok(())
}
