use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use floor_render::{DiscardRenderer, DisplayMode, ProjectionKind};
use reconciler::{ColorStrategyKind, FileFeedSource, StateReconciler, TaskSentinel};
use shared::domain::IndexBase;
use warehouse::{GridModel, LayoutConfig};

#[derive(Parser, Debug)]
struct Cli {
    /// Layout TOML; the standard 12x18 floor when omitted.
    #[arg(long)]
    layout: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the layout as TOML, a starting point for custom floors.
    DumpLayout,
    /// Print slot kinds per row and the occupancy totals.
    Layout {
        #[arg(long)]
        json: bool,
    },
    /// Reconcile a feed document from disk and print the refresh report.
    CheckFeed {
        path: PathBuf,
        #[arg(long, default_value = "battery_tiers")]
        color_strategy: ColorStrategyKind,
        #[arg(long, default_value = "icon")]
        projection: ProjectionKind,
        #[arg(long, default_value = "none")]
        mode: DisplayMode,
        /// 0 when the feed reports vehicle rows and columns 0-indexed.
        #[arg(long, default_value = "1")]
        vehicle_index_base: IndexBase,
        /// Also print the projected scene.
        #[arg(long)]
        scene: bool,
    },
}

fn load_layout(path: Option<&PathBuf>) -> Result<LayoutConfig> {
    let Some(path) = path else {
        return Ok(LayoutConfig::standard_floor());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read layout file '{}'", path.display()))?;
    LayoutConfig::from_toml(&raw).with_context(|| format!("invalid layout file '{}'", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let layout = load_layout(cli.layout.as_ref())?;
    let grid = GridModel::from_layout(&layout).context("invalid warehouse layout")?;

    match cli.command {
        Command::DumpLayout => {
            print!("{}", toml::to_string_pretty(&layout)?);
        }
        Command::Layout { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&grid)?);
                return Ok(());
            }
            for row in 0..grid.rows() {
                let kinds: Vec<&str> = grid
                    .iter()
                    .filter(|(pos, _)| pos.row == row)
                    .map(|(_, slot)| slot.kind().as_str())
                    .collect();
                println!("{:>3}: {}", row + 1, kinds.join(" "));
            }
            let stats = grid.occupancy_stats();
            println!(
                "storage slots: {} (used {}, free {}, locked {})",
                stats.total,
                stats.used,
                stats.free,
                stats.locked()
            );
        }
        Command::CheckFeed {
            path,
            color_strategy,
            projection,
            mode,
            vehicle_index_base,
            scene,
        } => {
            let mut reconciler =
                StateReconciler::new(grid, color_strategy.build(), TaskSentinel::default())
                    .with_index_base(vehicle_index_base);
            let projection = projection.build();
            let source = FileFeedSource::new(path);
            let report = reconciler
                .refresh(&source, &mut DiscardRenderer, projection.as_ref(), mode)
                .await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if scene {
                let scene = reconciler.scene(projection.as_ref(), mode);
                println!("{}", serde_json::to_string_pretty(&scene)?);
            }
        }
    }

    Ok(())
}
