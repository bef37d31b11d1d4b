//! Netsense CLI
//!
//! # Usage
//!
//! ```bash
//! # Rank the signals of one netlist
//! netsense rank --input c17.v --output-dir gnn_ranks
//!
//! # Rank every netlist of a directory and write timing_report.csv
//! netsense batch --input-dir netlists --output-dir gnn_ranks --no-cache
//! ```
//!
//! The hidden `worker` subcommand is spawned by the extractor itself.

use anyhow::Context;
use clap::{Parser, Subcommand};
use netsense_core::features::structural::run_worker;
use netsense_core::{init_rayon, BatchRunner, EngineConfig, FileOutcome, SensitivityPipeline};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "netsense")]
#[command(about = "Unsupervised netlist signal sensitivity ranking", long_about = None)]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the signals of one netlist
    Rank {
        /// Netlist file
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for the ranking file
        #[arg(short, long, default_value = "./gnn_ranks")]
        output_dir: PathBuf,

        /// Only read this module's body
        #[arg(long)]
        top_module: Option<String>,

        /// YAML configuration (version: 1)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Rank every *.v netlist of a directory
    Batch {
        /// Directory holding netlists
        #[arg(long)]
        input_dir: PathBuf,

        /// Output directory for rankings and the timing report
        #[arg(short, long, default_value = "./gnn_ranks")]
        output_dir: PathBuf,

        /// YAML configuration (version: 1)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Ignore existing cache entries (new ones are still written)
        #[arg(long)]
        no_cache: bool,
    },

    /// Feature worker: one framed job on stdin, one framed reply on stdout
    #[command(hide = true)]
    Worker,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries worker frames, so logs always go to stderr
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Rank {
            input,
            output_dir,
            top_module,
            config,
        } => {
            init_rayon();
            let pipeline =
                SensitivityPipeline::new(load_config(config.as_deref())?)?.with_top_module(top_module);
            match pipeline.run_file(&input, &output_dir)? {
                FileOutcome::Ranked {
                    nodes,
                    ranking_path,
                    feature_secs,
                    train_secs,
                    cache_hit,
                } => info!(
                    nodes,
                    cache_hit,
                    "done in {:.2}s (features {:.2}s, training {:.2}s): {}",
                    feature_secs + train_secs,
                    feature_secs,
                    train_secs,
                    ranking_path.display()
                ),
                FileOutcome::Skipped { reason } => info!("skipped {}: {}", input.display(), reason),
            }
        }
        Commands::Batch {
            input_dir,
            output_dir,
            config,
            no_cache,
        } => {
            init_rayon();
            let mut config = load_config(config.as_deref())?;
            if no_cache {
                config.cache.enabled = false;
            }
            let runner = BatchRunner::new(SensitivityPipeline::new(config)?);
            let summary = runner.run(&input_dir, &output_dir)?;
            info!(
                ranked = summary.ranked(),
                skipped = summary.skipped(),
                failed = summary.failed(),
                "batch finished"
            );
            if let Some(path) = &summary.report_path {
                info!("timing report: {}", path.display());
            }
            println!("{}", summary.to_json()?);
        }
        Commands::Worker => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            run_worker(&mut stdin.lock(), &mut stdout.lock()).context("feature worker failed")?;
        }
    }

    Ok(())
}

/// Configuration file or defaults, with this executable as the worker program
fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let mut config = match path {
        Some(path) => EngineConfig::from_yaml(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if config.extraction.worker_program.is_none() {
        config.extraction.worker_program = std::env::current_exe().ok();
    }
    Ok(config)
}
