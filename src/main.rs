// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod collector;
mod export;
mod pbs;

use collector::{run_collection, CollectorConfig};
use export::OutputFormat;
use pbs::Category;

#[derive(Parser, Debug)]
#[command(name = "pbs-collector")]
#[command(about = "Dump PBS server inventory (servers, queues, nodes, jobs, reservations, resources, schedulers) to per-category files")]
#[command(version)]
struct Args {
    /// PBS server to query
    server: String,

    /// Existing directory the category files are written to
    output_dir: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Only collect this category (repeatable)
    #[arg(short, long = "category", value_enum)]
    categories: Vec<Category>,

    /// PBS installation prefix; clients are run from <PBS_EXEC>/bin
    #[arg(long, env = "PBS_EXEC")]
    pbs_exec: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl From<Args> for CollectorConfig {
    fn from(args: Args) -> Self {
        Self {
            server: args.server,
            output_dir: args.output_dir,
            format: args.format,
            categories: args.categories,
            pbs_exec: args.pbs_exec,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = CollectorConfig::from(args);
    let summary = run_collection(&config)?;

    for path in summary.paths() {
        tracing::debug!(path = %path.display(), "written");
    }

    let failed = summary.failed();
    if failed.is_empty() {
        tracing::info!(
            "Collected {} categories ({} records) into {}",
            summary.written(),
            summary.records(),
            config.output_dir.display()
        );
    } else {
        let names: Vec<&str> = failed.iter().map(|c| c.as_str()).collect();
        for (category, outcome) in &summary.outcomes {
            if let Some(err) = outcome.error() {
                tracing::debug!(%category, "{}", err);
            }
        }
        tracing::warn!(
            "Collected {} categories ({} records) into {}, failed: {}",
            summary.written(),
            summary.records(),
            config.output_dir.display(),
            names.join(", ")
        );
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
