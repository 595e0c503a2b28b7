// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Collection run: connect to the PBS server, then fetch and export each
//! category in turn.
//!
//! Categories are independent. A failed query or an unwritable file is logged
//! and the run moves on to the next category; only a connection failure aborts
//! the whole run.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::export::{self, ExportError, OutputFormat};
use crate::pbs::{Category, FetchError, Fetcher, Session};

/// Settings for one collection run
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub server: String,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    /// Restrict the run to these categories; empty means all
    pub categories: Vec<Category>,
    /// PBS installation prefix, clients are looked up in `<prefix>/bin`
    pub pbs_exec: Option<PathBuf>,
}

/// Result of collecting a single category
#[derive(Debug)]
pub enum Outcome {
    Written { path: PathBuf, count: usize },
    FetchFailed(FetchError),
    ExportFailed(ExportError),
}

impl Outcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Outcome::Written { .. })
    }

    pub fn error(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Outcome::Written { .. } => None,
            Outcome::FetchFailed(e) => Some(e),
            Outcome::ExportFailed(e) => Some(e),
        }
    }
}

/// Per-category outcomes of a run, in collection order
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<(Category, Outcome)>,
}

impl RunSummary {
    pub fn written(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_written()).count()
    }

    /// Total number of records across all written documents
    pub fn records(&self) -> usize {
        self.outcomes
            .iter()
            .map(|(_, o)| match o {
                Outcome::Written { count, .. } => *count,
                _ => 0,
            })
            .sum()
    }

    /// Files written, in collection order
    pub fn paths(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter_map(|(_, o)| match o {
                Outcome::Written { path, .. } => Some(path.as_path()),
                _ => None,
            })
            .collect()
    }

    pub fn failed(&self) -> Vec<Category> {
        self.outcomes
            .iter()
            .filter(|(_, o)| !o.is_written())
            .map(|(c, _)| *c)
            .collect()
    }
}

/// Categories to collect, in the fixed collection order
pub fn selected_categories(requested: &[Category]) -> Vec<Category> {
    if requested.is_empty() {
        return Category::ALL.to_vec();
    }
    Category::ALL
        .iter()
        .copied()
        .filter(|c| requested.contains(c))
        .collect()
}

/// Run a full collection against the configured server
pub fn run_collection(config: &CollectorConfig) -> Result<RunSummary> {
    let session = Session::connect(&config.server, config.pbs_exec.clone())
        .with_context(|| format!("Cannot connect to {}", config.server))?;
    tracing::info!("Connected to {}", session.server());

    let categories = selected_categories(&config.categories);
    let summary = collect_categories(&session, &categories, &config.output_dir, config.format);

    session.disconnect();
    Ok(summary)
}

/// Fetch and export each category, continuing past failures
pub fn collect_categories<F: Fetcher + ?Sized>(
    fetcher: &F,
    categories: &[Category],
    output_dir: &Path,
    format: OutputFormat,
) -> RunSummary {
    let mut summary = RunSummary::default();
    for &category in categories {
        let outcome = collect_category(fetcher, category, output_dir, format);
        summary.outcomes.push((category, outcome));
    }
    summary
}

/// Fetch one category and export it; the records are dropped once written
pub fn collect_category<F: Fetcher + ?Sized>(
    fetcher: &F,
    category: Category,
    output_dir: &Path,
    format: OutputFormat,
) -> Outcome {
    tracing::info!("Getting {} info", category);

    let records = match fetcher.fetch(category) {
        Ok(records) => records,
        Err(e) => {
            tracing::error!(%category, "{}", e);
            return Outcome::FetchFailed(e);
        }
    };

    match export::export(&records, category.as_str(), output_dir, format) {
        Ok(path) => {
            tracing::info!(%category, count = records.len(), "Wrote {}", path.display());
            Outcome::Written {
                path,
                count: records.len(),
            }
        }
        Err(e) => {
            tracing::error!(%category, "{}", e);
            Outcome::ExportFailed(e)
        }
    }
}
