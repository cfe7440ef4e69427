//! One breakdown run, from labels to files

use std::path::PathBuf;

use anyhow::Result;
use labelnorm::{Normalize, Tokenize};
use tracing::info;

use crate::classify::{classify_with_progress, Breakdown, REGISTRY};
use crate::config::RunConfig;
use crate::console::{print_counts, print_section};
use crate::diffcat::{categorize, default_categories, read_categories, Category};
use crate::output::write_reports;
use crate::report::ReportContext;

#[derive(Debug)]
pub struct RunOutput {
    pub breakdown: Breakdown,
    pub categories: Vec<Category>,
    pub written: Vec<PathBuf>,
}

/// Classify `labels`, sub-classify the different-norm bucket and write the
/// reports into `config.out_dir`. `created` is stamped on every page.
pub fn run<N>(config: &RunConfig, labels: Vec<String>, normalizer: &N, created: &str) -> Result<RunOutput>
where
    N: Normalize + Tokenize + ?Sized,
{
    let chars = match &config.categories {
        Some(path) => read_categories(path)?,
        None => default_categories()?,
    };
    let label_count = labels.len();
    info!(labels = label_count, categories = chars.len(), "classifying");

    let breakdown = classify_with_progress(labels, normalizer, REGISTRY, config.progress_every)?;
    print_counts(&breakdown);

    let categories = categorize(breakdown.different(), normalizer, &chars);

    print_section("Reports");
    println!("Directory: {}", config.out_dir.display());
    let ctx = ReportContext {
        label_count,
        created,
        resolver_url: &config.resolver_url,
        confused_url: &config.confused_url,
    };
    let written = write_reports(&config.out_dir, &breakdown, &categories, &ctx)?;
    Ok(RunOutput {
        breakdown,
        categories,
        written,
    })
}
