//! Label corpus breakdown
//!
//! Reads a label corpus, normalizes every label and writes the breakdown
//! reports.
//!
//! Usage:
//! - `breakdown` - newline-delimited labels from `data/labels.txt`
//! - `breakdown active` - unexpired names from a registry snapshot
//! - `breakdown matoken --input refund.csv` - the `fulllabel` column of a CSV

use std::path::PathBuf;

use anyhow::Result;
use breakdown::config::{Mode, RunConfig};
use breakdown::console::init_logging;
use breakdown::{pipeline, source};
use chrono::{SecondsFormat, Utc};
use clap::Parser;
use colored::*;
use labelnorm::Normalizer;

#[derive(Parser)]
#[command(name = "breakdown")]
#[command(about = "Sort a label corpus by normalization outcome and write HTML reports")]
struct Args {
    /// Label source and output layout
    #[arg(value_enum, default_value_t = Mode::Labels)]
    mode: Mode,

    /// Input file, overriding the mode's default
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// Directory the output directory is created in
    #[arg(short = 'o', long = "out-root", default_value = ".")]
    out_root: PathBuf,

    /// Diff category file (`name = codepoints` per line)
    #[arg(short = 'c', long = "categories")]
    categories: Option<PathBuf>,

    /// Log at debug level
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let now = Utc::now();
    let mut config = RunConfig::for_mode(args.mode, &args.out_root, now.date_naive());
    if let Some(input) = args.input {
        config.input = input;
    }
    config.categories = args.categories;

    let labels = source::load_labels(&config, now.timestamp())?;
    println!("{} labels", labels.len().to_string().bold());

    let created = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    let output = pipeline::run(&config, labels, &Normalizer::new(), &created)?;

    println!(
        "\n{} {} files in {}",
        "Done:".green().bold(),
        output.written.len(),
        config.out_dir.display()
    );
    Ok(())
}
