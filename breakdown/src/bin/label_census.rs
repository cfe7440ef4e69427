//! Label census
//!
//! Corpus counts that feed normalization decisions:
//! - `label_census hyphens -i labels.txt` - hyphen runs, raw and normalized
//! - `label_census hyphen-likes -i labels.txt` - hyphen look-alike usage
//! - `label_census underscores -i labels.txt` - leading underscore runs
//! - `label_census probe NAME...` - does each name normalize to itself

use std::path::PathBuf;

use anyhow::Result;
use breakdown::census::{self, Probe};
use breakdown::console::{init_logging, print_section};
use breakdown::source::read_lines;
use clap::{Parser, Subcommand};
use colored::*;
use labelnorm::Normalizer;
use tracing::info;

#[derive(Parser)]
#[command(name = "label_census")]
#[command(about = "Count hyphens, hyphen look-alikes and underscores in a label corpus")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log at debug level
    #[arg(short = 'v', long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Hyphen runs before and after normalization
    Hyphens(CorpusArgs),
    /// Labels containing each hyphen look-alike
    HyphenLikes(CorpusArgs),
    /// Leading underscore runs among labels that normalize
    Underscores(CorpusArgs),
    /// Report whether each name normalizes to itself
    Probe {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

#[derive(clap::Args)]
struct CorpusArgs {
    /// Newline-delimited labels
    #[arg(short = 'i', long = "input", default_value = "data/labels.txt")]
    input: PathBuf,

    /// Directory the JSON result is written to
    #[arg(short = 'o', long = "out", default_value = "output")]
    out: PathBuf,
}

fn load(args: &CorpusArgs) -> Result<Vec<String>> {
    let labels = read_lines(&args.input)?;
    info!(labels = labels.len(), input = %args.input.display(), "loaded corpus");
    Ok(labels)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let normalizer = Normalizer::new();

    match args.command {
        Command::Hyphens(corpus) => {
            let labels = load(&corpus)?;
            let count = census::hyphen_count(&labels, &normalizer);
            print_section("Hyphen runs");
            for (side, tally) in [("raw", &count.raw), ("norm", &count.norm)] {
                println!("{}: {:?} ext={}", side.bold(), tally.runs, tally.list("ext").len());
            }
            census::write_json(&corpus.out.join("hyphen-count.json"), &count)?;
        }
        Command::HyphenLikes(corpus) => {
            let labels = load(&corpus)?;
            let likes = census::hyphen_likes(&labels, &normalizer);
            print_section("Hyphen look-alikes");
            println!("{} labels contain one", likes.count.to_string().bold());
            for (key, n) in likes.tally.iter().filter(|&(_, &n)| n > 0) {
                println!("  {key}: {n}");
            }
            census::write_json(&corpus.out.join("hyphen-like.json"), &likes)?;
        }
        Command::Underscores(corpus) => {
            let labels = load(&corpus)?;
            let count = census::underscore_count(&labels, &normalizer);
            print_section("Underscores");
            for (run, names) in &count.leading {
                println!("  leading {run}: {}", names.len());
            }
            println!("  elsewhere: {}", count.includes.len());
            census::write_json(&corpus.out.join("underscore-count.json"), &count)?;
        }
        Command::Probe { names } => {
            for name in names {
                match census::probe(&name, &normalizer) {
                    Probe::Normalized(true) => println!("{name} {}", "true".green()),
                    Probe::Normalized(false) => println!("{name} {}", "false".yellow()),
                    Probe::Failed(message) => println!("{name} {}", message.red()),
                }
            }
        }
    }
    Ok(())
}
