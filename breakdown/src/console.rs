//! Console output shared by the binaries

use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};
use tracing_subscriber::EnvFilter;

use crate::classify::Breakdown;
use crate::report::percent;

/// Install the stderr `tracing` subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn print_section(title: &str) {
    println!("\n{}", title.bold().underline());
}

#[derive(Tabled)]
struct CountRow {
    #[tabled(rename = "Outcome")]
    outcome: String,
    #[tabled(rename = "Labels")]
    count: usize,
    #[tabled(rename = "Share")]
    share: String,
}

fn count_rows(breakdown: &Breakdown) -> Vec<CountRow> {
    let row = |outcome: &str, count: usize| CountRow {
        outcome: outcome.to_string(),
        count,
        share: percent(count, breakdown.total),
    };
    let mut rows = vec![row("same", breakdown.same), row("diff_case", breakdown.diff_case)];
    rows.extend(breakdown.buckets.iter().map(|b| row(b.spec.title, b.len())));
    rows
}

/// The counters and bucket sizes as a table.
pub fn counts_table(breakdown: &Breakdown) -> String {
    Table::new(count_rows(breakdown)).with(Style::modern()).to_string()
}

pub fn print_counts(breakdown: &Breakdown) {
    print_section("Errors");
    println!("{}", counts_table(breakdown));
    let accounted = breakdown.accounted();
    if accounted == breakdown.total {
        println!("{} {}", "Total:".bold(), breakdown.total);
    } else {
        println!(
            "{} {} of {} labels accounted for",
            "Total:".bold(),
            accounted.to_string().red(),
            breakdown.total
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify, REGISTRY};
    use labelnorm::NormError;

    #[test]
    fn test_counts_table_lists_everything() {
        let norm = |label: &str| -> Result<String, NormError> { Ok(label.to_lowercase()) };
        let breakdown = classify(["a", "B", "c.d", "e"], &norm, REGISTRY).expect("classify");
        let table = counts_table(&breakdown);
        assert!(table.contains("Outcome"));
        assert!(table.contains("diff_case"));
        assert!(table.contains("not a label"));
        assert!(table.contains("50.00%"));
        assert_eq!(count_rows(&breakdown).len(), REGISTRY.len() + 2);
    }
}
