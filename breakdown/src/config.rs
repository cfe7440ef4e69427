use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::ValueEnum;

use crate::classify::PROGRESS_EVERY;

pub const RESOLVER_URL: &str = "https://adraffy.github.io/ens-normalize.js/test/resolver.html";
pub const CONFUSED_URL: &str = "https://adraffy.github.io/ens-normalize.js/test/confused.html";

/// Where the labels come from and where the reports go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    /// Newline-delimited label list.
    #[default]
    Labels,
    /// JSON registry snapshot, unexpired names only.
    Active,
    /// CSV export with a `fulllabel` column.
    Matoken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub mode: Mode,
    pub input: PathBuf,
    pub out_dir: PathBuf,
    /// Diff category file; the embedded default is used when unset.
    pub categories: Option<PathBuf>,
    pub resolver_url: String,
    pub confused_url: String,
    pub progress_every: usize,
}

impl RunConfig {
    /// Default paths for `mode`, with the output directory under `out_root`.
    pub fn for_mode(mode: Mode, out_root: &Path, today: NaiveDate) -> Self {
        let (input, out_name) = match mode {
            Mode::Labels => ("data/labels.txt", format!("output-{}", datehash(today))),
            Mode::Active => ("data/registered.json", format!("active-{}", datehash(today))),
            Mode::Matoken => ("data/refund_names.csv", "refund-matoken".to_string()),
        };
        Self {
            mode,
            input: PathBuf::from(input),
            out_dir: out_root.join(out_name),
            categories: None,
            resolver_url: RESOLVER_URL.to_string(),
            confused_url: CONFUSED_URL.to_string(),
            progress_every: PROGRESS_EVERY,
        }
    }
}

/// Compact date stamp used in output directory names.
pub fn datehash(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 4, 1).expect("valid date")
    }

    #[test]
    fn test_datehash() {
        assert_eq!(datehash(day()), "20230401");
    }

    #[test]
    fn test_mode_defaults() {
        let labels = RunConfig::for_mode(Mode::Labels, Path::new("out"), day());
        assert_eq!(labels.out_dir, PathBuf::from("out/output-20230401"));
        assert_eq!(labels.input, PathBuf::from("data/labels.txt"));

        let active = RunConfig::for_mode(Mode::Active, Path::new("."), day());
        assert_eq!(active.out_dir, PathBuf::from("./active-20230401"));

        let matoken = RunConfig::for_mode(Mode::Matoken, Path::new("."), day());
        assert_eq!(matoken.out_dir, PathBuf::from("./refund-matoken"));
        assert_eq!(matoken.resolver_url, RESOLVER_URL);
    }
}
