//! Label sources
//!
//! Each mode reads an ordered label sequence from a different file format.
//! The `parse_*` functions work on in-memory text and the `read_*` wrappers
//! attach the path to any failure.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use csv::Reader;
use serde::Deserialize;

use crate::config::{Mode, RunConfig};

#[derive(Debug, Deserialize, PartialEq)]
struct RefundRow {
    fulllabel: String,
}

/// Registry expiries appear both as numbers and as numeric strings.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(untagged)]
enum Expiry {
    Number(i64),
    Text(String),
}

impl Expiry {
    fn unix(&self) -> Option<i64> {
        match self {
            Expiry::Number(n) => Some(*n),
            Expiry::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// One label per line. Empty lines are labels too.
pub fn parse_lines(data: &str) -> Vec<String> {
    data.lines().map(|line| line.trim_end_matches('\r').to_string()).collect()
}

/// Names from a `[[name, expiry], ...]` snapshot whose expiry is after `now`.
pub fn parse_registry(data: &str, now: i64) -> Result<Vec<String>> {
    let entries: Vec<(String, Expiry)> = serde_json::from_str(data).context("Error parsing registry snapshot")?;
    Ok(entries
        .into_iter()
        .filter(|(_, exp)| exp.unix().is_some_and(|exp| exp > now))
        .map(|(name, _)| name)
        .collect())
}

/// The `fulllabel` column of a refund CSV export.
pub fn parse_refund_csv(data: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(data.as_bytes());
    reader
        .deserialize::<RefundRow>()
        .map(|row| row.map(|r| r.fulllabel).context("Error reading CSV row"))
        .collect()
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Error reading {}", path.display()))
}

pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    Ok(parse_lines(&read(path)?))
}

pub fn read_registry(path: &Path, now: i64) -> Result<Vec<String>> {
    parse_registry(&read(path)?, now).with_context(|| format!("in {}", path.display()))
}

pub fn read_refund_csv(path: &Path) -> Result<Vec<String>> {
    parse_refund_csv(&read(path)?).with_context(|| format!("in {}", path.display()))
}

/// Read the labels for the configured mode. `now` is a unix timestamp.
pub fn load_labels(config: &RunConfig, now: i64) -> Result<Vec<String>> {
    match config.mode {
        Mode::Labels => read_lines(&config.input),
        Mode::Active => read_registry(&config.input, now),
        Mode::Matoken => read_refund_csv(&config.input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lines_keep_order_and_blanks() {
        assert_eq!(parse_lines("foo\r\n\nbar\n"), vec!["foo", "", "bar"]);
    }

    #[test]
    fn test_registry_drops_expired() {
        let data = r#"[["alive", 2000], ["dead", 500], ["text", "1500"], ["junk", "soon"]]"#;
        assert_eq!(parse_registry(data, 1000).expect("parse"), vec!["alive", "text"]);
    }

    #[test]
    fn test_registry_rejects_garbage() {
        assert!(parse_registry("{}", 0).is_err());
    }

    #[test]
    fn test_refund_csv() {
        let data = "name,fulllabel,amount\na.eth,a,1\nb.eth,B,2\n";
        assert_eq!(parse_refund_csv(data).expect("parse"), vec!["a", "B"]);
    }

    #[test]
    fn test_refund_csv_missing_column() {
        assert!(parse_refund_csv("name\na\n").is_err());
    }
}
