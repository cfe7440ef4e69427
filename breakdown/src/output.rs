//! Writing a run to disk
//!
//! The output directory is emptied of regular files first, so a re-run over
//! the same corpus leaves the same set of files behind.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{error, info};

use crate::classify::Breakdown;
use crate::diffcat::Category;
use crate::html::render_document;
use crate::report::{bucket_report, index_page, ReportContext};

pub const TALLY_FILE: &str = "tally.json";
pub const INDEX_FILE: &str = "index.html";

/// `tally.json`: `created`, the two counters, then every bucket in
/// registry order.
pub struct Tally<'a> {
    pub created: &'a str,
    pub breakdown: &'a Breakdown,
}

impl Serialize for Tally<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3 + self.breakdown.buckets.len()))?;
        map.serialize_entry("created", self.created)?;
        map.serialize_entry("same", &self.breakdown.same)?;
        map.serialize_entry("diff_case", &self.breakdown.diff_case)?;
        for bucket in &self.breakdown.buckets {
            map.serialize_entry(bucket.spec.title, &bucket.records)?;
        }
        map.end()
    }
}

/// Create `dir` and delete the regular files already in it.
pub fn prepare_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Error creating {}", dir.display()))?;
    for entry in fs::read_dir(dir).with_context(|| format!("Error listing {}", dir.display()))? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            fs::remove_file(entry.path()).with_context(|| format!("Error removing {}", entry.path().display()))?;
        }
    }
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Error writing {}", path.display()))
}

/// Write the tally, every bucket report and the index into `out_dir`.
///
/// Returns the paths written, in order.
pub fn write_reports(
    out_dir: &Path,
    breakdown: &Breakdown,
    categories: &[Category],
    ctx: &ReportContext,
) -> Result<Vec<PathBuf>> {
    prepare_dir(out_dir)?;
    let mut written = Vec::new();

    let tally = Tally {
        created: ctx.created,
        breakdown,
    };
    let path = out_dir.join(TALLY_FILE);
    write_file(&path, &serde_json::to_string(&tally)?)?;
    written.push(path);

    for bucket in &breakdown.buckets {
        let Some(report) = bucket.spec.report else {
            continue;
        };
        let node = bucket_report(report, &bucket.records, categories, ctx);
        let path = out_dir.join(format!("{}.html", report.name));
        if let Err(e) = write_file(&path, &render_document(&node)) {
            error!(report = report.name, "Error writing report");
            println!("{} {}", "Error writing report:".red(), report.name);
            return Err(e.context(format!("Error writing report: {}", report.name)));
        }
        info!(report = report.name, records = bucket.len(), "wrote report");
        println!("{} {}", "Wrote report:".green(), report.name);
        written.push(path);
    }

    let path = out_dir.join(INDEX_FILE);
    write_file(&path, &render_document(&index_page(breakdown, ctx)))?;
    written.push(path);
    Ok(written)
}
