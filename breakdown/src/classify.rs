//! Outcome classification
//!
//! Every label ends up in exactly one place: the `same` counter, the
//! `diff_case` counter, or one bucket of the registry. Classification is a
//! fold over the label sequence; the accumulated [`Breakdown`] is returned to
//! the caller, nothing is kept globally.

use labelnorm::{ErrorKind, NormError, Normalize};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Labels between two progress log lines.
pub const PROGRESS_EVERY: usize = 100_000;

/// Which report builder renders a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Disallowed,
    Diff,
    Mixture,
    Whole,
    Placement,
    Nsm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSpec {
    /// File stem of the HTML report.
    pub name: &'static str,
    pub kind: ReportKind,
}

/// What a bucket collects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collects {
    /// Failures of any of these kinds.
    Errors(&'static [ErrorKind]),
    /// Successful normalizations that differ beyond case.
    Different,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSpec {
    pub title: &'static str,
    pub collects: Collects,
    pub report: Option<ReportSpec>,
}

impl BucketSpec {
    fn accepts(&self, kind: &ErrorKind) -> bool {
        match &self.collects {
            Collects::Errors(kinds) => kinds.contains(kind),
            Collects::Different => false,
        }
    }
}

/// The buckets in report order.
pub static REGISTRY: &[BucketSpec] = &[
    BucketSpec {
        title: "disallowed character",
        collects: Collects::Errors(&[ErrorKind::DisallowedCharacter]),
        report: Some(ReportSpec { name: "disallowed", kind: ReportKind::Disallowed }),
    },
    BucketSpec {
        title: "different norm",
        collects: Collects::Different,
        report: Some(ReportSpec { name: "diff", kind: ReportKind::Diff }),
    },
    BucketSpec {
        title: "illegal mixture",
        collects: Collects::Errors(&[ErrorKind::IllegalMixture]),
        report: Some(ReportSpec { name: "mixtures", kind: ReportKind::Mixture }),
    },
    BucketSpec {
        title: "whole-script confusable",
        collects: Collects::Errors(&[ErrorKind::WholeScriptConfusable]),
        report: Some(ReportSpec { name: "wholes", kind: ReportKind::Whole }),
    },
    BucketSpec {
        title: "illegal placement",
        collects: Collects::Errors(&[ErrorKind::IllegalPlacement]),
        report: Some(ReportSpec { name: "placement", kind: ReportKind::Placement }),
    },
    BucketSpec {
        title: "non-spacing marks",
        collects: Collects::Errors(&[ErrorKind::DuplicateNsm, ErrorKind::ExcessiveNsm]),
        report: Some(ReportSpec { name: "nsm", kind: ReportKind::Nsm }),
    },
    BucketSpec {
        title: "underscore allowed only at start",
        collects: Collects::Errors(&[ErrorKind::UnderscorePlacement]),
        report: None,
    },
    BucketSpec {
        title: "invalid label extension",
        collects: Collects::Errors(&[ErrorKind::InvalidLabelExtension]),
        report: None,
    },
    BucketSpec {
        title: "empty label",
        collects: Collects::Errors(&[ErrorKind::EmptyLabel]),
        report: None,
    },
    BucketSpec {
        title: "not a label",
        collects: Collects::Errors(&[ErrorKind::NotALabel]),
        report: None,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Different {
        label: String,
        norm: String,
    },
    Failed {
        label: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl Record {
    pub fn label(&self) -> &str {
        match self {
            Record::Different { label, .. } | Record::Failed { label, .. } => label,
        }
    }

    /// The failure detail, empty for records without one.
    pub fn error(&self) -> &str {
        match self {
            Record::Failed { error: Some(error), .. } => error,
            _ => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub spec: &'static BucketSpec,
    pub records: Vec<Record>,
}

impl Bucket {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("Expected report type: {0}")]
    UnknownCategory(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakdown {
    pub total: usize,
    pub same: usize,
    pub diff_case: usize,
    pub buckets: Vec<Bucket>,
}

impl Breakdown {
    pub fn new(registry: &'static [BucketSpec]) -> Self {
        Self {
            total: 0,
            same: 0,
            diff_case: 0,
            buckets: registry
                .iter()
                .map(|spec| Bucket {
                    spec,
                    records: Vec::new(),
                })
                .collect(),
        }
    }

    pub fn bucket(&self, title: &str) -> Option<&Bucket> {
        self.buckets.iter().find(|b| b.spec.title == title)
    }

    /// `(label, norm)` pairs of the different-norm bucket, in input order.
    pub fn different(&self) -> impl Iterator<Item = (&str, &str)> {
        self.buckets
            .iter()
            .filter(|b| b.spec.collects == Collects::Different)
            .flat_map(|b| b.records.iter())
            .filter_map(|r| match r {
                Record::Different { label, norm } => Some((label.as_str(), norm.as_str())),
                Record::Failed { .. } => None,
            })
    }

    /// Labels accounted for by the counters and all buckets.
    pub fn accounted(&self) -> usize {
        self.same + self.diff_case + self.buckets.iter().map(Bucket::len).sum::<usize>()
    }

    /// Fold one label into the breakdown.
    pub fn push<N: Normalize + ?Sized>(mut self, label: String, normalizer: &N) -> Result<Self, ClassifyError> {
        self.total += 1;
        if label.contains('.') {
            self.route(&ErrorKind::NotALabel, Record::Failed { label, error: None })?;
            return Ok(self);
        }
        match normalizer.normalize(&label) {
            Ok(norm) if norm == label => self.same += 1,
            Ok(norm) if norm == label.to_lowercase() => self.diff_case += 1,
            Ok(norm) => self.push_different(Record::Different { label, norm })?,
            Err(NormError { kind, detail }) => self.route(&kind, Record::Failed { label, error: detail })?,
        }
        Ok(self)
    }

    fn push_different(&mut self, record: Record) -> Result<(), ClassifyError> {
        let bucket = self
            .buckets
            .iter_mut()
            .find(|b| b.spec.collects == Collects::Different)
            .ok_or_else(|| ClassifyError::UnknownCategory("different norm".to_string()))?;
        bucket.records.push(record);
        Ok(())
    }

    fn route(&mut self, kind: &ErrorKind, record: Record) -> Result<(), ClassifyError> {
        let bucket = self
            .buckets
            .iter_mut()
            .find(|b| b.spec.accepts(kind))
            .ok_or_else(|| ClassifyError::UnknownCategory(kind.key().to_string()))?;
        bucket.records.push(record);
        Ok(())
    }
}

/// Classify every label against `registry`.
///
/// Fails on the first error kind the registry has no bucket for.
pub fn classify<I, N>(labels: I, normalizer: &N, registry: &'static [BucketSpec]) -> Result<Breakdown, ClassifyError>
where
    I: IntoIterator,
    I::Item: Into<String>,
    N: Normalize + ?Sized,
{
    classify_with_progress(labels, normalizer, registry, PROGRESS_EVERY)
}

/// [`classify`], logging a progress line every `every` labels.
pub fn classify_with_progress<I, N>(
    labels: I,
    normalizer: &N,
    registry: &'static [BucketSpec],
    every: usize,
) -> Result<Breakdown, ClassifyError>
where
    I: IntoIterator,
    I::Item: Into<String>,
    N: Normalize + ?Sized,
{
    let every = every.max(1);
    labels.into_iter().try_fold(Breakdown::new(registry), |acc, label| {
        let acc = acc.push(label.into(), normalizer)?;
        if acc.total % every == 0 {
            debug!(processed = acc.total, "classifying");
        }
        Ok(acc)
    })
}
