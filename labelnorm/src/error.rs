//! Normalization error taxonomy
//!
//! A failed normalization is a [`NormError`]: a fixed [`ErrorKind`] plus an
//! optional free-form detail. The textual form is `kind` or `kind: detail`,
//! which is also what [`NormError::from_message`] accepts from normalizers
//! that only report strings.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DisallowedCharacter,
    IllegalMixture,
    WholeScriptConfusable,
    IllegalPlacement,
    DuplicateNsm,
    ExcessiveNsm,
    UnderscorePlacement,
    InvalidLabelExtension,
    EmptyLabel,
    /// Structural: the input contains a label separator.
    NotALabel,
    /// A key outside the known taxonomy.
    Unrecognized(String),
}

impl ErrorKind {
    /// Every recognised kind, in report order.
    pub const KNOWN: [ErrorKind; 10] = [
        ErrorKind::DisallowedCharacter,
        ErrorKind::IllegalMixture,
        ErrorKind::WholeScriptConfusable,
        ErrorKind::IllegalPlacement,
        ErrorKind::DuplicateNsm,
        ErrorKind::ExcessiveNsm,
        ErrorKind::UnderscorePlacement,
        ErrorKind::InvalidLabelExtension,
        ErrorKind::EmptyLabel,
        ErrorKind::NotALabel,
    ];

    /// The message key for this kind.
    pub fn key(&self) -> &str {
        match self {
            ErrorKind::DisallowedCharacter => "disallowed character",
            ErrorKind::IllegalMixture => "illegal mixture",
            ErrorKind::WholeScriptConfusable => "whole-script confusable",
            ErrorKind::IllegalPlacement => "illegal placement",
            ErrorKind::DuplicateNsm => "duplicate non-spacing marks",
            ErrorKind::ExcessiveNsm => "excessive non-spacing marks",
            ErrorKind::UnderscorePlacement => "underscore allowed only at start",
            ErrorKind::InvalidLabelExtension => "invalid label extension",
            ErrorKind::EmptyLabel => "empty label",
            ErrorKind::NotALabel => "not a label",
            ErrorKind::Unrecognized(key) => key,
        }
    }

    /// Look up a kind by its message key. Unknown keys are kept verbatim.
    pub fn from_key(key: &str) -> Self {
        Self::KNOWN
            .iter()
            .find(|kind| kind.key() == key)
            .cloned()
            .unwrap_or_else(|| ErrorKind::Unrecognized(key.to_string()))
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}{}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
pub struct NormError {
    pub kind: ErrorKind,
    pub detail: Option<String>,
}

impl NormError {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, detail: None }
    }

    pub fn with_detail(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: Some(detail.into()),
        }
    }

    /// Parse a `kind` or `kind: detail` message.
    ///
    /// Splits on the first `:` only, so details may contain further colons.
    /// Both halves are trimmed.
    pub fn from_message(message: &str) -> Self {
        match message.split_once(':') {
            None => Self::new(ErrorKind::from_key(message.trim())),
            Some((key, detail)) => Self::with_detail(ErrorKind::from_key(key.trim()), detail.trim()),
        }
    }
}
