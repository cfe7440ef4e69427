//! Labelnorm - label normalization primitives
//!
//! This crate defines the seams the breakdown pipeline is built on: the
//! [`Normalize`] and [`Tokenize`] traits, the [`Token`] model and the
//! [`NormError`] taxonomy. It also ships a small reference [`Normalizer`] and
//! a parser for codepoint set specifications.

pub mod cps;
pub mod cpspec;
pub mod error;
pub mod normalizer;
pub mod tables;
pub mod token;

pub use cpspec::{parse_cps, CodepointSet, CodepointSpecError};
pub use error::{ErrorKind, NormError};
pub use normalizer::Normalizer;
pub use token::Token;

/// Turns a label into its normalized form, or explains why it can't.
pub trait Normalize {
    fn normalize(&self, label: &str) -> Result<String, NormError>;
}

/// Describes how each run of a label was interpreted.
pub trait Tokenize {
    fn tokenize(&self, label: &str) -> Vec<Token>;
}

impl<F> Normalize for F
where
    F: Fn(&str) -> Result<String, NormError>,
{
    fn normalize(&self, label: &str) -> Result<String, NormError> {
        self(label)
    }
}

impl<F> Tokenize for F
where
    F: Fn(&str) -> Vec<Token>,
{
    fn tokenize(&self, label: &str) -> Vec<Token> {
        self(label)
    }
}
