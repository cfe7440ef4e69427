//! Breakdown - sort a label corpus by normalization outcome
//!
//! Labels are read by [`source`], folded into buckets by [`classify`], the
//! different-norm bucket is split further by [`diffcat`], and [`output`]
//! writes `tally.json` plus one HTML page per reported bucket. [`census`]
//! holds the smaller corpus counts used by the `label_census` tool.

pub mod census;
pub mod classify;
pub mod config;
pub mod console;
pub mod diffcat;
pub mod html;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod source;

pub use classify::{classify, Breakdown, ClassifyError, Record, REGISTRY};
pub use config::{Mode, RunConfig};
pub use pipeline::run;
