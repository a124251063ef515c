//! Checking and reporting for rtlcheck runs.
//!
//! The [`Scoreboard`] owns the reference model and replays every
//! transaction against it in design order. Disagreements are classified as
//! [`MismatchKind`]s and collected by the [`ErrorAccumulator`]; a run never
//! stops on a mismatch. A [`Report`] summarizes the run and maps to a
//! process exit code, and [`ReportRenderer`] implementations format it for
//! terminals or tools.

#![warn(missing_docs)]

pub mod accumulator;
pub mod mismatch;
pub mod report;
pub mod scoreboard;

pub use accumulator::ErrorAccumulator;
pub use mismatch::{Field, Mismatch, MismatchKind};
pub use report::{JsonRenderer, Report, ReportRenderer, TextRenderer, Verdict};
pub use scoreboard::Scoreboard;
