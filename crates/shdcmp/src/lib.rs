//! # shdcmp
//!
//! Numerical equivalence checking for binary shade files written by two
//! independent implementations of the same field computation.
//!
//! ## Modules
//!
//! - [`source`] — Locate and load the two files of a case
//! - [`layout`] — Record length from the file header
//! - [`header`] — Header word diff, grid shape and file size checks
//! - [`coords`] — Data-region sample index to (source, depth, range)
//! - [`ulp`] — Bit-pattern distance between `f32` values
//! - [`metrics`] — Per-element ULP / absolute / relative error and severity
//! - [`report`] — Diagnostic line rendering
//! - [`session`] — The comparison pass and its run-level state
//! - [`config`] — Thresholds and case-path settings

pub mod config;
pub mod coords;
pub mod error;
pub mod header;
pub mod layout;
pub mod metrics;
pub mod report;
pub mod session;
pub mod source;
pub mod ulp;

pub use config::{CompareConfig, Thresholds};
pub use error::{CompareError, Severity};
pub use session::{compare_buffers, Outcome, RunStatus};
