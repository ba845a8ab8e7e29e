//! # rigcheck-compliance -- Machine Requirement Verification
//!
//! Turns raw machine telemetry plus three spreadsheet tables (participant
//! roster, per-project policies, CPU benchmark scores) into a pass/fail
//! verdict and a human-readable report, and writes both back to the
//! participant's roster row.
//!
//! ## Architecture
//!
//! ```text
//! RawTelemetry ──> Normalizer ──> NormalizedSpecs ─┐
//!                                                  ├─> evaluate ──> ReportCells ──> write_back
//! Roster + PolicyTable ──> resolve ──> Resolution ─┘
//! ```
//!
//! [`Verifier`] drives the whole flow against any
//! [`TabularStore`](rigcheck_core::TabularStore).

#![deny(missing_docs)]

pub mod evaluate;
pub mod layout;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod resolve;

pub use evaluate::{evaluate, first_failure, Check, CheckFailure};
pub use layout::SheetLayout;
pub use normalize::{BenchmarkTable, CpuNameRules, Normalizer};
pub use pipeline::{VerificationOutcome, Verifier};
pub use report::{write_back, CellAddress, ReportCells, VerificationResult};
pub use resolve::{resolve, PolicyTable, Resolution, Roster, RosterEntry};
