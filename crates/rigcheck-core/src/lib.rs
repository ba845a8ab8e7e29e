#![deny(missing_docs)]

//! # rigcheck-core -- Foundational Types for rigcheck
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies (only `serde`, `serde_json`,
//! `thiserror`, `parking_lot`, and `tracing` from the external ecosystem).
//!
//! ## Design Principles
//!
//! 1. **One boundary for stringly-typed data.** Cells from the remote sheet
//!    enter through [`table::RowReader`] and leave as typed records
//!    ([`ParticipantRecord`], [`PolicyRow`], [`BenchmarkEntry`]).
//!
//! 2. **Collaborators are traits.** The remote store ([`TabularStore`]) and
//!    the local platform ([`TelemetryProvider`]) are injected, so the
//!    compliance pipeline runs unchanged against in-memory fixtures.
//!
//! 3. **[`RigcheckError`] hierarchy.** Lookup, parse, store, and telemetry
//!    failures are distinct `thiserror` types. Every one of them ends the run.

pub mod error;
pub mod records;
pub mod specs;
pub mod store;
pub mod table;
pub mod telemetry;
pub mod units;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{
    LookupError, ParseError, RigcheckError, StoreError, StoreOperation, TelemetryError,
};
pub use records::{BenchmarkEntry, ParticipantRecord, PolicyRow, MAX_PROJECTS};
pub use specs::NormalizedSpecs;
pub use store::{InMemoryStore, MajorDimension, TabularStore};
pub use table::{decode_rows, FromRow, Row, RowReader};
pub use telemetry::{FixedTelemetry, OsFamily, RawTelemetry, RawVolume, TelemetryProvider};
pub use units::{bytes_to_gib_floor, bytes_to_gib_rounded, major_version, BYTES_PER_GIB};
