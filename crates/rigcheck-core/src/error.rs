//! # Error Hierarchy
//!
//! Structured error types for the whole verification run, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Every failure is terminal for the run. The variants carry enough context
//! (table, row, column, offending value) for an operator to fix the sheet
//! without re-running under a debugger.

use std::fmt;

use thiserror::Error;

/// Top-level error type for a verification run.
#[derive(Error, Debug)]
pub enum RigcheckError {
    /// A participant, policy, or CPU model could not be found.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// A value from the sheet or the platform could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The remote tabular store rejected a read or a write.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The local telemetry provider could not describe the machine.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

/// Lookup failures. All of them are user-facing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The email is not present in the roster.
    #[error("participant not found in policy list: {email}")]
    ParticipantNotFound {
        /// The email that was looked up.
        email: String,
    },

    /// The participant is enrolled, but none of their projects has a policy row.
    #[error("no policy row applies to participant {email} (projects: {projects:?})")]
    NoApplicablePolicy {
        /// The participant's email.
        email: String,
        /// The projects the participant is enrolled in.
        projects: Vec<String>,
    },

    /// No benchmark row contains the canonical CPU name.
    #[error("CPU model \"{canonical_name}\" not found in benchmark table")]
    CpuModelNotFound {
        /// The canonical name used as the lookup key.
        canonical_name: String,
    },

    /// Stripping the raw CPU model left nothing to look up.
    #[error("CPU model \"{raw}\" reduces to an empty benchmark key")]
    EmptyCpuName {
        /// The raw CPU model string as reported by the platform.
        raw: String,
    },
}

/// Parse failures for sheet cells and platform strings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// An OS description or policy OS token has no integer major version.
    #[error("invalid OS version in \"{value}\": {reason}")]
    OsVersion {
        /// The text the version was extracted from.
        value: String,
        /// Why extraction failed.
        reason: String,
    },

    /// A required cell is absent or blank.
    #[error("{table} row {row}: missing value in column {column}")]
    MissingCell {
        /// Logical table name (roster, policy, benchmark).
        table: &'static str,
        /// 0-based row position within the fetched range.
        row: usize,
        /// 0-based column index.
        column: usize,
    },

    /// A numeric cell does not hold a number of the expected kind.
    #[error("{table} row {row} column {column}: \"{value}\" is not a valid {expected}")]
    InvalidNumber {
        /// Logical table name (roster, policy, benchmark).
        table: &'static str,
        /// 0-based row position within the fetched range.
        row: usize,
        /// 0-based column index.
        column: usize,
        /// The cell content as text.
        value: String,
        /// The expected kind ("integer", "number").
        expected: &'static str,
    },
}

/// Which store operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    /// Reading a range.
    Read,
    /// Writing a cell.
    Write,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

/// A failed call against the remote tabular store. Never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("store {operation} of {range} failed: {reason}")]
pub struct StoreError {
    /// Read or write.
    pub operation: StoreOperation,
    /// The range or cell address involved.
    pub range: String,
    /// Transport or API diagnostic.
    pub reason: String,
}

impl StoreError {
    /// A failed read of `range`.
    pub fn read(range: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            operation: StoreOperation::Read,
            range: range.into(),
            reason: reason.to_string(),
        }
    }

    /// A failed write to `range`.
    pub fn write(range: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            operation: StoreOperation::Write,
            range: range.into(),
            reason: reason.to_string(),
        }
    }
}

/// The local platform could not be described.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    /// The platform is not one of Windows, macOS or Linux.
    #[error("incompatible operating system \"{0}\"; use Windows, macOS or Linux")]
    UnsupportedPlatform(String),

    /// The platform did not report a CPU model.
    #[error("no CPU model reported by the platform")]
    MissingCpu,
}
