//! # Sheet Records
//!
//! Typed forms of the three tables fetched from the store. Column layout
//! and per-field validation live in [`crate::table`]; these structs only
//! hold already-validated values.

use serde::{Deserialize, Serialize};

/// Maximum number of project columns a roster row carries.
pub const MAX_PROJECTS: usize = 4;

/// One roster row: a participant and the projects they are enrolled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    /// Participant email, the roster key.
    pub email: String,
    /// Up to [`MAX_PROJECTS`] project names, deduplicated, in sheet order.
    pub projects: Vec<String>,
}

impl ParticipantRecord {
    /// Build a record, dropping blank and repeated project names.
    pub fn new<I, S>(email: impl Into<String>, projects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::with_capacity(MAX_PROJECTS);
        for project in projects.into_iter().map(Into::into) {
            if project.trim().is_empty() || unique.contains(&project) {
                continue;
            }
            unique.push(project);
        }
        Self {
            email: email.into(),
            projects: unique,
        }
    }

    /// Whether the participant is enrolled in `project`.
    pub fn is_enrolled_in(&self, project: &str) -> bool {
        self.projects.iter().any(|p| p == project)
    }
}

/// Minimum requirements for one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRow {
    /// Project the row applies to.
    pub project: String,
    /// Allowed OS tokens joined by `&`, e.g. `Windows 10&MacOS 12`.
    pub operating_system: String,
    /// Minimum CPU benchmark score.
    pub min_cpu_score: i64,
    /// Minimum memory in GiB.
    pub min_memory_gib: f64,
    /// Minimum storage in GiB.
    pub min_storage_gib: u64,
    /// Minimum free disk space in GiB.
    pub min_free_disk_gib: u64,
    /// Substring the machine architecture must contain.
    pub architecture: String,
}

/// One benchmark row: a CPU type and its score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkEntry {
    /// CPU type as written in the benchmark sheet.
    pub cpu_type: String,
    /// Benchmark score.
    pub score: i64,
}
