//! # Policy Resolver
//!
//! Finds the participant in the roster, collects the policy rows for the
//! projects they are enrolled in, and computes the sheet row their verdict
//! is written back to.
//!
//! ## Write-back row
//!
//! Roster data starts on sheet row 3, so the 1-based sheet row of a roster
//! entry at 0-based position `p` is `p + 1 + 2`. Both offsets are folded
//! into [`ROSTER_ROW_OFFSET`]. The external sheet layout depends on this
//! value; do not change it without changing the sheet.

use serde::Serialize;

use rigcheck_core::table::{is_blank, POLICY_PROJECT_COLUMN};
use rigcheck_core::{
    decode_rows, FromRow, LookupError, ParseError, ParticipantRecord, PolicyRow, RigcheckError,
    Row, RowReader,
};

/// Added to a 0-based roster position to get the 1-based sheet row.
pub const ROSTER_ROW_OFFSET: usize = 3;

/// Sheet row for the roster entry at `position`.
pub fn target_row(position: usize) -> usize {
    position + ROSTER_ROW_OFFSET
}

/// A roster record and its position in the fetched range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    /// 0-based position in the fetched range, blank rows included.
    pub position: usize,
    /// The decoded record.
    pub record: ParticipantRecord,
}

/// The participant roster, in sheet order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    /// Decode the roster range.
    pub fn from_rows(rows: &[Row]) -> Result<Self, ParseError> {
        let entries = decode_rows::<ParticipantRecord>(rows)?
            .into_iter()
            .map(|(position, record)| RosterEntry { position, record })
            .collect();
        Ok(Self { entries })
    }

    /// Position of the first entry for `email`, if any.
    pub fn position_of(&self, email: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.record.email == email)
            .map(|e| e.position)
    }

    /// Projects of every entry for `email`, deduplicated, in sheet order.
    pub fn projects_of(&self, email: &str) -> Vec<String> {
        let mut projects: Vec<String> = Vec::new();
        for entry in self.entries.iter().filter(|e| e.record.email == email) {
            for project in &entry.record.projects {
                if !projects.contains(project) {
                    projects.push(project.clone());
                }
            }
        }
        projects
    }
}

/// The policy range, kept as raw cells in sheet order.
///
/// Rows are only decoded once they are known to apply, so a draft or
/// half-filled row for some other project never blocks a verification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyTable {
    rows: Vec<(usize, Row)>,
}

impl PolicyTable {
    /// Keep the non-blank rows of the policy range.
    pub fn from_rows(rows: &[Row]) -> Self {
        let rows = rows
            .iter()
            .enumerate()
            .filter(|(_, cells)| !is_blank(cells))
            .map(|(position, cells)| (position, cells.clone()))
            .collect();
        Self { rows }
    }

    /// Number of non-blank rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the range had no non-blank rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Decode the rows whose project is one of `projects`, in table order.
    ///
    /// Only matched rows are validated; a malformed matched row is an error.
    pub fn matching(&self, projects: &[String]) -> Result<Vec<PolicyRow>, ParseError> {
        self.rows
            .iter()
            .map(|(position, cells)| RowReader::new(PolicyRow::TABLE, *position, cells))
            .filter(|reader| {
                reader
                    .optional_text(POLICY_PROJECT_COLUMN)
                    .is_some_and(|project| projects.contains(&project))
            })
            .map(|reader| PolicyRow::from_row(&reader))
            .collect()
    }
}

/// What the resolver found for one participant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    /// Matching policy rows, in policy table order.
    pub policies: Vec<PolicyRow>,
    /// 0-based roster position of the participant.
    pub roster_position: usize,
    /// 1-based sheet row for write-back.
    pub target_row: usize,
}

/// Resolve the policies and write-back row for `email`.
///
/// An email missing from the roster is [`LookupError::ParticipantNotFound`].
/// An enrolled participant whose projects match no policy row is
/// [`LookupError::NoApplicablePolicy`]; a verdict needs at least one row.
/// A matched policy row that fails to decode is a [`ParseError`].
pub fn resolve(
    email: &str,
    roster: &Roster,
    policies: &PolicyTable,
) -> Result<Resolution, RigcheckError> {
    let roster_position = roster
        .position_of(email)
        .ok_or_else(|| LookupError::ParticipantNotFound {
            email: email.to_string(),
        })?;

    let projects = roster.projects_of(email);
    let matched = policies.matching(&projects)?;

    if matched.is_empty() {
        return Err(LookupError::NoApplicablePolicy {
            email: email.to_string(),
            projects,
        }
        .into());
    }

    let target_row = target_row(roster_position);
    tracing::info!(
        email,
        roster_position,
        target_row,
        policies = matched.len(),
        "resolved participant policies"
    );

    Ok(Resolution {
        policies: matched,
        roster_position,
        target_row,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn policy_cells(project: &str) -> Value {
        json!([project, "Windows 10", "2000", "8", "100", "20", "64"])
    }

    fn table(projects: &[&str]) -> PolicyTable {
        let rows: Vec<Row> = projects
            .iter()
            .map(|p| serde_json::from_value(policy_cells(p)).unwrap())
            .collect();
        PolicyTable::from_rows(&rows)
    }

    fn roster() -> Roster {
        let rows = vec![
            vec![json!("1"), json!("z@x.com"), json!("P9")],
            vec![json!("2"), json!("b@x.com"), json!("P2"), json!("P3")],
            vec![],
            vec![json!("4"), json!("c@x.com"), json!("P1")],
            vec![json!("5"), json!("d@x.com"), json!("P3")],
            vec![json!("6"), json!("a@x.com"), json!("P1"), json!("P1"), json!("P2")],
            vec![json!("7"), json!("a@x.com"), json!("P3")],
        ];
        Roster::from_rows(&rows).unwrap()
    }

    #[test]
    fn position_five_targets_row_eight() {
        assert_eq!(target_row(5), 8);
        let res = resolve("a@x.com", &roster(), &table(&["P1"])).unwrap();
        assert_eq!(res.roster_position, 5);
        assert_eq!(res.target_row, 8);
    }

    #[test]
    fn first_row_targets_row_three() {
        assert_eq!(target_row(0), 3);
    }

    #[test]
    fn missing_email_is_an_explicit_miss() {
        assert_eq!(roster().position_of("nobody@x.com"), None);
        let err = resolve("nobody@x.com", &roster(), &table(&["P1"])).unwrap_err();
        assert!(matches!(
            err,
            RigcheckError::Lookup(LookupError::ParticipantNotFound { ref email }) if email == "nobody@x.com"
        ));
    }

    #[test]
    fn email_match_is_exact() {
        assert_eq!(roster().position_of("A@X.COM"), None);
    }

    #[test]
    fn policies_keep_table_order() {
        let res = resolve("a@x.com", &roster(), &table(&["P3", "P9", "P2", "P1"])).unwrap();
        let projects: Vec<&str> = res.policies.iter().map(|p| p.project.as_str()).collect();
        assert_eq!(projects, vec!["P3", "P2", "P1"]);
    }

    #[test]
    fn projects_union_across_rows() {
        assert_eq!(roster().projects_of("a@x.com"), vec!["P1", "P2", "P3"]);
    }

    #[test]
    fn enrolled_without_policy_is_fatal() {
        let err = resolve("b@x.com", &roster(), &table(&["P1"])).unwrap_err();
        match err {
            RigcheckError::Lookup(LookupError::NoApplicablePolicy { email, projects }) => {
                assert_eq!(email, "b@x.com");
                assert_eq!(projects, vec!["P2".to_string(), "P3".to_string()]);
            }
            other => panic!("expected NoApplicablePolicy, got {other:?}"),
        }
    }

    #[test]
    fn matched_rows_are_decoded() {
        let rows = vec![
            vec![
                json!("P1"),
                json!("Windows 10&MacOS 12"),
                json!("2000"),
                json!("8"),
                json!("100"),
                json!("20"),
                json!("64"),
            ],
            vec![],
        ];
        let table = PolicyTable::from_rows(&rows);
        assert_eq!(table.len(), 1);
        let matched = table.matching(&["P1".to_string()]).unwrap();
        assert_eq!(matched[0].min_free_disk_gib, 20);
        assert_eq!(matched[0].operating_system, "Windows 10&MacOS 12");
    }

    #[test]
    fn draft_row_for_another_project_is_ignored() {
        let rows = vec![
            serde_json::from_value(policy_cells("P1")).unwrap(),
            vec![json!("P9"), json!("Windows 10"), json!("TBD"), json!("")],
            vec![json!(""), json!("Windows 11"), json!("n/a")],
        ];
        let table = PolicyTable::from_rows(&rows);
        let res = resolve("c@x.com", &roster(), &table).unwrap();
        assert_eq!(res.policies.len(), 1);
        assert_eq!(res.policies[0].project, "P1");
    }

    #[test]
    fn malformed_matched_row_is_a_parse_error() {
        let rows = vec![vec![
            json!("P1"),
            json!("Windows 10"),
            json!("TBD"),
            json!("8"),
            json!("100"),
            json!("20"),
            json!("64"),
        ]];
        let err = resolve("c@x.com", &roster(), &PolicyTable::from_rows(&rows)).unwrap_err();
        assert!(matches!(
            err,
            RigcheckError::Parse(ParseError::InvalidNumber { table: "policy", row: 0, column: 2, .. })
        ));
    }
}
