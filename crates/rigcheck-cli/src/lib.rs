//! # rigcheck-cli -- Machine Requirement Check
//!
//! Provides the `rigcheck` command-line interface.
//!
//! ## Subcommands
//!
//! - `rigcheck verify`: Check this machine against the participant's
//!   project policies and write the verdict to the roster.
//! - `rigcheck inspect`: Print the normalized specs of this machine.
//!
//! ```bash
//! SHEETS_ACCESS_TOKEN=... rigcheck verify --email a@x.com
//! rigcheck --config settings.yaml verify --dry-run --json
//! rigcheck inspect
//! ```

pub mod inspect;
pub mod machine;
pub mod settings;
pub mod verify;
