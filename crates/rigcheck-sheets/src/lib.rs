//! # rigcheck-sheets -- Typed Rust client for the Sheets values API
//!
//! Reads and writes cell ranges of one spreadsheet through the Google
//! Sheets v4 `values` resource, and exposes them as a
//! [`TabularStore`](rigcheck_core::TabularStore).
//!
//! ## API Path Convention
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/v4/spreadsheets/{id}/values/{range}?majorDimension=` | Read a range |
//! | PUT    | `/v4/spreadsheets/{id}/values/{range}?valueInputOption=RAW` | Write a range |
//!
//! Range names in A1 notation (`ICs!A3:F`) are percent-encoded as a single
//! path segment. Requests are not retried.

pub mod config;
pub mod error;
mod store;
pub mod types;
pub mod values;

pub use config::SheetsConfig;
pub use error::SheetsApiError;
pub use types::{UpdateValuesResponse, ValueRange};

use std::time::Duration;

use url::Url;

/// Client bound to one spreadsheet.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    base_url: Url,
    spreadsheet_id: String,
}

impl SheetsClient {
    /// Create a new Sheets API client from configuration.
    pub fn new(config: SheetsConfig) -> Result<Self, SheetsApiError> {
        if config.base_url.cannot_be_a_base() {
            return Err(config::ConfigError::CannotBeABase(config.base_url.to_string()).into());
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                let mut value = reqwest::header::HeaderValue::from_str(&format!(
                    "Bearer {}",
                    config.access_token.as_str()
                ))
                .map_err(|_| SheetsApiError::Config(config::ConfigError::InvalidToken))?;
                value.set_sensitive(true);
                headers.insert(reqwest::header::AUTHORIZATION, value);
                headers
            })
            .build()
            .map_err(|e| SheetsApiError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            http,
            base_url: config.base_url,
            spreadsheet_id: config.spreadsheet_id,
        })
    }
}
