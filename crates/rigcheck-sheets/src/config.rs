//! Sheets API client configuration.
//!
//! The endpoint defaults to the public Google Sheets API. Override via
//! environment variables or explicit construction for staging/testing.

use url::Url;
use zeroize::Zeroizing;

/// Default Sheets API endpoint.
pub const DEFAULT_SHEETS_API_URL: &str = "https://sheets.googleapis.com";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for connecting to the Sheets API.
///
/// Custom `Debug` implementation redacts the `access_token` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct SheetsConfig {
    /// API base URL, without the `/v4` prefix.
    pub base_url: Url,
    /// Spreadsheet every range is resolved against.
    pub spreadsheet_id: String,
    /// OAuth bearer token.
    pub access_token: Zeroizing<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("base_url", &self.base_url)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("access_token", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl SheetsConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `SHEETS_API_URL` (default: `https://sheets.googleapis.com`)
    /// - `SHEETS_ACCESS_TOKEN` (required)
    /// - `SHEETS_TIMEOUT_SECS` (default: 30)
    ///
    /// The spreadsheet id comes from the settings file, not the environment.
    pub fn from_env(spreadsheet_id: impl Into<String>) -> Result<Self, ConfigError> {
        let spreadsheet_id = spreadsheet_id.into();
        if spreadsheet_id.trim().is_empty() {
            return Err(ConfigError::MissingSpreadsheetId);
        }
        let access_token = std::env::var("SHEETS_ACCESS_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        Ok(Self {
            base_url: env_url("SHEETS_API_URL", DEFAULT_SHEETS_API_URL)?,
            spreadsheet_id,
            access_token: Zeroizing::new(access_token),
            timeout_secs: std::env::var("SHEETS_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Create a configuration pointing to a local mock server (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `base_url` cannot be parsed.
    pub fn local_mock(base_url: &str, spreadsheet_id: &str, token: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: Url::parse(base_url)
                .map_err(|e| ConfigError::InvalidUrl(base_url.to_string(), e.to_string()))?,
            spreadsheet_id: spreadsheet_id.to_string(),
            access_token: Zeroizing::new(token.to_string()),
            timeout_secs: 5,
        })
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("SHEETS_ACCESS_TOKEN environment variable is required")]
    MissingToken,
    #[error("access token is not a valid header value")]
    InvalidToken,
    #[error("spreadsheet id is required")]
    MissingSpreadsheetId,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("base URL {0} cannot carry path segments")]
    CannotBeABase(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_mock_builds_valid_config() {
        let cfg = SheetsConfig::local_mock("http://127.0.0.1:9000", "sheet-1", "test-token").unwrap();
        assert_eq!(cfg.access_token.as_str(), "test-token");
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.base_url.as_str(), "http://127.0.0.1:9000/");
        assert_eq!(cfg.spreadsheet_id, "sheet-1");
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = SheetsConfig::local_mock("http://127.0.0.1:9000", "sheet-1", "secret-xyz").unwrap();
        let rendered = format!("{cfg:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("secret-xyz"));
    }

    #[test]
    fn blank_spreadsheet_id_is_rejected() {
        assert!(matches!(
            SheetsConfig::from_env("  "),
            Err(ConfigError::MissingSpreadsheetId)
        ));
    }

    #[test]
    fn env_url_uses_default_when_var_absent() {
        let url = env_url("NONEXISTENT_VAR_RIGCHECK_1", "https://example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn env_url_rejects_invalid_url() {
        std::env::set_var("TEST_BAD_URL_RIGCHECK", "not a url");
        let result = env_url("TEST_BAD_URL_RIGCHECK", "https://example.com");
        std::env::remove_var("TEST_BAD_URL_RIGCHECK");
        assert!(result.is_err());
    }
}
