//! Range reads and single-cell writes against the `values` resource.

use url::Url;

use rigcheck_core::{MajorDimension, Row};

use crate::config::ConfigError;
use crate::error::SheetsApiError;
use crate::types::{UpdateValuesResponse, ValueRange};
use crate::SheetsClient;

impl SheetsClient {
    /// `{base_url}/v4/spreadsheets/{id}/values/{range}`, with `range`
    /// encoded as one path segment.
    pub fn values_url(&self, range: &str) -> Result<Url, SheetsApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ConfigError::CannotBeABase(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values", range]);
        Ok(url)
    }

    /// Read `range` in the given orientation.
    ///
    /// Calls `GET {base_url}/v4/spreadsheets/{id}/values/{range}`.
    pub async fn get_values(
        &self,
        range: &str,
        dimension: MajorDimension,
    ) -> Result<Vec<Row>, SheetsApiError> {
        let endpoint = format!("GET /values/{range}");
        let url = self.values_url(range)?;

        let resp = self
            .http
            .get(url)
            .query(&[("majorDimension", dimension.as_str())])
            .send()
            .await
            .map_err(|e| SheetsApiError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(SheetsApiError::ApiError {
                endpoint,
                status,
                body,
            });
        }

        let value_range: ValueRange =
            resp.json()
                .await
                .map_err(|e| SheetsApiError::Deserialization {
                    endpoint,
                    source: e,
                })?;
        tracing::debug!(
            range,
            dimension = dimension.as_str(),
            rows = value_range.values.len(),
            "read range"
        );
        Ok(value_range.values)
    }

    /// Write `value` as raw text into the single cell `range`.
    ///
    /// Calls `PUT {base_url}/v4/spreadsheets/{id}/values/{range}?valueInputOption=RAW`.
    pub async fn update_value(
        &self,
        range: &str,
        value: &str,
    ) -> Result<UpdateValuesResponse, SheetsApiError> {
        let endpoint = format!("PUT /values/{range}");
        let url = self.values_url(range)?;

        let resp = self
            .http
            .put(url)
            .query(&[("valueInputOption", "RAW")])
            .json(&ValueRange::single_cell(range, value))
            .send()
            .await
            .map_err(|e| SheetsApiError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(SheetsApiError::ApiError {
                endpoint,
                status,
                body,
            });
        }

        let updated: UpdateValuesResponse =
            resp.json()
                .await
                .map_err(|e| SheetsApiError::Deserialization {
                    endpoint,
                    source: e,
                })?;
        tracing::debug!(range, cells = ?updated.updated_cells, "wrote cell");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use crate::{SheetsClient, SheetsConfig};

    fn client(base: &str) -> SheetsClient {
        SheetsClient::new(SheetsConfig::local_mock(base, "sheet-1", "t").unwrap()).unwrap()
    }

    #[test]
    fn range_is_one_path_segment() {
        let url = client("http://127.0.0.1:9000").values_url("My Sheet!A1/B2").unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9000/v4/spreadsheets/sheet-1/values/My%20Sheet!A1%2FB2"
        );
    }

    #[test]
    fn base_path_is_kept() {
        let url = client("http://127.0.0.1:9000/proxy").values_url("ICs!A3:F").unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9000/proxy/v4/spreadsheets/sheet-1/values/ICs!A3:F"
        );
    }
}
