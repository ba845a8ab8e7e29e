use rigcheck_core::{MajorDimension, Row, StoreError, TabularStore};

use crate::SheetsClient;

impl TabularStore for SheetsClient {
    async fn read_range(
        &self,
        range: &str,
        dimension: MajorDimension,
    ) -> Result<Vec<Row>, StoreError> {
        self.get_values(range, dimension)
            .await
            .map_err(|e| StoreError::read(range, e.to_string()))
    }

    async fn write_cell(&self, range: &str, value: &str) -> Result<(), StoreError> {
        self.update_value(range, value)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::write(range, e.to_string()))
    }
}
