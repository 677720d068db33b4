//! Spreadsheet port.

use super::adapter_error::AdapterError;
use async_trait::async_trait;

/// Append-only access to a tracking sheet.
#[async_trait]
pub trait SpreadsheetPort: Send + Sync {
    async fn append_row(&self, values: &[String]) -> Result<(), AdapterError>;
}
