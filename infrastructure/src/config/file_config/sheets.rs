//! Tracking-sheet configuration from TOML (`[sheets]` section)

use crate::sheets::{DEFAULT_SHEET_RANGE, GOOGLE_SHEETS_BASE_URL};
use serde::{Deserialize, Serialize};

/// Raw sheets configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSheetsConfig {
    /// Without an id, rows are kept in memory only
    pub spreadsheet_id: Option<String>,
    pub range: String,
    pub base_url: String,
}

impl Default for FileSheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            range: DEFAULT_SHEET_RANGE.to_string(),
            base_url: GOOGLE_SHEETS_BASE_URL.to_string(),
        }
    }
}
