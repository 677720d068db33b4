use async_trait::async_trait;
use naomi_application::ports::adapter_error::AdapterError;
use naomi_application::ports::spreadsheet::SpreadsheetPort;
use std::sync::Mutex;

/// Tracking sheet kept in process memory.
#[derive(Default)]
pub struct InMemorySheet {
    rows: Mutex<Vec<Vec<String>>>,
}

impl InMemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        self.rows.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl SpreadsheetPort for InMemorySheet {
    async fn append_row(&self, values: &[String]) -> Result<(), AdapterError> {
        self.rows
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(values.to_vec());
        Ok(())
    }
}
