//! Storage module for business record sheets
//!
//! This module handles the tabular data the discovery job works on:
//! - The `Sheet` value type (header row plus data rows)
//! - The `RecordStore` trait with whole-sheet read/write semantics
//! - SQLite and JSON-directory backends

mod json;
mod schema;
mod sqlite;
mod traits;

pub use json::JsonStore;
pub use sqlite::SqliteStore;
pub use traits::{RecordStore, StorageError, StorageResult};

use crate::config::{StoreBackend, StoreConfig};
use crate::crawler::InputRecord;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Opens the record store described by the configuration
///
/// # Arguments
///
/// * `config` - The store section of the configuration
///
/// # Returns
///
/// * `Ok(Box<dyn RecordStore>)` - The opened store
/// * `Err(StorageError)` - The store could not be opened
pub fn open_store(config: &StoreConfig) -> StorageResult<Box<dyn RecordStore>> {
    let path = Path::new(&config.path);
    match config.backend {
        StoreBackend::Sqlite => Ok(Box::new(SqliteStore::new(path)?)),
        StoreBackend::Json => Ok(Box::new(JsonStore::new(path)?)),
    }
}

/// A header row plus data rows of string cells
///
/// Rows may be shorter than the header; missing cells read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column by exact header name
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Position of a column, appending it to the header if absent
    pub fn ensure_column(&mut self, name: &str) -> usize {
        match self.column(name) {
            Some(position) => position,
            None => {
                self.headers.push(name.to_string());
                self.headers.len() - 1
            }
        }
    }

    /// Cell value, empty when the row or cell does not exist
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Sets a cell, padding the row with empty cells as needed
    ///
    /// Writing beyond the last row appends empty rows first.
    pub fn set_cell(&mut self, row: usize, column: usize, value: impl Into<String>) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= column {
            cells.resize(column + 1, String::new());
        }
        cells[column] = value.into();
    }

    /// Input records built from a website column, one per row
    pub fn records(&self, sheet_name: &str, column: &str) -> StorageResult<Vec<InputRecord>> {
        let position = self
            .column(column)
            .ok_or_else(|| StorageError::MissingColumn {
                sheet: sheet_name.to_string(),
                column: column.to_string(),
            })?;

        Ok((0..self.rows.len())
            .map(|row| InputRecord::new(self.cell(row, position)))
            .collect())
    }

    /// A sheet with the same header and only the rows where `column` has a
    /// non-blank value
    pub fn rows_with_value(&self, column: usize) -> Sheet {
        Sheet {
            headers: self.headers.clone(),
            rows: self
                .rows
                .iter()
                .enumerate()
                .filter(|(row, _)| !self.cell(*row, column).trim().is_empty())
                .map(|(_, cells)| cells.clone())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> Sheet {
        let mut sheet = Sheet::new(vec!["Name".to_string(), "Business Website".to_string()]);
        sheet.push_row(vec!["Acme".to_string(), "acme.com".to_string()]);
        sheet.push_row(vec!["Short row".to_string()]);
        sheet
    }

    #[test]
    fn test_column_lookup() {
        let sheet = sheet();
        assert_eq!(sheet.column("Business Website"), Some(1));
        assert_eq!(sheet.column("business website"), None);
    }

    #[test]
    fn test_ensure_column_appends_once() {
        let mut sheet = sheet();
        assert_eq!(sheet.ensure_column("Business Email"), 2);
        assert_eq!(sheet.ensure_column("Business Email"), 2);
        assert_eq!(sheet.headers.len(), 3);
    }

    #[test]
    fn test_cell_out_of_range_is_empty() {
        let sheet = sheet();
        assert_eq!(sheet.cell(1, 1), "");
        assert_eq!(sheet.cell(9, 0), "");
    }

    #[test]
    fn test_set_cell_pads_row() {
        let mut sheet = sheet();
        sheet.set_cell(1, 3, "x");
        assert_eq!(sheet.rows[1], vec!["Short row", "", "", "x"]);
    }

    #[test]
    fn test_records_from_column() {
        let records = sheet().records("Sheet1", "Business Website").unwrap();
        assert_eq!(
            records,
            vec![InputRecord::new("acme.com"), InputRecord::new("")]
        );
    }

    #[test]
    fn test_records_missing_column() {
        let result = sheet().records("Sheet1", "Website");
        assert!(matches!(result, Err(StorageError::MissingColumn { .. })));
    }

    #[test]
    fn test_rows_with_value() {
        let mut sheet = sheet();
        let email = sheet.ensure_column("Business Email");
        sheet.set_cell(0, email, "a@acme.com");
        sheet.set_cell(1, email, "   ");

        let filtered = sheet.rows_with_value(email);
        assert_eq!(filtered.headers, sheet.headers);
        assert_eq!(filtered.rows.len(), 1);
        assert_eq!(filtered.cell(0, 0), "Acme");
    }

    #[test]
    fn test_open_json_store_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            backend: StoreBackend::Json,
            path: dir.path().join("sheets").display().to_string(),
            sheet: "Sheet1".to_string(),
        };

        let mut store = open_store(&config).unwrap();
        store.write_sheet("Sheet1", &sheet()).unwrap();
        assert_eq!(store.read_sheet("Sheet1").unwrap(), sheet());
    }
}
