//! Storage traits and error types
//!
//! This module defines the interface of the tabular record store the
//! discovery job reads business records from and writes results back to.

use crate::storage::Sheet;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Column '{column}' missing from sheet '{sheet}'")]
    MissingColumn { sheet: String, column: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A store of named sheets, read and written whole
///
/// Implementations need not support concurrent writers; the discovery job
/// reads once before the batch and writes once after it.
pub trait RecordStore: Send {
    /// Reads a whole sheet
    ///
    /// Returns `StorageError::SheetNotFound` if no sheet has that name.
    fn read_sheet(&self, name: &str) -> StorageResult<Sheet>;

    /// Replaces a sheet's header and rows, creating the sheet if needed
    fn write_sheet(&mut self, name: &str, sheet: &Sheet) -> StorageResult<()>;

    /// Deletes a sheet; deleting a missing sheet is not an error
    fn delete_sheet(&mut self, name: &str) -> StorageResult<()>;

    /// Lists sheet names in a stable order
    fn sheet_names(&self) -> StorageResult<Vec<String>>;
}
