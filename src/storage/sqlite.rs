//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the RecordStore trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{RecordStore, StorageError, StorageResult};
use crate::storage::Sheet;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite record store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates a SqliteStore
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl RecordStore for SqliteStore {
    fn read_sheet(&self, name: &str) -> StorageResult<Sheet> {
        let row_count: i64 = self
            .conn
            .query_row(
                "SELECT row_count FROM sheets WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| StorageError::SheetNotFound(name.to_string()))?;

        let mut stmt = self
            .conn
            .prepare("SELECT name FROM sheet_columns WHERE sheet = ?1 ORDER BY position")?;
        let headers = stmt
            .query_map(params![name], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut sheet = Sheet::new(headers);
        sheet.rows = vec![Vec::new(); row_count.max(0) as usize];

        let mut stmt = self
            .conn
            .prepare("SELECT row_index, width FROM sheet_rows WHERE sheet = ?1")?;
        let widths = stmt.query_map(params![name], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
        })?;
        for width in widths {
            let (row_index, width) = width?;
            if let Some(cells) = usize::try_from(row_index)
                .ok()
                .and_then(|row| sheet.rows.get_mut(row))
            {
                cells.resize(width.max(0) as usize, String::new());
            }
        }

        let mut stmt = self
            .conn
            .prepare("SELECT row_index, position, value FROM sheet_cells WHERE sheet = ?1")?;
        let cells = stmt.query_map(params![name], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        for cell in cells {
            let (row_index, position, value) = cell?;
            if row_index >= 0 && position >= 0 {
                sheet.set_cell(row_index as usize, position as usize, value);
            }
        }

        Ok(sheet)
    }

    fn write_sheet(&mut self, name: &str, sheet: &Sheet) -> StorageResult<()> {
        let tx = self.conn.transaction()?;

        clear_sheet(&tx, name)?;

        tx.execute(
            "INSERT INTO sheets (name, row_count) VALUES (?1, ?2)",
            params![name, sheet.rows.len() as i64],
        )?;

        {
            let mut insert_column = tx.prepare(
                "INSERT INTO sheet_columns (sheet, position, name) VALUES (?1, ?2, ?3)",
            )?;
            for (position, header) in sheet.headers.iter().enumerate() {
                insert_column.execute(params![name, position as i64, header])?;
            }

            let mut insert_row =
                tx.prepare("INSERT INTO sheet_rows (sheet, row_index, width) VALUES (?1, ?2, ?3)")?;
            let mut insert_cell = tx.prepare(
                "INSERT INTO sheet_cells (sheet, row_index, position, value) \
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (row_index, row) in sheet.rows.iter().enumerate() {
                insert_row.execute(params![name, row_index as i64, row.len() as i64])?;
                for (position, value) in row.iter().enumerate() {
                    if !value.is_empty() {
                        insert_cell.execute(params![
                            name,
                            row_index as i64,
                            position as i64,
                            value
                        ])?;
                    }
                }
            }
        }

        tx.commit()?;

        tracing::debug!(
            "Wrote sheet '{}' ({} columns, {} rows)",
            name,
            sheet.headers.len(),
            sheet.rows.len()
        );
        Ok(())
    }

    fn delete_sheet(&mut self, name: &str) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        clear_sheet(&tx, name)?;
        tx.commit()?;
        Ok(())
    }

    fn sheet_names(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT name FROM sheets ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }
}

fn clear_sheet(conn: &Connection, name: &str) -> Result<(), rusqlite::Error> {
    conn.execute("DELETE FROM sheet_cells WHERE sheet = ?1", params![name])?;
    conn.execute("DELETE FROM sheet_rows WHERE sheet = ?1", params![name])?;
    conn.execute("DELETE FROM sheet_columns WHERE sheet = ?1", params![name])?;
    conn.execute("DELETE FROM sheets WHERE name = ?1", params![name])?;
    Ok(())
}
