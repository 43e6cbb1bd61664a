//! Database schema definitions
//!
//! Sheets are stored cell by cell so any header layout round-trips.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Sheets and their header cells, in column order
CREATE TABLE IF NOT EXISTS sheet_columns (
    sheet TEXT NOT NULL,
    position INTEGER NOT NULL,
    name TEXT NOT NULL,
    PRIMARY KEY (sheet, position)
);

-- Data cells; absent cells read back as empty strings
CREATE TABLE IF NOT EXISTS sheet_cells (
    sheet TEXT NOT NULL,
    row_index INTEGER NOT NULL,
    position INTEGER NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (sheet, row_index, position)
);

-- Cell count of each data row, so short rows keep their width
CREATE TABLE IF NOT EXISTS sheet_rows (
    sheet TEXT NOT NULL,
    row_index INTEGER NOT NULL,
    width INTEGER NOT NULL,
    PRIMARY KEY (sheet, row_index)
);

-- Row count per sheet, so trailing empty rows survive a round trip
CREATE TABLE IF NOT EXISTS sheets (
    name TEXT PRIMARY KEY,
    row_count INTEGER NOT NULL
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
