//! JSON file storage implementation
//!
//! Each sheet lives in `<dir>/<sheet>.json` as `{"headers": [...], "rows": [[...]]}`.

use crate::storage::traits::{RecordStore, StorageError, StorageResult};
use crate::storage::Sheet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const SHEET_EXTENSION: &str = "json";

/// Directory of JSON sheet files
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Opens a store rooted at `dir`, creating the directory if needed
    pub fn new(dir: &Path) -> StorageResult<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn sheet_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, SHEET_EXTENSION))
    }
}

impl RecordStore for JsonStore {
    fn read_sheet(&self, name: &str) -> StorageResult<Sheet> {
        let content = match fs::read_to_string(self.sheet_path(name)) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::SheetNotFound(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_str(&content)?)
    }

    fn write_sheet(&mut self, name: &str, sheet: &Sheet) -> StorageResult<()> {
        let path = self.sheet_path(name);
        let tmp = path.with_extension("json.tmp");

        fs::write(&tmp, serde_json::to_string_pretty(sheet)?)?;
        fs::rename(&tmp, &path)?;

        tracing::debug!("Wrote sheet '{}' to {}", name, path.display());
        Ok(())
    }

    fn delete_sheet(&mut self, name: &str) -> StorageResult<()> {
        match fs::remove_file(self.sheet_path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn sheet_names(&self) -> StorageResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SHEET_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
