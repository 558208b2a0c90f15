use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::CoreError;
use crate::models::symbol::{Symbol, SymbolUniverse};

/// Header of the single column in the cache artifact.
const HEADER: &str = "Código";

/// Field delimiter of the artifact — deliberately not the comma default.
const DELIMITER: u8 = b';';

/// Durable cache of the resolved symbol universe.
///
/// One `;`-delimited CSV file with a single `Código` column and one row
/// per symbol, no index column. The location is explicit configuration —
/// the file is created on the first save and persists across runs.
///
/// Writes are atomic: the artifact is assembled under a sibling temporary
/// name and renamed over the target, so a reader never observes a torn
/// file. Reads that fail for any reason are `CacheUnreadable`, which
/// callers treat as a cache miss rather than a failure.
pub struct UniverseCache {
    path: PathBuf,
}

impl UniverseCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached universe from the artifact.
    ///
    /// Absent file, wrong header, blank rows and an empty body all map to
    /// `CacheUnreadable` — any of them re-triggers resolution upstream.
    pub fn load(&self) -> Result<SymbolUniverse, CoreError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .from_path(&self.path)
            .map_err(|e| CoreError::CacheUnreadable(format!("{}: {e}", self.path.display())))?;

        let headers = reader
            .headers()
            .map_err(|e| CoreError::CacheUnreadable(format!("{}: {e}", self.path.display())))?;
        if headers.get(0) != Some(HEADER) {
            return Err(CoreError::CacheUnreadable(format!(
                "{}: expected header {HEADER:?}, found {:?}",
                self.path.display(),
                headers.get(0).unwrap_or_default()
            )));
        }

        let mut universe = SymbolUniverse::new();
        for record in reader.records() {
            let record = record?;
            let raw = record.get(0).unwrap_or_default();
            match Symbol::new(raw) {
                Some(symbol) => universe.push(symbol),
                None => {
                    return Err(CoreError::CacheUnreadable(format!(
                        "{}: blank symbol row",
                        self.path.display()
                    )))
                }
            }
        }

        if universe.is_empty() {
            return Err(CoreError::CacheUnreadable(format!(
                "{}: no symbols in artifact",
                self.path.display()
            )));
        }
        Ok(universe)
    }

    /// Atomically persist the universe to the artifact.
    pub fn save(&self, universe: &SymbolUniverse) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.temp_path();
        {
            let mut writer = csv::WriterBuilder::new()
                .delimiter(DELIMITER)
                .from_path(&tmp_path)?;
            writer.write_record([HEADER])?;
            for symbol in universe {
                writer.write_record([symbol.as_str()])?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Sibling temporary name the artifact is assembled under before the
    /// rename, e.g. "IBOV.csv" → "IBOV.csv.tmp".
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}
