//! Durable storage for per-year ledgers.
//!
//! Each year lives in `<dir>/<year>.log`. Writes go to a sibling temp file
//! which is renamed over the target, so a failed write never corrupts the
//! previously durable version. The merge algorithm reads full prior state
//! and writes full new state, so callers serialize whole import runs with
//! [`LedgerStore::lock_exclusive`].

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

use crate::ledger::{Ledger, MalformedLine};

/// Why a store operation failed.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested year has no ledger file.
    #[error("no ledger for {year} at {path}")]
    NotFound { year: i32, path: PathBuf },

    /// An I/O operation failed.
    #[error("failed to {action} {path}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn io_error(action: &'static str, path: &Path) -> impl FnOnce(io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Io {
        action,
        path,
        source,
    }
}

/// Guard holding the store's exclusive lock; released on drop.
#[derive(Debug)]
pub struct StoreLock {
    _file: File,
}

/// File-backed store for per-year ledgers.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    dir: PathBuf,
    on_malformed: MalformedLine,
}

impl LedgerStore {
    /// A store rooted at `dir`, reading with the skip-malformed-lines policy.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            on_malformed: MalformedLine::Skip,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the given year's ledger file.
    pub fn path_for(&self, year: i32) -> PathBuf {
        self.dir.join(format!("{year}.log"))
    }

    /// Takes the store-wide exclusive lock, creating the directory if needed.
    ///
    /// Hold the returned guard across a whole load-merge-persist sequence;
    /// concurrent import runs for the same store must not interleave.
    pub fn lock_exclusive(&self) -> Result<StoreLock, StoreError> {
        fs::create_dir_all(&self.dir).map_err(io_error("create directory", &self.dir))?;
        let lock_path = self.dir.join(".lock");
        let file = File::create(&lock_path).map_err(io_error("create lock file", &lock_path))?;
        file.lock_exclusive()
            .map_err(io_error("lock", &lock_path))?;
        Ok(StoreLock { _file: file })
    }

    /// Loads the given year's ledger; a missing file is an error.
    ///
    /// This is the read-only path (reporting), which has no merge step to
    /// fall back on.
    pub fn load(&self, year: i32) -> Result<Ledger, StoreError> {
        let path = self.path_for(year);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound { year, path });
            }
            Err(err) => return Err(io_error("read", &path)(err)),
        };

        // Skip policy never returns a read error.
        Ok(Ledger::parse(year, &content, self.on_malformed)
            .unwrap_or_else(|_| Ledger::new(year)))
    }

    /// Loads the given year's ledger, treating a missing file as empty.
    ///
    /// This is the merge path: the first import for a year starts from
    /// nothing.
    pub fn load_or_empty(&self, year: i32) -> Result<Ledger, StoreError> {
        match self.load(year) {
            Ok(ledger) => Ok(ledger),
            Err(StoreError::NotFound { .. }) => Ok(Ledger::new(year)),
            Err(err) => Err(err),
        }
    }

    /// Persists the ledger, fully replacing its stored form.
    ///
    /// The rendering is written to `<year>.log.tmp` and renamed over the
    /// target, so the previous version survives a partial write.
    pub fn save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(io_error("create directory", &self.dir))?;

        let path = self.path_for(ledger.year());
        let tmp_path = self.dir.join(format!("{}.log.tmp", ledger.year()));

        fs::write(&tmp_path, ledger.to_string()).map_err(io_error("write", &tmp_path))?;
        fs::rename(&tmp_path, &path).map_err(io_error("rename", &tmp_path))?;

        tracing::debug!(year = ledger.year(), records = ledger.len(), "persisted ledger");
        Ok(())
    }

    /// Years with a ledger file, ascending. An absent directory is empty.
    pub fn years(&self) -> Result<Vec<i32>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(io_error("read directory", &self.dir)(err)),
        };

        let mut years = Vec::new();
        for entry in entries {
            let entry = entry.map_err(io_error("read directory", &self.dir))?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "log") {
                if let Some(year) = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .and_then(|stem| stem.parse().ok())
                {
                    years.push(year);
                }
            }
        }
        years.sort_unstable();
        Ok(years)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::DayRecord;
    use chrono::{NaiveDate, NaiveTime};

    fn record(d: u32) -> DayRecord {
        DayRecord::new(
            NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
            NaiveTime::from_hms_opt(8, 0, 0),
            NaiveTime::from_hms_opt(17, 0, 0),
        )
    }

    #[test]
    fn load_missing_year_is_not_found() {
        let temp = tempfile::tempdir().unwrap();
        let store = LedgerStore::new(temp.path());
        assert!(matches!(
            store.load(2024),
            Err(StoreError::NotFound { year: 2024, .. })
        ));
    }

    #[test]
    fn load_or_empty_treats_missing_as_empty() {
        let temp = tempfile::tempdir().unwrap();
        let store = LedgerStore::new(temp.path());
        let ledger = store.load_or_empty(2024).unwrap();
        assert!(ledger.is_empty());
        assert_eq!(ledger.year(), 2024);
    }

    #[test]
    fn save_then_load_roundtrip() {
        let temp = tempfile::tempdir().unwrap();
        let store = LedgerStore::new(temp.path().join("ledgers"));

        let mut ledger = Ledger::new(2024);
        ledger.merge(vec![record(1), record(2)]);
        store.save(&ledger).unwrap();

        assert_eq!(store.load(2024).unwrap(), ledger);
    }

    #[test]
    fn save_replaces_previous_version() {
        let temp = tempfile::tempdir().unwrap();
        let store = LedgerStore::new(temp.path());

        let mut ledger = Ledger::new(2024);
        ledger.merge(vec![record(1)]);
        store.save(&ledger).unwrap();

        ledger.merge(vec![record(2)]);
        store.save(&ledger).unwrap();

        let loaded = store.load(2024).unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let temp = tempfile::tempdir().unwrap();
        let store = LedgerStore::new(temp.path());
        store.save(&Ledger::new(2024)).unwrap();
        assert!(store.path_for(2024).exists());
        assert!(!temp.path().join("2024.log.tmp").exists());
    }

    #[test]
    fn load_skips_malformed_lines() {
        let temp = tempfile::tempdir().unwrap();
        let store = LedgerStore::new(temp.path());
        fs::write(
            store.path_for(2024),
            "garbage\n2024-01-05, 08:00:00, 17:00:00\n",
        )
        .unwrap();

        let ledger = store.load(2024).unwrap();
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn years_lists_ledger_files_sorted() {
        let temp = tempfile::tempdir().unwrap();
        let store = LedgerStore::new(temp.path());
        store.save(&Ledger::new(2025)).unwrap();
        store.save(&Ledger::new(2023)).unwrap();
        fs::write(temp.path().join("notes.txt"), "not a ledger").unwrap();

        assert_eq!(store.years().unwrap(), vec![2023, 2025]);
    }

    #[test]
    fn years_tolerates_missing_directory() {
        let temp = tempfile::tempdir().unwrap();
        let store = LedgerStore::new(temp.path().join("absent"));
        assert!(store.years().unwrap().is_empty());
    }

    #[test]
    fn lock_creates_directory() {
        let temp = tempfile::tempdir().unwrap();
        let store = LedgerStore::new(temp.path().join("fresh"));
        let _lock = store.lock_exclusive().unwrap();
        assert!(store.dir().is_dir());
    }
}
