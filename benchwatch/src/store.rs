//! One pretty-printed JSON file per commodity, replaced atomically.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use benchwatch_core::{BenchError, CommodityRecord, History, StorageErrorKind};
use serde::Deserialize;

/// The slice of a stored record the merge step needs.
#[derive(Deserialize)]
struct MergeView {
    #[serde(default)]
    simulated: bool,
    history: History,
}

/// File name reserved for the record schema; never treated as a commodity.
const SCHEMA_FILE: &str = "schema.json";

fn classify(e: &io::Error) -> StorageErrorKind {
    match e.kind() {
        io::ErrorKind::NotFound => StorageErrorKind::Missing,
        io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
        _ => StorageErrorKind::Io,
    }
}

fn io_error(id: &str, e: &io::Error) -> BenchError {
    BenchError::storage(id, classify(e), e.to_string())
}

/// Ids become file names, so they are restricted to `[a-z0-9_-]+`.
///
/// # Errors
/// `InvalidArg` when `id` is empty or contains any other character.
pub fn validate_id(id: &str) -> Result<(), BenchError> {
    let ok = !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-');
    if ok {
        Ok(())
    } else {
        Err(BenchError::InvalidArg(format!("invalid commodity id '{id}'")))
    }
}

/// Directory of `{id}.json` commodity records.
///
/// Writes go to a temporary file in the same directory, are flushed and
/// synced, then renamed over the final path. Readers therefore see either the
/// old record or the new one. A failed write removes the temporary file and
/// leaves the old record in place.
#[derive(Debug, Clone)]
pub struct RecordStore {
    dir: PathBuf,
}

impl RecordStore {
    /// Store rooted at `dir`; the directory is not touched until first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    /// Returns a `Storage` error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, BenchError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| io_error(&dir.display().to_string(), &e))?;
        Ok(Self { dir })
    }

    /// Root directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record for `id`.
    ///
    /// # Errors
    /// Returns `InvalidArg` for ids outside `[a-z0-9_-]+`.
    pub fn path_for(&self, id: &str) -> Result<PathBuf, BenchError> {
        validate_id(id)?;
        Ok(self.dir.join(format!("{id}.json")))
    }

    /// Atomically replace the record for `id`.
    ///
    /// # Errors
    /// Returns a `Storage` error when the temp file cannot be created, written,
    /// synced, or renamed. The previous record is untouched in that case.
    pub fn save(&self, id: &str, record: &CommodityRecord) -> Result<(), BenchError> {
        self.write_atomic(id, |w| {
            serde_json::to_writer_pretty(&mut *w, record).map_err(io::Error::other)?;
            w.write_all(b"\n")
        })
    }

    fn write_atomic<F>(&self, id: &str, write: F) -> Result<(), BenchError>
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()>,
    {
        let target = self.path_for(id)?;
        let prefix = format!(".{id}.");
        let mut tmp = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".tmp")
            .tempfile_in(&self.dir)
            .map_err(|e| io_error(id, &e))?;

        {
            let mut w = BufWriter::new(tmp.as_file_mut());
            write(&mut w).map_err(|e| io_error(id, &e))?;
            w.flush().map_err(|e| io_error(id, &e))?;
        }
        tmp.as_file().sync_all().map_err(|e| io_error(id, &e))?;
        // The temp file is deleted on drop if persisting fails.
        tmp.persist(&target).map_err(|e| io_error(id, &e.error))?;
        tracing::debug!(commodity = id, path = %target.display(), "record saved");
        Ok(())
    }

    /// Read the record for `id`, distinguishing every failure mode.
    ///
    /// `Ok(None)` means no file exists.
    ///
    /// # Errors
    /// `Storage` with kind `Corrupt` when the file does not decode,
    /// `PermissionDenied` or `Io` when it cannot be read, and `InvalidArg`
    /// for malformed ids.
    pub fn load_checked(&self, id: &str) -> Result<Option<CommodityRecord>, BenchError> {
        let Some(text) = self.read_text(id)? else {
            return Ok(None);
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| BenchError::storage(id, StorageErrorKind::Corrupt, e.to_string()))
    }

    fn read_text(&self, id: &str) -> Result<Option<String>, BenchError> {
        let path = self.path_for(id)?;
        match fs::read_to_string(&path) {
            Ok(t) => Ok(Some(t)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(id, &e)),
        }
    }

    /// Read the record for `id`; anything other than a valid record is `None`.
    ///
    /// Corrupt or unreadable files are logged at `warn`.
    #[must_use]
    pub fn load(&self, id: &str) -> Option<CommodityRecord> {
        match self.load_checked(id) {
            Ok(rec) => rec,
            Err(e) => {
                tracing::warn!(
                    commodity = id,
                    kind = ?e.storage_kind(),
                    error = %e,
                    "stored record unreadable, treating as absent"
                );
                None
            }
        }
    }

    /// Prior history to merge new observations into.
    ///
    /// Only `simulated` and `history` are decoded, so a record whose other
    /// fields no longer match still contributes its observations. Empty when
    /// there is no usable history or when the record is simulated, so
    /// synthetic data never leaks into a real series.
    #[must_use]
    pub fn load_history_for_merge(&self, id: &str) -> History {
        let decoded = self.read_text(id).and_then(|text| {
            text.map(|t| {
                serde_json::from_str::<MergeView>(&t).map_err(|e| {
                    BenchError::storage(id, StorageErrorKind::Corrupt, e.to_string())
                })
            })
            .transpose()
        });
        match decoded {
            Ok(Some(view)) if view.simulated => {
                tracing::info!(commodity = id, "discarding simulated history");
                History::new()
            }
            Ok(Some(view)) => view.history,
            Ok(None) => History::new(),
            Err(e) => {
                tracing::warn!(
                    commodity = id,
                    kind = ?e.storage_kind(),
                    error = %e,
                    "prior history unreadable, starting fresh"
                );
                History::new()
            }
        }
    }

    /// Ids of all stored records, sorted. A missing directory lists nothing.
    ///
    /// # Errors
    /// Returns a `Storage` error if the directory exists but cannot be read.
    pub fn list_ids(&self) -> Result<Vec<String>, BenchError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(it) => it,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(&self.dir.display().to_string(), &e)),
        };
        let mut ids: Vec<String> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                if name == SCHEMA_FILE {
                    return None;
                }
                let id = name.strip_suffix(".json")?;
                validate_id(id).ok()?;
                Some(id.to_string())
            })
            .collect();
        ids.sort();
        Ok(ids)
    }
}
