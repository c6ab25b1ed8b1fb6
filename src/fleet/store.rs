//! Local history files: one JSON array per drone number, append-only,
//! de-duplicated by each record's `last_seen` field.

use std::collections::HashSet;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::StoreError;

const DEDUP_KEY: &str = "last_seen";

#[derive(Clone, Debug)]
pub struct HistoryStore {
    dir: PathBuf,
}

impl HistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, drone: u32) -> PathBuf {
        self.dir.join(format!("{drone}.json"))
    }

    /// Everything stored for `drone`; a missing file reads as empty.
    pub fn load(&self, drone: u32) -> Result<Vec<Value>, StoreError> {
        let path = self.path_for(drone);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        serde_json::from_str(&text).map_err(|source| StoreError::Corrupt { path, source })
    }

    /// Append the records of `fresh` whose `last_seen` is not stored yet.
    /// Returns how many were appended.  The file is replaced atomically.
    pub fn merge(&self, drone: u32, fresh: &[Value]) -> Result<usize, StoreError> {
        let path = self.path_for(drone);
        let mut records = self.load(drone)?;
        let mut seen: HashSet<String> = records.iter().filter_map(dedup_key).collect();

        let before = records.len();
        for record in fresh {
            match dedup_key(record) {
                Some(key) if seen.contains(&key) => {}
                Some(key) => {
                    seen.insert(key);
                    records.push(record.clone());
                }
                None => records.push(record.clone()),
            }
        }
        let added = records.len() - before;
        if added == 0 && path.exists() {
            return Ok(0);
        }

        self.write_atomically(&path, &records)?;
        debug!(drone, added, path = %path.display(), "history merged");
        Ok(added)
    }

    fn write_atomically(&self, path: &Path, records: &[Value]) -> Result<(), StoreError> {
        let io = |source: std::io::Error| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io)?;
        let tmp = NamedTempFile::new_in(&self.dir).map_err(io)?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer(&mut writer, records).map_err(|e| io(e.into()))?;
            writer.flush().map_err(io)?;
        }
        tmp.persist(path).map_err(|e| io(e.error))?;
        Ok(())
    }
}

fn dedup_key(record: &Value) -> Option<String> {
    record.get(DEDUP_KEY)?.as_str().map(str::to_string)
}
