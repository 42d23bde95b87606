use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::collections::BTreeMap;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, warn};

/// Upper bound on the serialized data file, matching the ~5 MB quota browsers
/// apply to local storage. Writes that would cross it are dropped.
pub const MAX_STORE_BYTES: usize = 5 * 1024 * 1024;

/// A durable key-value store over one JSON file: string keys, JSON values.
///
/// Reads and writes never fail from the caller's point of view. A missing or
/// malformed value falls back to the caller-supplied default; a rejected
/// write leaves the stored value untouched. Failures are kept in a status
/// record for the API to surface.
pub struct Store {
    path: PathBuf,
    values: BTreeMap<String, Value>,
    read_error: Option<String>,
    write_error: Option<String>,
}

impl Store {
    pub fn empty(path: PathBuf) -> Self {
        Self {
            path,
            values: BTreeMap::new(),
            read_error: None,
            write_error: None,
        }
    }

    /// Loads the store from disk. A missing file is an empty store, not an
    /// error; unreadable or unparsable files fall back to empty and record
    /// the failure.
    pub async fn load(path: PathBuf) -> Self {
        let mut store = Self::empty(path);
        match fs::read(&store.path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(values) => store.values = values,
                Err(err) => {
                    error!("failed to parse data file: {err}");
                    store.read_error = Some(format!("failed to parse data file: {err}"));
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                error!("failed to read data file: {err}");
                store.read_error = Some(format!("failed to read data file: {err}"));
            }
        }
        store
    }

    /// Typed read. Missing keys and JSON nulls take the default silently; a
    /// value that no longer matches the expected shape also takes the
    /// default, but records the failure.
    pub fn get<T: DeserializeOwned>(&mut self, key: &str, default: T) -> T {
        match self.values.get(key) {
            None | Some(Value::Null) => default,
            Some(value) => match serde_json::from_value(value.clone()) {
                Ok(parsed) => parsed,
                Err(err) => {
                    warn!("discarding malformed value for {key}: {err}");
                    self.read_error = Some(format!("malformed value for {key}: {err}"));
                    default
                }
            },
        }
    }

    /// Typed write into the in-memory map. A value that fails to serialize
    /// or would push the store past its byte quota is dropped and the
    /// failure recorded; the previously stored value stays in place.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(err) => {
                warn!("failed to serialize value for {key}: {err}");
                self.write_error = Some(format!("failed to serialize value for {key}: {err}"));
                return;
            }
        };

        let previous = self.values.insert(key.to_string(), value);
        if self.serialized_len() > MAX_STORE_BYTES {
            warn!("quota exceeded writing {key}, dropping write");
            self.write_error = Some(format!("quota exceeded writing {key}"));
            match previous {
                Some(previous) => {
                    self.values.insert(key.to_string(), previous);
                }
                None => {
                    self.values.remove(key);
                }
            }
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }

    /// Best-effort write of the whole map to disk. I/O failures are recorded
    /// and logged, never propagated.
    pub async fn persist(&mut self) {
        let payload = match serde_json::to_vec_pretty(&self.values) {
            Ok(payload) => payload,
            Err(err) => {
                error!("failed to serialize data file: {err}");
                self.write_error = Some(format!("failed to serialize data file: {err}"));
                return;
            }
        };
        match fs::write(&self.path, payload).await {
            Ok(()) => self.write_error = None,
            Err(err) => {
                error!("failed to write data file: {err}");
                self.write_error = Some(format!("failed to write data file: {err}"));
            }
        }
    }

    pub fn read_error(&self) -> Option<&str> {
        self.read_error.as_deref()
    }

    pub fn write_error(&self) -> Option<&str> {
        self.write_error.as_deref()
    }

    fn serialized_len(&self) -> usize {
        serde_json::to_string(&self.values)
            .map(|text| text.len())
            .unwrap_or(0)
    }
}

pub fn resolve_data_path() -> PathBuf {
    if let Ok(path) = env::var("WOODEN_FISH_DATA_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data/state.json")
}

pub async fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    Ok(())
}
