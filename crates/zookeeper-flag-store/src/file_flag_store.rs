//! JSON-file backed `FlagStore`.
//!
//! Each store id maps to `<dir>/<store_id>.json`, a flat JSON object. The
//! whole map is held in memory and rewritten on every `set`.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde_json::{Map, Value};
use tracing::{debug, warn};
use zookeeper_core::error::DomainError;
use zookeeper_core::flags::{FlagStore, FlagValue};

/// A flag store persisted as one JSON file.
#[derive(Debug)]
pub struct FileFlagStore {
    store_id: String,
    path: PathBuf,
    values: Mutex<HashMap<String, FlagValue>>,
}

impl FileFlagStore {
    /// Opens (or lazily creates) the store `store_id` under `dir`.
    ///
    /// A missing file is an empty store. A corrupt file is logged and also
    /// treated as empty; it is overwritten on the next `set`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if `dir` cannot be created.
    pub fn open(dir: impl AsRef<Path>, store_id: &str) -> Result<Self, DomainError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| {
            DomainError::Infrastructure(format!(
                "cannot create flag directory {}: {e}",
                dir.display()
            ))
        })?;
        let path = dir.join(format!("{store_id}.json"));
        let values = load_values(&path);
        debug!(store_id, path = %path.display(), entries = values.len(), "opened flag store");
        Ok(Self {
            store_id: store_id.to_owned(),
            path,
            values: Mutex::new(values),
        })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &HashMap<String, FlagValue>) -> Result<(), DomainError> {
        let json = serde_json::to_vec_pretty(values).map_err(|e| {
            DomainError::Infrastructure(format!("flag serialization failed: {e}"))
        })?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .and_then(|()| fs::rename(&tmp, &self.path))
            .map_err(|e| {
                DomainError::Infrastructure(format!(
                    "cannot write flag store {}: {e}",
                    self.path.display()
                ))
            })
    }
}

fn load_values(path: &Path) -> HashMap<String, FlagValue> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return HashMap::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "flag store unreadable, starting empty");
            return HashMap::new();
        }
    };
    let object: Map<String, Value> = match serde_json::from_slice(&raw) {
        Ok(object) => object,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "flag store corrupt, starting empty");
            return HashMap::new();
        }
    };
    object
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value::<FlagValue>(value) {
            Ok(flag) => Some((key, flag)),
            Err(_) => {
                warn!(path = %path.display(), key = %key, "dropping flag with unsupported value");
                None
            }
        })
        .collect()
}

impl FlagStore for FileFlagStore {
    fn store_id(&self) -> &str {
        &self.store_id
    }

    fn get(&self, key: &str) -> Option<FlagValue> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: FlagValue) -> Result<(), DomainError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_owned(), value);
        self.persist(&values)
    }
}
