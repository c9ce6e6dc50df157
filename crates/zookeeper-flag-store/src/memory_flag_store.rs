//! In-memory `FlagStore`.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use zookeeper_core::error::DomainError;
use zookeeper_core::flags::{FlagStore, FlagValue};

/// A flag store that lives only as long as the process.
#[derive(Debug)]
pub struct MemoryFlagStore {
    store_id: String,
    values: Mutex<HashMap<String, FlagValue>>,
}

impl MemoryFlagStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(store_id: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            values: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a store pre-populated with `entries`.
    #[must_use]
    pub fn with_entries<I, K>(store_id: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, FlagValue)>,
        K: Into<String>,
    {
        let values = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self {
            store_id: store_id.into(),
            values: Mutex::new(values),
        }
    }
}

impl FlagStore for MemoryFlagStore {
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
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value);
        Ok(())
    }
}
