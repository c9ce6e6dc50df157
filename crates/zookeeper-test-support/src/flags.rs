//! Test flag stores.

use zookeeper_core::error::DomainError;
use zookeeper_core::flags::{FlagStore, FlagValue};

/// A flag store that holds nothing and rejects every write. Useful for
/// testing that storage failures never escape a screen.
#[derive(Debug)]
pub struct FailingFlagStore;

impl FlagStore for FailingFlagStore {
    fn store_id(&self) -> &str {
        "failing"
    }

    fn get(&self, _key: &str) -> Option<FlagValue> {
        None
    }

    fn set(&self, _key: &str, _value: FlagValue) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("disk full".into()))
    }
}
