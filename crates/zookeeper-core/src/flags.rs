//! Persistent flags store abstraction.
//!
//! A flag store is a small namespaced key/value map whose values outlive the
//! process. Reads never fail: a missing or mistyped value reads as the
//! type's default.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Store id holding application settings such as `hasShownWelcome`.
pub const APP_SETTINGS_STORE: &str = "app-settings";

/// Store id holding the last-screen bookkeeping.
pub const NAVIGATION_STATE_STORE: &str = "navigation-state";

/// Store id holding per-game completion flags.
pub const GAME_PROGRESS_STORE: &str = "game-progress";

/// Key in [`APP_SETTINGS_STORE`] recording that the welcome was dismissed.
pub const HAS_SHOWN_WELCOME_KEY: &str = "hasShownWelcome";

/// A single persisted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    /// A boolean flag.
    Bool(bool),
    /// An integral number (timestamps are stored as epoch milliseconds).
    Number(i64),
    /// A string value.
    String(String),
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FlagValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Durable key/value store, namespaced by [`FlagStore::store_id`].
///
/// Implementations are written to from a single UI thread; each key is
/// independent, so no multi-key atomicity is offered.
pub trait FlagStore: Send + Sync {
    /// The namespace this store persists under.
    fn store_id(&self) -> &str;

    /// Returns the raw value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<FlagValue>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the value cannot be made
    /// durable.
    fn set(&self, key: &str, value: FlagValue) -> Result<(), DomainError>;

    /// Reads a boolean, defaulting to `false`.
    fn get_bool(&self, key: &str) -> bool {
        matches!(self.get(key), Some(FlagValue::Bool(true)))
    }

    /// Reads a string, defaulting to the empty string.
    fn get_string(&self, key: &str) -> String {
        match self.get(key) {
            Some(FlagValue::String(value)) => value,
            _ => String::new(),
        }
    }

    /// Reads a number, defaulting to `0`.
    fn get_number(&self, key: &str) -> i64 {
        match self.get(key) {
            Some(FlagValue::Number(value)) => value,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Default)]
    struct MapStore(Mutex<HashMap<String, FlagValue>>);

    impl FlagStore for MapStore {
        fn store_id(&self) -> &str {
            "test"
        }

        fn get(&self, key: &str) -> Option<FlagValue> {
            self.0.lock().unwrap().get(key).cloned()
        }

        fn set(&self, key: &str, value: FlagValue) -> Result<(), DomainError> {
            self.0.lock().unwrap().insert(key.to_owned(), value);
            Ok(())
        }
    }

    #[test]
    fn test_typed_readers_default_when_missing() {
        let store = MapStore::default();

        assert!(!store.get_bool("missing"));
        assert_eq!(store.get_string("missing"), "");
        assert_eq!(store.get_number("missing"), 0);
    }

    #[test]
    fn test_typed_readers_default_when_value_has_wrong_type() {
        // Arrange
        let store = MapStore::default();
        store.set("flag", FlagValue::from("yes")).unwrap();
        store.set("name", FlagValue::from(42)).unwrap();
        store.set("count", FlagValue::from(true)).unwrap();

        // Act / Assert
        assert!(!store.get_bool("flag"));
        assert_eq!(store.get_string("name"), "");
        assert_eq!(store.get_number("count"), 0);
    }

    #[test]
    fn test_flag_value_serializes_untagged() {
        let values = vec![
            FlagValue::from(true),
            FlagValue::from(1_700_000_000_000),
            FlagValue::from("map"),
        ];

        let json = serde_json::to_string(&values).unwrap();

        assert_eq!(json, r#"[true,1700000000000,"map"]"#);
        let back: Vec<FlagValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }
}
