//! YAML string catalogues.
//!
//! Catalogues are embedded at build time. Nested keys are flattened to
//! dotted paths, so `map: { title: ... }` is looked up as `map.title`.

use std::collections::HashMap;
use std::str::FromStr;

use serde_yaml::Value;
use tracing::debug;
use zookeeper_core::localization::Localizer;

use crate::error::AppError;

const EN_CATALOG: &str = include_str!("../locales/en.yaml");
const HE_CATALOG: &str = include_str!("../locales/he.yaml");

/// A supported language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    /// English.
    En,
    /// Hebrew.
    He,
}

impl Locale {
    fn source(self) -> &'static str {
        match self {
            Self::En => EN_CATALOG,
            Self::He => HE_CATALOG,
        }
    }
}

impl FromStr for Locale {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::En),
            "he" => Ok(Self::He),
            other => Err(AppError::Config(format!(
                "ZOOKEEPER_LOCALE must be `en` or `he`, got `{other}`"
            ))),
        }
    }
}

/// The strings of one language.
#[derive(Debug, Clone)]
pub struct Catalog {
    strings: HashMap<String, String>,
    rtl: bool,
}

impl Catalog {
    /// Loads the embedded catalogue for `locale`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Catalog` if the embedded YAML is malformed.
    pub fn for_locale(locale: Locale) -> Result<Self, AppError> {
        Self::parse(locale.source())
    }

    /// Parses a catalogue document with a boolean `rtl` and a nested
    /// `strings` mapping.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Catalog` if the document does not have that shape.
    pub fn parse(source: &str) -> Result<Self, AppError> {
        let document: Value = serde_yaml::from_str(source)
            .map_err(|e| AppError::Catalog(format!("invalid catalogue YAML: {e}")))?;
        let rtl = document.get("rtl").and_then(Value::as_bool).unwrap_or(false);
        let root = document
            .get("strings")
            .ok_or_else(|| AppError::Catalog("catalogue has no `strings` section".into()))?;
        let mut strings = HashMap::new();
        flatten(root, String::new(), &mut strings)?;
        Ok(Self { strings, rtl })
    }
}

fn flatten(value: &Value, prefix: String, out: &mut HashMap<String, String>) -> Result<(), AppError> {
    match value {
        Value::Mapping(mapping) => {
            for (key, child) in mapping {
                let key = key
                    .as_str()
                    .ok_or_else(|| AppError::Catalog(format!("non-string key under `{prefix}`")))?;
                let path = if prefix.is_empty() {
                    key.to_owned()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(child, path, out)?;
            }
            Ok(())
        }
        Value::String(text) => {
            out.insert(prefix, text.clone());
            Ok(())
        }
        _ => Err(AppError::Catalog(format!("`{prefix}` is not a string"))),
    }
}

impl Localizer for Catalog {
    fn t(&self, key: &str) -> String {
        if let Some(text) = self.strings.get(key) {
            text.clone()
        } else {
            debug!(key, "missing translation");
            key.to_owned()
        }
    }

    fn is_rtl(&self) -> bool {
        self.rtl
    }
}
