//! Test localizer: echoes keys back.

use zookeeper_core::localization::Localizer;

/// Returns every key untranslated, so assertions can name keys directly.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyLocalizer {
    /// Value reported by `is_rtl`.
    pub rtl: bool,
}

impl Localizer for KeyLocalizer {
    fn t(&self, key: &str) -> String {
        key.to_owned()
    }

    fn is_rtl(&self) -> bool {
        self.rtl
    }
}
