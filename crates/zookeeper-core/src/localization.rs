//! Localization contract consumed by screens.

/// Looks up user-facing strings for the active language.
pub trait Localizer: Send + Sync {
    /// Returns the translation for `key`, or the key itself when missing.
    fn t(&self, key: &str) -> String;

    /// Whether the active language is written right-to-left.
    fn is_rtl(&self) -> bool;
}
