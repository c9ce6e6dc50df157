//! Router contract consumed by screens.

/// Stack-based screen navigation.
pub trait Router: Send + Sync {
    /// Pushes the screen at `path` on top of the current one.
    fn push(&self, path: &str);

    /// Pops the current screen.
    fn back(&self);

    /// Replaces the current screen with `path` (used for initial entry).
    fn redirect(&self, path: &str);
}
