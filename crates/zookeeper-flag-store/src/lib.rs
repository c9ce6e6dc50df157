//! Flag store implementations.
//!
//! `MemoryFlagStore` keeps values for the life of the process;
//! `FileFlagStore` persists each store id as one JSON object on disk.

pub mod file_flag_store;
pub mod memory_flag_store;

pub use file_flag_store::FileFlagStore;
pub use memory_flag_store::MemoryFlagStore;
