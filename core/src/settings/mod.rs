//! Settings persistence
//!
//! One JSON record on disk, read once at startup and replaced wholesale on
//! every mutation. A missing or corrupt file is never an error the user
//! sees: the store logs a warning and hands back defaults.

mod store;

pub use store::{SettingsError, SettingsStore};
