//! Settings persistence
//!
//! The dashboard keeps exactly one persisted record: the user's
//! [`Settings`]. It is read at startup, written on save and cleared on
//! reset. Backends implement [`SettingsStore`]; production uses sled,
//! tests and `--once` runs can use the in-memory store.

mod settings;
mod store;

pub use settings::{Settings, SettingsError};
pub use store::{InMemorySettingsStore, SettingsStore, SledSettingsStore, StorageError, SETTINGS_KEY};
