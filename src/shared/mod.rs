//! Geteilte Konfiguration des Sync-Kerns.

pub mod options;

pub use options::{SyncOptions, DEFAULT_SPINE_RADIUS, EVENT_LOG_MAX_ENTRIES};
