//! Persistence: level snapshots and level files.
//!
//! # Invariants
//! - Restoring a snapshot reproduces every entity at its saved `EntityUid`.
//! - Links survive a round trip; links to entities missing from the file are dropped.
//! - A level file whose digest does not match its contents is refused.

pub mod file;
pub mod snapshot;

pub use file::{LevelFile, load_level, save_level};
pub use snapshot::{EntityRecord, LevelSnapshot};

/// Errors from capturing, encoding, or loading levels.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("store error: {0}")]
    Store(#[from] levelforge_kernel::StoreError),
    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },
}

pub fn crate_info() -> &'static str {
    "levelforge-persist v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("persist"));
    }
}
