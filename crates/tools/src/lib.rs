//! Developer tooling: read-only views of a level and of the editor's sessions.
//!
//! # Invariants
//! - Tools never mutate the level or the editor.

pub mod inspector;

pub use inspector::{EntityInfo, LevelInspector, LevelSummary, LinkSegment, SessionSummary};

pub fn crate_info() -> &'static str {
    "levelforge-tools v0.1.0"
}
