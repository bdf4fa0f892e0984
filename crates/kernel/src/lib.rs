//! Level Kernel: authoritative entity storage for the editor.
//!
//! # Invariants
//! - A handle resolves only while its slot is occupied with a matching salt.
//! - Slots are reused lowest-first and their salt is bumped on every reuse.
//! - Links are reciprocal: pairing breaks both sides' previous links.

pub mod level;
pub mod raycast;
pub mod store;

pub use level::Level;
pub use raycast::{BoundsRaycaster, EntityRaycaster, RaycastHit};
pub use store::{Entity, EntityStore, MAX_SLOTS, StoreError};
