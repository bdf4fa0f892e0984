//! Shared types for the level editor: generational entity handles, transforms,
//! placeable kinds and their link roles, and actor identifiers.
//!
//! # Invariants
//! - `EntityUid` equality is field-wise; liveness is only ever decided by the store.
//! - `LinkRole` is derived from `EntityKind`, never stored separately.

pub mod actor;
pub mod kind;
pub mod types;
pub mod uid;

pub use actor::{ActorId, AxisLock};
pub use kind::{EntityKind, LinkRole, ParseKindError};
pub use types::{EulerAngles, Transform};
pub use uid::EntityUid;

pub fn crate_info() -> &'static str {
    "levelforge-common v0.1.0"
}
