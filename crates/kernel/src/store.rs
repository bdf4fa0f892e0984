use levelforge_common::{EntityKind, EntityUid, LinkRole, Transform};
use serde::{Deserialize, Serialize};

/// Highest number of slots the store can hold. Index `0xFFFF` is reserved for
/// the sentinel and player-start handles.
pub const MAX_SLOTS: usize = 0xFFFF;

/// Errors from slot allocation and loader placement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("all 65535 entity slots are occupied")]
    SlotsExhausted,
    #[error("uid {0} is the invalid sentinel")]
    InvalidUid(EntityUid),
    #[error("uid {0} uses a reserved slot index")]
    ReservedUid(EntityUid),
    #[error("slot for uid {0} is already occupied")]
    SlotOccupied(EntityUid),
}

/// A placed object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub uid: EntityUid,
    pub kind: EntityKind,
    pub transform: Transform,
    /// Cross-link to the paired activator or activatable, `INVALID` if none.
    pub partner: EntityUid,
    /// Highlighted while a link is being chosen.
    #[serde(skip)]
    pub pulsing: bool,
}

impl Entity {
    /// Unlinked, not pulsing.
    pub fn new(uid: EntityUid, kind: EntityKind, transform: Transform) -> Self {
        Self {
            uid,
            kind,
            transform,
            partner: EntityUid::INVALID,
            pulsing: false,
        }
    }

    /// Link role of this entity's kind.
    pub fn role(&self) -> LinkRole {
        self.kind.role()
    }
}

#[derive(Debug, Clone, Default)]
struct Slot {
    salt: u16,
    entity: Option<Entity>,
}

/// Sparse slot-indexed entity collection.
///
/// Slots are never compacted. A slot's salt is bumped each time it is
/// re-occupied, so any handle issued for an earlier occupant stops resolving.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    slots: Vec<Slot>,
}

impl EntityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place an entity in the lowest free slot, or append a new one.
    pub fn allocate(
        &mut self,
        kind: EntityKind,
        transform: Transform,
    ) -> Result<EntityUid, StoreError> {
        if let Some(index) = self.slots.iter().position(|s| s.entity.is_none()) {
            let slot = &mut self.slots[index];
            slot.salt = slot.salt.wrapping_add(1);
            let uid = EntityUid::new(index as u16, slot.salt);
            slot.entity = Some(Entity::new(uid, kind, transform));
            tracing::trace!(%uid, ?kind, "reused slot");
            return Ok(uid);
        }
        if self.slots.len() >= MAX_SLOTS {
            return Err(StoreError::SlotsExhausted);
        }
        let uid = EntityUid::new(self.slots.len() as u16, 0);
        self.slots.push(Slot {
            salt: 0,
            entity: Some(Entity::new(uid, kind, transform)),
        });
        tracing::trace!(%uid, ?kind, "appended slot");
        Ok(uid)
    }

    /// Place an entity at exactly `uid`, adopting its salt. Used by loaders.
    pub fn create_with_uid(
        &mut self,
        kind: EntityKind,
        uid: EntityUid,
        transform: Transform,
    ) -> Result<(), StoreError> {
        if !uid.is_valid() {
            return Err(StoreError::InvalidUid(uid));
        }
        let index = uid.index() as usize;
        if index >= MAX_SLOTS {
            return Err(StoreError::ReservedUid(uid));
        }
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, Slot::default);
        }
        let slot = &mut self.slots[index];
        if slot.entity.is_some() {
            return Err(StoreError::SlotOccupied(uid));
        }
        slot.salt = uid.salt();
        slot.entity = Some(Entity::new(uid, kind, transform));
        Ok(())
    }

    /// Clear the slot `uid` points at. Leaves the salt for the next allocation
    /// to bump. Stale handles free nothing.
    pub fn free(&mut self, uid: EntityUid) -> Option<Entity> {
        let slot = self.slots.get_mut(uid.index() as usize)?;
        if slot.salt != uid.salt() || slot.entity.is_none() {
            return None;
        }
        slot.entity.take()
    }

    /// Look up a live entity. Stale or invalid handles give None.
    pub fn resolve(&self, uid: EntityUid) -> Option<&Entity> {
        let slot = self.slots.get(uid.index() as usize)?;
        if slot.salt != uid.salt() {
            return None;
        }
        slot.entity.as_ref()
    }

    /// Mutable lookup. Stale or invalid handles give None.
    pub fn resolve_mut(&mut self, uid: EntityUid) -> Option<&mut Entity> {
        let slot = self.slots.get_mut(uid.index() as usize)?;
        if slot.salt != uid.salt() {
            return None;
        }
        slot.entity.as_mut()
    }

    /// Whether `uid` names a live entity.
    pub fn contains(&self, uid: EntityUid) -> bool {
        self.resolve(uid).is_some()
    }

    /// Live entities in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.slots.iter().filter_map(|s| s.entity.as_ref())
    }

    /// Mutable iteration over live entities in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.slots.iter_mut().filter_map(|s| s.entity.as_mut())
    }

    /// Every slot in order, `None` for holes.
    pub fn slots(&self) -> impl Iterator<Item = Option<&Entity>> {
        self.slots.iter().map(|s| s.entity.as_ref())
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.entity.is_none())
    }

    /// Number of slots including holes.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}
