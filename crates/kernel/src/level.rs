use crate::store::{Entity, EntityStore, StoreError};
use levelforge_common::{EntityKind, EntityUid, LinkRole, Transform};

/// The level being edited.
///
/// Owns the entity store, the player-start singleton, link pulse state and
/// the unsaved flag. All mutations go through explicit operations; editing
/// sessions only ever hold `EntityUid`s into it.
#[derive(Debug, Clone)]
pub struct Level {
    store: EntityStore,
    player_start: Entity,
    /// Role currently highlighted while a link is being chosen.
    pulsing: Option<LinkRole>,
    unsaved: bool,
}

impl Default for Level {
    fn default() -> Self {
        Self::new()
    }
}

impl Level {
    /// Empty level with the player start at the origin.
    pub fn new() -> Self {
        Self::with_player_start(Transform::default())
    }

    /// Create an empty level with the player start at `transform`.
    pub fn with_player_start(transform: Transform) -> Self {
        Self {
            store: EntityStore::new(),
            player_start: Entity::new(EntityUid::PLAYER_START, EntityKind::PlayerStart, transform),
            pulsing: None,
            unsaved: false,
        }
    }

    /// Read-only access to placed entities.
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// The player start singleton.
    pub fn player_start(&self) -> &Entity {
        &self.player_start
    }

    /// Number of placed entities, not counting the player start.
    pub fn entity_count(&self) -> usize {
        self.store.len()
    }

    /// Placed entities in slot order, then the player start.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.store.iter().chain(std::iter::once(&self.player_start))
    }

    /// Look up an entity, including the player start.
    pub fn resolve(&self, uid: EntityUid) -> Option<&Entity> {
        if uid == EntityUid::PLAYER_START {
            return Some(&self.player_start);
        }
        self.store.resolve(uid)
    }

    /// Mutable lookup, including the player start.
    pub fn resolve_mut(&mut self, uid: EntityUid) -> Option<&mut Entity> {
        if uid == EntityUid::PLAYER_START {
            return Some(&mut self.player_start);
        }
        self.store.resolve_mut(uid)
    }

    /// Whether `uid` resolves.
    pub fn contains(&self, uid: EntityUid) -> bool {
        self.resolve(uid).is_some()
    }

    /// Place a new entity. The player start cannot be spawned.
    pub fn spawn(
        &mut self,
        kind: EntityKind,
        transform: Transform,
    ) -> Result<EntityUid, StoreError> {
        if kind == EntityKind::PlayerStart {
            return Err(StoreError::ReservedUid(EntityUid::PLAYER_START));
        }
        let uid = self.store.allocate(kind, transform)?;
        if self.pulsing.is_some_and(|role| role == kind.role()) {
            if let Some(entity) = self.store.resolve_mut(uid) {
                entity.pulsing = true;
            }
        }
        tracing::debug!(%uid, ?kind, "spawned entity");
        Ok(uid)
    }

    /// Loader entry point: place `kind` at exactly `uid`.
    pub fn create_with_uid(
        &mut self,
        kind: EntityKind,
        uid: EntityUid,
        transform: Transform,
    ) -> Result<(), StoreError> {
        if kind == EntityKind::PlayerStart {
            return Err(StoreError::ReservedUid(uid));
        }
        self.store.create_with_uid(kind, uid, transform)
    }

    /// Remove an entity. The player start is never removed; stale handles are
    /// ignored.
    pub fn despawn(&mut self, uid: EntityUid) -> Option<Entity> {
        if uid == EntityUid::PLAYER_START {
            return None;
        }
        let removed = self.store.free(uid);
        if let Some(entity) = &removed {
            tracing::debug!(%uid, kind = ?entity.kind, "despawned entity");
        }
        removed
    }

    /// Partner of `uid`, `INVALID` when unlinked or unresolved.
    pub fn partner(&self, uid: EntityUid) -> EntityUid {
        self.resolve(uid).map_or(EntityUid::INVALID, |e| e.partner)
    }

    /// Break `uid`'s link, clearing the reciprocal side if it still points back.
    pub fn unpair(&mut self, uid: EntityUid) {
        let Some(entity) = self.resolve_mut(uid) else {
            return;
        };
        let previous = std::mem::replace(&mut entity.partner, EntityUid::INVALID);
        if let Some(other) = self.resolve_mut(previous) {
            if other.partner == uid {
                other.partner = EntityUid::INVALID;
            }
        }
    }

    /// Link `a` and `b` to each other, breaking any links either had. Returns
    /// false when either handle is stale.
    pub fn pair(&mut self, a: EntityUid, b: EntityUid) -> bool {
        if a == b || !self.contains(a) || !self.contains(b) {
            return false;
        }
        self.unpair(a);
        self.unpair(b);
        if let Some(entity) = self.resolve_mut(a) {
            entity.partner = b;
        }
        if let Some(entity) = self.resolve_mut(b) {
            entity.partner = a;
        }
        true
    }

    /// Highlight every entity with `role`, replacing any running pulse.
    pub fn start_pulse(&mut self, role: LinkRole) {
        self.stop_pulse();
        if !role.is_linkable() {
            return;
        }
        for entity in self.store.iter_mut() {
            entity.pulsing = entity.role() == role;
        }
        self.pulsing = Some(role);
    }

    /// Clear every pulse flag.
    pub fn stop_pulse(&mut self) {
        if self.pulsing.take().is_some() {
            for entity in self.store.iter_mut() {
                entity.pulsing = false;
            }
        }
    }

    /// Role currently pulsing, if any.
    pub fn pulsing_role(&self) -> Option<LinkRole> {
        self.pulsing
    }

    /// Whether edits happened since the last save.
    pub fn is_unsaved(&self) -> bool {
        self.unsaved
    }

    /// Flag an edit.
    pub fn mark_unsaved(&mut self) {
        self.unsaved = true;
    }

    /// Clear the unsaved flag.
    pub fn mark_saved(&mut self) {
        self.unsaved = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn spawn(level: &mut Level, kind: EntityKind) -> EntityUid {
        level.spawn(kind, Transform::default()).unwrap()
    }

    #[test]
    fn player_start_resolves_by_fixed_uid() {
        let mut level = Level::with_player_start(Transform::at(Vec3::new(1.0, 2.0, 3.0)));
        let start = level.resolve(EntityUid::PLAYER_START).unwrap();
        assert_eq!(start.kind, EntityKind::PlayerStart);
        assert_eq!(start.transform.position, Vec3::new(1.0, 2.0, 3.0));

        assert!(level.despawn(EntityUid::PLAYER_START).is_none());
        assert!(level.contains(EntityUid::PLAYER_START));
        assert_eq!(level.entity_count(), 0);
        assert_eq!(level.entities().count(), 1);
    }

    #[test]
    fn player_start_cannot_be_spawned() {
        let mut level = Level::new();
        assert!(level.spawn(EntityKind::PlayerStart, Transform::default()).is_err());
    }

    #[test]
    fn pair_is_reciprocal() {
        let mut level = Level::new();
        let lever = spawn(&mut level, EntityKind::Lever);
        let door = spawn(&mut level, EntityKind::Door);

        assert!(level.pair(lever, door));
        assert_eq!(level.partner(lever), door);
        assert_eq!(level.partner(door), lever);
    }

    #[test]
    fn repairing_clears_previous_partner() {
        let mut level = Level::new();
        let lever = spawn(&mut level, EntityKind::Lever);
        let door = spawn(&mut level, EntityKind::Door);
        let platform = spawn(&mut level, EntityKind::MovingPlatform);

        level.pair(lever, door);
        level.pair(lever, platform);
        assert_eq!(level.partner(lever), platform);
        assert_eq!(level.partner(platform), lever);
        assert_eq!(level.partner(door), EntityUid::INVALID);
    }

    #[test]
    fn unpair_leaves_foreign_reciprocal_alone() {
        let mut level = Level::new();
        let lever = spawn(&mut level, EntityKind::Lever);
        let button = spawn(&mut level, EntityKind::Button);
        let door = spawn(&mut level, EntityKind::Door);

        level.pair(button, door);
        // lever points at door but door points at button
        level.resolve_mut(lever).unwrap().partner = door;
        level.unpair(lever);
        assert_eq!(level.partner(door), button);
    }

    #[test]
    fn pair_rejects_stale_handles() {
        let mut level = Level::new();
        let lever = spawn(&mut level, EntityKind::Lever);
        let door = spawn(&mut level, EntityKind::Door);
        level.despawn(door);
        assert!(!level.pair(lever, door));
        assert_eq!(level.partner(lever), EntityUid::INVALID);
    }

    #[test]
    fn pulse_marks_role_and_new_spawns() {
        let mut level = Level::new();
        let door = spawn(&mut level, EntityKind::Door);
        let lever = spawn(&mut level, EntityKind::Lever);

        level.start_pulse(LinkRole::Activatable);
        assert!(level.resolve(door).unwrap().pulsing);
        assert!(!level.resolve(lever).unwrap().pulsing);

        let platform = spawn(&mut level, EntityKind::MovingPlatform);
        assert!(level.resolve(platform).unwrap().pulsing);

        level.stop_pulse();
        assert!(level.pulsing_role().is_none());
        assert!(level.entities().all(|e| !e.pulsing));
    }

    #[test]
    fn unsaved_flag_round_trip() {
        let mut level = Level::new();
        assert!(!level.is_unsaved());
        level.mark_unsaved();
        assert!(level.is_unsaved());
        level.mark_saved();
        assert!(!level.is_unsaved());
    }
}
