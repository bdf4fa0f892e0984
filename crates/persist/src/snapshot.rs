use crate::PersistError;
use levelforge_common::{EntityKind, EntityUid, Transform};
use levelforge_kernel::Level;
use serde::{Deserialize, Serialize};

/// One placed entity as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub uid: EntityUid,
    pub kind: EntityKind,
    pub transform: Transform,
    #[serde(default, skip_serializing_if = "is_unlinked")]
    pub partner: Option<EntityUid>,
}

fn is_unlinked(partner: &Option<EntityUid>) -> bool {
    partner.is_none()
}

/// Everything needed to rebuild a level: the player start and every placed
/// entity in slot order.
///
/// Editor-only state (link pulses, edit histories, the unsaved flag) is not
/// captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    pub player_start: Transform,
    pub entities: Vec<EntityRecord>,
}

impl LevelSnapshot {
    /// Record the player start and every live entity.
    pub fn capture(level: &Level) -> Self {
        let entities = level
            .store()
            .iter()
            .map(|entity| EntityRecord {
                uid: entity.uid,
                kind: entity.kind,
                transform: entity.transform,
                partner: entity.partner.is_valid().then_some(entity.partner),
            })
            .collect();
        Self {
            player_start: level.player_start().transform,
            entities,
        }
    }

    /// Rebuild a level with every entity at its recorded uid. The result is
    /// marked saved.
    pub fn restore(&self) -> Result<Level, PersistError> {
        let mut level = Level::with_player_start(self.player_start);
        for record in &self.entities {
            level.create_with_uid(record.kind, record.uid, record.transform)?;
        }
        for record in &self.entities {
            let Some(partner) = record.partner else {
                continue;
            };
            if level.partner(record.uid) == partner {
                continue;
            }
            if !level.pair(record.uid, partner) {
                tracing::warn!(uid = %record.uid, %partner, "dropping link to missing entity");
            }
        }
        level.mark_saved();
        tracing::debug!(entities = self.entities.len(), "restored level");
        Ok(level)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse JSON written by `to_json`.
    pub fn from_json(text: &str) -> Result<Self, PersistError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Number of captured entities, excluding the player start.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use levelforge_kernel::StoreError;

    fn sample_level() -> (Level, EntityUid, EntityUid, EntityUid) {
        let mut level = Level::with_player_start(Transform::at(Vec3::new(0.0, 0.0, 1.0)));
        let lever = level
            .spawn(EntityKind::Lever, Transform::at(Vec3::new(1.0, 0.0, 0.0)))
            .unwrap();
        let gone = level.spawn(EntityKind::Coin, Transform::default()).unwrap();
        let door = level
            .spawn(EntityKind::Door, Transform::at(Vec3::new(4.0, 0.0, 0.0)))
            .unwrap();
        level.pair(lever, door);
        level.despawn(gone);
        (level, lever, gone, door)
    }

    #[test]
    fn restore_keeps_uids_links_and_holes() {
        let (level, lever, gone, door) = sample_level();
        let snapshot = LevelSnapshot::capture(&level);
        assert_eq!(snapshot.len(), 2);

        let restored = snapshot.restore().unwrap();
        assert_eq!(restored.entity_count(), 2);
        assert_eq!(restored.store().slot_count(), 3);
        assert!(!restored.contains(gone));
        assert_eq!(restored.resolve(lever).unwrap().kind, EntityKind::Lever);
        assert_eq!(restored.partner(lever), door);
        assert_eq!(restored.partner(door), lever);
        assert_eq!(
            restored.player_start().transform.position,
            Vec3::new(0.0, 0.0, 1.0)
        );
        assert!(!restored.is_unsaved());
    }

    #[test]
    fn json_round_trip() {
        let (level, ..) = sample_level();
        let snapshot = LevelSnapshot::capture(&level);
        let text = snapshot.to_json().unwrap();
        assert!(text.contains("\"Lever\""));
        assert_eq!(LevelSnapshot::from_json(&text).unwrap(), snapshot);
    }

    #[test]
    fn link_to_missing_entity_is_dropped() {
        let (level, lever, _, door) = sample_level();
        let mut snapshot = LevelSnapshot::capture(&level);
        snapshot.entities.retain(|record| record.uid != door);

        let restored = snapshot.restore().unwrap();
        assert_eq!(restored.partner(lever), EntityUid::INVALID);
    }

    #[test]
    fn duplicate_slot_is_an_error() {
        let (level, ..) = sample_level();
        let mut snapshot = LevelSnapshot::capture(&level);
        let first = snapshot.entities[0].clone();
        snapshot.entities.push(first);

        let err = snapshot.restore().unwrap_err();
        assert!(matches!(err, PersistError::Store(StoreError::SlotOccupied(_))));
    }

    #[test]
    fn allocation_after_restore_fills_holes() {
        let (level, _, gone, _) = sample_level();
        let mut restored = LevelSnapshot::capture(&level).restore().unwrap();
        let uid = restored.spawn(EntityKind::Flag, Transform::default()).unwrap();
        assert_eq!(uid.index(), gone.index());
    }
}
