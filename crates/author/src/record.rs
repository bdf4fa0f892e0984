use levelforge_common::{EntityKind, EntityUid, Transform};
use levelforge_kernel::Level;

/// Which transform component a `Transform` record restores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {
    Translate,
    Rotate,
    Scale,
}

/// Snapshot of an entity taken as it was removed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemovedEntity {
    pub uid: EntityUid,
    pub kind: EntityKind,
    pub transform: Transform,
    pub partner: EntityUid,
}

/// One reversible edit.
///
/// Records never borrow live entity data: everything needed to revert is
/// copied in. Reverting a record yields the record that reverts it back,
/// which is what lets undo and redo share one code path.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionRecord {
    Transform {
        kind: TransformKind,
        entity: EntityUid,
        prior: Transform,
    },
    /// Entities placed together; `priors` is parallel to `entities`.
    Create {
        entities: Vec<EntityUid>,
        priors: Vec<Transform>,
    },
    Clone {
        entity: EntityUid,
    },
    Delete {
        entity: EntityUid,
        kind: EntityKind,
        prior: Transform,
        partner: EntityUid,
    },
    /// Entities removed together, the counterpart of `Create`.
    DeleteBatch { entities: Vec<RemovedEntity> },
    Link {
        activator: EntityUid,
        activatable: EntityUid,
        prior_activator_link: EntityUid,
        prior_activatable_link: EntityUid,
    },
}

impl ActionRecord {
    /// Short name for logs and inspectors.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Transform {
                kind: TransformKind::Translate,
                ..
            } => "translate",
            Self::Transform {
                kind: TransformKind::Rotate,
                ..
            } => "rotate",
            Self::Transform {
                kind: TransformKind::Scale,
                ..
            } => "scale",
            Self::Create { .. } => "create",
            Self::Clone { .. } => "clone",
            Self::Delete { .. } => "delete",
            Self::DeleteBatch { .. } => "delete-batch",
            Self::Link { .. } => "link",
        }
    }

    /// Undo this record's effect on `level` and return the record that would
    /// redo it. `None` when nothing it refers to still resolves.
    pub fn revert(&self, level: &mut Level) -> Option<ActionRecord> {
        match self {
            Self::Transform {
                kind,
                entity,
                prior,
            } => {
                let Some(live) = level.resolve_mut(*entity) else {
                    tracing::debug!(%entity, "transform target is gone");
                    return None;
                };
                let current = live.transform;
                match kind {
                    TransformKind::Translate => live.transform.position = prior.position,
                    TransformKind::Rotate => live.transform.orientation = prior.orientation,
                    TransformKind::Scale => live.transform.scale = prior.scale,
                }
                Some(Self::Transform {
                    kind: *kind,
                    entity: *entity,
                    prior: current,
                })
            }
            Self::Create { entities, .. } => {
                let removed: Vec<RemovedEntity> = entities
                    .iter()
                    .filter_map(|uid| remove(level, *uid))
                    .collect();
                if removed.is_empty() {
                    return None;
                }
                Some(Self::DeleteBatch { entities: removed })
            }
            Self::Clone { entity } => {
                let removed = remove(level, *entity)?;
                Some(Self::Delete {
                    entity: removed.uid,
                    kind: removed.kind,
                    prior: removed.transform,
                    partner: removed.partner,
                })
            }
            Self::Delete {
                entity,
                kind,
                prior,
                partner,
            } => {
                let removed = RemovedEntity {
                    uid: *entity,
                    kind: *kind,
                    transform: *prior,
                    partner: *partner,
                };
                let uid = respawn(level, &removed)?;
                Some(Self::Create {
                    entities: vec![uid],
                    priors: vec![*prior],
                })
            }
            Self::DeleteBatch { entities } => {
                let mut created = Vec::with_capacity(entities.len());
                let mut priors = Vec::with_capacity(entities.len());
                for removed in entities {
                    if let Some(uid) = respawn(level, removed) {
                        created.push(uid);
                        priors.push(removed.transform);
                    }
                }
                if created.is_empty() {
                    return None;
                }
                Some(Self::Create {
                    entities: created,
                    priors,
                })
            }
            Self::Link {
                activator,
                activatable,
                prior_activator_link,
                prior_activatable_link,
            } => {
                if !level.contains(*activator) || !level.contains(*activatable) {
                    tracing::debug!(%activator, %activatable, "link endpoints are gone");
                    return None;
                }
                let current_activator_link = level.partner(*activator);
                let current_activatable_link = level.partner(*activatable);
                level.unpair(*activator);
                level.unpair(*activatable);
                if prior_activator_link.is_valid() {
                    level.pair(*activator, *prior_activator_link);
                }
                if prior_activatable_link.is_valid() {
                    level.pair(*prior_activatable_link, *activatable);
                }
                Some(Self::Link {
                    activator: *activator,
                    activatable: *activatable,
                    prior_activator_link: current_activator_link,
                    prior_activatable_link: current_activatable_link,
                })
            }
        }
    }
}

fn remove(level: &mut Level, uid: EntityUid) -> Option<RemovedEntity> {
    let Some(entity) = level.despawn(uid) else {
        tracing::debug!(%uid, "entity to remove is gone");
        return None;
    };
    Some(RemovedEntity {
        uid,
        kind: entity.kind,
        transform: entity.transform,
        partner: entity.partner,
    })
}

/// Re-create a removed entity under a fresh handle. Its old partner is linked
/// back if that partner is still around and not linked to anything live.
fn respawn(level: &mut Level, removed: &RemovedEntity) -> Option<EntityUid> {
    let uid = match level.spawn(removed.kind, removed.transform) {
        Ok(uid) => uid,
        Err(err) => {
            tracing::warn!(%err, kind = ?removed.kind, "could not re-create entity");
            return None;
        }
    };
    let partner = removed.partner;
    if level.contains(partner) && !level.contains(level.partner(partner)) {
        level.pair(uid, partner);
    }
    Some(uid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use levelforge_common::EulerAngles;

    fn spawn_at(level: &mut Level, kind: EntityKind, x: f32) -> EntityUid {
        level
            .spawn(kind, Transform::at(Vec3::new(x, 0.0, 0.0)))
            .unwrap()
    }

    #[test]
    fn transform_revert_restores_only_its_component() {
        let mut level = Level::new();
        let uid = spawn_at(&mut level, EntityKind::Crate, 1.0);
        let prior = level.resolve(uid).unwrap().transform;
        {
            let e = level.resolve_mut(uid).unwrap();
            e.transform.position = Vec3::new(4.0, 0.0, 0.0);
            e.transform.scale = 3.0;
        }
        let record = ActionRecord::Transform {
            kind: TransformKind::Translate,
            entity: uid,
            prior,
        };
        let inverse = record.revert(&mut level).unwrap();
        let t = level.resolve(uid).unwrap().transform;
        assert_eq!(t.position, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(t.scale, 3.0);

        inverse.revert(&mut level);
        assert_eq!(
            level.resolve(uid).unwrap().transform.position,
            Vec3::new(4.0, 0.0, 0.0)
        );
    }

    #[test]
    fn rotate_record_round_trip() {
        let mut level = Level::new();
        let uid = spawn_at(&mut level, EntityKind::Crate, 0.0);
        let prior = level.resolve(uid).unwrap().transform;
        level.resolve_mut(uid).unwrap().transform.orientation = EulerAngles::from_yaw(45.0);

        let record = ActionRecord::Transform {
            kind: TransformKind::Rotate,
            entity: uid,
            prior,
        };
        let inverse = record.revert(&mut level).unwrap();
        assert_eq!(
            level.resolve(uid).unwrap().transform.orientation,
            EulerAngles::ZERO
        );
        inverse.revert(&mut level);
        let entity = level.resolve(uid).unwrap();
        assert_eq!(entity.transform.orientation.yaw_degrees, 45.0);
    }

    #[test]
    fn create_and_delete_batch_alternate() {
        let mut level = Level::new();
        let uids: Vec<_> = (0..3)
            .map(|i| spawn_at(&mut level, EntityKind::TileGrass, i as f32))
            .collect();
        let priors = uids
            .iter()
            .map(|u| level.resolve(*u).unwrap().transform)
            .collect();
        let record = ActionRecord::Create {
            entities: uids.clone(),
            priors,
        };

        let deleted = record.revert(&mut level).unwrap();
        assert_eq!(level.entity_count(), 0);
        assert!(matches!(&deleted, ActionRecord::DeleteBatch { entities } if entities.len() == 3));

        let recreated = deleted.revert(&mut level).unwrap();
        assert_eq!(level.entity_count(), 3);
        let ActionRecord::Create { entities, .. } = &recreated else {
            panic!("expected create, got {recreated:?}");
        };
        let xs: Vec<f32> = entities
            .iter()
            .map(|u| level.resolve(*u).unwrap().transform.position.x)
            .collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0]);
        for old in &uids {
            assert!(!level.contains(*old));
        }
    }

    #[test]
    fn delete_revert_issues_new_uid_and_relinks() {
        let mut level = Level::new();
        let lever = spawn_at(&mut level, EntityKind::Lever, 0.0);
        let door = spawn_at(&mut level, EntityKind::Door, 2.0);
        level.pair(lever, door);

        let entity = level.despawn(lever).unwrap();
        let record = ActionRecord::Delete {
            entity: lever,
            kind: entity.kind,
            prior: entity.transform,
            partner: entity.partner,
        };
        // Take the freed slot so the re-created lever lands elsewhere.
        let filler = spawn_at(&mut level, EntityKind::Coin, 9.0);
        assert_eq!(filler.index(), lever.index());

        let inverse = record.revert(&mut level).unwrap();
        let ActionRecord::Create { entities, .. } = &inverse else {
            panic!("expected create");
        };
        let revived = entities[0];
        assert_ne!(revived, lever);
        assert!(!level.contains(lever));
        assert_eq!(level.partner(door), revived);
        assert_eq!(level.partner(revived), door);
    }

    #[test]
    fn respawn_keeps_partner_that_moved_on() {
        let mut level = Level::new();
        let lever = spawn_at(&mut level, EntityKind::Lever, 0.0);
        let button = spawn_at(&mut level, EntityKind::Button, 1.0);
        let door = spawn_at(&mut level, EntityKind::Door, 2.0);
        level.pair(lever, door);
        let removed = level.despawn(lever).unwrap();
        level.pair(button, door);

        let record = ActionRecord::Delete {
            entity: lever,
            kind: removed.kind,
            prior: removed.transform,
            partner: removed.partner,
        };
        record.revert(&mut level).unwrap();
        assert_eq!(level.partner(door), button);
    }

    #[test]
    fn clone_revert_yields_delete() {
        let mut level = Level::new();
        let uid = spawn_at(&mut level, EntityKind::Crate, 3.0);
        let record = ActionRecord::Clone { entity: uid };
        let inverse = record.revert(&mut level).unwrap();
        assert!(!level.contains(uid));
        assert!(matches!(
            inverse,
            ActionRecord::Delete { kind: EntityKind::Crate, prior, .. } if prior.position.x == 3.0
        ));
    }

    #[test]
    fn stale_targets_revert_to_nothing() {
        let mut level = Level::new();
        let uid = spawn_at(&mut level, EntityKind::Crate, 0.0);
        level.despawn(uid);
        let records = [
            ActionRecord::Transform {
                kind: TransformKind::Scale,
                entity: uid,
                prior: Transform::default(),
            },
            ActionRecord::Clone { entity: uid },
            ActionRecord::Create {
                entities: vec![uid],
                priors: vec![Transform::default()],
            },
        ];
        for record in records {
            assert!(record.revert(&mut level).is_none(), "{}", record.label());
        }
    }

    #[test]
    fn link_revert_restores_previous_pairs() {
        let mut level = Level::new();
        let a = spawn_at(&mut level, EntityKind::Lever, 0.0);
        let b = spawn_at(&mut level, EntityKind::Door, 1.0);
        let c = spawn_at(&mut level, EntityKind::Door, 2.0);
        level.pair(a, b);

        let record = ActionRecord::Link {
            activator: a,
            activatable: c,
            prior_activator_link: level.partner(a),
            prior_activatable_link: level.partner(c),
        };
        level.pair(a, c);
        assert_eq!(level.partner(b), EntityUid::INVALID);

        let inverse = record.revert(&mut level).unwrap();
        assert_eq!(level.partner(a), b);
        assert_eq!(level.partner(b), a);
        assert_eq!(level.partner(c), EntityUid::INVALID);

        inverse.revert(&mut level).unwrap();
        assert_eq!(level.partner(a), c);
        assert_eq!(level.partner(c), a);
        assert_eq!(level.partner(b), EntityUid::INVALID);
    }
}
