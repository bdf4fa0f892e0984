use glam::Vec3;
use levelforge_author::{ActionMode, LevelEditor};
use levelforge_common::{ActorId, EntityKind, EntityUid, LinkRole};
use levelforge_kernel::Level;
use std::fmt;

/// Level inspector for developer tooling.
///
/// Provides read-only queries against the level and the editor for debugging
/// and development UI.
pub struct LevelInspector;

impl LevelInspector {
    /// Counts for a quick overview.
    pub fn summary(level: &Level) -> LevelSummary {
        let store = level.store();
        LevelSummary {
            entity_count: level.entity_count(),
            slot_count: store.slot_count(),
            holes: store.slot_count() - store.len(),
            links: Self::link_segments(level).len(),
            pulsing: level.pulsing_role(),
            unsaved: level.is_unsaved(),
        }
    }

    /// Details of one entity, or None if it does not resolve.
    pub fn inspect_entity(level: &Level, uid: EntityUid) -> Option<EntityInfo> {
        level.resolve(uid).map(|entity| {
            let t = entity.transform;
            EntityInfo {
                uid,
                kind: entity.kind,
                position: t.position.to_array(),
                yaw_pitch_roll: [
                    t.orientation.yaw_degrees,
                    t.orientation.pitch_degrees,
                    t.orientation.roll_degrees,
                ],
                scale: t.scale,
                partner: level.contains(entity.partner).then_some(entity.partner),
            }
        })
    }

    /// Every live handle, player start included, in ascending order.
    pub fn list_entities(level: &Level) -> Vec<EntityUid> {
        let mut uids: Vec<EntityUid> = level.entities().map(|e| e.uid).collect();
        uids.sort();
        uids
    }

    /// One segment per linked pair, drawn from activator to activatable.
    pub fn link_segments(level: &Level) -> Vec<LinkSegment> {
        level
            .store()
            .iter()
            .filter(|e| e.role() == LinkRole::Activator)
            .filter_map(|activator| {
                let activatable = level.resolve(activator.partner)?;
                Some(LinkSegment {
                    activator: activator.uid,
                    activatable: activatable.uid,
                    from: activator.transform.position,
                    to: activatable.transform.position,
                })
            })
            .collect()
    }

    /// Mode and history depth of each actor's session.
    pub fn sessions(editor: &LevelEditor) -> Vec<SessionSummary> {
        editor
            .sessions()
            .map(|session| SessionSummary {
                actor: session.actor(),
                mode: session.mode(),
                selected: session.selected(),
                undo_depth: session.history().undo_count(),
                redo_depth: session.history().redo_count(),
                next_undo: session.history().last_undo().map(|r| r.label()),
            })
            .collect()
    }
}

/// Summary of level state for the inspector.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSummary {
    pub entity_count: usize,
    pub slot_count: usize,
    /// Free slots awaiting reuse.
    pub holes: usize,
    pub links: usize,
    pub pulsing: Option<LinkRole>,
    pub unsaved: bool,
}

impl fmt::Display for LevelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Level: entities={} slots={} holes={} links={}",
            self.entity_count, self.slot_count, self.holes, self.links
        )?;
        if let Some(role) = self.pulsing {
            write!(f, " pulsing={role:?}")?;
        }
        if self.unsaved {
            f.write_str(" (unsaved)")?;
        }
        Ok(())
    }
}

/// Detailed info about a single entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityInfo {
    pub uid: EntityUid,
    pub kind: EntityKind,
    pub position: [f32; 3],
    pub yaw_pitch_roll: [f32; 3],
    pub scale: f32,
    pub partner: Option<EntityUid>,
}

impl fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} pos=({:.2}, {:.2}, {:.2}) yaw={:.1} scale={:.2}",
            self.uid,
            self.kind,
            self.position[0],
            self.position[1],
            self.position[2],
            self.yaw_pitch_roll[0],
            self.scale,
        )?;
        if let Some(partner) = self.partner {
            write!(f, " -> {partner}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkSegment {
    pub activator: EntityUid,
    pub activatable: EntityUid,
    pub from: Vec3,
    pub to: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub actor: ActorId,
    pub mode: ActionMode,
    pub selected: Option<EntityUid>,
    pub undo_depth: usize,
    pub redo_depth: usize,
    pub next_undo: Option<&'static str>,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:?} undo={} redo={}",
            self.actor, self.mode, self.undo_depth, self.redo_depth
        )?;
        if let Some(label) = self.next_undo {
            write!(f, " next={label}")?;
        }
        Ok(())
    }
}
