use levelforge_common::{ActorId, EntityUid};

/// A named command raised by UI panels or other external events.
///
/// Commands address entities by handle; the editor treats a handle that no
/// longer resolves as "not handled" rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    /// Undo the last edit in one actor's history.
    Undo { actor: ActorId },
    /// Redo the last undone edit in one actor's history.
    Redo { actor: ActorId },
    /// Start choosing a link partner for an activator or activatable.
    EnterLinkMode { entity: EntityUid },
    /// Leave link mode without linking anything.
    CancelLinkMode,
    /// Put an entity back at the origin with no rotation and unit scale.
    ResetTransform { entity: EntityUid },
    Select { entity: EntityUid },
    Delete { entity: EntityUid },
}

impl EditorCommand {
    /// The entity this command targets, if any.
    pub fn target(&self) -> Option<EntityUid> {
        match self {
            Self::EnterLinkMode { entity }
            | Self::ResetTransform { entity }
            | Self::Select { entity }
            | Self::Delete { entity } => Some(*entity),
            Self::Undo { .. } | Self::Redo { .. } | Self::CancelLinkMode => None,
        }
    }
}
