use crate::record::ActionRecord;
use levelforge_common::{EntityUid, LinkRole};
use levelforge_kernel::Level;

/// Result of a pick made while linking.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkOutcome {
    /// The pair was linked; the record reverts it.
    Linked(ActionRecord),
    /// The picked entity cannot pair with the origin. Linking continues.
    Incompatible,
    /// The origin is gone or linking was not active. Linking has ended.
    Cancelled,
}

/// Two-step pairing of an activator with an activatable.
///
/// Entering names the origin entity and pulses every entity of the opposite
/// role; a pick on a compatible entity completes the link.
#[derive(Debug, Clone, Default)]
pub struct LinkCoordinator {
    origin: Option<EntityUid>,
}

impl LinkCoordinator {
    /// Create an inactive coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether link mode is active.
    pub fn is_active(&self) -> bool {
        self.origin.is_some()
    }

    /// The entity whose link control started the current linking.
    pub fn origin(&self) -> Option<EntityUid> {
        self.origin
    }

    /// Start linking from `uid`. Rejects stale handles and entities that
    /// cannot be linked. Entering again replaces the origin.
    pub fn enter(&mut self, level: &mut Level, uid: EntityUid) -> bool {
        let Some(role) = level.resolve(uid).map(|e| e.role()) else {
            tracing::debug!(%uid, "link origin is gone");
            return false;
        };
        if !role.is_linkable() {
            tracing::warn!(%uid, "entity cannot be linked");
            return false;
        }
        level.start_pulse(role.opposite());
        self.origin = Some(uid);
        tracing::info!(%uid, ?role, "link mode");
        true
    }

    /// Leave link mode without linking. Returns false if it was not active.
    pub fn cancel(&mut self, level: &mut Level) -> bool {
        if self.origin.take().is_none() {
            return false;
        }
        level.stop_pulse();
        tracing::debug!("link mode cancelled");
        true
    }

    /// Pair the origin with `picked`, whichever order their roles come in.
    pub fn complete(&mut self, level: &mut Level, picked: EntityUid) -> LinkOutcome {
        let Some(origin) = self.origin else {
            return LinkOutcome::Cancelled;
        };
        let Some(origin_role) = level.resolve(origin).map(|e| e.role()) else {
            self.cancel(level);
            return LinkOutcome::Cancelled;
        };
        let Some(picked_role) = level.resolve(picked).map(|e| e.role()) else {
            return LinkOutcome::Incompatible;
        };
        let (activator, activatable) = match (origin_role, picked_role) {
            (LinkRole::Activator, LinkRole::Activatable) => (origin, picked),
            (LinkRole::Activatable, LinkRole::Activator) => (picked, origin),
            _ => {
                tracing::debug!(%origin, %picked, "incompatible link pick");
                return LinkOutcome::Incompatible;
            }
        };

        let record = ActionRecord::Link {
            activator,
            activatable,
            prior_activator_link: level.partner(activator),
            prior_activatable_link: level.partner(activatable),
        };
        level.pair(activator, activatable);
        self.origin = None;
        level.stop_pulse();
        tracing::info!(%activator, %activatable, "linked");
        LinkOutcome::Linked(record)
    }
}
