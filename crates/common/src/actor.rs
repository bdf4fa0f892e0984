use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the independent input sources driving an edit session.
///
/// `ALL` is also the per-frame processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorId {
    LeftHand,
    RightHand,
    MouseKeyboard,
}

impl ActorId {
    pub const ALL: [ActorId; 3] = [Self::LeftHand, Self::RightHand, Self::MouseKeyboard];

    /// Slot of this actor in per-actor arrays.
    pub fn index(self) -> usize {
        match self {
            Self::LeftHand => 0,
            Self::RightHand => 1,
            Self::MouseKeyboard => 2,
        }
    }

    /// The other hand, for two-handed operations. The mouse has no peer.
    pub fn peer(self) -> Option<Self> {
        match self {
            Self::LeftHand => Some(Self::RightHand),
            Self::RightHand => Some(Self::LeftHand),
            Self::MouseKeyboard => None,
        }
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LeftHand => "left-hand",
            Self::RightHand => "right-hand",
            Self::MouseKeyboard => "mouse-keyboard",
        })
    }
}

/// Restricts drag deltas to a single world axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisLock {
    #[default]
    None,
    X,
    Y,
    Z,
}

impl AxisLock {
    /// Replace `delta` with only the locked component.
    pub fn mask(self, delta: Vec3) -> Vec3 {
        match self {
            Self::None => delta,
            Self::X => Vec3::new(delta.x, 0.0, 0.0),
            Self::Y => Vec3::new(0.0, delta.y, 0.0),
            Self::Z => Vec3::new(0.0, 0.0, delta.z),
        }
    }

    /// Cycle none, X, Y, Z, none.
    pub fn next(self) -> Self {
        match self {
            Self::None => Self::X,
            Self::X => Self::Y,
            Self::Y => Self::Z,
            Self::Z => Self::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processing_order_matches_index() {
        for (i, actor) in ActorId::ALL.iter().enumerate() {
            assert_eq!(actor.index(), i);
        }
    }

    #[test]
    fn hands_are_peers() {
        assert_eq!(ActorId::LeftHand.peer(), Some(ActorId::RightHand));
        assert_eq!(ActorId::RightHand.peer(), Some(ActorId::LeftHand));
        assert_eq!(ActorId::MouseKeyboard.peer(), None);
    }

    #[test]
    fn y_lock_keeps_only_y() {
        let masked = AxisLock::Y.mask(Vec3::new(3.0, 4.0, 5.0));
        assert_eq!(masked, Vec3::new(0.0, 4.0, 0.0));
    }

    #[test]
    fn unlocked_passes_through() {
        let delta = Vec3::new(1.0, -2.0, 0.5);
        assert_eq!(AxisLock::None.mask(delta), delta);
    }

    #[test]
    fn lock_cycles_back_to_none() {
        let mut lock = AxisLock::None;
        for _ in 0..4 {
            lock = lock.next();
        }
        assert_eq!(lock, AxisLock::None);
    }
}
