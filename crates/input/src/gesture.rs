use glam::Vec3;

/// Edge and level state of one logical button for a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    /// Went down this frame.
    pub pressed: bool,
    /// Went up this frame.
    pub released: bool,
    /// Down at the end of this frame.
    pub held: bool,
}

impl ButtonState {
    pub const IDLE: Self = Self {
        pressed: false,
        released: false,
        held: false,
    };

    /// Derive edges from the previous and current level.
    pub fn from_levels(was_down: bool, is_down: bool) -> Self {
        Self {
            pressed: is_down && !was_down,
            released: was_down && !is_down,
            held: is_down,
        }
    }

    /// Pressed this frame.
    pub fn press() -> Self {
        Self::from_levels(false, true)
    }

    /// Held since an earlier frame.
    pub fn hold() -> Self {
        Self::from_levels(true, true)
    }

    /// Released this frame.
    pub fn release() -> Self {
        Self::from_levels(true, false)
    }
}

/// Where an actor is and where it points this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorPose {
    pub aim_origin: Vec3,
    pub aim_direction: Vec3,
    /// Actor position used for two-handed scaling.
    pub position: Vec3,
    /// Actor yaw, used for twist-to-rotate.
    pub yaw_degrees: f32,
}

impl Default for ActorPose {
    fn default() -> Self {
        Self {
            aim_origin: Vec3::ZERO,
            aim_direction: Vec3::X,
            position: Vec3::ZERO,
            yaw_degrees: 0.0,
        }
    }
}

impl ActorPose {
    /// Pose at `aim_origin` aiming along `aim_direction`.
    pub fn aiming(aim_origin: Vec3, aim_direction: Vec3) -> Self {
        Self {
            aim_origin,
            aim_direction,
            position: aim_origin,
            yaw_degrees: 0.0,
        }
    }
}

/// Modality-independent gestures for one actor and one frame.
///
/// Every input device maps onto this set; the edit session interprets it
/// according to its current mode.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Gestures {
    /// Grab: translate at rest, joins a two-handed scale.
    pub primary: ButtonState,
    /// Clone at rest, rotate while translating.
    pub secondary: ButtonState,
    /// Create-mode placement drag.
    pub place: ButtonState,
    /// Toggle selection, or pick a link partner.
    pub select: bool,
    pub delete: bool,
    pub drop_to_ground: bool,
    /// Change of hold distance along the aim ray, in world units.
    pub hold_distance_delta: f32,
    /// Keyboard yaw nudges, positive turns counter-clockwise.
    pub rotate_steps: i32,
    /// Keyboard scale nudges.
    pub scale_steps: i32,
    pub undo: bool,
    pub redo: bool,
    /// Feeds the dual-tap undo/redo detector.
    pub history_tap: bool,
    pub cycle_axis_lock: bool,
    /// Step through placeable kinds in create mode.
    pub cycle_kind: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_from_levels() {
        assert_eq!(
            ButtonState::from_levels(false, true),
            ButtonState {
                pressed: true,
                released: false,
                held: true,
            }
        );
        assert_eq!(
            ButtonState::from_levels(true, false),
            ButtonState {
                pressed: false,
                released: true,
                held: false,
            }
        );
        assert_eq!(ButtonState::from_levels(false, false), ButtonState::IDLE);
        assert!(ButtonState::hold().held && !ButtonState::hold().pressed);
    }

    #[test]
    fn default_gestures_do_nothing() {
        let g = Gestures::default();
        assert!(!g.primary.pressed && !g.select && !g.undo);
        assert_eq!(g.hold_distance_delta, 0.0);
    }
}
