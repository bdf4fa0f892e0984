use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Orientation as yaw/pitch/roll in degrees.
///
/// Yaw turns about world Z (up), pitch about Y, roll about X. Editing tools
/// only ever add to yaw, so keeping degrees avoids accumulating quaternion drift.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EulerAngles {
    pub yaw_degrees: f32,
    pub pitch_degrees: f32,
    pub roll_degrees: f32,
}

impl EulerAngles {
    pub const ZERO: Self = Self {
        yaw_degrees: 0.0,
        pitch_degrees: 0.0,
        roll_degrees: 0.0,
    };

    /// Yaw only, in degrees.
    pub fn from_yaw(yaw_degrees: f32) -> Self {
        Self {
            yaw_degrees,
            ..Self::ZERO
        }
    }

    /// Rotation as a quaternion, applied yaw first.
    pub fn to_quat(self) -> Quat {
        Quat::from_euler(
            EulerRot::ZYX,
            self.yaw_degrees.to_radians(),
            self.pitch_degrees.to_radians(),
            self.roll_degrees.to_radians(),
        )
    }
}

/// Placement of an entity: position, orientation and uniform scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub orientation: EulerAngles,
    pub scale: f32,
}

impl Transform {
    /// Unrotated, unit-scale transform at a position.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: EulerAngles::ZERO,
            scale: 1.0,
        }
    }
}
