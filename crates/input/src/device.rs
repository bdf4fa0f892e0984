use crate::gesture::{ActorPose, ButtonState, Gestures};
use levelforge_common::ActorId;
use serde::{Deserialize, Serialize};

/// Rates used when turning analog input into hold-distance changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputTuning {
    /// Joystick hold-distance speed, world units per second at full deflection.
    pub joystick_distance_speed: f32,
    /// Hold-distance change per scroll wheel notch.
    pub wheel_distance_step: f32,
}

impl Default for InputTuning {
    fn default() -> Self {
        Self {
            joystick_distance_speed: 5.0,
            wheel_distance_step: 0.25,
        }
    }
}

/// Raw state of one tracked hand controller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HandControllerState {
    pub pose: ActorPose,
    pub grip: ButtonState,
    pub trigger: ButtonState,
    pub select_pressed: bool,
    pub back_pressed: bool,
    pub axis_lock_pressed: bool,
    /// Joystick counts only while clicked in.
    pub joystick_pressed: bool,
    pub joystick_y: f32,
}

impl HandControllerState {
    /// Grip grabs, trigger clones or rotates, back deletes or drops.
    pub fn gestures(&self, delta_seconds: f32, tuning: &InputTuning) -> Gestures {
        let hold_distance_delta = if self.joystick_pressed {
            self.joystick_y * tuning.joystick_distance_speed * delta_seconds
        } else {
            0.0
        };
        Gestures {
            primary: self.grip,
            secondary: self.trigger,
            place: self.trigger,
            select: self.select_pressed,
            delete: self.back_pressed,
            drop_to_ground: self.back_pressed,
            hold_distance_delta,
            history_tap: self.grip.pressed,
            cycle_axis_lock: self.axis_lock_pressed,
            cycle_kind: i32::from(self.select_pressed) - i32::from(self.back_pressed),
            ..Gestures::default()
        }
    }
}

/// Raw mouse and keyboard state for one frame. `*_pressed` fields are
/// key-down edges, `*_held` fields are levels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MouseKeyboardState {
    pub pose: ActorPose,
    pub left_button: ButtonState,
    pub alt_held: bool,
    pub ctrl_held: bool,
    pub shift_held: bool,
    pub space_pressed: bool,
    pub delete_pressed: bool,
    pub end_pressed: bool,
    pub left_arrow_pressed: bool,
    pub right_arrow_pressed: bool,
    pub up_arrow_pressed: bool,
    pub down_arrow_pressed: bool,
    pub z_pressed: bool,
    pub y_pressed: bool,
    pub x_pressed: bool,
    pub e_pressed: bool,
    pub q_pressed: bool,
    /// Scroll notches this frame, positive away from the user.
    pub wheel_delta: f32,
}

impl MouseKeyboardState {
    /// Left click grabs, Alt+left click clones; releasing the button ends
    /// either. Rotation and scale come from the arrow keys.
    pub fn gestures(&self, tuning: &InputTuning) -> Gestures {
        let click = self.left_button;
        let primary = ButtonState {
            pressed: click.pressed && !self.alt_held,
            ..click
        };
        let secondary = ButtonState {
            pressed: click.pressed && self.alt_held,
            ..click
        };
        let undo = self.ctrl_held && self.z_pressed && !self.shift_held;
        let redo = self.ctrl_held && (self.y_pressed || (self.shift_held && self.z_pressed));
        Gestures {
            primary,
            secondary,
            place: click,
            select: self.space_pressed,
            delete: self.delete_pressed,
            drop_to_ground: self.end_pressed,
            hold_distance_delta: self.wheel_delta * tuning.wheel_distance_step,
            rotate_steps: i32::from(self.left_arrow_pressed) - i32::from(self.right_arrow_pressed),
            scale_steps: i32::from(self.up_arrow_pressed) - i32::from(self.down_arrow_pressed),
            undo,
            redo,
            history_tap: false,
            cycle_axis_lock: self.x_pressed && !self.ctrl_held,
            cycle_kind: i32::from(self.e_pressed) - i32::from(self.q_pressed),
        }
    }
}

/// Everything one actor contributes to a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorFrame {
    pub pose: ActorPose,
    pub gestures: Gestures,
}

/// Input for all actors for one frame. An absent device contributes nothing
/// and its session is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInput {
    pub left_hand: Option<HandControllerState>,
    pub right_hand: Option<HandControllerState>,
    pub mouse_keyboard: Option<MouseKeyboardState>,
    pub delta_seconds: f32,
}

impl FrameInput {
    /// One actor's pose and gestures, or None if its device is absent.
    pub fn actor_frame(&self, actor: ActorId, tuning: &InputTuning) -> Option<ActorFrame> {
        match actor {
            ActorId::LeftHand => self.left_hand.map(|hand| ActorFrame {
                pose: hand.pose,
                gestures: hand.gestures(self.delta_seconds, tuning),
            }),
            ActorId::RightHand => self.right_hand.map(|hand| ActorFrame {
                pose: hand.pose,
                gestures: hand.gestures(self.delta_seconds, tuning),
            }),
            ActorId::MouseKeyboard => self.mouse_keyboard.map(|mk| ActorFrame {
                pose: mk.pose,
                gestures: mk.gestures(tuning),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joystick_needs_click() {
        let tuning = InputTuning::default();
        let mut hand = HandControllerState {
            joystick_y: 1.0,
            ..Default::default()
        };
        assert_eq!(hand.gestures(0.5, &tuning).hold_distance_delta, 0.0);
        hand.joystick_pressed = true;
        assert!((hand.gestures(0.5, &tuning).hold_distance_delta - 2.5).abs() < 1e-6);
    }

    #[test]
    fn grip_press_feeds_history_tap() {
        let hand = HandControllerState {
            grip: ButtonState::press(),
            ..Default::default()
        };
        let g = hand.gestures(0.016, &InputTuning::default());
        assert!(g.primary.pressed);
        assert!(g.history_tap);
        assert!(!g.secondary.pressed);
    }

    #[test]
    fn alt_click_clones_instead_of_grabbing() {
        let tuning = InputTuning::default();
        let mut mk = MouseKeyboardState {
            left_button: ButtonState::press(),
            ..Default::default()
        };
        let g = mk.gestures(&tuning);
        assert!(g.primary.pressed && !g.secondary.pressed);

        mk.alt_held = true;
        let g = mk.gestures(&tuning);
        assert!(!g.primary.pressed && g.secondary.pressed);
        assert!(g.primary.held && g.secondary.held);
    }

    #[test]
    fn release_ends_both_buttons() {
        let mk = MouseKeyboardState {
            left_button: ButtonState::release(),
            ..Default::default()
        };
        let g = mk.gestures(&InputTuning::default());
        assert!(g.primary.released && g.secondary.released);
    }

    #[test]
    fn keyboard_history_chords() {
        let tuning = InputTuning::default();
        let ctrl_z = MouseKeyboardState {
            ctrl_held: true,
            z_pressed: true,
            ..Default::default()
        };
        assert!(ctrl_z.gestures(&tuning).undo);
        assert!(!ctrl_z.gestures(&tuning).redo);

        let ctrl_shift_z = MouseKeyboardState {
            shift_held: true,
            ..ctrl_z
        };
        assert!(!ctrl_shift_z.gestures(&tuning).undo);
        assert!(ctrl_shift_z.gestures(&tuning).redo);

        let ctrl_y = MouseKeyboardState {
            ctrl_held: true,
            y_pressed: true,
            ..Default::default()
        };
        assert!(ctrl_y.gestures(&tuning).redo);
    }

    #[test]
    fn wheel_and_arrows() {
        let mk = MouseKeyboardState {
            wheel_delta: 2.0,
            left_arrow_pressed: true,
            down_arrow_pressed: true,
            ..Default::default()
        };
        let g = mk.gestures(&InputTuning::default());
        assert_eq!(g.hold_distance_delta, 0.5);
        assert_eq!(g.rotate_steps, 1);
        assert_eq!(g.scale_steps, -1);
    }

    #[test]
    fn absent_devices_produce_no_frame() {
        let input = FrameInput {
            right_hand: Some(HandControllerState::default()),
            ..Default::default()
        };
        let tuning = InputTuning::default();
        assert!(input.actor_frame(ActorId::LeftHand, &tuning).is_none());
        assert!(input.actor_frame(ActorId::RightHand, &tuning).is_some());
        assert!(input.actor_frame(ActorId::MouseKeyboard, &tuning).is_none());
    }
}
