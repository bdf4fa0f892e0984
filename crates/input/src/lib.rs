//! Input: hand-controller and mouse/keyboard state mapped onto one shared
//! gesture set, plus the named commands raised by editor UI.
//!
//! # Invariants
//! - Edit sessions consume `Gestures`, never raw device state.
//! - Every device maps onto the same gesture set; only the mapping differs.

pub mod command;
pub mod device;
pub mod gesture;
pub mod tap;

pub use command::EditorCommand;
pub use device::{ActorFrame, FrameInput, HandControllerState, InputTuning, MouseKeyboardState};
pub use gesture::{ActorPose, ButtonState, Gestures};
pub use tap::{DoubleTapDetector, TapResolution};

pub fn crate_info() -> &'static str {
    "levelforge-input v0.1.0"
}
