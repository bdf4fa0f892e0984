use levelforge_input::InputTuning;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How redo interacts with new edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryPolicy {
    /// New edits clear the redo stack; redo pushes its counter-record onto undo.
    #[default]
    Conventional,
    /// Redo never feeds back into undo and new edits keep pending redos.
    Legacy,
}

/// Errors from loading editor configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunables for the edit sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Hover ray length, and aim distance when nothing is held.
    pub raycast_distance: f32,
    pub hold_distance_min: f32,
    pub hold_distance_max: f32,
    /// Per-axis distance under which a dragged position snaps to the grid.
    pub snap_threshold: f32,
    /// Second hand tap inside this window redoes instead of undoing.
    pub redo_tap_window_secs: f32,
    pub nudge_yaw_degrees: f32,
    pub nudge_scale_step: f32,
    pub min_scale: f32,
    /// Upper bound on cells placed by one create-mode drag.
    pub max_batch_cells: usize,
    pub history_policy: HistoryPolicy,
    pub input: InputTuning,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            raycast_distance: 10.0,
            hold_distance_min: 0.5,
            hold_distance_max: 10.0,
            snap_threshold: 0.1,
            redo_tap_window_secs: 0.2,
            nudge_yaw_degrees: 15.0,
            nudge_scale_step: 0.1,
            min_scale: 0.05,
            max_batch_cells: 4096,
            history_policy: HistoryPolicy::default(),
            input: InputTuning::default(),
        }
    }
}

impl EditorConfig {
    /// Parse YAML. Missing keys take their defaults.
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Negated comparisons so NaN fails every check.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.raycast_distance > 0.0) {
            return Err(invalid("raycast_distance must be positive"));
        }
        if !(self.hold_distance_min > 0.0 && self.hold_distance_min <= self.hold_distance_max) {
            return Err(ConfigError::Invalid(format!(
                "hold distance range [{}, {}] is empty",
                self.hold_distance_min, self.hold_distance_max
            )));
        }
        if !(self.snap_threshold >= 0.0 && self.snap_threshold < 0.5) {
            return Err(invalid("snap_threshold must be in [0, 0.5)"));
        }
        let tap_window = Duration::try_from_secs_f32(self.redo_tap_window_secs);
        if tap_window.is_err() {
            return Err(invalid("redo_tap_window_secs is not a valid duration"));
        }
        if !(self.min_scale > 0.0) {
            return Err(invalid("min_scale must be positive"));
        }
        Ok(())
    }

    /// Dual-tap window. Values that fit no `Duration` fall back to zero.
    pub fn redo_tap_window(&self) -> Duration {
        Duration::try_from_secs_f32(self.redo_tap_window_secs)
            .unwrap_or_default()
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid(reason.to_string())
}
