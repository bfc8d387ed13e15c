//! Level configuration.
//!
//! A level is described by a single [`HopperConfig`] document loaded from JSON.
//! Vectors are stored as `[f32; 3]` arrays and converted to [`Vec3`] when the
//! scene is activated. [`HopperConfig::validate`] enforces the required fields;
//! everything else falls back to the defaults below.

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::CameraLens;

/// Errors raised while activating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No waypoints defined")]
    EmptyWaypoints,
    #[error("Waypoint {index} is not finite: {value:?}")]
    NonFiniteWaypoint { index: usize, value: [f32; 3] },
    #[error("'{field}' must be positive, got {value}")]
    NonPositiveDuration { field: &'static str, value: f32 },
    #[error("'{field}' must not be negative, got {value}")]
    NegativeValue { field: &'static str, value: f32 },
    #[error("'{field}' must be within [0, 1], got {value}")]
    ThresholdOutOfRange { field: &'static str, value: f32 },
    #[error("Invalid camera lens: {0}")]
    InvalidLens(String),
    #[error("Unknown clip: '{0}'")]
    UnknownClip(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Reference to a named animation clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipRef {
    pub name: String,
    #[serde(default)]
    pub looping: bool,
}

impl ClipRef {
    pub fn once(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            looping: false,
        }
    }

    pub fn looping(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            looping: true,
        }
    }
}

/// Terminal celebration played after the last waypoint is reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CelebrationConfig {
    /// Seconds between reaching the last waypoint and the celebration.
    pub delay: f32,
    /// Scene nodes shown when the celebration fires.
    pub nodes: Vec<String>,
    pub sound: Option<String>,
}

impl Default for CelebrationConfig {
    fn default() -> Self {
        Self {
            delay: 1.0,
            nodes: Vec::new(),
            sound: None,
        }
    }
}

/// Jump sequencer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    pub waypoints: Vec<[f32; 3]>,
    /// Arc height above the higher of start and overshoot point.
    pub jump_height: f32,
    /// Rise + descend time; each phase takes half.
    pub jump_duration: f32,
    /// The descend phase lands this far above the waypoint.
    pub land_offset_height: f32,
    /// Time to settle from the overshoot point onto the waypoint.
    pub land_drop_duration: f32,
    pub landing_sink_amount: f32,
    pub landing_sink_duration: f32,
    pub landing_rise_duration: f32,
    pub jump_clip: Option<ClipRef>,
    pub land_clip: Option<ClipRef>,
    pub jump_sound: Option<String>,
    pub stop_clip_when_idle: bool,
    pub celebration: CelebrationConfig,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            waypoints: Vec::new(),
            jump_height: 2.0,
            jump_duration: 0.5,
            land_offset_height: 0.5,
            land_drop_duration: 0.3,
            landing_sink_amount: 0.2,
            landing_sink_duration: 0.1,
            landing_rise_duration: 0.2,
            jump_clip: Some(ClipRef::once("jump")),
            land_clip: Some(ClipRef::once("land")),
            jump_sound: None,
            stop_clip_when_idle: true,
            celebration: CelebrationConfig::default(),
        }
    }
}

impl JumpConfig {
    /// Waypoints as world-space vectors.
    pub fn waypoint_positions(&self) -> Vec<Vec3> {
        self.waypoints.iter().map(|w| Vec3::from_array(*w)).collect()
    }

    /// Checks the settings required to activate a sequencer.
    ///
    /// `clips` is the set of clip names the character can play. An empty slice
    /// skips clip resolution.
    pub fn validate(&self, clips: &[String]) -> Result<(), ConfigError> {
        if self.waypoints.is_empty() {
            return Err(ConfigError::EmptyWaypoints);
        }
        for (index, value) in self.waypoints.iter().enumerate() {
            if value.iter().any(|c| !c.is_finite()) {
                return Err(ConfigError::NonFiniteWaypoint {
                    index,
                    value: *value,
                });
            }
        }

        positive("jump_duration", self.jump_duration)?;
        non_negative("jump_height", self.jump_height)?;
        non_negative("land_offset_height", self.land_offset_height)?;
        non_negative("land_drop_duration", self.land_drop_duration)?;
        non_negative("landing_sink_amount", self.landing_sink_amount)?;
        non_negative("landing_sink_duration", self.landing_sink_duration)?;
        non_negative("landing_rise_duration", self.landing_rise_duration)?;
        non_negative("celebration.delay", self.celebration.delay)?;

        for clip in [&self.jump_clip, &self.land_clip].into_iter().flatten() {
            resolve_clip(&clip.name, clips)?;
        }
        Ok(())
    }
}

/// Camera tracker settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub lens: CameraLens,
    /// Horizontal bias in viewport pixels while in portrait.
    pub portrait_offset_x: f32,
    /// Horizontal bias in viewport pixels while in landscape.
    pub landscape_offset_x: f32,
    /// Duration of the portrait offset retirement after the first jump.
    pub transition_duration: f32,
    pub follow_speed: f32,
    pub smooth_follow: bool,
    /// Screen fraction the character must reach to arm tracking.
    pub follow_threshold: f32,
    /// Screen fraction at or below which the release landmark stops tracking.
    pub release_threshold: f32,
    /// World X of the left scene boundary, if any.
    pub left_boundary_x: Option<f32>,
    /// World X of the release landmark, if any.
    pub release_landmark_x: Option<f32>,
    /// Initial camera position; Y and Z stay pinned to these values.
    pub initial_position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            lens: CameraLens::default(),
            portrait_offset_x: 0.0,
            landscape_offset_x: 0.0,
            transition_duration: 0.5,
            follow_speed: 5.0,
            smooth_follow: true,
            follow_threshold: 0.5,
            release_threshold: 0.5,
            left_boundary_x: None,
            release_landmark_x: None,
            initial_position: [0.0, 0.0, 10.0],
        }
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.lens.validate()?;
        unit_interval("follow_threshold", self.follow_threshold)?;
        unit_interval("release_threshold", self.release_threshold)?;
        non_negative("transition_duration", self.transition_duration)?;
        non_negative("follow_speed", self.follow_speed)?;
        Ok(())
    }
}

/// A money milestone placed along the route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MilestoneConfig {
    pub name: String,
    pub x: f32,
    pub activation_distance: f32,
    /// Node revealed on activation.
    pub reveal_node: Option<String>,
    /// Amount added by this milestone.
    pub target_value: f32,
    /// Packshot label start value.
    pub start_value: f32,
    pub count_duration: f32,
    /// Sprite dropped into place on activation.
    pub drop_node: Option<String>,
    /// Vertical offset from the sprite's spawn height to its resting height.
    pub drop_offset_y: f32,
    pub drop_duration: f32,
    pub sound: Option<String>,
    pub sound_delay: f32,
}

impl Default for MilestoneConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            x: 0.0,
            activation_distance: 0.5,
            reveal_node: None,
            target_value: 0.0,
            start_value: 0.0,
            count_duration: 1.0,
            drop_node: None,
            drop_offset_y: -1.0,
            drop_duration: 0.3,
            sound: None,
            sound_delay: 0.0,
        }
    }
}

impl MilestoneConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("activation_distance", self.activation_distance)?;
        non_negative("count_duration", self.count_duration)?;
        non_negative("drop_duration", self.drop_duration)?;
        non_negative("sound_delay", self.sound_delay)?;
        Ok(())
    }
}

/// A node that is hidden at activation and shown after `delay` seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledReveal {
    pub node: String,
    pub delay: f32,
}

/// Which orientation a layout node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    Portrait,
    Landscape,
}

/// An auxiliary scene node that can be shown and hidden by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNodeConfig {
    pub name: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub position: [f32; 3],
    /// Orientation-specific layout this node belongs to.
    #[serde(default)]
    pub layout: Option<LayoutKind>,
}

fn default_true() -> bool {
    true
}

/// Complete level description.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HopperConfig {
    pub jump: JumpConfig,
    pub camera: CameraConfig,
    pub milestones: Vec<MilestoneConfig>,
    /// Clip looped on the character until the first jump lands.
    pub idle_clip: Option<String>,
    pub scheduled_reveals: Vec<ScheduledReveal>,
    /// Clip names the character can play. Empty disables clip resolution.
    pub clips: Vec<String>,
    pub nodes: Vec<SceneNodeConfig>,
    /// Initial character position. Defaults to the origin.
    pub character_start: [f32; 3],
}

impl HopperConfig {
    /// Loads a level configuration from JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the level configuration to JSON string.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validates every section of the level.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.jump.validate(&self.clips)?;
        self.camera.validate()?;
        for milestone in &self.milestones {
            milestone.validate()?;
        }
        for reveal in &self.scheduled_reveals {
            non_negative("scheduled_reveals.delay", reveal.delay)?;
        }
        if let Some(idle) = &self.idle_clip {
            resolve_clip(idle, &self.clips)?;
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveDuration { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NegativeValue { field, value })
    }
}

fn unit_interval(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ThresholdOutOfRange { field, value })
    }
}

fn resolve_clip(name: &str, clips: &[String]) -> Result<(), ConfigError> {
    if clips.is_empty() || clips.iter().any(|c| c == name) {
        Ok(())
    } else {
        Err(ConfigError::UnknownClip(name.to_string()))
    }
}
