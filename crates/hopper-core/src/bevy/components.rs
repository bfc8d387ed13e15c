//! ECS Components for hopper.
//!
//! Gameplay state lives in the plain logic types; these components attach
//! them to scene entities.

use bevy::prelude::*;

use crate::camera::CameraTracker;
use crate::config::{ClipRef, LayoutKind};
use crate::counter::AnimatedValue;
use crate::jump::JumpSequencer;
use crate::milestone::Milestone;
use crate::tween::Tween;

/// Marker for everything spawned by a level; despawned on reload.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct LevelEntity;

/// Marker for the hopping character.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Character;

/// Drives the character through its waypoints.
#[derive(Component, Debug, Clone)]
pub struct Jumper {
    pub sequencer: JumpSequencer,
}

/// Marker component for the main camera.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct MainCamera;

/// Adaptive horizontal tracking of the character.
#[derive(Component, Debug, Clone)]
pub struct TrackingCamera {
    pub tracker: CameraTracker,
}

/// The camera may never show anything left of this entity's X.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct LeftBoundary;

/// Tracking stops once this entity reaches the release threshold on screen.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ReleaseLandmark;

/// Auxiliary scene node addressed by name.
#[derive(Component, Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub visible: bool,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, visible: bool) -> Self {
        Self {
            name: name.into(),
            visible,
        }
    }
}

/// Node shown only in the given orientation.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientationLayout(pub LayoutKind);

/// Named clip playback on an entity.
#[derive(Component, Debug, Clone, Default)]
pub struct ClipPlayer {
    /// Clips this entity can play. Empty accepts any name.
    pub clips: Vec<String>,
    pub playing: Option<ClipRef>,
}

impl ClipPlayer {
    pub fn new(clips: Vec<String>) -> Self {
        Self {
            clips,
            playing: None,
        }
    }

    pub fn has_clip(&self, name: &str) -> bool {
        self.clips.is_empty() || self.clips.iter().any(|c| c == name)
    }

    /// Starts `clip`, replacing the current one. Unknown clips are ignored.
    pub fn play(&mut self, clip: &ClipRef) -> bool {
        if !self.has_clip(&clip.name) {
            tracing::warn!("[scene] Unknown clip '{}', ignoring", clip.name);
            return false;
        }
        self.playing = Some(clip.clone());
        true
    }

    pub fn stop(&mut self) {
        self.playing = None;
    }

    pub fn is_playing(&self, name: &str) -> bool {
        self.playing.as_ref().is_some_and(|c| c.name == name)
    }
}

/// Loops a clip on the character until its first jump lands.
#[derive(Component, Debug, Clone)]
pub struct IdleLoop {
    pub clip: String,
    pub stopped: bool,
}

/// A rendered number that ramps toward its target.
#[derive(Component, Debug, Clone)]
pub struct ValueLabel {
    pub value: AnimatedValue,
}

/// Marker for the money label shared by all milestones.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct MoneyLabel;

/// Packshot label owned by one milestone.
#[derive(Component, Debug, Clone)]
pub struct PackshotLabel {
    pub milestone: String,
}

#[derive(Component, Debug, Clone)]
pub struct MilestoneMarker {
    pub milestone: Milestone,
}

/// Moves an entity's translation along a tween; removed when finished.
#[derive(Component, Debug, Clone, Copy)]
pub struct TranslationTween(pub Tween<Vec3>);
