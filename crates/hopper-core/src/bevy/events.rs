//! ECS Events (Messages) for hopper.
//!
//! These events enable communication between systems.
//! Note: In Bevy 0.18+, buffered events use Message trait instead of Event.

use bevy::prelude::*;

use crate::camera::Orientation;
use crate::config::HopperConfig;

/// Message to request loading a level.
#[derive(Message, Debug, Clone)]
pub struct LoadLevelEvent {
    /// The level configuration to load.
    pub config: HopperConfig,
}

/// Message fired once a level has been spawned.
#[derive(Message, Debug, Clone)]
pub struct LevelLoadedEvent {
    pub waypoints: usize,
    /// False when the jump configuration was rejected.
    pub jumper_active: bool,
    pub tracking_active: bool,
}

/// Which waypoint a jump request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpTarget {
    Next,
    Index(usize),
}

/// Message to request a jump (e.g. from a tap on the jump button).
#[derive(Message, Debug, Clone, Copy)]
pub struct JumpRequestEvent {
    pub target: JumpTarget,
}

/// Message to fire the terminal celebration immediately.
#[derive(Message, Debug, Clone, Default)]
pub struct TriggerCelebrationEvent;

/// Message fired when the character settles on a waypoint.
#[derive(Message, Debug, Clone)]
pub struct JumpLandedEvent {
    pub index: usize,
}

/// Message fired once per traversal when the final waypoint is reached.
#[derive(Message, Debug, Clone)]
pub struct SequenceCompleteEvent {
    pub final_index: usize,
}

/// Message fired when the terminal celebration plays.
#[derive(Message, Debug, Clone, Default)]
pub struct CelebrationEvent;

/// Message to play a one-shot sound.
#[derive(Message, Debug, Clone)]
pub struct PlaySoundEvent {
    pub name: String,
}

/// Message to show or hide a named scene node.
#[derive(Message, Debug, Clone)]
pub struct SetNodeVisibilityEvent {
    pub name: String,
    pub visible: bool,
}

/// Message fired when the viewport switches between portrait and landscape.
#[derive(Message, Debug, Clone)]
pub struct OrientationChangedEvent {
    pub orientation: Orientation,
}

/// Message fired when a milestone activates.
#[derive(Message, Debug, Clone)]
pub struct MilestoneReachedEvent {
    pub name: String,
}
