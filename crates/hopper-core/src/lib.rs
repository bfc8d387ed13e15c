//! Hopper Core Library
//!
//! Waypoint jump sequencing and adaptive camera tracking for a 2D hopping
//! presentation.
//!
//! The library is split in two layers:
//! - Plain logic types (`JumpSequencer`, `CameraTracker`, `OffsetCoordinator`,
//!   `AnimatedValue`, `Milestone`) advanced with an explicit `tick`/`update`
//! - Bevy integration that schedules them every fixed frame and maps their
//!   effects onto scene entities

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod camera;
pub mod config;
pub mod counter;
pub mod jump;
pub mod milestone;
pub mod offset;
pub mod timer;
pub mod tween;

// Bevy integration
pub mod bevy;

pub use camera::{
    CameraLens, CameraTracker, Orientation, TrackingFrame, TrackingOutcome, ViewportSize,
};
pub use config::{
    CameraConfig, CelebrationConfig, ClipRef, ConfigError, HopperConfig, JumpConfig, LayoutKind,
    MilestoneConfig, SceneNodeConfig, ScheduledReveal,
};
pub use counter::AnimatedValue;
pub use jump::{JumpEffect, JumpPhase, JumpSequencer};
pub use milestone::{Milestone, MilestoneEffect};
pub use offset::OffsetCoordinator;
pub use timer::{DeferredTimers, TimerHandle};
pub use tween::{EasingType, Interpolate, Tween};

/// Fixed simulation step (60 Hz).
pub const FRAME_DT: f32 = 1.0 / 60.0;
