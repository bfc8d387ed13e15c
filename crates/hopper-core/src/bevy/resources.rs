//! ECS Resources for hopper.
//!
//! These resources hold shared level state and the external command queue.

use std::collections::VecDeque;
use std::sync::Arc;

use bevy::prelude::*;
use parking_lot::Mutex;

use crate::camera::{Orientation, ViewportSize};
use crate::config::HopperConfig;
use crate::timer::DeferredTimers;

/// Current viewport size in pixels.
///
/// Headless apps set it through `HopperCommand::ResizeViewport`; windowed apps
/// sync it from the primary window every frame.
#[derive(Resource, Debug, Clone, Copy)]
pub struct Viewport(pub ViewportSize);

impl Default for Viewport {
    fn default() -> Self {
        Self(ViewportSize::new(720.0, 1280.0))
    }
}

/// Per-level coordination state shared by all level components.
#[derive(Resource, Debug, Default)]
pub struct LevelState {
    labels_reset: bool,
}

impl LevelState {
    /// Returns true exactly once per level: the caller owns the shared label reset.
    pub fn claim_label_reset(&mut self) -> bool {
        !std::mem::replace(&mut self.labels_reset, true)
    }

    pub fn reset(&mut self) {
        self.labels_reset = false;
    }
}

/// Whether jump requests from the player are accepted.
#[derive(Resource, Debug, Clone, Copy)]
pub struct JumpControls {
    pub enabled: bool,
}

impl Default for JumpControls {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Nodes waiting to be revealed after a delay.
#[derive(Resource, Debug, Default)]
pub struct ScheduledReveals {
    pub timers: DeferredTimers<String>,
}

/// Lifecycle record of the current traversal.
#[derive(Resource, Debug, Clone, Default)]
pub struct TraversalReport {
    /// Waypoint indices in landing order.
    pub landed: Vec<usize>,
    pub completions: u32,
    pub celebrations: u32,
    pub sounds: Vec<String>,
    pub milestones: Vec<String>,
    pub orientation_changes: Vec<Orientation>,
}

impl TraversalReport {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Commands that can be sent from outside the ECS.
#[derive(Debug, Clone)]
pub enum HopperCommand {
    /// Load a new level, replacing the current one.
    LoadLevel { config: HopperConfig },
    /// Jump to the next waypoint.
    JumpNext,
    /// Jump to a specific waypoint.
    JumpToIndex { index: usize },
    /// Fire the terminal celebration now.
    TriggerCelebration,
    /// Update the viewport size in pixels.
    ResizeViewport { width: f32, height: f32 },
    /// Frame boundary marker - commands after this are processed in the next frame.
    Yield,
}

/// Thread-safe command queue.
///
/// This allows the host (input handler, sandbox driver) to push commands
/// that will be processed by Bevy systems on the next frame.
#[derive(Resource, Clone)]
pub struct CommandQueue {
    inner: Arc<Mutex<VecDeque<HopperCommand>>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Push a command to be processed.
    pub fn push(&self, command: HopperCommand) {
        self.inner.lock().push_back(command);
    }

    /// Drain commands until Yield or empty.
    ///
    /// Returns commands up to (not including) Yield.
    /// Yield itself is consumed but not returned.
    pub fn drain_until_yield(&self) -> Vec<HopperCommand> {
        let mut guard = self.inner.lock();
        let mut commands = Vec::new();

        while let Some(cmd) = guard.pop_front() {
            if matches!(cmd, HopperCommand::Yield) {
                tracing::debug!("[command] Yield - deferring remaining commands to next frame");
                break;
            }
            commands.push(cmd);
        }
        commands
    }

    /// Check if there are pending commands.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}
