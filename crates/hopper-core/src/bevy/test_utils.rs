//! Test utilities for headless Bevy integration tests.
//!
//! Provides `TestApp`, a wrapper around `bevy::app::App` that uses
//! `MinimalPlugins` + `HopperHeadlessPlugin` for testing level logic
//! without a rendering or windowing backend.

use bevy::prelude::*;

use crate::bevy::plugin::HopperHeadlessPlugin;
use crate::bevy::{
    Character, ClipPlayer, CommandQueue, HopperCommand, JumpControls, Jumper, MainCamera,
    MoneyLabel, PackshotLabel, SceneNode, TrackingCamera, TraversalReport, ValueLabel,
};
use crate::config::HopperConfig;

/// A headless Bevy app wrapper for testing.
///
/// Provides convenience methods for loading levels, sending commands and
/// advancing the fixed-step simulation.
pub(crate) struct TestApp {
    pub app: App,
}

impl TestApp {
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(HopperHeadlessPlugin::default());
        // Only explicit steps advance the fixed clock
        app.world_mut().resource_mut::<Time<Virtual>>().pause();
        // Run one update to initialize all resources
        app.update();
        Self { app }
    }

    /// Run a single frame update.
    pub fn update(&mut self) {
        self.app.update();
    }

    /// Advance the simulation by exactly `n` fixed timesteps.
    ///
    /// Feeds one fixed timestep into the accumulator per frame, bypassing
    /// virtual time.
    pub fn step(&mut self, n: usize) {
        for _ in 0..n {
            let timestep = self.app.world().resource::<Time<Fixed>>().timestep();
            self.app
                .world_mut()
                .resource_mut::<Time<Fixed>>()
                .accumulate_overstep(timestep);
            self.app.update();
        }
    }

    /// Push a command to the command queue.
    pub fn push_command(&mut self, cmd: HopperCommand) {
        self.app.world().resource::<CommandQueue>().push(cmd);
    }

    /// Load a level and run an update so it is spawned.
    pub fn load_level(&mut self, config: HopperConfig) {
        self.push_command(HopperCommand::LoadLevel { config });
        self.update();
    }

    /// Request a jump to the next waypoint.
    ///
    /// The request is processed in `Update`, the jump starts on the following
    /// fixed step.
    pub fn jump_next(&mut self) {
        self.push_command(HopperCommand::JumpNext);
        self.step(1);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.push_command(HopperCommand::ResizeViewport { width, height });
        self.update();
    }

    pub fn character_translation(&mut self) -> Option<Vec3> {
        let world = self.app.world_mut();
        let mut query = world.query_filtered::<&Transform, With<Character>>();
        query.iter(world).next().map(|t| t.translation)
    }

    pub fn camera_translation(&mut self) -> Option<Vec3> {
        let world = self.app.world_mut();
        let mut query = world.query_filtered::<&Transform, With<MainCamera>>();
        query.iter(world).next().map(|t| t.translation)
    }

    pub fn jumper(&mut self) -> Option<Jumper> {
        let world = self.app.world_mut();
        let mut query = world.query::<&Jumper>();
        query.iter(world).next().cloned()
    }

    pub fn tracking_camera(&mut self) -> Option<TrackingCamera> {
        let world = self.app.world_mut();
        let mut query = world.query::<&TrackingCamera>();
        query.iter(world).next().cloned()
    }

    pub fn clip_player(&mut self) -> Option<ClipPlayer> {
        let world = self.app.world_mut();
        let mut query = world.query_filtered::<&ClipPlayer, With<Character>>();
        query.iter(world).next().cloned()
    }

    pub fn node_visible(&mut self, name: &str) -> Option<bool> {
        let world = self.app.world_mut();
        let mut query = world.query::<&SceneNode>();
        query
            .iter(world)
            .find(|node| node.name == name)
            .map(|node| node.visible)
    }

    pub fn node_translation(&mut self, name: &str) -> Option<Vec3> {
        let world = self.app.world_mut();
        let mut query = world.query::<(&SceneNode, &Transform)>();
        query
            .iter(world)
            .find(|(node, _)| node.name == name)
            .map(|(_, t)| t.translation)
    }

    pub fn money_text(&mut self) -> Option<String> {
        let world = self.app.world_mut();
        let mut query = world.query_filtered::<&ValueLabel, With<MoneyLabel>>();
        query.iter(world).next().map(|l| l.value.text().to_string())
    }

    pub fn packshot_text(&mut self, milestone: &str) -> Option<String> {
        let world = self.app.world_mut();
        let mut query = world.query::<(&PackshotLabel, &ValueLabel)>();
        query
            .iter(world)
            .find(|(p, _)| p.milestone == milestone)
            .map(|(_, l)| l.value.text().to_string())
    }

    pub fn report(&self) -> TraversalReport {
        self.app.world().resource::<TraversalReport>().clone()
    }

    pub fn controls_enabled(&self) -> bool {
        self.app.world().resource::<JumpControls>().enabled
    }
}
