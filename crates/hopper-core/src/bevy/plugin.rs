//! Bevy plugins for hopper.
//!
//! Provides:
//! - `HopperHeadlessPlugin`: Logic-only plugin (no rendering/window dependencies) for headless testing
//! - `HopperPlugin`: Full plugin including `HopperHeadlessPlugin` + window and visibility sync

use bevy::prelude::*;

use crate::FRAME_DT;
use crate::bevy::events::{
    CelebrationEvent, JumpLandedEvent, JumpRequestEvent, LevelLoadedEvent, LoadLevelEvent,
    MilestoneReachedEvent, OrientationChangedEvent, PlaySoundEvent, SequenceCompleteEvent,
    SetNodeVisibilityEvent, TriggerCelebrationEvent,
};
use crate::bevy::resources::{
    CommandQueue, JumpControls, LevelState, ScheduledReveals, TraversalReport, Viewport,
};
use crate::bevy::systems;

// ============================================================================
// Headless Plugin (logic only, no rendering/window dependencies)
// ============================================================================

/// Headless plugin containing all level logic without rendering or window dependencies.
///
/// Use this plugin in tests with `MinimalPlugins` to run ECS systems
/// without requiring a windowing or rendering backend. The viewport is
/// driven through `HopperCommand::ResizeViewport`.
#[derive(Default)]
pub struct HopperHeadlessPlugin {
    pub command_queue: Option<CommandQueue>,
}

impl HopperHeadlessPlugin {
    pub fn new(command_queue: CommandQueue) -> Self {
        Self {
            command_queue: Some(command_queue),
        }
    }
}

impl Plugin for HopperHeadlessPlugin {
    fn build(&self, app: &mut App) {
        // ====================================================================
        // Timing
        // ====================================================================
        app.insert_resource(Time::<Fixed>::from_seconds(f64::from(FRAME_DT)));

        // ====================================================================
        // Resources
        // ====================================================================
        app.insert_resource(Viewport::default())
            .insert_resource(LevelState::default())
            .insert_resource(JumpControls::default())
            .insert_resource(ScheduledReveals::default())
            .insert_resource(TraversalReport::default())
            .insert_resource(self.command_queue.clone().unwrap_or_default());

        // ====================================================================
        // Messages
        // ====================================================================

        // Host requests
        app.add_message::<LoadLevelEvent>()
            .add_message::<LevelLoadedEvent>()
            .add_message::<JumpRequestEvent>()
            .add_message::<TriggerCelebrationEvent>();

        // Traversal lifecycle
        app.add_message::<JumpLandedEvent>()
            .add_message::<SequenceCompleteEvent>()
            .add_message::<CelebrationEvent>()
            .add_message::<MilestoneReachedEvent>()
            .add_message::<OrientationChangedEvent>();

        // Scene
        app.add_message::<PlaySoundEvent>()
            .add_message::<SetNodeVisibilityEvent>();

        // ====================================================================
        // Startup
        // ====================================================================
        app.add_systems(Startup, systems::spawn_money_label);

        // ====================================================================
        // Command processing and level loading (Update)
        // ====================================================================
        app.add_systems(
            Update,
            (systems::process_commands, systems::handle_load_level).chain(),
        );

        // ====================================================================
        // Traversal (FixedUpdate)
        // ====================================================================

        // Jump motion first so the camera frames this step's position
        app.add_systems(
            FixedUpdate,
            (
                systems::handle_jump_requests,
                systems::handle_celebration_triggers,
                systems::tick_jumpers,
                systems::apply_jump_effects,
                systems::update_tracking_camera,
            )
                .chain(),
        );

        // Scene reactions
        app.add_systems(
            FixedUpdate,
            (
                systems::update_milestones,
                systems::tick_value_labels,
                systems::animate_translation_tweens,
                systems::tick_scheduled_reveals,
                systems::detect_orientation,
                systems::apply_orientation_layout,
                systems::apply_node_visibility,
                systems::stop_idle_loop,
                systems::lock_controls_on_completion,
            )
                .chain()
                .after(systems::update_tracking_camera),
        );

        // ====================================================================
        // Report sync (PostUpdate)
        // ====================================================================
        app.add_systems(PostUpdate, systems::record_traversal);
    }
}

// ============================================================================
// Windowed Plugin (headless + window sync)
// ============================================================================

/// Plugin for windowed hosts.
///
/// Includes `HopperHeadlessPlugin` for all level logic, plus systems that
/// read the primary window size and mirror scene node visibility.
#[cfg(feature = "windowed")]
#[derive(Default)]
pub struct HopperPlugin {
    pub command_queue: Option<CommandQueue>,
}

#[cfg(feature = "windowed")]
impl Plugin for HopperPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(HopperHeadlessPlugin {
            command_queue: self.command_queue.clone(),
        });

        app.add_systems(
            PreUpdate,
            (systems::sync_viewport_from_window, attach_render_components),
        );
        app.add_systems(PostUpdate, systems::sync_node_visibility);
    }
}

/// Gives freshly spawned level entities the components the renderer needs.
#[cfg(feature = "windowed")]
fn attach_render_components(
    mut commands: Commands,
    cameras: Query<Entity, (Added<crate::bevy::MainCamera>, Without<Camera>)>,
    nodes: Query<Entity, (Added<crate::bevy::SceneNode>, Without<Visibility>)>,
) {
    for entity in &cameras {
        commands.entity(entity).insert(Camera2d);
    }
    for entity in &nodes {
        commands.entity(entity).insert(Visibility::default());
    }
}
