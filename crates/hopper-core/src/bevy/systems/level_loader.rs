//! Level loading systems.
//!
//! Handles spawning a level's character, camera, landmarks, milestones and
//! auxiliary nodes into the ECS world.

use bevy::prelude::*;

use crate::bevy::{
    Character, ClipPlayer, IdleLoop, JumpControls, Jumper, LeftBoundary, LevelEntity,
    LevelLoadedEvent, LevelState, LoadLevelEvent, MainCamera, MilestoneMarker, MoneyLabel,
    OrientationLayout, PackshotLabel, ReleaseLandmark, SceneNode, ScheduledReveals,
    TrackingCamera, TraversalReport, ValueLabel,
};
use crate::camera::CameraTracker;
use crate::config::{ClipRef, HopperConfig};
use crate::counter::AnimatedValue;
use crate::jump::JumpSequencer;
use crate::milestone::Milestone;

/// Spawns the HUD money label shared by every level.
pub fn spawn_money_label(mut commands: Commands) {
    commands.spawn((
        MoneyLabel,
        ValueLabel {
            value: AnimatedValue::money(0.0),
        },
    ));
}

/// System to handle level loading requests.
#[allow(clippy::too_many_arguments)]
pub fn handle_load_level(
    mut commands: Commands,
    mut events: MessageReader<LoadLevelEvent>,
    mut loaded: MessageWriter<LevelLoadedEvent>,
    existing: Query<Entity, With<LevelEntity>>,
    mut money_labels: Query<&mut ValueLabel, With<MoneyLabel>>,
    mut level_state: ResMut<LevelState>,
    mut controls: ResMut<JumpControls>,
    mut reveals: ResMut<ScheduledReveals>,
    mut report: ResMut<TraversalReport>,
) {
    for event in events.read() {
        // Clear the previous level
        for entity in existing.iter() {
            commands.entity(entity).despawn();
        }
        level_state.reset();
        controls.enabled = true;
        reveals.timers.cancel_all();
        report.clear();

        let config = &event.config;

        spawn_nodes(&mut commands, config, &mut reveals);
        let jumper_active = spawn_character(&mut commands, config);
        let tracking_active = spawn_camera(&mut commands, config);

        if let Some(x) = config.camera.left_boundary_x {
            commands.spawn((
                LeftBoundary,
                LevelEntity,
                Transform::from_xyz(x, 0.0, 0.0),
            ));
        }
        if let Some(x) = config.camera.release_landmark_x {
            commands.spawn((
                ReleaseLandmark,
                LevelEntity,
                Transform::from_xyz(x, 0.0, 0.0),
            ));
        }

        for milestone in &config.milestones {
            if let Err(e) = milestone.validate() {
                tracing::warn!("[milestone] '{}' disabled: {}", milestone.name, e);
                continue;
            }
            commands.spawn((
                MilestoneMarker {
                    milestone: Milestone::new(milestone.clone()),
                },
                LevelEntity,
                Transform::from_xyz(milestone.x, 0.0, 0.0),
            ));

            let mut packshot = AnimatedValue::money(0.0);
            packshot.set_value(milestone.start_value);
            commands.spawn((
                PackshotLabel {
                    milestone: milestone.name.clone(),
                },
                ValueLabel { value: packshot },
                LevelEntity,
            ));

            // Every milestone asks; only the first one of the level resets the shared label
            if level_state.claim_label_reset() {
                for mut label in &mut money_labels {
                    label.value.set_value(0.0);
                }
                tracing::debug!("[milestone] Money label reset");
            }
        }

        tracing::info!(
            "[level] Loaded level: {} waypoints, {} milestones (jumper={}, tracking={})",
            config.jump.waypoints.len(),
            config.milestones.len(),
            jumper_active,
            tracking_active
        );
        loaded.write(LevelLoadedEvent {
            waypoints: config.jump.waypoints.len(),
            jumper_active,
            tracking_active,
        });
    }
}

fn spawn_nodes(commands: &mut Commands, config: &HopperConfig, reveals: &mut ScheduledReveals) {
    for node in &config.nodes {
        let delayed = config.scheduled_reveals.iter().any(|r| r.node == node.name);
        let mut entity = commands.spawn((
            // Scheduled nodes start hidden regardless of their configured state
            SceneNode::new(node.name.clone(), node.visible && !delayed),
            LevelEntity,
            Transform::from_translation(Vec3::from_array(node.position)),
        ));
        if let Some(layout) = node.layout {
            entity.insert(OrientationLayout(layout));
        }
    }

    for reveal in &config.scheduled_reveals {
        reveals.timers.schedule(reveal.delay, reveal.node.clone());
        tracing::debug!(
            "[scene] '{}' revealed in {:.2}s",
            reveal.node,
            reveal.delay
        );
    }
}

/// Returns true when the jump sequencer was activated.
fn spawn_character(commands: &mut Commands, config: &HopperConfig) -> bool {
    let mut player = ClipPlayer::new(config.clips.clone());
    let mut idle_loop = None;

    if let Some(clip) = &config.idle_clip {
        if player.play(&ClipRef::looping(clip.clone())) {
            idle_loop = Some(IdleLoop {
                clip: clip.clone(),
                stopped: false,
            });
        } else {
            tracing::warn!("[scene] Idle clip '{}' not available, idle loop disabled", clip);
        }
    }

    let mut character = commands.spawn((
        Character,
        LevelEntity,
        Transform::from_translation(Vec3::from_array(config.character_start)),
        player,
    ));
    if let Some(idle_loop) = idle_loop {
        character.insert(idle_loop);
    }

    match JumpSequencer::new(config.jump.clone(), &config.clips) {
        Ok(sequencer) => {
            character.insert(Jumper { sequencer });
            true
        }
        Err(e) => {
            tracing::warn!("[jump] Jumper disabled: {}", e);
            false
        }
    }
}

/// Returns true when the camera tracker was activated.
fn spawn_camera(commands: &mut Commands, config: &HopperConfig) -> bool {
    let initial = Vec3::from_array(config.camera.initial_position);
    let mut camera = commands.spawn((MainCamera, LevelEntity, Transform::from_translation(initial)));

    match config.camera.validate() {
        Ok(()) => {
            camera.insert(TrackingCamera {
                tracker: CameraTracker::new(config.camera.clone(), initial),
            });
            true
        }
        Err(e) => {
            tracing::warn!("[camera] Tracking disabled: {}", e);
            false
        }
    }
}
