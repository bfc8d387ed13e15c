//! Command processing system.
//!
//! Processes commands pushed by the host into the `CommandQueue`.

use bevy::prelude::*;

use crate::bevy::{
    CommandQueue, HopperCommand, JumpRequestEvent, JumpTarget, LoadLevelEvent,
    TriggerCelebrationEvent, Viewport,
};
use crate::camera::ViewportSize;

/// System to process all commands from the external command queue.
///
/// Handles commands until a Yield is encountered.
/// Commands after Yield are processed in the next frame.
pub fn process_commands(
    command_queue: Res<CommandQueue>,
    mut viewport: ResMut<Viewport>,
    mut load_level_events: MessageWriter<LoadLevelEvent>,
    mut jump_events: MessageWriter<JumpRequestEvent>,
    mut celebration_events: MessageWriter<TriggerCelebrationEvent>,
) {
    for command in command_queue.drain_until_yield() {
        match command {
            HopperCommand::LoadLevel { config } => {
                tracing::info!(
                    "[command] LoadLevel with {} waypoints",
                    config.jump.waypoints.len()
                );
                load_level_events.write(LoadLevelEvent { config });
            }
            HopperCommand::JumpNext => {
                tracing::debug!("[command] JumpNext");
                jump_events.write(JumpRequestEvent {
                    target: JumpTarget::Next,
                });
            }
            HopperCommand::JumpToIndex { index } => {
                tracing::debug!("[command] JumpToIndex: {}", index);
                jump_events.write(JumpRequestEvent {
                    target: JumpTarget::Index(index),
                });
            }
            HopperCommand::TriggerCelebration => {
                tracing::info!("[command] TriggerCelebration");
                celebration_events.write(TriggerCelebrationEvent);
            }
            HopperCommand::ResizeViewport { width, height } => {
                tracing::info!("[command] ResizeViewport: {}x{}", width, height);
                viewport.0 = ViewportSize::new(width, height);
            }
            // Yield is consumed by drain_until_yield(), should not reach here
            HopperCommand::Yield => {}
        }
    }
}
