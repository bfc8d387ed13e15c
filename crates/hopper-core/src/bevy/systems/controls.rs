//! Player control and idle animation systems.

use bevy::prelude::*;

use crate::bevy::{ClipPlayer, IdleLoop, JumpControls, Jumper, SequenceCompleteEvent};

/// System to lock the jump controls once the traversal completes.
pub fn lock_controls_on_completion(
    mut events: MessageReader<SequenceCompleteEvent>,
    mut controls: ResMut<JumpControls>,
) {
    for event in events.read() {
        if controls.enabled {
            controls.enabled = false;
            tracing::info!(
                "[controls] Locked after final waypoint {}",
                event.final_index
            );
        }
    }
}

/// System to stop the idle loop once the first jump has landed.
pub fn stop_idle_loop(mut characters: Query<(&Jumper, &mut IdleLoop, &mut ClipPlayer)>) {
    for (jumper, mut idle, mut player) in &mut characters {
        if idle.stopped || !jumper.sequencer.has_jumped_once() {
            continue;
        }
        idle.stopped = true;
        // The jump clips may already have replaced the loop
        if player.is_playing(&idle.clip) {
            player.stop();
        }
        tracing::info!("[controls] Idle loop '{}' stopped after first jump", idle.clip);
    }
}
