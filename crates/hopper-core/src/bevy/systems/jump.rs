//! Jump sequencing systems.
//!
//! Runs in `FixedUpdate` before the camera so the tracker sees this frame's
//! character position.

use bevy::prelude::*;

use crate::bevy::{
    CelebrationEvent, Character, ClipPlayer, JumpControls, JumpLandedEvent, JumpRequestEvent,
    JumpTarget, Jumper, PlaySoundEvent, SequenceCompleteEvent, SetNodeVisibilityEvent,
    TriggerCelebrationEvent,
};
use crate::jump::JumpEffect;

/// System to start jumps from queued requests.
///
/// Requests are dropped while the controls are locked; the sequencer itself
/// ignores requests made mid-jump.
pub fn handle_jump_requests(
    mut requests: MessageReader<JumpRequestEvent>,
    controls: Res<JumpControls>,
    mut jumpers: Query<(&mut Jumper, &Transform), With<Character>>,
) {
    for request in requests.read() {
        if !controls.enabled {
            tracing::debug!("[jump] Controls locked, ignoring {:?}", request.target);
            continue;
        }
        for (mut jumper, transform) in &mut jumpers {
            let from = transform.translation;
            match request.target {
                JumpTarget::Next => jumper.sequencer.jump_to_next(from),
                JumpTarget::Index(index) => jumper.sequencer.jump_to_index(index, from),
            };
        }
    }
}

/// System to fire the celebration on demand.
pub fn handle_celebration_triggers(
    mut triggers: MessageReader<TriggerCelebrationEvent>,
    mut jumpers: Query<&mut Jumper>,
) {
    for _ in triggers.read() {
        for mut jumper in &mut jumpers {
            jumper.sequencer.trigger_celebration();
        }
    }
}

/// System to advance jump motion and write the character transform.
pub fn tick_jumpers(time: Res<Time>, mut jumpers: Query<(&mut Jumper, &mut Transform)>) {
    let dt = time.delta_secs();
    for (mut jumper, mut transform) in &mut jumpers {
        let mut position = transform.translation;
        jumper.sequencer.tick(dt, &mut position);
        if position != transform.translation {
            transform.translation = position;
        }
    }
}

/// System to map sequencer effects onto clips, sounds, nodes and messages.
pub fn apply_jump_effects(
    mut jumpers: Query<(&mut Jumper, Option<&mut ClipPlayer>)>,
    mut landed: MessageWriter<JumpLandedEvent>,
    mut complete: MessageWriter<SequenceCompleteEvent>,
    mut celebration: MessageWriter<CelebrationEvent>,
    mut sounds: MessageWriter<PlaySoundEvent>,
    mut visibility: MessageWriter<SetNodeVisibilityEvent>,
) {
    for (mut jumper, mut player) in &mut jumpers {
        for effect in jumper.sequencer.drain_effects() {
            match effect {
                JumpEffect::PlayClip(clip) => {
                    if let Some(player) = player.as_mut() {
                        player.play(&clip);
                    }
                }
                JumpEffect::StopClip => {
                    if let Some(player) = player.as_mut() {
                        player.stop();
                    }
                }
                JumpEffect::PlaySound(name) => {
                    sounds.write(PlaySoundEvent { name });
                }
                JumpEffect::ShowNode(name) => {
                    visibility.write(SetNodeVisibilityEvent {
                        name,
                        visible: true,
                    });
                }
                JumpEffect::Landed { index } => {
                    landed.write(JumpLandedEvent { index });
                }
                JumpEffect::SequenceComplete { final_index } => {
                    complete.write(SequenceCompleteEvent { final_index });
                }
                JumpEffect::CelebrationTriggered => {
                    celebration.write(CelebrationEvent);
                }
            }
        }
    }
}
