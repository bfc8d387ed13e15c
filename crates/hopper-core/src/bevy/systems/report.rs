//! Traversal report sync.

use bevy::prelude::*;

use crate::bevy::{
    CelebrationEvent, JumpLandedEvent, MilestoneReachedEvent, OrientationChangedEvent,
    PlaySoundEvent, SequenceCompleteEvent, TraversalReport,
};

/// System to record lifecycle messages into the `TraversalReport` resource.
#[allow(clippy::too_many_arguments)]
pub fn record_traversal(
    mut report: ResMut<TraversalReport>,
    mut landed: MessageReader<JumpLandedEvent>,
    mut complete: MessageReader<SequenceCompleteEvent>,
    mut celebrations: MessageReader<CelebrationEvent>,
    mut sounds: MessageReader<PlaySoundEvent>,
    mut milestones: MessageReader<MilestoneReachedEvent>,
    mut orientations: MessageReader<OrientationChangedEvent>,
) {
    for event in landed.read() {
        report.landed.push(event.index);
    }
    for event in complete.read() {
        report.completions += 1;
        tracing::info!("[report] Sequence complete at waypoint {}", event.final_index);
    }
    for _ in celebrations.read() {
        report.celebrations += 1;
    }
    for event in sounds.read() {
        tracing::debug!("[report] Sound: {}", event.name);
        report.sounds.push(event.name.clone());
    }
    for event in milestones.read() {
        report.milestones.push(event.name.clone());
    }
    for event in orientations.read() {
        report.orientation_changes.push(event.orientation);
    }
}
