//! Scene node systems: visibility, orientation layouts, delayed reveals,
//! translation tweens and label ramps.

use bevy::prelude::*;

use crate::bevy::{
    LevelLoadedEvent, OrientationChangedEvent, OrientationLayout, SceneNode, ScheduledReveals,
    SetNodeVisibilityEvent, TranslationTween, ValueLabel, Viewport,
};
use crate::camera::Orientation;
use crate::config::LayoutKind;

/// System to fire delayed reveals.
pub fn tick_scheduled_reveals(
    time: Res<Time>,
    mut reveals: ResMut<ScheduledReveals>,
    mut visibility: MessageWriter<SetNodeVisibilityEvent>,
) {
    if reveals.timers.is_empty() {
        return;
    }
    for name in reveals.timers.tick(time.delta_secs()) {
        tracing::info!("[scene] Scheduled reveal: {}", name);
        visibility.write(SetNodeVisibilityEvent {
            name,
            visible: true,
        });
    }
}

/// System to announce viewport orientation changes.
///
/// Independent of camera tracking so layouts switch even without a tracker.
/// A freshly loaded level always gets the current orientation announced.
pub fn detect_orientation(
    viewport: Res<Viewport>,
    mut loaded: MessageReader<LevelLoadedEvent>,
    mut last: Local<Option<Orientation>>,
    mut events: MessageWriter<OrientationChangedEvent>,
) {
    if loaded.read().count() > 0 {
        *last = None;
    }
    if viewport.0.is_degenerate() {
        return;
    }
    let orientation = viewport.0.orientation();
    if *last != Some(orientation) {
        *last = Some(orientation);
        tracing::info!("[scene] Orientation: {:?}", orientation);
        events.write(OrientationChangedEvent { orientation });
    }
}

/// System to show the layout matching the new orientation and hide the other.
pub fn apply_orientation_layout(
    mut events: MessageReader<OrientationChangedEvent>,
    mut nodes: Query<(&mut SceneNode, &OrientationLayout)>,
) {
    let Some(event) = events.read().last() else {
        return;
    };
    let active = match event.orientation {
        Orientation::Portrait => LayoutKind::Portrait,
        Orientation::Landscape => LayoutKind::Landscape,
    };
    for (mut node, layout) in &mut nodes {
        node.visible = layout.0 == active;
    }
}

/// System to apply show/hide requests by node name.
pub fn apply_node_visibility(
    mut events: MessageReader<SetNodeVisibilityEvent>,
    mut nodes: Query<&mut SceneNode>,
) {
    for event in events.read() {
        let mut found = false;
        for mut node in &mut nodes {
            if node.name == event.name {
                node.visible = event.visible;
                found = true;
            }
        }
        if !found {
            tracing::debug!("[scene] No node named '{}'", event.name);
        }
    }
}

/// System to advance translation tweens, removing them when finished.
pub fn animate_translation_tweens(
    mut commands: Commands,
    time: Res<Time>,
    mut tweens: Query<(Entity, &mut TranslationTween, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (entity, mut tween, mut transform) in &mut tweens {
        let finished = tween.0.advance(dt).is_some();
        transform.translation = tween.0.value();
        if finished {
            commands.entity(entity).remove::<TranslationTween>();
        }
    }
}

/// System to advance label ramps.
pub fn tick_value_labels(time: Res<Time>, mut labels: Query<&mut ValueLabel>) {
    let dt = time.delta_secs();
    for mut label in &mut labels {
        if !label.value.is_animating() {
            continue;
        }
        if let Some(text) = label.value.tick(dt) {
            tracing::trace!("[scene] Label: {}", text);
        }
    }
}

/// System to mirror node visibility onto rendered entities.
#[cfg(feature = "windowed")]
pub fn sync_node_visibility(mut nodes: Query<(&SceneNode, &mut Visibility), Changed<SceneNode>>) {
    for (node, mut visibility) in &mut nodes {
        *visibility = if node.visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}
