//! Camera tracking systems.

use bevy::prelude::*;

use crate::bevy::{
    Character, Jumper, LeftBoundary, MainCamera, ReleaseLandmark, TrackingCamera, Viewport,
};
use crate::camera::TrackingFrame;

/// System to reframe the main camera around the character.
///
/// Must run after `tick_jumpers` in the same fixed step.
pub fn update_tracking_camera(
    time: Res<Time>,
    viewport: Res<Viewport>,
    characters: Query<(&Transform, Option<&Jumper>), (With<Character>, Without<MainCamera>)>,
    mut cameras: Query<(&mut TrackingCamera, &mut Transform), With<MainCamera>>,
    boundaries: Query<&Transform, (With<LeftBoundary>, Without<MainCamera>)>,
    landmarks: Query<&Transform, (With<ReleaseLandmark>, Without<MainCamera>)>,
) {
    let Ok((character, jumper)) = characters.single() else {
        return;
    };
    let has_jumped_once = jumper.is_some_and(|j| j.sequencer.has_jumped_once());
    let left_boundary = boundaries.iter().next().map(|t| t.translation.x);
    let release_landmark = landmarks.iter().next().map(|t| t.translation.x);

    for (mut camera, mut transform) in &mut cameras {
        let frame = TrackingFrame {
            dt: time.delta_secs(),
            viewport: viewport.0,
            camera: transform.translation,
            target: character.translation,
            release_landmark,
            left_boundary,
            has_jumped_once,
        };
        let outcome = camera.tracker.update(&frame);

        if outcome.position != transform.translation {
            transform.translation = outcome.position;
        }
    }
}

/// System to copy the primary window size into the `Viewport` resource.
#[cfg(feature = "windowed")]
pub fn sync_viewport_from_window(
    windows: Query<&Window, With<bevy::window::PrimaryWindow>>,
    mut viewport: ResMut<Viewport>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let size = crate::camera::ViewportSize::new(window.width(), window.height());
    if viewport.0 != size {
        viewport.0 = size;
    }
}
