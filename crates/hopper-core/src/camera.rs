//! Adaptive horizontal camera tracking.
//!
//! The tracker is evaluated once per frame after the character has moved. It
//! arms when the character crosses a screen-space threshold, follows it with an
//! orientation-dependent offset clamped against the left scene boundary, and
//! releases for good (within the current orientation) once a release landmark
//! passes its own threshold. Camera Y and Z never change after construction.

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::{CameraConfig, ConfigError};
use crate::offset::OffsetCoordinator;

/// Viewport size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl ViewportSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Zero, negative or non-finite sizes cannot be projected into.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::from_viewport(*self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Square viewports count as portrait.
    pub fn from_viewport(viewport: ViewportSize) -> Self {
        if viewport.height >= viewport.width {
            Self::Portrait
        } else {
            Self::Landscape
        }
    }

    pub fn is_landscape(self) -> bool {
        self == Self::Landscape
    }
}

/// Projection used to derive the camera's world-space half-width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraLens {
    /// `ortho_height` is half the visible world height.
    Orthographic { ortho_height: f32 },
    /// `distance` is measured from the camera to the scene plane.
    Perspective { fov_degrees: f32, distance: f32 },
}

impl Default for CameraLens {
    fn default() -> Self {
        Self::Orthographic { ortho_height: 5.0 }
    }
}

impl CameraLens {
    /// Half of the visible world width on the scene plane.
    pub fn half_width(&self, viewport: ViewportSize) -> f32 {
        let aspect = viewport.aspect();
        match *self {
            Self::Orthographic { ortho_height } => ortho_height * aspect,
            Self::Perspective {
                fov_degrees,
                distance,
            } => distance * (fov_degrees.to_radians() / 2.0).tan() * aspect,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Self::Orthographic { ortho_height } => {
                if !(ortho_height.is_finite() && ortho_height > 0.0) {
                    return Err(ConfigError::InvalidLens(format!(
                        "ortho_height must be positive, got {ortho_height}"
                    )));
                }
            }
            Self::Perspective {
                fov_degrees,
                distance,
            } => {
                if !(fov_degrees > 0.0 && fov_degrees < 180.0) {
                    return Err(ConfigError::InvalidLens(format!(
                        "fov_degrees must be within (0, 180), got {fov_degrees}"
                    )));
                }
                if !(distance.is_finite() && distance > 0.0) {
                    return Err(ConfigError::InvalidLens(format!(
                        "distance must be positive, got {distance}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Normalized horizontal screen position of `world_x` (0 = left edge, 1 = right edge).
pub fn screen_fraction(world_x: f32, camera_x: f32, half_width: f32) -> f32 {
    0.5 + (world_x - camera_x) / (2.0 * half_width)
}

/// Converts a viewport-pixel offset into world units.
pub fn offset_to_world(offset_px: f32, half_width: f32, viewport_width: f32) -> f32 {
    offset_px * (2.0 * half_width / viewport_width)
}

/// Camera X that keeps `target_x` framed, never showing anything left of `left_boundary`.
pub fn desired_x(target_x: f32, offset_world: f32, half_width: f32, left_boundary: Option<f32>) -> f32 {
    let desired = target_x + offset_world;
    match left_boundary {
        Some(boundary) => desired.max(boundary + half_width),
        None => desired,
    }
}

/// Per-frame inputs read from the scene.
#[derive(Debug, Clone, Copy)]
pub struct TrackingFrame {
    pub dt: f32,
    pub viewport: ViewportSize,
    /// Current camera position.
    pub camera: Vec3,
    /// Tracked character position after this frame's motion.
    pub target: Vec3,
    pub release_landmark: Option<f32>,
    pub left_boundary: Option<f32>,
    pub has_jumped_once: bool,
}

/// Result of one tracker update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingOutcome {
    /// New camera position to write back.
    pub position: Vec3,
    /// Set on the frame the viewport orientation changed (including the first frame).
    pub orientation_changed: Option<Orientation>,
    pub armed: bool,
    pub released: bool,
}

#[derive(Debug, Clone)]
pub struct CameraTracker {
    config: CameraConfig,
    offset: OffsetCoordinator,
    orientation: Option<Orientation>,
    is_actively_tracking: bool,
    released: bool,
    held_position_x: f32,
    fixed_y: f32,
    fixed_z: f32,
}

impl CameraTracker {
    pub fn new(config: CameraConfig, initial_camera: Vec3) -> Self {
        let offset = OffsetCoordinator::new(
            config.portrait_offset_x,
            config.landscape_offset_x,
            config.transition_duration,
        );
        Self {
            config,
            offset,
            orientation: None,
            is_actively_tracking: false,
            released: false,
            held_position_x: initial_camera.x,
            fixed_y: initial_camera.y,
            fixed_z: initial_camera.z,
        }
    }

    /// Computes the camera position for this frame.
    pub fn update(&mut self, frame: &TrackingFrame) -> TrackingOutcome {
        let mut outcome = TrackingOutcome {
            position: frame.camera,
            orientation_changed: None,
            armed: false,
            released: false,
        };

        if frame.viewport.is_degenerate() {
            tracing::debug!(
                "[camera] Skipping frame with degenerate viewport {}x{}",
                frame.viewport.width,
                frame.viewport.height
            );
            outcome.position = Vec3::new(frame.camera.x, self.fixed_y, self.fixed_z);
            return outcome;
        }

        let orientation = frame.viewport.orientation();
        if self.orientation != Some(orientation) {
            self.orientation = Some(orientation);
            self.offset.apply_orientation(orientation, frame.has_jumped_once);
            self.is_actively_tracking = false;
            self.released = false;
            self.held_position_x = frame.camera.x;
            outcome.orientation_changed = Some(orientation);
            tracing::info!(
                "[camera] Orientation {:?} ({}x{}), offset={:.2}",
                orientation,
                frame.viewport.width,
                frame.viewport.height,
                self.offset.current()
            );
        }

        self.offset.tick(frame.dt, frame.has_jumped_once);

        let half_width = self.config.lens.half_width(frame.viewport);

        if !self.is_actively_tracking && !self.released {
            let fraction = screen_fraction(frame.target.x, frame.camera.x, half_width);
            if fraction >= self.config.follow_threshold {
                self.is_actively_tracking = true;
                outcome.armed = true;
                tracing::info!("[camera] Tracking armed at screen x={:.3}", fraction);
            }
        }

        if self.is_actively_tracking
            && let Some(landmark_x) = frame.release_landmark
        {
            let fraction = screen_fraction(landmark_x, frame.camera.x, half_width);
            if fraction <= self.config.release_threshold {
                self.is_actively_tracking = false;
                self.released = true;
                self.held_position_x = frame.camera.x;
                outcome.released = true;
                tracing::info!(
                    "[camera] Tracking released, holding at x={:.2}",
                    self.held_position_x
                );
            }
        }

        let x = if self.is_actively_tracking {
            let desired = self.desired_x(frame.target.x, half_width, frame.viewport.width, frame.left_boundary);
            if self.config.smooth_follow {
                let rate = (frame.dt * self.config.follow_speed).min(1.0);
                frame.camera.x + (desired - frame.camera.x) * rate
            } else {
                desired
            }
        } else {
            self.held_position_x
        };

        outcome.position = Vec3::new(x, self.fixed_y, self.fixed_z);
        outcome
    }

    /// Desired camera X for a target under the active offset and boundary clamp.
    pub fn desired_x(
        &self,
        target_x: f32,
        half_width: f32,
        viewport_width: f32,
        left_boundary: Option<f32>,
    ) -> f32 {
        let offset_world = offset_to_world(self.offset.current(), half_width, viewport_width);
        desired_x(target_x, offset_world, half_width, left_boundary)
    }

    pub fn is_actively_tracking(&self) -> bool {
        self.is_actively_tracking
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn held_position_x(&self) -> f32 {
        self.held_position_x
    }

    pub fn current_offset_x(&self) -> f32 {
        self.offset.current()
    }

    pub fn is_landscape(&self) -> bool {
        self.orientation.is_some_and(Orientation::is_landscape)
    }

    pub fn offset_transition_complete(&self) -> bool {
        self.offset.is_transition_complete()
    }

    pub fn orientation(&self) -> Option<Orientation> {
        self.orientation
    }

    pub fn fixed_y(&self) -> f32 {
        self.fixed_y
    }

    pub fn fixed_z(&self) -> f32 {
        self.fixed_z
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn portrait() -> ViewportSize {
        ViewportSize::new(720.0, 1280.0)
    }

    fn landscape() -> ViewportSize {
        ViewportSize::new(1280.0, 720.0)
    }

    fn direct_config() -> CameraConfig {
        CameraConfig {
            lens: CameraLens::Orthographic { ortho_height: 5.0 },
            smooth_follow: false,
            ..Default::default()
        }
    }

    fn frame(viewport: ViewportSize, camera: Vec3, target_x: f32) -> TrackingFrame {
        TrackingFrame {
            dt: DT,
            viewport,
            camera,
            target: Vec3::new(target_x, 0.0, 0.0),
            release_landmark: None,
            left_boundary: None,
            has_jumped_once: false,
        }
    }

    #[test]
    fn test_orientation_classification() {
        assert_eq!(Orientation::from_viewport(portrait()), Orientation::Portrait);
        assert_eq!(Orientation::from_viewport(landscape()), Orientation::Landscape);
        assert_eq!(
            Orientation::from_viewport(ViewportSize::new(800.0, 800.0)),
            Orientation::Portrait
        );
    }

    #[test]
    fn test_orthographic_half_width() {
        let lens = CameraLens::Orthographic { ortho_height: 5.0 };
        let w = lens.half_width(landscape());
        assert!((w - 5.0 * 1280.0 / 720.0).abs() < 0.001);
    }

    #[test]
    fn test_perspective_half_width() {
        let lens = CameraLens::Perspective {
            fov_degrees: 90.0,
            distance: 10.0,
        };
        // tan(45deg) = 1
        let w = lens.half_width(ViewportSize::new(1000.0, 500.0));
        assert!((w - 20.0).abs() < 0.001);
    }

    #[test]
    fn test_offset_scaling_orthographic_and_perspective() {
        let viewport = ViewportSize::new(1280.0, 720.0);
        let lenses = [
            CameraLens::Orthographic { ortho_height: 4.0 },
            CameraLens::Perspective {
                fov_degrees: 60.0,
                distance: 12.0,
            },
        ];

        for lens in lenses {
            let config = CameraConfig {
                lens,
                landscape_offset_x: 150.0,
                smooth_follow: false,
                ..Default::default()
            };
            let mut tracker = CameraTracker::new(config, Vec3::new(0.0, 1.0, 10.0));
            tracker.update(&frame(viewport, Vec3::new(0.0, 1.0, 10.0), 0.0));

            let w = lens.half_width(viewport);
            let expected = 150.0 * (2.0 * w / 1280.0);
            let desired = tracker.desired_x(3.0, w, 1280.0, None);
            assert!(
                (desired - 3.0 - expected).abs() < 0.0001,
                "{lens:?}: got {}, expected {}",
                desired - 3.0,
                expected
            );
        }
    }

    #[test]
    fn test_boundary_clamp_never_shows_left_of_boundary() {
        let w = 4.0;
        let boundary = -2.0;
        for i in 0..100 {
            let target = -50.0 + i as f32;
            let desired = desired_x(target, 0.0, w, Some(boundary));
            assert!(desired >= boundary + w - 0.0001);
        }
        // Far right of the boundary the clamp is inactive
        assert!((desired_x(30.0, 0.5, w, Some(boundary)) - 30.5).abs() < 0.0001);
    }

    #[test]
    fn test_tracking_arms_exactly_at_threshold() {
        let mut tracker = CameraTracker::new(direct_config(), Vec3::new(0.0, 0.0, 10.0));
        let viewport = landscape();
        let w = CameraLens::Orthographic { ortho_height: 5.0 }.half_width(viewport);
        let camera = Vec3::new(0.0, 0.0, 10.0);

        // Screen fractions 0.3, 0.4, 0.5, 0.6 with the camera held still
        let fractions = [0.3_f32, 0.4, 0.5, 0.6];
        let mut armed_at = None;
        for (i, fraction) in fractions.iter().enumerate() {
            let target_x = (fraction - 0.5) * 2.0 * w;
            let outcome = tracker.update(&frame(viewport, camera, target_x));
            if outcome.armed {
                assert!(armed_at.is_none(), "armed twice");
                armed_at = Some(i);
            }
            if i < 2 {
                assert!(!tracker.is_actively_tracking());
                // Held at the initial position
                assert!(outcome.position.x.abs() < 0.0001);
            }
        }
        assert_eq!(armed_at, Some(2));
        assert!(tracker.is_actively_tracking());
    }

    #[test]
    fn test_y_and_z_stay_pinned() {
        let mut tracker = CameraTracker::new(direct_config(), Vec3::new(0.0, 3.0, 12.0));
        let drifted = Vec3::new(0.0, -7.0, 1.0);
        let outcome = tracker.update(&frame(landscape(), drifted, 8.0));
        assert!(tracker.is_actively_tracking());
        assert!((outcome.position.y - 3.0).abs() < 0.0001);
        assert!((outcome.position.z - 12.0).abs() < 0.0001);
        assert!((outcome.position.x - 8.0).abs() < 0.0001);
    }

    #[test]
    fn test_smoothing_moves_partially() {
        let config = CameraConfig {
            smooth_follow: true,
            follow_speed: 6.0,
            ..direct_config()
        };
        let mut tracker = CameraTracker::new(config, Vec3::ZERO);
        let outcome = tracker.update(&frame(landscape(), Vec3::ZERO, 6.0));
        // rate = min(1, dt * 6) = 0.1
        assert!((outcome.position.x - 0.6).abs() < 0.001);

        // A huge frame time clamps the rate to 1
        let mut tracker = CameraTracker::new(
            CameraConfig {
                smooth_follow: true,
                follow_speed: 6.0,
                ..direct_config()
            },
            Vec3::ZERO,
        );
        let mut long_frame = frame(landscape(), Vec3::ZERO, 6.0);
        long_frame.dt = 5.0;
        let outcome = tracker.update(&long_frame);
        assert!((outcome.position.x - 6.0).abs() < 0.001);
    }

    #[test]
    fn test_release_landmark_holds_camera_for_the_epoch() {
        let mut tracker = CameraTracker::new(direct_config(), Vec3::new(0.0, 0.0, 10.0));
        let viewport = landscape();

        let mut camera = Vec3::new(0.0, 0.0, 10.0);
        let step = |tracker: &mut CameraTracker, camera: &mut Vec3, target_x: f32| {
            let mut f = frame(viewport, *camera, target_x);
            f.release_landmark = Some(20.0);
            let outcome = tracker.update(&f);
            *camera = outcome.position;
            outcome
        };

        let outcome = step(&mut tracker, &mut camera, 5.0);
        assert!(outcome.armed);
        assert!((camera.x - 5.0).abs() < 0.0001);

        // Camera reaches the landmark: released and held there
        let outcome = step(&mut tracker, &mut camera, 21.0);
        assert!(!outcome.released);
        let outcome = step(&mut tracker, &mut camera, 25.0);
        assert!(outcome.released);
        assert!(!tracker.is_actively_tracking());
        assert!((tracker.held_position_x() - 21.0).abs() < 0.0001);
        assert!((camera.x - 21.0).abs() < 0.0001);

        // Target keeps running right: no re-arm within this orientation
        let outcome = step(&mut tracker, &mut camera, 40.0);
        assert!(!outcome.armed);
        assert!((camera.x - 21.0).abs() < 0.0001);
    }

    #[test]
    fn test_orientation_change_clears_tracking_and_reapplies_offset() {
        let config = CameraConfig {
            portrait_offset_x: 100.0,
            landscape_offset_x: 20.0,
            ..direct_config()
        };
        let mut tracker = CameraTracker::new(config, Vec3::ZERO);

        let outcome = tracker.update(&frame(landscape(), Vec3::ZERO, 3.0));
        assert_eq!(outcome.orientation_changed, Some(Orientation::Landscape));
        assert!(tracker.is_landscape());
        assert!(tracker.is_actively_tracking());
        assert!((tracker.current_offset_x() - 20.0).abs() < 0.0001);

        // Target now left of center in the new orientation: tracking stays cleared
        let camera = outcome.position;
        let outcome = tracker.update(&frame(portrait(), camera, camera.x - 1.0));
        assert_eq!(outcome.orientation_changed, Some(Orientation::Portrait));
        assert!(!tracker.is_actively_tracking());
        assert!((tracker.current_offset_x() - 100.0).abs() < 0.0001);
        assert!((outcome.position.x - camera.x).abs() < 0.0001);

        // Same orientation again: no change reported
        let outcome = tracker.update(&frame(portrait(), camera, camera.x - 1.0));
        assert_eq!(outcome.orientation_changed, None);
    }

    #[test]
    fn test_portrait_offset_retires_after_first_jump() {
        let config = CameraConfig {
            portrait_offset_x: 90.0,
            transition_duration: 0.2,
            ..direct_config()
        };
        let mut tracker = CameraTracker::new(config, Vec3::ZERO);
        tracker.update(&frame(portrait(), Vec3::ZERO, -5.0));
        assert!((tracker.current_offset_x() - 90.0).abs() < 0.0001);

        for _ in 0..30 {
            let mut f = frame(portrait(), Vec3::ZERO, -5.0);
            f.has_jumped_once = true;
            tracker.update(&f);
        }
        assert!(tracker.current_offset_x().abs() < 0.0001);
        assert!(tracker.offset_transition_complete());
    }

    #[test]
    fn test_degenerate_viewport_is_skipped() {
        let mut tracker = CameraTracker::new(direct_config(), Vec3::new(1.0, 2.0, 3.0));
        let camera = Vec3::new(4.0, 5.0, 6.0);
        let outcome = tracker.update(&frame(ViewportSize::new(0.0, 720.0), camera, 100.0));
        // X is held, Y/Z snap back to the pinned values
        assert!((outcome.position - Vec3::new(4.0, 2.0, 3.0)).length() < 0.0001);
        assert_eq!(outcome.orientation_changed, None);
        assert!(tracker.orientation().is_none());
    }

    #[test]
    fn test_lens_validation() {
        assert!(CameraLens::Orthographic { ortho_height: 0.0 }.validate().is_err());
        assert!(
            CameraLens::Perspective {
                fov_degrees: 180.0,
                distance: 5.0
            }
            .validate()
            .is_err()
        );
        assert!(
            CameraLens::Perspective {
                fov_degrees: 45.0,
                distance: 5.0
            }
            .validate()
            .is_ok()
        );
    }
}
