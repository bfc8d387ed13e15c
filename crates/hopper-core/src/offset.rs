//! Orientation-dependent horizontal camera offset.
//!
//! In portrait the camera starts biased by the portrait offset so the character
//! has room ahead of it. Once the first jump lands the bias is retired with an
//! ease-out ramp to zero. Landscape uses its own offset and re-arms the ramp.

use crate::camera::Orientation;
use crate::tween::{EasingType, Tween};

#[derive(Debug, Clone)]
pub struct OffsetCoordinator {
    portrait_offset: f32,
    landscape_offset: f32,
    transition_duration: f32,
    current: f32,
    orientation: Option<Orientation>,
    transition: Option<Tween<f32>>,
    transition_complete: bool,
}

impl OffsetCoordinator {
    pub fn new(portrait_offset: f32, landscape_offset: f32, transition_duration: f32) -> Self {
        Self {
            portrait_offset,
            landscape_offset,
            transition_duration: transition_duration.max(0.0),
            current: 0.0,
            orientation: None,
            transition: None,
            transition_complete: false,
        }
    }

    /// Recomputes the active offset for a new orientation.
    pub fn apply_orientation(&mut self, orientation: Orientation, has_jumped_once: bool) {
        self.orientation = Some(orientation);
        // A new orientation always stops the running ramp before writing the value
        self.transition = None;

        match orientation {
            Orientation::Portrait => {
                if has_jumped_once && self.transition_complete {
                    self.current = 0.0;
                } else {
                    // Before the first jump, or with the ramp still pending,
                    // start from the full portrait bias; tick() retires it.
                    self.current = self.portrait_offset;
                }
            }
            Orientation::Landscape => {
                self.current = self.landscape_offset;
                self.transition_complete = false;
            }
        }
        tracing::debug!(
            "[offset] {:?}: offset={:.2} (jumped={})",
            orientation,
            self.current,
            has_jumped_once
        );
    }

    /// Advances the portrait retirement ramp.
    pub fn tick(&mut self, dt: f32, has_jumped_once: bool) {
        if self.transition.is_none()
            && self.orientation == Some(Orientation::Portrait)
            && has_jumped_once
            && !self.transition_complete
        {
            tracing::info!(
                "[offset] Retiring portrait offset {:.2} over {:.2}s",
                self.current,
                self.transition_duration
            );
            self.transition = Some(Tween::new(
                self.current,
                0.0,
                self.transition_duration,
                EasingType::EaseOut,
            ));
        }

        if let Some(transition) = &mut self.transition {
            let finished = transition.advance(dt).is_some();
            self.current = transition.value();
            if finished {
                self.current = 0.0;
                self.transition = None;
                self.transition_complete = true;
                tracing::info!("[offset] Portrait offset retired");
            }
        }
    }

    /// Active offset in viewport pixels.
    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn is_transition_complete(&self) -> bool {
        self.transition_complete
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn orientation(&self) -> Option<Orientation> {
        self.orientation
    }
}
