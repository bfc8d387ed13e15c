//! Time-based interpolation between two values.
//!
//! A [`Tween`] is advanced once per frame by the owner and reports completion
//! (plus any time left over from the frame) so chained motions can hand the
//! remainder to the next segment instead of losing it.

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

/// Easing curve applied to normalized time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl EasingType {
    /// Applies the easing function to a normalized time value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

/// Values a [`Tween`] can interpolate.
pub trait Interpolate: Copy {
    fn interpolate(start: Self, end: Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }
}

impl Interpolate for Vec3 {
    fn interpolate(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }
}

/// A single in-flight interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<T> {
    start: T,
    end: T,
    duration: f32,
    elapsed: f32,
    easing: EasingType,
}

impl<T: Interpolate> Tween<T> {
    pub fn new(start: T, end: T, duration: f32, easing: EasingType) -> Self {
        Self {
            start,
            end,
            duration: duration.max(0.0),
            elapsed: 0.0,
            easing,
        }
    }

    pub fn linear(start: T, end: T, duration: f32) -> Self {
        Self::new(start, end, duration, EasingType::Linear)
    }

    /// Advances the tween by `dt` seconds.
    ///
    /// Returns `Some(leftover)` on the call that reaches the end, where
    /// `leftover` is the part of `dt` not consumed by this tween.
    pub fn advance(&mut self, dt: f32) -> Option<f32> {
        if self.is_finished() {
            return Some(dt.max(0.0));
        }
        self.elapsed += dt.max(0.0);
        if self.elapsed >= self.duration {
            let leftover = self.elapsed - self.duration;
            self.elapsed = self.duration;
            Some(leftover)
        } else {
            None
        }
    }

    /// Current interpolated value.
    pub fn value(&self) -> T {
        T::interpolate(self.start, self.end, self.easing.apply(self.progress()))
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn end(&self) -> T {
        self.end
    }

    /// Normalized progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration > 0.0 {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}
