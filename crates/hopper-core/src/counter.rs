//! Animated numeric labels.

use crate::tween::Tween;

/// A displayed number that ramps toward its target over time.
#[derive(Debug, Clone)]
pub struct AnimatedValue {
    displayed: f32,
    tween: Option<Tween<f32>>,
    round_to_int: bool,
    suffix: String,
    last_text: String,
}

impl AnimatedValue {
    pub fn new(initial: f32, round_to_int: bool, suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        let last_text = format_value(initial, round_to_int, &suffix);
        Self {
            displayed: initial,
            tween: None,
            round_to_int,
            suffix,
            last_text,
        }
    }

    /// A two-decimal money label, e.g. `12.50 €`.
    pub fn money(initial: f32) -> Self {
        Self::new(initial, false, " €")
    }

    /// Starts ramping from the displayed value to `target`, replacing any running ramp.
    pub fn animate_to(&mut self, target: f32, duration: f32) {
        self.tween = Some(Tween::linear(self.displayed, target, duration));
    }

    /// Jumps straight to `value`, cancelling any running ramp.
    pub fn set_value(&mut self, value: f32) -> String {
        self.tween = None;
        self.displayed = value;
        self.last_text = self.format(value);
        self.last_text.clone()
    }

    /// Advances the ramp. Returns the new text when it changed.
    pub fn tick(&mut self, dt: f32) -> Option<String> {
        let tween = self.tween.as_mut()?;
        if tween.advance(dt).is_some() {
            // Completion lands on the exact target
            self.displayed = tween.end();
            self.tween = None;
        } else {
            self.displayed = tween.value();
        }

        let text = self.format(self.displayed);
        if text == self.last_text {
            return None;
        }
        self.last_text.clone_from(&text);
        Some(text)
    }

    pub fn value(&self) -> f32 {
        self.displayed
    }

    pub fn text(&self) -> &str {
        &self.last_text
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    fn format(&self, value: f32) -> String {
        format_value(value, self.round_to_int, &self.suffix)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn format_value(value: f32, round_to_int: bool, suffix: &str) -> String {
    if round_to_int {
        format!("{}{suffix}", value.floor() as i64)
    } else {
        format!("{value:.2}{suffix}")
    }
}
