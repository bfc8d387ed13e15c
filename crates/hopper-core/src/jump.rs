//! Waypoint jump sequencing.
//!
//! A [`JumpSequencer`] moves the character through an ordered list of
//! waypoints. Each jump is a three-phase motion:
//!
//! 1. **Rise** to the arc midpoint,
//! 2. **Descend** to an overshoot point above the waypoint,
//! 3. **Settle** from the overshoot point onto the waypoint.
//!
//! After settling a short landing dip plays. Side effects (clips, sounds,
//! node reveals, lifecycle notifications) are queued as [`JumpEffect`]s and
//! drained by the caller once per frame.

use bevy::math::Vec3;

use crate::config::{ClipRef, ConfigError, JumpConfig};
use crate::timer::{DeferredTimers, TimerHandle};
use crate::tween::Tween;

/// Side effect requested by the sequencer.
#[derive(Debug, Clone, PartialEq)]
pub enum JumpEffect {
    PlayClip(ClipRef),
    /// Stop whatever clip is playing (idle pose).
    StopClip,
    PlaySound(String),
    ShowNode(String),
    Landed { index: usize },
    /// The final waypoint was reached. Emitted once per traversal.
    SequenceComplete { final_index: usize },
    CelebrationTriggered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpPhase {
    Rise,
    Descend,
    Settle,
}

#[derive(Debug, Clone)]
struct JumpMotion {
    phase: JumpPhase,
    tween: Tween<Vec3>,
    overshoot: Vec3,
    target: Vec3,
    target_index: usize,
}

impl JumpMotion {
    /// Returns the following phase, or `None` once settled.
    fn next_phase(&self, config: &JumpConfig) -> Option<Self> {
        let (phase, tween) = match self.phase {
            JumpPhase::Rise => (
                JumpPhase::Descend,
                Tween::linear(self.tween.end(), self.overshoot, config.jump_duration / 2.0),
            ),
            JumpPhase::Descend => (
                JumpPhase::Settle,
                Tween::linear(self.overshoot, self.target, config.land_drop_duration),
            ),
            JumpPhase::Settle => return None,
        };
        Some(Self {
            phase,
            tween,
            ..self.clone()
        })
    }
}

/// Sink-and-recover flourish played after landing.
#[derive(Debug, Clone)]
struct LandingDip {
    tween: Tween<Vec3>,
    rest: Vec3,
    sinking: bool,
}

/// Drives a character through its waypoints.
#[derive(Debug, Clone)]
pub struct JumpSequencer {
    waypoints: Vec<Vec3>,
    config: JumpConfig,
    current_index: usize,
    landed_index: Option<usize>,
    is_jumping: bool,
    has_jumped_once: bool,
    victory_triggered: bool,
    sequence_completed: bool,
    motion: Option<JumpMotion>,
    dip: Option<LandingDip>,
    timers: DeferredTimers<()>,
    celebration: Option<TimerHandle>,
    effects: Vec<JumpEffect>,
}

impl JumpSequencer {
    /// Validates `config` and builds an idle sequencer at index 0.
    ///
    /// `clips` lists the clip names the character can play; pass an empty
    /// slice to skip clip resolution.
    pub fn new(config: JumpConfig, clips: &[String]) -> Result<Self, ConfigError> {
        config.validate(clips)?;
        Ok(Self {
            waypoints: config.waypoint_positions(),
            config,
            current_index: 0,
            landed_index: None,
            is_jumping: false,
            has_jumped_once: false,
            victory_triggered: false,
            sequence_completed: false,
            motion: None,
            dip: None,
            timers: DeferredTimers::new(),
            celebration: None,
            effects: Vec::new(),
        })
    }

    /// Index of the waypoint the next `jump_to_next` call would target.
    pub fn next_index(&self) -> Option<usize> {
        let next = self.landed_index.map_or(0, |i| i + 1);
        (next < self.waypoints.len()).then_some(next)
    }

    /// Jumps from `from` to the following waypoint.
    ///
    /// Returns false without changing state if a jump is in progress or the
    /// character already stands on the last waypoint.
    pub fn jump_to_next(&mut self, from: Vec3) -> bool {
        if self.is_jumping {
            tracing::debug!("[jump] Ignoring jump request: already jumping");
            return false;
        }
        let Some(index) = self.next_index() else {
            tracing::debug!("[jump] Ignoring jump request: no waypoint left");
            return false;
        };
        self.start_jump(index, from);
        true
    }

    /// Jumps from `from` to waypoint `index`.
    ///
    /// Returns false without changing state if a jump is in progress or
    /// `index` is out of range.
    pub fn jump_to_index(&mut self, index: usize, from: Vec3) -> bool {
        if self.is_jumping {
            tracing::debug!("[jump] Ignoring jump to {}: already jumping", index);
            return false;
        }
        if index >= self.waypoints.len() {
            tracing::debug!(
                "[jump] Ignoring jump to {}: only {} waypoints",
                index,
                self.waypoints.len()
            );
            return false;
        }
        self.start_jump(index, from);
        true
    }

    fn start_jump(&mut self, index: usize, from: Vec3) {
        // The landing dip writes the same transform; a new jump takes over.
        self.dip = None;

        let target = self.waypoints[index];
        let overshoot = target + Vec3::new(0.0, self.config.land_offset_height, 0.0);
        let midpoint = Vec3::new(
            (from.x + overshoot.x) / 2.0,
            from.y.max(overshoot.y) + self.config.jump_height,
            (from.z + overshoot.z) / 2.0,
        );

        self.is_jumping = true;
        self.motion = Some(JumpMotion {
            phase: JumpPhase::Rise,
            tween: Tween::linear(from, midpoint, self.config.jump_duration / 2.0),
            overshoot,
            target,
            target_index: index,
        });

        if let Some(clip) = &self.config.jump_clip {
            self.effects.push(JumpEffect::PlayClip(clip.clone()));
        }
        if let Some(sound) = &self.config.jump_sound {
            self.effects.push(JumpEffect::PlaySound(sound.clone()));
        }

        tracing::info!(
            "[jump] Jumping to waypoint {} ({:.2}, {:.2}, {:.2})",
            index,
            target.x,
            target.y,
            target.z
        );
    }

    /// Advances motion, landing dip and deferred celebration by `dt` seconds,
    /// writing the character position when it is being animated.
    pub fn tick(&mut self, dt: f32, position: &mut Vec3) {
        let dt = dt.max(0.0);

        for () in self.timers.tick(dt) {
            self.celebration = None;
            self.celebrate();
        }

        let mut remaining = dt;
        while let Some(motion) = self.motion.as_mut() {
            let Some(leftover) = motion.tween.advance(remaining) else {
                *position = motion.tween.value();
                remaining = 0.0;
                break;
            };
            *position = motion.tween.end();
            remaining = leftover;

            if let Some(next) = motion.next_phase(&self.config) {
                *motion = next;
            } else {
                let index = motion.target_index;
                self.motion = None;
                self.land(index, *position);
            }
        }

        while let Some(dip) = self.dip.as_mut() {
            let Some(leftover) = dip.tween.advance(remaining) else {
                *position = dip.tween.value();
                break;
            };
            *position = dip.tween.end();
            remaining = leftover;

            if dip.sinking {
                dip.sinking = false;
                dip.tween = Tween::linear(
                    dip.tween.end(),
                    dip.rest,
                    self.config.landing_rise_duration,
                );
            } else {
                *position = dip.rest;
                self.dip = None;
                if self.config.stop_clip_when_idle {
                    self.effects.push(JumpEffect::StopClip);
                }
            }
        }
    }

    fn land(&mut self, index: usize, rest: Vec3) {
        self.is_jumping = false;
        self.current_index = index;
        self.landed_index = Some(index);
        self.effects.push(JumpEffect::Landed { index });

        if !self.has_jumped_once {
            self.has_jumped_once = true;
            tracing::info!("[jump] First jump completed");
        }

        if let Some(clip) = &self.config.land_clip {
            self.effects.push(JumpEffect::PlayClip(clip.clone()));
        }
        let sink = rest - Vec3::new(0.0, self.config.landing_sink_amount, 0.0);
        self.dip = Some(LandingDip {
            tween: Tween::linear(rest, sink, self.config.landing_sink_duration),
            rest,
            sinking: true,
        });

        let last = self.waypoints.len() - 1;
        if index != last {
            tracing::info!("[jump] Landed on waypoint {}", index);
            return;
        }

        if !self.sequence_completed {
            self.sequence_completed = true;
            self.effects.push(JumpEffect::SequenceComplete { final_index: last });
            tracing::info!("[jump] Sequence complete at waypoint {}", last);
        }
        if !self.victory_triggered && self.celebration.is_none() {
            let delay = self.config.celebration.delay;
            self.celebration = Some(self.timers.schedule(delay, ()));
            tracing::info!("[jump] Celebration scheduled in {:.2}s", delay);
        }
    }

    /// Fires the terminal celebration now. No-op once it has fired.
    pub fn trigger_celebration(&mut self) -> bool {
        if self.victory_triggered {
            tracing::debug!("[jump] Celebration already triggered");
            return false;
        }
        if let Some(handle) = self.celebration.take() {
            self.timers.cancel(handle);
        }
        self.celebrate()
    }

    fn celebrate(&mut self) -> bool {
        if self.victory_triggered {
            return false;
        }
        self.victory_triggered = true;

        let celebration = &self.config.celebration;
        self.effects.extend(
            celebration
                .nodes
                .iter()
                .map(|node| JumpEffect::ShowNode(node.clone())),
        );
        if let Some(sound) = &celebration.sound {
            self.effects.push(JumpEffect::PlaySound(sound.clone()));
        }
        self.effects.push(JumpEffect::CelebrationTriggered);
        tracing::info!("[jump] Celebration triggered");
        true
    }

    /// Takes the effects queued since the last call, in emission order.
    pub fn drain_effects(&mut self) -> Vec<JumpEffect> {
        std::mem::take(&mut self.effects)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_jumping(&self) -> bool {
        self.is_jumping
    }

    pub fn has_jumped_once(&self) -> bool {
        self.has_jumped_once
    }

    pub fn victory_triggered(&self) -> bool {
        self.victory_triggered
    }

    pub fn sequence_completed(&self) -> bool {
        self.sequence_completed
    }

    pub fn is_celebration_pending(&self) -> bool {
        self.celebration
            .is_some_and(|handle| self.timers.is_pending(handle))
    }

    /// Current motion phase, if jumping.
    pub fn phase(&self) -> Option<JumpPhase> {
        self.motion.as_ref().map(|m| m.phase)
    }

    /// True while neither a jump nor the landing dip is animating.
    pub fn is_idle(&self) -> bool {
        self.motion.is_none() && self.dip.is_none()
    }

    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    pub fn config(&self) -> &JumpConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CelebrationConfig;

    const DT: f32 = 1.0 / 60.0;

    fn config(waypoints: &[[f32; 3]]) -> JumpConfig {
        JumpConfig {
            waypoints: waypoints.to_vec(),
            jump_height: 2.0,
            jump_duration: 0.1,
            land_drop_duration: 0.1,
            landing_sink_duration: 0.1,
            landing_rise_duration: 0.1,
            jump_sound: Some("whoosh".to_string()),
            celebration: CelebrationConfig {
                delay: 0.1,
                nodes: vec!["finish_screen".to_string(), "finish_land".to_string()],
                sound: Some("fanfare".to_string()),
            },
            ..Default::default()
        }
    }

    fn sequencer(waypoints: &[[f32; 3]]) -> JumpSequencer {
        JumpSequencer::new(config(waypoints), &[]).expect("valid config")
    }

    /// Ticks at 60 Hz for `seconds`, collecting every drained effect.
    fn run(seq: &mut JumpSequencer, position: &mut Vec3, seconds: f32) -> Vec<JumpEffect> {
        let mut effects = Vec::new();
        let frames = (seconds / DT).ceil() as usize;
        for _ in 0..frames {
            seq.tick(DT, position);
            effects.extend(seq.drain_effects());
        }
        effects
    }

    fn count(effects: &[JumpEffect], pred: impl Fn(&JumpEffect) -> bool) -> usize {
        effects.iter().filter(|e| pred(e)).count()
    }

    #[test]
    fn test_empty_waypoints_disable_sequencer() {
        let result = JumpSequencer::new(JumpConfig::default(), &[]);
        assert!(matches!(result, Err(ConfigError::EmptyWaypoints)));
    }

    #[test]
    fn test_initial_state() {
        let seq = sequencer(&[[1.0, 0.0, 0.0]]);
        assert_eq!(seq.current_index(), 0);
        assert!(!seq.is_jumping());
        assert!(!seq.has_jumped_once());
        assert!(!seq.victory_triggered());
        assert!(seq.is_idle());
    }

    #[test]
    fn test_two_waypoint_scenario() {
        let mut seq = sequencer(&[[10.0, 0.0, 0.0], [20.0, 0.0, 0.0]]);
        let mut position = Vec3::ZERO;

        assert!(seq.jump_to_next(position));
        let mut effects = run(&mut seq, &mut position, 0.5);
        assert!(seq.is_idle());
        assert!((position - Vec3::new(10.0, 0.0, 0.0)).length() < 0.001);
        assert_eq!(seq.current_index(), 0);

        assert!(seq.jump_to_next(position));
        effects.extend(run(&mut seq, &mut position, 0.5));

        assert!((position - Vec3::new(20.0, 0.0, 0.0)).length() < 0.001);
        assert_eq!(seq.current_index(), 1);
        assert_eq!(
            count(&effects, |e| matches!(e, JumpEffect::SequenceComplete { .. })),
            1
        );
        assert_eq!(
            count(&effects, |e| matches!(e, JumpEffect::CelebrationTriggered)),
            1
        );
    }

    #[test]
    fn test_jump_to_next_visits_every_waypoint_in_order() {
        for len in 1..=5 {
            let waypoints: Vec<[f32; 3]> =
                (0..len).map(|i| [i as f32 * 3.0 + 1.0, (i % 2) as f32, 0.0]).collect();
            let mut seq = sequencer(&waypoints);
            let mut position = Vec3::ZERO;
            let mut effects = Vec::new();

            for _ in 0..len {
                assert!(seq.jump_to_next(position));
                effects.extend(run(&mut seq, &mut position, 0.5));
            }

            let landed: Vec<usize> = effects
                .iter()
                .filter_map(|e| match e {
                    JumpEffect::Landed { index } => Some(*index),
                    _ => None,
                })
                .collect();
            assert_eq!(landed, (0..len).collect::<Vec<_>>());

            // Completion fires once, after the last landing
            let complete_at = effects
                .iter()
                .position(|e| matches!(e, JumpEffect::SequenceComplete { .. }));
            let last_landed_at = effects
                .iter()
                .rposition(|e| matches!(e, JumpEffect::Landed { .. }));
            assert_eq!(
                count(&effects, |e| matches!(e, JumpEffect::SequenceComplete { .. })),
                1
            );
            assert!(complete_at > last_landed_at);

            // Nothing left to jump to
            assert!(!seq.jump_to_next(position));
        }
    }

    #[test]
    fn test_jump_while_jumping_is_ignored() {
        let mut seq = sequencer(&[[10.0, 0.0, 0.0], [20.0, 0.0, 0.0]]);
        let mut position = Vec3::ZERO;

        assert!(seq.jump_to_next(position));
        seq.drain_effects();
        seq.tick(0.02, &mut position);
        let phase = seq.phase();

        assert!(!seq.jump_to_next(position));
        assert!(!seq.jump_to_index(1, position));
        assert!(seq.drain_effects().is_empty());
        assert_eq!(seq.phase(), phase);
        assert_eq!(seq.current_index(), 0);

        run(&mut seq, &mut position, 0.5);
        assert!((position - Vec3::new(10.0, 0.0, 0.0)).length() < 0.001);
        assert_eq!(seq.current_index(), 0);
    }

    #[test]
    fn test_out_of_range_index_is_ignored() {
        let mut seq = sequencer(&[[1.0, 0.0, 0.0]]);
        assert!(!seq.jump_to_index(1, Vec3::ZERO));
        assert!(!seq.jump_to_index(usize::MAX, Vec3::ZERO));
        assert!(!seq.is_jumping());
        assert!(seq.drain_effects().is_empty());
    }

    #[test]
    fn test_has_jumped_once_latches_after_first_jump() {
        let mut seq = sequencer(&[[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [3.0, 0.0, 0.0]]);
        let mut position = Vec3::ZERO;

        seq.jump_to_next(position);
        seq.tick(0.04, &mut position);
        assert!(!seq.has_jumped_once(), "not latched mid-jump");

        run(&mut seq, &mut position, 0.5);
        assert!(seq.has_jumped_once());

        for index in [2, 0, 1] {
            seq.jump_to_index(index, position);
            run(&mut seq, &mut position, 0.5);
            assert!(seq.has_jumped_once());
        }
    }

    #[test]
    fn test_arc_geometry() {
        let mut seq = sequencer(&[[4.0, 1.0, 2.0]]);
        let mut position = Vec3::new(0.0, 3.0, 0.0);
        seq.jump_to_next(position);

        // End of the rise phase: arc midpoint
        seq.tick(0.05, &mut position);
        assert_eq!(seq.phase(), Some(JumpPhase::Descend));
        // overshoot = (4, 1.5, 2); midpoint y = max(3, 1.5) + 2
        assert!((position - Vec3::new(2.0, 5.0, 1.0)).length() < 0.001);

        // End of the descend phase: overshoot point
        seq.tick(0.05, &mut position);
        assert_eq!(seq.phase(), Some(JumpPhase::Settle));
        assert!((position - Vec3::new(4.0, 1.5, 2.0)).length() < 0.001);

        // Settle lands exactly on the waypoint, then the dip starts
        seq.tick(0.1, &mut position);
        assert!(!seq.is_jumping());
        assert!((position - Vec3::new(4.0, 1.0, 2.0)).length() < 0.001);

        // Bottom of the dip
        seq.tick(0.1, &mut position);
        assert!((position.y - 0.8).abs() < 0.001);

        // Recovered to rest
        seq.tick(0.1, &mut position);
        assert!(seq.is_idle());
        assert!((position - Vec3::new(4.0, 1.0, 2.0)).length() < 0.001);
    }

    #[test]
    fn test_single_large_tick_carries_leftover_through_phases() {
        let mut seq = sequencer(&[[5.0, 0.0, 0.0]]);
        let mut position = Vec3::ZERO;
        seq.jump_to_next(position);
        seq.tick(10.0, &mut position);

        assert!(seq.is_idle());
        assert!((position - Vec3::new(5.0, 0.0, 0.0)).length() < 0.001);
        let effects = seq.drain_effects();
        assert!(effects.contains(&JumpEffect::Landed { index: 0 }));
        assert!(effects.contains(&JumpEffect::StopClip));
    }

    #[test]
    fn test_effect_order_for_one_jump() {
        let mut seq = sequencer(&[[1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        let mut position = Vec3::ZERO;
        seq.jump_to_next(position);
        assert_eq!(
            seq.drain_effects(),
            vec![
                JumpEffect::PlayClip(ClipRef::once("jump")),
                JumpEffect::PlaySound("whoosh".to_string()),
            ]
        );

        let effects = run(&mut seq, &mut position, 0.5);
        assert_eq!(
            effects,
            vec![
                JumpEffect::Landed { index: 0 },
                JumpEffect::PlayClip(ClipRef::once("land")),
                JumpEffect::StopClip,
            ]
        );
    }

    #[test]
    fn test_celebration_fires_once_after_delay() {
        let mut seq = sequencer(&[[1.0, 0.0, 0.0]]);
        let mut position = Vec3::ZERO;
        seq.jump_to_next(position);

        // Land: 0.05 + 0.05 + 0.1
        run(&mut seq, &mut position, 0.25);
        assert!(seq.sequence_completed());
        assert!(seq.is_celebration_pending());
        assert!(!seq.victory_triggered());

        let effects = run(&mut seq, &mut position, 0.25);
        assert!(seq.victory_triggered());
        assert_eq!(
            count(&effects, |e| matches!(e, JumpEffect::CelebrationTriggered)),
            1
        );
        assert!(effects.contains(&JumpEffect::ShowNode("finish_screen".to_string())));
        assert!(effects.contains(&JumpEffect::ShowNode("finish_land".to_string())));
        assert!(effects.contains(&JumpEffect::PlaySound("fanfare".to_string())));

        for _ in 0..5 {
            assert!(!seq.trigger_celebration());
        }
        assert!(seq.drain_effects().is_empty());
    }

    #[test]
    fn test_manual_celebration_cancels_scheduled_one() {
        let mut seq = sequencer(&[[1.0, 0.0, 0.0]]);
        let mut position = Vec3::ZERO;
        seq.jump_to_next(position);
        run(&mut seq, &mut position, 0.25);
        assert!(seq.is_celebration_pending());

        assert!(seq.trigger_celebration());
        assert!(!seq.trigger_celebration());
        assert!(!seq.is_celebration_pending());

        let mut effects = seq.drain_effects();
        effects.extend(run(&mut seq, &mut position, 1.0));
        assert_eq!(
            count(&effects, |e| matches!(e, JumpEffect::CelebrationTriggered)),
            1
        );
    }

    #[test]
    fn test_revisiting_last_waypoint_does_not_repeat_completion() {
        let mut seq = sequencer(&[[1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        let mut position = Vec3::ZERO;
        let mut effects = Vec::new();
        for index in [1, 0, 1] {
            seq.jump_to_index(index, position);
            effects.extend(run(&mut seq, &mut position, 0.5));
        }
        assert_eq!(
            count(&effects, |e| matches!(e, JumpEffect::SequenceComplete { .. })),
            1
        );
        assert_eq!(
            count(&effects, |e| matches!(e, JumpEffect::CelebrationTriggered)),
            1
        );
    }

    #[test]
    fn test_new_jump_interrupts_landing_dip() {
        let mut seq = sequencer(&[[1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        let mut position = Vec3::ZERO;
        seq.jump_to_next(position);
        // Through settle and into the dip
        seq.tick(0.25, &mut position);
        assert!(!seq.is_jumping());
        assert!(!seq.is_idle());

        assert!(seq.jump_to_next(position));
        run(&mut seq, &mut position, 0.5);
        assert!((position - Vec3::new(2.0, 0.0, 0.0)).length() < 0.001);
    }
}
