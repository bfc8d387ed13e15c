//! One-shot money milestones along the route.
//!
//! A milestone activates the first time the character comes within
//! `activation_distance` of its X position. Activation reveals a node, ramps
//! the shared money label and the milestone's packshot label, drops a sprite
//! into place and optionally plays a delayed sound.

use crate::config::MilestoneConfig;
use crate::timer::DeferredTimers;

#[derive(Debug, Clone, PartialEq)]
pub enum MilestoneEffect {
    ShowNode(String),
    /// Ramp the shared money label from its displayed value to `target`.
    RampMoney { target: f32, duration: f32 },
    /// Ramp this milestone's packshot label.
    RampPackshot { from: f32, to: f32, duration: f32 },
    DropSprite {
        node: String,
        offset_y: f32,
        duration: f32,
    },
    PlaySound(String),
    Activated { name: String },
}

#[derive(Debug, Clone)]
pub struct Milestone {
    config: MilestoneConfig,
    activated: bool,
    sounds: DeferredTimers<String>,
}

impl Milestone {
    pub fn new(config: MilestoneConfig) -> Self {
        Self {
            config,
            activated: false,
            sounds: DeferredTimers::new(),
        }
    }

    /// True when `character_x` is within activation range.
    pub fn in_range(&self, character_x: f32) -> bool {
        (character_x - self.config.x).abs() <= self.config.activation_distance
    }

    /// Advances pending sounds and activates on first contact.
    pub fn update(&mut self, dt: f32, character_x: f32) -> Vec<MilestoneEffect> {
        let mut effects: Vec<MilestoneEffect> = self
            .sounds
            .tick(dt)
            .into_iter()
            .map(MilestoneEffect::PlaySound)
            .collect();

        if !self.activated && self.in_range(character_x) {
            self.activate(&mut effects);
        }
        effects
    }

    fn activate(&mut self, effects: &mut Vec<MilestoneEffect>) {
        self.activated = true;
        let config = &self.config;
        tracing::info!(
            "[milestone] '{}' reached at x={:.2}, value={:.2}",
            config.name,
            config.x,
            config.target_value
        );

        effects.push(MilestoneEffect::Activated {
            name: config.name.clone(),
        });
        if let Some(node) = &config.reveal_node {
            effects.push(MilestoneEffect::ShowNode(node.clone()));
        }
        effects.push(MilestoneEffect::RampMoney {
            target: config.target_value,
            duration: config.count_duration,
        });
        effects.push(MilestoneEffect::RampPackshot {
            from: config.start_value,
            to: config.start_value + config.target_value,
            duration: config.count_duration,
        });
        if let Some(node) = &config.drop_node {
            effects.push(MilestoneEffect::DropSprite {
                node: node.clone(),
                offset_y: config.drop_offset_y,
                duration: config.drop_duration,
            });
        }
        if let Some(sound) = &config.sound {
            if config.sound_delay > 0.0 {
                self.sounds.schedule(config.sound_delay, sound.clone());
            } else {
                effects.push(MilestoneEffect::PlaySound(sound.clone()));
            }
        }
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &MilestoneConfig {
        &self.config
    }
}
