//! Milestone systems.

use bevy::prelude::*;

use crate::bevy::{
    Character, MilestoneMarker, MilestoneReachedEvent, MoneyLabel, PackshotLabel, PlaySoundEvent,
    SceneNode, SetNodeVisibilityEvent, TranslationTween, ValueLabel,
};
use crate::milestone::MilestoneEffect;
use crate::tween::Tween;

/// System to activate milestones the character reaches and apply their effects.
#[allow(clippy::too_many_arguments)]
pub fn update_milestones(
    mut commands: Commands,
    time: Res<Time>,
    characters: Query<&Transform, With<Character>>,
    mut milestones: Query<&mut MilestoneMarker>,
    mut money_labels: Query<&mut ValueLabel, (With<MoneyLabel>, Without<PackshotLabel>)>,
    mut packshot_labels: Query<(&PackshotLabel, &mut ValueLabel), Without<MoneyLabel>>,
    nodes: Query<(Entity, &SceneNode, &Transform), Without<Character>>,
    mut visibility: MessageWriter<SetNodeVisibilityEvent>,
    mut sounds: MessageWriter<PlaySoundEvent>,
    mut reached: MessageWriter<MilestoneReachedEvent>,
) {
    let Ok(character) = characters.single() else {
        return;
    };
    let dt = time.delta_secs();
    let character_x = character.translation.x;

    for mut marker in &mut milestones {
        for effect in marker.milestone.update(dt, character_x) {
            match effect {
                MilestoneEffect::Activated { name } => {
                    reached.write(MilestoneReachedEvent { name });
                }
                MilestoneEffect::ShowNode(name) => {
                    visibility.write(SetNodeVisibilityEvent {
                        name,
                        visible: true,
                    });
                }
                MilestoneEffect::RampMoney { target, duration } => {
                    for mut label in &mut money_labels {
                        label.value.animate_to(target, duration);
                    }
                }
                MilestoneEffect::RampPackshot { from, to, duration } => {
                    let owner = marker.milestone.name();
                    for (packshot, mut label) in &mut packshot_labels {
                        if packshot.milestone == owner {
                            label.value.set_value(from);
                            label.value.animate_to(to, duration);
                        }
                    }
                }
                MilestoneEffect::DropSprite {
                    node,
                    offset_y,
                    duration,
                } => {
                    let Some((entity, _, transform)) = nodes.iter().find(|(_, n, _)| n.name == node)
                    else {
                        tracing::debug!("[milestone] No drop sprite named '{}'", node);
                        continue;
                    };
                    let start = transform.translation;
                    let end = start + Vec3::new(0.0, offset_y, 0.0);
                    // Inserting replaces any running tween on the node
                    commands
                        .entity(entity)
                        .insert(TranslationTween(Tween::linear(start, end, duration)));
                }
                MilestoneEffect::PlaySound(name) => {
                    sounds.write(PlaySoundEvent { name });
                }
            }
        }
    }
}
