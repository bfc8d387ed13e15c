//! Bevy integration for hopper.
//!
//! This module schedules the jump sequencer and camera tracker as ECS systems
//! and maps their effects onto scene entities (clips, sounds, nodes, labels).

pub mod components;
pub mod events;
pub mod plugin;
pub mod resources;
pub mod systems;

#[cfg(test)]
pub(crate) mod test_utils;

pub use components::*;
pub use events::*;
#[cfg(feature = "windowed")]
pub use plugin::HopperPlugin;
pub use plugin::HopperHeadlessPlugin;
pub use resources::*;
