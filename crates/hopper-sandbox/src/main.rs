//! Hopper Sandbox
//!
//! Plays a level headless: loads it, jumps through every waypoint as soon as
//! the character is idle and waits for the celebration.
//!
//! Usage: `hopper-sandbox [level.json]`. Without an argument the bundled demo
//! level is played.

use std::time::Duration;

use anyhow::{Context, Result};
use bevy::prelude::*;
use hopper_core::FRAME_DT;
use hopper_core::bevy::{
    CommandQueue, HopperCommand, HopperHeadlessPlugin, JumpControls, Jumper, TraversalReport,
};
use hopper_core::config::HopperConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEMO_LEVEL: &str = include_str!("../levels/demo.json");

/// Upper bound on simulated frames (one minute at 60 Hz).
const MAX_FRAMES: usize = 60 * 60;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = load_config(std::env::args().nth(1))?;
    if let Err(e) = config.validate() {
        tracing::warn!("[sandbox] Level has issues, playing anyway: {}", e);
    }

    let report = play(config);
    let summary = serde_json::json!({
        "landed": report.landed,
        "completions": report.completions,
        "celebrations": report.celebrations,
        "sounds": report.sounds,
        "milestones": report.milestones,
        "orientation_changes": report
            .orientation_changes
            .iter()
            .map(|o| format!("{o:?}"))
            .collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn load_config(path: Option<String>) -> Result<HopperConfig> {
    let Some(path) = path else {
        tracing::info!("[sandbox] Playing bundled demo level");
        return HopperConfig::from_json(DEMO_LEVEL).context("bundled demo level is invalid");
    };
    let json = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    HopperConfig::from_json(&json).with_context(|| format!("parsing {path}"))
}

fn play(config: HopperConfig) -> TraversalReport {
    let queue = CommandQueue::new();
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(HopperHeadlessPlugin::new(queue.clone()));
    // Frames are driven by hand below
    app.world_mut().resource_mut::<Time<Virtual>>().pause();
    app.update();

    queue.push(HopperCommand::LoadLevel { config });
    app.update();

    let timestep = Duration::from_secs_f32(FRAME_DT);
    let mut requested_after: Option<usize> = None;

    for frame in 0..MAX_FRAMES {
        app.world_mut()
            .resource_mut::<Time<Fixed>>()
            .accumulate_overstep(timestep);
        app.update();

        let report = app.world().resource::<TraversalReport>();
        if report.celebrations > 0 {
            tracing::info!("[sandbox] Celebration reached after {} frames", frame + 1);
            break;
        }
        let landed = report.landed.len();

        let controls = *app.world().resource::<JumpControls>();
        let world = app.world_mut();
        let mut jumpers = world.query::<&Jumper>();
        let Some(jumper) = jumpers.iter(world).next() else {
            tracing::warn!("[sandbox] Level has no active jumper, stopping");
            break;
        };
        let sequencer = &jumper.sequencer;

        let ready = controls.enabled
            && sequencer.is_idle()
            && sequencer.next_index().is_some()
            && requested_after != Some(landed);
        if ready {
            queue.push(HopperCommand::JumpNext);
            requested_after = Some(landed);
        }
    }

    app.world().resource::<TraversalReport>().clone()
}
