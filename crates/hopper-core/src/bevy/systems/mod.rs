//! Systems for hopper.
//!
//! Organized by functionality:
//! - command: Command queue processing from the host
//! - level_loader: Level spawning and teardown
//! - jump: Jump requests, motion and effect dispatch
//! - camera: Adaptive camera tracking and viewport sync
//! - milestone: Milestone activation and label ramps
//! - scene: Node visibility, layouts, delayed reveals, tweens
//! - controls: Control lock and idle loop
//! - report: Lifecycle report for the host

pub mod camera;
pub mod command;
pub mod controls;
pub mod jump;
pub mod level_loader;
pub mod milestone;
pub mod report;
pub mod scene;

pub use camera::*;
pub use command::*;
pub use controls::*;
pub use jump::*;
pub use level_loader::*;
pub use milestone::*;
pub use report::*;
pub use scene::*;
