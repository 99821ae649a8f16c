//! `nav-sim`: fixed-step driver for navigation controllers.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   for each agent in ascending AgentId order:
//!     ① Direct  : Director::on_tick may set goals, stop, repath, aim.
//!     ② Compute : NavigationController::compute turns the goal into a
//!                 MotionCommand.
//!     ③ Dispatch: queued NavEvents go to the SimObserver, then to the
//!                 Director, which may react through the controller.
//!     ④ Move    : position += direction × throttle × max_speed × dt,
//!                 refused when the step would end inside an occluder.
//!     ⑤ Publish : the new position is written back to the scene so other
//!                 agents see it on their turn.
//!   snapshot every `snapshot_interval_ticks`.
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use nav_core::{NavConfig, Point3, SimConfig};
//! use nav_sim::{NoopObserver, SimBuilder};
//! use nav_world::{CoverField, DirectPathService, MeshCatalog};
//!
//! let paths = DirectPathService::new(catalog);
//! let mut sim = SimBuilder::new(config, MyDirector, paths, CoverField::new())
//!     .agent(EntityId(1), Point3::origin(), NavConfig::default(), 3.0)
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod body;
pub mod builder;
pub mod director;
pub mod error;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use body::Body;
pub use builder::SimBuilder;
pub use director::{Director, IdleDirector};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{Sim, SimAgent};
