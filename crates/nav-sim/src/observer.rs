//! `SimObserver`: hooks into the tick loop for output and progress.

use nav_agent::NavEvent;
use nav_core::{AgentId, Tick};

use crate::SimAgent;

/// Hooks called by [`Sim::run`][crate::Sim::run] at key points in each tick.
///
/// All methods have default no-op implementations, so implementors only
/// override what they need.
pub trait SimObserver {
    /// Called at the start of each tick, before any agent is driven.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after every agent has moved.  `moving` is the number of
    /// agents whose move state wants motion.
    fn on_tick_end(&mut self, _tick: Tick, _moving: usize) {}

    /// Called for every event a controller dispatches, before the director
    /// sees it.
    fn on_event(&mut self, _tick: Tick, _agent: AgentId, _event: &NavEvent) {}

    /// Called every `snapshot_interval_ticks` ticks (if > 0) with read access
    /// to every agent.
    fn on_snapshot(&mut self, _tick: Tick, _agents: &[SimAgent]) {}

    /// Called once after the final tick.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A `SimObserver` that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
