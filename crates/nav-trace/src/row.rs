//! Plain data row types written by trace backends.

use nav_agent::{MoveState, NavMode};

/// One agent's pose and navigation state at a given tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotRow {
    pub tick:       u64,
    pub agent_id:   u32,
    pub x:          f32,
    pub y:          f32,
    pub z:          f32,
    pub yaw:        f32,
    pub move_state: MoveState,
    pub mode:       NavMode,
}

/// A navigation event raised by one agent.  `event` is the event's display
/// form, e.g. `path_failed: no route ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub tick:     u64,
    pub agent_id: u32,
    pub event:    String,
}
