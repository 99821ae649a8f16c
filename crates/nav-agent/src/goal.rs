//! Destination and aim bookkeeping.

use nav_core::{EntityId, Point3, Vector3};

/// Where the agent is steering this tick, and how.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MotionGoal {
    pub destination:      Point3,
    /// Arrival radius, `>= 0`.
    pub tolerance:        f32,
    /// Desired throttle, `0..=1`.
    pub speed:            f32,
    pub slowdown_enabled: bool,
}

/// An entity to aim at, plus an offset from its origin (e.g. head height).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AimObject {
    pub entity: EntityId,
    pub offset: Vector3,
}

/// Aim target.  An object, while it exists, overrides the location.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct AimState {
    pub object:         Option<AimObject>,
    pub location:       Option<Point3>,
    /// Line of sight to the aim object at the last tick.  Advisory only.
    pub target_visible: bool,
}

impl AimState {
    pub fn is_set(&self) -> bool {
        self.object.is_some() || self.location.is_some()
    }
}
