//! Per-tick movement state, actor input and the emitted motion command.

use std::fmt;

use nav_core::{Point3, Vector3};

/// Movement state.  `Stuck` and `Slowing` are sub-states of "wants to move".
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum MoveState {
    #[default]
    Stopped,
    Moving,
    Stuck,
    Slowing,
}

impl MoveState {
    pub fn as_str(self) -> &'static str {
        match self {
            MoveState::Stopped => "stopped",
            MoveState::Moving  => "moving",
            MoveState::Stuck   => "stuck",
            MoveState::Slowing => "slowing",
        }
    }

    /// `true` for every state except `Stopped`.
    #[inline]
    pub fn wants_to_move(self) -> bool {
        self != MoveState::Stopped
    }
}

impl fmt::Display for MoveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pending jump request.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum JumpState {
    #[default]
    None,
    /// Jump on the next command.
    Now,
    /// Jump as soon as the actor leaves the ground (walking off a ledge).
    Ledge,
}

/// What the physical actor reports to the controller each tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ActorState {
    pub position: Point3,
    /// Current facing, returned unchanged when nothing else sets a heading.
    pub yaw:      f32,
    pub grounded: bool,
}

impl ActorState {
    pub fn at(position: Point3) -> Self {
        Self { position, yaw: 0.0, grounded: true }
    }
}

/// Abstract motion input for the physical actor.
///
/// `direction` is a unit vector in the ground plane (zero when holding
/// position) and `throttle` scales the actor's maximum speed.  Heading and
/// movement are independent: an agent may strafe while aiming elsewhere.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MotionCommand {
    pub yaw:       f32,
    pub pitch:     f32,
    pub direction: Vector3,
    pub throttle:  f32,
    pub jump:      bool,
}

impl MotionCommand {
    /// Hold position facing `yaw`.
    pub fn hold(yaw: f32) -> Self {
        Self { yaw, pitch: 0.0, direction: Vector3::zeros(), throttle: 0.0, jump: false }
    }

    /// World-space velocity for an actor whose full throttle is `max_speed`.
    #[inline]
    pub fn velocity(&self, max_speed: f32) -> Vector3 {
        self.direction * (self.throttle * max_speed)
    }
}
