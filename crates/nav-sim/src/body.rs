//! The simulated physical actor a controller drives.
//!
//! Movement is kinematic: the commanded velocity is applied for one step
//! unless the end point lies inside an occluder, in which case the body
//! stays put.  Stalls against walls are what the stuck detector exists for.
//! Jumps are airtime only; the body never leaves its plane.

use nav_agent::{ActorState, MotionCommand};
use nav_core::{EntityId, Point3};
use nav_world::SceneMap;

/// Ticks spent airborne after a jump.
pub const DEFAULT_HOP_TICKS: u32 = 3;

#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub entity:        EntityId,
    pub position:      Point3,
    pub yaw:           f32,
    pub pitch:         f32,
    /// Ground speed at full throttle, in metres per second.
    pub max_speed:     f32,
    pub hop_ticks:     u32,
    /// Total jumps taken.
    pub jumps:         u32,
    /// Steps refused because they ended inside an occluder.
    pub blocked_steps: u32,
    airborne:          u32,
}

impl Body {
    pub fn new(entity: EntityId, position: Point3, max_speed: f32) -> Self {
        Self {
            entity,
            position,
            yaw: 0.0,
            pitch: 0.0,
            max_speed,
            hop_ticks: DEFAULT_HOP_TICKS,
            jumps: 0,
            blocked_steps: 0,
            airborne: 0,
        }
    }

    #[inline]
    pub fn grounded(&self) -> bool {
        self.airborne == 0
    }

    /// What the controller sees of this body.
    pub fn actor_state(&self) -> ActorState {
        ActorState { position: self.position, yaw: self.yaw, grounded: self.grounded() }
    }

    /// Apply `cmd` for `dt` seconds.  Returns `true` if the body moved.
    pub fn integrate(&mut self, cmd: &MotionCommand, dt: f32, scene: &SceneMap) -> bool {
        self.yaw = cmd.yaw;
        self.pitch = cmd.pitch;

        self.airborne = self.airborne.saturating_sub(1);
        if cmd.jump && self.grounded() {
            self.airborne = self.hop_ticks;
            self.jumps += 1;
        }

        let step = cmd.velocity(self.max_speed) * dt;
        if step.norm_squared() <= f32::EPSILON * f32::EPSILON {
            return false;
        }
        let next = self.position + step;
        if scene.is_blocked(&next) {
            self.blocked_steps += 1;
            return false;
        }
        self.position = next;
        true
    }
}
