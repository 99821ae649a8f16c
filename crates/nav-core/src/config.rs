//! Per-agent navigation options.
//!
//! `NavConfig` is the configuration surface the owning agent sets on its
//! controller: throttle scale, arrival radius, stuck-check sensitivity,
//! slowdown behaviour and the navigation profile.

use crate::{LinkFlags, NavError, NavResult, NavSize};

/// Navigation options for one agent.
///
/// Typically loaded from a JSON file by the application and handed to the
/// controller; every field can also be changed later through the
/// controller's setters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NavConfig {
    /// Desired throttle scale, `0..=1`.
    pub move_speed: f32,

    /// Arrival radius around a destination or path node (world units).
    pub move_tolerance: f32,

    /// Minimum displacement expected over one stuck-test interval.
    pub stuck_tolerance: f32,

    /// Grace period (ticks) between stuck checks.  Values below 1 are
    /// treated as 1.
    pub stuck_test_delay: u32,

    /// Slow down when approaching the final destination.
    pub slowdown_enabled: bool,

    /// The slowdown zone extends to `slowdown_factor * move_tolerance` from
    /// the destination.  Throttle scales linearly with distance inside it.
    pub slowdown_factor: f32,

    /// Size class used to pick a nav mesh.
    pub nav_size: NavSize,

    /// Link kinds this agent may traverse.
    pub link_types: LinkFlags,

    /// Standoff distance used by `follow_object` when none is given.
    pub follow_radius: f32,

    /// Height of the eye above the actor's position, for line-of-sight.
    pub eye_height: f32,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            move_speed:       1.0,
            move_tolerance:   0.25,
            stuck_tolerance:  0.01,
            stuck_test_delay: 30,
            slowdown_enabled: true,
            slowdown_factor:  5.0,
            nav_size:         NavSize::Regular,
            link_types:       LinkFlags::ALL,
            follow_radius:    5.0,
            eye_height:       1.6,
        }
    }
}

impl NavConfig {
    /// Reject values the controller cannot work with.
    pub fn validate(&self) -> NavResult<()> {
        let finite = [
            ("move_speed", self.move_speed),
            ("move_tolerance", self.move_tolerance),
            ("stuck_tolerance", self.stuck_tolerance),
            ("slowdown_factor", self.slowdown_factor),
            ("follow_radius", self.follow_radius),
            ("eye_height", self.eye_height),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(NavError::Config(format!("{name} must be finite, got {value}")));
            }
        }
        if !(0.0..=1.0).contains(&self.move_speed) {
            return Err(NavError::Config(format!(
                "move_speed must be within 0..=1, got {}",
                self.move_speed
            )));
        }
        if self.move_tolerance < 0.0 {
            return Err(NavError::Config(format!(
                "move_tolerance must be >= 0, got {}",
                self.move_tolerance
            )));
        }
        if self.stuck_tolerance < 0.0 {
            return Err(NavError::Config(format!(
                "stuck_tolerance must be >= 0, got {}",
                self.stuck_tolerance
            )));
        }
        if self.slowdown_factor < 1.0 {
            return Err(NavError::Config(format!(
                "slowdown_factor must be >= 1, got {}",
                self.slowdown_factor
            )));
        }
        if self.follow_radius < 0.0 {
            return Err(NavError::Config(format!(
                "follow_radius must be >= 0, got {}",
                self.follow_radius
            )));
        }
        Ok(())
    }

    /// Radius of the slowdown zone around a destination.
    #[inline]
    pub fn slowdown_radius(&self) -> f32 {
        self.move_tolerance * self.slowdown_factor
    }
}
