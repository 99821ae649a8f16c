//! Deterministic per-agent RNG.
//!
//! The navigation core itself is deterministic; randomness only enters
//! through the behaviour layer that picks goals (wander points, patrol
//! jitter).  Each agent gets its own `SmallRng` seeded by
//!
//!   seed = global_seed XOR (agent_id * MIXING_CONSTANT)
//!
//! so adding agents never disturbs the streams of existing ones.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{AgentId, Point3};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-agent deterministic RNG.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed and an agent ID.
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        let seed = global_seed ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform point in the horizontal disc of `radius` around `center`.
    /// The returned point keeps `center.z`.
    pub fn point_in_disc(&mut self, center: Point3, radius: f32) -> Point3 {
        let radius = radius.abs();
        if radius <= f32::EPSILON {
            return center;
        }
        let angle = self.0.gen_range(0.0..std::f32::consts::TAU);
        // sqrt keeps the density uniform over the area.
        let r = radius * self.0.r#gen::<f32>().sqrt();
        Point3::new(center.x + r * angle.cos(), center.y + r * angle.sin(), center.z)
    }

    /// Choose a random element from a slice; `None` if it is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}
