//! Simulation time model.
//!
//! Time is a monotonically increasing `Tick` counter.  Every navigation
//! decision happens inside exactly one tick; durations that matter to the
//! controller (the stuck-test grace period) are counted in ticks, never in
//! seconds.  `SimClock` maps ticks to seconds for the kinematic integration
//! done by the simulation harness.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self` (saturating).
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Fixed-rate clock: `tick_hz` ticks per simulated second.
#[derive(Clone, Debug)]
pub struct SimClock {
    pub tick_hz:      u32,
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(tick_hz: u32) -> Self {
        Self { tick_hz: tick_hz.max(1), current_tick: Tick::ZERO }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Seconds represented by one tick.
    #[inline]
    pub fn dt_secs(&self) -> f32 {
        1.0 / self.tick_hz as f32
    }

    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick.0 as f64 / self.tick_hz as f64
    }

    /// How many ticks span `secs` seconds (rounded up).
    #[inline]
    pub fn ticks_for_secs(&self, secs: f32) -> u64 {
        (secs.max(0.0) * self.tick_hz as f32).ceil() as u64
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2} s)", self.current_tick, self.elapsed_secs())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level configuration of a simulation run.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Ticks per simulated second.  Default: 32.
    pub tick_hz: u32,

    /// Total ticks to simulate.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical runs.
    pub seed: u64,

    /// Report an agent snapshot every N ticks.  `0` disables snapshots.
    pub snapshot_interval_ticks: u64,
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_hz)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_hz:                 32,
            total_ticks:             32 * 60,
            seed:                    0,
            snapshot_interval_ticks: 32,
        }
    }
}
