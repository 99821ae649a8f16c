//! Progress sampling.
//!
//! The detector anchors on the position where a check interval starts and,
//! after `delay` further samples, compares the current position against it.
//! The anchoring sample itself does not count toward the interval.  Too
//! little displacement means the agent is stuck; otherwise the anchor moves
//! up and a new interval begins.
//!
//! Recovery is not the detector's business.  Once a stall is reported the
//! controller stops sampling until movement restarts or the agent is seen
//! moving again (see [`displaced`](StuckDetector::displaced)).

use nav_core::Point3;

#[derive(Clone, Debug, PartialEq)]
pub struct StuckDetector {
    tolerance: f32,
    delay:     u32,
    countdown: u32,
    anchor:    Option<Point3>,
}

impl StuckDetector {
    pub fn new(tolerance: f32, delay: u32) -> Self {
        let delay = delay.max(1);
        Self { tolerance, delay, countdown: delay, anchor: None }
    }

    /// Change sensitivity.  Takes effect from the next interval.
    pub fn configure(&mut self, tolerance: f32, delay: u32) {
        self.tolerance = tolerance;
        self.delay = delay.max(1);
    }

    /// Start a fresh interval; the next sample becomes the anchor.
    pub fn reset(&mut self) {
        self.countdown = self.delay;
        self.anchor = None;
    }

    /// Record one tick at `position`.  Returns `true` when an interval ends
    /// with less than `tolerance` displacement.
    pub fn sample(&mut self, position: &Point3) -> bool {
        let Some(anchor) = self.anchor else {
            self.anchor = Some(*position);
            self.countdown = self.delay;
            return false;
        };
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return false;
        }
        self.countdown = self.delay;
        if (position - anchor).norm() < self.tolerance {
            return true;
        }
        self.anchor = Some(*position);
        false
    }

    /// `true` once `position` is at least `tolerance` away from the anchor.
    pub fn displaced(&self, position: &Point3) -> bool {
        self.anchor.is_some_and(|a| (position - a).norm() >= self.tolerance)
    }

    #[inline]
    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    #[inline]
    pub fn anchor(&self) -> Option<Point3> {
        self.anchor
    }
}
