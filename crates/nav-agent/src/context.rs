//! Collaborators borrowed by the controller for the duration of one call.

use nav_core::Tick;
use nav_world::{CoverRegistry, PathService, SceneQuery};

/// The world as seen by one controller call.
///
/// Built by the caller (usually the simulation loop) for each tick and for
/// each goal-setting call.  The path service and cover registry are
/// borrowed mutably because clearing a session releases owned paths and
/// reservations immediately.
pub struct NavContext<'a> {
    /// Current simulation tick, used for log lines only.
    pub tick: Tick,

    pub scene: &'a dyn SceneQuery,

    pub paths: &'a mut dyn PathService,

    pub cover: &'a mut dyn CoverRegistry,
}

impl<'a> NavContext<'a> {
    #[inline]
    pub fn new(
        tick:  Tick,
        scene: &'a dyn SceneQuery,
        paths: &'a mut dyn PathService,
        cover: &'a mut dyn CoverRegistry,
    ) -> Self {
        Self { tick, scene, paths, cover }
    }
}
