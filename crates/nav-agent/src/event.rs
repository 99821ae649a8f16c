//! Lifecycle events and the observer that receives them.

use std::fmt;

use nav_core::{CoverId, EntityId};
use nav_world::PathError;

use crate::{NavContext, NavigationController};

/// Something the owning agent may want to react to.
#[derive(Clone, Debug, PartialEq)]
pub enum NavEvent {
    /// The direct destination, or the end of a path or cover route, was
    /// reached.  Fires once per goal.
    ReachedDestination,
    /// Progress stalled.  Fires once per stall.
    Stuck,
    /// A requested path was delivered and installed.
    PathSuccess,
    /// A path request failed, immediately or after it was pending.
    PathFailed(PathError),
    /// A caller-supplied path was dropped while being followed.
    PathLost,
    /// The cover point being approached was removed or taken.
    CoverLost(CoverId),
    /// The followed entity no longer exists.
    TargetLost(EntityId),
    TargetEnterLos(EntityId),
    TargetExitLos(EntityId),
}

impl fmt::Display for NavEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavEvent::ReachedDestination => f.write_str("reached_destination"),
            NavEvent::Stuck              => f.write_str("stuck"),
            NavEvent::PathSuccess        => f.write_str("path_success"),
            NavEvent::PathFailed(e)      => write!(f, "path_failed: {e}"),
            NavEvent::PathLost           => f.write_str("path_lost"),
            NavEvent::CoverLost(id)      => write!(f, "cover_lost: {id}"),
            NavEvent::TargetLost(id)     => write!(f, "target_lost: {id}"),
            NavEvent::TargetEnterLos(id) => write!(f, "target_enter_los: {id}"),
            NavEvent::TargetExitLos(id)  => write!(f, "target_exit_los: {id}"),
        }
    }
}

/// Receives controller events after each tick.
///
/// All methods have no-op defaults.  `on_event` sees every event; the two
/// lifecycle hooks are called right after it for their event.  The
/// controller is handed back mutably so a callback may stop the agent,
/// repath or set a new goal.
pub trait NavObserver {
    fn on_event(
        &mut self,
        _nav:   &mut NavigationController,
        _ctx:   &mut NavContext<'_>,
        _event: &NavEvent,
    ) {
    }

    fn on_reached_destination(&mut self, _nav: &mut NavigationController, _ctx: &mut NavContext<'_>) {}

    fn on_stuck(&mut self, _nav: &mut NavigationController, _ctx: &mut NavContext<'_>) {}
}

/// Ignores every event.
pub struct NoopObserver;

impl NavObserver for NoopObserver {}
