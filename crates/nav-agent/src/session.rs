//! The navigation sessions and the tagged union that keeps them exclusive.
//!
//! | Session         | Holds                                      | Owns                        |
//! |-----------------|--------------------------------------------|-----------------------------|
//! | `PathSession`   | route + index of the next unreached node   | the path, when requested    |
//! | `CoverSession`  | cover id + a `PathSession` toward it       | nothing beyond its route    |
//! | `FollowSession` | target entity + standoff radius            | nothing                     |
//!
//! A session is disposed by value through [`PathSession::dispose`], which
//! is the only place an owned path goes back to the path service.

use std::fmt;
use std::sync::{Arc, Weak};

use nav_core::{CoverId, EntityId, LinkFlags, PathTicket, Point3, geom::planar_distance};
use nav_world::{Path, PathService};

// ── PathSession ───────────────────────────────────────────────────────────────

/// Where the waypoints come from.
#[derive(Debug)]
enum PathSource {
    /// Requested by the controller; handed back to the service on disposal.
    Owned(Path),
    /// Supplied by the caller, who keeps it alive.
    Shared(Weak<Path>),
}

#[derive(Debug)]
enum Route {
    Active { source: PathSource, index: usize },
    /// A replacement path has been requested and not delivered yet.
    Awaiting(PathTicket),
}

/// Result of one [`PathSession::advance`] step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Advance {
    /// Steer toward `node`.  `crossed` carries the link flags of the
    /// segment just entered when a node was reached this step.
    Toward { node: Point3, last: bool, crossed: Option<LinkFlags> },
    Finished,
    /// A caller-supplied path was dropped by its owner.
    Lost,
    Waiting,
}

/// An active path plus the index of the next unreached node.
#[derive(Debug)]
pub struct PathSession {
    destination: Point3,
    route:       Route,
}

impl PathSession {
    pub fn owned(path: Path) -> Self {
        Self { destination: path.to, route: Route::Active { source: PathSource::Owned(path), index: 0 } }
    }

    pub fn shared(path: &Arc<Path>) -> Self {
        Self {
            destination: path.to,
            route:       Route::Active { source: PathSource::Shared(Arc::downgrade(path)), index: 0 },
        }
    }

    /// A session whose path is still being computed.
    pub fn awaiting(destination: Point3, ticket: PathTicket) -> Self {
        Self { destination, route: Route::Awaiting(ticket) }
    }

    /// Final destination of the route.
    #[inline]
    pub fn destination(&self) -> Point3 {
        self.destination
    }

    /// `true` if disposing this session hands a path back to the service.
    pub fn owns_path(&self) -> bool {
        matches!(self.route, Route::Active { source: PathSource::Owned(_), .. })
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.route {
            Route::Active { index, .. } => Some(index),
            Route::Awaiting(_) => None,
        }
    }

    pub fn awaiting_ticket(&self) -> Option<PathTicket> {
        match self.route {
            Route::Awaiting(ticket) => Some(ticket),
            Route::Active { .. } => None,
        }
    }

    /// Swap in a freshly delivered owned path, starting from node 0.  The
    /// previous route is disposed.
    pub fn install(&mut self, path: Path, paths: &mut dyn PathService) {
        self.destination = path.to;
        let old = std::mem::replace(
            &mut self.route,
            Route::Active { source: PathSource::Owned(path), index: 0 },
        );
        Self::dispose_route(old, paths);
    }

    /// Step along the route from `position`.
    ///
    /// At most one node is consumed per call.  Reaching the last node of a
    /// looping path wraps the index to 0.
    pub fn advance(&mut self, position: &Point3, tolerance: f32) -> Advance {
        let Route::Active { source, index } = &mut self.route else {
            return Advance::Waiting;
        };
        match source {
            PathSource::Owned(path) => advance_on(path, index, position, tolerance),
            PathSource::Shared(weak) => match weak.upgrade() {
                Some(path) => advance_on(&path, index, position, tolerance),
                None => Advance::Lost,
            },
        }
    }

    /// Release whatever the session holds: an owned path goes back to the
    /// service, a pending request is cancelled.
    pub fn dispose(self, paths: &mut dyn PathService) {
        Self::dispose_route(self.route, paths);
    }

    fn dispose_route(route: Route, paths: &mut dyn PathService) {
        match route {
            Route::Active { source: PathSource::Owned(path), .. } => paths.release(path),
            Route::Active { source: PathSource::Shared(_), .. } => {}
            Route::Awaiting(ticket) => paths.cancel(ticket),
        }
    }
}

fn advance_on(path: &Path, index: &mut usize, position: &Point3, tolerance: f32) -> Advance {
    let Some(node) = path.node(*index) else {
        *index = path.len();
        return Advance::Finished;
    };

    let mut crossed = None;
    if planar_distance(position, &node.position) <= tolerance {
        crossed = Some(node.link);
        *index += 1;
        if *index >= path.len() {
            if !path.looping {
                return Advance::Finished;
            }
            *index = 0;
        }
    }

    match path.node(*index) {
        Some(next) => Advance::Toward {
            node: next.position,
            last: !path.looping && *index + 1 == path.len(),
            crossed,
        },
        None => Advance::Finished,
    }
}

// ── CoverSession / FollowSession ──────────────────────────────────────────────

/// Travel to a reserved cover point.  The point is revalidated every tick.
#[derive(Debug)]
pub struct CoverSession {
    pub cover: CoverId,
    pub route: PathSession,
}

/// Keep within `radius` of a moving entity.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FollowSession {
    pub target: EntityId,
    pub radius: f32,
}

// ── NavSession ────────────────────────────────────────────────────────────────

/// The single active navigation session.
#[derive(Debug, Default)]
pub enum NavSession {
    /// No session.  The agent may still be travelling to a direct
    /// destination.
    #[default]
    Idle,
    Path(PathSession),
    Cover(CoverSession),
    Follow(FollowSession),
}

impl NavSession {
    /// The route being followed, for path and cover sessions.
    pub fn route(&self) -> Option<&PathSession> {
        match self {
            NavSession::Path(route) => Some(route),
            NavSession::Cover(cover) => Some(&cover.route),
            NavSession::Idle | NavSession::Follow(_) => None,
        }
    }

    pub fn route_mut(&mut self) -> Option<&mut PathSession> {
        match self {
            NavSession::Path(route) => Some(route),
            NavSession::Cover(cover) => Some(&mut cover.route),
            NavSession::Idle | NavSession::Follow(_) => None,
        }
    }
}

/// Which movement intent is in charge.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum NavMode {
    Idle,
    Direct,
    Path,
    Cover,
    Follow,
}

impl NavMode {
    pub fn as_str(self) -> &'static str {
        match self {
            NavMode::Idle   => "idle",
            NavMode::Direct => "direct",
            NavMode::Path   => "path",
            NavMode::Cover  => "cover",
            NavMode::Follow => "follow",
        }
    }
}

impl fmt::Display for NavMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
