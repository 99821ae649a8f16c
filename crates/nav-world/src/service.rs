//! Path-service trait and the default straight-line implementation.
//!
//! # Pluggability
//!
//! The navigation controller asks for paths through the [`PathService`]
//! trait, so applications can plug in a real nav-mesh planner (Recast,
//! hierarchical A*, a remote planning worker) without touching the
//! controller.  The default [`DirectPathService`] is enough for open arenas
//! and tests.
//!
//! # Asynchronous results
//!
//! A request may answer `Pending(ticket)`.  The caller polls the ticket once
//! per tick; a cancelled ticket is forgotten by the service and polling it
//! afterwards yields [`PathError::UnknownTicket`].

use std::collections::HashMap;

use log::debug;
use nav_core::{LinkFlags, MeshId, NavSize, PathTicket, Point3};

use crate::mesh::MeshCatalog;
use crate::path::Path;
use crate::PathError;

// ── Request / response ────────────────────────────────────────────────────────

/// Everything a planner needs to find a path for one agent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PathRequest {
    pub from:  Point3,
    pub to:    Point3,
    pub size:  NavSize,
    /// Link kinds the agent may traverse.
    pub links: LinkFlags,
    /// Mesh the agent currently stands on, when already resolved.
    pub mesh:  Option<MeshId>,
}

/// Outcome of a request or poll.
#[derive(Clone, Debug, PartialEq)]
pub enum PathPoll {
    Ready(Path),
    Pending(PathTicket),
    Failed(PathError),
}

// ── PathService trait ─────────────────────────────────────────────────────────

/// Pluggable path planner.
pub trait PathService {
    /// The mesh an agent of class `size` standing at `position` navigates on.
    fn mesh_for(&self, position: &Point3, size: NavSize) -> Option<MeshId>;

    /// Ask for a path.  May resolve inline or hand back a ticket.
    fn request(&mut self, request: &PathRequest) -> PathPoll;

    /// Check on a pending request.
    fn poll(&mut self, ticket: PathTicket) -> PathPoll;

    /// Abandon a pending request.  The result, if any, is discarded.
    fn cancel(&mut self, _ticket: PathTicket) {}

    /// Return a path the caller no longer uses.
    fn release(&mut self, _path: Path) {}
}

// ── DirectPathService ─────────────────────────────────────────────────────────

#[derive(Debug)]
struct Deferred {
    request:   PathRequest,
    remaining: u32,
}

/// Straight-line planner over a [`MeshCatalog`].
///
/// A request succeeds with the two-node path `[from, to]` when both ends lie
/// inside the agent's mesh and the agent may walk.  Routes registered with
/// [`add_route`](Self::add_route) take precedence for their destination,
/// which lets tests and demos hand out multi-node paths with link flags.
///
/// With a non-zero [`latency`](Self::with_latency) every request answers
/// `Pending` and resolves after that many polls.
#[derive(Debug, Default)]
pub struct DirectPathService {
    catalog:     MeshCatalog,
    routes:      Vec<Path>,
    latency:     u32,
    pending:     HashMap<PathTicket, Deferred>,
    next_ticket: u32,
    /// Number of requests received.
    pub requests: usize,
    /// Number of paths handed back through `release`.
    pub released: usize,
}

/// Destination match tolerance for canned routes.
const ROUTE_MATCH_EPS: f32 = 1e-3;

impl DirectPathService {
    pub fn new(catalog: MeshCatalog) -> Self {
        Self { catalog, ..Self::default() }
    }

    /// Resolve every request after `polls` calls to [`PathService::poll`].
    pub fn with_latency(mut self, polls: u32) -> Self {
        self.latency = polls;
        self
    }

    pub fn catalog(&self) -> &MeshCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut MeshCatalog {
        &mut self.catalog
    }

    /// Serve `path` for any request whose destination is `path.to`.
    pub fn add_route(&mut self, path: Path) {
        self.routes.push(path);
    }

    /// Number of requests still waiting on a poll.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn resolve(&self, request: &PathRequest) -> PathPoll {
        let Some(mesh) = request.mesh.or_else(|| self.catalog.find(&request.from, request.size))
        else {
            return PathPoll::Failed(PathError::no_mesh(request.size, &request.from));
        };

        if let Some(route) = self
            .routes
            .iter()
            .find(|r| (r.to - request.to).norm() <= ROUTE_MATCH_EPS)
        {
            if !request.links.contains(route.links_used()) {
                return PathPoll::Failed(PathError::LinksRejected);
            }
            return PathPoll::Ready(route.clone().on_mesh(mesh));
        }

        if !request.links.contains(LinkFlags::WALK) {
            return PathPoll::Failed(PathError::LinksRejected);
        }
        if !self.catalog.contains(mesh, &request.from) || !self.catalog.contains(mesh, &request.to) {
            return PathPoll::Failed(PathError::no_route(&request.from, &request.to));
        }
        PathPoll::Ready(Path::from_points([request.from, request.to]).on_mesh(mesh))
    }
}

impl PathService for DirectPathService {
    fn mesh_for(&self, position: &Point3, size: NavSize) -> Option<MeshId> {
        self.catalog.find(position, size)
    }

    fn request(&mut self, request: &PathRequest) -> PathPoll {
        self.requests += 1;
        if self.latency == 0 {
            return self.resolve(request);
        }
        let ticket = PathTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending.insert(ticket, Deferred { request: *request, remaining: self.latency });
        debug!("path request {ticket} deferred for {} polls", self.latency);
        PathPoll::Pending(ticket)
    }

    fn poll(&mut self, ticket: PathTicket) -> PathPoll {
        let Some(deferred) = self.pending.get_mut(&ticket) else {
            return PathPoll::Failed(PathError::UnknownTicket(ticket));
        };
        deferred.remaining = deferred.remaining.saturating_sub(1);
        if deferred.remaining > 0 {
            return PathPoll::Pending(ticket);
        }
        match self.pending.remove(&ticket) {
            Some(done) => self.resolve(&done.request),
            None => PathPoll::Failed(PathError::UnknownTicket(ticket)),
        }
    }

    fn cancel(&mut self, ticket: PathTicket) {
        if self.pending.remove(&ticket).is_some() {
            debug!("path request {ticket} cancelled");
        }
    }

    fn release(&mut self, _path: Path) {
        self.released += 1;
    }
}
