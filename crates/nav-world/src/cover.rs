//! Cover points: static positions an agent can claim and hide at.
//!
//! # Reservation
//!
//! A cover point is held by at most one agent at a time.  The agent that
//! chooses a point reserves it before travelling there and releases it when
//! it switches to another goal or stops.  Another agent searching for cover
//! skips reserved points.
//!
//! # Spatial index
//!
//! [`CoverField`] keeps an R-tree (via `rstar`) over point positions so a
//! nearest-within-radius query touches only the closest candidates.

use std::collections::BTreeMap;

use log::debug;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use nav_core::{AgentId, CoverId, Point3};

use crate::{WorldError, WorldResult};

// ── Types ─────────────────────────────────────────────────────────────────────

/// One registered cover point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CoverPoint {
    pub id:          CoverId,
    pub position:    Point3,
    /// Disabled points are never returned by searches.
    pub enabled:     bool,
    pub reserved_by: Option<AgentId>,
}

/// Parameters of a nearest-cover search.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CoverQuery {
    pub from:             Point3,
    pub radius:           f32,
    /// Skip points held by an agent other than `requester`.
    pub exclude_reserved: bool,
    pub requester:        AgentId,
}

// ── CoverRegistry trait ───────────────────────────────────────────────────────

/// Lookup and reservation of cover points.
pub trait CoverRegistry {
    /// Nearest eligible point within `query.radius` of `query.from`.
    /// Equidistant candidates resolve to the lowest `CoverId`.
    fn find_nearest(&self, query: &CoverQuery) -> Option<CoverId>;

    /// Current position of a point; `None` once it has been removed.
    fn position(&self, id: CoverId) -> Option<Point3>;

    fn reserved_by(&self, id: CoverId) -> Option<AgentId>;

    /// Claim a point.  Returns `false` if it is missing, disabled, or held by
    /// another agent.  Re-reserving one's own point succeeds.
    fn reserve(&mut self, id: CoverId, agent: AgentId) -> bool;

    /// Drop `agent`'s claim.  A no-op if `agent` does not hold the point.
    fn release(&mut self, id: CoverId, agent: AgentId);
}

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone, PartialEq)]
struct CoverEntry {
    point: [f32; 3],
    id:    CoverId,
}

impl RTreeObject for CoverEntry {
    type Envelope = AABB<[f32; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for CoverEntry {
    fn distance_2(&self, point: &[f32; 3]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

#[inline]
fn key(p: &Point3) -> [f32; 3] {
    [p.x, p.y, p.z]
}

// ── CoverField ────────────────────────────────────────────────────────────────

/// In-memory cover registry.
#[derive(Default)]
pub struct CoverField {
    points: BTreeMap<CoverId, CoverPoint>,
    index:  RTree<CoverEntry>,
}

impl CoverField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an enabled, unreserved point.
    pub fn insert(&mut self, id: CoverId, position: Point3) -> WorldResult<()> {
        if self.points.contains_key(&id) {
            return Err(WorldError::DuplicateCover(id));
        }
        self.points.insert(id, CoverPoint { id, position, enabled: true, reserved_by: None });
        self.index.insert(CoverEntry { point: key(&position), id });
        Ok(())
    }

    /// Remove a point.  Agents holding it notice on their next tick.
    pub fn remove(&mut self, id: CoverId) -> WorldResult<CoverPoint> {
        let point = self.points.remove(&id).ok_or(WorldError::UnknownCover(id))?;
        self.index.remove(&CoverEntry { point: key(&point.position), id });
        debug!("cover {id} removed (held by {:?})", point.reserved_by);
        Ok(point)
    }

    pub fn set_enabled(&mut self, id: CoverId, enabled: bool) -> WorldResult<()> {
        let point = self.points.get_mut(&id).ok_or(WorldError::UnknownCover(id))?;
        point.enabled = enabled;
        Ok(())
    }

    pub fn get(&self, id: CoverId) -> Option<&CoverPoint> {
        self.points.get(&id)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CoverPoint> {
        self.points.values()
    }

    fn eligible(&self, id: CoverId, query: &CoverQuery) -> bool {
        self.points.get(&id).is_some_and(|p| {
            p.enabled
                && !(query.exclude_reserved
                    && p.reserved_by.is_some_and(|holder| holder != query.requester))
        })
    }
}

impl CoverRegistry for CoverField {
    fn find_nearest(&self, query: &CoverQuery) -> Option<CoverId> {
        if !(query.radius > 0.0) {
            return None;
        }
        let r2 = query.radius * query.radius;
        let mut best: Option<(f32, CoverId)> = None;

        for (entry, d2) in self.index.nearest_neighbor_iter_with_distance_2(&key(&query.from)) {
            if d2 > r2 {
                break;
            }
            if let Some((best_d2, _)) = best {
                if d2 > best_d2 {
                    break;
                }
            }
            if !self.eligible(entry.id, query) {
                continue;
            }
            best = match best {
                Some((bd2, bid)) if bd2 == d2 && bid < entry.id => Some((bd2, bid)),
                _ => Some((d2, entry.id)),
            };
        }
        best.map(|(_, id)| id)
    }

    fn position(&self, id: CoverId) -> Option<Point3> {
        self.points.get(&id).map(|p| p.position)
    }

    fn reserved_by(&self, id: CoverId) -> Option<AgentId> {
        self.points.get(&id).and_then(|p| p.reserved_by)
    }

    fn reserve(&mut self, id: CoverId, agent: AgentId) -> bool {
        let Some(point) = self.points.get_mut(&id) else {
            return false;
        };
        match point.reserved_by {
            _ if !point.enabled => false,
            Some(holder) if holder != agent => false,
            _ => {
                point.reserved_by = Some(agent);
                true
            }
        }
    }

    fn release(&mut self, id: CoverId, agent: AgentId) {
        if let Some(point) = self.points.get_mut(&id) {
            if point.reserved_by == Some(agent) {
                point.reserved_by = None;
            }
        }
    }
}
