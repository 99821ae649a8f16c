//! Precomputed paths.

use nav_core::{LinkFlags, MeshId, Point3};

/// One node of a path.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Waypoint {
    pub position: Point3,
    /// Link kind of the segment that *leaves* this waypoint.  Meaningless on
    /// the last node of a non-looping path.
    pub link: LinkFlags,
}

impl Waypoint {
    pub fn new(position: Point3, link: LinkFlags) -> Self {
        Self { position, link }
    }

    /// A waypoint whose outgoing segment is plain walking.
    pub fn walk(position: Point3) -> Self {
        Self { position, link: LinkFlags::WALK }
    }
}

/// An ordered, indexable sequence of waypoints from `from` to `to`.
///
/// Paths are produced by a [`PathService`][crate::PathService] or built by
/// hand (patrol routes).  A looping path wraps back to its first node
/// instead of ending.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    pub from:      Point3,
    pub to:        Point3,
    pub waypoints: Vec<Waypoint>,
    pub looping:   bool,
    /// Mesh the path was planned on, if any.
    pub mesh:      Option<MeshId>,
}

impl Path {
    /// Build a path through `waypoints`; `from`/`to` are taken from the first
    /// and last node (origin for an empty path).
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        let from = waypoints.first().map(|w| w.position).unwrap_or_else(Point3::origin);
        let to   = waypoints.last().map(|w| w.position).unwrap_or_else(Point3::origin);
        Self { from, to, waypoints, looping: false, mesh: None }
    }

    /// Walking path through plain points.
    pub fn from_points<I: IntoIterator<Item = Point3>>(points: I) -> Self {
        Self::new(points.into_iter().map(Waypoint::walk).collect())
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn on_mesh(mut self, mesh: MeshId) -> Self {
        self.mesh = Some(mesh);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    #[inline]
    pub fn node(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    /// Link flags of the segment from node `index` to the next one.
    pub fn segment_flags(&self, index: usize) -> LinkFlags {
        self.waypoints.get(index).map(|w| w.link).unwrap_or(LinkFlags::NONE)
    }

    /// Union of the link kinds used by every segment.
    pub fn links_used(&self) -> LinkFlags {
        let segments = if self.looping { self.len() } else { self.len().saturating_sub(1) };
        self.waypoints
            .iter()
            .take(segments)
            .fold(LinkFlags::NONE, |acc, w| acc | w.link)
    }

    /// Total length along the waypoints.
    pub fn length(&self) -> f32 {
        self.waypoints
            .windows(2)
            .map(|pair| (pair[1].position - pair[0].position).norm())
            .sum()
    }
}
