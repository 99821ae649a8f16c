//! Unit tests for nav-world.
//!
//! Everything runs against the in-memory collaborators; no level data needed.

#[cfg(test)]
mod helpers {
    use nav_core::{Aabb, MeshId, NavSize, Point3};
    use crate::{MeshCatalog, NavMeshInfo};

    pub fn p(x: f32, y: f32) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    /// A 200 × 200 arena mesh plus a small building mesh inside it that only
    /// small and regular agents may use.
    pub fn arena() -> MeshCatalog {
        MeshCatalog::new()
            .with(NavMeshInfo::new(
                MeshId(0),
                Aabb::new(Point3::new(-100.0, -100.0, -5.0), Point3::new(100.0, 100.0, 5.0)),
            ))
            .with(
                NavMeshInfo::new(
                    MeshId(1),
                    Aabb::new(Point3::new(10.0, 10.0, -1.0), Point3::new(20.0, 20.0, 4.0)),
                )
                .for_sizes(&[NavSize::Small, NavSize::Regular]),
            )
    }
}

// ── Paths ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod path {
    use nav_core::LinkFlags;
    use super::helpers::p;
    use crate::{Path, Waypoint};

    #[test]
    fn endpoints_from_nodes() {
        let path = Path::from_points([p(0.0, 0.0), p(3.0, 4.0), p(3.0, 10.0)]);
        assert_eq!(path.from, p(0.0, 0.0));
        assert_eq!(path.to, p(3.0, 10.0));
        assert_eq!(path.len(), 3);
        assert!((path.length() - 11.0).abs() < 1e-5);
    }

    #[test]
    fn links_used_ignores_last_node_unless_looping() {
        let path = Path::new(vec![
            Waypoint::new(p(0.0, 0.0), LinkFlags::WALK),
            Waypoint::new(p(1.0, 0.0), LinkFlags::JUMP),
            Waypoint::new(p(2.0, 0.0), LinkFlags::SWIM),
        ]);
        assert_eq!(path.links_used(), LinkFlags::WALK | LinkFlags::JUMP);
        let looped = path.looping(true);
        assert!(looped.links_used().contains(LinkFlags::SWIM));
    }

    #[test]
    fn segment_flags_out_of_range_is_none() {
        let path = Path::from_points([p(0.0, 0.0)]);
        assert_eq!(path.segment_flags(5), LinkFlags::NONE);
    }
}

// ── Mesh selection ────────────────────────────────────────────────────────────

#[cfg(test)]
mod mesh {
    use nav_core::{MeshId, NavSize};
    use super::helpers::{arena, p};

    #[test]
    fn smallest_containing_mesh_wins() {
        let cat = arena();
        assert_eq!(cat.find(&p(15.0, 15.0), NavSize::Regular), Some(MeshId(1)));
        assert_eq!(cat.find(&p(50.0, 50.0), NavSize::Regular), Some(MeshId(0)));
    }

    #[test]
    fn size_class_filters_meshes() {
        let cat = arena();
        assert_eq!(cat.find(&p(15.0, 15.0), NavSize::Large), Some(MeshId(0)));
    }

    #[test]
    fn outside_every_mesh() {
        assert_eq!(arena().find(&p(500.0, 0.0), NavSize::Small), None);
    }

    #[test]
    fn re_adding_replaces() {
        let mut cat = arena();
        let info = cat.get(MeshId(1)).cloned().unwrap();
        cat.add(info);
        assert_eq!(cat.len(), 2);
    }
}

// ── DirectPathService ─────────────────────────────────────────────────────────

#[cfg(test)]
mod service {
    use nav_core::{LinkFlags, MeshId, NavSize, PathTicket};
    use super::helpers::{arena, p};
    use crate::{DirectPathService, Path, PathError, PathPoll, PathRequest, PathService};

    fn req(to_x: f32, to_y: f32) -> PathRequest {
        PathRequest {
            from:  p(0.0, 0.0),
            to:    p(to_x, to_y),
            size:  NavSize::Regular,
            links: LinkFlags::ALL,
            mesh:  None,
        }
    }

    #[test]
    fn straight_line_inside_mesh() {
        let mut svc = DirectPathService::new(arena());
        match svc.request(&req(10.0, 0.0)) {
            PathPoll::Ready(path) => {
                assert_eq!(path.len(), 2);
                assert_eq!(path.to, p(10.0, 0.0));
                assert_eq!(path.mesh, Some(MeshId(0)));
            }
            other => panic!("expected ready, got {other:?}"),
        }
        assert_eq!(svc.requests, 1);
    }

    #[test]
    fn destination_off_mesh_fails() {
        let mut svc = DirectPathService::new(arena());
        assert!(matches!(svc.request(&req(400.0, 0.0)), PathPoll::Failed(PathError::NoRoute { .. })));
    }

    #[test]
    fn no_mesh_at_origin() {
        let mut svc = DirectPathService::new(arena());
        let mut r = req(10.0, 0.0);
        r.from = p(-300.0, 0.0);
        assert!(matches!(svc.request(&r), PathPoll::Failed(PathError::NoMesh { .. })));
    }

    #[test]
    fn walking_required_for_direct_paths() {
        let mut svc = DirectPathService::new(arena());
        let mut r = req(10.0, 0.0);
        r.links = LinkFlags::SWIM;
        assert_eq!(svc.request(&r), PathPoll::Failed(PathError::LinksRejected));
    }

    #[test]
    fn canned_route_served_for_destination() {
        let mut svc = DirectPathService::new(arena());
        svc.add_route(Path::from_points([p(0.0, 0.0), p(5.0, 5.0), p(10.0, 0.0)]));
        match svc.request(&req(10.0, 0.0)) {
            PathPoll::Ready(path) => assert_eq!(path.len(), 3),
            other => panic!("expected canned route, got {other:?}"),
        }
    }

    #[test]
    fn latency_resolves_after_polls() {
        let mut svc = DirectPathService::new(arena()).with_latency(2);
        let PathPoll::Pending(ticket) = svc.request(&req(10.0, 0.0)) else {
            panic!("expected pending");
        };
        assert_eq!(svc.poll(ticket), PathPoll::Pending(ticket));
        assert!(matches!(svc.poll(ticket), PathPoll::Ready(_)));
        assert_eq!(svc.pending_count(), 0);
        assert_eq!(svc.poll(ticket), PathPoll::Failed(PathError::UnknownTicket(ticket)));
    }

    #[test]
    fn cancelled_ticket_is_forgotten() {
        let mut svc = DirectPathService::new(arena()).with_latency(3);
        let PathPoll::Pending(ticket) = svc.request(&req(10.0, 0.0)) else {
            panic!("expected pending");
        };
        svc.cancel(ticket);
        assert_eq!(svc.pending_count(), 0);
        assert!(matches!(svc.poll(ticket), PathPoll::Failed(_)));
        // Cancelling twice, or an unknown ticket, is harmless.
        svc.cancel(ticket);
        svc.cancel(PathTicket(99));
    }

    #[test]
    fn release_is_counted() {
        let mut svc = DirectPathService::new(arena());
        svc.release(Path::from_points([p(0.0, 0.0)]));
        assert_eq!(svc.released, 1);
    }
}

// ── Cover ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cover {
    use nav_core::{AgentId, CoverId};
    use super::helpers::p;
    use crate::{CoverField, CoverQuery, CoverRegistry, WorldError};

    fn query(radius: f32, requester: u32) -> CoverQuery {
        CoverQuery { from: p(0.0, 0.0), radius, exclude_reserved: true, requester: AgentId(requester) }
    }

    fn field() -> CoverField {
        let mut f = CoverField::new();
        f.insert(CoverId(3), p(4.0, 0.0)).unwrap();
        f.insert(CoverId(1), p(0.0, 4.0)).unwrap();
        f.insert(CoverId(7), p(2.0, 0.0)).unwrap();
        f.insert(CoverId(9), p(30.0, 0.0)).unwrap();
        f
    }

    #[test]
    fn nearest_within_radius() {
        assert_eq!(field().find_nearest(&query(10.0, 0)), Some(CoverId(7)));
    }

    #[test]
    fn nothing_within_radius() {
        assert_eq!(field().find_nearest(&query(1.0, 0)), None);
        assert_eq!(field().find_nearest(&query(0.0, 0)), None);
    }

    #[test]
    fn equidistant_tie_goes_to_lowest_id() {
        let mut f = field();
        f.remove(CoverId(7)).unwrap();
        // Ids 3 and 1 are both 4 m away.
        assert_eq!(f.find_nearest(&query(10.0, 0)), Some(CoverId(1)));
    }

    #[test]
    fn reserved_points_are_skipped_for_others() {
        let mut f = field();
        assert!(f.reserve(CoverId(7), AgentId(5)));
        assert!(!f.reserve(CoverId(7), AgentId(6)));
        assert_eq!(f.find_nearest(&query(10.0, 6)), Some(CoverId(1)));
        // The holder still sees its own point.
        assert_eq!(f.find_nearest(&query(10.0, 5)), Some(CoverId(7)));
    }

    #[test]
    fn release_only_by_holder() {
        let mut f = field();
        assert!(f.reserve(CoverId(7), AgentId(5)));
        f.release(CoverId(7), AgentId(6));
        assert_eq!(f.reserved_by(CoverId(7)), Some(AgentId(5)));
        f.release(CoverId(7), AgentId(5));
        assert_eq!(f.reserved_by(CoverId(7)), None);
    }

    #[test]
    fn disabled_points_are_invisible() {
        let mut f = field();
        f.set_enabled(CoverId(7), false).unwrap();
        assert_eq!(f.find_nearest(&query(10.0, 0)), Some(CoverId(1)));
        assert!(!f.reserve(CoverId(7), AgentId(0)));
    }

    #[test]
    fn removed_point_has_no_position() {
        let mut f = field();
        f.remove(CoverId(3)).unwrap();
        assert_eq!(f.position(CoverId(3)), None);
        assert!(matches!(f.remove(CoverId(3)), Err(WorldError::UnknownCover(_))));
    }

    #[test]
    fn duplicate_insert_rejected() {
        let mut f = field();
        assert!(matches!(f.insert(CoverId(3), p(1.0, 1.0)), Err(WorldError::DuplicateCover(_))));
        assert_eq!(f.len(), 4);
    }
}

// ── Scene ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scene {
    use nav_core::{Aabb, EntityId, Point3};
    use super::helpers::p;
    use crate::{SceneMap, SceneQuery, WorldError};

    #[test]
    fn positions_track_updates_and_removal() {
        let mut s = SceneMap::new();
        s.insert(EntityId(1), p(1.0, 1.0)).unwrap();
        s.set_position(EntityId(1), p(2.0, 2.0)).unwrap();
        assert_eq!(s.position(EntityId(1)), Some(p(2.0, 2.0)));
        s.remove(EntityId(1)).unwrap();
        assert_eq!(s.position(EntityId(1)), None);
        assert!(matches!(s.set_position(EntityId(1), p(0.0, 0.0)), Err(WorldError::UnknownEntity(_))));
    }

    #[test]
    fn occluder_blocks_sight_line() {
        let mut s = SceneMap::new();
        s.add_occluder(Aabb::new(Point3::new(4.0, -1.0, -1.0), Point3::new(6.0, 1.0, 3.0)));
        assert!(!s.line_of_sight(&p(0.0, 0.0), &p(10.0, 0.0)));
        assert!(s.line_of_sight(&p(0.0, 5.0), &p(10.0, 5.0)));
        assert!(s.is_blocked(&p(5.0, 0.0)));
        assert!(!s.is_blocked(&p(5.0, 5.0)));
    }
}
