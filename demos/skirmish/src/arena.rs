//! The skirmish arena: one open mesh, a wall across the middle, a handful
//! of cover points and the patrol loop.
//!
//! ```text
//!   y
//!  20 ┌──────────────────────────────┐
//!     │  c3            c4            │
//!     │        ████████████          │   ████ = wall (x -6..6, y 1..3)
//!     │  c1      patrol loop     c2  │
//! -20 └──────────────────────────────┘
//!    -20                             20  x
//! ```

use nav_core::{Aabb, CoverId, MeshId, Point3};
use nav_world::{CoverField, MeshCatalog, NavMeshInfo, Path, SceneMap, WorldResult};

pub const HALF_EXTENT: f32 = 20.0;

/// Position of the depot behind the wall.  Requests to it get a canned
/// route around the wall's east end.
pub const DEPOT: [f32; 2] = [0.0, 8.0];

pub fn p(x: f32, y: f32) -> Point3 {
    Point3::new(x, y, 0.0)
}

pub fn catalog() -> MeshCatalog {
    MeshCatalog::new().with(NavMeshInfo::new(
        MeshId(0),
        Aabb::new(
            Point3::new(-HALF_EXTENT, -HALF_EXTENT, -2.0),
            Point3::new(HALF_EXTENT, HALF_EXTENT, 2.0),
        ),
    ))
}

pub fn scene() -> SceneMap {
    let mut scene = SceneMap::new();
    scene.add_occluder(Aabb::new(Point3::new(-6.0, 1.0, -2.0), Point3::new(6.0, 3.0, 4.0)));
    scene
}

pub fn cover() -> WorldResult<CoverField> {
    let mut field = CoverField::new();
    field.insert(CoverId(1), p(-12.0, -4.0))?;
    field.insert(CoverId(2), p(12.0, -4.0))?;
    field.insert(CoverId(3), p(-12.0, 12.0))?;
    field.insert(CoverId(4), p(8.0, 12.0))?;
    Ok(field)
}

/// A loop south of the wall.
pub fn patrol_loop() -> Path {
    Path::from_points([p(-8.0, -2.0), p(8.0, -2.0), p(8.0, -10.0), p(-8.0, -10.0)]).looping(true)
}

/// The only way to the depot that does not walk into the wall.
pub fn depot_route() -> Path {
    Path::from_points([p(8.0, 0.0), p(8.0, 5.0), p(DEPOT[0], DEPOT[1])]).on_mesh(MeshId(0))
}
