//! `nav-world`: the world an agent navigates, as seen by its controller.
//!
//! The navigation controller never plans paths, simulates bodies or owns
//! scene objects.  It talks to three collaborators through the traits in
//! this crate, each of which ships with a small in-memory implementation
//! used by the simulation harness and the tests.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                          |
//! |-------------|-------------------------------------------------------------------|
//! | [`path`]    | `Path`, `Waypoint`                                                |
//! | [`mesh`]    | `NavMeshInfo`, `MeshCatalog` (size-class mesh selection)          |
//! | [`service`] | `PathService` trait, `PathRequest`, `PathPoll`, `DirectPathService` |
//! | [`cover`]   | `CoverRegistry` trait, `CoverQuery`, `CoverField` (R-tree)        |
//! | [`scene`]   | `SceneQuery` trait, `SceneMap`                                    |
//! | [`error`]   | `PathError`, `WorldError`, `WorldResult<T>`                       |
//!
//! # Request/response model
//!
//! Path requests may resolve inline or later: [`PathService::request`]
//! answers `Ready`, `Failed` or `Pending(ticket)`, and a pending ticket is
//! polled once per tick until it settles.  Owned paths go back to the
//! service through [`PathService::release`], which takes the path by value.

pub mod cover;
pub mod error;
pub mod mesh;
pub mod path;
pub mod scene;
pub mod service;

#[cfg(test)]
mod tests;

pub use cover::{CoverField, CoverPoint, CoverQuery, CoverRegistry};
pub use error::{PathError, WorldError, WorldResult};
pub use mesh::{MeshCatalog, NavMeshInfo};
pub use path::{Path, Waypoint};
pub use scene::{SceneMap, SceneQuery};
pub use service::{DirectPathService, PathPoll, PathRequest, PathService};
