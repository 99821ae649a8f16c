//! `nav-core`: foundational types for the `ai-nav` workspace.
//!
//! This crate is a dependency of every other `nav-*` crate.  It has no
//! `nav-*` dependencies and few external ones (`nalgebra`, `rand`,
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `EntityId`, `CoverId`, `MeshId`, `PathTicket`   |
//! | [`geom`]        | `Point3`/`Vector3` aliases, planar helpers, `Aabb`          |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                            |
//! | [`profile`]     | `NavSize`, `LinkFlags`                                     |
//! | [`config`]      | `NavConfig`: the per-agent navigation options             |
//! | [`rng`]         | `AgentRng` (per-agent deterministic RNG)                   |
//! | [`error`]       | `NavError`, `NavResult`                                    |
//!
//! # Conventions
//!
//! The world is **Z-up**.  Yaw is measured about +Z, with yaw `0` facing +Y
//! and positive yaw turning toward +X (`yaw = atan2(dx, dy)`).  Pitch is
//! positive when looking up.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                          |
//! |---------|-----------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to config and profile types.     |

pub mod config;
pub mod error;
pub mod geom;
pub mod ids;
pub mod profile;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::NavConfig;
pub use error::{NavError, NavResult};
pub use geom::{Aabb, Point3, Vector3};
pub use ids::{AgentId, CoverId, EntityId, MeshId, PathTicket};
pub use profile::{LinkFlags, NavSize};
pub use rng::AgentRng;
pub use time::{SimClock, SimConfig, Tick};
