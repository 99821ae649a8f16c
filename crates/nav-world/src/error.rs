//! World-collaborator error types.

use thiserror::Error;

use nav_core::{CoverId, EntityId, NavSize, PathTicket, Point3};

/// Why a path request produced no path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    #[error("no nav mesh for a {size} agent at {at:?}")]
    NoMesh { size: NavSize, at: [f32; 3] },

    #[error("no route from {from:?} to {to:?}")]
    NoRoute { from: [f32; 3], to: [f32; 3] },

    #[error("agent link types do not allow any route")]
    LinksRejected,

    #[error("unknown path ticket {0}")]
    UnknownTicket(PathTicket),
}

impl PathError {
    pub fn no_route(from: &Point3, to: &Point3) -> Self {
        PathError::NoRoute { from: [from.x, from.y, from.z], to: [to.x, to.y, to.z] }
    }

    pub fn no_mesh(size: NavSize, at: &Point3) -> Self {
        PathError::NoMesh { size, at: [at.x, at.y, at.z] }
    }
}

/// Errors from building or mutating the in-memory world stores.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("cover point {0} already registered")]
    DuplicateCover(CoverId),

    #[error("cover point {0} not found")]
    UnknownCover(CoverId),

    #[error("entity {0} already present in the scene")]
    DuplicateEntity(EntityId),

    #[error("entity {0} not found in the scene")]
    UnknownEntity(EntityId),
}

pub type WorldResult<T> = Result<T, WorldError>;
