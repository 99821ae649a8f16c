use thiserror::Error;

use nav_core::{CoverId, NavError};
use nav_world::PathError;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("no free cover point within {radius} of the search origin")]
    NoCover { radius: f32 },

    #[error("cover point {0} is held by another agent")]
    CoverTaken(CoverId),

    #[error("search radius must be a positive finite number, got {0}")]
    InvalidRadius(f32),

    #[error("path has no waypoints")]
    EmptyPath,

    #[error("no destination to repath to")]
    NothingToRepath,

    #[error("path request failed: {0}")]
    Path(#[from] PathError),

    #[error(transparent)]
    Config(#[from] NavError),
}

pub type AgentResult<T> = Result<T, AgentError>;
