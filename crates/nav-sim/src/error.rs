use nav_agent::AgentError;
use nav_core::EntityId;
use nav_world::WorldError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("entity {0} is registered more than once")]
    DuplicateEntity(EntityId),

    #[error("agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("world error: {0}")]
    World(#[from] WorldError),
}

pub type SimResult<T> = Result<T, SimError>;
