//! `Director`: the behaviour layer that gives controllers their goals.
//!
//! The controller knows how to get somewhere; the director decides where.
//! A director sees each agent once per tick before its controller runs and
//! again for every event the controller raises, always with the agent's
//! controller, a navigation context and its private RNG.

use nav_agent::{NavContext, NavEvent, NavigationController};
use nav_core::{AgentId, AgentRng};

pub trait Director {
    /// Called once per agent when the simulation is built, in ascending
    /// `AgentId` order.
    fn on_spawn(
        &mut self,
        _agent: AgentId,
        _nav:   &mut NavigationController,
        _ctx:   &mut NavContext<'_>,
        _rng:   &mut AgentRng,
    ) {
    }

    /// Called before the agent's controller computes its command.
    fn on_tick(
        &mut self,
        _agent: AgentId,
        _nav:   &mut NavigationController,
        _ctx:   &mut NavContext<'_>,
        _rng:   &mut AgentRng,
    ) {
    }

    /// Called for each event the agent's controller dispatches.
    fn on_event(
        &mut self,
        _agent: AgentId,
        _nav:   &mut NavigationController,
        _ctx:   &mut NavContext<'_>,
        _event: &NavEvent,
        _rng:   &mut AgentRng,
    ) {
    }
}

/// Leaves every agent to whatever goal it was given at build time.
pub struct IdleDirector;

impl Director for IdleDirector {}
