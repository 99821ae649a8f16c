//! Fluent builder for constructing a [`Sim`].

use std::collections::HashSet;

use log::info;
use nav_agent::{NavContext, NavigationController};
use nav_core::{AgentId, AgentRng, EntityId, NavConfig, Point3, SimConfig};
use nav_world::{CoverRegistry, PathService, SceneMap};

use crate::{Body, Director, Sim, SimAgent, SimError, SimResult};

/// One agent queued for [`SimBuilder::build`].
struct QueuedAgent {
    entity:    EntityId,
    position:  Point3,
    nav:       NavConfig,
    max_speed: f32,
}

/// Fluent builder for [`Sim<D, P, C>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: tick rate, total ticks, seed, snapshot interval
/// - `D: Director`: the behaviour layer
/// - `P: PathService`: e.g. [`nav_world::DirectPathService`]
/// - `C: CoverRegistry`: e.g. [`nav_world::CoverField`]
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                         |
/// |-----------------|---------------------------------|
/// | `.scene(s)`     | `SceneMap::new()`               |
/// | `.agent(..)`    | no agents                       |
///
/// Agents receive `AgentId`s in the order they are added.  Their entities
/// are inserted into the scene, so an entity may be registered only once
/// and must not already be present in a supplied scene.
pub struct SimBuilder<D: Director, P: PathService, C: CoverRegistry> {
    config:   SimConfig,
    director: D,
    paths:    P,
    cover:    C,
    scene:    Option<SceneMap>,
    agents:   Vec<QueuedAgent>,
}

impl<D: Director, P: PathService, C: CoverRegistry> SimBuilder<D, P, C> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, director: D, paths: P, cover: C) -> Self {
        Self { config, director, paths, cover, scene: None, agents: Vec::new() }
    }

    /// Supply the scene (static entities and occluders).
    pub fn scene(mut self, scene: SceneMap) -> Self {
        self.scene = Some(scene);
        self
    }

    /// Add an agent standing at `position`.  `max_speed` is the body's ground
    /// speed at full throttle.
    pub fn agent(mut self, entity: EntityId, position: Point3, nav: NavConfig, max_speed: f32) -> Self {
        self.agents.push(QueuedAgent { entity, position, nav, max_speed });
        self
    }

    /// Validate inputs, create controllers and bodies, call
    /// [`Director::on_spawn`] for every agent and return a ready-to-run
    /// [`Sim`].
    pub fn build(self) -> SimResult<Sim<D, P, C>> {
        if self.config.tick_hz == 0 {
            return Err(SimError::Config("tick_hz must be at least 1".into()));
        }

        let mut scene = self.scene.unwrap_or_default();
        let mut seen = HashSet::with_capacity(self.agents.len());
        let mut agents = Vec::with_capacity(self.agents.len());
        let mut rngs = Vec::with_capacity(self.agents.len());

        for (i, queued) in self.agents.into_iter().enumerate() {
            if !seen.insert(queued.entity) || scene.contains(queued.entity) {
                return Err(SimError::DuplicateEntity(queued.entity));
            }
            if !queued.max_speed.is_finite() || queued.max_speed < 0.0 {
                return Err(SimError::Config(format!(
                    "agent {} has invalid max_speed {}",
                    queued.entity, queued.max_speed
                )));
            }

            let id = AgentId(i as u32);
            let controller = NavigationController::new(id, queued.nav, queued.position)?;
            scene.insert(queued.entity, queued.position)?;
            agents.push(SimAgent { id, controller, body: Body::new(queued.entity, queued.position, queued.max_speed) });
            rngs.push(AgentRng::new(self.config.seed, id));
        }

        let mut sim = Sim {
            clock:    self.config.make_clock(),
            config:   self.config,
            scene,
            paths:    self.paths,
            cover:    self.cover,
            agents,
            rngs,
            director: self.director,
        };

        let now = sim.clock.current_tick;
        for (agent, rng) in sim.agents.iter_mut().zip(sim.rngs.iter_mut()) {
            let mut ctx = NavContext::new(now, &sim.scene, &mut sim.paths, &mut sim.cover);
            sim.director.on_spawn(agent.id, &mut agent.controller, &mut ctx, rng);
        }

        info!(
            "built simulation: {} agents, {} ticks at {} Hz",
            sim.agents.len(),
            sim.config.total_ticks,
            sim.config.tick_hz
        );
        Ok(sim)
    }
}
