//! The `Sim` struct and its tick loop.

use log::{debug, trace};
use nav_agent::{NavContext, NavEvent, NavObserver, NavigationController};
use nav_core::{AgentId, AgentRng, SimClock, SimConfig, Tick};
use nav_world::{CoverRegistry, PathService, SceneMap};

use crate::{Body, Director, SimObserver, SimResult};

// ── SimAgent ──────────────────────────────────────────────────────────────────

/// One simulated agent: the controller and the body it drives.
pub struct SimAgent {
    pub id:         AgentId,
    pub controller: NavigationController,
    pub body:       Body,
}

// ── Event bridge ──────────────────────────────────────────────────────────────

/// Routes one agent's dispatched events to the sim observer, then to the
/// director.
struct EventBridge<'a, D, O> {
    tick:     Tick,
    agent:    AgentId,
    director: &'a mut D,
    observer: &'a mut O,
    rng:      &'a mut AgentRng,
}

impl<D: Director, O: SimObserver> NavObserver for EventBridge<'_, D, O> {
    fn on_event(&mut self, nav: &mut NavigationController, ctx: &mut NavContext<'_>, event: &NavEvent) {
        trace!("tick {}: {} {}", self.tick.0, self.agent, event);
        self.observer.on_event(self.tick, self.agent, event);
        self.director.on_event(self.agent, nav, ctx, event, self.rng);
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<D, P, C>` owns the scene, the path service `P`, the cover registry
/// `C` and every agent, and drives them one fixed step at a time.  Agents
/// are processed sequentially in ascending `AgentId` order, and each agent
/// publishes its new position before the next one runs, so a run is fully
/// determined by the config seed and the initial state.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<D: Director, P: PathService, C: CoverRegistry> {
    pub config: SimConfig,

    pub clock: SimClock,

    /// Entity positions and occluders.  Agent bodies are mirrored here.
    pub scene: SceneMap,

    pub paths: P,

    pub cover: C,

    /// Indexed by `AgentId`.
    pub agents: Vec<SimAgent>,

    /// Per-agent deterministic RNGs, separate from `agents` for the
    /// split-borrow pattern.
    pub rngs: Vec<AgentRng>,

    pub director: D,
}

impl<D: Director, P: PathService, C: CoverRegistry> Sim<D, P, C> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        loop {
            let now = self.clock.current_tick;
            if now >= self.config.end_tick() {
                break;
            }
            self.step(now, observer)?;
        }
        debug!("simulation finished at tick {}", self.clock.current_tick.0);
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            let now = self.clock.current_tick;
            self.step(now, observer)?;
        }
        Ok(())
    }

    pub fn agent(&self, id: AgentId) -> Option<&SimAgent> {
        self.agents.get(id.index())
    }

    /// Issue commands to one agent's controller from outside the loop.
    ///
    /// Returns `None` for an unknown agent.  Events raised by `f` are
    /// delivered on the agent's next tick.
    pub fn command<R>(
        &mut self,
        id: AgentId,
        f:  impl FnOnce(&mut NavigationController, &mut NavContext<'_>) -> R,
    ) -> Option<R> {
        let agent = self.agents.get_mut(id.index())?;
        let mut ctx = NavContext::new(self.clock.current_tick, &self.scene, &mut self.paths, &mut self.cover);
        Some(f(&mut agent.controller, &mut ctx))
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn step<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> SimResult<()> {
        observer.on_tick_start(now);
        let moving = self.process_tick(now, observer)?;
        observer.on_tick_end(now, moving);
        if self.config.snapshot_interval_ticks > 0
            && now.0.is_multiple_of(self.config.snapshot_interval_ticks)
        {
            observer.on_snapshot(now, &self.agents);
        }
        self.clock.advance();
        Ok(())
    }

    fn process_tick<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> SimResult<usize> {
        let dt = self.clock.dt_secs();
        let mut moving = 0;

        for (agent, rng) in self.agents.iter_mut().zip(self.rngs.iter_mut()) {
            let command = {
                let mut ctx = NavContext::new(now, &self.scene, &mut self.paths, &mut self.cover);
                self.director.on_tick(agent.id, &mut agent.controller, &mut ctx, rng);

                let actor = agent.body.actor_state();
                let mut bridge = EventBridge {
                    tick:     now,
                    agent:    agent.id,
                    director: &mut self.director,
                    observer: &mut *observer,
                    rng:      &mut *rng,
                };
                agent.controller.tick(&actor, &mut ctx, &mut bridge)
            };

            agent.body.integrate(&command, dt, &self.scene);
            self.scene.set_position(agent.body.entity, agent.body.position)?;

            if agent.controller.state().wants_to_move() {
                moving += 1;
            }
        }
        Ok(moving)
    }
}
