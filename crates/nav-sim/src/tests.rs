//! Unit and end-to-end tests for nav-sim.

#[cfg(test)]
mod helpers {
    use nav_agent::{NavContext, NavEvent, NavigationController};
    use nav_core::{Aabb, AgentId, AgentRng, MeshId, NavConfig, Point3, SimConfig, Tick};
    use nav_world::{CoverField, DirectPathService, MeshCatalog, NavMeshInfo};

    use crate::{Director, SimAgent, SimObserver};

    pub fn p(x: f32, y: f32) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    pub fn paths() -> DirectPathService {
        DirectPathService::new(MeshCatalog::new().with(NavMeshInfo::new(
            MeshId(0),
            Aabb::new(Point3::new(-100.0, -100.0, -5.0), Point3::new(100.0, 100.0, 5.0)),
        )))
    }

    /// 10 Hz, `ticks` ticks, snapshots every 5 ticks.
    pub fn config(ticks: u64) -> SimConfig {
        SimConfig { tick_hz: 10, total_ticks: ticks, seed: 7, snapshot_interval_ticks: 5 }
    }

    pub fn nav(stuck_delay: u32) -> NavConfig {
        NavConfig { stuck_test_delay: stuck_delay, ..NavConfig::default() }
    }

    /// Sends each agent straight to its entry in `targets` at spawn and
    /// records everything it is told.
    #[derive(Default)]
    pub struct GoTo {
        pub targets: Vec<Point3>,
        pub spawned: Vec<AgentId>,
        pub ticks:   usize,
        pub events:  Vec<(AgentId, NavEvent)>,
    }

    impl GoTo {
        pub fn new(targets: Vec<Point3>) -> Self {
            Self { targets, ..Self::default() }
        }

        pub fn count(&self, event: &NavEvent) -> usize {
            self.events.iter().filter(|(_, e)| e == event).count()
        }
    }

    impl Director for GoTo {
        fn on_spawn(
            &mut self,
            agent: AgentId,
            nav:   &mut NavigationController,
            ctx:   &mut NavContext<'_>,
            _rng:  &mut AgentRng,
        ) {
            self.spawned.push(agent);
            if let Some(target) = self.targets.get(agent.index()) {
                nav.set_destination(*target, false, ctx);
            }
        }

        fn on_tick(
            &mut self,
            _agent: AgentId,
            _nav:   &mut NavigationController,
            _ctx:   &mut NavContext<'_>,
            _rng:   &mut AgentRng,
        ) {
            self.ticks += 1;
        }

        fn on_event(
            &mut self,
            agent:  AgentId,
            _nav:   &mut NavigationController,
            _ctx:   &mut NavContext<'_>,
            event:  &NavEvent,
            _rng:   &mut AgentRng,
        ) {
            self.events.push((agent, event.clone()));
        }
    }

    #[derive(Default)]
    pub struct Counter {
        pub starts:     u64,
        pub ends:       u64,
        pub events:     usize,
        pub snapshots:  Vec<(Tick, usize)>,
        pub final_tick: Option<Tick>,
    }

    impl SimObserver for Counter {
        fn on_tick_start(&mut self, _tick: Tick) {
            self.starts += 1;
        }

        fn on_tick_end(&mut self, _tick: Tick, _moving: usize) {
            self.ends += 1;
        }

        fn on_event(&mut self, _tick: Tick, _agent: AgentId, _event: &NavEvent) {
            self.events += 1;
        }

        fn on_snapshot(&mut self, tick: Tick, agents: &[SimAgent]) {
            self.snapshots.push((tick, agents.len()));
        }

        fn on_sim_end(&mut self, final_tick: Tick) {
            self.final_tick = Some(final_tick);
        }
    }

    pub fn cover() -> CoverField {
        CoverField::new()
    }
}

// ── Body ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod body_tests {
    use super::helpers::p;
    use nav_agent::MotionCommand;
    use nav_core::{Aabb, EntityId, Vector3};
    use nav_world::SceneMap;

    use crate::Body;

    fn forward(throttle: f32) -> MotionCommand {
        MotionCommand { direction: Vector3::x(), throttle, ..MotionCommand::hold(0.5) }
    }

    #[test]
    fn integrates_velocity() {
        let mut body = Body::new(EntityId(1), p(0.0, 0.0), 2.0);
        assert!(body.integrate(&forward(0.5), 0.5, &SceneMap::new()));
        assert!((body.position.x - 0.5).abs() < 1e-6);
        assert_eq!(body.yaw, 0.5);
    }

    #[test]
    fn hold_does_not_move() {
        let mut body = Body::new(EntityId(1), p(1.0, 1.0), 2.0);
        assert!(!body.integrate(&MotionCommand::hold(0.0), 0.1, &SceneMap::new()));
        assert_eq!(body.position, p(1.0, 1.0));
    }

    #[test]
    fn occluder_refuses_step() {
        let mut scene = SceneMap::new();
        scene.add_occluder(Aabb::around(p(1.0, 0.0), 0.5));
        let mut body = Body::new(EntityId(1), p(0.0, 0.0), 10.0);
        assert!(!body.integrate(&forward(1.0), 0.1, &scene));
        assert_eq!(body.position, p(0.0, 0.0));
        assert_eq!(body.blocked_steps, 1);
    }

    #[test]
    fn jump_is_airborne_for_hop_ticks() {
        let mut body = Body::new(EntityId(1), p(0.0, 0.0), 1.0);
        let jump = MotionCommand { jump: true, ..MotionCommand::hold(0.0) };
        body.integrate(&jump, 0.1, &SceneMap::new());
        assert!(!body.grounded());
        assert_eq!(body.jumps, 1);

        // A second request in the air is ignored.
        body.integrate(&jump, 0.1, &SceneMap::new());
        assert_eq!(body.jumps, 1);

        for _ in 0..body.hop_ticks {
            body.integrate(&MotionCommand::hold(0.0), 0.1, &SceneMap::new());
        }
        assert!(body.grounded());
        assert!(body.actor_state().grounded);
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::helpers::*;
    use nav_core::{AgentId, EntityId, NavConfig, SimConfig};
    use nav_world::SceneMap;

    use crate::{IdleDirector, SimBuilder, SimError};

    #[test]
    fn agents_get_sequential_ids() {
        let sim = SimBuilder::new(config(10), GoTo::default(), paths(), cover())
            .agent(EntityId(10), p(0.0, 0.0), NavConfig::default(), 1.0)
            .agent(EntityId(20), p(1.0, 0.0), NavConfig::default(), 1.0)
            .build()
            .unwrap();
        assert_eq!(sim.agents.len(), 2);
        assert_eq!(sim.agents[1].id, AgentId(1));
        assert_eq!(sim.agents[1].body.entity, EntityId(20));
        assert!(sim.scene.contains(EntityId(20)));
        assert_eq!(sim.director.spawned, vec![AgentId(0), AgentId(1)]);
    }

    #[test]
    fn duplicate_entity_rejected() {
        let result = SimBuilder::new(config(10), IdleDirector, paths(), cover())
            .agent(EntityId(10), p(0.0, 0.0), NavConfig::default(), 1.0)
            .agent(EntityId(10), p(1.0, 0.0), NavConfig::default(), 1.0)
            .build();
        assert!(matches!(result, Err(SimError::DuplicateEntity(EntityId(10)))));
    }

    #[test]
    fn entity_already_in_scene_rejected() {
        let mut scene = SceneMap::new();
        scene.insert(EntityId(5), p(3.0, 3.0)).unwrap();
        let result = SimBuilder::new(config(10), IdleDirector, paths(), cover())
            .scene(scene)
            .agent(EntityId(5), p(0.0, 0.0), NavConfig::default(), 1.0)
            .build();
        assert!(matches!(result, Err(SimError::DuplicateEntity(_))));
    }

    #[test]
    fn zero_tick_rate_rejected() {
        let config = SimConfig { tick_hz: 0, ..SimConfig::default() };
        let result = SimBuilder::new(config, IdleDirector, paths(), cover()).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn invalid_nav_config_rejected() {
        let bad = NavConfig { move_tolerance: -1.0, ..NavConfig::default() };
        let result = SimBuilder::new(config(10), IdleDirector, paths(), cover())
            .agent(EntityId(1), p(0.0, 0.0), bad, 1.0)
            .build();
        assert!(matches!(result, Err(SimError::Agent(_))));
    }

    #[test]
    fn negative_speed_rejected() {
        let result = SimBuilder::new(config(10), IdleDirector, paths(), cover())
            .agent(EntityId(1), p(0.0, 0.0), NavConfig::default(), -1.0)
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sim_tests {
    use super::helpers::*;
    use nav_agent::{MoveState, NavEvent};
    use nav_core::{Aabb, AgentId, EntityId, Tick, geom::planar_distance};
    use nav_world::{SceneMap, SceneQuery};

    use crate::{IdleDirector, NoopObserver, SimBuilder};

    #[test]
    fn agent_reaches_direct_destination() {
        let mut sim = SimBuilder::new(config(60), GoTo::new(vec![p(5.0, 0.0)]), paths(), cover())
            .agent(EntityId(1), p(0.0, 0.0), nav(30), 2.0)
            .build()
            .unwrap();
        sim.run(&mut NoopObserver).unwrap();

        let agent = &sim.agents[0];
        assert!(planar_distance(&agent.body.position, &p(5.0, 0.0)) <= 0.25 + 1e-4);
        assert_eq!(agent.controller.state(), MoveState::Stopped);
        assert_eq!(sim.director.count(&NavEvent::ReachedDestination), 1);
        assert_eq!(sim.scene.position(EntityId(1)), Some(agent.body.position));
    }

    #[test]
    fn observer_hooks_fire_per_tick() {
        let mut sim = SimBuilder::new(config(10), GoTo::new(vec![p(0.1, 0.0)]), paths(), cover())
            .agent(EntityId(1), p(0.0, 0.0), nav(30), 1.0)
            .agent(EntityId(2), p(3.0, 0.0), nav(30), 1.0)
            .build()
            .unwrap();
        let mut counter = Counter::default();
        sim.run(&mut counter).unwrap();

        assert_eq!(counter.starts, 10);
        assert_eq!(counter.ends, 10);
        assert_eq!(counter.snapshots, vec![(Tick(0), 2), (Tick(5), 2)]);
        assert_eq!(counter.final_tick, Some(Tick(10)));
        assert_eq!(counter.events, sim.director.events.len());
        assert_eq!(sim.director.ticks, 20);
    }

    #[test]
    fn run_ticks_ignores_end_tick() {
        let mut sim = SimBuilder::new(config(3), IdleDirector, paths(), cover())
            .agent(EntityId(1), p(0.0, 0.0), nav(30), 1.0)
            .build()
            .unwrap();
        let mut counter = Counter::default();
        sim.run_ticks(8, &mut counter).unwrap();
        assert_eq!(counter.starts, 8);
        assert_eq!(sim.clock.current_tick, Tick(8));
        assert_eq!(counter.final_tick, None);
    }

    #[test]
    fn wall_makes_agent_stuck_once() {
        let mut scene = SceneMap::new();
        scene.add_occluder(Aabb::around(p(2.0, 0.0), 0.5));
        let mut sim = SimBuilder::new(config(40), GoTo::new(vec![p(5.0, 0.0)]), paths(), cover())
            .scene(scene)
            .agent(EntityId(1), p(0.0, 0.0), nav(5), 2.0)
            .build()
            .unwrap();
        sim.run(&mut NoopObserver).unwrap();

        let agent = &sim.agents[0];
        assert!(agent.body.position.x < 1.5);
        assert!(agent.body.blocked_steps > 0);
        assert_eq!(agent.controller.state(), MoveState::Stuck);
        assert_eq!(sim.director.count(&NavEvent::Stuck), 1);
        assert_eq!(sim.director.count(&NavEvent::ReachedDestination), 0);
    }

    #[test]
    fn follower_keeps_standoff_from_leader() {
        let mut sim = SimBuilder::new(config(200), GoTo::new(vec![p(10.0, 0.0)]), paths(), cover())
            .agent(EntityId(1), p(0.0, 0.0), nav(30), 1.0)
            .agent(EntityId(2), p(-5.0, 0.0), nav(30), 2.0)
            .build()
            .unwrap();
        sim.command(AgentId(1), |nav, ctx| nav.follow_object(EntityId(1), Some(2.0), ctx))
            .unwrap()
            .unwrap();
        sim.run(&mut NoopObserver).unwrap();

        let gap = planar_distance(&sim.agents[0].body.position, &sim.agents[1].body.position);
        assert!(gap <= 2.0 + 1e-3, "gap {gap}");
        assert!(gap >= 1.7, "gap {gap}");
        assert_eq!(sim.agents[1].controller.follow_target(), Some(EntityId(1)));
    }

    #[test]
    fn command_on_unknown_agent_is_none() {
        let mut sim = SimBuilder::new(config(1), IdleDirector, paths(), cover()).build().unwrap();
        assert!(sim.command(AgentId(3), |nav, ctx| nav.stop(ctx)).is_none());
    }
}

// ── Determinism ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod determinism {
    use super::helpers::*;
    use nav_agent::{NavContext, NavEvent, NavigationController};
    use nav_core::{AgentId, AgentRng, EntityId, Point3};

    use crate::{Director, NoopObserver, Sim, SimBuilder};
    use nav_world::{CoverField, DirectPathService};

    /// Picks a fresh random point whenever the last one is reached.
    struct Wander;

    impl Director for Wander {
        fn on_spawn(
            &mut self,
            _agent: AgentId,
            nav:    &mut NavigationController,
            ctx:    &mut NavContext<'_>,
            rng:    &mut AgentRng,
        ) {
            let target = rng.point_in_disc(Point3::origin(), 8.0);
            nav.set_destination(target, true, ctx);
        }

        fn on_event(
            &mut self,
            _agent: AgentId,
            nav:    &mut NavigationController,
            ctx:    &mut NavContext<'_>,
            event:  &NavEvent,
            rng:    &mut AgentRng,
        ) {
            if *event == NavEvent::ReachedDestination {
                let target = rng.point_in_disc(Point3::origin(), 8.0);
                nav.set_destination(target, true, ctx);
            }
        }
    }

    fn build(seed: u64) -> Sim<Wander, DirectPathService, CoverField> {
        let mut config = config(300);
        config.seed = seed;
        SimBuilder::new(config, Wander, paths(), cover())
            .agent(EntityId(1), p(0.0, 0.0), nav(30), 3.0)
            .agent(EntityId(2), p(1.0, 1.0), nav(30), 3.0)
            .build()
            .unwrap()
    }

    fn positions(sim: &Sim<Wander, DirectPathService, CoverField>) -> Vec<Point3> {
        sim.agents.iter().map(|a| a.body.position).collect()
    }

    #[test]
    fn same_seed_same_run() {
        let mut a = build(99);
        let mut b = build(99);
        a.run(&mut NoopObserver).unwrap();
        b.run(&mut NoopObserver).unwrap();
        assert_eq!(positions(&a), positions(&b));
    }

    #[test]
    fn different_seed_different_goals() {
        let a = build(1);
        let b = build(2);
        assert_ne!(a.agents[0].controller.move_destination(), b.agents[0].controller.move_destination());
    }
}
