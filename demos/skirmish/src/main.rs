//! skirmish: every navigation mode in one small arena.
//!
//! Five agents share a walled arena for 60 simulated seconds:
//!
//! | Agent | Role    | Behaviour                                              |
//! |-------|---------|--------------------------------------------------------|
//! | 0     | patrol  | follows a shared looping path                          |
//! | 1     | escort  | follows the patroller and keeps it in its sights       |
//! | 2, 3  | sentry  | reserve the nearest free cover point and hold it       |
//! | 4     | wander  | requests paths to random points, sometimes the depot   |
//!
//! Usage: `skirmish [nav.json]`.  The optional JSON file overrides the
//! default `NavConfig` for every agent.  A trace is written to
//! `output/skirmish`.

mod arena;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{info, warn};

use nav_agent::{NavContext, NavEvent, NavigationController};
use nav_core::{AgentId, AgentRng, EntityId, NavConfig, Point3, SimConfig, Tick, Vector3};
use nav_sim::{Director, SimAgent, SimBuilder, SimObserver};
use nav_trace::{CsvTraceWriter, TraceObserver, TraceWriter};
use nav_world::{DirectPathService, Path as NavPath};

use arena::{DEPOT, p};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:                    u64 = 42;
const TICK_HZ:                 u32 = 20;
const SIM_SECS:                u64 = 60;
const SNAPSHOT_INTERVAL_TICKS: u64 = 10; // two snapshots per second
const COVER_SEARCH_RADIUS:     f32 = 30.0;
const WANDER_RADIUS:           f32 = 18.0;
/// Every n-th wander goal is the depot behind the wall.
const DEPOT_EVERY:             u32 = 3;

// ── Roles ─────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Role {
    Patrol,
    Escort,
    Sentry,
    Wander,
}

impl Role {
    fn as_str(self) -> &'static str {
        match self {
            Role::Patrol => "patrol",
            Role::Escort => "escort",
            Role::Sentry => "sentry",
            Role::Wander => "wander",
        }
    }
}

/// Agent roster: role, entity, start position, ground speed.
const ROSTER: [(Role, u32, [f32; 2], f32); 5] = [
    (Role::Patrol, 100, [-8.0, -2.0], 3.0),
    (Role::Escort, 101, [-15.0, -15.0], 4.0),
    (Role::Sentry, 102, [0.0, -15.0], 3.5),
    (Role::Sentry, 103, [-2.0, 15.0], 3.5),
    (Role::Wander, 104, [15.0, 15.0], 3.0),
];

const LEADER: EntityId = EntityId(100);

// ── Director ──────────────────────────────────────────────────────────────────

struct SkirmishDirector {
    roles:   Vec<Role>,
    /// Kept alive here; patrollers only hold a weak reference.
    patrol:  Arc<NavPath>,
    /// Agents that need a new goal on their next tick.
    retry:   Vec<bool>,
    wanders: Vec<u32>,
}

impl SkirmishDirector {
    fn new(roles: Vec<Role>) -> Self {
        let n = roles.len();
        Self { roles, patrol: Arc::new(arena::patrol_loop()), retry: vec![false; n], wanders: vec![0; n] }
    }

    fn assign(
        &mut self,
        agent: AgentId,
        nav:   &mut NavigationController,
        ctx:   &mut NavContext<'_>,
        rng:   &mut AgentRng,
    ) {
        let i = agent.index();
        let result = match self.roles[i] {
            Role::Patrol => nav.follow_path(&self.patrol, ctx),
            Role::Escort => {
                nav.set_aim_object(LEADER, Vector3::new(0.0, 0.0, 1.5));
                nav.follow_object(LEADER, None, ctx)
            }
            Role::Sentry => nav.find_cover(nav.position(), COVER_SEARCH_RADIUS, ctx),
            Role::Wander => {
                self.wanders[i] += 1;
                let goal = if self.wanders[i].is_multiple_of(DEPOT_EVERY) {
                    p(DEPOT[0], DEPOT[1])
                } else {
                    rng.point_in_disc(Point3::origin(), WANDER_RADIUS)
                };
                nav.find_path(goal, ctx)
            }
        };
        self.retry[i] = match result {
            Ok(()) => false,
            Err(e) => {
                warn!("{agent} ({}) could not start: {e}", self.roles[i].as_str());
                true
            }
        };
    }
}

impl Director for SkirmishDirector {
    fn on_spawn(
        &mut self,
        agent: AgentId,
        nav:   &mut NavigationController,
        ctx:   &mut NavContext<'_>,
        rng:   &mut AgentRng,
    ) {
        self.assign(agent, nav, ctx, rng);
    }

    fn on_tick(
        &mut self,
        agent: AgentId,
        nav:   &mut NavigationController,
        ctx:   &mut NavContext<'_>,
        rng:   &mut AgentRng,
    ) {
        if self.retry[agent.index()] {
            self.assign(agent, nav, ctx, rng);
        }
    }

    fn on_event(
        &mut self,
        agent: AgentId,
        nav:   &mut NavigationController,
        ctx:   &mut NavContext<'_>,
        event: &NavEvent,
        rng:   &mut AgentRng,
    ) {
        let role = self.roles[agent.index()];
        match (role, event) {
            (Role::Sentry, NavEvent::ReachedDestination) => {
                info!("{agent} holding {:?}", nav.cover());
                nav.set_aim_object(LEADER, Vector3::new(0.0, 0.0, 1.5));
            }
            (Role::Sentry, NavEvent::CoverLost(_)) => self.retry[agent.index()] = true,
            (Role::Wander, NavEvent::ReachedDestination | NavEvent::PathFailed(_)) => {
                self.assign(agent, nav, ctx, rng);
            }
            (_, NavEvent::Stuck) => {
                // A straight path into the wall stays blocked; pick again.
                if role == Role::Wander {
                    self.assign(agent, nav, ctx, rng);
                } else if let Err(e) = nav.repath(ctx) {
                    warn!("{agent} repath failed: {e}");
                    self.retry[agent.index()] = true;
                }
            }
            (_, NavEvent::PathLost | NavEvent::TargetLost(_)) => self.retry[agent.index()] = true,
            _ => {}
        }
    }
}

// ── Observer wrapper to count rows ───────────────────────────────────────────

struct CountingObserver<W: TraceWriter> {
    inner:         TraceObserver<W>,
    snapshot_rows: usize,
    events:        BTreeMap<String, usize>,
}

impl<W: TraceWriter> CountingObserver<W> {
    fn new(inner: TraceObserver<W>) -> Self {
        Self { inner, snapshot_rows: 0, events: BTreeMap::new() }
    }
}

impl<W: TraceWriter> SimObserver for CountingObserver<W> {
    fn on_event(&mut self, tick: Tick, agent: AgentId, event: &NavEvent) {
        let kind = event.to_string();
        let kind = kind.split(':').next().unwrap_or_default().to_owned();
        *self.events.entry(kind).or_default() += 1;
        self.inner.on_event(tick, agent, event);
    }

    fn on_snapshot(&mut self, tick: Tick, agents: &[SimAgent]) {
        self.snapshot_rows += agents.len();
        self.inner.on_snapshot(tick, agents);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── Config ────────────────────────────────────────────────────────────────────

fn load_nav_config(path: Option<String>) -> Result<NavConfig> {
    let Some(path) = path else {
        return Ok(NavConfig::default());
    };
    let file = File::open(&path).with_context(|| format!("opening {path}"))?;
    let config: NavConfig =
        serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parsing {path}"))?;
    config.validate().with_context(|| format!("validating {path}"))?;
    info!("loaded navigation config from {path}");
    Ok(config)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== skirmish - navigation controller demo ===");
    println!("Agents: {}  |  Seconds: {SIM_SECS}  |  Seed: {SEED}", ROSTER.len());
    println!();

    // 1. Navigation options.
    let nav = load_nav_config(std::env::args().nth(1))?;

    // 2. World.
    let mut paths = DirectPathService::new(arena::catalog());
    paths.add_route(arena::depot_route());
    let cover = arena::cover()?;
    println!("Cover points: {}  |  Occluders: {}", cover.len(), arena::scene().occluders().len());

    // 3. Sim config.
    let config = SimConfig {
        tick_hz:                 TICK_HZ,
        total_ticks:             SIM_SECS * TICK_HZ as u64,
        seed:                    SEED,
        snapshot_interval_ticks: SNAPSHOT_INTERVAL_TICKS,
    };

    // 4. Build sim.
    let roles = ROSTER.iter().map(|(role, ..)| *role).collect();
    let mut builder = SimBuilder::new(config, SkirmishDirector::new(roles), paths, cover).scene(arena::scene());
    for (_, entity, [x, y], speed) in ROSTER {
        builder = builder.agent(EntityId(entity), p(x, y), nav.clone(), speed);
    }
    let mut sim = builder.build()?;

    // 5. Set up output.
    let writer = CsvTraceWriter::new(Path::new("output/skirmish"))?;
    let mut obs = CountingObserver::new(TraceObserver::new(writer));

    // 6. Run.
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("trace error: {e}");
    }

    // 7. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  agent_snapshots.csv : {} rows", obs.snapshot_rows);
    for (kind, count) in &obs.events {
        println!("  {kind:<20}: {count}");
    }
    println!();

    // 8. Final agent table.
    println!("{:<8} {:<8} {:<8} {:<9} {:>8} {:>8}", "Agent", "Role", "Mode", "State", "x", "y");
    println!("{}", "-".repeat(54));
    for (agent, (role, ..)) in sim.agents.iter().zip(ROSTER) {
        println!(
            "{:<8} {:<8} {:<8} {:<9} {:>8.2} {:>8.2}",
            agent.id.0,
            role.as_str(),
            agent.controller.active_mode().as_str(),
            agent.controller.state().as_str(),
            agent.body.position.x,
            agent.body.position.y,
        );
    }

    Ok(())
}
