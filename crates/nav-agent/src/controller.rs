//! The per-agent navigation controller.
//!
//! # Tick algorithm
//!
//! [`NavigationController::tick`] runs these phases in order:
//!
//! | Phase      | Work                                                                 |
//! |------------|----------------------------------------------------------------------|
//! | mesh       | re-resolve the nav mesh; repath if it changed under an active route  |
//! | pending    | poll an outstanding `find_path`/`find_cover` request                 |
//! | drive      | advance the active session (or direct goal) into a steering target   |
//! | progress   | stuck sampling while `Moving`/`Slowing`; recovery while `Stuck`      |
//! | aim        | yaw/pitch from the aim target or the steering direction; LOS events  |
//! | jump       | consume the pending jump request                                     |
//! | dispatch   | hand queued events to the observer                                   |
//!
//! # Pending requests
//!
//! A goal-setting call whose path is not ready yet leaves the current mode
//! running and parks the ticket.  Any later mode change or `stop()` cancels
//! it, so a superseded result is never read.

use std::sync::Arc;

use log::{debug, info, warn};

use nav_core::geom::{pitch_between, planar_delta, planar_distance, wrap_angle, yaw_of, DIR_EPS};
use nav_core::{
    AgentId, CoverId, EntityId, LinkFlags, MeshId, NavConfig, NavSize, PathTicket, Point3, Vector3,
};
use nav_world::{CoverQuery, Path, PathError, PathPoll, PathRequest};

use crate::event::{NavEvent, NavObserver};
use crate::goal::{AimObject, AimState, MotionGoal};
use crate::motion::{ActorState, JumpState, MotionCommand, MoveState};
use crate::session::{Advance, CoverSession, FollowSession, NavMode, NavSession, PathSession};
use crate::{AgentError, AgentResult, NavContext, StuckDetector};

// ── Internal types ────────────────────────────────────────────────────────────

/// What a parked request will turn into once delivered.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Purpose {
    Travel,
    Cover(CoverId),
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct PendingPath {
    ticket:      PathTicket,
    destination: Point3,
    purpose:     Purpose,
}

/// Steering output of the drive phase.
#[derive(Copy, Clone, Debug)]
struct Steering {
    direction: Vector3,
    throttle:  f32,
    /// `true` while actively steering toward something.
    active:    bool,
}

impl Steering {
    fn hold() -> Self {
        Self { direction: Vector3::zeros(), throttle: 0.0, active: false }
    }
}

enum RouteOutcome {
    Steer(Steering),
    Waiting,
    Arrived,
    Lost,
    Failed(PathError),
}

// ── NavigationController ──────────────────────────────────────────────────────

/// Drives one agent toward its current goal.
#[derive(Debug)]
pub struct NavigationController {
    agent:          AgentId,
    config:         NavConfig,
    state:          MoveState,
    goal:           Option<MotionGoal>,
    session:        NavSession,
    pending:        Option<PendingPath>,
    aim:            AimState,
    stuck:          StuckDetector,
    jump:           JumpState,
    /// Resolved lazily on the first path request.
    mesh:           Option<MeshId>,
    /// Cover point reached and still held.
    occupied_cover: Option<CoverId>,
    /// Last known actor position.
    position:       Point3,
    events:         Vec<NavEvent>,
}

impl NavigationController {
    pub fn new(agent: AgentId, config: NavConfig, position: Point3) -> AgentResult<Self> {
        config.validate()?;
        let stuck = StuckDetector::new(config.stuck_tolerance, config.stuck_test_delay);
        Ok(Self {
            agent,
            config,
            state: MoveState::Stopped,
            goal: None,
            session: NavSession::Idle,
            pending: None,
            aim: AimState::default(),
            stuck,
            jump: JumpState::None,
            mesh: None,
            occupied_cover: None,
            position,
            events: Vec::new(),
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn agent(&self) -> AgentId {
        self.agent
    }

    #[inline]
    pub fn state(&self) -> MoveState {
        self.state
    }

    #[inline]
    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    #[inline]
    pub fn goal(&self) -> Option<&MotionGoal> {
        self.goal.as_ref()
    }

    #[inline]
    pub fn session(&self) -> &NavSession {
        &self.session
    }

    #[inline]
    pub fn aim(&self) -> &AimState {
        &self.aim
    }

    #[inline]
    pub fn stuck_detector(&self) -> &StuckDetector {
        &self.stuck
    }

    #[inline]
    pub fn position(&self) -> Point3 {
        self.position
    }

    #[inline]
    pub fn mesh(&self) -> Option<MeshId> {
        self.mesh
    }

    pub fn active_mode(&self) -> NavMode {
        match &self.session {
            NavSession::Path(_) => NavMode::Path,
            NavSession::Cover(_) => NavMode::Cover,
            NavSession::Follow(_) => NavMode::Follow,
            NavSession::Idle if self.goal.is_some() => NavMode::Direct,
            NavSession::Idle => NavMode::Idle,
        }
    }

    /// The point currently steered toward: the direct destination, the
    /// current path node or the follow standoff point.
    pub fn move_destination(&self) -> Option<Point3> {
        self.goal.map(|g| g.destination)
    }

    /// Final destination of the active path or cover route.
    pub fn path_destination(&self) -> Option<Point3> {
        self.session.route().map(PathSession::destination)
    }

    pub fn current_path_index(&self) -> Option<usize> {
        self.session.route().and_then(PathSession::current_index)
    }

    /// The cover point being approached or occupied.
    pub fn cover(&self) -> Option<CoverId> {
        match &self.session {
            NavSession::Cover(c) => Some(c.cover),
            _ => self.occupied_cover,
        }
    }

    pub fn follow_target(&self) -> Option<EntityId> {
        match &self.session {
            NavSession::Follow(f) => Some(f.target),
            _ => None,
        }
    }

    pub fn aim_object(&self) -> Option<EntityId> {
        self.aim.object.map(|o| o.entity)
    }

    pub fn aim_location(&self) -> Option<Point3> {
        self.aim.location
    }

    #[inline]
    pub fn target_visible(&self) -> bool {
        self.aim.target_visible
    }

    /// `true` while a `find_path`/`find_cover` result is outstanding.
    #[inline]
    pub fn has_pending_request(&self) -> bool {
        self.pending.is_some()
    }

    /// Events queued since the last dispatch.
    pub fn queued_events(&self) -> &[NavEvent] {
        &self.events
    }

    // ── Configuration ─────────────────────────────────────────────────────

    pub fn set_move_speed(&mut self, speed: f32) {
        let speed = if speed.is_finite() { speed.clamp(0.0, 1.0) } else { 0.0 };
        self.config.move_speed = speed;
        if let Some(goal) = &mut self.goal {
            goal.speed = speed;
        }
    }

    pub fn set_move_tolerance(&mut self, tolerance: f32) {
        let tolerance = if tolerance.is_finite() { tolerance.max(0.0) } else { 0.0 };
        self.config.move_tolerance = tolerance;
        if let Some(goal) = &mut self.goal {
            goal.tolerance = tolerance;
        }
    }

    pub fn set_stuck_tolerance(&mut self, tolerance: f32) {
        self.config.stuck_tolerance = tolerance.max(0.0);
        self.stuck.configure(self.config.stuck_tolerance, self.config.stuck_test_delay);
    }

    pub fn set_stuck_test_delay(&mut self, ticks: u32) {
        self.config.stuck_test_delay = ticks;
        self.stuck.configure(self.config.stuck_tolerance, ticks);
    }

    pub fn set_slowdown(&mut self, enabled: bool) {
        self.config.slowdown_enabled = enabled;
    }

    /// Applies to the next path request.
    pub fn set_link_types(&mut self, links: LinkFlags) {
        self.config.link_types = links;
    }

    /// Change size class.  If a mesh was already resolved it is resolved
    /// again, and an active route is re-requested when the mesh changes.
    pub fn set_nav_size(&mut self, size: NavSize, ctx: &mut NavContext<'_>) {
        if self.config.nav_size == size {
            return;
        }
        self.config.nav_size = size;
        if self.mesh.is_none() {
            return;
        }
        let found = ctx.paths.mesh_for(&self.position, size);
        if found != self.mesh {
            debug!("{}: nav size {size} moves agent to mesh {found:?}", self.agent);
            self.mesh = found;
            if self.session.route().is_some() {
                if let Err(e) = self.repath(ctx) {
                    warn!("{}: repath after nav size change failed: {e}", self.agent);
                }
            }
        }
    }

    // ── Mode changes ──────────────────────────────────────────────────────

    /// Travel straight to `destination`.
    pub fn set_destination(&mut self, destination: Point3, slowdown: bool, ctx: &mut NavContext<'_>) {
        self.clear_session(ctx);
        self.goal = Some(MotionGoal {
            destination,
            tolerance:        self.config.move_tolerance,
            speed:            self.config.move_speed,
            slowdown_enabled: slowdown,
        });
        self.start_moving();
        debug!("{}: direct move to {destination:?}", self.agent);
    }

    /// Clear every goal and session.  Safe to call at any time, any number
    /// of times.
    pub fn stop(&mut self, ctx: &mut NavContext<'_>) {
        self.clear_session(ctx);
        self.goal = None;
        self.state = MoveState::Stopped;
        self.jump = JumpState::None;
    }

    /// Follow a caller-owned path.  The controller only keeps a weak
    /// reference; if the caller drops the path the session ends with
    /// [`NavEvent::PathLost`].
    pub fn follow_path(&mut self, path: &Arc<Path>, ctx: &mut NavContext<'_>) -> AgentResult<()> {
        if path.is_empty() {
            return Err(AgentError::EmptyPath);
        }
        self.clear_session(ctx);
        self.session = NavSession::Path(PathSession::shared(path));
        self.goal = None;
        self.start_moving();
        debug!("{}: following shared path of {} nodes", self.agent, path.len());
        Ok(())
    }

    /// Follow a path the controller takes ownership of.  It is handed back
    /// to the path service exactly once, when the session ends.
    pub fn follow_owned_path(&mut self, path: Path, ctx: &mut NavContext<'_>) -> AgentResult<()> {
        if path.is_empty() {
            ctx.paths.release(path);
            return Err(AgentError::EmptyPath);
        }
        self.clear_session(ctx);
        debug!("{}: following owned path of {} nodes", self.agent, path.len());
        self.session = NavSession::Path(PathSession::owned(path));
        self.goal = None;
        self.start_moving();
        Ok(())
    }

    /// Ask the path service for a path to `destination` and follow it.
    ///
    /// On failure the current mode is left untouched, `Err` is returned and
    /// [`NavEvent::PathFailed`] is queued.  A pending answer keeps the
    /// current mode running until the path arrives.
    pub fn find_path(&mut self, destination: Point3, ctx: &mut NavContext<'_>) -> AgentResult<()> {
        match self.request_path(destination, ctx) {
            PathPoll::Ready(path) => {
                self.clear_session(ctx);
                self.install_route(NavSession::Path(PathSession::owned(path)));
                Ok(())
            }
            PathPoll::Pending(ticket) => {
                self.cancel_pending(ctx);
                self.pending = Some(PendingPath { ticket, destination, purpose: Purpose::Travel });
                debug!("{}: path to {destination:?} pending as {ticket}", self.agent);
                Ok(())
            }
            PathPoll::Failed(e) => Err(self.path_failed(e)),
        }
    }

    /// Reserve the nearest free cover point within `radius` of `from` and
    /// travel to it.
    ///
    /// Fails without changing mode if there is no candidate, the
    /// reservation is refused or no path reaches it.
    pub fn find_cover(&mut self, from: Point3, radius: f32, ctx: &mut NavContext<'_>) -> AgentResult<()> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(AgentError::InvalidRadius(radius));
        }
        let query = CoverQuery { from, radius, exclude_reserved: true, requester: self.agent };
        let (cover, at) = ctx
            .cover
            .find_nearest(&query)
            .and_then(|id| ctx.cover.position(id).map(|p| (id, p)))
            .ok_or(AgentError::NoCover { radius })?;

        match self.request_path(at, ctx) {
            PathPoll::Ready(path) => {
                if !ctx.cover.reserve(cover, self.agent) {
                    ctx.paths.release(path);
                    return Err(AgentError::CoverTaken(cover));
                }
                self.clear_session(ctx);
                // Clearing may have released this same point.
                let held = ctx.cover.reserve(cover, self.agent);
                debug_assert!(held);
                debug!("{}: reserved cover {cover}", self.agent);
                self.install_route(NavSession::Cover(CoverSession { cover, route: PathSession::owned(path) }));
                Ok(())
            }
            PathPoll::Pending(ticket) => {
                if !ctx.cover.reserve(cover, self.agent) {
                    ctx.paths.cancel(ticket);
                    return Err(AgentError::CoverTaken(cover));
                }
                self.cancel_pending(ctx);
                let held = ctx.cover.reserve(cover, self.agent);
                debug_assert!(held);
                debug!("{}: reserved cover {cover}, path pending as {ticket}", self.agent);
                self.pending = Some(PendingPath { ticket, destination: at, purpose: Purpose::Cover(cover) });
                Ok(())
            }
            PathPoll::Failed(e) => Err(self.path_failed(e)),
        }
    }

    /// Keep within `radius` of `target` (the configured follow radius when
    /// `None`).  Persistent until cleared or the target disappears.
    pub fn follow_object(
        &mut self,
        target: EntityId,
        radius: Option<f32>,
        ctx:    &mut NavContext<'_>,
    ) -> AgentResult<()> {
        let radius = radius.unwrap_or(self.config.follow_radius);
        if !(radius.is_finite() && radius >= 0.0) {
            return Err(AgentError::InvalidRadius(radius));
        }
        self.clear_session(ctx);
        self.goal = None;
        self.session = NavSession::Follow(FollowSession { target, radius });
        self.start_moving();
        debug!("{}: following {target} at {radius}", self.agent);
        Ok(())
    }

    /// Drop the current route and request a new one to the same final
    /// destination.  In direct mode the destination is the direct goal and
    /// the agent switches to path following.
    ///
    /// `MoveState` is left alone; a stuck agent stays stuck until it is seen
    /// moving.  If the request fails the session is cleared and the agent
    /// stops (or stays `Stuck`).
    pub fn repath(&mut self, ctx: &mut NavContext<'_>) -> AgentResult<()> {
        let destination = match (&self.session, &self.goal) {
            (NavSession::Path(_) | NavSession::Cover(_), _) => self.path_destination(),
            (NavSession::Idle, Some(goal)) => Some(goal.destination),
            _ => None,
        };
        let Some(destination) = destination else {
            return Err(AgentError::NothingToRepath);
        };

        let fresh = match self.request_path(destination, ctx) {
            PathPoll::Ready(path) => {
                self.events.push(NavEvent::PathSuccess);
                PathSession::owned(path)
            }
            PathPoll::Pending(ticket) => PathSession::awaiting(destination, ticket),
            PathPoll::Failed(e) => {
                self.abandon_route(ctx);
                return Err(self.path_failed(e));
            }
        };
        match &mut self.session {
            NavSession::Path(route) | NavSession::Cover(CoverSession { route, .. }) => {
                std::mem::replace(route, fresh).dispose(ctx.paths);
            }
            session => *session = NavSession::Path(fresh),
        }
        debug!("{}: repathing to {destination:?}", self.agent);
        Ok(())
    }

    /// Jump on the next command.
    pub fn request_jump(&mut self) {
        self.jump = JumpState::Now;
    }

    // ── Aim ───────────────────────────────────────────────────────────────

    /// Track `entity` (plus `offset`) until cleared or the entity vanishes.
    pub fn set_aim_object(&mut self, entity: EntityId, offset: Vector3) {
        self.aim.object = Some(AimObject { entity, offset });
        self.aim.target_visible = false;
    }

    /// Aim at a fixed point; ignored while an aim object is set.
    pub fn set_aim_location(&mut self, location: Point3) {
        self.aim.location = Some(location);
    }

    pub fn clear_aim(&mut self) {
        self.aim = AimState::default();
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Compute this tick's motion command, then dispatch queued events.
    pub fn tick(
        &mut self,
        actor:    &ActorState,
        ctx:      &mut NavContext<'_>,
        observer: &mut dyn NavObserver,
    ) -> MotionCommand {
        let command = self.compute(actor, ctx);
        self.dispatch(ctx, observer);
        command
    }

    /// Compute this tick's motion command.  Events stay queued.
    pub fn compute(&mut self, actor: &ActorState, ctx: &mut NavContext<'_>) -> MotionCommand {
        self.position = actor.position;
        self.refresh_mesh(ctx);
        self.poll_pending(ctx);

        let steering = match std::mem::take(&mut self.session) {
            NavSession::Idle => self.drive_direct(),
            NavSession::Path(route) => self.drive_path(route, ctx),
            NavSession::Cover(cover) => self.drive_cover(cover, ctx),
            NavSession::Follow(follow) => self.drive_follow(follow, ctx),
        };

        self.check_progress(&steering);
        let (yaw, pitch) = self.update_aim(actor, &steering, ctx);
        let jump = self.take_jump(actor.grounded);

        MotionCommand { yaw, pitch, direction: steering.direction, throttle: steering.throttle, jump }
    }

    /// Hand every queued event to `observer`.
    ///
    /// Events raised from inside the callbacks are kept for the next call.
    pub fn dispatch(&mut self, ctx: &mut NavContext<'_>, observer: &mut dyn NavObserver) {
        let events = std::mem::take(&mut self.events);
        for event in &events {
            observer.on_event(self, ctx, event);
            match event {
                NavEvent::ReachedDestination => observer.on_reached_destination(self, ctx),
                NavEvent::Stuck => observer.on_stuck(self, ctx),
                _ => {}
            }
        }
    }

    /// Take the queued events without an observer.
    pub fn drain_events(&mut self) -> Vec<NavEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Drive phase ───────────────────────────────────────────────────────

    fn drive_direct(&mut self) -> Steering {
        let Some(goal) = self.goal else {
            return Steering::hold();
        };
        if !self.state.wants_to_move() {
            return Steering::hold();
        }
        if planar_distance(&self.position, &goal.destination) <= goal.tolerance {
            self.goal = None;
            self.arrive();
            return Steering::hold();
        }
        self.steer(&goal)
    }

    fn drive_path(&mut self, mut route: PathSession, ctx: &mut NavContext<'_>) -> Steering {
        match self.follow_route(&mut route, ctx) {
            RouteOutcome::Steer(steering) => {
                self.session = NavSession::Path(route);
                steering
            }
            RouteOutcome::Waiting => {
                self.session = NavSession::Path(route);
                Steering::hold()
            }
            RouteOutcome::Arrived => {
                route.dispose(ctx.paths);
                self.goal = None;
                self.arrive();
                Steering::hold()
            }
            RouteOutcome::Lost => {
                warn!("{}: followed path was dropped by its owner", self.agent);
                self.goal = None;
                self.state = MoveState::Stopped;
                self.events.push(NavEvent::PathLost);
                Steering::hold()
            }
            RouteOutcome::Failed(e) => {
                route.dispose(ctx.paths);
                self.route_failed(e);
                Steering::hold()
            }
        }
    }

    fn drive_cover(&mut self, mut session: CoverSession, ctx: &mut NavContext<'_>) -> Steering {
        let cover = session.cover;
        let held = ctx.cover.position(cover).is_some()
            && ctx.cover.reserved_by(cover) == Some(self.agent);
        if !held {
            warn!("{}: cover {cover} vanished or was taken", self.agent);
            session.route.dispose(ctx.paths);
            ctx.cover.release(cover, self.agent);
            self.goal = None;
            self.state = MoveState::Stopped;
            self.events.push(NavEvent::CoverLost(cover));
            return Steering::hold();
        }

        match self.follow_route(&mut session.route, ctx) {
            RouteOutcome::Steer(steering) => {
                self.session = NavSession::Cover(session);
                steering
            }
            RouteOutcome::Waiting => {
                self.session = NavSession::Cover(session);
                Steering::hold()
            }
            RouteOutcome::Arrived => {
                session.route.dispose(ctx.paths);
                self.occupied_cover = Some(cover);
                self.goal = None;
                self.arrive();
                Steering::hold()
            }
            RouteOutcome::Lost => {
                ctx.cover.release(cover, self.agent);
                self.goal = None;
                self.state = MoveState::Stopped;
                self.events.push(NavEvent::PathLost);
                Steering::hold()
            }
            RouteOutcome::Failed(e) => {
                session.route.dispose(ctx.paths);
                ctx.cover.release(cover, self.agent);
                self.route_failed(e);
                Steering::hold()
            }
        }
    }

    fn drive_follow(&mut self, follow: FollowSession, ctx: &mut NavContext<'_>) -> Steering {
        let Some(target) = ctx.scene.position(follow.target) else {
            warn!("{}: follow target {} is gone", self.agent, follow.target);
            self.goal = None;
            self.state = MoveState::Stopped;
            self.events.push(NavEvent::TargetLost(follow.target));
            return Steering::hold();
        };
        self.session = NavSession::Follow(follow);

        let delta = planar_delta(&self.position, &target);
        let distance = delta.norm();
        if distance <= follow.radius || distance <= DIR_EPS {
            self.goal = None;
            self.state = MoveState::Stopped;
            return Steering::hold();
        }

        let direction = delta / distance;
        let standoff = self.position + direction * (distance - follow.radius);
        self.goal = Some(MotionGoal {
            destination:      standoff,
            tolerance:        self.config.move_tolerance,
            speed:            self.config.move_speed,
            slowdown_enabled: false,
        });
        if self.state == MoveState::Stopped {
            self.start_moving();
        } else {
            self.enter_motion(MoveState::Moving);
        }
        Steering { direction, throttle: self.config.move_speed.clamp(0.0, 1.0), active: true }
    }

    /// Poll an awaited replacement path, then step along the route.
    fn follow_route(&mut self, route: &mut PathSession, ctx: &mut NavContext<'_>) -> RouteOutcome {
        if let Some(ticket) = route.awaiting_ticket() {
            match ctx.paths.poll(ticket) {
                PathPoll::Ready(path) => {
                    debug!("{}: replacement path {ticket} delivered", self.agent);
                    route.install(path, ctx.paths);
                    self.events.push(NavEvent::PathSuccess);
                }
                PathPoll::Pending(_) => return RouteOutcome::Waiting,
                PathPoll::Failed(e) => return RouteOutcome::Failed(e),
            }
        }

        match route.advance(&self.position, self.config.move_tolerance) {
            Advance::Toward { node, last, crossed } => {
                if let Some(flags) = crossed {
                    debug!("{}: reached path node, next index {:?}", self.agent, route.current_index());
                    self.jump = if flags.contains(LinkFlags::LEDGE) {
                        JumpState::Ledge
                    } else if flags.contains(LinkFlags::JUMP) {
                        JumpState::Now
                    } else {
                        JumpState::None
                    };
                }
                let goal = MotionGoal {
                    destination:      node,
                    tolerance:        self.config.move_tolerance,
                    speed:            self.config.move_speed,
                    slowdown_enabled: self.config.slowdown_enabled && last,
                };
                self.goal = Some(goal);
                RouteOutcome::Steer(self.steer(&goal))
            }
            Advance::Finished => RouteOutcome::Arrived,
            Advance::Lost => RouteOutcome::Lost,
            Advance::Waiting => RouteOutcome::Waiting,
        }
    }

    /// Direct-style steering toward `goal`, with optional slowdown.
    fn steer(&mut self, goal: &MotionGoal) -> Steering {
        let delta = planar_delta(&self.position, &goal.destination);
        let distance = delta.norm();
        let direction = if distance > DIR_EPS { delta / distance } else { Vector3::zeros() };
        let speed = goal.speed.clamp(0.0, 1.0);

        let zone = goal.tolerance * self.config.slowdown_factor;
        if goal.slowdown_enabled && distance < zone {
            self.enter_motion(MoveState::Slowing);
            let throttle = (speed * distance / zone).clamp(0.0, 1.0);
            return Steering { direction, throttle, active: true };
        }
        self.enter_motion(MoveState::Moving);
        Steering { direction, throttle: speed, active: true }
    }

    // ── Progress / aim / jump ─────────────────────────────────────────────

    fn check_progress(&mut self, steering: &Steering) {
        if !steering.active {
            return;
        }
        match self.state {
            MoveState::Moving | MoveState::Slowing => {
                if self.stuck.sample(&self.position) {
                    info!("{}: stuck near {:?}", self.agent, self.position);
                    self.state = MoveState::Stuck;
                    self.events.push(NavEvent::Stuck);
                }
            }
            MoveState::Stuck => {
                if self.stuck.displaced(&self.position) {
                    debug!("{}: moving again", self.agent);
                    self.state = MoveState::Moving;
                    self.stuck.reset();
                }
            }
            MoveState::Stopped => {}
        }
    }

    fn update_aim(&mut self, actor: &ActorState, steering: &Steering, ctx: &NavContext<'_>) -> (f32, f32) {
        let eye = actor.position + Vector3::new(0.0, 0.0, self.config.eye_height);
        let mut pitch = 0.0;
        let mut object_point = None;

        if let Some(object) = self.aim.object {
            match ctx.scene.position(object.entity) {
                Some(at) => {
                    let point = at + object.offset;
                    pitch = pitch_between(&eye, &point);
                    let visible = ctx.scene.line_of_sight(&eye, &point);
                    if visible != self.aim.target_visible {
                        self.aim.target_visible = visible;
                        self.events.push(if visible {
                            NavEvent::TargetEnterLos(object.entity)
                        } else {
                            NavEvent::TargetExitLos(object.entity)
                        });
                    }
                    object_point = Some(point);
                }
                None => {
                    warn!("{}: aim object {} is gone", self.agent, object.entity);
                    self.aim.object = None;
                    self.aim.target_visible = false;
                }
            }
        }

        let yaw = object_point
            .or(self.aim.location)
            .and_then(|p| yaw_of(&planar_delta(&actor.position, &p)))
            .or_else(|| yaw_of(&steering.direction))
            .unwrap_or(actor.yaw);
        (wrap_angle(yaw), pitch)
    }

    fn take_jump(&mut self, grounded: bool) -> bool {
        match self.jump {
            JumpState::Now => {
                self.jump = JumpState::None;
                true
            }
            JumpState::Ledge if !grounded => {
                self.jump = JumpState::None;
                true
            }
            JumpState::Ledge | JumpState::None => false,
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn request_path(&mut self, to: Point3, ctx: &mut NavContext<'_>) -> PathPoll {
        if self.mesh.is_none() {
            self.mesh = ctx.paths.mesh_for(&self.position, self.config.nav_size);
        }
        ctx.paths.request(&PathRequest {
            from:  self.position,
            to,
            size:  self.config.nav_size,
            links: self.config.link_types,
            mesh:  self.mesh,
        })
    }

    /// Re-resolve the mesh once one has been resolved.  Leaving every mesh
    /// keeps the old one.
    fn refresh_mesh(&mut self, ctx: &mut NavContext<'_>) {
        let Some(current) = self.mesh else {
            return;
        };
        match ctx.paths.mesh_for(&self.position, self.config.nav_size) {
            Some(found) if found != current => {
                debug!("{}: moved from mesh {current} to {found}", self.agent);
                self.mesh = Some(found);
                if self.session.route().is_some() {
                    if let Err(e) = self.repath(ctx) {
                        warn!("{}: repath after mesh change failed: {e}", self.agent);
                    }
                }
            }
            _ => {}
        }
    }

    fn poll_pending(&mut self, ctx: &mut NavContext<'_>) {
        let Some(pending) = self.pending else {
            return;
        };
        match ctx.paths.poll(pending.ticket) {
            PathPoll::Pending(_) => {}
            PathPoll::Ready(path) => {
                self.pending = None;
                debug!("{}: path to {:?} delivered for {}", self.agent, pending.destination, pending.ticket);
                match pending.purpose {
                    Purpose::Travel => {
                        self.clear_session(ctx);
                        self.install_route(NavSession::Path(PathSession::owned(path)));
                    }
                    Purpose::Cover(cover) => {
                        self.clear_session(ctx);
                        if ctx.cover.reserve(cover, self.agent) {
                            self.install_route(NavSession::Cover(CoverSession {
                                cover,
                                route: PathSession::owned(path),
                            }));
                        } else {
                            warn!("{}: cover {cover} taken while its path was pending", self.agent);
                            ctx.paths.release(path);
                            self.goal = None;
                            self.state = MoveState::Stopped;
                            self.events.push(NavEvent::CoverLost(cover));
                        }
                    }
                }
            }
            PathPoll::Failed(e) => {
                self.pending = None;
                if let Purpose::Cover(cover) = pending.purpose {
                    if self.cover() != Some(cover) {
                        ctx.cover.release(cover, self.agent);
                    }
                }
                let _ = self.path_failed(e);
            }
        }
    }

    fn install_route(&mut self, session: NavSession) {
        self.session = session;
        self.goal = None;
        self.start_moving();
        self.events.push(NavEvent::PathSuccess);
        debug!("{}: path installed, mode {}", self.agent, self.active_mode());
    }

    /// Release everything the current mode holds: owned paths, awaited and
    /// pending requests, and cover reservations.
    fn clear_session(&mut self, ctx: &mut NavContext<'_>) {
        match std::mem::take(&mut self.session) {
            NavSession::Idle | NavSession::Follow(_) => {}
            NavSession::Path(route) => route.dispose(ctx.paths),
            NavSession::Cover(cover) => {
                cover.route.dispose(ctx.paths);
                ctx.cover.release(cover.cover, self.agent);
            }
        }
        if let Some(cover) = self.occupied_cover.take() {
            ctx.cover.release(cover, self.agent);
        }
        self.cancel_pending(ctx);
        self.jump = JumpState::None;
    }

    fn cancel_pending(&mut self, ctx: &mut NavContext<'_>) {
        if let Some(pending) = self.pending.take() {
            ctx.paths.cancel(pending.ticket);
            if let Purpose::Cover(cover) = pending.purpose {
                if self.cover() != Some(cover) {
                    ctx.cover.release(cover, self.agent);
                }
            }
            debug!("{}: cancelled pending request {}", self.agent, pending.ticket);
        }
    }

    /// Clear the route after a failed repath, keeping `Stuck`.
    fn abandon_route(&mut self, ctx: &mut NavContext<'_>) {
        let stuck = self.state == MoveState::Stuck;
        self.clear_session(ctx);
        self.goal = None;
        self.state = if stuck { MoveState::Stuck } else { MoveState::Stopped };
    }

    fn route_failed(&mut self, e: PathError) {
        if self.state != MoveState::Stuck {
            self.state = MoveState::Stopped;
        }
        self.goal = None;
        let _ = self.path_failed(e);
    }

    fn path_failed(&mut self, e: PathError) -> AgentError {
        warn!("{}: path request failed: {e}", self.agent);
        self.events.push(NavEvent::PathFailed(e.clone()));
        AgentError::Path(e)
    }

    fn arrive(&mut self) {
        info!("{}: reached destination at {:?}", self.agent, self.position);
        self.state = MoveState::Stopped;
        self.events.push(NavEvent::ReachedDestination);
    }

    fn start_moving(&mut self) {
        self.state = MoveState::Moving;
        self.stuck.reset();
    }

    /// Move to `state` unless a stall is being reported.
    fn enter_motion(&mut self, state: MoveState) {
        if self.state != MoveState::Stuck {
            self.state = state;
        }
    }
}
