//! `nav-agent`: the per-agent navigation controller.
//!
//! Given a destination, a path, a cover point or a target to follow, the
//! [`NavigationController`] turns the agent's current position into a
//! [`MotionCommand`] every tick, detects arrival and stalls, and keeps the
//! competing movement intents mutually exclusive.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                          |
//! |----------------|-------------------------------------------------------------------|
//! | [`motion`]     | `MoveState`, `ActorState`, `MotionCommand`, `JumpState`           |
//! | [`goal`]       | `MotionGoal`, `AimState`, `AimObject`                             |
//! | [`session`]    | `NavSession` (tagged union), `PathSession`, `CoverSession`, `FollowSession`, `NavMode` |
//! | [`stuck`]      | `StuckDetector`                                                   |
//! | [`event`]      | `NavEvent`, `NavObserver`, `NoopObserver`                         |
//! | [`context`]    | `NavContext<'a>`: collaborators borrowed for one call            |
//! | [`controller`] | `NavigationController`                                            |
//! | [`error`]      | `AgentError`, `AgentResult<T>`                                    |
//!
//! # Design notes
//!
//! The controller holds no references to the world.  Every call that may
//! touch a collaborator takes a [`NavContext`], so clearing a session can
//! always hand an owned path back to the path service and drop a cover
//! reservation on the spot.
//!
//! Lifecycle events are queued while a tick is computed and dispatched to a
//! [`NavObserver`] once the command is ready.  Observers get `&mut` access
//! to the controller, so `stop()`, `repath()` or a new goal can be issued
//! straight from a callback; anything those calls emit is delivered with
//! the next tick.

pub mod context;
pub mod controller;
pub mod error;
pub mod event;
pub mod goal;
pub mod motion;
pub mod session;
pub mod stuck;


pub use context::NavContext;
pub use controller::NavigationController;
pub use error::{AgentError, AgentResult};
pub use event::{NavEvent, NavObserver, NoopObserver};
pub use goal::{AimObject, AimState, MotionGoal};
pub use motion::{ActorState, JumpState, MotionCommand, MoveState};
pub use session::{CoverSession, FollowSession, NavMode, NavSession, PathSession};
pub use stuck::StuckDetector;
