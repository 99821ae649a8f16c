//! `TraceObserver<W>`: bridges `SimObserver` to a `TraceWriter`.

use log::warn;
use nav_agent::NavEvent;
use nav_core::{AgentId, Tick};
use nav_sim::{SimAgent, SimObserver};

use crate::row::{EventRow, SnapshotRow};
use crate::writer::TraceWriter;
use crate::{TraceError, TraceResult};

/// A [`SimObserver`] that writes agent snapshots and navigation events to
/// any [`TraceWriter`].
///
/// Errors from the writer are stored internally because `SimObserver`
/// methods have no return value.  After `sim.run()` returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct TraceObserver<W: TraceWriter> {
    writer:     W,
    last_error: Option<TraceError>,
}

impl<W: TraceWriter> TraceObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<TraceError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: TraceResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!("trace write failed: {e}");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: TraceWriter> SimObserver for TraceObserver<W> {
    fn on_event(&mut self, tick: Tick, agent: AgentId, event: &NavEvent) {
        let row = EventRow { tick: tick.0, agent_id: agent.0, event: event.to_string() };
        let result = self.writer.write_event(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, agents: &[SimAgent]) {
        let rows: Vec<SnapshotRow> = agents
            .iter()
            .map(|agent| SnapshotRow {
                tick:       tick.0,
                agent_id:   agent.id.0,
                x:          agent.body.position.x,
                y:          agent.body.position.y,
                z:          agent.body.position.z,
                yaw:        agent.body.yaw,
                move_state: agent.controller.state(),
                mode:       agent.controller.active_mode(),
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
