//! CSV trace backend.
//!
//! Creates two files in the configured output directory:
//! - `agent_snapshots.csv`
//! - `nav_events.csv`

use std::fs::{self, File};
use std::path::Path;

use csv::Writer;
use log::debug;

use crate::writer::TraceWriter;
use crate::{EventRow, SnapshotRow, TraceResult};

pub const SNAPSHOT_FILE: &str = "agent_snapshots.csv";
pub const EVENT_FILE: &str = "nav_events.csv";

/// Writes a navigation trace to two CSV files.
pub struct CsvTraceWriter {
    snapshots: Writer<File>,
    events:    Writer<File>,
    finished:  bool,
}

impl CsvTraceWriter {
    /// Create `dir` if needed, open (or truncate) the two CSV files and
    /// write the header rows.
    pub fn new(dir: &Path) -> TraceResult<Self> {
        fs::create_dir_all(dir)?;

        let mut snapshots = Writer::from_path(dir.join(SNAPSHOT_FILE))?;
        snapshots.write_record(["tick", "agent_id", "x", "y", "z", "yaw", "move_state", "mode"])?;

        let mut events = Writer::from_path(dir.join(EVENT_FILE))?;
        events.write_record(["tick", "agent_id", "event"])?;

        debug!("writing trace to {}", dir.display());
        Ok(Self { snapshots, events, finished: false })
    }
}

impl TraceWriter for CsvTraceWriter {
    fn write_snapshots(&mut self, rows: &[SnapshotRow]) -> TraceResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.tick.to_string(),
                row.agent_id.to_string(),
                format!("{:.3}", row.x),
                format!("{:.3}", row.y),
                format!("{:.3}", row.z),
                format!("{:.4}", row.yaw),
                row.move_state.to_string(),
                row.mode.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_event(&mut self, row: &EventRow) -> TraceResult<()> {
        self.events.write_record(&[row.tick.to_string(), row.agent_id.to_string(), row.event.clone()])?;
        Ok(())
    }

    fn finish(&mut self) -> TraceResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.events.flush()?;
        Ok(())
    }
}
