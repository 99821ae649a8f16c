//! `nav-trace`: trace output for navigation runs.
//!
//! | Backend | Files created                            |
//! |---------|------------------------------------------|
//! | CSV     | `agent_snapshots.csv`, `nav_events.csv`  |
//!
//! Backends implement [`TraceWriter`] and are driven by [`TraceObserver`],
//! which implements `nav_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use nav_trace::{CsvTraceWriter, TraceObserver};
//!
//! let writer = CsvTraceWriter::new(Path::new("./output"))?;
//! let mut obs = TraceObserver::new(writer);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("trace error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvTraceWriter;
pub use error::{TraceError, TraceResult};
pub use observer::TraceObserver;
pub use row::{EventRow, SnapshotRow};
pub use writer::TraceWriter;
