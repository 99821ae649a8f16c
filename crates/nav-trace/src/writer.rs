//! The `TraceWriter` trait implemented by trace backends.

use crate::{EventRow, SnapshotRow, TraceResult};

/// Sink for snapshot and event rows.
///
/// Errors are returned to [`TraceObserver`][crate::TraceObserver], which
/// keeps the first one for [`take_error`][crate::TraceObserver::take_error].
pub trait TraceWriter {
    /// Write a batch of agent snapshots.
    fn write_snapshots(&mut self, rows: &[SnapshotRow]) -> TraceResult<()>;

    /// Write one navigation event.
    fn write_event(&mut self, row: &EventRow) -> TraceResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> TraceResult<()>;
}
