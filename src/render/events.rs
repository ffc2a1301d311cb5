//! Progress events emitted while a batch renders.

use crossbeam_channel::{Receiver, Sender};

/// Events sent on the progress channel of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// Validation passed; `total` records will be rendered.
    Started {
        /// Number of records in the batch
        total: usize,
    },

    /// One record finished. Events arrive in completion order, not
    /// record order.
    RecordRendered {
        /// Roster record index
        index: usize,
        /// Number of fallback warnings for this record
        warnings: usize,
    },

    /// Every record was rendered.
    Finished,
}

/// Create an unbounded progress channel.
pub fn progress_channel() -> (Sender<BatchEvent>, Receiver<BatchEvent>) {
    crossbeam_channel::unbounded()
}
