//! Rendering options and configuration.

use crossbeam_channel::Sender;

use super::{BatchEvent, CancellationToken};

/// Options for rendering a batch.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Page points per placement unit, applied to x, y and font size alike
    pub scale: f32,

    /// Worker threads (0 = one per CPU)
    pub workers: usize,

    /// Roster column holding recipient e-mail addresses
    pub email_column: Option<String>,

    /// Flate-compress the streams added to each document
    pub compress: bool,

    /// Cancellation flag checked between records
    pub cancel: Option<CancellationToken>,

    /// Progress event sink
    pub progress: Option<Sender<BatchEvent>>,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the placement-to-page scale factor.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Set the number of worker threads.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Render on the calling thread's pool with a single worker.
    pub fn sequential(mut self) -> Self {
        self.workers = 1;
        self
    }

    /// Set the e-mail column.
    pub fn with_email_column(mut self, column: impl Into<String>) -> Self {
        self.email_column = Some(column.into());
        self
    }

    /// Enable or disable stream compression.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Attach a cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Attach a progress event sink.
    pub fn with_progress(mut self, sender: Sender<BatchEvent>) -> Self {
        self.progress = Some(sender);
        self
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|c| c.is_cancelled())
    }

    pub(crate) fn emit(&self, event: BatchEvent) {
        if let Some(ref tx) = self.progress {
            // receiver may be gone; progress is best-effort
            let _ = tx.send(event);
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            workers: 0,
            email_column: None,
            compress: true,
            cancel: None,
            progress: None,
        }
    }
}
