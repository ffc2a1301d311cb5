//! Batch rendering of generated documents.
//!
//! [`BatchRenderer`] takes a template, the placed fields and a roster and
//! produces one PDF per record. Options control scaling, parallelism,
//! progress reporting and cancellation.

#[cfg(feature = "async")]
mod async_render;
mod batch;
mod cancel;
mod events;
mod options;
mod page;
mod result;

#[cfg(feature = "async")]
pub use async_render::render_async;
pub use batch::BatchRenderer;
pub use cancel::CancellationToken;
pub use events::{progress_channel, BatchEvent};
pub use options::RenderOptions;
pub use page::ASCENT_RATIO;
pub use result::{BatchOutput, BatchStats, FallbackReason, RenderWarning, WarningKind};
