//! Async entry point, enabled by the `async` feature.

use std::sync::Arc;

use super::{BatchOutput, BatchRenderer};
use crate::error::{Error, Result};
use crate::layout::LayoutSnapshot;

/// Render a snapshot on tokio's blocking pool.
///
/// Wrap the returned future in `tokio::time::timeout` to bound the batch;
/// pair it with a [`super::CancellationToken`] to stop the workers as well.
pub async fn render_async(renderer: Arc<BatchRenderer>, snapshot: LayoutSnapshot) -> Result<BatchOutput> {
    tokio::task::spawn_blocking(move || renderer.render_snapshot(&snapshot))
        .await
        .map_err(|e| Error::FatalRender(format!("render task failed: {}", e)))?
}
