//! Batch renderer: one document per roster record.

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;

use super::page::{DrawnRecord, PreparedPage};
use super::{BatchEvent, BatchOutput, BatchStats, RenderOptions};
use crate::error::{Error, Result};
use crate::fonts::FontCatalog;
use crate::layout::LayoutSnapshot;
use crate::model::{Field, GeneratedDocument, Roster, Template};

/// Renders a layout against every record of a roster.
///
/// Records are drawn in parallel on a dedicated thread pool, but the
/// output always lists documents in roster order. A failure in any record
/// fails the whole batch; font fallbacks are reported as warnings instead.
#[derive(Debug, Clone)]
pub struct BatchRenderer {
    catalog: Arc<FontCatalog>,
    options: RenderOptions,
}

impl BatchRenderer {
    /// Create a renderer resolving faces through `catalog`.
    pub fn new(catalog: impl Into<Arc<FontCatalog>>, options: RenderOptions) -> Self {
        Self {
            catalog: catalog.into(),
            options,
        }
    }

    /// The render options.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render a snapshot taken from a layout session.
    pub fn render_snapshot(&self, snapshot: &LayoutSnapshot) -> Result<BatchOutput> {
        self.render(&snapshot.template, &snapshot.fields, &snapshot.roster)
    }

    /// Render `fields` on `template` once per record of `roster`.
    pub fn render(&self, template: &Template, fields: &[Field], roster: &Roster) -> Result<BatchOutput> {
        let started = Instant::now();
        self.validate(fields, roster)?;

        let page = PreparedPage::prepare(
            template,
            fields,
            &self.catalog,
            self.options.scale,
            self.options.compress,
        )?;

        let total = roster.len();
        log::info!(
            "Rendering {} record(s) with {} field(s)",
            total,
            fields.len()
        );
        self.options.emit(BatchEvent::Started { total });

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.workers)
            .thread_name(|i| format!("certgen-render-{}", i))
            .build()
            .map_err(|e| Error::FatalRender(format!("cannot start workers: {}", e)))?;

        let drawn: Vec<DrawnRecord> = pool.install(|| {
            roster
                .records()
                .par_iter()
                .enumerate()
                .map(|(index, record)| {
                    if self.options.is_cancelled() {
                        return Err(Error::Cancelled);
                    }
                    let drawn = page.draw(index, record, fields)?;
                    self.options.emit(BatchEvent::RecordRendered {
                        index,
                        warnings: drawn.warnings.len(),
                    });
                    Ok(drawn)
                })
                .collect::<Result<Vec<_>>>()
        })?;

        let email_column = self.options.email_column.as_deref();
        let mut output = BatchOutput::default();
        let mut stats = BatchStats::new();
        for (index, (drawn, record)) in drawn.into_iter().zip(roster.records()).enumerate() {
            stats.add_document(
                drawn.bytes.len(),
                drawn.fields_drawn,
                drawn.warnings.len() as u32,
            );
            for warning in &drawn.warnings {
                log::warn!("{}", warning);
            }
            let recipient_email = email_column
                .and_then(|column| record.get(column))
                .map(str::trim)
                .filter(|email| !email.is_empty())
                .map(str::to_string);
            output.documents.push(GeneratedDocument {
                record_index: index,
                fallback_used: !drawn.warnings.is_empty(),
                bytes: drawn.bytes,
                recipient_email,
            });
            output.warnings.extend(drawn.warnings);
        }
        stats.elapsed_ms = started.elapsed().as_millis() as u64;
        output.stats = stats;

        self.options.emit(BatchEvent::Finished);
        log::info!(
            "Rendered {} document(s), {} warning(s) in {} ms",
            output.len(),
            output.warnings.len(),
            output.stats.elapsed_ms
        );
        Ok(output)
    }

    /// Checks that must pass before any record is drawn.
    fn validate(&self, fields: &[Field], roster: &Roster) -> Result<()> {
        if fields.is_empty() {
            return Err(Error::EmptyFieldSet);
        }
        let scale = self.options.scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(Error::FatalRender(format!(
                "scale must be a positive number, got {}",
                scale
            )));
        }
        if let Some(field) = fields.iter().find(|f| !roster.has_column(&f.column)) {
            return Err(Error::FatalRender(format!(
                "{} is bound to column '{}' which the roster lacks",
                field.id, field.column
            )));
        }
        if let Some(ref column) = self.options.email_column {
            if !roster.has_column(column) {
                return Err(Error::FatalRender(format!(
                    "e-mail column '{}' does not exist in the roster",
                    column
                )));
            }
        }
        Ok(())
    }
}
