//! Interactive layout session.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::fonts::FontCatalog;
use crate::model::{clamp_coord, Field, FieldId, FieldSpec, Roster, Template};

/// Progress of a session towards rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing loaded
    Empty,
    /// Template loaded, no roster
    HasTemplate,
    /// Roster loaded, no template
    HasRoster,
    /// Both inputs loaded, no fields yet
    HasRosterAndTemplate,
    /// Both inputs loaded and at least one field placed
    Ready,
}

/// Outcome of loading a roster into a session that already has fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReloadReport {
    /// Fields removed because their column no longer exists
    pub dropped: Vec<FieldId>,
}

impl ReloadReport {
    /// Number of dropped fields.
    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }

    /// Check if any field was dropped.
    pub fn has_warnings(&self) -> bool {
        !self.dropped.is_empty()
    }
}

/// Read-only hand-off from a session to the renderer.
#[derive(Debug, Clone)]
pub struct LayoutSnapshot {
    pub template: Template,
    pub roster: Arc<Roster>,
    pub fields: Vec<Field>,
}

/// In-memory layout state: template, roster and the placed fields.
///
/// All operations are synchronous; a session is meant to be driven by one
/// caller translating user input into calls.
#[derive(Debug, Clone)]
pub struct LayoutSession {
    catalog: Arc<FontCatalog>,
    template: Option<Template>,
    roster: Option<Arc<Roster>>,
    fields: Vec<Field>,
    next_id: u64,
}

impl LayoutSession {
    /// Create an empty session validating typography against `catalog`.
    pub fn new(catalog: impl Into<Arc<FontCatalog>>) -> Self {
        Self {
            catalog: catalog.into(),
            template: None,
            roster: None,
            fields: Vec::new(),
            next_id: 1,
        }
    }

    /// The font catalog this session validates against.
    pub fn catalog(&self) -> &FontCatalog {
        &self.catalog
    }

    /// Install or replace the template. Placed fields are kept.
    pub fn load_template(&mut self, template: Template) {
        if self.template.is_some() {
            log::info!("Replacing template; {} fields kept", self.fields.len());
        }
        self.template = Some(template);
    }

    /// Install or replace the roster.
    ///
    /// Fields bound to columns the new roster lacks are dropped and reported.
    pub fn load_roster(&mut self, roster: impl Into<Arc<Roster>>) -> ReloadReport {
        let roster = roster.into();
        let mut report = ReloadReport::default();
        self.fields.retain(|field| {
            let keep = roster.has_column(&field.column);
            if !keep {
                report.dropped.push(field.id);
            }
            keep
        });
        if report.has_warnings() {
            log::warn!(
                "Roster reload dropped {} field(s) bound to missing columns",
                report.dropped_count()
            );
        }
        self.roster = Some(roster);
        report
    }

    /// Place a new field.
    ///
    /// Fails without changing the session when the column is not a roster
    /// header or the typography is not declared by the catalog.
    pub fn add_field(&mut self, spec: FieldSpec) -> Result<Field> {
        let has_column = self
            .roster
            .as_ref()
            .is_some_and(|r| r.has_column(&spec.column));
        if !has_column {
            return Err(Error::InvalidColumn(spec.column));
        }

        self.catalog.validate(&spec.font_family, spec.font_weight)?;

        if !spec.font_size_pt.is_finite() || spec.font_size_pt <= 0.0 {
            return Err(Error::InvalidTypography(format!(
                "font size must be a positive number, got {}",
                spec.font_size_pt
            )));
        }

        let id = FieldId(self.next_id);
        self.next_id += 1;
        let field = spec.into_field(id);
        log::debug!(
            "Added {} bound to '{}' at ({}, {})",
            id,
            field.column,
            field.x,
            field.y
        );
        self.fields.push(field.clone());
        Ok(field)
    }

    /// Move a field, clamping the position to non-negative coordinates.
    ///
    /// Unknown ids are ignored.
    pub fn move_field(&mut self, id: FieldId, x: f32, y: f32) {
        match self.fields.iter_mut().find(|f| f.id == id) {
            Some(field) => {
                field.x = clamp_coord(x);
                field.y = clamp_coord(y);
            }
            None => log::debug!("move_field: unknown {}", id),
        }
    }

    /// Remove a field. Removing an absent id does nothing.
    pub fn remove_field(&mut self, id: FieldId) {
        self.fields.retain(|f| f.id != id);
    }

    /// Remove every field.
    pub fn clear_fields(&mut self) {
        self.fields.clear();
    }

    /// Drop all inputs and fields.
    pub fn reset(&mut self) {
        self.template = None;
        self.roster = None;
        self.fields.clear();
    }

    /// Whether the layout may proceed to rendering.
    pub fn can_finalize(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        match (self.template.is_some(), self.roster.is_some()) {
            (false, false) => SessionState::Empty,
            (true, false) => SessionState::HasTemplate,
            (false, true) => SessionState::HasRoster,
            (true, true) if self.can_finalize() => SessionState::Ready,
            (true, true) => SessionState::HasRosterAndTemplate,
        }
    }

    /// Placed fields in insertion order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a field.
    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// The loaded roster.
    pub fn roster(&self) -> Option<&Roster> {
        self.roster.as_deref()
    }

    /// The loaded template.
    pub fn template(&self) -> Option<&Template> {
        self.template.as_ref()
    }

    /// Snapshot the layout for rendering.
    pub fn snapshot(&self) -> Result<LayoutSnapshot> {
        if !self.can_finalize() {
            return Err(Error::EmptyFieldSet);
        }
        let template = self.template.clone().ok_or(Error::MissingInput("template"))?;
        let roster = self.roster.clone().ok_or(Error::MissingInput("roster"))?;
        Ok(LayoutSnapshot {
            template,
            roster,
            fields: self.fields.clone(),
        })
    }
}
