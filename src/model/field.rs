//! Field types: text placeholders bound to roster columns.

use crate::fonts::FontWeight;
use serde::{Deserialize, Serialize};

/// Identifier of a placed field, unique within a layout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(pub u64);

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "field-{}", self.0)
    }
}

/// A placed text field.
///
/// `x`/`y` are the top-left anchor of the text line in placement units,
/// with y growing downward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: FieldId,
    /// Roster column whose value is drawn
    pub column: String,
    pub x: f32,
    pub y: f32,
    /// Font family id from the font catalog
    pub font_family: String,
    pub font_weight: FontWeight,
    /// Font size in points
    pub font_size_pt: f32,
}

/// Everything needed to place a new field; the session assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub column: String,
    pub font_family: String,
    pub font_weight: FontWeight,
    pub font_size_pt: f32,
    pub x: f32,
    pub y: f32,
}

impl FieldSpec {
    /// Describe a field anchored at the origin.
    pub fn new(
        column: impl Into<String>,
        font_family: impl Into<String>,
        font_weight: FontWeight,
        font_size_pt: f32,
    ) -> Self {
        Self {
            column: column.into(),
            font_family: font_family.into(),
            font_weight,
            font_size_pt,
            x: 0.0,
            y: 0.0,
        }
    }

    /// Set the position.
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub(crate) fn into_field(self, id: FieldId) -> Field {
        Field {
            id,
            column: self.column,
            x: clamp_coord(self.x),
            y: clamp_coord(self.y),
            font_family: self.font_family,
            font_weight: self.font_weight,
            font_size_pt: self.font_size_pt,
        }
    }
}

/// Clamp a placement coordinate to the non-negative range.
pub(crate) fn clamp_coord(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_into_field_clamps_negative() {
        let field = FieldSpec::new("Name", "sans", FontWeight::REGULAR, 14.0)
            .at(-5.0, 20.0)
            .into_field(FieldId(1));
        assert_eq!(field.x, 0.0);
        assert_eq!(field.y, 20.0);
        assert_eq!(field.id.to_string(), "field-1");
    }

    #[test]
    fn test_clamp_nan() {
        assert_eq!(clamp_coord(f32::NAN), 0.0);
        assert_eq!(clamp_coord(3.5), 3.5);
    }
}
