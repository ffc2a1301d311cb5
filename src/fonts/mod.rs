//! Font catalog, weights, encoding and face loading.
//!
//! The catalog declares which weights each family supports; the layout
//! session validates placements against it and the renderer resolves the
//! same declarations into PDF fonts.

mod catalog;
pub mod encoding;
mod face;
mod weight;

pub use catalog::{FaceSource, FontCatalog, FontFamily, FALLBACK_FONT, STANDARD_FONTS};
pub use face::{FaceMetrics, ResolvedFace, TrueTypeFace, FIRST_CHAR, LAST_CHAR};
pub use weight::FontWeight;
