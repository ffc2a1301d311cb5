//! Domain model types for certificate generation.
//!
//! These types carry data between ingestion, the layout session and the
//! batch renderer. They do not perform I/O.

mod field;
mod output;
mod roster;
mod template;

pub use field::{Field, FieldId, FieldSpec};
pub(crate) use field::clamp_coord;
pub use output::GeneratedDocument;
pub use roster::{Record, Roster};
pub use template::{PageBox, Template};
