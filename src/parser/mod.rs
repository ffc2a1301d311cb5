//! Input parsing: roster text and template documents.

mod options;
mod roster;
mod template;

pub use options::RosterOptions;
pub use roster::RosterParser;
pub use template::ingest_template;
