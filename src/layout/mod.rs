//! Field placement.

mod session;

pub use session::{LayoutSession, LayoutSnapshot, ReloadReport, SessionState};
