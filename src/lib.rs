//! Student roster engine: mark validation, grading, class statistics and
//! CSV persistence, with plain-text report rendering on top.

pub mod config;
pub mod error;
pub mod grading;
pub mod output;
pub mod record;
pub mod report;
pub mod roster;
pub mod stats;

pub use error::{MarkError, Result, RosterError};
pub use record::StudentRecord;
pub use roster::Roster;
