//! Mark validation and letter grading.
//!
//! Pure functions shared by the record builder, the statistics engine and
//! the renderers.

pub mod grade;
pub mod utility;
pub mod validate;

pub use grade::{Grade, PASS_PERCENTAGE, classify};
pub use validate::validate;
