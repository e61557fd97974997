use std::num::IntErrorKind;

use crate::error::{MarkError, Result};

pub const MIN_MARK: i64 = 0;
pub const MAX_MARK: i64 = 100;

/// Parses a single textual mark and checks it lies in `0..=100`.
///
/// Surrounding whitespace and a leading sign are accepted; anything else that
/// is not a base-10 integer literal is rejected. Literals too large for the
/// integer type are reported as out of range rather than as non-integers.
pub fn validate(token: &str) -> Result<i64> {
    let mark = token.trim().parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => MarkError::OutOfRange,
        _ => MarkError::NotAnInteger,
    })?;

    if !(MIN_MARK..=MAX_MARK).contains(&mark) {
        return Err(MarkError::OutOfRange.into());
    }

    Ok(mark)
}
