//! Date-seeded selection of the block of the day.
//!
//! The index is derived from a cheap trigonometric hash of the calendar date:
//!
//! ```text
//! seed  = year * 10000 + month * 100 + day
//! frac  = (sin(seed) * 10000) mod 1
//! index = floor(|frac| * len)
//! ```
//!
//! It is stable for a given date and list length and changes from day to day.
//! It is neither uniform nor unpredictable, and it must stay bit-for-bit
//! identical to the formula above so every instance agrees on the same block.

use crate::errors::BlockError;
use chrono::{Datelike, NaiveDate};
use tracing::debug;

/// Encode a date as `YYYYMMDD`.
pub fn date_seed(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 10_000 + i64::from(date.month()) * 100 + i64::from(date.day())
}

/// Fractional part of `sin(seed) * 10000`.
///
/// `%` on `f64` keeps the sign of the dividend, so the result lies in `(-1, 1)`.
pub fn seed_fraction(seed: i64) -> f64 {
    ((seed as f64).sin() * 10_000.0) % 1.0
}

/// Pick an index in `0..len` for the given date.
///
/// Fails with [`BlockError::EmptySource`] when `len` is zero.
pub fn select_index(date: NaiveDate, len: usize) -> Result<usize, BlockError> {
    if len == 0 {
        return Err(BlockError::EmptySource);
    }

    let seed = date_seed(date);
    let frac = seed_fraction(seed).abs();
    // frac < 1, but guard against the product rounding up to len.
    let index = ((frac * len as f64).floor() as usize).min(len - 1);
    debug!(%date, seed, frac, len, index, "Selected block index");
    Ok(index)
}
