//! Field-level validation
//!
//! Every record type is built through a constructor that runs these checks,
//! so a value that reaches the store already satisfies its field invariants.
//! Nothing here touches the database.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::num::IntErrorKind;

pub const RATING_RANGE_MESSAGE: &str = "Rating must be between 1 and 5";
pub const GUEST_NAME_MESSAGE: &str = "Guest must have a name";
pub const GUEST_OCCUPATION_MESSAGE: &str = "Guest occupation cannot be empty.";
pub const EPISODE_DATE_MESSAGE: &str = "Date field must be a string and cannot be empty.";

/// Lowest accepted appearance rating
pub const MIN_RATING: i64 = 1;
/// Highest accepted appearance rating
pub const MAX_RATING: i64 = 5;

/// Appearance rating, guaranteed to lie in `MIN_RATING..=MAX_RATING`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(try_from = "i64", into = "i64")]
#[sqlx(transparent)]
pub struct Rating(i64);

impl Rating {
    pub fn new(value: i64) -> Result<Self> {
        if (MIN_RATING..=MAX_RATING).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::validation(RATING_RANGE_MESSAGE))
        }
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        Rating::new(value)
    }
}

impl From<Rating> for i64 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// Reject empty or whitespace-only text, returning the value unchanged otherwise
pub fn require_text(value: &str, message: &str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(Error::validation(message));
    }
    Ok(value.to_string())
}

/// Parse a raw integer field (form value, CLI argument)
///
/// Surrounding whitespace is ignored. Returns `None` for anything that is
/// not a base-10 integer, including fractional values such as `"4.5"`.
/// Digit strings beyond the `i64` range clamp to `i64::MAX` / `i64::MIN`:
/// they are still integers, and the clamped value fails the rating range
/// or the record lookup that follows.
pub fn parse_integer(raw: &str) -> Option<i64> {
    match raw.trim().parse::<i64>() {
        Ok(value) => Some(value),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

/// True when a raw form value is absent or blank
pub fn is_blank(raw: Option<&str>) -> bool {
    raw.map_or(true, |value| value.trim().is_empty())
}
