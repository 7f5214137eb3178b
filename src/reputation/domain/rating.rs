//! Validated review rating.

use super::ReputationDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Star rating attached to a task review, between 1 and 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Lowest accepted rating.
    pub const MIN: u8 = 1;
    /// Highest accepted rating.
    pub const MAX: u8 = 5;

    /// Creates a validated rating.
    ///
    /// # Errors
    ///
    /// Returns [`ReputationDomainError::InvalidRating`] when the value is not
    /// between [`Rating::MIN`] and [`Rating::MAX`].
    pub fn new(value: i64) -> Result<Self, ReputationDomainError> {
        u8::try_from(value)
            .ok()
            .filter(|stars| (Self::MIN..=Self::MAX).contains(stars))
            .map(Self)
            .ok_or(ReputationDomainError::InvalidRating(value))
    }

    /// Returns the number of stars.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = ReputationDomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
