//! Provider bids embedded in a task.

use super::{BidId, TaskDomainError};
use crate::identity::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A provider's priced, timed offer to perform a task. Immutable once placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    id: BidId,
    provider: UserId,
    price: f64,
    estimated_time: String,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}

impl Bid {
    /// Creates a validated bid.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidPrice`] for a non-positive or
    /// non-finite price and [`TaskDomainError::EmptyEstimatedTime`] for a
    /// blank estimate.
    pub fn new(
        provider: UserId,
        price: f64,
        estimated_time: impl Into<String>,
        comment: Option<String>,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        if !is_positive_amount(price) {
            return Err(TaskDomainError::InvalidPrice);
        }
        let estimate = estimated_time.into().trim().to_owned();
        if estimate.is_empty() {
            return Err(TaskDomainError::EmptyEstimatedTime);
        }

        Ok(Self {
            id: BidId::new(),
            provider,
            price,
            estimated_time: estimate,
            comment: comment
                .map(|text| text.trim().to_owned())
                .filter(|text| !text.is_empty()),
            created_at: clock.utc(),
        })
    }

    /// Returns the bid identifier.
    #[must_use]
    pub const fn id(&self) -> BidId {
        self.id
    }

    /// Returns the bidding provider.
    #[must_use]
    pub const fn provider(&self) -> UserId {
        self.provider
    }

    /// Returns the offered price.
    #[must_use]
    pub const fn price(&self) -> f64 {
        self.price
    }

    /// Returns the provider's time estimate.
    #[must_use]
    pub fn estimated_time(&self) -> &str {
        &self.estimated_time
    }

    /// Returns the optional note attached to the bid.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Returns when the bid was placed.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Returns `true` for finite amounts strictly greater than zero.
pub(super) fn is_positive_amount(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
