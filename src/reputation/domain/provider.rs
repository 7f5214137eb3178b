//! Provider aggregate root and its reputation statistics.

use super::{ProviderRank, RankStatistics, Rating, ReputationDomainError, calculate_rank};
use crate::identity::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Aggregate review statistics for a provider.
///
/// The mean is always derived from the running rating total, so applying
/// reviews one at a time yields the same average as averaging them in bulk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reputation {
    average_rating: f64,
    total_reviews: u32,
    rating_total: u32,
    completed_tasks: u32,
    recommendations: u32,
    rank: ProviderRank,
}

impl Default for Reputation {
    fn default() -> Self {
        Self {
            average_rating: 0.0,
            total_reviews: 0,
            rating_total: 0,
            completed_tasks: 0,
            recommendations: 0,
            rank: ProviderRank::Bronze,
        }
    }
}

impl Reputation {
    /// Returns the mean rating rounded to one decimal place.
    #[must_use]
    pub const fn average_rating(&self) -> f64 {
        self.average_rating
    }

    /// Returns the number of reviews received.
    #[must_use]
    pub const fn total_reviews(&self) -> u32 {
        self.total_reviews
    }

    /// Returns the sum of all ratings received.
    #[must_use]
    pub const fn rating_total(&self) -> u32 {
        self.rating_total
    }

    /// Returns the number of completed tasks.
    #[must_use]
    pub const fn completed_tasks(&self) -> u32 {
        self.completed_tasks
    }

    /// Returns the number of recommending reviews.
    #[must_use]
    pub const fn recommendations(&self) -> u32 {
        self.recommendations
    }

    /// Returns the current reputation tier.
    #[must_use]
    pub const fn rank(&self) -> ProviderRank {
        self.rank
    }

    /// Returns the statistics the rank calculator consumes.
    #[must_use]
    pub const fn statistics(&self) -> RankStatistics {
        RankStatistics {
            average_rating: self.average_rating,
            completed_tasks: self.completed_tasks,
            recommendations: self.recommendations,
        }
    }

    /// Folds one completed-task review into the statistics and re-ranks.
    pub fn record_review(&mut self, rating: Rating, recommend: bool) {
        if recommend {
            self.recommendations = self.recommendations.saturating_add(1);
        }
        self.total_reviews = self.total_reviews.saturating_add(1);
        self.rating_total = self
            .rating_total
            .saturating_add(u32::from(rating.value()));
        self.average_rating = one_decimal_mean(self.rating_total, self.total_reviews);
        self.completed_tasks = self.completed_tasks.saturating_add(1);
        self.rank = calculate_rank(self.statistics());
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "average ratings are published as one-decimal floating point values"
)]
fn one_decimal_mean(total: u32, count: u32) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let mean = f64::from(total) / f64::from(count);
    (mean * 10.0).round() / 10.0
}

/// Provider profile carrying the reputation owned by the completion engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    id: UserId,
    display_name: String,
    reputation: Reputation,
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Provider {
    /// Registers a provider profile with empty reputation.
    ///
    /// # Errors
    ///
    /// Returns [`ReputationDomainError::EmptyDisplayName`] when the name is
    /// blank.
    pub fn register(
        id: UserId,
        display_name: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, ReputationDomainError> {
        let timestamp = clock.utc();
        Ok(Self {
            id,
            display_name: normalize_display_name(display_name.into())?,
            reputation: Reputation::default(),
            version: 1,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the provider's user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the public display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the reputation statistics.
    #[must_use]
    pub const fn reputation(&self) -> &Reputation {
        &self.reputation
    }

    /// Returns the optimistic-concurrency version.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Changes the display name without touching reputation.
    ///
    /// # Errors
    ///
    /// Returns [`ReputationDomainError::EmptyDisplayName`] when the name is
    /// blank.
    pub fn rename(
        &mut self,
        display_name: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), ReputationDomainError> {
        self.display_name = normalize_display_name(display_name.into())?;
        self.touch(clock);
        Ok(())
    }

    /// Records the review left when one of the provider's tasks completed.
    pub fn record_review(&mut self, rating: Rating, recommend: bool, clock: &impl Clock) {
        self.reputation.record_review(rating, recommend);
        self.touch(clock);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.version = self.version.saturating_add(1);
        self.updated_at = clock.utc();
    }
}

fn normalize_display_name(raw: String) -> Result<String, ReputationDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ReputationDomainError::EmptyDisplayName);
    }
    Ok(trimmed.to_owned())
}
