//! Reputation tiers and the pure rank calculator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reputation tier derived from a provider's aggregate statistics.
///
/// Variants are declared from lowest to highest so that the derived ordering
/// matches tier seniority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProviderRank {
    /// Floor tier; every provider holds at least this rank.
    Bronze,
    /// Established providers.
    Silver,
    /// Highly rated, frequently recommended providers.
    Gold,
    /// Top tier.
    Platinum,
}

impl ProviderRank {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
        }
    }
}

impl fmt::Display for ProviderRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate statistics consumed by [`calculate_rank`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankStatistics {
    /// Mean review rating, rounded to one decimal place.
    pub average_rating: f64,
    /// Number of tasks the provider has completed.
    pub completed_tasks: u32,
    /// Number of reviews that recommended the provider.
    pub recommendations: u32,
}

struct RankThreshold {
    rank: ProviderRank,
    min_average_rating: f64,
    min_completed_tasks: u32,
    min_recommendations: u32,
}

impl RankThreshold {
    fn admits(&self, stats: RankStatistics) -> bool {
        stats.average_rating >= self.min_average_rating
            && stats.completed_tasks >= self.min_completed_tasks
            && stats.recommendations >= self.min_recommendations
    }
}

/// Ordered from the most to the least demanding tier; first match wins.
const RANK_LADDER: [RankThreshold; 4] = [
    RankThreshold {
        rank: ProviderRank::Platinum,
        min_average_rating: 4.8,
        min_completed_tasks: 30,
        min_recommendations: 25,
    },
    RankThreshold {
        rank: ProviderRank::Gold,
        min_average_rating: 4.5,
        min_completed_tasks: 15,
        min_recommendations: 10,
    },
    RankThreshold {
        rank: ProviderRank::Silver,
        min_average_rating: 4.0,
        min_completed_tasks: 5,
        min_recommendations: 3,
    },
    RankThreshold {
        rank: ProviderRank::Bronze,
        min_average_rating: 3.5,
        min_completed_tasks: 1,
        min_recommendations: 0,
    },
];

/// Derives the reputation tier for the given statistics.
///
/// Each tier requires all three of its own thresholds simultaneously. Tiers
/// are tried from Platinum down to Bronze and the first match wins; anything
/// that matches no tier, including a `NaN` rating, is Bronze.
#[must_use]
pub fn calculate_rank(stats: RankStatistics) -> ProviderRank {
    RANK_LADDER
        .iter()
        .find(|threshold| threshold.admits(stats))
        .map_or(ProviderRank::Bronze, |threshold| threshold.rank)
}
