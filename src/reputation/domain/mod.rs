//! Domain model for provider reputation.

mod error;
mod provider;
mod rank;
mod rating;

pub use error::ReputationDomainError;
pub use provider::{Provider, Reputation};
pub use rank::{ProviderRank, RankStatistics, calculate_rank};
pub use rating::Rating;
