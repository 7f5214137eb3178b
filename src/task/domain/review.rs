//! Review recorded when a task completes.

use crate::reputation::domain::Rating;
use serde::{Deserialize, Serialize};

/// Poster's review of the assigned provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskReview {
    rating: Rating,
    comment: String,
    recommend: bool,
}

impl TaskReview {
    /// Creates a review. The comment may be empty.
    #[must_use]
    pub fn new(rating: Rating, comment: impl Into<String>, recommend: bool) -> Self {
        Self {
            rating,
            comment: comment.into().trim().to_owned(),
            recommend,
        }
    }

    /// Returns the star rating.
    #[must_use]
    pub const fn rating(&self) -> Rating {
        self.rating
    }

    /// Returns the review text.
    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Returns whether the poster recommends the provider.
    #[must_use]
    pub const fn recommend(&self) -> bool {
        self.recommend
    }
}
