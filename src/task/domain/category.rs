//! Task categories offered by the marketplace.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of work a task asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskCategory {
    /// House or office cleaning.
    Cleaning,
    /// Plumbing repairs and installs.
    Plumbing,
    /// Electrical work.
    Electrical,
    /// General repairs.
    Handyman,
    /// Moving and removals.
    Moving,
    /// Courier and delivery errands.
    Delivery,
    /// Gardening and yard work.
    Gardening,
    /// Teaching and tutoring.
    Tutoring,
    /// Computer and device support.
    #[serde(rename = "Tech Support")]
    TechSupport,
    /// Anything else.
    Other,
}

impl TaskCategory {
    /// Every category, in display order.
    pub const ALL: [Self; 10] = [
        Self::Cleaning,
        Self::Plumbing,
        Self::Electrical,
        Self::Handyman,
        Self::Moving,
        Self::Delivery,
        Self::Gardening,
        Self::Tutoring,
        Self::TechSupport,
        Self::Other,
    ];

    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cleaning => "Cleaning",
            Self::Plumbing => "Plumbing",
            Self::Electrical => "Electrical",
            Self::Handyman => "Handyman",
            Self::Moving => "Moving",
            Self::Delivery => "Delivery",
            Self::Gardening => "Gardening",
            Self::Tutoring => "Tutoring",
            Self::TechSupport => "Tech Support",
            Self::Other => "Other",
        }
    }
}

impl TryFrom<&str> for TaskCategory {
    type Error = TaskDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| TaskDomainError::UnknownCategory(value.to_owned()))
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
