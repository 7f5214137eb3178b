//! Task aggregate root and its lifecycle state machine.

use super::{
    Bid, BidId, Comment, CommentId, ParseTaskStatusError, ReplyId, TaskCategory,
    TaskDomainError, TaskId, TaskLocation, TaskReview, bid::is_positive_amount,
};
use crate::identity::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of images attached to a task.
const MAX_IMAGES: usize = 5;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Open for bids.
    Active,
    /// A bid was accepted and the provider is working.
    InProgress,
    /// The poster confirmed completion and left a review.
    Completed,
    /// Withdrawn by the poster or an administrator.
    Cancelled,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::InProgress => "InProgress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Returns whether the state machine permits moving to `target`.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Active, Self::InProgress | Self::Cancelled)
                | (Self::InProgress, Self::Completed | Self::Cancelled)
        )
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized: String = value
            .chars()
            .filter(|ch| !ch.is_whitespace() && *ch != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "active" => Ok(Self::Active),
            "inprogress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter object for posting a new task.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    /// User posting the task.
    pub poster: UserId,
    /// Short summary.
    pub title: String,
    /// Full description of the work.
    pub description: String,
    /// Kind of work.
    pub category: TaskCategory,
    /// Budget offered by the poster.
    pub budget: f64,
    /// Optional completion deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Where the work happens.
    pub location: TaskLocation,
    /// Image URIs supplied by the storage collaborator.
    pub images: Vec<String>,
}

/// Partial update of a task's details. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskEdit {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement category.
    pub category: Option<TaskCategory>,
    /// Replacement budget.
    pub budget: Option<f64>,
    /// Replacement deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Replacement location.
    pub location: Option<TaskLocation>,
    /// Replacement image list.
    pub images: Option<Vec<String>>,
}

impl TaskEdit {
    /// Returns `true` when the edit changes a detail that bids depend on.
    #[must_use]
    pub const fn touches_bid_terms(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.category.is_some()
            || self.budget.is_some()
            || self.deadline.is_some()
            || self.location.is_some()
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    poster: UserId,
    title: String,
    description: String,
    category: TaskCategory,
    budget: f64,
    deadline: Option<DateTime<Utc>>,
    status: TaskStatus,
    assigned_provider: Option<UserId>,
    location: TaskLocation,
    images: Vec<String>,
    bids: Vec<Bid>,
    comments: Vec<Comment>,
    review: Option<TaskReview>,
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Posts a new active task.
    ///
    /// # Errors
    ///
    /// Returns a validation [`TaskDomainError`] when the title or description
    /// is blank, the budget is not positive, the location is malformed, or the
    /// image list is invalid.
    pub fn create(new_task: NewTask, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let NewTask {
            poster,
            title,
            description,
            category,
            budget,
            deadline,
            location,
            images,
        } = new_task;

        let title_text = non_blank(title, TaskDomainError::EmptyTitle)?;
        let description_text = non_blank(description, TaskDomainError::EmptyDescription)?;
        if !is_positive_amount(budget) {
            return Err(TaskDomainError::InvalidBudget);
        }
        location.validate()?;
        let image_uris = validate_images(images)?;
        let timestamp = clock.utc();

        Ok(Self {
            id: TaskId::new(),
            poster,
            title: title_text,
            description: description_text,
            category,
            budget,
            deadline,
            status: TaskStatus::Active,
            assigned_provider: None,
            location,
            images: image_uris,
            bids: Vec::new(),
            comments: Vec::new(),
            review: None,
            version: 1,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the user who posted the task.
    #[must_use]
    pub const fn poster(&self) -> UserId {
        self.poster
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the category.
    #[must_use]
    pub const fn category(&self) -> TaskCategory {
        self.category
    }

    /// Returns the budget.
    #[must_use]
    pub const fn budget(&self) -> f64 {
        self.budget
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the provider whose bid was accepted, if any.
    #[must_use]
    pub const fn assigned_provider(&self) -> Option<UserId> {
        self.assigned_provider
    }

    /// Returns the location.
    #[must_use]
    pub const fn location(&self) -> &TaskLocation {
        &self.location
    }

    /// Returns image URIs in display order.
    #[must_use]
    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Returns bids in submission order.
    #[must_use]
    pub fn bids(&self) -> &[Bid] {
        &self.bids
    }

    /// Returns comments in posting order.
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Returns the completion review, present only once completed.
    #[must_use]
    pub const fn review(&self) -> Option<&TaskReview> {
        self.review.as_ref()
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

    /// Returns `true` when `user` posted the task.
    #[must_use]
    pub fn is_posted_by(&self, user: UserId) -> bool {
        self.poster == user
    }

    /// Finds a bid by identifier.
    #[must_use]
    pub fn find_bid(&self, id: BidId) -> Option<&Bid> {
        self.bids.iter().find(|bid| bid.id() == id)
    }

    /// Finds a comment by identifier.
    #[must_use]
    pub fn find_comment(&self, id: CommentId) -> Option<&Comment> {
        self.comments.iter().find(|comment| comment.id() == id)
    }

    /// Applies a partial edit to the task details.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotEditable`] unless the task is active,
    /// [`TaskDomainError::EditingFrozen`] when the edit changes bid terms
    /// after a bid was placed, or a validation error for the new values.
    pub fn edit(&mut self, edit: TaskEdit, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if self.status != TaskStatus::Active {
            return Err(TaskDomainError::NotEditable(self.status));
        }
        if edit.touches_bid_terms() && !self.bids.is_empty() {
            return Err(TaskDomainError::EditingFrozen);
        }

        let mut updated = self.clone();
        if let Some(title) = edit.title {
            updated.title = non_blank(title, TaskDomainError::EmptyTitle)?;
        }
        if let Some(description) = edit.description {
            updated.description = non_blank(description, TaskDomainError::EmptyDescription)?;
        }
        if let Some(category) = edit.category {
            updated.category = category;
        }
        if let Some(budget) = edit.budget {
            if !is_positive_amount(budget) {
                return Err(TaskDomainError::InvalidBudget);
            }
            updated.budget = budget;
        }
        if let Some(deadline) = edit.deadline {
            updated.deadline = Some(deadline);
        }
        if let Some(location) = edit.location {
            location.validate()?;
            updated.location = location;
        }
        if let Some(images) = edit.images {
            updated.images = validate_images(images)?;
        }

        *self = updated;
        self.touch(clock);
        Ok(())
    }

    /// Records a new bid. Providers may bid more than once.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAcceptingBids`] unless the task is
    /// active, or a validation error for the bid values.
    pub fn place_bid(
        &mut self,
        provider: UserId,
        price: f64,
        estimated_time: impl Into<String>,
        comment: Option<String>,
        clock: &impl Clock,
    ) -> Result<BidId, TaskDomainError> {
        if self.status != TaskStatus::Active {
            return Err(TaskDomainError::NotAcceptingBids(self.status));
        }
        let bid = Bid::new(provider, price, estimated_time, comment, clock)?;
        let bid_id = bid.id();
        self.bids.push(bid);
        self.touch(clock);
        Ok(bid_id)
    }

    /// Accepts one bid, assigning its provider and starting the work.
    ///
    /// Returns the assigned provider.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::BidNotFound`] when the bid is not on this
    /// task, or [`TaskDomainError::InvalidStateTransition`] unless the task
    /// is active, so an accepted assignment is never overwritten.
    pub fn accept_bid(
        &mut self,
        bid_id: BidId,
        clock: &impl Clock,
    ) -> Result<UserId, TaskDomainError> {
        let provider = self
            .find_bid(bid_id)
            .map(Bid::provider)
            .ok_or(TaskDomainError::BidNotFound(bid_id))?;
        self.ensure_transition(TaskStatus::InProgress)?;

        self.assigned_provider = Some(provider);
        self.status = TaskStatus::InProgress;
        self.touch(clock);
        Ok(provider)
    }

    /// Completes the task with the poster's review.
    ///
    /// Returns the assigned provider whose reputation the review affects.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AlreadyCompleted`] for a completed task and
    /// [`TaskDomainError::InvalidStateTransition`] unless the task is in
    /// progress.
    pub fn complete(
        &mut self,
        review: TaskReview,
        clock: &impl Clock,
    ) -> Result<UserId, TaskDomainError> {
        if self.status == TaskStatus::Completed {
            return Err(TaskDomainError::AlreadyCompleted);
        }
        self.ensure_transition(TaskStatus::Completed)?;
        let provider = self
            .assigned_provider
            .ok_or(TaskDomainError::InvalidStateTransition {
                from: self.status,
                to: TaskStatus::Completed,
            })?;

        self.status = TaskStatus::Completed;
        self.review = Some(review);
        self.touch(clock);
        Ok(provider)
    }

    /// Cancels the task and releases any assignment.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] for completed or
    /// already cancelled tasks.
    pub fn cancel(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskStatus::Cancelled)?;
        self.status = TaskStatus::Cancelled;
        self.assigned_provider = None;
        self.touch(clock);
        Ok(())
    }

    /// Checks that the task may be deleted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotDeletable`] once the task is completed.
    pub fn ensure_deletable(&self) -> Result<(), TaskDomainError> {
        if self.status == TaskStatus::Completed {
            return Err(TaskDomainError::NotDeletable);
        }
        Ok(())
    }

    /// Appends a comment.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyCommentText`] for blank text.
    pub fn add_comment(
        &mut self,
        author: UserId,
        text: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<CommentId, TaskDomainError> {
        let comment = Comment::new(author, text, clock)?;
        let comment_id = comment.id();
        self.comments.push(comment);
        self.touch(clock);
        Ok(comment_id)
    }

    /// Appends a reply to an existing comment.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::CommentNotFound`] when the comment is not
    /// on this task, or [`TaskDomainError::EmptyCommentText`] for blank
    /// text.
    pub fn add_reply(
        &mut self,
        comment_id: CommentId,
        author: UserId,
        text: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<ReplyId, TaskDomainError> {
        let comment = self
            .comments
            .iter_mut()
            .find(|comment| comment.id() == comment_id)
            .ok_or(TaskDomainError::CommentNotFound(comment_id))?;
        let reply_id = comment.push_reply(author, text.into(), clock)?;
        self.touch(clock);
        Ok(reply_id)
    }

    fn ensure_transition(&self, target: TaskStatus) -> Result<(), TaskDomainError> {
        if self.status.can_transition_to(target) {
            Ok(())
        } else {
            Err(TaskDomainError::InvalidStateTransition {
                from: self.status,
                to: target,
            })
        }
    }

    /// Bumps the version and the `updated_at` timestamp.
    fn touch(&mut self, clock: &impl Clock) {
        self.version = self.version.saturating_add(1);
        self.updated_at = clock.utc();
    }
}

fn non_blank(raw: String, error: TaskDomainError) -> Result<String, TaskDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_owned())
}

fn validate_images(images: Vec<String>) -> Result<Vec<String>, TaskDomainError> {
    if images.len() > MAX_IMAGES {
        return Err(TaskDomainError::TooManyImages {
            max: MAX_IMAGES,
            actual: images.len(),
        });
    }
    images
        .into_iter()
        .map(|uri| non_blank(uri, TaskDomainError::BlankImageUri))
        .collect()
}
