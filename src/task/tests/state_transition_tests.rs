//! Unit tests for the task status machine and the domain transitions.

use crate::identity::UserId;
use crate::reputation::domain::Rating;
use crate::task::domain::{
    BidId, NewTask, Task, TaskCategory, TaskDomainError, TaskLocation, TaskReview, TaskStatus,
};
use eyre::{bail, ensure};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

const ALL_STATUSES: [TaskStatus; 4] = [
    TaskStatus::Active,
    TaskStatus::InProgress,
    TaskStatus::Completed,
    TaskStatus::Cancelled,
];

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

#[fixture]
fn active_task(clock: DefaultClock) -> Result<Task, TaskDomainError> {
    Task::create(
        NewTask {
            poster: UserId::new(),
            title: "Move a sofa".to_owned(),
            description: "Third floor, no lift".to_owned(),
            category: TaskCategory::Moving,
            budget: 60.0,
            deadline: None,
            location: TaskLocation::Remote,
            images: Vec::new(),
        },
        &clock,
    )
}

fn review(stars: i64) -> eyre::Result<TaskReview> {
    Ok(TaskReview::new(Rating::new(stars)?, "Careful and quick", true))
}

#[rstest]
#[case(TaskStatus::Active, TaskStatus::Active, false)]
#[case(TaskStatus::Active, TaskStatus::InProgress, true)]
#[case(TaskStatus::Active, TaskStatus::Completed, false)]
#[case(TaskStatus::Active, TaskStatus::Cancelled, true)]
#[case(TaskStatus::InProgress, TaskStatus::Active, false)]
#[case(TaskStatus::InProgress, TaskStatus::InProgress, false)]
#[case(TaskStatus::InProgress, TaskStatus::Completed, true)]
#[case(TaskStatus::InProgress, TaskStatus::Cancelled, true)]
#[case(TaskStatus::Completed, TaskStatus::Active, false)]
#[case(TaskStatus::Completed, TaskStatus::InProgress, false)]
#[case(TaskStatus::Completed, TaskStatus::Completed, false)]
#[case(TaskStatus::Completed, TaskStatus::Cancelled, false)]
#[case(TaskStatus::Cancelled, TaskStatus::Active, false)]
#[case(TaskStatus::Cancelled, TaskStatus::InProgress, false)]
#[case(TaskStatus::Cancelled, TaskStatus::Completed, false)]
#[case(TaskStatus::Cancelled, TaskStatus::Cancelled, false)]
fn can_transition_to_returns_expected(
    #[case] from: TaskStatus,
    #[case] to: TaskStatus,
    #[case] expected: bool,
) {
    assert_eq!(from.can_transition_to(to), expected);
}

#[rstest]
#[case("Active", TaskStatus::Active)]
#[case("in_progress", TaskStatus::InProgress)]
#[case("Canceled", TaskStatus::Cancelled)]
fn status_parses_loose_spellings(#[case] raw: &str, #[case] expected: TaskStatus) {
    assert_eq!(TaskStatus::try_from(raw), Ok(expected));
}

#[rstest]
fn accept_bid_assigns_provider_and_starts_work(
    clock: DefaultClock,
    active_task: Result<Task, TaskDomainError>,
) -> eyre::Result<()> {
    let mut task = active_task?;
    let provider = UserId::new();
    let bid_id = task.place_bid(provider, 55.0, "1 hour", None, &clock)?;

    let assigned = task.accept_bid(bid_id, &clock)?;

    ensure!(assigned == provider);
    ensure!(task.status() == TaskStatus::InProgress);
    ensure!(task.assigned_provider() == Some(provider));
    Ok(())
}

#[rstest]
fn accepting_a_second_bid_never_reassigns(
    clock: DefaultClock,
    active_task: Result<Task, TaskDomainError>,
) -> eyre::Result<()> {
    let mut task = active_task?;
    let first_provider = UserId::new();
    let first = task.place_bid(first_provider, 55.0, "1 hour", None, &clock)?;
    let second = task.place_bid(UserId::new(), 45.0, "2 hours", None, &clock)?;
    task.accept_bid(first, &clock)?;

    let result = task.accept_bid(second, &clock);

    let expected = Err(TaskDomainError::InvalidStateTransition {
        from: TaskStatus::InProgress,
        to: TaskStatus::InProgress,
    });
    if result != expected {
        bail!("expected {expected:?}, got {result:?}");
    }
    ensure!(task.assigned_provider() == Some(first_provider));
    Ok(())
}

#[rstest]
fn accept_unknown_bid_reports_missing_bid(
    clock: DefaultClock,
    active_task: Result<Task, TaskDomainError>,
) -> eyre::Result<()> {
    let mut task = active_task?;
    let foreign = BidId::new();

    ensure!(task.accept_bid(foreign, &clock) == Err(TaskDomainError::BidNotFound(foreign)));
    ensure!(task.status() == TaskStatus::Active);
    Ok(())
}

#[rstest]
fn complete_requires_in_progress(
    clock: DefaultClock,
    active_task: Result<Task, TaskDomainError>,
) -> eyre::Result<()> {
    let mut task = active_task?;

    let result = task.complete(review(5)?, &clock);

    let expected = Err(TaskDomainError::InvalidStateTransition {
        from: TaskStatus::Active,
        to: TaskStatus::Completed,
    });
    ensure!(result == expected);
    ensure!(task.review().is_none());
    Ok(())
}

#[rstest]
fn completing_twice_reports_already_completed(
    clock: DefaultClock,
    active_task: Result<Task, TaskDomainError>,
) -> eyre::Result<()> {
    let mut task = active_task?;
    let bid_id = task.place_bid(UserId::new(), 55.0, "1 hour", None, &clock)?;
    task.accept_bid(bid_id, &clock)?;
    task.complete(review(4)?, &clock)?;

    ensure!(task.complete(review(1)?, &clock) == Err(TaskDomainError::AlreadyCompleted));
    let stars = task.review().map(|stored| stored.rating().value());
    ensure!(stars == Some(4));
    Ok(())
}

#[rstest]
fn bids_are_refused_once_work_starts(
    clock: DefaultClock,
    active_task: Result<Task, TaskDomainError>,
) -> eyre::Result<()> {
    let mut task = active_task?;
    let bid_id = task.place_bid(UserId::new(), 55.0, "1 hour", None, &clock)?;
    task.accept_bid(bid_id, &clock)?;

    let result = task.place_bid(UserId::new(), 40.0, "1 hour", None, &clock);

    ensure!(result == Err(TaskDomainError::NotAcceptingBids(TaskStatus::InProgress)));
    Ok(())
}

#[rstest]
fn cancel_releases_the_assignment(
    clock: DefaultClock,
    active_task: Result<Task, TaskDomainError>,
) -> eyre::Result<()> {
    let mut task = active_task?;
    let bid_id = task.place_bid(UserId::new(), 55.0, "1 hour", None, &clock)?;
    task.accept_bid(bid_id, &clock)?;

    task.cancel(&clock)?;

    ensure!(task.status() == TaskStatus::Cancelled);
    ensure!(task.assigned_provider().is_none());
    ensure!(task.ensure_deletable().is_ok());
    Ok(())
}

#[rstest]
#[case(TaskStatus::Completed)]
#[case(TaskStatus::Cancelled)]
fn terminal_status_rejects_every_transition(
    #[case] terminal: TaskStatus,
    clock: DefaultClock,
    active_task: Result<Task, TaskDomainError>,
) -> eyre::Result<()> {
    let mut task = active_task?;
    if terminal == TaskStatus::Completed {
        let bid_id = task.place_bid(UserId::new(), 55.0, "1 hour", None, &clock)?;
        task.accept_bid(bid_id, &clock)?;
        task.complete(review(3)?, &clock)?;
    } else {
        task.cancel(&clock)?;
    }

    for target in ALL_STATUSES {
        ensure!(!terminal.can_transition_to(target));
    }
    let cancel = task.cancel(&clock);
    let expected = Err(TaskDomainError::InvalidStateTransition {
        from: terminal,
        to: TaskStatus::Cancelled,
    });
    if cancel != expected {
        bail!("expected {expected:?}, got {cancel:?}");
    }
    ensure!(task.status() == terminal);
    Ok(())
}

#[rstest]
fn completed_task_is_not_deletable(
    clock: DefaultClock,
    active_task: Result<Task, TaskDomainError>,
) -> eyre::Result<()> {
    let mut task = active_task?;
    let bid_id = task.place_bid(UserId::new(), 55.0, "1 hour", None, &clock)?;
    task.accept_bid(bid_id, &clock)?;
    task.complete(review(5)?, &clock)?;

    ensure!(task.ensure_deletable() == Err(TaskDomainError::NotDeletable));
    Ok(())
}
