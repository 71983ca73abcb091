/// Task approval workflow
///
/// The engine decides status transitions as a pure function of who is
/// asking, what they are assigned to, where the task is, and where they want
/// it to go. It performs no I/O: callers load the task, ask [`decide`], and
/// then apply the returned [`Transition`] inside a transaction.
///
/// The central rule is the review loop: a non-elevated assignee cannot
/// finish a task. When they report completion the task lands in `review`
/// and the creator is told to look at it. Only an elevated actor moves a
/// task to `completed`, which also stamps the completion date and notifies
/// every assignee.
///
/// # Example
///
/// ```
/// use opsdesk_shared::models::task::TaskStatus;
/// use opsdesk_shared::models::user::UserRole;
/// use opsdesk_shared::workflow::{decide, Notice};
///
/// // A staff assignee reporting completion lands the task in review.
/// let transition = decide(UserRole::Staff, true, TaskStatus::InProgress, TaskStatus::Completed)
///     .unwrap()
///     .unwrap();
/// assert_eq!(transition.new_status, TaskStatus::Review);
/// assert_eq!(transition.notice, Notice::NotifyCreator);
/// assert!(!transition.record_completion);
/// ```

use crate::models::task::TaskStatus;
use crate::models::user::UserRole;

/// Error type for transition decisions
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WorkflowError {
    /// Actor holds no assignment on the task and is not elevated
    #[error("Only assignees may update this task")]
    NotAssigned,

    /// Non-elevated actors cannot touch a completed task
    #[error("Task is already completed")]
    TaskClosed,

    /// The requested move is not part of the workflow
    #[error("Cannot move task from '{from}' to '{to}'")]
    InvalidTransition {
        /// Current status
        from: TaskStatus,
        /// Requested status
        to: TaskStatus,
    },
}

/// Who should be notified once a transition is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Tell the task's creator (work submitted for review)
    NotifyCreator,

    /// Tell every assignee (task approved as completed)
    NotifyAssignees,

    /// No notification for this transition
    None,
}

/// An approved status change, ready to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Status the task moves to; may differ from what the actor asked for
    pub new_status: TaskStatus,

    /// Whether to stamp the completion date
    pub record_completion: bool,

    /// Who to notify
    pub notice: Notice,
}

/// Decides a status change
///
/// Returns `Ok(None)` when the task is already where the request would put
/// it, so repeating a request changes nothing and triggers no second round
/// of notifications.
///
/// `is_assignee` must reflect an assignment check against the task the
/// caller loaded; the engine trusts it.
///
/// # Errors
///
/// Returns [`WorkflowError`] when the actor may not make the move. The
/// requested status has already been parsed into [`TaskStatus`], so an
/// unknown status name never reaches the engine regardless of role.
pub fn decide(
    actor_role: UserRole,
    is_assignee: bool,
    current: TaskStatus,
    requested: TaskStatus,
) -> Result<Option<Transition>, WorkflowError> {
    if actor_role.is_elevated() {
        return decide_elevated(current, requested);
    }

    if !is_assignee {
        return Err(WorkflowError::NotAssigned);
    }

    decide_assignee(current, requested)
}

/// Elevated actors may place a task anywhere in the workflow
///
/// Completing records the completion date and notifies assignees. Any other
/// move, including reopening a completed task, is silent.
fn decide_elevated(
    current: TaskStatus,
    requested: TaskStatus,
) -> Result<Option<Transition>, WorkflowError> {
    if current == requested {
        return Ok(None);
    }

    let transition = if requested == TaskStatus::Completed {
        Transition {
            new_status: TaskStatus::Completed,
            record_completion: true,
            notice: Notice::NotifyAssignees,
        }
    } else {
        Transition {
            new_status: requested,
            record_completion: false,
            notice: Notice::None,
        }
    };

    Ok(Some(transition))
}

/// Non-elevated assignees work the task but never close it
///
/// They may start work and report completion; a completion report is
/// rewritten into `review`. Direct requests for `review` or `pending` are
/// rejected, as is any request once the task is completed.
fn decide_assignee(
    current: TaskStatus,
    requested: TaskStatus,
) -> Result<Option<Transition>, WorkflowError> {
    if current == TaskStatus::Completed {
        return Err(WorkflowError::TaskClosed);
    }

    match requested {
        TaskStatus::InProgress => {
            if current == TaskStatus::InProgress {
                return Ok(None);
            }
            if current == TaskStatus::Pending {
                return Ok(Some(Transition {
                    new_status: TaskStatus::InProgress,
                    record_completion: false,
                    notice: Notice::None,
                }));
            }
            Err(WorkflowError::InvalidTransition {
                from: current,
                to: requested,
            })
        }

        // A completion report from an assignee lands in review, not
        // completed. Reporting again while already in review is a no-op.
        TaskStatus::Completed => {
            if current == TaskStatus::Review {
                return Ok(None);
            }
            Ok(Some(Transition {
                new_status: TaskStatus::Review,
                record_completion: false,
                notice: Notice::NotifyCreator,
            }))
        }

        TaskStatus::Pending | TaskStatus::Review => Err(WorkflowError::InvalidTransition {
            from: current,
            to: requested,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignee_completion_lands_in_review() {
        for current in [TaskStatus::Pending, TaskStatus::InProgress] {
            let t = decide(UserRole::Staff, true, current, TaskStatus::Completed)
                .unwrap()
                .unwrap();
            assert_eq!(t.new_status, TaskStatus::Review);
            assert!(!t.record_completion);
            assert_eq!(t.notice, Notice::NotifyCreator);
        }
    }

    #[test]
    fn test_member_assignee_follows_same_review_path() {
        let t = decide(UserRole::Member, true, TaskStatus::InProgress, TaskStatus::Completed)
            .unwrap()
            .unwrap();
        assert_eq!(t.new_status, TaskStatus::Review);
    }

    #[test]
    fn test_repeat_completion_report_is_noop() {
        let t = decide(UserRole::Staff, true, TaskStatus::Review, TaskStatus::Completed).unwrap();
        assert!(t.is_none());
    }

    #[test]
    fn test_elevated_completion_closes_and_notifies_assignees() {
        for role in [UserRole::Admin, UserRole::Manager] {
            let t = decide(role, false, TaskStatus::Review, TaskStatus::Completed)
                .unwrap()
                .unwrap();
            assert_eq!(t.new_status, TaskStatus::Completed);
            assert!(t.record_completion);
            assert_eq!(t.notice, Notice::NotifyAssignees);
        }
    }

    #[test]
    fn test_elevated_repeat_completion_is_noop() {
        let t = decide(
            UserRole::Admin,
            false,
            TaskStatus::Completed,
            TaskStatus::Completed,
        )
        .unwrap();
        assert!(t.is_none());
    }

    #[test]
    fn test_elevated_can_reopen_without_notice() {
        let t = decide(
            UserRole::Manager,
            false,
            TaskStatus::Completed,
            TaskStatus::InProgress,
        )
        .unwrap()
        .unwrap();
        assert_eq!(t.new_status, TaskStatus::InProgress);
        assert!(!t.record_completion);
        assert_eq!(t.notice, Notice::None);
    }

    #[test]
    fn test_elevated_skips_review_freely() {
        let t = decide(
            UserRole::Admin,
            false,
            TaskStatus::Pending,
            TaskStatus::Review,
        )
        .unwrap()
        .unwrap();
        assert_eq!(t.new_status, TaskStatus::Review);
        assert_eq!(t.notice, Notice::None);
    }

    #[test]
    fn test_non_assignee_is_rejected() {
        let err =
            decide(UserRole::Staff, false, TaskStatus::Pending, TaskStatus::InProgress).unwrap_err();
        assert_eq!(err, WorkflowError::NotAssigned);
    }

    #[test]
    fn test_assignee_cannot_touch_completed_task() {
        let err = decide(
            UserRole::Staff,
            true,
            TaskStatus::Completed,
            TaskStatus::InProgress,
        )
        .unwrap_err();
        assert_eq!(err, WorkflowError::TaskClosed);
    }

    #[test]
    fn test_assignee_cannot_request_review_or_pending_directly() {
        for requested in [TaskStatus::Review, TaskStatus::Pending] {
            let err = decide(UserRole::Staff, true, TaskStatus::InProgress, requested).unwrap_err();
            assert!(matches!(err, WorkflowError::InvalidTransition { .. }));
        }
    }

    #[test]
    fn test_assignee_starts_work() {
        let t = decide(UserRole::Staff, true, TaskStatus::Pending, TaskStatus::InProgress)
            .unwrap()
            .unwrap();
        assert_eq!(t.new_status, TaskStatus::InProgress);
        assert_eq!(t.notice, Notice::None);
    }

    #[test]
    fn test_assignee_restart_is_noop() {
        let t = decide(
            UserRole::Staff,
            true,
            TaskStatus::InProgress,
            TaskStatus::InProgress,
        )
        .unwrap();
        assert!(t.is_none());
    }

    #[test]
    fn test_assignee_cannot_move_review_back_to_in_progress() {
        let err = decide(UserRole::Staff, true, TaskStatus::Review, TaskStatus::InProgress)
            .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidTransition { .. }));
    }

    #[test]
    fn test_invalid_transition_message_names_both_ends() {
        let err = WorkflowError::InvalidTransition {
            from: TaskStatus::Review,
            to: TaskStatus::Pending,
        };
        assert_eq!(err.to_string(), "Cannot move task from 'review' to 'pending'");
    }
}
