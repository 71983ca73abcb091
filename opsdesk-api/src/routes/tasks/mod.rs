/// Task workflow endpoints
///
/// One file per operation. Every handler runs the access guards itself:
/// module access for reaching the task area at all, task visibility for
/// anything addressing a task by ID, and the elevated check for
/// create/delete/assignment.

pub mod add_assignee;
pub mod add_comment;
pub mod create_task;
pub mod delete_task;
pub mod get_task;
pub mod list_comments;
pub mod list_tasks;
pub mod update_status;

pub use add_assignee::{add_assignee, remove_assignee};
pub use add_comment::add_comment;
pub use create_task::create_task;
pub use delete_task::delete_task;
pub use get_task::get_task;
pub use list_comments::list_comments;
pub use list_tasks::list_tasks;
pub use update_status::update_status;

use chrono::Utc;
use opsdesk_shared::models::task::Task;
use serde::Serialize;

/// Module name gating the task area for non-elevated users
pub const TASKS_MODULE: &str = "tasks";

/// Task as returned by the API
///
/// The stored row plus the derived overdue flag; `overdue` is computed at
/// read time and never persisted.
#[derive(Debug, Serialize)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,

    /// Past due date and not completed, as of this response
    pub overdue: bool,
}

impl TaskView {
    /// Builds the API view of a task at the current instant
    pub fn now(task: Task) -> Self {
        let overdue = task.is_overdue(Utc::now());
        Self { task, overdue }
    }
}
