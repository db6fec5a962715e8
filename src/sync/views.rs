//! Dashboard view filters over the in-memory collection.
//!
//! The views mirror the dashboard's pages: My Day, Upcoming, Important, and
//! per-project listings. They are computed from the service's snapshot, so
//! they are as fresh as the last fetch. Date-driven views exclude done and
//! canceled tasks.

use uuid::Uuid;

use crate::backend::{Task, TaskPriority};
use crate::constants::UPCOMING_WINDOW_DAYS;
use crate::sync::TaskService;
use crate::utils::datetime;

impl TaskService {
    /// Tasks for the "My Day" view: overdue tasks first, then tasks dated
    /// today.
    pub async fn tasks_for_my_day(&self) -> Vec<Task> {
        let tasks = self.tasks().await;
        let today = datetime::format_today();

        let mut result: Vec<Task> = tasks
            .iter()
            .filter(|t| t.status.is_open() && is_overdue(t, &today))
            .cloned()
            .collect();
        result.extend(
            tasks
                .into_iter()
                .filter(|t| t.status.is_open() && t.date.as_deref() == Some(today.as_str())),
        );
        result
    }

    /// Tasks for the "Upcoming" view: overdue, today, then everything due
    /// within the upcoming window, in that order.
    pub async fn upcoming_tasks(&self) -> Vec<Task> {
        let tasks = self.tasks().await;
        let today = datetime::format_today();
        let horizon = datetime::format_date_with_offset(UPCOMING_WINDOW_DAYS);

        let mut result: Vec<Task> = tasks
            .iter()
            .filter(|t| t.status.is_open() && is_overdue(t, &today))
            .cloned()
            .collect();
        result.extend(
            tasks
                .iter()
                .filter(|t| t.status.is_open() && t.date.as_deref() == Some(today.as_str()))
                .cloned(),
        );
        result.extend(tasks.into_iter().filter(|t| {
            t.status.is_open()
                && t.date
                    .as_deref()
                    .is_some_and(|d| datetime::is_within(d, &today, &horizon))
        }));
        result
    }

    /// Tasks for the "Important" view: open tasks with high priority.
    pub async fn important_tasks(&self) -> Vec<Task> {
        self.tasks()
            .await
            .into_iter()
            .filter(|t| t.status.is_open() && t.priority == TaskPriority::High)
            .collect()
    }

    /// All tasks referencing a project, in collection order.
    pub async fn tasks_for_project(&self, project_id: Uuid) -> Vec<Task> {
        self.tasks()
            .await
            .into_iter()
            .filter(|t| t.project_id == Some(project_id))
            .collect()
    }
}

fn is_overdue(task: &Task, today: &str) -> bool {
    task.date
        .as_deref()
        .is_some_and(|d| datetime::is_before(d, today))
}
