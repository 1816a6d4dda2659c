//! Task and comment data structures.
//!
//! A task lives in exactly one container, named by its [`TaskScope`]: the
//! personal list or one project's embedded task collection. The scope is
//! serialized as the optional `projectId` key so snapshots keep the shape
//! the storage layer has always used.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::{Priority, TaskStatus};
use crate::user::UserSnapshot;

/// Which container a task belongs to.
///
/// Changing a task's scope does not relocate it between containers; update
/// operations look for the task in the collection the scope names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum TaskScope {
    #[default]
    Personal,
    Project(String),
}

impl TaskScope {
    pub fn is_personal(&self) -> bool {
        matches!(self, TaskScope::Personal)
    }

    /// The owning project's ID, if any.
    pub fn project_id(&self) -> Option<&str> {
        match self {
            TaskScope::Personal => None,
            TaskScope::Project(id) => Some(id),
        }
    }
}

impl From<Option<String>> for TaskScope {
    fn from(value: Option<String>) -> Self {
        match value {
            None => TaskScope::Personal,
            Some(id) => TaskScope::Project(id),
        }
    }
}

impl From<TaskScope> for Option<String> {
    fn from(value: TaskScope) -> Self {
        match value {
            TaskScope::Personal => None,
            TaskScope::Project(id) => Some(id),
        }
    }
}

/// A single work item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    /// Calendar date only; the workflow has no time-of-day deadlines.
    pub due_date: NaiveDate,
    /// Snapshot taken at assignment time; not kept in sync with the
    /// directory afterwards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<UserSnapshot>,
    /// Owning container, stored as the optional `projectId` key.
    #[serde(
        rename = "projectId",
        default,
        skip_serializing_if = "TaskScope::is_personal"
    )]
    pub scope: TaskScope,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Append-only; comments are never edited or removed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
}

/// A comment on a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub created_by: UserSnapshot,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new task; the store fills in identity,
/// creator, timestamps and the empty comment list.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: NaiveDate,
    pub assigned_to: Option<UserSnapshot>,
    pub scope: TaskScope,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(scope: TaskScope) -> Task {
        Task {
            id: "10".into(),
            title: "Sample".into(),
            description: String::new(),
            status: TaskStatus::Pending,
            priority: Priority::Low,
            due_date: NaiveDate::from_ymd_opt(2025, 5, 15).unwrap(),
            assigned_to: None,
            scope,
            created_by: "1".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            comments: Vec::new(),
        }
    }

    #[test]
    fn personal_task_omits_project_id_and_comments() {
        let json = serde_json::to_string(&sample(TaskScope::Personal)).unwrap();
        assert!(!json.contains("projectId"));
        assert!(!json.contains("comments"));
        assert!(json.contains("\"dueDate\":\"2025-05-15\""));
    }

    #[test]
    fn project_task_round_trips_scope() {
        let task = sample(TaskScope::Project("1".into()));
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"projectId\":\"1\""));
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn missing_project_id_deserializes_as_personal() {
        let json = r#"{
            "id": "1",
            "title": "t",
            "description": "",
            "status": "pending",
            "priority": "high",
            "dueDate": "2025-05-15",
            "createdBy": "1",
            "createdAt": "2025-05-01T08:00:00Z",
            "updatedAt": "2025-05-01T08:00:00Z"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.scope, TaskScope::Personal);
        assert!(task.comments.is_empty());
    }
}
