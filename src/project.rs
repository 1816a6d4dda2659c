//! Project workspace data structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::Task;
use crate::user::UserSnapshot;

/// A project workspace: members plus its own embedded task collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Member snapshots taken when each member was added; duplicates are
    /// not prevented by construction.
    pub members: Vec<UserSnapshot>,
    pub tasks: Vec<Task>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new project; the store fills in identity,
/// creator, timestamps and the empty task collection.
#[derive(Debug, Clone)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub members: Vec<UserSnapshot>,
}
