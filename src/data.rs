//! Project and task collections plus their mutation API.
//!
//! Collections are loaded once per signed-in session, mutated in memory,
//! and mirrored to storage as whole-collection JSON snapshots after every
//! mutation. Every mutation requires an open session and refreshes the
//! touched entity's update timestamp; mutating a task inside a project
//! also refreshes the parent project's timestamp.
//!
//! Where an operation must locate a task without knowing its container,
//! the search order is uniform: personal tasks first, then projects in
//! collection order, first ID match wins. Identifier generation keeps IDs
//! unique across both containers, so at most one task can match.

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::project::{Project, ProjectDraft};
use crate::seed;
use crate::storage::{Storage, StorageError};
use crate::task::{Comment, Task, TaskDraft, TaskScope};
use crate::ids::IdGen;
use crate::user::User;

/// Storage key for the project collection snapshot.
pub const PROJECTS_KEY: &str = "projects";
/// Storage key for the personal task collection snapshot.
pub const PERSONAL_TASKS_KEY: &str = "personalTasks";

#[derive(Debug, Error)]
pub enum DataError {
    #[error("no user is signed in")]
    NoSession,
    #[error("project `{0}` not found")]
    ProjectNotFound(String),
    #[error("task `{0}` not found")]
    TaskNotFound(String),
    #[error("failed to encode collection snapshot: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// In-memory entity store with write-through snapshot persistence.
///
/// Constructed once and passed by reference to its consumers; there is no
/// ambient global state. Exactly one logical writer (the active session)
/// mutates one snapshot of each collection at a time.
pub struct DataStore<S: Storage> {
    storage: S,
    current: Option<User>,
    projects: Vec<Project>,
    personal: Vec<Task>,
    ids: IdGen,
}

impl<S: Storage> DataStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            current: None,
            projects: Vec::new(),
            personal: Vec::new(),
            ids: IdGen::new(),
        }
    }

    /// Loads both collections for `user`, seeding and persisting the fixed
    /// sample data when no snapshot exists yet.
    ///
    /// An unreadable snapshot is logged and replaced by seed data, the same
    /// "start fresh" policy the storage layer applies to a missing one.
    pub fn open_session(&mut self, user: User) -> Result<(), DataError> {
        self.current = Some(user);

        match self.load_collection::<Vec<Project>>(PROJECTS_KEY)? {
            Some(projects) => self.projects = projects,
            None => {
                self.projects = seed::projects();
                self.persist_projects()?;
            }
        }
        match self.load_collection::<Vec<Task>>(PERSONAL_TASKS_KEY)? {
            Some(tasks) => self.personal = tasks,
            None => {
                self.personal = seed::personal_tasks();
                self.persist_personal()?;
            }
        }
        debug!(
            projects = self.projects.len(),
            personal = self.personal.len(),
            "collections loaded"
        );
        Ok(())
    }

    /// Discards the in-memory session and collections. Storage is left
    /// untouched; the next session reloads from it.
    pub fn close_session(&mut self) {
        self.current = None;
        self.projects.clear();
        self.personal.clear();
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn personal_tasks(&self) -> &[Task] {
        &self.personal
    }

    pub fn find_project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Finds a task by ID: personal list first, then each project's
    /// collection in order.
    pub fn find_task(&self, id: &str) -> Option<&Task> {
        self.personal
            .iter()
            .find(|t| t.id == id)
            .or_else(|| {
                self.projects
                    .iter()
                    .flat_map(|p| p.tasks.iter())
                    .find(|t| t.id == id)
            })
    }

    /// Creates a project owned by the current user.
    pub fn add_project(&mut self, draft: ProjectDraft) -> Result<Project, DataError> {
        let creator = self.actor()?.id.clone();
        let now = Utc::now();
        let project = Project {
            id: self.ids.next(),
            title: draft.title,
            description: draft.description,
            members: draft.members,
            tasks: Vec::new(),
            created_by: creator,
            created_at: now,
            updated_at: now,
        };
        self.projects.push(project.clone());
        self.persist_projects()?;
        debug!(project = %project.id, "project created");
        Ok(project)
    }

    /// Replaces the stored project with the supplied value, refreshing its
    /// update timestamp. The embedded task collection is replaced as-is.
    pub fn update_project(&mut self, mut project: Project) -> Result<(), DataError> {
        self.actor()?;
        project.updated_at = Utc::now();
        let id = project.id.clone();
        let slot = self
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(DataError::ProjectNotFound(id))?;
        *slot = project;
        self.persist_projects()?;
        Ok(())
    }

    /// Removes a project and its embedded tasks. Idempotent: removing an
    /// absent project reports `Ok(false)`.
    pub fn delete_project(&mut self, id: &str) -> Result<bool, DataError> {
        self.actor()?;
        let before = self.projects.len();
        self.projects.retain(|p| p.id != id);
        if self.projects.len() == before {
            warn!(project = %id, "delete ignored, project not found");
            return Ok(false);
        }
        self.persist_projects()?;
        debug!(project = %id, "project deleted");
        Ok(true)
    }

    /// Creates a task in the container named by `draft.scope` and persists
    /// that container's collection. Adding to a project also refreshes the
    /// project's update timestamp.
    pub fn add_task(&mut self, draft: TaskDraft) -> Result<Task, DataError> {
        let creator = self.actor()?.id.clone();
        let now = Utc::now();
        let task = Task {
            id: self.ids.next(),
            title: draft.title,
            description: draft.description,
            status: draft.status,
            priority: draft.priority,
            due_date: draft.due_date,
            assigned_to: draft.assigned_to,
            scope: draft.scope,
            created_by: creator,
            created_at: now,
            updated_at: now,
            comments: Vec::new(),
        };
        match task.scope.clone() {
            TaskScope::Personal => {
                self.personal.push(task.clone());
                self.persist_personal()?;
            }
            TaskScope::Project(pid) => {
                let project = self
                    .projects
                    .iter_mut()
                    .find(|p| p.id == pid)
                    .ok_or(DataError::ProjectNotFound(pid))?;
                project.tasks.push(task.clone());
                project.updated_at = now;
                self.persist_projects()?;
            }
        }
        debug!(task = %task.id, "task created");
        Ok(task)
    }

    /// Replaces a task within the container its scope names, refreshing
    /// its update timestamp (and the parent project's, if any).
    ///
    /// A task whose scope was changed is searched for in the new container
    /// and reported as not found there; scope changes do not relocate
    /// tasks between containers.
    pub fn update_task(&mut self, mut task: Task) -> Result<(), DataError> {
        self.actor()?;
        let now = Utc::now();
        task.updated_at = now;
        match task.scope.clone() {
            TaskScope::Personal => {
                let id = task.id.clone();
                let slot = self
                    .personal
                    .iter_mut()
                    .find(|t| t.id == id)
                    .ok_or(DataError::TaskNotFound(id))?;
                *slot = task;
                self.persist_personal()?;
            }
            TaskScope::Project(pid) => {
                let project = self
                    .projects
                    .iter_mut()
                    .find(|p| p.id == pid)
                    .ok_or(DataError::ProjectNotFound(pid))?;
                let id = task.id.clone();
                let slot = project
                    .tasks
                    .iter_mut()
                    .find(|t| t.id == id)
                    .ok_or(DataError::TaskNotFound(id))?;
                *slot = task;
                project.updated_at = now;
                self.persist_projects()?;
            }
        }
        Ok(())
    }

    /// Removes a task wherever it lives, personal list first. Idempotent:
    /// removing an absent task reports `Ok(false)` and persists nothing.
    pub fn delete_task(&mut self, id: &str) -> Result<bool, DataError> {
        self.actor()?;
        if self.personal.iter().any(|t| t.id == id) {
            self.personal.retain(|t| t.id != id);
            self.persist_personal()?;
            debug!(task = %id, "personal task deleted");
            return Ok(true);
        }
        let now = Utc::now();
        if let Some(pos) = self
            .projects
            .iter()
            .position(|p| p.tasks.iter().any(|t| t.id == id))
        {
            let project = &mut self.projects[pos];
            project.tasks.retain(|t| t.id != id);
            project.updated_at = now;
            let pid = project.id.clone();
            self.persist_projects()?;
            debug!(task = %id, project = %pid, "project task deleted");
            return Ok(true);
        }
        warn!(task = %id, "delete ignored, task not found");
        Ok(false)
    }

    /// Appends a comment authored by the current user to the first task
    /// matching `task_id`, refreshing the task's update timestamp (and the
    /// parent project's, if any).
    pub fn add_comment(&mut self, task_id: &str, content: &str) -> Result<Comment, DataError> {
        let author = self.actor()?.clone();
        let now = Utc::now();
        let comment = Comment {
            id: self.ids.next(),
            content: content.to_string(),
            created_by: author,
            created_at: now,
        };
        if let Some(task) = self.personal.iter_mut().find(|t| t.id == task_id) {
            task.comments.push(comment.clone());
            task.updated_at = now;
            self.persist_personal()?;
            return Ok(comment);
        }
        if let Some(pos) = self
            .projects
            .iter()
            .position(|p| p.tasks.iter().any(|t| t.id == task_id))
        {
            let project = &mut self.projects[pos];
            if let Some(task) = project.tasks.iter_mut().find(|t| t.id == task_id) {
                task.comments.push(comment.clone());
                task.updated_at = now;
            }
            project.updated_at = now;
            self.persist_projects()?;
            return Ok(comment);
        }
        Err(DataError::TaskNotFound(task_id.to_string()))
    }

    fn actor(&self) -> Result<&User, DataError> {
        self.current.as_ref().ok_or(DataError::NoSession)
    }

    fn load_collection<T: serde::de::DeserializeOwned>(
        &mut self,
        key: &str,
    ) -> Result<Option<T>, DataError> {
        let Some(raw) = self.storage.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(key, "discarding unreadable snapshot, reseeding: {err}");
                Ok(None)
            }
        }
    }

    fn persist_projects(&mut self) -> Result<(), DataError> {
        let raw = serde_json::to_string(&self.projects)?;
        self.storage.set(PROJECTS_KEY, &raw)?;
        Ok(())
    }

    fn persist_personal(&mut self) -> Result<(), DataError> {
        let raw = serde_json::to_string(&self.personal)?;
        self.storage.set(PERSONAL_TASKS_KEY, &raw)?;
        Ok(())
    }
}
