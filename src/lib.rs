//! Local-first task and project workspace data layer.
//!
//! In-memory collections of personal tasks and project workspaces, mirrored
//! to a key-value store of whole-collection JSON snapshots, plus the session
//! and mutation APIs the `td` CLI front end drives.
//!
//! The stores are plain objects constructed once and passed by reference;
//! there is no ambient global state.

pub mod cli;
pub mod cmd;
pub mod data;
pub mod fields;
pub mod ids;
pub mod project;
pub mod seed;
pub mod session;
pub mod storage;
pub mod task;
pub mod user;

pub use data::{DataError, DataStore, PERSONAL_TASKS_KEY, PROJECTS_KEY};
pub use fields::{Priority, TaskStatus};
pub use project::{Project, ProjectDraft};
pub use session::{AuthError, SessionStore, CURRENT_USER_KEY};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use task::{Comment, Task, TaskDraft, TaskScope};
pub use user::{User, UserRecord, UserSnapshot};
