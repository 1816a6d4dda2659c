//! Fixed sample data used to populate a fresh workspace.
//!
//! The first signed-in session that finds no persisted snapshots is seeded
//! from these collections, which are then written to storage.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::fields::{Priority, TaskStatus};
use crate::project::Project;
use crate::task::{Task, TaskScope};
use crate::user::{User, UserRecord};

pub const DEFAULT_AVATAR: &str = "/placeholder.svg";

fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

fn date(y: i32, mo: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, mo, d).unwrap()
}

fn user(id: &str, name: &str, email: &str) -> User {
    User {
        id: id.into(),
        name: name.into(),
        email: email.into(),
        avatar: Some(DEFAULT_AVATAR.into()),
    }
}

/// The three known team members referenced by seed tasks and projects.
pub fn team() -> Vec<User> {
    vec![
        user("1", "Nguyen Van A", "nguyenvana@example.com"),
        user("2", "Tran Thi B", "tranthib@example.com"),
        user("3", "Le Van C", "levanc@example.com"),
    ]
}

/// Sign-in directory. Only the first team member has a known credential.
pub fn directory() -> Vec<UserRecord> {
    vec![UserRecord {
        user: user("1", "Nguyen Van A", "nguyenvana@example.com"),
        password: "password123".into(),
    }]
}

fn task(
    id: &str,
    title: &str,
    description: &str,
    status: TaskStatus,
    priority: Priority,
    due: NaiveDate,
    assigned_to: Option<User>,
    scope: TaskScope,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
) -> Task {
    Task {
        id: id.into(),
        title: title.into(),
        description: description.into(),
        status,
        priority,
        due_date: due,
        assigned_to,
        scope,
        created_by: "1".into(),
        created_at: created,
        updated_at: updated,
        comments: Vec::new(),
    }
}

fn all_tasks() -> Vec<Task> {
    let team = team();
    vec![
        task(
            "1",
            "Finish the monthly report",
            "Compile the May sales analysis report",
            TaskStatus::Pending,
            Priority::High,
            date(2025, 5, 15),
            None,
            TaskScope::Personal,
            ts(2025, 5, 1, 8, 0),
            ts(2025, 5, 1, 8, 0),
        ),
        task(
            "2",
            "Prepare training materials",
            "Draft slides and handouts for new-hire onboarding",
            TaskStatus::InProgress,
            Priority::Medium,
            date(2025, 5, 20),
            Some(team[1].clone()),
            TaskScope::Personal,
            ts(2025, 5, 2, 10, 30),
            ts(2025, 5, 2, 10, 30),
        ),
        task(
            "3",
            "Design the user interface",
            "UI design for the app's new feature",
            TaskStatus::InReview,
            Priority::High,
            date(2025, 5, 12),
            Some(team[2].clone()),
            TaskScope::Project("1".into()),
            ts(2025, 5, 3, 9, 15),
            ts(2025, 5, 3, 9, 15),
        ),
        task(
            "4",
            "Fix the login bug",
            "Sign-in fails on iOS devices",
            TaskStatus::Done,
            Priority::High,
            date(2025, 5, 8),
            None,
            TaskScope::Project("1".into()),
            ts(2025, 4, 30, 14, 20),
            ts(2025, 5, 8, 16, 45),
        ),
        task(
            "5",
            "Optimise app performance",
            "Profile and improve page load times",
            TaskStatus::Pending,
            Priority::Medium,
            date(2025, 5, 25),
            None,
            TaskScope::Project("1".into()),
            ts(2025, 5, 4, 11, 0),
            ts(2025, 5, 4, 11, 0),
        ),
        task(
            "6",
            "Meet with the client",
            "Discuss requirements for the new project",
            TaskStatus::Pending,
            Priority::High,
            date(2025, 5, 10),
            None,
            TaskScope::Personal,
            ts(2025, 5, 5, 13, 30),
            ts(2025, 5, 5, 13, 30),
        ),
    ]
}

/// Seed tasks that belong to no project.
pub fn personal_tasks() -> Vec<Task> {
    all_tasks()
        .into_iter()
        .filter(|t| t.scope.is_personal())
        .collect()
}

/// Seed projects, each embedding its share of the seed tasks.
pub fn projects() -> Vec<Project> {
    let team = team();
    let project_tasks: Vec<Task> = all_tasks()
        .into_iter()
        .filter(|t| t.scope.project_id() == Some("1"))
        .collect();
    vec![
        Project {
            id: "1".into(),
            title: "Project Management App".into(),
            description: "Build a project management app with modern features".into(),
            members: team.clone(),
            tasks: project_tasks,
            created_by: "1".into(),
            created_at: ts(2025, 4, 15, 0, 0),
            updated_at: ts(2025, 5, 1, 0, 0),
        },
        Project {
            id: "2".into(),
            title: "Company Website Redesign".into(),
            description: "Redesign the company website with a new look".into(),
            members: vec![team[0].clone(), team[1].clone()],
            tasks: Vec::new(),
            created_by: "1".into(),
            created_at: ts(2025, 5, 1, 0, 0),
            updated_at: ts(2025, 5, 1, 0, 0),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_task_ids_are_unique_across_containers() {
        let mut ids: Vec<String> = personal_tasks().into_iter().map(|t| t.id).collect();
        for p in projects() {
            ids.extend(p.tasks.into_iter().map(|t| t.id));
        }
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
        assert_eq!(total, 6);
    }

    #[test]
    fn seed_containers_match_scopes() {
        assert!(personal_tasks().iter().all(|t| t.scope.is_personal()));
        for p in projects() {
            assert!(p
                .tasks
                .iter()
                .all(|t| t.scope.project_id() == Some(p.id.as_str())));
        }
    }
}
