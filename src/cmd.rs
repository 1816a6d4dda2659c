//! Command implementations for the CLI interface.
//!
//! Handlers talk to the session and data stores, print user-visible
//! confirmations on success, and surface auth/data errors to the caller.

use std::io;

use anyhow::{bail, Context, Result};
use chrono::{Duration, Local, NaiveDate};
use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::data::DataStore;
use crate::fields::{format_priority, format_status, DueFilter, Priority, TaskStatus};
use crate::project::ProjectDraft;
use crate::session::SessionStore;
use crate::storage::Storage;
use crate::task::{Task, TaskDraft, TaskScope};
use crate::user::UserSnapshot;

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with an email and password.
    Login { email: String, password: String },

    /// Create an account and sign in.
    Register {
        name: String,
        email: String,
        password: String,
    },

    /// Sign out and forget the persisted session.
    Logout,

    /// Show the signed-in user.
    Whoami,

    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long, default_value = "")]
        desc: String,
        /// Status: pending | in-progress | in-review | done.
        #[arg(long, value_enum, default_value_t = TaskStatus::Pending)]
        status: TaskStatus,
        /// Priority: low | medium | high.
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", or "in Nd".
        #[arg(long)]
        due: String,
        /// Put the task on a project board instead of the personal list.
        #[arg(long)]
        project: Option<String>,
        /// Assign to a directory user by email.
        #[arg(long)]
        assign: Option<String>,
    },

    /// List tasks, personal plus every project board.
    List {
        /// Filter by status.
        #[arg(long, value_enum)]
        status: Option<TaskStatus>,
        /// Filter by project ID.
        #[arg(long)]
        project: Option<String>,
        /// Due filter: today | this-week | overdue.
        #[arg(long, value_enum)]
        due: Option<DueFilter>,
    },

    /// View one task with its comments.
    View {
        /// Task ID.
        id: String,
    },

    /// Update fields on an existing task.
    Update {
        /// Task ID.
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long, value_enum)]
        status: Option<TaskStatus>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", or "in Nd".
        #[arg(long)]
        due: Option<String>,
        /// Assign to a directory user by email.
        #[arg(long)]
        assign: Option<String>,
        /// Clear the assignee.
        #[arg(long)]
        unassign: bool,
    },

    /// Move a task across the board.
    Move {
        /// Task ID.
        id: String,
        /// Target status: pending | in-progress | in-review | done.
        #[arg(value_enum)]
        status: TaskStatus,
    },

    /// Delete a task.
    Delete {
        /// Task ID.
        id: String,
    },

    /// Comment on a task.
    Comment {
        /// Task ID.
        id: String,
        /// Comment text.
        text: String,
    },

    /// Manage project workspaces.
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a project.
    Add {
        title: String,
        #[arg(long, default_value = "")]
        desc: String,
        /// Member emails. May be repeated.
        #[arg(long = "member")]
        members: Vec<String>,
    },

    /// List projects with task counts.
    List,

    /// Rename or re-describe a project.
    Update {
        /// Project ID.
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
    },

    /// Add a member by email.
    AddMember {
        /// Project ID.
        id: String,
        email: String,
    },

    /// Delete a project and its board.
    Delete {
        /// Project ID.
        id: String,
    },
}

pub async fn cmd_login<S: Storage>(
    session: &mut SessionStore<S>,
    email: &str,
    password: &str,
) -> Result<()> {
    let user = session.sign_in(email, password).await?;
    println!("Signed in as {} <{}>", user.name, user.email);
    Ok(())
}

pub async fn cmd_register<S: Storage>(
    session: &mut SessionStore<S>,
    name: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    let user = session.register(name, email, password).await?;
    println!("Account created; signed in as {} <{}>", user.name, user.email);
    println!("Note: accounts live in memory only; the session itself is persisted.");
    Ok(())
}

pub fn cmd_logout<S: Storage>(session: &mut SessionStore<S>) -> Result<()> {
    session.sign_out()?;
    println!("Signed out");
    Ok(())
}

pub fn cmd_whoami<S: Storage>(session: &SessionStore<S>) -> Result<()> {
    match session.current() {
        Some(user) => println!("{} <{}>", user.name, user.email),
        None => println!("Not signed in"),
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_add<S: Storage>(
    session: &SessionStore<S>,
    data: &mut DataStore<S>,
    title: String,
    desc: String,
    status: TaskStatus,
    priority: Priority,
    due: &str,
    project: Option<String>,
    assign: Option<String>,
) -> Result<()> {
    let due_date = parse_due_input(due)
        .with_context(|| format!("unrecognised due date `{due}`"))?;
    let assigned_to = match assign {
        Some(email) => Some(resolve_user(session, &email)?),
        None => None,
    };
    let scope = match project {
        Some(id) => TaskScope::Project(id),
        None => TaskScope::Personal,
    };
    let task = data.add_task(TaskDraft {
        title,
        description: desc,
        status,
        priority,
        due_date,
        assigned_to,
        scope,
    })?;
    println!("Added task {} ({})", task.id, task.title);
    Ok(())
}

pub fn cmd_list<S: Storage>(
    data: &DataStore<S>,
    status: Option<TaskStatus>,
    project: Option<String>,
    due: Option<DueFilter>,
) -> Result<()> {
    let today = Local::now().date_naive();
    let (week_start, week_end) = start_end_of_this_week(today);

    let keep = |t: &Task| -> bool {
        if let Some(s) = status {
            if t.status != s {
                return false;
            }
        }
        match due {
            Some(DueFilter::Today) if t.due_date != today => return false,
            Some(DueFilter::ThisWeek) if t.due_date < week_start || t.due_date > week_end => {
                return false
            }
            Some(DueFilter::Overdue) if t.due_date >= today || t.status == TaskStatus::Done => {
                return false
            }
            _ => {}
        }
        true
    };

    // (task, container label) rows, personal list first.
    let mut rows: Vec<(&Task, String)> = Vec::new();
    if project.is_none() {
        for t in data.personal_tasks().iter().filter(|t| keep(t)) {
            rows.push((t, "personal".to_string()));
        }
    }
    for p in data.projects() {
        if let Some(ref want) = project {
            if &p.id != want {
                continue;
            }
        }
        for t in p.tasks.iter().filter(|t| keep(t)) {
            rows.push((t, p.title.clone()));
        }
    }
    rows.sort_by(|(a, _), (b, _)| (a.due_date, &a.id).cmp(&(b.due_date, &b.id)));

    println!(
        "{:<14} {:<12} {:<7} {:<10} {:<16} {}",
        "ID", "Status", "Pri", "Due", "Where", "Title"
    );
    for (t, container) in rows {
        println!(
            "{:<14} {:<12} {:<7} {:<10} {:<16} {}",
            t.id,
            format_status(t.status),
            format_priority(t.priority),
            format_due_relative(t.due_date, today),
            truncate(&container, 16),
            t.title
        );
    }
    Ok(())
}

pub fn cmd_view<S: Storage>(data: &DataStore<S>, id: &str) -> Result<()> {
    let Some(task) = data.find_task(id) else {
        bail!("task `{id}` not found");
    };
    println!("{}  {}", task.id, task.title);
    println!("  Status:   {}", format_status(task.status));
    println!("  Priority: {}", format_priority(task.priority));
    println!("  Due:      {}", task.due_date);
    match task.scope.project_id() {
        Some(pid) => {
            let title = data
                .find_project(pid)
                .map(|p| p.title.as_str())
                .unwrap_or("unknown project");
            println!("  Board:    {title} ({pid})");
        }
        None => println!("  Board:    personal"),
    }
    if let Some(ref who) = task.assigned_to {
        println!("  Assignee: {} <{}>", who.name, who.email);
    }
    if !task.description.is_empty() {
        println!("  {}", task.description);
    }
    if !task.comments.is_empty() {
        println!("  Comments:");
        for c in &task.comments {
            println!(
                "    [{}] {}: {}",
                c.created_at.format("%Y-%m-%d %H:%M"),
                c.created_by.name,
                c.content
            );
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_update<S: Storage>(
    session: &SessionStore<S>,
    data: &mut DataStore<S>,
    id: &str,
    title: Option<String>,
    desc: Option<String>,
    status: Option<TaskStatus>,
    priority: Option<Priority>,
    due: Option<String>,
    assign: Option<String>,
    unassign: bool,
) -> Result<()> {
    let Some(task) = data.find_task(id) else {
        bail!("task `{id}` not found");
    };
    let mut task = task.clone();
    if let Some(t) = title {
        task.title = t;
    }
    if let Some(d) = desc {
        task.description = d;
    }
    if let Some(s) = status {
        task.status = s;
    }
    if let Some(p) = priority {
        task.priority = p;
    }
    if let Some(ref raw) = due {
        task.due_date =
            parse_due_input(raw).with_context(|| format!("unrecognised due date `{raw}`"))?;
    }
    if unassign {
        task.assigned_to = None;
    } else if let Some(email) = assign {
        task.assigned_to = Some(resolve_user(session, &email)?);
    }
    data.update_task(task)?;
    println!("Updated task {id}");
    Ok(())
}

pub fn cmd_move<S: Storage>(data: &mut DataStore<S>, id: &str, status: TaskStatus) -> Result<()> {
    let Some(task) = data.find_task(id) else {
        bail!("task `{id}` not found");
    };
    let mut task = task.clone();
    task.status = status;
    data.update_task(task)?;
    println!("Moved task {id} to {}", format_status(status));
    Ok(())
}

pub fn cmd_delete<S: Storage>(data: &mut DataStore<S>, id: &str) -> Result<()> {
    if data.delete_task(id)? {
        println!("Deleted task {id}");
    } else {
        println!("Task {id} not found; nothing deleted");
    }
    Ok(())
}

pub fn cmd_comment<S: Storage>(data: &mut DataStore<S>, id: &str, text: &str) -> Result<()> {
    data.add_comment(id, text)?;
    println!("Comment added to task {id}");
    Ok(())
}

pub fn cmd_project<S: Storage>(
    session: &SessionStore<S>,
    data: &mut DataStore<S>,
    action: ProjectAction,
) -> Result<()> {
    match action {
        ProjectAction::Add {
            title,
            desc,
            members,
        } => {
            let members = members
                .iter()
                .map(|email| resolve_user(session, email))
                .collect::<Result<Vec<_>>>()?;
            let project = data.add_project(ProjectDraft {
                title,
                description: desc,
                members,
            })?;
            println!("Created project {} ({})", project.id, project.title);
        }
        ProjectAction::List => {
            println!(
                "{:<14} {:<28} {:<8} {:<6} {}",
                "ID", "Title", "Members", "Tasks", "Updated"
            );
            for p in data.projects() {
                println!(
                    "{:<14} {:<28} {:<8} {:<6} {}",
                    p.id,
                    truncate(&p.title, 28),
                    p.members.len(),
                    p.tasks.len(),
                    p.updated_at.format("%Y-%m-%d")
                );
            }
        }
        ProjectAction::Update { id, title, desc } => {
            let Some(project) = data.find_project(&id) else {
                bail!("project `{id}` not found");
            };
            let mut project = project.clone();
            if let Some(t) = title {
                project.title = t;
            }
            if let Some(d) = desc {
                project.description = d;
            }
            data.update_project(project)?;
            println!("Updated project {id}");
        }
        ProjectAction::AddMember { id, email } => {
            let member = resolve_user(session, &email)?;
            let Some(project) = data.find_project(&id) else {
                bail!("project `{id}` not found");
            };
            let mut project = project.clone();
            project.members.push(member);
            data.update_project(project)?;
            println!("Added {email} to project {id}");
        }
        ProjectAction::Delete { id } => {
            if data.delete_project(&id)? {
                println!("Deleted project {id}");
            } else {
                println!("Project {id} not found; nothing deleted");
            }
        }
    }
    Ok(())
}

pub fn cmd_completions(shell: Shell) {
    generate(shell, &mut Cli::command(), "td", &mut io::stdout());
}

fn resolve_user<S: Storage>(session: &SessionStore<S>, email: &str) -> Result<UserSnapshot> {
    session
        .find_user(email)
        .cloned()
        .with_context(|| format!("no user with email `{email}` in the directory"))
}

/// Parse a due-date input: "today", "tomorrow", "in Nd"/"in Nw", or ISO.
pub fn parse_due_input(s: &str) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();
    let today = Local::now().date_naive();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(nd) = rest.strip_suffix('d') {
            if let Ok(days) = nd.trim().parse::<i64>() {
                return Some(today + Duration::days(days));
            }
        }
        if let Some(nw) = rest.strip_suffix('w') {
            if let Ok(weeks) = nw.trim().parse::<i64>() {
                return Some(today + Duration::weeks(weeks));
            }
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Calculate the start and end of the current ISO week (Monday to Sunday).
pub fn start_end_of_this_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    use chrono::Datelike;
    let weekday = today.weekday().num_days_from_monday() as i64;
    let start = today - Duration::days(weekday);
    let end = start + Duration::days(6);
    (start, end)
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: NaiveDate, today: NaiveDate) -> String {
    let delta = (due - today).num_days();
    match delta {
        0 => "today".into(),
        1 => "tomorrow".into(),
        d if d > 1 => format!("in {d}d"),
        d => format!("{}d late", -d),
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_input_accepts_relative_and_iso_forms() {
        let today = Local::now().date_naive();
        assert_eq!(parse_due_input("today"), Some(today));
        assert_eq!(parse_due_input("tomorrow"), Some(today + Duration::days(1)));
        assert_eq!(parse_due_input("in 3d"), Some(today + Duration::days(3)));
        assert_eq!(parse_due_input("in 2w"), Some(today + Duration::weeks(2)));
        assert_eq!(
            parse_due_input("2025-05-15"),
            NaiveDate::from_ymd_opt(2025, 5, 15)
        );
        assert_eq!(parse_due_input("someday"), None);
    }

    #[test]
    fn week_bounds_span_monday_to_sunday() {
        let wed = NaiveDate::from_ymd_opt(2025, 5, 14).unwrap();
        let (start, end) = start_end_of_this_week(wed);
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 5, 12).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 5, 18).unwrap());
    }

    #[test]
    fn relative_due_formatting() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
        assert_eq!(format_due_relative(today, today), "today");
        assert_eq!(
            format_due_relative(today + Duration::days(5), today),
            "in 5d"
        );
        assert_eq!(
            format_due_relative(today - Duration::days(2), today),
            "2d late"
        );
    }
}
