//! # td - task and project workspace CLI
//!
//! A local-first task manager: personal task lists plus project workspaces
//! with kanban-style boards, backed by JSON snapshots on disk.
//!
//! ## Quick start
//!
//! ```bash
//! # Sign in (seed directory: nguyenvana@example.com / password123)
//! td login nguyenvana@example.com password123
//!
//! # Add a personal task
//! td add "Write the quarterly summary" --due "in 3d" --priority high
//!
//! # Add a task to a project board and move it along
//! td add "Ship the landing page" --project 1 --due 2025-06-01
//! td move <task-id> in-review
//!
//! # Comment and inspect
//! td comment <task-id> "Looks good, one nit"
//! td view <task-id>
//! ```
//!
//! State lives in `~/.taskdesk` as one JSON file per collection
//! (`currentUser`, `projects`, `personalTasks`); pass `--data-dir` to use a
//! different location. Accounts created with `td register` exist for the
//! process lifetime only, but the signed-in session itself is persisted and
//! restored on the next run.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskdesk::cli::Cli;
use taskdesk::cmd::{self, Commands};
use taskdesk::{seed, DataStore, FileStorage, SessionStore};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskdesk=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Commands::Completions { shell } = &cli.command {
        cmd::cmd_completions(*shell);
        return Ok(());
    }

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => {
            let home = std::env::var("HOME").context("HOME is not set; pass --data-dir")?;
            PathBuf::from(home).join(".taskdesk")
        }
    };

    let mut session = SessionStore::new(FileStorage::open(&data_dir)?, seed::directory());
    session.restore()?;

    match cli.command {
        Commands::Completions { .. } => unreachable!("handled above"),

        Commands::Login { email, password } => {
            cmd::cmd_login(&mut session, &email, &password).await
        }
        Commands::Register {
            name,
            email,
            password,
        } => cmd::cmd_register(&mut session, &name, &email, &password).await,
        Commands::Logout => cmd::cmd_logout(&mut session),
        Commands::Whoami => cmd::cmd_whoami(&session),

        command => {
            let Some(user) = session.current().cloned() else {
                bail!("not signed in; run `td login <email> <password>` first");
            };
            let mut data = DataStore::new(FileStorage::open(&data_dir)?);
            data.open_session(user)?;

            match command {
                Commands::Add {
                    title,
                    desc,
                    status,
                    priority,
                    due,
                    project,
                    assign,
                } => cmd::cmd_add(
                    &session, &mut data, title, desc, status, priority, &due, project, assign,
                ),
                Commands::List {
                    status,
                    project,
                    due,
                } => cmd::cmd_list(&data, status, project, due),
                Commands::View { id } => cmd::cmd_view(&data, &id),
                Commands::Update {
                    id,
                    title,
                    desc,
                    status,
                    priority,
                    due,
                    assign,
                    unassign,
                } => cmd::cmd_update(
                    &session, &mut data, &id, title, desc, status, priority, due, assign, unassign,
                ),
                Commands::Move { id, status } => cmd::cmd_move(&mut data, &id, status),
                Commands::Delete { id } => cmd::cmd_delete(&mut data, &id),
                Commands::Comment { id, text } => cmd::cmd_comment(&mut data, &id, &text),
                Commands::Project { action } => cmd::cmd_project(&session, &mut data, action),
                Commands::Login { .. }
                | Commands::Register { .. }
                | Commands::Logout
                | Commands::Whoami
                | Commands::Completions { .. } => unreachable!("handled above"),
            }
        }
    }
}
