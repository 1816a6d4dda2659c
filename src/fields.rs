//! Enumerations shared across the task and project data model.
//!
//! Status and priority carry both serde names (for the JSON snapshots) and
//! clap value names (for the CLI), kept identical so stored and typed values
//! read the same.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Workflow position of a task on the board.
///
/// Any status is reachable from any other by direct assignment; there are no
/// automatic transitions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    InReview,
    Done,
}

/// Task importance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Due-date filters for task listings.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DueFilter {
    Today,
    ThisWeek,
    Overdue,
}

/// Format a task status for display.
pub fn format_status(s: TaskStatus) -> &'static str {
    match s {
        TaskStatus::Pending => "Pending",
        TaskStatus::InProgress => "In Progress",
        TaskStatus::InReview => "In Review",
        TaskStatus::Done => "Done",
    }
}

/// Format a priority for display.
pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::Low => "Low",
        Priority::Medium => "Medium",
        Priority::High => "High",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InReview).unwrap(),
            "\"in-review\""
        );
        assert_eq!(
            serde_json::from_str::<TaskStatus>("\"in-progress\"").unwrap(),
            TaskStatus::InProgress
        );
    }

    #[test]
    fn priority_round_trips() {
        for p in [Priority::Low, Priority::Medium, Priority::High] {
            let json = serde_json::to_string(&p).unwrap();
            assert_eq!(serde_json::from_str::<Priority>(&json).unwrap(), p);
        }
    }
}
