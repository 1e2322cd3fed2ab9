/// Data models for database entities
///
/// All models map to database tables and use sqlx for type-safe queries.
/// Timestamps are RFC 3339 strings in UTC; chrono is only pulled in where an
/// instant actually has to be compared.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A client project
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: String,
    pub client_name: String,
    pub description: String,
    pub links: Option<String>, // JSON object, see ProjectLinks
    pub status: String,        // 'active', 'paused', 'completed'
    pub end_date: Option<String>,
    pub created_at: String,
    pub completed_at: Option<String>,
}

impl Project {
    /// Parse the links column from JSON
    pub fn get_links(&self) -> ProjectLinks {
        self.links
            .as_ref()
            .and_then(|l| serde_json::from_str(l).ok())
            .unwrap_or_default()
    }

    /// Set the links column as JSON
    pub fn set_links(&mut self, links: &ProjectLinks) -> Result<(), serde_json::Error> {
        self.links = Some(serde_json::to_string(links)?);
        Ok(())
    }

    /// When the project was completed, as a parsed instant
    pub fn completed_instant(&self) -> Option<DateTime<Utc>> {
        self.completed_at
            .as_ref()
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.with_timezone(&Utc))
    }
}

/// External links attached to a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectLinks {
    pub sow: Option<String>,
    pub usability_guidelines: Option<String>,
    pub github_repository: Option<String>,
    pub figma: Option<String>,
    pub feedback_spreadsheet: Option<String>,
}

/// Project status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Paused,
    Completed,
}

impl ProjectStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(ProjectStatus::Active),
            "paused" => Some(ProjectStatus::Paused),
            "completed" => Some(ProjectStatus::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Paused => "paused",
            ProjectStatus::Completed => "completed",
        };
        write!(f, "{}", s)
    }
}

/// A task, optionally attached to a project (general/admin tasks have none)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: String,
    pub project_id: Option<String>,
    pub title: String,
    pub status: String, // 'todo', 'in_progress', 'done'
    pub calendar_date: String,
    pub created_at: String,
}

/// Task status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "todo" => Some(TaskStatus::Todo),
            "in_progress" => Some(TaskStatus::InProgress),
            "done" => Some(TaskStatus::Done),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        };
        write!(f, "{}", s)
    }
}

/// A free-form note attached to a project
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Note {
    pub id: String,
    pub project_id: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A reminder
///
/// Lifecycle: created unread, flipped to read by an explicit acknowledgment,
/// deleted only by an explicit delete. An unread reminder whose trigger instant
/// is at or before "now" counts as due.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reminder {
    pub id: String,
    pub project_id: Option<String>,
    pub task_id: Option<String>,
    pub message: String,
    pub trigger_date: String, // RFC 3339 instant
    pub is_read: bool,
    pub created_at: String,
}

impl Reminder {
    /// The trigger date as a parsed instant. Unparsable dates yield None and
    /// the reminder is simply never considered due.
    pub fn trigger_instant(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.trigger_date)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// Input for creating a project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectInput {
    pub client_name: String,
    pub description: String,
    pub links: Option<ProjectLinks>,
    pub end_date: Option<String>,
}

/// Input for creating a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskInput {
    pub project_id: Option<String>,
    pub title: String,
    pub status: TaskStatus,
    pub calendar_date: String,
}

/// Input for creating a note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteInput {
    pub project_id: String,
    pub content: String,
}

/// Input for creating a reminder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderInput {
    pub project_id: Option<String>,
    pub task_id: Option<String>,
    pub message: String,
    pub trigger_date: String,
}
