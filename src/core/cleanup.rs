/// Stale-project cleanup
///
/// Projects completed more than two months ago get swept out along with their
/// tasks, notes and reminders. Runs at most once a day.

use crate::db::{Note, Project, Reminder, Task};
use chrono::{DateTime, Duration, Months, Utc};

/// Completed projects older than this many months are stale
const STALE_AFTER_MONTHS: u32 = 2;

/// What a cleanup pass would remove and what survives it
#[derive(Debug, Clone)]
pub struct CleanupResult {
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
    pub notes: Vec<Note>,
    pub reminders: Vec<Reminder>,
    pub removed_project_ids: Vec<String>,
}

/// Compute the post-cleanup collections
///
/// Pure: nothing is deleted here. Tasks and reminders without a project id
/// always survive; notes belong to a project by construction.
pub fn cleanup_stale_projects(
    projects: &[Project],
    tasks: &[Task],
    notes: &[Note],
    reminders: &[Reminder],
    now: DateTime<Utc>,
) -> CleanupResult {
    let cutoff = now
        .checked_sub_months(Months::new(STALE_AFTER_MONTHS))
        .unwrap_or(now);

    let removed_project_ids: Vec<String> = projects
        .iter()
        .filter(|p| p.completed_instant().is_some_and(|t| t < cutoff))
        .map(|p| p.id.clone())
        .collect();

    if removed_project_ids.is_empty() {
        return CleanupResult {
            projects: projects.to_vec(),
            tasks: tasks.to_vec(),
            notes: notes.to_vec(),
            reminders: reminders.to_vec(),
            removed_project_ids,
        };
    }

    let keep = |pid: Option<&String>| pid.map_or(true, |id| !removed_project_ids.contains(id));

    CleanupResult {
        projects: projects
            .iter()
            .filter(|p| !removed_project_ids.contains(&p.id))
            .cloned()
            .collect(),
        tasks: tasks
            .iter()
            .filter(|t| keep(t.project_id.as_ref()))
            .cloned()
            .collect(),
        notes: notes
            .iter()
            .filter(|n| !removed_project_ids.contains(&n.project_id))
            .cloned()
            .collect(),
        reminders: reminders
            .iter()
            .filter(|r| keep(r.project_id.as_ref()))
            .cloned()
            .collect(),
        removed_project_ids,
    }
}

/// Whether a cleanup pass is worth running
///
/// True when there is no record of a previous run (or it does not parse), or
/// the last run was at least a day ago.
pub fn should_run_cleanup(last_run: Option<&str>, now: DateTime<Utc>) -> bool {
    match last_run.and_then(|s| DateTime::parse_from_rfc3339(s).ok()) {
        Some(last) => now.signed_duration_since(last.with_timezone(&Utc)) >= Duration::days(1),
        None => true,
    }
}
