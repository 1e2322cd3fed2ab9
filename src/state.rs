/// In-memory application state store
///
/// Reducer-style state holder for the four collections. Components get a
/// shared reference and read cheap snapshots; every mutation goes through the
/// single `apply` path, which keeps the one-writer invariant without any
/// component reaching into the collections directly.

use crate::db::{Note, Project, Reminder, Task};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// Snapshot of all tracked collections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppState {
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
    pub notes: Vec<Note>,
    pub reminders: Vec<Reminder>,
}

/// State mutations
///
/// Update variants carry the full replacement record; delete variants cascade
/// the same way the persistence layer does, so a snapshot never holds tasks,
/// notes or reminders of an entity that is gone.
#[derive(Debug, Clone)]
pub enum Action {
    /// Replace everything with a fresh load from persistence
    Load(AppState),
    /// Replace just the reminder collection (used by the poll loop)
    LoadReminders(Vec<Reminder>),

    AddProject(Project),
    UpdateProject(Project),
    DeleteProject(String),

    AddTask(Task),
    UpdateTask(Task),
    DeleteTask(String),

    AddNote(Note),
    UpdateNote(Note),
    DeleteNote(String),

    AddReminder(Reminder),
    UpdateReminder(Reminder),
    DeleteReminder(String),

    /// Batch removal of stale projects and their dependents
    RemoveProjects(Vec<String>),
}

/// Shared state holder
///
/// Cheap to share behind an Arc; `apply` is the only mutator.
#[derive(Default)]
pub struct Store {
    state: RwLock<AppState>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: AppState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Apply one action to the state
    pub fn apply(&self, action: Action) {
        let mut state = self.state.write().unwrap();
        reduce(&mut state, action);
    }

    /// Clone out the whole state
    pub fn snapshot(&self) -> AppState {
        self.state.read().unwrap().clone()
    }

    /// Read without cloning
    pub fn with<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.state.read().unwrap())
    }
}

fn reduce(state: &mut AppState, action: Action) {
    match action {
        Action::Load(fresh) => *state = fresh,

        Action::LoadReminders(reminders) => state.reminders = reminders,

        Action::AddProject(p) => state.projects.push(p),
        Action::UpdateProject(p) => {
            if let Some(existing) = state.projects.iter_mut().find(|x| x.id == p.id) {
                *existing = p;
            }
        }
        Action::DeleteProject(id) => {
            state.projects.retain(|p| p.id != id);
            state.tasks.retain(|t| t.project_id.as_deref() != Some(&id));
            state.notes.retain(|n| n.project_id != id);
            state
                .reminders
                .retain(|r| r.project_id.as_deref() != Some(&id));
        }

        Action::AddTask(t) => state.tasks.push(t),
        Action::UpdateTask(t) => {
            if let Some(existing) = state.tasks.iter_mut().find(|x| x.id == t.id) {
                *existing = t;
            }
        }
        Action::DeleteTask(id) => {
            state.tasks.retain(|t| t.id != id);
            state.reminders.retain(|r| r.task_id.as_deref() != Some(&id));
        }

        Action::AddNote(n) => state.notes.push(n),
        Action::UpdateNote(n) => {
            if let Some(existing) = state.notes.iter_mut().find(|x| x.id == n.id) {
                *existing = n;
            }
        }
        Action::DeleteNote(id) => state.notes.retain(|n| n.id != id),

        Action::AddReminder(r) => state.reminders.push(r),
        Action::UpdateReminder(r) => {
            if let Some(existing) = state.reminders.iter_mut().find(|x| x.id == r.id) {
                *existing = r;
            }
        }
        Action::DeleteReminder(id) => state.reminders.retain(|r| r.id != id),

        Action::RemoveProjects(ids) => {
            state.projects.retain(|p| !ids.contains(&p.id));
            state.tasks.retain(|t| {
                t.project_id
                    .as_ref()
                    .map_or(true, |pid| !ids.contains(pid))
            });
            state.notes.retain(|n| !ids.contains(&n.project_id));
            state.reminders.retain(|r| {
                r.project_id
                    .as_ref()
                    .map_or(true, |pid| !ids.contains(pid))
            });
        }
    }
}
