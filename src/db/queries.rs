/// SQL query functions for database operations
///
/// CRUD over the four collections. Ids and created_at are assigned here, so
/// every create hands back the record exactly as stored. Default list orders:
/// reminders ascending by trigger_date, everything else newest first.

use crate::db::models::*;
use crate::db::Database;
use crate::error::{Result, TrackError};
use chrono::{DateTime, Utc};
use uuid::Uuid;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

fn require_rfc3339(value: &str) -> Result<()> {
    DateTime::parse_from_rfc3339(value)
        .map(|_| ())
        .map_err(|_| TrackError::InvalidDate(value.to_string()))
}

impl Database {
    // ---- projects ----

    /// Create a project and return it with assigned id and created_at
    pub async fn create_project(&self, input: ProjectInput) -> Result<Project> {
        if input.client_name.trim().is_empty() {
            return Err(TrackError::InvalidInput("client name is empty".to_string()));
        }
        if let Some(end) = &input.end_date {
            require_rfc3339(end)?;
        }

        let links = match &input.links {
            Some(l) => Some(serde_json::to_string(l)?),
            None => None,
        };

        let project = Project {
            id: new_id(),
            client_name: input.client_name.trim().to_string(),
            description: input.description,
            links,
            status: ProjectStatus::Active.to_string(),
            end_date: input.end_date,
            created_at: now_rfc3339(),
            completed_at: None,
        };

        sqlx::query(
            r#"
            INSERT INTO projects (id, client_name, description, links, status, end_date, created_at, completed_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&project.id)
        .bind(&project.client_name)
        .bind(&project.description)
        .bind(&project.links)
        .bind(&project.status)
        .bind(&project.end_date)
        .bind(&project.created_at)
        .bind(&project.completed_at)
        .execute(self.pool())
        .await?;

        Ok(project)
    }

    /// List projects, newest first
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let projects =
            sqlx::query_as::<_, Project>("SELECT * FROM projects ORDER BY created_at DESC")
                .fetch_all(self.pool())
                .await?;

        Ok(projects)
    }

    /// Get project by ID
    pub async fn get_project(&self, id: &str) -> Result<Option<Project>> {
        let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(project)
    }

    /// Change a project's status
    ///
    /// Moving into 'completed' stamps completed_at; moving out clears it.
    pub async fn update_project_status(&self, id: &str, status: ProjectStatus) -> Result<Project> {
        let completed_at = match status {
            ProjectStatus::Completed => Some(now_rfc3339()),
            _ => None,
        };

        let updated = sqlx::query(
            "UPDATE projects SET status = ?, completed_at = ? WHERE id = ?",
        )
        .bind(status.to_string())
        .bind(&completed_at)
        .bind(id)
        .execute(self.pool())
        .await?;

        if updated.rows_affected() == 0 {
            return Err(TrackError::NotFound("Project", id.to_string()));
        }

        self.get_project(id)
            .await?
            .ok_or_else(|| TrackError::NotFound("Project", id.to_string()))
    }

    /// Delete a project and everything hanging off it
    pub async fn delete_project(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM tasks WHERE project_id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        sqlx::query("DELETE FROM notes WHERE project_id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        sqlx::query("DELETE FROM reminders WHERE project_id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    // ---- tasks ----

    /// Create a task and return it with assigned id and created_at
    pub async fn create_task(&self, input: TaskInput) -> Result<Task> {
        if input.title.trim().is_empty() {
            return Err(TrackError::InvalidInput("task title is empty".to_string()));
        }
        require_rfc3339(&input.calendar_date)?;

        let task = Task {
            id: new_id(),
            project_id: input.project_id,
            title: input.title.trim().to_string(),
            status: input.status.to_string(),
            calendar_date: input.calendar_date,
            created_at: now_rfc3339(),
        };

        sqlx::query(
            r#"
            INSERT INTO tasks (id, project_id, title, status, calendar_date, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&task.id)
        .bind(&task.project_id)
        .bind(&task.title)
        .bind(&task.status)
        .bind(&task.calendar_date)
        .bind(&task.created_at)
        .execute(self.pool())
        .await?;

        Ok(task)
    }

    /// List tasks, newest first
    ///
    /// # Arguments
    /// * `project_id` - Optional project filter (None for all tasks)
    pub async fn list_tasks(&self, project_id: Option<&str>) -> Result<Vec<Task>> {
        let tasks = if let Some(pid) = project_id {
            sqlx::query_as::<_, Task>(
                "SELECT * FROM tasks WHERE project_id = ? ORDER BY created_at DESC",
            )
            .bind(pid)
            .fetch_all(self.pool())
            .await?
        } else {
            sqlx::query_as::<_, Task>("SELECT * FROM tasks ORDER BY created_at DESC")
                .fetch_all(self.pool())
                .await?
        };

        Ok(tasks)
    }

    /// Get task by ID
    pub async fn get_task(&self, id: &str) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(task)
    }

    /// Move a task between kanban columns
    pub async fn update_task_status(&self, id: &str, status: TaskStatus) -> Result<Task> {
        let updated = sqlx::query("UPDATE tasks SET status = ? WHERE id = ?")
            .bind(status.to_string())
            .bind(id)
            .execute(self.pool())
            .await?;

        if updated.rows_affected() == 0 {
            return Err(TrackError::NotFound("Task", id.to_string()));
        }

        self.get_task(id)
            .await?
            .ok_or_else(|| TrackError::NotFound("Task", id.to_string()))
    }

    /// Reschedule a task on the calendar
    pub async fn update_task_date(&self, id: &str, calendar_date: &str) -> Result<Task> {
        require_rfc3339(calendar_date)?;

        let updated = sqlx::query("UPDATE tasks SET calendar_date = ? WHERE id = ?")
            .bind(calendar_date)
            .bind(id)
            .execute(self.pool())
            .await?;

        if updated.rows_affected() == 0 {
            return Err(TrackError::NotFound("Task", id.to_string()));
        }

        self.get_task(id)
            .await?
            .ok_or_else(|| TrackError::NotFound("Task", id.to_string()))
    }

    /// Delete a task; reminders pointing at it go too
    pub async fn delete_task(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM reminders WHERE task_id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    // ---- notes ----

    /// Create a note and return it with assigned id and timestamps
    pub async fn create_note(&self, input: NoteInput) -> Result<Note> {
        if input.content.trim().is_empty() {
            return Err(TrackError::InvalidInput("note content is empty".to_string()));
        }

        let now = now_rfc3339();
        let note = Note {
            id: new_id(),
            project_id: input.project_id,
            content: input.content,
            created_at: now.clone(),
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO notes (id, project_id, content, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&note.id)
        .bind(&note.project_id)
        .bind(&note.content)
        .bind(&note.created_at)
        .bind(&note.updated_at)
        .execute(self.pool())
        .await?;

        Ok(note)
    }

    /// List notes, newest first
    pub async fn list_notes(&self, project_id: Option<&str>) -> Result<Vec<Note>> {
        let notes = if let Some(pid) = project_id {
            sqlx::query_as::<_, Note>(
                "SELECT * FROM notes WHERE project_id = ? ORDER BY created_at DESC",
            )
            .bind(pid)
            .fetch_all(self.pool())
            .await?
        } else {
            sqlx::query_as::<_, Note>("SELECT * FROM notes ORDER BY created_at DESC")
                .fetch_all(self.pool())
                .await?
        };

        Ok(notes)
    }

    /// Get note by ID
    pub async fn get_note(&self, id: &str) -> Result<Option<Note>> {
        let note = sqlx::query_as::<_, Note>("SELECT * FROM notes WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(note)
    }

    /// Replace a note's content, bumping updated_at
    pub async fn update_note_content(&self, id: &str, content: &str) -> Result<Note> {
        if content.trim().is_empty() {
            return Err(TrackError::InvalidInput("note content is empty".to_string()));
        }

        let updated = sqlx::query("UPDATE notes SET content = ?, updated_at = ? WHERE id = ?")
            .bind(content)
            .bind(now_rfc3339())
            .bind(id)
            .execute(self.pool())
            .await?;

        if updated.rows_affected() == 0 {
            return Err(TrackError::NotFound("Note", id.to_string()));
        }

        self.get_note(id)
            .await?
            .ok_or_else(|| TrackError::NotFound("Note", id.to_string()))
    }

    /// Delete a note
    pub async fn delete_note(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    // ---- reminders ----

    /// Create a reminder and return it with assigned id and created_at
    pub async fn create_reminder(&self, input: ReminderInput) -> Result<Reminder> {
        if input.message.trim().is_empty() {
            return Err(TrackError::InvalidInput(
                "reminder message is empty".to_string(),
            ));
        }
        require_rfc3339(&input.trigger_date)?;

        let reminder = Reminder {
            id: new_id(),
            project_id: input.project_id,
            task_id: input.task_id,
            message: input.message.trim().to_string(),
            trigger_date: input.trigger_date,
            is_read: false,
            created_at: now_rfc3339(),
        };

        sqlx::query(
            r#"
            INSERT INTO reminders (id, project_id, task_id, message, trigger_date, is_read, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&reminder.id)
        .bind(&reminder.project_id)
        .bind(&reminder.task_id)
        .bind(&reminder.message)
        .bind(&reminder.trigger_date)
        .bind(reminder.is_read)
        .bind(&reminder.created_at)
        .execute(self.pool())
        .await?;

        Ok(reminder)
    }

    /// List reminders, earliest trigger first
    pub async fn list_reminders(&self, project_id: Option<&str>) -> Result<Vec<Reminder>> {
        let reminders = if let Some(pid) = project_id {
            sqlx::query_as::<_, Reminder>(
                "SELECT * FROM reminders WHERE project_id = ? ORDER BY trigger_date ASC",
            )
            .bind(pid)
            .fetch_all(self.pool())
            .await?
        } else {
            sqlx::query_as::<_, Reminder>("SELECT * FROM reminders ORDER BY trigger_date ASC")
                .fetch_all(self.pool())
                .await?
        };

        Ok(reminders)
    }

    /// Get reminder by ID
    pub async fn get_reminder(&self, id: &str) -> Result<Option<Reminder>> {
        let reminder = sqlx::query_as::<_, Reminder>("SELECT * FROM reminders WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(reminder)
    }

    /// Flip a reminder's read flag
    pub async fn set_reminder_read(&self, id: &str, is_read: bool) -> Result<Reminder> {
        let updated = sqlx::query("UPDATE reminders SET is_read = ? WHERE id = ?")
            .bind(is_read)
            .bind(id)
            .execute(self.pool())
            .await?;

        if updated.rows_affected() == 0 {
            return Err(TrackError::NotFound("Reminder", id.to_string()));
        }

        self.get_reminder(id)
            .await?
            .ok_or_else(|| TrackError::NotFound("Reminder", id.to_string()))
    }

    /// Delete a reminder
    pub async fn delete_reminder(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM reminders WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    // ---- bulk + meta ----

    /// Remove a batch of projects and their dependents in one pass
    ///
    /// Used by the stale-project cleanup. Reminders without a project survive.
    pub async fn bulk_delete_projects(&self, ids: &[String]) -> Result<()> {
        for id in ids {
            self.delete_project(id).await?;
        }

        Ok(())
    }

    /// Get a metadata value (last cleanup run, etc.)
    pub async fn get_meta(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM meta WHERE key = ?")
            .bind(key)
            .fetch_optional(self.pool())
            .await?;

        Ok(row.map(|r| r.0))
    }

    /// Set a metadata value
    pub async fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query("INSERT OR REPLACE INTO meta (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    /// Write full records back, keeping their existing ids
    ///
    /// Import path for the file store: rows land as-is, replacing any row
    /// with the same id.
    pub async fn restore_all(
        &self,
        projects: &[Project],
        tasks: &[Task],
        notes: &[Note],
        reminders: &[Reminder],
    ) -> Result<()> {
        for p in projects {
            sqlx::query(
                r#"
                INSERT OR REPLACE INTO projects (id, client_name, description, links, status, end_date, created_at, completed_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&p.id)
            .bind(&p.client_name)
            .bind(&p.description)
            .bind(&p.links)
            .bind(&p.status)
            .bind(&p.end_date)
            .bind(&p.created_at)
            .bind(&p.completed_at)
            .execute(self.pool())
            .await?;
        }

        for t in tasks {
            sqlx::query(
                r#"
                INSERT OR REPLACE INTO tasks (id, project_id, title, status, calendar_date, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&t.id)
            .bind(&t.project_id)
            .bind(&t.title)
            .bind(&t.status)
            .bind(&t.calendar_date)
            .bind(&t.created_at)
            .execute(self.pool())
            .await?;
        }

        for n in notes {
            sqlx::query(
                r#"
                INSERT OR REPLACE INTO notes (id, project_id, content, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(&n.id)
            .bind(&n.project_id)
            .bind(&n.content)
            .bind(&n.created_at)
            .bind(&n.updated_at)
            .execute(self.pool())
            .await?;
        }

        for r in reminders {
            sqlx::query(
                r#"
                INSERT OR REPLACE INTO reminders (id, project_id, task_id, message, trigger_date, is_read, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&r.id)
            .bind(&r.project_id)
            .bind(&r.task_id)
            .bind(&r.message)
            .bind(&r.trigger_date)
            .bind(r.is_read)
            .bind(&r.created_at)
            .execute(self.pool())
            .await?;
        }

        Ok(())
    }

    /// Load all four collections in their default orders
    ///
    /// This is the snapshot the in-memory store is (re)hydrated from.
    pub async fn load_all(
        &self,
    ) -> Result<(Vec<Project>, Vec<Task>, Vec<Note>, Vec<Reminder>)> {
        let projects = self.list_projects().await?;
        let tasks = self.list_tasks(None).await?;
        let notes = self.list_notes(None).await?;
        let reminders = self.list_reminders(None).await?;

        Ok((projects, tasks, notes, reminders))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> Database {
        Database::new_test().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_project() {
        let db = test_db().await;

        let project = db
            .create_project(ProjectInput {
                client_name: "Acme".to_string(),
                description: "Website redesign".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(!project.id.is_empty());
        assert!(!project.created_at.is_empty());
        assert_eq!(project.status, "active");

        let fetched = db.get_project(&project.id).await.unwrap().unwrap();
        assert_eq!(fetched.client_name, "Acme");
    }

    #[tokio::test]
    async fn test_create_project_empty_name() {
        let db = test_db().await;

        let result = db
            .create_project(ProjectInput {
                client_name: "   ".to_string(),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(TrackError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_complete_project_stamps_completed_at() {
        let db = test_db().await;

        let project = db
            .create_project(ProjectInput {
                client_name: "Acme".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let completed = db
            .update_project_status(&project.id, ProjectStatus::Completed)
            .await
            .unwrap();
        assert_eq!(completed.status, "completed");
        assert!(completed.completed_at.is_some());

        let reopened = db
            .update_project_status(&project.id, ProjectStatus::Active)
            .await
            .unwrap();
        assert!(reopened.completed_at.is_none());
    }

    #[tokio::test]
    async fn test_delete_project_cascades() {
        let db = test_db().await;

        let project = db
            .create_project(ProjectInput {
                client_name: "Acme".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        db.create_task(TaskInput {
            project_id: Some(project.id.clone()),
            title: "Fix bug".to_string(),
            status: TaskStatus::Todo,
            calendar_date: "2024-01-05T00:00:00Z".to_string(),
        })
        .await
        .unwrap();

        db.create_note(NoteInput {
            project_id: project.id.clone(),
            content: "Kickoff notes".to_string(),
        })
        .await
        .unwrap();

        db.create_reminder(ReminderInput {
            project_id: Some(project.id.clone()),
            task_id: None,
            message: "Send invoice".to_string(),
            trigger_date: "2024-02-01T09:00:00Z".to_string(),
        })
        .await
        .unwrap();

        db.delete_project(&project.id).await.unwrap();

        assert!(db.list_tasks(None).await.unwrap().is_empty());
        assert!(db.list_notes(None).await.unwrap().is_empty());
        assert!(db.list_reminders(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_task_status_and_date_updates() {
        let db = test_db().await;

        let task = db
            .create_task(TaskInput {
                project_id: None,
                title: "File expenses".to_string(),
                status: TaskStatus::Todo,
                calendar_date: "2024-01-05T00:00:00Z".to_string(),
            })
            .await
            .unwrap();

        let moved = db
            .update_task_status(&task.id, TaskStatus::InProgress)
            .await
            .unwrap();
        assert_eq!(moved.status, "in_progress");

        let rescheduled = db
            .update_task_date(&task.id, "2024-01-06T00:00:00Z")
            .await
            .unwrap();
        assert_eq!(rescheduled.calendar_date, "2024-01-06T00:00:00Z");

        let bad = db.update_task_date(&task.id, "tomorrow").await;
        assert!(matches!(bad, Err(TrackError::InvalidDate(_))));
    }

    #[tokio::test]
    async fn test_delete_task_drops_its_reminders() {
        let db = test_db().await;

        let task = db
            .create_task(TaskInput {
                project_id: None,
                title: "Ship release".to_string(),
                status: TaskStatus::Todo,
                calendar_date: "2024-01-05T00:00:00Z".to_string(),
            })
            .await
            .unwrap();

        db.create_reminder(ReminderInput {
            project_id: None,
            task_id: Some(task.id.clone()),
            message: "Tag the release".to_string(),
            trigger_date: "2024-01-05T09:00:00Z".to_string(),
        })
        .await
        .unwrap();

        db.delete_task(&task.id).await.unwrap();
        assert!(db.list_reminders(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_note_update_bumps_updated_at() {
        let db = test_db().await;

        let note = db
            .create_note(NoteInput {
                project_id: "p1".to_string(),
                content: "draft".to_string(),
            })
            .await
            .unwrap();

        let updated = db
            .update_note_content(&note.id, "final version")
            .await
            .unwrap();
        assert_eq!(updated.content, "final version");
        assert!(updated.updated_at >= note.updated_at);
    }

    #[tokio::test]
    async fn test_reminders_listed_by_trigger_date() {
        let db = test_db().await;

        for (msg, when) in [
            ("later", "2024-03-01T09:00:00Z"),
            ("first", "2024-01-01T09:00:00Z"),
            ("middle", "2024-02-01T09:00:00Z"),
        ] {
            db.create_reminder(ReminderInput {
                project_id: None,
                task_id: None,
                message: msg.to_string(),
                trigger_date: when.to_string(),
            })
            .await
            .unwrap();
        }

        let reminders = db.list_reminders(None).await.unwrap();
        let messages: Vec<_> = reminders.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "middle", "later"]);
    }

    #[tokio::test]
    async fn test_reminder_bad_trigger_date() {
        let db = test_db().await;

        let result = db
            .create_reminder(ReminderInput {
                project_id: None,
                task_id: None,
                message: "Call client".to_string(),
                trigger_date: "next tuesday".to_string(),
            })
            .await;

        assert!(matches!(result, Err(TrackError::InvalidDate(_))));
    }

    #[tokio::test]
    async fn test_set_reminder_read() {
        let db = test_db().await;

        let reminder = db
            .create_reminder(ReminderInput {
                project_id: None,
                task_id: None,
                message: "Call client".to_string(),
                trigger_date: "2024-01-01T09:00:00Z".to_string(),
            })
            .await
            .unwrap();
        assert!(!reminder.is_read);

        let read = db.set_reminder_read(&reminder.id, true).await.unwrap();
        assert!(read.is_read);

        let missing = db.set_reminder_read("nope", true).await;
        assert!(matches!(missing, Err(TrackError::NotFound("Reminder", _))));
    }

    #[tokio::test]
    async fn test_list_filter_by_project() {
        let db = test_db().await;

        let project = db
            .create_project(ProjectInput {
                client_name: "Acme".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        db.create_task(TaskInput {
            project_id: Some(project.id.clone()),
            title: "Fix bug".to_string(),
            status: TaskStatus::Todo,
            calendar_date: "2024-01-05T00:00:00Z".to_string(),
        })
        .await
        .unwrap();

        db.create_task(TaskInput {
            project_id: None,
            title: "File expenses".to_string(),
            status: TaskStatus::Todo,
            calendar_date: "2024-01-05T00:00:00Z".to_string(),
        })
        .await
        .unwrap();

        let filtered = db.list_tasks(Some(&project.id)).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Fix bug");

        let all = db.list_tasks(None).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_restore_keeps_ids_and_replaces() {
        let db = test_db().await;

        let reminder = Reminder {
            id: "r1".to_string(),
            project_id: None,
            task_id: None,
            message: "Call client".to_string(),
            trigger_date: "2024-01-01T09:00:00Z".to_string(),
            is_read: false,
            created_at: "2024-01-01T00:00:00Z".to_string(),
        };

        db.restore_all(&[], &[], &[], std::slice::from_ref(&reminder))
            .await
            .unwrap();

        let stored = db.get_reminder("r1").await.unwrap().unwrap();
        assert_eq!(stored.message, "Call client");

        // Restoring again with changed content replaces, not duplicates
        let mut changed = reminder;
        changed.is_read = true;
        db.restore_all(&[], &[], &[], std::slice::from_ref(&changed))
            .await
            .unwrap();

        let all = db.list_reminders(None).await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].is_read);
    }

    #[tokio::test]
    async fn test_meta_roundtrip() {
        let db = test_db().await;

        assert!(db.get_meta("last_cleanup").await.unwrap().is_none());

        db.set_meta("last_cleanup", "2024-01-01T00:00:00Z")
            .await
            .unwrap();

        let value = db.get_meta("last_cleanup").await.unwrap();
        assert_eq!(value.as_deref(), Some("2024-01-01T00:00:00Z"));
    }
}
