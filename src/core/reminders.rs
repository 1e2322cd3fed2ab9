/// Reminder scheduling
///
/// Keeps a transient "active" set of reminders that are due and unread,
/// recomputed on a fixed interval against the latest snapshot. Level-triggered:
/// a due reminder stays in (and returns to) the active set every tick until it
/// is explicitly acknowledged.

use crate::db::{Database, Reminder};
use crate::error::Result;
use crate::state::{Action, Store};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Fixed poll period for the reminder check
pub const POLL_INTERVAL_SECS: u64 = 60;

/// The subset of reminders that are due at `now`
///
/// Pure and idempotent: unread with a trigger instant at or before `now`.
/// Reminders whose trigger date does not parse are never due.
pub fn check_due(reminders: &[Reminder], now: DateTime<Utc>) -> Vec<Reminder> {
    reminders
        .iter()
        .filter(|r| !r.is_read)
        .filter(|r| r.trigger_instant().is_some_and(|t| t <= now))
        .cloned()
        .collect()
}

/// Surfaces due reminders and owns their acknowledgment
///
/// Reads snapshots from the shared store, persists acknowledgments through the
/// database, and tracks the active set in between polls.
pub struct ReminderScheduler {
    db: Arc<Database>,
    store: Arc<Store>,
    active: Mutex<Vec<Reminder>>,
}

impl ReminderScheduler {
    /// Create a new scheduler instance
    pub fn new(db: Arc<Database>, store: Arc<Store>) -> Self {
        Self {
            db,
            store,
            active: Mutex::new(Vec::new()),
        }
    }

    /// Recompute the active set from the current snapshot, replacing it
    pub fn poll_once(&self, now: DateTime<Utc>) {
        let due = self.store.with(|state| check_due(&state.reminders, now));
        *self.active.lock().unwrap() = due;
    }

    /// Reload reminders from the database, then recompute the active set
    ///
    /// This is what each poll tick runs. A load failure leaves both the
    /// snapshot and the active set as they were; the next tick tries again.
    pub async fn refresh_and_poll(&self) -> Result<()> {
        let reminders = self.db.list_reminders(None).await?;
        self.store.apply(Action::LoadReminders(reminders));
        self.poll_once(Utc::now());
        Ok(())
    }

    /// The currently active (due and unacknowledged) reminders
    pub fn active(&self) -> Vec<Reminder> {
        self.active.lock().unwrap().clone()
    }

    /// Acknowledge a reminder
    ///
    /// Persists is_read first; only on success does the reminder leave the
    /// store snapshot and the active set (immediately, no tick needed). On
    /// failure the error propagates and the active set is untouched, so the
    /// reminder keeps resurfacing until a write lands.
    pub async fn mark_as_read(&self, id: &str) -> Result<()> {
        let updated = self.db.set_reminder_read(id, true).await?;

        self.store.apply(Action::UpdateReminder(updated));
        self.active.lock().unwrap().retain(|r| r.id != id);

        Ok(())
    }

    /// Dismissing from the UI is the same as reading; there is no snooze
    pub async fn dismiss(&self, id: &str) -> Result<()> {
        self.mark_as_read(id).await
    }

    /// Start the repeating poll task
    ///
    /// The first check runs immediately, then every POLL_INTERVAL_SECS. The
    /// returned handle must be kept alive for as long as polling should run;
    /// dropping or cancelling it stops the timer.
    pub fn start(self: &Arc<Self>) -> PollHandle {
        let scheduler = Arc::clone(self);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(POLL_INTERVAL_SECS));
            loop {
                interval.tick().await;
                if let Err(e) = scheduler.refresh_and_poll().await {
                    // Keep the previous active set; next tick retries
                    eprintln!("reminder poll failed: {}", e.user_message());
                }
            }
        });

        PollHandle { handle }
    }
}

/// Handle to the running poll loop
///
/// Aborts the loop when cancelled or dropped, so a torn-down owner cannot
/// leak the timer.
pub struct PollHandle {
    handle: JoinHandle<()>,
}

impl PollHandle {
    /// Stop polling now
    pub fn cancel(self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ReminderInput;
    use crate::state::AppState;

    fn reminder(id: &str, trigger_date: &str, is_read: bool) -> Reminder {
        Reminder {
            id: id.to_string(),
            project_id: None,
            task_id: None,
            message: format!("Reminder {}", id),
            trigger_date: trigger_date.to_string(),
            is_read,
            created_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_check_due_basic() {
        let reminders = vec![reminder("r1", "2024-01-01T09:00:00Z", false)];
        let now = at("2024-01-01T10:00:00Z");

        let due = check_due(&reminders, now);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, "r1");
    }

    #[test]
    fn test_check_due_is_pure() {
        let reminders = vec![
            reminder("r1", "2024-01-01T09:00:00Z", false),
            reminder("r2", "2024-01-01T09:30:00Z", false),
            reminder("r3", "2024-01-02T09:00:00Z", false),
        ];
        let now = at("2024-01-01T10:00:00Z");

        let first: Vec<String> = check_due(&reminders, now).into_iter().map(|r| r.id).collect();
        let second: Vec<String> = check_due(&reminders, now).into_iter().map(|r| r.id).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec!["r1", "r2"]);
    }

    #[test]
    fn test_check_due_boundaries() {
        let now = at("2024-01-01T10:00:00Z");
        let reminders = vec![reminder("r1", "2024-01-01T10:00:01Z", false)];

        // One second in the future: not due yet
        assert!(check_due(&reminders, now).is_empty());
        // Two seconds later it is
        assert_eq!(
            check_due(&reminders, now + chrono::Duration::seconds(2)).len(),
            1
        );

        // Exactly at the trigger instant counts as due
        let exact = vec![reminder("r2", "2024-01-01T10:00:00Z", false)];
        assert_eq!(check_due(&exact, now).len(), 1);
    }

    #[test]
    fn test_check_due_skips_read_and_unparsable() {
        let now = at("2024-01-01T10:00:00Z");
        let reminders = vec![
            reminder("r1", "2024-01-01T09:00:00Z", true),
            reminder("r2", "whenever", false),
        ];

        assert!(check_due(&reminders, now).is_empty());
    }

    async fn scheduler_with(reminders: Vec<ReminderInput>) -> (Arc<ReminderScheduler>, Vec<String>) {
        let db = Arc::new(Database::new_test().await.unwrap());

        let mut ids = Vec::new();
        for input in reminders {
            ids.push(db.create_reminder(input).await.unwrap().id);
        }

        let loaded = db.list_reminders(None).await.unwrap();
        let store = Arc::new(Store::from_state(AppState {
            reminders: loaded,
            ..Default::default()
        }));

        (Arc::new(ReminderScheduler::new(db, store)), ids)
    }

    fn due_at_nine() -> ReminderInput {
        ReminderInput {
            project_id: None,
            task_id: None,
            message: "Call client".to_string(),
            trigger_date: "2024-01-01T09:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_poll_populates_active_set() {
        let (scheduler, ids) = scheduler_with(vec![due_at_nine()]).await;

        scheduler.poll_once(at("2024-01-01T10:00:00Z"));

        let active = scheduler.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, ids[0]);
    }

    #[tokio::test]
    async fn test_mark_as_read_removes_immediately() {
        let (scheduler, ids) = scheduler_with(vec![due_at_nine()]).await;
        let now = at("2024-01-01T10:00:00Z");

        scheduler.poll_once(now);
        assert_eq!(scheduler.active().len(), 1);

        scheduler.mark_as_read(&ids[0]).await.unwrap();

        // Gone from the active set without waiting for the next tick
        assert!(scheduler.active().is_empty());

        // And check_due against the same now agrees
        let due = scheduler
            .store
            .with(|state| check_due(&state.reminders, now));
        assert!(due.is_empty());
    }

    #[tokio::test]
    async fn test_mark_as_read_failure_keeps_active_set() {
        let (scheduler, _ids) = scheduler_with(vec![due_at_nine()]).await;
        scheduler.poll_once(at("2024-01-01T10:00:00Z"));

        let result = scheduler.mark_as_read("no-such-id").await;
        assert!(result.is_err());
        assert_eq!(scheduler.active().len(), 1);
    }

    #[tokio::test]
    async fn test_dismiss_is_mark_as_read() {
        let (scheduler, ids) = scheduler_with(vec![due_at_nine()]).await;
        scheduler.poll_once(at("2024-01-01T10:00:00Z"));

        scheduler.dismiss(&ids[0]).await.unwrap();
        assert!(scheduler.active().is_empty());

        let stored = scheduler.db.get_reminder(&ids[0]).await.unwrap().unwrap();
        assert!(stored.is_read);
    }

    #[tokio::test]
    async fn test_poll_replaces_previous_set() {
        let (scheduler, ids) = scheduler_with(vec![due_at_nine()]).await;
        let now = at("2024-01-01T10:00:00Z");

        scheduler.poll_once(now);
        assert_eq!(scheduler.active().len(), 1);

        // Still active on the next tick while unread (level-triggered)
        scheduler.poll_once(now);
        assert_eq!(scheduler.active().len(), 1);

        // Once read in the snapshot, the next poll drops it
        let read = scheduler.db.set_reminder_read(&ids[0], true).await.unwrap();
        scheduler.store.apply(Action::UpdateReminder(read));
        scheduler.poll_once(now);
        assert!(scheduler.active().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_and_poll_sees_new_reminders() {
        let (scheduler, _ids) = scheduler_with(vec![]).await;

        scheduler
            .db
            .create_reminder(due_at_nine())
            .await
            .unwrap();

        scheduler.refresh_and_poll().await.unwrap();
        assert_eq!(scheduler.active().len(), 1);
    }

    #[tokio::test]
    async fn test_poll_loop_runs_and_cancels() {
        let (scheduler, _ids) = scheduler_with(vec![due_at_nine()]).await;

        let handle = scheduler.start();

        // First tick fires immediately; give the spawned task a moment to
        // run its database load before checking
        for _ in 0..50 {
            if !scheduler.active().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(scheduler.active().len(), 1);

        handle.cancel();
    }
}
