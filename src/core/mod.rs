/// Core functionality modules
///
/// Contains the main business logic: the fuzzy search index, the reminder
/// scheduler and the stale-project cleanup.

pub mod cleanup;
pub mod reminders;
pub mod search;

pub use cleanup::{cleanup_stale_projects, should_run_cleanup, CleanupResult};
pub use reminders::{check_due, PollHandle, ReminderScheduler, POLL_INTERVAL_SECS};
pub use search::{filter_by_kind, SearchHit, SearchIndex, SearchKind, DEFAULT_LIMIT};
