/// trackdeck library
///
/// Core functionality for the project/task/note tracker: persistence,
/// in-memory state, fuzzy search and reminder scheduling.

pub mod core;
pub mod db;
pub mod error;
pub mod state;
pub mod storage;

// Re-exports for convenience
pub use db::Database;
pub use error::{Result, TrackError};
