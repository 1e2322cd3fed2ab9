/// Fallback storage module
///
/// JSON file store with versioned migrations, used for export/import of the
/// database and as an offline snapshot format.

pub mod file_store;
pub mod migrations;

pub use file_store::{DataFile, FileStore};
pub use migrations::{run_migrations, LATEST_VERSION};
