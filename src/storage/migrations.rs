/// Versioned migrations for the data file format
///
/// Mirrors the database-side schema handling: a data file written by an older
/// build is upgraded step by step at load; one written by a newer build is
/// refused rather than guessed at.

use crate::error::{Result, TrackError};
use crate::storage::file_store::DataFile;

/// Newest data file format this build writes
pub const LATEST_VERSION: u32 = 1;

struct Migration {
    version: u32,
    name: &'static str,
    migrate: fn(&mut DataFile),
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial",
    migrate: |_data| {},
}];

/// Bring a loaded data file up to LATEST_VERSION
///
/// Returns the names of the migrations that ran. Files already at the latest
/// version pass through untouched.
pub fn run_migrations(data: &mut DataFile) -> Result<Vec<&'static str>> {
    if data.schema_version > LATEST_VERSION {
        return Err(TrackError::SchemaTooNew(data.schema_version, LATEST_VERSION));
    }

    let mut applied = Vec::new();

    for migration in MIGRATIONS {
        if migration.version > data.schema_version {
            (migration.migrate)(data);
            applied.push(migration.name);
        }
    }

    data.schema_version = LATEST_VERSION;
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_file_gets_all_migrations() {
        let mut data = DataFile {
            schema_version: 0,
            ..Default::default()
        };

        let applied = run_migrations(&mut data).unwrap();
        assert_eq!(applied, vec!["initial"]);
        assert_eq!(data.schema_version, LATEST_VERSION);
    }

    #[test]
    fn test_current_file_passes_through() {
        let mut data = DataFile {
            schema_version: LATEST_VERSION,
            ..Default::default()
        };

        let applied = run_migrations(&mut data).unwrap();
        assert!(applied.is_empty());
    }

    #[test]
    fn test_newer_file_is_refused() {
        let mut data = DataFile {
            schema_version: LATEST_VERSION + 1,
            ..Default::default()
        };

        let result = run_migrations(&mut data);
        assert!(matches!(result, Err(TrackError::SchemaTooNew(_, _))));
    }
}
