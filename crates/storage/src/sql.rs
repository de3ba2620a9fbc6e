//! Mapping from SQLite failures to [`ArborError`]

use arbor_core::ArborError;
use rusqlite::ErrorCode;

/// Map a rusqlite error to an `ArborError`
///
/// Lock waits that outlive the busy timeout surface as `Busy`; everything
/// else is a generic storage error.
pub fn sql_err(e: rusqlite::Error) -> ArborError {
    match &e {
        rusqlite::Error::SqliteFailure(failure, _)
            if matches!(
                failure.code,
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
            ) =>
        {
            ArborError::Busy {
                message: e.to_string(),
            }
        }
        _ => ArborError::storage(e.to_string()),
    }
}

/// True if `e` is a UNIQUE constraint violation
pub fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
