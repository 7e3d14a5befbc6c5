//! Shared helpers for Diesel repository implementations.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Extract a readable message from a pool error.
pub fn map_pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Whether a Diesel error means the connection itself is unusable.
pub fn is_connection_error(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
            | DieselError::BrokenTransactionManager
    )
}

/// Whether a Diesel error is a foreign key violation.
pub fn is_foreign_key_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)
    )
}

/// Whether a transaction aborted on a conflict with a concurrent one and may
/// succeed if run again.
pub fn is_retryable_conflict(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(
            DatabaseErrorKind::SerializationFailure | DatabaseErrorKind::UniqueViolation,
            _
        )
    )
}

/// Log a Diesel failure and render it for a port error message.
pub fn describe_diesel_error(error: &DieselError, operation: &str) -> String {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), %operation, "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            %operation,
            "diesel operation failed"
        ),
    }
    format!("{operation}: {error}")
}

/// Map a Diesel error through a repository's connection and query
/// constructors.
pub fn map_diesel_error<E, C, Q>(
    error: DieselError,
    operation: &str,
    connection: C,
    query: Q,
) -> E
where
    C: FnOnce(String) -> E,
    Q: FnOnce(String) -> E,
{
    let message = describe_diesel_error(&error, operation);
    if is_connection_error(&error) {
        connection(message)
    } else {
        query(message)
    }
}
