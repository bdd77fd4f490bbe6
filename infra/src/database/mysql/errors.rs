//! Translation of SQLx failures into domain errors

use cb_core::errors::DomainError;

/// Map a failed read or bookkeeping statement onto the repository error
/// contract. These statements cannot violate a unique key, so every failure
/// is an unavailable store.
pub(super) fn map_sqlx_error(err: sqlx::Error) -> DomainError {
    tracing::error!("Database operation failed: {}", err);
    DomainError::store_failure("database unavailable")
}

/// Map a failed write that may collide with a unique key. Collisions become
/// `Conflict` carrying `conflict_message`.
pub(super) fn map_write_error(err: sqlx::Error, conflict_message: &str) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return DomainError::conflict(conflict_message);
        }
    }
    map_sqlx_error(err)
}

/// Errors raised while turning a row into an entity
pub(super) fn column_error(column: &str, err: impl std::fmt::Display) -> DomainError {
    tracing::error!("Failed to read column {}: {}", column, err);
    DomainError::Internal {
        message: format!("Malformed {} column", column),
    }
}
