//! SQLx failures, classified by SQLSTATE and folded into [`PortError`]
//! at the adapter seam.

use core_kernel::PortError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database unreachable: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// SQLSTATE 23505
    #[error("Duplicate key: {0}")]
    DuplicateEntry(String),

    /// SQLSTATE 23503, e.g. a note pointing at a missing policy
    #[error("Dangling reference: {0}")]
    ForeignKeyViolation(String),

    /// SQLSTATE 23514, e.g. an empty policy number
    #[error("Check constraint failed: {0}")]
    ConstraintViolation(String),

    /// SQLSTATE 23502
    #[error("Null in required column: {0}")]
    NotNullViolation(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Schema setup failed: {0}")]
    SchemaFailed(String),

    #[error("No pooled connection became available")]
    PoolExhausted,
}

impl DatabaseError {
    /// Classifies a PostgreSQL error code; unknown codes are plain query failures.
    pub fn from_sqlstate(code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            "23505" => Self::DuplicateEntry(message),
            "23503" => Self::ForeignKeyViolation(message),
            "23502" => Self::NotNullViolation(message),
            "23514" => Self::ConstraintViolation(message),
            _ => Self::QueryFailed(message),
        }
    }

    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::ConnectionFailed(_) | Self::PoolExhausted)
    }
}

impl From<&sqlx::Error> for DatabaseError {
    fn from(error: &sqlx::Error) -> Self {
        match error {
            sqlx::Error::PoolTimedOut => Self::PoolExhausted,
            sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                Self::ConnectionFailed(error.to_string())
            }
            sqlx::Error::Database(db) => match db.code() {
                Some(code) => Self::from_sqlstate(&code, db.message()),
                None => Self::QueryFailed(db.message().to_owned()),
            },
            other => Self::QueryFailed(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        Self::from(&error)
    }
}

impl From<DatabaseError> for PortError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::DuplicateEntry(msg) | DatabaseError::ForeignKeyViolation(msg) => {
                PortError::conflict(msg)
            }
            DatabaseError::ConstraintViolation(msg) | DatabaseError::NotNullViolation(msg) => {
                PortError::validation(msg)
            }
            e if e.is_connection_error() => PortError::Connection {
                message: e.to_string(),
                source: Some(Box::new(e)),
            },
            e => PortError::Internal {
                message: e.to_string(),
                source: Some(Box::new(e)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlstate_classification() {
        assert!(matches!(
            DatabaseError::from_sqlstate("23505", "dup"),
            DatabaseError::DuplicateEntry(_)
        ));
        assert!(matches!(
            DatabaseError::from_sqlstate("23503", "fk"),
            DatabaseError::ForeignKeyViolation(_)
        ));
        assert!(matches!(
            DatabaseError::from_sqlstate("23502", "null"),
            DatabaseError::NotNullViolation(_)
        ));
        assert!(matches!(
            DatabaseError::from_sqlstate("23514", "check"),
            DatabaseError::ConstraintViolation(_)
        ));
        assert!(matches!(
            DatabaseError::from_sqlstate("42P01", "no table"),
            DatabaseError::QueryFailed(_)
        ));
    }

    #[test]
    fn test_pool_timeout_is_connection_error() {
        let error = DatabaseError::from(&sqlx::Error::PoolTimedOut);
        assert!(error.is_connection_error());
        assert!(PortError::from(error).is_transient());
    }

    #[test]
    fn test_constraint_errors_become_rejections() {
        let port: PortError = DatabaseError::from_sqlstate("23502", "policy_number").into();
        assert!(port.is_constraint_violation());

        let port: PortError = DatabaseError::from_sqlstate("23503", "notes_policy_id_fkey").into();
        assert!(matches!(port, PortError::Conflict { .. }));
    }
}
