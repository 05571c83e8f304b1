//! # Store Error Types
//!
//! Error types for data store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← classifies constraint violations            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UI layer ← picks the user-facing message ("email already exists",     │
//! │             "invalid email or password", ...)                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store never retries and never swallows failures: every error reaches
//! the awaiting caller, typed well enough to choose a message.

use thiserror::Error;

/// Data store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An operation was invoked before [`Database::initialize`] completed.
    ///
    /// [`Database::initialize`]: crate::Database::initialize
    #[error("store is not initialized; call Database::initialize() first")]
    Uninitialized,

    /// Registration hit the unique constraint on `users.email`.
    #[error("an account with email '{email}' already exists")]
    DuplicateEmail { email: String },

    /// Login failed: unknown email, wrong password, or deactivated account.
    ///
    /// Deliberately indistinguishable from the outside - the message never
    /// reveals which part failed.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// A partial update was requested with no fields set.
    #[error("no fields to update")]
    NoFieldsToUpdate,

    /// Entity not found in the database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation (other than the email case above).
    #[error("duplicate value for {field}")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation.
    #[error("foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed (generic storage failure).
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("connection pool exhausted")]
    PoolExhausted,

    /// Internal store error.
    #[error("internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// True if this error is the unique violation for the given column
    /// (`"users.email"`, `"sessions.token"`, ...).
    pub fn is_unique_violation_on(&self, column: &str) -> bool {
        matches!(self, StoreError::UniqueViolation { field } if field.contains(column))
    }
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → StoreError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → StoreError::PoolExhausted
/// Other                       → StoreError::Internal
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound {
                entity: "record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // UNIQUE: "UNIQUE constraint failed: <table>.<column>"
                // FK:     "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    StoreError::UniqueViolation { field }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    StoreError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    StoreError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted,

            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("pool is closed".to_string()),

            _ => StoreError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

/// Core-layer failures (password hashing) surface as internal store errors;
/// they indicate a bug or an environment problem, not bad user input.
impl From<bloom_core::CoreError> for StoreError {
    fn from(err: bloom_core::CoreError) -> Self {
        StoreError::Internal(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
