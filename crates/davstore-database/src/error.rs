//! Mapping of sqlx errors into [`AppError`].

use davstore_core::error::{AppError, ErrorKind};

/// SQLSTATE of a unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Build a mapper that turns a sqlx error into an [`AppError`] carrying
/// `context`. Unique violations become [`ErrorKind::Conflict`].
pub fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |err| {
        if is_unique_violation(&err) {
            let constraint = match &err {
                sqlx::Error::Database(db_err) => db_err.constraint().unwrap_or("unique").to_string(),
                _ => String::new(),
            };
            AppError::with_source(
                ErrorKind::Conflict,
                format!("{context}: conflicts with concurrent write ({constraint})"),
                err,
            )
        } else {
            AppError::with_source(ErrorKind::Database, context, err)
        }
    }
}

/// Whether the error is a unique constraint violation.
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::Database(db_error) if db_error.code().as_deref() == Some(UNIQUE_VIOLATION)
    )
}
