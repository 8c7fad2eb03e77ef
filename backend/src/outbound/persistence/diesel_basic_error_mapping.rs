//! Diesel error mapping shared by the ledger repositories.

use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map Diesel errors into query/connection constructors.
///
/// Closed connections are retryable and become connection errors; every
/// other failure is a query error with a generic message so SQL details stay
/// in the debug log.
pub fn map_basic_diesel_error<E, Q, C>(error: diesel::result::Error, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::BrokenTransactionManager => connection("database connection error"),
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            query("database constraint violated")
        }
        _ => query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MealRepositoryError;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    fn map(error: DieselError) -> MealRepositoryError {
        map_basic_diesel_error(
            error,
            MealRepositoryError::query,
            MealRepositoryError::connection,
        )
    }

    #[rstest]
    fn closed_connection_is_retryable() {
        let err = map(DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection".to_owned()),
        ));
        assert!(matches!(err, MealRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn not_found_is_query_error() {
        assert_eq!(map(DieselError::NotFound), MealRepositoryError::query("record not found"));
    }

    #[rstest]
    fn pool_timeout_is_connection_error() {
        let err = map_basic_pool_error(
            PoolError::checkout("timed out"),
            MealRepositoryError::connection,
        );
        assert_eq!(err, MealRepositoryError::connection("timed out"));
    }
}
