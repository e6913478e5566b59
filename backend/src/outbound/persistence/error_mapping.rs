//! Diesel and pool error mapping shared by every repository.
//!
//! Each port declares its own error enum; repositories pass the enum's
//! constructors in so the classification lives in one place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure through a port's `connection` constructor.
pub(crate) fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    connection(error.into_message())
}

/// Map a Diesel failure through a port's `query` and `connection`
/// constructors.
///
/// A closed connection is reported as a connection failure; everything else
/// is a query failure with a generic message. The driver message is only
/// logged.
pub(crate) fn map_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DeserializationError(_) => query("unexpected column value"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

/// Whether `error` is a unique constraint violation.
pub(crate) fn is_unique_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, PartialEq, Eq)]
    enum Mapped {
        Query(String),
        Connection(String),
    }

    fn map(error: DieselError) -> Mapped {
        map_diesel_error(
            error,
            |message| Mapped::Query(message.to_owned()),
            |message| Mapped::Connection(message.to_owned()),
        )
    }

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new("driver detail".to_owned()))
    }

    #[rstest]
    fn closed_connection_is_a_connection_failure() {
        assert_eq!(
            map(database_error(DatabaseErrorKind::ClosedConnection)),
            Mapped::Connection("database connection error".to_owned())
        );
    }

    #[rstest]
    #[case(DieselError::NotFound, "record not found")]
    #[case(database_error(DatabaseErrorKind::ForeignKeyViolation), "database error")]
    #[case(database_error(DatabaseErrorKind::UniqueViolation), "database error")]
    fn other_failures_are_query_failures(#[case] error: DieselError, #[case] message: &str) {
        assert_eq!(map(error), Mapped::Query(message.to_owned()));
    }

    #[rstest]
    fn driver_detail_is_not_leaked() {
        let Mapped::Query(message) = map(database_error(DatabaseErrorKind::CheckViolation)) else {
            panic!("expected a query failure");
        };
        assert!(!message.contains("driver detail"));
    }

    #[rstest]
    fn pool_failures_use_the_connection_constructor() {
        let mapped = map_pool_error(PoolError::checkout("refused"), Mapped::Connection);
        assert_eq!(mapped, Mapped::Connection("refused".to_owned()));
    }

    #[rstest]
    fn unique_violations_are_detected() {
        assert!(is_unique_violation(&database_error(
            DatabaseErrorKind::UniqueViolation
        )));
        assert!(!is_unique_violation(&DieselError::NotFound));
    }
}
