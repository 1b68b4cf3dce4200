/*! This module defines and implements traits for interacting with the application's database. */

use rusqlite::{Connection, Error, Row, Transaction as SqlTransaction, types::Type};
use time::OffsetDateTime;

use crate::{ValidationError, stores::SQLiteTransactionStore};

/// A trait for adding an object schema to a database.
pub trait CreateTable {
    /// Create a table for the model.
    ///
    /// Implementations must be idempotent so that an existing database can be opened again.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), Error>;
}

/// A trait for mapping from a `rusqlite::Row` from a SQLite database to a concrete rust type.
pub trait MapRow {
    type ReturnType;

    /// Convert a row into a concrete type.
    ///
    /// **Note:** This function expects that the row object contains all the table columns in the order they were defined.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the corresponding rust type, or if an invalid column index was used.
    fn map_row(row: &Row) -> Result<Self::ReturnType, Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Convert a row into a concrete type.
    ///
    /// The `offset` indicates which column the row should be read from.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the corresponding rust type, or if an invalid column index was used.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, Error>;
}

/// Create the tables and indexes for the domain models.
///
/// This is safe to call on a database that has already been initialized.
///
/// # Errors
/// Returns an error if a table or index could not be created.
pub fn initialize(connection: &Connection) -> Result<(), crate::Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    SQLiteTransactionStore::create_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Convert a timestamp to the integer number of nanoseconds since the Unix epoch.
///
/// Storing integers keeps the ordering of timestamps numeric in SQL.
///
/// # Errors
/// Returns [ValidationError::TimestampOutOfRange] if the timestamp does not fit in 64 bits,
/// i.e. it is before 1677 or after 2262.
pub(crate) fn timestamp_to_sql(timestamp: OffsetDateTime) -> Result<i64, ValidationError> {
    i64::try_from(timestamp.unix_timestamp_nanos())
        .map_err(|_| ValidationError::TimestampOutOfRange(timestamp.to_string()))
}

/// Read a timestamp written by [timestamp_to_sql] from column `index` of `row`.
pub(crate) fn timestamp_from_row(row: &Row, index: usize) -> Result<OffsetDateTime, Error> {
    let nanos: i64 = row.get(index)?;

    OffsetDateTime::from_unix_timestamp_nanos(i128::from(nanos))
        .map_err(|error| Error::FromSqlConversionFailure(index, Type::Integer, Box::new(error)))
}

#[cfg(test)]
mod db_tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::ValidationError;

    use super::{initialize, timestamp_from_row, timestamp_to_sql};

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize database");
        initialize(&connection).expect("Could not initialize database a second time");
    }

    #[test]
    fn creates_indexes() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let mut index_names: Vec<String> = connection
            .prepare(
                "SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = 'transaction' \
                AND name LIKE 'idx_%'",
            )
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        index_names.sort();

        assert_eq!(
            index_names,
            vec![
                "idx_transaction_user_category",
                "idx_transaction_user_timestamp",
                "idx_transaction_user_type",
            ]
        );
    }

    #[test]
    fn timestamps_round_trip_with_nanoseconds() {
        let connection = Connection::open_in_memory().unwrap();
        let timestamp = datetime!(2025-10-05 13:14:15.123456789 UTC);
        let nanos = timestamp_to_sql(timestamp).unwrap();

        let got = connection
            .query_row("SELECT ?1", [nanos], |row| timestamp_from_row(row, 0))
            .unwrap();

        assert_eq!(got, timestamp);
    }

    #[test]
    fn timestamp_out_of_range_is_rejected() {
        let timestamp = datetime!(2500-01-01 00:00 UTC);

        assert!(matches!(
            timestamp_to_sql(timestamp),
            Err(ValidationError::TimestampOutOfRange(_))
        ));
    }
}
