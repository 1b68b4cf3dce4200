//! Implements a SQLite backed transaction store.

use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::{
    Connection, Row, params, params_from_iter,
    types::{Type, Value},
};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::TransactionId,
    db::{CreateTable, MapRow, initialize, timestamp_from_row, timestamp_to_sql},
    stores::TransactionStore,
    transaction::{
        CategoryTotal, TimestampRange, Transaction, TransactionBuilder, TransactionQuery,
        TransactionSummary, TransactionUpdate,
    },
    user::UserID,
};

/// The columns of the transaction table in the order expected by [MapRow].
const COLUMNS: &str =
    "id, user_id, amount, type, category, source, timestamp, description, created_at";

/// Stores transactions in a SQLite database.
///
/// The connection is shared behind a mutex, each operation holds the lock for
/// its whole duration.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// The caller must have initialized the database with [initialize].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    /// Open the database file at `path`, creating it if needed, and initialize the schema.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the file cannot be opened or the schema cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let connection = Connection::open(path)?;
        Self::from_connection(connection)
    }

    /// Open a new in-memory database and initialize the schema.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the schema cannot be created.
    pub fn open_in_memory() -> Result<Self, Error> {
        let connection = Connection::open_in_memory()?;
        Self::from_connection(connection)
    }

    fn from_connection(connection: Connection) -> Result<Self, Error> {
        initialize(&connection)?;

        Ok(Self::new(Arc::new(Mutex::new(connection))))
    }

    /// Close the database connection.
    ///
    /// # Errors
    /// Returns an [Error::DatabaseInUse] if clones of the store still share the
    /// connection, or an [Error::SqlError] if SQLite could not close it.
    pub fn close(self) -> Result<(), Error> {
        let connection = Arc::try_unwrap(self.connection)
            .map_err(|_| Error::DatabaseInUse)?
            .into_inner()
            .map_err(|_| Error::DatabaseLockError)?;

        connection.close().map_err(|(_, error)| Error::from(error))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("Could not acquire the database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::Validation] if a field of `builder` is invalid,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&self, builder: TransactionBuilder) -> Result<Transaction, Error> {
        let created_at = OffsetDateTime::now_utc();
        let transaction = builder.validate(created_at)?;
        let timestamp = timestamp_to_sql(transaction.timestamp)?;
        let created_at = timestamp_to_sql(created_at)?;

        let connection = self.lock()?;
        let transaction = connection
            .prepare(&format!(
                "INSERT INTO \"transaction\" \
                (user_id, amount, type, category, source, timestamp, description, created_at) \
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) \
                RETURNING {COLUMNS}"
            ))?
            .query_row(
                params![
                    transaction.user_id.as_i64(),
                    transaction.amount,
                    transaction.transaction_type,
                    transaction.category,
                    transaction.source,
                    timestamp,
                    transaction.description,
                    created_at,
                ],
                Self::map_row,
            )?;

        tracing::debug!(
            "Created transaction {} for user {}",
            transaction.id,
            transaction.user_id
        );

        Ok(transaction)
    }

    /// Retrieve a transaction in the database by its `id` and owner.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
    /// - or [Error::SqlError] there is some other SQL error.
    fn get(&self, id: TransactionId, user_id: UserID) -> Result<Transaction, Error> {
        let connection = self.lock()?;

        get_owned_transaction(id, user_id, &connection)
    }

    /// Query for transactions in the database.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is a SQL error.
    fn query(&self, query: TransactionQuery) -> Result<Vec<Transaction>, Error> {
        let (query_string, query_parameters) = build_select_statement(&query)?;
        let params = params_from_iter(query_parameters.iter());

        self.lock()?
            .prepare(&query_string)?
            .query_map(params, Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect()
    }

    /// Get the number of transactions owned by `user_id`.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is some SQL error.
    fn count(&self, user_id: UserID) -> Result<usize, Error> {
        self.lock()?
            .query_row(
                "SELECT COUNT(id) FROM \"transaction\" WHERE user_id = ?1",
                [user_id.as_i64()],
                |row| {
                    let count: i64 = row.get(0)?;
                    usize::try_from(count).map_err(|error| {
                        rusqlite::Error::FromSqlConversionFailure(0, Type::Integer, Box::new(error))
                    })
                },
            )
            .map_err(|error| error.into())
    }

    /// Total the transactions of `user_id` by type and category.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is some SQL error.
    fn summarize(
        &self,
        user_id: UserID,
        range: TimestampRange,
    ) -> Result<TransactionSummary, Error> {
        let mut where_clause_parts = vec!["user_id = ?1".to_owned()];
        let mut query_parameters = vec![Value::Integer(user_id.as_i64())];
        push_range_clauses(range, &mut where_clause_parts, &mut query_parameters)?;

        let query_string = format!(
            "SELECT type, category, SUM(amount), COUNT(id) FROM \"transaction\" \
            WHERE {} GROUP BY type, category",
            where_clause_parts.join(" AND ")
        );

        let category_totals = self
            .lock()?
            .prepare(&query_string)?
            .query_map(params_from_iter(query_parameters.iter()), |row| {
                let count: i64 = row.get(3)?;

                Ok(CategoryTotal {
                    transaction_type: row.get(0)?,
                    category: row.get(1)?,
                    total: row.get(2)?,
                    count: u64::try_from(count).map_err(|error| {
                        rusqlite::Error::FromSqlConversionFailure(3, Type::Integer, Box::new(error))
                    })?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()
            .map_err(Error::SqlError)?;

        Ok(TransactionSummary::from_category_totals(category_totals))
    }

    /// Update a transaction owned by `user_id`.
    ///
    /// The read, validation and write happen inside one SQL transaction while
    /// holding the connection lock.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::UpdateMissingTransaction] if `id` does not refer to a transaction owned by `user_id`,
    /// - [Error::Validation] if a changed field is invalid,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(
        &self,
        id: TransactionId,
        user_id: UserID,
        update: TransactionUpdate,
    ) -> Result<Transaction, Error> {
        let connection = self.lock()?;
        let sql_transaction = connection.unchecked_transaction()?;

        let current = match get_owned_transaction(id, user_id, &sql_transaction) {
            Ok(transaction) => transaction,
            Err(Error::NotFound) => return Err(Error::UpdateMissingTransaction),
            Err(error) => return Err(error),
        };

        let updated = update.apply(current)?;

        let rows_affected = sql_transaction.execute(
            "UPDATE \"transaction\" \
            SET amount = ?1, type = ?2, category = ?3, source = ?4, timestamp = ?5, description = ?6 \
            WHERE id = ?7 AND user_id = ?8",
            params![
                updated.amount,
                updated.transaction_type,
                updated.category,
                updated.source,
                timestamp_to_sql(updated.timestamp)?,
                updated.description,
                id,
                user_id.as_i64(),
            ],
        )?;

        if rows_affected == 0 {
            return Err(Error::UpdateMissingTransaction);
        }

        sql_transaction.commit()?;
        tracing::debug!("Updated transaction {id} for user {user_id}");

        Ok(updated)
    }

    /// Delete a transaction owned by `user_id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DeleteMissingTransaction] if `id` does not refer to a transaction owned by `user_id`,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&self, id: TransactionId, user_id: UserID) -> Result<(), Error> {
        let rows_affected = self.lock()?.execute(
            "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
            params![id, user_id.as_i64()],
        )?;

        if rows_affected == 0 {
            return Err(Error::DeleteMissingTransaction);
        }

        tracing::debug!("Deleted transaction {id} for user {user_id}");

        Ok(())
    }
}

fn get_owned_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {COLUMNS} FROM \"transaction\" WHERE id = ?1 AND user_id = ?2"
        ))?
        .query_row(params![id, user_id.as_i64()], SQLiteTransactionStore::map_row)?;

    Ok(transaction)
}

/// Build the SQL and positional parameters for `query`.
///
/// Every statement filters on `user_id` first so that one of the
/// `idx_transaction_user_*` indexes serves it.
fn build_select_statement(query: &TransactionQuery) -> Result<(String, Vec<Value>), Error> {
    let mut where_clause_parts = vec!["user_id = ?1".to_owned()];
    let mut query_parameters = vec![Value::Integer(query.user_id.as_i64())];

    if let Some(transaction_type) = query.transaction_type {
        where_clause_parts.push(format!("type = ?{}", query_parameters.len() + 1));
        query_parameters.push(Value::Text(transaction_type.as_str().to_owned()));
    }

    if let Some(ref category) = query.category {
        where_clause_parts.push(format!("category = ?{}", query_parameters.len() + 1));
        query_parameters.push(Value::Text(category.as_ref().to_owned()));
    }

    push_range_clauses(
        query.timestamp_range,
        &mut where_clause_parts,
        &mut query_parameters,
    )?;

    // Sort by timestamp, and then ID to keep the order stable for equal timestamps.
    let order = query.sort_order.as_sql();
    let mut query_string_parts = vec![
        format!("SELECT {COLUMNS} FROM \"transaction\""),
        String::from("WHERE ") + &where_clause_parts.join(" AND "),
        format!("ORDER BY timestamp {order}, id {order}"),
    ];

    match (query.limit, query.offset) {
        (None, 0) => {}
        // SQLite needs a LIMIT clause for OFFSET, a negative limit means no limit.
        (limit, offset) => {
            query_string_parts.push(format!(
                "LIMIT ?{} OFFSET ?{}",
                query_parameters.len() + 1,
                query_parameters.len() + 2
            ));
            query_parameters.push(Value::Integer(limit.map(clamp_to_i64).unwrap_or(-1)));
            query_parameters.push(Value::Integer(clamp_to_i64(offset)));
        }
    }

    Ok((query_string_parts.join(" "), query_parameters))
}

fn push_range_clauses(
    range: TimestampRange,
    where_clause_parts: &mut Vec<String>,
    query_parameters: &mut Vec<Value>,
) -> Result<(), Error> {
    if let Some(from) = range.from {
        where_clause_parts.push(format!("timestamp >= ?{}", query_parameters.len() + 1));
        query_parameters.push(Value::Integer(timestamp_to_sql(from)?));
    }

    if let Some(to) = range.to {
        where_clause_parts.push(format!("timestamp <= ?{}", query_parameters.len() + 1));
        query_parameters.push(Value::Integer(timestamp_to_sql(to)?));
    }

    Ok(())
}

fn clamp_to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                amount REAL NOT NULL CHECK (amount >= 0),
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                category TEXT NOT NULL CHECK (category <> ''),
                source TEXT NOT NULL DEFAULT 'manual' CHECK (source IN ('manual', 'guest')),
                timestamp INTEGER NOT NULL,
                description TEXT,
                created_at INTEGER NOT NULL
                )",
            (),
        )?;

        // One index per access path: by time, by type and by category, all scoped to a user.
        connection.execute(
            "CREATE INDEX IF NOT EXISTS idx_transaction_user_timestamp \
            ON \"transaction\"(user_id, timestamp DESC)",
            (),
        )?;
        connection.execute(
            "CREATE INDEX IF NOT EXISTS idx_transaction_user_type \
            ON \"transaction\"(user_id, type, timestamp DESC)",
            (),
        )?;
        connection.execute(
            "CREATE INDEX IF NOT EXISTS idx_transaction_user_category \
            ON \"transaction\"(user_id, category, timestamp DESC)",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Transaction {
            id: row.get(offset)?,
            user_id: UserID::new(row.get(offset + 1)?),
            amount: row.get(offset + 2)?,
            transaction_type: row.get(offset + 3)?,
            category: row.get(offset + 4)?,
            source: row.get(offset + 5)?,
            timestamp: timestamp_from_row(row, offset + 6)?,
            description: row.get(offset + 7)?,
            created_at: timestamp_from_row(row, offset + 8)?,
        })
    }
}
