//! Defines the transaction store trait.

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{
        CategoryName, SortOrder, TimestampRange, Transaction, TransactionBuilder,
        TransactionQuery, TransactionSummary, TransactionType, TransactionUpdate,
    },
    user::UserID,
};

/// Handles the creation, retrieval and modification of transactions.
///
/// Every operation is scoped to the user that owns the transactions. A
/// transaction that belongs to another user is treated as if it did not exist.
pub trait TransactionStore {
    /// Validate and persist a new transaction.
    ///
    /// The store assigns the ID and the creation time.
    ///
    /// # Errors
    /// Returns an [Error::Validation] if the builder holds an invalid value.
    fn create(&self, builder: TransactionBuilder) -> Result<Transaction, Error>;

    /// Retrieve the transaction `id` owned by `user_id`.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] if the user owns no such transaction.
    fn get(&self, id: TransactionId, user_id: UserID) -> Result<Transaction, Error>;

    /// Retrieve transactions in the way defined by `query`.
    fn query(&self, query: TransactionQuery) -> Result<Vec<Transaction>, Error>;

    /// Count the transactions owned by `user_id`.
    fn count(&self, user_id: UserID) -> Result<usize, Error>;

    /// Total the transactions of `user_id` in `range` by type and category.
    fn summarize(&self, user_id: UserID, range: TimestampRange)
    -> Result<TransactionSummary, Error>;

    /// Apply `update` to the transaction `id` owned by `user_id`.
    ///
    /// # Errors
    /// Returns an [Error::UpdateMissingTransaction] if the user owns no such
    /// transaction, or an [Error::Validation] if a changed field is invalid.
    fn update(
        &self,
        id: TransactionId,
        user_id: UserID,
        update: TransactionUpdate,
    ) -> Result<Transaction, Error>;

    /// Delete the transaction `id` owned by `user_id`.
    ///
    /// # Errors
    /// Returns an [Error::DeleteMissingTransaction] if the user owns no such transaction.
    fn delete(&self, id: TransactionId, user_id: UserID) -> Result<(), Error>;

    /// All of the transactions owned by `user_id`, ordered by timestamp.
    ///
    /// A user with no transactions gets an empty vector.
    fn list_by_user(
        &self,
        user_id: UserID,
        sort_order: SortOrder,
    ) -> Result<Vec<Transaction>, Error> {
        self.query(TransactionQuery {
            sort_order,
            ..TransactionQuery::for_user(user_id)
        })
    }

    /// The transactions owned by `user_id` with the type `transaction_type`, newest first.
    fn list_by_user_and_type(
        &self,
        user_id: UserID,
        transaction_type: TransactionType,
    ) -> Result<Vec<Transaction>, Error> {
        self.query(TransactionQuery {
            transaction_type: Some(transaction_type),
            ..TransactionQuery::for_user(user_id)
        })
    }

    /// The transactions owned by `user_id` in `category`, newest first.
    fn list_by_user_and_category(
        &self,
        user_id: UserID,
        category: &CategoryName,
    ) -> Result<Vec<Transaction>, Error> {
        self.query(TransactionQuery {
            category: Some(category.clone()),
            ..TransactionQuery::for_user(user_id)
        })
    }
}
