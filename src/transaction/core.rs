//! Defines the core data models for transactions and the rules for validating them.

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::{
    ValidationError,
    database_id::TransactionId,
    transaction::domain::{CategoryName, TransactionSource, TransactionType},
    user::UserID,
};

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build] and pass the builder to
/// [TransactionStore::create](crate::TransactionStore::create).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that owns the transaction. This never changes.
    pub user_id: UserID,
    /// The amount of money spent or earned, always zero or greater.
    pub amount: f64,
    /// Whether the money was spent or earned.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// A label for grouping transactions, e.g. "Groceries".
    pub category: CategoryName,
    /// How the transaction was entered.
    pub source: TransactionSource,
    /// When the transaction happened.
    ///
    /// This is business time chosen by the user and is independent of
    /// [Transaction::created_at].
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// A text description of what the transaction was for.
    pub description: Option<String>,
    /// When the record was created. Set once by the store.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder::new] for discoverability.
    pub fn build(
        user_id: UserID,
        amount: f64,
        transaction_type: TransactionType,
        category: &str,
    ) -> TransactionBuilder {
        TransactionBuilder::new(user_id, amount, transaction_type, category)
    }
}

/// A builder for creating [Transaction] instances.
///
/// The builder holds unvalidated values. They are checked when the builder is
/// handed to a store, so that a store never persists an invalid transaction.
///
/// # Examples
///
/// ```ignore
/// use time::macros::datetime;
///
/// let builder = Transaction::build(UserID::new(1), 45.99, TransactionType::Expense, "Coffee")
///     .timestamp(datetime!(2025-01-15 08:30 UTC))
///     .description("Flat white");
///
/// let transaction = store.create(builder)?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    /// The user that will own the transaction.
    pub user_id: UserID,

    /// The magnitude of the transaction.
    ///
    /// Must be zero or greater, the direction of the money is given by
    /// [TransactionBuilder::transaction_type].
    pub amount: f64,

    /// Whether the money was spent or earned.
    pub transaction_type: TransactionType,

    /// The category label. Surrounding whitespace is trimmed and the result
    /// must not be empty.
    pub category: String,

    /// How the transaction was entered, defaults to [TransactionSource::Manual].
    pub source: TransactionSource,

    /// When the transaction happened, defaults to the creation time.
    pub timestamp: Option<OffsetDateTime>,

    /// An optional description. Blank descriptions are stored as `None`.
    pub description: Option<String>,
}

impl TransactionBuilder {
    /// Create a builder with the required fields of a transaction.
    pub fn new(
        user_id: UserID,
        amount: f64,
        transaction_type: TransactionType,
        category: &str,
    ) -> Self {
        Self {
            user_id,
            amount,
            transaction_type,
            category: category.to_owned(),
            source: TransactionSource::default(),
            timestamp: None,
            description: None,
        }
    }

    /// Set the source of the transaction.
    pub fn source(mut self, source: TransactionSource) -> Self {
        self.source = source;
        self
    }

    /// Set when the transaction happened.
    pub fn timestamp(mut self, timestamp: OffsetDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Set the description of the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    /// Check the builder's fields and fill in defaults.
    ///
    /// `now` is used as the timestamp when none was given.
    ///
    /// # Errors
    /// Returns a [ValidationError] if the amount is negative or not finite, or
    /// if the category is empty.
    pub(crate) fn validate(self, now: OffsetDateTime) -> Result<NewTransaction, ValidationError> {
        Ok(NewTransaction {
            user_id: self.user_id,
            amount: validate_amount(self.amount)?,
            transaction_type: self.transaction_type,
            category: CategoryName::new(&self.category)?,
            source: self.source,
            timestamp: normalize_timestamp(self.timestamp.unwrap_or(now)),
            description: normalize_description(self.description),
        })
    }
}

/// A validated transaction that has not been assigned an ID yet.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NewTransaction {
    pub(crate) user_id: UserID,
    pub(crate) amount: f64,
    pub(crate) transaction_type: TransactionType,
    pub(crate) category: CategoryName,
    pub(crate) source: TransactionSource,
    pub(crate) timestamp: OffsetDateTime,
    pub(crate) description: Option<String>,
}

/// Changes to apply to an existing transaction.
///
/// Fields set to `None` are left unchanged. The owner, ID and creation time
/// of a transaction cannot be changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionUpdate {
    /// The new amount, must be zero or greater.
    pub amount: Option<f64>,
    /// The new transaction type.
    pub transaction_type: Option<TransactionType>,
    /// The new category, must not be empty after trimming.
    pub category: Option<String>,
    /// The new source.
    pub source: Option<TransactionSource>,
    /// The new business time of the transaction.
    pub timestamp: Option<OffsetDateTime>,
    /// The new description. A blank string removes the description.
    pub description: Option<String>,
}

impl TransactionUpdate {
    /// Whether the update would leave a transaction unchanged.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply the changes to `transaction`, validating every changed field.
    ///
    /// # Errors
    /// Returns a [ValidationError] under the same rules as
    /// [TransactionBuilder::validate].
    pub(crate) fn apply(self, transaction: Transaction) -> Result<Transaction, ValidationError> {
        let amount = match self.amount {
            Some(amount) => validate_amount(amount)?,
            None => transaction.amount,
        };

        let category = match self.category {
            Some(category) => CategoryName::new(&category)?,
            None => transaction.category,
        };

        let description = match self.description {
            Some(description) => normalize_description(Some(description)),
            None => transaction.description,
        };

        Ok(Transaction {
            amount,
            transaction_type: self
                .transaction_type
                .unwrap_or(transaction.transaction_type),
            category,
            source: self.source.unwrap_or(transaction.source),
            timestamp: self
                .timestamp
                .map(normalize_timestamp)
                .unwrap_or(transaction.timestamp),
            description,
            ..transaction
        })
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

fn validate_amount(amount: f64) -> Result<f64, ValidationError> {
    if !amount.is_finite() {
        Err(ValidationError::NonFiniteAmount)
    } else if amount < 0.0 {
        Err(ValidationError::NegativeAmount(amount))
    } else {
        // Adding positive zero turns -0.0 into 0.0.
        Ok(amount + 0.0)
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|description| description.trim().to_owned())
        .filter(|description| !description.is_empty())
}

/// Timestamps are kept in UTC so that stored values compare by instant.
pub(crate) fn normalize_timestamp(timestamp: OffsetDateTime) -> OffsetDateTime {
    timestamp.to_offset(UtcOffset::UTC)
}

// ============================================================================
// TESTS
// ============================================================================
