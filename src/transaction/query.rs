//! Describes how transactions should be fetched from a store.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    ValidationError,
    transaction::domain::{CategoryName, TransactionType},
    user::UserID,
};

/// The order to sort transactions by timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Oldest first.
    #[serde(rename = "asc")]
    Ascending,
    /// Newest first.
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    pub(crate) fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Ascending),
            "desc" => Ok(Self::Descending),
            other => Err(ValidationError::InvalidSortOrder(other.to_owned())),
        }
    }
}

/// An inclusive range of timestamps. A missing bound means the range is open on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimestampRange {
    /// The earliest timestamp to include.
    pub from: Option<OffsetDateTime>,
    /// The latest timestamp to include.
    pub to: Option<OffsetDateTime>,
}

impl TimestampRange {
    /// A range that includes every timestamp.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// A range that includes timestamps between `from` and `to`, inclusive.
    pub fn between(from: OffsetDateTime, to: OffsetDateTime) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Parse a range from optional RFC 3339 bounds, e.g. from query parameters.
    ///
    /// # Errors
    /// Returns a [ValidationError::InvalidTimestamp] if a bound is not a valid RFC 3339 timestamp.
    pub fn parse(from: Option<&str>, to: Option<&str>) -> Result<Self, ValidationError> {
        Ok(Self {
            from: from.map(parse_timestamp).transpose()?,
            to: to.map(parse_timestamp).transpose()?,
        })
    }
}

fn parse_timestamp(text: &str) -> Result<OffsetDateTime, ValidationError> {
    OffsetDateTime::parse(text, &Rfc3339)
        .map_err(|_| ValidationError::InvalidTimestamp(text.to_owned()))
}

/// Defines how transactions should be fetched from
/// [TransactionStore::query](crate::TransactionStore::query).
///
/// Queries are always scoped to a single user.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionQuery {
    /// Only include transactions owned by this user.
    pub user_id: UserID,
    /// Only include transactions of this type.
    pub transaction_type: Option<TransactionType>,
    /// Only include transactions with exactly this category.
    pub category: Option<CategoryName>,
    /// Only include transactions with a timestamp in this range.
    pub timestamp_range: TimestampRange,
    /// The order of the returned transactions by timestamp.
    pub sort_order: SortOrder,
    /// Selects up to the first N (`limit`) transactions.
    pub limit: Option<u64>,
    /// Skips the first N (`offset`) transactions.
    pub offset: u64,
}

impl TransactionQuery {
    /// A query for all of a user's transactions, newest first.
    pub fn for_user(user_id: UserID) -> Self {
        Self {
            user_id,
            transaction_type: None,
            category: None,
            timestamp_range: TimestampRange::unbounded(),
            sort_order: SortOrder::Descending,
            limit: None,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod query_tests {
    use time::macros::datetime;

    use crate::{ValidationError, user::UserID};

    use super::{SortOrder, TimestampRange, TransactionQuery};

    #[test]
    fn parses_sort_order() {
        assert_eq!("asc".parse(), Ok(SortOrder::Ascending));
        assert_eq!("desc".parse(), Ok(SortOrder::Descending));
        assert_eq!(
            "newest".parse::<SortOrder>(),
            Err(ValidationError::InvalidSortOrder("newest".to_owned()))
        );
    }

    #[test]
    fn parses_timestamp_range() {
        let range = TimestampRange::parse(Some("2025-10-01T00:00:00Z"), None).unwrap();

        assert_eq!(range.from, Some(datetime!(2025-10-01 00:00 UTC)));
        assert_eq!(range.to, None);
        assert_eq!(
            TimestampRange::parse(None, Some("yesterday")),
            Err(ValidationError::InvalidTimestamp("yesterday".to_owned()))
        );
    }

    #[test]
    fn query_for_user_is_unfiltered_and_newest_first() {
        let query = TransactionQuery::for_user(UserID::new(3));

        assert_eq!(query.user_id, UserID::new(3));
        assert_eq!(query.transaction_type, None);
        assert_eq!(query.category, None);
        assert_eq!(query.timestamp_range, TimestampRange::unbounded());
        assert_eq!(query.sort_order, SortOrder::Descending);
        assert_eq!((query.limit, query.offset), (None, 0));
    }
}
