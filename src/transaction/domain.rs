//! Closed value types for the fields of a transaction.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money that was earned.
    Income,
    /// Money that was spent.
    Expense,
}

impl TransactionType {
    /// The name used for the type in the database and the JSON API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(ValidationError::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who entered a transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionSource {
    /// Entered by a registered user.
    #[default]
    Manual,
    /// Entered through a guest session.
    Guest,
}

impl TransactionSource {
    /// The name used for the source in the database and the JSON API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Guest => "guest",
        }
    }
}

impl FromStr for TransactionSource {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(Self::Manual),
            "guest" => Ok(Self::Guest),
            other => Err(ValidationError::InvalidSource(other.to_owned())),
        }
    }
}

impl Display for TransactionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated, non-empty category label, e.g. "Groceries" or "Salary".
///
/// Leading and trailing whitespace is removed.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return a [ValidationError::EmptyCategory] if `name` is empty after
    /// trimming whitespace.
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        let name = name.trim();

        if name.is_empty() {
            Err(ValidationError::EmptyCategory)
        } else {
            Ok(Self(name.to_string()))
        }
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl TryFrom<String> for CategoryName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CategoryName::new(&value)
    }
}

impl From<CategoryName> for String {
    fn from(value: CategoryName) -> Self {
        value.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// The database stores these types as text and must never hand back a value outside the enum.

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

impl ToSql for TransactionSource {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionSource {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

impl ToSql for CategoryName {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.as_str()))
    }
}

impl FromSql for CategoryName {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        CategoryName::new(value.as_str()?).map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

#[cfg(test)]
mod domain_tests {
    use std::str::FromStr;

    use crate::ValidationError;

    use super::{CategoryName, TransactionSource, TransactionType};

    #[test]
    fn parses_transaction_types() {
        assert_eq!(TransactionType::from_str("income"), Ok(TransactionType::Income));
        assert_eq!(
            TransactionType::from_str("expense"),
            Ok(TransactionType::Expense)
        );
    }

    #[test]
    fn rejects_unknown_transaction_type() {
        assert_eq!(
            TransactionType::from_str("transfer"),
            Err(ValidationError::InvalidTransactionType("transfer".to_owned()))
        );
        // Matching is exact.
        assert!(TransactionType::from_str("Income").is_err());
    }

    #[test]
    fn rejects_unknown_source() {
        assert_eq!(TransactionSource::from_str("guest"), Ok(TransactionSource::Guest));
        assert_eq!(
            TransactionSource::from_str("import"),
            Err(ValidationError::InvalidSource("import".to_owned()))
        );
    }

    #[test]
    fn source_defaults_to_manual() {
        assert_eq!(TransactionSource::default(), TransactionSource::Manual);
    }

    #[test]
    fn category_name_is_trimmed() {
        let name = CategoryName::new("  Groceries \n").unwrap();

        assert_eq!(name.as_ref(), "Groceries");
    }

    #[test]
    fn empty_category_name_is_rejected() {
        assert_eq!(CategoryName::new(""), Err(ValidationError::EmptyCategory));
        assert_eq!(CategoryName::new(" \t "), Err(ValidationError::EmptyCategory));
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(
            serde_json::to_string(&TransactionType::Expense).unwrap(),
            "\"expense\""
        );
        assert_eq!(
            serde_json::to_string(&TransactionSource::Guest).unwrap(),
            "\"guest\""
        );
        assert!(serde_json::from_str::<TransactionType>("\"transfer\"").is_err());
    }

    #[test]
    fn deserializing_category_validates() {
        assert!(serde_json::from_str::<CategoryName>("\"  \"").is_err());
        assert_eq!(
            serde_json::from_str::<CategoryName>("\" food \"").unwrap(),
            CategoryName::new("food").unwrap()
        );
    }
}
