//! Transaction management for the fintrack API.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model, `TransactionBuilder` and `TransactionUpdate` with their validation rules
//! - Queries and summaries over a user's transactions
//! - Route handlers for the transaction endpoints

mod core;
mod create_endpoint;
mod delete_endpoint;
mod domain;
mod edit_endpoint;
mod list_endpoint;
mod query;
mod summary;
mod summary_endpoint;

pub use core::{Transaction, TransactionBuilder, TransactionUpdate};
pub use create_endpoint::{CreateTransactionRequest, create_transaction_endpoint};
pub use delete_endpoint::delete_transaction_endpoint;
pub use domain::{CategoryName, TransactionSource, TransactionType};
pub use edit_endpoint::{UpdateTransactionRequest, update_transaction_endpoint};
pub use list_endpoint::{
    ListTransactionsParams, get_transaction_endpoint, list_transactions_endpoint,
};
pub use query::{SortOrder, TimestampRange, TransactionQuery};
pub use summary::{CategoryTotal, TransactionSummary};
pub use summary_endpoint::{SummaryParams, get_summary_endpoint};
