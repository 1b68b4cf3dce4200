use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use time::{Duration, OffsetDateTime};

use fintrack_rs::{
    SQLiteTransactionStore, Transaction, TransactionSource, TransactionStore, TransactionType,
    UserID,
};

/// A utility for creating a test database for the REST API server of fintrack_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Sample transactions as (amount, type, category, description, days ago).
const SAMPLE_TRANSACTIONS: [(f64, TransactionType, &str, &str, i64); 8] = [
    (3200.0, TransactionType::Income, "Salary", "Monthly pay", 28),
    (1450.0, TransactionType::Expense, "Rent", "", 27),
    (86.4, TransactionType::Expense, "Groceries", "Weekly shop", 21),
    (12.5, TransactionType::Expense, "Coffee", "Flat white and a muffin", 14),
    (150.0, TransactionType::Income, "Gift", "Birthday money", 10),
    (92.15, TransactionType::Expense, "Groceries", "Weekly shop", 7),
    (45.0, TransactionType::Expense, "Transport", "Bus card top up", 3),
    (0.0, TransactionType::Expense, "Fees", "Waived account fee", 1),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let store = SQLiteTransactionStore::open(output_path)?;
    let now = OffsetDateTime::now_utc();

    for (user_id, source) in [
        (UserID::new(1), TransactionSource::Manual),
        (UserID::new(2), TransactionSource::Guest),
    ] {
        println!("Creating transactions for user {user_id}...");

        for (amount, transaction_type, category, description, days_ago) in SAMPLE_TRANSACTIONS {
            store.create(
                Transaction::build(user_id, amount, transaction_type, category)
                    .source(source)
                    .timestamp(now - Duration::days(days_ago))
                    .description(description),
            )?;
        }
    }

    store.close()?;
    println!("Success!");

    Ok(())
}
