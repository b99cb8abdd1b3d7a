//! A utility for creating a seeded demo database for pocketbook.

use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

use pocketbook::{
    AccountKind, AccountLedger, NewAccount, initialize_db,
    auth::{ExternalUserId, StaticResolver},
    stores::{
        TransactionStore, UserStore,
        sqlite::{SQLiteAccountStore, SQLiteTransactionStore, SQLiteUserStore},
    },
    transaction::{NewTransaction, TransactionKind},
    user::UserID,
};

/// A utility for creating a demo database for pocketbook.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

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
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let connection = Arc::new(Mutex::new(conn));

    println!("Creating demo user...");
    let mut users = SQLiteUserStore::new(connection.clone());
    let user = users.insert(ExternalUserId::new("demo-user"))?;

    println!("Creating demo accounts...");
    let mut ledger = AccountLedger::new(SQLiteAccountStore::new(connection.clone()), users);
    let resolver = StaticResolver::new("demo-user");

    ledger.create_account(
        &resolver,
        NewAccount {
            name: "Cash".to_owned(),
            kind: AccountKind::Savings,
            balance: "250.00".to_owned(),
            is_default: false,
        },
    )?;
    ledger.create_account(
        &resolver,
        NewAccount {
            name: "Everyday spending".to_owned(),
            kind: AccountKind::Expense,
            balance: "80.50".to_owned(),
            is_default: false,
        },
    )?;

    println!("Creating demo transactions...");
    let mut transactions = SQLiteTransactionStore::new(connection);
    seed_transactions(&mut transactions, user.id)?;

    println!("Success!");

    Ok(())
}

fn seed_transactions(
    store: &mut SQLiteTransactionStore,
    user_id: UserID,
) -> Result<(), Box<dyn Error>> {
    let today = OffsetDateTime::now_utc().date();

    let expenses = [
        (Decimal::new(5250, 2), Some("Food"), today),
        (Decimal::new(3000, 2), Some("Food"), today - Duration::days(20)),
        (
            Decimal::new(2000, 2),
            Some("Transport"),
            today - Duration::days(45),
        ),
        (Decimal::new(1575, 2), None, today - Duration::days(5)),
    ];

    for (amount, category, date) in expenses {
        store.insert(NewTransaction {
            user_id,
            kind: TransactionKind::Expense,
            amount,
            category: category.map(str::to_owned),
            date,
        })?;
    }

    // Income transactions are never part of the spending breakdown.
    store.insert(NewTransaction {
        user_id,
        kind: TransactionKind::Income,
        amount: Decimal::new(200000, 2),
        category: Some("Salary".to_owned()),
        date: today - Duration::days(10),
    })?;

    Ok(())
}
