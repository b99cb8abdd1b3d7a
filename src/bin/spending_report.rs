//! Prints the rolling spending breakdown for a user of a pocketbook
//! database.

use std::error::Error;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;
use tracing_subscriber::EnvFilter;

use pocketbook::{
    SpendingAggregator,
    auth::StaticResolver,
    cache::SpendingCache,
    initialize_db,
    stores::sqlite::{SQLiteTransactionStore, SQLiteUserStore},
};

/// Print the spending breakdown for the current and two preceding calendar
/// months.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The identity provider id of the user to report on.
    #[arg(long, default_value = "demo-user")]
    user: String,

    /// Print the snapshot as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    setup_logging();

    let args = Args::parse();

    let conn = Connection::open(&args.db_path)?;
    initialize_db(&conn)?;

    let connection = Arc::new(Mutex::new(conn));
    let aggregator = SpendingAggregator::new(
        SQLiteTransactionStore::new(connection.clone()),
        SQLiteUserStore::new(connection),
        Arc::new(SpendingCache::new()),
    );

    let resolver = StaticResolver::new(args.user.clone());
    let snapshot = aggregator.spending_by_category(&resolver)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("Spending by category for {}:", args.user);
    println!();

    if snapshot.categories.is_empty() {
        println!("  No expenses recorded in the current or two preceding months.");
        return Ok(());
    }

    for entry in &snapshot.categories {
        println!("  {:<24} {:>12}", entry.category, entry.total.to_string());
    }

    println!();
    println!("  {:<24} {:>12}", "Total", snapshot.total.to_string());

    if let Some(top_category) = &snapshot.top_category {
        println!("  Top category: {top_category}");
    }

    Ok(())
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
