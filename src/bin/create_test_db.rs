use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use time::{Duration, OffsetDateTime};

use fintrack_rs::{NewTransaction, TransactionStore, TransactionType};

/// A utility for creating a test database for fintrack_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Sample expenses as (description, category, amount) that repeat every month.
const MONTHLY_EXPENSES: [(&str, Option<&str>, f64); 6] = [
    ("Supermarket", Some("Groceries"), 142.35),
    ("Petrol", Some("Gas"), 68.20),
    ("Power bill", Some("Utilities"), 115.00),
    ("Dinner with friends", Some("Dining Out"), 54.80),
    ("Cinema tickets", Some("Entertainment"), 32.00),
    ("Birthday present", None, 45.99),
];

/// How many months of sample data to create, including the current month.
const MONTHS: i64 = 6;

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
    let store = TransactionStore::new(output_path.to_str())?;
    store.connect()?;

    println!("Creating sample transactions...");

    let today = OffsetDateTime::now_utc().date();
    let mut count = 0;

    for month in 0..MONTHS {
        // Roughly one month apart, newest last.
        let month_start = today - Duration::days(30 * (MONTHS - 1 - month));
        // Vary the amounts a little so the charts are not flat.
        let scale = 1.0 + month as f64 * 0.05;

        store.create(NewTransaction {
            amount: 3200.0,
            date: month_start,
            description: "Salary".to_owned(),
            kind: TransactionType::Income,
            category: None,
        })?;
        count += 1;

        for (day, (description, category, amount)) in (1_i64..).zip(MONTHLY_EXPENSES) {
            let date = month_start - Duration::days(day * 3);

            store.create(NewTransaction {
                amount: (amount * scale * 100.0).round() / 100.0,
                date,
                description: description.to_owned(),
                kind: TransactionType::Expense,
                category: category.map(str::to_owned),
            })?;
            count += 1;
        }
    }

    println!("Created {count} transactions.");
    println!("Success!");

    Ok(())
}
