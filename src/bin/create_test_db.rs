use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::{Connection, params};
use time::{Duration, OffsetDateTime};

use finance_tracker::initialize_db;

/// A utility for creating a test database for the REST API server of finance_tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The ID of the user that owns the demo data.
    #[arg(long, default_value_t = 1)]
    user_id: i64,
}

const CATEGORIES: [(&str, &str, &str); 7] = [
    ("Salary", "income", "#16A34A"),
    ("Freelance", "income", "#0D9488"),
    ("Food", "expense", "#F97316"),
    ("Rent", "expense", "#DC2626"),
    ("Transport", "expense", "#2563EB"),
    ("Uncategorized", "expense", "#64748B"),
    ("Transfer", "expense", "#64748B"),
];

const ACCOUNTS: [(&str, &str); 3] = [("BCA", "bank"), ("GoPay", "wallet"), ("Cash", "cash")];

/// (days ago, amount, description, category index, account index)
const TRANSACTIONS: [(i64, i64, &str, usize, usize); 8] = [
    (0, 45_000, "Lunch", 2, 1),
    (1, 20_000, "Bus fare", 4, 2),
    (2, 1_500_000, "Website project", 1, 0),
    (3, 60_000, "Groceries", 2, 0),
    (5, 3_000_000, "Monthly rent", 3, 0),
    (7, 10_000_000, "Salary", 0, 0),
    (12, 35_000, "Dinner", 2, 1),
    (40, 10_000_000, "Salary", 0, 0),
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
    let mut conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let tx = conn.transaction()?;
    let user_id = args.user_id;

    println!("Creating categories...");
    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for (name, category_type, color) in CATEGORIES {
        let icon = if category_type == "income" {
            "trending-up"
        } else {
            "shopping-bag"
        };
        tx.execute(
            "INSERT INTO category (user_id, name, type, color, icon) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![user_id, name, category_type, color, icon],
        )?;
        category_ids.push(tx.last_insert_rowid());
    }

    println!("Creating accounts...");
    let mut account_ids = Vec::with_capacity(ACCOUNTS.len());
    for (name, account_type) in ACCOUNTS {
        tx.execute(
            "INSERT INTO account (user_id, name, type, balance) VALUES (?1, ?2, ?3, 0)",
            params![user_id, name, account_type],
        )?;
        account_ids.push(tx.last_insert_rowid());
    }

    println!("Creating transactions...");
    let now = OffsetDateTime::now_utc();
    for (days_ago, amount, description, category, account) in TRANSACTIONS {
        tx.execute(
            "INSERT INTO \"transaction\" (user_id, amount, description, date, category_id, account_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user_id,
                amount,
                description,
                now.date() - Duration::days(days_ago),
                category_ids[category],
                account_ids[account],
                now,
            ],
        )?;
    }

    // Balances start at zero, so they are the sum of the transaction effects.
    tx.execute(
        "UPDATE account SET balance = (
            SELECT COALESCE(SUM(CASE c.type WHEN 'income' THEN t.amount ELSE -t.amount END), 0)
            FROM \"transaction\" t
            INNER JOIN category c ON t.category_id = c.id
            WHERE t.account_id = account.id
        )
        WHERE user_id = ?1",
        params![user_id],
    )?;

    tx.execute(
        "INSERT INTO user_settings (user_id, full_name, currency, budget_limit, start_day)
        VALUES (?1, 'Demo User', 'IDR', 5000000, 1)",
        params![user_id],
    )?;

    tx.commit()?;

    println!("Success!");

    Ok(())
}
