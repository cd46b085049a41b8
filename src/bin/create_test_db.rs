use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use pharmacy_ledger::{
    PasswordHash, ValidatedPassword, create_user, initialize_db,
    seed::{
        CategoryName, DayOfMonth, Frequency, NewRecurringTransaction, Transaction,
        TransactionType, create_category, create_recurring_transaction, create_transaction,
        get_categories_by_type,
    },
};

/// A utility for creating a test database for the pharmacy ledger.
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
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'ledger.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let connection = Connection::open(output_path)?;

    initialize_db(&connection)?;

    println!("Creating test user...");
    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    create_user(password_hash, &connection)?;

    println!("Creating categories...");
    let sales = create_category(
        CategoryName::new("Prescription sales")?,
        TransactionType::Income,
        &connection,
    )?;
    let retail = create_category(
        CategoryName::new("Retail sales")?,
        TransactionType::Income,
        &connection,
    )?;
    let stock = create_category(
        CategoryName::new("Stock")?,
        TransactionType::Expense,
        &connection,
    )?;
    let rent = create_category(
        CategoryName::new("Rent")?,
        TransactionType::Expense,
        &connection,
    )?;
    let wages = create_category(
        CategoryName::new("Wages")?,
        TransactionType::Expense,
        &connection,
    )?;
    create_category(
        CategoryName::new("Utilities")?,
        TransactionType::Expense,
        &connection,
    )?;

    println!(
        "Created {} income and {} expense categories",
        get_categories_by_type(TransactionType::Income, &connection)?.len(),
        get_categories_by_type(TransactionType::Expense, &connection)?.len()
    );

    println!("Creating transactions...");
    let today = OffsetDateTime::now_utc().date();
    let samples = [
        (0, 1250.0, TransactionType::Income, sales.id, "Dispensing"),
        (2, 310.5, TransactionType::Income, retail.id, "Counter sales"),
        (5, 780.0, TransactionType::Expense, stock.id, "Wholesaler order"),
        (12, 1180.0, TransactionType::Income, sales.id, "Dispensing"),
        (20, 95.2, TransactionType::Expense, stock.id, "Vitamins restock"),
        (34, 1320.0, TransactionType::Income, sales.id, "Dispensing"),
        (40, 640.0, TransactionType::Expense, stock.id, "Wholesaler order"),
        (65, 1105.0, TransactionType::Income, sales.id, "Dispensing"),
        (70, 280.0, TransactionType::Income, retail.id, "Counter sales"),
        (95, 720.0, TransactionType::Expense, stock.id, "Wholesaler order"),
    ];

    for (days_ago, amount, kind, category_id, description) in samples {
        create_transaction(
            Transaction::build(amount, kind, today - Duration::days(days_ago), description)
                .category_id(Some(category_id)),
            &connection,
        )?;
    }

    println!("Creating recurring transactions...");
    create_recurring_transaction(
        NewRecurringTransaction::new(
            1800.0,
            TransactionType::Expense,
            Frequency::Monthly,
            DayOfMonth::new(1)?,
        )
        .category_id(Some(rent.id))
        .description("Shop rent"),
        &connection,
    )?;
    create_recurring_transaction(
        NewRecurringTransaction::new(
            950.0,
            TransactionType::Expense,
            Frequency::Weekly,
            DayOfMonth::default(),
        )
        .category_id(Some(wages.id))
        .description("Pharmacy assistant"),
        &connection,
    )?;

    println!("Success!");

    Ok(())
}
