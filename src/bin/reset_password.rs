use std::{error::Error, io, path::Path, process::exit};

use clap::Parser;
use rusqlite::Connection;

use pharmacy_ledger::{
    PasswordHash, SOLE_USER_ID, ValidatedPassword, get_user_by_id, update_password,
};

/// A utility for changing the password of the pharmacy ledger.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let db_path = Path::new(&args.db_path);
    validate_db_path(db_path);

    println!("Loading user from {db_path:#?}");
    let mut connection = Connection::open(db_path)?;

    if let Err(error) = get_user_by_id(SOLE_USER_ID, &connection) {
        print_error(format!(
            "Could not find a registered user in {db_path:#?}: {error}"
        ));
        exit(1);
    }

    let Some(password_hash) = get_new_password_hash() else {
        return Ok(());
    };

    let transaction = connection.transaction()?;

    match update_password(SOLE_USER_ID, &password_hash, &transaction) {
        Ok(()) => {
            transaction.commit()?;
            println!("Password updated successfully!");
        }
        Err(error) => {
            print_error(format!("Could not update the password: {error}. Rolling back..."));
            transaction.rollback()?;
            exit(1);
        }
    }

    Ok(())
}

fn validate_db_path(db_path: &Path) {
    match db_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            print_error("Database path must include a file extension (e.g., 'ledger.db').");
            exit(1);
        }
    }

    if !db_path.is_file() {
        print_error(format!("File does not exist at {db_path:#?}!"));
        exit(1);
    }
}

fn prompt(message: &str) -> Option<String> {
    match rpassword::prompt_password(message) {
        Ok(string) => Some(string),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => None,
        Err(error) => {
            print_error(format!("Could not read password from stdin: {error}"));
            None
        }
    }
}

/// Ask for the new password twice until it is strong enough and both entries match.
///
/// Returns `None` if stdin is closed.
fn get_new_password_hash() -> Option<PasswordHash> {
    loop {
        println!();

        let first_password = prompt("Enter a new password: ")?;

        let validated_password = match ValidatedPassword::new(&first_password) {
            Ok(password) => password,
            Err(error) => {
                print_error(error);
                continue;
            }
        };

        let second_password = prompt("Enter the same password again: ")?;

        if first_password != second_password {
            print_error("Passwords must match, try again.");
            continue;
        }

        match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
            Ok(password_hash) => return Some(password_hash),
            Err(error) => {
                print_error(format!("Could not hash password: {error}. Try again."));
            }
        }
    }
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    first.to_uppercase().chain(chars).collect()
}
