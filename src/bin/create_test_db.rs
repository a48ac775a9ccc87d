use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime, Time};

use gastos_rs::{ExpenseDraft, create_expense, initialize_db};

/// A utility for creating a test database for the REST API server of gastos_rs.
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

    println!("Creating test expenses...");

    let today = OffsetDateTime::now_utc();
    let samples: [(&str, f64, &str, i64, u8); 8] = [
        ("Supermercado", 54.3, "Alimentación", 0, 10),
        ("Café", 3.5, "Alimentación", 0, 9),
        ("Colectivo", 2.5, "Transporte", 1, 8),
        ("Entrada de cine", 8.0, "Entretenimiento", 2, 20),
        ("Farmacia", 15.75, "Salud", 3, 17),
        ("Libro de cocina", 22.0, "Educación", 7, 12),
        ("Remera", 18.9, "Ropa", 14, 16),
        ("Lamparita", 4.2, "Hogar", 30, 11),
    ];

    for (description, amount, category, days_ago, hour) in samples {
        let date = (today - Duration::days(days_ago))
            .replace_time(Time::from_hms(hour, 30, 0).expect("invalid sample hour"));

        create_expense(ExpenseDraft::new(description, amount, category, date)?, &conn)?;
    }

    println!("Success!");

    Ok(())
}
