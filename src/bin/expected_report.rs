use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::OffsetDateTime;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use utiliteur::stores::sqlite::create_ledger;

/// A utility for printing the billing cycle overview and the expected-bill
/// report for a year.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The year to report on. Defaults to the active year in the settings.
    #[arg(long, short)]
    year: Option<i32>,
}

fn main() -> Result<(), Box<dyn Error>> {
    setup_logging();

    let args = Args::parse();

    if !Path::new(&args.db_path).is_file() {
        eprintln!("No database found at {:#?}.", args.db_path);
        exit(1);
    }

    let connection = Connection::open(&args.db_path)?;
    let ledger = create_ledger(connection)?;

    let today = OffsetDateTime::now_utc().date();
    let overview = ledger.overview(today)?;
    let closed_marker = if overview.is_closed { " (closed)" } else { "" };

    println!(
        "Billing month {}{closed_marker}: {} bill(s) totalling {}",
        overview.billing_month, overview.bill_count, overview.utility_total
    );
    println!("{} expected bill(s) have not arrived yet.", overview.missing_count);
    println!();

    let year = match args.year {
        Some(year) => year,
        None => ledger.settings()?.active_year,
    };

    println!("Expected bills for {year}:");

    for row in ledger.expected_rows(year)? {
        let received = match row.first_received {
            Some(date) => format!("received {date}"),
            None => "missing".to_string(),
        };
        let paid_marker = if row.paid { ", paid" } else { "" };

        println!(
            "  {} {:<20} {received}{paid_marker}",
            row.consumption_month, row.utility_name
        );
    }

    Ok(())
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(stdout_log.with_filter(filter))
        .init();
}
