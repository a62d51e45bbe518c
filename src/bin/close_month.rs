use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use utiliteur::{calendar::parse_month, stores::sqlite::create_ledger};

/// A utility for closing or reopening a billing month.
///
/// Closing a month settles every bill charged in it; reopening reverses that.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The billing month to close, e.g. '2024-06'.
    month: String,

    /// Reopen the month instead of closing it.
    #[arg(long)]
    reopen: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    setup_logging();

    let args = Args::parse();

    if !Path::new(&args.db_path).is_file() {
        eprintln!("No database found at {:#?}.", args.db_path);
        exit(1);
    }

    let month = parse_month(&args.month)?;
    let connection = Connection::open(&args.db_path)?;
    let mut ledger = create_ledger(connection)?;

    let status = if args.reopen {
        ledger.reopen_month(month)?
    } else {
        ledger.close_month(month)?
    };

    if status.is_closed {
        println!("Billing month {} is now closed.", status.month);
    } else {
        println!("Billing month {} is now open.", status.month);
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
