// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use parking_register::config::{DEFAULT_DB_PATH, ENV_DB_PATH, ENV_STORAGE_KEY};
use parking_register::{
    export_csv_file, import_csv_file, Alert, Config, Entry, EntryForm, ParkingAdapter,
    DEFAULT_STORAGE_KEY,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "parking-register", version, about = "Parking lot entry register")]
struct Cli {
    /// SQLite database holding the register
    #[arg(long, global = true, env = ENV_DB_PATH, default_value = DEFAULT_DB_PATH)]
    db: PathBuf,

    /// Key the entry collection is stored under
    #[arg(long, global = true, env = ENV_STORAGE_KEY, default_value = DEFAULT_STORAGE_KEY)]
    key: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive terminal UI (default)
    Tui,
    /// Register a vehicle
    Add {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        vehicle: String,
        #[arg(long)]
        plate: String,
        /// Entry date (defaults to today)
        #[arg(long)]
        date: Option<String>,
        /// Slot number (defaults to the suggested next slot)
        #[arg(long)]
        slot: Option<String>,
    },
    /// Remove every entry with this license plate
    Remove { plate: String },
    /// List all entries in insertion order
    List,
    /// Show entries with a field starting with the query (case-insensitive)
    Search { query: String },
    /// Print the suggested next slot number
    NextSlot,
    /// Write all entries to a CSV file
    Export { file: PathBuf },
    /// Add entries from a CSV file
    Import { file: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config {
        db_path: cli.db,
        storage_key: cli.key,
        ..Config::from_env()
    };

    let command = cli.command.unwrap_or(Command::Tui);
    if !matches!(command, Command::Tui) {
        // The terminal UI owns the screen; only line-mode commands log
        parking_register::init_logging("info");
    }

    run_command(&config, command)
}

fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

fn run_command(config: &Config, command: Command) -> Result<()> {
    if let Command::Tui = command {
        return run_ui_mode(config);
    }

    let mut registry = config.open_registry()?;

    match command {
        Command::Tui => {}
        Command::Add {
            owner,
            vehicle,
            plate,
            date,
            slot,
        } => {
            let form = EntryForm {
                owner,
                vehicle,
                license_plate: plate,
                entry_date: date.unwrap_or_else(today),
                slot_number: slot.unwrap_or_else(|| registry.next_slot_number().to_string()),
            };

            let mut adapter = ParkingAdapter::new(registry);
            let outcome = adapter.on_submit(&form);
            print_alert(&outcome.alert);

            match outcome.accepted {
                Some(entry) => {
                    print_entries(std::slice::from_ref(&entry));
                    println!("Next suggested slot: {}", outcome.next_slot);
                }
                None => bail!("{}", outcome.alert.message),
            }
        }
        Command::Remove { plate } => {
            if registry.find_by_plate(&plate).is_none() {
                println!("No vehicle with license plate {}", plate);
                return Ok(());
            }

            let mut adapter = ParkingAdapter::new(registry);
            let alert = adapter.on_delete_click(&plate);
            print_alert(&alert);
            if !alert.is_success() {
                bail!("{}", alert.message);
            }
        }
        Command::List => {
            print_entries(registry.list());
            println!("\n{} vehicle(s) parked", registry.len());
        }
        Command::Search { query } => {
            let found = registry.search(&query);
            print_entries(&found);
            println!("\n{} of {} vehicle(s) match", found.len(), registry.len());
        }
        Command::NextSlot => {
            println!("{}", registry.next_slot_number());
        }
        Command::Export { file } => {
            export_csv_file(registry.list(), &file)?;
            println!("✓ Exported {} entries to {}", registry.len(), file.display());
        }
        Command::Import { file } => {
            let report = import_csv_file(&mut registry, &file)?;
            println!("✓ Added: {} entries", report.added);
            for rejected in &report.rejected {
                println!("✗ Line {}: {}", rejected.line, rejected.reason);
            }
        }
    }

    Ok(())
}

fn print_alert(alert: &Alert) {
    if alert.is_success() {
        println!("✓ {}", alert.message);
    } else {
        eprintln!("❌ {}", alert.message);
    }
}

fn print_entries(entries: &[Entry]) {
    if entries.is_empty() {
        println!("(no vehicles)");
        return;
    }

    println!(
        "{:<20} {:<16} {:<13} {:<12} {:>5}",
        "Owner", "Vehicle", "License Plate", "Entry Date", "Slot"
    );
    println!("{}", "─".repeat(70));

    for entry in entries {
        println!(
            "{:<20} {:<16} {:<13} {:<12} {:>5}",
            entry.owner, entry.vehicle, entry.license_plate, entry.entry_date, entry.slot_number
        );
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    let registry = config.open_registry()?;
    let mut app = ui::App::new(ParkingAdapter::new(registry), today());

    ui::run_ui(&mut app)?;

    println!("✅ Register saved to {}", config.db_path.display());
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use a subcommand: parking-register list");
    std::process::exit(1);
}
