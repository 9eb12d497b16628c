// Parking Register - Core Library
// Exposes all modules for use in CLI, TUI, API server, and tests

pub mod adapter;
pub mod config;
pub mod entry;
pub mod exchange;
pub mod plate;
pub mod registry;
pub mod search;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use adapter::{
    submit_entry, Alert, AlertKind, ParkingAdapter, SubmitError, SubmitOutcome, ALERT_TTL,
};
pub use config::Config;
pub use entry::{Entry, EntryForm};
pub use exchange::{
    export_csv, export_csv_file, import_csv, import_csv_file, ImportReport, RejectedRow,
};
pub use plate::{is_valid_license_plate, PlateKind};
pub use registry::{Registry, DEFAULT_STORAGE_KEY};
pub use search::{filter_entries, matches_query};
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
pub use validation::{validate_form, FormError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the tracing subscriber used by the binaries.
/// `RUST_LOG` overrides the given default filter.
pub fn init_logging(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
