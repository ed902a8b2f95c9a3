//! # AnnaBill Terminal Entry Point
//!
//! Starts the counter terminal headless: bill store, settings and printer.
//! The UI shell binds to the commands in `annabill_terminal::commands`.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Determine database path (app data directory)
//! 3. Connect to database & run migrations
//! 4. Load settings, apply environment overrides
//! 5. Reconnect the saved printer
//! 6. Serve until Ctrl-C

#[tokio::main]
async fn main() {
    // The actual setup is in lib.rs for better testability
    if let Err(e) = annabill_terminal::run().await {
        eprintln!("annabill-terminal: {e}");
        std::process::exit(1);
    }
}
