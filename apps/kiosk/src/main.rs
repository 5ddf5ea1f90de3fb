//! # Bistro Kiosk Entry Point
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging to stderr)
//! 2. Load configuration (defaults → kiosk.toml → BISTRO_* environment)
//! 3. Load the catalog JSON and build the storefront
//! 4. Read commands from stdin until `quit` or end of input

use std::process::ExitCode;

fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    match bistro_kiosk::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("bistro-kiosk: {err}");
            ExitCode::FAILURE
        }
    }
}
