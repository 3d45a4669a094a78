//! Billing Portal CLI
//!
//! Command-line interface for assembling billing portal state and purging
//! package-testing skeletons.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- state --config portal.yaml --fixture customer.json > state.json
//! cargo run -- state --config portal.yaml --fixture customer.json --only balance,invoices
//! cargo run -- state --config portal.yaml --fixture customer.json --cursor <CURSOR>
//! cargo run -- purge-skeleton --working-path skeleton
//! LOG_FORMAT=json RUST_LOG=debug cargo run -- purge-skeleton --working-path skeleton
//! ```
//!
//! Command output goes to stdout; logs go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, unreadable file, missing price, etc.)

use billing_portal::cli;
use billing_portal::command;
use billing_portal::telemetry::{self, LogFormat};
use std::process;

fn main() {
    // Parse command-line arguments using clap
    let args = cli::parse_args();

    telemetry::init_logging(args.log_format.unwrap_or_else(LogFormat::from_env));

    // Run the selected command, output goes to stdout
    let command = command::create_command(args.command);
    let mut output = std::io::stdout();
    if let Err(e) = command.run(&mut output) {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
