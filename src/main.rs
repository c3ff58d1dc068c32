//! mentions - mention session playground
//!
//! Drives a mention session against an in-memory editor, either from a
//! script file or interactively.
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode
//! mentions --keys "@ #" --multiword "#"
//!
//! # Script mode
//! mentions demo.txt --no-color
//! ```

use mentions::cli::CliInterface;
use mentions::error::Result;
use mentions::playground::Playground;

/// Application entry point
#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Handle subcommands or start the playground
///
/// # Returns
/// * `Result<()>` - Success or error
async fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    if cli.handle_subcommand()? {
        return Ok(());
    }

    let mut playground = Playground::new(cli.config())?;
    match &cli.args().script {
        Some(path) => playground.run_script(path).await,
        None => playground.run_interactive().await,
    }
}

/// Initialize logging system based on the effective log level
///
/// # Arguments
/// * `cli` - CLI interface with verbosity settings already applied
fn initialize_logging(cli: &CliInterface) {
    let level = cli.config().logging.level.to_tracing_level();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
