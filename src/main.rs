//! chaind — entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Init logger
//!   3. Parse CLI
//!   4. Dispatch command

use clap::Parser;

use chaind::{
    bootstrap,
    cli::{Cli, Command},
    config::InitConfig,
    error::AppError,
    genesis::EmptyAppState,
    logger,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    logger::init("info")?;

    let cli = Cli::parse();
    match cli.command {
        Command::Init(args) => {
            let config = InitConfig::resolve(&args)?;
            let summary = bootstrap::run_init(&config, &EmptyAppState)?;
            bootstrap::display_summary(&summary)?;
        }
    }

    Ok(())
}
