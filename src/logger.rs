//! Logger setup — `tracing` with env-filter.
//!
//! Level precedence: `CHAIND_LOG`, then the level passed by the caller.

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

pub fn init(default_level: &str) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_env("CHAIND_LOG")
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| AppError::Logger(format!("invalid log filter: {e}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::Logger(format!("cannot init logger: {e}")))
}
