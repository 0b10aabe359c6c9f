//! Application-wide error types.
//!
//! Every bootstrap failure is terminal for the invocation: nothing is
//! retried, and `main` exits non-zero on the first error. Re-running
//! after fixing the cause is always safe — identity loading is
//! idempotent and the genesis write is guarded.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    /// An existing key file could not be parsed or failed validation.
    /// Never auto-regenerated — losing a signing key loses the
    /// validator identity, so this requires operator intervention.
    #[error("identity corrupt: {0}")]
    IdentityCorrupt(String),

    #[error("identity error: {0}")]
    Identity(String),

    /// Genesis file already present and overwrite was not authorized.
    /// Recoverable by re-running with `--overwrite`.
    #[error("genesis file already exists: {}", .0.display())]
    GenesisExists(PathBuf),

    #[error("genesis error: {0}")]
    Genesis(String),

    /// The application state initializer failed; assembly was aborted
    /// before any write.
    #[error("app state init failed: {0}")]
    AppInit(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn config_error_display() {
        let e = AppError::Config("empty home path".into());
        assert!(e.to_string().contains("empty home path"));
    }

    #[test]
    fn identity_corrupt_display() {
        let e = AppError::IdentityCorrupt("key file is not valid JSON".into());
        assert!(e.to_string().contains("identity corrupt"));
    }

    #[test]
    fn genesis_exists_display_includes_path() {
        let e = AppError::GenesisExists(PathBuf::from("/home/node/config/genesis.json"));
        assert!(e.to_string().contains("genesis.json"));
        assert!(e.to_string().contains("already exists"));
    }

    #[test]
    fn app_init_error_display() {
        let e = AppError::AppInit("initializer returned no state".into());
        assert!(e.to_string().contains("app state init failed"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let e: AppError = io_err.into();
        assert!(e.to_string().contains("io error"));
        // satisfies std::error::Error trait
        let _: &dyn Error = &e;
    }
}
