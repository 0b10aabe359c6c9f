//! chaind — ledger node daemon.
//!
//! Implemented surface: the `init` bootstrap, which establishes a durable
//! node identity (ed25519 signing key + derived node ID) and assembles
//! the network's genesis document. Everything it writes is atomic (temp
//! file + rename) and safe to re-run: the identity store loads instead of
//! regenerating, and the genesis file is guarded against implicit
//! overwrite.

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod genesis;
pub mod identity;
pub mod logger;

pub use bootstrap::{InitSummary, run_init};
pub use config::InitConfig;
pub use error::AppError;
pub use genesis::{AppStateInit, EmptyAppState, GenesisDocument};
pub use identity::NodeIdentity;
