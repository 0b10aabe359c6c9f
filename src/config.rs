//! Bootstrap configuration and home-directory layout.
//!
//! Layout under `home`:
//! ```text
//! ~/.chaind/
//! └── config/
//!     ├── node_key.json   (serialized ed25519 keypair, mode 0600)
//!     ├── genesis.json    (genesis document, mode 0644)
//!     └── node.toml       (moniker + chain_id, mode 0644)
//! ```
//!
//! `InitConfig` is built once from the CLI (plus `CHAIND_HOME`) and is
//! immutable afterwards: the moniker default is resolved at construction
//! time, and every later step reads the same value.

use std::{env, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{cli::InitArgs, error::AppError, export};

/// Default home directory, relative to `$HOME`.
pub const DEFAULT_HOME: &str = "~/.chaind";
/// Moniker used when `--moniker` is not given.
pub const DEFAULT_MONIKER: &str = "node";

const KEY_FILENAME: &str = "node_key.json";
const GENESIS_FILENAME: &str = "genesis.json";
const NODE_CONFIG_FILENAME: &str = "node.toml";

/// Fully-resolved bootstrap configuration.
#[derive(Debug, Clone)]
pub struct InitConfig {
    /// Node home directory (already expanded, no `~`).
    pub home: PathBuf,
    /// Operator-visible node name, embedded into `node.toml`.
    pub moniker: String,
    /// Explicit chain ID, or `None` to generate a throwaway test ID.
    pub chain_id: Option<String>,
    /// Whether an existing genesis file may be replaced.
    pub overwrite: bool,
}

impl InitConfig {
    /// Resolve CLI arguments into a config value.
    ///
    /// Precedence for the home directory: `--home`, then `CHAIND_HOME`,
    /// then [`DEFAULT_HOME`].
    pub fn resolve(args: &InitArgs) -> Result<Self, AppError> {
        let home_str = args
            .home
            .clone()
            .or_else(|| env::var("CHAIND_HOME").ok())
            .unwrap_or_else(|| DEFAULT_HOME.to_string());
        if home_str.trim().is_empty() {
            return Err(AppError::Config("home directory path is empty".into()));
        }
        let home = expand_home(&home_str);

        let moniker = match &args.moniker {
            Some(m) if !m.trim().is_empty() => m.clone(),
            _ => DEFAULT_MONIKER.to_string(),
        };

        let chain_id = match &args.chain_id {
            Some(id) if !id.trim().is_empty() => Some(id.clone()),
            _ => None,
        };

        Ok(Self {
            home,
            moniker,
            chain_id,
            overwrite: args.overwrite,
        })
    }

    /// `{home}/config` — parent of every file this tool writes.
    pub fn config_dir(&self) -> PathBuf {
        self.home.join("config")
    }

    /// Path of the signing-key file.
    pub fn key_file(&self) -> PathBuf {
        self.config_dir().join(KEY_FILENAME)
    }

    /// Path of the genesis document.
    pub fn genesis_file(&self) -> PathBuf {
        self.config_dir().join(GENESIS_FILENAME)
    }

    /// Path of the node config file.
    pub fn node_config_file(&self) -> PathBuf {
        self.config_dir().join(NODE_CONFIG_FILENAME)
    }
}

/// Serialized shape of `node.toml`.
///
/// Derived state: regenerated on every init run, carries no overwrite
/// protection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeToml {
    pub moniker: String,
    pub chain_id: String,
}

/// Write `node.toml` with the values the rest of the node reads back.
pub fn write_node_config(config: &InitConfig, chain_id: &str) -> Result<(), AppError> {
    let node_toml = NodeToml {
        moniker: config.moniker.clone(),
        chain_id: chain_id.to_string(),
    };
    let rendered = toml::to_string_pretty(&node_toml)
        .map_err(|e| AppError::Config(format!("cannot serialize node.toml: {e}")))?;
    export::write_atomic(&config.node_config_file(), rendered.as_bytes(), 0o644)?;
    Ok(())
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

// ── test helpers ──────────────────────────────────────────────────────────────

/// `InitConfig` rooted at a throwaway directory for unit tests.
#[cfg(test)]
impl InitConfig {
    pub fn test_default(home: &std::path::Path) -> Self {
        Self {
            home: home.to_path_buf(),
            moniker: DEFAULT_MONIKER.to_string(),
            chain_id: None,
            overwrite: false,
        }
    }
}
