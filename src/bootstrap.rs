//! First-run bootstrap orchestration.
//!
//! Sequence: identity → genesis assembly → guarded export → node config.
//! Each step either completes or fails synchronously; completed steps
//! are left in place when a later one fails (identity creation survives
//! a refused genesis write), and re-running is safe because the identity
//! store is idempotent and the exporter is guarded.
//!
//! Precondition: one invocation at a time per home directory. Concurrent
//! invocations are not arbitrated; the last atomic rename wins per file.

use std::io::Write;

use serde::Serialize;
use tracing::info;

use crate::{
    config::{self, InitConfig},
    error::AppError,
    export,
    genesis::{AppStateInit, GenesisDocument},
    identity,
};

/// Human-readable result of a bootstrap run. Printed as JSON on stderr,
/// purely informational — nothing re-parses it.
#[derive(Debug, Clone, Serialize)]
pub struct InitSummary {
    pub moniker: String,
    pub chain_id: String,
    pub node_id: String,
    pub app_message: serde_json::Value,
}

/// Run the full init flow against `config.home`.
///
/// Ordering is carried by types: the export step takes an assembled
/// [`GenesisDocument`], which can only be built from a resolved
/// verifying key.
pub fn run_init(
    config: &InitConfig,
    app_init: &dyn AppStateInit,
) -> Result<InitSummary, AppError> {
    let node_identity = identity::load_or_create(&config.key_file())?;

    let doc = GenesisDocument::assemble(
        config.chain_id.as_deref(),
        Some(&node_identity.verifying_key()),
        app_init,
    )?;

    export::export_genesis(&config.genesis_file(), &doc, config.overwrite)?;

    config::write_node_config(config, &doc.chain_id)?;

    info!(
        moniker = %config.moniker,
        chain_id = %doc.chain_id,
        node_id = %node_identity.node_id,
        "node initialized"
    );

    Ok(InitSummary {
        moniker: config.moniker.clone(),
        chain_id: doc.chain_id,
        node_id: node_identity.node_id,
        app_message: doc.app_state,
    })
}

/// Print the summary to stderr.
pub fn display_summary(summary: &InitSummary) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(summary)
        .map_err(|e| AppError::Config(format!("cannot serialize init summary: {e}")))?;
    let mut stderr = std::io::stderr().lock();
    writeln!(stderr, "{rendered}")?;
    Ok(())
}

// ── tests ─────────────────────────────────────────────────────────────────────
