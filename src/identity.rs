//! Node identity — ed25519 keypair persistence and `node_id` derivation.
//!
//! The signing key lives in a single JSON file (mode 0600):
//! ```text
//! {home}/config/node_key.json
//! {"type":"ed25519","priv_key":"<b64 32-byte seed>","pub_key":"<b64 32-byte vk>"}
//! ```
//!
//! `node_id` is the first 40 hex characters of `SHA256(verifying_key_bytes)`
//! — stable across restarts, verifiable by any peer that knows the key.
//!
//! An existing key file is the node's validator identity and is never
//! overwritten or regenerated: a file that exists but fails to parse or
//! validate is reported as [`AppError::IdentityCorrupt`] and left in place.

use std::{fs, path::Path};

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use ed25519_dalek::{SigningKey, VerifyingKey};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::{error::AppError, export};

/// Loaded node identity. The seed never leaves this struct.
#[derive(Clone)]
#[cfg_attr(test, derive(Debug))]
pub struct NodeIdentity {
    /// First 40 hex chars of `SHA256(verifying_key)`.
    pub node_id: String,
    verifying_key: [u8; 32],
    seed: [u8; 32],
}

impl NodeIdentity {
    pub fn verifying_key_bytes(&self) -> &[u8; 32] {
        &self.verifying_key
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        // Bytes were either produced by ed25519-dalek or validated on load.
        SigningKey::from_bytes(&self.seed).verifying_key()
    }
}

/// On-disk shape of `node_key.json`.
#[derive(Serialize, Deserialize)]
struct KeyFile {
    #[serde(rename = "type")]
    key_type: String,
    priv_key: String,
    pub_key: String,
}

const KEY_TYPE: &str = "ed25519";

/// Load the identity from `path`, or generate and persist a fresh one.
///
/// Idempotent: a second call against the same path returns the same
/// `node_id` and keys as the first. The write is atomic (sibling temp
/// file + rename), so a crash mid-write cannot leave a truncated or
/// empty key file at `path`.
pub fn load_or_create(path: &Path) -> Result<NodeIdentity, AppError> {
    if path.exists() {
        let identity = load(path)?;
        info!(node_id = %identity.node_id, "loaded existing node identity");
        return Ok(identity);
    }

    let signing_key = SigningKey::generate(&mut OsRng);
    let seed: [u8; 32] = signing_key.to_bytes();
    let verifying_key: [u8; 32] = signing_key.verifying_key().to_bytes();
    save(path, &seed, &verifying_key)?;

    let identity = NodeIdentity {
        node_id: node_id_from_pubkey(&verifying_key),
        verifying_key,
        seed,
    };
    info!(node_id = %identity.node_id, "generated new node identity");
    Ok(identity)
}

/// Derive `node_id`: first 40 hex chars of `SHA256(verifying_key_bytes)`.
pub fn node_id_from_pubkey(verifying_key_bytes: &[u8; 32]) -> String {
    let digest = Sha256::digest(verifying_key_bytes);
    hex::encode(digest)[..40].to_string()
}

// ── internals ────────────────────────────────────────────────────────────────

fn save(path: &Path, seed: &[u8; 32], verifying_key: &[u8; 32]) -> Result<(), AppError> {
    let key_file = KeyFile {
        key_type: KEY_TYPE.to_string(),
        priv_key: B64.encode(seed),
        pub_key: B64.encode(verifying_key),
    };
    let mut rendered = serde_json::to_vec_pretty(&key_file)
        .map_err(|e| AppError::Identity(format!("cannot serialize node_key.json: {e}")))?;
    rendered.push(b'\n');
    export::write_atomic(path, &rendered, 0o600)
        .map_err(|e| AppError::Identity(format!("cannot write node_key.json: {e}")))
}

/// Parse and validate an existing key file. Any failure is corruption:
/// the file is left untouched and no key is regenerated.
fn load(path: &Path) -> Result<NodeIdentity, AppError> {
    let raw = fs::read(path)
        .map_err(|e| AppError::Identity(format!("cannot read {}: {e}", path.display())))?;

    let key_file: KeyFile = serde_json::from_slice(&raw)
        .map_err(|e| AppError::IdentityCorrupt(format!("{}: {e}", path.display())))?;

    if key_file.key_type != KEY_TYPE {
        return Err(AppError::IdentityCorrupt(format!(
            "{}: unsupported key type {:?}",
            path.display(),
            key_file.key_type
        )));
    }

    let seed: [u8; 32] = decode_key_field(path, "priv_key", &key_file.priv_key)?;
    let verifying_key: [u8; 32] = decode_key_field(path, "pub_key", &key_file.pub_key)?;

    // Validate: reconstruct the verifying key from the seed and compare.
    let reconstructed = SigningKey::from_bytes(&seed).verifying_key().to_bytes();
    if reconstructed != verifying_key {
        return Err(AppError::IdentityCorrupt(format!(
            "{}: verifying key does not match signing key seed",
            path.display()
        )));
    }

    Ok(NodeIdentity {
        node_id: node_id_from_pubkey(&verifying_key),
        verifying_key,
        seed,
    })
}

fn decode_key_field(path: &Path, field: &str, value: &str) -> Result<[u8; 32], AppError> {
    let bytes = B64
        .decode(value)
        .map_err(|e| AppError::IdentityCorrupt(format!("{}: {field}: {e}", path.display())))?;
    bytes.try_into().map_err(|_| {
        AppError::IdentityCorrupt(format!("{}: {field} is not 32 bytes", path.display()))
    })
}

// ── tests ─────────────────────────────────────────────────────────────────────
