//! Genesis document assembly.
//!
//! The genesis document is the founding state every node must agree on
//! before joining consensus. Its serialized bytes, not just its logical
//! content, may be hashed and compared across nodes, so serialization is
//! byte-deterministic: struct field order is fixed, and `serde_json`'s
//! map type keeps `app_state` keys sorted.
//!
//! Once any peer has started consensus from a genesis document it is
//! immutable; mutation is only valid pre-launch (enforced at the file
//! level by [`crate::export::export_genesis`]).

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use chrono::{DateTime, Utc};
use ed25519_dalek::VerifyingKey;
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Voting power assigned to the initial validator.
pub const DEFAULT_VOTING_POWER: u64 = 10;

/// Prefix of generated chain IDs.
pub const TEST_CHAIN_PREFIX: &str = "test-chain-";

/// A validator's public key as embedded in the genesis file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidatorPubKey {
    #[serde(rename = "type")]
    pub key_type: String,
    /// Base64 of the raw 32-byte ed25519 verifying key.
    pub value: String,
}

impl ValidatorPubKey {
    pub fn ed25519(key: &VerifyingKey) -> Self {
        Self {
            key_type: "ed25519".to_string(),
            value: B64.encode(key.to_bytes()),
        }
    }
}

/// A single entry of the initial validator set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenesisValidator {
    pub pub_key: ValidatorPubKey,
    pub power: u64,
}

/// The assembled genesis document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenesisDocument {
    pub chain_id: String,
    /// RFC3339 timestamp of assembly.
    pub genesis_time: DateTime<Utc>,
    pub validators: Vec<GenesisValidator>,
    /// Opaque application-owned blob, embedded verbatim.
    pub app_state: serde_json::Value,
}

/// Capability: produce the application's default genesis state, or fail.
///
/// The core treats the returned value as opaque and supplies no fallback
/// when the initializer fails.
pub trait AppStateInit {
    fn initial_state(&self) -> Result<serde_json::Value, String>;
}

impl<F> AppStateInit for F
where
    F: Fn() -> Result<serde_json::Value, String>,
{
    fn initial_state(&self) -> Result<serde_json::Value, String> {
        self()
    }
}

/// Default initializer for nodes with no application state: `{}`.
pub struct EmptyAppState;

impl AppStateInit for EmptyAppState {
    fn initial_state(&self) -> Result<serde_json::Value, String> {
        Ok(serde_json::json!({}))
    }
}

impl GenesisDocument {
    /// Assemble a genesis document.
    ///
    /// A non-empty `chain_id_hint` is used verbatim; otherwise a
    /// `test-chain-XXXXXX` ID is generated (see [`generate_chain_id`]).
    /// `validator_key` is `Some` for a validating node (single entry at
    /// [`DEFAULT_VOTING_POWER`]) and `None` for a non-validating full
    /// node (empty validator set). The `app_init` callback runs exactly
    /// once; its failure aborts assembly.
    pub fn assemble(
        chain_id_hint: Option<&str>,
        validator_key: Option<&VerifyingKey>,
        app_init: &dyn AppStateInit,
    ) -> Result<Self, AppError> {
        let chain_id = match chain_id_hint {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => generate_chain_id(),
        };

        let validators = match validator_key {
            Some(key) => vec![GenesisValidator {
                pub_key: ValidatorPubKey::ed25519(key),
                power: DEFAULT_VOTING_POWER,
            }],
            None => Vec::new(),
        };

        let app_state = app_init.initial_state().map_err(AppError::AppInit)?;

        Ok(Self {
            chain_id,
            genesis_time: Utc::now(),
            validators,
            app_state,
        })
    }
}

/// Generate `test-chain-` plus 6 uniform lowercase alphanumeric chars.
///
/// Test/dev networks only: a 6-char suffix gives no global-uniqueness
/// guarantee. Production networks must pass an explicit chain ID.
pub fn generate_chain_id() -> String {
    const CHARSET: &[u8; 36] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    // Rejection-sample bytes below 216 (= 36 * 6) so the modulo is unbiased.
    let mut suffix = String::with_capacity(6);
    let mut buf = [0u8; 16];
    while suffix.len() < 6 {
        OsRng.fill_bytes(&mut buf);
        for b in buf {
            if b < 216 && suffix.len() < 6 {
                suffix.push(CHARSET[(b % 36) as usize] as char);
            }
        }
    }
    format!("{TEST_CHAIN_PREFIX}{suffix}")
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::SigningKey;
    use serde_json::json;

    fn test_key() -> VerifyingKey {
        SigningKey::generate(&mut OsRng).verifying_key()
    }

    fn suffix_is_valid(id: &str) -> bool {
        let suffix = id.strip_prefix(TEST_CHAIN_PREFIX).unwrap();
        suffix.len() == 6
            && suffix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    }

    #[test]
    fn explicit_chain_id_used_verbatim() {
        let doc =
            GenesisDocument::assemble(Some("mainnet-1"), Some(&test_key()), &EmptyAppState)
                .unwrap();
        assert_eq!(doc.chain_id, "mainnet-1");
    }

    #[test]
    fn empty_hint_generates_test_chain_id() {
        let doc = GenesisDocument::assemble(Some(""), Some(&test_key()), &EmptyAppState).unwrap();
        assert!(doc.chain_id.starts_with(TEST_CHAIN_PREFIX));
        assert!(suffix_is_valid(&doc.chain_id));
    }

    #[test]
    fn generated_chain_id_matches_pattern() {
        for _ in 0..100 {
            let id = generate_chain_id();
            assert!(id.starts_with(TEST_CHAIN_PREFIX));
            assert!(suffix_is_valid(&id));
        }
    }

    #[test]
    fn validator_set_has_single_entry_with_default_power() {
        let key = test_key();
        let doc = GenesisDocument::assemble(None, Some(&key), &EmptyAppState).unwrap();
        assert_eq!(doc.validators.len(), 1);
        assert_eq!(doc.validators[0].power, DEFAULT_VOTING_POWER);
        assert_eq!(doc.validators[0].pub_key, ValidatorPubKey::ed25519(&key));
    }

    #[test]
    fn full_node_gets_empty_validator_set() {
        let doc = GenesisDocument::assemble(Some("net-1"), None, &EmptyAppState).unwrap();
        assert!(doc.validators.is_empty());
    }

    #[test]
    fn app_state_embedded_verbatim() {
        let init = || Ok::<_, String>(json!({"balances": {"alice": 100}, "params": {"epoch": 5}}));
        let doc = GenesisDocument::assemble(Some("net-1"), Some(&test_key()), &init).unwrap();
        assert_eq!(doc.app_state["balances"]["alice"], 100);
        assert_eq!(doc.app_state["params"]["epoch"], 5);
    }

    #[test]
    fn app_init_failure_aborts_assembly() {
        let init = || Err::<serde_json::Value, _>("state machine not configured".to_string());
        let err =
            GenesisDocument::assemble(Some("net-1"), Some(&test_key()), &init).unwrap_err();
        assert!(matches!(err, AppError::AppInit(_)));
        assert!(err.to_string().contains("state machine not configured"));
    }

    #[test]
    fn app_init_invoked_exactly_once() {
        use std::cell::Cell;
        let calls = Cell::new(0u32);
        let init = || {
            calls.set(calls.get() + 1);
            Ok::<_, String>(json!({}))
        };
        GenesisDocument::assemble(Some("net-1"), Some(&test_key()), &init).unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn document_round_trips_through_json() {
        let init = || Ok::<_, String>(json!({"supply": "1000000"}));
        let doc = GenesisDocument::assemble(Some("net-1"), Some(&test_key()), &init).unwrap();

        let bytes = serde_json::to_vec(&doc).unwrap();
        let parsed: GenesisDocument = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn serialization_is_byte_deterministic() {
        // Same logical app state built in different key orders must
        // serialize identically (serde_json maps sort their keys).
        let key = test_key();
        let init_a = || Ok::<_, String>(json!({"a": 1, "b": 2}));
        let init_b = || Ok::<_, String>(json!({"b": 2, "a": 1}));

        let mut doc_a = GenesisDocument::assemble(Some("net-1"), Some(&key), &init_a).unwrap();
        let doc_b = GenesisDocument::assemble(Some("net-1"), Some(&key), &init_b).unwrap();
        doc_a.genesis_time = doc_b.genesis_time;

        let bytes_a = serde_json::to_vec(&doc_a).unwrap();
        let bytes_b = serde_json::to_vec(&doc_b).unwrap();
        assert_eq!(bytes_a, bytes_b);
    }

    #[test]
    fn genesis_time_serializes_as_rfc3339() {
        let doc = GenesisDocument::assemble(Some("net-1"), None, &EmptyAppState).unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        let ts = value["genesis_time"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(ts).is_ok());
    }
}
