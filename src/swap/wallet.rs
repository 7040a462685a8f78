//! Local transaction signing.
//!
//! Keys are materialized per `execute` call and dropped with the `Wallet`
//! value; nothing here persists key bytes between cycles.

use crate::errors::{EngineError, Result};
use ed25519_dalek::{Signer, SigningKey};
use std::collections::HashMap;

pub struct Wallet {
    signing_key: SigningKey,
    public_key: String,
}

impl Wallet {
    /// Accepts either a 32-byte seed or the common 64-byte keypair export,
    /// base58-encoded.
    pub fn from_base58_secret(secret: &str) -> Result<Self> {
        let bytes = bs58::decode(secret)
            .into_vec()
            .map_err(|e| EngineError::Signing(format!("invalid key encoding: {}", e)))?;

        let seed: [u8; 32] = match bytes.len() {
            32 => bytes.as_slice().try_into().unwrap(),
            64 => bytes[..32].try_into().unwrap(),
            n => {
                return Err(EngineError::Signing(format!(
                    "unexpected key length {}",
                    n
                )))
            }
        };

        let signing_key = SigningKey::from_bytes(&seed);
        let public_key = bs58::encode(signing_key.verifying_key().to_bytes()).into_string();

        Ok(Self {
            signing_key,
            public_key,
        })
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Sign a serialized transaction in place and return the base58
    /// signature. The payload layout is `[sig count][signatures][message]`;
    /// the signature covers the message bytes and lands in the first
    /// signature slot (the fee payer's).
    pub fn sign_transaction(&self, tx_bytes: &mut [u8]) -> Result<String> {
        if tx_bytes.is_empty() {
            return Err(EngineError::Signing("empty transaction".to_string()));
        }
        let num_signatures = tx_bytes[0] as usize;
        let message_start = 1 + num_signatures * 64;
        if num_signatures == 0 || tx_bytes.len() <= message_start {
            return Err(EngineError::Signing(
                "malformed transaction payload".to_string(),
            ));
        }

        let signature = self.signing_key.sign(&tx_bytes[message_start..]);
        tx_bytes[1..65].copy_from_slice(&signature.to_bytes());
        Ok(bs58::encode(signature.to_bytes()).into_string())
    }
}

/// Resolves the signing key for a strategy owner.
pub trait WalletProvider: Send + Sync {
    fn wallet_for(&self, owner_id: &str) -> Result<Wallet>;
}

/// Looks keys up from the worker process environment
/// (`WALLET_KEY_<OWNER>`). Key custody at rest lives outside the engine.
pub struct EnvWalletProvider;

impl WalletProvider for EnvWalletProvider {
    fn wallet_for(&self, owner_id: &str) -> Result<Wallet> {
        let secret = crate::config::get_wallet_secret(owner_id)
            .ok_or_else(|| EngineError::MissingWallet(owner_id.to_string()))?;
        Wallet::from_base58_secret(&secret)
    }
}

/// Fixed owner→secret map, used by tests and local tooling.
pub struct StaticWalletProvider {
    secrets: HashMap<String, String>,
}

impl StaticWalletProvider {
    pub fn new(secrets: HashMap<String, String>) -> Self {
        Self { secrets }
    }

    pub fn single(owner_id: &str, secret: &str) -> Self {
        let mut secrets = HashMap::new();
        secrets.insert(owner_id.to_string(), secret.to_string());
        Self { secrets }
    }
}

impl WalletProvider for StaticWalletProvider {
    fn wallet_for(&self, owner_id: &str) -> Result<Wallet> {
        let secret = self
            .secrets
            .get(owner_id)
            .ok_or_else(|| EngineError::MissingWallet(owner_id.to_string()))?;
        Wallet::from_base58_secret(secret)
    }
}
