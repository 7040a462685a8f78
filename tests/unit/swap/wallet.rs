//! Unit tests for local transaction signing

use ed25519_dalek::{Verifier, VerifyingKey};
use tradewind::swap::Wallet;

fn secret() -> String {
    bs58::encode([7u8; 32]).into_string()
}

#[test]
fn accepts_a_32_byte_seed() {
    let wallet = Wallet::from_base58_secret(&secret()).expect("wallet");
    assert!(!wallet.public_key().is_empty());
}

#[test]
fn accepts_a_64_byte_keypair_export() {
    // Common export format: seed followed by the public key.
    let seed = [7u8; 32];
    let from_seed = Wallet::from_base58_secret(&bs58::encode(seed).into_string()).unwrap();
    let pubkey_bytes = bs58::decode(from_seed.public_key()).into_vec().unwrap();

    let mut keypair = seed.to_vec();
    keypair.extend_from_slice(&pubkey_bytes);
    let wallet = Wallet::from_base58_secret(&bs58::encode(keypair).into_string()).unwrap();

    assert_eq!(wallet.public_key(), from_seed.public_key());
}

#[test]
fn rejects_other_key_lengths() {
    let short = bs58::encode([7u8; 16]).into_string();
    assert!(Wallet::from_base58_secret(&short).is_err());
}

#[test]
fn rejects_invalid_base58() {
    assert!(Wallet::from_base58_secret("not base58 0OIl").is_err());
}

#[test]
fn signature_lands_in_the_first_slot_and_verifies() {
    let wallet = Wallet::from_base58_secret(&secret()).expect("wallet");

    let message = b"transaction message bytes";
    let mut tx = vec![1u8];
    tx.extend_from_slice(&[0u8; 64]);
    tx.extend_from_slice(message);

    let sig_base58 = wallet.sign_transaction(&mut tx).expect("signed");

    // Placeholder replaced in place.
    assert!(tx[1..65].iter().any(|&b| b != 0));
    assert_eq!(
        bs58::decode(&sig_base58).into_vec().unwrap(),
        tx[1..65].to_vec()
    );

    let pubkey_bytes: [u8; 32] = bs58::decode(wallet.public_key())
        .into_vec()
        .unwrap()
        .try_into()
        .unwrap();
    let verifying = VerifyingKey::from_bytes(&pubkey_bytes).unwrap();
    let signature = ed25519_dalek::Signature::from_bytes(&tx[1..65].try_into().unwrap());
    assert!(verifying.verify(message, &signature).is_ok());
}

#[test]
fn rejects_malformed_payloads() {
    let wallet = Wallet::from_base58_secret(&secret()).expect("wallet");

    let mut empty: Vec<u8> = Vec::new();
    assert!(wallet.sign_transaction(&mut empty).is_err());

    // Zero signature slots.
    let mut no_slots = vec![0u8, 1, 2, 3];
    assert!(wallet.sign_transaction(&mut no_slots).is_err());

    // Signature table with no message behind it.
    let mut truncated = vec![1u8; 65];
    truncated[0] = 1;
    truncated.truncate(65);
    assert!(wallet.sign_transaction(&mut truncated).is_err());
}
