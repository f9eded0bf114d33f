use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use ed25519_dalek::{Signer, SigningKey};

use super::address::{SuiAddress, ADDRESS_LENGTH};
use super::{EncodedKey, ED25519_FLAG};
use crate::error::KeyError;

type Blake2b256 = Blake2b<U32>;

/// Intent prefix for a transaction: scope TransactionData, version V0, app Sui.
const TRANSACTION_INTENT: [u8; 3] = [0, 0, 0];

/// The key this process signs sweeps with, and the address it controls.
pub struct SuiSigner {
    key: SigningKey,
    address: SuiAddress,
}

impl SuiSigner {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let key = SigningKey::from_bytes(&seed);

        let mut preimage = Vec::with_capacity(33);
        preimage.push(ED25519_FLAG);
        preimage.extend_from_slice(key.verifying_key().as_bytes());

        let address = SuiAddress::from_bytes(blake2b256(&preimage));
        Self { key, address }
    }

    /// Decode a key string in any supported encoding.
    pub fn from_encoded(raw: &str) -> Result<Self, KeyError> {
        let seed = EncodedKey::detect(raw)?.decode()?;
        Ok(Self::from_seed(seed))
    }

    pub fn address(&self) -> &SuiAddress {
        &self.address
    }

    pub fn public_key(&self) -> [u8; 32] {
        self.key.verifying_key().to_bytes()
    }

    /// Sign BCS transaction bytes, returning the base64 `flag || sig || pubkey`
    /// form expected by `sui_executeTransactionBlock`.
    pub fn sign_transaction(&self, tx_bytes: &[u8]) -> String {
        let digest = transaction_digest(tx_bytes);
        let signature = self.key.sign(&digest);

        let mut serialized = Vec::with_capacity(1 + 64 + 32);
        serialized.push(ED25519_FLAG);
        serialized.extend_from_slice(&signature.to_bytes());
        serialized.extend_from_slice(self.key.verifying_key().as_bytes());
        STANDARD.encode(serialized)
    }
}

impl fmt::Debug for SuiSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Message actually signed for a transaction.
pub fn transaction_digest(tx_bytes: &[u8]) -> [u8; 32] {
    let mut intent_message = Vec::with_capacity(TRANSACTION_INTENT.len() + tx_bytes.len());
    intent_message.extend_from_slice(&TRANSACTION_INTENT);
    intent_message.extend_from_slice(tx_bytes);
    blake2b256(&intent_message)
}

fn blake2b256(data: &[u8]) -> [u8; ADDRESS_LENGTH] {
    let mut out = [0u8; ADDRESS_LENGTH];
    out.copy_from_slice(&Blake2b256::digest(data));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signature, Verifier, VerifyingKey};

    #[test]
    fn test_address_is_deterministic_and_canonical() {
        let a = SuiSigner::from_seed([1u8; 32]);
        let b = SuiSigner::from_seed([1u8; 32]);
        let c = SuiSigner::from_seed([2u8; 32]);

        assert_eq!(a.address(), b.address());
        assert_ne!(a.address(), c.address());
        assert_eq!(a.address().as_str().len(), 66);
        assert!(a.address().as_str().starts_with("0x"));
    }

    #[test]
    fn test_from_encoded_matches_seed() {
        let seed = [9u8; 32];
        let from_hex = SuiSigner::from_encoded(&hex::encode(seed)).unwrap();
        assert_eq!(from_hex.address(), SuiSigner::from_seed(seed).address());
    }

    #[test]
    fn test_signature_layout_and_validity() {
        let signer = SuiSigner::from_seed([3u8; 32]);
        let tx_bytes = b"fake transaction data";

        let encoded = signer.sign_transaction(tx_bytes);
        let raw = STANDARD.decode(encoded).unwrap();
        assert_eq!(raw.len(), 97);
        assert_eq!(raw[0], ED25519_FLAG);
        assert_eq!(&raw[65..], &signer.public_key());

        let mut sig_bytes = [0u8; 64];
        sig_bytes.copy_from_slice(&raw[1..65]);
        let signature = Signature::from_bytes(&sig_bytes);
        let verifying = VerifyingKey::from_bytes(&signer.public_key()).unwrap();
        assert!(verifying
            .verify(&transaction_digest(tx_bytes), &signature)
            .is_ok());
        assert!(verifying
            .verify(&transaction_digest(b"other"), &signature)
            .is_err());
    }

    #[test]
    fn test_debug_hides_key() {
        let signer = SuiSigner::from_seed([4u8; 32]);
        let printed = format!("{:?}", signer);
        assert!(printed.contains(signer.address().as_str()));
        assert!(!printed.contains(&hex::encode([4u8; 32])));
    }
}
