pub mod address;
pub mod signer;

pub use address::SuiAddress;
pub use signer::SuiSigner;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bech32::FromBase32;

use crate::error::KeyError;

/// Scheme flag Sui prefixes to Ed25519 keys, public keys and signatures.
pub const ED25519_FLAG: u8 = 0x00;

const BECH32_HRP: &str = "suiprivkey";
const SEED_LENGTH: usize = 32;

/// A private key as found in the environment, tagged by its encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedKey {
    /// `suiprivkey1...` as exported by `sui keytool export`.
    Bech32(String),
    /// Base64 of `flag || seed` (sui.keystore format) or of a bare seed.
    Base64(String),
    /// Hex of a bare 32-byte seed, `0x` prefix optional.
    Hex(String),
}

impl EncodedKey {
    /// Guess the encoding of a key string.
    pub fn detect(raw: &str) -> Result<Self, KeyError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(KeyError::Empty);
        }

        if raw.to_ascii_lowercase().starts_with(BECH32_HRP) {
            return Ok(Self::Bech32(raw.to_string()));
        }

        let digits = raw.strip_prefix("0x").unwrap_or(raw);
        if raw.starts_with("0x")
            || (digits.len() == SEED_LENGTH * 2 && digits.chars().all(|c| c.is_ascii_hexdigit()))
        {
            return Ok(Self::Hex(digits.to_string()));
        }

        Ok(Self::Base64(raw.to_string()))
    }

    /// Resolve to the 32-byte Ed25519 seed.
    pub fn decode(&self) -> Result<[u8; SEED_LENGTH], KeyError> {
        let bytes = match self {
            Self::Bech32(s) => {
                let (hrp, data, _variant) =
                    bech32::decode(s).map_err(|e| KeyError::Bech32(e.to_string()))?;
                if hrp != BECH32_HRP {
                    return Err(KeyError::Prefix(hrp));
                }
                Vec::<u8>::from_base32(&data).map_err(|e| KeyError::Bech32(e.to_string()))?
            }
            Self::Base64(s) => STANDARD
                .decode(s)
                .map_err(|e| KeyError::Base64(e.to_string()))?,
            Self::Hex(s) => hex::decode(s).map_err(|e| KeyError::Hex(e.to_string()))?,
        };

        strip_scheme_flag(&bytes)
    }
}

fn strip_scheme_flag(bytes: &[u8]) -> Result<[u8; SEED_LENGTH], KeyError> {
    let seed = match bytes.len() {
        SEED_LENGTH => bytes,
        len if len == SEED_LENGTH + 1 => {
            if bytes[0] != ED25519_FLAG {
                return Err(KeyError::Scheme(bytes[0]));
            }
            &bytes[1..]
        }
        other => return Err(KeyError::Length(other)),
    };

    let mut out = [0u8; SEED_LENGTH];
    out.copy_from_slice(seed);
    Ok(out)
}
