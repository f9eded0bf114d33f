use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// Length of a Sui address in bytes.
pub const ADDRESS_LENGTH: usize = 32;

/// A Sui account address in canonical form: `0x` followed by 64 lowercase hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SuiAddress(String);

impl SuiAddress {
    pub fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(format!("0x{}", hex::encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for chat messages, e.g. `0x98101c…0682`.
    pub fn short(&self) -> String {
        let s = &self.0;
        format!("{}…{}", &s[..8], &s[s.len() - 4..])
    }
}

impl FromStr for SuiAddress {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| format!("address '{}' must start with 0x", trimmed))?;

        if digits.is_empty() || digits.len() > ADDRESS_LENGTH * 2 {
            return Err(format!(
                "address '{}' must have between 1 and {} hex digits",
                trimmed,
                ADDRESS_LENGTH * 2
            ));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("address '{}' contains non-hex characters", trimmed));
        }

        Ok(Self(format!(
            "0x{:0>width$}",
            digits.to_ascii_lowercase(),
            width = ADDRESS_LENGTH * 2
        )))
    }
}

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SuiAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl serde::Serialize for SuiAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
