use thiserror::Error;

/// Startup configuration problems. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("invalid private key: {0}")]
    Key(#[from] KeyError),
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("empty key string")]
    Empty,

    #[error("bech32 decoding failed: {0}")]
    Bech32(String),

    #[error("unexpected bech32 prefix '{0}', expected 'suiprivkey'")]
    Prefix(String),

    #[error("base64 decoding failed: {0}")]
    Base64(String),

    #[error("hex decoding failed: {0}")]
    Hex(String),

    #[error("key must be 32 bytes (or 33 with a scheme flag), got {0}")]
    Length(usize),

    #[error("unsupported signature scheme flag 0x{0:02x}, only ed25519 is supported")]
    Scheme(u8),
}

/// Balance query or other RPC call failure.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("no RPC endpoints configured")]
    NoEndpoints,

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} answered with HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("{endpoint} returned RPC error {code}: {message}")]
    Rpc {
        endpoint: String,
        code: i64,
        message: String,
    },

    #[error("malformed response from {endpoint}: {reason}")]
    Malformed { endpoint: String, reason: String },
}

/// Sweep transaction failure.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("signer holds no SUI coins")]
    NothingToSweep,

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("malformed transaction data from node: {0}")]
    Encoding(String),

    #[error("transaction {digest} failed on chain: {reason}")]
    Rejected { digest: String, reason: String },
}

/// Outbound chat message failure. Only ever logged.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("chat delivery failed: {0}")]
    Delivery(String),
}
