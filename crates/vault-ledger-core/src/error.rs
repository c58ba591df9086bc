//! Error types for the vault ledger core.

use thiserror::Error;

/// Errors produced while computing or parsing digests.
#[derive(Debug, Error)]
pub enum DigestError {
    /// Input that cannot be interpreted as a digest (wrong length, not hex).
    #[error("invalid digest input: {0}")]
    InvalidInput(String),

    /// The digest source could not be opened at all.
    #[error("source unavailable: {path}: {source}")]
    SourceUnavailable {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An I/O failure occurred mid-stream; no partial digest is returned.
    #[error("source read error: {0}")]
    SourceRead(#[from] std::io::Error),
}

/// Errors produced while formatting a canonical envelope message.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The file name contains the message delimiter or a control character
    /// and cannot be unambiguously encoded.
    #[error("file name cannot be canonically encoded: {0:?}")]
    UnencodableFileName(String),
}

/// Errors produced by key and signature parsing.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid signature")]
    InvalidSignature,
}
