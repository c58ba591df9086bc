//! Error types for the integrity engine.
//!
//! The taxonomy keeps authentication/freshness failures (the caller's
//! signed request is wrong) structurally distinct from integrity
//! failures (the ledger itself is inconsistent): the remediation for the
//! two differs entirely, so they are never collapsed.

use thiserror::Error;
use vault_ledger_core::{DigestError, EnvelopeError};
use vault_ledger_store::StoreError;

/// Why an admission was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// The envelope signature did not verify over the canonical message
    /// (malformed key, malformed signature, or genuine mismatch).
    #[error("invalid signature")]
    InvalidSignature,

    /// The timestamp fell outside the replay-freshness window (stale,
    /// future-dated, or malformed).
    #[error("replay detected")]
    ReplayDetected,
}

/// The admission state machine. An attempt advances through these states
/// in order; `Rejected` is reachable from any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionStage {
    Received,
    EnvelopeVerified,
    FreshnessChecked,
    ChainLinkComputed,
    MerkleRootComputed,
    Admitted,
}

/// Errors surfaced by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The admission was rejected; the request is at fault, not the ledger.
    #[error("admission rejected at {stage:?}: {reason}")]
    Rejected {
        stage: AdmissionStage,
        reason: RejectReason,
    },

    /// Non-representable input: a supplied hash was not a valid digest.
    #[error("digest error: {0}")]
    Digest(#[from] DigestError),

    /// The request could not be canonically encoded.
    #[error("envelope error: {0}")]
    Envelope(#[from] EnvelopeError),

    /// Storage failure.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The store's atomicity backstop fired: another admission landed
    /// between this attempt's tip read and its append.
    #[error("concurrent admission conflict: {0}")]
    ConcurrentAdmission(String),
}

impl EngineError {
    fn rejected(stage: AdmissionStage, reason: RejectReason) -> Self {
        Self::Rejected { stage, reason }
    }

    /// Rejection at envelope verification.
    pub fn invalid_signature() -> Self {
        Self::rejected(AdmissionStage::EnvelopeVerified, RejectReason::InvalidSignature)
    }

    /// Rejection at the freshness check.
    pub fn replay_detected() -> Self {
        Self::rejected(AdmissionStage::FreshnessChecked, RejectReason::ReplayDetected)
    }

    /// Whether this is a request-side rejection (as opposed to an
    /// integrity or infrastructure failure).
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
