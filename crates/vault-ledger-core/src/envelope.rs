//! Canonical envelope: the exact byte string that gets signed, signature
//! verification over it, and the replay-freshness window.
//!
//! The message format is the single contract signer and verifier must
//! agree on byte-for-byte: `file_name|file_hash_hex|timestamp`. The
//! predecessor hash is deliberately not part of the message; binding to
//! the chain tip happens inside the engine's admission critical section,
//! so signing never races against tip assignment.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::{LedgerSignature, SignerKey};
use crate::digest::Digest;
use crate::error::EnvelopeError;

/// Field separator in the canonical message.
pub const MESSAGE_DELIMITER: char = '|';

/// Format the canonical message for a registration.
///
/// Deterministic: identical inputs always produce identical output. A
/// file name containing the delimiter or a line break cannot be encoded
/// unambiguously and is rejected rather than silently accepted. The hash
/// and timestamp fields are delimiter-free by construction (hex and
/// RFC 3339 respectively).
pub fn format_message(
    file_name: &str,
    file_hash: &Digest,
    timestamp: &str,
) -> Result<String, EnvelopeError> {
    if file_name.contains(MESSAGE_DELIMITER) || file_name.contains(['\n', '\r']) {
        return Err(EnvelopeError::UnencodableFileName(file_name.to_string()));
    }
    Ok(format!(
        "{file_name}{MESSAGE_DELIMITER}{}{MESSAGE_DELIMITER}{timestamp}",
        file_hash.to_hex()
    ))
}

/// Issue a fresh RFC 3339 timestamp for the prepare step.
pub fn issue_timestamp() -> String {
    Utc::now().to_rfc3339()
}

/// A signed registration envelope: ephemeral input to admission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedEnvelope {
    pub public_key: SignerKey,
    pub message: String,
    pub signature: LedgerSignature,
}

impl SignedEnvelope {
    /// Verify the signature over the exact message bytes.
    ///
    /// Every failure mode — malformed key, malformed signature, genuine
    /// mismatch — collapses to `false`; the cause is logged at debug for
    /// operators, but the boolean contract stays uniform for callers.
    pub fn verify(&self) -> bool {
        match self.public_key.verify(self.message.as_bytes(), &self.signature) {
            Ok(()) => true,
            Err(cause) => {
                tracing::debug!(%cause, "envelope signature rejected");
                false
            }
        }
    }
}

/// Check that a timestamp falls inside the replay window.
///
/// Accepts iff elapsed time from `timestamp` to now is in
/// `[0, window_minutes)`. Policy: strictly non-negative — a future-dated
/// timestamp is rejected with no clock-skew allowance, and malformed
/// timestamps fail closed.
pub fn check_freshness(timestamp: &str, window_minutes: i64) -> bool {
    check_freshness_at(timestamp, window_minutes, Utc::now())
}

/// Freshness check against an explicit "now", for deterministic tests.
pub fn check_freshness_at(timestamp: &str, window_minutes: i64, now: DateTime<Utc>) -> bool {
    let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) else {
        return false;
    };
    let elapsed = now.signed_duration_since(parsed.with_timezone(&Utc));
    elapsed >= Duration::zero() && elapsed < Duration::minutes(window_minutes)
}
