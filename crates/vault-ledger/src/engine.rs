//! The integrity engine: admission and audit over a ledger store.
//!
//! Composes the core primitives into the two externally meaningful
//! operations: admitting a signed registration atomically against the
//! current chain tip, and auditing the full ledger. The pure components
//! are safe under unlimited parallelism; admission is the one critical
//! section and is serialized per engine.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use vault_ledger_core::{
    build_proof, build_root, chain, check_freshness, format_message, issue_timestamp,
    verify_proof, Digest, LedgerRecord, LedgerSignature, MerkleProof, NewRecord, RecordSummary,
    SignedEnvelope, SignerKey,
};
use vault_ledger_store::{LedgerStore, StoreError};

use crate::error::{AdmissionStage, EngineError, Result};

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Replay-freshness window in minutes. A signed timestamp older than
    /// this (or future-dated at all) is rejected.
    pub freshness_window_minutes: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            freshness_window_minutes: 5,
        }
    }
}

/// An inbound registration request, as produced by the request-serving
/// layer. All cryptographic fields travel in hex.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionRequest {
    pub file_name: String,
    /// 64 hex chars: the file's content digest.
    pub file_hash: String,
    /// 64 hex chars: Ed25519 public key.
    pub public_key: String,
    /// 128 hex chars: Ed25519 signature over the prepared message.
    pub signature: String,
    /// RFC 3339, exactly as issued by [`IntegrityEngine::prepare`].
    pub timestamp: String,
}

/// Output of the prepare step: the exact string to sign, and the
/// timestamp to echo back in the admission request. Signer and verifier
/// agree byte-for-byte because both use this message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreparedEnvelope {
    pub message: String,
    pub timestamp: String,
}

/// Result of a full-ledger audit. Report-only: the engine never repairs
/// a broken chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub chain_valid: bool,
    pub broken_ids: Vec<u64>,
    pub records: Vec<RecordSummary>,
}

/// One audited record with its inclusion proof.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvenRecord {
    pub record: RecordSummary,
    pub proof: MerkleProof,
}

/// An audit report extended with the current Merkle root and a proof per
/// record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofAuditReport {
    pub chain_valid: bool,
    pub broken_ids: Vec<u64>,
    pub merkle_root: Digest,
    pub records: Vec<ProvenRecord>,
}

/// The integrity engine.
pub struct IntegrityEngine<S: LedgerStore> {
    store: Arc<S>,
    config: EngineConfig,
    /// Serializes read-tip through append. No other operation takes this.
    admission: Mutex<()>,
}

impl<S: LedgerStore> IntegrityEngine<S> {
    /// Create an engine over a store.
    pub fn new(store: S, config: EngineConfig) -> Self {
        Self {
            store: Arc::new(store),
            config,
            admission: Mutex::new(()),
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The prepare step: issue a timestamp and echo the exact canonical
    /// message the caller must sign.
    pub fn prepare(&self, file_name: &str, file_hash: &str) -> Result<PreparedEnvelope> {
        let digest = Digest::from_hex(file_hash)?;
        let timestamp = issue_timestamp();
        let message = format_message(file_name, &digest, &timestamp)?;
        Ok(PreparedEnvelope { message, timestamp })
    }

    /// Admit a signed registration to the ledger.
    ///
    /// Runs the admission state machine: verify the envelope signature,
    /// check freshness, then — inside the critical section — read the
    /// tip, recompute the Merkle root over all digests plus the new one,
    /// and append the record with `prev_hash` bound to the observed tip.
    pub async fn admit(&self, request: AdmissionRequest) -> Result<LedgerRecord> {
        tracing::debug!(file = %request.file_name, stage = ?AdmissionStage::Received, "admission received");

        let file_hash = Digest::from_hex(&request.file_hash)?;
        let message = format_message(&request.file_name, &file_hash, &request.timestamp)?;

        // Malformed key or signature encodings collapse into the same
        // rejection as a cryptographic mismatch.
        let envelope = match (
            SignerKey::from_hex(&request.public_key),
            LedgerSignature::from_hex(&request.signature),
        ) {
            (Ok(public_key), Ok(signature)) => SignedEnvelope {
                public_key,
                message,
                signature,
            },
            _ => return Err(EngineError::invalid_signature()),
        };

        if !envelope.verify() {
            return Err(EngineError::invalid_signature());
        }
        tracing::debug!(stage = ?AdmissionStage::EnvelopeVerified, "signature verified");

        if !check_freshness(&request.timestamp, self.config.freshness_window_minutes) {
            return Err(EngineError::replay_detected());
        }
        tracing::debug!(stage = ?AdmissionStage::FreshnessChecked, "timestamp fresh");

        // Critical section: the tip read and the append must not
        // interleave with another admission.
        let _guard = self.admission.lock().await;

        let tip = self.store.tip().await?;
        tracing::debug!(stage = ?AdmissionStage::ChainLinkComputed, %tip, "tip observed");

        let mut leaves = self.store.file_hashes().await?;
        leaves.push(file_hash);
        let merkle_root = build_root(&leaves);
        tracing::debug!(stage = ?AdmissionStage::MerkleRootComputed, %merkle_root, "root computed");

        let record = NewRecord {
            file_name: request.file_name,
            file_hash,
            prev_hash: tip,
            timestamp: request.timestamp,
            signer_key: envelope.public_key,
            merkle_root,
        };

        let persisted = self.store.append(record).await.map_err(|e| match e {
            StoreError::TipMismatch { declared, current } => EngineError::ConcurrentAdmission(
                format!("declared prev {declared}, tip moved to {current}"),
            ),
            other => EngineError::Store(other),
        })?;

        tracing::info!(
            sequence_id = persisted.sequence_id,
            file = %persisted.file_name,
            stage = ?AdmissionStage::Admitted,
            "record admitted"
        );
        Ok(persisted)
    }

    /// Audit the full ledger: one pass over the ordered record set,
    /// reporting every broken link.
    ///
    /// The verdict always comes from the decode-tolerant view, so corrupt
    /// rows are flagged rather than aborting the scan. The record echo is
    /// best-effort: if corrupt rows make the strict listing unreadable,
    /// the echo is empty while the verdict still stands.
    pub async fn audit(&self) -> Result<AuditReport> {
        let entries = self.store.chain_entries().await?;
        let report = chain::validate(&entries);

        if !report.valid {
            tracing::warn!(broken_ids = ?report.broken_ids, "hash chain broken");
        }

        let records = match self.store.list_records().await {
            Ok(records) => records.iter().map(LedgerRecord::summary).collect(),
            Err(StoreError::InvalidData(reason)) => {
                tracing::warn!(%reason, "record echo degraded by corrupt rows");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(AuditReport {
            chain_valid: report.valid,
            broken_ids: report.broken_ids,
            records,
        })
    }

    /// Audit plus an inclusion proof per record against the current root.
    pub async fn audit_with_proofs(&self) -> Result<ProofAuditReport> {
        let audit = self.audit().await?;
        let leaves = self.store.file_hashes().await?;
        let merkle_root = build_root(&leaves);

        let records = audit
            .records
            .into_iter()
            .map(|record| {
                let proof = build_proof(&leaves, &record.file_hash);
                ProvenRecord { record, proof }
            })
            .collect();

        Ok(ProofAuditReport {
            chain_valid: audit.chain_valid,
            broken_ids: audit.broken_ids,
            merkle_root,
            records,
        })
    }

    /// Build an inclusion proof for a digest against the current leaf
    /// set. Empty when the digest is not registered.
    pub async fn prove(&self, target: &Digest) -> Result<MerkleProof> {
        let leaves = self.store.file_hashes().await?;
        Ok(build_proof(&leaves, target))
    }

    /// Verify an inclusion proof. Pure; offered for external tooling
    /// symmetry with [`IntegrityEngine::prove`].
    pub fn verify(&self, target: &Digest, proof: &MerkleProof, root: &Digest) -> bool {
        verify_proof(target, proof, root)
    }

    /// Check whether a file hash is registered in the ledger.
    pub async fn lookup(&self, file_hash: &Digest) -> Result<Option<RecordSummary>> {
        let record = self.store.find_by_file_hash(file_hash).await?;
        Ok(record.map(|r| r.summary()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vault_ledger_core::Keypair;
    use vault_ledger_store::MemoryStore;

    fn engine() -> IntegrityEngine<MemoryStore> {
        IntegrityEngine::new(MemoryStore::new(), EngineConfig::default())
    }

    /// Drive prepare → sign → request for a file.
    fn signed_request(
        engine: &IntegrityEngine<MemoryStore>,
        keypair: &Keypair,
        file_name: &str,
        contents: &[u8],
    ) -> AdmissionRequest {
        let file_hash = Digest::hash(contents);
        let prepared = engine.prepare(file_name, &file_hash.to_hex()).unwrap();
        let signature = keypair.sign(prepared.message.as_bytes());

        AdmissionRequest {
            file_name: file_name.to_string(),
            file_hash: file_hash.to_hex(),
            public_key: keypair.public_key().to_hex(),
            signature: signature.to_hex(),
            timestamp: prepared.timestamp,
        }
    }

    #[tokio::test]
    async fn test_admit_single_record() {
        let engine = engine();
        let keypair = Keypair::from_seed(&[0x42; 32]);

        let request = signed_request(&engine, &keypair, "report.pdf", b"contents");
        let record = engine.admit(request).await.unwrap();

        assert_eq!(record.sequence_id, 1);
        assert_eq!(record.prev_hash, Digest::ZERO);
        assert_eq!(record.file_hash, Digest::hash(b"contents"));
        // Single leaf: root is the leaf verbatim.
        assert_eq!(record.merkle_root, record.file_hash);
        assert_eq!(record.signer_key, keypair.public_key());
    }

    #[tokio::test]
    async fn test_admit_rejects_bad_signature() {
        let engine = engine();
        let keypair = Keypair::from_seed(&[0x42; 32]);

        let mut request = signed_request(&engine, &keypair, "report.pdf", b"contents");
        request.signature = "ff".repeat(64);

        let err = engine.admit(request).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Rejected {
                reason: crate::error::RejectReason::InvalidSignature,
                ..
            }
        ));
        assert!(err.is_rejection());
    }

    #[tokio::test]
    async fn test_admit_rejects_signature_over_altered_fields() {
        let engine = engine();
        let keypair = Keypair::from_seed(&[0x42; 32]);

        // Signature was produced over the original file name; changing
        // any canonical field must invalidate it.
        let mut request = signed_request(&engine, &keypair, "report.pdf", b"contents");
        request.file_name = "other.pdf".to_string();

        let err = engine.admit(request).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Rejected {
                reason: crate::error::RejectReason::InvalidSignature,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_admit_rejects_stale_timestamp() {
        let engine = engine();
        let keypair = Keypair::from_seed(&[0x42; 32]);

        // Sign a message carrying a 10-minute-old timestamp; the
        // signature itself is valid, only freshness fails.
        let file_hash = Digest::hash(b"contents");
        let stale = (chrono::Utc::now() - chrono::Duration::minutes(10)).to_rfc3339();
        let message = format_message("report.pdf", &file_hash, &stale).unwrap();
        let signature = keypair.sign(message.as_bytes());

        let request = AdmissionRequest {
            file_name: "report.pdf".to_string(),
            file_hash: file_hash.to_hex(),
            public_key: keypair.public_key().to_hex(),
            signature: signature.to_hex(),
            timestamp: stale,
        };

        let err = engine.admit(request).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Rejected {
                reason: crate::error::RejectReason::ReplayDetected,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_admit_rejects_malformed_file_hash() {
        let engine = engine();
        let keypair = Keypair::from_seed(&[0x42; 32]);

        let mut request = signed_request(&engine, &keypair, "report.pdf", b"contents");
        request.file_hash = "not-a-digest".to_string();

        let err = engine.admit(request).await.unwrap_err();
        assert!(matches!(err, EngineError::Digest(_)));
        assert!(!err.is_rejection());
    }

    #[tokio::test]
    async fn test_lookup() {
        let engine = engine();
        let keypair = Keypair::from_seed(&[0x42; 32]);

        let request = signed_request(&engine, &keypair, "report.pdf", b"contents");
        engine.admit(request).await.unwrap();

        let found = engine.lookup(&Digest::hash(b"contents")).await.unwrap();
        assert_eq!(found.unwrap().file_name, "report.pdf");

        let absent = engine.lookup(&Digest::hash(b"absent")).await.unwrap();
        assert!(absent.is_none());
    }

    #[tokio::test]
    async fn test_prove_and_verify() {
        let engine = engine();
        let keypair = Keypair::from_seed(&[0x42; 32]);

        for (name, contents) in [("a", b"1".as_slice()), ("b", b"2"), ("c", b"3")] {
            let request = signed_request(&engine, &keypair, name, contents);
            engine.admit(request).await.unwrap();
        }

        let leaves = engine.store().file_hashes().await.unwrap();
        let root = build_root(&leaves);

        let target = Digest::hash(b"2");
        let proof = engine.prove(&target).await.unwrap();
        assert!(engine.verify(&target, &proof, &root));
        assert!(!engine.verify(&Digest::hash(b"9"), &proof, &root));
    }
}
