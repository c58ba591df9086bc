//! # Vault Ledger
//!
//! The unified API for the deterministic integrity ledger: signed
//! admission against a hash chain, Merkle commitments over all
//! registered content digests, and full-ledger audit.
//!
//! ## Overview
//!
//! Every registered file is bound to its predecessor by a hash-chain
//! link and folded into a Merkle root, so any single registration can be
//! proven a member of the set. A registration is admitted only when its
//! signed envelope is authentic, fresh, and consistent with the current
//! chain tip.
//!
//! ## Key Concepts
//!
//! - **Record**: immutable once persisted; changes are new records.
//! - **Tip**: the last record's content digest; the next record's
//!   predecessor binding.
//! - **Prepare step**: the engine issues the timestamp and echoes the
//!   exact message to sign, so signer and verifier agree byte-for-byte.
//! - **Audit**: a single pass that reports every broken link; the engine
//!   never repairs.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use vault_ledger::{AdmissionRequest, EngineConfig, IntegrityEngine};
//! use vault_ledger::core::{Digest, Keypair};
//! use vault_ledger::store::SqliteStore;
//!
//! async fn example() {
//!     let store = SqliteStore::open("ledger.db").unwrap();
//!     let engine = IntegrityEngine::new(store, EngineConfig::default());
//!
//!     // Client side: hash the file, get the message to sign.
//!     let keypair = Keypair::generate();
//!     let file_hash = Digest::hash(b"file contents");
//!     let prepared = engine.prepare("report.pdf", &file_hash.to_hex()).unwrap();
//!     let signature = keypair.sign(prepared.message.as_bytes());
//!
//!     // Admission.
//!     let record = engine
//!         .admit(AdmissionRequest {
//!             file_name: "report.pdf".into(),
//!             file_hash: file_hash.to_hex(),
//!             public_key: keypair.public_key().to_hex(),
//!             signature: signature.to_hex(),
//!             timestamp: prepared.timestamp,
//!         })
//!         .await
//!         .unwrap();
//!
//!     // Audit.
//!     let report = engine.audit().await.unwrap();
//!     assert!(report.chain_valid);
//!     let _ = record;
//! }
//! ```

pub mod engine;
pub mod error;

// Re-export component crates
pub use vault_ledger_core as core;
pub use vault_ledger_store as store;

// Re-export main types for convenience
pub use engine::{
    AdmissionRequest, AuditReport, EngineConfig, IntegrityEngine, PreparedEnvelope,
    ProofAuditReport, ProvenRecord,
};
pub use error::{AdmissionStage, EngineError, RejectReason, Result};

// Re-export commonly used core types
pub use vault_ledger_core::{
    Digest, Keypair, LedgerRecord, LedgerSignature, MerkleProof, RecordSummary, SignedEnvelope,
    SignerKey,
};
