//! # Vault Ledger Core
//!
//! Pure primitives for the deterministic integrity ledger: digests,
//! Merkle commitments, hash-chain validation, and signed canonical
//! envelopes.
//!
//! This crate contains no storage and no networking; the only I/O is the
//! bounded-memory streaming digest. Everything else is pure computation
//! over cryptographic values.
//!
//! ## Key Types
//!
//! - [`Digest`] - 32-byte Blake3 content digest, 64-hex canonical form
//! - [`LedgerRecord`] - one immutable, chain-linked ledger row
//! - [`MerkleProof`] - sibling path proving a leaf against a root
//! - [`SignedEnvelope`] - the signed registration input
//!
//! ## Canonical message
//!
//! The signed artifact is `file_name|file_hash_hex|timestamp`. See
//! [`envelope`] for the byte-for-byte contract.

pub mod chain;
pub mod crypto;
pub mod digest;
pub mod envelope;
pub mod error;
pub mod merkle;
pub mod record;

pub use chain::{validate, ChainReport};
pub use crypto::{Keypair, LedgerSignature, SignerKey};
pub use digest::{hash_file, hash_reader, Digest};
pub use envelope::{
    check_freshness, check_freshness_at, format_message, issue_timestamp, SignedEnvelope,
    MESSAGE_DELIMITER,
};
pub use error::{CryptoError, DigestError, EnvelopeError};
pub use merkle::{build_proof, build_root, verify_proof, MerkleProof, Position, ProofStep};
pub use record::{ChainEntry, LedgerRecord, NewRecord, RecordSummary};
