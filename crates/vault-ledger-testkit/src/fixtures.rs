//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: a keypair, an in-memory
//! engine, and the prepare → sign → admit dance in one call.

use vault_ledger::{AdmissionRequest, EngineConfig, IntegrityEngine};
use vault_ledger_core::{Digest, Keypair, LedgerRecord, SignerKey};
use vault_ledger_store::MemoryStore;

/// A test fixture with a keypair and an engine over an in-memory store.
pub struct TestFixture {
    pub keypair: Keypair,
    pub engine: IntegrityEngine<MemoryStore>,
}

impl TestFixture {
    /// Create a new fixture with a random keypair.
    pub fn new() -> Self {
        Self {
            keypair: Keypair::generate(),
            engine: IntegrityEngine::new(MemoryStore::new(), EngineConfig::default()),
        }
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            keypair: Keypair::from_seed(&seed),
            engine: IntegrityEngine::new(MemoryStore::new(), EngineConfig::default()),
        }
    }

    /// Get the keypair's public key.
    pub fn public_key(&self) -> SignerKey {
        self.keypair.public_key()
    }

    /// Build a correctly signed admission request for the given file:
    /// prepare, sign the echoed message, fill in the wire fields.
    pub fn signed_request(&self, file_name: &str, contents: &[u8]) -> AdmissionRequest {
        let file_hash = Digest::hash(contents);
        let prepared = self
            .engine
            .prepare(file_name, &file_hash.to_hex())
            .expect("prepare must accept a plain file name");
        let signature = self.keypair.sign(prepared.message.as_bytes());

        AdmissionRequest {
            file_name: file_name.to_string(),
            file_hash: file_hash.to_hex(),
            public_key: self.keypair.public_key().to_hex(),
            signature: signature.to_hex(),
            timestamp: prepared.timestamp,
        }
    }

    /// Admit a file end-to-end, panicking on rejection.
    pub async fn admit(&self, file_name: &str, contents: &[u8]) -> LedgerRecord {
        self.engine
            .admit(self.signed_request(file_name, contents))
            .await
            .expect("fixture admission must succeed")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple fixtures with distinct deterministic keys.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            TestFixture::with_seed(seed)
        })
        .collect()
}
