//! Digest computation: the primitive every other component builds on.
//!
//! A [`Digest`] is a 32-byte Blake3 hash whose canonical string form is
//! 64 lowercase hex characters. Digests are produced here and treated as
//! opaque comparable values everywhere else.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DigestError;

/// Chunk size for streaming digests. Peak memory stays at one chunk
/// regardless of source length.
const STREAM_CHUNK: usize = 8192;

/// A 32-byte content digest.
///
/// Two equal inputs always produce the same digest. The canonical string
/// form (used in Merkle pair combination and in storage) is `to_hex()`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest(pub [u8; 32]);

impl Digest {
    /// Compute the digest of a byte slice.
    pub fn hash(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Canonical string form: 64 lowercase hex characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse the canonical string form. Strict: exactly 64 hex characters.
    pub fn from_hex(s: &str) -> Result<Self, DigestError> {
        let bytes = hex::decode(s)
            .map_err(|e| DigestError::InvalidInput(format!("not hex: {e}")))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| DigestError::InvalidInput(format!("expected 64 hex chars, got {}", s.len())))?;
        Ok(Self(arr))
    }

    /// The zero digest: genesis predecessor and empty Merkle root sentinel.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Whether this is the sentinel value.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Digest {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Digest a reader in bounded chunks.
///
/// Produces the same digest as `Digest::hash` over the reader's full
/// contents. A read failure aborts the whole operation; bytes already
/// hashed are discarded and no partial digest is ever returned.
pub fn hash_reader<R: Read>(mut reader: R) -> Result<Digest, DigestError> {
    let mut hasher = blake3::Hasher::new();
    let mut chunk = [0u8; STREAM_CHUNK];
    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        hasher.update(&chunk[..n]);
    }
    Ok(Digest(*hasher.finalize().as_bytes()))
}

/// Digest a file by path.
///
/// Open failures are reported as [`DigestError::SourceUnavailable`];
/// failures after opening as [`DigestError::SourceRead`].
pub fn hash_file(path: impl AsRef<Path>) -> Result<Digest, DigestError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DigestError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    hash_reader(file)
}
