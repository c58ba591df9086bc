//! Hash-chain linkage validation.
//!
//! The validator is a single forward pass that reports every break; it
//! never stops at the first one and never repairs anything.

use serde::{Deserialize, Serialize};

use crate::record::ChainEntry;

/// Verdict of a chain scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainReport {
    pub valid: bool,
    /// Sequence ids of every record whose predecessor link is broken,
    /// in scan order.
    pub broken_ids: Vec<u64>,
}

impl ChainReport {
    fn intact() -> Self {
        Self {
            valid: true,
            broken_ids: Vec::new(),
        }
    }
}

/// Validate that an ordered record sequence forms an unbroken chain.
///
/// Fewer than two entries is trivially valid. For every index `i >= 1`,
/// `entries[i].prev_hash` must equal `entries[i-1].file_hash`; an entry
/// whose own digest fields are missing, or whose predecessor's
/// `file_hash` is missing, is flagged under its own sequence id.
pub fn validate(entries: &[ChainEntry]) -> ChainReport {
    if entries.len() < 2 {
        return ChainReport::intact();
    }

    let mut broken_ids = Vec::new();
    for window in entries.windows(2) {
        let previous = &window[0];
        let current = &window[1];

        match (previous.file_hash, current.prev_hash) {
            (Some(expected), Some(declared)) if declared == expected => {}
            _ => broken_ids.push(current.sequence_id),
        }
    }

    ChainReport {
        valid: broken_ids.is_empty(),
        broken_ids,
    }
}
