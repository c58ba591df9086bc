//! Merkle commitment over an ordered list of leaf digests.
//!
//! Stateless: every function is a pure transformation of the leaf list it
//! is given. The folding is iterative over an explicit current-level
//! buffer; proof tracking halves the tracked index at each level.
//!
//! Pairing policy: leaves are paired left-to-right and an odd tail leaf is
//! paired with itself (duplicated, not dropped), so the last odd element
//! still gets a single-sibling proof step. Pairs are combined by hashing
//! the concatenation of the two digests' canonical hex forms, left first.

use serde::{Deserialize, Serialize};

use crate::digest::Digest;

/// Which side of the pair a proof sibling sits on, read leaf-to-root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    Left,
    Right,
}

/// One step of an inclusion proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    pub sibling: Digest,
    pub position: Position,
}

/// An inclusion proof: ordered sibling steps from leaf level to root.
///
/// Ephemeral; generated on demand from the current leaf set. An empty
/// proof is what [`build_proof`] returns for an absent target (and is
/// also the legitimate proof for a single-leaf tree).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    pub steps: Vec<ProofStep>,
}

impl MerkleProof {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }
}

/// Combine a pair: hash of left_hex || right_hex. Order is load-bearing.
fn combine(left: &Digest, right: &Digest) -> Digest {
    let mut concat = String::with_capacity(128);
    concat.push_str(&left.to_hex());
    concat.push_str(&right.to_hex());
    Digest::hash(concat.as_bytes())
}

/// Fold one level into the next, duplicating an odd tail leaf.
fn fold_level(level: &[Digest]) -> Vec<Digest> {
    let mut next = Vec::with_capacity(level.len().div_ceil(2));
    for pair in level.chunks(2) {
        let left = &pair[0];
        let right = pair.get(1).unwrap_or(&pair[0]);
        next.push(combine(left, right));
    }
    next
}

/// Build the root digest over an ordered leaf list.
///
/// Empty input yields [`Digest::ZERO`]; a single leaf is returned
/// verbatim. Identical leaf sequences always yield identical roots, and
/// the structure is order-sensitive: reordering leaves changes the root.
pub fn build_root(leaves: &[Digest]) -> Digest {
    match leaves {
        [] => Digest::ZERO,
        [single] => *single,
        _ => {
            let mut level = leaves.to_vec();
            while level.len() > 1 {
                level = fold_level(&level);
            }
            level[0]
        }
    }
}

/// Build an inclusion proof for `target` within `leaves`.
///
/// Returns an empty proof when `target` is absent. When duplicate leaves
/// exist, the first matching index is proven.
pub fn build_proof(leaves: &[Digest], target: &Digest) -> MerkleProof {
    let Some(mut index) = leaves.iter().position(|leaf| leaf == target) else {
        return MerkleProof::default();
    };

    let mut steps = Vec::new();
    let mut level = leaves.to_vec();
    while level.len() > 1 {
        let step = if index % 2 == 0 {
            // Left element: sibling is the right neighbour, or the leaf
            // itself when it is the duplicated odd tail.
            let sibling = *level.get(index + 1).unwrap_or(&level[index]);
            ProofStep {
                sibling,
                position: Position::Right,
            }
        } else {
            ProofStep {
                sibling: level[index - 1],
                position: Position::Left,
            }
        };
        steps.push(step);

        level = fold_level(&level);
        index /= 2;
    }

    MerkleProof { steps }
}

/// Verify an inclusion proof against an expected root.
///
/// Folds `target` through the proof steps in order, the exact inverse of
/// [`build_proof`]'s recording order. Any mismatch — tampered target,
/// tampered sibling, wrong root, truncated or reordered proof — yields
/// `false`; verification failure is a normal outcome, not an error.
pub fn verify_proof(target: &Digest, proof: &MerkleProof, expected_root: &Digest) -> bool {
    let mut current = *target;
    for step in &proof.steps {
        current = match step.position {
            Position::Right => combine(&current, &step.sibling),
            Position::Left => combine(&step.sibling, &current),
        };
    }
    current == *expected_root
}
