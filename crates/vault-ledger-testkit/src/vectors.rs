//! Consistency vectors for cross-implementation verification.
//!
//! Every implementation of the ledger's deterministic core must produce
//! identical digests, canonical messages, Merkle roots, and signatures
//! for these inputs. Vectors are generated from fixed inputs and checked
//! for self-consistency and for the structural identities of the folding
//! rules; serialize them with `serde_json` to compare implementations.

use serde::{Deserialize, Serialize};

use vault_ledger_core::{build_proof, build_root, format_message, verify_proof, Digest, Keypair};

/// A single consistency vector over the deterministic core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldenVector {
    pub name: String,
    pub description: String,

    // Inputs
    pub file_names: Vec<String>,
    pub contents: Vec<String>, // hex-encoded file contents
    pub author_seed: String,   // 32 bytes hex
    pub timestamp: String,     // fixed RFC 3339 instant

    // Derived outputs (all hex except messages)
    pub leaves: Vec<String>,        // content digests, in registration order
    pub merkle_root: String,        // root over the leaves
    pub messages: Vec<String>,      // canonical message per registration
    pub signatures: Vec<String>,    // deterministic Ed25519 per message
}

/// Generate one vector from fixed inputs.
fn generate_vector(
    name: &str,
    description: &str,
    seed: [u8; 32],
    files: &[(&str, &[u8])],
) -> GoldenVector {
    let keypair = Keypair::from_seed(&seed);
    let timestamp = "2026-01-15T12:00:00+00:00";

    let leaves: Vec<Digest> = files.iter().map(|(_, contents)| Digest::hash(contents)).collect();
    let merkle_root = build_root(&leaves);

    let messages: Vec<String> = files
        .iter()
        .zip(&leaves)
        .map(|((file_name, _), leaf)| {
            format_message(file_name, leaf, timestamp).expect("vector file names are plain")
        })
        .collect();

    let signatures: Vec<String> = messages
        .iter()
        .map(|m| keypair.sign(m.as_bytes()).to_hex())
        .collect();

    GoldenVector {
        name: name.to_string(),
        description: description.to_string(),
        file_names: files.iter().map(|(n, _)| n.to_string()).collect(),
        contents: files.iter().map(|(_, c)| hex::encode(c)).collect(),
        author_seed: hex::encode(seed),
        timestamp: timestamp.to_string(),
        leaves: leaves.iter().map(Digest::to_hex).collect(),
        merkle_root: merkle_root.to_hex(),
        messages,
        signatures,
    }
}

/// Generate all consistency vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        generate_vector(
            "empty_ledger",
            "No registrations: the root is the zero sentinel",
            [0x01; 32],
            &[],
        ),
        generate_vector(
            "single_file",
            "One registration: the root is the leaf verbatim",
            [0x02; 32],
            &[("alone.txt", b"only contents")],
        ),
        generate_vector(
            "two_files",
            "Two registrations: one pairing step",
            [0x03; 32],
            &[("a.txt", b"first"), ("b.txt", b"second")],
        ),
        generate_vector(
            "three_files_odd_tail",
            "Odd leaf count: the last leaf pairs with itself",
            [0x04; 32],
            &[("a.txt", b"first"), ("b.txt", b"second"), ("c.txt", b"third")],
        ),
        generate_vector(
            "five_files",
            "Two folding levels with an odd tail at each",
            [0x05; 32],
            &[
                ("a.bin", &[0x00, 0x01, 0x02]),
                ("b.bin", &[0x10, 0x11]),
                ("c.bin", &[0x20]),
                ("d.bin", &[]),
                ("e.bin", &[0xff; 64]),
            ],
        ),
        generate_vector(
            "binary_contents",
            "Contents spanning all byte values",
            [0x06; 32],
            &[("all-bytes.bin", &(0u8..=255).collect::<Vec<u8>>())],
        ),
        generate_vector(
            "duplicate_contents",
            "Identical files yield identical leaves at distinct indices",
            [0x07; 32],
            &[("copy-1.txt", b"same"), ("copy-2.txt", b"same")],
        ),
    ]
}

/// Recompute every vector's outputs and panic on any divergence.
///
/// Returns the number of vectors checked.
pub fn verify_all_vectors() -> usize {
    let vectors = all_vectors();

    for v in &vectors {
        let leaves: Vec<Digest> = v
            .leaves
            .iter()
            .map(|h| Digest::from_hex(h).expect("vector leaves are canonical hex"))
            .collect();

        // Leaves re-derive from contents.
        for (content_hex, leaf) in v.contents.iter().zip(&leaves) {
            let contents = hex::decode(content_hex).expect("vector contents are hex");
            assert_eq!(Digest::hash(&contents), *leaf, "{}: leaf mismatch", v.name);
        }

        // Root re-derives from leaves, and every leaf proves against it.
        let root = build_root(&leaves);
        assert_eq!(root.to_hex(), v.merkle_root, "{}: root mismatch", v.name);
        for leaf in &leaves {
            let proof = build_proof(&leaves, leaf);
            assert!(
                verify_proof(leaf, &proof, &root),
                "{}: proof for {leaf} must verify",
                v.name
            );
        }

        // Messages and signatures re-derive from the fixed inputs.
        let keypair = Keypair::from_seed(
            &hex::decode(&v.author_seed)
                .expect("seed is hex")
                .try_into()
                .expect("seed is 32 bytes"),
        );
        for ((file_name, leaf), (message, signature)) in v
            .file_names
            .iter()
            .zip(&leaves)
            .zip(v.messages.iter().zip(&v.signatures))
        {
            let expected = format_message(file_name, leaf, &v.timestamp).unwrap();
            assert_eq!(&expected, message, "{}: message mismatch", v.name);
            assert_eq!(
                &keypair.sign(message.as_bytes()).to_hex(),
                signature,
                "{}: signature mismatch",
                v.name
            );
        }
    }

    vectors.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vectors_self_consistent() {
        assert_eq!(verify_all_vectors(), 7);
    }

    #[test]
    fn test_vectors_deterministic() {
        let v1 = all_vectors();
        let v2 = all_vectors();

        for (a, b) in v1.iter().zip(v2.iter()) {
            assert_eq!(a.leaves, b.leaves, "leaves mismatch for {}", a.name);
            assert_eq!(a.merkle_root, b.merkle_root, "root mismatch for {}", a.name);
            assert_eq!(a.messages, b.messages, "messages mismatch for {}", a.name);
            assert_eq!(a.signatures, b.signatures, "signatures mismatch for {}", a.name);
        }
    }

    #[test]
    fn test_structural_identities() {
        let vectors = all_vectors();
        let by_name = |n: &str| vectors.iter().find(|v| v.name == n).unwrap();

        // Empty ledger: zero-sentinel root.
        assert_eq!(by_name("empty_ledger").merkle_root, "0".repeat(64));

        // Single leaf: root is the leaf verbatim.
        let single = by_name("single_file");
        assert_eq!(single.merkle_root, single.leaves[0]);

        // Two leaves: root is one combine step.
        let two = by_name("two_files");
        let combined = Digest::hash(format!("{}{}", two.leaves[0], two.leaves[1]).as_bytes());
        assert_eq!(two.merkle_root, combined.to_hex());

        // Odd tail: root(a, b, c) == combine(combine(a, b), combine(c, c)).
        let three = by_name("three_files_odd_tail");
        let ab = Digest::hash(format!("{}{}", three.leaves[0], three.leaves[1]).as_bytes());
        let cc = Digest::hash(format!("{}{}", three.leaves[2], three.leaves[2]).as_bytes());
        let root = Digest::hash(format!("{}{}", ab.to_hex(), cc.to_hex()).as_bytes());
        assert_eq!(three.merkle_root, root.to_hex());
    }

    #[test]
    fn test_duplicate_contents_share_leaves() {
        let vectors = all_vectors();
        let dup = vectors.iter().find(|v| v.name == "duplicate_contents").unwrap();
        assert_eq!(dup.leaves[0], dup.leaves[1]);
    }

    #[test]
    fn test_vectors_serialize() {
        let json = serde_json::to_string_pretty(&all_vectors()).unwrap();
        let back: Vec<GoldenVector> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 7);
    }
}
