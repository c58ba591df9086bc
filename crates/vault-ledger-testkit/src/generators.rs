//! Proptest generators for property-based testing.

use proptest::prelude::*;

use vault_ledger_core::{ChainEntry, Digest, Keypair, SignerKey};

/// Generate a random keypair from an arbitrary seed.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random public key.
pub fn signer_key() -> impl Strategy<Value = SignerKey> {
    keypair().prop_map(|kp| kp.public_key())
}

/// Generate an arbitrary digest value (raw bytes, not a hash image).
pub fn digest() -> impl Strategy<Value = Digest> {
    any::<[u8; 32]>().prop_map(Digest::from_bytes)
}

/// Generate a digest by hashing arbitrary content.
pub fn content_digest() -> impl Strategy<Value = Digest> {
    prop::collection::vec(any::<u8>(), 0..256).prop_map(|bytes| Digest::hash(&bytes))
}

/// Generate an ordered leaf list of up to `max_len` digests.
pub fn leaves(max_len: usize) -> impl Strategy<Value = Vec<Digest>> {
    prop::collection::vec(digest(), 0..=max_len)
}

/// Generate a file name safe for the canonical message format.
pub fn file_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_.-]{0,24}".prop_map(String::from)
}

/// Generate a correctly linked chain of up to `max_len` entries:
/// sequence ids 1..=n, each entry's `prev_hash` equal to its
/// predecessor's `file_hash`, genesis pointing at the zero digest.
pub fn linked_chain(max_len: usize) -> impl Strategy<Value = Vec<ChainEntry>> {
    prop::collection::vec(any::<[u8; 32]>(), 0..=max_len).prop_map(|seeds| {
        let mut entries = Vec::with_capacity(seeds.len());
        let mut prev = Digest::ZERO;
        for (i, seed) in seeds.into_iter().enumerate() {
            let file_hash = Digest::hash(&seed);
            entries.push(ChainEntry {
                sequence_id: i as u64 + 1,
                file_hash: Some(file_hash),
                prev_hash: Some(prev),
            });
            prev = file_hash;
        }
        entries
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vault_ledger_core::{build_proof, build_root, chain, verify_proof};

    proptest! {
        #[test]
        fn root_is_pure(l in leaves(32)) {
            prop_assert_eq!(build_root(&l), build_root(&l));
        }

        #[test]
        fn root_moves_when_any_leaf_changes(l in leaves(16), index in any::<prop::sample::Index>()) {
            prop_assume!(!l.is_empty());
            let i = index.index(l.len());

            let mut mutated = l.clone();
            mutated[i] = Digest::hash(mutated[i].as_bytes());
            prop_assume!(mutated[i] != l[i]);

            prop_assert_ne!(build_root(&mutated), build_root(&l));
        }

        #[test]
        fn every_leaf_proves_against_the_root(l in leaves(16)) {
            let root = build_root(&l);
            for leaf in &l {
                let proof = build_proof(&l, leaf);
                prop_assert!(verify_proof(leaf, &proof, &root));
            }
        }

        #[test]
        fn foreign_target_fails_every_proof(l in leaves(16), foreign in digest()) {
            prop_assume!(!l.is_empty());
            prop_assume!(!l.contains(&foreign));

            let root = build_root(&l);
            // Reuse a genuine member's proof with a substituted target.
            let proof = build_proof(&l, &l[0]);
            // A single-leaf tree has an empty proof, where the root IS
            // the leaf; any other leaf count must reject the foreigner.
            if l.len() > 1 {
                prop_assert!(!verify_proof(&foreign, &proof, &root));
            }
        }

        #[test]
        fn linked_chains_validate(entries in linked_chain(24)) {
            let report = chain::validate(&entries);
            prop_assert!(report.valid);
            prop_assert!(report.broken_ids.is_empty());
        }

        #[test]
        fn tampered_link_is_flagged(entries in linked_chain(24), index in any::<prop::sample::Index>()) {
            prop_assume!(entries.len() >= 2);
            // Never tamper with genesis: its prev link is not scanned.
            let i = 1 + index.index(entries.len() - 1);

            let mut tampered = entries.clone();
            let bogus = Digest::hash(b"tampered-prev");
            prop_assume!(tampered[i].prev_hash != Some(bogus));
            tampered[i].prev_hash = Some(bogus);

            let report = chain::validate(&tampered);
            prop_assert!(!report.valid);
            prop_assert!(report.broken_ids.contains(&tampered[i].sequence_id));
        }

        #[test]
        fn signatures_bind_to_exact_message(kp in keypair(), message in ".*", flip in any::<u8>()) {
            let signature = kp.sign(message.as_bytes());
            prop_assert!(kp.public_key().verify(message.as_bytes(), &signature).is_ok());

            let mut altered = message.clone().into_bytes();
            if !altered.is_empty() {
                let i = (flip as usize) % altered.len();
                altered[i] ^= 0x01;
                prop_assert!(kp.public_key().verify(&altered, &signature).is_err());
            }
        }
    }
}
