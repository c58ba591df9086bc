//! # Vault Ledger Testkit
//!
//! Testing utilities for the integrity ledger.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a keypair + in-memory engine with the prepare → sign
//!   → admit flow in one call
//! - **Generators**: proptest strategies for property-based testing
//! - **Vectors**: consistency vectors that every implementation of the
//!   deterministic core must reproduce
//!
//! ## Fixtures
//!
//! ```rust,no_run
//! use vault_ledger_testkit::fixtures::TestFixture;
//!
//! # async fn example() {
//! let fixture = TestFixture::with_seed([0x42; 32]);
//! let record = fixture.admit("report.pdf", b"contents").await;
//! assert_eq!(record.sequence_id, 1);
//! # }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use vault_ledger_testkit::generators::leaves;
//! use vault_ledger::core::build_root;
//!
//! proptest! {
//!     #[test]
//!     fn root_is_pure(l in leaves(32)) {
//!         prop_assert_eq!(build_root(&l), build_root(&l));
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_fixtures, TestFixture};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
