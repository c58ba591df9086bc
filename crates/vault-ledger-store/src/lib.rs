//! # Vault Ledger Store
//!
//! Storage abstraction for the integrity ledger. Provides a trait-based
//! interface for record persistence with SQLite and in-memory
//! implementations.
//!
//! ## Key Types
//!
//! - [`LedgerStore`] - The async trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//!
//! ## Design Notes
//!
//! - **Ordered view**: every listing method returns rows by
//!   `sequence_id` ascending, which equals insertion order.
//! - **Guarded append**: `append` re-verifies that the proposed record's
//!   declared predecessor equals the current tip inside one transaction,
//!   so two interleaved admissions cannot both land — the second fails
//!   with [`StoreError::TipMismatch`] instead of forking the chain.
//! - **Decode tolerance**: the audit view (`chain_entries`) degrades
//!   corrupt digest columns to `None` for the validator to flag; the
//!   strict record views surface them as [`StoreError::InvalidData`].

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::LedgerStore;
