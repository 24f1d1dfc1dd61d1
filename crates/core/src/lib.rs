//! Ledger primitives for powchain.
//!
//! This crate provides the building blocks of the ledger:
//! - SHA-256 hashing
//! - Ed25519 signing, with the public key doubling as the account address
//! - Signed value-transfer transactions
//! - Blocks sealed by proof-of-work

pub mod block;
pub mod crypto;
pub mod hash;
pub mod pow;
pub mod transaction;

// Re-export commonly used types at the crate root
pub use block::{Block, MiningError, GENESIS_TIMESTAMP};
pub use crypto::{Address, CryptoError, Keypair, Signature};
pub use hash::{hash, hash_concat, Hash, H256};
pub use pow::{meets_difficulty, MAX_DIFFICULTY};
pub use transaction::{Transaction, TransactionError};
