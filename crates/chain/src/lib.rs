//! Chain orchestration for powchain.
//!
//! This crate turns the core primitives into a working ledger:
//! - **Blockchain**: the block sequence, mining, balances and validation
//! - **Mempool**: transactions waiting for the next block
//! - **Shared**: a lock-guarded handle for use across threads
//!
//! # Example
//!
//! ```rust
//! use powchain_chain::{Blockchain, BlockchainConfig};
//! use powchain_core::{Keypair, Transaction};
//!
//! let mut chain = Blockchain::new(BlockchainConfig {
//!     difficulty: 1,
//!     ..BlockchainConfig::default()
//! })
//! .unwrap();
//!
//! let alice = Keypair::generate();
//! let bob = Keypair::generate();
//!
//! // Earn a reward, then mine again to confirm it.
//! chain.mine_pending_transactions(alice.address()).unwrap();
//! chain.mine_pending_transactions(bob.address()).unwrap();
//!
//! let tx = Transaction::transfer(alice.address(), bob.address(), 30)
//!     .signed(&alice)
//!     .unwrap();
//! chain.add_transaction(tx).unwrap();
//! chain.mine_pending_transactions(bob.address()).unwrap();
//!
//! assert_eq!(chain.balance_of(&alice.address()), 70);
//! assert!(chain.is_chain_valid());
//! ```

pub mod blockchain;
pub mod mempool;
pub mod shared;

// Re-export commonly used types
pub use blockchain::{Blockchain, BlockchainConfig, BlockchainError, BlockchainStats, ValidationError};
pub use mempool::{Mempool, MempoolStats};
pub use shared::SharedBlockchain;
