//! Blocks and the proof-of-work search.

use crate::hash::{hash, Hash};
use crate::pow::meets_difficulty;
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, info};

/// Genesis timestamp: 2021-02-03T00:00:00Z in milliseconds.
pub const GENESIS_TIMESTAMP: u64 = 1_612_310_400_000;

/// Errors that can occur while mining.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MiningError {
    #[error("mining cancelled after {attempts} attempts")]
    Cancelled { attempts: u64 },
}

/// A batch of transactions sealed by proof-of-work and linked to its
/// predecessor by hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Unix timestamp in milliseconds.
    pub timestamp: u64,
    /// Transactions in insertion order.
    pub transactions: Vec<Transaction>,
    /// Hash of the previous block, [`Hash::ZERO`] for genesis.
    pub previous_hash: Hash,
    /// Hash of this block as of the last recompute.
    pub hash: Hash,
    /// Proof-of-work counter.
    pub nonce: u64,
}

/// Everything a block hash commits to.
#[derive(Serialize)]
struct BlockContent<'a> {
    timestamp: u64,
    transactions: &'a [Transaction],
    previous_hash: &'a Hash,
    nonce: u64,
}

impl Block {
    /// Create a new unmined block.
    pub fn new(timestamp: u64, transactions: Vec<Transaction>, previous_hash: Hash) -> Self {
        let mut block = Self {
            timestamp,
            transactions,
            previous_hash,
            hash: Hash::ZERO,
            nonce: 0,
        };
        block.hash = block.calculate_hash();
        block
    }

    /// The fixed first block of every chain.
    pub fn genesis() -> Self {
        Self::new(GENESIS_TIMESTAMP, Vec::new(), Hash::ZERO)
    }

    /// Get the current Unix timestamp in milliseconds.
    pub fn current_timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_millis() as u64
    }

    /// Hash over timestamp, the full transaction list, previous hash and nonce.
    pub fn calculate_hash(&self) -> Hash {
        let content = BlockContent {
            timestamp: self.timestamp,
            transactions: &self.transactions,
            previous_hash: &self.previous_hash,
            nonce: self.nonce,
        };
        let encoded = bincode::serialize(&content).expect("serialization should not fail");
        hash(&encoded)
    }

    /// Search nonces until the hash has `difficulty` leading zero hex digits.
    pub fn mine(&mut self, difficulty: usize) {
        let never = AtomicBool::new(false);
        // The flag is never raised, so the search can only end by success.
        let _ = self.mine_with_cancel(difficulty, &never);
    }

    /// Like [`Block::mine`], but gives up as soon as `cancel` is raised.
    ///
    /// On cancellation the block keeps the last nonce tried and its hash.
    pub fn mine_with_cancel(
        &mut self,
        difficulty: usize,
        cancel: &AtomicBool,
    ) -> Result<(), MiningError> {
        let mut attempts = 0u64;
        while !meets_difficulty(&self.hash, difficulty) {
            if cancel.load(Ordering::Relaxed) {
                debug!(attempts, nonce = self.nonce, "mining cancelled");
                return Err(MiningError::Cancelled { attempts });
            }
            self.nonce += 1;
            self.hash = self.calculate_hash();
            attempts += 1;
        }

        info!(hash = %self.hash, nonce = self.nonce, attempts, "block mined");
        Ok(())
    }

    /// Check the stored hash is current and satisfies `difficulty`.
    pub fn has_valid_proof(&self, difficulty: usize) -> bool {
        self.hash == self.calculate_hash() && meets_difficulty(&self.hash, difficulty)
    }

    /// Check every transaction's signature; stops at the first bad one.
    pub fn has_valid_transactions(&self) -> bool {
        self.transactions
            .iter()
            .all(|tx| matches!(tx.is_valid(), Ok(true)))
    }

    pub fn is_genesis(&self) -> bool {
        *self == Self::genesis()
    }

    pub fn tx_count(&self) -> usize {
        self.transactions.len()
    }
}
