//! Main blockchain orchestration.
//!
//! This module owns the block sequence and the pending pool, and drives
//! submission, mining, balance queries and chain validation.

use crate::mempool::Mempool;
use powchain_core::{
    meets_difficulty, Address, Block, Hash, MiningError, Transaction, TransactionError,
    MAX_DIFFICULTY,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::AtomicBool;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    #[error("transaction must include from and to address")]
    MalformedTransaction,

    #[error("cannot add invalid transaction to chain")]
    InvalidSignature,

    #[error("transaction error: {0}")]
    Transaction(#[from] TransactionError),

    #[error("insufficient balance (required {required}, available {available})")]
    InsufficientBalance { required: u64, available: i128 },

    #[error("mining error: {0}")]
    Mining(#[from] MiningError),

    #[error("chain has no blocks")]
    EmptyChain,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, BlockchainError>;

/// Reasons a chain fails validation. `index` is the offending block.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("genesis block does not match the canonical genesis")]
    InvalidGenesis,

    #[error("block {index} contains an invalid transaction")]
    InvalidTransactions { index: usize },

    #[error("block {index} hash does not match its contents")]
    HashMismatch { index: usize },

    #[error("block {index} previous hash does not match its predecessor")]
    BrokenLink { index: usize },

    #[error("block {index} hash does not meet the difficulty target")]
    InsufficientWork { index: usize },
}

/// Blockchain configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// Leading zero hex digits required of each mined block hash.
    pub difficulty: usize,
    /// Amount paid to the miner of each block.
    pub mining_reward: u64,
    /// Reject transfers that exceed the sender's confirmed balance minus
    /// what it already has pending.
    pub check_balance: bool,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            difficulty: 2,
            mining_reward: 100,
            check_balance: false,
        }
    }
}

impl BlockchainConfig {
    pub fn validate(&self) -> Result<()> {
        if self.difficulty > MAX_DIFFICULTY {
            return Err(BlockchainError::InvalidConfig(format!(
                "difficulty {} exceeds maximum of {}",
                self.difficulty, MAX_DIFFICULTY
            )));
        }
        Ok(())
    }
}

/// A proof-of-work chain with its pool of pending transactions.
#[derive(Debug, Clone)]
pub struct Blockchain {
    /// Blocks, genesis first. Never empty.
    blocks: Vec<Block>,
    /// Transactions waiting for the next block.
    mempool: Mempool,
    /// Configuration.
    config: BlockchainConfig,
}

impl Blockchain {
    /// Create a new chain holding only the genesis block.
    pub fn new(config: BlockchainConfig) -> Result<Self> {
        config.validate()?;
        info!(
            difficulty = config.difficulty,
            mining_reward = config.mining_reward,
            "creating chain"
        );

        Ok(Self {
            blocks: vec![Self::create_genesis_block()],
            mempool: Mempool::new(),
            config,
        })
    }

    /// Rebuild a chain from blocks obtained elsewhere, with an empty pool.
    ///
    /// The blocks are taken as-is; run [`Blockchain::validate`] before
    /// trusting them.
    pub fn from_blocks(config: BlockchainConfig, blocks: Vec<Block>) -> Result<Self> {
        config.validate()?;
        if blocks.is_empty() {
            return Err(BlockchainError::EmptyChain);
        }

        Ok(Self {
            blocks,
            mempool: Mempool::new(),
            config,
        })
    }

    /// The fixed first block every chain starts from.
    pub fn create_genesis_block() -> Block {
        Block::genesis()
    }

    pub fn config(&self) -> &BlockchainConfig {
        &self.config
    }

    pub fn difficulty(&self) -> usize {
        self.config.difficulty
    }

    pub fn mining_reward(&self) -> u64 {
        self.config.mining_reward
    }

    /// All blocks, genesis first.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Transactions waiting to be mined, in submission order.
    pub fn pending_transactions(&self) -> &[Transaction] {
        self.mempool.transactions()
    }

    /// Height of the latest block (genesis is 0).
    pub fn height(&self) -> u64 {
        self.blocks.len().saturating_sub(1) as u64
    }

    /// Get the latest block.
    pub fn latest_block(&self) -> Result<&Block> {
        self.blocks.last().ok_or(BlockchainError::EmptyChain)
    }

    /// Validate a transaction and queue it for the next block.
    ///
    /// Nothing is queued unless every check passes.
    pub fn add_transaction(&mut self, tx: Transaction) -> Result<()> {
        let (Some(from), Some(_)) = (tx.from, tx.to) else {
            warn!("rejected transaction without sender or recipient");
            return Err(BlockchainError::MalformedTransaction);
        };

        if !tx.is_valid()? {
            warn!(%from, "rejected transaction with bad signature");
            return Err(BlockchainError::InvalidSignature);
        }

        if self.config.check_balance {
            let available =
                self.balance_of(&from) - i128::from(self.mempool.pending_outgoing(&from));
            if available < i128::from(tx.amount) {
                warn!(%from, amount = tx.amount, %available, "rejected overspending transaction");
                return Err(BlockchainError::InsufficientBalance {
                    required: tx.amount,
                    available,
                });
            }
        }

        debug!(%from, amount = tx.amount, "transaction queued");
        self.mempool.add(tx);
        Ok(())
    }

    /// Mine every pending transaction into a new block and queue the reward
    /// for `reward_address`.
    pub fn mine_pending_transactions(&mut self, reward_address: Address) -> Result<&Block> {
        let never = AtomicBool::new(false);
        self.mine_pending_transactions_with_cancel(reward_address, &never)
    }

    /// Like [`Blockchain::mine_pending_transactions`], but abandons the search
    /// when `cancel` is raised. A cancelled run leaves the chain and the
    /// pending pool exactly as they were.
    pub fn mine_pending_transactions_with_cancel(
        &mut self,
        reward_address: Address,
        cancel: &AtomicBool,
    ) -> Result<&Block> {
        let previous_hash = self.latest_block()?.hash;
        let transactions = self.mempool.take();
        let mut block = Block::new(Block::current_timestamp(), transactions, previous_hash);

        if let Err(err) = block.mine_with_cancel(self.config.difficulty, cancel) {
            self.mempool.restore(block.transactions);
            return Err(err.into());
        }

        info!(
            height = self.blocks.len(),
            hash = %block.hash,
            transactions = block.tx_count(),
            "block successfully mined"
        );
        self.blocks.push(block);
        self.mempool
            .reset_with(Transaction::reward(reward_address, self.config.mining_reward));

        self.latest_block()
    }

    /// Net amount received by `address` across the whole chain.
    ///
    /// Pending transactions are not counted.
    pub fn balance_of(&self, address: &Address) -> i128 {
        let mut balance: i128 = 0;

        for tx in self.blocks.iter().flat_map(|block| block.transactions.iter()) {
            if tx.from.as_ref() == Some(address) {
                balance -= i128::from(tx.amount);
            }
            if tx.to.as_ref() == Some(address) {
                balance += i128::from(tx.amount);
            }
        }

        balance
    }

    /// Check every block: the genesis, and for each later block its
    /// transactions, its own hash, its link to the predecessor and its
    /// proof-of-work.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        match self.blocks.first() {
            Some(genesis) if *genesis == Self::create_genesis_block() => {}
            _ => return Err(ValidationError::InvalidGenesis),
        }

        for (offset, pair) in self.blocks.windows(2).enumerate() {
            let index = offset + 1;
            let (previous, current) = (&pair[0], &pair[1]);

            if !current.has_valid_transactions() {
                return Err(ValidationError::InvalidTransactions { index });
            }
            if current.hash != current.calculate_hash() {
                return Err(ValidationError::HashMismatch { index });
            }
            if current.previous_hash != previous.hash {
                return Err(ValidationError::BrokenLink { index });
            }
            if !meets_difficulty(&current.hash, self.config.difficulty) {
                return Err(ValidationError::InsufficientWork { index });
            }
        }

        Ok(())
    }

    /// Whether [`Blockchain::validate`] passes.
    pub fn is_chain_valid(&self) -> bool {
        match self.validate() {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, "chain validation failed");
                false
            }
        }
    }

    /// Get blockchain statistics.
    pub fn stats(&self) -> Result<BlockchainStats> {
        let latest_block = self.latest_block()?;

        Ok(BlockchainStats {
            height: self.height(),
            latest_block_hash: latest_block.hash,
            latest_timestamp: latest_block.timestamp,
            total_transactions: self.blocks.iter().map(Block::tx_count).sum(),
            pending_transactions: self.mempool.len(),
            difficulty: self.config.difficulty,
        })
    }
}

/// Blockchain statistics.
#[derive(Debug, Clone)]
pub struct BlockchainStats {
    /// Current chain height.
    pub height: u64,
    /// Hash of the latest block.
    pub latest_block_hash: Hash,
    /// Timestamp of the latest block.
    pub latest_timestamp: u64,
    /// Transactions embedded in blocks.
    pub total_transactions: usize,
    /// Number of pending transactions.
    pub pending_transactions: usize,
    /// Proof-of-work difficulty.
    pub difficulty: usize,
}
