//! Thread-safe handle to a blockchain.
//!
//! Submission and mining take the write lock; balance queries and
//! validation share the read lock.

use crate::blockchain::{Blockchain, BlockchainStats, Result};
use parking_lot::RwLock;
use powchain_core::{Address, Block, Transaction};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// A cloneable handle sharing one [`Blockchain`] between threads.
#[derive(Debug, Clone)]
pub struct SharedBlockchain {
    inner: Arc<RwLock<Blockchain>>,
}

impl SharedBlockchain {
    pub fn new(blockchain: Blockchain) -> Self {
        Self {
            inner: Arc::new(RwLock::new(blockchain)),
        }
    }

    pub fn add_transaction(&self, tx: Transaction) -> Result<()> {
        self.inner.write().add_transaction(tx)
    }

    /// Mine the pending pool, returning a copy of the new block.
    ///
    /// The write lock is held for the whole search.
    pub fn mine_pending_transactions(&self, reward_address: Address) -> Result<Block> {
        self.inner
            .write()
            .mine_pending_transactions(reward_address)
            .cloned()
    }

    pub fn mine_pending_transactions_with_cancel(
        &self,
        reward_address: Address,
        cancel: &AtomicBool,
    ) -> Result<Block> {
        self.inner
            .write()
            .mine_pending_transactions_with_cancel(reward_address, cancel)
            .cloned()
    }

    pub fn balance_of(&self, address: &Address) -> i128 {
        self.inner.read().balance_of(address)
    }

    pub fn is_chain_valid(&self) -> bool {
        self.inner.read().is_chain_valid()
    }

    pub fn pending_transactions(&self) -> Vec<Transaction> {
        self.inner.read().pending_transactions().to_vec()
    }

    pub fn stats(&self) -> Result<BlockchainStats> {
        self.inner.read().stats()
    }

    /// Run `f` with shared access to the chain.
    pub fn read<R>(&self, f: impl FnOnce(&Blockchain) -> R) -> R {
        f(&self.inner.read())
    }
}

impl From<Blockchain> for SharedBlockchain {
    fn from(blockchain: Blockchain) -> Self {
        Self::new(blockchain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::BlockchainConfig;
    use powchain_core::Keypair;
    use std::thread;

    fn shared(difficulty: usize) -> SharedBlockchain {
        Blockchain::new(BlockchainConfig {
            difficulty,
            ..BlockchainConfig::default()
        })
        .unwrap()
        .into()
    }

    #[test]
    fn test_concurrent_submission() {
        let chain = shared(1);
        let receiver = Keypair::generate().address();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let chain = chain.clone();
                thread::spawn(move || {
                    let keypair = Keypair::generate();
                    for amount in 1..=5 {
                        let tx = Transaction::transfer(keypair.address(), receiver, amount)
                            .signed(&keypair)
                            .unwrap();
                        chain.add_transaction(tx).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(chain.pending_transactions().len(), 40);

        let block = chain
            .mine_pending_transactions(Keypair::generate().address())
            .unwrap();
        assert_eq!(block.tx_count(), 40);
        assert_eq!(chain.balance_of(&receiver), 8 * 15);
        assert!(chain.is_chain_valid());
    }

    #[test]
    fn test_mining_while_submitting() {
        let chain = shared(2);
        let miner = Keypair::generate().address();

        let submitter = {
            let chain = chain.clone();
            thread::spawn(move || {
                let keypair = Keypair::generate();
                for _ in 0..10 {
                    let tx = Transaction::transfer(keypair.address(), miner, 1)
                        .signed(&keypair)
                        .unwrap();
                    chain.add_transaction(tx).unwrap();
                }
            })
        };
        for _ in 0..3 {
            chain.mine_pending_transactions(miner).unwrap();
        }
        submitter.join().unwrap();
        chain.mine_pending_transactions(miner).unwrap();

        // Every transfer and three of the four rewards are confirmed.
        assert_eq!(chain.balance_of(&miner), 10 + 300);
        assert_eq!(chain.read(|bc| bc.height()), 4);
        assert!(chain.is_chain_valid());
    }
}
