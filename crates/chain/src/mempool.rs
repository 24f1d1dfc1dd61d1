//! Pending transaction pool.
//!
//! The mempool stores accepted transactions, in submission order, until
//! the next block is mined. Validation happens in the blockchain before a
//! transaction gets here.

use powchain_core::{Address, Transaction};

/// Insertion-ordered pool of pending transactions.
#[derive(Debug, Clone, Default)]
pub struct Mempool {
    transactions: Vec<Transaction>,
}

impl Mempool {
    /// Create an empty mempool.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Append a transaction to the end of the pool.
    pub fn add(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }

    /// Pending transactions in submission order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Drain every pending transaction, preserving order.
    pub fn take(&mut self) -> Vec<Transaction> {
        std::mem::take(&mut self.transactions)
    }

    /// Put back transactions returned by [`Mempool::take`], ahead of anything
    /// submitted since.
    pub fn restore(&mut self, mut transactions: Vec<Transaction>) {
        transactions.append(&mut self.transactions);
        self.transactions = transactions;
    }

    /// Replace the pool contents with a single transaction.
    pub fn reset_with(&mut self, tx: Transaction) {
        self.transactions.clear();
        self.transactions.push(tx);
    }

    /// Total amount `address` has committed to spend in pending transfers.
    pub fn pending_outgoing(&self, address: &Address) -> u64 {
        self.transactions
            .iter()
            .filter(|tx| tx.from.as_ref() == Some(address))
            .map(|tx| tx.amount)
            .fold(0u64, u64::saturating_add)
    }

    /// Clear all transactions from the mempool.
    pub fn clear(&mut self) {
        self.transactions.clear();
    }

    /// Get mempool statistics.
    pub fn stats(&self) -> MempoolStats {
        MempoolStats {
            total_transactions: self.len(),
            reward_transactions: self.transactions.iter().filter(|tx| tx.is_reward()).count(),
            total_amount: self
                .transactions
                .iter()
                .map(|tx| tx.amount)
                .fold(0u64, u64::saturating_add),
        }
    }
}

/// Mempool statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MempoolStats {
    /// Total number of transactions.
    pub total_transactions: usize,
    /// Number of pending mining rewards.
    pub reward_transactions: usize,
    /// Sum of all pending amounts.
    pub total_amount: u64,
}
