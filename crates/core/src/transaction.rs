//! Value-transfer transactions and signing.

use crate::crypto::{Address, Keypair, Signature};
use crate::hash::{hash, Hash};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during transaction operations.
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("cannot sign transactions for other wallets")]
    Unauthorized,
    #[error("no signature in this transaction")]
    MissingSignature,
}

/// A signed transfer of `amount` from one address to another.
///
/// A transaction without a sender is a reward (mint) paid out by the chain
/// and is never signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Payer, or `None` for a reward transaction.
    pub from: Option<Address>,
    /// Payee.
    pub to: Option<Address>,
    /// Value to transfer.
    pub amount: u64,
    /// Payer's signature over [`Transaction::calculate_hash`].
    pub signature: Option<Signature>,
}

/// The signed portion of a transaction.
#[derive(Serialize)]
struct UnsignedTransaction<'a> {
    from: &'a Option<Address>,
    to: &'a Option<Address>,
    amount: u64,
}

impl Transaction {
    /// Create an unsigned transfer between two accounts.
    pub fn transfer(from: Address, to: Address, amount: u64) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            amount,
            signature: None,
        }
    }

    /// Create a reward transaction crediting `to`.
    pub fn reward(to: Address, amount: u64) -> Self {
        Self {
            from: None,
            to: Some(to),
            amount,
            signature: None,
        }
    }

    /// Check if this transaction mints new value.
    pub fn is_reward(&self) -> bool {
        self.from.is_none()
    }

    /// Hash of `(from, to, amount)`; this is what gets signed and verified.
    pub fn calculate_hash(&self) -> Hash {
        let unsigned = UnsignedTransaction {
            from: &self.from,
            to: &self.to,
            amount: self.amount,
        };
        let encoded = bincode::serialize(&unsigned).expect("serialization should not fail");
        hash(&encoded)
    }

    /// Hash of the full record, signature included.
    pub fn hash(&self) -> Hash {
        let encoded = bincode::serialize(self).expect("serialization should not fail");
        hash(&encoded)
    }

    /// Sign the transaction with the sender's keypair.
    ///
    /// Fails if the keypair does not belong to `from`.
    pub fn sign(&mut self, keypair: &Keypair) -> Result<(), TransactionError> {
        if self.from != Some(keypair.address()) {
            return Err(TransactionError::Unauthorized);
        }
        self.signature = Some(keypair.sign_hash(&self.calculate_hash()));
        Ok(())
    }

    /// Create a signed transaction.
    pub fn signed(mut self, keypair: &Keypair) -> Result<Self, TransactionError> {
        self.sign(keypair)?;
        Ok(self)
    }

    /// Check the sender's signature.
    ///
    /// Reward transactions are always valid. A payer transaction without a
    /// signature is an error rather than merely invalid.
    pub fn is_valid(&self) -> Result<bool, TransactionError> {
        let Some(from) = self.from else {
            return Ok(true);
        };

        let signature = match &self.signature {
            Some(sig) if !sig.is_empty() => sig,
            _ => return Err(TransactionError::MissingSignature),
        };

        Ok(from.verify(&self.calculate_hash(), signature).is_ok())
    }
}
