use powchain_chain::{Blockchain, BlockchainConfig, BlockchainError};
use powchain_core::{Block, Keypair, Transaction, TransactionError};

fn chain_with_difficulty(difficulty: usize) -> Blockchain {
    Blockchain::new(BlockchainConfig {
        difficulty,
        ..BlockchainConfig::default()
    })
    .unwrap()
}

#[test]
fn test_signed_transaction_verifies() {
    for _ in 0..10 {
        let keypair = Keypair::generate();
        let tx = Transaction::transfer(keypair.address(), Keypair::generate().address(), 12)
            .signed(&keypair)
            .unwrap();

        let signature = tx.signature.as_ref().unwrap();
        assert!(keypair
            .address()
            .verify(&tx.calculate_hash(), signature)
            .is_ok());
    }
}

#[test]
fn test_signing_for_other_wallet_always_fails() {
    let keys: Vec<_> = (0..4).map(|_| Keypair::generate()).collect();

    for owner in &keys {
        for signer in keys.iter().filter(|k| k.address() != owner.address()) {
            let mut tx = Transaction::transfer(owner.address(), signer.address(), 1);
            assert!(matches!(
                tx.sign(signer),
                Err(TransactionError::Unauthorized)
            ));
        }
    }
}

#[test]
fn test_honest_chain_is_valid() {
    let mut chain = chain_with_difficulty(2);
    let wallets: Vec<_> = (0..3).map(|_| Keypair::generate()).collect();

    for round in 0..5 {
        let miner = &wallets[round % wallets.len()];
        let payee = &wallets[(round + 1) % wallets.len()];
        if chain.balance_of(&miner.address()) > 0 {
            let tx = Transaction::transfer(miner.address(), payee.address(), 10)
                .signed(miner)
                .unwrap();
            chain.add_transaction(tx).unwrap();
        }
        chain.mine_pending_transactions(miner.address()).unwrap();
        assert!(chain.is_chain_valid());
    }

    assert_eq!(chain.height(), 5);
    for pair in chain.blocks().windows(2) {
        assert_eq!(pair[1].previous_hash, pair[0].hash);
        assert!(pair[1].hash.to_hex().starts_with("00"));
    }
}

#[test]
fn test_balance_is_signed_sum() {
    let mut chain = chain_with_difficulty(1);
    let m = Keypair::generate();
    let x = Keypair::generate().address();

    chain.mine_pending_transactions(m.address()).unwrap();
    chain
        .add_transaction(Transaction::transfer(m.address(), x, 30).signed(&m).unwrap())
        .unwrap();
    chain
        .mine_pending_transactions(Keypair::generate().address())
        .unwrap();

    assert_eq!(chain.balance_of(&m.address()), 100 - 30);
    assert_eq!(chain.balance_of(&x), 30);
}

#[test]
fn test_unsigned_payer_rejected_and_pool_unchanged() {
    let mut chain = chain_with_difficulty(1);
    let miner = Keypair::generate().address();
    chain.mine_pending_transactions(miner).unwrap();
    let before = chain.pending_transactions().to_vec();

    let unsigned = Transaction::transfer(
        Keypair::generate().address(),
        Keypair::generate().address(),
        5,
    );
    let err = chain.add_transaction(unsigned).unwrap_err();

    assert!(matches!(
        err,
        BlockchainError::Transaction(TransactionError::MissingSignature)
    ));
    assert_eq!(chain.pending_transactions(), before.as_slice());
}

#[test]
fn test_block_hash_is_deterministic() {
    let mut chain = chain_with_difficulty(1);
    chain
        .mine_pending_transactions(Keypair::generate().address())
        .unwrap();
    let block = chain.latest_block().unwrap();

    assert_eq!(block.calculate_hash(), block.calculate_hash());
    assert_eq!(block.calculate_hash(), block.hash);

    let copy: Block = block.clone();
    assert_eq!(copy.calculate_hash(), block.hash);
}

#[test]
fn test_genesis_is_shared_by_all_chains() {
    let a = chain_with_difficulty(0);
    let b = chain_with_difficulty(3);

    assert_eq!(a.blocks()[0], b.blocks()[0]);
    assert_eq!(a.blocks()[0], Blockchain::create_genesis_block());
}
