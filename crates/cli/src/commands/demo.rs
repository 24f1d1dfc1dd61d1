//! Ledger walkthrough command.

use super::config::{load_config, ConfigOverrides};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;
use powchain_chain::Blockchain;
use powchain_core::{Address, Block, Keypair, Transaction};
use std::path::PathBuf;

#[derive(Args)]
pub struct DemoArgs {
    /// JSON config file with difficulty, mining_reward and check_balance
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Leading zero hex digits required of each block hash
    #[arg(short, long)]
    difficulty: Option<usize>,

    /// Amount paid to the miner of each block
    #[arg(short, long)]
    reward: Option<u64>,

    /// Reject transfers the sender cannot cover
    #[arg(long)]
    check_balance: bool,
}

pub fn run(args: DemoArgs) -> Result<()> {
    let overrides = ConfigOverrides {
        difficulty: args.difficulty,
        mining_reward: args.reward,
        check_balance: args.check_balance,
    };
    let config = load_config(args.config.as_deref(), &overrides)?;
    let mut chain = Blockchain::new(config.clone())?;

    let alice = Keypair::generate();
    let bob = Keypair::generate();

    println!("{}", "Wallets:".bold().cyan());
    println!("  Alice: {}", short(&alice.address()).bright_yellow());
    println!("  Bob:   {}", short(&bob.address()).bright_yellow());
    println!();

    println!("{}", "Mining block 1 (reward to Alice)...".bold());
    print_block(chain.mine_pending_transactions(alice.address())?);

    println!("{}", "Mining block 2 (confirms Alice's reward)...".bold());
    print_block(chain.mine_pending_transactions(bob.address())?);

    println!("{}", "Alice sends 30 to Bob".bold());
    let tx = Transaction::transfer(alice.address(), bob.address(), 30)
        .signed(&alice)
        .context("Failed to sign transfer")?;
    chain
        .add_transaction(tx)
        .context("Transfer was rejected")?;
    println!();

    println!("{}", "Mining block 3...".bold());
    print_block(chain.mine_pending_transactions(alice.address())?);

    println!("{}", "Balances:".bold().cyan());
    println!(
        "  Alice: {}",
        chain.balance_of(&alice.address()).to_string().bright_cyan()
    );
    println!(
        "  Bob:   {}",
        chain.balance_of(&bob.address()).to_string().bright_cyan()
    );
    println!();

    print_validity("Chain valid?", chain.is_chain_valid());

    println!("{}", "Tampering with the transfer in block 3...".bold());
    let mut blocks = chain.blocks().to_vec();
    if let Some(tx) = blocks[3].transactions.iter_mut().find(|tx| !tx.is_reward()) {
        tx.amount = 1;
    }
    blocks[3].hash = blocks[3].calculate_hash();
    let tampered = Blockchain::from_blocks(config, blocks)?;

    print_validity("Tampered chain valid?", tampered.is_chain_valid());
    if let Err(err) = tampered.validate() {
        println!("  Reason: {}", err.to_string().bright_black());
        println!();
    }

    Ok(())
}

fn short(address: &Address) -> String {
    format!("{}...", &address.to_hex()[..16])
}

fn print_block(block: &Block) {
    let time = i64::try_from(block.timestamp)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| block.timestamp.to_string());

    println!("  Hash:         {}", block.hash.to_hex().bright_yellow());
    println!("  Previous:     {}", block.previous_hash.to_hex().bright_black());
    println!("  Nonce:        {}", block.nonce.to_string().bright_cyan());
    println!("  Timestamp:    {}", time.bright_black());
    println!(
        "  Transactions: {}",
        block.tx_count().to_string().bright_cyan()
    );
    println!();
}

fn print_validity(label: &str, valid: bool) {
    let verdict = if valid { "yes".green().bold() } else { "no".red().bold() };
    println!("{} {}", label.bold(), verdict);
    println!();
}
