//! Keypair generation command.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use powchain_core::Keypair;
use std::fs;
use std::path::PathBuf;

#[derive(Args)]
pub struct KeygenArgs {
    /// Write the keypair as JSON to this file
    #[arg(short, long)]
    out: Option<PathBuf>,
}

pub fn run(args: KeygenArgs) -> Result<()> {
    let keypair = Keypair::generate();
    let address = keypair.address();

    println!("{}", "Generated new keypair:".bold().cyan());
    println!();
    println!("  Address:     {}", address.to_hex().bright_yellow());
    println!(
        "  Private Key: {}",
        hex::encode(keypair.private_key()).bright_black()
    );

    if let Some(path) = args.out {
        if path.exists() {
            bail!("Refusing to overwrite existing file: {}", path.display());
        }

        let key_json = serde_json::json!({
            "address": address.to_hex(),
            "private_key": hex::encode(keypair.private_key()),
        });
        fs::write(&path, serde_json::to_string_pretty(&key_json)?)
            .with_context(|| format!("Failed to write keypair to {}", path.display()))?;

        println!();
        println!(
            "{}  Saved to: {}",
            "✓".green().bold(),
            path.display().to_string().bright_black()
        );
    }

    println!();
    println!("{}", "Keep your private key safe!".yellow().bold());

    Ok(())
}
