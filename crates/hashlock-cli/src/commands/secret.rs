//! `hashlock secret`: generate a preimage and its commitment.

use clap::Args;
use hashlock_core::{HashAlgorithm, Secret};
use hashlock_crypto::{commitment, generate_secret};

#[derive(Args, Debug)]
pub struct SecretArgs {
    /// Commitment digest (sha256, blake3).
    #[arg(long, default_value = "sha256")]
    pub hash: HashAlgorithm,

    /// Hash an existing secret instead of generating one.
    #[arg(long)]
    pub secret: Option<Secret>,
}

pub fn run(args: &SecretArgs) -> anyhow::Result<()> {
    let secret = args.secret.clone().unwrap_or_else(generate_secret);
    let secret_hash = commitment(args.hash, &secret);

    println!("  Secret:       {}", secret);
    println!("  Secret hash:  {}", secret_hash);
    println!("  Algorithm:    {}", args.hash);
    println!();
    println!("Share the secret hash. Keep the secret until you redeem.");
    Ok(())
}
