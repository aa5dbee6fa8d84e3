//! `hashlock keygen`: create an Ed25519 key file.

use clap::Args;
use hashlock_crypto::KeyPair;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Where to write the hex-encoded secret key.
    #[arg(short, long, default_value = "hashlock.key")]
    pub out: PathBuf,

    /// Overwrite an existing key file.
    #[arg(long)]
    pub force: bool,
}

/// Read a key file written by `keygen`.
pub fn load_keypair(path: &Path) -> anyhow::Result<KeyPair> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read key file {}: {}", path.display(), e))?;
    Ok(KeyPair::from_hex(&contents)?)
}

pub fn run(args: &KeygenArgs) -> anyhow::Result<()> {
    if args.out.exists() && !args.force {
        anyhow::bail!("key file already exists at {} (use --force)", args.out.display());
    }

    let keypair = KeyPair::generate();
    std::fs::write(&args.out, hex::encode(keypair.secret_bytes()))?;

    println!("Key written to {}", args.out.display());
    println!("  Address:  {}", keypair.address());
    Ok(())
}
