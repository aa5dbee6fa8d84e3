//! `hashlock derive-id`: compute a swap identifier locally.

use clap::Args;
use hashlock_core::{Address, SecretHash, SwapParams};

#[derive(Args, Debug)]
pub struct DeriveIdArgs {
    /// Token mint (base58). Defaults to the native currency.
    #[arg(long, default_value_t = Address::NATIVE)]
    pub mint: Address,

    /// Initiator address (base58).
    #[arg(long)]
    pub initiator: Address,

    /// Redeemer address (base58).
    #[arg(long)]
    pub redeemer: Address,

    /// Secret hash (hex).
    #[arg(long)]
    pub secret_hash: SecretHash,

    /// Amount in atomic units.
    #[arg(short, long)]
    pub amount: u64,

    /// Absolute timelock.
    #[arg(short, long)]
    pub timelock: u64,
}

pub fn run(args: &DeriveIdArgs) -> anyhow::Result<()> {
    let params = SwapParams {
        mint: args.mint,
        redeemer: args.redeemer,
        initiator: args.initiator,
        secret_hash: args.secret_hash,
        amount: args.amount,
        timelock: args.timelock,
    };
    println!("{}", params.id());
    Ok(())
}
