//! `hashlock balance`: show an account or vault balance.

use clap::Args;
use hashlock_core::Address;
use serde::Deserialize;

use super::DEFAULT_ENDPOINT;

#[derive(Args, Debug)]
pub struct BalanceArgs {
    /// Account owner (base58). Omit with --vault.
    #[arg(required_unless_present = "vault")]
    pub owner: Option<Address>,

    /// Token mint (base58). Defaults to the native currency.
    #[arg(long, default_value_t = Address::NATIVE)]
    pub mint: Address,

    /// Show the escrow vault's custody instead of an account.
    #[arg(long)]
    pub vault: bool,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Deserialize)]
struct BalanceResponse {
    balance: u64,
}

pub async fn run(args: &BalanceArgs) -> anyhow::Result<()> {
    let path = match (&args.owner, args.vault) {
        (_, true) => format!("/vault/{}", args.mint),
        (Some(owner), false) => format!("/accounts/{}/{}", owner, args.mint),
        (None, false) => anyhow::bail!("an owner address is required"),
    };
    let resp: BalanceResponse = super::get(&args.endpoint, &path, "balance query").await?;
    println!("{}", resp.balance);
    Ok(())
}
