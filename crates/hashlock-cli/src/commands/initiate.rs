//! `hashlock initiate`: lock funds in a new swap.

use base64::Engine as _;
use clap::Args;
use hashlock_core::{Address, SecretHash};
use serde::Serialize;

use super::{Receipt, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct InitiateArgs {
    /// Token mint (base58). Defaults to the native currency.
    #[arg(long, default_value_t = Address::NATIVE)]
    pub mint: Address,

    /// Initiator address (base58). Receives refunds.
    #[arg(long)]
    pub initiator: Address,

    /// Redeemer address (base58). Receives the funds on redeem.
    #[arg(long)]
    pub redeemer: Address,

    /// Account debited for the escrow, if not the initiator.
    #[arg(long)]
    pub funder: Option<Address>,

    /// Account paying the record's storage deposit, if not the funder.
    #[arg(long)]
    pub rent_sponsor: Option<Address>,

    /// Secret hash (hex).
    #[arg(long)]
    pub secret_hash: SecretHash,

    /// Amount in atomic units.
    #[arg(short, long)]
    pub amount: u64,

    /// Absolute timelock.
    #[arg(short, long, conflicts_with = "expires_in", required_unless_present = "expires_in")]
    pub timelock: Option<u64>,

    /// Timelock relative to the node clock.
    #[arg(long)]
    pub expires_in: Option<u64>,

    /// Opaque destination-leg data (hex).
    #[arg(long)]
    pub destination_data: Option<String>,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Serialize)]
struct InitiateRequest {
    mint: Address,
    initiator: Address,
    redeemer: Address,
    funder: Option<Address>,
    rent_sponsor: Option<Address>,
    secret_hash: SecretHash,
    amount: u64,
    timelock: Option<u64>,
    expires_in: Option<u64>,
    destination_data: Option<String>,
}

fn request_body(args: &InitiateArgs) -> anyhow::Result<InitiateRequest> {
    let destination_data = match &args.destination_data {
        Some(data) => {
            let bytes = hex::decode(data.trim_start_matches("0x"))
                .map_err(|e| anyhow::anyhow!("invalid destination data: {}", e))?;
            Some(base64::engine::general_purpose::STANDARD.encode(bytes))
        }
        None => None,
    };

    Ok(InitiateRequest {
        mint: args.mint,
        initiator: args.initiator,
        redeemer: args.redeemer,
        funder: args.funder,
        rent_sponsor: args.rent_sponsor,
        secret_hash: args.secret_hash,
        amount: args.amount,
        timelock: args.timelock,
        expires_in: args.expires_in,
        destination_data,
    })
}

pub async fn run(args: &InitiateArgs) -> anyhow::Result<()> {
    let body = request_body(args)?;
    let receipt: Receipt = super::post(&args.endpoint, "/swaps", &body, "initiate").await?;
    println!("Swap initiated!");
    receipt.print();
    Ok(())
}
