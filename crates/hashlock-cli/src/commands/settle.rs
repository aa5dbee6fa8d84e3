//! `hashlock redeem`, `refund` and `instant-refund`: close a pending swap.

use clap::Args;
use hashlock_core::{Secret, SwapId};
use hashlock_crypto::sign_instant_refund;
use serde_json::json;
use std::path::PathBuf;

use super::keygen::load_keypair;
use super::{Receipt, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct RedeemArgs {
    /// Swap identifier (hex).
    pub swap_id: SwapId,

    /// The secret opening the swap's commitment (hex).
    #[arg(short, long)]
    pub secret: Secret,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Args, Debug)]
pub struct RefundArgs {
    /// Swap identifier (hex).
    pub swap_id: SwapId,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Args, Debug)]
pub struct InstantRefundArgs {
    /// Swap identifier (hex).
    pub swap_id: SwapId,

    /// The redeemer's key file, used to sign the consent locally.
    #[arg(short, long)]
    pub key: PathBuf,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

pub async fn redeem(args: &RedeemArgs) -> anyhow::Result<()> {
    let path = format!("/swaps/{}/redeem", args.swap_id);
    let body = json!({ "secret": args.secret });
    let receipt: Receipt = super::post(&args.endpoint, &path, &body, "redeem").await?;
    println!("Swap redeemed!");
    receipt.print();
    Ok(())
}

pub async fn refund(args: &RefundArgs) -> anyhow::Result<()> {
    let path = format!("/swaps/{}/refund", args.swap_id);
    let receipt: Receipt = super::post(&args.endpoint, &path, &json!({}), "refund").await?;
    println!("Swap refunded!");
    receipt.print();
    Ok(())
}

pub async fn instant_refund(args: &InstantRefundArgs) -> anyhow::Result<()> {
    let keypair = load_keypair(&args.key)?;
    let signature = sign_instant_refund(&args.swap_id, &keypair);
    println!("Signed consent as {}", keypair.address());

    let path = format!("/swaps/{}/instant-refund", args.swap_id);
    let body = json!({ "signature": signature.to_hex() });
    let receipt: Receipt = super::post(&args.endpoint, &path, &body, "instant refund").await?;
    println!("Swap refunded early!");
    receipt.print();
    Ok(())
}
