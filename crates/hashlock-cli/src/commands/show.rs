//! `hashlock show`: display a swap.

use clap::Args;
use hashlock_core::SwapId;
use serde_json::Value;

use super::DEFAULT_ENDPOINT;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Swap identifier (hex).
    pub swap_id: SwapId,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

pub async fn run(args: &ShowArgs) -> anyhow::Result<()> {
    let path = format!("/swaps/{}", args.swap_id);
    let body: Value = super::get(&args.endpoint, &path, "lookup").await?;

    match body["status"].as_str() {
        Some("pending") => {
            let swap = &body["swap"];
            println!("Swap {} (pending)", args.swap_id);
            for field in [
                "mint",
                "initiator",
                "funder",
                "redeemer",
                "secret_hash",
                "amount",
                "timelock",
                "hash_algorithm",
                "rent_deposit",
            ] {
                println!("  {:<15} {}", format!("{}:", field), swap[field]);
            }
            if let Some(data) = swap["destination_data"].as_str() {
                println!("  {:<15} {}", "destination:", data);
            }
        }
        Some("closed") => {
            println!("Swap {} (closed)", args.swap_id);
            println!("  Outcome:   {}", body["settlement"]);
            println!("  Slot:      {}", body["slot"]);
            println!("  Sequence:  {}", body["sequence"]);
        }
        _ => println!("{}", serde_json::to_string_pretty(&body)?),
    }
    Ok(())
}
