//! `hashlock status`: query the status of a running node.

use clap::Args;
use serde::Deserialize;

use super::DEFAULT_ENDPOINT;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Deserialize)]
struct StatusResponse {
    version: String,
    clock: String,
    now: u64,
    pending_swaps: usize,
    uptime_secs: u64,
}

pub async fn run(args: &StatusArgs) -> anyhow::Result<()> {
    let status: StatusResponse = super::get(&args.endpoint, "/status", "status").await?;
    println!("Node Status:");
    println!("  Version:    {}", status.version);
    println!("  Clock:      {} ({})", status.now, status.clock);
    println!("  Pending:    {}", status.pending_swaps);
    println!("  Uptime:     {}s", status.uptime_secs);
    Ok(())
}
