//! `hashlock events`: page through the node's event journal.

use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use super::DEFAULT_ENDPOINT;

#[derive(Args, Debug)]
pub struct EventsArgs {
    /// First sequence number to return.
    #[arg(long, default_value_t = 0)]
    pub from: u64,

    /// Maximum number of events.
    #[arg(short, long, default_value_t = 100)]
    pub limit: usize,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Deserialize)]
struct EventsResponse {
    events: Vec<Value>,
    next: u64,
}

pub async fn run(args: &EventsArgs) -> anyhow::Result<()> {
    let path = format!("/events?from={}&limit={}", args.from, args.limit);
    let resp: EventsResponse = super::get(&args.endpoint, &path, "event query").await?;

    for record in &resp.events {
        let event = &record["event"];
        println!(
            "#{:<6} slot {:<10} {:<16} {}",
            record["sequence"],
            record["slot"],
            event["type"].as_str().unwrap_or("?"),
            event["swap_id"].as_str().unwrap_or("?"),
        );
    }
    println!("next: {}", resp.next);
    Ok(())
}
