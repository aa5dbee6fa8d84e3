pub mod balance;
pub mod derive_id;
pub mod events;
pub mod init;
pub mod initiate;
pub mod keygen;
pub mod secret;
pub mod settle;
pub mod show;
pub mod status;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:9101";

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
    kind: String,
}

/// Receipt returned by the four escrow operations.
#[derive(Deserialize)]
pub struct Receipt {
    pub receipt_id: String,
    pub swap_id: String,
    pub operation: String,
    pub mint: String,
    pub amount: u64,
    pub party: String,
    pub slot: u64,
}

impl Receipt {
    pub fn print(&self) {
        println!("  Receipt:    {}", self.receipt_id);
        println!("  Swap ID:    {}", self.swap_id);
        println!("  Operation:  {}", self.operation);
        println!("  Mint:       {}", self.mint);
        println!("  Amount:     {}", self.amount);
        println!("  Party:      {}", self.party);
        println!("  Slot:       {}", self.slot);
    }
}

async fn decode<R: DeserializeOwned>(what: &str, resp: reqwest::Response) -> anyhow::Result<R> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }
    match resp.json::<ErrorResponse>().await {
        Ok(err) => anyhow::bail!("{} failed (HTTP {}, {}): {}", what, status, err.kind, err.error),
        Err(_) => anyhow::bail!("{} failed (HTTP {})", what, status),
    }
}

fn unreachable_node(endpoint: &str, err: reqwest::Error) -> anyhow::Error {
    anyhow::anyhow!(
        "could not reach node at {}: {}\nIs the node running? Start it with: hashlock-node",
        endpoint,
        err
    )
}

pub async fn get<R: DeserializeOwned>(endpoint: &str, path: &str, what: &str) -> anyhow::Result<R> {
    let url = format!("{}/api/v1{}", endpoint, path);
    let resp = reqwest::get(&url)
        .await
        .map_err(|e| unreachable_node(endpoint, e))?;
    decode(what, resp).await
}

pub async fn post<B: Serialize, R: DeserializeOwned>(
    endpoint: &str,
    path: &str,
    body: &B,
    what: &str,
) -> anyhow::Result<R> {
    let url = format!("{}/api/v1{}", endpoint, path);
    let client = reqwest::Client::new();
    let resp = client
        .post(&url)
        .json(body)
        .send()
        .await
        .map_err(|e| unreachable_node(endpoint, e))?;
    decode(what, resp).await
}
