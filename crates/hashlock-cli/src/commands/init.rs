//! `hashlock init`: write a default node configuration.

use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (defaults to current directory).
    #[arg(default_value = ".")]
    pub dir: PathBuf,
}

const DEFAULT_CONFIG: &str = r#"# Hashlock Node Configuration

[api]
listen_addr = "127.0.0.1"
port = 9101

[storage]
data_dir = "./data"

[clock]
kind = "slot"
slot_duration_ms = 400
genesis = "2024-01-01T00:00:00Z"

[logging]
level = "info"
format = "text"

[escrow]
id_reuse = "allow_after_settlement"
hash_algorithm = "sha256"
max_destination_data_len = 1024
rent_per_record = 0

# [[genesis.allocations]]
# owner = "<base58 address>"
# mint = "<base58 mint, omit for native>"
# amount = 1000
"#;

pub fn run(args: &InitArgs) -> anyhow::Result<()> {
    let config_path = args.dir.join("hashlock.toml");

    if config_path.exists() {
        anyhow::bail!("configuration file already exists at {}", config_path.display());
    }

    std::fs::create_dir_all(&args.dir)?;
    std::fs::write(&config_path, DEFAULT_CONFIG)?;
    std::fs::create_dir_all(args.dir.join("data"))?;

    println!("Initialized Hashlock node at {}", config_path.display());
    println!("Add genesis allocations to hashlock.toml, then run 'hashlock-node'.");
    Ok(())
}
