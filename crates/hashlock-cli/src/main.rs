//! Hashlock CLI: command-line interface for hashed timelock swaps.
//!
//! Subcommands: init, keygen, secret, derive-id, status, initiate, redeem,
//! refund, instant-refund, show, balance, events.

mod commands;

use clap::{Parser, Subcommand};

/// Hashlock: hashed timelock escrow for atomic swaps.
#[derive(Parser, Debug)]
#[command(name = "hashlock", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize a new node configuration.
    Init(commands::init::InitArgs),
    /// Generate an Ed25519 key file.
    Keygen(commands::keygen::KeygenArgs),
    /// Generate a swap secret and its commitment.
    Secret(commands::secret::SecretArgs),
    /// Compute a swap identifier from its parameters.
    DeriveId(commands::derive_id::DeriveIdArgs),
    /// Query the status of a running node.
    Status(commands::status::StatusArgs),
    /// Lock funds in a new swap.
    Initiate(commands::initiate::InitiateArgs),
    /// Claim a swap by revealing its secret.
    Redeem(commands::settle::RedeemArgs),
    /// Return an expired swap to its initiator.
    Refund(commands::settle::RefundArgs),
    /// Cancel a swap early with the redeemer's consent.
    InstantRefund(commands::settle::InstantRefundArgs),
    /// Show a swap by identifier.
    Show(commands::show::ShowArgs),
    /// Show an account balance.
    Balance(commands::balance::BalanceArgs),
    /// Page through the event journal.
    Events(commands::events::EventsArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init(args) => commands::init::run(args),
        Commands::Keygen(args) => commands::keygen::run(args),
        Commands::Secret(args) => commands::secret::run(args),
        Commands::DeriveId(args) => commands::derive_id::run(args),
        Commands::Status(args) => commands::status::run(args).await,
        Commands::Initiate(args) => commands::initiate::run(args).await,
        Commands::Redeem(args) => commands::settle::redeem(args).await,
        Commands::Refund(args) => commands::settle::refund(args).await,
        Commands::InstantRefund(args) => commands::settle::instant_refund(args).await,
        Commands::Show(args) => commands::show::run(args).await,
        Commands::Balance(args) => commands::balance::run(args).await,
        Commands::Events(args) => commands::events::run(args).await,
    }
}
