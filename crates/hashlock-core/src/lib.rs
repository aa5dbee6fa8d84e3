//! Hashlock core types.
//!
//! Identities, content-addressed swap identifiers, swap records, the event
//! vocabulary emitted by the escrow engine, and the escrow configuration.

pub mod error;
pub mod types;
pub mod swap;
pub mod events;
pub mod config;

pub use config::{EscrowConfig, IdReusePolicy};
pub use error::CoreError;
pub use events::{EventRecord, Settlement, SwapEvent};
pub use swap::{InitiateRequest, InitiateRequestBuilder, SwapParams, SwapRecord};
pub use types::{Address, HashAlgorithm, Secret, SecretHash, Slot, SwapId, TokenAmount};
