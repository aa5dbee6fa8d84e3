//! Hashlock escrow engine
//!
//! Hashed-timelock escrow over a transactional ledger. A swap is opened by
//! `initiate` and closed by exactly one of `redeem`, `refund` or
//! `instant_refund`. Every operation commits atomically against the
//! [`LedgerStore`]; the engine itself holds no locks.

pub mod error;
pub mod clock;
pub mod accounts;
pub mod registry;
pub mod vault;
pub mod ledger;
pub mod receipt;
pub mod events;
pub mod index;
pub mod engine;

pub use accounts::AccountBook;
pub use clock::{Clock, ManualClock, SlotClock, UnixClock};
pub use engine::EscrowEngine;
pub use error::EscrowError;
pub use events::{EventSink, MemoryEventLog};
pub use index::{SecretBoard, SettlementEntry, SettlementIndex};
pub use ledger::{CommitHook, LedgerState, LedgerStore, Transaction};
pub use receipt::{CommitReceipt, Operation};
pub use registry::SwapRegistry;
pub use vault::TokenVault;
