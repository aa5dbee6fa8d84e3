use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use hashlock_core::Slot;

/// Source of ledger time. Timelocks are compared against `now()` inside the
/// commit of every operation.
pub trait Clock: Send + Sync {
    fn now(&self) -> Slot;
}

/// Externally driven clock for tests and simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Slot) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    pub fn set(&self, slot: Slot) {
        self.now.store(slot, Ordering::SeqCst);
    }

    /// Move forward by `delta`, saturating at `u64::MAX`.
    pub fn advance(&self, delta: u64) -> Slot {
        let mut current = self.now.load(Ordering::SeqCst);
        loop {
            let next = current.saturating_add(delta);
            match self
                .now
                .compare_exchange(current, next, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return next,
                Err(observed) => current = observed,
            }
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Slot {
        self.now.load(Ordering::SeqCst)
    }
}

/// Slot counter derived from wall time: one slot per `slot_duration` since
/// `genesis`. Never moves backwards.
#[derive(Debug)]
pub struct SlotClock {
    genesis: DateTime<Utc>,
    slot_millis: u64,
    last: AtomicU64,
}

impl SlotClock {
    pub const DEFAULT_SLOT_DURATION: Duration = Duration::from_millis(400);

    pub fn new(genesis: DateTime<Utc>, slot_duration: Duration) -> Self {
        Self {
            genesis,
            slot_millis: (slot_duration.as_millis() as u64).max(1),
            last: AtomicU64::new(0),
        }
    }

    pub fn slot_at(&self, at: DateTime<Utc>) -> Slot {
        let elapsed = (at - self.genesis).num_milliseconds().max(0) as u64;
        elapsed / self.slot_millis
    }
}

impl Clock for SlotClock {
    fn now(&self) -> Slot {
        let slot = self.slot_at(Utc::now());
        self.last.fetch_max(slot, Ordering::SeqCst).max(slot)
    }
}

/// Milliseconds since the UNIX epoch. Never moves backwards.
#[derive(Debug, Default)]
pub struct UnixClock {
    last: AtomicU64,
}

impl UnixClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for UnixClock {
    fn now(&self) -> Slot {
        let millis = Utc::now().timestamp_millis().max(0) as u64;
        self.last.fetch_max(millis, Ordering::SeqCst).max(millis)
    }
}
