//! RocksDB storage backend for the Hashlock node.
//!
//! The `state` column family holds the latest ledger snapshot; `events` is
//! the append-only journal keyed by big-endian sequence number. Both are
//! written in one batch per commit.

use anyhow::Result;
use hashlock_core::EventRecord;
use hashlock_escrow::{CommitHook, EscrowError, LedgerState};
use rocksdb::{ColumnFamilyDescriptor, Direction, IteratorMode, Options, WriteBatch, DB};
use std::path::Path;
use std::sync::Arc;

/// Column family names for different data types.
const CF_EVENTS: &str = "events";
const CF_STATE: &str = "state";

const LEDGER_KEY: &[u8] = b"ledger";

/// RocksDB-backed storage for the Hashlock node.
pub struct Storage {
    db: DB,
}

impl Storage {
    /// Open or create a RocksDB database at the given path with column families.
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)?;

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors = vec![
            ColumnFamilyDescriptor::new(CF_EVENTS, Options::default()),
            ColumnFamilyDescriptor::new(CF_STATE, Options::default()),
        ];

        let db = DB::open_cf_descriptors(&opts, path, cf_descriptors)?;

        Ok(Self { db })
    }

    fn cf(&self, cf_name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(cf_name)
            .ok_or_else(|| anyhow::anyhow!("column family '{}' not found", cf_name))
    }

    fn get(&self, cf_name: &str, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.db.get_cf(self.cf(cf_name)?, key)?)
    }

    /// The last committed ledger snapshot, if any.
    pub fn load_ledger(&self) -> Result<Option<LedgerState>> {
        match self.get(CF_STATE, LEDGER_KEY)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Persist a ledger snapshot together with the events it produced.
    pub fn write_commit(&self, state: &LedgerState, events: &[EventRecord]) -> Result<()> {
        let mut batch = WriteBatch::default();
        batch.put_cf(self.cf(CF_STATE)?, LEDGER_KEY, serde_json::to_vec(state)?);
        let events_cf = self.cf(CF_EVENTS)?;
        for record in events {
            batch.put_cf(events_cf, record.sequence.to_be_bytes(), serde_json::to_vec(record)?);
        }
        self.db.write(batch)?;
        Ok(())
    }

    /// Up to `limit` journal entries starting at sequence `from`.
    pub fn events_from(&self, from: u64, limit: usize) -> Result<Vec<EventRecord>> {
        let start = from.to_be_bytes();
        let iter = self
            .db
            .iterator_cf(self.cf(CF_EVENTS)?, IteratorMode::From(&start, Direction::Forward));
        let mut events = Vec::new();
        for item in iter.take(limit) {
            let (_, value) = item?;
            events.push(serde_json::from_slice(&value)?);
        }
        Ok(events)
    }

    /// The full journal in commit order.
    pub fn all_events(&self) -> Result<Vec<EventRecord>> {
        self.events_from(0, usize::MAX)
    }
}

/// Writes every commit to RocksDB before it becomes visible.
pub struct SnapshotHook {
    storage: Arc<Storage>,
}

impl SnapshotHook {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }
}

impl CommitHook for SnapshotHook {
    fn before_commit(&self, state: &LedgerState, events: &[EventRecord]) -> Result<(), EscrowError> {
        self.storage
            .write_commit(state, events)
            .map_err(|e| EscrowError::Internal(format!("failed to persist commit: {}", e)))
    }
}
