//! Keyed record storage with transaction-scoped write batches.
//!
//! A [`RecordStore`] maps addresses to opaque record bytes. Handlers never
//! write to the store directly: they stage every mutation in a [`WriteBatch`]
//! and the dispatch layer commits the batch only after the whole request has
//! succeeded. Dropping an uncommitted batch leaves the store untouched, which
//! is what makes failed requests side-effect free.

use {
    solana_pubkey::Pubkey,
    std::collections::{BTreeMap, HashMap},
};

/// Canonical record storage, keyed by derived address.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: HashMap<Pubkey, Vec<u8>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a record exists at `address`.
    pub fn contains(&self, address: &Pubkey) -> bool {
        self.records.contains_key(address)
    }

    /// Returns the serialized record at `address`, if any.
    pub fn get(&self, address: &Pubkey) -> Option<&[u8]> {
        self.records.get(address).map(Vec::as_slice)
    }

    /// Applies every staged write in `batch` to the store.
    ///
    /// Consumes the batch so a committed batch cannot be replayed.
    pub fn commit(&mut self, batch: WriteBatch) {
        for (address, data) in batch.writes {
            self.records.insert(address, data);
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Staged record writes for a single request.
///
/// Writes accumulate here while a handler runs and only reach the
/// [`RecordStore`] through [`RecordStore::commit`]. Staging the same address
/// twice keeps the last write.
#[derive(Debug, Default)]
pub struct WriteBatch {
    writes: BTreeMap<Pubkey, Vec<u8>>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages the serialized record `data` for `address`.
    pub fn stage(&mut self, address: Pubkey, data: Vec<u8>) {
        self.writes.insert(address, data);
    }

    /// Returns the staged bytes for `address`, if this batch writes it.
    pub fn staged(&self, address: &Pubkey) -> Option<&[u8]> {
        self.writes.get(address).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_applies_all_staged_writes() {
        let mut store = RecordStore::new();
        let first = Pubkey::new_unique();
        let second = Pubkey::new_unique();

        let mut batch = WriteBatch::new();
        batch.stage(first, vec![1]);
        batch.stage(second, vec![2, 2]);
        assert_eq!(batch.len(), 2);

        store.commit(batch);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&first), Some(&[1][..]));
        assert_eq!(store.get(&second), Some(&[2, 2][..]));
    }

    #[test]
    fn test_dropped_batch_leaves_store_unchanged() {
        let mut store = RecordStore::new();
        let address = Pubkey::new_unique();

        {
            let mut batch = WriteBatch::new();
            batch.stage(address, vec![7]);
            // Dropped without commit.
        }

        assert!(store.is_empty());
        assert!(!store.contains(&address));
        assert_eq!(store.get(&address), None);

        let mut batch = WriteBatch::new();
        batch.stage(address, vec![7]);
        store.commit(batch);
        assert!(store.contains(&address));
    }

    #[test]
    fn test_staging_same_address_keeps_last_write() {
        let mut store = RecordStore::new();
        let address = Pubkey::new_unique();

        let mut batch = WriteBatch::new();
        batch.stage(address, vec![1]);
        batch.stage(address, vec![2]);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.staged(&address), Some(&[2][..]));

        store.commit(batch);
        assert_eq!(store.get(&address), Some(&[2][..]));
    }

    #[test]
    fn test_commit_overwrites_existing_records() {
        let mut store = RecordStore::new();
        let address = Pubkey::new_unique();

        let mut batch = WriteBatch::new();
        batch.stage(address, vec![1]);
        store.commit(batch);

        let mut batch = WriteBatch::new();
        batch.stage(address, vec![9, 9]);
        store.commit(batch);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&address), Some(&[9, 9][..]));
    }

    #[test]
    fn test_empty_batch_commit_is_a_no_op() {
        let mut store = RecordStore::new();
        let batch = WriteBatch::new();
        assert!(batch.is_empty());
        store.commit(batch);
        assert!(store.is_empty());
    }
}
