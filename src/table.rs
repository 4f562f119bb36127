use std::{iter, mem, slice};

use crate::{TableConfig, TableError, hash::ProbeSequence, prime::next_prime, slot::Slot};

/// A string-keyed hash table using open addressing with double hashing.
///
/// Keys and values are byte sequences copied into the table on insert. The slot count is
/// always prime and follows the base size: insert grows the table once the live load
/// reaches the grow threshold, while search and delete shrink it once the load drops
/// below the shrink threshold. Deleted entries leave tombstones so probe chains through
/// them stay intact.
///
/// Note: This implementation is not thread-safe; mutating calls need exclusive access.
#[derive(Debug, Clone)]
pub struct Table {
    /// The slot array; its length is the capacity
    slots: Box<[Slot]>,
    /// Unscaled capacity requested by the last (re)size
    base_size: usize,
    /// Number of occupied slots
    count: usize,
    /// Number of tombstone slots
    tombstones: usize,
    /// Thresholds and the shrink floor
    config: TableConfig,
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Table {
    /// Creates an empty table with the default configuration
    #[must_use]
    pub fn new() -> Self {
        let config = TableConfig::default();
        // The default base size is prime, so it is used as the capacity directly
        let slots = iter::repeat_with(Slot::default).take(config.base_size).collect();
        log::trace!("created table with {} slots", config.base_size);
        Self { slots, base_size: config.base_size, count: 0, tombstones: 0, config }
    }

    /// Creates an empty table whose initial (and minimum) base size is `base_size`
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidConfig`] if `base_size` is below 2, or
    /// [`TableError::Allocation`] if the slot array cannot be allocated.
    pub fn with_capacity(base_size: usize) -> Result<Self, TableError> {
        Self::with_config(TableConfig::with_base_size(base_size))
    }

    /// Creates an empty table from an explicit configuration
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidConfig`] if the configuration is inconsistent, or
    /// [`TableError::Allocation`] if the slot array cannot be allocated.
    pub fn with_config(config: TableConfig) -> Result<Self, TableError> {
        config.validate()?;
        let table = Self::sized(config, config.base_size)?;
        log::trace!("created table with {} slots", table.capacity());
        Ok(table)
    }

    /// Builds an empty table with `next_prime(base_size)` slots
    fn sized(config: TableConfig, base_size: usize) -> Result<Self, TableError> {
        let capacity = next_prime(base_size).ok_or(TableError::Allocation { slots: base_size })?;
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| TableError::Allocation { slots: capacity })?;
        slots.resize_with(capacity, Slot::default);
        Ok(Self { slots: slots.into_boxed_slice(), base_size, count: 0, tombstones: 0, config })
    }

    /// Inserts a key-value pair.
    ///
    /// The key is not looked up first: inserting a key that is already present adds a
    /// second live entry, and lookups find whichever comes first along the key's probe
    /// sequence. Use [`Table::upsert`] to overwrite instead.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Allocation`] if a triggered resize cannot allocate, or
    /// [`TableError::ProbeExhausted`] if no empty slot is reachable.
    pub fn insert(
        &mut self,
        key: impl AsRef<[u8]>,
        value: impl AsRef<[u8]>,
    ) -> Result<(), TableError> {
        self.grow_if_needed()?;
        self.place(Box::from(key.as_ref()), Box::from(value.as_ref()))
    }

    /// Overwrites the value of the first live entry for `key`, or inserts a new entry.
    ///
    /// Returns the replaced value, if there was one.
    ///
    /// # Errors
    ///
    /// Same as [`Table::insert`].
    pub fn upsert(
        &mut self,
        key: impl AsRef<[u8]>,
        value: impl AsRef<[u8]>,
    ) -> Result<Option<Vec<u8>>, TableError> {
        self.grow_if_needed()?;
        let key = key.as_ref();
        let value: Box<[u8]> = Box::from(value.as_ref());

        if let Some((_, index)) = self.locate(key) {
            if let Some(Slot::Occupied { value: stored, .. }) = self.slots.get_mut(index) {
                return Ok(Some(mem::replace(stored, value).into_vec()));
            }
        }

        self.place(Box::from(key), value)?;
        Ok(None)
    }

    /// Writes an entry into the first empty slot of its probe sequence
    fn place(&mut self, key: Box<[u8]>, value: Box<[u8]>) -> Result<(), TableError> {
        let capacity = self.capacity();
        let slots = &self.slots;
        let index = ProbeSequence::new(&key, capacity)
            .find(|&index| slots.get(index).is_some_and(Slot::is_empty))
            .ok_or(TableError::ProbeExhausted { capacity })?;

        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Slot::Occupied { key, value };
            self.count = self.count.saturating_add(1);
        }
        Ok(())
    }

    /// Looks up `key`, first shrinking the table if its load is below the shrink threshold.
    ///
    /// Use [`Table::get`] for a lookup that never resizes.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Allocation`] if a triggered shrink cannot allocate.
    pub fn search(&mut self, key: impl AsRef<[u8]>) -> Result<Option<&[u8]>, TableError> {
        self.shrink_if_needed()?;
        Ok(self.get(key))
    }

    /// Looks up `key` without any resize check
    #[must_use]
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&[u8]> {
        let (_, index) = self.locate(key.as_ref())?;
        self.slots.get(index)?.entry().map(|(_, value)| value)
    }

    /// Returns true if a live entry for `key` exists
    #[must_use]
    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.locate(key.as_ref()).is_some()
    }

    /// Number of probe attempts needed to reach the live entry for `key`
    #[must_use]
    pub fn probe_length(&self, key: impl AsRef<[u8]>) -> Option<usize> {
        self.locate(key.as_ref()).map(|(attempt, _)| attempt.saturating_add(1))
    }

    /// Removes the first live entry for `key`, leaving a tombstone in its slot.
    ///
    /// The shrink check runs first, as for [`Table::search`]. Returns the removed value.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Allocation`] if a triggered shrink cannot allocate.
    pub fn delete(&mut self, key: impl AsRef<[u8]>) -> Result<Option<Vec<u8>>, TableError> {
        self.shrink_if_needed()?;
        let Some((_, index)) = self.locate(key.as_ref()) else {
            return Ok(None);
        };
        let Some(slot) = self.slots.get_mut(index) else {
            return Ok(None);
        };

        match mem::replace(slot, Slot::Tombstone) {
            Slot::Occupied { value, .. } => {
                self.count = self.count.saturating_sub(1);
                self.tombstones = self.tombstones.saturating_add(1);
                Ok(Some(value.into_vec()))
            }
            other => {
                // locate only returns occupied slots
                *slot = other;
                Ok(None)
            }
        }
    }

    /// Runs the shrink check on its own; returns true if the table was resized
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Allocation`] if the shrink cannot allocate.
    pub fn maintain(&mut self) -> Result<bool, TableError> {
        self.shrink_if_needed()
    }

    /// Walks the probe sequence of `key` and returns the attempt and slot of its live entry
    fn locate(&self, key: &[u8]) -> Option<(usize, usize)> {
        for (attempt, index) in ProbeSequence::new(key, self.capacity()).enumerate() {
            match self.slots.get(index)? {
                Slot::Empty => return None,
                slot if slot.holds(key) => return Some((attempt, index)),
                Slot::Tombstone | Slot::Occupied { .. } => {}
            }
        }
        None
    }

    /// Grows when the live load reaches the grow threshold, or rehashes in place when
    /// tombstones push the used share of slots there
    fn grow_if_needed(&mut self) -> Result<(), TableError> {
        if self.load_percent() >= self.config.grow_percent {
            self.resize_up()?;
        } else if self.used_percent() >= self.config.grow_percent {
            log::debug!("purging {} tombstones from {} slots", self.tombstones, self.capacity());
            self.resize(self.base_size)?;
        }
        Ok(())
    }

    /// Shrinks when the live load is below the shrink threshold
    fn shrink_if_needed(&mut self) -> Result<bool, TableError> {
        if self.load_percent() < self.config.shrink_percent {
            return self.resize_down();
        }
        Ok(false)
    }

    /// Doubles the base size
    fn resize_up(&mut self) -> Result<bool, TableError> {
        self.resize(self.base_size.saturating_mul(2))
    }

    /// Halves the base size
    fn resize_down(&mut self) -> Result<bool, TableError> {
        self.resize(self.base_size / 2)
    }

    /// Rebuilds the table around `new_base_size`, reinserting every live entry.
    ///
    /// Does nothing if `new_base_size` is below the configured floor. Returns true if the
    /// storage was replaced.
    fn resize(&mut self, new_base_size: usize) -> Result<bool, TableError> {
        if new_base_size < self.config.base_size {
            return Ok(false);
        }

        let mut rebuilt = Self::sized(self.config, new_base_size)?;
        for slot in self.slots.iter_mut() {
            if let Slot::Occupied { key, value } = mem::take(slot) {
                rebuilt.place(key, value)?;
            }
        }

        log::debug!(
            "resized table from {} to {} slots ({} live entries)",
            self.capacity(),
            rebuilt.capacity(),
            rebuilt.count
        );
        mem::swap(self, &mut rebuilt);
        Ok(true)
    }

    /// Removes every entry and tombstone, keeping the current capacity
    pub fn clear(&mut self) {
        self.slots.fill(Slot::Empty);
        self.count = 0;
        self.tombstones = 0;
    }

    /// Releases the table along with every key and value it owns
    pub fn destroy(self) {
        log::trace!(
            "destroying table with {} slots and {} live entries",
            self.capacity(),
            self.count
        );
        drop(self);
    }

    /// Returns the number of live entries
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the table holds no live entries
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the number of slots, always prime
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the unscaled capacity requested by the last (re)size
    #[must_use]
    pub const fn base_size(&self) -> usize {
        self.base_size
    }

    /// Returns the number of tombstone slots
    #[must_use]
    pub const fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Returns the configuration the table was built with
    #[must_use]
    pub const fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Live entries as a whole percentage of the capacity, truncated
    #[must_use]
    pub fn load_percent(&self) -> usize {
        self.count.saturating_mul(100).checked_div(self.capacity()).unwrap_or(0)
    }

    /// Live entries plus tombstones as a whole percentage of the capacity, truncated
    fn used_percent(&self) -> usize {
        self.count
            .saturating_add(self.tombstones)
            .saturating_mul(100)
            .checked_div(self.capacity())
            .unwrap_or(0)
    }

    /// Returns an iterator over the live key-value pairs in slot order
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter { slots: self.slots.iter() }
    }

    /// Returns an iterator over the live entries along with their slot index
    pub fn entries(&self) -> impl Iterator<Item = (usize, &[u8], &[u8])> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.entry().map(|(key, value)| (index, key, value)))
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = (&'a [u8], &'a [u8]);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Iterator over the live key-value pairs of a [`Table`]
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    /// Remaining slots to scan
    slots: slice::Iter<'a, Slot>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a [u8], &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.find_map(Slot::entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::probe;
    use proptest::prelude::*;
    use std::collections::HashMap;

    /// Two distinct keys sharing their attempt-0 slot in a table of `capacity` slots
    fn colliding_pair(capacity: usize) -> (String, String) {
        let mut seen: HashMap<usize, String> = HashMap::new();
        for i in 0.. {
            let key = format!("key-{i}");
            let slot = probe(key.as_bytes(), capacity, 0);
            if let Some(first) = seen.get(&slot) {
                return (first.clone(), key);
            }
            seen.insert(slot, key);
        }
        unreachable!()
    }

    #[test]
    fn test_new_table() {
        let table = Table::new();
        assert_eq!(table.capacity(), 53);
        assert_eq!(table.base_size(), 53);
        assert_eq!(table.len(), 0);
        assert!(table.is_empty());
        assert_eq!(table.load_percent(), 0);
    }

    #[test]
    fn test_with_capacity_rounds_to_prime() {
        let table = Table::with_capacity(100).unwrap();
        assert_eq!(table.capacity(), 101);
        assert_eq!(table.base_size(), 100);
        assert!(matches!(Table::with_capacity(1), Err(TableError::InvalidConfig(_))));
    }

    #[test]
    fn test_cat_dog_spider() {
        let mut table = Table::new();
        table.insert("cat", "cats").unwrap();
        table.insert("dog", "dogs").unwrap();
        table.insert("spider", "spiders").unwrap();
        assert_eq!(table.len(), 3);

        assert_eq!(table.search("dog").unwrap(), Some(&b"dogs"[..]));
        assert_eq!(table.delete("cat").unwrap(), Some(b"cats".to_vec()));
        assert_eq!(table.search("cat").unwrap(), None);
        assert_eq!(table.search("spider").unwrap(), Some(&b"spiders"[..]));
        assert_eq!(table.len(), 2);
        assert_eq!(table.capacity(), 53);
    }

    #[test]
    fn test_search_missing_key() {
        let mut table = Table::new();
        table.insert("cat", "cats").unwrap();
        assert_eq!(table.search("bird").unwrap(), None);
        assert_eq!(table.get(""), None);
    }

    #[test]
    fn test_tombstone_keeps_chain() {
        let (first, second) = colliding_pair(53);
        let mut table = Table::new();
        table.insert(&first, "first").unwrap();
        table.insert(&second, "second").unwrap();
        assert_eq!(table.probe_length(&first), Some(1));
        assert!(table.probe_length(&second).unwrap() > 1);

        table.delete(&first).unwrap();
        assert_eq!(table.tombstones(), 1);
        assert_eq!(table.search(&second).unwrap(), Some(&b"second"[..]));
        assert_eq!(table.search(&first).unwrap(), None);
    }

    #[test]
    fn test_insert_skips_tombstones() {
        let (first, second) = colliding_pair(53);
        let mut table = Table::new();
        table.insert(&first, "1").unwrap();
        table.delete(&first).unwrap();
        table.insert(&second, "2").unwrap();

        // The tombstone at the shared start slot is not reused
        assert_eq!(table.tombstones(), 1);
        assert!(table.probe_length(&second).unwrap() > 1);
    }

    #[test]
    fn test_delete_missing_key_keeps_count() {
        let mut table = Table::new();
        table.insert("cat", "cats").unwrap();
        assert_eq!(table.delete("dog").unwrap(), None);
        assert_eq!(table.delete("dog").unwrap(), None);
        assert_eq!(table.len(), 1);
        assert_eq!(table.tombstones(), 0);
    }

    #[test]
    fn test_duplicate_insert_appends() {
        let mut table = Table::new();
        table.insert("key", "v1").unwrap();
        table.insert("key", "v2").unwrap();
        assert_eq!(table.len(), 2);

        // The earlier entry sits first on the probe sequence
        assert_eq!(table.get("key"), Some(&b"v1"[..]));
        assert_eq!(table.delete("key").unwrap(), Some(b"v1".to_vec()));
        assert_eq!(table.get("key"), Some(&b"v2"[..]));
        assert_eq!(table.delete("key").unwrap(), Some(b"v2".to_vec()));
        assert_eq!(table.get("key"), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_upsert_overwrites() {
        let mut table = Table::new();
        assert_eq!(table.upsert("key", "v1").unwrap(), None);
        assert_eq!(table.upsert("key", "v2").unwrap(), Some(b"v1".to_vec()));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("key"), Some(&b"v2"[..]));
    }

    #[test]
    fn test_grows_at_seventy_percent() {
        let mut table = Table::new();
        let mut inserted = 0;
        while table.load_percent() < 70 {
            table.insert(format!("key-{inserted}"), format!("value-{inserted}")).unwrap();
            inserted += 1;
        }
        assert_eq!(inserted, 38);
        assert_eq!(table.capacity(), 53);

        table.insert("one more", "value").unwrap();
        assert_eq!(table.base_size(), 106);
        assert_eq!(table.capacity(), 107);
        assert_eq!(table.len(), inserted + 1);

        for i in 0..inserted {
            let value = format!("value-{i}");
            assert_eq!(table.get(format!("key-{i}")), Some(value.as_bytes()));
        }
        assert_eq!(table.get("one more"), Some(&b"value"[..]));
    }

    #[test]
    fn test_search_shrinks_when_sparse() {
        let mut table = Table::new();
        for i in 0..40 {
            table.insert(format!("key-{i}"), format!("value-{i}")).unwrap();
        }
        assert_eq!(table.capacity(), 107);

        let mut next = 0;
        while table.load_percent() >= 10 {
            table.delete(format!("key-{next}")).unwrap();
            next += 1;
        }
        assert_eq!(table.capacity(), 107);

        // The shrink happens on the next search, never below the initial floor
        table.search("anything").unwrap();
        assert_eq!(table.capacity(), 53);
        assert_eq!(table.base_size(), 53);
        assert_eq!(table.tombstones(), 0);

        for i in next..40 {
            let value = format!("value-{i}");
            assert_eq!(table.search(format!("key-{i}")).unwrap(), Some(value.as_bytes()));
        }
        assert_eq!(table.capacity(), 53);
    }

    #[test]
    fn test_get_never_resizes() {
        let mut table = Table::new();
        for i in 0..40 {
            table.insert(format!("key-{i}"), "v").unwrap();
        }
        // Ten entries remain, just under the shrink threshold
        for i in 0..30 {
            table.delete(format!("key-{i}")).unwrap();
        }
        assert_eq!(table.capacity(), 107);
        assert!(table.load_percent() < 10);

        assert_eq!(table.get("key-39"), Some(&b"v"[..]));
        assert!(table.contains_key("key-39"));
        assert_eq!(table.capacity(), 107);

        assert!(table.maintain().unwrap());
        assert_eq!(table.capacity(), 53);
        assert!(!table.maintain().unwrap());
    }

    #[test]
    fn test_tombstones_are_purged() {
        let mut table = Table::new();
        for i in 0..500 {
            let key = format!("key-{i}");
            table.insert(&key, "v").unwrap();
            assert_eq!(table.delete(&key).unwrap(), Some(b"v".to_vec()));
            assert!(table.tombstones() <= 38);
        }
        assert_eq!(table.capacity(), 53);
        assert!(table.is_empty());
    }

    #[test]
    fn test_custom_thresholds() {
        let config = TableConfig { base_size: 11, grow_percent: 50, shrink_percent: 5 };
        let mut table = Table::with_config(config).unwrap();
        for i in 0..6 {
            table.insert(format!("{i}"), "v").unwrap();
        }
        // 6 of 11 slots is 54%
        assert_eq!(table.capacity(), 11);
        table.insert("6", "v").unwrap();
        assert_eq!(table.capacity(), 23);
        assert_eq!(table.config(), &config);
    }

    #[test]
    fn test_iter_and_entries() {
        let mut table = Table::new();
        table.insert("a", "1").unwrap();
        table.insert("b", "2").unwrap();
        table.insert("c", "3").unwrap();
        table.delete("b").unwrap();

        let mut pairs: Vec<(&[u8], &[u8])> = table.iter().collect();
        pairs.sort_unstable();
        assert_eq!(pairs, vec![(&b"a"[..], &b"1"[..]), (&b"c"[..], &b"3"[..])]);

        for (index, key, _) in table.entries() {
            assert_eq!(probe(key, table.capacity(), 0), index);
        }
        assert_eq!((&table).into_iter().count(), 2);
    }

    #[test]
    fn test_clear_and_destroy() {
        let mut table = Table::new();
        table.insert("cat", "cats").unwrap();
        table.insert("dog", "dogs").unwrap();
        table.delete("dog").unwrap();

        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.tombstones(), 0);
        assert_eq!(table.get("cat"), None);
        assert_eq!(table.capacity(), 53);

        table.insert("cat", "cats").unwrap();
        table.destroy();
    }

    #[test]
    fn test_binary_keys() {
        let mut table = Table::new();
        table.insert([0_u8, 255, 128], [1_u8, 2]).unwrap();
        table.insert(Vec::<u8>::new(), "empty key").unwrap();
        assert_eq!(table.get([0_u8, 255, 128]), Some(&[1_u8, 2][..]));
        assert_eq!(table.get(""), Some(&b"empty key"[..]));
    }

    /// A single operation applied to both the table and a reference map
    #[derive(Debug, Clone)]
    enum Op {
        Upsert(String, String),
        Delete(String),
        Search(String),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        let key = "[a-e]{0,3}";
        prop_oneof![
            (key, "[a-z]{0,4}").prop_map(|(k, v)| Op::Upsert(k, v)),
            key.prop_map(Op::Delete),
            key.prop_map(Op::Search),
        ]
    }

    proptest! {
        #[test]
        fn prop_matches_std_map(ops in proptest::collection::vec(op_strategy(), 0..400)) {
            let mut table = Table::new();
            let mut model: HashMap<String, String> = HashMap::new();

            for op in ops {
                match op {
                    Op::Upsert(key, value) => {
                        let previous = table.upsert(&key, &value).unwrap();
                        prop_assert_eq!(previous, model.insert(key, value).map(String::into_bytes));
                    }
                    Op::Delete(key) => {
                        let removed = table.delete(&key).unwrap();
                        prop_assert_eq!(removed, model.remove(&key).map(String::into_bytes));
                    }
                    Op::Search(key) => {
                        let found = table.search(&key).unwrap().map(<[u8]>::to_vec);
                        prop_assert_eq!(found, model.get(&key).map(|v| v.as_bytes().to_vec()));
                    }
                }
                prop_assert_eq!(table.len(), model.len());
                prop_assert!(table.capacity() >= 53);
            }

            for (key, value) in &model {
                prop_assert_eq!(table.get(key), Some(value.as_bytes()));
            }
        }

        #[test]
        fn prop_inserted_keys_are_found(keys in proptest::collection::hash_set("[ -~]{0,12}", 0..300)) {
            let mut table = Table::new();
            for key in &keys {
                table.insert(key, key.to_uppercase()).unwrap();
            }
            prop_assert_eq!(table.len(), keys.len());
            prop_assert!(table.load_percent() <= 71);
            for key in &keys {
                let expected = key.to_uppercase();
                prop_assert_eq!(table.get(key), Some(expected.as_bytes()));
            }
        }
    }
}
