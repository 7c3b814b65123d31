//! Open-addressing name table.
//!
//! Entries are inserted once while the central directory is scanned and
//! never removed, so plain linear probing without tombstones is enough.

use std::sync::Arc;

use xxhash_rust::xxh32::xxh32;

use super::entry::ZipEntry;

const HASH_SEED: u32 = 0;

/// Hash of an entry name, as used for table lookups.
pub fn hash_name(name: &[u8]) -> u32 {
    xxh32(name, HASH_SEED)
}

/// Find `name` in `slots`.
///
/// Returns `Ok(index)` of the slot holding the entry, or `Err(index)` of the
/// first free slot on the probe path when the name is absent. `slots` must
/// contain at least one free slot.
pub fn probe(name: &str, hash: u32, slots: &[Option<Arc<ZipEntry>>]) -> Result<usize, usize> {
    debug_assert!(!slots.is_empty());
    let mut index = hash as usize % slots.len();
    loop {
        match &slots[index] {
            None => return Err(index),
            Some(entry) if entry.name == name => return Ok(index),
            Some(_) => index = (index + 1) % slots.len(),
        }
    }
}

/// Name-keyed hash table over archive entries.
#[derive(Debug)]
pub struct NameTable {
    slots: Box<[Option<Arc<ZipEntry>>]>,
    len: usize,
}

impl NameTable {
    /// Table sized for `expected` entries at a load factor of about 0.5.
    pub fn with_expected(expected: usize) -> Self {
        Self {
            slots: empty_slots(expected.saturating_mul(2).max(2)),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Option<Arc<ZipEntry>>] {
        &self.slots
    }

    pub fn get(&self, name: &str, hash: u32) -> Option<&Arc<ZipEntry>> {
        match probe(name, hash, &self.slots) {
            Ok(index) => self.slots[index].as_ref(),
            Err(_) => None,
        }
    }

    /// Insert `entry` unless its name is already present.
    ///
    /// Returns the rejected entry when the name is taken.
    pub fn insert(&mut self, entry: Arc<ZipEntry>) -> Result<(), Arc<ZipEntry>> {
        if (self.len + 1) * 2 > self.slots.len() {
            self.grow();
        }
        match probe(&entry.name, entry.hash, &self.slots) {
            Ok(_) => Err(entry),
            Err(free) => {
                self.slots[free] = Some(entry);
                self.len += 1;
                Ok(())
            }
        }
    }

    /// Double the table. Only reached when the entry estimate was too low.
    fn grow(&mut self) {
        let new_len = self.slots.len() * 2;
        let old = std::mem::replace(&mut self.slots, empty_slots(new_len));
        for entry in old.into_vec().into_iter().flatten() {
            if let Err(free) = probe(&entry.name, entry.hash, &self.slots) {
                self.slots[free] = Some(entry);
            }
        }
    }
}

fn empty_slots(len: usize) -> Box<[Option<Arc<ZipEntry>>]> {
    std::iter::repeat_with(|| None).take(len).collect()
}
