// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed layer metadata.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::wire::{Reader, Wire, WireError, Writer};

/// A map from well-known keys to small byte values.
///
/// Values are opaque bytes; the typed accessors store integers
/// little-endian.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayerMetadata {
    map: BTreeMap<u32, Vec<u8>>,
}

impl LayerMetadata {
    /// Owning user id.
    pub const OWNER_UID: u32 = 1;
    /// Window type.
    pub const WINDOW_TYPE: u32 = 2;
    /// Task id.
    pub const TASK_ID: u32 = 3;
    /// Mouse cursor marker.
    pub const MOUSE_CURSOR: u32 = 4;
    /// Accessibility id.
    pub const ACCESSIBILITY_ID: u32 = 5;
    /// Owning process id.
    pub const OWNER_PID: u32 = 6;
    /// Time the buffer was dequeued.
    pub const DEQUEUE_TIME: u32 = 7;
    /// Game mode.
    pub const GAME_MODE: u32 = 8;

    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw value for `key`.
    #[must_use]
    pub fn get(&self, key: u32) -> Option<&[u8]> {
        self.map.get(&key).map(Vec::as_slice)
    }

    /// Stores a raw value.
    pub fn set(&mut self, key: u32, value: Vec<u8>) {
        self.map.insert(key, value);
    }

    /// Removes a key, returning whether it was present.
    pub fn remove(&mut self, key: u32) -> bool {
        self.map.remove(&key).is_some()
    }

    /// Stores a 32-bit integer.
    pub fn set_i32(&mut self, key: u32, value: i32) {
        self.set(key, value.to_le_bytes().to_vec());
    }

    /// Reads a 32-bit integer, or `None` if absent or not 4 bytes.
    #[must_use]
    pub fn get_i32(&self, key: u32) -> Option<i32> {
        let bytes: [u8; 4] = self.get(key)?.try_into().ok()?;
        Some(i32::from_le_bytes(bytes))
    }

    /// Stores a 64-bit integer.
    pub fn set_i64(&mut self, key: u32, value: i64) {
        self.set(key, value.to_le_bytes().to_vec());
    }

    /// Reads a 64-bit integer, or `None` if absent or not 8 bytes.
    #[must_use]
    pub fn get_i64(&self, key: u32) -> Option<i64> {
        let bytes: [u8; 8] = self.get(key)?.try_into().ok()?;
        Some(i64::from_le_bytes(bytes))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[u8])> {
        self.map.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// Folds `other` into `self` key by key and returns whether anything
    /// changed.
    ///
    /// Entries of `other` overwrite same-keyed entries; keys present in only
    /// one map survive. An empty incoming value is never inserted for a new
    /// key. With `erase_empty`, an empty incoming value removes an existing
    /// key instead of overwriting it.
    pub fn merge(&mut self, other: &Self, erase_empty: bool) -> bool {
        let mut changed = false;
        for (key, value) in &other.map {
            let Some(existing) = self.map.get(key) else {
                if !value.is_empty() {
                    self.map.insert(*key, value.clone());
                    changed = true;
                }
                continue;
            };
            if existing == value {
                continue;
            }
            if erase_empty && value.is_empty() {
                self.map.remove(key);
            } else {
                self.map.insert(*key, value.clone());
            }
            changed = true;
        }
        changed
    }
}

impl Wire for LayerMetadata {
    fn write<W: Writer + ?Sized>(&self, out: &mut W) -> Result<(), WireError> {
        out.write_len(self.map.len())?;
        for (key, value) in &self.map {
            out.write_u32(*key)?;
            out.write_blob(value)?;
        }
        Ok(())
    }

    fn read<R: Reader + ?Sized>(input: &mut R) -> Result<Self, WireError> {
        let len = input.read_len()?;
        let mut map = BTreeMap::new();
        for _ in 0..len {
            let key = input.read_u32()?;
            map.insert(key, input.read_blob()?);
        }
        Ok(Self { map })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_accessors() {
        let mut m = LayerMetadata::new();
        m.set_i32(LayerMetadata::OWNER_UID, -7);
        m.set_i64(LayerMetadata::DEQUEUE_TIME, 1 << 40);
        assert_eq!(m.get_i32(LayerMetadata::OWNER_UID), Some(-7));
        assert_eq!(m.get_i64(LayerMetadata::DEQUEUE_TIME), Some(1 << 40));
        assert_eq!(m.get_i64(LayerMetadata::OWNER_UID), None);
        assert_eq!(m.get_i32(LayerMetadata::TASK_ID), None);
    }

    #[test]
    fn merge_is_a_key_wise_union() {
        let mut acc = LayerMetadata::new();
        acc.set_i32(1, 10);
        acc.set_i32(2, 20);
        let mut incoming = LayerMetadata::new();
        incoming.set_i32(2, 21);
        incoming.set_i32(3, 30);

        assert!(acc.merge(&incoming, false));
        assert_eq!(acc.get_i32(1), Some(10));
        assert_eq!(acc.get_i32(2), Some(21));
        assert_eq!(acc.get_i32(3), Some(30));
        assert!(!acc.merge(&incoming, false), "second merge changes nothing");
    }

    #[test]
    fn empty_values_erase_only_when_asked() {
        let mut incoming = LayerMetadata::new();
        incoming.set(1, Vec::new());
        incoming.set(9, Vec::new());

        let mut keep = LayerMetadata::new();
        keep.set_i32(1, 10);
        assert!(keep.merge(&incoming, false));
        assert_eq!(keep.get(1), Some(&[][..]));
        assert_eq!(keep.get(9), None);

        let mut erase = LayerMetadata::new();
        erase.set_i32(1, 10);
        assert!(erase.merge(&incoming, true));
        assert_eq!(erase.get(1), None);
        assert!(erase.is_empty());
    }
}
