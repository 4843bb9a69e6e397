// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared references to out-of-band objects.
//!
//! Layer handles, listeners, buffers, and fences live outside this crate and
//! are resolved by the transport. The core only forwards them, so they are
//! modeled as reference-counted handles compared by identity.

use alloc::collections::BTreeSet;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::hash::{Hash, Hasher};

/// Transport-assigned identifier of an out-of-band object.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ObjectId(pub u64);

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

/// A shared-ownership handle to an object owned outside this crate.
///
/// Equality and hashing are by *identity*: two `RemoteRef`s are equal only if
/// they were cloned from the same handle. Two handles created separately with
/// the same [`ObjectId`] are distinct, matching how transports mint a fresh
/// proxy per received reference.
#[derive(Clone)]
pub struct RemoteRef {
    inner: Arc<ObjectId>,
}

impl RemoteRef {
    /// Creates a new handle for the given object.
    #[must_use]
    pub fn new(id: ObjectId) -> Self {
        Self {
            inner: Arc::new(id),
        }
    }

    /// Returns the transport identifier of the referenced object.
    #[inline]
    #[must_use]
    pub fn id(&self) -> ObjectId {
        *self.inner
    }

    /// Returns whether both handles refer to the same object.
    #[inline]
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// Compares two nullable handles; two absent handles are the same.
    #[must_use]
    pub fn same(a: Option<&Self>, b: Option<&Self>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => Self::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Address of the shared allocation, unique among live handles.
    fn addr(&self) -> usize {
        Arc::as_ptr(&self.inner).addr()
    }

    /// Returns the number of live holders of this handle.
    #[must_use]
    pub fn holders(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl PartialEq for RemoteRef {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other)
    }
}

impl Eq for RemoteRef {}

impl Hash for RemoteRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.inner).hash(state);
    }
}

impl fmt::Debug for RemoteRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RemoteRef(#{})", self.inner.0)
    }
}

/// Handles kept in insertion order, with duplicates by identity rejected.
///
/// Membership is looked up by allocation address, so inserting `n` handles
/// costs `O(n log n)`.
#[derive(Clone, Debug, Default)]
pub struct HandleSet {
    handles: Vec<RemoteRef>,
    addrs: BTreeSet<usize>,
}

impl HandleSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            handles: Vec::new(),
            addrs: BTreeSet::new(),
        }
    }

    /// Adds a handle; returns `false` if the same object is already present.
    pub fn insert(&mut self, handle: RemoteRef) -> bool {
        if !self.addrs.insert(handle.addr()) {
            return false;
        }
        self.handles.push(handle);
        true
    }

    /// Returns whether the same object is present.
    #[must_use]
    pub fn contains(&self, handle: &RemoteRef) -> bool {
        self.addrs.contains(&handle.addr())
    }

    /// Handles in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[RemoteRef] {
        &self.handles
    }

    /// Number of handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Removes every handle.
    pub fn clear(&mut self) {
        self.handles.clear();
        self.addrs.clear();
    }
}

impl PartialEq for HandleSet {
    fn eq(&self, other: &Self) -> bool {
        self.handles == other.handles
    }
}

impl Eq for HandleSet {}

impl Extend<RemoteRef> for HandleSet {
    fn extend<I: IntoIterator<Item = RemoteRef>>(&mut self, iter: I) {
        for handle in iter {
            self.insert(handle);
        }
    }
}

impl<'a> IntoIterator for &'a HandleSet {
    type Item = &'a RemoteRef;
    type IntoIter = core::slice::Iter<'a, RemoteRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.handles.iter()
    }
}

impl IntoIterator for HandleSet {
    type Item = RemoteRef;
    type IntoIter = alloc::vec::IntoIter<RemoteRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.handles.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_identity() {
        let a = RemoteRef::new(ObjectId(7));
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(a.holders(), 2);
        assert_eq!(b.id(), ObjectId(7));
    }

    #[test]
    fn same_id_is_not_same_object() {
        let a = RemoteRef::new(ObjectId(7));
        let b = RemoteRef::new(ObjectId(7));
        assert_ne!(a, b);
    }

    #[test]
    fn nullable_comparison() {
        let a = RemoteRef::new(ObjectId(1));
        assert!(RemoteRef::same(None, None));
        assert!(RemoteRef::same(Some(&a), Some(&a.clone())));
        assert!(!RemoteRef::same(Some(&a), None));
        assert!(!RemoteRef::same(None, Some(&a)));
    }

    #[test]
    fn handle_set_keeps_order_and_rejects_clones() {
        let a = RemoteRef::new(ObjectId(1));
        let b = RemoteRef::new(ObjectId(1));
        let mut set = HandleSet::new();
        assert!(set.insert(b.clone()));
        assert!(set.insert(a.clone()));
        assert!(!set.insert(a.clone()));
        assert!(set.contains(&a));
        assert_eq!(set.as_slice(), [b, a]);

        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn handle_set_scales_to_large_batches() {
        let handles: Vec<RemoteRef> = (0..20_000).map(|i| RemoteRef::new(ObjectId(i))).collect();
        let mut set = HandleSet::new();
        set.extend(handles.iter().cloned());
        set.extend(handles.iter().cloned());
        assert_eq!(set.len(), handles.len());
        assert_eq!(set.as_slice(), handles.as_slice());
    }
}
