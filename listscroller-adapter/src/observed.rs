use alloc::collections::BTreeMap;

#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap as HandleMap;
#[cfg(feature = "std")]
use std::collections::HashMap as HandleMap;

#[cfg(feature = "std")]
pub trait ItemHandle: core::hash::Hash + Eq + Clone {}
#[cfg(feature = "std")]
impl<T: core::hash::Hash + Eq + Clone> ItemHandle for T {}

#[cfg(not(feature = "std"))]
pub trait ItemHandle: Ord + Clone {}
#[cfg(not(feature = "std"))]
impl<T: Ord + Clone> ItemHandle for T {}

/// Two-way mapping between mounted item handles and their indexes.
///
/// Size reports carry handles; the window controller works with indexes. Entries are removed
/// when the item is unmounted, so a late report for an unmounted item finds nothing.
#[derive(Clone, Debug)]
pub struct ObservedItems<H> {
    by_index: BTreeMap<usize, H>,
    by_handle: HandleMap<H, usize>,
}

impl<H: ItemHandle> ObservedItems<H> {
    pub fn new() -> Self {
        Self {
            by_index: BTreeMap::new(),
            by_handle: HandleMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }

    pub fn insert(&mut self, index: usize, handle: H) {
        if let Some(old) = self.by_index.insert(index, handle.clone()) {
            self.by_handle.remove(&old);
        }
        match self.by_handle.insert(handle, index) {
            Some(stale) if stale != index => {
                self.by_index.remove(&stale);
            }
            _ => {}
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<H> {
        let handle = self.by_index.remove(&index)?;
        self.by_handle.remove(&handle);
        Some(handle)
    }

    pub fn index_of(&self, handle: &H) -> Option<usize> {
        self.by_handle.get(handle).copied()
    }

    pub fn handle(&self, index: usize) -> Option<&H> {
        self.by_index.get(&index)
    }

    /// Mounted items in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &H)> {
        self.by_index.iter().map(|(&i, h)| (i, h))
    }
}

impl<H: ItemHandle> Default for ObservedItems<H> {
    fn default() -> Self {
        Self::new()
    }
}
