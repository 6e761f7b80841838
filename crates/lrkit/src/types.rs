//! Utility types.

use crate::symbol::TerminalID;
use std::{collections::VecDeque, hash::Hash};

type BuildHasher = std::hash::BuildHasherDefault<rustc_hash::FxHasher>;

pub type Map<K, V> = indexmap::IndexMap<K, V, BuildHasher>;
pub type Set<T> = indexmap::IndexSet<T, BuildHasher>;

/// A FIFO work queue that ignores values which are already pending.
#[derive(Debug)]
pub struct Queue<T> {
    queue: VecDeque<T>,
    hash: Set<T>,
}
impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            hash: Set::default(),
        }
    }
}

impl<T> Queue<T>
where
    T: Clone + Eq + Hash,
{
    pub fn push(&mut self, value: T) {
        if self.hash.insert(value.clone()) {
            self.queue.push_back(value);
        }
    }

    pub fn pop(&mut self) -> Option<T> {
        let value = self.queue.pop_front()?;
        self.hash.swap_remove(&value);
        Some(value)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// A set of terminal symbols, used for lookaheads and FIRST/FOLLOW sets.
///
/// The ordering and hashing are structural so that item sets containing
/// lookaheads can be compared and deduplicated as a whole.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TerminalSet {
    inner: bit_set::BitSet,
}

impl TerminalSet {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn contains(&self, id: TerminalID) -> bool {
        self.inner.contains(id.into_raw().into())
    }
    pub fn insert(&mut self, id: TerminalID) -> bool {
        self.inner.insert(id.into_raw().into())
    }
    pub fn remove(&mut self, id: TerminalID) -> bool {
        self.inner.remove(id.into_raw().into())
    }
    /// Add all elements of `other`, returning whether `self` has changed.
    pub fn union_with(&mut self, other: &Self) -> bool {
        if self.inner.is_superset(&other.inner) {
            return false;
        }
        self.inner.union_with(&other.inner);
        true
    }
    pub fn difference_with(&mut self, other: &Self) {
        self.inner.difference_with(&other.inner)
    }
    pub fn is_superset(&self, other: &Self) -> bool {
        self.inner.is_superset(&other.inner)
    }
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.inner.is_disjoint(&other.inner)
    }
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
    pub fn len(&self) -> usize {
        self.inner.len()
    }
    pub fn iter(&self) -> impl Iterator<Item = TerminalID> + '_ {
        self.inner.iter().filter_map(|raw| {
            // every stored bit came from a `u16` terminal id.
            u16::try_from(raw).ok().map(TerminalID::from_raw)
        })
    }
}

impl FromIterator<TerminalID> for TerminalSet {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = TerminalID>,
    {
        Self {
            inner: iter.into_iter().map(|t| t.into_raw().into()).collect(),
        }
    }
}

impl Extend<TerminalID> for TerminalSet {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = TerminalID>,
    {
        for t in iter {
            self.insert(t);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_skips_pending_duplicates() {
        let mut queue = Queue::default();
        queue.push(1);
        queue.push(2);
        queue.push(1);
        assert_eq!(queue.pop(), Some(1));
        queue.push(1);
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(1));
        assert!(queue.is_empty());
    }

    #[test]
    fn terminal_set_union_reports_change() {
        let a = TerminalID::from_raw(3);
        let b = TerminalID::from_raw(7);
        let mut set: TerminalSet = [a].into_iter().collect();
        let other: TerminalSet = [a, b].into_iter().collect();
        assert!(set.union_with(&other));
        assert!(!set.union_with(&other));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![a, b]);
    }
}
