//! Item sets.

use crate::{
    grammar::Grammar,
    item::Item,
    types::TerminalSet,
    util::{display_fn, display_terminals},
};
use std::{
    collections::{btree_map, BTreeMap, BTreeSet},
    fmt,
};

/// An item paired with its lookahead symbols.
///
/// Ordered by item first and by lookaheads second.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateItem {
    pub item: Item,
    pub lookaheads: TerminalSet,
}

impl StateItem {
    pub fn new(item: Item, lookaheads: TerminalSet) -> Self {
        Self { item, lookaheads }
    }

    /// Two entries merge into one iff they refer to the same item.
    pub fn is_mergeable(&self, other: &Self) -> bool {
        self.item == other.item
    }
}

/// The set of LR(0) cores of a state.
pub type Cores = BTreeSet<Item>;

/// A set of items with their lookaheads, always kept in merged form:
/// no two entries share the same item.
///
/// Equality, ordering and hashing are structural, so a collection of
/// states can be deduplicated by content.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct State {
    items: BTreeMap<Item, TerminalSet>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state from arbitrary items, unioning the lookaheads of
    /// entries that share the same item.
    pub fn merge<I>(items: I) -> Self
    where
        I: IntoIterator<Item = StateItem>,
    {
        let mut items: Vec<StateItem> = items.into_iter().collect();
        items.sort();

        let mut merged: Vec<StateItem> = Vec::with_capacity(items.len());
        for item in items {
            match merged.last_mut() {
                Some(last) if last.is_mergeable(&item) => {
                    last.lookaheads.union_with(&item.lookaheads);
                }
                _ => merged.push(item),
            }
        }

        Self {
            items: merged
                .into_iter()
                .map(|StateItem { item, lookaheads }| (item, lookaheads))
                .collect(),
        }
    }

    /// Add an item, returning whether the state has changed.
    pub fn insert(&mut self, item: Item, lookaheads: &TerminalSet) -> bool {
        match self.items.entry(item) {
            btree_map::Entry::Vacant(entry) => {
                entry.insert(lookaheads.clone());
                true
            }
            btree_map::Entry::Occupied(mut entry) => entry.get_mut().union_with(lookaheads),
        }
    }

    /// Union the lookaheads of `other` into this state, returning whether
    /// anything has changed.
    pub fn merge_lookaheads(&mut self, other: &State) -> bool {
        let mut changed = false;
        for (item, lookaheads) in other.iter() {
            changed |= self.insert(item, lookaheads);
        }
        changed
    }

    pub fn lookaheads(&self, item: &Item) -> Option<&TerminalSet> {
        self.items.get(item)
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.items.contains_key(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Item, &TerminalSet)> + '_ {
        self.items.iter().map(|(item, lookaheads)| (*item, lookaheads))
    }

    pub fn state_items(&self) -> impl Iterator<Item = StateItem> + '_ {
        self.iter()
            .map(|(item, lookaheads)| StateItem::new(item, lookaheads.clone()))
    }

    pub fn cores(&self) -> Cores {
        self.items.keys().copied().collect()
    }

    pub fn display<'g>(&'g self, g: &'g Grammar) -> impl fmt::Display + 'g {
        display_fn(move |f| {
            for (item, lookaheads) in self.iter() {
                writeln!(
                    f,
                    "- {}  {}",
                    item.display(g),
                    display_terminals(lookaheads, g)
                )?;
            }
            Ok(())
        })
    }
}

impl FromIterator<StateItem> for State {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = StateItem>,
    {
        Self::merge(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{grammar::RuleID, symbol::TerminalID};

    fn la(raw: &[u16]) -> TerminalSet {
        raw.iter().copied().map(TerminalID::from_raw).collect()
    }

    #[test]
    fn merge_unions_lookaheads_of_same_item() {
        let x = Item::new(RuleID::from_raw(1));
        let y = Item::new(RuleID::from_raw(2));
        let state = State::merge(vec![
            StateItem::new(x, la(&[2])),
            StateItem::new(y, la(&[3])),
            StateItem::new(x, la(&[4])),
        ]);

        assert_eq!(state.len(), 2);
        assert_eq!(state.lookaheads(&x), Some(&la(&[2, 4])));
        assert_eq!(state.lookaheads(&y), Some(&la(&[3])));

        let mut seen = std::collections::HashSet::new();
        for item in state.state_items() {
            assert!(seen.insert(item.item), "duplicate item in merged state");
        }
    }

    #[test]
    fn mergeable_iff_same_item() {
        let x = Item::new(RuleID::from_raw(1));
        let y = Item::new(RuleID::from_raw(2));
        assert!(StateItem::new(x, la(&[2])).is_mergeable(&StateItem::new(x, la(&[3]))));
        assert!(!StateItem::new(x, la(&[2])).is_mergeable(&StateItem::new(y, la(&[2]))));

        let merged: State = vec![
            StateItem::new(y, la(&[5])),
            StateItem::new(x, la(&[3])),
            StateItem::new(y, la(&[2])),
            StateItem::new(x, la(&[2])),
        ]
        .into_iter()
        .collect();
        let items: Vec<_> = merged.state_items().collect();
        assert_eq!(
            items,
            [StateItem::new(x, la(&[2, 3])), StateItem::new(y, la(&[2, 5]))]
        );
    }

    #[test]
    fn structural_equality() {
        let x = Item::new(RuleID::from_raw(1));
        let a = State::merge(vec![StateItem::new(x, la(&[2])), StateItem::new(x, la(&[3]))]);
        let b = State::merge(vec![StateItem::new(x, la(&[3, 2]))]);
        assert_eq!(a, b);

        let mut c = State::merge(vec![StateItem::new(x, la(&[2]))]);
        assert_ne!(a, c);
        assert_eq!(a.cores(), c.cores());
        assert!(c.merge_lookaheads(&a));
        assert!(!c.merge_lookaheads(&a));
        assert_eq!(a, c);
    }
}
