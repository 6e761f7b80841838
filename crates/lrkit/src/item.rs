//! Dotted rules.

use crate::{
    first_sets::FirstSets,
    grammar::{Grammar, RuleID},
    symbol::SymbolID,
    types::TerminalSet,
    util::display_fn,
};
use std::fmt;

/// A production rule with a marker position, `[X := Y1 ... @ Yk ... Yn]`.
///
/// `marker == right.len()` means that the item is complete.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Item {
    pub rule: RuleID,
    pub marker: usize,
}

impl Item {
    pub const fn new(rule: RuleID) -> Self {
        Self { rule, marker: 0 }
    }

    /// The symbol just after the marker, if any.
    pub fn next_symbol(&self, g: &Grammar) -> Option<SymbolID> {
        g.rule(self.rule).right().get(self.marker).copied()
    }

    pub fn is_complete(&self, g: &Grammar) -> bool {
        self.marker >= g.rule(self.rule).right().len()
    }

    /// Move the marker over the next symbol, or `None` if the item is complete.
    pub fn advance(&self, g: &Grammar) -> Option<Self> {
        if self.is_complete(g) {
            return None;
        }
        Some(Self {
            rule: self.rule,
            marker: self.marker + 1,
        })
    }

    /// The lookaheads attached to the items derived by closing over the next symbol.
    ///
    /// For `[X := alpha @ Y beta, L]` this is `First(beta) \ {EPSILON}`,
    /// extended by `L` when `beta` is nullable.
    pub fn lookaheads_for_next(
        &self,
        g: &Grammar,
        first_sets: &FirstSets,
        lookaheads: &TerminalSet,
    ) -> TerminalSet {
        let right = g.rule(self.rule).right();
        let beta = right.get(self.marker + 1..).unwrap_or(&[]);
        first_sets.get(beta, lookaheads)
    }

    pub fn display<'g>(&'g self, g: &'g Grammar) -> impl fmt::Display + 'g {
        display_fn(move |f| {
            let rule = g.rule(self.rule);
            write!(f, "[{} :=", g.nonterminals[&rule.left()])?;
            for (i, symbol) in rule.right().iter().enumerate() {
                if i == self.marker {
                    f.write_str(" @")?;
                }
                write!(f, " {}", g.symbol(*symbol))?;
            }
            if self.marker >= rule.right().len() {
                f.write_str(" @")?;
            }
            f.write_str("]")
        })
    }
}
