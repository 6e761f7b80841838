//! CLOSURE and GOTO over item sets.

use crate::{
    first_sets::FirstSets,
    grammar::{Grammar, RuleID},
    item::Item,
    state::State,
    symbol::{NonterminalID, SymbolID, TerminalID},
    types::{Map, TerminalSet},
};

#[derive(Debug)]
pub struct ItemSetBuilder<'g> {
    grammar: &'g Grammar,
    first_sets: FirstSets,
}

impl<'g> ItemSetBuilder<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            first_sets: FirstSets::new(grammar),
        }
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    pub fn first_sets(&self) -> &FirstSets {
        &self.first_sets
    }

    /// `CLOSURE({[$start := @ start, DOLLAR]})`
    pub fn initial_state(&self) -> State {
        let mut state = State::new();
        let lookaheads: TerminalSet = Some(TerminalID::DOLLAR).into_iter().collect();
        state.insert(Item::new(RuleID::ACCEPT), &lookaheads);
        self.closure(state)
    }

    /// Expand the item set until no more items or lookaheads are added.
    pub fn closure(&self, mut state: State) -> State {
        let mut changed = true;
        while changed {
            changed = false;

            // [X := ... @ Y beta, L]  =>  [Y := @ ..., First(beta L)]
            let mut added: Map<NonterminalID, TerminalSet> = Map::default();
            for (item, lookaheads) in state.iter() {
                let y = match item.next_symbol(self.grammar) {
                    Some(SymbolID::N(y)) => y,
                    _ => continue,
                };
                let x = item.lookaheads_for_next(self.grammar, &self.first_sets, lookaheads);
                added.entry(y).or_default().union_with(&x);
            }

            for (y, lookaheads) in added {
                for rule in self.grammar.rules_for(y) {
                    changed |= state.insert(Item::new(rule.id()), &lookaheads);
                }
            }
        }
        state
    }

    /// Close over a bare nonterminal with the given lookaheads.
    pub fn closure_of(&self, symbol: NonterminalID, lookaheads: &TerminalSet) -> State {
        let mut state = State::new();
        for rule in self.grammar.rules_for(symbol) {
            state.insert(Item::new(rule.id()), lookaheads);
        }
        self.closure(state)
    }

    /// `GOTO(state, symbol)`. An empty result means there is no transition.
    pub fn goto(&self, state: &State, symbol: SymbolID) -> State {
        let mut kernel = State::new();
        for (item, lookaheads) in state.iter() {
            if item.next_symbol(self.grammar) != Some(symbol) {
                continue;
            }
            if let Some(next) = item.advance(self.grammar) {
                kernel.insert(next, lookaheads);
            }
        }
        if kernel.is_empty() {
            return kernel;
        }
        self.closure(kernel)
    }

    /// The symbols that have a transition out of `state`, in item order.
    pub fn transition_symbols(&self, state: &State) -> Vec<SymbolID> {
        let mut symbols = Vec::new();
        for (item, _) in state.iter() {
            if let Some(symbol) = item.next_symbol(self.grammar) {
                if !symbols.contains(&symbol) {
                    symbols.push(symbol);
                }
            }
        }
        symbols
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{symbol::SymbolID::*, test_grammars::balanced};

    #[test]
    fn closure_is_idempotent() {
        let grammar = balanced();
        let builder = ItemSetBuilder::new(&grammar);
        let i0 = builder.initial_state();
        assert_eq!(builder.closure(i0.clone()), i0);

        let a = grammar.terminal_by_name("a").unwrap();
        let i1 = builder.goto(&i0, T(a));
        assert!(!i1.is_empty());
        assert_eq!(builder.closure(i1.clone()), i1);
        eprintln!("{}", i1.display(&grammar));
    }

    #[test]
    fn initial_state_contents() {
        let grammar = balanced();
        let builder = ItemSetBuilder::new(&grammar);
        let i0 = builder.initial_state();
        // [$start := @ S], [S := @ a S b], [S := @]
        assert_eq!(i0.len(), 3);
        for (_, lookaheads) in i0.iter() {
            assert_eq!(
                *lookaheads,
                Some(TerminalID::DOLLAR).into_iter().collect::<TerminalSet>()
            );
        }
        let s = grammar.nonterminal_by_name("S").unwrap();
        let dollar: TerminalSet = Some(TerminalID::DOLLAR).into_iter().collect();
        let closed = builder.closure_of(s, &dollar);
        assert_eq!(closed.len(), 2);
    }

    #[test]
    fn goto_on_absent_symbol_is_empty() {
        let grammar = balanced();
        let builder = ItemSetBuilder::new(&grammar);
        let i0 = builder.initial_state();
        let b = grammar.terminal_by_name("b").unwrap();
        assert!(builder.goto(&i0, T(b)).is_empty());
        assert!(builder.goto(&i0, T(TerminalID::DOLLAR)).is_empty());
    }

    #[test]
    fn inner_items_get_inner_lookaheads() {
        let grammar = balanced();
        let builder = ItemSetBuilder::new(&grammar);
        let a = grammar.terminal_by_name("a").unwrap();
        let b = grammar.terminal_by_name("b").unwrap();
        let i1 = builder.goto(&builder.initial_state(), T(a));
        let expected: TerminalSet = Some(b).into_iter().collect();
        let s = grammar.nonterminal_by_name("S").unwrap();
        for rule in grammar.rules_for(s) {
            assert_eq!(i1.lookaheads(&Item::new(rule.id())), Some(&expected));
        }
    }
}
