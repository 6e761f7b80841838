//! Calculation of the shift/reduce/accept tables from the automaton.

use crate::{
    automaton::{Automaton, Config, StateID},
    grammar::{Grammar, RuleID},
    symbol::{NonterminalID, SymbolID, TerminalID},
    types::Map,
    util::display_fn,
};
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("the grammar has no first rule")]
    MissingFirstRule,

    #[error("the first rule must be `$start := <start symbol>'")]
    MalformedFirstRule,

    #[error("the start symbol {:?} is not declared in the grammar", symbol)]
    UnknownStartSymbol { symbol: NonterminalID },

    #[error("the left-hand side of rule {} is not a declared nonterminal", rule)]
    UnknownLeftSymbol { rule: RuleID },

    #[error("rule {} refers to the undeclared symbol {:?}", rule, symbol)]
    UndeclaredSymbol { rule: RuleID, symbol: SymbolID },
}

/// The action that the LR automaton in a state performs on a particular
/// lookahead symbol.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    /// Read a lookahead symbol and transition to the specified state.
    Shift(StateID),

    /// Reduce to the specified production rule.
    Reduce(RuleID),

    /// Complete the first rule at the end of input.
    Accept(RuleID),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shift(n) => write!(f, "s{}", n),
            Self::Reduce(r) => write!(f, "r{}", r),
            Self::Accept(..) => f.write_str("acc"),
        }
    }
}

#[derive(Debug, Default)]
#[non_exhaustive]
pub struct ParseTableRow {
    /// Actions per lookahead, in the order they were registered.
    pub actions: Map<TerminalID, Vec<Action>>,
    pub gotos: Map<NonterminalID, StateID>,
}

/// A table cell that has more than one action.
#[derive(Debug)]
pub struct Conflict<'t> {
    pub state: StateID,
    pub terminal: TerminalID,
    pub actions: &'t [Action],
}

#[derive(Debug)]
pub struct ParseTable {
    pub states: Map<StateID, ParseTableRow>,
}

impl ParseTable {
    pub fn generate(g: &Grammar) -> Result<Self, TableError> {
        Self::generate_with_config(g, &Config::new())
    }

    pub fn generate_with_config(g: &Grammar, config: &Config) -> Result<Self, TableError> {
        let automaton = Automaton::generate_with_config(g, config)?;
        Ok(Self::from_automaton(g, &automaton))
    }

    /// Derive the tables from a generated automaton.
    ///
    /// For each state the reduce/accept entries of the complete items are
    /// registered first (in item order), followed by the shifts.
    pub fn from_automaton(g: &Grammar, automaton: &Automaton) -> Self {
        let mut states = Map::default();
        for (id, node) in automaton.nodes() {
            let mut row = ParseTableRow::default();

            for (item, lookaheads) in node.item_set.iter() {
                if !item.is_complete(g) {
                    continue;
                }
                for lookahead in lookaheads.iter() {
                    let accepts = item.rule == RuleID::ACCEPT && lookahead == TerminalID::DOLLAR;
                    let action = if accepts {
                        Action::Accept(item.rule)
                    } else {
                        Action::Reduce(item.rule)
                    };
                    row.actions.entry(lookahead).or_default().push(action);
                }
            }

            for (symbol, target) in &node.edges {
                match symbol {
                    SymbolID::T(t) => {
                        row.actions
                            .entry(*t)
                            .or_default()
                            .push(Action::Shift(*target));
                    }
                    SymbolID::N(n) => {
                        row.gotos.insert(*n, *target);
                    }
                }
            }

            states.insert(id, row);
        }

        let table = Self { states };
        tracing::debug!(
            states = table.states.len(),
            conflicts = table.conflicts().count(),
            "parse table generated"
        );
        table
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn row(&self, state: StateID) -> Option<&ParseTableRow> {
        self.states.get(&state)
    }

    /// The actions registered for `(state, lookahead)`. Empty if there is none.
    pub fn actions(&self, state: StateID, lookahead: TerminalID) -> &[Action] {
        self.states
            .get(&state)
            .and_then(|row| row.actions.get(&lookahead))
            .map(|actions| &actions[..])
            .unwrap_or(&[])
    }

    pub fn goto(&self, state: StateID, symbol: NonterminalID) -> Option<StateID> {
        self.states
            .get(&state)
            .and_then(|row| row.gotos.get(&symbol))
            .copied()
    }

    /// The lookaheads that have any action in `state`.
    pub fn expected(&self, state: StateID) -> Vec<TerminalID> {
        self.states
            .get(&state)
            .map(|row| row.actions.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn conflicts(&self) -> impl Iterator<Item = Conflict<'_>> + '_ {
        self.states.iter().flat_map(|(state, row)| {
            row.actions
                .iter()
                .filter(|(_, actions)| actions.len() > 1)
                .map(move |(terminal, actions)| Conflict {
                    state: *state,
                    terminal: *terminal,
                    actions: &actions[..],
                })
        })
    }

    pub fn display<'g>(&'g self, g: &'g Grammar) -> impl fmt::Display + 'g {
        display_fn(move |f| {
            for (i, (id, row)) in self.states.iter().enumerate() {
                if i > 0 {
                    writeln!(f)?;
                }

                writeln!(f, "#### State {:02}", id)?;
                writeln!(f, "## actions")?;
                for (token, actions) in &row.actions {
                    let token = &g.terminals[token];
                    if actions.len() > 1 {
                        writeln!(f, "## conflicted actions on {}", token)?;
                    }
                    for action in actions {
                        match action {
                            Action::Shift(n) => writeln!(f, "- {} => shift({:02})", token, n)?,
                            Action::Reduce(r) => {
                                writeln!(f, "- {} => reduce({})", token, g.rule(*r).display(g))?
                            }
                            Action::Accept(..) => writeln!(f, "- {} => accept", token)?,
                        }
                    }
                }

                writeln!(f, "## gotos")?;
                for (symbol, goto) in &row.gotos {
                    writeln!(f, "- {} => goto({:02})", g.nonterminals[symbol], goto)?;
                }
            }
            Ok(())
        })
    }
}

/// Check the invariants that table construction relies on.
pub fn verify_grammar(g: &Grammar) -> Result<(), TableError> {
    if !g.nonterminals.contains_key(&g.start_symbol) || g.start_symbol == NonterminalID::START {
        return Err(TableError::UnknownStartSymbol {
            symbol: g.start_symbol,
        });
    }

    let first = g.first_rule().ok_or(TableError::MissingFirstRule)?;
    if first.left() != NonterminalID::START || first.right() != [SymbolID::N(g.start_symbol)] {
        return Err(TableError::MalformedFirstRule);
    }

    for (id, rule) in &g.rules {
        if !g.nonterminals.contains_key(&rule.left()) {
            return Err(TableError::UnknownLeftSymbol { rule: *id });
        }
        if rule.left() == NonterminalID::START && *id != RuleID::ACCEPT {
            return Err(TableError::MalformedFirstRule);
        }
        for symbol in rule.right() {
            let declared = match symbol {
                SymbolID::T(t) => g.terminals.contains_key(t),
                SymbolID::N(n) => g.nonterminals.contains_key(n),
            };
            if !declared {
                return Err(TableError::UndeclaredSymbol {
                    rule: *id,
                    symbol: *symbol,
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{symbol::SymbolID::*, test_grammars::balanced};

    #[test]
    fn accept_only_on_first_rule_with_dollar() {
        let grammar = balanced();
        let table = ParseTable::generate(&grammar).unwrap();
        eprintln!("{}", table.display(&grammar));

        let mut accepts = 0;
        for (_, row) in &table.states {
            for (lookahead, actions) in &row.actions {
                for action in actions {
                    if let Action::Accept(rule) = action {
                        assert_eq!(*rule, RuleID::ACCEPT);
                        assert_eq!(*lookahead, TerminalID::DOLLAR);
                        accepts += 1;
                    }
                    if let Action::Reduce(rule) = action {
                        assert_ne!(*rule, RuleID::ACCEPT);
                    }
                }
            }
        }
        assert_eq!(accepts, 1);
        assert_eq!(table.conflicts().count(), 0);
    }

    #[test]
    fn initial_state_reduces_nullable_start() {
        let grammar = balanced();
        let table = ParseTable::generate(&grammar).unwrap();
        let actions = table.actions(StateID::START, TerminalID::DOLLAR);
        assert!(matches!(actions, [Action::Reduce(..)]));
        assert!(table.goto(StateID::START, grammar.start_symbol).is_some());
        assert!(table
            .actions(StateID::START, grammar.terminal_by_name("b").unwrap())
            .is_empty());
    }

    #[test]
    fn reduce_is_registered_before_shift() {
        // E := E x | x | ε  (shift/reduce on `x` in the initial state)
        let grammar = Grammar::define(|g| {
            let x = g.token("x")?;
            let e = g.nonterminal("E")?;
            g.rule(e, [N(e), T(x)])?;
            g.rule(e, [T(x)])?;
            g.rule(e, [])?;
            Ok(())
        })
        .unwrap();
        let table = ParseTable::generate(&grammar).unwrap();
        let x = grammar.terminal_by_name("x").unwrap();
        let actions = table.actions(StateID::START, x);
        assert!(matches!(actions, [Action::Reduce(..), Action::Shift(..)]));

        let conflicts: Vec<_> = table.conflicts().collect();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].state, StateID::START);
        assert_eq!(conflicts[0].terminal, x);
    }

    #[test]
    fn malformed_first_rule_is_rejected() {
        let mut grammar = balanced();
        grammar.rules.shift_remove(&RuleID::ACCEPT);
        assert!(matches!(
            ParseTable::generate(&grammar),
            Err(TableError::MissingFirstRule)
        ));
    }
}
