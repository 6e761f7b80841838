//! Calculation of FIRST and FOLLOW sets.

use crate::{
    grammar::Grammar,
    symbol::{NonterminalID, SymbolID, TerminalID},
    types::{Map, Set, TerminalSet},
};

#[derive(Debug)]
pub struct FirstSets {
    nulls: Set<NonterminalID>,
    map: Map<NonterminalID, TerminalSet>,
}

impl FirstSets {
    pub fn new(grammar: &Grammar) -> Self {
        let nulls = nulls_set(grammar);
        let map = first_sets(grammar, &nulls);
        Self { nulls, map }
    }

    pub fn is_nullable(&self, symbol: SymbolID) -> bool {
        match symbol {
            SymbolID::T(t) => t == TerminalID::EPSILON,
            SymbolID::N(n) => self.nulls.contains(&n),
        }
    }

    /// `First(X)`, containing `EPSILON` iff `X` is nullable.
    pub fn first_of_symbol(&self, symbol: SymbolID) -> TerminalSet {
        match symbol {
            SymbolID::T(t) => Some(t).into_iter().collect(),
            SymbolID::N(n) => {
                let mut set = self.map.get(&n).cloned().unwrap_or_default();
                if self.nulls.contains(&n) {
                    set.insert(TerminalID::EPSILON);
                }
                set
            }
        }
    }

    /// `First(Y1 Y2 ... Yn)`, containing `EPSILON` iff the whole sequence is
    /// nullable (the empty sequence included).
    pub fn first_of_sequence(&self, symbols: &[SymbolID]) -> TerminalSet {
        let mut res = TerminalSet::new();
        let nullable = self.accumulate(symbols, &mut res);
        if nullable {
            res.insert(TerminalID::EPSILON);
        }
        res
    }

    /// `First(beta l1) ∪ ... ∪ First(beta lk)` for the lookaheads `{l1, ..., lk}`.
    pub fn get(&self, beta: &[SymbolID], lookaheads: &TerminalSet) -> TerminalSet {
        let mut res = TerminalSet::new();
        if self.accumulate(beta, &mut res) {
            res.union_with(lookaheads);
        }
        res
    }

    // Adds the non-epsilon part of `First(symbols)` and reports whether the
    // sequence is nullable.
    fn accumulate(&self, symbols: &[SymbolID], res: &mut TerminalSet) -> bool {
        for symbol in symbols {
            match symbol {
                SymbolID::T(TerminalID::EPSILON) => continue,
                SymbolID::T(t) => {
                    res.insert(*t);
                    return false;
                }
                SymbolID::N(n) => {
                    if let Some(first) = self.map.get(n) {
                        res.union_with(first);
                    }
                    if !self.nulls.contains(n) {
                        return false;
                    }
                }
            }
        }
        true
    }
}

/// Calculate the set of nullable symbols in this grammar.
fn nulls_set(grammar: &Grammar) -> Set<NonterminalID> {
    let mut nulls: Set<NonterminalID> = grammar
        .rules
        .values()
        .filter_map(|rule| rule.right().is_empty().then_some(rule.left()))
        .collect();

    let mut changed = true;
    while changed {
        changed = false;
        for rule in grammar.rules.values() {
            if nulls.contains(&rule.left()) {
                continue;
            }
            let is_rhs_nullable = rule.right().iter().all(|symbol| match symbol {
                SymbolID::T(t) => *t == TerminalID::EPSILON,
                SymbolID::N(n) => nulls.contains(n),
            });
            if is_rhs_nullable {
                changed = true;
                nulls.insert(rule.left());
            }
        }
    }

    nulls
}

fn first_sets(grammar: &Grammar, nulls: &Set<NonterminalID>) -> Map<NonterminalID, TerminalSet> {
    let mut map: Map<NonterminalID, TerminalSet> = grammar
        .nonterminals
        .keys()
        .map(|id| (*id, TerminalSet::new()))
        .collect();

    // For each rule `X := Y1 Y2 ... Yn`, let `Yk` be the first non-nullable
    // symbol. Then `First(X) ⊇ First(Yi)` for every `i <= k`.
    #[derive(Debug)]
    enum Constraint {
        Terminal(NonterminalID, TerminalID),
        Subset {
            sup: NonterminalID,
            sub: NonterminalID,
        },
    }
    let mut constraints = vec![];
    for rule in grammar.rules.values() {
        for symbol in rule.right() {
            match *symbol {
                SymbolID::T(TerminalID::EPSILON) => continue,
                SymbolID::T(t) => {
                    constraints.push(Constraint::Terminal(rule.left(), t));
                    break;
                }
                SymbolID::N(n) => {
                    if n != rule.left() {
                        constraints.push(Constraint::Subset {
                            sup: rule.left(),
                            sub: n,
                        });
                    }
                    if !nulls.contains(&n) {
                        break;
                    }
                }
            }
        }
    }

    let mut changed = true;
    while changed {
        changed = false;
        for constraint in &constraints {
            match constraint {
                Constraint::Terminal(sup, t) => {
                    if let Some(set) = map.get_mut(sup) {
                        changed |= set.insert(*t);
                    }
                }
                Constraint::Subset { sup, sub } => {
                    let subset = match map.get(sub) {
                        Some(subset) => subset.clone(),
                        None => continue,
                    };
                    if let Some(superset) = map.get_mut(sup) {
                        changed |= superset.union_with(&subset);
                    }
                }
            }
        }
    }

    map
}

#[derive(Debug)]
pub struct FollowSets {
    map: Map<NonterminalID, TerminalSet>,
}

impl FollowSets {
    pub fn new(grammar: &Grammar, first_sets: &FirstSets) -> Self {
        let mut map: Map<NonterminalID, TerminalSet> = grammar
            .nonterminals
            .keys()
            .map(|id| (*id, TerminalSet::new()))
            .collect();

        let eoi: TerminalSet = Some(TerminalID::DOLLAR).into_iter().collect();
        for n in [NonterminalID::START, grammar.start_symbol] {
            if let Some(set) = map.get_mut(&n) {
                set.union_with(&eoi);
            }
        }

        // `A := alpha B beta`:
        //   Follow(B) ⊇ First(beta) \ {EPSILON}
        //   Follow(B) ⊇ Follow(A)   if beta is nullable
        let mut inherits: Vec<(NonterminalID, NonterminalID)> = vec![];
        for rule in grammar.rules.values() {
            let right = rule.right();
            for (i, symbol) in right.iter().enumerate() {
                let b = match symbol {
                    SymbolID::N(b) => *b,
                    SymbolID::T(..) => continue,
                };
                let mut first = first_sets.first_of_sequence(&right[i + 1..]);
                let nullable = first.remove(TerminalID::EPSILON);
                if let Some(set) = map.get_mut(&b) {
                    set.union_with(&first);
                }
                if nullable && rule.left() != b {
                    inherits.push((rule.left(), b));
                }
            }
        }

        let mut changed = true;
        while changed {
            changed = false;
            for (a, b) in &inherits {
                let follow_a = match map.get(a) {
                    Some(set) => set.clone(),
                    None => continue,
                };
                if let Some(follow_b) = map.get_mut(b) {
                    changed |= follow_b.union_with(&follow_a);
                }
            }
        }

        tracing::trace!(nonterminals = map.len(), "follow sets computed");

        Self { map }
    }

    /// `Follow(A)`.
    pub fn follow(&self, symbol: NonterminalID) -> TerminalSet {
        self.map.get(&symbol).cloned().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NonterminalID, &TerminalSet)> + '_ {
        self.map.iter().map(|(id, set)| (*id, set))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        symbol::{Assoc, Precedence, SymbolID::*, TerminalKind},
        types::TerminalSet,
    };

    fn set(ts: &[TerminalID]) -> TerminalSet {
        ts.iter().copied().collect()
    }

    #[test]
    fn first_of_terminal_is_itself() {
        let grammar = Grammar::define(|g| {
            let a = g.token("a")?;
            let s = g.nonterminal("S")?;
            g.rule(s, [T(a)])?;
            Ok(())
        })
        .unwrap();
        let first = FirstSets::new(&grammar);
        for t in grammar.terminals.keys() {
            assert_eq!(first.first_of_symbol(T(*t)), set(&[*t]));
        }
    }

    #[test]
    fn epsilon_production_is_nullable() {
        let grammar = Grammar::define(|g| {
            let a = g.token("a")?;
            let b = g.token("b")?;
            let s = g.nonterminal("S")?;
            g.rule(s, [T(a), N(s), T(b)])?;
            g.rule(s, [])?;
            Ok(())
        })
        .unwrap();
        let first = FirstSets::new(&grammar);
        let s = grammar.nonterminal_by_name("S").unwrap();
        let a = grammar.terminal_by_name("a").unwrap();
        let b = grammar.terminal_by_name("b").unwrap();

        assert!(first.is_nullable(N(s)));
        assert_eq!(first.first_of_symbol(N(s)), set(&[TerminalID::EPSILON, a]));
        assert_eq!(first.first_of_sequence(&[]), set(&[TerminalID::EPSILON]));
        assert_eq!(first.first_of_sequence(&[N(s), T(b)]), set(&[a, b]));
    }

    #[test]
    fn left_recursion_terminates() {
        let grammar = Grammar::define(|g| {
            let plus = g.terminal(
                "+",
                r"\+",
                TerminalKind::Operator,
                Precedence::new(1, Assoc::Left),
            )?;
            let num = g.terminal(
                "NUM",
                r"[0-9]+",
                TerminalKind::Literal,
                Precedence::default(),
            )?;
            let lparen = g.terminal("(", r"\(", TerminalKind::Separator, Precedence::default())?;
            let rparen = g.terminal(")", r"\)", TerminalKind::Separator, Precedence::default())?;
            let e = g.nonterminal("E")?;
            let t = g.nonterminal("T")?;
            g.rule(e, [N(e), T(plus), N(t)])?;
            g.rule(e, [N(t)])?;
            g.rule(t, [T(num)])?;
            g.rule(t, [T(lparen), N(e), T(rparen)])?;
            Ok(())
        })
        .unwrap();
        let first = FirstSets::new(&grammar);
        let e = grammar.nonterminal_by_name("E").unwrap();
        let t = grammar.nonterminal_by_name("T").unwrap();
        assert_eq!(first.first_of_symbol(N(e)), first.first_of_symbol(N(t)));
        assert_eq!(first.first_of_symbol(N(e)).len(), 2);

        let follow = FollowSets::new(&grammar, &first);
        let expected = set(&[
            TerminalID::DOLLAR,
            grammar.terminal_by_name("+").unwrap(),
            grammar.terminal_by_name(")").unwrap(),
        ]);
        assert_eq!(follow.follow(e), expected);
        assert_eq!(follow.follow(t), expected);
    }

    #[test]
    fn first_unions_all_alternatives() {
        // the non-nullable alternative comes first.
        let grammar = Grammar::define(|g| {
            let x = g.token("x")?;
            let y = g.token("y")?;
            let s = g.nonterminal("S")?;
            g.rule(s, [T(x)])?;
            g.rule(s, [T(y)])?;
            g.rule(s, [])?;
            Ok(())
        })
        .unwrap();
        let first = FirstSets::new(&grammar);
        let s = grammar.nonterminal_by_name("S").unwrap();
        assert_eq!(first.first_of_symbol(N(s)).len(), 3);
    }

    #[test]
    fn follow_with_mutual_recursion() {
        // A := B c | d ;  B := A | e
        let grammar = Grammar::define(|g| {
            let c = g.token("c")?;
            let d = g.token("d")?;
            let e = g.token("e")?;
            let a = g.nonterminal("A")?;
            let b = g.nonterminal("B")?;
            g.rule(a, [N(b), T(c)])?;
            g.rule(a, [T(d)])?;
            g.rule(b, [N(a)])?;
            g.rule(b, [T(e)])?;
            Ok(())
        })
        .unwrap();
        let first = FirstSets::new(&grammar);
        let follow = FollowSets::new(&grammar, &first);
        let a = grammar.nonterminal_by_name("A").unwrap();
        let b = grammar.nonterminal_by_name("B").unwrap();
        let c = grammar.terminal_by_name("c").unwrap();

        assert_eq!(follow.follow(a), set(&[TerminalID::DOLLAR, c]));
        assert_eq!(follow.follow(b), set(&[c]));
    }
}
