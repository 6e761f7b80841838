//! Grammar types.

use crate::{
    symbol::{
        Assoc, Nonterminal, NonterminalID, Precedence, Symbol, SymbolID, Terminal, TerminalID,
        TerminalKind,
    },
    types::{Map, Set},
    util::display_fn,
};
use std::{borrow::Cow, cmp::Ordering, fmt};

/// The precedence assigned to `EPSILON`.
pub const EPSILON_PRECEDENCE: Precedence = Precedence::new(1, Assoc::Left);

/// The precedence assigned to `DOLLAR`, which is also the fallback
/// precedence of rules without any terminal symbol.
pub const DOLLAR_PRECEDENCE: Precedence = Precedence::new(0, Assoc::Left);

/// The precedence assigned to every nonterminal symbol.
pub const NONTERMINAL_PRECEDENCE: Precedence = Precedence::new(100, Assoc::Right);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct RuleID {
    raw: u16,
}

impl RuleID {
    /// The augmented start rule, `$start := <start symbol>`.
    pub const ACCEPT: Self = Self::from_raw(0);

    const OFFSET: u16 = 1;

    #[inline]
    pub const fn from_raw(raw: u16) -> Self {
        Self { raw }
    }

    #[inline]
    pub const fn into_raw(self) -> u16 {
        self.raw
    }
}

impl fmt::Display for RuleID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.raw, f)
    }
}

/// The type that represents a production rule in grammar.
///
/// Rules are compared by their left-hand side first and then by their
/// right-hand side, lexicographically.
#[derive(Debug, Clone)]
pub struct Rule {
    id: RuleID,
    left: NonterminalID,
    right: Vec<SymbolID>,
}

impl Rule {
    pub fn id(&self) -> RuleID {
        self.id
    }

    /// Return the left-hand side of this production.
    pub fn left(&self) -> NonterminalID {
        self.left
    }

    /// Return the right-hand side of this production.
    ///
    /// An empty slice means an epsilon production.
    pub fn right(&self) -> &[SymbolID] {
        &self.right[..]
    }

    /// The precedence of the rightmost terminal symbol, or that of `DOLLAR`
    /// if the right-hand side has no terminal symbol.
    pub fn precedence(&self, g: &Grammar) -> Precedence {
        self.right
            .iter()
            .rev()
            .find_map(|symbol| match symbol {
                SymbolID::T(t) => g.terminals.get(t).map(|t| t.precedence()),
                SymbolID::N(..) => None,
            })
            .unwrap_or(DOLLAR_PRECEDENCE)
    }

    // `"LHS := R1 R2 R3"`
    pub fn display<'g>(&'g self, g: &'g Grammar) -> impl fmt::Display + 'g {
        display_fn(|f| {
            write!(f, "{} :=", g.nonterminals[&self.left])?;
            if self.right.is_empty() {
                return f.write_str(" ε");
            }
            for symbol in &self.right {
                write!(f, " {}", g.symbol(*symbol))?;
            }
            Ok(())
        })
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.left == other.left && self.right == other.right
    }
}

impl Eq for Rule {}

impl PartialOrd for Rule {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rule {
    fn cmp(&self, other: &Self) -> Ordering {
        Ord::cmp(&self.left, &other.left).then_with(|| self.right.cmp(&other.right))
    }
}

/// The grammar definition used to derive the parser tables.
#[derive(Debug)]
#[non_exhaustive]
pub struct Grammar {
    pub terminals: Map<TerminalID, Terminal>,
    pub skip_terminals: Set<TerminalID>,
    pub nonterminals: Map<NonterminalID, Nonterminal>,
    pub rules: Map<RuleID, Rule>,
    pub start_symbol: NonterminalID,
}

impl Grammar {
    /// Define a grammar using the specified function.
    pub fn define<F>(f: F) -> Result<Self, GrammarDefError>
    where
        F: FnOnce(&mut GrammarDef) -> Result<(), GrammarDefError>,
    {
        let mut def = GrammarDef::default();
        f(&mut def)?;
        def.end()
    }

    /// The augmented start rule, whose completion on `DOLLAR` means acceptance.
    pub fn first_rule(&self) -> Option<&Rule> {
        self.rules.get(&RuleID::ACCEPT)
    }

    pub fn rule(&self, id: RuleID) -> &Rule {
        &self.rules[&id]
    }

    /// Iterate over the production rules whose left-hand side is `left`.
    pub fn rules_for(&self, left: NonterminalID) -> impl Iterator<Item = &Rule> + '_ {
        self.rules.values().filter(move |rule| rule.left == left)
    }

    pub fn symbol(&self, id: SymbolID) -> Symbol<'_> {
        match id {
            SymbolID::T(t) => Symbol::T(&self.terminals[&t]),
            SymbolID::N(n) => Symbol::N(&self.nonterminals[&n]),
        }
    }

    pub fn try_symbol(&self, id: SymbolID) -> Option<Symbol<'_>> {
        match id {
            SymbolID::T(t) => self.terminals.get(&t).map(Symbol::T),
            SymbolID::N(n) => self.nonterminals.get(&n).map(Symbol::N),
        }
    }

    pub fn terminal_by_name(&self, name: &str) -> Option<TerminalID> {
        self.terminals
            .values()
            .find(|t| t.name() == name)
            .map(|t| t.id())
    }

    pub fn nonterminal_by_name(&self, name: &str) -> Option<NonterminalID> {
        self.nonterminals
            .values()
            .find(|n| n.name() == name)
            .map(|n| n.id())
    }

    pub fn is_skip_terminal(&self, id: TerminalID) -> bool {
        self.skip_terminals.contains(&id)
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## terminals:")?;
        for terminal in self.terminals.values() {
            if self.skip_terminals.contains(&terminal.id()) {
                continue;
            }
            writeln!(
                f,
                "{} ({}, pattern={:?}, priority={}, assoc={})",
                terminal,
                terminal.kind(),
                terminal.pattern(),
                terminal.precedence().priority,
                terminal.precedence().assoc,
            )?;
        }

        if !self.skip_terminals.is_empty() {
            writeln!(f, "\n## skip terminals:")?;
            for id in &self.skip_terminals {
                let terminal = &self.terminals[id];
                writeln!(f, "{} (pattern={:?})", terminal, terminal.pattern())?;
            }
        }

        writeln!(f, "\n## nonterminals:")?;
        for nonterminal in self.nonterminals.values() {
            write!(f, "{}", nonterminal)?;
            if nonterminal.id() == self.start_symbol {
                write!(f, " (start)")?;
            }
            writeln!(f)?;
        }

        writeln!(f, "\n## rules:")?;
        for rule in self.rules.values() {
            writeln!(f, "{}", rule.display(self))?;
        }

        Ok(())
    }
}

/// The contextural values for building a `Grammar`.
#[derive(Debug)]
pub struct GrammarDef {
    terminals: Map<TerminalID, Terminal>,
    skip_terminals: Set<TerminalID>,
    nonterminals: Map<NonterminalID, Nonterminal>,
    rules: Map<RuleID, Rule>,
    start: Option<NonterminalID>,
    next_terminal_id: u16,
    next_nonterminal_id: u16,
    next_rule_id: u16,
}

impl Default for GrammarDef {
    fn default() -> Self {
        let mut def = GrammarDef {
            terminals: Map::default(),
            skip_terminals: Set::default(),
            nonterminals: Map::default(),
            rules: Map::default(),
            start: None,
            next_terminal_id: TerminalID::OFFSET,
            next_nonterminal_id: NonterminalID::OFFSET,
            next_rule_id: RuleID::OFFSET,
        };

        def.terminals.insert(
            TerminalID::EPSILON,
            Terminal::reserved(TerminalID::EPSILON, "EPSILON", EPSILON_PRECEDENCE),
        );
        def.terminals.insert(
            TerminalID::DOLLAR,
            Terminal::reserved(TerminalID::DOLLAR, "DOLLAR", DOLLAR_PRECEDENCE),
        );
        def.nonterminals.insert(
            NonterminalID::START,
            Nonterminal {
                id: NonterminalID::START,
                name: Cow::Borrowed("$start"),
                precedence: NONTERMINAL_PRECEDENCE,
            },
        );

        def
    }
}

impl GrammarDef {
    /// Declare a terminal symbol used in this grammar.
    pub fn terminal(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        pattern: impl Into<Cow<'static, str>>,
        kind: TerminalKind,
        precedence: Precedence,
    ) -> Result<TerminalID, GrammarDefError> {
        let name = self.verify_name(name.into())?;
        let id = TerminalID::from_raw(self.next_terminal_id);
        self.next_terminal_id = self
            .next_terminal_id
            .checked_add(1)
            .ok_or(GrammarDefError::TooManySymbols)?;
        self.terminals.insert(
            id,
            Terminal {
                id,
                name,
                pattern: pattern.into(),
                kind,
                precedence,
            },
        );
        Ok(id)
    }

    /// Declare a keyword-like terminal whose pattern is its own name.
    pub fn token(&mut self, name: &'static str) -> Result<TerminalID, GrammarDefError> {
        self.terminal(name, name, TerminalKind::Keyword, Precedence::default())
    }

    /// Declare a terminal symbol that the lexer consumes without emitting.
    pub fn skip_terminal(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        pattern: impl Into<Cow<'static, str>>,
        kind: TerminalKind,
    ) -> Result<TerminalID, GrammarDefError> {
        let id = self.terminal(name, pattern, kind, Precedence::default())?;
        self.skip_terminals.insert(id);
        Ok(id)
    }

    /// Declare a nonterminal symbol used in this grammar.
    pub fn nonterminal(
        &mut self,
        name: impl Into<Cow<'static, str>>,
    ) -> Result<NonterminalID, GrammarDefError> {
        let name = self.verify_name(name.into())?;
        let id = NonterminalID::from_raw(self.next_nonterminal_id);
        self.next_nonterminal_id = self
            .next_nonterminal_id
            .checked_add(1)
            .ok_or(GrammarDefError::TooManySymbols)?;
        self.nonterminals.insert(
            id,
            Nonterminal {
                id,
                name,
                precedence: NONTERMINAL_PRECEDENCE,
            },
        );
        Ok(id)
    }

    /// Specify a production rule into this grammer.
    ///
    /// Occurrences of `EPSILON` on the right-hand side are dropped, so
    /// `[EPSILON]` and `[]` both declare an epsilon production.
    pub fn rule<I>(&mut self, left: NonterminalID, right: I) -> Result<RuleID, GrammarDefError>
    where
        I: IntoIterator<Item = SymbolID>,
    {
        if left == NonterminalID::START {
            return Err(GrammarDefError::ReservedSymbol {
                name: "$start".into(),
            });
        }
        if !self.nonterminals.contains_key(&left) {
            return Err(GrammarDefError::UndeclaredSymbol {
                symbol: SymbolID::N(left),
            });
        }

        let mut right_ = vec![];
        for symbol in right {
            match symbol {
                SymbolID::T(TerminalID::EPSILON) => continue,
                SymbolID::N(NonterminalID::START) => {
                    return Err(GrammarDefError::ReservedSymbol {
                        name: "$start".into(),
                    })
                }
                SymbolID::T(t) if !self.terminals.contains_key(&t) => {
                    return Err(GrammarDefError::UndeclaredSymbol { symbol })
                }
                SymbolID::N(n) if !self.nonterminals.contains_key(&n) => {
                    return Err(GrammarDefError::UndeclaredSymbol { symbol })
                }
                _ => right_.push(symbol),
            }
        }

        if self
            .rules
            .values()
            .any(|rule| rule.left == left && rule.right == right_)
        {
            return Err(GrammarDefError::DuplicateRule {
                left: self.nonterminals[&left].name().to_owned(),
            });
        }

        let id = RuleID::from_raw(self.next_rule_id);
        self.next_rule_id = self
            .next_rule_id
            .checked_add(1)
            .ok_or(GrammarDefError::TooManySymbols)?;
        self.rules.insert(
            id,
            Rule {
                id,
                left,
                right: right_,
            },
        );

        Ok(id)
    }

    /// Specify the start symbol for this grammar.
    pub fn start_symbol(&mut self, symbol: NonterminalID) -> Result<(), GrammarDefError> {
        if symbol == NonterminalID::START || !self.nonterminals.contains_key(&symbol) {
            return Err(GrammarDefError::UndeclaredSymbol {
                symbol: SymbolID::N(symbol),
            });
        }
        self.start.replace(symbol);
        Ok(())
    }

    fn verify_name(&self, name: Cow<'static, str>) -> Result<Cow<'static, str>, GrammarDefError> {
        if name.trim().is_empty() {
            return Err(GrammarDefError::EmptyName);
        }
        let exists = self.terminals.values().any(|t| t.name() == name)
            || self.nonterminals.values().any(|n| n.name() == name);
        if exists {
            return Err(GrammarDefError::DuplicateSymbol {
                name: name.into_owned(),
            });
        }
        Ok(name)
    }

    fn end(mut self) -> Result<Grammar, GrammarDefError> {
        // If no start symbol is specified, the first declared nonterminal is used.
        let start = match self.start.take() {
            Some(start) => start,
            None => self
                .nonterminals
                .keys()
                .find(|id| **id != NonterminalID::START)
                .copied()
                .ok_or(GrammarDefError::NoNonterminals)?,
        };

        let accept = Rule {
            id: RuleID::ACCEPT,
            left: NonterminalID::START,
            right: vec![SymbolID::N(start)],
        };
        // keep the first rule at the head of the rule table.
        self.rules.shift_insert(0, RuleID::ACCEPT, accept);

        tracing::debug!(
            terminals = self.terminals.len(),
            skip_terminals = self.skip_terminals.len(),
            nonterminals = self.nonterminals.len(),
            rules = self.rules.len(),
            "grammar defined"
        );

        Ok(Grammar {
            terminals: self.terminals,
            skip_terminals: self.skip_terminals,
            nonterminals: self.nonterminals,
            rules: self.rules,
            start_symbol: start,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GrammarDefError {
    #[error("the symbol name must not be empty")]
    EmptyName,

    #[error("the symbol `{}' has already been declared", name)]
    DuplicateSymbol { name: String },

    #[error("duplicate production rule detected for `{}'", left)]
    DuplicateRule { left: String },

    #[error("the symbol {:?} is not declared in this grammar", symbol)]
    UndeclaredSymbol { symbol: SymbolID },

    #[error("the reserved symbol `{}' cannot be used in production rules", name)]
    ReservedSymbol { name: String },

    #[error("empty nonterminal symbols")]
    NoNonterminals,

    #[error("too many symbols or rules")]
    TooManySymbols,
}
