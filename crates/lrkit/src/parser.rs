//! The shift-reduce driver.

use crate::{
    ast::AstNode,
    automaton::{Automaton, Config, StateID},
    grammar::{Grammar, RuleID},
    symbol::{NonterminalID, SymbolID, TerminalID},
    table::{Action, ParseTable, TableError},
    token::Token,
    util::display_fn,
};
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error(
        "unexpected token `{}' ({:?}) at {}:{} in state {}, expected one of: {}",
        terminal, lexeme, line, column, state, .expected.join(", ")
    )]
    UnexpectedToken {
        state: StateID,
        terminal: String,
        lexeme: String,
        line: usize,
        column: usize,
        expected: Vec<String>,
    },

    #[error("no goto entry for `{}' in state {} after reducing rule {}", nonterminal, state, rule)]
    MissingGotoAfterReduce {
        state: StateID,
        nonterminal: String,
        rule: RuleID,
    },

    #[error("input ended at {}:{} in state {} before it was accepted", line, column, state)]
    PrematureEndOfInput {
        state: StateID,
        line: usize,
        column: usize,
    },

    #[error("the parser stack is exhausted")]
    StackUnderflow,
}

/// A parser built from a grammar, owning the grammar and its tables.
#[derive(Debug)]
pub struct Parser {
    grammar: Grammar,
    automaton: Automaton,
    table: ParseTable,
}

impl Parser {
    pub fn new(grammar: Grammar) -> Result<Self, TableError> {
        Self::with_config(grammar, &Config::new())
    }

    pub fn with_config(grammar: Grammar, config: &Config) -> Result<Self, TableError> {
        let automaton = Automaton::generate_with_config(&grammar, config)?;
        let table = ParseTable::from_automaton(&grammar, &automaton);
        tracing::debug!(states = table.len(), "parser constructed");
        Ok(Self {
            grammar,
            automaton,
            table,
        })
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    pub fn table(&self) -> &ParseTable {
        &self.table
    }

    /// Parse the token stream into a syntax tree.
    ///
    /// The stream must end with a `DOLLAR` token; tokens of skip terminals
    /// are ignored.
    pub fn parse<I>(&self, tokens: I) -> Result<AstNode, ParseError>
    where
        I: IntoIterator<Item = Token>,
    {
        let mut driver = Driver {
            parser: self,
            states: vec![StateID::START],
            symbols: vec![],
            nodes: vec![],
            position: (1, 1),
        };

        for token in tokens {
            driver.position = (token.line, token.column);
            if self.grammar.is_skip_terminal(token.terminal) {
                continue;
            }
            if let Some(root) = driver.feed(token)? {
                return Ok(root);
            }
        }

        let (line, column) = driver.position;
        Err(ParseError::PrematureEndOfInput {
            state: *driver.states.last().ok_or(ParseError::StackUnderflow)?,
            line,
            column,
        })
    }

    /// A tabular dump of the action and goto tables.
    pub fn summary(&self) -> impl fmt::Display + '_ {
        display_fn(move |f| {
            let g = &self.grammar;
            let terminals: Vec<TerminalID> = g
                .terminals
                .keys()
                .copied()
                .filter(|t| *t != TerminalID::EPSILON && !g.is_skip_terminal(*t))
                .collect();
            let nonterminals: Vec<NonterminalID> = g
                .nonterminals
                .keys()
                .copied()
                .filter(|n| *n != NonterminalID::START)
                .collect();

            let mut header = vec!["state".to_owned()];
            header.extend(terminals.iter().map(|t| g.terminals[t].name().to_owned()));
            header.extend(nonterminals.iter().map(|n| g.nonterminals[n].name().to_owned()));

            let mut rows = vec![];
            for (id, row) in &self.table.states {
                let mut cells = vec![id.to_string()];
                for t in &terminals {
                    let cell = row
                        .actions
                        .get(t)
                        .map(|actions| {
                            actions
                                .iter()
                                .map(|a| a.to_string())
                                .collect::<Vec<_>>()
                                .join("/")
                        })
                        .unwrap_or_default();
                    cells.push(cell);
                }
                for n in &nonterminals {
                    cells.push(row.gotos.get(n).map(|s| s.to_string()).unwrap_or_default());
                }
                rows.push(cells);
            }

            let widths: Vec<usize> = (0..header.len())
                .map(|i| {
                    rows.iter()
                        .map(|cells| cells[i].chars().count())
                        .chain(Some(header[i].chars().count()))
                        .max()
                        .unwrap_or(0)
                })
                .collect();

            writeln!(f, "states: {}", self.table.len())?;
            for cells in Some(&header).into_iter().chain(&rows) {
                for (i, cell) in cells.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{:<width$}", cell, width = widths[i])?;
                }
                writeln!(f)?;
            }
            Ok(())
        })
    }
}

struct Driver<'p> {
    parser: &'p Parser,
    states: Vec<StateID>,
    symbols: Vec<SymbolID>,
    nodes: Vec<AstNode>,
    /// Position of the last token seen.
    position: (usize, usize),
}

impl Driver<'_> {
    /// Process a token, returning the root node once the input is accepted.
    fn feed(&mut self, token: Token) -> Result<Option<AstNode>, ParseError> {
        let parser = self.parser;
        let g = &parser.grammar;
        let table = &parser.table;

        loop {
            let state = *self.states.last().ok_or(ParseError::StackUnderflow)?;

            // the first registered action wins.
            let action = match table.actions(state, token.terminal).first() {
                Some(action) => *action,
                None => return Err(self.unexpected(state, &token)),
            };
            tracing::trace!(
                state = %state,
                token = %g.terminals[&token.terminal],
                action = %action,
                "step"
            );

            match action {
                Action::Shift(next) => {
                    self.states.push(next);
                    self.symbols.push(SymbolID::T(token.terminal));
                    self.nodes.push(AstNode::leaf(token));
                    return Ok(None);
                }

                Action::Reduce(rule_id) => {
                    let rule = g.rule(rule_id);
                    let n = rule.right().len();
                    if self.states.len() <= n || self.nodes.len() < n || self.symbols.len() < n {
                        return Err(ParseError::StackUnderflow);
                    }
                    self.states.truncate(self.states.len() - n);
                    self.symbols.truncate(self.symbols.len() - n);
                    let children = self.nodes.split_off(self.nodes.len() - n);

                    let top = *self.states.last().ok_or(ParseError::StackUnderflow)?;
                    let next = table.goto(top, rule.left()).ok_or_else(|| {
                        ParseError::MissingGotoAfterReduce {
                            state: top,
                            nonterminal: g.nonterminals[&rule.left()].name().to_owned(),
                            rule: rule_id,
                        }
                    })?;

                    self.states.push(next);
                    self.symbols.push(SymbolID::N(rule.left()));
                    self.nodes
                        .push(AstNode::node(SymbolID::N(rule.left()), children));
                    // re-evaluate the current token in the new state.
                }

                Action::Accept(..) => {
                    return self.nodes.pop().map(Some).ok_or(ParseError::StackUnderflow);
                }
            }
        }
    }

    fn unexpected(&self, state: StateID, token: &Token) -> ParseError {
        let g = &self.parser.grammar;
        let name = |t: &TerminalID| {
            g.terminals
                .get(t)
                .map_or_else(|| format!("#{}", t.into_raw()), |t| t.name().to_owned())
        };
        ParseError::UnexpectedToken {
            state,
            terminal: name(&token.terminal),
            lexeme: token.lexeme.clone(),
            line: token.line,
            column: token.column,
            expected: self
                .parser
                .table
                .expected(state)
                .iter()
                .map(name)
                .collect(),
        }
    }
}

impl fmt::Debug for Driver<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("states", &self.states)
            .field("symbols", &self.symbols)
            .field("position", &self.position)
            .finish()
    }
}
