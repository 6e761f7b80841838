//! Tokenization of source text by the terminal patterns of a grammar.
//!
//! At each position the longest match among the non-skip terminals wins,
//! ties going to the terminal declared first. Skip terminals are only tried
//! when no other terminal matches, and their matches are consumed without
//! producing a token. The token stream always ends with a `DOLLAR` token
//! positioned just after the last character of the input.

use crate::{grammar::Grammar, symbol::TerminalID, token::Token};
use regex::Regex;

#[derive(Debug, thiserror::Error)]
pub enum LexError {
    #[error("invalid pattern for the terminal `{}'", terminal)]
    InvalidPattern {
        terminal: String,
        #[source]
        source: regex::Error,
    },

    #[error("unexpected input at {}:{}: {:?}", line, column, snippet)]
    UnexpectedInput {
        line: usize,
        column: usize,
        snippet: String,
    },
}

#[derive(Debug)]
struct Pattern {
    terminal: TerminalID,
    regex: Regex,
}

impl Pattern {
    /// The length of the non-empty match at the head of `input`.
    fn match_len(&self, input: &str) -> Option<usize> {
        self.regex
            .find(input)
            .map(|m| m.end())
            .filter(|len| *len > 0)
    }
}

/// A lexer compiled from the terminal patterns of a grammar.
#[derive(Debug)]
pub struct Lexer {
    patterns: Vec<Pattern>,
    skip_patterns: Vec<Pattern>,
}

impl Lexer {
    /// Compile the patterns of every declared terminal.
    ///
    /// The reserved terminals and terminals with an empty pattern never match.
    pub fn new(g: &Grammar) -> Result<Self, LexError> {
        let mut patterns = vec![];
        let mut skip_patterns = vec![];
        for terminal in g.terminals.values() {
            if terminal.id().into_raw() < TerminalID::OFFSET || terminal.pattern().is_empty() {
                continue;
            }
            // anchor the pattern at the current position.
            let anchored = format!(r"\A(?:{})", terminal.pattern());
            let regex = Regex::new(&anchored).map_err(|source| LexError::InvalidPattern {
                terminal: terminal.name().to_owned(),
                source,
            })?;
            let pattern = Pattern {
                terminal: terminal.id(),
                regex,
            };
            if g.is_skip_terminal(terminal.id()) {
                skip_patterns.push(pattern);
            } else {
                patterns.push(pattern);
            }
        }

        tracing::debug!(
            patterns = patterns.len(),
            skip_patterns = skip_patterns.len(),
            "lexer compiled"
        );

        Ok(Self {
            patterns,
            skip_patterns,
        })
    }

    /// Iterate over the tokens of `input`, ending with the end-of-input token.
    ///
    /// The iterator stops after the first error.
    pub fn tokens<'l, 'i>(&'l self, input: &'i str) -> Tokens<'l, 'i> {
        Tokens {
            lexer: self,
            input,
            offset: 0,
            line: 1,
            column: 1,
            done: false,
        }
    }

    pub fn tokenize(&self, input: &str) -> Result<Vec<Token>, LexError> {
        let tokens: Vec<Token> = self.tokens(input).collect::<Result<_, _>>()?;
        tracing::debug!(tokens = tokens.len(), "tokenization complete");
        Ok(tokens)
    }

    fn longest_match<'p>(patterns: &'p [Pattern], input: &str) -> Option<(&'p Pattern, usize)> {
        let mut longest: Option<(&Pattern, usize)> = None;
        for pattern in patterns {
            if let Some(len) = pattern.match_len(input) {
                if longest.map_or(true, |(_, max)| len > max) {
                    longest = Some((pattern, len));
                }
            }
        }
        longest
    }
}

/// The iterator returned by [`Lexer::tokens`].
#[derive(Debug)]
pub struct Tokens<'l, 'i> {
    lexer: &'l Lexer,
    input: &'i str,
    offset: usize,
    line: usize,
    column: usize,
    done: bool,
}

impl<'i> Tokens<'_, 'i> {
    fn advance(&mut self, len: usize) -> &'i str {
        let input = self.input;
        let text = &input[self.offset..self.offset + len];
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.offset += len;
        text
    }
}

impl Iterator for Tokens<'_, '_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let input = self.input;
        loop {
            let rest = &input[self.offset..];
            if rest.is_empty() {
                self.done = true;
                return Some(Ok(Token::eoi().at(self.line, self.column)));
            }

            if let Some((pattern, len)) = Lexer::longest_match(&self.lexer.patterns, rest) {
                let (line, column) = (self.line, self.column);
                let terminal = pattern.terminal;
                let lexeme = self.advance(len);
                tracing::trace!(line, column, lexeme, "token");
                return Some(Ok(Token::new(terminal, lexeme).at(line, column)));
            }

            if let Some((_, len)) = Lexer::longest_match(&self.lexer.skip_patterns, rest) {
                let skipped = self.advance(len);
                tracing::trace!(skipped, "skip");
                continue;
            }

            self.done = true;
            return Some(Err(LexError::UnexpectedInput {
                line: self.line,
                column: self.column,
                snippet: rest.chars().take(10).collect(),
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        grammar::{GrammarDef, GrammarDefError},
        symbol::{Precedence, SymbolID::*, TerminalKind},
        test_grammars,
    };

    fn import_statement(g: &mut GrammarDef) -> Result<(), GrammarDefError> {
        let from = g.token("from")?;
        let import = g.token("import")?;
        let ident = g.terminal(
            "ID",
            "[A-Za-z_][A-Za-z0-9_]*",
            TerminalKind::Identifier,
            Precedence::default(),
        )?;
        let semi = g.terminal(";", ";", TerminalKind::Separator, Precedence::default())?;
        g.skip_terminal("WS", r"[ \t\r\n]+", TerminalKind::Special)?;
        let stmt = g.nonterminal("ImportStatement")?;
        g.rule(stmt, [T(from), T(ident), T(import), T(ident), T(semi)])?;
        Ok(())
    }

    fn names(g: &Grammar, tokens: &[Token]) -> Vec<String> {
        tokens
            .iter()
            .map(|t| g.terminals[&t.terminal].name().to_owned())
            .collect()
    }

    #[test]
    fn keywords_identifiers_and_positions() {
        let grammar = Grammar::define(import_statement).unwrap();
        let lexer = Lexer::new(&grammar).unwrap();
        let tokens = lexer.tokenize("from IStudio\n  import Lang;").unwrap();

        assert_eq!(
            names(&grammar, &tokens),
            ["from", "ID", "import", "ID", ";", "DOLLAR"]
        );
        let positions: Vec<_> = tokens.iter().map(|t| (t.line, t.column)).collect();
        assert_eq!(positions, [(1, 1), (1, 6), (2, 3), (2, 10), (2, 14), (2, 15)]);
        assert_eq!(tokens[1].lexeme, "IStudio");
        assert!(tokens.last().unwrap().is_eoi());
    }

    #[test]
    fn longest_match_wins() {
        let grammar = Grammar::define(import_statement).unwrap();
        let lexer = Lexer::new(&grammar).unwrap();
        let tokens = lexer.tokenize("fromage importer").unwrap();
        assert_eq!(names(&grammar, &tokens), ["ID", "ID", "DOLLAR"]);
        assert_eq!(tokens[0].lexeme, "fromage");
    }

    #[test]
    fn empty_input_yields_eoi_only() {
        let grammar = test_grammars::balanced();
        let lexer = Lexer::new(&grammar).unwrap();
        let tokens = lexer.tokenize("").unwrap();
        assert_eq!(tokens, [Token::eoi().at(1, 1)]);
    }

    #[test]
    fn unexpected_input_reports_position() {
        let grammar = Grammar::define(import_statement).unwrap();
        let lexer = Lexer::new(&grammar).unwrap();
        match lexer.tokenize("from x\n  ? import").unwrap_err() {
            LexError::UnexpectedInput {
                line,
                column,
                snippet,
            } => {
                assert_eq!((line, column), (2, 3));
                assert_eq!(snippet, "? import");
            }
            err => panic!("unexpected error: {}", err),
        }

        let mut tokens = lexer.tokens("?");
        assert!(matches!(tokens.next(), Some(Err(..))));
        assert!(tokens.next().is_none());
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let grammar = Grammar::define(|g| {
            let x = g.terminal("X", "(", TerminalKind::Special, Precedence::default())?;
            let s = g.nonterminal("S")?;
            g.rule(s, [T(x)])?;
            Ok(())
        })
        .unwrap();
        assert!(matches!(
            Lexer::new(&grammar),
            Err(LexError::InvalidPattern { terminal, .. }) if terminal == "X"
        ));
    }
}
