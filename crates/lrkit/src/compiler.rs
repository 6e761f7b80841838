//! The source-to-tree pipeline: lexer, then parser.

use crate::{
    ast::AstNode,
    automaton::Config,
    grammar::Grammar,
    lexer::{LexError, Lexer},
    parser::{ParseError, Parser},
    table::TableError,
};
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A lexer and a parser built from the same grammar.
#[derive(Debug)]
pub struct Compiler {
    lexer: Lexer,
    parser: Parser,
}

impl Compiler {
    pub fn new(grammar: Grammar) -> Result<Self, CompileError> {
        Self::with_config(grammar, &Config::new())
    }

    pub fn with_config(grammar: Grammar, config: &Config) -> Result<Self, CompileError> {
        let lexer = Lexer::new(&grammar)?;
        let parser = Parser::with_config(grammar, config)?;
        Ok(Self { lexer, parser })
    }

    pub fn lexer(&self) -> &Lexer {
        &self.lexer
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    /// Tokenize `source` and parse the tokens into a syntax tree.
    pub fn compile(&self, source: &str) -> Result<AstNode, CompileError> {
        let tokens = self.lexer.tokenize(source)?;
        let ast = self.parser.parse(tokens)?;
        Ok(ast)
    }

    /// Write the table summary, the grammar and the automaton.
    pub fn dump<W>(&self, mut w: W) -> io::Result<()>
    where
        W: io::Write,
    {
        let g = self.parser.grammar();
        writeln!(w, "{}", self.parser.summary())?;
        writeln!(w, "{}", g)?;
        write!(w, "{}", self.parser.automaton().display(g))?;
        w.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        symbol::{Precedence, SymbolID::*, TerminalKind},
        test_grammars,
    };

    fn balanced_with_spaces() -> Grammar {
        Grammar::define(|g| {
            let a = g.token("a")?;
            let b = g.token("b")?;
            g.skip_terminal("WS", r"\s+", TerminalKind::Special)?;
            let s = g.nonterminal("S")?;
            g.rule(s, [T(a), N(s), T(b)])?;
            g.rule(s, [])?;
            Ok(())
        })
        .unwrap()
    }

    #[test]
    fn source_to_tree() {
        let compiler = Compiler::new(balanced_with_spaces()).unwrap();
        let ast = compiler.compile("a a\n b b").unwrap();
        eprintln!("{}", ast.display(compiler.parser().grammar()));

        let positions: Vec<_> = ast.tokens().iter().map(|t| (t.line, t.column)).collect();
        assert_eq!(positions, [(1, 1), (1, 3), (2, 2), (2, 4)]);
        assert!(compiler.compile("").unwrap().is_leaf());
    }

    #[test]
    fn errors_carry_positions() {
        let compiler = Compiler::new(balanced_with_spaces()).unwrap();

        match compiler.compile("a c b").unwrap_err() {
            CompileError::Lex(LexError::UnexpectedInput { line, column, .. }) => {
                assert_eq!((line, column), (1, 3));
            }
            err => panic!("unexpected error: {}", err),
        }

        match compiler.compile("a a b").unwrap_err() {
            CompileError::Parse(ParseError::UnexpectedToken {
                terminal,
                line,
                column,
                ..
            }) => {
                assert_eq!(terminal, "DOLLAR");
                assert_eq!((line, column), (1, 6));
            }
            err => panic!("unexpected error: {}", err),
        }
    }

    #[test]
    fn invalid_pattern_fails_construction() {
        let grammar = Grammar::define(|g| {
            let x = g.terminal("X", "[", TerminalKind::Special, Precedence::default())?;
            let s = g.nonterminal("S")?;
            g.rule(s, [T(x)])?;
            Ok(())
        })
        .unwrap();
        assert!(matches!(
            Compiler::new(grammar),
            Err(CompileError::Lex(LexError::InvalidPattern { .. }))
        ));
    }

    #[test]
    fn dump_lists_tables_and_grammar() {
        let compiler = Compiler::new(test_grammars::balanced()).unwrap();
        let mut buf = vec![];
        compiler.dump(&mut buf).unwrap();
        let dump = String::from_utf8(buf).unwrap();
        assert!(dump.starts_with("states: 8\n"));
        assert!(dump.contains("## rules:"));
        assert!(dump.contains("#### State 00"));
    }
}
