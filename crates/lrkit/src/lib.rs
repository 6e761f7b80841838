//! LR(1) parse table generation and a shift-reduce parser driven by it.

pub mod ast;
pub mod automaton;
pub mod closure;
pub mod compiler;
pub mod first_sets;
pub mod grammar;
pub mod item;
pub mod lexer;
pub mod parser;
pub mod state;
pub mod symbol;
pub mod table;
pub mod token;
pub mod types;
pub mod util;

#[cfg(test)]
mod test_grammars;

pub use crate::{
    ast::AstNode,
    automaton::{Automaton, Config, MergeMode, StateID},
    compiler::{CompileError, Compiler},
    grammar::{Grammar, GrammarDef, GrammarDefError, Rule, RuleID},
    lexer::{LexError, Lexer},
    parser::{ParseError, Parser},
    symbol::{Assoc, NonterminalID, Precedence, SymbolID, TerminalID, TerminalKind},
    table::{Action, ParseTable, TableError},
    token::Token,
};
