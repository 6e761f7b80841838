//! Shared fixtures for the integration tests and benchmarks.

pub mod grammars;

use lrkit::{Grammar, Token};
use tracing_subscriber::EnvFilter;

/// Build a token stream from whitespace-separated terminal names.
///
/// Each word is either `NAME` or `NAME=lexeme`; the end-of-input token is
/// appended.
pub fn tokens(g: &Grammar, input: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = input
        .split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            let (name, lexeme) = word.split_once('=').unwrap_or((word, word));
            let terminal = g
                .terminal_by_name(name)
                .unwrap_or_else(|| panic!("unknown terminal: {}", name));
            Token::new(terminal, lexeme).at(1, i + 1)
        })
        .collect();
    tokens.push(Token::eoi().at(1, tokens.len() + 1));
    tokens
}

/// Install a test-friendly `tracing` subscriber, once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
