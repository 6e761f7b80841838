use crate::symbol::TerminalID;
use std::fmt;

/// A lexical token fed to the parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub terminal: TerminalID,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(terminal: TerminalID, lexeme: impl Into<String>) -> Self {
        Self {
            terminal,
            lexeme: lexeme.into(),
            line: 0,
            column: 0,
        }
    }

    /// Set the source position of this token.
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    /// The end-of-input token, which callers append to every token stream,
    /// positioned with [`Token::at`] just after the last token.
    pub fn eoi() -> Self {
        Self::new(TerminalID::DOLLAR, "")
    }

    pub fn is_eoi(&self) -> bool {
        self.terminal == TerminalID::DOLLAR
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} at {}:{}", self.lexeme, self.line, self.column)
    }
}
