//! Syntax trees built by the parser.

use crate::{grammar::Grammar, symbol::SymbolID, token::Token, util::display_fn};
use std::fmt;

/// A node of the syntax tree.
///
/// Leaves carry the token they were shifted from; inner nodes are labeled
/// with the left-hand side of the reduced rule and own their children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstNode {
    symbol: SymbolID,
    token: Option<Token>,
    children: Vec<AstNode>,
}

impl AstNode {
    pub fn leaf(token: Token) -> Self {
        Self {
            symbol: SymbolID::T(token.terminal),
            token: Some(token),
            children: vec![],
        }
    }

    pub fn node(symbol: SymbolID, children: Vec<AstNode>) -> Self {
        Self {
            symbol,
            token: None,
            children,
        }
    }

    pub fn symbol(&self) -> SymbolID {
        self.symbol
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn children(&self) -> &[AstNode] {
        &self.children[..]
    }

    pub fn into_children(self) -> Vec<AstNode> {
        self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterate over the tokens of the leaves, from left to right.
    pub fn tokens(&self) -> Vec<&Token> {
        let mut tokens = vec![];
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Some(token) = &node.token {
                tokens.push(token);
            }
            stack.extend(node.children.iter().rev());
        }
        tokens
    }

    pub fn display<'g>(&'g self, g: &'g Grammar) -> impl fmt::Display + 'g {
        display_fn(move |f| {
            self.fmt_label(g, f)?;
            writeln!(f)?;
            let mut prefix = String::new();
            let len = self.children.len();
            for (i, child) in self.children.iter().enumerate() {
                child.fmt_tree(g, f, &mut prefix, i + 1 == len)?;
            }
            Ok(())
        })
    }

    fn fmt_tree(
        &self,
        g: &Grammar,
        f: &mut fmt::Formatter<'_>,
        prefix: &mut String,
        last: bool,
    ) -> fmt::Result {
        f.write_str(prefix)?;
        f.write_str(if last { "└── " } else { "├── " })?;
        self.fmt_label(g, f)?;
        writeln!(f)?;

        let saved = prefix.len();
        prefix.push_str(if last { "    " } else { "│   " });
        let len = self.children.len();
        for (i, child) in self.children.iter().enumerate() {
            child.fmt_tree(g, f, prefix, i + 1 == len)?;
        }
        prefix.truncate(saved);
        Ok(())
    }

    fn fmt_label(&self, g: &Grammar, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = g.symbol(self.symbol);
        match &self.token {
            Some(token) if !token.lexeme.is_empty() && token.lexeme != symbol.name() => {
                write!(f, "{} {:?}", symbol, token.lexeme)
            }
            _ => write!(f, "{}", symbol),
        }
    }
}
