//! Grammars shared by the unit tests.

use crate::{
    grammar::Grammar,
    symbol::SymbolID::{N, T},
};

/// `S := a S b | ε`
pub(crate) fn balanced() -> Grammar {
    Grammar::define(|g| {
        let a = g.token("a")?;
        let b = g.token("b")?;
        let s = g.nonterminal("S")?;
        g.rule(s, [T(a), N(s), T(b)])?;
        g.rule(s, [])?;
        Ok(())
    })
    .unwrap()
}
