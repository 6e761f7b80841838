use crate::{grammar::Grammar, types::TerminalSet};
use std::fmt;

pub fn display_fn<F>(f: F) -> impl fmt::Display
where
    F: Fn(&mut fmt::Formatter<'_>) -> fmt::Result,
{
    struct DisplayFn<F> {
        f: F,
    }
    impl<F> fmt::Display for DisplayFn<F>
    where
        F: Fn(&mut fmt::Formatter<'_>) -> fmt::Result,
    {
        fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            (self.f)(formatter)
        }
    }
    DisplayFn { f }
}

/// `"[a b $]"`
pub fn display_terminals<'g>(set: &'g TerminalSet, g: &'g Grammar) -> impl fmt::Display + 'g {
    display_fn(move |f| {
        f.write_str("[")?;
        for (i, t) in set.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", g.terminals[&t])?;
        }
        f.write_str("]")
    })
}
