//! Built-in sample grammars.

use lrkit::{
    Assoc, GrammarDef, GrammarDefError, Precedence,
    SymbolID::{N, T},
    TerminalKind,
};

/// `from ID import ID ;`
pub fn import(g: &mut GrammarDef) -> Result<(), GrammarDefError> {
    let from = g.terminal("from", "from", TerminalKind::Keyword, Precedence::default())?;
    let import = g.terminal(
        "import",
        "import",
        TerminalKind::Keyword,
        Precedence::default(),
    )?;
    let ident = g.terminal(
        "ID",
        "[A-Za-z_][A-Za-z0-9_]*",
        TerminalKind::Identifier,
        Precedence::default(),
    )?;
    let semi = g.terminal(";", ";", TerminalKind::Separator, Precedence::default())?;
    g.skip_terminal("WS", r"[ \t\r\n]+", TerminalKind::Special)?;

    let start = g.nonterminal("start")?;
    let stmt = g.nonterminal("ImportStatement")?;
    g.start_symbol(start)?;

    g.rule(start, [N(stmt)])?;
    g.rule(stmt, [T(from), T(ident), T(import), T(ident), T(semi)])?;
    Ok(())
}

/// `S := a S b | ε`
pub fn balanced(g: &mut GrammarDef) -> Result<(), GrammarDefError> {
    let a = g.token("a")?;
    let b = g.token("b")?;
    g.skip_terminal("WS", r"\s+", TerminalKind::Special)?;
    let s = g.nonterminal("S")?;

    g.rule(s, [T(a), N(s), T(b)])?;
    g.rule(s, [])?;
    Ok(())
}

/// Arithmetic expressions over numbers.
pub fn arith(g: &mut GrammarDef) -> Result<(), GrammarDefError> {
    let plus = g.terminal(
        "+",
        r"\+",
        TerminalKind::Operator,
        Precedence::new(10, Assoc::Left),
    )?;
    let minus = g.terminal(
        "-",
        "-",
        TerminalKind::Operator,
        Precedence::new(10, Assoc::Left),
    )?;
    let star = g.terminal(
        "*",
        r"\*",
        TerminalKind::Operator,
        Precedence::new(20, Assoc::Left),
    )?;
    let slash = g.terminal(
        "/",
        "/",
        TerminalKind::Operator,
        Precedence::new(20, Assoc::Left),
    )?;
    let lparen = g.terminal("(", r"\(", TerminalKind::Separator, Precedence::default())?;
    let rparen = g.terminal(")", r"\)", TerminalKind::Separator, Precedence::default())?;
    let num = g.terminal(
        "NUM",
        "[0-9]+",
        TerminalKind::Literal,
        Precedence::default(),
    )?;
    g.skip_terminal("WS", r"\s+", TerminalKind::Special)?;

    let expr = g.nonterminal("expr")?;
    let term = g.nonterminal("term")?;
    let factor = g.nonterminal("factor")?;

    for op in [plus, minus] {
        g.rule(expr, [N(expr), T(op), N(term)])?;
    }
    g.rule(expr, [N(term)])?;
    for op in [star, slash] {
        g.rule(term, [N(term), T(op), N(factor)])?;
    }
    g.rule(term, [N(factor)])?;
    g.rule(factor, [T(num)])?;
    g.rule(factor, [T(lparen), N(expr), T(rparen)])?;
    Ok(())
}
