//! Grammar definition for integration tests.

use lrkit::{
    Assoc, GrammarDef, GrammarDefError, Precedence,
    SymbolID::{N, T},
    TerminalKind,
};

type Result = std::result::Result<(), GrammarDefError>;

/// `from IStudio import Lang;`
pub fn import_statement(g: &mut GrammarDef) -> Result {
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
    let import_stmt = g.nonterminal("ImportStatement")?;

    g.start_symbol(start)?;

    g.rule(start, [N(import_stmt)])?;
    g.rule(import_stmt, [T(from), T(ident), T(import), T(ident), T(semi)])?;
    Ok(())
}

pub fn balanced(g: &mut GrammarDef) -> Result {
    let a = g.token("a")?;
    let b = g.token("b")?;
    let s = g.nonterminal("S")?;

    // S := a S b | ε
    g.rule(s, [T(a), N(s), T(b)])?;
    g.rule(s, [])?;
    Ok(())
}

pub fn g_simple1(g: &mut GrammarDef) -> Result {
    let equal = g.token("EQUAL")?;
    let plus = g.token("PLUS")?;
    let ident = g.token("ID")?;
    let num = g.token("NUM")?;

    let a = g.nonterminal("A")?;
    let e = g.nonterminal("E")?;
    let t = g.nonterminal("T")?;

    g.start_symbol(a)?;

    g.rule(a, [N(e), T(equal), N(e)])?;
    g.rule(a, [T(ident)])?;
    g.rule(e, [N(e), T(plus), N(t)])?;
    g.rule(e, [N(t)])?;
    g.rule(t, [T(num)])?;
    g.rule(t, [T(ident)])?;
    Ok(())
}

pub fn g_simple2(g: &mut GrammarDef) -> Result {
    // declare terminal symbols.
    let lparen = g.terminal(
        "LPAREN",
        r"\(",
        TerminalKind::Separator,
        Precedence::default(),
    )?;
    let rparen = g.terminal(
        "RPAREN",
        r"\)",
        TerminalKind::Separator,
        Precedence::default(),
    )?;
    let plus = g.terminal(
        "PLUS",
        r"\+",
        TerminalKind::Operator,
        Precedence::new(10, Assoc::Left),
    )?;
    let minus = g.terminal(
        "MINUS",
        "-",
        TerminalKind::Operator,
        Precedence::new(10, Assoc::Left),
    )?;
    let star = g.terminal(
        "STAR",
        r"\*",
        TerminalKind::Operator,
        Precedence::new(20, Assoc::Left),
    )?;
    let slash = g.terminal(
        "SLASH",
        "/",
        TerminalKind::Operator,
        Precedence::new(20, Assoc::Left),
    )?;
    let num = g.terminal(
        "NUM",
        "[0-9]+",
        TerminalKind::Literal,
        Precedence::default(),
    )?;

    // declare nonterminal symbols.
    let expr = g.nonterminal("EXPR")?;
    let factor = g.nonterminal("FACTOR")?;
    let term = g.nonterminal("TERM")?;

    g.start_symbol(expr)?;

    // declare syntax rules.
    g.rule(expr, [N(expr), T(plus), N(factor)])?; // expr '+' factor
    g.rule(expr, [N(expr), T(minus), N(factor)])?; // expr '-' factor
    g.rule(expr, [N(factor)])?; // factor
    g.rule(factor, [N(factor), T(star), N(term)])?; // factor '*' term
    g.rule(factor, [N(factor), T(slash), N(term)])?; // factor '/' term
    g.rule(factor, [N(term)])?; // term
    g.rule(term, [T(num)])?; // num
    g.rule(term, [T(lparen), N(expr), T(rparen)])?; // '(' expr ')'
    Ok(())
}

pub fn g1(g: &mut GrammarDef) -> Result {
    let plus = g.token("PLUS")?;
    let star = g.token("STAR")?;
    let a = g.token("A")?;

    let e = g.nonterminal("E")?;
    let t = g.nonterminal("T")?;

    g.start_symbol(e)?;

    g.rule(e, [N(e), T(plus), N(t)])?;
    g.rule(e, [N(t)])?;
    g.rule(t, [N(t), T(star), T(a)])?;
    g.rule(t, [T(a)])?;
    Ok(())
}

/// LR(1), but not LALR(1).
pub fn g2(g: &mut GrammarDef) -> Result {
    let comma = g.token("COMMA")?;
    let colon = g.token("COLON")?;
    let ident = g.token("ID")?;

    let def = g.nonterminal("DEF")?;
    let param_spec = g.nonterminal("PARAM_SPEC")?;
    let return_spec = g.nonterminal("RETURN_SPEC")?;
    let type_ = g.nonterminal("TYPE")?;
    let name = g.nonterminal("NAME")?;
    let name_list = g.nonterminal("NAME_LIST")?;

    g.rule(def, [N(param_spec), N(return_spec), T(comma)])?;
    g.rule(param_spec, [N(type_)])?;
    g.rule(param_spec, [N(name_list), T(colon), N(type_)])?;
    g.rule(return_spec, [N(type_)])?;
    g.rule(return_spec, [N(name), T(colon), N(type_)])?;
    g.rule(type_, [T(ident)])?;
    g.rule(name, [T(ident)])?;
    g.rule(name_list, [N(name)])?;
    g.rule(name_list, [N(name), T(comma), N(name_list)])?;
    Ok(())
}

pub fn g4(g: &mut GrammarDef) -> Result {
    let plus = g.token("PLUS")?;
    let lparen = g.token("LPAREN")?;
    let rparen = g.token("RPAREN")?;
    let num = g.token("NUM")?;

    let e = g.nonterminal("E")?;
    let t = g.nonterminal("T")?;
    // E → E + T | T
    // T → ( E ) | n

    g.rule(e, [N(e), T(plus), N(t)])?;
    g.rule(e, [N(t)])?;
    g.rule(t, [T(lparen), N(e), T(rparen)])?;
    g.rule(t, [T(num)])?;
    Ok(())
}

/// Nullable list elements and optional separators.
pub fn lists(g: &mut GrammarDef) -> Result {
    let lbracket = g.terminal(
        "LBRACKET",
        r"\[",
        TerminalKind::Separator,
        Precedence::default(),
    )?;
    let rbracket = g.terminal(
        "RBRACKET",
        r"\]",
        TerminalKind::Separator,
        Precedence::default(),
    )?;
    let comma = g.terminal("COMMA", ",", TerminalKind::Separator, Precedence::default())?;
    let num = g.terminal(
        "NUM",
        "[0-9]+",
        TerminalKind::Literal,
        Precedence::default(),
    )?;
    g.skip_terminal("COMMENT", "#[^\n]*", TerminalKind::Comment)?;
    g.skip_terminal("WS", r"\s+", TerminalKind::Special)?;

    let value = g.nonterminal("VALUE")?;
    let items = g.nonterminal("ITEMS")?;
    let trailing = g.nonterminal("TRAILING")?;

    g.rule(value, [T(num)])?;
    g.rule(value, [T(lbracket), N(items), N(trailing), T(rbracket)])?;
    g.rule(items, [])?;
    g.rule(items, [N(items), N(value), T(comma)])?;
    g.rule(trailing, [N(value)])?;
    g.rule(trailing, [])?;
    Ok(())
}
