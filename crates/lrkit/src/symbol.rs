//! Symbol types.

use std::{borrow::Cow, cmp::Ordering, fmt};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TerminalID {
    raw: u16,
}

impl TerminalID {
    /// Reserved terminal that stands for an empty derivation.
    pub const EPSILON: Self = Self::from_raw(0);

    /// Reserved terminal that means the end of input.
    ///
    /// This is also the initial lookahead of the augmented start item.
    pub const DOLLAR: Self = Self::from_raw(1);

    pub(crate) const OFFSET: u16 = 2;

    #[inline]
    pub const fn from_raw(raw: u16) -> Self {
        Self { raw }
    }

    #[inline]
    pub const fn into_raw(self) -> u16 {
        self.raw
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NonterminalID {
    raw: u16,
}

impl NonterminalID {
    /// The left-hand side of the augmented start rule.
    pub const START: Self = Self::from_raw(0);

    pub(crate) const OFFSET: u16 = 1;

    #[inline]
    pub const fn from_raw(raw: u16) -> Self {
        Self { raw }
    }

    #[inline]
    pub const fn into_raw(self) -> u16 {
        self.raw
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolID {
    T(TerminalID),
    N(NonterminalID),
}

impl From<TerminalID> for SymbolID {
    fn from(id: TerminalID) -> Self {
        Self::T(id)
    }
}

impl From<NonterminalID> for SymbolID {
    fn from(id: NonterminalID) -> Self {
        Self::N(id)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Assoc {
    Left,
    Right,
    Nonassoc,
}

impl fmt::Display for Assoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
            Self::Nonassoc => write!(f, "none"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Precedence {
    pub priority: i32,
    pub assoc: Assoc,
}

impl Precedence {
    pub const fn new(priority: i32, assoc: Assoc) -> Self {
        Self { priority, assoc }
    }
}

impl Default for Precedence {
    fn default() -> Self {
        Self::new(0, Assoc::Nonassoc)
    }
}

/// The lexical class of a terminal symbol.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TerminalKind {
    Keyword,
    Literal,
    Identifier,
    Operator,
    Separator,
    Comment,
    Special,
}

impl fmt::Display for TerminalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Keyword => "keyword",
            Self::Literal => "literal",
            Self::Identifier => "identifier",
            Self::Operator => "operator",
            Self::Separator => "separator",
            Self::Comment => "comment",
            Self::Special => "special",
        })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Terminal,
    Nonterminal,
}

#[derive(Debug, Clone)]
pub struct Terminal {
    pub(crate) id: TerminalID,
    pub(crate) name: Cow<'static, str>,
    pub(crate) pattern: Cow<'static, str>,
    pub(crate) kind: TerminalKind,
    pub(crate) precedence: Precedence,
}

impl Terminal {
    pub(crate) fn reserved(id: TerminalID, name: &'static str, precedence: Precedence) -> Self {
        Self {
            id,
            name: Cow::Borrowed(name),
            pattern: Cow::Borrowed(""),
            kind: TerminalKind::Special,
            precedence,
        }
    }

    pub fn id(&self) -> TerminalID {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The regular expression source that the lexer matches for this terminal.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn kind(&self) -> TerminalKind {
        self.kind
    }

    pub fn precedence(&self) -> Precedence {
        self.precedence
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone)]
pub struct Nonterminal {
    pub(crate) id: NonterminalID,
    pub(crate) name: Cow<'static, str>,
    pub(crate) precedence: Precedence,
}

impl Nonterminal {
    pub fn id(&self) -> NonterminalID {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn precedence(&self) -> Precedence {
        self.precedence
    }
}

impl fmt::Display for Nonterminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A borrowed view of a grammar symbol.
///
/// Two symbols compare equal iff their names match, and are ordered by
/// precedence first and by name second.
#[derive(Debug, Copy, Clone)]
pub enum Symbol<'g> {
    T(&'g Terminal),
    N(&'g Nonterminal),
}

impl<'g> Symbol<'g> {
    pub fn id(&self) -> SymbolID {
        match self {
            Self::T(t) => SymbolID::T(t.id),
            Self::N(n) => SymbolID::N(n.id),
        }
    }

    pub fn name(&self) -> &'g str {
        match self {
            Self::T(t) => &t.name,
            Self::N(n) => &n.name,
        }
    }

    /// The lexer pattern for terminals, or the name for nonterminals.
    pub fn pattern(&self) -> &'g str {
        match self {
            Self::T(t) => &t.pattern,
            Self::N(n) => &n.name,
        }
    }

    pub fn kind(&self) -> SymbolKind {
        match self {
            Self::T(..) => SymbolKind::Terminal,
            Self::N(..) => SymbolKind::Nonterminal,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::T(..))
    }

    pub fn terminal_kind(&self) -> Option<TerminalKind> {
        match self {
            Self::T(t) => Some(t.kind),
            Self::N(..) => None,
        }
    }

    pub fn precedence(&self) -> Precedence {
        match self {
            Self::T(t) => t.precedence,
            Self::N(n) => n.precedence,
        }
    }
}

impl PartialEq for Symbol<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for Symbol<'_> {}

impl PartialOrd for Symbol<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        Ord::cmp(&self.precedence().priority, &other.precedence().priority)
            .then_with(|| self.name().cmp(other.name()))
    }
}

impl fmt::Display for Symbol<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
