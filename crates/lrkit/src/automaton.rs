//! The collection of LR(1) item sets and the transitions between them.

use crate::{
    closure::ItemSetBuilder,
    grammar::Grammar,
    state::{Cores, State},
    symbol::SymbolID,
    table::{self, TableError},
    types::{Map, Queue},
    util::display_fn,
};
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct StateID {
    raw: usize,
}

impl StateID {
    pub const START: Self = Self::new(0);

    #[inline]
    pub const fn new(raw: usize) -> Self {
        Self { raw }
    }

    #[inline]
    pub const fn into_raw(self) -> usize {
        self.raw
    }
}

impl fmt::Display for StateID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.raw, f)
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum MergeMode {
    /// States are identified by their whole content, that is, the same
    /// LR(0) cores and the same lookaheads (Knuth's canonical LR(1)).
    #[default]
    Canonical,

    /// States with the same LR(0) cores are merged by unioning their
    /// lookaheads (DeRemer's LALR(1)).
    LALR,
}

#[derive(Debug, Copy, Clone, Default)]
pub struct Config {
    merge_mode: MergeMode,
}

impl Config {
    pub const fn new() -> Self {
        Self {
            merge_mode: MergeMode::Canonical,
        }
    }

    /// Keep every distinct LR(1) item set as its own state.
    pub fn use_canonical(&mut self) -> &mut Self {
        self.merge_mode = MergeMode::Canonical;
        self
    }

    /// Merge the item sets that share the same LR(0) cores.
    pub fn use_lalr(&mut self) -> &mut Self {
        self.merge_mode = MergeMode::LALR;
        self
    }

    pub fn merge_mode(&self) -> MergeMode {
        self.merge_mode
    }
}

#[derive(Debug)]
pub struct Node {
    pub item_set: State,
    pub edges: Map<SymbolID, StateID>,
}

#[derive(Debug)]
pub struct Automaton {
    nodes: Map<StateID, Node>,
}

impl Automaton {
    pub fn generate(grammar: &Grammar) -> Result<Self, TableError> {
        Self::generate_with_config(grammar, &Config::new())
    }

    /// Build the state graph, after checking that `grammar` has a well-formed
    /// first rule and no dangling symbol references.
    pub fn generate_with_config(grammar: &Grammar, config: &Config) -> Result<Self, TableError> {
        table::verify_grammar(grammar)?;

        let mut gen = Generator {
            builder: ItemSetBuilder::new(grammar),
            merge_mode: config.merge_mode,
            nodes: Map::default(),
            by_content: Map::default(),
            by_cores: Map::default(),
            pending: Queue::default(),
        };
        gen.populate();

        tracing::debug!(
            states = gen.nodes.len(),
            merge_mode = ?config.merge_mode,
            "automaton generated"
        );

        Ok(Self { nodes: gen.nodes })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (StateID, &Node)> + '_ {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    pub fn node(&self, id: StateID) -> &Node {
        &self.nodes[&id]
    }

    /// Find the state whose item set is structurally equal to `state`.
    pub fn find(&self, state: &State) -> Option<StateID> {
        self.nodes
            .iter()
            .find_map(|(id, node)| (node.item_set == *state).then_some(*id))
    }

    pub fn display<'g>(&'g self, g: &'g Grammar) -> impl fmt::Display + 'g {
        display_fn(move |f| {
            for (i, (id, node)) in self.nodes().enumerate() {
                if i > 0 {
                    writeln!(f)?;
                }
                writeln!(f, "#### State {:02}", id)?;
                writeln!(f, "## item_set")?;
                write!(f, "{}", node.item_set.display(g))?;
                if !node.edges.is_empty() {
                    writeln!(f, "## edges")?;
                    for (symbol, target) in &node.edges {
                        writeln!(f, "- {} => {:02}", g.symbol(*symbol), target)?;
                    }
                }
            }
            Ok(())
        })
    }
}

#[derive(Debug)]
struct Generator<'g> {
    builder: ItemSetBuilder<'g>,
    merge_mode: MergeMode,
    nodes: Map<StateID, Node>,
    by_content: Map<State, StateID>,
    by_cores: Map<Cores, StateID>,
    pending: Queue<StateID>,
}

impl Generator<'_> {
    fn populate(&mut self) {
        let initial = self.builder.initial_state();
        self.intern(initial);

        while let Some(id) = self.pending.pop() {
            let grammar = self.builder.grammar();
            let item_set = self.nodes[&id].item_set.clone();

            let candidates = self.builder.transition_symbols(&item_set);
            let symbols = grammar
                .terminals
                .keys()
                .map(|t| SymbolID::T(*t))
                .chain(grammar.nonterminals.keys().map(|n| SymbolID::N(*n)))
                .filter(|symbol| candidates.contains(symbol));

            let mut edges = Map::default();
            for symbol in symbols {
                let next = self.builder.goto(&item_set, symbol);
                if next.is_empty() {
                    continue;
                }
                let target = self.intern(next);
                edges.insert(symbol, target);
            }

            tracing::trace!(state = %id, edges = edges.len(), "expanded state");
            self.nodes[&id].edges = edges;
        }
    }

    /// Register an item set, returning the ID of the state which it belongs to.
    fn intern(&mut self, item_set: State) -> StateID {
        match self.merge_mode {
            MergeMode::Canonical => {
                if let Some(id) = self.by_content.get(&item_set) {
                    return *id;
                }
                let id = self.add_node(item_set.clone());
                self.by_content.insert(item_set, id);
                id
            }

            MergeMode::LALR => {
                let cores = item_set.cores();
                if let Some(&id) = self.by_cores.get(&cores) {
                    // the successors have to be recomputed with the grown lookaheads.
                    if self.nodes[&id].item_set.merge_lookaheads(&item_set) {
                        self.pending.push(id);
                    }
                    return id;
                }
                let id = self.add_node(item_set);
                self.by_cores.insert(cores, id);
                id
            }
        }
    }

    fn add_node(&mut self, item_set: State) -> StateID {
        let id = StateID::new(self.nodes.len());
        self.nodes.insert(
            id,
            Node {
                item_set,
                edges: Map::default(),
            },
        );
        self.pending.push(id);
        id
    }
}
