mod grammars;

use anyhow::Context as _;
use clap::{Parser as _, ValueEnum};
use lrkit::{Compiler, Config, Grammar};
use std::{
    fs,
    io::{self, BufWriter, Read as _},
    path::PathBuf,
    time::Instant,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Copy, Clone, ValueEnum)]
enum GrammarKind {
    /// `from ID import ID ;`
    Import,
    /// `S := a S b | ε`
    Balanced,
    /// Arithmetic expressions.
    Arith,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum Merge {
    Canonical,
    Lalr,
}

#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The built-in grammar to parse with.
    #[arg(long, value_enum, default_value_t = GrammarKind::Import)]
    grammar: GrammarKind,

    /// The state merge strategy of the automaton.
    #[arg(long, value_enum, default_value_t = Merge::Canonical)]
    merge: Merge,

    /// Write the table summary, the grammar and the automaton to this file.
    #[arg(long)]
    dump: Option<PathBuf>,

    /// The source text to parse. Read from stdin if omitted.
    source: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::trace!("CLI args = {:?}", args);

    let grammar = match args.grammar {
        GrammarKind::Import => Grammar::define(grammars::import),
        GrammarKind::Balanced => Grammar::define(grammars::balanced),
        GrammarKind::Arith => Grammar::define(grammars::arith),
    }
    .context("failed to define the grammar")?;

    let mut config = Config::new();
    match args.merge {
        Merge::Canonical => config.use_canonical(),
        Merge::Lalr => config.use_lalr(),
    };

    let started = Instant::now();
    let compiler =
        Compiler::with_config(grammar, &config).context("failed to build the compiler")?;
    let parser = compiler.parser();
    tracing::info!(
        states = parser.table().len(),
        elapsed = ?started.elapsed(),
        "parser constructed"
    );

    let num_conflicts = parser.table().conflicts().count();
    if num_conflicts > 0 {
        let suffix = if num_conflicts == 1 { "" } else { "s" };
        println!(
            "[warning] The table has {} conflicting cell{}; the first action is used.",
            num_conflicts, suffix
        );
    }

    if let Some(path) = &args.dump {
        let file = fs::File::create(path)
            .with_context(|| format!("failed to create the dump file {}", path.display()))?;
        compiler
            .dump(BufWriter::new(file))
            .with_context(|| format!("failed to write the dump to {}", path.display()))?;
    }

    let source = match args.source {
        Some(source) => source,
        None => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("failed to read the source from stdin")?;
            source
        }
    };

    let ast = compiler.compile(&source).context("failed to parse the input")?;
    print!("{}", ast.display(parser.grammar()));

    Ok(())
}
