use lrkit::{Automaton, Config, Grammar, GrammarDef, GrammarDefError, Lexer, ParseTable};
use lrkit_tests::{grammars, init_tracing};

fn smoketest_grammar(f: impl FnOnce(&mut GrammarDef) -> Result<(), GrammarDefError>) {
    init_tracing();
    let grammar = Grammar::define(f).unwrap();
    eprintln!("grammar:\n{}", grammar);
    eprintln!();

    let lexer = Lexer::new(&grammar).unwrap();
    eprintln!("lexer: {:?}", lexer);

    for config in [Config::new(), *Config::new().use_lalr()] {
        let automaton = Automaton::generate_with_config(&grammar, &config).unwrap();
        eprintln!(
            "automaton ({:?}):\n---\n{}",
            config.merge_mode(),
            automaton.display(&grammar)
        );

        let table = ParseTable::from_automaton(&grammar, &automaton);
        eprintln!("parse table:\n---\n{}", table.display(&grammar));
        assert_eq!(table.len(), automaton.len());
    }
}

#[test]
fn smoketest_import_statement() {
    smoketest_grammar(grammars::import_statement);
}

#[test]
fn smoketest_balanced() {
    smoketest_grammar(grammars::balanced);
}

#[test]
fn smoketest_g_simple1() {
    smoketest_grammar(grammars::g_simple1);
}

#[test]
fn smoketest_g_simple2() {
    smoketest_grammar(grammars::g_simple2);
}

#[test]
fn smoketest_g1() {
    smoketest_grammar(grammars::g1);
}

#[test]
fn smoketest_g2() {
    smoketest_grammar(grammars::g2);
}

#[test]
fn smoketest_g4() {
    smoketest_grammar(grammars::g4);
}

#[test]
fn smoketest_lists() {
    smoketest_grammar(grammars::lists);
}
