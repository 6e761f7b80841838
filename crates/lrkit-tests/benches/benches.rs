use criterion::{criterion_group, criterion_main, Criterion};
use lrkit::{Config, Grammar, GrammarDef, GrammarDefError, ParseTable, Parser};
use lrkit_tests::{grammars, tokens};
use std::hint::black_box;

criterion_main!(benches);
criterion_group!(benches, bench_simple, bench_lr1, bench_parse);

fn bench_simple(c: &mut Criterion) {
    bench_table_gen(c, "g_simple1", grammars::g_simple1);
    bench_table_gen(c, "g_simple2", grammars::g_simple2);
    bench_table_gen(c, "g1", grammars::g1);
    bench_table_gen(c, "g4", grammars::g4);
}

fn bench_lr1(c: &mut Criterion) {
    bench_table_gen(c, "g2", grammars::g2);
    bench_table_gen(c, "lists", grammars::lists);
}

fn bench_parse(c: &mut Criterion) {
    let parser = Parser::new(Grammar::define(grammars::g_simple2).unwrap()).unwrap();
    let source = vec!["LPAREN NUM PLUS NUM RPAREN STAR NUM"; 64].join(" MINUS ");
    let input = tokens(parser.grammar(), &source);
    c.bench_function("parse/g_simple2", |b| {
        b.iter(|| {
            let _ast = black_box(parser.parse(input.iter().cloned()));
        });
    });
}

fn bench_table_gen(
    c: &mut Criterion,
    name: &str,
    f: impl FnOnce(&mut GrammarDef) -> Result<(), GrammarDefError>,
) {
    let grammar = Grammar::define(f).unwrap();
    c.bench_function(&format!("canonical/{}", name), |b| {
        b.iter(|| {
            let _table = black_box(ParseTable::generate(&grammar));
        });
    });
    c.bench_function(&format!("lalr/{}", name), |b| {
        b.iter(|| {
            let _table = black_box(ParseTable::generate_with_config(
                &grammar,
                Config::new().use_lalr(),
            ));
        });
    });
}
