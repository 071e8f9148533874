//! cargo bench --bench recognition
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use machina::cancel::never;
use machina::config::Limits;
use machina::fa::closure::accepts as fa_accepts;
use machina::fa::minimize::minimize;
use machina::fa::subset::subset_construct;
use machina::grammar::{build_cfg, to_cnf};
use machina::ids::SymbolId;
use machina::recognize::recognize_cyk;
use machina::regex::compile;

fn sym(n: u32) -> SymbolId {
    SymbolId(n)
}

pub fn criterion_benchmark(c: &mut Criterion) {
    {
        let (nfa, _symbols) = compile("(a|b)*abb").unwrap();
        let dfa = subset_construct(&nfa).unwrap();
        let minimized = minimize(&dfa, &Limits::default()).unwrap();
        let (a, b) = (sym(0), sym(1));
        let word: Vec<SymbolId> = std::iter::repeat([a, b, a, b]).take(64).flatten().chain([a, b, b]).collect();

        c.bench_function("thompson_determinize_minimize", |b_| {
            b_.iter(|| {
                let (nfa, _) = compile(black_box("(a|b)*abb")).unwrap();
                let dfa = subset_construct(&nfa).unwrap();
                minimize(&dfa, &Limits::default()).unwrap()
            })
        });

        c.bench_function("dfa_accept_long_word", |b_| {
            b_.iter(|| fa_accepts(&minimized, black_box(&word)))
        });
    }

    {
        // S -> a S b | ε, CNF'd once outside the loop; CYK is O(n^3 |G|).
        let s = sym(0);
        let (a, b) = (sym(100), sym(101));
        let cfg = build_cfg(vec![s], vec![a, b], vec![(s, vec![a, s, b]), (s, vec![])], s).unwrap();
        let cnf = to_cnf(&cfg).unwrap();
        let word: Vec<SymbolId> = std::iter::repeat(a).take(20).chain(std::iter::repeat(b).take(20)).collect();

        c.bench_function("cyk_balanced_depth_20", |b_| {
            b_.iter(|| recognize_cyk(&cnf, black_box(&word)))
        });
    }

    {
        use machina::turing::{build_tm, simulate, Determinism, Move};
        use machina::ids::StateId;

        let (even, odd, accept, reject) = (StateId(0), StateId(1), StateId(2), StateId(3));
        let (blank, a) = (sym(0), sym(1));
        let tm = build_tm(
            4,
            vec![a],
            vec![blank, a],
            blank,
            vec![
                (even, a, odd, a, Move::R, 0),
                (even, blank, accept, blank, Move::S, 0),
                (odd, a, even, a, Move::R, 0),
                (odd, blank, reject, blank, Move::S, 0),
            ],
            even,
            accept,
            reject,
            Determinism::Deterministic,
        )
        .unwrap();
        let word: Vec<SymbolId> = vec![a; 256];
        let limits = Limits::default();

        c.bench_function("dtm_simulate_256_steps", |b_| {
            b_.iter(|| simulate(&tm, black_box(&word), &limits, &never()))
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
