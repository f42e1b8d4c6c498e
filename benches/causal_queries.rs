//! Benchmarks for structure lowering and causal queries.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use causeway::config::SessionConfig;
use causeway::graph::{Graph, GraphLiteral};
use causeway::model::Model;
use causeway::scenario::SignalingCascade;
use causeway::solver::Session;
use causeway::structure::{Label, Structure};
use causeway::z3::{Config, Context};

fn complex() -> Structure {
    let gtp = Label::new("GTP");
    let phosphate = Label::new("phosphate");
    Structure::agent("RAF")
        .bound(&Structure::agent("HRAS").labeled(gtp))
        .with_site(&Structure::agent("S338").labeled(phosphate.clone()))
        .bound(&Structure::agent("MEK1").labeled(phosphate))
}

fn bench_lowering(c: &mut Criterion) {
    let ctx = Context::new(&Config::new());
    let session = Session::new(&ctx, SessionConfig::default()).unwrap();
    let graph = Graph::symbolic(&session, "g");
    let s = complex();

    c.bench_function("lower_complex_structure", |bench| {
        bench.iter(|| black_box(s.holds_in(&graph, &session).unwrap()))
    });
}

fn bench_literal_match(c: &mut Criterion) {
    let ctx = Context::new(&Config::new());
    let session = Session::new(&ctx, SessionConfig::default()).unwrap();
    let s = complex();
    let graph = Graph::from_literal(&session, &GraphLiteral::from_structure(&s));
    let formula = s.holds_in(&graph, &session).unwrap();

    c.bench_function("check_sat_literal_match", |bench| {
        bench.iter(|| black_box(session.check_sat(&formula).unwrap()))
    });
}

fn bench_cascade_report(c: &mut Criterion) {
    let ctx = Context::new(&Config::new());
    let session = Session::new(&ctx, SessionConfig::default()).unwrap();
    let model = Model::from_config(&session, "cascade");
    let candidates = SignalingCascade::new().candidates(&session, &model).unwrap();
    let query = &candidates[0].query;

    c.bench_function("cascade_candidate_report", |bench| {
        bench.iter(|| black_box(query.report(&session).unwrap()))
    });
}

criterion_group!(benches, bench_lowering, bench_literal_match, bench_cascade_report);
criterion_main!(benches);
