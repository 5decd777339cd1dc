use criterion::{black_box, criterion_group, criterion_main, Criterion};

use vexpr::{ExpressionContext, Orchestrator, Value};
use indexmap::IndexMap;

fn obj(pairs: &[(&str, Value)]) -> Value {
    let mut map = IndexMap::new();
    for (k, v) in pairs {
        map.insert((*k).to_owned(), v.clone());
    }
    Value::Object(map)
}

fn parse_only(c: &mut Criterion) {
    let mut orchestrator = Orchestrator::new();
    c.bench_function("parse member chain", |b| {
        b.iter(|| {
            orchestrator.clear_caches();
            black_box(orchestrator.parse(black_box("item.list.filter(x => x.active).map(x => x.name)")).unwrap());
        });
    });
}

fn parse_cached(c: &mut Criterion) {
    let mut orchestrator = Orchestrator::new();
    orchestrator.parse("item.list.filter(x => x.active).map(x => x.name)").unwrap();
    c.bench_function("parse member chain (cached)", |b| {
        b.iter(|| black_box(orchestrator.parse(black_box("item.list.filter(x => x.active).map(x => x.name)")).unwrap()));
    });
}

fn evaluate_callback_chain(c: &mut Criterion) {
    let mut orchestrator = Orchestrator::new();
    let items = Value::Array(
        (0..50)
            .map(|i| obj(&[("active", Value::Bool(i % 2 == 0)), ("name", Value::String(format!("item-{i}")))]))
            .collect(),
    );
    let ctx = ExpressionContext::new().with("items", items);
    c.bench_function("filter+map over 50 elements", |b| {
        b.iter(|| black_box(orchestrator.evaluate_direct("items.filter(x => x.active).map(x => x.name)", black_box(&ctx)).unwrap()));
    });
}

fn evaluate_template(c: &mut Criterion) {
    let mut orchestrator = Orchestrator::new();
    let ctx = ExpressionContext::new().with("item", obj(&[("name", Value::String("world".into()))]));
    c.bench_function("template with a string method hole", |b| {
        b.iter(|| black_box(orchestrator.evaluate_template("Hello {{item.name.toUpperCase()}}!", black_box(&ctx)).unwrap()));
    });
}

criterion_group!(benches, parse_only, parse_cached, evaluate_callback_chain, evaluate_template);
criterion_main!(benches);
