use criterion::{black_box, criterion_group, criterion_main, Criterion};
use object_mother::test_helpers::RecordingStore;
use object_mother::{classify, KindRegistry, ObjectMother};
use serde_json::json;
use std::sync::Arc;

fn mother() -> ObjectMother {
    let kinds = Arc::new(KindRegistry::new().with_kind("user", RecordingStore::new("User")));
    let mother = ObjectMother::new(kinds).with_defaults("user", || {
        json!({"species": "human"})
            .as_object()
            .cloned()
            .unwrap_or_default()
    });
    let base = json!({"name": "wilma"}).as_object().cloned().unwrap_or_default();
    mother
        .declare("wilma", "user", base)
        .expect("user kind is registered");
    mother
}

fn benchmark_classify(c: &mut Criterion) {
    c.bench_function("classify", |b| {
        b.iter(|| classify(black_box("blog_post_comment")))
    });
}

fn benchmark_cached_dispatch(c: &mut Criterion) {
    let mother = mother();
    mother.dispatch("wilma", &[], None).expect("first call creates");

    c.bench_function("cached_dispatch", |b| {
        b.iter(|| mother.dispatch(black_box("wilma"), &[], None))
    });
}

fn benchmark_responds_to(c: &mut Criterion) {
    let mother = mother();

    c.bench_function("responds_to", |b| {
        b.iter(|| {
            mother.responds_to(black_box("recreate_wilma"));
            mother.responds_to(black_box("create_user!"));
            mother.responds_to(black_box("frobnicate"))
        })
    });
}

criterion_group!(
    benches,
    benchmark_classify,
    benchmark_cached_dispatch,
    benchmark_responds_to
);
criterion_main!(benches);
