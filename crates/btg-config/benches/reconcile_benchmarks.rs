use btg_config::{ConfigReconciler, FixedParallelism};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::fs;
use tempfile::tempdir;

fn load_partial_document_benchmark(c: &mut Criterion) {
    c.bench_function("ConfigReconciler::load_config (partial document)", |b| {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"api_key": "K", "max_workers": "invalid", "chunk_size": 7000, "ui_theme": "dark"}"#,
        )
        .unwrap();
        let reconciler = ConfigReconciler::with_parallelism(Some(path), FixedParallelism(8));

        b.iter(|| black_box(reconciler.load_config(false).unwrap()))
    });
}

fn save_default_config_benchmark(c: &mut Criterion) {
    c.bench_function("ConfigReconciler::save_config (defaults)", |b| {
        let dir = tempdir().unwrap();
        let reconciler =
            ConfigReconciler::with_parallelism(Some(dir.path().join("config.json")), FixedParallelism(8));
        let config = reconciler.get_default_config();

        b.iter(|| black_box(reconciler.save_config(black_box(&config))))
    });
}

criterion_group!(benches, load_partial_document_benchmark, save_default_config_benchmark);
criterion_main!(benches);
