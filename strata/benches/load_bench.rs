use std::fs;
use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use strata::config::{ConfigBuilder, FileLoader, MemoryEnv, WarnMode};
use tempfile::TempDir;

fn write_fragments(dir: &Path, count: usize) {
    fs::create_dir_all(dir).expect("failed to create config dir");
    for i in 0..count {
        let body = if i % 2 == 0 {
            format!("service_{i}:\n  enabled: true\n  port: {}\n  tags: [a, b]\n", 8000 + i)
        } else {
            format!(r#"{{"service_{i}": {{"enabled": false, "port": {}}}}}"#, 9000 + i)
        };
        let ext = if i % 2 == 0 { "yaml" } else { "json" };
        fs::write(dir.join(format!("{i:04}.{ext}")), body).expect("failed to write fragment");
    }
}

fn bench_load_dir(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_dir");

    for count in [1, 10, 50] {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dir = temp.path().join("configs");
        write_fragments(&dir, count);
        let loader = FileLoader::new(WarnMode::Quiet);

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                loader
                    .load_dir(black_box(&dir), strata::ConfigTree::new())
                    .expect("load_dir failed")
            });
        });
    }

    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let temp = TempDir::new().expect("failed to create temp dir");
    write_fragments(&temp.path().join("configs"), 10);
    write_fragments(&temp.path().join("extra"), 3);
    fs::write(temp.path().join(".env"), "APP_ENV=bench\nAPI_KEY=secret\n")
        .expect("failed to write dotenv");

    c.bench_function("pipeline_load", |b| {
        b.iter(|| {
            ConfigBuilder::new()
                .config_dir(temp.path().join("configs"))
                .env_file(temp.path().join(".env"))
                .required_envs(["API_KEY"])
                .extra_dir(temp.path().join("extra"))
                .env_store(MemoryEnv::new())
                .load()
                .expect("pipeline load failed")
        });
    });
}

criterion_group!(benches, bench_load_dir, bench_full_pipeline);
criterion_main!(benches);
