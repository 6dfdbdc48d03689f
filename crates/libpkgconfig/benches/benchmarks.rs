//! Performance benchmarks for libpkgconfig.
//!
//! Run with: cargo bench -p libpkgconfig
//!
//! Covers:
//! - .pc file parsing
//! - Variable expansion
//! - Version comparison
//! - Dependency walking and flag projection

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::path::{Path, PathBuf};

use libpkgconfig::cache::Cache;
use libpkgconfig::client::Client;
use libpkgconfig::dependency::Dependency;
use libpkgconfig::expand::{self, Overrides};
use libpkgconfig::fragment::{self, LibsSelection};
use libpkgconfig::parser::PcFile;
use libpkgconfig::version;
use libpkgconfig::walk::{WalkMode, Walker};

/// The workspace-level `tests/data/` directory.
fn test_data_dir() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir.parent().unwrap().parent().unwrap();
    workspace_root.join("tests").join("data")
}

fn bench_client() -> Client {
    Client::builder()
        .skip_env(true)
        .with_path(test_data_dir())
        .build()
}

fn bench_parse(c: &mut Criterion) {
    let path = test_data_dir().join("simple.pc");
    let content = std::fs::read_to_string(&path).unwrap();

    c.bench_function("parse/simple.pc", |b| {
        b.iter(|| {
            let pc = PcFile::from_str(black_box(&content), Path::new("simple.pc")).unwrap();
            black_box(pc);
        });
    });
}

fn bench_expand(c: &mut Criterion) {
    let pc = PcFile::from_str(
        "prefix=/usr\nexec_prefix=${prefix}\nlibdir=${exec_prefix}/lib\n",
        Path::new("bench.pc"),
    )
    .unwrap();
    let overrides = Overrides::new();

    c.bench_function("expand/chained", |b| {
        b.iter(|| {
            let value = expand::expand(black_box("-L${libdir} -lbench"), &pc, &overrides);
            black_box(value);
        });
    });
}

fn bench_version_compare(c: &mut Criterion) {
    c.bench_function("version/compare", |b| {
        b.iter(|| {
            black_box(version::compare(black_box("1.2.10"), black_box("1.2.9")));
            black_box(version::compare(black_box("1.02b1"), black_box("1.02")));
            black_box(version::compare(black_box("1.0.1h"), black_box("1.0.1")));
        });
    });
}

fn bench_walk_and_project(c: &mut Criterion) {
    let client = bench_client();

    c.bench_function("walk/liba+libs", |b| {
        b.iter(|| {
            let mut cache = Cache::with_self_package(&client);
            let mode = WalkMode {
                want_libs: true,
                ..Default::default()
            };
            let mut walker = Walker::new(&client, mode);
            walker.walk(&mut cache, &Dependency::unconstrained("liba"));
            let selection = LibsSelection {
                lib_names: true,
                lib_paths: true,
                other: true,
            };
            let libs = fragment::collect_libs(&client, &cache, &walker.order(), selection);
            black_box(libs);
        });
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_expand,
    bench_version_compare,
    bench_walk_and_project
);
criterion_main!(benches);
