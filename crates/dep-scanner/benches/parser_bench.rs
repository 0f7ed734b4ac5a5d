//! 매니페스트 파싱 및 버전 정규화 벤치마크

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use vulnscout_dep_scanner::parser::ManifestParser;
use vulnscout_dep_scanner::parser::npm::PackageJsonParser;
use vulnscout_dep_scanner::parser::python::RequirementsTxtParser;
use vulnscout_dep_scanner::version;

fn package_json_fixture(count: usize) -> String {
    let deps: Vec<String> = (0..count)
        .map(|i| format!(r#""package-{i}": "^{}.{}.{}""#, i % 10, i % 20, i % 30))
        .collect();
    format!(r#"{{ "dependencies": {{ {} }} }}"#, deps.join(", "))
}

fn requirements_fixture(count: usize) -> String {
    (0..count)
        .map(|i| format!("package-{i}=={}.{}.{}\n", i % 10, i % 20, i % 30))
        .collect()
}

fn bench_package_json_parse(c: &mut Criterion) {
    let parser = PackageJsonParser;
    let content = package_json_fixture(100);

    c.bench_function("parse_package_json_100_deps", |b| {
        b.iter(|| {
            let deps = parser
                .parse(black_box(&content), "package.json")
                .unwrap();
            black_box(deps)
        })
    });
}

fn bench_requirements_parse(c: &mut Criterion) {
    let parser = RequirementsTxtParser;
    let content = requirements_fixture(100);

    c.bench_function("parse_requirements_100_deps", |b| {
        b.iter(|| {
            let deps = parser
                .parse(black_box(&content), "requirements.txt")
                .unwrap();
            black_box(deps)
        })
    });
}

fn bench_version_normalize(c: &mut Criterion) {
    let inputs = [
        "4.17.21",
        "^4.17.0",
        ">=1.2.3, <2.0.0",
        "~> 6.1",
        "v0.0.0-20230101000000-abcdef123456",
        "1.2.x",
    ];

    c.bench_function("normalize_version_requirements", |b| {
        b.iter(|| {
            for input in &inputs {
                black_box(version::normalize(black_box(input)));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_package_json_parse,
    bench_requirements_parse,
    bench_version_normalize
);
criterion_main!(benches);
