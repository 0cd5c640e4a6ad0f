//! Benchmarks for settings resolution.
//!
//! These benchmarks measure parsing a settings document and running both
//! resolution passes for one environment and configuration.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use natrium::config::SettingsDocument;
use natrium::phases::resolution;
use natrium::resolve::Selector;

/// A document touching every category the resolver handles.
const TYPICAL_SETTINGS: &str = r#"
environments: [Development, Staging, Production]

natrium_variables:
  host:
    Development: dev.example.com
    Staging: staging.example.com
    Production: example.com

xcconfig:
  PRODUCT_BUNDLE_IDENTIFIER:
    Development,Staging: com.example.app.beta
    Production: com.example.app
  API_URL: https://${host}
  DEBUG_INFORMATION_FORMAT:
    "*":
      Debug: dwarf
      Release: dwarf-with-dsym

variables:
  apiHost: ${host}
  retries: 3
  timeout: 2.5
  debugMenu:
    Development,Staging: true
    Production:
      Debug: true
      Release: false

infoplist:
  CFBundleDisplayName:
    Production: App
    "*": App Beta

target_specific:
  Widget:
    variables:
      apiHost: widget.${host}
"#;

fn generate_settings(num_variables: usize) -> String {
    let mut settings = String::from("environments: [Staging, Production]\n\nnatrium_variables:\n");
    settings.push_str("  host:\n    Staging: staging.example.com\n    Production: example.com\n");

    settings.push_str("\nxcconfig:\n");
    for i in 0..num_variables {
        settings.push_str(&format!(
            "  SETTING_{}:\n    \"*\":\n      Debug: https://${{host}}/debug/{}\n      Release: https://${{host}}/{}\n",
            i, i, i
        ));
    }

    settings.push_str("\nvariables:\n");
    for i in 0..num_variables {
        settings.push_str(&format!(
            "  variable{}:\n    Staging: staging-{}-${{host}}\n    Production: {}\n",
            i, i, i
        ));
    }

    settings
}

fn bench_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolution");
    let document = SettingsDocument::parse(TYPICAL_SETTINGS).unwrap();
    let selector = Selector::new("Staging", "Debug");

    group.bench_function("parse", |b| {
        b.iter(|| SettingsDocument::parse(black_box(TYPICAL_SETTINGS)))
    });

    group.bench_function("resolve", |b| {
        b.iter(|| resolution::execute(black_box(&document), &selector, None))
    });

    group.bench_function("resolve_with_target", |b| {
        b.iter(|| resolution::execute(black_box(&document), &selector, Some("Widget")))
    });

    group.finish();
}

fn bench_resolution_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolution_scaling");
    let selector = Selector::new("Staging", "Release");

    for num_variables in [10, 50, 200] {
        let document = SettingsDocument::parse(&generate_settings(num_variables)).unwrap();
        group.bench_with_input(
            BenchmarkId::new("variables", num_variables),
            &document,
            |b, document| b.iter(|| resolution::execute(black_box(document), &selector, None)),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_resolution, bench_resolution_scaling);
criterion_main!(benches);
