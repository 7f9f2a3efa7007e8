//! Extraction chain benchmark
//!
//! Measures the strategy chain on a staff table page (first strategy wins)
//! and on a page where only the last strategy finds anything.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tennis_coach_scraper::infrastructure::parsing::{classify, ExtractionConfig, ExtractionEngine};

const SURNAMES: &[&str] = &[
    "Rivera", "Nguyen", "Okafor", "Lindqvist", "Moreau", "Tanaka", "Schultz", "Oduya", "Kowalski",
    "Delgado", "Brennan", "Haddad",
];

fn surname(i: usize) -> &'static str {
    SURNAMES[i % SURNAMES.len()]
}

fn table_page(rows: usize) -> String {
    let body: String = (0..rows)
        .map(|i| {
            let title = if i == 0 { "Head Coach" } else { "Assistant Coach" };
            let last = surname(i);
            format!(
                r#"<tr><td>Jordan {last}</td><td>{title}</td><td><a href="mailto:c{i}@x.edu">Email</a></td></tr>"#
            )
        })
        .collect();
    format!("<html><body><nav>Tickets Schedule Roster</nav><table>{body}</table></body></html>")
}

fn mailto_only_page(people: usize) -> String {
    let body: String = (0..people)
        .map(|i| {
            let last = surname(i);
            format!(
                r#"<div><p>Casey {last}, Assistant Coach</p><a href="mailto:s{i}@x.edu">Email</a></div>"#
            )
        })
        .collect();
    format!("<html><body>{body}</body></html>")
}

fn extraction_chain(c: &mut Criterion) {
    let engine = ExtractionEngine::new(&ExtractionConfig::default()).expect("default config");
    let table = table_page(12);
    let mailto = mailto_only_page(12);

    let mut group = c.benchmark_group("extraction_chain");
    group.bench_function("table_short_circuit", |b| {
        b.iter(|| engine.extract_html(black_box(&table), "https://x.edu/coaches"));
    });
    group.bench_function("contact_anchor_fallthrough", |b| {
        b.iter(|| engine.extract_html(black_box(&mailto), "https://x.edu/coaches"));
    });
    group.bench_function("extract_and_classify", |b| {
        b.iter(|| {
            let extraction = engine.extract_html(black_box(&table), "https://x.edu/coaches");
            classify(extraction.candidates)
        });
    });
    group.finish();
}

criterion_group!(benches, extraction_chain);
criterion_main!(benches);
