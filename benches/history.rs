//! Criterion benchmarks for the webtrail query pipeline.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tokio::runtime::Runtime;

use webtrail::db::HistoryRepo;
use webtrail::domain::{HistoryFilters, PageRequest, VisitRecord};
use webtrail::query::{Predicate, TimeWindow};
use webtrail::site;

const NOW: i64 = 1_700_000_000;

fn bench_time_resolve(c: &mut Criterion) {
    let tokens = ["7d", "all", "100-200", "1-2-3", "garbage"];

    c.bench_function("time_resolve", |b| {
        b.iter(|| {
            for token in tokens {
                black_box(TimeWindow::resolve(black_box(token), NOW));
            }
        });
    });
}

fn bench_predicate_build(c: &mut Criterion) {
    let filters = HistoryFilters {
        keyword: Some("rust".to_string()),
        locale: Some("en-US".to_string()),
        time_range: Some("7d".to_string()),
        sort_by: None,
        sort_order: None,
    };

    c.bench_function("predicate_build", |b| {
        b.iter(|| black_box(Predicate::from_filters(black_box(&filters), NOW)));
    });
}

fn bench_top_sites(c: &mut Criterion) {
    let urls: Vec<String> = (0..10_000)
        .map(|i| format!("https://site{}.example.com/page/{}", i % 200, i))
        .collect();
    let records: Vec<(&str, i64)> = urls
        .iter()
        .enumerate()
        .map(|(i, url)| (url.as_str(), (i % 40) as i64))
        .collect();

    c.bench_function("top_sites_10k", |b| {
        b.iter(|| black_box(site::top_sites(records.iter().copied(), 6)));
    });
}

async fn seeded_repo(rows: i64) -> HistoryRepo {
    let repo = HistoryRepo::connect("sqlite::memory:").await.unwrap();
    let now = chrono::Utc::now().timestamp();

    for i in 0..rows {
        repo.record_visit(&VisitRecord {
            url: format!("https://site{}.example.com/page/{}", i % 50, i),
            title: Some(format!("Page {i} docs")),
            last_visited_time: now - (i % 10_000),
            num_visits: i % 30,
            locale: Some(if i % 3 == 0 { "zh-CN" } else { "en-US" }.to_string()),
        })
        .await
        .unwrap();
    }

    repo
}

fn bench_list_history(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let repo = rt.block_on(seeded_repo(2_000));

    let filters = HistoryFilters {
        keyword: Some("docs".to_string()),
        time_range: Some("7d".to_string()),
        ..Default::default()
    };

    c.bench_function("list_history_2k", |b| {
        b.to_async(&rt).iter(|| async {
            let page = PageRequest::new(1, 50).unwrap();
            black_box(repo.list_history(page, &filters).await.unwrap())
        });
    });
}

fn bench_stats_overview(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let repo = rt.block_on(seeded_repo(2_000));

    c.bench_function("stats_overview_2k", |b| {
        b.to_async(&rt)
            .iter(|| async { black_box(repo.stats_overview("7d", 6).await.unwrap()) });
    });
}

criterion_group!(
    benches,
    bench_time_resolve,
    bench_predicate_build,
    bench_top_sites,
    bench_list_history,
    bench_stats_overview,
);

criterion_main!(benches);
