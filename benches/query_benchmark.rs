use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use public_holiday_tracker::fetcher::mock_fetcher::{MockFetcher, MockResponse};
use public_holiday_tracker::{HolidayRecord, HolidayRepository, TrackerConfig};
use rand::{rngs::StdRng, Rng, SeedableRng};

// Repository over the default years with `per_year` random holidays each
fn synthetic_repository(per_year: usize) -> HolidayRepository<MockFetcher> {
    let mut rng = StdRng::seed_from_u64(42);
    let config = TrackerConfig::default();
    let fetcher = MockFetcher::new();

    for &year in &config.years {
        let records: Vec<HolidayRecord> = (0..per_year)
            .map(|i| {
                let date = NaiveDate::from_yo_opt(year, rng.gen_range(1..=365)).unwrap();
                HolidayRecord::new(
                    date,
                    &format!("Tatil {i}"),
                    &format!("Holiday {i}"),
                    "TR",
                    false,
                    true,
                )
            })
            .collect();
        fetcher.respond_with(year, MockResponse::holidays(&records));
    }

    let mut repo = HolidayRepository::new(fetcher, &config);
    tokio_test::block_on(repo.load_all());
    repo
}

pub fn query_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("holiday_queries");

    for per_year in [20, 200, 2000] {
        let repo = synthetic_repository(per_year);

        group.bench_with_input(BenchmarkId::new("by_day_month", per_year), &repo, |b, repo| {
            b.iter(|| black_box(repo.query_by_day_month(black_box(1), black_box(5)).unwrap().len()))
        });

        group.bench_with_input(BenchmarkId::new("by_name", per_year), &repo, |b, repo| {
            b.iter(|| black_box(repo.query_by_name(black_box("holiday 1")).unwrap().len()))
        });

        group.bench_with_input(BenchmarkId::new("all_records", per_year), &repo, |b, repo| {
            b.iter(|| black_box(repo.all_records().len()))
        });
    }

    group.finish();
}

criterion_group!(benches, query_benchmark);
criterion_main!(benches);
