use criterion::{black_box, criterion_group, criterion_main, Criterion};
use procto_table::data::data_view::{DataView, SortConfig, Stages};
use procto_table::data::datatable::{DataColumn, DataRow, DataTable};
use procto_table::data::view_state::{PageSize, ViewState};
use std::sync::Arc;

fn create_test_data(rows: usize) -> DataTable<DataRow> {
    let exams = [
        "Calculus I",
        "Physics II",
        "Organic Chemistry",
        "Statistics",
        "Linear Algebra",
        "Microeconomics",
    ];

    let data = (0..rows).map(|i| {
        DataRow::new(format!("r{}", i))
            .with("name", format!("Student {}", i))
            .with("exam", exams[i % exams.len()])
            .with("score", ((i * 37) % 101) as i64)
    });

    DataTable::from_rows(
        "bench",
        vec![
            DataColumn::new("name".to_string(), "Name"),
            DataColumn::new("exam".to_string(), "Exam"),
            DataColumn::new("score".to_string(), "Score"),
        ],
        data,
    )
    .expect("unique ids")
}

fn benchmark_pipeline(c: &mut Criterion) {
    let table_10k = Arc::new(create_test_data(10_000));
    let table_100k = Arc::new(create_test_data(100_000));

    let mut state = ViewState::new(PageSize::TwentyFive);
    state.set_query("physics");
    state.request_sort("score".to_string());
    state.set_page(3);

    let mut group = c.benchmark_group("filter_sort_paginate");

    group.bench_function("10k_rows", |b| {
        b.iter(|| {
            let view = DataView::derive(table_10k.clone(), black_box(&state), Stages::default());
            assert_eq!(view.row_count(), 25);
        });
    });

    group.bench_function("100k_rows", |b| {
        b.iter(|| {
            let view = DataView::derive(table_100k.clone(), black_box(&state), Stages::default());
            assert_eq!(view.row_count(), 25);
        });
    });

    group.finish();
}

fn benchmark_sort_only(c: &mut Criterion) {
    let table = Arc::new(create_test_data(50_000));
    let sort = SortConfig::descending("name".to_string());

    c.bench_function("sort_50k_by_text", |b| {
        b.iter(|| {
            let view = DataView::new(table.clone()).sort_by(Some(black_box(&sort)), true);
            assert_eq!(view.total_count(), 50_000);
        });
    });
}

criterion_group!(benches, benchmark_pipeline, benchmark_sort_only);
criterion_main!(benches);
