// benches/partition_bench.rs
//! Benchmarks for interval partitioning and query-response parsing.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use notion2records::{
    decreasing_size_partition_between, intervals_from_boundaries, parse_query_response,
    partition_between, ApiResponse, PageAccumulator, PartitionOptions,
};
use serde_json::json;

// 2023-01-01 and 2024-01-01 in epoch milliseconds
const SPAN_START: f64 = 1_672_531_200_000.0;
const SPAN_END: f64 = 1_704_067_200_000.0;

fn create_query_response_json(rows: usize) -> String {
    let results: Vec<_> = (0..rows)
        .map(|i| {
            json!({
                "object": "page",
                "id": format!("00000000-0000-4000-8000-{:012x}", i),
                "created_time": "2024-01-01T00:00:00.000Z",
                "url": "https://www.notion.so/row",
                "properties": {
                    "Name": {"id": "title", "type": "title", "title": [{"plain_text": format!("Row {}", i), "href": null}]},
                    "Done": {"id": "done", "type": "checkbox", "checkbox": i % 2 == 0},
                    "Score": {"id": "score", "type": "number", "number": i}
                }
            })
        })
        .collect();
    json!({
        "object": "list",
        "results": results,
        "next_cursor": null,
        "has_more": false
    })
    .to_string()
}

fn ok_response(body: String) -> ApiResponse<String> {
    ApiResponse {
        data: body,
        status: reqwest::StatusCode::OK,
        url: "https://api.notion.com/v1/databases/x/query".to_string(),
    }
}

fn bench_partitioning(c: &mut Criterion) {
    let mut group = c.benchmark_group("partitioning");

    for count in [10, 100, 1000] {
        group.bench_with_input(
            BenchmarkId::new("partition_between", count),
            &count,
            |b, &count| b.iter(|| partition_between(black_box(SPAN_START), black_box(SPAN_END), count)),
        );

        let options = PartitionOptions {
            decrease_ratio: 2.0,
            count,
        };
        group.bench_with_input(
            BenchmarkId::new("decreasing_size_partition_between", count),
            &options,
            |b, options| {
                b.iter(|| {
                    let boundaries = decreasing_size_partition_between(
                        black_box(SPAN_START),
                        black_box(SPAN_END),
                        options,
                    )
                    .unwrap();
                    intervals_from_boundaries(&boundaries).unwrap()
                })
            },
        );
    }

    group.finish();
}

fn bench_response_handling(c: &mut Criterion) {
    let mut group = c.benchmark_group("response_handling");

    for rows in [1, 100] {
        let body = create_query_response_json(rows);
        group.bench_with_input(BenchmarkId::new("parse_query_response", rows), &body, |b, body| {
            b.iter(|| {
                parse_query_response(ok_response(black_box(body.clone()))).unwrap()
            })
        });

        let pages = parse_query_response(ok_response(body.clone())).unwrap().results;
        group.bench_with_input(BenchmarkId::new("accumulate_with_duplicates", rows), &pages, |b, pages| {
            b.iter(|| {
                let mut accumulator = PageAccumulator::new();
                accumulator.extend(pages.iter().cloned());
                accumulator.extend(pages.iter().cloned());
                accumulator.len()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_partitioning, bench_response_handling);
criterion_main!(benches);
