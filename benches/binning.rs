use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tilebin::{AggregateRow, BinningPlan, Bounds, LodResult, TileCoord, assemble_grid, morton};

fn benchmark_grid_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_assembly");

    let extent = Bounds::new(0.0, 1_000_000.0, 0.0, 1_000_000.0);
    let plan = BinningPlan::new(&TileCoord::new(0, 0, 0), &extent, 256).unwrap();

    for row_count in [1_000usize, 10_000, 100_000] {
        let rows: Vec<AggregateRow> = (0..row_count)
            .map(|i| {
                AggregateRow::new(
                    ((i * 37) % 1_000_000) as i64,
                    ((i * 101) % 1_000_000) as i64,
                    1.0,
                )
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::new("assemble", row_count),
            &rows,
            |b, rows| b.iter(|| assemble_grid(black_box(rows), black_box(&plan))),
        );
    }

    group.finish();
}

fn benchmark_morton(c: &mut Criterion) {
    let mut group = c.benchmark_group("morton");

    group.bench_function("key", |b| {
        b.iter(|| morton(black_box(12345.6), black_box(54321.2)))
    });

    for point_count in [1_000usize, 50_000] {
        let points: Vec<f32> = (0..point_count * 2)
            .map(|i| ((i * 971) % 4096) as f32)
            .collect();

        group.bench_with_input(
            BenchmarkId::new("lod_encode", point_count),
            &points,
            |b, points| b.iter(|| LodResult::build(black_box(points), None, 4).unwrap()),
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_grid_assembly, benchmark_morton);
criterion_main!(benches);
