use amrgrid_geometry::{BoundingBox, Cell, Point};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn level_cells(level: u32) -> Vec<Cell> {
    let n = 1usize << level;
    let size = 1.0 / n as f64;
    let mut cells = Vec::with_capacity(n * n * n);
    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                let center = Point::new(
                    (i as f64 + 0.5) * size,
                    (j as f64 + 0.5) * size,
                    (k as f64 + 0.5) * size,
                );
                cells.push(Cell::from_center(size, center, cells.len() as i64 + 1));
            }
        }
    }
    cells
}

fn bench_overlap_scan(c: &mut Criterion) {
    let cells = level_cells(5);
    let region = BoundingBox::around(Point::splat(0.5), 1.0 / 64.0);

    c.bench_function("overlap_scan_level5", |b| {
        b.iter(|| {
            black_box(&cells)
                .iter()
                .filter(|cell| cell.overlaps(black_box(&region)))
                .count()
        });
    });
}

fn bench_nearest_scan(c: &mut Criterion) {
    let cells = level_cells(4);
    let p = Point::new(0.31, 0.62, 0.47);

    c.bench_function("nearest_center_scan_level4", |b| {
        b.iter(|| {
            black_box(&cells)
                .iter()
                .map(|cell| cell.distance_to_point(black_box(&p)))
                .fold(f64::INFINITY, f64::min)
        });
    });
}

criterion_group!(benches, bench_overlap_scan, bench_nearest_scan);
criterion_main!(benches);
