use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stickcount_core::EdgeMask;
use stickcount_hough::{vote, vote_with_workspace, HoughParams, HoughWorkspace};

/// A few thick diagonal sticks on a 160x120 canvas.
fn synthetic_mask() -> EdgeMask {
    EdgeMask::from_fn(160, 120, |x, y| {
        let (x, y) = (x as i64, y as i64);
        (x - y).abs() <= 1 || (x + y - 150).abs() <= 1 || (x - 2 * y - 20).abs() <= 1
    })
}

fn bench_vote(c: &mut Criterion) {
    let mask = synthetic_mask();
    let params = HoughParams {
        max_width: 6.0,
        vote_threshold: 60,
        maxima_radius: 5,
        ..HoughParams::default()
    };

    c.bench_function("vote_fresh_buffer", |b| {
        b.iter(|| vote(black_box(&mask), black_box(&params)))
    });

    let mut workspace = HoughWorkspace::new();
    c.bench_function("vote_reused_workspace", |b| {
        b.iter(|| vote_with_workspace(black_box(&mask), black_box(&params), &mut workspace))
    });
}

criterion_group!(benches, bench_vote);
criterion_main!(benches);
