use cgmath::{vec2, Point2};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use grid2d::OffsetGrid;
use stipple::{
    ab::Symbol,
    app::{Session, SessionConfig},
    color::{Color, ColorSlot, Palette},
    shape::Shape,
    tiling::tile_mask,
};

fn criterion_benchmark(c: &mut Criterion) {
    let sides = [16, 40, 80, 160];

    let mut group = c.benchmark_group("tile_mask");
    for &side in sides.iter() {
        group.throughput(Throughput::Elements((side * side) as u64));
        group.bench_function(BenchmarkId::new("circle", side), move |b| {
            let mut mask = OffsetGrid::new(Shape::Circle.generate(side, Symbol::B), vec2(0, 0));
            let mut i = 0;

            b.iter(|| {
                // Move by an odd distance so that every alignment is visited
                i = (i + 3) % 64;
                mask.set_offset(vec2(i, i));
                tile_mask(
                    black_box(&mask),
                    ColorSlot::Empty,
                    Color::Indexed(1).into(),
                )
            });
        });
    }
    group.finish();

    c.bench_function("session_tick", |b| {
        let mut session = Session::new(SessionConfig::default(), Palette::blue_sky());
        let mut i = 0;

        b.iter(|| {
            i = (i + 5) % 500;
            session.pointer_moved(Point2::new(i, i));
            session.tick();
        });
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
