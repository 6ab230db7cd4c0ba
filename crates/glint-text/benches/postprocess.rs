//! Benchmarks for the glyph edge recoloring pass

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use glint_core::geometry::{Rect, Size};
use glint_render::Rgba8;
use glint_text::{PixelFormat, Surface, recolor_edges, recolor_pixel};

/// A surface cleared to black with a diagonal gradient in every other
/// column, roughly the mix of background and edge pixels glyphs produce.
fn striped_surface(size: u32) -> Surface {
    let mut surface = Surface::new(Size::new(size, size), PixelFormat::Bgra8);
    surface.fill(Rgba8::BLACK);
    for y in 0..size {
        for x in (0..size).step_by(2) {
            let v = ((x + y) % 256) as u8;
            surface.set_pixel(x, y, Rgba8::rgb(v, v, v));
        }
    }
    surface
}

fn bench_recolor_pixel(c: &mut Criterion) {
    c.bench_function("recolor_pixel", |b| {
        b.iter(|| black_box(recolor_pixel(black_box([40, 80, 120, 255]), Rgba8::WHITE)));
    });
}

fn bench_recolor_edges(c: &mut Criterion) {
    let mut group = c.benchmark_group("recolor_edges");

    for size in [16u32, 64, 256, 1024] {
        group.throughput(Throughput::Elements(size as u64 * size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let template = striped_surface(size);
            b.iter_batched(
                || template.clone(),
                |mut surface| {
                    let rect = Rect::new(0, 0, size, size);
                    black_box(recolor_edges(&mut surface, rect, Rgba8::BLACK, Rgba8::WHITE))
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_recolor_pixel, bench_recolor_edges);
criterion_main!(benches);
