use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vid_core::{PixelFormat, Surface, SurfaceFlags, VideoDevice};
use vid_ogc::OgcVideo;

fn bench_set_mode(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_video_mode");

    for (w, h) in [(640u32, 480u32), (320, 240)] {
        for bpp in [8u8, 16, 24] {
            let mut dev = OgcVideo::new();
            let mut fmt = PixelFormat::default();
            dev.video_init(&mut fmt).unwrap();
            let mut screen = Surface::new();

            group.bench_with_input(
                BenchmarkId::new(format!("{}x{}", w, h), bpp),
                &bpp,
                |b, &bpp| {
                    b.iter(|| {
                        dev.set_video_mode(
                            &mut screen,
                            black_box(w),
                            black_box(h),
                            bpp,
                            SurfaceFlags::FULLSCREEN,
                        )
                        .unwrap();
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_rejected_mode(c: &mut Criterion) {
    let mut dev = OgcVideo::new();
    let mut fmt = PixelFormat::default();
    dev.video_init(&mut fmt).unwrap();
    let mut screen = Surface::new();

    c.bench_function("set_video_mode_rejected", |b| {
        b.iter(|| {
            let _ = dev.set_video_mode(
                &mut screen,
                black_box(800),
                black_box(600),
                16,
                SurfaceFlags::empty(),
            );
        })
    });
}

criterion_group!(benches, bench_set_mode, bench_rejected_mode);
criterion_main!(benches);
