use criterion::{Criterion, black_box, criterion_group, criterion_main};
use scale_ocr::utils::binarization::{otsu_threshold, threshold_binarize};
use scale_ocr::utils::grayscale::rgb_to_grayscale;

fn bench_grayscale_canonical(c: &mut Criterion) {
    let image = vec![128u8; 600 * 180 * 3];
    c.bench_function("rgb_to_grayscale_600x180", |b| {
        b.iter(|| rgb_to_grayscale(black_box(&image), black_box(600), black_box(180)))
    });
}

fn bench_threshold_binarize_canonical(c: &mut Criterion) {
    let gray: Vec<u8> = (0..600 * 180).map(|i| (i % 256) as u8).collect();
    c.bench_function("threshold_binarize_600x180", |b| {
        b.iter(|| {
            threshold_binarize(
                black_box(&gray),
                black_box(600),
                black_box(180),
                black_box(128),
            )
        })
    });
}

fn bench_otsu_threshold_canonical(c: &mut Criterion) {
    let gray: Vec<u8> = (0..600 * 180).map(|i| (i % 256) as u8).collect();
    c.bench_function("otsu_threshold_600x180", |b| {
        b.iter(|| otsu_threshold(black_box(&gray)))
    });
}

criterion_group!(
    benches,
    bench_grayscale_canonical,
    bench_threshold_binarize_canonical,
    bench_otsu_threshold_canonical
);
criterion_main!(benches);
