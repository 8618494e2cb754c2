use anchorkit::{
    resize, suppress, BBox, Detection, DetectionList, ImageView, ImageViewMut, InterleavedSource,
    Landmarks, OverlapMetric, Region, ResizeMode, ResizeParams, Rgb565Source,
};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn make_image(width: usize, height: usize, channels: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height * channels);
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let value = ((x * 13) ^ (y * 7) ^ (x * y) ^ (c * 31)) & 0xFF;
                data.push(value as u8);
            }
        }
    }
    data
}

fn make_detections(count: usize) -> DetectionList {
    let mut list = DetectionList::with_capacity(count);
    for i in 0..count {
        // Clusters of heavily overlapping boxes on a coarse grid.
        let cx = ((i / 8) % 16) as f32 * 20.0 + (i % 8) as f32;
        let cy = ((i / 128) % 12) as f32 * 20.0 + (i % 5) as f32;
        list.push(Detection {
            category: 0,
            score: 1.0 - i as f32 / count as f32,
            bbox: BBox::new(cx, cy, cx + 23.0, cy + 23.0),
            offset: BBox::default(),
            landmarks: Landmarks::default(),
        });
    }
    list
}

fn bench_resize(c: &mut Criterion) {
    let (src_w, src_h) = (320, 240);
    let rgb = make_image(src_w, src_h, 3);
    let src = InterleavedSource::new(ImageView::from_slice(&rgb, src_w, src_h, 3).unwrap());

    let (dst_w, dst_h) = (160, 120);
    let mut out = vec![0i16; dst_w * dst_h * 3];
    for (name, mode) in [
        ("resize_bilinear_320x240_to_160x120", ResizeMode::Bilinear),
        ("resize_mean_320x240_to_160x120", ResizeMode::Mean),
        ("resize_nearest_320x240_to_160x120", ResizeMode::Nearest),
    ] {
        c.bench_function(name, |b| {
            b.iter(|| {
                let mut dst = ImageViewMut::from_slice(&mut out, dst_w, dst_h, 3).unwrap();
                resize(
                    &src,
                    &mut dst,
                    Region::full(dst_w, dst_h),
                    ResizeParams::new(mode, 4),
                )
                .unwrap();
                black_box(&out);
            });
        });
    }

    let words: Vec<u16> = rgb
        .chunks_exact(3)
        .map(|px| anchorkit::image::color::rgb888_to_rgb565(px[0], px[1], px[2]))
        .collect();
    let packed = Rgb565Source::new(ImageView::from_slice(&words, src_w, src_h, 1).unwrap()).unwrap();
    let mut out_u8 = vec![0u8; dst_w * dst_h * 3];
    c.bench_function("resize_bilinear_rgb565_320x240_to_160x120", |b| {
        b.iter(|| {
            let mut dst = ImageViewMut::from_slice(&mut out_u8, dst_w, dst_h, 3).unwrap();
            resize(
                &packed,
                &mut dst,
                Region::full(dst_w, dst_h),
                ResizeParams::default(),
            )
            .unwrap();
            black_box(&out_u8);
        });
    });

    #[cfg(feature = "rayon")]
    c.bench_function("resize_par_bilinear_320x240_to_160x120", |b| {
        b.iter(|| {
            let mut dst = ImageViewMut::from_slice(&mut out, dst_w, dst_h, 3).unwrap();
            anchorkit::resize_par(
                &src,
                &mut dst,
                Region::full(dst_w, dst_h),
                ResizeParams::new(ResizeMode::Bilinear, 4),
            )
            .unwrap();
            black_box(&out);
        });
    });
}

fn bench_nms(c: &mut Criterion) {
    let detections = make_detections(1500);
    for (name, metric) in [
        ("nms_iou_1500", OverlapMetric::Iou),
        ("nms_min_area_1500", OverlapMetric::MinArea),
    ] {
        c.bench_function(name, |b| {
            b.iter(|| {
                let mut list = detections.clone();
                suppress(&mut list, 0.3, metric).unwrap();
                black_box(list.len());
            });
        });
    }
}

criterion_group!(benches, bench_resize, bench_nms);
criterion_main!(benches);
