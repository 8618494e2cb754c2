use anchorkit::image::color::{convert_rgb565_to_rgb888, rgb565_to_rgb888};
use anchorkit::{
    downsample_2x, resize, resize_tile, resize_to_owned, AnchorKitError, ImageView, ImageViewMut,
    InterleavedSource, OwnedImage, Region, ResizeMode, ResizeParams, Rgb565Source,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MODES: [ResizeMode; 3] = [ResizeMode::Bilinear, ResizeMode::Mean, ResizeMode::Nearest];

fn random_pixels(rng: &mut StdRng, len: usize) -> Vec<u8> {
    (0..len).map(|_| rng.random_range(0..=255)).collect()
}

#[test]
fn same_size_nearest_is_identity() {
    let mut rng = StdRng::seed_from_u64(1);
    let (width, height) = (13, 7);
    let data = random_pixels(&mut rng, width * height * 3);
    let src = InterleavedSource::new(ImageView::from_slice(&data, width, height, 3).unwrap());

    let out: OwnedImage<u8> =
        resize_to_owned(&src, width, height, ResizeParams::new(ResizeMode::Nearest, 0)).unwrap();
    assert_eq!(out.data(), data.as_slice());

    let out: OwnedImage<u8> =
        resize_to_owned(&src, width, height, ResizeParams::new(ResizeMode::Bilinear, 0)).unwrap();
    assert_eq!(out.data(), data.as_slice());
}

#[test]
fn same_size_nearest_on_packed_source_matches_decode() {
    let mut rng = StdRng::seed_from_u64(2);
    let (width, height) = (9, 6);
    let words: Vec<u16> = (0..width * height).map(|_| rng.random()).collect();
    let view = ImageView::from_slice(&words, width, height, 1).unwrap();

    let mut decoded = vec![0u8; width * height * 3];
    convert_rgb565_to_rgb888(
        view,
        &mut ImageViewMut::from_slice(&mut decoded, width, height, 3).unwrap(),
    )
    .unwrap();

    let src = Rgb565Source::new(view).unwrap();
    let out: OwnedImage<u8> =
        resize_to_owned(&src, width, height, ResizeParams::new(ResizeMode::Nearest, 0)).unwrap();
    assert_eq!(out.data(), decoded.as_slice());
}

#[test]
fn two_by_two_bilinear_stays_in_bounds_for_any_size() {
    let data = [10u8, 200, 60, 90];
    let src = InterleavedSource::new(ImageView::from_slice(&data, 2, 2, 1).unwrap());
    for height in 1..=17 {
        for width in 1..=17 {
            let out: OwnedImage<u8> =
                resize_to_owned(&src, width, height, ResizeParams::default()).unwrap();
            assert!(out.data().iter().all(|&v| (10..=200).contains(&v)));
        }
    }
}

#[test]
fn single_pixel_source_fills_any_destination() {
    let data = [42u8, 7, 99];
    let src = InterleavedSource::new(ImageView::from_slice(&data, 1, 1, 3).unwrap());
    for mode in MODES {
        // Mean sums the same pixel four times and divides by four.
        let out: OwnedImage<u8> =
            resize_to_owned(&src, 5, 4, ResizeParams::new(mode, 0)).unwrap();
        for px in out.data().chunks_exact(3) {
            assert_eq!(px, &data, "{mode:?}");
        }
    }
}

#[test]
fn bilinear_upscale_matches_hand_computed_row() {
    let data = [0u8, 100];
    let src = InterleavedSource::new(ImageView::from_slice(&data, 2, 1, 1).unwrap());
    let out: OwnedImage<u8> = resize_to_owned(&src, 4, 1, ResizeParams::default()).unwrap();
    assert_eq!(out.data(), &[0u8, 25, 75, 100]);
}

#[test]
fn bilinear_rounds_half_values_away_from_zero() {
    // Halving a 2-pixel row samples exactly between the two: 0.5 and 2.5.
    for (data, expected) in [([0u8, 1], 1u8), ([2, 3], 3)] {
        let src = InterleavedSource::new(ImageView::from_slice(&data, 2, 1, 1).unwrap());
        let out: OwnedImage<u8> = resize_to_owned(&src, 1, 1, ResizeParams::default()).unwrap();
        assert_eq!(out.data(), &[expected], "{data:?}");
    }
}

#[test]
fn same_size_bilinear_keeps_the_last_pixel() {
    let data = [0u8, 100, 200];
    let src = InterleavedSource::new(ImageView::from_slice(&data, 3, 1, 1).unwrap());
    let out: OwnedImage<u8> = resize_to_owned(&src, 3, 1, ResizeParams::default()).unwrap();
    assert_eq!(out.data(), &data);
}

#[test]
fn mean_mode_averages_blocks_through_the_shift() {
    let data: Vec<u8> = (0u8..16).collect();
    let src = InterleavedSource::new(ImageView::from_slice(&data, 4, 4, 1).unwrap());

    let avg: OwnedImage<u8> =
        resize_to_owned(&src, 2, 2, ResizeParams::new(ResizeMode::Mean, 0)).unwrap();
    assert_eq!(avg.data(), &[2u8, 4, 10, 12]);

    // shift 2 cancels the implicit divide: raw block sums.
    let sums: OwnedImage<i16> =
        resize_to_owned(&src, 2, 2, ResizeParams::new(ResizeMode::Mean, 2)).unwrap();
    assert_eq!(sums.data(), &[10i16, 18, 42, 50]);
}

#[test]
fn mean_mode_treats_all_channels_alike() {
    let mut rng = StdRng::seed_from_u64(4);
    let data = random_pixels(&mut rng, 8 * 8 * 3);
    let src = InterleavedSource::new(ImageView::from_slice(&data, 8, 8, 3).unwrap());
    let out: OwnedImage<u8> =
        resize_to_owned(&src, 4, 4, ResizeParams::new(ResizeMode::Mean, 0)).unwrap();

    for y in 0..4 {
        for x in 0..4 {
            for c in 0..3 {
                let at = |sx: usize, sy: usize| u32::from(data[(sy * 8 + sx) * 3 + c]);
                let sum = at(2 * x, 2 * y)
                    + at(2 * x + 1, 2 * y)
                    + at(2 * x, 2 * y + 1)
                    + at(2 * x + 1, 2 * y + 1);
                assert_eq!(u32::from(out.data()[(y * 4 + x) * 3 + c]), sum >> 2);
            }
        }
    }
}

#[test]
fn odd_downscale_never_reads_past_the_edge() {
    let mut rng = StdRng::seed_from_u64(5);
    let data = random_pixels(&mut rng, 3 * 3);
    let src = InterleavedSource::new(ImageView::from_slice(&data, 3, 3, 1).unwrap());
    for mode in MODES {
        for size in 1..=7 {
            let out: OwnedImage<u8> =
                resize_to_owned(&src, size, size, ResizeParams::new(mode, 0)).unwrap();
            assert_eq!(out.data().len(), size * size);
        }
    }
}

#[test]
fn shift_scales_output_both_ways() {
    let data = [3u8, 8, 255, 1];
    let src = InterleavedSource::new(ImageView::from_slice(&data, 2, 2, 1).unwrap());

    let up: OwnedImage<i16> =
        resize_to_owned(&src, 2, 2, ResizeParams::new(ResizeMode::Nearest, 4)).unwrap();
    assert_eq!(up.data(), &[48i16, 128, 4080, 16]);

    let down: OwnedImage<u8> =
        resize_to_owned(&src, 2, 2, ResizeParams::new(ResizeMode::Nearest, -1)).unwrap();
    assert_eq!(down.data(), &[1u8, 4, 127, 0]);

    // u8 output saturates instead of wrapping.
    let saturated: OwnedImage<u8> =
        resize_to_owned(&src, 2, 2, ResizeParams::new(ResizeMode::Nearest, 1)).unwrap();
    assert_eq!(saturated.data(), &[6u8, 16, 255, 2]);
}

#[test]
fn tiles_reproduce_the_full_resize() {
    let mut rng = StdRng::seed_from_u64(6);
    let (src_w, src_h) = (20, 15);
    let (dst_w, dst_h) = (37, 23);
    let data = random_pixels(&mut rng, src_w * src_h * 3);
    let src = InterleavedSource::new(ImageView::from_slice(&data, src_w, src_h, 3).unwrap());
    let target = Region::full(dst_w, dst_h);

    for mode in MODES {
        let params = ResizeParams::new(mode, 0);
        let mut full = vec![0u8; dst_w * dst_h * 3];
        resize(
            &src,
            &mut ImageViewMut::from_slice(&mut full, dst_w, dst_h, 3).unwrap(),
            target,
            params,
        )
        .unwrap();

        let mut tiled = vec![0u8; dst_w * dst_h * 3];
        let mut view = ImageViewMut::from_slice(&mut tiled, dst_w, dst_h, 3).unwrap();
        for tile in [
            Region::new(0, 0, 20, 10),
            Region::new(20, 0, 17, 10),
            Region::new(0, 10, 37, 13),
        ] {
            resize_tile(&src, &mut view, target, tile, params).unwrap();
        }
        assert_eq!(full, tiled, "{mode:?}");
    }
}

#[test]
fn target_region_places_source_inside_canvas() {
    let data: Vec<u8> = (1u8..=16).collect();
    let src = InterleavedSource::new(ImageView::from_slice(&data, 4, 4, 1).unwrap());
    let mut canvas = vec![0u8; 8 * 6];
    resize(
        &src,
        &mut ImageViewMut::from_slice(&mut canvas, 8, 6, 1).unwrap(),
        Region::new(2, 1, 4, 4),
        ResizeParams::new(ResizeMode::Nearest, 0),
    )
    .unwrap();

    let view = ImageView::from_slice(&canvas, 8, 6, 1).unwrap();
    for y in 0..6 {
        for x in 0..8 {
            let value = view.pixel(x, y).unwrap()[0];
            if (2..6).contains(&x) && (1..5).contains(&y) {
                assert_eq!(value, data[(y - 1) * 4 + (x - 2)]);
            } else {
                assert_eq!(value, 0);
            }
        }
    }
}

#[test]
fn packed_source_bilinear_keeps_flat_color() {
    let word = anchorkit::image::color::rgb888_to_rgb565(200, 100, 40);
    let words = vec![word; 6 * 4];
    let src = Rgb565Source::new(ImageView::from_slice(&words, 6, 4, 1).unwrap()).unwrap();
    let expected = rgb565_to_rgb888(word);
    let out: OwnedImage<u8> = resize_to_owned(&src, 11, 3, ResizeParams::default()).unwrap();
    for px in out.data().chunks_exact(3) {
        assert_eq!(px, &expected);
    }
}

#[test]
fn precondition_violations_are_reported() {
    let data = [0u8; 12];
    let src = InterleavedSource::new(ImageView::from_slice(&data, 2, 2, 3).unwrap());

    let mut gray = vec![0u8; 16];
    let err = resize(
        &src,
        &mut ImageViewMut::from_slice(&mut gray, 4, 4, 1).unwrap(),
        Region::full(4, 4),
        ResizeParams::default(),
    )
    .unwrap_err();
    assert_eq!(err, AnchorKitError::ChannelMismatch { src: 3, dst: 1 });

    let mut rgb = vec![0u8; 48];
    let mut dst = ImageViewMut::from_slice(&mut rgb, 4, 4, 3).unwrap();
    assert!(matches!(
        resize(&src, &mut dst, Region::new(2, 2, 4, 4), ResizeParams::default()),
        Err(AnchorKitError::RegionOutOfBounds { .. })
    ));
    assert!(matches!(
        resize_tile(
            &src,
            &mut dst,
            Region::full(2, 2),
            Region::new(1, 1, 2, 2),
            ResizeParams::default()
        ),
        Err(AnchorKitError::RegionOutOfBounds { .. })
    ));
    assert_eq!(
        resize(
            &src,
            &mut dst,
            Region::full(4, 4),
            ResizeParams::new(ResizeMode::Nearest, 40)
        )
        .unwrap_err(),
        AnchorKitError::InvalidShift { shift: 40 }
    );
}

#[test]
fn downsample_2x_matches_rounded_block_mean() {
    let data: Vec<u8> = (0u8..48).collect();
    let half = downsample_2x(ImageView::from_slice(&data, 4, 4, 3).unwrap(), 3).unwrap();
    assert_eq!((half.width(), half.height(), half.channels()), (2, 2, 3));
    // Top-left red: (0 + 3 + 12 + 15 + 2) / 4 = 8.
    assert_eq!(half.data()[0], 8);
}
