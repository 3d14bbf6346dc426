#![cfg(feature = "rayon")]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sublocate::{GrayImage, LocateConfig, Locator};

fn make_image(width: usize, height: usize) -> GrayImage {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let value = ((x * 11) ^ (y * 3) ^ (x * y)) & 0xFF;
            data.push(value as u8);
        }
    }
    GrayImage::new(data, width, height).unwrap()
}

#[test]
fn parallel_matches_sequential_on_extracted_probe() {
    let reference = make_image(120, 90);
    let probe =
        GrayImage::from_view(reference.view().roi(57, 33, 16, 12).unwrap(), 255).unwrap();

    let seq = Locator::default()
        .locate_match(reference.view(), probe.view())
        .unwrap();
    let par = Locator::new(LocateConfig {
        parallel: true,
        ..LocateConfig::default()
    })
    .locate_match(reference.view(), probe.view())
    .unwrap();

    assert_eq!(seq, par);
    assert_eq!((par.offset.x, par.offset.y), (57, 33));
}

#[test]
fn parallel_preserves_tie_break_on_low_entropy_images() {
    let mut rng = StdRng::seed_from_u64(31);
    for early_exit in [false, true] {
        let par = Locator::new(LocateConfig {
            parallel: true,
            early_exit,
        });
        for _ in 0..10 {
            // Two-level images produce many equal-error origins.
            let reference: Vec<u8> = (0..30 * 25).map(|_| rng.random_range(0..2u8)).collect();
            let reference = GrayImage::new(reference, 30, 25).unwrap();
            let probe: Vec<u8> = (0..3 * 2).map(|_| rng.random_range(0..2u8)).collect();
            let probe = GrayImage::new(probe, 3, 2).unwrap();

            let seq = Locator::default()
                .locate_match(reference.view(), probe.view())
                .unwrap();
            let got = par.locate_match(reference.view(), probe.view()).unwrap();
            assert_eq!(seq, got);
        }
    }
}
