use sublocate::image::pgm::{decode_bytes, encode_to_vec};
use sublocate::{GrayImage, ImageView, SubLocateError};

/// Two rows of three samples stored five apart; padding is 99.
const PADDED: [u8; 8] = [1, 2, 3, 99, 99, 4, 5, 6];

#[test]
fn padded_rows_hide_their_padding() {
    let view = ImageView::new(&PADDED, 3, 2, 5).unwrap();
    assert_eq!(view.row(0).unwrap(), &[1u8, 2, 3]);
    assert_eq!(view.row(1).unwrap(), &[4u8, 5, 6]);
    assert!(view.row(2).is_none());
    assert_eq!(view.get(2, 1), Some(6));
    assert_eq!(view.get(3, 0), None);

    let packed = GrayImage::from_view(view, 255).unwrap();
    assert_eq!(packed.data(), &[1, 2, 3, 4, 5, 6]);
}

#[test]
fn last_row_needs_no_padding() {
    // One full stride plus the three samples of the last row.
    let err = ImageView::new(&PADDED[..7], 3, 2, 5).err().unwrap();
    assert_eq!(err, SubLocateError::BufferTooSmall { needed: 8, got: 7 });
}

#[test]
fn view_geometry_is_validated() {
    let err = ImageView::new(&PADDED, 4, 2, 3).err().unwrap();
    assert_eq!(
        err,
        SubLocateError::InvalidStride {
            width: 4,
            stride: 3,
        }
    );

    let err = ImageView::from_slice(&PADDED, 0, 2).err().unwrap();
    assert_eq!(
        err,
        SubLocateError::InvalidDimensions {
            width: 0,
            height: 2,
        }
    );

    let err = ImageView::new(&PADDED, 1, usize::MAX, usize::MAX)
        .err()
        .unwrap();
    assert_eq!(
        err,
        SubLocateError::InvalidDimensions {
            width: 1,
            height: usize::MAX,
        }
    );
}

#[test]
fn nested_windows_address_the_reference() {
    // Each sample holds 10 * row + column.
    let samples: Vec<u8> = (0u8..5)
        .flat_map(|y| (0u8..6).map(move |x| 10 * y + x))
        .collect();
    let reference = ImageView::from_slice(&samples, 6, 5).unwrap();

    let outer = reference.roi(1, 1, 4, 3).unwrap();
    let inner = outer.roi(2, 1, 2, 2).unwrap();
    assert_eq!(inner.stride(), 6);
    assert_eq!(inner.row(0).unwrap(), &[23u8, 24]);
    assert_eq!(inner.row(1).unwrap(), &[33u8, 34]);
    assert_eq!(inner.get(1, 1), Some(34));
}

#[test]
fn window_must_fit_inside_its_parent() {
    let samples = [0u8; 12];
    let view = ImageView::from_slice(&samples, 4, 3).unwrap();
    assert!(view.roi(2, 1, 2, 2).is_ok());

    let err = view.roi(2, 2, 2, 2).err().unwrap();
    assert_eq!(
        err,
        SubLocateError::RoiOutOfBounds {
            x: 2,
            y: 2,
            width: 2,
            height: 2,
            img_width: 4,
            img_height: 3,
        }
    );

    let err = view.roi(0, 0, 0, 1).err().unwrap();
    assert_eq!(
        err,
        SubLocateError::InvalidDimensions {
            width: 0,
            height: 1,
        }
    );
}

#[test]
fn gray_image_rejects_zero_area_and_wrong_length() {
    let err = GrayImage::new(Vec::new(), 0, 3).err().unwrap();
    assert_eq!(
        err,
        SubLocateError::InvalidDimensions {
            width: 0,
            height: 3,
        }
    );

    let err = GrayImage::new(vec![0u8; 5], 2, 3).err().unwrap();
    assert_eq!(err, SubLocateError::BufferTooSmall { needed: 6, got: 5 });

    let err = GrayImage::new(vec![0u8; 7], 2, 3).err().unwrap();
    assert_eq!(
        err,
        SubLocateError::InvalidDimensions {
            width: 2,
            height: 3,
        }
    );
}

#[test]
fn gray_image_access_is_bounds_checked() {
    let img = GrayImage::new(vec![1, 2, 3, 4, 5, 6], 3, 2).unwrap();
    assert_eq!(img.get(2, 1), Some(6));
    assert_eq!(img.get(3, 0), None);
    assert_eq!(img.get(0, 2), None);
    assert_eq!(img.max_value(), 255);
}

#[test]
fn pgm_codec_preserves_samples_and_max_value() {
    let data: Vec<u8> = (0..35).map(|i| (i * 3) as u8).collect();
    let img = GrayImage::with_max_value(data, 7, 5, 120).unwrap();
    let back = decode_bytes(&encode_to_vec(&img)).unwrap();
    assert_eq!(back.width(), 7);
    assert_eq!(back.height(), 5);
    assert_eq!(back.max_value(), 120);
    assert_eq!(back.data(), img.data());
}

#[test]
fn pgm_decoder_rejects_ascii_graymap() {
    let err = decode_bytes(b"P2\n2 1\n255\n0 0\n").err().unwrap();
    assert!(matches!(err, SubLocateError::Format { .. }));
}

#[test]
fn pgm_decoder_rejects_samples_above_header_max() {
    let err = decode_bytes(b"P5\n2 1\n100\n\x10\xff").err().unwrap();
    assert_eq!(
        err,
        SubLocateError::SampleOutOfRange {
            value: 255,
            max_value: 100,
        }
    );
}
