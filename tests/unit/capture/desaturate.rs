use super::*;
use crate::foundation::core::Color;

#[test]
fn only_the_legacy_os_major_has_a_ceiling() {
    assert_eq!(
        DesaturationLimit::for_os_major(12),
        Some(DesaturationLimit::LEGACY_FILTER)
    );
    assert_eq!(DesaturationLimit::for_os_major(13), None);
    assert_eq!(DesaturationLimit::for_os_major(11), None);
}

#[test]
fn bitmap_above_ceiling_is_rejected() {
    let bmp = Bitmap::transparent(1400, 1400, 1.0);
    let err = desaturate(bmp, Some(DesaturationLimit::LEGACY_FILTER)).unwrap_err();
    match err {
        SnapshotError::ExceedsMaximumSize {
            view_size,
            maximum_size,
        } => {
            assert_eq!(view_size, PixelSize::new(1400, 1400));
            assert_eq!(maximum_size, PixelSize::new(1365, 1365));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn bitmap_within_ceiling_is_desaturated() {
    let bmp = Bitmap::filled(1200, 1200, 1.0, Color::rgb(255, 0, 0));
    let out = desaturate(bmp, Some(DesaturationLimit::LEGACY_FILTER)).unwrap();
    assert_eq!(out.pixel_size(), PixelSize::new(1200, 1200));
    let px = out.pixel(600, 600).unwrap();
    assert_eq!(px[0], px[1]);
    assert_eq!(px[1], px[2]);
    assert_eq!(px[3], 255);
    assert!(px[0] > 0 && px[0] < 255);
}

#[test]
fn no_limit_means_no_ceiling() {
    let bmp = Bitmap::filled(1400, 10, 1.0, Color::rgb(0, 0, 255));
    assert!(desaturate(bmp, None).is_ok());
}

#[test]
fn alpha_is_preserved() {
    let bmp = Bitmap::filled(2, 2, 1.0, Color::rgb(0, 200, 0).with_alpha(0.5));
    let out = desaturate(bmp, None).unwrap();
    let px = out.pixel(0, 0).unwrap();
    assert_eq!(px[3], 128);
    assert!(px[0] <= px[3]);
}

#[test]
fn empty_bitmap_passes_through() {
    let bmp = Bitmap::transparent(0, 0, 1.0);
    let out = desaturate(bmp.clone(), None).unwrap();
    assert_eq!(out, bmp);
}

#[test]
fn malformed_pixel_buffer_keeps_the_color_bitmap() {
    let mut bmp = Bitmap::filled(4, 4, 1.0, Color::rgb(255, 0, 0));
    bmp.data.truncate(8);
    let out = desaturate(bmp.clone(), None).unwrap();
    assert_eq!(out, bmp);

    let mut bmp = Bitmap::filled(2, 2, 1.0, Color::rgb(0, 0, 255));
    bmp.data.extend_from_slice(&[0, 0, 255, 255]);
    let out = desaturate(bmp.clone(), Some(DesaturationLimit::LEGACY_FILTER)).unwrap();
    assert_eq!(out, bmp);
}
