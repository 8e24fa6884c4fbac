//! Module with the canvas operations performed on every image.

use image::{imageops, RgbaImage};

use model::Color;


/// Height of the strip that a caption of given vertical extent needs.
///
/// Returns `None` if the extent is not a sensible number of pixel rows
/// to add to an image of given height.
pub fn strip_height(extent: f32, image_height: u32) -> Option<u32> {
    if !extent.is_finite() || extent < 0.0 {
        return None;
    }
    let rows = extent.trunc();
    if rows + image_height as f32 > u32::max_value() as f32 {
        return None;
    }
    Some(rows as u32)
}


/// Insert given number of rows of background color above the image.
pub fn splice_top(image: &RgbaImage, rows: u32, background: Color) -> RgbaImage {
    let (width, height) = image.dimensions();
    trace!("Splicing {} row(s) above the {}x{} image", rows, width, height);

    let mut canvas = RgbaImage::from_pixel(width, height + rows, background.to_rgba(0xff));
    imageops::replace(&mut canvas, image, 0, rows as i64);
    canvas
}


#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use spectral::prelude::*;
    use model::Color;
    use super::{splice_top, strip_height};

    #[test]
    fn strip_height_truncates() {
        assert_that!(strip_height(41.9, 100)).is_some().is_equal_to(41);
        assert_that!(strip_height(0.0, 100)).is_some().is_equal_to(0);
        assert_that!(strip_height(::std::f32::NAN, 100)).is_none();
        assert_that!(strip_height(::std::f32::INFINITY, 100)).is_none();
        assert_that!(strip_height(-3.0, 100)).is_none();
        assert_that!(strip_height(5e9, 100)).is_none();
    }

    #[test]
    fn splice_adds_background_above() {
        let img = RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 255]));
        let spliced = splice_top(&img, 5, Color::white());
        assert_eq!((4, 8), spliced.dimensions());
        for y in 0..5 {
            assert_eq!(Rgba([255, 255, 255, 255]), *spliced.get_pixel(3, y));
        }
        for y in 5..8 {
            assert_eq!(Rgba([10, 20, 30, 255]), *spliced.get_pixel(0, y));
        }
    }

    #[test]
    fn splice_keeps_transparency() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0]));
        let spliced = splice_top(&img, 1, Color::white());
        assert_eq!(Rgba([0, 0, 0, 0]), *spliced.get_pixel(1, 2));
    }
}
