//! Module defining text measurements.


/// Metrics of a string of text rendered in particular font & size.
///
/// All values are in pixels. Vertical values use the typographic convention
/// where the baseline is at 0 and the y axis points *up*,
/// so `ascent` is positive and `descent` is (usually) negative.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GlyphMetrics {
    /// Horizontal advance of the whole string.
    pub width: f32,
    /// Height of a line of text, from the descent line to the ascent line.
    pub height: f32,
    /// Distance from the baseline to the top of the tallest glyphs in the font.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the deepest glyphs in the font.
    pub descent: f32,
    /// Bounding box of the ink actually drawn for this string.
    pub bounds: Bounds,
}

/// Bounding box of rendered text, relative to the origin on the baseline.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}


/// Something that can measure text in a fixed font & size.
pub trait Measure {
    /// Measure given string.
    fn metrics(&self, text: &str) -> GlyphMetrics;

    /// Measure just the width of given string.
    #[inline]
    fn width(&self, text: &str) -> f32 {
        self.metrics(text).width
    }
}

impl<'m, M: Measure + ?Sized> Measure for &'m M {
    #[inline]
    fn metrics(&self, text: &str) -> GlyphMetrics {
        (**self).metrics(text)
    }

    #[inline]
    fn width(&self, text: &str) -> f32 {
        (**self).width(text)
    }
}
