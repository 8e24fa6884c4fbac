//! Module responsible for measuring & rendering text.

mod layer;
mod measurer;

pub use self::layer::TextLayer;
pub use self::measurer::Measurer;


use layout::GlyphMetrics;


/// A font that text can be measured & rendered with.
pub trait Typeface {
    /// Measure given string rendered at given size (in pixels).
    fn metrics(&self, size: f32, text: &str) -> GlyphMetrics;

    /// Rasterize given string at given size (in pixels).
    ///
    /// The pen starts at the origin on the baseline, with the x axis
    /// pointing right and the y axis pointing *down*.
    /// The `plot` function receives pixel coordinates and coverage (0.0 - 1.0).
    fn rasterize(&self, size: f32, text: &str, plot: &mut dyn FnMut(i32, i32, f32));

    /// Whether the typeface has a glyph for given character.
    fn has_glyph(&self, c: char) -> bool;
}


/// Check if the typeface has glyphs for all characters in given text.
/// Log a warning for each one that's missing and return them.
pub fn check<T: Typeface + ?Sized>(face: &T, text: &str) -> Vec<char> {
    let mut missing: Vec<char> = text.chars()
        .filter(|c| !c.is_whitespace() && !face.has_glyph(*c))
        .collect();
    missing.sort();
    missing.dedup();
    for c in &missing {
        warn!("Missing glyph for character {:?} (U+{:04X})", c, *c as u32);
    }
    missing
}


#[cfg(test)]
pub(crate) mod testing {
    use layout::{Bounds, GlyphMetrics};
    use super::Typeface;

    /// Typeface which renders every (ASCII) character as a filled box.
    ///
    /// At size `s`, characters are `s/2` wide and spaces `s/4`,
    /// with ascent of `0.8 * s` and descent of `-0.2 * s`.
    /// Boxes are `0.6 * s` tall, starting at the baseline.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct BoxFace;

    impl BoxFace {
        fn advance(size: f32, c: char) -> f32 {
            if c == ' ' { size / 4.0 } else { size / 2.0 }
        }
    }

    impl Typeface for BoxFace {
        fn metrics(&self, size: f32, text: &str) -> GlyphMetrics {
            let width = text.chars().map(|c| Self::advance(size, c)).sum();
            let has_ink = text.chars().any(|c| c != ' ');
            GlyphMetrics{
                width,
                height: size,
                ascent: 0.8 * size,
                descent: -0.2 * size,
                bounds: if has_ink {
                    Bounds{min_x: 0.0, min_y: 0.0, max_x: width, max_y: 0.6 * size}
                } else {
                    Bounds::default()
                },
            }
        }

        fn rasterize(&self, size: f32, text: &str, plot: &mut dyn FnMut(i32, i32, f32)) {
            let top = -(0.6 * size) as i32;
            let mut pen = 0.0;
            for c in text.chars() {
                let advance = Self::advance(size, c);
                if c != ' ' {
                    for x in (pen as i32 + 1)..((pen + advance) as i32 - 1) {
                        for y in top..0 {
                            plot(x, y, 1.0);
                        }
                    }
                }
                pen += advance;
            }
        }

        fn has_glyph(&self, c: char) -> bool {
            c.is_ascii()
        }
    }
}
