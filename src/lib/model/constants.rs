//! Module defining constants relevant to the data model.

use super::types::Color;


/// Default horizontal padding, in percent of the image width.
pub const DEFAULT_X_PADDING: f32 = 5.0;
/// Default vertical padding, in percent of the font size.
pub const DEFAULT_Y_PADDING: f32 = 30.0;
/// Default extra spacing between lines, in pixels.
pub const DEFAULT_LINE_HEIGHT: f32 = 0.0;

/// When no font size is given, it is the image width divided by this.
pub const FONT_SIZE_DIVISOR: f32 = 15.0;
/// When no stroke width is given, it is the font size divided by this.
pub const STROKE_WIDTH_DIVISOR: f32 = 40.0;

/// Suffix added to the input file stem to form the default output file name.
pub const OUTPUT_SUFFIX: &'static str = "_memed";

/// Default color of the text in a single caption meme.
pub const DEFAULT_COLOR: Color = Color(0x0, 0x0, 0x0);
/// Color of the text in a top & bottom ("impact") meme.
pub const IMPACT_COLOR: Color = Color(0xff, 0xff, 0xff);
/// Color of the text outline in a top & bottom meme.
/// This should be the inversion of IMPACT_COLOR.
pub const IMPACT_OUTLINE_COLOR: Color = Color(0x0, 0x0, 0x0);
/// Color of the canvas area added above the image.
pub const BACKGROUND_COLOR: Color = Color(0xff, 0xff, 0xff);
