//! Module implementing the `CaptionRequest` type and its builder.

use std::error;
use std::fmt;
use std::path::{Path, PathBuf};

use model::constants::{DEFAULT_LINE_HEIGHT, DEFAULT_X_PADDING, DEFAULT_Y_PADDING};
use super::color::Color;


/// Describes a captioning operation. Used as an input structure.
///
/// Optional parameters left as `None` are resolved against the source image
/// (and the `Engine` configuration) when captioning is performed.
#[derive(Clone, PartialEq)]
pub struct CaptionRequest {
    /// Path to the source image (still image or animated GIF).
    pub source: PathBuf,
    /// Text of the main (top) caption.
    pub caption: String,
    /// Text of the bottom caption.
    ///
    /// If present and non-empty, the request produces a top & bottom meme
    /// with outlined text drawn over the image.
    pub bottom_caption: Option<String>,
    /// Horizontal padding, as percentage of the image width.
    pub x_padding: f32,
    /// Vertical padding, as percentage of the font size.
    pub y_padding: f32,
    /// Name of the font to render captions with.
    pub font: Option<String>,
    /// Font size in pixels.
    pub font_size: Option<f32>,
    /// Extra spacing between lines of a caption, in pixels.
    pub line_height: f32,
    /// Color of the text in a single caption meme.
    pub color: Option<Color>,
    /// Width of the text outline in a top & bottom meme.
    pub stroke_width: Option<f32>,
    /// Where to write the result.
    pub output: Option<PathBuf>,
}

impl CaptionRequest {
    /// Create a request with just the source image & caption text,
    /// and every other parameter at its default.
    #[inline]
    pub fn new<P: AsRef<Path>, S: Into<String>>(source: P, caption: S) -> Self {
        CaptionRequest{
            source: source.as_ref().to_owned(),
            caption: caption.into(),
            bottom_caption: None,
            x_padding: DEFAULT_X_PADDING,
            y_padding: DEFAULT_Y_PADDING,
            font: None,
            font_size: None,
            line_height: DEFAULT_LINE_HEIGHT,
            color: None,
            stroke_width: None,
            output: None,
        }
    }

    /// Whether the request is for a top & bottom ("impact") meme.
    #[inline]
    pub fn has_bottom_caption(&self) -> bool {
        self.bottom_caption.as_ref().map(|b| !b.is_empty()).unwrap_or(false)
    }
}

impl fmt::Debug for CaptionRequest {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let mut ds = fmt.debug_struct("CaptionRequest");
        ds.field("source", &self.source);
        ds.field("caption", &self.caption);

        macro_rules! fmt_opt_field {
            ($name:ident) => (
                if let Some(ref $name) = self.$name {
                    ds.field(stringify!($name), $name);
                }
            );
        }
        fmt_opt_field!(bottom_caption);
        ds.field("x_padding", &self.x_padding);
        ds.field("y_padding", &self.y_padding);
        fmt_opt_field!(font);
        fmt_opt_field!(font_size);
        ds.field("line_height", &self.line_height);
        fmt_opt_field!(color);
        fmt_opt_field!(stroke_width);
        fmt_opt_field!(output);

        ds.finish()
    }
}


/// Builder for `CaptionRequest`.
///
/// Zero font size and stroke width are treated as "use the default",
/// same as not setting them at all.
#[derive(Debug, Default, PartialEq)]
#[must_use = "unused builder which must be used"]
pub struct Builder {
    source: Option<PathBuf>,
    caption: Option<String>,
    bottom_caption: Option<String>,
    x_padding: Option<f32>,
    y_padding: Option<f32>,
    font: Option<String>,
    font_size: Option<f32>,
    line_height: Option<f32>,
    color: Option<Color>,
    stroke_width: Option<f32>,
    output: Option<PathBuf>,
}

impl Builder {
    /// Create a new `Builder` for a `CaptionRequest`.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Builder {
    /// Set the path of the source image.
    #[inline]
    pub fn source<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source = Some(path.as_ref().to_owned()); self
    }

    /// Set the main (top) caption text.
    #[inline]
    pub fn caption<S: Into<String>>(mut self, text: S) -> Self {
        self.caption = Some(text.into()); self
    }

    /// Set the bottom caption text, turning the request into a top & bottom meme.
    #[inline]
    pub fn bottom_caption<S: Into<String>>(mut self, text: S) -> Self {
        self.bottom_caption = Some(text.into()); self
    }

    /// Set the horizontal padding (in % of image width).
    #[inline]
    pub fn x_padding(mut self, percent: f32) -> Self {
        self.x_padding = Some(percent); self
    }

    /// Set the vertical padding (in % of font size).
    #[inline]
    pub fn y_padding(mut self, percent: f32) -> Self {
        self.y_padding = Some(percent); self
    }

    /// Set the font to render the captions with.
    #[inline]
    pub fn font<S: Into<String>>(mut self, font: S) -> Self {
        self.font = Some(font.into()); self
    }

    /// Set the font size in pixels.
    #[inline]
    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size); self
    }

    /// Set the extra spacing between lines, in pixels.
    #[inline]
    pub fn line_height(mut self, px: f32) -> Self {
        self.line_height = Some(px); self
    }

    /// Set the text color for a single caption meme.
    #[inline]
    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color); self
    }

    /// Set the width of the text outline for a top & bottom meme.
    #[inline]
    pub fn stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = Some(width); self
    }

    /// Set the output path.
    #[inline]
    pub fn output<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output = Some(path.as_ref().to_owned()); self
    }
}

impl Builder {
    /// Build the resulting `CaptionRequest`.
    pub fn build(self) -> Result<CaptionRequest, Error> {
        self.validate()?;

        let source = self.source.ok_or(Error::NoSource)?;
        let caption = self.caption.unwrap_or_else(String::new);
        let mut request = CaptionRequest::new(source, caption);
        request.bottom_caption = self.bottom_caption;
        if let Some(x_padding) = self.x_padding {
            request.x_padding = x_padding;
        }
        if let Some(y_padding) = self.y_padding {
            request.y_padding = y_padding;
        }
        request.font = self.font.and_then(|f| if f.is_empty() { None } else { Some(f) });
        request.font_size = self.font_size.and_then(|s| if s == 0.0 { None } else { Some(s) });
        if let Some(line_height) = self.line_height {
            request.line_height = line_height;
        }
        request.color = self.color;
        request.stroke_width = self.stroke_width
            .and_then(|w| if w == 0.0 { None } else { Some(w) });
        request.output = self.output;
        Ok(request)
    }

    #[doc(hidden)]
    fn validate(&self) -> Result<(), Error> {
        match self.source {
            None => return Err(Error::NoSource),
            Some(ref p) if p.as_os_str().is_empty() => return Err(Error::NoSource),
            _ => {}
        }

        macro_rules! check_non_negative {
            ($name:ident) => (
                if let Some(value) = self.$name {
                    if !(value.is_finite() && value >= 0.0) {
                        return Err(Error::InvalidValue(stringify!($name), value));
                    }
                }
            );
        }
        check_non_negative!(x_padding);
        check_non_negative!(y_padding);
        check_non_negative!(font_size);
        check_non_negative!(stroke_width);

        if let Some(x_padding) = self.x_padding {
            if x_padding >= 100.0 {
                return Err(Error::InvalidValue("x_padding", x_padding));
            }
        }
        if let Some(line_height) = self.line_height {
            if !line_height.is_finite() {
                return Err(Error::InvalidValue("line_height", line_height));
            }
        }
        Ok(())
    }
}


/// Error while building a `CaptionRequest`.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// No source image given.
    NoSource,
    /// Numeric parameter out of its valid range.
    InvalidValue(&'static str, f32),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::NoSource => write!(fmt, "no source image chosen"),
            Error::InvalidValue(name, value) =>
                write!(fmt, "invalid value of `{}`: {}", name, value),
        }
    }
}


#[cfg(test)]
mod tests {
    use spectral::prelude::*;
    use model::Color;
    use super::{Builder, CaptionRequest, Error};

    #[test]
    fn new_has_defaults() {
        let req = CaptionRequest::new("cat.png", "Hello");
        assert_eq!("Hello", req.caption);
        assert_eq!(5.0, req.x_padding);
        assert_eq!(30.0, req.y_padding);
        assert_eq!(0.0, req.line_height);
        assert_that!(req.font_size).is_none();
        assert_that!(req.stroke_width).is_none();
        assert!(!req.has_bottom_caption());
    }

    #[test]
    fn bottom_caption_must_be_non_empty() {
        let mut req = CaptionRequest::new("cat.png", "Hello");
        req.bottom_caption = Some("".into());
        assert!(!req.has_bottom_caption());
        req.bottom_caption = Some("World".into());
        assert!(req.has_bottom_caption());
    }

    #[test]
    fn builder_requires_source() {
        assert_that!(Builder::new().caption("Hi").build())
            .is_err().is_equal_to(Error::NoSource);
        assert_that!(Builder::new().source("").caption("Hi").build())
            .is_err().is_equal_to(Error::NoSource);
    }

    #[test]
    fn builder_treats_zero_as_default() {
        let req = Builder::new().source("cat.gif").caption("Hi")
            .font("").font_size(0.0).stroke_width(0.0)
            .build().unwrap();
        assert_that!(req.font).is_none();
        assert_that!(req.font_size).is_none();
        assert_that!(req.stroke_width).is_none();
    }

    #[test]
    fn builder_full() {
        let req = Builder::new().source("cat.gif").caption("Top")
            .bottom_caption("Bottom").x_padding(10.0).y_padding(20.0)
            .font("Impact").font_size(48.0).line_height(4.0)
            .color(Color::white()).stroke_width(2.0).output("out.gif")
            .build().unwrap();
        assert_eq!(Some("Bottom".to_owned()), req.bottom_caption);
        assert_eq!(10.0, req.x_padding);
        assert_eq!(20.0, req.y_padding);
        assert_eq!(Some("Impact".to_owned()), req.font);
        assert_eq!(Some(48.0), req.font_size);
        assert_eq!(4.0, req.line_height);
        assert_eq!(Some(Color::white()), req.color);
        assert_eq!(Some(2.0), req.stroke_width);
        assert!(req.has_bottom_caption());
    }

    #[test]
    fn builder_rejects_bad_numbers() {
        assert_that!(Builder::new().source("a.png").x_padding(-1.0).build()).is_err();
        assert_that!(Builder::new().source("a.png").x_padding(100.0).build()).is_err();
        assert_that!(Builder::new().source("a.png").font_size(::std::f32::NAN).build()).is_err();
        assert_that!(Builder::new().source("a.png").line_height(::std::f32::INFINITY).build())
            .is_err();
        // Negative line height just tightens the lines.
        assert_that!(Builder::new().source("a.png").line_height(-3.0).build()).is_ok();
    }
}
