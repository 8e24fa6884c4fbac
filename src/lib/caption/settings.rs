//! Module resolving the parameters of a captioning request against the image.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use layout::available_width;
use model::{CaptionRequest, Color, DEFAULT_COLOR, FONT_SIZE_DIVISOR, IMPACT_COLOR,
            IMPACT_OUTLINE_COLOR, OUTPUT_SUFFIX, STROKE_WIDTH_DIVISOR};


/// Kind of meme that a request produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Single caption above the image, on a white strip that extends the canvas.
    Single,
    /// Top & bottom captions with outlined text, drawn over the image itself.
    Impact,
}

impl Mode {
    /// Determine the mode of given request.
    #[inline]
    pub fn of(request: &CaptionRequest) -> Self {
        if request.has_bottom_caption() { Mode::Impact } else { Mode::Single }
    }
}


/// Parameters of a captioning request with all the defaults resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub mode: Mode,
    /// Name of the font to use.
    pub font: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Color of the text.
    pub fill: Color,
    /// Color & width of the text outline, if any.
    pub stroke: Option<(Color, f32)>,
    /// Vertical padding in pixels.
    pub y_padding: f32,
    /// Extra spacing between lines in pixels.
    pub line_height: f32,
    /// Width that caption lines have to fit in.
    pub available_width: f32,
}

impl Settings {
    /// Resolve the request parameters for an image of given width.
    pub fn resolve(request: &CaptionRequest, image_width: u32, default_font: &str) -> Self {
        let mode = Mode::of(request);
        let width = image_width as f32;

        let font = request.font.clone()
            .unwrap_or_else(|| default_font.to_owned());
        let font_size = request.font_size
            .filter(|&s| s > 0.0)
            .unwrap_or(width / FONT_SIZE_DIVISOR);
        let (fill, stroke) = match mode {
            Mode::Single => {
                if request.stroke_width.is_some() {
                    debug!("Ignoring stroke width in a single caption meme");
                }
                (request.color.unwrap_or(DEFAULT_COLOR), None)
            }
            Mode::Impact => {
                if request.color.is_some() {
                    debug!("Ignoring text color in a top & bottom meme");
                }
                let stroke_width = request.stroke_width
                    .filter(|&w| w > 0.0)
                    .unwrap_or(font_size / STROKE_WIDTH_DIVISOR);
                (IMPACT_COLOR, Some((IMPACT_OUTLINE_COLOR, stroke_width)))
            }
        };

        let settings = Settings{
            mode, font, font_size, fill, stroke,
            y_padding: font_size * request.y_padding / 100.0,
            line_height: request.line_height,
            available_width: available_width(width, request.x_padding),
        };
        trace!("Resolved captioning settings: {:?}", settings);
        settings
    }
}


/// Path where the result of given request is written.
///
/// Unless explicitly given, it's the source file name with a suffix added
/// to its stem, relative to the current directory.
pub fn output_path(request: &CaptionRequest) -> PathBuf {
    if let Some(ref output) = request.output {
        return output.clone();
    }
    default_output_path(&request.source)
}

fn default_output_path(source: &Path) -> PathBuf {
    let mut file_name: OsString = source.file_stem()
        .map(|s| s.to_owned()).unwrap_or_default();
    file_name.push(OUTPUT_SUFFIX);
    if let Some(ext) = source.extension() {
        file_name.push(".");
        file_name.push(ext);
    }
    PathBuf::from(file_name)
}


#[cfg(test)]
mod tests {
    use std::path::Path;
    use spectral::prelude::*;
    use model::{CaptionRequest, Color};
    use super::{Mode, Settings, output_path};

    #[test]
    fn mode() {
        let mut req = CaptionRequest::new("a.png", "top");
        assert_eq!(Mode::Single, Mode::of(&req));
        req.bottom_caption = Some("".into());
        assert_eq!(Mode::Single, Mode::of(&req));
        req.bottom_caption = Some("bottom".into());
        assert_eq!(Mode::Impact, Mode::of(&req));
    }

    #[test]
    fn single_defaults() {
        let req = CaptionRequest::new("a.png", "top");
        let s = Settings::resolve(&req, 600, "DejaVu-Sans");
        assert_eq!(Mode::Single, s.mode);
        assert_eq!("DejaVu-Sans", s.font);
        assert_eq!(40.0, s.font_size);
        assert_eq!(Color::black(), s.fill);
        assert_that!(s.stroke).is_none();
        assert_eq!(12.0, s.y_padding);
        assert_eq!(570.0, s.available_width);
    }

    #[test]
    fn single_honors_color() {
        let mut req = CaptionRequest::new("a.png", "top");
        req.color = Some(Color(0xff, 0, 0));
        req.stroke_width = Some(5.0);
        let s = Settings::resolve(&req, 600, "Arial");
        assert_eq!(Color(0xff, 0, 0), s.fill);
        assert_that!(s.stroke).is_none();
    }

    #[test]
    fn impact_defaults() {
        let mut req = CaptionRequest::new("a.png", "top");
        req.bottom_caption = Some("bottom".into());
        req.color = Some(Color(0xff, 0, 0));
        req.font_size = Some(80.0);
        let s = Settings::resolve(&req, 600, "Arial");
        assert_eq!(Mode::Impact, s.mode);
        assert_eq!(Color::white(), s.fill);
        assert_eq!(Some((Color::black(), 2.0)), s.stroke);
    }

    #[test]
    fn impact_explicit_stroke() {
        let mut req = CaptionRequest::new("a.png", "top");
        req.bottom_caption = Some("bottom".into());
        req.stroke_width = Some(3.5);
        let s = Settings::resolve(&req, 600, "Arial");
        assert_eq!(Some((Color::black(), 3.5)), s.stroke);
    }

    #[test]
    fn explicit_font() {
        let mut req = CaptionRequest::new("a.png", "top");
        req.font = Some("Impact".into());
        assert_eq!("Impact", Settings::resolve(&req, 100, "Arial").font);
    }

    #[test]
    fn default_output_path() {
        let req = CaptionRequest::new("/tmp/cats/grumpy.gif", "no");
        assert_eq!(Path::new("grumpy_memed.gif"), output_path(&req));
        let req = CaptionRequest::new("photo", "no");
        assert_eq!(Path::new("photo_memed"), output_path(&req));
        let req = CaptionRequest::new("archive.tar.png", "no");
        assert_eq!(Path::new("archive.tar_memed.png"), output_path(&req));
    }

    #[test]
    fn explicit_output_path() {
        let mut req = CaptionRequest::new("grumpy.gif", "no");
        req.output = Some("/out/x.gif".into());
        assert_eq!(Path::new("/out/x.gif"), output_path(&req));
    }
}
