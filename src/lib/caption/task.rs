//! Module implementing the actual captioning task.
//! Most if not all captioning logic lives here.

use std::io;
use std::ops::Deref;
use std::path::PathBuf;
use std::sync::Arc;

use image::{self, ColorType, DynamicImage, ImageEncoder, ImageFormat, RgbaImage};
use image::codecs::{bmp, gif as gif_codec, jpeg, png};

use layout::{Gravity, LayoutResult, Measure, WrappedLines, plan, wrap};
use model::{BACKGROUND_COLOR, CaptionRequest, Color};
use resources::Loader;
use text::{self, Measurer, TextLayer, Typeface};
use util::animated_gif;
use super::canvas::{splice_top, strip_height};
use super::engine::{Config, Inner};
use super::error::CaptionError;
use super::output::CaptionOutput;
use super::settings::{Mode, Settings};
use super::source::Source;


/// Represents a single captioning task and contains all the relevant logic.
///
/// This is a separate struct so that the request and the engine state
/// can be easily carried between its methods.
pub(super) struct CaptionTask<Fl>
    where Fl: Loader, Fl::Item: Typeface
{
    request: CaptionRequest,
    output: PathBuf,
    engine: Arc<Inner<Fl>>,
}

impl<Fl> Deref for CaptionTask<Fl>
    where Fl: Loader, Fl::Item: Typeface
{
    type Target = CaptionRequest;
    fn deref(&self) -> &Self::Target {
        &self.request  // makes the rendering code a little terser
    }
}

impl<Fl> CaptionTask<Fl>
    where Fl: Loader, Fl::Item: Typeface
{
    #[inline]
    pub fn new(request: CaptionRequest, output: PathBuf, engine: Arc<Inner<Fl>>) -> Self {
        CaptionTask{request, output, engine}
    }
}


/// Text layer together with the color it should be painted in.
type Paint = (TextLayer, Color);

/// Everything that has to be done to every image of the source.
struct Drawing {
    /// Rows of background added above the image.
    strip: u32,
    /// Layers to composite over the canvas, in order.
    paints: Vec<Paint>,
}

impl<Fl> CaptionTask<Fl>
    where Fl: Loader, Fl::Item: Typeface
{
    /// Perform the captioning task.
    pub fn perform(self) -> Result<CaptionOutput, CaptionError<Fl>> {
        debug!("Captioning {:?}", self.request);
        let config = self.engine.config.read().clone();

        let mut source = Source::load(&self.source).map_err(|e| {
            error!("Cannot load source image {}: {}", self.source.display(), e);
            CaptionError::Image(self.source.clone(), e)
        })?;
        let (width, height) = source.dimensions();
        debug!("Source image {} is {}x{} ({} image(s))",
            self.source.display(), width, height, source.image_count());

        let settings = Settings::resolve(&self.request, width, &config.default_font);
        trace!("Loading font `{}`...", settings.font);
        let font = self.engine.font_loader.load(&settings.font)
            .map_err(|e| CaptionError::Font(settings.font.clone(), e))?;
        text::check(&*font, &self.caption);
        if let Some(ref bottom) = self.bottom_caption {
            text::check(&*font, bottom);
        }

        let drawing = match settings.mode {
            Mode::Single => self.draw_single(&*font, &settings, width, height)?,
            Mode::Impact => self.draw_impact(&*font, &settings, width, height)?,
        };
        let canvas_height = height + drawing.strip;
        if source.is_animated() && canvas_height > u16::max_value() as u32 {
            return Err(CaptionError::Draw(format!(
                "GIF canvas of {}x{} is too large", width, canvas_height)));
        }

        let images: Vec<RgbaImage> = source.iter_images().map(|img| {
            let mut canvas = match settings.mode {
                Mode::Single => splice_top(img, drawing.strip, BACKGROUND_COLOR),
                Mode::Impact => img.clone(),
            };
            for &(ref layer, color) in &drawing.paints {
                layer.composite(&mut canvas, color);
            }
            canvas
        }).collect();

        // Frames of a transparent GIF would pile up on top of each other otherwise.
        if let Source::Animation(ref mut gif_anim) = source {
            if gif_anim.has_transparent_background() {
                debug!("GIF has transparent background, disposing frames to background");
                gif_anim.dispose_to_background();
            }
        }

        self.encode_result(images, &source, &config)
    }

    /// Lay out the caption above the image, on a strip that extends the canvas.
    fn draw_single<T>(&self, face: &T, settings: &Settings,
                      width: u32, height: u32) -> Result<Drawing, CaptionError<Fl>>
        where T: Typeface + ?Sized
    {
        let measurer = Measurer::new(face, settings.font_size);
        let lines = wrap(&self.caption, settings.available_width, &measurer);
        let layout = plan(&lines, &measurer,
            settings.y_padding, settings.line_height, Gravity::North);

        let strip = strip_height(layout.extent, height).ok_or_else(|| {
            CaptionError::Draw(format!("invalid caption extent: {}", layout.extent))
        })?;
        debug!("Adding {}px strip above the {}x{} image", strip, width, height);

        let mut layer = TextLayer::new(width, height + strip);
        draw_lines(&mut layer, face, &measurer, &lines, &layout);
        trace!("Font measurements: {}", measurer.stats());
        Ok(Drawing{strip, paints: vec![(layer, settings.fill)]})
    }

    /// Lay out the top & bottom captions over the image itself.
    fn draw_impact<T>(&self, face: &T, settings: &Settings,
                      width: u32, height: u32) -> Result<Drawing, CaptionError<Fl>>
        where T: Typeface + ?Sized
    {
        let measurer = Measurer::new(face, settings.font_size);
        let mut layer = TextLayer::new(width, height);

        let bottom = self.bottom_caption.as_ref().map(|s| s.as_str()).unwrap_or("");
        for &(caption, gravity) in [(bottom, Gravity::South),
                                    (self.caption.as_str(), Gravity::North)].iter() {
            let lines = wrap(caption, settings.available_width, &measurer);
            let layout = plan(&lines, &measurer,
                settings.y_padding, settings.line_height, gravity);
            if !layout.extent.is_finite() {
                return Err(CaptionError::Draw(format!(
                    "invalid caption extent: {}", layout.extent)));
            }
            draw_lines(&mut layer, face, &measurer, &lines, &layout);
        }
        trace!("Font measurements: {}", measurer.stats());

        let mut paints = Vec::with_capacity(2);
        if let Some((stroke_color, stroke_width)) = settings.stroke {
            trace!("Outlining the text with {}px of {}", stroke_width, stroke_color);
            paints.push((layer.outline(stroke_width), stroke_color));
        }
        paints.push((layer, settings.fill));
        Ok(Drawing{strip: 0, paints})
    }

    /// Encode final result as bytes of the appropriate image format.
    fn encode_result(&self, images: Vec<RgbaImage>, source: &Source,
                     config: &Config) -> Result<CaptionOutput, CaptionError<Fl>> {
        let format = source.output_format(&self.output);
        debug!("Encoding final image as {:?}...", format);

        let mut result = vec![];
        if let Source::Animation(ref gif_anim) = *source {
            trace!("Writing animated GIF with {} frame(s)", gif_anim.frames_count());
            animated_gif::encode_modified(
                gif_anim, &images, config.gif_sample_factor, &mut result,
            ).map_err(CaptionError::Encode)?;
            return Ok(CaptionOutput::new(format, images.len(), result));
        }

        let img = match images.into_iter().next() {
            Some(img) => img,
            None => return Err(CaptionError::Draw("no image to encode".into())),
        };
        encode_still(img, format, config, &mut result).map_err(CaptionError::Encode)?;
        Ok(CaptionOutput::new(format, 1, result))
    }
}


/// Draw wrapped lines of a caption onto the layer, centered horizontally.
fn draw_lines<T: Typeface + ?Sized>(layer: &mut TextLayer, face: &T, measurer: &Measurer<T>,
                                    lines: &WrappedLines, layout: &LayoutResult) {
    let (width, height) = layer.dimensions();
    for (line, &y) in lines.iter().zip(&layout.line_ys) {
        let metrics = measurer.metrics(line);
        let x = (width as f32 - metrics.width) / 2.0;
        let baseline = match layout.gravity {
            Gravity::North => y + metrics.ascent,
            Gravity::South => height as f32 - y + metrics.descent,
        };
        layer.draw_line(face, measurer.size(), line, x, baseline);
    }
}

/// Encode a still image in given format.
fn encode_still(img: RgbaImage, format: ImageFormat, config: &Config,
                result: &mut Vec<u8>) -> io::Result<()> {
    let (width, height) = img.dimensions();
    match format {
        ImageFormat::Jpeg => {
            trace!("Writing JPEG with quality {}", config.jpeg_quality);
            let rgb = DynamicImage::ImageRgba8(img).to_rgb8();
            jpeg::JpegEncoder::new_with_quality(result, config.jpeg_quality)
                .encode(rgb.as_raw(), width, height, ColorType::Rgb8)
                .map_err(image_io_error)
        }
        ImageFormat::Gif => {
            trace!("Writing regular (still) GIF");
            let speed = config.gif_sample_factor as i32;
            gif_codec::GifEncoder::new_with_speed(result, speed)
                .encode_frame(image::Frame::new(img))
                .map_err(image_io_error)
        }
        ImageFormat::Bmp => {
            trace!("Writing BMP image");
            bmp::BmpEncoder::new(result)
                .encode(img.as_raw(), width, height, ColorType::Rgba8)
                .map_err(image_io_error)
        }
        f => {
            if f != ImageFormat::Png {
                warn!("Cannot write {:?} images, using PNG instead", f);
            }
            trace!("Writing PNG image");
            png::PngEncoder::new(result)
                .write_image(img.as_raw(), width, height, ColorType::Rgba8)
                .map_err(image_io_error)
        }
    }
}

fn image_io_error(e: image::ImageError) -> io::Error {
    match e {
        image::ImageError::IoError(e) => e,
        e => io::Error::new(io::ErrorKind::Other, e),
    }
}


#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Cursor;
    use std::path::{Path, PathBuf};
    use gif;
    use image::{self, ImageFormat, Rgba, RgbaImage};
    use tempfile::TempDir;
    use caption::Engine;
    use caption::error::CaptionError;
    use model::CaptionRequest;
    use resources::{FontError, Loader};
    use text::testing::BoxFace;
    use util::animated_gif::{self, testing::two_frame_gif};

    const RED: Rgba<u8> = Rgba([0xff, 0, 0, 0xff]);
    const WHITE: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 0xff]);

    struct BoxFonts;
    impl Loader for BoxFonts {
        type Item = BoxFace;
        type Err = FontError;
        fn load<'n>(&self, name: &'n str) -> Result<BoxFace, FontError> {
            if name == "missing" {
                return Err(FontError::NotFound(name.to_owned()));
            }
            Ok(BoxFace)
        }
    }

    fn engine() -> Engine<BoxFonts> {
        Engine::with_raw_loader(BoxFonts)
    }

    fn red_png(dir: &Path) -> PathBuf {
        let path = dir.join("red.png");
        RgbaImage::from_pixel(300, 200, RED).save(&path).unwrap();
        path
    }

    #[test]
    fn single_caption_extends_canvas() {
        let dir = TempDir::new().unwrap();
        let request = CaptionRequest::new(red_png(dir.path()), "hello");

        let output = engine().caption(&request).unwrap();
        assert_eq!(ImageFormat::Png, output.format());
        assert_eq!(1, output.frames());

        // Font size 20 and padding 6 give a 24px strip.
        let img = image::load_from_memory(output.bytes()).unwrap().to_rgba8();
        assert_eq!((300, 224), img.dimensions());
        assert_eq!(BLACK, *img.get_pixel(130, 10));
        assert_eq!(WHITE, *img.get_pixel(0, 10));
        assert_eq!(WHITE, *img.get_pixel(0, 23));
        assert_eq!(RED, *img.get_pixel(0, 24));
        assert_eq!(RED, *img.get_pixel(299, 223));
    }

    #[test]
    fn impact_draws_over_image() {
        let dir = TempDir::new().unwrap();
        let mut request = CaptionRequest::new(red_png(dir.path()), "top");
        request.bottom_caption = Some("bottom".into());
        request.stroke_width = Some(2.0);

        let output = engine().caption(&request).unwrap();
        let img = image::load_from_memory(output.bytes()).unwrap().to_rgba8();
        assert_eq!((300, 200), img.dimensions());
        // Top caption, with its outline right above the glyphs.
        assert_eq!(WHITE, *img.get_pixel(140, 10));
        assert_eq!(BLACK, *img.get_pixel(140, 5));
        // Bottom caption sits just above the bottom padding.
        assert_eq!(WHITE, *img.get_pixel(124, 185));
        assert_eq!(RED, *img.get_pixel(5, 100));
    }

    #[test]
    fn gif_frames_dispose_to_background_if_transparent() {
        let dir = TempDir::new().unwrap();
        for &(transparent, dispose) in [(true, gif::DisposalMethod::Background),
                                        (false, gif::DisposalMethod::Keep)].iter() {
            let path = dir.path().join(format!("anim_{}.gif", transparent));
            fs::write(&path, two_frame_gif(60, 40, transparent)).unwrap();

            let output = engine().caption(&CaptionRequest::new(&path, "hi")).unwrap();
            assert_eq!(ImageFormat::Gif, output.format());
            assert_eq!(2, output.frames());

            let anim = animated_gif::decode(Cursor::new(output.into_bytes())).unwrap();
            assert_eq!(2, anim.frames_count());
            assert!(anim.height > 40);
            assert!(anim.iter_frames().all(|f| f.metadata.dispose == dispose));
        }
    }

    #[test]
    fn font_error() {
        let dir = TempDir::new().unwrap();
        let mut request = CaptionRequest::new(red_png(dir.path()), "hello");
        request.font = Some("missing".into());
        match engine().caption(&request) {
            Err(CaptionError::Font(ref name, _)) => assert_eq!("missing", *name),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn image_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.png");
        match engine().caption(&CaptionRequest::new(&path, "hello")) {
            Err(CaptionError::Image(ref p, _)) => assert_eq!(&path, p),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn draw_error() {
        let dir = TempDir::new().unwrap();
        let mut request = CaptionRequest::new(red_png(dir.path()), "hello");
        request.y_padding = ::std::f32::MAX;
        match engine().caption(&request) {
            Err(CaptionError::Draw(_)) => {}
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn add_caption_writes_output() {
        let dir = TempDir::new().unwrap();
        let mut request = CaptionRequest::new(red_png(dir.path()), "hello");
        let out = dir.path().join("out.jpg");
        request.output = Some(out.clone());

        let path = engine().add_caption(&request).unwrap();
        assert_eq!(out, path);
        let bytes = fs::read(&path).unwrap();
        assert_eq!(ImageFormat::Jpeg, image::guess_format(&bytes).unwrap());
        assert_eq!((300, 224), image::load_from_memory(&bytes).unwrap().to_rgba8().dimensions());
    }
}
