//! Module handling the decoding & encoding of animated GIFs.
//! This is done by wrapping over the API exposed by several image-related crates.

use std::borrow::Cow;
use std::convert::TryFrom;
use std::error::Error;
use std::fmt;
use std::io::{self, Read, Write};
use std::slice;

use color_quant::NeuQuant;
use gif;
use gif_dispose::Screen;
use image::RgbaImage;


// Data structures

/// Animation loaded from a GIF file.
///
/// The frames are kept in their decoded (RGBA) form and are *coalesced*,
/// i.e. every frame is a complete image of the whole logical screen.
#[derive(Clone)]
pub struct GifAnimation {
    /// Width of the animation canvas (logical screen).
    pub width: u16,
    /// Height of the animation canvas (logical screen).
    pub height: u16,
    /// Global palette (Color Table).
    /// This is a contiguous array of RGB bytes.
    pub palette: Vec<u8>,
    /// Index of the background color in global palette, if any.
    pub bg_color: Option<usize>,
    /// Animation frames.
    frames: Vec<GifFrame>,
}

impl GifAnimation {
    #[inline]
    pub fn frames_count(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn iter_frames(&self) -> slice::Iter<GifFrame> {
        self.frames.iter()
    }

    /// Whether the background of the animation is fully transparent.
    ///
    /// This is the case when the background color is the one
    /// that the first frame declares as transparent, or when there is
    /// no global palette at all and the first frame has a transparent color.
    pub fn has_transparent_background(&self) -> bool {
        let transparent = match self.frames.first().and_then(|f| f.metadata.transparent) {
            Some(t) => t as usize,
            None => return false,
        };
        match self.bg_color {
            Some(bg) if !self.palette.is_empty() => bg == transparent,
            _ => self.palette.is_empty(),
        }
    }

    /// Set the disposal method of every frame to "restore to background".
    ///
    /// Without it, frames with modified (e.g. captioned) content
    /// would be stacked on top of each other in a GIF with transparent background.
    pub fn dispose_to_background(&mut self) {
        for frame in &mut self.frames {
            frame.metadata.dispose = gif::DisposalMethod::Background;
        }
    }
}

impl fmt::Debug for GifAnimation {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let colors = self.palette.len() / RGB_SIZE_BYTES;
        fmt.debug_struct("GifAnimation")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("palette", &format_args!("<{} colors>", colors))
            .field("bg_color", &self.bg_color)
            .field("frames", &format_args!("<{} frames>", self.frames.len()))
            .finish()
    }
}

const RGB_SIZE_BYTES: usize = 3;
const RGBA_SIZE_BYTES: usize = 4;


/// A single frame of an animated GIF.
#[derive(Clone)]
pub struct GifFrame {
    /// The image of the frame.
    pub image: RgbaImage,
    /// gif::Frame structure containing just the metadata of the frame.
    /// The actual buffer is emptied and converted into the `image`.
    pub metadata: gif::Frame<'static>,
}

impl fmt::Debug for GifFrame {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let (w, h) = self.image.dimensions();
        fmt.debug_struct("GifFrame")
            .field("image", &format_args!("{}x{}", w, h))
            .field("delay", &self.metadata.delay)
            .field("dispose", &self.metadata.dispose)
            .field("transparent", &self.metadata.transparent)
            .finish()
    }
}


// Decoding animated GIFs

/// Error that can occur while decoding animated GIF.
#[derive(Debug)]
pub enum DecodeError {
    /// I/O error encountered when decoding GIF.
    Io(io::Error),
    /// Error arising from the `gif` crate decoding process.
    Gif(gif::DecodingError),
    /// Error arising from the `gif-dispose` crate "rendering" process.
    GifDispose(String),
    /// The GIF doesn't contain any frames.
    Empty,
}

impl From<io::Error> for DecodeError {
    fn from(inner: io::Error) -> Self {
        DecodeError::Io(inner)
    }
}
impl From<gif::DecodingError> for DecodeError {
    fn from(inner: gif::DecodingError) -> Self {
        DecodeError::Gif(inner)
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            DecodeError::Io(ref e) => Some(e),
            DecodeError::Gif(ref e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DecodeError::Io(ref e) => write!(fmt, "I/O error while decoding GIF: {}", e),
            DecodeError::Gif(ref e) => write!(fmt, "cannot decode GIF file: {}", e),
            DecodeError::GifDispose(ref e) => write!(fmt, "GIF rendering error: {}", e),
            DecodeError::Empty => write!(fmt, "GIF file has no frames"),
        }
    }
}


/// Decode animated GIF from given reader.
pub fn decode<R: Read>(input: R) -> Result<GifAnimation, DecodeError> {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::Indexed);

    let mut decoder = options.read_info(input)?;
    let width = decoder.width();
    let height = decoder.height();
    let palette = decoder.global_palette()
        .map(|p| p.to_vec()).unwrap_or_else(Vec::new);
    let bg_color = decoder.bg_color();

    // Read the frames and "draw" them on a virtual screen to ensure
    // that the frame disposal mechanics are applied correctly.
    let mut screen = Screen::new_decoder(&decoder);
    let mut frames = vec![];
    while let Some(frame) = decoder.read_next_frame()? {
        screen.blit_frame(frame)
            .map_err(|e| DecodeError::GifDispose(format!("{}", e)))?;

        let pixels = screen.pixels_rgba();
        let (screen_width, screen_height) = (pixels.width(), pixels.height());
        let mut bytes = Vec::with_capacity(screen_width * screen_height * RGBA_SIZE_BYTES);
        for px in pixels.pixels() {
            bytes.extend_from_slice(&[px.r, px.g, px.b, px.a]);
        }
        let image = RgbaImage::from_raw(screen_width as u32, screen_height as u32, bytes)
            .ok_or_else(|| DecodeError::GifDispose(format!(
                "screen buffer doesn't match its {}x{} size", screen_width, screen_height)))?;

        // Frame now covers the whole screen, so adjust its metadata accordingly.
        let mut metadata = frame.clone();
        metadata.buffer = Cow::Owned(vec![]);
        metadata.top = 0;
        metadata.left = 0;
        metadata.width = width;
        metadata.height = height;
        frames.push(GifFrame{image, metadata});
    }
    if frames.is_empty() {
        return Err(DecodeError::Empty);
    }

    debug!("Animated GIF successfully loaded: {}x{} with {} frames",
        width, height, frames.len());
    Ok(GifAnimation{width, height, palette, bg_color, frames})
}


// Encoding animated GIFs

/// Default quality parameter for the NeuQuant color quantizer.
/// Range 1..=30. Lower values mean better quality.
pub const DEFAULT_SAMPLE_FACTOR: u8 = 12;

/// Encode animated GIF with its frames replaced with given images.
///
/// Original animation will be used to provide metadata for GIF frames
/// (frame delays, transitions, etc.). All images must have the same size,
/// which becomes the size of the encoded animation.
pub fn encode_modified<W: Write>(orig_anim: &GifAnimation,
                                 images: &[RgbaImage],
                                 sample_factor: u8,
                                 output: W) -> io::Result<()> {
    if images.len() != orig_anim.frames_count() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, format!(
            "expected {} GIF frame(s), got {}", orig_anim.frames_count(), images.len())));
    }
    let (width, height) = match images.first() {
        Some(img) => screen_size(img)?,
        None => return Err(io::Error::new(io::ErrorKind::InvalidInput, "no GIF frames")),
    };

    let bg_color = if orig_anim.palette.is_empty() { None }
                   else { orig_anim.bg_color.map(|i| i as u8) };
    let output = BgColorFixer::new(bg_color, output);
    let mut encoder = gif::Encoder::new(output, width, height, &*orig_anim.palette)
        .map_err(encoding_error)?;
    encoder.set_repeat(gif::Repeat::Infinite).map_err(encoding_error)?;

    for (i, (frame, image)) in orig_anim.iter_frames().zip(images).enumerate() {
        trace!("Writing frame #{}", i + 1);
        if screen_size(image)? != (width, height) {
            return Err(io::Error::new(io::ErrorKind::InvalidInput,
                format!("GIF frame #{} has a different size than the first one", i + 1)));
        }

        let mut gif_frame = frame.metadata.clone();
        let (buffer, palette, transparent) = quantize_image(image, sample_factor);
        gif_frame.width = width;
        gif_frame.height = height;
        gif_frame.buffer = buffer.into();
        gif_frame.palette = Some(palette);
        gif_frame.transparent = transparent;

        encoder.write_frame(&gif_frame).map_err(encoding_error)?;
    }
    // Trailer is written when the encoder is dropped.
    Ok(())
}

fn screen_size(image: &RgbaImage) -> io::Result<(u16, u16)> {
    let (width, height) = image.dimensions();
    match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(io::Error::new(io::ErrorKind::InvalidInput,
            format!("image of {}x{} is too large for a GIF", width, height))),
    }
}

fn encoding_error(e: gif::EncodingError) -> io::Error {
    match e {
        gif::EncodingError::Io(e) => e,
        e => io::Error::new(io::ErrorKind::InvalidData, e),
    }
}

/// Low-level function that performs color quantization of an image.
///
/// Returns (buffer, palette, transparent) where:
/// * `buffer` is the image where pixels are palette indexes
/// * `palette` is a contiguous buffer of RGB colors in the palette used
/// * `transparent` is optional palette index of the transparent color
pub fn quantize_image(image: &RgbaImage, sample_factor: u8) -> (Vec<u8>, Vec<u8>, Option<u8>) {
    let mut pixels = image.as_raw().clone();

    // This is what gif::Frame::from_rgba_speed() does, but with
    // a sample factor of our choosing and without the fast path for
    // images that have few enough colors.
    let mut transparent = None;
    for pix in pixels.chunks_mut(RGBA_SIZE_BYTES) {
        if pix[3] != 0 {
            pix[3] = 0xFF;
        } else {
            transparent = Some([pix[0], pix[1], pix[2], pix[3]])
        }
    }

    let quantizer = NeuQuant::new(sample_factor.max(1) as i32, 256, &pixels[..]);

    let buffer = pixels.chunks(RGBA_SIZE_BYTES)
        .map(|pix| quantizer.index_of(pix) as u8)
        .collect();
    let palette = quantizer.color_map_rgb();
    let transparent = transparent.map(|t| quantizer.index_of(&t) as u8);

    (buffer, palette, transparent)
}


/// Writer that patches the background color index in GIF header.
///
/// The `gif` crate always writes 0 as the background color when encoding,
/// so this intercepts the first few bytes of the output, replaces that 0
/// with the actual index, and otherwise passes the bytes through.
#[derive(Debug)]
struct BgColorFixer<W: Write> {
    bg_color: Option<u8>,
    buffer: Vec<u8>,
    writer: W,
}
impl<W: Write> BgColorFixer<W> {
    #[inline]
    pub fn new(bg_color: Option<u8>, writer: W) -> Self {
        BgColorFixer{
            bg_color,
            buffer: Vec::with_capacity(BGCOLOR_OFFSET + 1),
            writer,
        }
    }

    fn is_passthrough(&self) -> bool {
        self.bg_color.is_none() || self.buffer.len() > BGCOLOR_OFFSET
    }
}
impl<W: Write> Write for BgColorFixer<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let bg_color = match self.bg_color {
            Some(c) if !self.is_passthrough() => c,
            _ => return self.writer.write(buf),
        };

        self.buffer.extend_from_slice(buf);
        if self.buffer.len() > BGCOLOR_OFFSET {
            self.buffer[BGCOLOR_OFFSET] = bg_color;
            self.writer.write_all(&self.buffer[..])?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.is_passthrough() {
            return self.writer.flush();
        }
        Ok(())
    }
}
// http://giflib.sourceforge.net/whatsinagif/bits_and_bytes.html
const BGCOLOR_OFFSET: usize = 11;




#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use gif;
    use image::Rgba;
    use spectral::prelude::*;
    use super::{BgColorFixer, decode, encode_modified, quantize_image};
    use super::testing::two_frame_gif;

    #[test]
    fn decode_coalesces_frames() {
        let anim = decode(Cursor::new(two_frame_gif(8, 8, false))).unwrap();
        assert_eq!((8, 8), (anim.width, anim.height));
        assert_eq!(2, anim.frames_count());

        let frames: Vec<_> = anim.iter_frames().collect();
        for frame in &frames {
            assert_eq!((8, 8), frame.image.dimensions());
            assert_eq!((0, 0, 8, 8), (frame.metadata.left, frame.metadata.top,
                                      frame.metadata.width, frame.metadata.height));
            assert!(frame.metadata.buffer.is_empty());
        }
        // Second frame only updated the center, the rest is kept from the first one.
        assert_eq!(Rgba([0, 0, 0, 0xff]), *frames[1].image.get_pixel(0, 0));
        assert_eq!(Rgba([0xff, 0, 0, 0xff]), *frames[1].image.get_pixel(4, 4));
    }

    #[test]
    fn decode_invalid() {
        assert_that!(decode(Cursor::new(b"GIF89a-nope".to_vec()))).is_err();
        assert_that!(decode(Cursor::new(vec![]))).is_err();
    }

    #[test]
    fn background_transparency() {
        let opaque = decode(Cursor::new(two_frame_gif(8, 8, false))).unwrap();
        assert!(!opaque.has_transparent_background());
        let transparent = decode(Cursor::new(two_frame_gif(8, 8, true))).unwrap();
        assert!(transparent.has_transparent_background());
    }

    #[test]
    fn dispose_to_background() {
        let mut anim = decode(Cursor::new(two_frame_gif(8, 8, true))).unwrap();
        anim.dispose_to_background();
        assert!(anim.iter_frames()
            .all(|f| f.metadata.dispose == gif::DisposalMethod::Background));
    }

    #[test]
    fn encode_keeps_frame_metadata() {
        let anim = decode(Cursor::new(two_frame_gif(8, 8, false))).unwrap();
        let images: Vec<_> = anim.iter_frames().map(|f| f.image.clone()).collect();
        let mut bytes = vec![];
        encode_modified(&anim, &images, 10, &mut bytes).unwrap();

        let reencoded = decode(Cursor::new(bytes)).unwrap();
        assert_eq!(2, reencoded.frames_count());
        for (orig, new) in anim.iter_frames().zip(reencoded.iter_frames()) {
            assert_eq!(orig.metadata.delay, new.metadata.delay);
            assert_eq!(orig.metadata.dispose, new.metadata.dispose);
        }
    }

    #[test]
    fn encode_rejects_frame_count_mismatch() {
        let anim = decode(Cursor::new(two_frame_gif(8, 8, false))).unwrap();
        let images = vec![anim.iter_frames().next().unwrap().image.clone()];
        assert_that!(encode_modified(&anim, &images, 10, &mut vec![])).is_err();
    }

    #[test]
    fn quantize_finds_transparency() {
        let mut img = ::image::RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 0xff]));
        let (buffer, palette, transparent) = quantize_image(&img, 10);
        assert_eq!(16, buffer.len());
        assert_eq!(256 * 3, palette.len());
        assert_that!(transparent).is_none();

        img.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        let (_, _, transparent) = quantize_image(&img, 10);
        assert_that!(transparent).is_some();
    }

    #[test]
    fn bg_color_fixer() {
        use std::io::Write;
        let header: Vec<u8> = (0..16).collect();
        let mut out = vec![];
        {
            let mut fixer = BgColorFixer::new(Some(0xAA), &mut out);
            fixer.write_all(&header[..5]).unwrap();
            fixer.write_all(&header[5..]).unwrap();
        }
        assert_eq!(16, out.len());
        assert_eq!(0xAA, out[11]);
        assert_eq!(&header[..11], &out[..11]);
        assert_eq!(&header[12..], &out[12..]);
    }
}
