//! Module handling the source images of captioning.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::{self, Cursor};
use std::path::Path;

use image::{self, ImageFormat, RgbaImage};

use util::animated_gif::{self, GifAnimation};


/// Image format to use when nothing else says otherwise.
pub const DEFAULT_IMAGE_FORMAT: ImageFormat = ImageFormat::Png;

lazy_static! {
    /// Map of file extensions to the image formats that can be written.
    pub static ref IMAGE_FORMAT_EXTENSIONS: HashMap<&'static str, ImageFormat> = hashmap!{
        "bmp" => ImageFormat::Bmp,
        "gif" => ImageFormat::Gif,
        "jpeg" => ImageFormat::Jpeg,
        "jpg" => ImageFormat::Jpeg,
        "png" => ImageFormat::Png,
    };
}

/// Image format corresponding to the extension of given path, if supported.
pub fn format_for_path<P: AsRef<Path>>(path: P) -> Option<ImageFormat> {
    let extension = path.as_ref().extension().and_then(|e| e.to_str())
        .map(|s| s.trim().to_lowercase())?;
    IMAGE_FORMAT_EXTENSIONS.get(extension.as_str()).cloned()
}


/// Represents the source image being captioned.
#[derive(Clone)]
pub enum Source {
    /// Single still image, loaded from some image format.
    Still(RgbaImage, ImageFormat),
    /// Frames of a GIF (which may consist of just a single one).
    Animation(GifAnimation),
}

impl Source {
    /// Load the source image from given file.
    ///
    /// The format is detected from the file content, with the extension
    /// as a fallback.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref();
        trace!("Opening image {}", path.display());
        let bytes = fs::read(path)?;

        let format = image::guess_format(&bytes).ok()
            .or_else(|| ImageFormat::from_path(path).ok());
        match format {
            Some(ImageFormat::Gif) => {
                trace!("Image {} is a GIF", path.display());
                let gif_anim = animated_gif::decode(Cursor::new(bytes)).map_err(|e| {
                    error!("Failed to decode GIF {}: {}", path.display(), e); e
                })?;
                Ok(Source::Animation(gif_anim))
            }
            Some(format) => {
                let img = image::load_from_memory_with_format(&bytes, format)?;
                Ok(Source::Still(img.to_rgba8(), format))
            }
            None => {
                let img = image::load_from_memory(&bytes)?;
                Ok(Source::Still(img.to_rgba8(), DEFAULT_IMAGE_FORMAT))
            }
        }
    }
}

impl Source {
    /// Whether this is a GIF source.
    #[inline]
    pub fn is_animated(&self) -> bool {
        match *self { Source::Animation(..) => true, _ => false, }
    }

    /// Number of images that comprise the source.
    #[inline]
    pub fn image_count(&self) -> usize {
        match *self {
            Source::Still(..) => 1,
            Source::Animation(ref gif_anim) => gif_anim.frames_count(),
        }
    }

    /// Size of the source image(s).
    pub fn dimensions(&self) -> (u32, u32) {
        match *self {
            Source::Still(ref img, _) => img.dimensions(),
            Source::Animation(ref gif_anim) =>
                (gif_anim.width as u32, gif_anim.height as u32),
        }
    }

    /// Iterate over all images in this source.
    pub fn iter_images<'s>(&'s self) -> Box<dyn Iterator<Item=&'s RgbaImage> + 's> {
        match *self {
            Source::Still(ref img, ..) => Box::new(Some(img).into_iter()),
            Source::Animation(ref gif_anim) => Box::new(
                gif_anim.iter_frames().map(|f| &f.image)),
        }
    }

    /// The format that the source was loaded from.
    pub fn format(&self) -> ImageFormat {
        match *self {
            Source::Still(_, fmt) => fmt,
            Source::Animation(..) => ImageFormat::Gif,
        }
    }

    /// The format that the result of captioning should be encoded as,
    /// given the path it will be written to.
    ///
    /// GIFs always produce GIFs. Other images use the format implied
    /// by the output extension, falling back to the source format (if it can
    /// be written) and then to PNG.
    pub fn output_format<P: AsRef<Path>>(&self, output: P) -> ImageFormat {
        if self.is_animated() {
            return ImageFormat::Gif;
        }
        if let Some(format) = format_for_path(output) {
            return format;
        }
        let format = self.format();
        if IMAGE_FORMAT_EXTENSIONS.values().any(|f| *f == format) {
            format
        } else {
            DEFAULT_IMAGE_FORMAT
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Source::Still(ref img, f) => {
                let (width, height) = img.dimensions();
                write!(fmt, "Source::Still({}x{}, {:?})", width, height, f)
            }
            Source::Animation(ref gif_anim) => {
                write!(fmt, "Source::Animation({} frame(s))", gif_anim.frames_count())
            }
        }
    }
}


/// Error that may occur while loading the source image.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Error when reading the image file.
    Io(io::Error),
    /// Error when decoding a still image.
    OpenImage(image::ImageError),
    /// Error when decoding a GIF.
    DecodeGif(animated_gif::DecodeError),
}


#[cfg(test)]
mod tests {
    use std::fs;
    use image::{ImageFormat, Rgba, RgbaImage};
    use spectral::prelude::*;
    use tempfile::TempDir;
    use util::animated_gif::testing::two_frame_gif;
    use super::{Source, SourceError, format_for_path};

    #[test]
    fn formats_for_paths() {
        assert_that!(format_for_path("a.PNG")).is_some().is_equal_to(ImageFormat::Png);
        assert_that!(format_for_path("a.jpg")).is_some().is_equal_to(ImageFormat::Jpeg);
        assert_that!(format_for_path("a.tiff")).is_none();
        assert_that!(format_for_path("a")).is_none();
    }

    #[test]
    fn load_still() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("img.png");
        RgbaImage::from_pixel(7, 5, Rgba([1, 2, 3, 255])).save(&path).unwrap();

        let source = Source::load(&path).unwrap();
        assert!(!source.is_animated());
        assert_eq!((7, 5), source.dimensions());
        assert_eq!(1, source.image_count());
        assert_eq!(ImageFormat::Png, source.format());
        assert_eq!(ImageFormat::Png, source.output_format("out"));
        assert_eq!(ImageFormat::Jpeg, source.output_format("out.jpeg"));
    }

    #[test]
    fn load_sniffs_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("actually_a_gif.png");
        fs::write(&path, two_frame_gif(6, 4, false)).unwrap();

        let source = Source::load(&path).unwrap();
        assert!(source.is_animated());
        assert_eq!(2, source.image_count());
        assert_eq!((6, 4), source.dimensions());
        assert_eq!(ImageFormat::Gif, source.output_format("out.png"));
    }

    #[test]
    fn load_errors() {
        let dir = TempDir::new().unwrap();
        match Source::load(dir.path().join("missing.png")) {
            Err(SourceError::Io(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }

        let path = dir.path().join("garbage.png");
        fs::write(&path, b"definitely not an image").unwrap();
        assert_that!(Source::load(&path)).is_err();
    }
}
