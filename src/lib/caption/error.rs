//! Captioning error.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use resources::{FontLoader, Loader};
use super::source::SourceError;


/// Error that may occur during the captioning.
pub enum CaptionError<Fl: Loader = FontLoader> {
    /// Source image couldn't be read or decoded.
    Image(PathBuf, SourceError),
    /// Font couldn't be loaded.
    Font(String, Fl::Err),
    /// Caption cannot be drawn on the image.
    Draw(String),
    /// Result couldn't be encoded in the output format.
    Encode(io::Error),
    /// Result couldn't be written to the output file.
    Write(PathBuf, io::Error),
}

impl<Fl: Loader> Error for CaptionError<Fl> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            CaptionError::Image(_, ref e) => Some(e),
            CaptionError::Font(_, ref e) => Some(e),
            CaptionError::Draw(_) => None,
            CaptionError::Encode(ref e) => Some(e),
            CaptionError::Write(_, ref e) => Some(e),
        }
    }
}

impl<Fl: Loader> fmt::Debug for CaptionError<Fl> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CaptionError::Image(ref p, ref e) =>
                write!(fmt, "CaptionError::Image({:?}, {:?})", p, e),
            CaptionError::Font(ref f, ref e) =>
                write!(fmt, "CaptionError::Font({:?}, {})", f, e),
            CaptionError::Draw(ref m) => write!(fmt, "CaptionError::Draw({:?})", m),
            CaptionError::Encode(ref e) => write!(fmt, "CaptionError::Encode({:?})", e),
            CaptionError::Write(ref p, ref e) =>
                write!(fmt, "CaptionError::Write({:?}, {:?})", p, e),
        }
    }
}

impl<Fl: Loader> fmt::Display for CaptionError<Fl> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CaptionError::Image(ref p, ref e) =>
                write!(fmt, "cannot load image {}: {}", p.display(), e),
            CaptionError::Font(ref f, ref e) => write!(fmt, "cannot load font `{}`: {}", f, e),
            CaptionError::Draw(ref m) => write!(fmt, "cannot draw the caption: {}", m),
            CaptionError::Encode(ref e) => write!(fmt, "failed to encode the final image: {}", e),
            CaptionError::Write(ref p, ref e) =>
                write!(fmt, "failed to write {}: {}", p.display(), e),
        }
    }
}
