//! Module for loading fonts used to render captions.

use std::env;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use rusttype::{self, point, Scale};

use layout::{Bounds, GlyphMetrics};
use text::Typeface;
use super::Loader;
use super::filesystem::{BytesLoader, PathLoader};


/// Extensions of font files that are recognized.
pub const FILE_EXTENSIONS: &'static [&'static str] = &["ttf", "otf", "ttc"];


/// Font that can be used to render captions.
macro_attr! {
    #[derive(Clone, NewtypeDeref!, NewtypeFrom!)]
    pub struct Font(rusttype::Font<'static>);
}
impl fmt::Debug for Font {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "Font({} glyphs)", self.glyph_count())
    }
}

impl Font {
    /// Parse the font from the content of a font file.
    ///
    /// For font collections, the first font is used.
    pub fn from_bytes(bytes: Vec<u8>) -> Option<Self> {
        rusttype::Font::try_from_vec(bytes).map(Font)
    }
}

impl Typeface for Font {
    fn metrics(&self, size: f32, text: &str) -> GlyphMetrics {
        let scale = Scale::uniform(size);
        let v_metrics = self.v_metrics(scale);

        let mut width = 0.0;
        let mut bounds: Option<Bounds> = None;
        for glyph in self.layout(text, scale, point(0.0, 0.0)) {
            width = glyph.position().x + glyph.unpositioned().h_metrics().advance_width;
            if let Some(bb) = glyph.pixel_bounding_box() {
                // rusttype has y pointing down.
                let (min_x, max_x) = (bb.min.x as f32, bb.max.x as f32);
                let (min_y, max_y) = (-bb.max.y as f32, -bb.min.y as f32);
                bounds = Some(match bounds {
                    None => Bounds{min_x, min_y, max_x, max_y},
                    Some(b) => Bounds{
                        min_x: b.min_x.min(min_x), min_y: b.min_y.min(min_y),
                        max_x: b.max_x.max(max_x), max_y: b.max_y.max(max_y),
                    },
                });
            }
        }

        GlyphMetrics{
            width,
            height: v_metrics.ascent - v_metrics.descent,
            ascent: v_metrics.ascent,
            descent: v_metrics.descent,
            bounds: bounds.unwrap_or_default(),
        }
    }

    fn rasterize(&self, size: f32, text: &str, plot: &mut dyn FnMut(i32, i32, f32)) {
        let scale = Scale::uniform(size);
        for glyph in self.layout(text, scale, point(0.0, 0.0)) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|x, y, v| plot(bb.min.x + x as i32, bb.min.y + y as i32, v));
            }
        }
    }

    fn has_glyph(&self, c: char) -> bool {
        self.glyph(c).id().0 != 0
    }
}


/// Directories where the fonts are conventionally installed on this system.
///
/// Only the directories that actually exist are returned.
pub fn system_font_directories() -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = vec![
        "/usr/share/fonts".into(),
        "/usr/local/share/fonts".into(),
        "/Library/Fonts".into(),
        "/System/Library/Fonts".into(),
    ];
    if let Some(home) = env::var_os("HOME") {
        let home = PathBuf::from(home);
        candidates.push(home.join(".fonts"));
        candidates.push(home.join(".local/share/fonts"));
        candidates.push(home.join("Library/Fonts"));
    }
    if let Some(windir) = env::var_os("WINDIR") {
        candidates.push(PathBuf::from(windir).join("Fonts"));
    }
    candidates.into_iter().filter(|d| d.is_dir()).collect()
}


/// Loader of fonts from font files in a list of directories.
#[derive(Clone, Debug)]
pub struct FontLoader {
    inner: BytesLoader<'static>,
}

impl FontLoader {
    /// Create a loader which searches given directory for font files.
    pub fn new<D: AsRef<Path>>(directory: D) -> Self {
        FontLoader{
            inner: BytesLoader::new(
                PathLoader::for_extensions(directory, FILE_EXTENSIONS.iter()))
        }
    }

    /// Create a loader which searches given directories, in order.
    ///
    /// Returns `None` if no directories are given.
    pub fn with_directories<I, D>(directories: I) -> Option<Self>
        where I: IntoIterator<Item=D>, D: AsRef<Path>
    {
        let mut directories = directories.into_iter();
        let mut loader = Self::new(directories.next()?);
        for directory in directories {
            loader.add_directory(directory);
        }
        Some(loader)
    }

    /// Create a loader which searches the system font directories.
    pub fn system() -> Self {
        let mut directories = system_font_directories();
        if directories.is_empty() {
            warn!("No system font directories found");
            directories.push(env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        }
        Self::with_directories(directories)
            .unwrap_or_else(|| Self::new("."))
    }
}

impl FontLoader {
    /// Add another directory to search, after all the existing ones.
    #[inline]
    pub fn add_directory<D: AsRef<Path>>(&mut self, directory: D) {
        self.inner.paths_mut().add_directory(directory)
    }

    #[inline]
    pub fn directories(&self) -> &[PathBuf] {
        self.inner.paths().directories()
    }

    /// List the names of the fonts that are available to this loader.
    ///
    /// Only the fonts whose name starts with `filter` (case-insensitively)
    /// are returned. The list is sorted and has no duplicates.
    pub fn list(&self, filter: &str) -> Vec<String> {
        let filter = filter.trim().to_lowercase();
        self.inner.paths().files().into_iter()
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(String::from))
            .filter(|name| name.to_lowercase().starts_with(&filter))
            .sorted()
            .dedup()
            .collect()
    }
}

impl Loader for FontLoader {
    type Item = Font;
    type Err = FontError;

    fn load<'n>(&self, name: &'n str) -> Result<Font, Self::Err> {
        let bytes = self.inner.load(name).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::InvalidInput =>
                FontError::NotFound(format!("font `{}` not found", name)),
            _ => FontError::Io(e),
        })?;
        let font = Font::from_bytes(bytes).ok_or_else(|| {
            error!("File for the font `{}` is not a valid font", name);
            FontError::Invalid(format!("invalid font file for `{}`", name))
        })?;
        debug!("Font `{}` loaded successfully", name);
        Ok(font)
    }
}


/// Error that may occur while loading a font.
#[derive(Debug, Error)]
pub enum FontError {
    /// No font file matches the font name.
    #[error(msg_embedded, no_from, non_std)]
    NotFound(String),
    /// Font file couldn't be read.
    Io(io::Error),
    /// Font file is malformed or not supported.
    #[error(msg_embedded, no_from, non_std)]
    Invalid(String),
}
