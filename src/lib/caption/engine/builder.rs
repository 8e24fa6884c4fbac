//! Module implementing the builder for `Engine`.

use std::path::Path;

use resources::{CachingLoader, FontLoader, Loader, system_font_directories};
use text::Typeface;
use super::config::{Config, Error as ConfigError};
use super::{Engine, Inner};


pub(super) const DEFAULT_FONT_CAPACITY: usize = 16;


/// Builder for `Engine`.
#[must_use = "unused builder which must be used"]
pub struct Builder<Fl = FontLoader>
    where Fl: Loader, Fl::Item: Typeface
{
    errors: Vec<Error>,
    font_loader_builder: Option<LoaderBuilder<Fl>>,
    default_font: Option<String>,
    jpeg_quality: Option<u8>,
    gif_sample_factor: Option<u8>,
}


/// Temporary configuration for the font loader.
/// Used by `Builder`.
enum LoaderBuilder<L: Loader> {
    Cached {
        inner: Option<L>,
        cache_size: usize,
    },
    Raw { inner: Option<L> },
}

impl<L: Loader> LoaderBuilder<L> {
    #[inline]
    fn cached(size: usize) -> Self {
        LoaderBuilder::Cached { inner: None, cache_size: size }
    }

    #[inline]
    fn raw() -> Self {
        LoaderBuilder::Raw { inner: None }
    }

    /// Slot for the loader that the `Cached` loader would wrap.
    /// Returns `None` if `LoaderBuilder` is configured as `Raw`.
    fn cached_slot(&mut self) -> Option<&mut Option<L>> {
        match *self {
            LoaderBuilder::Cached{ref mut inner, ..} => Some(inner),
            LoaderBuilder::Raw{..} => None,
        }
    }

    /// Set the cache size of `Cached` loader.
    /// Returns `false` if `LoaderBuilder` is configured as `Raw`.
    fn set_cache_size(&mut self, size: usize) -> bool {
        match *self {
            LoaderBuilder::Cached{ref mut cache_size, ..} => { *cache_size = size; true }
            LoaderBuilder::Raw{..} => false,
        }
    }

    /// Set the loader that the `Raw` loader would wrap.
    /// Returns `false` if `LoaderBuilder` is configured as `Cached`
    /// or the raw loader has already been set.
    fn set_raw_loader(&mut self, loader: L) -> bool {
        match *self {
            LoaderBuilder::Raw{ref mut inner} if inner.is_none() => {
                *inner = Some(loader);
                true
            }
            _ => false,
        }
    }

    fn build(self) -> Result<CachingLoader<L>, Error> {
        match self {
            LoaderBuilder::Cached{ inner, cache_size } => inner
                .map(|loader| CachingLoader::new(loader, cache_size))
                .ok_or(Error::NoLoader),
            // Use the phony version of CachingLoader which doesn't actually cache anything,
            // but provides the same interface yielding Arc<L::Item>.
            LoaderBuilder::Raw{ inner } => inner
                .map(CachingLoader::phony)
                .ok_or(Error::NoLoader),
        }
    }
}


impl<Fl> Builder<Fl>
    where Fl: Loader, Fl::Item: Typeface
{
    /// Create a new `Builder`.
    #[inline]
    pub fn new() -> Self {
        Builder::default()
    }
}
impl<Fl> Default for Builder<Fl>
    where Fl: Loader, Fl::Item: Typeface
{
    fn default() -> Self {
        Builder{
            errors: vec![],
            font_loader_builder: None,
            default_font: None,
            jpeg_quality: None,
            gif_sample_factor: None,
        }
    }
}

// Setters.
impl Builder<FontLoader> {
    /// Add a directory where the fonts will be searched for.
    ///
    /// Directories are searched in the order they were added.
    pub fn font_directory<P: AsRef<Path>>(mut self, directory: P) -> Self {
        let ok = match self.cached_font_loader_builder().cached_slot() {
            Some(slot) => {
                match *slot {
                    Some(ref mut loader) => loader.add_directory(directory),
                    None => *slot = Some(FontLoader::new(directory)),
                }
                true
            }
            None => false,
        };
        if ok { self } else { self.err(Error::LoaderConflict) }
    }

    /// Add the conventional font directories of this system,
    /// after any other font directories added so far.
    pub fn system_font_directories(self) -> Self {
        system_font_directories().into_iter()
            .fold(self, |builder, dir| builder.font_directory(dir))
    }
}
impl<Fl> Builder<Fl>
    where Fl: Loader, Fl::Item: Typeface
{
    /// Set a custom loader for fonts.
    ///
    /// Fonts loaded by it will still be cached in an LRU cache.
    /// See `raw_font_loader` if you want to provide your own caching.
    pub fn font_loader(mut self, loader: Fl) -> Self {
        let ok = match self.cached_font_loader_builder().cached_slot() {
            Some(slot) if slot.is_none() => { *slot = Some(loader); true }
            _ => false,
        };
        if ok { self } else { self.err(Error::LoaderConflict) }
    }

    /// Change the size of the font cache.
    pub fn font_cache_size(mut self, size: usize) -> Self {
        let ok = self.cached_font_loader_builder().set_cache_size(size);
        if ok { self } else { self.err(Error::LoaderConflict) }
    }

    /// Set a custom "raw" loader for fonts.
    ///
    /// Fonts loaded this way will not be cached (unless the loader itself
    /// implements some kind of caching).
    pub fn raw_font_loader(mut self, loader: Fl) -> Self {
        let ok = self.font_loader_builder.get_or_insert_with(LoaderBuilder::raw)
            .set_raw_loader(loader);
        if ok { self } else { self.err(Error::LoaderConflict) }
    }

    fn cached_font_loader_builder(&mut self) -> &mut LoaderBuilder<Fl> {
        self.font_loader_builder
            .get_or_insert_with(|| LoaderBuilder::cached(DEFAULT_FONT_CAPACITY))
    }
}
impl<Fl> Builder<Fl>
    where Fl: Loader, Fl::Item: Typeface
{
    /// Set the font used by requests which don't specify one.
    #[inline]
    pub fn default_font<S: Into<String>>(mut self, font: S) -> Self {
        self.default_font = Some(font.into()); self
    }

    /// Set the quality percentage of JPEG images generated by the `Engine`.
    #[inline]
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = Some(quality); self
    }

    /// Set the sample factor of the color quantizer used when encoding GIFs.
    ///
    /// Valid values are 1 to 30, with lower values being slower
    /// but giving better quality.
    #[inline]
    pub fn gif_sample_factor(mut self, factor: u8) -> Self {
        self.gif_sample_factor = Some(factor); self
    }
}

// Validation & building.
impl<Fl> Builder<Fl>
    where Fl: Loader, Fl::Item: Typeface
{
    /// Build the `Engine`.
    pub fn build(self) -> Result<Engine<Fl>, Error> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }

        let mut config = Config::default();
        if let Some(font) = self.default_font {
            config.default_font = font;
        }
        if let Some(quality) = self.jpeg_quality {
            config.jpeg_quality = quality;
        }
        if let Some(factor) = self.gif_sample_factor {
            config.gif_sample_factor = factor;
        }
        config.validate()?;

        let font_loader = self.font_loader_builder
            .ok_or(Error::NoLoader)?
            .build()?;
        Ok(Engine::from(Inner::new(config, font_loader)))
    }

    #[doc(hidden)]
    fn err(mut self, error: Error) -> Self {
        self.errors.push(error); self
    }
}


/// Error that resulted from misconfiguration of the `Engine` via its `Builder`.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// No font loader set up.
    #[error(msg = "no font loader configured", non_std, no_from)]
    NoLoader,
    /// Incompatible settings of the font loader
    /// (e.g. both a raw loader and font directories).
    #[error(msg = "conflicting configuration of the font loader", non_std, no_from)]
    LoaderConflict,
    /// Invalid configuration value.
    Config(ConfigError),
}
