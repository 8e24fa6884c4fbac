//! Module which defines the captioning engine.

mod builder;
mod config;

pub use self::builder::{Builder, Error as BuildError};
pub use self::config::{Config, Error as ConfigError, default_font_for};


use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use antidote::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use model::CaptionRequest;
use resources::{CachingLoader, FontLoader, Loader};
use text::Typeface;
use util::cache::ThreadSafeCache;
use super::error::CaptionError;
use super::output::CaptionOutput;
use super::settings::output_path;
use super::task::CaptionTask;
use self::builder::DEFAULT_FONT_CAPACITY;


/// Image captioning engine.
///
/// The engine is thread-safe (`Sync`), so a single instance
/// can serve captioning requests from multiple threads.
///
/// *Note*: `Engine` implements `Clone`
/// by merely cloning a shared reference to the underlying object.
pub struct Engine<Fl = FontLoader>
    where Fl: Loader, Fl::Item: Typeface
{
    inner: Arc<Inner<Fl>>,
}

/// Shared state of the engine that caption tasks have access to.
pub(super) struct Inner<Fl>
    where Fl: Loader, Fl::Item: Typeface
{
    pub(super) config: RwLock<Config>,
    pub font_loader: CachingLoader<Fl>,
}

impl<Fl> Inner<Fl>
    where Fl: Loader, Fl::Item: Typeface
{
    #[inline]
    pub fn new(config: Config, font_loader: CachingLoader<Fl>) -> Self {
        let config = RwLock::new(config);
        Inner{config, font_loader}
    }
}

impl<Fl> From<Inner<Fl>> for Engine<Fl>
    where Fl: Loader, Fl::Item: Typeface
{
    fn from(inner: Inner<Fl>) -> Self {
        Engine{inner: Arc::new(inner)}
    }
}

impl<Fl> Clone for Engine<Fl>
    where Fl: Loader, Fl::Item: Typeface
{
    fn clone(&self) -> Self {
        Engine{inner: self.inner.clone()}
    }
}

impl<Fl> fmt::Debug for Engine<Fl>
    where Fl: Loader, Fl::Item: Typeface
{
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("Engine")
            .field("config", &*self.inner.config.read())
            .field("font_loader", &self.inner.font_loader)
            .finish()
    }
}

// Constructors.
impl Engine<FontLoader> {
    /// Create an Engine which loads fonts from the system font directories.
    ///
    /// When loaded, fonts will be cached in memory (LRU cache).
    ///
    /// For other ways of creating `Engine`, see the `EngineBuilder`.
    pub fn new() -> Self {
        Self::with_loader(FontLoader::system())
    }

    /// Create an Engine which loads fonts from given directory.
    pub fn with_font_directory<D: AsRef<Path>>(directory: D) -> Self {
        Self::with_loader(FontLoader::new(directory))
    }
}
impl<Fl> Engine<Fl>
    where Fl: Loader, Fl::Item: Typeface
{
    /// Create an Engine that uses given font loader.
    ///
    /// When loaded, fonts will be cached in memory (LRU cache).
    pub fn with_loader(font_loader: Fl) -> Self {
        let font_loader = CachingLoader::new(font_loader, DEFAULT_FONT_CAPACITY);
        Engine::from(Inner::new(Config::default(), font_loader))
    }

    /// Create an Engine that uses given font loader directly.
    ///
    /// Any caching scheme, if necessary, should be implemented by the loader itself.
    pub fn with_raw_loader(font_loader: Fl) -> Self {
        Engine::from(Inner::new(Config::default(), CachingLoader::phony(font_loader)))
    }
}

// Captioning.
impl<Fl> Engine<Fl>
    where Fl: Loader, Fl::Item: Typeface
{
    /// Caption the image according to given request, returning the encoded result.
    ///
    /// Nothing is written to disk, but the output path of the request
    /// (explicit or default) still determines the output format.
    ///
    /// Note that captioning is a CPU-intensive process and can be relatively lengthy,
    /// especially if the source is an animated GIF.
    pub fn caption(&self, request: &CaptionRequest) -> Result<CaptionOutput, CaptionError<Fl>> {
        let output = output_path(request);
        CaptionTask::new(request.clone(), output, self.inner.clone()).perform()
    }

    /// Caption the image according to given request and write the result.
    ///
    /// Returns the path of the written file.
    pub fn add_caption(&self, request: &CaptionRequest) -> Result<PathBuf, CaptionError<Fl>> {
        let path = output_path(request);
        let output = CaptionTask::new(request.clone(), path.clone(), self.inner.clone())
            .perform()?;

        debug!("Writing {:?} output of {} byte(s) to {}",
            output.format(), output.len(), path.display());
        fs::write(&path, output.bytes()).map_err(|e| {
            error!("Failed to write {}: {}", path.display(), e);
            CaptionError::Write(path.clone(), e)
        })?;
        Ok(path)
    }
}

// Managing resources.
impl<Fl> Engine<Fl>
    where Fl: Loader, Fl::Item: Typeface
{
    /// Preemptively load a font into engine's cache.
    pub fn preload_font(&self, name: &str) -> Result<(), Fl::Err> {
        if !self.inner.font_loader.phony {
            self.inner.font_loader.load(name)?;
        }
        Ok(())
    }

    /// Return a reference to the internal font cache, if any.
    /// This can be used to examine cache statistics (hits & misses).
    pub fn font_cache(&self) -> Option<&ThreadSafeCache<String, Fl::Item>> {
        if self.inner.font_loader.phony {
            None
        } else {
            Some(self.inner.font_loader.cache())
        }
    }

    /// The loader that the engine uses for fonts.
    #[inline]
    pub fn font_loader(&self) -> &Fl {
        self.inner.font_loader.inner()
    }
}

// Configuration.
impl<Fl> Engine<Fl>
    where Fl: Loader, Fl::Item: Typeface
{
    /// Read the `Engine`'s configuration.
    #[inline]
    pub fn config(&self) -> RwLockReadGuard<Config> {
        self.inner.config.read()
    }

    /// Modify the `Engine`'s configuration.
    ///
    /// Changes will affect both pending and future captioning tasks.
    /// Values are not validated; see `Config::validate`.
    #[inline]
    pub fn config_mut(&self) -> RwLockWriteGuard<Config> {
        self.inner.config.write()
    }
}


#[cfg(test)]
mod tests {
    use super::{Engine, default_font_for};

    #[test]
    fn thread_safe() {
        fn assert_sync<T: Sync>() {}
        fn assert_send<T: Send>() {}

        assert_sync::<Engine>();
        assert_send::<Engine>();
    }

    #[test]
    fn default_font_depends_on_os() {
        let engine = Engine::with_font_directory("/nonexistent");
        assert_eq!(default_font_for(::std::env::consts::FAMILY), engine.config().default_font);
    }
}
