//! Module implementing memoized text measurement.

use std::fmt;

use layout::{GlyphMetrics, Measure};
use util::cache::{CacheStats, ThreadSafeCache};
use super::Typeface;


/// How many distinct strings a `Measurer` remembers.
const CACHE_CAPACITY: usize = 1024;


/// Measures text in a single typeface & size, remembering the results.
///
/// Wrapping a caption measures every word and then every candidate line,
/// often repeatedly, so this avoids laying out the same glyphs over and over.
pub struct Measurer<'f, T: Typeface + ?Sized + 'f> {
    face: &'f T,
    size: f32,
    cache: ThreadSafeCache<String, GlyphMetrics>,
}

impl<'f, T: Typeface + ?Sized> Measurer<'f, T> {
    #[inline]
    pub fn new(face: &'f T, size: f32) -> Self {
        Measurer{face, size, cache: ThreadSafeCache::new(CACHE_CAPACITY)}
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    #[inline]
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl<'f, T: Typeface + ?Sized> Measure for Measurer<'f, T> {
    fn metrics(&self, text: &str) -> GlyphMetrics {
        *self.cache.get_or_insert_with(text, || self.face.metrics(self.size, text))
    }
}

impl<'f, T: Typeface + ?Sized> fmt::Debug for Measurer<'f, T> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("Measurer")
            .field("size", &self.size)
            .field("cache", &self.cache)
            .finish()
    }
}
