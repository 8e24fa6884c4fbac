//! Module with captioning engine configuration.

use std::collections::HashMap;
use std::env;

use util::animated_gif::DEFAULT_SAMPLE_FACTOR;


/// Font used when none is configured for the current OS family.
const FALLBACK_FONT: &'static str = "DejaVu-Sans";

lazy_static! {
    /// Default fonts for OS families (as in `std::env::consts::FAMILY`).
    static ref DEFAULT_FONTS: HashMap<&'static str, &'static str> = hashmap!{
        "windows" => "Arial",
        "unix" => FALLBACK_FONT,
    };
}

/// Name of the default font for given OS family.
pub fn default_font_for(family: &str) -> &'static str {
    DEFAULT_FONTS.get(family).cloned().unwrap_or(FALLBACK_FONT)
}


/// Structure holding configuration for the `Engine`.
///
/// This is shared with `CaptionTask`s.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Font used by requests that don't specify one.
    pub default_font: String,
    /// Quality of the generated JPEG images (in %).
    pub jpeg_quality: u8,
    /// Sample factor of the color quantizer used for GIFs (1-30).
    /// Lower is better but slower.
    pub gif_sample_factor: u8,
}

impl Default for Config {
    /// Initialize Config with default values.
    fn default() -> Self {
        Config {
            default_font: default_font_for(env::consts::FAMILY).to_owned(),
            jpeg_quality: 85,
            gif_sample_factor: DEFAULT_SAMPLE_FACTOR,
        }
    }
}


/// Error for when a value of `Config` is out of its valid range.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// JPEG quality outside of 1-100.
    #[error(no_from, non_std, msg = "JPEG quality must be between 1 and 100")]
    JpegQuality(u8),
    /// GIF sample factor outside of 1-30.
    #[error(no_from, non_std, msg = "GIF sample factor must be between 1 and 30")]
    GifSampleFactor(u8),
    /// Empty name of the default font.
    #[error(no_from, non_std, msg = "default font name cannot be empty")]
    DefaultFont,
}

impl Config {
    /// Check that all configuration values are within their ranges.
    pub fn validate(&self) -> Result<(), Error> {
        if self.jpeg_quality < 1 || self.jpeg_quality > 100 {
            return Err(Error::JpegQuality(self.jpeg_quality));
        }
        if self.gif_sample_factor < 1 || self.gif_sample_factor > 30 {
            return Err(Error::GifSampleFactor(self.gif_sample_factor));
        }
        if self.default_font.trim().is_empty() {
            return Err(Error::DefaultFont);
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use spectral::prelude::*;
    use super::{Config, Error, default_font_for};

    #[test]
    fn default_fonts() {
        assert_eq!("Arial", default_font_for("windows"));
        assert_eq!("DejaVu-Sans", default_font_for("unix"));
        assert_eq!("DejaVu-Sans", default_font_for("wasm"));
    }

    #[test]
    fn default_is_valid() {
        assert_that!(Config::default().validate()).is_ok();
    }

    #[test]
    fn validation() {
        let mut config = Config::default();
        config.jpeg_quality = 0;
        assert_that!(config.validate()).is_err().is_equal_to(Error::JpegQuality(0));

        let mut config = Config::default();
        config.gif_sample_factor = 31;
        assert_that!(config.validate()).is_err().is_equal_to(Error::GifSampleFactor(31));

        let mut config = Config::default();
        config.default_font = "  ".into();
        assert_that!(config.validate()).is_err().is_equal_to(Error::DefaultFont);
    }
}
