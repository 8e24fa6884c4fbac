//! Module implementing image captioning.

mod canvas;
mod engine;
mod error;
mod output;
mod settings;
mod source;
mod task;


pub use self::engine::{Builder as EngineBuilder,
                       BuildError as EngineBuildError,
                       Config as EngineConfig,
                       ConfigError as EngineConfigError,
                       Engine,
                       default_font_for};
pub use self::error::CaptionError;
pub use self::output::CaptionOutput;
pub use self::settings::{Mode, Settings, output_path};
pub use self::source::{Source, SourceError, IMAGE_FORMAT_EXTENSIONS, format_for_path};
