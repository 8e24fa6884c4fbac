//! Module defining the model types.

mod color;
mod request;

pub use self::color::{Color, ColorParseError};
pub use self::request::{CaptionRequest,
                        Builder as CaptionRequestBuilder,
                        Error as CaptionRequestBuildError};
