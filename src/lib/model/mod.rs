//! Module defining the data model of captioning requests.

mod constants;
mod types;

pub use self::constants::*;
pub use self::types::*;
