//!
//! meme  -- Caption layout & rendering for image memes
//!

             extern crate antidote;
             extern crate color_quant;
             extern crate css_color_parser;
#[macro_use] extern crate derive_error;
             extern crate gif;
             extern crate gif_dispose;
             extern crate glob;
             extern crate image;
             extern crate itertools;
#[macro_use] extern crate lazy_static;
#[macro_use] extern crate log;
             extern crate lru_cache;
#[macro_use] extern crate macro_attr;
#[macro_use] extern crate maplit;
#[macro_use] extern crate newtype_derive;
             extern crate rusttype;


#[cfg(test)] #[macro_use] extern crate spectral;
#[cfg(test)]              extern crate tempfile;


mod caption;
mod layout;
mod model;
mod resources;
mod text;
mod util;


pub use caption::*;
pub use layout::*;
pub use model::*;
pub use resources::*;
pub use text::{Measurer, TextLayer, Typeface};
pub use util::cache::*;
