//! Data structures for command-line arguments.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use clap;
use meme::{CaptionRequest, CaptionRequestBuildError, ColorParseError};


/// Structure to hold options received from the command line.
#[derive(Clone, Debug, PartialEq)]
pub struct Options {
    /// Verbosity of the logging output.
    ///
    /// Corresponds to the number of times the -v flag has been passed.
    /// If -q has been used instead, this will be negative.
    pub verbosity: isize,

    /// Extra directories to look for fonts in,
    /// searched before the system ones.
    pub font_directories: Vec<PathBuf>,

    /// What the program should do.
    pub command: Command,
}

#[allow(dead_code)]
impl Options {
    #[inline]
    pub fn verbose(&self) -> bool { self.verbosity > 0 }
    #[inline]
    pub fn quiet(&self) -> bool { self.verbosity < 0 }
}


/// Action requested on the command line.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Caption an image.
    Caption(CaptionRequest),
    /// List the available fonts whose names start with given prefix.
    ListFonts(String),
}


macro_attr! {
    /// Error that can occur while parsing of command line arguments.
    #[derive(Debug, EnumFromInner!)]
    pub enum ArgsError {
        /// General when parsing the arguments.
        Parse(clap::Error),
        /// Invalid value of the --color flag.
        Color(ColorParseError),
        /// Captioning parameters are out of their valid ranges.
        Request(CaptionRequestBuildError),
    }
}

impl Error for ArgsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            ArgsError::Parse(ref e) => Some(e),
            ArgsError::Color(ref e) => Some(e),
            ArgsError::Request(ref e) => Some(e),
        }
    }
}

impl fmt::Display for ArgsError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ArgsError::Parse(ref e) => write!(fmt, "invalid arguments: {}", e),
            ArgsError::Color(ref e) => write!(fmt, "invalid text color: {}", e),
            ArgsError::Request(ref e) => write!(fmt, "invalid captioning parameters: {}", e),
        }
    }
}
