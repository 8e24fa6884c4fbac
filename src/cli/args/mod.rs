//! Module for handling command line arguments.

mod model;
mod parser;


use std::env;
use std::ffi::OsString;

use conv::TryFrom;

use super::{NAME, VERSION};
pub use self::model::{ArgsError, Command, Options};
use self::parser::create_parser;


/// Parse command line arguments and return `Options` object.
#[inline]
pub fn parse() -> Result<Options, ArgsError> {
    parse_from_argv(env::args_os())
}

/// Parse application options from given array of arguments
/// (*all* arguments, including binary name).
#[inline]
pub fn parse_from_argv<I, T>(argv: I) -> Result<Options, ArgsError>
    where I: IntoIterator<Item=T>, T: Clone + Into<OsString>
{
    let parser = create_parser();
    let matches = parser.get_matches_from_safe(argv)?;
    Options::try_from(matches)
}


#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use meme::Color;
    use spectral::prelude::*;
    use super::{ArgsError, Command, parse_from_argv};
    use ::NAME;

    fn caption_of(argv: Vec<&str>) -> ::meme::CaptionRequest {
        match parse_from_argv(argv).unwrap().command {
            Command::Caption(request) => request,
            other => panic!("expected a captioning command, got {:?}", other),
        }
    }

    #[test]
    fn no_args() {
        assert_that!(parse_from_argv(Vec::<&str>::new())).is_err();
        assert_that!(parse_from_argv(vec![*NAME])).is_err();
        assert_that!(parse_from_argv(vec![*NAME, "cat.png"])).is_err();
    }

    #[test]
    fn image_and_caption() {
        let request = caption_of(vec![*NAME, "cat.png", "I can has"]);
        assert_eq!(PathBuf::from("cat.png"), request.source);
        assert_eq!("I can has", request.caption);
        assert_that!(request.bottom_caption).is_none();
        assert_that!(request.font_size).is_none();
        assert_that!(request.stroke_width).is_none();
        assert_that!(request.output).is_none();
        assert_eq!(5.0, request.x_padding);
        assert_eq!(30.0, request.y_padding);
        assert_eq!(0.0, request.line_height);
    }

    #[test]
    fn all_caption_flags() {
        let request = caption_of(vec![
            *NAME, "doge.gif", "such caption",
            "--font", "Impact", "--size", "32", "-x", "10", "-y", "15", "--line", "-2",
            "-b", "very bottom", "--stroke-width", "3", "-o", "out.gif",
        ]);
        assert_eq!(Some("Impact".to_owned()), request.font);
        assert_eq!(Some(32.0), request.font_size);
        assert_eq!(10.0, request.x_padding);
        assert_eq!(15.0, request.y_padding);
        assert_eq!(-2.0, request.line_height);
        assert_eq!(Some("very bottom".to_owned()), request.bottom_caption);
        assert_eq!(Some(3.0), request.stroke_width);
        assert_eq!(Some(PathBuf::from("out.gif")), request.output);
    }

    #[test]
    fn color() {
        let request = caption_of(vec![*NAME, "cat.png", "hi", "-c", "red"]);
        assert_eq!(Some(Color(0xff, 0, 0)), request.color);

        match parse_from_argv(vec![*NAME, "cat.png", "hi", "-c", "rgba(0, 0, 0, 0.5)"]) {
            Err(ArgsError::Color(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn invalid_numbers() {
        match parse_from_argv(vec![*NAME, "cat.png", "hi", "--size", "big"]) {
            Err(ArgsError::Parse(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        match parse_from_argv(vec![*NAME, "cat.png", "hi", "-x", "150"]) {
            Err(ArgsError::Request(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn font_directories() {
        let opts = parse_from_argv(vec![
            *NAME, "--font-dir", "/first", "--font-dir", "/second", "cat.png", "hi",
        ]).unwrap();
        assert_eq!(vec![PathBuf::from("/first"), PathBuf::from("/second")],
                   opts.font_directories);
    }

    #[test]
    fn verbosity() {
        let opts = parse_from_argv(vec![*NAME, "-vv", "cat.png", "hi"]).unwrap();
        assert_eq!(2, opts.verbosity);
        assert!(opts.verbose());
        let opts = parse_from_argv(vec![*NAME, "-q", "cat.png", "hi"]).unwrap();
        assert_eq!(-1, opts.verbosity);
        assert!(opts.quiet());
        assert_that!(parse_from_argv(vec![*NAME, "-v", "-q", "cat.png", "hi"])).is_err();
    }

    #[test]
    fn list_fonts() {
        let opts = parse_from_argv(vec![*NAME, "fonts"]).unwrap();
        assert_eq!(Command::ListFonts("".into()), opts.command);
        let opts = parse_from_argv(vec![*NAME, "f", "dejavu"]).unwrap();
        assert_eq!(Command::ListFonts("dejavu".into()), opts.command);
    }
}
