//! Module defining the command line argument parser.

use std::env;
use std::path::PathBuf;

use conv::TryFrom;
use clap::{self, AppSettings, Arg, ArgMatches, SubCommand};
use meme::{CaptionRequest, CaptionRequestBuilder, Color};

use super::{NAME, VERSION};
use super::model::{ArgsError, Command, Options};


impl<'a> TryFrom<ArgMatches<'a>> for Options {
    type Err = ArgsError;

    fn try_from(matches: ArgMatches<'a>) -> Result<Self, Self::Err> {
        let verbose_count = matches.occurrences_of(OPT_VERBOSE) as isize;
        let quiet_count = matches.occurrences_of(OPT_QUIET) as isize;
        let verbosity = verbose_count - quiet_count;

        // Each occurrence (or the env variable) may hold several paths.
        let font_directories: Vec<PathBuf> = matches.values_of_os(OPT_FONT_DIR)
            .map(|values| values
                .flat_map(|v| env::split_paths(v).collect::<Vec<_>>())
                .filter(|p| !p.as_os_str().is_empty())
                .collect())
            .unwrap_or_else(Vec::new);

        let command = match matches.subcommand() {
            (CMD_FONTS, Some(fonts_matches)) => {
                let filter = fonts_matches.value_of(ARG_FILTER).unwrap_or("").trim();
                Command::ListFonts(filter.to_owned())
            }
            _ => Command::Caption(caption_request(&matches)?),
        };

        Ok(Options{verbosity, font_directories, command})
    }
}

/// Build the captioning request from the top-level arguments.
fn caption_request(matches: &ArgMatches) -> Result<CaptionRequest, ArgsError> {
    let mut builder = CaptionRequestBuilder::new()
        .source(matches.value_of_os(ARG_IMAGE).unwrap_or_default())
        .caption(matches.value_of(ARG_CAPTION).unwrap_or(""))
        .font_size(value_t!(matches, OPT_SIZE, f32)?)
        .x_padding(value_t!(matches, OPT_PAD_X, f32)?)
        .y_padding(value_t!(matches, OPT_PAD_Y, f32)?)
        .line_height(value_t!(matches, OPT_LINE, f32)?)
        .stroke_width(value_t!(matches, OPT_STROKE_WIDTH, f32)?);

    if let Some(font) = matches.value_of(OPT_FONT) {
        builder = builder.font(font.trim());
    }
    if let Some(bottom) = matches.value_of(OPT_BOTTOM_CAPTION) {
        builder = builder.bottom_caption(bottom);
    }
    if let Some(color) = matches.value_of(OPT_COLOR) {
        builder = builder.color(color.parse::<Color>()?);
    }
    if let Some(output) = matches.value_of_os(OPT_OUTPUT) {
        builder = builder.output(output);
    }

    let request = builder.build()?;
    Ok(request)
}


// Parser definition

/// Type of the argument parser object
/// (which is called an "App" in clap's silly nomenclature).
pub type Parser<'p> = clap::App<'p, 'p>;


lazy_static! {
    static ref ABOUT: &'static str = option_env!("CARGO_PKG_DESCRIPTION").unwrap_or("");
}

const ARG_IMAGE: &'static str = "image";
const ARG_CAPTION: &'static str = "caption";
const OPT_FONT: &'static str = "font";
const OPT_SIZE: &'static str = "size";
const OPT_PAD_X: &'static str = "pad-x";
const OPT_PAD_Y: &'static str = "pad-y";
const OPT_LINE: &'static str = "line";
const OPT_BOTTOM_CAPTION: &'static str = "bottom-caption";
const OPT_STROKE_WIDTH: &'static str = "stroke-width";
const OPT_COLOR: &'static str = "color";
const OPT_OUTPUT: &'static str = "output";
const OPT_FONT_DIR: &'static str = "font-dir";
const OPT_VERBOSE: &'static str = "verbose";
const OPT_QUIET: &'static str = "quiet";

const CMD_FONTS: &'static str = "fonts";
const ARG_FILTER: &'static str = "filter";

/// Environment variable with the font to use by default.
const ENV_FONT: &'static str = "MEME_MAKER_FONT";
/// Environment variable with extra font directories.
const ENV_FONT_PATH: &'static str = "MEME_MAKER_FONT_PATH";


/// Create the parser for application's command line.
#[allow(dangerous_implicit_autorefs)]
pub fn create_parser<'p>() -> Parser<'p> {
    let mut parser = Parser::new(*NAME);
    if let Some(ref version) = *VERSION {
        parser = parser.version(version.as_str());
    }
    parser
        .about(*ABOUT)
        .author(crate_authors!(", "))

        .setting(AppSettings::StrictUtf8)
        .setting(AppSettings::SubcommandsNegateReqs)
        .setting(AppSettings::VersionlessSubcommands)

        .setting(AppSettings::UnifiedHelpMessage)
        .setting(AppSettings::DontCollapseArgsInUsage)
        .setting(AppSettings::DeriveDisplayOrder)

        // Captioning arguments.
        .arg(Arg::with_name(ARG_IMAGE)
            .value_name("IMAGE")
            .required(true)
            .help("Image to caption")
            .long_help(concat!(
                "Path to the image to caption.\n\n",
                "PNG, JPEG, BMP and GIF images are supported. ",
                "Animated GIFs have every frame captioned.")))
        .arg(Arg::with_name(ARG_CAPTION)
            .value_name("CAPTION")
            .required(true)
            .help("Text of the caption")
            .long_help(concat!(
                "Text of the caption.\n\n",
                "Unless a bottom caption is also given, it's placed above the image ",
                "on a white strip. Otherwise it's drawn over the top of the image.")))
        .arg(Arg::with_name(OPT_FONT)
            .long("font").short("f")
            .takes_value(true)
            .value_name("NAME")
            .env(ENV_FONT)
            .help("Font to render the captions with")
            .long_help(concat!(
                "Name of the font to render the captions with, ",
                "or a path to the font file.\n\n",
                "Font names are matched ignoring case, dashes, underscores and spaces. ",
                "Use the `fonts` subcommand to see what's available.")))
        .arg(Arg::with_name(OPT_SIZE)
            .long("size").short("s")
            .takes_value(true)
            .value_name("PX")
            .default_value("0")
            .help("Font size in pixels (0 means image width / 15)"))
        .arg(Arg::with_name(OPT_PAD_X)
            .long("pad-x").short("x")
            .takes_value(true)
            .value_name("PERCENT")
            .default_value("5")
            .help("Horizontal padding in % of the image width"))
        .arg(Arg::with_name(OPT_PAD_Y)
            .long("pad-y").short("y")
            .takes_value(true)
            .value_name("PERCENT")
            .default_value("30")
            .help("Vertical padding in % of the font size"))
        .arg(Arg::with_name(OPT_LINE)
            .long("line").short("l")
            .takes_value(true)
            .value_name("PX")
            .default_value("0")
            .allow_hyphen_values(true)
            .help("Extra spacing between lines of text, in pixels"))
        .arg(Arg::with_name(OPT_BOTTOM_CAPTION)
            .long("bottom-caption").short("b")
            .takes_value(true)
            .value_name("TEXT")
            .help("Bottom caption, for a top & bottom meme")
            .long_help(concat!(
                "Text of the bottom caption.\n\n",
                "When given, both captions are drawn over the image in white ",
                "with a black outline, like in the classic Impact font memes.")))
        .arg(Arg::with_name(OPT_STROKE_WIDTH)
            .long("stroke-width")
            .takes_value(true)
            .value_name("PX")
            .default_value("0")
            .help("Width of the text outline in a top & bottom meme (0 means font size / 40)"))
        .arg(Arg::with_name(OPT_COLOR)
            .long("color").short("c")
            .takes_value(true)
            .value_name("COLOR")
            .help("Text color of a single caption meme (CSS syntax)"))
        .arg(Arg::with_name(OPT_OUTPUT)
            .long("output").short("o")
            .takes_value(true)
            .value_name("PATH")
            .help("File to write the captioned image to")
            .long_help(concat!(
                "What file should the final image be written to.\n\n",
                "By default it's the name of the source image with `_memed` ",
                "added before the extension, in the current directory. ",
                "The extension of the output path determines its format, ",
                "except for GIFs which always produce GIFs.")))

        // Resource flags.
        .arg(Arg::with_name(OPT_FONT_DIR)
            .long("font-dir")
            .takes_value(true)
            .multiple(true)
            .number_of_values(1)
            .value_name("DIR")
            .env(ENV_FONT_PATH)
            .help("Additional directory to search for fonts")
            .long_help(concat!(
                "Additional directory to search for fonts.\n\n",
                "Can be given multiple times, and each value may be a list of paths ",
                "separated like in the PATH variable. These directories are searched ",
                "before the system ones, in the order they were given.")))

        // Verbosity flags.
        .arg(Arg::with_name(OPT_VERBOSE)
            .long("verbose").short("v")
            .multiple(true)
            .conflicts_with(OPT_QUIET)
            .help("Increase logging verbosity"))
        .arg(Arg::with_name(OPT_QUIET)
            .long("quiet").short("q")
            .multiple(true)
            .conflicts_with(OPT_VERBOSE)
            .help("Decrease logging verbosity"))

        .subcommand(SubCommand::with_name(CMD_FONTS)
            .alias("f")
            .about("List the available fonts")
            .arg(Arg::with_name(ARG_FILTER)
                .value_name("FILTER")
                .required(false)
                .help("Only list fonts whose names start with this")))

        .help_short("H")
        .version_short("V")
}
