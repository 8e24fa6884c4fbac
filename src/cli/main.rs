//!
//! meme-maker -- Add captions to images, meme style
//!

             extern crate ansi_term;
#[macro_use] extern crate clap;
             extern crate conv;
#[macro_use] extern crate enum_derive;
             extern crate exitcode;
             extern crate isatty;
#[macro_use] extern crate lazy_static;
#[macro_use] extern crate macro_attr;
             extern crate meme;
#[macro_use] extern crate slog;
             extern crate slog_envlogger;
             extern crate slog_scope;
             extern crate slog_stdlog;

// `log` must be at the end of these declarations because we want to simultaneously:
// * use the standard `log` macros (which would be shadowed by `slog`)
// * be able to initialize the slog logger using slog macros like o!()
#[macro_use] extern crate log;

#[cfg(test)] #[macro_use] extern crate spectral;


mod args;
mod logging;


use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::exit;

use clap::ErrorKind as ClapErrorKind;
use meme::{CaptionError, CaptionRequest, Engine, EngineBuildError, EngineBuilder, FontLoader,
           system_font_directories};

use args::{ArgsError, Command};


/// Git revision the binary was built from, if known.
const REVISION: &'static str = include_str!(concat!(env!("OUT_DIR"), "/revision"));

lazy_static! {
    /// Application / package name, as filled out by Cargo.
    static ref NAME: &'static str = option_env!("CARGO_PKG_NAME").unwrap_or("meme-maker");

    /// Application version, as filled out by Cargo, with the Git revision.
    static ref VERSION: Option<String> = option_env!("CARGO_PKG_VERSION").map(|v| {
        match REVISION.trim() {
            "" => v.to_owned(),
            rev => format!("{} (rev. {})", v, rev),
        }
    });
}


fn main() {
    let opts = args::parse().unwrap_or_else(|e| {
        exit(print_args_error(e));
    });

    if let Err(e) = logging::init(opts.verbosity) {
        let _ = writeln!(&mut io::stderr(), "Failed to initialize logging: {}", e);
        exit(exitcode::SOFTWARE);
    }
    if cfg!(debug_assertions) {
        warn!("Debug mode! The program will likely be much slower.");
    }
    for (i, arg) in env::args().enumerate() {
        debug!("argv[{}] = {:?}", i, arg);
    }
    trace!("Options parsed from argv:\n{:#?}", opts);

    let engine = create_engine(&opts.font_directories).unwrap_or_else(|e| {
        error!("Failed to set up captioning: {}", e);
        exit(exitcode::CONFIG);
    });
    let code = match opts.command {
        Command::Caption(request) => caption(&engine, &request),
        Command::ListFonts(filter) => list_fonts(&engine, &filter),
    };
    exit(code);
}

/// Print an error that may occur while parsing arguments.
/// Returns the exit code the program should end with.
fn print_args_error(e: ArgsError) -> exitcode::ExitCode {
    let mut stderr = io::stderr();
    let (result, code) = match e {
        // --help and --version are reported as "errors" too.
        ArgsError::Parse(ref e) if e.kind == ClapErrorKind::HelpDisplayed
                                || e.kind == ClapErrorKind::VersionDisplayed =>
            (writeln!(&mut io::stdout(), "{}", e.message), exitcode::OK),
        // In case of generic parse error,
        // message provided by the clap library will be the usage string.
        ArgsError::Parse(ref e) => (writeln!(&mut stderr, "{}", e.message), exitcode::USAGE),
        e => (writeln!(&mut stderr, "Failed to parse arguments: {}", e), exitcode::USAGE),
    };
    if result.is_err() { exitcode::IOERR } else { code }
}


/// Create the captioning `Engine`, looking for fonts in given directories
/// and then the system ones.
fn create_engine(font_directories: &[PathBuf]) -> Result<Engine, EngineBuildError> {
    let directories: Vec<PathBuf> = font_directories.iter().cloned()
        .chain(system_font_directories())
        .collect();
    debug!("Font directories: {:?}", directories);
    let loader = FontLoader::with_directories(&directories)
        .unwrap_or_else(FontLoader::system);
    EngineBuilder::new().font_loader(loader).build()
}

/// Caption an image according to given request.
/// Returns the exit code the program should end with.
fn caption(engine: &Engine, request: &CaptionRequest) -> exitcode::ExitCode {
    match engine.add_caption(request) {
        Ok(path) => {
            info!("Captioned image written to {}", path.display());
            exitcode::OK
        }
        Err(e) => {
            error!("{}", e);
            match e {
                CaptionError::Image(..) => exitcode::NOINPUT,
                CaptionError::Font(..) => exitcode::UNAVAILABLE,
                CaptionError::Draw(..) => exitcode::SOFTWARE,
                CaptionError::Encode(..) | CaptionError::Write(..) => exitcode::CANTCREAT,
            }
        }
    }
}

/// Print names of the available fonts, one per line.
/// Returns the exit code the program should end with.
fn list_fonts(engine: &Engine, filter: &str) -> exitcode::ExitCode {
    let fonts = engine.font_loader().list(filter);
    debug!("Found {} font(s) matching {:?}", fonts.len(), filter);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for font in fonts {
        if let Err(e) = writeln!(out, "{}", font) {
            error!("Failed to print font names: {}", e);
            return exitcode::IOERR;
        }
    }
    exitcode::OK
}
