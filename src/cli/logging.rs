//! Module implementing logging for the application.
//!
//! This includes setting up log filtering given a verbosity value,
//! as well as defining how the logs are being formatted to stderr.

use std::env;
use std::io::{self, Write};

use ansi_term::{Colour, Style};
use isatty;
use log::SetLoggerError;
use slog::{self, Drain, FilterLevel, Level, OwnedKVList, Record};
use slog_envlogger::LogBuilder;
use slog_scope;
use slog_stdlog;


// Default logging level defined using the two enums used by slog.
// Both values must correspond to the same level. (This is checked by a test).
const DEFAULT_LEVEL: Level = Level::Info;
const DEFAULT_FILTER_LEVEL: FilterLevel = FilterLevel::Info;

// Arrays of log levels, indexed by verbosity.
const POSITIVE_VERBOSITY_LEVELS: &'static [FilterLevel] = &[
    DEFAULT_FILTER_LEVEL,
    FilterLevel::Debug,
    FilterLevel::Trace,
];
const NEGATIVE_VERBOSITY_LEVELS: &'static [FilterLevel] = &[
    DEFAULT_FILTER_LEVEL,
    FilterLevel::Warning,
    FilterLevel::Error,
    FilterLevel::Critical,
    FilterLevel::Off,
];

/// Environment variable which refines the log filtering, same as `RUST_LOG`.
const ENV_FILTERS: &'static str = "RUST_LOG";


/// Initialize logging with given verbosity.
/// The verbosity value has the same meaning as in args::Options::verbosity.
pub fn init(verbosity: isize) -> Result<(), SetLoggerError> {
    let istty = cfg!(unix) && isatty::stderr_isatty();
    let stderr = Stderr{colored: istty};

    // Set the logging level based on verbosity,
    // with the RUST_LOG variable getting the final say.
    let level = filter_level(verbosity);
    let mut builder = LogBuilder::new(stderr).filter(None, level);
    if let Ok(filters) = env::var(ENV_FILTERS) {
        builder = builder.parse(&filters);
    }
    let drain = builder.build().fuse();

    let logger = slog::Logger::root(drain, o!());
    slog_scope::set_global_logger(logger).cancel_reset();
    slog_stdlog::init()?;

    if verbosity >= POSITIVE_VERBOSITY_LEVELS.len() as isize {
        trace!("Excessive verbosity value; ignoring");
    }
    Ok(())
}

/// Log filtering level for given verbosity value.
fn filter_level(verbosity: isize) -> FilterLevel {
    let (levels, index) = if verbosity >= 0 {
        (POSITIVE_VERBOSITY_LEVELS, verbosity as usize)
    } else {
        (NEGATIVE_VERBOSITY_LEVELS, (-verbosity) as usize)
    };
    levels[index.min(levels.len() - 1)]
}


/// Drain writing formatted log records to standard error.
struct Stderr {
    /// Whether to use ANSI colors for log levels.
    colored: bool,
}

impl Drain for Stderr {
    type Ok = ();
    type Err = io::Error;

    fn log(&self, record: &Record, _: &OwnedKVList) -> io::Result<()> {
        let level = format_level(record.level(), self.colored);
        let module = record.module();
        let msg = format!("{}", record.msg());

        let line = if self.colored {
            format!("{} {} {}", level, Style::new().dimmed().paint(module), msg)
        } else {
            format!("{} {} {}", level, module, msg)
        };

        let stderr = io::stderr();
        let mut handle = stderr.lock();
        writeln!(handle, "{}", line)
    }
}

/// Format the logging level as a fixed-width, possibly colored string.
fn format_level(level: Level, colored: bool) -> String {
    let text = format!("[{:>5}]", level.as_short_str());
    if !colored {
        return text;
    }
    let style = match level {
        Level::Critical => Colour::Purple.bold(),
        Level::Error => Colour::Red.bold(),
        Level::Warning => Colour::Yellow.bold(),
        Level::Info => Colour::Green.normal(),
        Level::Debug => Colour::Cyan.normal(),
        Level::Trace => Style::new().dimmed(),
    };
    style.paint(text).to_string()
}


#[cfg(test)]
mod tests {
    use slog::FilterLevel;
    use super::{DEFAULT_FILTER_LEVEL, DEFAULT_LEVEL, filter_level, format_level};

    #[test]
    fn default_level() {
        let level = DEFAULT_LEVEL.as_usize();
        let filter_level = DEFAULT_FILTER_LEVEL.as_usize();
        assert_eq!(level, filter_level,
            "Default logging level is defined inconsistently: Level::{:?} vs. FilterLevel::{:?}",
            DEFAULT_LEVEL, DEFAULT_FILTER_LEVEL);
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(FilterLevel::Info, filter_level(0));
        assert_eq!(FilterLevel::Debug, filter_level(1));
        assert_eq!(FilterLevel::Trace, filter_level(2));
        assert_eq!(FilterLevel::Trace, filter_level(10));
        assert_eq!(FilterLevel::Warning, filter_level(-1));
        assert_eq!(FilterLevel::Off, filter_level(-4));
        assert_eq!(FilterLevel::Off, filter_level(-10));
    }

    #[test]
    fn plain_level_format() {
        assert_eq!("[ INFO]", format_level(::slog::Level::Info, false));
        assert_eq!("[ ERRO]", format_level(::slog::Level::Error, false));
    }
}
