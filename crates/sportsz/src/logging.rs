//! Diagnostics for sportsz.
//!
//! The library reports store faults, seeding and celebrations through
//! `tracing`. The binary decides how loud that is: `-q` keeps only errors, the
//! default shows warnings such as a corrupt collection falling back to empty,
//! and `-v`/`-vv` open up the per-write debug and trace events.
//!
//! Events are written to stderr. Stdout carries command output (CSV exports,
//! `--json` listings) and must stay parseable.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Crate target that the default directive applies to.
const TARGET: &str = "sportsz";

/// How much diagnostic output the binary shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Warnings, including collections that failed to load.
    #[default]
    Normal,
    /// Every write and listener notification.
    Verbose,
    /// Everything, down to individual reads.
    Trace,
}

impl Verbosity {
    /// Map the `-q` flag and the number of `-v` flags to a verbosity.
    ///
    /// `-q` wins over any number of `-v`.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Trace,
        }
    }

    /// Most detailed level shown at this verbosity.
    #[must_use]
    pub fn level(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::ERROR,
            Self::Normal => LevelFilter::WARN,
            Self::Verbose => LevelFilter::DEBUG,
            Self::Trace => LevelFilter::TRACE,
        }
    }
}

/// Filter directive used when `RUST_LOG` is unset, e.g. `sportsz=warn`.
///
/// Only this crate's events are enabled, so `rusqlite` and `tokio` stay
/// silent unless `RUST_LOG` asks for them.
#[must_use]
pub fn default_directive(verbosity: Verbosity) -> String {
    let level = verbosity.level().to_string().to_lowercase();
    format!("{TARGET}={level}")
}

/// Install the stderr subscriber.
///
/// A `RUST_LOG` that parses replaces the verbosity-derived directive
/// entirely. Calling this more than once is harmless; later calls are
/// ignored.
///
/// # Examples
///
/// ```no_run
/// use sportsz::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::from_flags(false, 1));
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let output = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .without_time()
        .with_file(false)
        .with_line_number(false);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .try_init();
}

/// Route this crate's warnings into the test harness output.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(default_directive(Verbosity::Normal))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(Verbosity::from_flags(false, 0), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(false, 1), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, 2), Verbosity::Trace);
        assert_eq!(Verbosity::from_flags(false, 9), Verbosity::Trace);
        assert_eq!(Verbosity::from_flags(true, 2), Verbosity::Quiet);
    }

    #[test]
    fn test_normal_shows_store_warnings() {
        assert_eq!(Verbosity::default().level(), LevelFilter::WARN);
        assert!(Verbosity::Quiet.level() < LevelFilter::WARN);
    }

    #[test]
    fn test_default_directive_is_scoped_to_crate() {
        assert_eq!(default_directive(Verbosity::Quiet), "sportsz=error");
        assert_eq!(default_directive(Verbosity::Normal), "sportsz=warn");
        assert_eq!(default_directive(Verbosity::Verbose), "sportsz=debug");
        assert_eq!(default_directive(Verbosity::Trace), "sportsz=trace");
    }

    #[test]
    fn test_default_directives_parse() {
        for verbosity in [
            Verbosity::Quiet,
            Verbosity::Normal,
            Verbosity::Verbose,
            Verbosity::Trace,
        ] {
            assert!(EnvFilter::try_new(default_directive(verbosity)).is_ok());
        }
    }

    #[test]
    fn test_repeated_init_is_ignored() {
        init_logging(Verbosity::Normal);
        init_logging(Verbosity::Trace);
        init_test_logging();
    }
}
