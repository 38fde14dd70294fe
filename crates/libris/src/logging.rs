//! Diagnostics for the `libris` binary.
//!
//! Store failures and skipped documents are reported as tracing events on
//! stderr; stdout carries only command output.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How much the binary reports about catalog and store activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only, e.g. failed writes.
    Quiet,
    /// Mutations and skipped documents.
    #[default]
    Normal,
    /// Store calls and re-fetches.
    Verbose,
    /// Everything.
    Trace,
}

impl Verbosity {
    /// Map the `-q` flag and the `-v` count; `-q` wins.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Trace,
        }
    }

    /// Most detailed level shown.
    #[must_use]
    pub fn level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Filter used when `RUST_LOG` is unset. Dependencies stay at `warn`.
    #[must_use]
    pub fn directive(self) -> String {
        format!("warn,libris={}", self.level())
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides `verbosity`.
///
/// ```no_run
/// use libris::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::from_flags(false, 1));
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
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
        assert_eq!(Verbosity::from_flags(false, 5), Verbosity::Trace);
        assert_eq!(Verbosity::from_flags(true, 2), Verbosity::Quiet);
    }

    #[test]
    fn test_directive_scopes_level_to_libris() {
        assert_eq!(Verbosity::Quiet.directive(), "warn,libris=ERROR");
        assert_eq!(Verbosity::default().directive(), "warn,libris=INFO");
        assert_eq!(Verbosity::Trace.directive(), "warn,libris=TRACE");
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging(Verbosity::Verbose);
        init_logging(Verbosity::Quiet);
        init_test_logging();
    }
}
