//! Error type shared by the markup layer and the table pipeline.
//!
//! - `WtError` - main error enum with variants for parse failures, missing
//!    page data, I/O problems while reading the page cache and anything else.
//! - `Result<T>` - convenient alias `std::result::Result<T, WtError>`.
//!
//! Conversion helpers for common error types are provided so `?` can be used
//! when reading pages from disk or writing debug dumps.

use std::error::Error;
use std::fmt;

/// The canonical result type used across the crate.
pub type Result<T> = std::result::Result<T, WtError>;

/// Markup / pipeline error.
///
/// - `ParseError` - malformed markup inside a single value (e.g. an element
///    group with an unclosed `[[`). Carries the byte offset.
/// - `NotFound` - a page lacks something required (title, stat template).
/// - `Io` - reading the page cache or writing a dump failed.
/// - `Other` - catch-all carrying a message and optional boxed cause.
#[derive(Debug)]
pub enum WtError {
    ParseError {
        msg: String,
        /// Byte offset in the value where the problem was detected.
        offset: usize,
    },
    NotFound {
        msg: String,
    },
    Io {
        msg: String,
        source: Option<Box<dyn Error + Send + Sync + 'static>>,
    },
    Other {
        msg: String,
        source: Option<Box<dyn Error + Send + Sync + 'static>>,
    },
}

impl WtError {
    /// Construct a parse error with a message and offset.
    pub fn parse_at<S: Into<String>>(msg: S, offset: usize) -> Self {
        WtError::ParseError {
            msg: msg.into(),
            offset,
        }
    }

    /// Construct a not-found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        WtError::NotFound { msg: msg.into() }
    }

    /// Wrap a std::io::Error or other error as an Io variant.
    pub fn io_err<E: Error + Send + Sync + 'static>(msg: impl Into<String>, e: E) -> Self {
        WtError::Io {
            msg: msg.into(),
            source: Some(Box::new(e)),
        }
    }

    /// Generic helper to produce Other(...) with an optional source.
    pub fn other_with_source<E: Error + Send + Sync + 'static>(
        msg: impl Into<String>,
        source: Option<E>,
    ) -> Self {
        WtError::Other {
            msg: msg.into(),
            source: source.map(|e| Box::new(e) as Box<dyn Error + Send + Sync>),
        }
    }

    /// Short name of the error kind, used in run summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            WtError::ParseError { .. } => "ParseError",
            WtError::NotFound { .. } => "NotFound",
            WtError::Io { .. } => "Io",
            WtError::Other { .. } => "Other",
        }
    }
}

impl fmt::Display for WtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WtError::ParseError { msg, offset } => {
                write!(f, "Parse error at {}: {}", offset, msg)
            }
            WtError::NotFound { msg } => write!(f, "Not found: {}", msg),
            WtError::Io { msg, source } => {
                if let Some(s) = source {
                    write!(f, "IO error: {} (cause: {})", msg, s)
                } else {
                    write!(f, "IO error: {}", msg)
                }
            }
            WtError::Other { msg, source } => {
                if let Some(s) = source {
                    write!(f, "{} (cause: {})", msg, s)
                } else {
                    write!(f, "{}", msg)
                }
            }
        }
    }
}

impl Error for WtError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WtError::Io { source, .. } | WtError::Other { source, .. } => {
                source.as_ref().map(|b| b.as_ref() as &dyn Error)
            }
            _ => None,
        }
    }
}

impl From<std::io::Error> for WtError {
    fn from(e: std::io::Error) -> Self {
        WtError::io_err("I/O error", e)
    }
}

impl From<serde_json::Error> for WtError {
    fn from(e: serde_json::Error) -> Self {
        WtError::other_with_source("json serialisation error", Some(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_parse_error_with_offset() {
        let e = WtError::parse_at("unclosed '[['", 12);
        let s = format!("{}", e);
        assert!(s.contains("12"));
        assert!(s.contains("unclosed"));
        assert_eq!(e.kind(), "ParseError");
    }

    #[test]
    fn display_not_found() {
        let e = WtError::not_found("page has no <title>");
        assert_eq!(format!("{}", e), "Not found: page has no <title>");
    }

    #[test]
    fn io_conversion_has_source() {
        let io_err = std::io::Error::other("disk on fire");
        let e: WtError = io_err.into();
        let s = format!("{}", e);
        assert!(s.contains("I/O error"));
        assert!(s.contains("disk on fire"));
        assert!(e.source().is_some());
    }
}
