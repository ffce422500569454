//! Diagnostic records attached to the parser.
//!
//! The parser never prints; tolerated malformations and fatal failures are
//! recorded here and drained by the host through
//! [`crate::Parser::take_logs`].

/// Severity of a log record.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Level {
    Warning,
    Error,
}

/// Machine-readable code identifying what was observed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogCode {
    /// A header line with no colon and no leading whitespace was ignored.
    HeaderWithoutColon,
    /// A continuation line arrived before any header field.
    OrphanContinuation,
    /// A chunk-size line carried extensions; they were ignored.
    ChunkExtensionIgnored,
    /// A fatal parse failure; the parser is dead for this stream.
    ParseFailure,
}

/// One diagnostic record.
#[derive(Clone, Debug)]
pub struct Log {
    pub level: Level,
    pub code: LogCode,
    pub msg: String,
}

impl Log {
    pub(crate) fn new(level: Level, code: LogCode, msg: impl Into<String>) -> Self {
        Self {
            level,
            code,
            msg: msg.into(),
        }
    }
}

macro_rules! h1_warn {
    ($parser:expr, $code:expr, $msg:expr) => {
        $parser.log($crate::log::Level::Warning, $code, $msg)
    };
}

macro_rules! h1_error {
    ($parser:expr, $code:expr, $msg:expr) => {
        $parser.log($crate::log::Level::Error, $code, $msg)
    };
}

pub(crate) use h1_error;
pub(crate) use h1_warn;
