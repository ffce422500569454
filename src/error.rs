use std::fmt;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Fatal parse failures, one variant per stable wire-level error code.
///
/// After any of these is returned from [`crate::Parser::execute`] or
/// [`crate::Parser::finish`], the parser is dead until re-initialised; the
/// host is expected to tear down the connection.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Malformed request or status line.
    InvalidConstant,
    /// Request method is not in the canonical method table.
    InvalidMethod,
    /// Stray CR inside a header line.
    LfExpected,
    /// Conflicting duplicate `Content-Length`, or a value that cannot
    /// frame a body.
    UnexpectedContentLength,
    /// Chunk-size line does not start with a hexadecimal number.
    InvalidChunkSize,
    /// Chunk payload ran past its declared length.
    Strict,
    /// Cumulative header bytes exceeded the configured cap.
    HeaderOverflow,
    /// End of stream signalled in the middle of a message.
    InvalidEofState,
}

impl ParseError {
    /// The stable error code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::InvalidConstant => "HPE_INVALID_CONSTANT",
            ParseError::InvalidMethod => "HPE_INVALID_METHOD",
            ParseError::LfExpected => "HPE_LF_EXPECTED",
            ParseError::UnexpectedContentLength => "HPE_UNEXPECTED_CONTENT_LENGTH",
            ParseError::InvalidChunkSize => "HPE_INVALID_CHUNK_SIZE",
            ParseError::Strict => "HPE_STRICT",
            ParseError::HeaderOverflow => "HPE_HEADER_OVERFLOW",
            ParseError::InvalidEofState => "HPE_INVALID_EOF_STATE",
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::error::Error for ParseError {}
