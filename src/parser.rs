//! The incremental parser: a resumable state machine over caller-owned
//! byte chunks.

use crate::{
    config::Config,
    error::{ParseError, Result},
    handler::{Directive, Handler},
    log::{h1_error, h1_warn, Level, Log, LogCode},
    message::Message,
    method, parsers,
};
use bstr::{BStr, BString, ByteSlice};

/// Which side of the exchange the input bytes come from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Request,
    Response,
}

/// Resumable parse states.
///
/// Line-oriented states accumulate into the carry buffer whenever a line
/// spans chunk boundaries; the byte-counted body states consume straight
/// from the input window.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    RequestLine,
    ResponseLine,
    Header,
    BodyChunkHead,
    BodyChunk,
    BodyChunkEnd,
    BodyChunkTrailers,
    BodySized,
    BodyRaw,
}

/// Handler outcome: keep dispatching, wait for more input, or hand the
/// stream back to the caller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    More,
    Stop,
}

/// Read window over the chunk passed to one `execute` call.
struct Window<'a> {
    chunk: &'a [u8],
    offset: usize,
}

impl<'a> Window<'a> {
    fn new(chunk: &'a [u8]) -> Self {
        Self { chunk, offset: 0 }
    }

    fn rest(&self) -> &'a [u8] {
        &self.chunk[self.offset..]
    }
}

/// An incremental HTTP/1.x message parser.
///
/// The host feeds byte chunks through [`execute`](Self::execute) and
/// receives message structure through the injected [`Handler`]. The
/// parser owns no I/O and borrows each chunk only for the duration of
/// the call.
pub struct Parser<H> {
    handler: H,
    cfg: Config,
    side: Side,
    state: State,
    /// Bytes of a partially received line, carried between calls.
    line_carry: BString,
    /// Bytes charged against the header cap for the current message.
    header_bytes: usize,
    message: Message,
    is_chunked: bool,
    /// `None` means close-delimited; `Some(0)` means no body.
    body_remaining: Option<u64>,
    error: Option<ParseError>,
    logs: Vec<Log>,
}

impl<H: Handler> Parser<H> {
    pub fn new(side: Side, handler: H) -> Self {
        Self::with_config(side, handler, Config::default())
    }

    pub fn with_config(side: Side, handler: H, cfg: Config) -> Self {
        let mut parser = Self {
            handler,
            cfg,
            side,
            state: State::RequestLine,
            line_carry: BString::from(""),
            header_bytes: 0,
            message: Message::default(),
            is_chunked: false,
            body_remaining: None,
            error: None,
            logs: Vec::new(),
        };
        parser.initialize(side);
        parser
    }

    /// Resets all per-message state, making the parser reusable for a new
    /// stream. Accumulated logs survive until drained.
    pub fn initialize(&mut self, side: Side) {
        self.side = side;
        self.state = match side {
            Side::Request => State::RequestLine,
            Side::Response => State::ResponseLine,
        };
        self.message = Message::default();
        self.line_carry.clear();
        self.header_bytes = 0;
        self.is_chunked = false;
        self.body_remaining = None;
        self.error = None;
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Drains the diagnostic records accumulated so far.
    pub fn take_logs(&mut self) -> Vec<Log> {
        std::mem::take(&mut self.logs)
    }

    /// Runs the chunk through the state machine and returns the number of
    /// bytes consumed.
    ///
    /// A short count means the message was an upgrade and the caller must
    /// take over the remaining bytes. After an error the parser keeps
    /// returning that error until re-initialised.
    pub fn execute(&mut self, chunk: &[u8]) -> Result<usize> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let mut win = Window::new(chunk);
        while win.offset < win.chunk.len() {
            match self.dispatch(&mut win) {
                Ok(Flow::Continue) => {}
                Ok(Flow::More) | Ok(Flow::Stop) => break,
                Err(err) => return Err(self.fatal(err)),
            }
        }
        if self.in_header_state() {
            self.header_bytes += win.offset;
            if self.header_bytes > self.cfg.max_header_size {
                return Err(self.fatal(ParseError::HeaderOverflow));
            }
        }
        Ok(win.offset)
    }

    /// Signals end of stream. Legal only between messages or while
    /// reading a close-delimited body, which it completes.
    pub fn finish(&mut self) -> Result<()> {
        if self.error.is_some() {
            return Ok(());
        }
        match self.state {
            State::RequestLine | State::ResponseLine => Ok(()),
            State::BodyRaw => {
                self.next_message();
                Ok(())
            }
            _ => Err(self.fatal(ParseError::InvalidEofState)),
        }
    }

    fn dispatch(&mut self, win: &mut Window) -> Result<Flow> {
        match self.state {
            State::RequestLine => self.request_line(win),
            State::ResponseLine => self.response_line(win),
            State::Header => self.header(win),
            State::BodyChunkHead => self.body_chunk_head(win),
            State::BodyChunk => self.body_chunk(win),
            State::BodyChunkEnd => self.body_chunk_end(win),
            State::BodyChunkTrailers => self.body_chunk_trailers(win),
            State::BodySized => self.body_sized(win),
            State::BodyRaw => self.body_raw(win),
        }
    }

    /// States whose consumption is charged against the header cap.
    fn in_header_state(&self) -> bool {
        matches!(
            self.state,
            State::RequestLine | State::ResponseLine | State::Header
        )
    }

    fn fatal(&mut self, err: ParseError) -> ParseError {
        h1_error!(self, LogCode::ParseFailure, err.code());
        self.error = Some(err);
        err
    }

    pub(crate) fn log(&mut self, level: Level, code: LogCode, msg: impl Into<String>) {
        self.logs.push(Log::new(level, code, msg));
    }

    /// Returns the next CRLF- or LF-terminated line with the terminator
    /// stripped, joining bytes carried over from earlier chunks. `None`
    /// until the terminator arrives.
    fn consume_line(&mut self, win: &mut Window) -> Option<BString> {
        match parsers::take_till_lf(win.rest()) {
            Ok((_, with_lf)) => {
                let mut line = std::mem::take(&mut self.line_carry);
                line.extend_from_slice(&with_lf[..with_lf.len() - 1]);
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                win.offset += with_lf.len();
                Some(line)
            }
            Err(_) => {
                self.line_carry.extend_from_slice(win.rest());
                win.offset = win.chunk.len();
                None
            }
        }
    }

    /// Tolerates blank lines, then parses the request line and moves to
    /// the header block.
    fn request_line(&mut self, win: &mut Window) -> Result<Flow> {
        let line = match self.consume_line(win) {
            Some(line) => line,
            None => return Ok(Flow::More),
        };
        if line.is_empty() {
            // Blank lines before the request line are tolerated.
            return Ok(Flow::Continue);
        }
        let (_, (token, target, major, minor)) =
            parsers::request_line(&line).map_err(|_| ParseError::InvalidConstant)?;
        let index = method::index_of(token).ok_or(ParseError::InvalidMethod)?;
        self.message.method = Some(index);
        self.message.url = BString::from(target);
        self.message.version_major = major;
        self.message.version_minor = minor;
        self.body_remaining = Some(0);
        self.state = State::Header;
        Ok(Flow::Continue)
    }

    fn response_line(&mut self, win: &mut Window) -> Result<Flow> {
        let line = match self.consume_line(win) {
            Some(line) => line,
            None => return Ok(Flow::More),
        };
        let (_, (major, minor, code, reason)) =
            parsers::status_line(&line).map_err(|_| ParseError::InvalidConstant)?;
        self.message.version_major = major;
        self.message.version_minor = minor;
        self.message.status_code = code;
        self.message.status_reason = BString::from(reason);
        if code / 100 == 1 || code == 204 || code == 304 {
            // These statuses never carry a body.
            self.body_remaining = Some(0);
        }
        self.state = State::Header;
        Ok(Flow::Continue)
    }

    fn header(&mut self, win: &mut Window) -> Result<Flow> {
        let line = match self.consume_line(win) {
            Some(line) => line,
            None => return Ok(Flow::More),
        };
        if !line.is_empty() {
            self.parse_header_line(&line, false)?;
            return Ok(Flow::Continue);
        }
        self.headers_complete()
    }

    /// Appends one header line to the message's header or trailer block,
    /// handling continuations and tolerated malformations.
    fn parse_header_line(&mut self, line: &[u8], trailer: bool) -> Result<()> {
        if line.contains(&b'\r') {
            return Err(ParseError::LfExpected);
        }
        if let Ok((_, (name, value))) = parsers::header_field(line) {
            let dest = if trailer {
                &mut self.message.trailers
            } else {
                &mut self.message.headers
            };
            dest.push(BString::from(name));
            dest.push(BString::from(value));
            return Ok(());
        }
        if let Ok((_, fragment)) = parsers::header_continuation(line) {
            if fragment.is_empty() {
                return Ok(());
            }
            let appended = {
                let dest = if trailer {
                    &mut self.message.trailers
                } else {
                    &mut self.message.headers
                };
                match dest.last_mut() {
                    Some(prev) => {
                        if !prev.is_empty() {
                            prev.push(b' ');
                        }
                        prev.extend_from_slice(fragment);
                        true
                    }
                    None => false,
                }
            };
            if !appended {
                h1_warn!(
                    self,
                    LogCode::OrphanContinuation,
                    "continuation line before any header field"
                );
            }
            return Ok(());
        }
        h1_warn!(
            self,
            LogCode::HeaderWithoutColon,
            "ignoring header line with no colon"
        );
        Ok(())
    }

    /// End of the header block: resolve framing, deliver the metadata,
    /// and pick the body state from the handler's directive.
    fn headers_complete(&mut self) -> Result<Flow> {
        self.resolve_framing()?;
        let directive = self.handler.on_headers_complete(&self.message);
        if directive == Directive::SkipBodyEager {
            self.next_message();
            return Ok(Flow::Continue);
        }
        if self.is_chunked && directive == Directive::Normal {
            self.state = State::BodyChunkHead;
            return Ok(Flow::Continue);
        }
        if directive == Directive::SkipBody || self.body_remaining == Some(0) {
            let upgrade = self.message.upgrade;
            self.next_message();
            return Ok(if upgrade { Flow::Stop } else { Flow::Continue });
        }
        match self.body_remaining {
            None => self.state = State::BodyRaw,
            Some(_) => self.state = State::BodySized,
        }
        Ok(Flow::Continue)
    }

    /// Scans the collected headers for the fields that determine framing,
    /// connection reuse, and upgrade.
    fn resolve_framing(&mut self) -> Result<()> {
        let mut has_content_length = false;
        let mut has_upgrade_header = false;
        for pair in self.message.headers.chunks_exact(2) {
            let name = &pair[0];
            let value = &pair[1];
            if name.eq_ignore_ascii_case(b"transfer-encoding") {
                self.is_chunked = value.eq_ignore_ascii_case(b"chunked");
            } else if name.eq_ignore_ascii_case(b"content-length") {
                let parsed = parsers::content_length(value)
                    .ok_or(ParseError::UnexpectedContentLength)?;
                if has_content_length {
                    if self.body_remaining != Some(parsed) {
                        return Err(ParseError::UnexpectedContentLength);
                    }
                } else {
                    has_content_length = true;
                    self.body_remaining = Some(parsed);
                }
            } else if name.eq_ignore_ascii_case(b"connection") {
                let lowered = value.to_ascii_lowercase();
                self.message.connection.extend_from_slice(&lowered);
            } else if name.eq_ignore_ascii_case(b"upgrade") {
                has_upgrade_header = true;
            }
        }
        if self.is_chunked && has_content_length {
            // Chunked framing wins over a conflicting Content-Length.
            self.body_remaining = None;
        }
        if has_upgrade_header && self.message.connection.contains_str("upgrade") {
            self.message.upgrade =
                self.side == Side::Request || self.message.status_code == 101;
        } else {
            self.message.upgrade = self.message.method == Some(method::CONNECT);
        }
        if self.message.upgrade && self.is_chunked {
            // An upgraded stream is not chunked.
            self.is_chunked = false;
        }
        self.message.should_keep_alive = self.should_keep_alive();
        Ok(())
    }

    /// Connection-reuse decision, fixed once per message at the end of
    /// the header block.
    fn should_keep_alive(&self) -> bool {
        let message = &self.message;
        if message.version_major > 0 && message.version_minor > 0 {
            if message.connection.contains_str("close") {
                return false;
            }
        } else if !message.connection.contains_str("keep-alive") {
            return false;
        }
        // Reuse needs determinate framing.
        self.body_remaining.is_some() || self.is_chunked
    }

    /// Chunk-size line; extensions after the hex digits are ignored.
    fn body_chunk_head(&mut self, win: &mut Window) -> Result<Flow> {
        let line = match self.consume_line(win) {
            Some(line) => line,
            None => return Ok(Flow::More),
        };
        let (extensions, size) =
            parsers::chunk_size(&line).map_err(|_| ParseError::InvalidChunkSize)?;
        if !extensions.is_empty() {
            h1_warn!(
                self,
                LogCode::ChunkExtensionIgnored,
                "ignoring bytes after chunk size"
            );
        }
        if size == 0 {
            self.state = State::BodyChunkTrailers;
        } else {
            self.body_remaining = Some(size);
            self.state = State::BodyChunk;
        }
        Ok(Flow::Continue)
    }

    /// Streams chunk payload to the handler until the declared size is
    /// exhausted.
    fn body_chunk(&mut self, win: &mut Window) -> Result<Flow> {
        let remaining = self.take_body_bytes(win);
        if remaining == 0 {
            self.state = State::BodyChunkEnd;
        }
        Ok(Flow::Continue)
    }

    /// The empty line that closes a chunk's payload; anything else means
    /// the payload overran its declared size.
    fn body_chunk_end(&mut self, win: &mut Window) -> Result<Flow> {
        let line = match self.consume_line(win) {
            Some(line) => line,
            None => return Ok(Flow::More),
        };
        if !line.is_empty() {
            return Err(ParseError::Strict);
        }
        self.state = State::BodyChunkHead;
        Ok(Flow::Continue)
    }

    fn body_chunk_trailers(&mut self, win: &mut Window) -> Result<Flow> {
        let line = match self.consume_line(win) {
            Some(line) => line,
            None => return Ok(Flow::More),
        };
        if !line.is_empty() {
            self.parse_header_line(&line, true)?;
            return Ok(Flow::Continue);
        }
        if !self.message.trailers.is_empty() {
            self.handler
                .on_headers(&self.message.trailers, BStr::new(""));
        }
        self.next_message();
        Ok(Flow::Continue)
    }

    /// Length-delimited body; completes the message when the count runs
    /// out.
    fn body_sized(&mut self, win: &mut Window) -> Result<Flow> {
        let remaining = self.take_body_bytes(win);
        if remaining == 0 {
            self.next_message();
        }
        Ok(Flow::Continue)
    }

    /// Close-delimited body: everything until end of stream is payload.
    fn body_raw(&mut self, win: &mut Window) -> Result<Flow> {
        let len = win.chunk.len() - win.offset;
        self.handler.on_body(win.chunk, win.offset, len);
        win.offset = win.chunk.len();
        Ok(Flow::Continue)
    }

    /// Hands `min(available, body_remaining)` bytes to the handler and
    /// returns the count still owed.
    fn take_body_bytes(&mut self, win: &mut Window) -> u64 {
        let owed = self.body_remaining.unwrap_or(0);
        let available = (win.chunk.len() - win.offset) as u64;
        let len = std::cmp::min(available, owed) as usize;
        self.handler.on_body(win.chunk, win.offset, len);
        win.offset += len;
        let owed = owed - len as u64;
        self.body_remaining = Some(owed);
        owed
    }

    /// Completes the current message and resets for the next one on the
    /// same connection.
    fn next_message(&mut self) {
        self.handler.on_message_complete();
        let side = self.side;
        self.initialize(side);
    }
}
