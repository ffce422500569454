use crate::message::Message;
use bstr::{BStr, BString};

/// What the parser should do with the body once headers are delivered.
///
/// Returned by [`Handler::on_headers_complete`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    /// Frame and deliver the body normally.
    Normal,
    /// Skip the body; the current `execute` call stops early only when
    /// the message is an upgrade.
    SkipBody,
    /// Skip the body and immediately begin the next message, even when
    /// this one signalled an upgrade. For HEAD-style exchanges where the
    /// host knows no body follows.
    SkipBodyEager,
}

impl Default for Directive {
    fn default() -> Self {
        Directive::Normal
    }
}

/// The callback surface a host implements.
///
/// Callbacks for one message always arrive in the order
/// `on_headers_complete`, zero or more `on_body`, optionally `on_headers`
/// with the trailers, then `on_message_complete`; pipelined messages
/// repeat the sequence without interleaving. All borrowed data is only
/// valid for the duration of the call.
pub trait Handler {
    /// Trailer block of a chunked message. `url` is always empty here.
    fn on_headers(&mut self, _headers: &[BString], _url: &BStr) {}

    /// The header block is complete. The returned directive steers body
    /// handling; the default parses the body normally.
    fn on_headers_complete(&mut self, _message: &Message) -> Directive {
        Directive::Normal
    }

    /// A run of body bytes: a view into the chunk passed to `execute`.
    /// Copy the bytes to retain them past the call.
    fn on_body(&mut self, _chunk: &[u8], _start: usize, _len: usize) {}

    /// The current message is finished and the parser has reset for the
    /// next one.
    fn on_message_complete(&mut self) {}

    /// Reserved for host instrumentation; never invoked by the parser.
    fn on_execute(&mut self) {}
}
