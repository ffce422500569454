use crate::method;
use bstr::BString;

/// The in-progress message descriptor, reset at every message boundary.
///
/// A borrowed view of this is handed to
/// [`Handler::on_headers_complete`](crate::Handler::on_headers_complete)
/// once the header block is done; until then the fields fill in as lines
/// are recognised.
#[derive(Clone, Debug, Default)]
pub struct Message {
    /// Index into [`method::METHODS`]; requests only.
    pub method: Option<usize>,
    /// Raw request-target bytes as received; requests only.
    pub url: BString,
    /// Status code; responses only.
    pub status_code: u16,
    /// Reason-phrase bytes; responses only.
    pub status_reason: BString,
    pub version_major: u8,
    pub version_minor: u8,
    /// Flat name/value sequence preserving wire order; always even length.
    pub headers: Vec<BString>,
    /// Chunked trailer fields, same shape as `headers`.
    pub trailers: Vec<BString>,
    /// The message signals a protocol upgrade.
    pub upgrade: bool,
    /// Lowercased concatenation of every `Connection` value seen, used
    /// for token membership tests.
    pub connection: BString,
    /// Derived once the header block is complete.
    pub should_keep_alive: bool,
}

impl Message {
    /// Canonical spelling of the request method, if one was recognised.
    pub fn method_name(&self) -> Option<&'static str> {
        self.method.and_then(method::name)
    }
}
