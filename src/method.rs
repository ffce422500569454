//! The canonical HTTP method table.
//!
//! The callback surface identifies a request method by its index into
//! [`METHODS`]; the order is part of the external interface and never
//! changes.

use lazy_static::lazy_static;
use std::collections::HashMap;

/// Canonical method tokens in wire-table order.
pub const METHODS: [&str; 33] = [
    "DELETE",
    "GET",
    "HEAD",
    "POST",
    "PUT",
    "CONNECT",
    "OPTIONS",
    "TRACE",
    "COPY",
    "LOCK",
    "MKCOL",
    "MOVE",
    "PROPFIND",
    "PROPPATCH",
    "SEARCH",
    "UNLOCK",
    "BIND",
    "REBIND",
    "UNBIND",
    "ACL",
    "REPORT",
    "MKACTIVITY",
    "CHECKOUT",
    "MERGE",
    "M-SEARCH",
    "NOTIFY",
    "SUBSCRIBE",
    "UNSUBSCRIBE",
    "PATCH",
    "PURGE",
    "MKCALENDAR",
    "LINK",
    "UNLINK",
];

/// Index of `CONNECT` in [`METHODS`].
pub const CONNECT: usize = 5;

lazy_static! {
    static ref INDEX: HashMap<&'static [u8], usize> = METHODS
        .iter()
        .enumerate()
        .map(|(index, token)| (token.as_bytes(), index))
        .collect();
}

/// Looks a token up against the canonical spellings, case sensitively.
pub fn index_of(token: &[u8]) -> Option<usize> {
    INDEX.get(token).copied()
}

/// The canonical spelling for a method index.
pub fn name(index: usize) -> Option<&'static str> {
    METHODS.get(index).copied()
}
