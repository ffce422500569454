//! Incremental HTTP/1.x message parsing library.
//!
//! `h1parse` is a push parser: the host feeds arbitrary byte chunks from
//! a connection and implements [`Handler`] to receive message structure
//! as it is recognised. Messages may be split at any byte boundary,
//! bodies may be length-delimited, chunked (with trailers), or
//! close-delimited, and pipelined messages on one connection are parsed
//! back to back.
//!
//! The parser performs no I/O, never suspends, and holds no references
//! to the input outside a single [`Parser::execute`] call; `on_body`
//! hands out views into the caller's chunk, so a handler must copy
//! anything it wants to keep.
//!
//! ```
//! use h1parse::{Handler, Parser, Side};
//!
//! #[derive(Default)]
//! struct Count {
//!     complete: usize,
//! }
//!
//! impl Handler for Count {
//!     fn on_message_complete(&mut self) {
//!         self.complete += 1;
//!     }
//! }
//!
//! let mut parser = Parser::new(Side::Request, Count::default());
//! let consumed = parser.execute(b"GET / HTTP/1.1\r\nHost: example\r\n\r\n").unwrap();
//! assert_eq!(consumed, 33);
//! assert_eq!(parser.handler().complete, 1);
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod log;
pub mod message;
pub mod method;
mod parser;
mod parsers;
mod util;

pub use crate::config::Config;
pub use crate::error::{ParseError, Result};
pub use crate::handler::{Directive, Handler};
pub use crate::message::Message;
pub use crate::parser::{Parser, Side, State};
