#![allow(dead_code)]

use bstr::{BStr, BString};
use h1parse::{Directive, Handler, Message, Parser, Side};

/// Everything a parser reported, in arrival order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    HeadersComplete {
        method: Option<usize>,
        url: BString,
        status_code: u16,
        version: (u8, u8),
        headers: Vec<BString>,
        upgrade: bool,
        should_keep_alive: bool,
    },
    Body(BString),
    Trailers(Vec<BString>),
    MessageComplete,
}

/// Handler that records every callback for later assertions.
#[derive(Debug, Default)]
pub struct Record {
    pub events: Vec<Event>,
    pub directive: Option<Directive>,
}

impl Record {
    pub fn with_directive(directive: Directive) -> Self {
        Self {
            events: Vec::new(),
            directive: Some(directive),
        }
    }

    pub fn bodies(&self) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|event| matches!(event, Event::Body(_)))
            .collect()
    }

    pub fn body_bytes(&self) -> BString {
        let mut out = BString::from("");
        for event in &self.events {
            if let Event::Body(data) = event {
                out.extend_from_slice(data);
            }
        }
        out
    }

    pub fn message_completes(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, Event::MessageComplete))
            .count()
    }
}

impl Handler for Record {
    fn on_headers(&mut self, headers: &[BString], _url: &BStr) {
        self.events.push(Event::Trailers(headers.to_vec()));
    }

    fn on_headers_complete(&mut self, message: &Message) -> Directive {
        assert_eq!(message.headers.len() % 2, 0, "flat header list must pair up");
        self.events.push(Event::HeadersComplete {
            method: message.method,
            url: message.url.clone(),
            status_code: message.status_code,
            version: (message.version_major, message.version_minor),
            headers: message.headers.clone(),
            upgrade: message.upgrade,
            should_keep_alive: message.should_keep_alive,
        });
        self.directive.unwrap_or(Directive::Normal)
    }

    fn on_body(&mut self, chunk: &[u8], start: usize, len: usize) {
        self.events
            .push(Event::Body(BString::from(&chunk[start..start + len])));
    }

    fn on_message_complete(&mut self) {
        self.events.push(Event::MessageComplete);
    }
}

/// Feeds one chunk and asserts it is consumed whole.
pub fn feed(parser: &mut Parser<Record>, chunk: &[u8]) {
    let consumed = parser.execute(chunk).expect("chunk parses cleanly");
    assert_eq!(consumed, chunk.len(), "chunk not consumed whole");
}

/// Parses `input` split at the given boundaries and returns the recording.
pub fn parse_chunks(side: Side, chunks: &[&[u8]]) -> Record {
    let mut parser = Parser::new(side, Record::default());
    for chunk in chunks {
        feed(&mut parser, chunk);
    }
    parser.into_handler()
}

/// Parses `input` as a single chunk.
pub fn parse(side: Side, input: &[u8]) -> Record {
    parse_chunks(side, &[input])
}

/// Merges adjacent body events so recordings with different input
/// fragmentation compare equal.
pub fn coalesced(events: &[Event]) -> Vec<Event> {
    let mut out: Vec<Event> = Vec::new();
    for event in events {
        match (out.last_mut(), event) {
            (Some(Event::Body(acc)), Event::Body(data)) => acc.extend_from_slice(data),
            _ => out.push(event.clone()),
        }
    }
    out
}
