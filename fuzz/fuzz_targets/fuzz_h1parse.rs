#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate h1parse;

use h1parse::{Handler, Parser, Side};

struct Sink;

impl Handler for Sink {}

fn run(side: Side, data: &[u8]) {
    let mut parser = Parser::new(side, Sink);
    let mut rest = data;
    // Small chunks exercise the carry-over and resume paths.
    while !rest.is_empty() {
        let end = std::cmp::min(7, rest.len());
        match parser.execute(&rest[..end]) {
            Ok(0) => break,
            Ok(consumed) => rest = &rest[consumed..],
            Err(_) => return,
        }
    }
    let _ = parser.finish();
}

fuzz_target!(|data: &[u8]| {
    run(Side::Request, data);
    run(Side::Response, data);
});
