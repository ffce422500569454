//! Wire grammars for the line-oriented parts of an HTTP/1.x message.
//!
//! Every function here operates on one complete line with the terminator
//! already stripped, except [`take_till_lf`], which is the streaming
//! scanner the chunk reader is built on.

use crate::util::{is_ows, trimmed};
use nom::{
    bytes::complete::{tag, take_while1, take_while_m_n},
    bytes::streaming::take_till,
    character::complete::{char, one_of, space0},
    combinator::{all_consuming, map, map_res, opt, rest},
    sequence::tuple,
    IResult,
};

/// Parsed request line: method token, target, and version digits.
pub(crate) type RequestLine<'a> = (&'a [u8], &'a [u8], u8, u8);

/// Parsed status line: version digits, status code, and reason bytes.
pub(crate) type StatusLine<'a> = (u8, u8, u16, &'a [u8]);

/// Takes everything up to and including the next LF; incomplete until the
/// LF arrives.
pub(crate) fn take_till_lf(data: &[u8]) -> IResult<&[u8], &[u8]> {
    let (rest, line) = take_till(|c| c == b'\n')(data)?;
    Ok((&rest[1..], &data[..line.len() + 1]))
}

fn version_digit(input: &[u8]) -> IResult<&[u8], u8> {
    map(one_of("0123456789"), |c| c as u8 - b'0')(input)
}

/// Splits `METHOD SP TARGET SP "HTTP/" DIGIT "." DIGIT` into its fields.
///
/// Only the method charset is checked here; membership in the method
/// table is the caller's concern.
pub(crate) fn request_line(input: &[u8]) -> IResult<&[u8], RequestLine> {
    map(
        all_consuming(tuple((
            take_while1(|c: u8| c.is_ascii_uppercase() || c == b'-'),
            char(' '),
            take_while1(|c| c != b' '),
            char(' '),
            tag("HTTP/"),
            version_digit,
            char('.'),
            version_digit,
        ))),
        |(method, _, target, _, _, major, _, minor)| (method, target, major, minor),
    )(input)
}

/// Splits `"HTTP/" DIGIT "." DIGIT SP STATUS [SP REASON]`; the reason may
/// be empty or absent.
pub(crate) fn status_line(input: &[u8]) -> IResult<&[u8], StatusLine> {
    map(
        all_consuming(tuple((
            tag("HTTP/"),
            version_digit,
            char('.'),
            version_digit,
            char(' '),
            take_while_m_n(3, 3, |c: u8| c.is_ascii_digit()),
            opt(char(' ')),
            rest,
        ))),
        |(_, major, _, minor, _, code, _, reason): (_, _, _, _, _, &[u8], _, &[u8])| {
            let code = code
                .iter()
                .fold(0u16, |acc, d| acc * 10 + u16::from(d - b'0'));
            (major, minor, code, reason)
        },
    )(input)
}

/// A header field line split at the colon. The value is stripped of
/// optional whitespace on both sides and may be empty.
pub(crate) fn header_field(input: &[u8]) -> IResult<&[u8], (&[u8], &[u8])> {
    map(
        all_consuming(tuple((
            take_while1(|c| c != b':' && c != b' ' && c != b'\t'),
            char(':'),
            space0,
            rest,
        ))),
        |(name, _, _, value): (&[u8], _, _, &[u8])| (name, trimmed(value)),
    )(input)
}

/// A folded continuation line: leading whitespace, then the fragment to
/// append to the previous field value, trimmed on both sides. The
/// fragment is empty for an all-whitespace line.
pub(crate) fn header_continuation(input: &[u8]) -> IResult<&[u8], &[u8]> {
    map(
        all_consuming(tuple((take_while1(is_ows), rest))),
        |(_, fragment): (_, &[u8])| trimmed(fragment),
    )(input)
}

/// Chunk-size line: the leading hex digits give the size, anything after
/// them (extensions included) is left in the remainder.
pub(crate) fn chunk_size(input: &[u8]) -> IResult<&[u8], u64> {
    map_res(
        take_while1(|c: u8| c.is_ascii_hexdigit()),
        |digits: &[u8]| {
            digits
                .iter()
                .filter_map(|d| (*d as char).to_digit(16))
                .try_fold(0u64, |acc, v| {
                    acc.checked_mul(16)
                        .and_then(|acc| acc.checked_add(u64::from(v)))
                })
                .ok_or("chunk size out of range")
        },
    )(input)
}

/// Decimal `Content-Length` value with surrounding whitespace tolerated.
/// `None` for anything that is not a plain non-negative integer.
pub(crate) fn content_length(value: &[u8]) -> Option<u64> {
    let digits = trimmed(value);
    if digits.is_empty() {
        return None;
    }
    digits.iter().try_fold(0u64, |acc, &d| {
        if !d.is_ascii_digit() {
            return None;
        }
        acc.checked_mul(10)?.checked_add(u64::from(d - b'0'))
    })
}
