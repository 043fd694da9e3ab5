//! C++ string literal decoding.

use std::iter::Peekable;
use std::str::Chars;

/// Decodes an ordinary or prefixed literal such as `"Delete \"%1\"?"` or `u8"Kosz"`.
///
/// Escapes produce bytes, so `"\xc5\x82"` decodes to `ł`; invalid UTF-8 is
/// replaced.
#[must_use]
pub fn decode_string_literal(text: &str) -> Option<String> {
    let open = text.find('"')?;
    let body = text.get(open + 1..)?.strip_suffix('"')?;
    Some(unescape(body))
}

/// Decodes `R"delim(...)delim"` (with any encoding prefix).
#[must_use]
pub fn decode_raw_string_literal(text: &str) -> Option<String> {
    let open = text.find("R\"")?;
    let rest = text.get(open + 2..)?.strip_suffix('"')?;
    let paren = rest.find('(')?;
    let delimiter = rest.get(..paren)?;
    let body = rest.get(paren + 1..)?.strip_suffix(delimiter)?.strip_suffix(')')?;
    Some(body.to_string())
}

/// Reads up to `max` digits of `radix` from the front of `chars`, continuing from `value`.
fn take_digits(
    chars: &mut Peekable<Chars<'_>>,
    radix: u32,
    max: usize,
    mut value: u32,
) -> u32 {
    for _ in 0..max {
        let Some(digit) = chars.peek().and_then(|c| c.to_digit(radix)) else {
            break;
        };
        value = value.wrapping_mul(radix).wrapping_add(digit);
        chars.next();
    }
    value
}

/// Resolves C escape sequences.
fn unescape(body: &str) -> String {
    let mut bytes: Vec<u8> = Vec::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    let mut utf8 = [0u8; 4];

    while let Some(c) = chars.next() {
        if c != '\\' {
            bytes.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
            continue;
        }
        let Some(escape) = chars.next() else {
            bytes.push(b'\\');
            break;
        };
        let byte = match escape {
            'n' => b'\n',
            't' => b'\t',
            'r' => b'\r',
            'a' => 0x07,
            'b' => 0x08,
            'f' => 0x0c,
            'v' => 0x0b,
            '0'..='7' => {
                let first = escape.to_digit(8).unwrap_or_default();
                u8::try_from(take_digits(&mut chars, 8, 2, first)).unwrap_or(u8::MAX)
            }
            'x' => u8::try_from(take_digits(&mut chars, 16, 2, 0)).unwrap_or(u8::MAX),
            'u' | 'U' => {
                let width = if escape == 'u' { 4 } else { 8 };
                let code = take_digits(&mut chars, 16, width, 0);
                let decoded = char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER);
                bytes.extend_from_slice(decoded.encode_utf8(&mut utf8).as_bytes());
                continue;
            }
            other => {
                bytes.extend_from_slice(other.encode_utf8(&mut utf8).as_bytes());
                continue;
            }
        };
        bytes.push(byte);
    }

    String::from_utf8_lossy(&bytes).into_owned()
}
