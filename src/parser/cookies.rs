//! Cookie header parsing (§4.2.8): accepts both RFC 2109 and RFC 6265
//! forms on the wire. Grounded in pion's `parse_cookie_header`
//! (`src/http_parser.cpp`), translated from its `COOKIE_PARSE_NAME` /
//! `COOKIE_PARSE_VALUE` / `COOKIE_PARSE_IGNORE` state machine into a
//! straightforward scan since cookie headers are short and bounded.

use chars::is_cookie_attribute;
use dict::Dictionary;

use super::{COOKIE_NAME_MAX, COOKIE_VALUE_MAX};

/// Parses one `Cookie` or `Set-Cookie` header value into `cookies`.
///
/// `is_request_header` selects RFC 2109 `$`-prefixed attribute skipping
/// (only meaningful for the `Cookie` request header); for `Set-Cookie`
/// responses, recognized attribute names (`Comment`, `Domain`, `Max-Age`,
/// `Path`, `Secure`, `Version`, `Expires`, `HttpOnly`) are treated as
/// attributes rather than cookie pairs.
pub fn parse_cookie_header(header: &str, cookies: &mut Dictionary, is_request_header: bool) {
    for pair in split_pairs(header) {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        let (name, value) = match pair.find('=') {
            Some(idx) => (&pair[..idx], &pair[idx + 1..]),
            None => continue,
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        if is_request_header && name.starts_with('$') {
            // RFC 2109 attribute (e.g. `$Path`) on a Cookie request header.
            continue;
        }
        if !is_request_header && is_cookie_attribute(name.as_bytes()) {
            continue;
        }
        let value = unquote(value.trim());
        let name = truncate_str(name, COOKIE_NAME_MAX);
        let value = truncate_str(&value, COOKIE_VALUE_MAX);
        cookies.insert(name.to_string(), value);
    }
}

/// Cookie separator is `;` (canonical) or `,` (legacy), but a comma or
/// semicolon inside a quoted value does not split the pair.
fn split_pairs(header: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quote_char = '"';
    for c in header.chars() {
        match c {
            '"' | '\'' if !in_quotes => {
                in_quotes = true;
                quote_char = c;
                current.push(c);
            }
            c2 if in_quotes && c2 == quote_char => {
                in_quotes = false;
                current.push(c2);
            }
            ';' | ',' if !in_quotes => {
                parts.push(current.clone());
                current.clear();
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

fn unquote(value: &str) -> String {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return value[1..value.len() - 1].to_string();
        }
    }
    value.to_string()
}

fn truncate_str(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        s[..max].to_string()
    }
}
