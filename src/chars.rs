//! Byte classification helpers used by the parser and header/cookie
//! handling. Mirrors the CHAR / CTL / SPECIAL / DIGIT predicates of
//! RFC 2616 section 2.2.
#[allow(unused_imports)]
use std::ascii::AsciiExt;

/// `CHAR` — any US-ASCII octet (0 - 127).
#[inline]
pub fn is_char(c: u8) -> bool {
    c <= 127
}

/// `CTL` — any control character, plus DEL.
#[inline]
pub fn is_control(c: u8) -> bool {
    c <= 31 || c == 127
}

/// `SPECIAL` characters disallowed in tokens (method names, header names,
/// HTTP version identifiers): `()<>@,;:\"/[]?={} \t`.
#[inline]
pub fn is_special(c: u8) -> bool {
    match c {
        b'(' | b')' | b'<' | b'>' | b'@' | b',' | b';' | b':' | b'\\' |
        b'"' | b'/' | b'[' | b']' | b'?' | b'=' | b'{' | b'}' |
        b' ' | b'\t' => true,
        _ => false,
    }
}

#[inline]
pub fn is_digit(c: u8) -> bool {
    c >= b'0' && c <= b'9'
}

#[inline]
pub fn is_hex_digit(c: u8) -> bool {
    is_digit(c) || (c >= b'A' && c <= b'F') || (c >= b'a' && c <= b'f')
}

/// A token character: CHAR, not CTL, not SPECIAL.
#[inline]
pub fn is_token(c: u8) -> bool {
    is_char(c) && !is_control(c) && !is_special(c)
}

/// Cookie attribute names recognized in `Set-Cookie`; these are not
/// treated as cookie pairs when parsing (see `parser::cookies`).
pub fn is_cookie_attribute(name: &[u8]) -> bool {
    const ATTRS: &'static [&'static [u8]] = &[
        b"Comment", b"Domain", b"Max-Age", b"Path", b"Secure",
        b"Version", b"Expires", b"HttpOnly",
    ];
    ATTRS.iter().any(|a| a.eq_ignore_ascii_case(name))
}

/// Percent-decode a URL-encoded byte string (`+` becomes space,
/// `%XX` becomes the corresponding byte). Malformed escapes are passed
/// through verbatim rather than rejected, matching the tolerant style
/// of the rest of the parser.
pub fn url_decode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut iter = input.iter().enumerate();
    while let Some((i, &c)) = iter.next() {
        match c {
            b'+' => out.push(b' '),
            b'%' => {
                if i + 2 < input.len() {
                    let hi = input[i + 1];
                    let lo = input[i + 2];
                    if is_hex_digit(hi) && is_hex_digit(lo) {
                        out.push(hex_value(hi) * 16 + hex_value(lo));
                        iter.next();
                        iter.next();
                        continue;
                    }
                }
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

fn hex_value(c: u8) -> u8 {
    match c {
        b'0'...b'9' => c - b'0',
        b'a'...b'f' => c - b'a' + 10,
        b'A'...b'F' => c - b'A' + 10,
        _ => 0,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_classes() {
        assert!(is_token(b'G'));
        assert!(!is_token(b'('));
        assert!(!is_token(b'\t'));
        assert!(is_control(b'\r'));
        assert!(!is_control(b' '));
        assert!(is_digit(b'5'));
        assert!(is_hex_digit(b'f'));
        assert!(!is_hex_digit(b'g'));
    }

    #[test]
    fn test_cookie_attribute() {
        assert!(is_cookie_attribute(b"Path"));
        assert!(is_cookie_attribute(b"httponly"));
        assert!(!is_cookie_attribute(b"sessionid"));
    }

    #[test]
    fn test_url_decode() {
        assert_eq!(url_decode(b"a+b"), b"a b");
        assert_eq!(url_decode(b"x%20y"), b"x y");
        assert_eq!(url_decode(b"z%2"), b"z%2");
        assert_eq!(url_decode(b"100%25"), b"100%");
    }
}
