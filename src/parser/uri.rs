//! Standalone URI helpers (§4.2.9, §4.2.10): absolute-URI decomposition,
//! `application/x-www-form-urlencoded` parsing, and X-Forwarded-For
//! scanning. Grounded in pion's free functions of the same names in
//! `http_parser.cpp`.

#[allow(unused_imports)]
use std::ascii::AsciiExt;

use chars::url_decode;
use dict::Dictionary;

use super::{QUERY_NAME_MAX, QUERY_VALUE_MAX};

/// `parse_uri(uri) -> (proto, host, port, path, query)` (§4.2.9).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUri {
    pub proto: String,
    pub host: String,
    pub port: u16,
    pub path: String,
    pub query: String,
}

pub fn parse_uri(uri: &str) -> Option<ParsedUri> {
    let (proto, rest) = match uri.find("://") {
        Some(idx) => (uri[..idx].to_string(), &uri[idx + 3..]),
        None => (String::new(), uri),
    };
    let slash = match rest.find('/') {
        Some(idx) => idx,
        None => return None,
    };
    let authority = &rest[..slash];
    let path_and_query = &rest[slash..];
    let (host, port) = match authority.find(':') {
        Some(idx) => {
            let port = authority[idx + 1..].parse().unwrap_or(0);
            (authority[..idx].to_string(), port)
        }
        None => {
            let default_port = if proto.eq_ignore_ascii_case("https") {
                443
            } else if proto.eq_ignore_ascii_case("http") || proto.is_empty() {
                80
            } else {
                0
            };
            (authority.to_string(), default_port)
        }
    };
    let (path, query) = match path_and_query.find('?') {
        Some(idx) => (path_and_query[..idx].to_string(), path_and_query[idx + 1..].to_string()),
        None => (path_and_query.to_string(), String::new()),
    };
    Some(ParsedUri { proto: proto, host: host, port: port, path: path, query: query })
}

/// Parses a `x=1&y=2` query/form string into a `Dictionary`, applying
/// URL-decoding to both names and values (§4.2.9, §6's round-trip law).
pub fn parse_url_encoded(query: &str) -> Dictionary {
    parse_url_encoded_bytes(query.as_bytes())
}

pub fn parse_url_encoded_bytes(input: &[u8]) -> Dictionary {
    let mut dict = Dictionary::new();
    if input.is_empty() {
        return dict;
    }
    for pair in input.split(|&b| b == b'&') {
        if pair.is_empty() {
            continue;
        }
        let (name, value) = match pair.iter().position(|&b| b == b'=') {
            Some(idx) => (&pair[..idx], &pair[idx + 1..]),
            None => (pair, &pair[0..0]),
        };
        let name = truncate(url_decode(name), QUERY_NAME_MAX);
        let value = truncate(url_decode(value), QUERY_VALUE_MAX);
        dict.insert(
            String::from_utf8_lossy(&name).into_owned(),
            String::from_utf8_lossy(&value).into_owned(),
        );
    }
    dict
}

/// Serializes a dictionary back into a `x=1&y=2` query string, the
/// inverse used by the round-trip law in §8.2.
pub fn serialize_query(dict: &Dictionary) -> String {
    let mut parts = Vec::new();
    for &(ref k, ref v) in dict.iter() {
        parts.push(format!("{}={}", percent_encode(k), percent_encode(v)));
    }
    parts.join("&")
}

fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        match b {
            b'A'...b'Z' | b'a'...b'z' | b'0'...b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

fn truncate(mut v: Vec<u8>, max: usize) -> Vec<u8> {
    v.truncate(max);
    v
}

/// `parse_forwarded_for(header) -> Option<publicIp>` (§4.2.10): scans for
/// IPv4 addresses and returns the first one outside the private ranges
/// `10/8`, `127/8`, `192.168/16`, `172.16/12`.
pub fn parse_forwarded_for(header: &str) -> Option<String> {
    let bytes = header.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if let Some((ip, len)) = scan_ipv4(&bytes[i..]) {
            if !is_private_ip(&ip) {
                return Some(ip.iter().map(|o| o.to_string()).collect::<Vec<_>>().join("."));
            }
            i += len;
        } else {
            i += 1;
        }
    }
    None
}

fn scan_ipv4(bytes: &[u8]) -> Option<([u8; 4], usize)> {
    let mut octets = [0u8; 4];
    let mut pos = 0;
    for idx in 0..4 {
        let start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos == start || pos - start > 3 {
            return None;
        }
        let value: u32 = ::std::str::from_utf8(&bytes[start..pos]).ok()?.parse().ok()?;
        if value > 255 {
            return None;
        }
        octets[idx] = value as u8;
        if idx < 3 {
            if pos >= bytes.len() || bytes[pos] != b'.' {
                return None;
            }
            pos += 1;
        }
    }
    Some((octets, pos))
}

fn is_private_ip(octets: &[u8; 4]) -> bool {
    match octets[0] {
        10 | 127 => true,
        192 if octets[1] == 168 => true,
        172 if octets[1] >= 16 && octets[1] <= 31 => true,
        _ => false,
    }
}

trait AsciiDigit {
    fn is_ascii_digit(&self) -> bool;
}

impl AsciiDigit for u8 {
    fn is_ascii_digit(&self) -> bool {
        *self >= b'0' && *self <= b'9'
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_uri_with_scheme() {
        let p = parse_uri("http://example.com:8080/path?x=1").unwrap();
        assert_eq!(p.proto, "http");
        assert_eq!(p.host, "example.com");
        assert_eq!(p.port, 8080);
        assert_eq!(p.path, "/path");
        assert_eq!(p.query, "x=1");
    }

    #[test]
    fn test_parse_uri_default_ports() {
        let p = parse_uri("https://example.com/").unwrap();
        assert_eq!(p.port, 443);
    }

    #[test]
    fn test_parse_uri_no_slash_fails() {
        assert!(parse_uri("http://example.com").is_none());
    }

    #[test]
    fn test_parse_url_encoded() {
        let d = parse_url_encoded("x=1&y=2&z=3");
        assert_eq!(d.find("x"), "1");
        assert_eq!(d.find("y"), "2");
        assert_eq!(d.find("z"), "3");
    }

    #[test]
    fn test_forwarded_for_skips_private() {
        let result = parse_forwarded_for("10.0.0.1, 203.0.113.5, 192.168.1.1");
        assert_eq!(result, Some("203.0.113.5".to_string()));
    }
}
