//! RFC 2388 multipart/form-data parsing (§4.2.7, §6.3). Field boundaries
//! come from the `Content-Type` header's `boundary=` attribute; field
//! names from each part's `Content-Disposition: ...; name="..."`.
//! Non-text parts are re-encoded as `data:<mime>; base64, <payload>`
//! rather than stored verbatim, since only `text/*` (or typeless) parts
//! are safe to keep as plain strings in a `Dictionary`.
//!
//! Grounded in pion's `parse_multipart_form_data` (`src/http_parser.cpp`);
//! the base64 codec itself is pulled from the `catenacyber-libhtp-rs`
//! example pack, which already depends on the `base64` crate for this
//! exact concern.

#[allow(unused_imports)]
use std::ascii::AsciiExt;

use base64;

use dict::Dictionary;

/// Extracts the `boundary=` attribute from a `Content-Type` header value,
/// e.g. `multipart/form-data; boundary=----WebKitFormBoundary...`.
pub fn extract_boundary(content_type: &str) -> Option<String> {
    for part in content_type.split(';').skip(1) {
        let part = part.trim();
        if let Some(rest) = strip_prefix_ci(part, "boundary=") {
            let rest = rest.trim();
            if rest.len() >= 2 && rest.starts_with('"') && rest.ends_with('"') {
                return Some(rest[1..rest.len() - 1].to_string());
            }
            return Some(rest.to_string());
        }
    }
    None
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if s.len() >= prefix.len() && s[..prefix.len()].eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

/// Splits `body` on `--boundary` delimiters, extracts each part's
/// `name="..."` from `Content-Disposition`, and inserts the decoded
/// field value into `queries`.
pub fn parse_multipart_form_data(body: &[u8], boundary: &str, queries: &mut Dictionary) {
    let delim = format!("--{}", boundary).into_bytes();
    for part in split_on_delimiter(body, &delim) {
        if part.is_empty() {
            continue;
        }
        let header_end = match find_double_crlf(part) {
            Some(idx) => idx,
            None => continue,
        };
        let header_block = &part[..header_end];
        let content = trim_crlf(&part[header_end + 4..]);
        let headers = String::from_utf8_lossy(header_block);
        let name = match extract_name(&headers) {
            Some(n) => n,
            None => continue,
        };
        let part_content_type = extract_header(&headers, "Content-Type");
        let is_text = match part_content_type {
            None => true,
            Some(ref ct) => ct.starts_with("text/"),
        };
        if is_text {
            queries.insert(name, String::from_utf8_lossy(content).into_owned());
        } else {
            let mime = part_content_type.unwrap_or_else(|| "application/octet-stream".to_string());
            let encoded = base64::encode(content);
            queries.insert(name, format!("data:{}; base64, {}", mime, encoded));
        }
    }
}

/// Decodes a `data:<mime>; base64, <payload>` string produced above back
/// into `(bytes, mime)`, per §6.3's decoding helper contract.
pub fn decode_data_uri(value: &str) -> Option<(Vec<u8>, String)> {
    let rest = strip_prefix_ci(value, "data:")?;
    let idx = rest.find(";")?;
    let mime = rest[..idx].to_string();
    let after = &rest[idx + 1..];
    let marker = "base64,";
    let b64_idx = after.find(marker)?;
    let payload = after[b64_idx + marker.len()..].trim();
    base64::decode(payload).ok().map(|bytes| (bytes, mime))
}

fn split_on_delimiter<'a>(body: &'a [u8], delim: &[u8]) -> Vec<&'a [u8]> {
    let mut parts = Vec::new();
    let mut rest = body;
    loop {
        match find_subslice(rest, delim) {
            Some(idx) => {
                if idx > 0 {
                    parts.push(&rest[..idx]);
                }
                rest = &rest[idx + delim.len()..];
            }
            None => {
                break;
            }
        }
    }
    parts
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    let last = haystack.len() - needle.len();
    for i in 0..last + 1 {
        if &haystack[i..i + needle.len()] == needle {
            return Some(i);
        }
    }
    None
}

fn find_double_crlf(data: &[u8]) -> Option<usize> {
    find_subslice(data, b"\r\n\r\n")
}

fn trim_crlf(data: &[u8]) -> &[u8] {
    let mut end = data.len();
    while end >= 2 && &data[end - 2..end] == b"\r\n" {
        end -= 2;
    }
    &data[..end]
}

fn extract_header(headers: &str, name: &str) -> Option<String> {
    for line in headers.lines() {
        if let Some(rest) = strip_prefix_ci(line, &format!("{}:", name)) {
            return Some(rest.trim().to_string());
        }
    }
    None
}

fn extract_name(headers: &str) -> Option<String> {
    let disposition = extract_header(headers, "Content-Disposition")?;
    for attr in disposition.split(';') {
        let attr = attr.trim();
        if let Some(rest) = strip_prefix_ci(attr, "name=") {
            let rest = rest.trim();
            if rest.len() >= 2 && rest.starts_with('"') && rest.ends_with('"') {
                return Some(rest[1..rest.len() - 1].to_string());
            }
            return Some(rest.to_string());
        }
    }
    None
}

#[cfg(test)]
mod test {
    use super::*;
    use dict::Dictionary;

    #[test]
    fn test_extract_boundary() {
        let ct = "multipart/form-data; boundary=----WebKitBoundary123";
        assert_eq!(extract_boundary(ct), Some("----WebKitBoundary123".to_string()));
    }

    #[test]
    fn test_extract_boundary_quoted() {
        let ct = r#"multipart/form-data; boundary="abc123""#;
        assert_eq!(extract_boundary(ct), Some("abc123".to_string()));
    }

    #[test]
    fn test_parse_text_field() {
        let body = b"--B\r\nContent-Disposition: form-data; name=\"field1\"\r\n\r\nvalue1\r\n--B--\r\n";
        let mut q = Dictionary::new();
        parse_multipart_form_data(body, "B", &mut q);
        assert_eq!(q.find("field1"), "value1");
    }

    #[test]
    fn test_parse_binary_field_base64() {
        let body = &b"--B\r\nContent-Disposition: form-data; name=\"file\"\r\nContent-Type: image/png\r\n\r\n\x89PNG\r\n--B--\r\n"[..];
        let mut q = Dictionary::new();
        parse_multipart_form_data(body, "B", &mut q);
        let value = q.find("file");
        assert!(value.starts_with("data:image/png; base64, "));
        let (bytes, mime) = decode_data_uri(value).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, b"\x89PNG");
    }
}
