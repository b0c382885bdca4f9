//! Request-model integration tests (§3.3, §4.2.7): query/form parsing,
//! cookie extraction and keep-alive policy, driven through the public
//! `Parser`/`Target` API rather than poking at private parser state.

extern crate protohttp;

use protohttp::{Parser, ParseOutcome};
use protohttp::parser::Target;
use protohttp::request::Request;
use protohttp::enums::Method;

fn parse_request(bytes: &[u8]) -> Request {
    let mut parser = Parser::for_request();
    let mut req = Request::new();
    {
        let mut target = Target::Request(&mut req);
        match parser.parse(bytes, &mut target).unwrap() {
            ParseOutcome::Done { .. } => {}
            ParseOutcome::Pending => panic!("expected a complete parse"),
        }
    }
    req
}

#[test]
fn query_string_and_form_body_merge_into_queries() {
    let req = parse_request(
        b"POST /echo?x=1 HTTP/1.1\r\n\
          Content-Type: application/x-www-form-urlencoded\r\n\
          Content-Length: 7\r\n\r\n\
          y=2&z=3");
    assert_eq!(req.method, Method::Post);
    assert_eq!(req.resource, "/echo");
    assert_eq!(req.queries.find("x"), "1");
    assert_eq!(req.queries.find("y"), "2");
    assert_eq!(req.queries.find("z"), "3");
}

#[test]
fn cookie_header_is_parsed_into_cookies_dictionary() {
    let req = parse_request(
        b"GET / HTTP/1.1\r\nCookie: session=abc123; $Path=/; theme=dark\r\n\r\n");
    assert_eq!(req.base.cookies.find("session"), "abc123");
    assert_eq!(req.base.cookies.find("theme"), "dark");
    assert!(!req.base.cookies.has("$Path"));
}

#[test]
fn keep_alive_requires_explicit_token_on_http_1_0() {
    let req = parse_request(b"GET / HTTP/1.0\r\n\r\n");
    assert!(!req.wants_keep_alive());

    let req = parse_request(b"GET / HTTP/1.0\r\nConnection: Keep-Alive\r\n\r\n");
    assert!(req.wants_keep_alive());
}

#[test]
fn keep_alive_is_default_on_http_1_1_unless_closed() {
    let req = parse_request(b"GET / HTTP/1.1\r\n\r\n");
    assert!(req.wants_keep_alive());

    let req = parse_request(b"GET / HTTP/1.1\r\nConnection: close\r\n\r\n");
    assert!(!req.wants_keep_alive());
}

#[test]
fn multipart_text_and_binary_fields_are_both_recovered() {
    let body = b"--B\r\n\
        Content-Disposition: form-data; name=\"caption\"\r\n\r\n\
        a photo\r\n\
        --B\r\n\
        Content-Disposition: form-data; name=\"file\"\r\n\
        Content-Type: image/png\r\n\r\n\
        \x89PNG\r\n\
        --B--\r\n";
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"POST /upload HTTP/1.1\r\n\
        Content-Type: multipart/form-data; boundary=B\r\n");
    bytes.extend_from_slice(format!("Content-Length: {}\r\n\r\n", body.len()).as_bytes());
    bytes.extend_from_slice(body);

    let req = parse_request(&bytes);
    assert_eq!(req.queries.find("caption"), "a photo");
    assert!(req.queries.find("file").starts_with("data:image/png; base64, "));
}

#[test]
fn http_0_9_simple_request_has_no_headers() {
    let req = parse_request(b"GET /index.html\r\n");
    assert_eq!(req.base.version_major, 0);
    assert_eq!(req.base.version_minor, 0);
    assert_eq!(req.resource, "/index.html");
    assert!(req.base.is_valid);
}
