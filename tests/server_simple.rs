//! The six concrete end-to-end scenarios of §8.4, driven over the
//! blocking `io::send`/`receive` façade and `Server::dispatch` rather
//! than the async `Proto` (which needs a live reactor to exercise).

extern crate protohttp;

use std::io::{self, Cursor, Read, Write};

use protohttp::{Connection, Parser, ParseOutcome, Server, Config, Dispatch};
use protohttp::parser::Target;
use protohttp::request::Request;
use protohttp::response::Response;
use protohttp::enums::Status;
use protohttp::io as message_io;

/// An in-memory duplex stream: reads drain a fixed input buffer, writes
/// accumulate into an output buffer the test inspects afterward.
struct Duplex {
    input: Cursor<Vec<u8>>,
    output: Vec<u8>,
}

impl Duplex {
    fn new(input: &[u8]) -> Duplex {
        Duplex { input: Cursor::new(input.to_vec()), output: Vec::new() }
    }
}

impl Read for Duplex {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for Duplex {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.write(buf)
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn hello_handler(_req: &mut Request, resp: &mut Response) -> Dispatch {
    resp.base.set_content(b"Hello World");
    Dispatch::Handled
}

fn echo_handler(req: &mut Request, resp: &mut Response) -> Dispatch {
    let len = req.base.content().len();
    let mut body = format!("Content length: {}", len).into_bytes();
    body.extend_from_slice(req.base.content());
    resp.base.set_content(&body);
    Dispatch::Handled
}

fn build_server() -> Server {
    let server = Server::new(Config::new().done());
    server.register("/hello", hello_handler);
    server.register("/echo", echo_handler);
    server
}

/// Drives one request/response exchange over `conn` using a fresh parser
/// and request/response pair, mirroring the per-request cycle `Proto`
/// runs asynchronously (§4.5.2).
fn serve_one(server: &Server, conn: &mut Connection<Duplex>) -> Response {
    let mut parser = Parser::for_request();
    let mut req = Request::new();
    {
        let mut target = Target::Request(&mut req);
        message_io::receive(conn, &mut parser, &mut target).unwrap();
    }
    let mut resp = Response::for_request(&req);
    server.dispatch(&mut req, &mut resp);
    message_io::send_response(conn, &mut resp).unwrap();
    resp
}

#[test]
fn scenario_1_simple_get() {
    let server = build_server();
    let mut conn = Connection::new(Duplex::new(b"GET /hello HTTP/1.1\r\n\r\n"));
    let resp = serve_one(&server, &mut conn);
    assert_eq!(resp.status_code, 200);

    let out = conn.into_inner().output;
    let out = String::from_utf8_lossy(&out);
    assert!(out.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(out.contains("Content-Length: 11"));
    assert!(out.ends_with("Hello World"));
}

#[test]
fn scenario_2_chunked_post_echo() {
    let server = build_server();
    let request = b"POST /echo HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n\
        A\r\nabcdefghij\r\n5\r\nklmno\r\n0\r\n\r\n";
    let mut conn = Connection::new(Duplex::new(request));
    let resp = serve_one(&server, &mut conn);
    assert_eq!(resp.status_code, 200);
    assert_eq!(resp.base.content(), b"Content length: 15abcdefghijklmno");
}

#[test]
fn scenario_3_pipelined_requests_are_answered_in_order() {
    let server = build_server();
    let two_requests = b"GET /hello HTTP/1.1\r\n\r\nGET /hello HTTP/1.1\r\n\r\n";
    let mut conn = Connection::new(Duplex::new(two_requests));

    let first = serve_one(&server, &mut conn);
    let second = serve_one(&server, &mut conn);
    assert_eq!(first.status_code, 200);
    assert_eq!(second.status_code, 200);

    let out = conn.into_inner().output;
    let out = String::from_utf8_lossy(&out);
    assert_eq!(out.matches("200 OK").count(), 2);
    assert_eq!(out.matches("Connection: Keep-Alive").count(), 2);
}

#[test]
fn three_pipelined_requests_resolve_in_order() {
    // A bookmark saved while resuming from an already-bookmarked window
    // must re-base its offset against the previous bookmark rather than
    // treating `consumed` as an absolute buffer position, or the third
    // request in a chain of pipelined requests gets misaligned.
    let server = build_server();
    // Deliberately different-length request lines: if a bookmark's
    // `consumed` offset were mistakenly treated as absolute instead of
    // being re-based on the prior bookmark, a run of equal-length
    // requests would mask the bug by coincidence.
    let three_requests = b"GET /hello HTTP/1.1\r\n\r\n\
        GET /hello/a-bit-longer-path HTTP/1.1\r\n\r\n\
        GET /hello HTTP/1.1\r\n\r\n";
    let mut conn = Connection::new(Duplex::new(three_requests));

    let first = serve_one(&server, &mut conn);
    let second = serve_one(&server, &mut conn);
    let third = serve_one(&server, &mut conn);
    assert_eq!(first.status_code, 200);
    assert_eq!(second.status_code, 200);
    assert_eq!(third.status_code, 200);

    let out = conn.into_inner().output;
    let out = String::from_utf8_lossy(&out);
    assert_eq!(out.matches("200 OK").count(), 3);
    assert_eq!(out.matches("Hello World").count(), 3);
}

#[test]
fn scenario_4_http_1_0_down_negotiates_to_close() {
    let server = build_server();
    let mut conn = Connection::new(Duplex::new(b"GET /hello HTTP/1.0\r\n\r\n"));
    let resp = serve_one(&server, &mut conn);
    assert_eq!(resp.status_code, 200);
    assert!(!resp.keep_alive);

    let out = conn.into_inner().output;
    let out = String::from_utf8_lossy(&out);
    assert!(out.contains("Connection: close"));
}

#[test]
fn scenario_5_query_string_and_form_body_merge() {
    let mut parser = Parser::for_request();
    let mut req = Request::new();
    {
        let mut target = Target::Request(&mut req);
        let bytes = b"POST /echo?x=1 HTTP/1.1\r\n\
            Content-Type: application/x-www-form-urlencoded\r\n\
            Content-Length: 7\r\n\r\n\
            y=2&z=3";
        match parser.parse(bytes, &mut target).unwrap() {
            ParseOutcome::Done { .. } => {}
            ParseOutcome::Pending => panic!("expected a complete parse"),
        }
    }
    assert_eq!(req.queries.find("x"), "1");
    assert_eq!(req.queries.find("y"), "2");
    assert_eq!(req.queries.find("z"), "3");
}

#[test]
fn scenario_6_set_cookie_attributes_are_not_treated_as_cookies() {
    let mut parser = protohttp::Parser::for_response();
    let mut resp = Response::new();
    {
        let mut target = Target::Response(&mut resp);
        let bytes = b"HTTP/1.1 200 OK\r\n\
            Set-Cookie: a=b; Path=/; HttpOnly\r\n\
            Content-Length: 0\r\n\r\n";
        parser.parse(bytes, &mut target).unwrap();
    }
    assert_eq!(resp.base.cookies.len(), 1);
    assert_eq!(resp.base.cookies.find("a"), "b");
    assert!(!resp.base.cookies.has("Path"));
    assert!(!resp.base.cookies.has("HttpOnly"));
}

#[test]
fn redirect_loop_yields_server_error() {
    let server = build_server();
    server.add_redirect("/a", "/b");
    server.add_redirect("/b", "/a");
    let mut conn = Connection::new(Duplex::new(b"GET /a HTTP/1.1\r\n\r\n"));
    let resp = serve_one(&server, &mut conn);
    assert_eq!(resp.status_code, Status::InternalServerError.code());
}

#[test]
fn no_matching_resource_yields_not_found() {
    let server = build_server();
    let mut conn = Connection::new(Duplex::new(b"GET /nope HTTP/1.1\r\n\r\n"));
    let resp = serve_one(&server, &mut conn);
    assert_eq!(resp.status_code, 404);
}
