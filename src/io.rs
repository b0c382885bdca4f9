//! Blocking message I/O (§4.3): `send()`/`receive()` drive the parser
//! across a `Connection` until a message is whole or an error terminates
//! it. A non-blocking flavor over `futures 0.1` lives in `server::proto`,
//! driving the same `Parser`/`Target` pair from a poll loop instead of a
//! blocking loop — this module is the synchronous façade used directly
//! by tests and by any caller without an executor.

use std::io::{Read, Write};

use connection::{Connection, Lifecycle};
use error::Error;
use parser::{ParseOutcome, Parser, Target};
use request::Request;
use response::Response;

/// Serializes a request's first line, headers and content onto the
/// connection, setting `Connection: Keep-Alive`/`close` per the
/// lifecycle and omitting `Content-Length` when `do_not_send_content_length`
/// is set and the body isn't chunked.
pub fn send_request<S: Read + Write>(conn: &mut Connection<S>, req: &mut Request) -> Result<(), Error> {
    let keep_alive = req.wants_keep_alive();
    prepare_connection_header(&mut req.base, keep_alive);
    let line = req.first_line().to_string();
    write_message(conn, &line, &req.base)
}

/// Serializes a response the same way, mirroring the request's keep-alive
/// policy that `Response::for_request` already captured.
pub fn send_response<S: Read + Write>(conn: &mut Connection<S>, resp: &mut Response) -> Result<(), Error> {
    let keep_alive = resp.keep_alive;
    for &(ref name, ref value) in &resp.outgoing_cookies {
        let cookie = format!("{}={}", name, value);
        resp.base.headers.insert("Set-Cookie", cookie);
    }
    prepare_connection_header(&mut resp.base, keep_alive);
    let line = resp.first_line().to_string();
    write_message(conn, &line, &resp.base)
}

fn prepare_connection_header(base: &mut ::message::Base, keep_alive: bool) {
    base.headers.change("Connection", if keep_alive { "Keep-Alive" } else { "close" });
    if !base.is_chunked && !base.do_not_send_content_length {
        let len = base.content().len();
        base.headers.change("Content-Length", len.to_string());
    } else {
        base.headers.delete("Content-Length");
    }
    base.clear_first_line();
}

fn write_message<S: Read + Write>(conn: &mut Connection<S>, first_line: &str, base: &::message::Base) -> Result<(), Error> {
    let mut out = Vec::with_capacity(base.content().len() + 256);
    out.extend_from_slice(first_line.as_bytes());
    out.extend_from_slice(b"\r\n");
    for &(ref k, ref v) in base.headers.iter() {
        out.extend_from_slice(k.as_bytes());
        out.extend_from_slice(b": ");
        out.extend_from_slice(v.as_bytes());
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(b"\r\n");
    out.extend_from_slice(base.content());
    conn.write_all(&out)?;
    conn.flush()?;
    Ok(())
}

/// `receive(connection, parser)`: loops `read_some()` / `parser.parse()`
/// until the parser reports `Done` or `Err`. On `Done`, bookmarks any
/// leftover bytes as the next pipelined message and sets the connection's
/// lifecycle accordingly.
pub fn receive<S: Read + Write>(
    conn: &mut Connection<S>,
    parser: &mut Parser,
    target: &mut Target,
) -> Result<(), Error> {
    loop {
        // The data fed to `parse()` this iteration may itself be the tail
        // of a previous read (a bookmarked, already-pipelined window); any
        // leftover this call computes is relative to that slice, so it
        // must be re-based on the bookmark's own offset into `conn`'s
        // buffer, not treated as an absolute buffer offset.
        let base_offset = if conn.has_pipelined_bytes() {
            conn.load_read_pos().offset
        } else {
            0
        };
        let (done, consumed, total) = {
            let data: &[u8] = if conn.has_pipelined_bytes() {
                conn.pipelined_bytes()
            } else {
                conn.read_some()?
            };
            if data.is_empty() {
                parser.finish_on_eof(target)?;
                (parser.is_finished(), 0, 0)
            } else {
                match parser.parse(data, target)? {
                    ParseOutcome::Done { consumed } => (true, consumed, data.len()),
                    ParseOutcome::Pending => (false, 0, data.len()),
                }
            }
        };
        conn.consume_bookmark();
        if done {
            let leftover = total.saturating_sub(consumed);
            if leftover > 0 {
                conn.save_read_pos(base_offset + consumed, leftover);
                conn.set_lifecycle(Lifecycle::Pipelined);
            }
            return Ok(());
        }
        if total == 0 {
            // EOF with no more data and the parser did not consider
            // itself finished: nothing left to read, caller decides.
            return Ok(());
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;
    use request::Request;
    use response::Response;
    use enums::Status;

    #[test]
    fn test_send_response_sets_headers() {
        let mut conn = Connection::new(Cursor::new(Vec::<u8>::new()));
        let mut resp = Response::new();
        resp.set_status(&Status::Ok);
        resp.base.set_content(b"Hello World");
        send_response(&mut conn, &mut resp).unwrap();
        assert_eq!(resp.base.headers.find("Content-Length"), "11");
        assert_eq!(resp.base.headers.find("Connection"), "Keep-Alive");
    }

    #[test]
    fn test_receive_simple_get() {
        let mut conn = Connection::new(Cursor::new(b"GET /hello HTTP/1.1\r\n\r\n".to_vec()));
        let mut parser = Parser::for_request();
        let mut req = Request::new();
        {
            let mut target = Target::Request(&mut req);
            receive(&mut conn, &mut parser, &mut target).unwrap();
        }
        assert_eq!(req.resource, "/hello");
        assert!(req.base.is_valid);
    }
}
