//! Async protocol driver (§4.5.1, §4.5.2): drives one accepted
//! connection's read/dispatch/write/keep-alive cycle from a `futures 0.1`
//! `Future::poll`, the same non-blocking-loop shape the teacher drives
//! its own codecs from, just wired to this crate's `Parser`/`Server`
//! instead of a `Codec` trait object.
//!
//! `parse()` itself never suspends (§5): all the suspension points this
//! future can return `Async::NotReady` from are the socket read/write
//! calls, matching the "single-reader, single-writer" concurrency model.

use std::io::ErrorKind;
use std::sync::Arc;

use futures::{Async, Future, Poll};
use tokio_core::io::Io;

use connection::{Connection, Lifecycle};
use error::Error;
use io as message_io;
use parser::{ParseOutcome, Parser, Target};
use request::Request;
use response::Response;
use server::{Config, Server};

enum Phase {
    ReadingRequest,
    Dispatching,
    WritingResponse,
    Done,
}

/// One accepted connection's full request/response/keep-alive cycle.
pub struct Proto<S: Io> {
    conn: Connection<S>,
    server: Arc<Server>,
    parser: Parser,
    request: Request,
    response: Response,
    phase: Phase,
}

impl<S: Io> Proto<S> {
    pub fn new(stream: S, server: Arc<Server>) -> Proto<S> {
        let parser = new_parser(server.config());
        Proto {
            conn: Connection::new(stream),
            server: server,
            parser: parser,
            request: Request::new(),
            response: Response::new(),
            phase: Phase::ReadingRequest,
        }
    }

    fn do_read(&mut self) -> Poll<(), Error> {
        loop {
            let data_len;
            // As in `io::receive`: a bookmarked pipelined window is itself
            // an offset slice of `conn`'s buffer, so `consumed` returned by
            // `parse()` below must be re-based on that offset before being
            // saved back as the next bookmark.
            let base_offset = if self.conn.has_pipelined_bytes() {
                self.conn.load_read_pos().offset
            } else {
                0
            };
            let outcome = {
                let data: &[u8] = if self.conn.has_pipelined_bytes() {
                    self.conn.pipelined_bytes()
                } else {
                    match self.conn.read_some() {
                        Ok(d) => d,
                        Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                            return Ok(Async::NotReady);
                        }
                        Err(e) => return Err(e.into()),
                    }
                };
                data_len = data.len();
                if data_len == 0 {
                    None
                } else {
                    let mut target = Target::Request(&mut self.request);
                    Some(self.parser.parse(data, &mut target)?)
                }
            };
            self.conn.consume_bookmark();
            match outcome {
                None => {
                    let mut target = Target::Request(&mut self.request);
                    self.parser.finish_on_eof(&mut target)?;
                    self.conn.set_lifecycle(Lifecycle::Close);
                    self.phase = Phase::Dispatching;
                    return Ok(Async::Ready(()));
                }
                Some(ParseOutcome::Done { consumed }) => {
                    if consumed < data_len {
                        self.conn.save_read_pos(base_offset + consumed, data_len - consumed);
                        self.conn.set_lifecycle(Lifecycle::Pipelined);
                    } else if self.request.wants_keep_alive() {
                        self.conn.set_lifecycle(Lifecycle::KeepAlive);
                    } else {
                        self.conn.set_lifecycle(Lifecycle::Close);
                    }
                    self.phase = Phase::Dispatching;
                    return Ok(Async::Ready(()));
                }
                Some(ParseOutcome::Pending) => continue,
            }
        }
    }

    fn do_dispatch(&mut self) {
        self.response = Response::for_request(&self.request);
        self.server.dispatch(&mut self.request, &mut self.response);
        self.phase = Phase::WritingResponse;
    }

    fn do_write(&mut self) -> Poll<(), Error> {
        match message_io::send_response(&mut self.conn, &mut self.response) {
            Ok(()) => {
                self.phase = Phase::Done;
                Ok(Async::Ready(()))
            }
            Err(Error::Io(ref e)) if e.kind() == ErrorKind::WouldBlock => Ok(Async::NotReady),
            Err(e) => Err(e),
        }
    }
}

fn new_parser(config: &Arc<Config>) -> Parser {
    let mut parser = Parser::for_request();
    parser.set_max_content_length(config.get_max_content_length());
    parser.set_headers_only(config.get_parse_headers_only());
    parser.set_save_raw_headers(config.get_save_raw_headers());
    parser
}

impl<S: Io> Future for Proto<S> {
    type Item = ();
    type Error = Error;

    /// Runs the phase state machine until either the connection closes
    /// or a read/write would block, in which case the executor will poll
    /// again once the socket is ready (§4.5.1).
    fn poll(&mut self) -> Poll<(), Error> {
        loop {
            match self.phase {
                Phase::ReadingRequest => {
                    if let Async::NotReady = self.do_read()? {
                        return Ok(Async::NotReady);
                    }
                }
                Phase::Dispatching => self.do_dispatch(),
                Phase::WritingResponse => {
                    if let Async::NotReady = self.do_write()? {
                        return Ok(Async::NotReady);
                    }
                }
                Phase::Done => {
                    let keep_alive = self.request.wants_keep_alive()
                        && self.conn.lifecycle() != Lifecycle::Close;
                    if keep_alive {
                        self.request.clear();
                        self.response = Response::new();
                        self.parser.reset();
                        self.phase = Phase::ReadingRequest;
                    } else {
                        self.conn.close();
                        return Ok(Async::Ready(()));
                    }
                }
            }
        }
    }
}
