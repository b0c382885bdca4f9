//! Connection lifecycle and bookmark mechanism (§3.5, §4.4). Owns a
//! fixed-size read buffer and the bookmark that lets a parser resume
//! across reads and across pipelined requests on the same stream.
//!
//! Grounded in pion's `tcp::connection` (`lifecycle_type`,
//! `READ_BUFFER_SIZE = 8192`) and its TLS passthrough stub for builds
//! without `PION_HAVE_SSL`.

use std::io::{self, Read, Write};

pub const READ_BUFFER_SIZE: usize = 8192;

/// Connection lifecycle flag (§3.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Close,
    KeepAlive,
    /// Unconsumed bytes already in the read buffer belong to the next
    /// request.
    Pipelined,
}

/// A bookmark snapshotting where parsing left off inside the read
/// buffer (§3.5, §9 "Pipelining across parser instances"). Modeled as an
/// `(offset, length)` pair into `Connection`'s own buffer rather than as
/// raw pointers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bookmark {
    pub offset: usize,
    pub length: usize,
}

/// Owns an underlying byte stream (plain or, with the `tls` feature, a
/// TLS-wrapped one) plus the read buffer and lifecycle state used to
/// drive one request/response exchange and any that pipeline behind it.
pub struct Connection<S> {
    stream: S,
    buf: [u8; READ_BUFFER_SIZE],
    bookmark: Bookmark,
    lifecycle: Lifecycle,
    ssl_flag: bool,
}

impl<S: Read + Write> Connection<S> {
    pub fn new(stream: S) -> Connection<S> {
        Connection {
            stream: stream,
            buf: [0u8; READ_BUFFER_SIZE],
            bookmark: Bookmark::default(),
            lifecycle: Lifecycle::Close,
            ssl_flag: false,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn set_lifecycle(&mut self, lifecycle: Lifecycle) {
        self.lifecycle = lifecycle;
    }

    /// Reads into the owned buffer and returns the filled slice.
    pub fn read_some(&mut self) -> io::Result<&[u8]> {
        let n = self.stream.read(&mut self.buf)?;
        Ok(&self.buf[..n])
    }

    pub fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.stream.write_all(data)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }

    /// `close()`: best-effort shutdown; errors ignored, idempotent at the
    /// call site (the caller just stops using the connection).
    pub fn close(&mut self) {
        let _ = self.flush();
    }

    /// Unwraps the connection, handing back the underlying stream. Mainly
    /// useful to callers (and tests) that need to inspect what was
    /// written after the connection's work is done.
    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Bookmarks the unconsumed prefix of the read buffer once a parser
    /// has returned `Ok(done)` with leftover bytes (pipelining, §4.5.2).
    pub fn save_read_pos(&mut self, offset: usize, length: usize) {
        self.bookmark = Bookmark { offset: offset, length: length };
    }

    pub fn load_read_pos(&self) -> Bookmark {
        self.bookmark
    }

    pub fn has_pipelined_bytes(&self) -> bool {
        self.bookmark.length > 0
    }

    /// The unconsumed bytes from the last `read_some()` call, per the
    /// current bookmark.
    pub fn pipelined_bytes(&self) -> &[u8] {
        let start = self.bookmark.offset;
        let end = start + self.bookmark.length;
        &self.buf[start..end]
    }

    pub fn consume_bookmark(&mut self) {
        self.bookmark = Bookmark::default();
    }

    /// TLS handshake hook. Without the `tls` feature this is a no-op
    /// passthrough so call sites never need to branch (§9 "TLS absence").
    #[cfg(not(feature = "tls"))]
    pub fn async_handshake_server(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(not(feature = "tls"))]
    pub fn get_ssl_flag(&self) -> bool {
        false
    }

    #[cfg(feature = "tls")]
    pub fn get_ssl_flag(&self) -> bool {
        self.ssl_flag
    }

    #[cfg(feature = "tls")]
    pub fn mark_tls_established(&mut self) {
        self.ssl_flag = true;
    }
}
