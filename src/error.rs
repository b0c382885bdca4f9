//! Error model: the parser's error taxonomy (§7.1) plus the I/O errors
//! that can arise driving a connection. Built with `quick_error!`, the
//! teacher's error-handling crate of choice.

use std::io;
use std::sync::{Once, ONCE_INIT};

/// Mirrors pion's call-once-initialized parser error-category singleton
/// (§9 "Global singletons"): the category table itself is just the
/// `description()` match above, but initialization is still gated behind
/// `Once` so no two threads race to build it, per the design note's
/// letter even though a pure function needs no such guard in Rust.
static CATEGORY_INIT: Once = ONCE_INIT;

pub fn ensure_error_category_initialized() {
    CATEGORY_INIT.call_once(|| {
        trace!("parser error category initialized");
    });
}

/// The kinds of parse failure the message parser can report. Kept
/// separate from `Error` so callers (tests, dispatch) can match on the
/// kind without unwrapping an I/O variant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserErrorKind {
    MethodChar,
    MethodSize,
    UriChar,
    UriSize,
    QueryChar,
    QuerySize,
    VersionEmpty,
    VersionChar,
    StatusEmpty,
    StatusChar,
    HeaderChar,
    HeaderNameSize,
    HeaderValueSize,
    InvalidContentLength,
    ChunkChar,
    MissingHeaderData,
    MissingChunkData,
    MissingTooMuchContent,
}

impl ParserErrorKind {
    pub fn description(&self) -> &'static str {
        use self::ParserErrorKind::*;
        match *self {
            MethodChar => "invalid character in HTTP method",
            MethodSize => "HTTP method too long",
            UriChar => "invalid character in request URI",
            UriSize => "request URI too long",
            QueryChar => "invalid character in query string",
            QuerySize => "query string too long",
            VersionEmpty => "missing HTTP version",
            VersionChar => "malformed HTTP version",
            StatusEmpty => "missing status code",
            StatusChar => "malformed status code or message",
            HeaderChar => "invalid character in header",
            HeaderNameSize => "header name too long",
            HeaderValueSize => "header value too long",
            InvalidContentLength => "invalid Content-Length value",
            ChunkChar => "invalid character in chunk framing",
            MissingHeaderData => "missing data during header parsing",
            MissingChunkData => "missing data straddles a chunk boundary",
            MissingTooMuchContent => "missing data exceeds remaining content",
        }
    }
}

impl ::std::fmt::Display for ParserErrorKind {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        f.write_str(self.description())
    }
}

quick_error! {
    #[derive(Debug)]
    pub enum Error {
        Io(err: io::Error) {
            description("I/O error")
            display("I/O error: {}", err)
            from()
        }
        Parse(kind: ParserErrorKind) {
            description(kind.description())
            display("parse error: {}", kind)
        }
        /// Redirect chain revisited a previously seen resource (§4.5.3).
        RedirectLoop {
            description("maximum number of redirects exceeded")
        }
    }
}

impl Error {
    pub fn parse(kind: ParserErrorKind) -> Error {
        Error::Parse(kind)
    }

    pub fn kind(&self) -> Option<ParserErrorKind> {
        match *self {
            Error::Parse(kind) => Some(kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Error, ParserErrorKind};

    #[test]
    fn test_parse_error_display() {
        let e = Error::parse(ParserErrorKind::HeaderChar);
        assert_eq!(e.kind(), Some(ParserErrorKind::HeaderChar));
        assert_eq!(format!("{}", e), "parse error: invalid character in header");
    }

    #[test]
    fn test_io_error_from() {
        let io_err = ::std::io::Error::new(::std::io::ErrorKind::Other, "boom");
        let e: Error = io_err.into();
        assert!(e.kind().is_none());
    }
}
