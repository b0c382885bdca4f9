//! The incremental HTTP/1.x message parser (§4.2). A resumable,
//! byte-at-a-time state machine translated from pion's `http_parser`:
//! three nested state variables (message / header / chunk), each
//! advancing exactly one byte at a time so that splitting the input
//! stream at any boundary yields an identical result.

pub mod uri;
pub mod cookies;
pub mod multipart;

use chars;
use dict::Dictionary;
use enums::Method;
use error::{Error, ParserErrorKind};
use headers;
use message::DataStatus;
use request::Request;
use response::Response;

// Limits from §4.2.3, taken verbatim from pion's http_parser.cpp constants.
pub const METHOD_MAX: usize = 1024;
pub const RESOURCE_MAX: usize = 256 * 1024;
pub const QUERY_STRING_MAX: usize = 1024 * 1024;
pub const STATUS_MESSAGE_MAX: usize = 1024;
pub const HEADER_NAME_MAX: usize = 1024;
pub const HEADER_VALUE_MAX: usize = 1024 * 1024;
pub const QUERY_NAME_MAX: usize = 1024;
pub const QUERY_VALUE_MAX: usize = 1024 * 1024;
pub const COOKIE_NAME_MAX: usize = 1024;
pub const COOKIE_VALUE_MAX: usize = 1024 * 1024;
pub const DEFAULT_CONTENT_MAX: u64 = 1024 * 1024;

const FILLER_BYTE: u8 = b'X';

/// Outer message state (§4.2.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MessageState {
    Start,
    Headers,
    Content,
    ContentNoLength,
    Chunks,
    Footers,
    End,
}

/// Header/status-line sub-state (§4.2.1), active while `MessageState` is
/// `Headers` or `Footers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderState {
    MethodStart,
    Method,
    UriStem,
    UriQuery,
    VersionH,
    VersionT1,
    VersionT2,
    VersionP,
    VersionSlash,
    VersionMajorStart,
    VersionMajor,
    VersionMinorStart,
    VersionMinor,
    StatusCodeStart,
    StatusCode,
    StatusMessage,
    ExpectingRequestLineLf,
    HeaderLineStart,
    HeaderName,
    SpaceBeforeHeaderValue,
    HeaderValue,
    ExpectingHeaderValueLf,
    ExpectingFinalLf,
}

/// Chunk framing sub-state (§4.2.1), active while `MessageState` is
/// `Chunks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkState {
    SizeStart,
    Size,
    ExtensionIgnored,
    ExpectingCrAfterSize,
    ExpectingLfAfterSize,
    Data,
    ExpectingCrAfterData,
    ExpectingLfAfterData,
    ExpectingFinalCrOrFooters,
    ExpectingFinalLf,
}

/// Result of a single `parse()` call (§4.2.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The message completed; `consumed` bytes of the input window were
    /// used. Any remaining bytes in the caller's slice belong to the
    /// next pipelined message.
    Done { consumed: usize },
    /// Input was exhausted mid-message; feed more bytes and call again.
    Pending,
}

/// Borrow of the concrete message variant being parsed into, so a single
/// parser can drive either a request or a response through the shared
/// header/chunk automaton (see the "Variant vs. inheritance" design
/// note).
pub enum Target<'a> {
    Request(&'a mut Request),
    Response(&'a mut Response),
}

impl<'a> Target<'a> {
    fn is_content_length_implied(&self) -> bool {
        match *self {
            Target::Request(ref r) => r.is_content_length_implied(),
            Target::Response(ref r) => r.is_content_length_implied(),
        }
    }

    fn headers_mut(&mut self) -> &mut Dictionary {
        match *self {
            Target::Request(ref mut r) => &mut r.base.headers,
            Target::Response(ref mut r) => &mut r.base.headers,
        }
    }
}

/// An incremental HTTP/1.x parser. One instance is dedicated to a single
/// connection at a time, and is reentrant across `parse()` calls but not
/// thread-safe.
pub struct Parser {
    message_state: MessageState,
    header_state: HeaderState,
    chunk_state: ChunkState,
    is_request: bool,

    headers_only: bool,
    save_raw_headers: bool,
    max_content_length: u64,
    payload_handler: Option<Box<FnMut(&[u8])>>,

    method_buf: String,
    uri_buf: String,
    query_buf: String,
    version_major: u16,
    version_minor: u16,
    status_code_buf: String,
    status_message_buf: String,
    header_name_buf: String,
    header_value_buf: String,
    raw_headers: Vec<u8>,

    content_remaining: u64,
    content_write_remaining: u64,
    content_written: u64,
    chunk_remaining: u64,

    pub bytes_last_read: u64,
    pub bytes_total_read: u64,
    pub bytes_content_read: u64,

    has_missing_packets: bool,
    has_data_after_missing: bool,
}

impl Parser {
    fn new(is_request: bool) -> Parser {
        Parser {
            message_state: MessageState::Start,
            header_state: if is_request { HeaderState::MethodStart } else { HeaderState::VersionH },
            chunk_state: ChunkState::SizeStart,
            is_request: is_request,
            headers_only: false,
            save_raw_headers: false,
            max_content_length: DEFAULT_CONTENT_MAX,
            payload_handler: None,
            method_buf: String::new(),
            uri_buf: String::new(),
            query_buf: String::new(),
            version_major: 1,
            version_minor: 1,
            status_code_buf: String::new(),
            status_message_buf: String::new(),
            header_name_buf: String::new(),
            header_value_buf: String::new(),
            raw_headers: Vec::new(),
            content_remaining: 0,
            content_write_remaining: 0,
            content_written: 0,
            chunk_remaining: 0,
            bytes_last_read: 0,
            bytes_total_read: 0,
            bytes_content_read: 0,
            has_missing_packets: false,
            has_data_after_missing: false,
        }
    }

    pub fn for_request() -> Parser {
        Parser::new(true)
    }

    pub fn for_response() -> Parser {
        Parser::new(false)
    }

    /// Resets all parse state so the same instance can parse the next
    /// pipelined message on the connection (§5 "per-connection state is
    /// single-reader"; the parser itself is cheap to reset rather than
    /// reallocate).
    pub fn reset(&mut self) {
        let is_request = self.is_request;
        let headers_only = self.headers_only;
        let save_raw_headers = self.save_raw_headers;
        let max_content_length = self.max_content_length;
        *self = Parser::new(is_request);
        self.headers_only = headers_only;
        self.save_raw_headers = save_raw_headers;
        self.max_content_length = max_content_length;
    }

    pub fn set_headers_only(&mut self, value: bool) {
        self.headers_only = value;
    }

    pub fn set_save_raw_headers(&mut self, value: bool) {
        self.save_raw_headers = value;
    }

    pub fn set_max_content_length(&mut self, value: u64) {
        self.max_content_length = value;
    }

    pub fn set_payload_handler<F: FnMut(&[u8]) + 'static>(&mut self, handler: F) {
        self.payload_handler = Some(Box::new(handler));
    }

    fn emit_payload(&mut self, bytes: &[u8]) {
        if let Some(ref mut handler) = self.payload_handler {
            handler(bytes);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.message_state == MessageState::End
    }

    /// The outer parse operation (§4.2.2). Consumes bytes one at a time
    /// from `data`, writing into `target` as fields complete.
    pub fn parse(&mut self, data: &[u8], target: &mut Target)
        -> Result<ParseOutcome, Error>
    {
        let mut pos = 0usize;
        self.bytes_last_read = 0;
        while pos < data.len() {
            if self.message_state == MessageState::End {
                break;
            }
            let byte = data[pos];
            let consumed_content = self.message_state == MessageState::Content
                || self.message_state == MessageState::ContentNoLength
                || self.message_state == MessageState::Chunks;
            if consumed_content {
                let n = self.step_content(&data[pos..], target)?;
                if n == 0 {
                    // Needed more chunk-framing bytes than are available;
                    // step_content only consumes whole content runs, so a
                    // zero return means it fell through to the framing
                    // byte-at-a-time path below.
                } else {
                    pos += n;
                    self.bytes_total_read += n as u64;
                    self.bytes_last_read += n as u64;
                    continue;
                }
            }
            self.step(byte, target)?;
            pos += 1;
            self.bytes_total_read += 1;
            self.bytes_last_read += 1;
            if self.message_state == MessageState::End {
                break;
            }
        }
        if self.message_state == MessageState::End {
            Ok(ParseOutcome::Done { consumed: pos })
        } else {
            Ok(ParseOutcome::Pending)
        }
    }

    /// Attempts to bulk-consume a run of content/chunk-data bytes rather
    /// than dispatching through `step()` one byte at a time; purely an
    /// optimization; falls through (returns 0) to the byte-at-a-time
    /// handling for framing bytes (CR/LF, chunk-size lines).
    fn step_content(&mut self, data: &[u8], target: &mut Target) -> Result<usize, Error> {
        match self.message_state {
            MessageState::Content => {
                let take = ::std::cmp::min(self.content_remaining, data.len() as u64) as usize;
                if take == 0 {
                    return Ok(0);
                }
                // Only the first `content_write_remaining` bytes of this
                // run are copied into the buffer (or streamed to the
                // payload handler); any excess beyond the configured max
                // is still consumed from the wire but discarded (§4.2.4).
                let write_len = ::std::cmp::min(self.content_write_remaining, take as u64) as usize;
                if write_len > 0 {
                    self.write_content(target, &data[..write_len]);
                    self.content_write_remaining -= write_len as u64;
                }
                self.content_remaining -= take as u64;
                self.bytes_content_read += take as u64;
                if self.has_missing_packets {
                    self.has_data_after_missing = true;
                }
                if self.content_remaining == 0 {
                    self.finish_message(target)?;
                }
                Ok(take)
            }
            MessageState::ContentNoLength => {
                if data.is_empty() {
                    return Ok(0);
                }
                self.write_content(target, data);
                self.bytes_content_read += data.len() as u64;
                if self.has_missing_packets {
                    self.has_data_after_missing = true;
                }
                Ok(data.len())
            }
            MessageState::Chunks if self.chunk_state == ChunkState::Data => {
                let take = ::std::cmp::min(self.chunk_remaining, data.len() as u64) as usize;
                if take == 0 {
                    return Ok(0);
                }
                self.write_chunk_data(target, &data[..take]);
                self.chunk_remaining -= take as u64;
                self.bytes_content_read += take as u64;
                if self.has_missing_packets {
                    self.has_data_after_missing = true;
                }
                if self.chunk_remaining == 0 {
                    self.chunk_state = ChunkState::ExpectingCrAfterData;
                }
                Ok(take)
            }
            _ => Ok(0),
        }
    }

    fn write_content(&mut self, target: &mut Target, bytes: &[u8]) {
        if self.payload_handler.is_some() {
            self.emit_payload(bytes);
            return;
        }
        let base = match *target {
            Target::Request(ref mut r) => &mut r.base,
            Target::Response(ref mut r) => &mut r.base,
        };
        let end = (self.content_written as usize) + bytes.len();
        base.content_mut()[self.content_written as usize..end].copy_from_slice(bytes);
        self.content_written += bytes.len() as u64;
    }

    fn write_chunk_data(&mut self, target: &mut Target, bytes: &[u8]) {
        if self.payload_handler.is_some() {
            self.emit_payload(bytes);
            return;
        }
        let base = match *target {
            Target::Request(ref mut r) => &mut r.base,
            Target::Response(ref mut r) => &mut r.base,
        };
        // Mirrors the Content-Length path (`:747`): reassembly is capped at
        // `max_content_length`, the excess chunk bytes are still consumed
        // from the wire but never appended (§4.2.3, §5).
        let cap = self.max_content_length as usize;
        if base.chunk_cache.len() < cap {
            let room = cap - base.chunk_cache.len();
            let take = ::std::cmp::min(room, bytes.len());
            base.chunk_cache.extend_from_slice(&bytes[..take]);
        }
    }

    /// Advances by exactly one byte. Dispatches to the header/status-line
    /// automaton, the chunk-framing automaton, or is unreachable for pure
    /// content states (handled in bulk by `step_content`).
    fn step(&mut self, byte: u8, target: &mut Target) -> Result<(), Error> {
        match self.message_state {
            MessageState::Start | MessageState::Headers | MessageState::Footers => {
                self.step_headers(byte, target)
            }
            MessageState::Chunks => self.step_chunk_framing(byte, target),
            MessageState::Content | MessageState::ContentNoLength | MessageState::End => {
                Ok(())
            }
        }
    }

    fn step_headers(&mut self, byte: u8, target: &mut Target) -> Result<(), Error> {
        if self.save_raw_headers {
            self.raw_headers.push(byte);
        }
        use self::HeaderState::*;
        match self.header_state {
            MethodStart => {
                self.message_state = MessageState::Headers;
                if chars::is_token(byte) {
                    self.method_buf.push(byte as char);
                    self.header_state = Method;
                } else {
                    return Err(Error::parse(ParserErrorKind::MethodChar));
                }
            }
            Method => {
                if byte == b' ' {
                    self.header_state = HeaderState::UriStem;
                } else if chars::is_token(byte) {
                    if self.method_buf.len() >= METHOD_MAX {
                        return Err(Error::parse(ParserErrorKind::MethodSize));
                    }
                    self.method_buf.push(byte as char);
                } else {
                    return Err(Error::parse(ParserErrorKind::MethodChar));
                }
            }
            UriStem => {
                if byte == b' ' {
                    self.finish_request_line_version_probe(target)?;
                } else if byte == b'?' {
                    self.header_state = UriQuery;
                } else if byte == b'\r' || byte == b'\n' {
                    // No space before a version token: HTTP/0.9 request.
                    self.version_major = 0;
                    self.version_minor = 0;
                    return self.finish_start_line(byte, target);
                } else if chars::is_control(byte) {
                    return Err(Error::parse(ParserErrorKind::UriChar));
                } else {
                    if self.uri_buf.len() >= RESOURCE_MAX {
                        return Err(Error::parse(ParserErrorKind::UriSize));
                    }
                    self.uri_buf.push(byte as char);
                }
            }
            UriQuery => {
                if byte == b' ' {
                    self.header_state = VersionH;
                } else if byte == b'\r' || byte == b'\n' {
                    self.version_major = 0;
                    self.version_minor = 0;
                    return self.finish_start_line(byte, target);
                } else if chars::is_control(byte) {
                    return Err(Error::parse(ParserErrorKind::QueryChar));
                } else {
                    if self.query_buf.len() >= QUERY_STRING_MAX {
                        return Err(Error::parse(ParserErrorKind::QuerySize));
                    }
                    self.query_buf.push(byte as char);
                }
            }
            VersionH => {
                if byte == b'\r' || byte == b'\n' {
                    // No "HTTP/x.y" token: HTTP/0.9 simple request (request
                    // only); a response without it is an error (§4.2.3).
                    if self.is_request {
                        self.version_major = 0;
                        self.version_minor = 0;
                        return self.finish_start_line(byte, target);
                    } else {
                        return Err(Error::parse(ParserErrorKind::VersionEmpty));
                    }
                } else if byte == b'H' {
                    self.header_state = VersionT1;
                } else if !self.is_request {
                    return Err(Error::parse(ParserErrorKind::VersionChar));
                } else {
                    return Err(Error::parse(ParserErrorKind::VersionChar));
                }
            }
            VersionT1 => self.expect_byte(byte, b'T', VersionT2, ParserErrorKind::VersionChar)?,
            VersionT2 => self.expect_byte(byte, b'T', VersionP, ParserErrorKind::VersionChar)?,
            VersionP => self.expect_byte(byte, b'P', VersionSlash, ParserErrorKind::VersionChar)?,
            VersionSlash => self.expect_byte(byte, b'/', VersionMajorStart, ParserErrorKind::VersionChar)?,
            VersionMajorStart => {
                if chars::is_digit(byte) {
                    self.version_major = (byte - b'0') as u16;
                    self.header_state = VersionMajor;
                } else {
                    return Err(Error::parse(ParserErrorKind::VersionChar));
                }
            }
            VersionMajor => {
                if byte == b'.' {
                    self.header_state = VersionMinorStart;
                } else if chars::is_digit(byte) {
                    self.version_major = self.version_major.saturating_mul(10).saturating_add((byte - b'0') as u16);
                } else {
                    return Err(Error::parse(ParserErrorKind::VersionChar));
                }
            }
            VersionMinorStart => {
                if chars::is_digit(byte) {
                    self.version_minor = (byte - b'0') as u16;
                    self.header_state = VersionMinor;
                } else {
                    return Err(Error::parse(ParserErrorKind::VersionChar));
                }
            }
            VersionMinor => {
                if byte == b'\r' || byte == b'\n' {
                    if self.is_request {
                        return self.finish_start_line(byte, target);
                    } else {
                        self.header_state = StatusCodeStart;
                        if byte == b'\n' {
                            // lone LF also separates version from status (tolerant).
                        }
                    }
                } else if byte == b' ' && !self.is_request {
                    self.header_state = StatusCodeStart;
                } else if chars::is_digit(byte) {
                    self.version_minor = self.version_minor.saturating_mul(10).saturating_add((byte - b'0') as u16);
                } else {
                    return Err(Error::parse(ParserErrorKind::VersionChar));
                }
            }
            StatusCodeStart => {
                if chars::is_digit(byte) {
                    self.status_code_buf.push(byte as char);
                    self.header_state = StatusCode;
                } else if byte == b' ' {
                    // tolerate repeated spaces
                } else {
                    return Err(Error::parse(ParserErrorKind::StatusChar));
                }
            }
            StatusCode => {
                if chars::is_digit(byte) {
                    self.status_code_buf.push(byte as char);
                } else if byte == b' ' {
                    self.header_state = StatusMessage;
                } else if byte == b'\r' || byte == b'\n' {
                    // Status-code edge case (§9): a response missing its
                    // reason phrase is tolerated, not rejected.
                    self.status_message_buf.clear();
                    return self.finish_start_line(byte, target);
                } else {
                    return Err(Error::parse(ParserErrorKind::StatusChar));
                }
            }
            StatusMessage => {
                if byte == b'\r' || byte == b'\n' {
                    return self.finish_start_line(byte, target);
                } else if chars::is_control(byte) {
                    return Err(Error::parse(ParserErrorKind::StatusChar));
                } else {
                    if self.status_message_buf.len() >= STATUS_MESSAGE_MAX {
                        return Err(Error::parse(ParserErrorKind::StatusChar));
                    }
                    self.status_message_buf.push(byte as char);
                }
            }
            ExpectingRequestLineLf => {
                if byte == b'\n' {
                    self.header_state = HeaderLineStart;
                } else {
                    return Err(Error::parse(ParserErrorKind::MethodChar));
                }
            }
            HeaderLineStart => {
                if byte == b'\r' {
                    self.header_state = ExpectingFinalLf;
                } else if byte == b'\n' {
                    self.finish_headers(target)?;
                } else if byte == b' ' || byte == b'\t' {
                    // Leading whitespace signals a continuation/folding
                    // line. Per the resolved open question (§9), folding
                    // is rejected rather than accepted.
                    return Err(Error::parse(ParserErrorKind::HeaderChar));
                } else if chars::is_token(byte) {
                    self.header_name_buf.push(byte as char);
                    self.header_state = HeaderName;
                } else {
                    return Err(Error::parse(ParserErrorKind::HeaderChar));
                }
            }
            HeaderName => {
                if byte == b':' {
                    self.header_state = SpaceBeforeHeaderValue;
                } else if chars::is_token(byte) {
                    if self.header_name_buf.len() >= HEADER_NAME_MAX {
                        return Err(Error::parse(ParserErrorKind::HeaderNameSize));
                    }
                    self.header_name_buf.push(byte as char);
                } else {
                    return Err(Error::parse(ParserErrorKind::HeaderChar));
                }
            }
            SpaceBeforeHeaderValue => {
                if byte == b' ' || byte == b'\t' {
                    // skip
                } else if byte == b'\r' || byte == b'\n' {
                    self.commit_header(target);
                    self.header_state = if byte == b'\r' {
                        ExpectingHeaderValueLf
                    } else {
                        HeaderLineStart
                    };
                } else if chars::is_control(byte) {
                    return Err(Error::parse(ParserErrorKind::HeaderChar));
                } else {
                    self.header_value_buf.push(byte as char);
                    self.header_state = HeaderValue;
                }
            }
            HeaderValue => {
                if byte == b'\r' || byte == b'\n' {
                    self.commit_header(target);
                    self.header_state = if byte == b'\r' {
                        ExpectingHeaderValueLf
                    } else {
                        HeaderLineStart
                    };
                } else if chars::is_control(byte) {
                    return Err(Error::parse(ParserErrorKind::HeaderChar));
                } else {
                    if self.header_value_buf.len() >= HEADER_VALUE_MAX {
                        return Err(Error::parse(ParserErrorKind::HeaderValueSize));
                    }
                    self.header_value_buf.push(byte as char);
                }
            }
            ExpectingHeaderValueLf => {
                if byte == b'\n' {
                    self.header_state = HeaderLineStart;
                } else {
                    return Err(Error::parse(ParserErrorKind::HeaderChar));
                }
            }
            ExpectingFinalLf => {
                if byte == b'\n' {
                    self.finish_headers(target)?;
                } else {
                    return Err(Error::parse(ParserErrorKind::HeaderChar));
                }
            }
        }
        Ok(())
    }

    fn expect_byte(&mut self, got: u8, want: u8, next: HeaderState, err: ParserErrorKind) -> Result<(), Error> {
        if got == want {
            self.header_state = next;
            Ok(())
        } else {
            Err(Error::parse(err))
        }
    }

    /// A space following the URI stem/query in a request line commits the
    /// path, then expects the version token (or CR/LF for a 0.9 request).
    fn finish_request_line_version_probe(&mut self, _target: &mut Target) -> Result<(), Error> {
        self.header_state = HeaderState::VersionH;
        Ok(())
    }

    /// A CR or LF that ends the request/status line. Commits first-line
    /// fields into `target` and transitions to header parsing.
    fn finish_start_line(&mut self, terminator: u8, target: &mut Target) -> Result<(), Error> {
        if self.is_request {
            if let Target::Request(ref mut r) = *target {
                r.method = Method::from(self.method_buf.as_str());
                r.base.version_major = self.version_major;
                r.base.version_minor = self.version_minor;
                r.set_resource(self.uri_buf.clone());
                r.query_string = self.query_buf.clone();
                r.original_resource = r.resource.clone();
            }
        } else {
            if let Target::Response(ref mut r) = *target {
                r.base.version_major = self.version_major;
                r.base.version_minor = self.version_minor;
                r.status_code = self.status_code_buf.parse().unwrap_or(0);
                r.status_message = self.status_message_buf.clone();
                r.base.clear_first_line();
            }
        }
        if self.is_request && self.version_major == 0 && self.version_minor == 0 {
            // HTTP/0.9 "Simple-Request": no header block follows the
            // request line at all.
            return self.finish_headers(target);
        }
        self.header_state = if terminator == b'\r' {
            HeaderState::ExpectingRequestLineLf
        } else {
            HeaderState::HeaderLineStart
        };
        Ok(())
    }

    fn commit_header(&mut self, target: &mut Target) {
        let name = ::std::mem::replace(&mut self.header_name_buf, String::new());
        let value = ::std::mem::replace(&mut self.header_value_buf, String::new());
        let trimmed = value.trim().to_string();
        target.headers_mut().insert(name, trimmed);
    }

    /// Transition out of header/trailer parsing (`finish_header_parsing`,
    /// §4.2.4).
    fn finish_headers(&mut self, target: &mut Target) -> Result<(), Error> {
        if self.message_state == MessageState::Footers {
            self.finish_message(target)?;
            return Ok(());
        }
        let is_chunked = headers::is_chunked(target.headers_mut().find("Transfer-Encoding").as_bytes());
        let base = match *target {
            Target::Request(ref mut r) => &mut r.base,
            Target::Response(ref mut r) => &mut r.base,
        };
        base.is_chunked = is_chunked;

        // headers-only mode (§4.2.2, §6.5): finish right after the header
        // block regardless of framing, so the caller can take over body
        // handling itself. Must be checked before any of the three body
        // framings transition the message state, not just the
        // explicit-Content-Length one.
        if self.headers_only {
            return self.finish_message(target);
        }

        if is_chunked {
            self.message_state = MessageState::Chunks;
            self.chunk_state = ChunkState::SizeStart;
            return Ok(());
        }
        if target.is_content_length_implied() {
            return self.finish_message(target);
        }
        let cl_header = target.headers_mut().find("Content-Length").to_string();
        if !cl_header.is_empty() {
            let len: u64 = match cl_header.trim().parse() {
                Ok(n) => n,
                Err(_) => return Err(Error::parse(ParserErrorKind::InvalidContentLength)),
            };
            // The full declared length is always consumed from the wire
            // (`content_remaining`); only up to `max_content_length` of it
            // is ever written into the buffer or forwarded to a payload
            // handler (`content_write_remaining`) — the excess is read
            // and discarded (§4.2.4).
            self.content_remaining = len;
            if self.payload_handler.is_none() {
                let capped = ::std::cmp::min(len, self.max_content_length);
                let base = match *target {
                    Target::Request(ref mut r) => &mut r.base,
                    Target::Response(ref mut r) => &mut r.base,
                };
                base.allocate_content(capped as usize);
                self.content_write_remaining = capped;
            } else {
                self.content_write_remaining = len;
            }
            self.content_written = 0;
            if len == 0 {
                return self.finish_message(target);
            }
            self.message_state = MessageState::Content;
            return Ok(());
        }
        if self.is_request {
            return self.finish_message(target);
        }
        self.message_state = MessageState::ContentNoLength;
        Ok(())
    }

    fn step_chunk_framing(&mut self, byte: u8, target: &mut Target) -> Result<(), Error> {
        use self::ChunkState::*;
        match self.chunk_state {
            SizeStart => {
                if chars::is_hex_digit(byte) {
                    self.chunk_remaining = hex_val(byte) as u64;
                    self.chunk_state = Size;
                } else if byte == b' ' || byte == b'\t' {
                    // tolerant leading whitespace
                } else {
                    return Err(Error::parse(ParserErrorKind::ChunkChar));
                }
            }
            Size => {
                if chars::is_hex_digit(byte) {
                    self.chunk_remaining = self.chunk_remaining * 16 + hex_val(byte) as u64;
                } else if byte == b';' {
                    self.chunk_state = ExtensionIgnored;
                } else if byte == b'\r' {
                    self.chunk_state = ExpectingCrAfterSize; // reuse: waiting for LF
                } else if byte == b'\n' {
                    self.begin_chunk_data();
                } else if byte == b' ' || byte == b'\t' {
                    // tolerant trailing whitespace before CRLF/`;`
                } else {
                    return Err(Error::parse(ParserErrorKind::ChunkChar));
                }
            }
            ExtensionIgnored => {
                if byte == b'\r' {
                    self.chunk_state = ExpectingCrAfterSize;
                } else if byte == b'\n' {
                    self.begin_chunk_data();
                }
                // all other bytes in the extension tail are ignored
            }
            ExpectingCrAfterSize => {
                if byte == b'\n' {
                    self.begin_chunk_data();
                } else {
                    return Err(Error::parse(ParserErrorKind::ChunkChar));
                }
            }
            ExpectingLfAfterSize => {
                if byte == b'\n' {
                    self.begin_chunk_data();
                } else {
                    return Err(Error::parse(ParserErrorKind::ChunkChar));
                }
            }
            Data => {
                // Bulk path (step_content) handles all Data bytes; reaching
                // here with remaining == 0 means a zero-size chunk.
                self.chunk_state = ExpectingCrAfterData;
                return self.step_chunk_framing(byte, target);
            }
            ExpectingCrAfterData => {
                if byte == b'\r' {
                    self.chunk_state = ExpectingLfAfterData;
                } else if byte == b'\n' {
                    self.chunk_state = SizeStart;
                } else {
                    return Err(Error::parse(ParserErrorKind::ChunkChar));
                }
            }
            ExpectingLfAfterData => {
                if byte == b'\n' {
                    self.chunk_state = SizeStart;
                } else {
                    return Err(Error::parse(ParserErrorKind::ChunkChar));
                }
            }
            ExpectingFinalCrOrFooters => {
                if byte == b'\r' {
                    self.chunk_state = ExpectingFinalLf;
                } else if byte == b'\n' {
                    self.concatenate_chunks(target);
                    return self.finish_message(target);
                } else {
                    // Not a blank line: re-enter header parsing in FOOTERS
                    // mode to parse a trailer header, starting with this byte.
                    self.message_state = MessageState::Footers;
                    self.header_state = HeaderState::HeaderLineStart;
                    return self.step_headers(byte, target);
                }
            }
            ExpectingFinalLf => {
                if byte == b'\n' {
                    self.concatenate_chunks(target);
                    return self.finish_message(target);
                } else {
                    return Err(Error::parse(ParserErrorKind::ChunkChar));
                }
            }
        }
        Ok(())
    }

    fn begin_chunk_data(&mut self) {
        if self.chunk_remaining == 0 {
            self.chunk_state = ChunkState::ExpectingFinalCrOrFooters;
        } else {
            self.chunk_state = ChunkState::Data;
        }
    }

    /// `concatenate_chunks()`: moves accumulated chunk bytes into the
    /// content buffer (no-op when a payload handler already streamed
    /// them directly).
    fn concatenate_chunks(&mut self, target: &mut Target) {
        if self.payload_handler.is_some() {
            return;
        }
        let base = match *target {
            Target::Request(ref mut r) => &mut r.base,
            Target::Response(ref mut r) => &mut r.base,
        };
        let bytes = ::std::mem::replace(&mut base.chunk_cache, Vec::new());
        base.set_content(&bytes);
    }

    /// Finalizes the message: computes `status` (§4.2.6), and for
    /// requests/responses performs the post-parse enrichment of §4.2.7.
    fn finish_message(&mut self, target: &mut Target) -> Result<(), Error> {
        self.message_state = MessageState::End;
        let status = if self.has_missing_packets && self.has_data_after_missing {
            DataStatus::Partial
        } else if self.has_missing_packets {
            DataStatus::Truncated
        } else {
            DataStatus::Ok
        };
        {
            let base = match *target {
                Target::Request(ref mut r) => &mut r.base,
                Target::Response(ref mut r) => &mut r.base,
            };
            base.status = status;
            base.is_valid = status != DataStatus::None;
        }
        match *target {
            Target::Request(ref mut r) => self.enrich_request(r)?,
            Target::Response(ref mut r) => self.enrich_response(r),
        }
        Ok(())
    }

    fn enrich_request(&mut self, req: &mut Request) -> Result<(), Error> {
        let queries = uri::parse_url_encoded(&req.query_string);
        req.queries = queries;
        for cookie_header in req.base.headers.equal_range("Cookie") {
            cookies::parse_cookie_header(cookie_header, &mut req.base.cookies, true);
        }
        let content_type = req.base.headers.find("Content-Type").to_string();
        if content_type.starts_with("application/x-www-form-urlencoded") {
            let form = uri::parse_url_encoded_bytes(req.base.content());
            for (k, v) in form.iter() {
                req.queries.insert(k.clone(), v.clone());
            }
        } else if content_type.starts_with("multipart/form-data") {
            if let Some(boundary) = multipart::extract_boundary(&content_type) {
                multipart::parse_multipart_form_data(req.base.content(), &boundary, &mut req.queries);
            }
        }
        Ok(())
    }

    fn enrich_response(&mut self, resp: &mut Response) {
        for set_cookie in resp.base.headers.equal_range("Set-Cookie") {
            cookies::parse_cookie_header(set_cookie, &mut resp.base.cookies, false);
        }
    }

    /// `parse_missing_data` (§4.2.5): informs the parser that `n` bytes of
    /// the current message were lost to packet loss but are otherwise
    /// accounted for in the stream position.
    pub fn parse_missing_data(&mut self, n: u64, target: &mut Target) -> Result<(), Error> {
        match self.message_state {
            MessageState::Start | MessageState::Headers | MessageState::Footers => {
                Err(Error::parse(ParserErrorKind::MissingHeaderData))
            }
            MessageState::Content => {
                if n <= self.content_remaining {
                    // As in the bulk path (`step_content`), only the first
                    // `content_write_remaining` bytes have room in the
                    // (possibly capped) content buffer; the rest of the
                    // gap is still accounted for in `content_remaining`
                    // but the filler itself is dropped.
                    let write_len = ::std::cmp::min(self.content_write_remaining, n) as usize;
                    if write_len > 0 {
                        let filler = vec![FILLER_BYTE; write_len];
                        self.write_content(target, &filler);
                        self.content_write_remaining -= write_len as u64;
                    }
                    self.content_remaining -= n;
                    self.bytes_content_read += n;
                    self.has_missing_packets = true;
                    if self.content_remaining == 0 {
                        self.finish_message(target)?;
                    }
                    Ok(())
                } else {
                    Err(Error::parse(ParserErrorKind::MissingTooMuchContent))
                }
            }
            MessageState::Chunks => {
                if self.chunk_state == ChunkState::Data && n <= self.chunk_remaining {
                    self.fill_missing(target, n as usize);
                    self.chunk_remaining -= n;
                    self.bytes_content_read += n;
                    self.has_missing_packets = true;
                    Ok(())
                } else {
                    Err(Error::parse(ParserErrorKind::MissingChunkData))
                }
            }
            MessageState::ContentNoLength => {
                self.fill_missing(target, n as usize);
                self.bytes_content_read += n;
                self.has_missing_packets = true;
                Ok(())
            }
            MessageState::End => Ok(()),
        }
    }

    fn fill_missing(&mut self, target: &mut Target, n: usize) {
        let filler = vec![FILLER_BYTE; n];
        match self.message_state {
            MessageState::Chunks => self.write_chunk_data(target, &filler),
            _ => self.write_content(target, &filler),
        }
    }

    /// Called when the peer closes the socket while in `ContentNoLength`;
    /// that is a normal end of message rather than truncation, unless
    /// missing-data recovery already flagged a gap with no trailing data.
    pub fn finish_on_eof(&mut self, target: &mut Target) -> Result<(), Error> {
        if self.message_state == MessageState::ContentNoLength {
            self.finish_message(target)
        } else {
            Ok(())
        }
    }
}

fn hex_val(c: u8) -> u8 {
    match c {
        b'0'...b'9' => c - b'0',
        b'a'...b'f' => c - b'a' + 10,
        b'A'...b'F' => c - b'A' + 10,
        _ => 0,
    }
}
