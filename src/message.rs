//! The common fields shared by `Request` and `Response` (§3.2). Modeled
//! as a tagged variant with a shared record embedded as a field, per the
//! "Variant vs. inheritance" design note: both variants hold a `Base`
//! and dispatch on whichever concrete type wraps it.

use dict::Dictionary;

/// Packet-loss-aware completion status of a parsed message (§4.2.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataStatus {
    /// Nothing was parsed.
    None,
    /// Missing packets were recovered but no further data followed.
    Truncated,
    /// Missing packets were recovered and more data followed the gap.
    Partial,
    /// Parsed cleanly with no missing-data recovery.
    Ok,
}

impl Default for DataStatus {
    fn default() -> DataStatus {
        DataStatus::None
    }
}

/// Fields and invariants common to requests and responses (§3.2).
#[derive(Debug, Clone)]
pub struct Base {
    pub version_major: u16,
    pub version_minor: u16,
    pub headers: Dictionary,
    pub cookies: Dictionary,
    pub content_length: u64,
    content_buf: Vec<u8>,
    pub chunk_cache: Vec<u8>,
    pub is_valid: bool,
    pub chunks_supported: bool,
    pub do_not_send_content_length: bool,
    pub is_chunked: bool,
    pub remote_ip: ::std::net::IpAddr,
    pub status: DataStatus,
    pub has_missing_packets: bool,
    pub has_data_after_missing: bool,
    first_line: Option<String>,
}

impl Default for Base {
    fn default() -> Base {
        Base {
            version_major: 1,
            version_minor: 1,
            headers: Dictionary::new(),
            cookies: Dictionary::new(),
            content_length: 0,
            content_buf: Vec::new(),
            chunk_cache: Vec::new(),
            is_valid: false,
            chunks_supported: false,
            do_not_send_content_length: false,
            is_chunked: false,
            remote_ip: ::std::net::IpAddr::V4(::std::net::Ipv4Addr::new(0, 0, 0, 0)),
            status: DataStatus::None,
            has_missing_packets: false,
            has_data_after_missing: false,
            first_line: None,
        }
    }
}

impl Base {
    pub fn new() -> Base {
        Base::default()
    }

    pub fn clear(&mut self) {
        *self = Base::default();
    }

    /// Invalidates the cached first line; the owning `Request`/`Response`
    /// calls this whenever it mutates a field the first line depends on.
    pub fn clear_first_line(&mut self) {
        self.first_line = None;
    }

    pub fn cached_first_line(&self) -> Option<&str> {
        self.first_line.as_ref().map(|s| s.as_str())
    }

    pub fn set_first_line(&mut self, line: String) {
        self.first_line = Some(line);
    }

    /// Allocates the content buffer to exactly `len` bytes, NUL-padded
    /// one byte past the end (mirrors pion's `content_buffer_t`, which
    /// allocates `len + 1` and NUL-terminates so textual content can be
    /// treated as a C string).
    pub fn allocate_content(&mut self, len: usize) {
        self.content_buf = vec![0u8; len + 1];
        self.content_length = len as u64;
    }

    pub fn is_content_buffer_allocated(&self) -> bool {
        !self.content_buf.is_empty()
    }

    /// The logical content, excluding the defensive trailing NUL.
    pub fn content(&self) -> &[u8] {
        if self.content_buf.is_empty() {
            &[]
        } else {
            &self.content_buf[..self.content_buf.len() - 1]
        }
    }

    pub fn content_mut(&mut self) -> &mut [u8] {
        let end = if self.content_buf.is_empty() { 0 } else { self.content_buf.len() - 1 };
        &mut self.content_buf[..end]
    }

    pub fn set_content(&mut self, bytes: &[u8]) {
        self.allocate_content(bytes.len());
        let end = bytes.len();
        self.content_buf[..end].copy_from_slice(bytes);
    }

    pub fn version_ge_1_1(&self) -> bool {
        self.version_major > 1 || (self.version_major == 1 && self.version_minor >= 1)
    }

    /// True for HTTP/0.9 "Simple-Request" (no `HTTP/x.y` token at all).
    pub fn is_simple_request(&self) -> bool {
        self.version_major == 0 && self.version_minor == 0
    }
}
