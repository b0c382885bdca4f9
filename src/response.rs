//! The Response variant (§3.4): a `Base` plus status line fields and the
//! outgoing cookie list. May be initialized from a request so that
//! keep-alive policy and HTTP version are mirrored.

use message::Base;
use request::Request;
use enums::{Method, HttpStatus};

#[derive(Debug, Clone)]
pub struct Response {
    pub base: Base,
    pub status_code: u16,
    pub status_message: String,
    /// Whether the originating request wants the connection kept alive.
    pub keep_alive: bool,
    /// Whether the originating request's method was HEAD (implies a
    /// zero-length body regardless of `Content-Length`, per §6.2).
    pub is_head_response: bool,
    pub outgoing_cookies: Vec<(String, String)>,
}

impl Default for Response {
    fn default() -> Response {
        Response {
            base: Base::new(),
            status_code: 200,
            status_message: "OK".to_string(),
            keep_alive: true,
            is_head_response: false,
            outgoing_cookies: Vec::new(),
        }
    }
}

impl Response {
    pub fn new() -> Response {
        Response::default()
    }

    /// Builds a response mirroring the request's version and keep-alive
    /// policy, per §3.4 "may be initialized from a request".
    pub fn for_request(req: &Request) -> Response {
        let mut resp = Response::default();
        resp.base.version_major = req.base.version_major;
        resp.base.version_minor = req.base.version_minor;
        resp.base.chunks_supported = req.base.version_ge_1_1();
        resp.keep_alive = req.wants_keep_alive();
        resp.is_head_response = req.method == Method::Head;
        resp
    }

    pub fn set_status<S: HttpStatus>(&mut self, status: &S) {
        self.status_code = status.code();
        self.status_message = status.reason().to_string();
        self.base.clear_first_line();
    }

    /// A response's content length is implied zero for HEAD requests and
    /// for 1xx/204/304 status codes (§6.2); otherwise an unspecified
    /// length falls through to read-until-close on the receiving side.
    pub fn is_content_length_implied(&self) -> bool {
        if self.is_head_response {
            return true;
        }
        match self.status_code {
            100...199 | 204 | 304 => true,
            _ => false,
        }
    }

    pub fn add_cookie<K: Into<String>, V: Into<String>>(&mut self, name: K, value: V) {
        self.outgoing_cookies.push((name.into(), value.into()));
    }

    pub fn first_line(&mut self) -> &str {
        if self.base.cached_first_line().is_none() {
            let line = format!("HTTP/{}.{} {:03} {}",
                self.base.version_major, self.base.version_minor,
                self.status_code, self.status_message);
            self.base.set_first_line(line);
        }
        self.base.cached_first_line().unwrap()
    }
}
