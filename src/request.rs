//! The Request variant (§3.3): a `Base` plus the request-line fields and
//! the query dictionary produced by URI and form-body parsing.

use message::Base;
use dict::Dictionary;
use enums::Method;

#[derive(Debug, Clone)]
pub struct Request {
    pub base: Base,
    pub method: Method,
    /// URI path after any rewrite by the dispatcher.
    pub resource: String,
    /// The path as first received, before any redirect (§4.5.3).
    pub original_resource: String,
    pub query_string: String,
    pub queries: Dictionary,
}

impl Default for Request {
    fn default() -> Request {
        Request {
            base: Base::new(),
            method: Method::Get,
            resource: String::new(),
            original_resource: String::new(),
            query_string: String::new(),
            queries: Dictionary::new(),
        }
    }
}

impl Request {
    pub fn new() -> Request {
        Request::default()
    }

    pub fn clear(&mut self) {
        *self = Request::default();
    }

    /// A request's content length is implied zero unless `Content-Length`
    /// is present or the body is chunked (§6.2).
    pub fn is_content_length_implied(&self) -> bool {
        false
    }

    /// Connection: close / keep-alive policy folded with the HTTP/1.0
    /// override (§4.5.2): version >= 1.1 and no explicit `close`, or
    /// HTTP/1.0 with an explicit `Keep-Alive` token.
    pub fn wants_keep_alive(&self) -> bool {
        use headers::{is_close, is_keep_alive};
        let conn = self.base.headers.find("Connection");
        if self.base.version_ge_1_1() {
            !is_close(conn.as_bytes())
        } else {
            is_keep_alive(conn.as_bytes())
        }
    }

    pub fn first_line(&mut self) -> &str {
        if self.base.cached_first_line().is_none() {
            let line = format!("{} {} HTTP/{}.{}",
                method_token(&self.method), self.resource,
                self.base.version_major, self.base.version_minor);
            self.base.set_first_line(line);
        }
        self.base.cached_first_line().unwrap()
    }

    /// Call whenever a field the first line depends on changes.
    pub fn set_resource<S: Into<String>>(&mut self, resource: S) {
        self.resource = resource.into();
        self.base.clear_first_line();
    }
}

pub fn method_token(m: &Method) -> &str {
    match *m {
        Method::Options => "OPTIONS",
        Method::Get => "GET",
        Method::Head => "HEAD",
        Method::Post => "POST",
        Method::Put => "PUT",
        Method::Patch => "PATCH",
        Method::Delete => "DELETE",
        Method::Trace => "TRACE",
        Method::Connect => "CONNECT",
        Method::Other(ref s) => s.as_str(),
    }
}
