//! Resource resolution (§4.5.3): the resource table (longest-prefix
//! match with declined-dispatch fallback) and the redirect table (cyclic
//! mapping with a per-dispatch visited-set, per the "Cyclic ownership"
//! design note — no back-pointer graph).

use std::collections::HashSet;

use error::Error;
use request::Request;
use response::Response;

const MAX_REDIRECT_HOPS: usize = 10;

/// Signal a handler returns to tell the dispatcher whether it served the
/// request or wants the dispatcher to fall back to a shorter prefix
/// (§4.5.3, "declined dispatch").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Handled,
    Declined,
}

/// `(request, response) -> Dispatch` (§6.4). Implemented for any
/// `Fn(&mut Request, &mut Response) -> Dispatch` so plain closures work
/// as handlers.
pub trait Handler: Send + Sync {
    fn handle(&self, req: &mut Request, resp: &mut Response) -> Dispatch;
}

impl<F> Handler for F
where
    F: Fn(&mut Request, &mut Response) -> Dispatch + Send + Sync,
{
    fn handle(&self, req: &mut Request, resp: &mut Response) -> Dispatch {
        (self)(req, resp)
    }
}

struct Entry {
    prefix: String,
    handler: Box<Handler>,
}

/// Registered `(prefix, handler)` pairs (§4.5.3).
pub struct ResourceTable {
    entries: Vec<Entry>,
}

impl ResourceTable {
    pub fn new() -> ResourceTable {
        ResourceTable { entries: Vec::new() }
    }

    /// Later registrations of the same prefix win ties (§8.3): new
    /// entries are searched before older ones of equal length.
    pub fn register<P: Into<String>, H: Handler + 'static>(&mut self, prefix: P, handler: H) {
        self.entries.push(Entry { prefix: prefix.into(), handler: Box::new(handler) });
    }

    /// Returns handlers whose prefix matches `path`, ordered from
    /// longest prefix to shortest (ties broken by most-recent
    /// registration), so the dispatcher can walk backward on a declined
    /// response.
    pub fn candidates(&self, path: &str) -> Vec<&Handler> {
        let mut matches: Vec<(usize, usize, &Handler)> = self.entries.iter().enumerate()
            .filter(|&(_, ref e)| path.starts_with(e.prefix.as_str()))
            .map(|(idx, e)| (e.prefix.len(), idx, e.handler.as_ref()))
            .collect();
        matches.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));
        matches.into_iter().map(|(_, _, h)| h).collect()
    }
}

/// A plain `from -> to` mapping that may contain cycles (§9 "Cyclic
/// ownership"); resolution keeps a per-dispatch visited-set rather than
/// walking a graph with back-pointers.
pub struct RedirectTable {
    map: Vec<(String, String)>,
}

impl RedirectTable {
    pub fn new() -> RedirectTable {
        RedirectTable { map: Vec::new() }
    }

    pub fn add<F: Into<String>, T: Into<String>>(&mut self, from: F, to: T) {
        self.map.push((from.into(), to.into()));
    }

    fn lookup(&self, resource: &str) -> Option<&str> {
        self.map.iter().rev()
            .find(|&&(ref k, _)| k == resource)
            .map(|&(_, ref v)| v.as_str())
    }

    /// Rewrites `req.resource` following the redirect chain, capped at
    /// `MAX_REDIRECT_HOPS`; records the first resource seen as
    /// `original_resource`. A chain that revisits a node fails with
    /// `Error::RedirectLoop` (§4.5.3, §8.3).
    pub fn resolve(&self, req: &mut Request) -> Result<(), Error> {
        let original = req.resource.clone();
        let mut seen = HashSet::new();
        seen.insert(req.resource.clone());
        let mut hops = 0;
        while let Some(next) = self.lookup(&req.resource) {
            hops += 1;
            if hops > MAX_REDIRECT_HOPS || !seen.insert(next.to_string()) {
                return Err(Error::RedirectLoop);
            }
            req.set_resource(next.to_string());
        }
        req.original_resource = original;
        Ok(())
    }
}

/// Strips a single trailing `/` from the request's resource path, per
/// §4.5.3 step 1. `/` itself is left untouched.
pub fn strip_trailing_slash(req: &mut Request) {
    if req.resource.len() > 1 && req.resource.ends_with('/') {
        let trimmed = req.resource[..req.resource.len() - 1].to_string();
        req.set_resource(trimmed);
    }
}
