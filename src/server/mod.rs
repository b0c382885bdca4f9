//! Server & dispatch (§4.5): accepts connections, constructs
//! per-connection parsers, resolves a request resource to a handler via
//! longest-prefix match with bounded redirect-chain resolution, invokes
//! handlers, and schedules the next request when keep-alive applies.

pub mod config;
pub mod dispatch;
pub mod defaults;
pub mod proto;

pub use self::config::Config;
pub use self::dispatch::{Dispatch, Handler, ResourceTable, RedirectTable};
pub use self::proto::Proto;

use std::sync::{Arc, Mutex};

use request::Request;
use response::Response;

/// Owns the shared resource/redirect tables behind a single mutex each
/// (§5 "Shared-resource policy"); readers take the mutex only during
/// dispatch lookup.
pub struct Server {
    config: Arc<Config>,
    resources: Arc<Mutex<ResourceTable>>,
    redirects: Arc<Mutex<RedirectTable>>,
}

impl Server {
    pub fn new(config: Arc<Config>) -> Server {
        ::error::ensure_error_category_initialized();
        Server {
            config: config,
            resources: Arc::new(Mutex::new(ResourceTable::new())),
            redirects: Arc::new(Mutex::new(RedirectTable::new())),
        }
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Registers a handler at `prefix`. Later registrations of the exact
    /// same prefix win ties (§8.3).
    pub fn register<P: Into<String>, H: Handler + 'static>(&self, prefix: P, handler: H) {
        self.resources.lock().unwrap().register(prefix, handler);
    }

    pub fn add_redirect<F: Into<String>, T: Into<String>>(&self, from: F, to: T) {
        self.redirects.lock().unwrap().add(from, to);
    }

    /// Resolves and invokes a handler for `req`, writing into `resp`.
    /// Implements §4.5.3 end to end: trailing-slash normalization,
    /// redirect resolution with loop detection, longest-prefix lookup
    /// with declined-dispatch fallback, and the default 404/400 handlers.
    pub fn dispatch(&self, req: &mut Request, resp: &mut Response) {
        dispatch::strip_trailing_slash(req);
        let resolved = {
            let redirects = self.redirects.lock().unwrap();
            redirects.resolve(req)
        };
        match resolved {
            Err(_) => defaults::server_error(resp, "maximum number of redirects exceeded"),
            Ok(()) => {
                let resources = self.resources.lock().unwrap();
                let candidates = resources.candidates(&req.resource);
                if candidates.is_empty() {
                    defaults::not_found(resp);
                    return;
                }
                for handler in candidates {
                    match handler.handle(req, resp) {
                        Dispatch::Handled => return,
                        Dispatch::Declined => continue,
                    }
                }
                defaults::not_found(resp);
            }
        }
    }
}
