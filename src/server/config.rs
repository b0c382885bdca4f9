//! Server configuration (§6.5), built the way the teacher's own
//! config types are: a chain of `&mut self -> &mut Self` setters ending
//! in `.done()`, which hands back an `Arc` ready to share across
//! connections.

use std::sync::Arc;
use std::time::Duration;

use parser::DEFAULT_CONTENT_MAX;

#[derive(Debug, Clone)]
pub struct Config {
    max_content_length: u64,
    parse_headers_only: bool,
    save_raw_headers: bool,
    port: u16,
    tls_key_file: Option<String>,
    keep_alive_timeout: Duration,
    headers_timeout: Duration,
}

impl Config {
    /// A config with the parser's own defaults (§4.2.3, §6.5).
    pub fn new() -> Config {
        Config {
            max_content_length: DEFAULT_CONTENT_MAX,
            parse_headers_only: false,
            save_raw_headers: false,
            port: 8080,
            tls_key_file: None,
            keep_alive_timeout: Duration::from_secs(90),
            headers_timeout: Duration::from_secs(30),
        }
    }

    /// Upper bound on a message's content length; values claimed in
    /// Content-Length beyond this are capped, not rejected (§4.2.4).
    pub fn max_content_length(&mut self, value: u64) -> &mut Self {
        self.max_content_length = value;
        self
    }

    /// Stop parsing once headers are complete, ignoring any body.
    pub fn parse_headers_only(&mut self, value: bool) -> &mut Self {
        self.parse_headers_only = value;
        self
    }

    /// Preserve exact header bytes alongside the parsed dictionary.
    pub fn save_raw_headers(&mut self, value: bool) -> &mut Self {
        self.save_raw_headers = value;
        self
    }

    pub fn port(&mut self, value: u16) -> &mut Self {
        self.port = value;
        self
    }

    /// TLS key file path (§4.5.5). Loading certificates and keys is left
    /// to the caller; the core only remembers where to find them.
    pub fn tls_key_file<S: Into<String>>(&mut self, value: S) -> &mut Self {
        self.tls_key_file = Some(value.into());
        self
    }

    pub fn keep_alive_timeout(&mut self, value: Duration) -> &mut Self {
        self.keep_alive_timeout = value;
        self
    }

    pub fn headers_timeout(&mut self, value: Duration) -> &mut Self {
        self.headers_timeout = value;
        self
    }

    pub fn get_max_content_length(&self) -> u64 {
        self.max_content_length
    }

    pub fn get_parse_headers_only(&self) -> bool {
        self.parse_headers_only
    }

    pub fn get_save_raw_headers(&self) -> bool {
        self.save_raw_headers
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub fn get_tls_key_file(&self) -> Option<&str> {
        self.tls_key_file.as_ref().map(|s| s.as_str())
    }

    pub fn get_keep_alive_timeout(&self) -> Duration {
        self.keep_alive_timeout
    }

    pub fn get_headers_timeout(&self) -> Duration {
        self.headers_timeout
    }

    /// Finishes the chain, handing back an `Arc` ready to share across
    /// the server's connections.
    pub fn done(&mut self) -> Arc<Config> {
        Arc::new(self.clone())
    }
}

#[cfg(test)]
mod test {
    use super::Config;

    #[test]
    fn test_builder_defaults() {
        let cfg = Config::new().done();
        assert_eq!(cfg.get_port(), 8080);
        assert!(!cfg.get_parse_headers_only());
    }

    #[test]
    fn test_builder_chain() {
        let cfg = Config::new()
            .port(9000)
            .max_content_length(4096)
            .parse_headers_only(true)
            .done();
        assert_eq!(cfg.get_port(), 9000);
        assert_eq!(cfg.get_max_content_length(), 4096);
        assert!(cfg.get_parse_headers_only());
    }
}
