//! A lightweight HTTP/1.x protocol engine: an incremental byte-driven
//! message parser, a request/response model, a connection abstraction
//! with keep-alive and pipelining support, and a pluggable server that
//! dispatches requests to registered resource handlers.
#![recursion_limit = "100"]

extern crate futures;
extern crate tokio_core;
#[macro_use(quick_error)] extern crate quick_error;
#[macro_use] extern crate matches;
#[macro_use] extern crate log;
extern crate base64;

#[cfg(feature = "tls")] extern crate rustls;
#[cfg(feature = "tls")] extern crate tokio_rustls;
#[cfg(feature = "tls")] extern crate webpki;

pub mod chars;
pub mod dict;
pub mod error;
pub mod enums;
pub mod headers;
pub mod message;
pub mod request;
pub mod response;
pub mod parser;
pub mod connection;
pub mod io;
pub mod server;

pub use dict::Dictionary;
pub use error::{Error, ParserErrorKind};
pub use message::DataStatus;
pub use request::Request;
pub use response::Response;
pub use enums::{Method, Status, HttpStatus};
pub use parser::{Parser, ParseOutcome};
pub use connection::{Connection, Lifecycle};
pub use server::{Server, Config, Dispatch, Handler, Proto};
