//! Default error responses (§7.3): minimal HTML bodies for the
//! "not-found" and "bad-request" fallback handlers, matching pion's
//! `BadRequestModule`/`NotFoundModule` built-ins (`HTTPProtocol.cpp`).

use enums::Status;
use response::Response;

const NOT_FOUND_HTML: &'static str = "\
<html><head><title>Not Found</title></head>\
<body><h1>404 Not Found</h1></body></html>";

const BAD_REQUEST_HTML: &'static str = "\
<html><head><title>Bad Request</title></head>\
<body><h1>400 Bad Request</h1></body></html>";

const SERVER_ERROR_HTML_PREFIX: &'static str = "\
<html><head><title>Server Error</title></head>\
<body><h1>500 Server Error</h1><p>";
const SERVER_ERROR_HTML_SUFFIX: &'static str = "</p></body></html>";

const NOT_IMPLEMENTED_HTML: &'static str = "\
<html><head><title>Not Implemented</title></head>\
<body><h1>501 Not Implemented</h1></body></html>";

const METHOD_NOT_ALLOWED_HTML: &'static str = "\
<html><head><title>Method Not Allowed</title></head>\
<body><h1>405 Method Not Allowed</h1></body></html>";

fn html_response(resp: &mut Response, status: &Status, body: &str) {
    resp.set_status(status);
    resp.base.headers.change("Content-Type", "text/html");
    resp.base.set_content(body.as_bytes());
}

/// No resource matches and no fallback (§4.5.3 step 3, §7.3).
pub fn not_found(resp: &mut Response) {
    html_response(resp, &Status::NotFound, NOT_FOUND_HTML);
}

/// Malformed request (§7.3): used by the connection driver when the
/// parser reports an error before a request line could be committed.
pub fn bad_request(resp: &mut Response) {
    html_response(resp, &Status::BadRequest, BAD_REQUEST_HTML);
}

/// Redirect loop exceeded `MAX_REDIRECT_HOPS` (§4.5.3 step 2, §7.3).
pub fn server_error(resp: &mut Response, reason: &str) {
    let body = format!("{}{}{}", SERVER_ERROR_HTML_PREFIX, reason, SERVER_ERROR_HTML_SUFFIX);
    html_response(resp, &Status::InternalServerError, &body);
}

/// A matched resource exists but does not support the request's method
/// (§7.3); `allowed` lists the methods the resource does support.
pub fn method_not_allowed(resp: &mut Response, allowed: &[&str]) {
    html_response(resp, &Status::MethodNotAllowed, METHOD_NOT_ALLOWED_HTML);
    resp.base.headers.change("Allow", allowed.join(", "));
}

/// A recognized method with no implementation behind it (§7.3).
pub fn not_implemented(resp: &mut Response) {
    html_response(resp, &Status::NotImplemented, NOT_IMPLEMENTED_HTML);
}
