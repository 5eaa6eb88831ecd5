//! 🏗 HTTP request implementation

use std::fmt::Write as _;
use std::io::{Read, Write};

use hypercar_core::{QueueCounts, RequestKind, ServiceType};
use tiny_http::{Header, Response};
use tracing::warn;
use uuid::Uuid;

/// Length of any hyphenated UUID
const UUID_LEN: usize = b"a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8".len();

const NOT_FOUND: &str = "🚗 could not find the service you are looking for!

Valid requests are:
  GET  /welcome
  GET  /menu
  GET  /get_ticket/change_oil
  GET  /get_ticket/inflate_tires
  GET  /get_ticket/diagnostic
  GET  /processing
  POST /processing
  GET  /next
  GET  /next/<number>
  GET  /api/debug(.*)
  POST /api/debug(.*)";

struct HTTPRequest(tiny_http::Request);

impl hypercar_core::RawRequest for HTTPRequest {
    fn url(&self) -> &str {
        self.0.url()
    }

    fn method(&self) -> hypercar_core::RequestMethod {
        match self.0.method() {
            tiny_http::Method::Post => hypercar_core::RequestMethod::Post,
            // `parse()` only lets GET and POST through
            _ => hypercar_core::RequestMethod::Get,
        }
    }

    fn respond_with_err(self: Box<Self>, err: String, id: Uuid) {
        self.respond(Response::from_string(err).with_status_code(503), id)
    }

    fn respond_with_string(self: Box<Self>, s: String, id: Uuid) {
        self.respond(html(s), id)
    }

    fn respond_with_ticket(self: Box<Self>, number: u32, wait_minutes: u32, id: Uuid) {
        self.respond(
            html(format!(
                "<div>Your number is {number}</div>\n<div>Please wait around {wait_minutes} minutes</div>"
            )),
            id,
        )
    }

    fn respond_with_queue_status(self: Box<Self>, counts: QueueCounts, id: Uuid) {
        let mut s = String::from("<h2>Operator menu</h2>\n");
        for (ty, count) in ServiceType::ALL.into_iter().zip(counts) {
            let _ = writeln!(s, "<div>{} queue: {count}</div>", ty.label());
        }
        s.push_str(
            "<form method=\"post\" action=\"/processing\"><button type=\"submit\">Process next</button></form>",
        );
        self.respond(html(s), id)
    }

    fn respond_with_next(self: Box<Self>, ticket: Option<u32>, id: Uuid) {
        let s = match ticket {
            Some(number) => format!("<div>Next ticket #{number}</div>"),
            None => String::from("<div>Waiting for the next client</div>"),
        };
        self.respond(html(s), id)
    }
}

/// Build a `200 OK` HTML response
fn html(body: String) -> Response<std::io::Cursor<Vec<u8>>> {
    let mut res = Response::from_string(body).with_status_code(200);
    if let Ok(hdr) = Header::from_bytes(b"Content-Type", b"text/html; charset=utf-8") {
        res.add_header(hdr);
    }
    res
}

impl HTTPRequest {
    /// Add HTTP headers (CORS, X-Request-Id) to `res` and send it
    fn respond<R: Read>(self, mut res: Response<R>, id: Uuid) {
        add_response_cors_headers(&mut res);

        let mut rid = Vec::<u8>::with_capacity(UUID_LEN);
        let _ = write!(&mut rid, "{}", id.hyphenated());
        if let Ok(hdr) = Header::from_bytes(b"X-Request-Id", rid) {
            res.add_header(hdr);
        }

        send(self.0, res);
    }
}

/// Send `res`, a client that hung up is only worth a warning
fn send<R: Read>(rq: tiny_http::Request, res: Response<R>) {
    if let Err(e) = rq.respond(res) {
        warn!("HTTP response failed: {e}");
    }
}

/// Map method and URL to a [`RequestKind`]
///
/// A trailing slash is ignored. Unknown service names yield
/// [`hypercar_core::Error::InvalidServiceType`]. `/next/<number>` and
/// `/next/None` are kept as aliases of `/next` for links of the form the
/// operator page used to redirect to.
fn route(
    method: &tiny_http::Method,
    url: &str,
) -> Option<Result<RequestKind, hypercar_core::Error>> {
    use tiny_http::Method::*;

    let path = url.split('?').next().unwrap_or(url);
    let path = match path.strip_suffix('/') {
        Some(p) if !p.is_empty() => p,
        _ => path,
    };

    let kind = match (method, path) {
        (Get, "/welcome") => RequestKind::Welcome,
        (Get, "/menu") => RequestKind::Menu,
        (Get, "/processing") => RequestKind::ProcessingStatus,
        (Post, "/processing") => RequestKind::CallNext,
        (Get, "/next") => RequestKind::NextTicket,
        (Get, path) if path.starts_with("/next/") => {
            let shown = &path["/next/".len()..];
            if shown.eq_ignore_ascii_case("none") || shown.parse::<u32>().is_ok() {
                RequestKind::NextTicket
            } else {
                return None;
            }
        }
        (Get, path) if path.starts_with("/get_ticket/") => {
            let name = &path["/get_ticket/".len()..];
            return Some(name.parse::<ServiceType>().map(RequestKind::GetTicket));
        }
        (Get, path) | (Post, path) if path.starts_with("/api/debug") => RequestKind::Debug,
        _ => return None,
    };
    Some(Ok(kind))
}

/// Parse the given HTTP request
///
/// If [`None`] is returned, the request was already answered with a
/// corresponding error message.
pub fn parse(rq: tiny_http::Request) -> Option<hypercar_core::Request> {
    use tiny_http::Method::*;

    let method = rq.method().clone();
    let routed = route(&method, rq.url());
    let kind = match (method, routed) {
        (Options, _) => {
            let mut res = Response::empty(204);
            add_response_cors_headers(&mut res);
            send(rq, res);
            return None;
        }
        (_, Some(Ok(kind))) => kind,
        (_, Some(Err(e))) => {
            let mut res = Response::from_string(e.to_string()).with_status_code(404);
            add_response_cors_headers(&mut res);
            send(rq, res);
            return None;
        }
        (Get, None) | (Post, None) => {
            let mut res = Response::from_string(NOT_FOUND).with_status_code(404);
            add_response_cors_headers(&mut res);
            send(rq, res);
            return None;
        }
        _ => {
            let mut res = Response::empty(405);
            add_response_cors_headers(&mut res);
            send(rq, res);
            return None;
        }
    };

    let mut rid = None;
    for hdr in rq.headers() {
        if hdr.field.equiv("x-request-id") {
            if let Ok(id) = Uuid::parse_str(hdr.value.as_str()) {
                rid = Some(id);
            }
        }
    }

    Some(hypercar_core::Request::from_raw(
        kind,
        rid.unwrap_or_else(Uuid::new_v4),
        Box::new(HTTPRequest(rq)),
    ))
}

/// Add CORS headers to `res`
fn add_response_cors_headers<R: Read>(res: &mut Response<R>) {
    let headers: [(&[u8], &[u8]); 4] = [
        (b"Access-Control-Request-Method", b"*"),
        (b"Access-Control-Allow-Origin", b"*"),
        (b"Access-Control-Allow-Headers", b"*"),
        (b"Access-Control-Expose-Headers", b"*"),
    ];
    for (field, value) in headers {
        if let Ok(hdr) = Header::from_bytes(field, value) {
            res.add_header(hdr);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_http::Method;

    #[test]
    fn routes() {
        let ok = |method: Method, url: &str| route(&method, url).and_then(Result::ok);

        assert_eq!(ok(Method::Get, "/welcome/"), Some(RequestKind::Welcome));
        assert_eq!(ok(Method::Get, "/menu"), Some(RequestKind::Menu));
        assert_eq!(
            ok(Method::Get, "/get_ticket/inflate_tires"),
            Some(RequestKind::GetTicket(ServiceType::InflateTires))
        );
        assert_eq!(ok(Method::Get, "/processing"), Some(RequestKind::ProcessingStatus));
        assert_eq!(ok(Method::Post, "/processing/"), Some(RequestKind::CallNext));
        assert_eq!(ok(Method::Get, "/next"), Some(RequestKind::NextTicket));
        assert_eq!(ok(Method::Get, "/next/12"), Some(RequestKind::NextTicket));
        assert_eq!(ok(Method::Get, "/next/None/"), Some(RequestKind::NextTicket));
        assert_eq!(route(&Method::Get, "/next/twelve"), None);
        assert_eq!(route(&Method::Post, "/next/12"), None);
        assert_eq!(ok(Method::Post, "/api/debug/stats"), Some(RequestKind::Debug));
        assert_eq!(ok(Method::Post, "/menu"), None);
        assert_eq!(ok(Method::Delete, "/menu"), None);
    }

    #[test]
    fn unknown_service_is_rejected() {
        assert_eq!(
            route(&Method::Get, "/get_ticket/wash_car"),
            Some(Err(hypercar_core::Error::InvalidServiceType("wash_car".into())))
        );
    }
}
