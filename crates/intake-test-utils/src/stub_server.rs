//! stub_server.rs
//!
//! Loopback HTTP server standing in for the TME and PartKeepr APIs in tests.
//! - Backed by `tiny_http`, served from a background thread
//! - Every request is recorded and answered by a handler closure
//! - Shuts down when dropped
//!
//! ```no_run
//! use intake_test_utils::{StubResponse, StubServer};
//!
//! let server = StubServer::start(|req| match req.path() {
//!     "/api/parts" => StubResponse::json(serde_json::json!({ "hydra:member": [] })),
//!     _ => StubResponse::status(404, "not found"),
//! });
//! // point the client at server.url() ...
//! assert!(server.requests().is_empty());
//! ```

use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tiny_http::{Header, Response, Server};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Owned snapshot of a `tiny_http::Request`.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Request target as sent, path plus query.
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    fn capture(request: &mut tiny_http::Request) -> Self {
        let mut body = Vec::new();
        // A truncated body shows up as a failed assertion in the test that sent it.
        let _ = request.as_reader().read_to_end(&mut body);
        Self {
            method: request.method().as_str().to_string(),
            target: request.url().to_string(),
            headers: request
                .headers()
                .iter()
                .map(|h| (h.field.to_string(), h.value.to_string()))
                .collect(),
            body,
        }
    }

    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or(&self.target)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Decoded query string pairs.
    pub fn query(&self) -> Vec<(String, String)> {
        let query = self.target.split_once('?').map(|(_, q)| q).unwrap_or("");
        decode_pairs(query.as_bytes())
    }

    pub fn query_param(&self, name: &str) -> Option<String> {
        lookup(self.query(), name)
    }

    /// Decoded `application/x-www-form-urlencoded` body.
    pub fn form(&self) -> Vec<(String, String)> {
        decode_pairs(&self.body)
    }

    pub fn form_param(&self, name: &str) -> Option<String> {
        lookup(self.form(), name)
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }
}

fn decode_pairs(input: &[u8]) -> Vec<(String, String)> {
    url::form_urlencoded::parse(input).into_owned().collect()
}

fn lookup(pairs: Vec<(String, String)>, name: &str) -> Option<String> {
    pairs.into_iter().find(|(k, _)| k == name).map(|(_, v)| v)
}

#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
}

impl StubResponse {
    pub fn json(value: serde_json::Value) -> Self {
        Self {
            status: 200,
            body: value.to_string(),
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    fn into_response(self) -> Response<std::io::Cursor<Vec<u8>>> {
        let content_type = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
            .expect("static header is valid");
        Response::from_string(self.body)
            .with_status_code(self.status)
            .with_header(content_type)
    }
}

type Handler = dyn Fn(&RecordedRequest) -> StubResponse + Send + 'static;

pub struct StubServer {
    url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl StubServer {
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> StubResponse + Send + 'static,
    {
        let server = Server::http("127.0.0.1:0").expect("bind stub server");
        let addr = server
            .server_addr()
            .to_ip()
            .expect("stub server listens on a TCP address");
        let url = format!("http://{addr}");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let shutdown = Arc::new(AtomicBool::new(false));

        let handle = {
            let requests = Arc::clone(&requests);
            let shutdown = Arc::clone(&shutdown);
            let handler: Box<Handler> = Box::new(handler);
            thread::spawn(move || serve(server, handler, requests, shutdown))
        };

        Self {
            url,
            requests,
            shutdown,
            handle: Some(handle),
        }
    }

    /// Base URL, `http://127.0.0.1:<port>` without trailing slash.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn serve(
    server: Server,
    handler: Box<Handler>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown: Arc<AtomicBool>,
) {
    while !shutdown.load(Ordering::SeqCst) {
        let mut request = match server.recv_timeout(POLL_INTERVAL) {
            Ok(Some(request)) => request,
            Ok(None) => continue,
            Err(_) => break,
        };
        let recorded = RecordedRequest::capture(&mut request);
        requests.lock().unwrap().push(recorded.clone());
        let _ = request.respond(handler(&recorded).into_response());
    }
}
