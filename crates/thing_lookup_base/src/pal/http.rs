/* 📖 # Why a dedicated HTTP module in the PAL?

The lookup flow is one HTTP round trip. Describing requests and responses with
plain types lets the same code talk to a real server through `RealPal` or to
an in-memory `HttpService` through `MockPal`, and lets tests mount a fixture
thing server without any network.
*/

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// HTTP methods supported by the PAL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    /// Parse an HTTP method from a string, case-insensitively.
    pub fn parse(method: &str) -> Option<Self> {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            "PATCH" => Some(Self::Patch),
            "HEAD" => Some(Self::Head),
            "OPTIONS" => Some(Self::Options),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// HTTP headers collection. Header names are matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpHeaders {
    inner: HashMap<String, String>,
}

impl HttpHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, replacing any previous value for the same name.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner
            .insert(key.into().to_ascii_lowercase(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Iterate over `(lowercased name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// HTTP message body.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct HttpBody {
    bytes: Vec<u8>,
}

impl HttpBody {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self {
            bytes: s.into().into_bytes(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Get content as a string if valid UTF-8.
    pub fn as_string(&self) -> Option<String> {
        String::from_utf8(self.bytes.clone()).ok()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl std::fmt::Debug for HttpBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("HttpBody").field(&self.bytes.len()).finish()
    }
}

impl From<Vec<u8>> for HttpBody {
    fn from(v: Vec<u8>) -> Self {
        Self::from_bytes(v)
    }
}

impl From<String> for HttpBody {
    fn from(s: String) -> Self {
        Self::from_string(s)
    }
}

impl From<&str> for HttpBody {
    fn from(s: &str) -> Self {
        Self::from_string(s)
    }
}

/// HTTP request.
///
/// Outgoing requests carry an absolute URL (`http://host:port/path`), requests
/// received by a server carry only the path and query (`/things/1?x=y`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    method: HttpMethod,
    url: String,
    headers: HttpHeaders,
    body: HttpBody,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HttpHeaders::new(),
            body: HttpBody::empty(),
        }
    }

    /// Shorthand for a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// The URL exactly as given.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The path portion of the URL, without scheme, authority or query.
    pub fn path(&self) -> &str {
        let without_authority = match self.url.split_once("://") {
            Some((_scheme, rest)) => rest.find('/').map_or("/", |idx| &rest[idx..]),
            None => self.url.as_str(),
        };
        without_authority
            .split(['?', '#'])
            .next()
            .unwrap_or(without_authority)
    }

    pub fn headers(&self) -> &HttpHeaders {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HttpHeaders {
        &mut self.headers
    }

    pub fn body(&self) -> &HttpBody {
        &self.body
    }

    pub fn with_body(mut self, body: impl Into<HttpBody>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key, value);
        self
    }
}

/* 📖 # Why is HttpStatusCode a numeric newtype?

A client has to keep whatever status the server sent, including codes nobody
listed in advance; mapping unknown codes onto a fixed enum would turn a 418
into something else. Named constants cover the codes the workspace refers to.
*/

/// HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HttpStatusCode(u16);

impl HttpStatusCode {
    pub const OK: Self = Self(200);
    pub const BAD_REQUEST: Self = Self(400);
    pub const NOT_FOUND: Self = Self(404);
    pub const METHOD_NOT_ALLOWED: Self = Self(405);
    /// Returned by the PAL when an `HttpService` fails with an error.
    pub const SERVICE_ERROR: Self = Self(599);

    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0)
    }

    pub fn reason_phrase(&self) -> &'static str {
        match self.0 {
            200 => "OK",
            400 => "Bad Request",
            404 => "Not Found",
            405 => "Method Not Allowed",
            500 => "Internal Server Error",
            599 => "Service Error",
            _ => "",
        }
    }
}

impl From<u16> for HttpStatusCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

impl std::fmt::Display for HttpStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.reason_phrase() {
            "" => write!(f, "{}", self.0),
            reason => write!(f, "{} {}", self.0, reason),
        }
    }
}

/// HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    status: HttpStatusCode,
    headers: HttpHeaders,
    body: HttpBody,
}

impl HttpResponse {
    pub fn new(status: impl Into<HttpStatusCode>) -> Self {
        Self {
            status: status.into(),
            headers: HttpHeaders::new(),
            body: HttpBody::empty(),
        }
    }

    pub fn ok() -> Self {
        Self::new(HttpStatusCode::OK)
    }

    pub fn bad_request() -> Self {
        Self::new(HttpStatusCode::BAD_REQUEST)
    }

    pub fn not_found() -> Self {
        Self::new(HttpStatusCode::NOT_FOUND)
    }

    pub fn method_not_allowed() -> Self {
        Self::new(HttpStatusCode::METHOD_NOT_ALLOWED)
    }

    pub fn status(&self) -> HttpStatusCode {
        self.status
    }

    pub fn headers(&self) -> &HttpHeaders {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HttpHeaders {
        &mut self.headers
    }

    pub fn body(&self) -> &HttpBody {
        &self.body
    }

    pub fn into_body(self) -> HttpBody {
        self.body
    }

    pub fn with_body(mut self, body: impl Into<HttpBody>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key, value);
        self
    }

    pub fn with_content_type(self, content_type: impl Into<String>) -> Self {
        self.with_header("Content-Type", content_type)
    }

    pub fn with_status(mut self, status: impl Into<HttpStatusCode>) -> Self {
        self.status = status.into();
        self
    }

    /// Create a 200 JSON response.
    pub fn json(body: impl Into<String>) -> Self {
        Self::ok()
            .with_content_type("application/json")
            .with_body(body.into())
    }

    /// Create a 200 plain text response.
    pub fn text(body: impl Into<String>) -> Self {
        Self::ok()
            .with_content_type("text/plain")
            .with_body(body.into())
    }
}

/// Configuration for an HTTP server started through the PAL.
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on. If None, the OS (or MockPal) assigns one.
    pub port: Option<u16>,
}

impl HttpServerConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// The bind address, `host:0` when no port is set.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port.unwrap_or(0))
    }
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self::new("127.0.0.1")
    }
}

/// Trait for handling HTTP requests.
///
/// The service receives every request and does its own routing. An `Err`
/// result is turned into a [`HttpStatusCode::SERVICE_ERROR`] response by the
/// PAL implementation.
pub trait HttpService: std::fmt::Debug + Send + Sync + 'static {
    fn handle_request(&self, request: HttpRequest) -> crate::LookupResult<HttpResponse>;
}

/// Handle to a running HTTP server.
///
/// Clones share the shutdown flag. The serving side only holds a weak
/// reference to it, so dropping the last clone stops the server.
#[derive(Debug, Clone)]
pub struct HttpServerHandle {
    port: u16,
    shutdown: Arc<ShutdownFlag>,
}

#[derive(Debug, Default)]
pub struct ShutdownFlag(AtomicBool);

impl ShutdownFlag {
    pub fn signal(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_signaled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl HttpServerHandle {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            shutdown: Arc::new(ShutdownFlag::default()),
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Base URL for reaching this server on the given host, e.g. `http://127.0.0.1:8080`.
    pub fn base_url(&self, host: &str) -> String {
        format!("http://{}:{}", host, self.port)
    }

    /// Signal the server to stop accepting requests.
    pub fn shutdown(&self) {
        self.shutdown.signal();
    }

    /// Weak view of the shutdown flag for the serving thread, which must not
    /// keep the server alive on its own.
    pub fn shutdown_watch(&self) -> std::sync::Weak<ShutdownFlag> {
        Arc::downgrade(&self.shutdown)
    }
}
