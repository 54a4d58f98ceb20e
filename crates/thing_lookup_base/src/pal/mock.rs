use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::sync::atomic::{AtomicU16, Ordering};

use parking_lot::Mutex;

use crate::error::ErrorKind;
use crate::{LookupResult, ThingLookupError};

use super::http::{
    HttpRequest, HttpResponse, HttpServerConfig, HttpServerHandle, HttpService, HttpStatusCode,
    ShutdownFlag,
};
use super::traits::Pal;

/* 📖 # How does MockPal route HTTP requests?

Servers started through `MockPal` are not bound to a socket, they are stored
by port. `send_http_request` parses the port out of the request URL and calls
the registered service directly, so a client and a fixture server can talk
within one test without any network. A request to a port with no server
fails the same way a refused connection does with `RealPal`.
*/

/// In-memory PAL implementation for testing.
///
/// ```
/// use thing_lookup_base::{MockPal, Pal};
///
/// let mock = MockPal::new();
/// mock.set_env_var("THING_PORT", "8080");
/// assert_eq!(mock.env_var("THING_PORT"), Some("8080".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct MockPal {
    env: Arc<Mutex<HashMap<String, String>>>,
    http_servers: Arc<Mutex<HashMap<u16, MockServer>>>,
    sent_requests: Arc<Mutex<Vec<HttpRequest>>>,
    next_port: Arc<AtomicU16>,
}

#[derive(Debug, Clone)]
struct MockServer {
    service: Arc<dyn HttpService>,
    shutdown: Weak<ShutdownFlag>,
}

impl MockServer {
    fn is_live(&self) -> bool {
        self.shutdown
            .upgrade()
            .is_some_and(|flag| !flag.is_signaled())
    }
}

impl MockPal {
    pub fn new() -> Self {
        Self {
            env: Arc::new(Mutex::new(HashMap::new())),
            http_servers: Arc::new(Mutex::new(HashMap::new())),
            sent_requests: Arc::new(Mutex::new(Vec::new())),
            next_port: Arc::new(AtomicU16::new(10000)),
        }
    }

    pub fn set_env_var(&self, name: impl Into<String>, value: impl Into<String>) {
        self.env.lock().insert(name.into(), value.into());
    }

    /// All requests passed to `send_http_request`, in order.
    pub fn sent_requests(&self) -> Vec<HttpRequest> {
        self.sent_requests.lock().clone()
    }

    /// Number of servers that are registered and not shut down.
    pub fn http_server_count(&self) -> usize {
        self.http_servers
            .lock()
            .values()
            .filter(|server| server.is_live())
            .count()
    }

    fn live_service(&self, port: u16) -> Option<Arc<dyn HttpService>> {
        let mut servers = self.http_servers.lock();
        let server = servers
            .get(&port)
            .map(|server| (server.is_live(), Arc::clone(&server.service)));
        match server {
            Some((true, service)) => Some(service),
            Some((false, _)) => {
                servers.remove(&port);
                None
            }
            None => None,
        }
    }
}

impl Default for MockPal {
    fn default() -> Self {
        Self::new()
    }
}

fn dispatch(service: &dyn HttpService, request: HttpRequest) -> HttpResponse {
    service.handle_request(request).unwrap_or_else(|e| {
        HttpResponse::new(HttpStatusCode::SERVICE_ERROR)
            .with_content_type("text/plain")
            .with_body(e.to_string())
    })
}

fn connection_refused(url: &str, message: String) -> Box<ThingLookupError> {
    Box::new(ThingLookupError::new(ErrorKind::Transport {
        url: url.to_string(),
        source: Box::new(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            message,
        )),
    }))
}

impl Pal for MockPal {
    fn env_var(&self, name: &str) -> Option<String> {
        self.env.lock().get(name).cloned()
    }

    fn send_http_request(&self, request: HttpRequest) -> LookupResult<HttpResponse> {
        self.sent_requests.lock().push(request.clone());

        let url = url::Url::parse(request.url()).map_err(|e| {
            Box::new(ThingLookupError::new(ErrorKind::Transport {
                url: request.url().to_string(),
                source: Box::new(e),
            }))
        })?;
        let port = url.port_or_known_default().ok_or_else(|| {
            connection_refused(request.url(), "URL has no port".to_string())
        })?;
        let service = self.live_service(port).ok_or_else(|| {
            connection_refused(request.url(), format!("no server listening on port {}", port))
        })?;

        // The service sees what a real server would: path and query only.
        let server_url = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        let mut server_request =
            HttpRequest::new(request.method(), server_url).with_body(request.body().clone());
        *server_request.headers_mut() = request.headers().clone();

        Ok(dispatch(service.as_ref(), server_request))
    }

    fn start_http_server(
        &self,
        service: Box<dyn HttpService>,
        config: HttpServerConfig,
    ) -> LookupResult<HttpServerHandle> {
        let port = match config.port {
            Some(port) => port,
            None => self.next_port.fetch_add(1, Ordering::SeqCst),
        };
        let handle = HttpServerHandle::new(port);
        self.http_servers.lock().insert(
            port,
            MockServer {
                service: Arc::from(service),
                shutdown: handle.shutdown_watch(),
            },
        );
        Ok(handle)
    }
}
