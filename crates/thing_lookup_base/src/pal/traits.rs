use std::sync::Arc;

use crate::LookupResult;

use super::http::{HttpRequest, HttpResponse, HttpServerConfig, HttpServerHandle, HttpService};

/* 📖 # Why is Pal a trait instead of a struct?

Everything the lookup flow needs from the outside world goes through this
trait: environment variables for configuration, outgoing HTTP requests and,
for tests and demos, an HTTP server. `RealPal` talks to the operating system
and the network, `MockPal` keeps all of it in memory.
*/

/// Platform Abstraction Layer (PAL) trait.
pub trait Pal: std::fmt::Debug + Send + Sync + 'static {
    /// Read an environment variable. Returns `None` when unset or not valid unicode.
    fn env_var(&self, name: &str) -> Option<String>;

    /// Send an HTTP request and wait for the response.
    ///
    /// The request URL must be absolute. Any status code the server answers
    /// with is a successful result; `Err` means no response was received
    /// (connection refused, DNS failure, malformed URL, ...).
    fn send_http_request(&self, request: HttpRequest) -> LookupResult<HttpResponse>;

    /// Start an HTTP server with the given service.
    ///
    /// The server listens until the returned handle (and all its clones) is
    /// dropped or `shutdown()` is called.
    fn start_http_server(
        &self,
        service: Box<dyn HttpService>,
        config: HttpServerConfig,
    ) -> LookupResult<HttpServerHandle>;
}

/// Handle to a PAL implementation, enabling shared ownership.
///
/// ```
/// use thing_lookup_base::{MockPal, PalHandle};
///
/// let pal = PalHandle::new(MockPal::new());
/// let pal_clone = pal.clone();
/// assert_eq!(pal_clone.env_var("THING_HOST"), None);
/// ```
#[derive(Debug, Clone)]
pub struct PalHandle(Arc<dyn Pal>);

impl PalHandle {
    pub fn new(pal: impl Pal + 'static) -> Self {
        Self(Arc::new(pal))
    }
}

impl std::ops::Deref for PalHandle {
    type Target = dyn Pal;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}
