use std::io::Cursor;
use std::sync::Weak;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::error::ErrorKind;
use crate::{LookupResult, ResultExt, ThingLookupError, err};

use super::http::{
    HttpHeaders, HttpMethod, HttpRequest, HttpResponse, HttpServerConfig, HttpServerHandle,
    HttpService, HttpStatusCode, ShutdownFlag,
};
use super::traits::Pal;

/* 📖 # Why blocking reqwest and tiny_http instead of an async stack?

A lookup is a single request whose caller waits for the answer before doing
anything else, and the fixture server handles a handful of requests. Blocking
I/O expresses that directly: the call to `send_http_request` is the one place
where the lookup waits.
*/

/// How often the server thread checks whether it should stop.
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// PAL implementation backed by the process environment and the network.
#[derive(Debug)]
pub struct RealPal {
    client: reqwest::blocking::Client,
}

impl RealPal {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for RealPal {
    fn default() -> Self {
        Self::new()
    }
}

fn transport_error(
    url: &str,
    source: impl std::error::Error + Send + Sync + 'static,
) -> Box<ThingLookupError> {
    Box::new(ThingLookupError::new(ErrorKind::Transport {
        url: url.to_string(),
        source: Box::new(source),
    }))
}

impl Pal for RealPal {
    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    #[instrument(skip(self, request), fields(method = %request.method(), url = %request.url()))]
    fn send_http_request(&self, request: HttpRequest) -> LookupResult<HttpResponse> {
        let url = url::Url::parse(request.url()).map_err(|e| transport_error(request.url(), e))?;
        let method = reqwest::Method::from_bytes(request.method().as_str().as_bytes())
            .map_err(|e| transport_error(request.url(), e))?;

        let mut builder = self.client.request(method, url.as_str());
        for (name, value) in request.headers().iter() {
            builder = builder.header(name, value);
        }
        if !request.body().is_empty() {
            builder = builder.body(request.body().as_bytes().to_vec());
        }

        let response = builder.send().map_err(|e| {
            debug!(error = %e, "request failed before a response arrived");
            transport_error(request.url(), e)
        })?;

        let status = HttpStatusCode::from(response.status().as_u16());
        let mut headers = HttpHeaders::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.as_str(), value);
            }
        }
        let body = response
            .bytes()
            .map_err(|e| transport_error(request.url(), e))?;
        debug!(%status, body_len = body.len(), "received response");

        let mut result = HttpResponse::new(status).with_body(body.to_vec());
        *result.headers_mut() = headers;
        Ok(result)
    }

    #[instrument(skip(self, service))]
    fn start_http_server(
        &self,
        service: Box<dyn HttpService>,
        config: HttpServerConfig,
    ) -> LookupResult<HttpServerHandle> {
        let address = config.address();
        let server = tiny_http::Server::http(&address)
            .map_err(|e| err!("Failed to bind HTTP server to {}: {}", address, e))?;
        let port = server
            .server_addr()
            .to_ip()
            .map(|addr| addr.port())
            .ok_or_else(|| err!("HTTP server on {} is not bound to an IP address", address))?;

        let handle = HttpServerHandle::new(port);
        let watch = handle.shutdown_watch();
        std::thread::Builder::new()
            .name(format!("http-server-{}", port))
            .spawn(move || serve(server, service, watch))
            .map_err(|e| Box::new(ThingLookupError::from(e)))
            .context("spawning HTTP server thread")?;

        info!(port, "HTTP server started");
        Ok(handle)
    }
}

fn serve(server: tiny_http::Server, service: Box<dyn HttpService>, watch: Weak<ShutdownFlag>) {
    loop {
        match watch.upgrade() {
            Some(flag) if !flag.is_signaled() => {}
            _ => break,
        }
        match server.recv_timeout(SHUTDOWN_POLL_INTERVAL) {
            Ok(Some(request)) => respond(service.as_ref(), request),
            Ok(None) => continue,
            Err(e) => {
                warn!(error = %e, "HTTP server stopped receiving requests");
                break;
            }
        }
    }
    debug!("HTTP server stopped");
}

fn respond(service: &dyn HttpService, mut request: tiny_http::Request) {
    let response = match read_request(&mut request) {
        Ok(http_request) => service.handle_request(http_request).unwrap_or_else(|e| {
            warn!(error = %e, "HTTP service failed");
            HttpResponse::new(HttpStatusCode::SERVICE_ERROR)
                .with_content_type("text/plain")
                .with_body(e.to_string())
        }),
        Err(e) => HttpResponse::bad_request()
            .with_content_type("text/plain")
            .with_body(e.to_string()),
    };

    let status = tiny_http::StatusCode(response.status().as_u16());
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
        })
        .collect::<Vec<_>>();
    let body = response.into_body().into_bytes();
    let length = body.len();
    let reply = tiny_http::Response::new(status, headers, Cursor::new(body), Some(length), None);
    if let Err(e) = request.respond(reply) {
        warn!(error = %e, "failed to send HTTP response");
    }
}

fn read_request(request: &mut tiny_http::Request) -> LookupResult<HttpRequest> {
    let method = HttpMethod::parse(request.method().as_str())
        .ok_or_else(|| err!("Unsupported HTTP method {}", request.method()))?;
    let mut body = Vec::new();
    request
        .as_reader()
        .read_to_end(&mut body)
        .map_err(|e| Box::new(ThingLookupError::from(e)))
        .context("reading request body")?;

    let mut http_request = HttpRequest::new(method, request.url()).with_body(body);
    for header in request.headers() {
        http_request
            .headers_mut()
            .insert(header.field.as_str().as_str(), header.value.as_str());
    }
    Ok(http_request)
}
