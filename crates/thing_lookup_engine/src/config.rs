use thing_lookup_base::pal::PalHandle;
use thing_lookup_base::{ErrorKind, LookupResult, ThingLookupError};
use tracing::debug;

/// Environment variable holding the lookup service host.
pub const HOST_VAR: &str = "THING_HOST";
/// Environment variable holding the lookup service port.
pub const PORT_VAR: &str = "THING_PORT";
/// Environment variable holding the URL scheme (`http` or `https`).
pub const SCHEME_VAR: &str = "THING_SCHEME";

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 7777;
pub const DEFAULT_SCHEME: &str = "http";

/// Where the lookup service lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl LookupConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            host: host.into(),
            port,
        }
    }

    /// `{scheme}://{host}:{port}`, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

fn config_error(key: &str, message: String) -> Box<ThingLookupError> {
    Box::new(ThingLookupError::new(ErrorKind::Config {
        key: key.to_string(),
        message,
    }))
}

/// Load the lookup configuration from the environment.
///
/// Unset or blank variables fall back to the defaults.
pub fn load_config(pal: &PalHandle) -> LookupResult<LookupConfig> {
    let var = |name: &str| {
        pal.env_var(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    let mut config = LookupConfig::default();
    if let Some(host) = var(HOST_VAR) {
        config.host = host;
    }
    if let Some(port) = var(PORT_VAR) {
        config.port = port
            .parse::<u16>()
            .ok()
            .filter(|port| *port != 0)
            .ok_or_else(|| config_error(PORT_VAR, format!("not a port number: '{}'", port)))?;
    }
    if let Some(scheme) = var(SCHEME_VAR) {
        let scheme = scheme.to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(config_error(
                SCHEME_VAR,
                format!("expected 'http' or 'https', got '{}'", scheme),
            ));
        }
        config.scheme = scheme;
    }

    debug!(base_url = %config.base_url(), "loaded lookup configuration");
    Ok(config)
}
