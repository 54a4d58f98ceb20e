use std::error::Error as StdError;
use std::fmt;

use tracing_error::{SpanTrace, SpanTraceStatus};

/* 📖 # Why a custom error type and not anyhow/eyre/thiserror?

Infrastructure failures (bad configuration, a server that cannot bind, a
request that never reaches the server) are reported through this single type.
It carries a context chain and the span trace at the point of creation.

Lookup outcomes that the user sees (invalid id, not found, ...) are not
errors of this kind, they are modelled by the engine's `LookupError`.
 */

/// Error variants that can occur in thing-lookup operations.
#[derive(Debug)]
pub enum ErrorKind {
    /// An HTTP request could not be completed (connection refused, DNS, ...)
    Transport {
        url: String,
        source: Box<dyn StdError + Send + Sync>,
    },

    /// Local I/O failed (binding a socket, reading a request body, ...)
    Io { source: std::io::Error },

    /// A configuration value is present but unusable
    Config { key: String, message: String },

    /// Catch-all for other errors with a message
    Message { message: String },
}

/// Error wrapping an [`ErrorKind`] with context and a span trace.
pub struct Error {
    kind: ErrorKind,
    context: Vec<String>,
    span_trace: SpanTrace,
}

impl Error {
    /// Creates a new error from an ErrorKind, capturing the current span trace.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: vec![],
            span_trace: SpanTrace::capture(),
        }
    }

    /// Creates a message-only error.
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Message {
            message: message.into(),
        })
    }

    /// Attaches context to an error.
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    fn fmt_kind(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::Transport { url, source } => {
                write!(f, "Request to {} failed: {}", url, source)
            }
            ErrorKind::Io { source } => write!(f, "I/O error: {}", source),
            ErrorKind::Config { key, message } => {
                write!(f, "Invalid configuration value for {}: {}", key, message)
            }
            ErrorKind::Message { message } => write!(f, "{}", message),
        }
    }

    fn fmt_context(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, ctx) in self.context.iter().enumerate() {
            let branch = if i + 1 == self.context.len() { "└─" } else { "├─" };
            writeln!(f, "{} {}", branch, ctx)?;
        }
        Ok(())
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::new(ErrorKind::Io { source })
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.kind {
            ErrorKind::Transport { source, .. } => Some(source.as_ref()),
            ErrorKind::Io { source } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ctx in &self.context {
            write!(f, "{}: ", ctx)?;
        }
        self.fmt_kind(f)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_kind(f)?;
        writeln!(f)?;
        self.fmt_context(f)?;
        if self.span_trace.status() == SpanTraceStatus::CAPTURED {
            writeln!(f, "Trace: {}", self.span_trace)?;
        }
        Ok(())
    }
}

/* 📖 # Why use Box<Error> in the result type?

The error carries a span trace and a context vector, boxing keeps the `Ok`
path of every `Result` small.
*/

/// Standard result type for thing-lookup operations.
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Extension trait for attaching context to Results.
pub trait ResultExt<T> {
    /// Attaches context to an error, consuming and re-wrapping it.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|err| Box::new(err.context(context)))
    }
}

/// Creates a boxed message error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        Box::new($crate::error::Error::message(format!($($arg)*)))
    };
}
