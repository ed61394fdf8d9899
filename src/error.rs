//! Unified error type.

use std::fmt;

/// The error type returned by kawa's fallible operations.
///
/// Two kinds of failure flow through this type:
///
/// - [`Error::Io`] — infrastructure failures: binding the listen port,
///   accepting a connection.
/// - [`Error::Handler`] — a middleware fault: anything a middleware returns
///   (or bubbles up with `?`) while the pipeline runs. The dispatcher turns
///   every handler fault into a uniform `500` / `server error` response, so
///   clients never see the underlying error.
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Handler(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wraps any error-ish value as a middleware fault.
    ///
    /// ```rust
    /// use kawa::Error;
    ///
    /// Error::handler("user 42 not found");
    /// Error::handler(std::io::Error::other("backend down"));
    /// ```
    pub fn handler(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Handler(err.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Handler(e) => write!(f, "handler: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Handler(e) => Some(e.as_ref()),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Body serialization faults surface as handler faults: the response was
/// shaped by middleware, so the pipeline owns the failure.
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Handler(Box::new(e))
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Self::Handler(msg.into())
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Self::Handler(msg.into())
    }
}
