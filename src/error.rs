//! Error types.

use crate::config::ConfigError;

/// The error type returned by tsuji's fallible runtime operations.
///
/// Application-level errors (404, 422, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// infrastructure failures: binding a port, accepting a connection, or
/// loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config: {0}")]
    Config(#[from] ConfigError),
}

/// A route that cannot be registered.
///
/// These are programmer errors. [`Router::handle`](crate::Router::handle)
/// panics with this message; [`Router::try_handle`](crate::Router::try_handle)
/// hands it back.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum RouteError {
    #[error("route pattern is empty")]
    EmptyPattern,

    #[error("route pattern `{pattern}` must begin with '/'")]
    MissingLeadingSlash { pattern: String },

    #[error("route `{method} {pattern}` is already registered")]
    Duplicate { method: http::Method, pattern: String },

    #[error("catch-all must be the last segment in `{pattern}`")]
    CatchAllNotLast { pattern: String },

    #[error("parameter `{name}` appears more than once in `{pattern}`")]
    DuplicateParam { pattern: String, name: String },

    #[error("parameter `{name}` in `{pattern}` conflicts with existing parameter `{existing}`")]
    ParamConflict { pattern: String, name: String, existing: String },
}
