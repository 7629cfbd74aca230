//! Incoming HTTP request type.

use bytes::Bytes;
use http::{HeaderMap, Method, Uri};

use crate::params::{Params, PooledParams};

/// An incoming HTTP request with its body fully read.
///
/// Path parameters captured by the router are available through
/// [`param`](Request::param) for as long as the handler holds the request.
pub struct Request {
    inner: http::Request<Bytes>,
    params: Option<PooledParams>,
}

impl Request {
    pub fn new(inner: http::Request<Bytes>) -> Self {
        Self { inner, params: None }
    }

    pub fn method(&self) -> &Method { self.inner.method() }
    pub fn uri(&self) -> &Uri { self.inner.uri() }
    pub fn path(&self) -> &str { self.inner.uri().path() }
    pub fn headers(&self) -> &HeaderMap { self.inner.headers() }
    pub fn body(&self) -> &Bytes { self.inner.body() }

    /// Header lookup by name. Returns `None` for missing or non-ASCII values.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter, or `""` if the route captured none
    /// under that name.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` is `"42"`.
    pub fn param(&self, name: &str) -> &str {
        self.params().and_then(|p| p.get(name)).unwrap_or("")
    }

    /// All captured parameters in capture order, if the route captured any.
    pub fn params(&self) -> Option<&Params> {
        self.params.as_deref()
    }

    pub(crate) fn set_params(&mut self, params: PooledParams) {
        self.params = Some(params);
    }

    /// Hands back the underlying request. Captured parameters are released.
    pub fn into_inner(self) -> http::Request<Bytes> {
        self.inner
    }
}

impl From<http::Request<Bytes>> for Request {
    fn from(inner: http::Request<Bytes>) -> Self {
        Self::new(inner)
    }
}
