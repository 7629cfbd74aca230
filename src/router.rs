//! Request router.
//!
//! One route tree per HTTP method. Registration parses the pattern and
//! inserts it under a write lock. Dispatch takes the read lock only long
//! enough to clone the method's root, then walks the tree lock-free.
//!
//! Trees are copy-on-write: a registration that races a lookup builds a new
//! root while the lookup finishes on the one it already holds.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use http::Method;
use tracing::{debug, trace};

use crate::config::RouterConfig;
use crate::error::RouteError;
use crate::handler::{BoxedHandler, Handler};
use crate::params::{ParamsPool, PooledParams};
use crate::pattern;
use crate::request::Request;
use crate::response::Response;
use crate::tree::{Conflict, Node};

/// A registered `(method, pattern)` pair, as returned by [`Router::routes`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RouteInfo {
    pub method: Method,
    pub pattern: String,
}

impl fmt::Display for RouteInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.pattern)
    }
}

#[derive(Default)]
struct RouteTable {
    trees: HashMap<Method, Arc<Node<BoxedHandler>>>,
    routes: Vec<RouteInfo>,
}

/// The application router.
///
/// Build it at startup and pass it to [`Server::serve`](crate::Server::serve),
/// or call [`dispatch`](Router::dispatch) directly.
///
/// ```rust
/// use tsuji::{Request, Router};
///
/// async fn show(req: Request) -> String {
///     format!("user {}", req.param("id"))
/// }
///
/// let app = Router::new()
///     .get("/users/{id}", show)
///     .get("/files/{path...}", |req: Request| async move {
///         req.param("path").to_owned()
///     });
/// ```
pub struct Router {
    table: RwLock<RouteTable>,
    pool: Arc<ParamsPool>,
}

impl Router {
    pub fn new() -> Self {
        Self::with_config(&RouterConfig::default())
    }

    pub fn with_config(config: &RouterConfig) -> Self {
        Self {
            table: RwLock::new(RouteTable::default()),
            pool: Arc::new(ParamsPool::new(config.params_capacity, config.pool_max_idle)),
        }
    }

    /// Registers a handler and returns `self` for chaining.
    ///
    /// # Panics
    ///
    /// Panics on any [`RouteError`]; see [`handle`](Router::handle).
    pub fn on(self, method: Method, pattern: &str, handler: impl Handler) -> Self {
        self.handle(method, pattern, handler);
        self
    }

    pub fn get(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::GET, pattern, handler)
    }

    pub fn post(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::POST, pattern, handler)
    }

    pub fn put(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::PUT, pattern, handler)
    }

    pub fn patch(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::PATCH, pattern, handler)
    }

    pub fn delete(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::DELETE, pattern, handler)
    }

    /// Registers `handler` for `method` requests whose path matches `pattern`.
    ///
    /// Segments of the form `{name}` capture one path component; a final
    /// `{name...}` captures the rest of the path.
    ///
    /// # Panics
    ///
    /// Bad routes are programmer errors and fail at startup. Panics if the
    /// pattern is empty, lacks a leading `/`, is already registered, or is
    /// otherwise rejected by [`try_handle`](Router::try_handle).
    pub fn handle(&self, method: Method, pattern: &str, handler: impl Handler) {
        if let Err(e) = self.try_handle(method, pattern, handler) {
            panic!("invalid route: {e}");
        }
    }

    /// Fallible form of [`handle`](Router::handle). A rejected route leaves
    /// the router unchanged.
    pub fn try_handle(
        &self,
        method: Method,
        pattern: &str,
        handler: impl Handler,
    ) -> Result<(), RouteError> {
        if pattern.is_empty() {
            return Err(RouteError::EmptyPattern);
        }
        if !pattern.starts_with('/') {
            return Err(RouteError::MissingLeadingSlash { pattern: pattern.to_owned() });
        }

        let segments = pattern::parse(pattern);
        pattern::validate(pattern, &segments)?;

        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        let root = table.trees.entry(method.clone()).or_default();

        Arc::make_mut(root)
            .insert(&segments, handler.into_boxed_handler())
            .map_err(|conflict| match conflict {
                Conflict::Duplicate => RouteError::Duplicate {
                    method: method.clone(),
                    pattern: pattern.to_owned(),
                },
                Conflict::ParamName { name, existing } => RouteError::ParamConflict {
                    pattern: pattern.to_owned(),
                    name,
                    existing,
                },
            })?;

        debug!(%method, pattern, "route registered");
        table.routes.push(RouteInfo { method, pattern: pattern.to_owned() });
        Ok(())
    }

    /// Every registered route, in registration order.
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.table.read().unwrap_or_else(PoisonError::into_inner).routes.clone()
    }

    /// Finds the handler for `method` and `path`.
    ///
    /// The returned parameters are on loan from the router's pool and go
    /// back to it when dropped.
    pub fn lookup(&self, method: &Method, path: &str) -> Option<(BoxedHandler, PooledParams)> {
        let root = self.tree(method)?;
        let mut params = self.pool.acquire();
        let handler = root.lookup(path, &mut params)?;
        Some((Arc::clone(handler), params))
    }

    /// Routes one request and runs its handler.
    ///
    /// Unknown methods and unmatched paths get `404 Not Found`.
    pub async fn dispatch(&self, mut req: Request) -> Response {
        let Some((handler, params)) = self.lookup(req.method(), req.path()) else {
            trace!(method = %req.method(), path = req.path(), "no route");
            return Response::not_found();
        };

        if params.is_empty() {
            drop(params);
        } else {
            req.set_params(params);
        }

        handler.call(req).await
    }

    fn tree(&self, method: &Method) -> Option<Arc<Node<BoxedHandler>>> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        table.trees.get(method).cloned()
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router").field("routes", &self.routes()).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::IntoResponse;

    async fn ok(_req: Request) -> Response {
        "ok".into_response()
    }

    fn found(router: &Router, method: Method, path: &str) -> Option<Vec<(String, String)>> {
        router.lookup(&method, path).map(|(_, params)| {
            params.iter().map(|(k, v)| (k.to_owned(), v.to_owned())).collect()
        })
    }

    #[test]
    fn rejects_empty_pattern() {
        assert_eq!(Router::new().try_handle(Method::GET, "", ok), Err(RouteError::EmptyPattern));
    }

    #[test]
    fn rejects_pattern_without_leading_slash() {
        assert_eq!(
            Router::new().try_handle(Method::GET, "users", ok),
            Err(RouteError::MissingLeadingSlash { pattern: "users".into() }),
        );
    }

    #[test]
    fn rejects_duplicate_route() {
        let router = Router::new().get("/users/{id}", ok);
        assert_eq!(
            router.try_handle(Method::GET, "/users/{id}", ok),
            Err(RouteError::Duplicate { method: Method::GET, pattern: "/users/{id}".into() }),
        );
        assert_eq!(router.routes().len(), 1);
    }

    #[test]
    fn rejects_duplicate_catch_all() {
        let router = Router::new().get("/files/{path...}", ok);
        assert!(matches!(
            router.try_handle(Method::GET, "/files/{path...}", ok),
            Err(RouteError::Duplicate { .. }),
        ));
    }

    #[test]
    fn rejects_conflicting_param_names() {
        let router = Router::new().get("/users/{id}", ok);
        assert_eq!(
            router.try_handle(Method::GET, "/users/{uid}/posts", ok),
            Err(RouteError::ParamConflict {
                pattern: "/users/{uid}/posts".into(),
                name: "uid".into(),
                existing: "id".into(),
            }),
        );
    }

    #[test]
    fn same_pattern_under_another_method_is_fine() {
        let router = Router::new().get("/users/{id}", ok).delete("/users/{id}", ok);
        assert_eq!(router.routes().len(), 2);
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn handle_panics_on_duplicate() {
        let _ = Router::new().get("/a", ok).get("/a", ok);
    }

    #[test]
    #[should_panic(expected = "must begin with '/'")]
    fn handle_panics_on_relative_pattern() {
        Router::new().handle(Method::POST, "a/b", ok);
    }

    #[test]
    fn routes_lists_registrations_in_order() {
        let router = Router::new()
            .post("/users", ok)
            .get("/users/{id}", ok)
            .on(Method::from_bytes(b"PURGE").unwrap(), "/cache/{key...}", ok);

        let listed: Vec<String> = router.routes().iter().map(ToString::to_string).collect();
        assert_eq!(listed, ["POST /users", "GET /users/{id}", "PURGE /cache/{key...}"]);
    }

    #[test]
    fn methods_have_independent_trees() {
        let router = Router::new().get("/things", ok);
        assert!(found(&router, Method::GET, "/things").is_some());
        assert!(found(&router, Method::POST, "/things").is_none());
    }

    #[test]
    fn lookup_returns_captured_params() {
        let router = Router::new().get("/users/{uid}/posts/{pid}", ok);
        assert_eq!(
            found(&router, Method::GET, "/users/1/posts/2"),
            Some(vec![("uid".into(), "1".into()), ("pid".into(), "2".into())]),
        );
    }

    #[test]
    fn lookup_miss_returns_buffer_to_pool() {
        let router = Router::new().get("/users/{id}/posts", ok);
        assert!(found(&router, Method::GET, "/users/1/comments").is_none());
        assert_eq!(router.pool.idle(), 1);
    }

    #[test]
    fn registering_while_a_lookup_holds_the_old_tree() {
        let router = Router::new().get("/a/{x}", ok);
        let snapshot = router.tree(&Method::GET).unwrap();

        router.handle(Method::GET, "/b", ok);

        let mut params = router.pool.acquire();
        assert!(snapshot.lookup("/b", &mut params).is_none());
        assert!(found(&router, Method::GET, "/b").is_some());
    }
}
