//! # tsuji
//!
//! A small async HTTP framework built around one thing: getting a request
//! to the right handler, with its path parameters, without allocating.
//!
//! ## Routing
//!
//! - One route tree per HTTP method. A route registered under `GET` is
//!   invisible to `POST`.
//! - `{name}` captures one path segment; a final `{name...}` captures the rest
//!   of the path.
//! - At every depth a literal segment beats a parameter, which beats a
//!   catch-all. When a branch dead-ends deeper down, lookup backs up and tries
//!   the next alternative, discarding whatever that branch captured.
//! - Captured parameters live in pooled buffers that are reused from request
//!   to request.
//! - Bad routes (duplicates, missing leading `/`, misplaced catch-all) panic
//!   at registration, not at the first request.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use tsuji::{Request, Response, Router, Server, StatusCode};
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = Router::new()
//!         .get("/users/{id}", get_user)
//!         .get("/files/{path...}", get_file)
//!         .post("/users", create_user);
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! async fn get_user(req: Request) -> Response {
//!     let id = req.param("id");
//!     Response::json(format!(r#"{{"id":"{id}"}}"#))
//! }
//!
//! async fn get_file(req: Request) -> String {
//!     format!("file {}", req.param("path"))
//! }
//!
//! async fn create_user(req: Request) -> Response {
//!     if req.body().is_empty() {
//!         return Response::status(StatusCode::BAD_REQUEST);
//!     }
//!     Response::builder()
//!         .status(StatusCode::CREATED)
//!         .header("location", "/users/99")
//!         .json(r#"{"id":"99"}"#)
//! }
//! ```

mod config;
mod error;
mod handler;
mod params;
mod pattern;
mod request;
mod response;
mod router;
mod server;
mod tree;

pub use config::{Config, ConfigError, RouterConfig, ServerConfig};
pub use error::{Error, RouteError};
pub use handler::{BoxedHandler, Handler};
pub use http::{Method, StatusCode};
pub use params::{Params, PooledParams};
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
pub use router::{RouteInfo, Router};
pub use server::Server;
