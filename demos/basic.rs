//! Minimal tsuji example: a few JSON endpoints with path parameters.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic [config.toml]
//!
//! Try:
//!   curl http://localhost:3000/users/42
//!   curl http://localhost:3000/users/42/posts/7
//!   curl http://localhost:3000/files/docs/guide/intro.md
//!   curl -X POST http://localhost:3000/users -d '{"name":"alice"}'
//!   curl -X DELETE http://localhost:3000/users/42

use tsuji::{Config, Request, Response, Router, Server, StatusCode};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(path).expect("failed to load config"),
        None => Config::default(),
    };

    let app = Router::with_config(&config.router)
        .get("/users/{id}", get_user)
        .get("/users/{uid}/posts/{pid}", get_post)
        .get("/users/me", get_me)
        .get("/files/{path...}", get_file)
        .post("/users", create_user)
        .delete("/users/{id}", delete_user);

    Server::from_config(&config.server)
        .serve(app)
        .await
        .expect("server error");
}

// GET /users/{id}
async fn get_user(req: Request) -> Response {
    let id = req.param("id");
    Response::json(format!(r#"{{"id":"{id}","name":"alice"}}"#))
}

// GET /users/{uid}/posts/{pid}
async fn get_post(req: Request) -> Response {
    let (uid, pid) = (req.param("uid"), req.param("pid"));
    Response::json(format!(r#"{{"user":"{uid}","post":"{pid}"}}"#))
}

// GET /users/me wins over /users/{id}
async fn get_me(_req: Request) -> Response {
    Response::json(r#"{"id":"me"}"#)
}

// GET /files/{path...}
async fn get_file(req: Request) -> String {
    format!("would serve {}", req.param("path"))
}

// POST /users
async fn create_user(req: Request) -> Response {
    if req.body().is_empty() {
        return Response::status(StatusCode::BAD_REQUEST);
    }

    Response::builder()
        .status(StatusCode::CREATED)
        .header("location", "/users/99")
        .json(r#"{"id":"99","name":"new_user"}"#)
}

// DELETE /users/{id} → 204 No Content
async fn delete_user(_req: Request) -> StatusCode {
    StatusCode::NO_CONTENT
}
