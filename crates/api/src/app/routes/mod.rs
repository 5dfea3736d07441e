use axum::{routing::get, Router};

pub mod sales;
pub mod system;

/// Router for every endpoint the service exposes.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/ping", get(system::ping))
        .merge(sales::router())
}
