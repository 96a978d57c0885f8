use axum::{http::StatusCode, routing::get, Router};

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health))
}

/// Liveness only. Nothing is verified and nothing is called.
pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}
