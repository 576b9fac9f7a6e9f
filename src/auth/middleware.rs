// Bearer token request filter

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()
        .filter(|value| !value.trim().is_empty())?
        .strip_prefix("Bearer ")
}

/// Pass-through filter applied to every route.
///
/// Notes whether a bearer token was sent; it never verifies the token and
/// never rejects the request.
pub async fn bearer_passthrough(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();

    match bearer_token(request.headers()) {
        Some(_) => debug!("Bearer token present on request to {}", path),
        None => debug!("No bearer token on request to {}", path),
    }

    next.run(request).await
}
